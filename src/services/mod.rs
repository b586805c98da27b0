pub mod direct_import;
pub mod import;
pub mod listing;
pub mod server;
pub mod summary;
