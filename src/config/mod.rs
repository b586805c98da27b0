pub mod countries;
pub mod settings;

pub use countries::country_code;
pub use settings::AppConfig;
