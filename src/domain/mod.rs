pub mod models;
pub mod rows;

pub use models::{Category, Gender, UnknownCategory, UnknownGender};
pub use rows::{DetectionResult, DoublesRow, ImportFormat, ParsedRows, SinglesRow};
