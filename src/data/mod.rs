//! Data module - CSV loading, cleaning and class selection

mod filter;
mod loader;
mod model;
mod processor;

pub use filter::{filtered_records, Selection};
pub use loader::DataLoader;
pub use model::{ExamRecord, ScoreKind, ScoreTable};
pub use processor::DataProcessor;
