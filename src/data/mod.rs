//! Data module - loading, reshaping, joining and cleaning

mod cache;
mod cleaner;
mod join;
mod loader;
mod processor;
mod table;

pub use cache::LoadCache;
pub use cleaner::{CleanReport, Cleaner, CoercionWarning};
pub use join::{JoinReport, Joiner};
pub use loader::DataLoader;
pub use processor::{DataProcessor, TidySet};
pub use table::{
    MergedRow, MergedTable, Metric, TidyRow, TidyTable, Value, WideRow, WideTable, WideTableSet,
};
