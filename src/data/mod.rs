//! Data module - CSV loading, table model and row processing

mod loader;
pub(crate) mod model;
mod processor;

pub use loader::{DataLoader, LoaderError};
pub use model::{
    ColumnRef, DerivedView, Row, Schema, Table, COUNTRY_COLUMN, RANK_COLUMN, SCORE_COLUMN,
};
pub use processor::{DataProcessor, ProcessorError};
