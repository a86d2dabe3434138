pub mod error;
pub mod matrix;
pub mod table;

pub use error::{ColumnRole, Result, SvrError, TrainingError};
pub use matrix::Matrix;
pub use table::{Cell, Column, ColumnKind, Dataset};
