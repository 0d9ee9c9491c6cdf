#![forbid(unsafe_code)]
//! recsift-operators: the cleaning and editing logic behind the record grid.
//!
//! Design intent:
//! - Keep this crate pure and synchronous. No IO, no threads.
//! - `normalize` turns a `RawTable` into a `RecordSet`; `validate` decides
//!   whether an edit fits a column; `filter` selects rows by name; `view`
//!   ties them together for a grid front end.

pub mod error;
pub mod filter;
pub mod normalize;
pub mod validate;
pub mod view;

pub use error::OpError;
pub use filter::NameFilter;
pub use normalize::{title_case, LoadReport, Normalized, Normalizer};
pub use validate::{validate, validate_against, Rejection};
pub use view::{CellRole, ItemFlags, Orientation, TableModel, ViewEvent};
