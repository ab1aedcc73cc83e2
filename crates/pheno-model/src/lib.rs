pub mod config;
pub mod dictionary;
pub mod error;
pub mod sidecar;
pub mod table;

pub use config::{BidsConfig, BidsEntry, CalcConfig, CalcStep, DatasetCalcs, FormHandle};
pub use dictionary::{DataDictionary, FieldDef};
pub use error::{PhenoError, Result};
pub use sidecar::{Descriptor, MEASUREMENT_TOOL_METADATA, Sidecar};
pub use table::{CellValue, PARTICIPANT_ID_COLUMN, SUBJECT_ID_COLUMN, Table};
