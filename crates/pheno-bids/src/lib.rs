pub mod convert;
pub mod describe;
pub mod extract;
pub mod metadata;
pub mod select;

pub use convert::{ConvertOptions, ConvertSummary, EntryOutcome, EntryStatus, convert_to_bids};
pub use describe::{build_descriptor, parse_levels};
pub use extract::build_entry_table;
pub use metadata::build_entry_sidecar;
pub use select::select_form_columns;
