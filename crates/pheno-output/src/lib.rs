mod json;
mod tsv;

pub use json::write_sidecar;
pub use tsv::{MISSING_SENTINEL, write_tsv_table};
