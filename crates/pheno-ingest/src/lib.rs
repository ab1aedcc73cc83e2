mod dictionary;
mod json;
mod table;

pub use dictionary::read_data_dictionary;
pub use json::{load_bids_config, load_calc_config, load_sidecar};
pub use table::{read_csv_table, read_tsv_table};
