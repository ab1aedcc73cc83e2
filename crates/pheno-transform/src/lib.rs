pub mod ops;
pub mod pipeline;

pub use ops::{CalcOp, LevelReplacement};
pub use pipeline::{
    CALC_SUFFIX, CalcOptions, CalcSummary, DatasetOutcome, DatasetStatus, run_calculations,
};
