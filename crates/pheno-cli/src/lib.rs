//! Library components for the phenotype CLI.

pub mod logging;
