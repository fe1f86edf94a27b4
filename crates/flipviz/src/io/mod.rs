//! Readers for the plain-text artifacts written by flip-bench experiments.

pub mod divergence;
pub mod samples;
pub mod table;

pub use divergence::{read_divergence_trace, DivergenceTrace};
pub use samples::{load_checkpoint, read_density_samples, DensitySamples};
pub use table::{read_numeric_table, NumericTable};
