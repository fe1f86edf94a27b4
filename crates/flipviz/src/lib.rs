//! flipviz: figures and animations for flip-bench density experiments.
//!
//! This crate loads the checkpoint sample files and the KL-divergence trace
//! written by a flip-bench experiment, compares them against a closed-form
//! reference density, and renders a static multi-panel figure, two looping
//! GIF animations and an optional interactive HTML report.
//!
//! All render calls receive their configuration explicitly through
//! [`config::PlotConfig`]; nothing is shared between calls except the
//! drawing surface handed to them.
pub mod config;
pub mod density;
pub mod error;
pub mod io;
pub mod output;
pub mod paths;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod sweep;

pub use config::{AxisBounds, PlotConfig};
pub use density::{GaussianMixture, MixtureComponent, ReferenceDensity};
pub use error::PlotError;
