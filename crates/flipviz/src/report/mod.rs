//! Interactive HTML report.
//!
//! Plotly versions of the static panels, bundled into a single HTML page
//! with maud. Useful for zooming into individual checkpoints, which the
//! static figure does not allow.
pub mod plots;
pub mod report;

pub use report::{render_report, Report, ReportSection};
