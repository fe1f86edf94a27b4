//! File naming for experiment inputs and rendered artifacts.
//!
//! Inputs live in the experiment directory:
//!
//! * `<dir>/<name>-pdf-<update_count>.out` for each checkpoint
//! * `<dir>/<name>-kld.out` for the divergence trace
//!
//! Outputs are written to the configured output directory as `<name>.pdf`,
//! `<name>.svg`, `<name>.png`, `<name>-errorbar.gif`, `<name>-histo.gif` and
//! `<name>-report.html`.
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::PlotError;

/// Location and naming stem of one flip-bench experiment.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ExperimentPaths {
    pub dir: PathBuf,
    pub name: String,
}

impl Default for ExperimentPaths {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("../../../flip-bench/experiments/basic-bimodal/"),
            name: "basic-bimodal".to_string(),
        }
    }
}

impl ExperimentPaths {
    pub fn new<P: Into<PathBuf>>(dir: P, name: &str) -> Result<Self, PlotError> {
        let paths = Self {
            dir: dir.into(),
            name: name.to_string(),
        };
        paths.validate()?;
        Ok(paths)
    }

    /// The name becomes part of every file name, so it must be a plain stem.
    pub fn validate(&self) -> Result<(), PlotError> {
        validate_stem(&self.name)
    }

    pub fn checkpoint_path(&self, update_count: u64) -> PathBuf {
        self.dir
            .join(format!("{}-pdf-{}.out", self.name, update_count))
    }

    pub fn divergence_path(&self) -> PathBuf {
        self.dir.join(format!("{}-kld.out", self.name))
    }

    pub fn outputs<P: AsRef<Path>>(&self, output_dir: P) -> OutputPaths {
        OutputPaths {
            dir: output_dir.as_ref().to_path_buf(),
            stem: self.name.clone(),
        }
    }
}

fn validate_stem(name: &str) -> Result<(), PlotError> {
    let bad_char = |c: char| c == '/' || c == '\\' || c == '\0' || c.is_control();
    if name.is_empty() || name == "." || name == ".." || name.chars().any(bad_char) {
        return Err(PlotError::InvalidExperimentName(name.to_string()));
    }
    Ok(())
}

/// Target paths of every artifact a run may produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    dir: PathBuf,
    stem: String,
}

impl OutputPaths {
    pub fn figure_pdf(&self) -> PathBuf {
        self.with_suffix(".pdf")
    }

    pub fn figure_svg(&self) -> PathBuf {
        self.with_suffix(".svg")
    }

    pub fn figure_png(&self) -> PathBuf {
        self.with_suffix(".png")
    }

    pub fn errorbar_gif(&self) -> PathBuf {
        self.with_suffix("-errorbar.gif")
    }

    pub fn histogram_gif(&self) -> PathBuf {
        self.with_suffix("-histo.gif")
    }

    pub fn report_html(&self) -> PathBuf {
        self.with_suffix("-report.html")
    }

    fn with_suffix(&self, suffix: &str) -> PathBuf {
        self.dir.join(format!("{}{}", self.stem, suffix))
    }
}
