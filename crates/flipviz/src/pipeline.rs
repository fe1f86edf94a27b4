//! The full run: static figure, both animations, then the optional report.
use std::path::PathBuf;

use anyhow::Result;

use crate::config::PlotConfig;
use crate::render::{render_animation, render_static_figure, AnimationStyle, RenderedAnimation, RenderedFigure};
use crate::report::render_report;

/// Which artifacts a run produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stages {
    pub figure: bool,
    pub animations: bool,
    pub report: bool,
}

impl Default for Stages {
    fn default() -> Self {
        Self {
            figure: true,
            animations: true,
            report: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub figure: Option<RenderedFigure>,
    pub animations: Vec<RenderedAnimation>,
    pub report: Option<PathBuf>,
}

impl RunSummary {
    pub fn written_paths(&self) -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(figure) = &self.figure {
            paths.push(figure.pdf.clone());
            paths.push(figure.svg.clone());
            paths.push(figure.png.clone());
        }
        paths.extend(self.animations.iter().map(|a| a.path.clone()));
        paths.extend(self.report.iter().cloned());
        paths
    }
}

/// Run the enabled stages in order, stopping at the first error.
pub fn run(config: &PlotConfig, stages: Stages) -> Result<RunSummary> {
    config.validate()?;
    let reference = config.reference_model()?;
    let mut summary = RunSummary::default();

    if stages.figure {
        summary.figure = Some(render_static_figure(config, &reference)?);
    }

    if stages.animations {
        for style in [AnimationStyle::ErrorBar, AnimationStyle::Histogram] {
            summary
                .animations
                .push(render_animation(config, &reference, style)?);
        }
    }

    if stages.report {
        summary.report = Some(render_report(config, &reference)?);
    }

    Ok(summary)
}
