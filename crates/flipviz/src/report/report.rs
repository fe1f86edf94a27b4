use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use plotly::Plot;

use crate::config::PlotConfig;
use crate::density::ReferenceDensity;
use crate::output::StagedOutput;
use crate::render::figure::{FigureLayout, PanelContent, PanelData};
use crate::report::plots::{plot_density, plot_divergence};

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.12.1.min.js";

/// A titled block of the report holding one plot and an optional note.
pub struct ReportSection {
    pub title: String,
    pub note: Option<String>,
    pub plot: Plot,
}

/// A self-contained HTML page of Plotly charts.
pub struct Report {
    pub title: String,
    pub subtitle: String,
    pub sections: Vec<ReportSection>,
}

impl Report {
    pub fn new(title: &str, subtitle: &str) -> Self {
        Self {
            title: title.to_string(),
            subtitle: subtitle.to_string(),
            sections: Vec::new(),
        }
    }

    pub fn add_section(&mut self, title: &str, note: Option<String>, plot: Plot) {
        self.sections.push(ReportSection {
            title: title.to_string(),
            note,
            plot,
        });
    }

    pub fn render(&self) -> Markup {
        let generated = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        html! {
            (DOCTYPE)
            html lang="en" {
                head {
                    meta charset="utf-8";
                    title { (self.title) }
                    script src=(PLOTLY_CDN) {}
                    style { "body { font-family: sans-serif; margin: 2em; } section { margin-bottom: 2em; }" }
                }
                body {
                    h1 { (self.title) }
                    p { (self.subtitle) }
                    p { "Generated " (generated) }
                    @for (idx, block) in self.sections.iter().enumerate() {
                        section {
                            h2 { (block.title) }
                            @if let Some(note) = &block.note {
                                p { (note) }
                            }
                            (PreEscaped(block.plot.to_inline_html(Some(&format!("plot-{}", idx)))))
                        }
                    }
                }
            }
        }
    }

    pub fn save_to_file(&self, path: &std::path::Path) -> Result<()> {
        fs::write(path, self.render().into_string())
            .with_context(|| format!("Failed to write report: {}", path.display()))
    }
}

/// Build the report from the same panels as the static figure and write it.
pub fn render_report(config: &PlotConfig, reference: &dyn ReferenceDensity) -> Result<PathBuf> {
    let layout = FigureLayout::from_config(config)?;
    let panels = layout.load(config)?;

    let mut report = Report::new(
        &format!("flip-bench: {}", config.experiment.name),
        &format!("Experiment directory: {}", config.experiment.dir.display()),
    );

    for panel in &panels {
        match (&panel.spec.content, &panel.data) {
            (PanelContent::Density { bounds, .. }, PanelData::Density(samples)) => {
                let outside = samples.count_outside(bounds);
                let note = (outside > 0)
                    .then(|| format!("{} samples lie outside the plotted x-range.", outside));
                let plot = plot_density(samples, reference, bounds, &panel.spec.title);
                report.add_section(&panel.spec.title, note, plot);
            }
            (PanelContent::Divergence { markers, .. }, PanelData::Divergence(trace)) => {
                let note = Some(format!(
                    "Rearrangements at update counts: {}",
                    markers
                        .iter()
                        .map(|m| m.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                ));
                let plot = plot_divergence(trace, &config.divergence, markers, &panel.spec.title);
                report.add_section(&panel.spec.title, note, plot);
            }
            _ => anyhow::bail!("Panel {} has data of the wrong kind", panel.spec.label),
        }
    }

    let target = config.experiment.outputs(&config.output_dir).report_html();
    let staged = StagedOutput::new(&target)?;
    report.save_to_file(staged.path())?;
    let path = staged.commit()?;
    log::info!(
        "[FlipViz::Report] Wrote {} sections to {}",
        report.sections.len(),
        path.display()
    );
    Ok(path)
}
