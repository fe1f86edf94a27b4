//! The static multi-panel figure: one density panel per checkpoint followed
//! by the divergence panel, laid out in a single row.
use std::path::PathBuf;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::{AxisBounds, FigureSize, PlotConfig};
use crate::density::ReferenceDensity;
use crate::error::PlotError;
use crate::io::{load_checkpoint, read_divergence_trace, DensitySamples, DivergenceTrace};
use crate::output::StagedOutput;
use crate::render::panels::{draw_density_panel, draw_divergence_panel, DensityStyle};
use crate::render::pdf::write_pdf_from_svg;

/// What a panel shows and where its data comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelContent {
    Density {
        update_count: u64,
        path: PathBuf,
        bounds: AxisBounds,
    },
    Divergence {
        path: PathBuf,
        markers: Vec<u64>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelSpec {
    pub label: char,
    pub title: String,
    pub content: PanelContent,
}

/// Panel order, titles and inputs of the static figure, resolved before any I/O.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureLayout {
    pub panels: Vec<PanelSpec>,
    pub size: FigureSize,
}

fn panel_label(idx: usize) -> Result<char, PlotError> {
    u8::try_from(idx)
        .ok()
        .filter(|i| *i < 26)
        .map(|i| (b'a' + i) as char)
        .ok_or_else(|| PlotError::InvalidConfig(format!("no panel label for panel {}", idx + 1)))
}

impl FigureLayout {
    pub fn from_config(config: &PlotConfig) -> Result<Self, PlotError> {
        config.validate()?;

        let mut panels = Vec::with_capacity(config.checkpoints.len() + 1);
        for (idx, &update_count) in config.checkpoints.iter().enumerate() {
            let label = panel_label(idx)?;
            panels.push(PanelSpec {
                label,
                title: format!("({}) pdf at update count: {}", label, update_count),
                content: PanelContent::Density {
                    update_count,
                    path: config.experiment.checkpoint_path(update_count),
                    bounds: config.bounds,
                },
            });
        }

        let label = panel_label(config.checkpoints.len())?;
        let divergence = &config.divergence;
        panels.push(PanelSpec {
            label,
            title: format!("({}) KL-divergence", label),
            content: PanelContent::Divergence {
                path: config.experiment.divergence_path(),
                markers: divergence
                    .rearrangement
                    .markers(divergence.count_min, divergence.count_max)?,
            },
        });

        Ok(Self {
            panels,
            size: config.figure,
        })
    }

    pub fn titles(&self) -> Vec<&str> {
        self.panels.iter().map(|p| p.title.as_str()).collect()
    }

    /// Load the data behind every panel. Fails on the first missing or malformed file.
    pub fn load(&self, config: &PlotConfig) -> Result<Vec<LoadedPanel>> {
        self.panels
            .iter()
            .map(|spec| -> Result<LoadedPanel> {
                let data = match &spec.content {
                    PanelContent::Density { update_count, .. } => {
                        let samples = load_checkpoint(&config.experiment, *update_count)?;
                        PanelData::Density(prepare_samples(samples, config))
                    }
                    PanelContent::Divergence { path, .. } => {
                        PanelData::Divergence(read_divergence_trace(path)?)
                    }
                };
                Ok(LoadedPanel {
                    spec: spec.clone(),
                    data,
                })
            })
            .collect()
    }
}

/// Apply the configured normalization and warn about samples outside the window.
pub(crate) fn prepare_samples(samples: DensitySamples, config: &PlotConfig) -> DensitySamples {
    let outside = samples.count_outside(&config.bounds);
    if outside > 0 {
        log::warn!(
            "{} of {} samples at update count {:?} fall outside x in [{}, {}] and are not drawn",
            outside,
            samples.len(),
            samples.update_count,
            config.bounds.x_min,
            config.bounds.x_max
        );
    }
    if config.normalize {
        let fallback = (config.bounds.x_max - config.bounds.x_min) / 50.0;
        samples.normalized(fallback)
    } else {
        samples
    }
}

#[derive(Debug, Clone)]
pub enum PanelData {
    Density(DensitySamples),
    Divergence(DivergenceTrace),
}

#[derive(Debug, Clone)]
pub struct LoadedPanel {
    pub spec: PanelSpec,
    pub data: PanelData,
}

/// Paths of a successfully written static figure.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedFigure {
    pub pdf: PathBuf,
    pub svg: PathBuf,
    pub png: PathBuf,
    pub panels: usize,
}

/// Draw all panels side by side onto `root`.
pub fn draw_figure<DB>(
    root: &DrawingArea<DB, Shift>,
    panels: &[LoadedPanel],
    reference: &dyn ReferenceDensity,
    config: &PlotConfig,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let areas = root.split_evenly((1, panels.len()));
    for (area, panel) in areas.iter().zip(panels) {
        match (&panel.spec.content, &panel.data) {
            (PanelContent::Density { bounds, .. }, PanelData::Density(samples)) => {
                draw_density_panel(
                    area,
                    &panel.spec.title,
                    samples,
                    reference,
                    bounds,
                    DensityStyle::Bars,
                )?;
            }
            (PanelContent::Divergence { .. }, PanelData::Divergence(trace)) => {
                draw_divergence_panel(area, &panel.spec.title, trace, &config.divergence)?;
            }
            _ => anyhow::bail!("Panel {} has data of the wrong kind", panel.spec.label),
        }
    }
    root.present()?;
    Ok(())
}

/// Render the static figure as PDF, SVG and PNG.
///
/// All inputs are loaded before any file is created, and the files are
/// moved into place only after every format rendered successfully. The PDF is
/// converted from the staged SVG.
pub fn render_static_figure(
    config: &PlotConfig,
    reference: &dyn ReferenceDensity,
) -> Result<RenderedFigure> {
    let layout = FigureLayout::from_config(config)?;
    let panels = layout.load(config)?;

    let mass = reference.mass_within(config.bounds.x_min, config.bounds.x_max);
    log::debug!(
        "Reference density holds {:.4} of its mass inside the x-bounds",
        mass
    );

    let outputs = config.experiment.outputs(&config.output_dir);
    let size = (layout.size.width, layout.size.height);

    let svg = StagedOutput::new(outputs.figure_svg())?;
    {
        let root = SVGBackend::new(svg.path(), size).into_drawing_area();
        draw_figure(&root, &panels, reference, config)
            .with_context(|| format!("Failed to render {}", svg.target().display()))?;
    }

    let pdf = StagedOutput::new(outputs.figure_pdf())?;
    write_pdf_from_svg(svg.path(), pdf.path())
        .with_context(|| format!("Failed to render {}", pdf.target().display()))?;

    let png = StagedOutput::new(outputs.figure_png())?;
    {
        let root = BitMapBackend::new(png.path(), size).into_drawing_area();
        draw_figure(&root, &panels, reference, config)
            .with_context(|| format!("Failed to render {}", png.target().display()))?;
    }

    let pdf = pdf.commit()?;
    let svg = svg.commit()?;
    let png = png.commit()?;
    log::info!(
        "[FlipViz::Figure] Wrote {} panels to {}, {} and {}",
        panels.len(),
        pdf.display(),
        svg.display(),
        png.display()
    );

    Ok(RenderedFigure {
        pdf,
        svg,
        png,
        panels: panels.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panel_labels() {
        assert_eq!(panel_label(0).unwrap(), 'a');
        assert_eq!(panel_label(3).unwrap(), 'd');
        assert_eq!(panel_label(25).unwrap(), 'z');
        assert!(panel_label(26).is_err());
    }

    #[test]
    fn test_default_layout_titles() {
        let layout = FigureLayout::from_config(&PlotConfig::default()).unwrap();
        assert_eq!(
            layout.titles(),
            vec![
                "(a) pdf at update count: 40",
                "(b) pdf at update count: 60",
                "(c) pdf at update count: 340",
                "(d) KL-divergence",
            ]
        );
    }
}
