//! Looping GIF animations over a sweep of checkpoints.
//!
//! Frames are produced lazily by [`FrameSource`]: each checkpoint file is
//! loaded only when the encoder asks for the next frame, and the source
//! cannot be rewound. Any load failure ends the animation with an error and
//! the staged GIF is discarded.
use std::path::PathBuf;

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::{AxisBounds, PlotConfig};
use crate::density::ReferenceDensity;
use crate::error::PlotError;
use crate::io::{load_checkpoint, DensitySamples};
use crate::output::StagedOutput;
use crate::paths::{ExperimentPaths, OutputPaths};
use crate::render::figure::prepare_samples;
use crate::render::panels::{draw_density_panel, DensityStyle};
use crate::sweep::SweepIter;

/// The two animation variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationStyle {
    /// Markers with uncertainty whiskers, written to `<name>-errorbar.gif`.
    ErrorBar,
    /// Histogram bars, written to `<name>-histo.gif`.
    Histogram,
}

impl AnimationStyle {
    pub fn density_style(&self) -> DensityStyle {
        match self {
            AnimationStyle::ErrorBar => DensityStyle::ErrorBars,
            AnimationStyle::Histogram => DensityStyle::Bars,
        }
    }

    pub fn output_path(&self, outputs: &OutputPaths) -> PathBuf {
        match self {
            AnimationStyle::ErrorBar => outputs.errorbar_gif(),
            AnimationStyle::Histogram => outputs.histogram_gif(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            AnimationStyle::ErrorBar => "errorbar",
            AnimationStyle::Histogram => "histo",
        }
    }
}

/// One loaded checkpoint ready to be drawn.
#[derive(Debug, Clone)]
pub struct Frame {
    pub index: usize,
    pub update_count: u64,
    pub samples: DensitySamples,
    pub bounds: AxisBounds,
}

impl Frame {
    pub fn title(&self) -> String {
        format!("pdf at update count: {}", self.update_count)
    }
}

/// Single-pass producer of animation frames.
pub struct FrameSource<'a> {
    config: &'a PlotConfig,
    counts: SweepIter,
    index: usize,
    failed: bool,
}

impl<'a> FrameSource<'a> {
    pub fn new(config: &'a PlotConfig) -> Result<Self, PlotError> {
        let sweep = config.animation.sweep()?;
        if sweep.is_empty() {
            return Err(PlotError::InvalidSweep {
                start: config.animation.start,
                end: config.animation.end,
                step: config.animation.step,
            });
        }
        Ok(Self {
            config,
            counts: sweep.iter(),
            index: 0,
            failed: false,
        })
    }

    /// Check that every remaining checkpoint file exists without loading any.
    pub fn preflight(&self) -> Result<(), PlotError> {
        check_checkpoints_exist(&self.config.experiment, self.counts.clone())
    }

    /// Frames still to come.
    pub fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.counts.len()
        }
    }
}

fn check_checkpoints_exist<I>(paths: &ExperimentPaths, counts: I) -> Result<(), PlotError>
where
    I: IntoIterator<Item = u64>,
{
    for update_count in counts {
        let path = paths.checkpoint_path(update_count);
        if !path.is_file() {
            return Err(PlotError::MissingCheckpoint { update_count, path });
        }
    }
    Ok(())
}

impl Iterator for FrameSource<'_> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let update_count = self.counts.next()?;
        match load_checkpoint(&self.config.experiment, update_count) {
            Ok(samples) => {
                let frame = Frame {
                    index: self.index,
                    update_count,
                    samples: prepare_samples(samples, self.config),
                    bounds: self.config.bounds,
                };
                self.index += 1;
                Some(Ok(frame))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (0, Some(remaining))
    }
}

/// Paths and frame count of a successfully written animation.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedAnimation {
    pub path: PathBuf,
    pub frames: usize,
}

/// Draw each frame onto `root`, presenting after every frame. Consumes the source.
pub fn encode_frames<DB>(
    root: &DrawingArea<DB, Shift>,
    frames: FrameSource<'_>,
    reference: &dyn ReferenceDensity,
    style: AnimationStyle,
) -> Result<usize>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut written = 0usize;
    for frame in frames {
        let frame = frame?;
        root.fill(&WHITE)?;
        draw_density_panel(
            root,
            &frame.title(),
            &frame.samples,
            reference,
            &frame.bounds,
            style.density_style(),
        )
        .with_context(|| format!("Failed to draw frame for update count {}", frame.update_count))?;
        root.present()?;
        log::debug!(
            "Encoded {} frame {} (update count {})",
            style.name(),
            frame.index,
            frame.update_count
        );
        written += 1;
    }
    Ok(written)
}

/// Render one animation variant over the configured sweep.
pub fn render_animation(
    config: &PlotConfig,
    reference: &dyn ReferenceDensity,
    style: AnimationStyle,
) -> Result<RenderedAnimation> {
    config.validate()?;
    let frames = FrameSource::new(config)?;
    frames.preflight()?;

    let delay_ms = config.animation.frame_delay_ms()?;
    let size = (config.animation.width, config.animation.height);
    let target = style.output_path(&config.experiment.outputs(&config.output_dir));
    let staged = StagedOutput::new(&target)?;

    let written = {
        let root = BitMapBackend::gif(staged.path(), size, delay_ms)
            .with_context(|| format!("Failed to start GIF encoder for {}", target.display()))?
            .into_drawing_area();
        encode_frames(&root, frames, reference, style)
            .with_context(|| format!("Failed to render {}", target.display()))?
    };

    let path = staged.commit()?;
    log::info!(
        "[FlipViz::Animation] Wrote {} frames at {} fps to {}",
        written,
        config.animation.fps,
        path.display()
    );
    Ok(RenderedAnimation {
        path,
        frames: written,
    })
}
