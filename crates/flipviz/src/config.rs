use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::density::{bimodal_components, GaussianMixture, MixtureComponent};
use crate::error::PlotError;
use crate::paths::ExperimentPaths;
use crate::sweep::{RearrangementCadence, Sweep};

/// Fixed plotting window shared by every density panel and animation frame.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct AxisBounds {
    pub x_min: f64,
    pub x_max: f64,
    pub y_min: f64,
    pub y_max: f64,
}

impl AxisBounds {
    pub fn new(x_min: f64, x_max: f64, y_min: f64, y_max: f64) -> Result<Self, PlotError> {
        let bounds = Self {
            x_min,
            x_max,
            y_min,
            y_max,
        };
        bounds.validate()?;
        Ok(bounds)
    }

    pub fn validate(&self) -> Result<(), PlotError> {
        check_range('x', self.x_min, self.x_max)?;
        check_range('y', self.y_min, self.y_max)
    }

    pub fn contains_x(&self, x: f64) -> bool {
        x >= self.x_min && x <= self.x_max
    }
}

impl Default for AxisBounds {
    fn default() -> Self {
        Self {
            x_min: -5.0,
            x_max: 5.0,
            y_min: 0.0,
            y_max: 0.3,
        }
    }
}

fn check_range(axis: char, min: f64, max: f64) -> Result<(), PlotError> {
    if !min.is_finite() || !max.is_finite() || min >= max {
        return Err(PlotError::InvalidBounds { axis, min, max });
    }
    Ok(())
}

/// Settings of the KL-divergence panel.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DivergenceConfig {
    /// Upper limit of the y-axis; the lower limit is always zero.
    pub kld_max: f64,
    pub count_min: u64,
    pub count_max: u64,
    pub rearrangement: RearrangementCadence,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            kld_max: 0.13,
            count_min: 40,
            count_max: 500,
            rearrangement: RearrangementCadence {
                start: 50,
                period: 100,
            },
        }
    }
}

impl DivergenceConfig {
    pub fn validate(&self) -> Result<(), PlotError> {
        check_range('y', 0.0, self.kld_max)?;
        if self.count_min > self.count_max {
            return Err(PlotError::InvalidConfig(format!(
                "divergence count_min ({}) exceeds count_max ({})",
                self.count_min, self.count_max
            )));
        }
        self.rearrangement.validate()
    }
}

/// GIF frame delays are stored in hundredths of a second, so anything faster
/// than 100 fps would encode a zero delay.
pub const MAX_FPS: u32 = 100;

/// Settings of the two animated sweeps.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    pub start: u64,
    pub end: u64,
    pub step: u64,
    /// Include `end` itself in the sweep when it lies on the step grid.
    pub include_end: bool,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            start: 10,
            end: 500,
            step: 10,
            include_end: false,
            fps: 4,
            width: 640,
            height: 480,
        }
    }
}

impl AnimationConfig {
    pub fn sweep(&self) -> Result<Sweep, PlotError> {
        Sweep::new(self.start, self.end, self.step, self.include_end)
    }

    /// Delay between frames in milliseconds.
    pub fn frame_delay_ms(&self) -> Result<u32, PlotError> {
        if self.fps == 0 || self.fps > MAX_FPS {
            return Err(PlotError::InvalidFrameRate(self.fps));
        }
        Ok(1000 / self.fps)
    }

    pub fn validate(&self) -> Result<(), PlotError> {
        self.sweep()?;
        self.frame_delay_ms()?;
        check_size(self.width, self.height)
    }
}

/// Pixel size of the static figure; every panel gets an equal share of the width.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

impl Default for FigureSize {
    fn default() -> Self {
        Self {
            width: 2000,
            height: 500,
        }
    }
}

fn check_size(width: u32, height: u32) -> Result<(), PlotError> {
    if width == 0 || height == 0 {
        return Err(PlotError::InvalidConfig(format!(
            "image size {}x{} must be non-zero",
            width, height
        )));
    }
    Ok(())
}

/// Everything a run needs, passed explicitly into each render call.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PlotConfig {
    pub experiment: ExperimentPaths,
    pub output_dir: PathBuf,
    pub bounds: AxisBounds,
    /// Update counts shown as static density panels, in panel order.
    pub checkpoints: Vec<u64>,
    /// Rescale `(x, count)` samples to unit area before drawing.
    pub normalize: bool,
    pub reference: Vec<MixtureComponent>,
    pub divergence: DivergenceConfig,
    pub animation: AnimationConfig,
    pub figure: FigureSize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            experiment: ExperimentPaths::default(),
            output_dir: PathBuf::from("."),
            bounds: AxisBounds::default(),
            checkpoints: vec![40, 60, 340],
            normalize: false,
            reference: bimodal_components(),
            divergence: DivergenceConfig::default(),
            animation: AnimationConfig::default(),
            figure: FigureSize::default(),
        }
    }
}

/// Panels are labelled `(a)`, `(b)`, ...; the divergence panel takes the last letter.
pub const MAX_DENSITY_PANELS: usize = 25;

impl PlotConfig {
    /// Check every constraint that would otherwise surface halfway through a render.
    pub fn validate(&self) -> Result<(), PlotError> {
        self.experiment.validate()?;
        self.bounds.validate()?;
        if self.checkpoints.len() > MAX_DENSITY_PANELS {
            return Err(PlotError::InvalidConfig(format!(
                "{} checkpoints requested, at most {} density panels are supported",
                self.checkpoints.len(),
                MAX_DENSITY_PANELS
            )));
        }
        GaussianMixture::new(&self.reference)?;
        self.divergence.validate()?;
        self.animation.validate()?;
        check_size(self.figure.width, self.figure.height)
    }

    pub fn reference_model(&self) -> Result<GaussianMixture, PlotError> {
        GaussianMixture::new(&self.reference)
    }
}

/// Load a plot configuration from a JSON file. Missing keys take their defaults.
pub fn load_plot_config<P: AsRef<Path>>(path: P) -> Result<PlotConfig> {
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config: {}", path.as_ref().display()))?;
    let config: PlotConfig = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", path.as_ref().display()))?;
    Ok(config)
}
