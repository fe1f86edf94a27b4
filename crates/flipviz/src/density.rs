//! Closed-form reference densities the empirical checkpoints are compared to.
use itertools_num::linspace;
use serde::{Deserialize, Serialize};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

use crate::error::PlotError;

const WEIGHT_TOLERANCE: f64 = 1e-6;

/// A density the renderers can overlay on empirical samples.
///
/// The update count is passed for models whose shape drifts over the course of
/// an experiment; stationary models ignore it.
pub trait ReferenceDensity {
    fn density(&self, x: f64, update_count: Option<u64>) -> f64;

    /// Probability mass inside `[x_min, x_max]`, by the trapezoid rule unless
    /// the model has a closed form.
    fn mass_within(&self, x_min: f64, x_max: f64) -> f64 {
        let curve = sample_curve_with(|x| self.density(x, None), x_min, x_max, 2001);
        curve
            .windows(2)
            .map(|w| 0.5 * (w[1].0 - w[0].0) * (w[0].1 + w[1].1))
            .sum()
    }
}

impl<F> ReferenceDensity for F
where
    F: Fn(f64) -> f64,
{
    fn density(&self, x: f64, _update_count: Option<u64>) -> f64 {
        self(x)
    }
}

/// One weighted normal component of a [`GaussianMixture`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixtureComponent {
    pub weight: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl MixtureComponent {
    pub fn new(weight: f64, mean: f64, std_dev: f64) -> Self {
        Self {
            weight,
            mean,
            std_dev,
        }
    }
}

/// Equal-weight normals at +2 and -2 with unit standard deviation.
pub fn bimodal_components() -> Vec<MixtureComponent> {
    vec![
        MixtureComponent::new(0.5, 2.0, 1.0),
        MixtureComponent::new(0.5, -2.0, 1.0),
    ]
}

/// Finite mixture of normal densities with weights summing to one.
#[derive(Debug, Clone)]
pub struct GaussianMixture {
    components: Vec<(f64, Normal)>,
}

impl GaussianMixture {
    /// Build a mixture, rejecting anything that is not a probability density.
    pub fn new(components: &[MixtureComponent]) -> Result<Self, PlotError> {
        if components.is_empty() {
            return Err(PlotError::InvalidMixture(
                "at least one component is required".to_string(),
            ));
        }

        let mut normals = Vec::with_capacity(components.len());
        for (idx, c) in components.iter().enumerate() {
            if !c.weight.is_finite() || c.weight < 0.0 {
                return Err(PlotError::InvalidMixture(format!(
                    "component {} has weight {}, expected a finite non-negative value",
                    idx, c.weight
                )));
            }
            if !c.mean.is_finite() || !c.std_dev.is_finite() || c.std_dev <= 0.0 {
                return Err(PlotError::InvalidMixture(format!(
                    "component {} has mean {} and std_dev {}, expected finite values with std_dev > 0",
                    idx, c.mean, c.std_dev
                )));
            }
            let normal = Normal::new(c.mean, c.std_dev)
                .map_err(|e| PlotError::InvalidMixture(format!("component {}: {}", idx, e)))?;
            normals.push((c.weight, normal));
        }

        let total: f64 = components.iter().map(|c| c.weight).sum();
        if (total - 1.0).abs() > WEIGHT_TOLERANCE {
            return Err(PlotError::InvalidMixture(format!(
                "weights sum to {}, expected 1",
                total
            )));
        }

        Ok(Self {
            components: normals,
        })
    }

    /// The default two-component model centred at ±2.
    pub fn bimodal() -> Result<Self, PlotError> {
        Self::new(&bimodal_components())
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub fn pdf(&self, x: f64) -> f64 {
        self.components
            .iter()
            .map(|(w, normal)| w * normal.pdf(x))
            .sum()
    }
}

impl ReferenceDensity for GaussianMixture {
    fn density(&self, x: f64, _update_count: Option<u64>) -> f64 {
        self.pdf(x)
    }

    fn mass_within(&self, x_min: f64, x_max: f64) -> f64 {
        self.components
            .iter()
            .map(|(w, normal)| w * (normal.cdf(x_max) - normal.cdf(x_min)))
            .sum()
    }
}

/// Evaluate `reference` on `n` evenly spaced points spanning `[x_min, x_max]`.
pub fn sample_curve(
    reference: &dyn ReferenceDensity,
    x_min: f64,
    x_max: f64,
    n: usize,
    update_count: Option<u64>,
) -> Vec<(f64, f64)> {
    sample_curve_with(|x| reference.density(x, update_count), x_min, x_max, n)
}

fn sample_curve_with<F: Fn(f64) -> f64>(f: F, x_min: f64, x_max: f64, n: usize) -> Vec<(f64, f64)> {
    linspace(x_min, x_max, n).map(|x| (x, f(x))).collect()
}
