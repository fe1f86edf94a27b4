//! Single-panel drawing on any plotters backend.
//!
//! Every panel clamps what it draws to the axis window it was given, so a
//! sample outside the window never rescales the panel.
use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::config::{AxisBounds, DivergenceConfig};
use crate::density::{sample_curve, ReferenceDensity};
use crate::io::{DensitySamples, DivergenceTrace};

/// Number of points the reference curve is evaluated on.
pub const REFERENCE_RESOLUTION: usize = 400;

const EMPIRICAL_COLOR: RGBColor = RGBColor(31, 119, 180);
const REFERENCE_COLOR: RGBColor = RGBColor(214, 39, 40);
const MARKER_COLOR: RGBColor = RGBColor(44, 160, 44);

/// How empirical samples are drawn in a density panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DensityStyle {
    /// One bar per sample, as wide as the sample spacing.
    Bars,
    /// Markers with vertical whiskers of ±err.
    ErrorBars,
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Draw empirical samples against the reference density inside `bounds`.
pub fn draw_density_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    samples: &DensitySamples,
    reference: &dyn ReferenceDensity,
    bounds: &AxisBounds,
    style: DensityStyle,
) -> Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("pdf")
        .draw()?;

    let visible: Vec<(usize, (f64, f64))> = samples
        .points()
        .enumerate()
        .filter(|(_, (x, _))| bounds.contains_x(*x))
        .collect();

    match style {
        DensityStyle::Bars => {
            let width = samples
                .bar_width()
                .unwrap_or((bounds.x_max - bounds.x_min) / 50.0);
            let half = width / 2.0;
            chart
                .draw_series(visible.iter().map(|&(_, (x, y))| {
                    Rectangle::new(
                        [
                            (clamp(x - half, bounds.x_min, bounds.x_max), bounds.y_min),
                            (
                                clamp(x + half, bounds.x_min, bounds.x_max),
                                clamp(y, bounds.y_min, bounds.y_max),
                            ),
                        ],
                        EMPIRICAL_COLOR.mix(0.5).filled(),
                    )
                }))?
                .label("empirical")
                .legend(|(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 15, y + 5)], EMPIRICAL_COLOR.mix(0.5).filled())
                });
        }
        DensityStyle::ErrorBars => {
            let err = samples.err.as_ref();
            chart.draw_series(visible.iter().map(|&(idx, (x, y))| {
                let e = err.map(|e| e[idx]).unwrap_or(0.0);
                ErrorBar::new_vertical(
                    x,
                    clamp(y - e, bounds.y_min, bounds.y_max),
                    clamp(y, bounds.y_min, bounds.y_max),
                    clamp(y + e, bounds.y_min, bounds.y_max),
                    EMPIRICAL_COLOR.filled(),
                    6,
                )
            }))?;
            chart
                .draw_series(visible.iter().map(|&(_, (x, y))| {
                    Circle::new(
                        (x, clamp(y, bounds.y_min, bounds.y_max)),
                        3,
                        EMPIRICAL_COLOR.filled(),
                    )
                }))?
                .label("empirical")
                .legend(|(x, y)| Circle::new((x + 7, y), 3, EMPIRICAL_COLOR.filled()));
        }
    }

    let curve = sample_curve(
        reference,
        bounds.x_min,
        bounds.x_max,
        REFERENCE_RESOLUTION,
        samples.update_count,
    );
    chart
        .draw_series(LineSeries::new(
            curve
                .into_iter()
                .map(|(x, y)| (x, clamp(y, bounds.y_min, bounds.y_max))),
            REFERENCE_COLOR.stroke_width(2),
        ))?
        .label("expected")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], REFERENCE_COLOR.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(())
}

/// Draw the divergence trace with vertical markers at each rearrangement.
///
/// Returns the update counts that were marked.
pub fn draw_divergence_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    trace: &DivergenceTrace,
    config: &DivergenceConfig,
) -> Result<Vec<u64>>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let markers = config
        .rearrangement
        .markers(config.count_min, config.count_max)?;

    let x_min = config.count_min as f64;
    let x_max = if config.count_max > config.count_min {
        config.count_max as f64
    } else {
        x_min + 1.0
    };

    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, 0.0..config.kld_max)?;

    chart
        .configure_mesh()
        .x_desc("update count")
        .y_desc("KL-divergence")
        .draw()?;

    let points: Vec<(f64, f64)> = trace
        .points_within(config.count_min, config.count_max)
        .into_iter()
        .map(|(c, k)| (c, clamp(k, 0.0, config.kld_max)))
        .collect();

    chart
        .draw_series(LineSeries::new(
            points.iter().copied(),
            EMPIRICAL_COLOR.stroke_width(2),
        ))?
        .label("KL-divergence")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], EMPIRICAL_COLOR.stroke_width(2)));
    chart.draw_series(
        points
            .iter()
            .map(|&(c, k)| Circle::new((c, k), 3, EMPIRICAL_COLOR.filled())),
    )?;

    chart
        .draw_series(markers.iter().map(|&m| {
            PathElement::new(
                vec![(m as f64, 0.0), (m as f64, config.kld_max)],
                MARKER_COLOR.mix(0.7).stroke_width(2),
            )
        }))?
        .label("rearrangement")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], MARKER_COLOR.mix(0.7).stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    Ok(markers)
}
