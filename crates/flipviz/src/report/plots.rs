use plotly::common::{DashType, ErrorData, ErrorType, Line, Mode};
use plotly::layout::{Axis, Layout};
use plotly::{Bar, Plot, Scatter};

use crate::config::{AxisBounds, DivergenceConfig};
use crate::density::{sample_curve, ReferenceDensity};
use crate::io::{DensitySamples, DivergenceTrace};
use crate::render::panels::REFERENCE_RESOLUTION;

/// Plot checkpoint samples as bars (or error-bar markers when the file
/// carries uncertainties) against the reference density.
pub fn plot_density(
    samples: &DensitySamples,
    reference: &dyn ReferenceDensity,
    bounds: &AxisBounds,
    title: &str,
) -> Plot {
    let x = samples.x.to_vec();
    let y = samples.y.to_vec();

    let mut plot = Plot::new();
    plot.add_trace(Bar::new(x.clone(), y.clone()).name("empirical").opacity(0.5));

    if let Some(err) = &samples.err {
        plot.add_trace(
            Scatter::new(x, y)
                .mode(Mode::Markers)
                .name("empirical ± err")
                .error_y(ErrorData::new(ErrorType::Data).array(err.to_vec())),
        );
    }

    let curve = sample_curve(
        reference,
        bounds.x_min,
        bounds.x_max,
        REFERENCE_RESOLUTION,
        samples.update_count,
    );
    let (curve_x, curve_y): (Vec<f64>, Vec<f64>) = curve.into_iter().unzip();
    plot.add_trace(
        Scatter::new(curve_x, curve_y)
            .mode(Mode::Lines)
            .name("expected")
            .line(Line::new().color("rgba(214, 39, 40, 1.0)")),
    );

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(Axis::new().title("x").range(vec![bounds.x_min, bounds.x_max]))
            .y_axis(Axis::new().title("pdf").range(vec![bounds.y_min, bounds.y_max])),
    );

    plot
}

/// Plot the divergence trace with one dashed vertical line per rearrangement.
pub fn plot_divergence(
    trace: &DivergenceTrace,
    config: &DivergenceConfig,
    markers: &[u64],
    title: &str,
) -> Plot {
    let (counts, kld): (Vec<f64>, Vec<f64>) = trace
        .points_within(config.count_min, config.count_max)
        .into_iter()
        .unzip();

    let mut plot = Plot::new();
    plot.add_trace(
        Scatter::new(counts, kld)
            .mode(Mode::LinesMarkers)
            .name("KL-divergence")
            .line(Line::new().color("rgba(31, 119, 180, 1.0)")),
    );

    for (idx, &marker) in markers.iter().enumerate() {
        let m = marker as f64;
        plot.add_trace(
            Scatter::new(vec![m, m], vec![0.0, config.kld_max])
                .mode(Mode::Lines)
                .name("rearrangement")
                .legend_group("rearrangement")
                .show_legend(idx == 0)
                .line(Line::new().color("rgba(44, 160, 44, 0.7)").dash(DashType::Dash)),
        );
    }

    plot.set_layout(
        Layout::new()
            .title(title)
            .x_axis(
                Axis::new()
                    .title("update count")
                    .range(vec![config.count_min as f64, config.count_max as f64]),
            )
            .y_axis(Axis::new().title("KL-divergence").range(vec![0.0, config.kld_max])),
    );

    plot
}
