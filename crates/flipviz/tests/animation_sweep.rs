//! Integration tests for the animation frame source and GIF rendering.

use std::fs;
use std::path::Path;

use flipviz::config::{AnimationConfig, PlotConfig};
use flipviz::paths::ExperimentPaths;
use flipviz::render::{render_animation, AnimationStyle, FrameSource};
use flipviz::{GaussianMixture, PlotError};
use plotters::style::IntoFont;

fn write_checkpoint(paths: &ExperimentPaths, update_count: u64) {
    let peak = 0.3 * (1.0 - (-(update_count as f64) / 200.0).exp());
    let content = format!(
        "-2.0 {:.4} 0.02\n-1.0 0.05 0.01\n0.0 0.02 0.01\n1.0 0.05 0.01\n2.0 {:.4} 0.02\n",
        peak, peak
    );
    fs::write(paths.checkpoint_path(update_count), content).unwrap();
}

fn sweep_config(dir: &Path, include_end: bool) -> PlotConfig {
    let experiment = ExperimentPaths::new(dir.join("data"), "sweep").unwrap();
    fs::create_dir_all(&experiment.dir).unwrap();
    for count in (10..=500).step_by(10) {
        write_checkpoint(&experiment, count);
    }
    PlotConfig {
        experiment,
        output_dir: dir.join("out"),
        animation: AnimationConfig {
            include_end,
            ..AnimationConfig::default()
        },
        ..PlotConfig::default()
    }
}

fn gif_files(dir: &Path) -> Vec<String> {
    match fs::read_dir(dir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().to_string())
            .filter(|name| name.ends_with(".gif"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Frame source
// ---------------------------------------------------------------------------

#[test]
fn default_sweep_excludes_end_bound() {
    let dir = tempfile::tempdir().unwrap();
    let config = sweep_config(dir.path(), false);
    let frames: Vec<_> = FrameSource::new(&config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(frames.len(), 49);
    assert_eq!(frames.first().map(|f| f.update_count), Some(10));
    assert_eq!(frames.last().map(|f| f.update_count), Some(490));
}

#[test]
fn inclusive_sweep_has_fifty_frames() {
    let dir = tempfile::tempdir().unwrap();
    let config = sweep_config(dir.path(), true);
    let frames: Vec<_> = FrameSource::new(&config)
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(frames.len(), (500 - 10) / 10 + 1);
    assert_eq!(frames.last().map(|f| f.update_count), Some(500));
}

#[test]
fn frames_are_indexed_and_share_bounds() {
    let dir = tempfile::tempdir().unwrap();
    let config = sweep_config(dir.path(), false);
    for (idx, frame) in FrameSource::new(&config).unwrap().enumerate() {
        let frame = frame.unwrap();
        assert_eq!(frame.index, idx);
        assert_eq!(frame.bounds, config.bounds);
        assert_eq!(frame.samples.update_count, Some(frame.update_count));
        assert_eq!(frame.title(), format!("pdf at update count: {}", frame.update_count));
    }
}

#[test]
fn malformed_checkpoint_ends_the_frame_source() {
    let dir = tempfile::tempdir().unwrap();
    let config = sweep_config(dir.path(), false);
    fs::write(config.experiment.checkpoint_path(200), "-1 0.1\n0 broken\n").unwrap();

    let mut source = FrameSource::new(&config).unwrap();
    let mut ok = 0;
    let mut errors = 0;
    for frame in source.by_ref() {
        match frame {
            Ok(_) => ok += 1,
            Err(e) => {
                errors += 1;
                assert!(format!("{:#}", e).contains("update count 200"));
            }
        }
    }
    assert_eq!(ok, 19);
    assert_eq!(errors, 1);
    assert_eq!(source.remaining(), 0);
    assert!(source.next().is_none());
}

#[test]
fn preflight_finds_missing_checkpoint() {
    let dir = tempfile::tempdir().unwrap();
    let config = sweep_config(dir.path(), false);
    fs::remove_file(config.experiment.checkpoint_path(300)).unwrap();
    let source = FrameSource::new(&config).unwrap();
    match source.preflight() {
        Err(PlotError::MissingCheckpoint { update_count, .. }) => assert_eq!(update_count, 300),
        other => panic!("expected MissingCheckpoint, got {:?}", other),
    }
}

#[test]
fn empty_sweep_is_rejected() {
    let config = PlotConfig {
        animation: AnimationConfig {
            start: 10,
            end: 10,
            ..AnimationConfig::default()
        },
        ..PlotConfig::default()
    };
    assert!(matches!(
        FrameSource::new(&config),
        Err(PlotError::InvalidSweep { .. })
    ));
}

// ---------------------------------------------------------------------------
// GIF rendering
// ---------------------------------------------------------------------------

#[test]
fn missing_checkpoint_mid_sweep_writes_no_gif() {
    let dir = tempfile::tempdir().unwrap();
    let config = sweep_config(dir.path(), false);
    fs::remove_file(config.experiment.checkpoint_path(250)).unwrap();
    let reference = GaussianMixture::bimodal().unwrap();

    for style in [AnimationStyle::ErrorBar, AnimationStyle::Histogram] {
        let err = render_animation(&config, &reference, style).unwrap_err();
        match err.downcast_ref::<PlotError>() {
            Some(PlotError::MissingCheckpoint { update_count, .. }) => {
                assert_eq!(*update_count, 250)
            }
            other => panic!("expected MissingCheckpoint, got {:?}", other),
        }
    }
    assert!(gif_files(&config.output_dir).is_empty());
}

#[test]
fn malformed_first_checkpoint_discards_staged_gif() {
    let dir = tempfile::tempdir().unwrap();
    let config = sweep_config(dir.path(), false);
    fs::write(config.experiment.checkpoint_path(10), "garbage\n").unwrap();
    let reference = GaussianMixture::bimodal().unwrap();

    assert!(render_animation(&config, &reference, AnimationStyle::Histogram).is_err());
    assert!(gif_files(&config.output_dir).is_empty());
}

/// Frame titles and tick labels need a resolvable sans-serif font.
fn fonts_available() -> bool {
    let found = ("sans-serif", 20).into_font().box_size("0").is_ok();
    if !found {
        eprintln!("no sans-serif font found, skipping render test");
    }
    found
}

struct DecodedGif {
    frames: usize,
    delays: Vec<u16>,
    repeat: gif::Repeat,
    size: (u16, u16),
}

fn decode_gif(path: &Path) -> DecodedGif {
    let mut options = gif::DecodeOptions::new();
    options.set_color_output(gif::ColorOutput::Indexed);
    let mut decoder = options.read_info(fs::File::open(path).unwrap()).unwrap();
    let mut delays = Vec::new();
    while let Some(frame) = decoder.read_next_frame().unwrap() {
        delays.push(frame.delay);
    }
    DecodedGif {
        frames: delays.len(),
        delays,
        repeat: decoder.repeat(),
        size: (decoder.width(), decoder.height()),
    }
}

fn small_frames(config: &mut PlotConfig) {
    config.animation.width = 320;
    config.animation.height = 240;
}

#[test]
fn errorbar_gif_has_one_frame_per_sweep_step() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let mut config = sweep_config(dir.path(), false);
    small_frames(&mut config);
    let reference = GaussianMixture::bimodal().unwrap();

    let rendered = render_animation(&config, &reference, AnimationStyle::ErrorBar).unwrap();
    assert_eq!(rendered.frames, 49);
    assert!(rendered.path.ends_with("sweep-errorbar.gif"));

    let decoded = decode_gif(&rendered.path);
    assert_eq!(decoded.frames, 49);
    assert_eq!(decoded.size, (320, 240));
    // 4 fps is a 250 ms delay, stored in hundredths of a second.
    assert!(decoded.delays.iter().all(|&d| d == 25), "{:?}", decoded.delays);
    assert_eq!(decoded.repeat, gif::Repeat::Infinite);
}

#[test]
fn histogram_gif_includes_end_when_asked() {
    if !fonts_available() {
        return;
    }
    let dir = tempfile::tempdir().unwrap();
    let mut config = sweep_config(dir.path(), true);
    small_frames(&mut config);
    config.animation.start = 400;
    let reference = GaussianMixture::bimodal().unwrap();

    let rendered = render_animation(&config, &reference, AnimationStyle::Histogram).unwrap();
    assert!(rendered.path.ends_with("sweep-histo.gif"));
    assert_eq!(rendered.frames, 11);
    assert_eq!(decode_gif(&rendered.path).frames, 11);
    assert_eq!(gif_files(&config.output_dir), vec!["sweep-histo.gif".to_string()]);
}
