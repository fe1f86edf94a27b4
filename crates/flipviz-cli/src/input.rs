use std::path::PathBuf;

use anyhow::Result;
use clap::ArgMatches;

use flipviz::config::{load_plot_config, PlotConfig};
use flipviz::pipeline::Stages;

/// Load the configuration named on the command line, or the defaults when none is given.
pub fn load_config(matches: &ArgMatches) -> Result<PlotConfig> {
    match matches.get_one::<PathBuf>("config") {
        Some(config_path) => {
            log::info!("[FlipViz] Using config: {:?}", config_path);
            load_plot_config(config_path)
        }
        None => {
            let config = PlotConfig::default();
            let default_json = serde_json::to_string_pretty(&config).unwrap_or_default();
            eprintln!("[FlipViz] No config file provided; using defaults:\n{}", default_json);
            Ok(config)
        }
    }
}

/// Apply the `-d`, `-n` and `-o` overrides on top of `config`.
pub fn apply_overrides(config: &mut PlotConfig, matches: &ArgMatches) {
    if let Some(dir) = matches.get_one::<PathBuf>("experiment_dir") {
        config.experiment.dir = dir.clone();
    }
    if let Some(name) = matches.get_one::<String>("name") {
        config.experiment.name = name.clone();
    }
    if let Some(output_dir) = matches.get_one::<PathBuf>("output_dir") {
        config.output_dir = output_dir.clone();
    }
}

/// Configuration for a rendering subcommand, overrides applied and validated.
pub fn plot_config_from_arguments(matches: &ArgMatches) -> Result<PlotConfig> {
    let mut config = load_config(matches)?;
    apply_overrides(&mut config, matches);
    config.validate()?;
    Ok(config)
}

/// Which artifacts the given subcommand produces.
pub fn stages_for(subcommand: &str, matches: &ArgMatches) -> Stages {
    match subcommand {
        "figure" => Stages {
            figure: true,
            animations: false,
            report: false,
        },
        "animate" => Stages {
            figure: false,
            animations: true,
            report: false,
        },
        "report" => Stages {
            figure: false,
            animations: false,
            report: true,
        },
        _ => Stages {
            figure: !matches.get_flag("no_static"),
            animations: !matches.get_flag("no_animations"),
            report: matches.get_flag("report"),
        },
    }
}
