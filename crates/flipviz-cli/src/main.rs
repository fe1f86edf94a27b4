use anyhow::Result;
use clap::ArgMatches;
use log::LevelFilter;

use flipviz::config::PlotConfig;
use flipviz::pipeline;
use flipviz_cli::cli::build_cli;
use flipviz_cli::input::{load_config, plot_config_from_arguments, stages_for};

fn main() -> Result<()> {
    env_logger::Builder::default()
        .filter_level(LevelFilter::Error)
        .parse_env(env_logger::Env::default().filter_or("FLIPVIZ_LOG", "error,flipviz=info"))
        .init();

    let matches = build_cli().get_matches();

    match matches.subcommand() {
        Some(("template", _)) => {
            println!("{}", serde_json::to_string_pretty(&PlotConfig::default())?);
            Ok(())
        }
        Some(("markers", sub_m)) => print_markers(sub_m),
        Some((name, sub_m)) => handle_render(name, sub_m),
        None => unreachable!("Subcommand is required by CLI configuration"),
    }
}

fn print_markers(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let divergence = &config.divergence;
    match divergence
        .rearrangement
        .markers(divergence.count_min, divergence.count_max)
    {
        Ok(markers) => {
            let joined: Vec<String> = markers.iter().map(|m| m.to_string()).collect();
            println!("{}", joined.join(", "));
            Ok(())
        }
        Err(e) => {
            log::error!("Markers failed: {}", e);
            std::process::exit(1)
        }
    }
}

fn handle_render(subcommand: &str, matches: &ArgMatches) -> Result<()> {
    let config = match plot_config_from_arguments(matches) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration: {:#}", e);
            std::process::exit(1)
        }
    };
    let stages = stages_for(subcommand, matches);
    log::info!(
        "[FlipViz::{}] Experiment '{}' in {:?}, writing to {:?}",
        subcommand,
        config.experiment.name,
        config.experiment.dir,
        config.output_dir
    );

    match pipeline::run(&config, stages) {
        Ok(summary) => {
            for path in summary.written_paths() {
                println!("{}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            log::error!("Rendering failed: {:#}", e);
            std::process::exit(1)
        }
    }
}
