use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, ValueHint};

fn config_arg() -> Arg {
    Arg::new("config")
        .help("Path to a JSON plot configuration. Defaults are used when omitted.")
        .required(false)
        .value_parser(clap::value_parser!(PathBuf))
        .value_hint(ValueHint::FilePath)
}

fn override_args() -> [Arg; 3] {
    [
        Arg::new("experiment_dir")
            .short('d')
            .long("experiment_dir")
            .value_parser(clap::value_parser!(PathBuf))
            .help(
                "Directory holding the checkpoint and divergence files. \
                 Overrides the experiment directory in the configuration file.",
            )
            .value_hint(ValueHint::DirPath),
        Arg::new("name")
            .short('n')
            .long("name")
            .value_parser(clap::builder::NonEmptyStringValueParser::new())
            .help(
                "Experiment name used to build file names. \
                 Overrides the experiment name in the configuration file.",
            )
            .value_hint(ValueHint::Other),
        Arg::new("output_dir")
            .short('o')
            .long("output_dir")
            .value_parser(clap::value_parser!(PathBuf))
            .help("Directory the figures are written to. Overrides the configuration file.")
            .value_hint(ValueHint::DirPath),
    ]
}

/// The full `flipviz` command tree.
pub fn build_cli() -> Command {
    Command::new("flipviz")
        .version(clap::crate_version!())
        .about("Figures and animations for flip-bench density experiments")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("render")
                .about("Render the static figure and both animations")
                .arg(config_arg())
                .args(override_args())
                .arg(
                    Arg::new("no_animations")
                        .long("no-animations")
                        .help("Skip the two GIF animations.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("no_static")
                        .long("no-static")
                        .help("Skip the static multi-panel figure.")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help("Also write an interactive HTML report.")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("figure")
                .about("Render only the static multi-panel figure")
                .arg(config_arg())
                .args(override_args()),
        )
        .subcommand(
            Command::new("animate")
                .about("Render only the error-bar and histogram animations")
                .arg(config_arg())
                .args(override_args()),
        )
        .subcommand(
            Command::new("report")
                .about("Write only the interactive HTML report")
                .arg(config_arg())
                .args(override_args()),
        )
        .subcommand(Command::new("template").about("Print the default configuration as JSON"))
        .subcommand(
            Command::new("markers")
                .about("Print the update counts marked as rearrangements")
                .arg(config_arg()),
        )
        .help_template(
            "{usage-heading} {usage}\n\n\
             {about-with-newline}\n\
             Version {version}\n\n\
             {all-args}{after-help}",
        )
}
