use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use roborock_map::cli::orchestration::{
    run_parse_workflow, run_room_at_workflow, run_stamp_workflow, run_version_workflow,
    ParseWorkflowArgs, ReleaseWorkflowArgs,
};
use roborock_map::config::{self, Config};
use roborock_map::logging::{self, LoggingConfig};
use roborock_map::ui;

#[derive(Parser)]
#[command(
    name = "roborock-map",
    version,
    about = "Decode and render Roborock vacuum map snapshots"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, global = true, help = "Log level (trace, debug, info, warn, error)")]
    log_level: Option<String>,

    #[arg(long, global = true, help = "Emit logs as JSON lines")]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a map snapshot and print a summary
    Parse {
        file: PathBuf,

        #[arg(long, help = "Input is not gzip-compressed")]
        raw: bool,

        #[arg(long, value_name = "OUT.png", help = "Write the rendered floor image")]
        image: Option<PathBuf>,

        #[arg(long, help = "Print the decoded map as JSON")]
        json: bool,

        #[arg(long, help = "Override the configured image scale")]
        scale: Option<f64>,
    },

    /// Print the room number under a map coordinate
    RoomAt {
        file: PathBuf,

        #[arg(allow_negative_numbers = true)]
        x: f64,

        #[arg(allow_negative_numbers = true)]
        y: f64,

        #[arg(long, help = "Input is not gzip-compressed")]
        raw: bool,
    },

    /// Print the package version derived from a release tag
    ReleaseVersion {
        #[arg(help = "Release tag (defaults to the configured environment variable)")]
        tag: Option<String>,
    },

    /// Stamp the release version into a manifest file
    Stamp {
        tag: Option<String>,

        #[arg(long, help = "Manifest to update (defaults to release.manifest)")]
        manifest: Option<PathBuf>,

        #[arg(long, help = "Preview the change without writing")]
        dry_run: bool,
    },
}

fn init_logging(args: &Args) {
    let mut logging_config = LoggingConfig::from_env();
    if let Some(level) = args.log_level.as_deref() {
        match logging::parse_level(level) {
            Some(level) => logging_config.level = level,
            None => ui::display_error(&format!("Unknown log level '{}', using default", level)),
        }
    }
    if args.json_logs {
        logging_config.use_json = true;
    }
    logging::init_logging(logging_config);
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    if let Err(e) = run(args.command, &config) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
    Ok(())
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Parse {
            file,
            raw,
            image,
            json,
            scale,
        } => {
            let args = ParseWorkflowArgs {
                input: file,
                raw,
                image_out: image,
                scale,
            };
            let result = run_parse_workflow(&args, config)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&result.map)?);
            } else {
                ui::display_map_summary(&result.map);
            }
            if let Some(path) = result.image_written {
                ui::display_success(&format!("Wrote image to {}", path.display()));
            }
        }
        Command::RoomAt { file, x, y, raw } => {
            let args = ParseWorkflowArgs {
                input: file,
                raw,
                ..Default::default()
            };
            match run_room_at_workflow(&args, config, x, y)? {
                Some(room) => println!("{}", room),
                None => {
                    ui::display_error(&format!("No room at ({}, {})", x, y));
                    std::process::exit(2);
                }
            }
        }
        Command::ReleaseVersion { tag } => {
            let args = ReleaseWorkflowArgs {
                tag,
                ..Default::default()
            };
            let result = run_version_workflow(&args, config)?;
            if let Some(warning) = &result.warning {
                ui::display_release_warning(warning);
            }
            println!("{}", result.version);
        }
        Command::Stamp {
            tag,
            manifest,
            dry_run,
        } => {
            let args = ReleaseWorkflowArgs {
                tag,
                manifest,
                dry_run,
            };
            let (version, outcome) = run_stamp_workflow(&args, config)?;
            if let Some(warning) = &version.warning {
                ui::display_release_warning(warning);
            }

            let manifest = outcome.manifest.display();
            if dry_run {
                ui::display_status(&format!(
                    "Dry run: would set {} version {} -> {}",
                    manifest, outcome.previous, outcome.version
                ));
            } else if outcome.written {
                ui::display_success(&format!(
                    "Set {} version {} -> {}",
                    manifest, outcome.previous, outcome.version
                ));
            } else {
                ui::display_status(&format!(
                    "{} already at version {}",
                    manifest, outcome.version
                ));
            }
        }
    }
    Ok(())
}
