//! Smoothie Assistant - terminal front end for the smoothie chat widget
//!
//! This is the binary entry point. All logic lives in the library crates.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;

use smoothie_app::assets::copy_configured_images;
use smoothie_app::config::{init_config_dir, resolve_settings};
use smoothie_assistant::headless::layout_name;
use smoothie_assistant::{run_headless_chat, ChatOptions};
use smoothie_core::{classify, resolve_layout, ViewportMetrics};

/// Smoothie Assistant - chat with the smoothie recommender
#[derive(Parser, Debug)]
#[command(name = "smoothie")]
#[command(about = "Smoothie recommendation chat assistant", long_about = None)]
struct Args {
    /// Project directory holding .smoothie/config.toml
    #[arg(long, value_name = "PATH", global = true)]
    project: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Chat from the terminal
    Chat {
        /// Emit NDJSON events instead of text
        #[arg(long)]
        json: bool,

        /// Override the chat API base URL
        #[arg(long, value_name = "URL")]
        api_base: Option<String>,

        /// Use production image paths and error messages
        #[arg(long)]
        production: bool,
    },

    /// Copy menu images into the static asset directory
    CopyImages {
        /// Destination directory (default from config: public/images)
        #[arg(long, value_name = "DIR")]
        dest: Option<PathBuf>,

        /// Candidate source directory, tried in order (repeatable)
        #[arg(long = "source", value_name = "DIR")]
        sources: Vec<PathBuf>,
    },

    /// Show the device class and layout for a viewport
    Classify {
        #[arg(long)]
        width: f64,

        #[arg(long)]
        height: f64,

        /// Device pixel ratio
        #[arg(long)]
        dpr: Option<f64>,

        #[arg(long)]
        json: bool,
    },

    /// Write a default .smoothie/config.toml
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    if let Err(e) = smoothie_core::logging::init() {
        eprintln!("Logging disabled: {}", e);
    }

    let project_path = args
        .project
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    match args.command {
        Command::Chat {
            json,
            api_base,
            production,
        } => {
            run_headless_chat(ChatOptions {
                project_path,
                json,
                api_base,
                production,
            })
            .await?;
        }
        Command::CopyImages { dest, sources } => {
            let mut settings = resolve_settings(&project_path).assets;
            if let Some(dest) = dest {
                settings.dest = dest;
            }
            if !sources.is_empty() {
                settings.sources = sources;
            }

            let report = copy_configured_images(&project_path, &settings)?;
            match &report.source {
                Some(source) => eprintln!(
                    "Copied {} image(s) from {} to {}",
                    report.copied.len(),
                    source.display(),
                    report.dest.display()
                ),
                None => eprintln!("No menu image directory found; nothing copied"),
            }
        }
        Command::Classify {
            width,
            height,
            dpr,
            json,
        } => {
            let mut metrics = ViewportMetrics::new(width, height);
            if let Some(ratio) = dpr {
                metrics = metrics.with_pixel_ratio(ratio);
            }
            let device = classify(metrics);
            let layout = resolve_layout(&device);

            if json {
                let mut value = serde_json::to_value(device)?;
                value["layout"] = serde_json::Value::from(layout.name());
                println!("{}", value);
            } else {
                println!(
                    "{}x{} -> {} (layout: {}{})",
                    device.window_width,
                    device.window_height,
                    layout_name(device.class()),
                    layout.name(),
                    if device.is_landscape { ", landscape" } else { "" }
                );
            }
        }
        Command::Init => {
            init_config_dir(&project_path)?;
            eprintln!(
                "Config at {}",
                project_path.join(".smoothie/config.toml").display()
            );
        }
    }

    Ok(())
}
