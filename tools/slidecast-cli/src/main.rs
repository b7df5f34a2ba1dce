//! Slidecast CLI: turn a presentation and a background track into a video.
//!
//! Usage:
//!   slidecast convert <DECK> --audio <BGM>   Convert a deck to TEMP/output.mp4
//!   slidecast save <DEST>                     Copy the last video to DEST
//!   slidecast settings show|set|reset         Manage saved parameters
//!   slidecast log [--follow]                  Show the encoder log
//!   slidecast transcript <DECK>               Extract slide text only
//!   slidecast edit-text                       Open the transcript in an editor
//!   slidecast check                           Check external tools

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use slidecast_common::config::AppConfig;
use slidecast_project_model::params::{
    parse_secs, parse_volume, ParameterOverrides, QualityTier, Resolution, TransitionEffect,
};
use slidecast_project_model::settings::SettingsStore;

mod commands;

#[derive(Parser)]
#[command(
    name = "slidecast",
    about = "Convert presentations into slide videos with background music",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Settings file (defaults to the configured settings path)
    #[arg(long, global = true, value_name = "PATH")]
    settings: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a presentation into a video
    Convert {
        /// Presentation file (.pptx, .ppt, .odp)
        deck: PathBuf,

        /// Background music
        #[arg(short, long)]
        audio: PathBuf,

        #[command(flatten)]
        params: ParamArgs,
    },

    /// Show, change, or reset the saved parameters
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },

    /// Print the encoder log of the last run
    Log {
        /// Keep printing new output as it is written
        #[arg(short, long)]
        follow: bool,
    },

    /// Save the last converted video
    Save {
        /// Destination file; `.mp4` is added when it has no extension
        dest: PathBuf,
    },

    /// Extract the slide text of a presentation
    Transcript {
        /// Presentation file (.pptx)
        deck: PathBuf,

        /// Output file (defaults to the configured transcript path)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Open the transcript in the system's default editor
    EditText,

    /// Check that the external tools are available
    Check,
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the saved parameters
    Show,

    /// Change and save parameters
    Set {
        #[command(flatten)]
        params: ParamArgs,
    },

    /// Restore and save the defaults
    Reset,
}

/// Parameter overrides shared by `convert` and `settings set`.
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Seconds each slide is shown (the last slide always shows for 1s)
    #[arg(long, value_name = "SECS", value_parser = secs_arg)]
    slide_duration: Option<f64>,

    /// Transition length in seconds
    #[arg(long, value_name = "SECS", value_parser = secs_arg)]
    transition_duration: Option<f64>,

    /// Encoding quality: low, medium, high
    #[arg(long)]
    quality: Option<QualityTier>,

    /// Background music volume factor
    #[arg(long, value_name = "FACTOR", value_parser = volume_arg)]
    volume: Option<f64>,

    /// Output size: auto, 1280x720, 1920x1080, 2560x1440, or any WIDTHxHEIGHT
    #[arg(long)]
    resolution: Option<Resolution>,

    /// Transition: none, fade, slideleft, slideright, slideup, slidedown, random
    #[arg(long)]
    transition: Option<TransitionEffect>,

    /// Write the slide text transcript before converting
    #[arg(long, value_name = "BOOL")]
    save_text: Option<bool>,

    /// Advance slides automatically (stored with the settings)
    #[arg(long, value_name = "BOOL")]
    auto_next: Option<bool>,
}

impl ParamArgs {
    fn overrides(&self) -> ParameterOverrides {
        ParameterOverrides {
            slide_duration_secs: self.slide_duration,
            transition_duration_secs: self.transition_duration,
            quality: self.quality,
            bgm_volume: self.volume,
            resolution: self.resolution,
            auto_next: self.auto_next,
            save_text: self.save_text,
            transition: self.transition,
        }
    }
}

fn secs_arg(raw: &str) -> Result<f64, String> {
    parse_secs("duration", raw).map_err(|e| e.to_string())
}

fn volume_arg(raw: &str) -> Result<f64, String> {
    parse_volume(raw).map_err(|e| e.to_string())
}

/// Shared state for every command.
pub struct Context {
    pub config: AppConfig,
    pub settings: SettingsStore,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load();

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    slidecast_common::logging::init_logging(&logging);

    let settings_path = cli
        .settings
        .clone()
        .unwrap_or_else(|| config.paths.settings_file.clone());
    let ctx = Context {
        settings: SettingsStore::new(settings_path),
        config,
    };

    match cli.command {
        Commands::Convert {
            deck,
            audio,
            params,
        } => commands::convert::run(&ctx, deck, audio, params.overrides()).await,
        Commands::Settings { action } => match action {
            SettingsAction::Show => commands::settings::show(&ctx),
            SettingsAction::Set { params } => commands::settings::set(&ctx, params.overrides()),
            SettingsAction::Reset => commands::settings::reset(&ctx),
        },
        Commands::Log { follow } => commands::log::run(&ctx, follow).await,
        Commands::Save { dest } => commands::save::run(&ctx, dest),
        Commands::Transcript { deck, output } => commands::transcript::run(&ctx, deck, output),
        Commands::EditText => commands::edit_text::run(&ctx),
        Commands::Check => commands::check::run(&ctx),
    }
}
