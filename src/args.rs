use std::{net::SocketAddr, path::PathBuf};

use clap::{Parser, Subcommand};

use crate::{config::RatingConfig, model::structures::processing_mode::ProcessingMode};

#[derive(Parser, Clone, Debug)]
#[command(
    display_name = "maimai DX Rating Processor",
    version,
    long_about = "Computes maimai DX player ratings from achievement records and renders rating charts"
)]
pub struct Args {
    /// Log filter: a level (`debug`) or `EnvFilter` directives
    /// (`info,dx_rating_processor=trace`)
    #[arg(short, long, env = "RUST_LOG", default_value = "info", help = "Sets the logging verbosity")]
    pub log_level: String,

    /// URL of the reference song table (JSON array of songs)
    #[arg(long, env = "DXR_REFERENCE_URL", global = true)]
    pub reference_url: Option<String>,

    /// Reads the reference song table from a local file. Takes precedence
    /// over `--reference-url`.
    #[arg(long, global = true)]
    pub reference_file: Option<PathBuf>,

    /// Fails the whole batch on the first record with an invalid sheet id
    #[arg(long, action = clap::ArgAction::SetTrue, global = true)]
    pub strict: bool,

    /// Charts released at or after this version count as recent
    #[arg(long, env = "DXR_VERSION_THRESHOLD", global = true)]
    pub version_threshold: Option<u32>,

    #[command(subcommand)]
    pub command: Command
}

#[derive(Subcommand, Clone, Debug)]
pub enum Command {
    /// Scores a records file and writes the two top lists as JSON
    Rate {
        /// JSON array of `{sheetId, achievementRate}` records
        input: PathBuf,

        /// Writes to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>
    },
    /// Scores a records file and renders the rating chart as SVG
    Render {
        input: PathBuf,

        #[arg(short, long, default_value = "rating.svg")]
        output: PathBuf,

        /// Skips fetching cover art
        #[arg(long, action = clap::ArgAction::SetTrue)]
        no_cover_art: bool
    },
    /// Runs the HTTP service
    Serve {
        #[arg(short, long, env = "DXR_BIND", default_value = "127.0.0.1:5730")]
        bind: SocketAddr
    }
}

impl Args {
    /// Command line flags take precedence over the environment.
    pub fn apply(&self, config: &mut RatingConfig) {
        if let Some(url) = &self.reference_url {
            config.reference_url = url.clone();
        }
        if let Some(threshold) = self.version_threshold {
            config.version_threshold = threshold;
        }
        if self.strict {
            config.mode = ProcessingMode::Strict;
        }
    }
}
