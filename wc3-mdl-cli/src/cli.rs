//! Root CLI structure for wc3mdl

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "wc3mdl")]
#[command(about = "Command-line tools for Warcraft III MDL model files", long_about = None)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated for more detail)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Reject any FormatVersion other than 800 and any unknown chunk
    #[arg(long, global = true)]
    pub strict: bool,
}

/// Track kinds the optimizer can leave alone
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TrackKind {
    Translation,
    Rotation,
    Scaling,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Display information about an MDL model
    Info {
        /// Path to the MDL file
        file: PathBuf,

        /// Also list sequences, textures and nodes
        #[arg(short, long)]
        detailed: bool,
    },

    /// Validate one or more MDL models
    Validate {
        /// Files or glob patterns (e.g. "Units/**/*.mdl")
        #[arg(required = true)]
        patterns: Vec<String>,

        /// Show warnings as well as errors
        #[arg(short, long)]
        warnings: bool,
    },

    /// Decode and re-encode a model in canonical form
    Convert {
        /// Input MDL file
        input: PathBuf,

        /// Output MDL file
        output: PathBuf,

        /// Header comment written at the top of the output
        #[arg(short, long)]
        comment: Option<String>,

        /// Do not write a generation timestamp comment
        #[arg(long)]
        no_timestamp: bool,

        /// Write even if the model breaks animation or geometry invariants
        #[arg(long)]
        no_validate: bool,
    },

    /// Remove redundant keyframes from node and texture animations
    Optimize {
        /// Input MDL file
        input: PathBuf,

        /// Output MDL file
        output: PathBuf,

        /// Largest deviation a dropped key may introduce
        #[arg(short, long, default_value = "0.0001")]
        tolerance: f32,

        /// Track kinds to leave untouched
        #[arg(long, value_enum)]
        skip: Vec<TrackKind>,
    },

    /// Display the model structure as a tree
    Tree {
        /// Path to the MDL file
        file: PathBuf,

        /// Maximum depth to display
        #[arg(short, long, default_value = "5")]
        depth: usize,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Show metadata inline
        #[arg(long)]
        compact: bool,
    },

    /// Dump the decoded model as JSON
    #[cfg(feature = "serde")]
    Dump {
        /// Path to the MDL file
        file: PathBuf,

        /// Single-line JSON instead of pretty-printed
        #[arg(long)]
        compact: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
