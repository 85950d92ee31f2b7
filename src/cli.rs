use clap::{Parser, Subcommand};
use std::path::PathBuf;
use streamforge::manifest::Format;

#[derive(Parser)]
#[command(name = "streamforge")]
#[command(author, version, about = "HLS and DASH manifest parser")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a manifest file and display its contents
    Parse {
        /// Manifest file to parse
        #[arg(required = true)]
        file: PathBuf,

        /// Manifest format
        #[arg(long, value_enum, default_value_t = Format::Auto)]
        format: Format,

        /// Base URL for relative URIs (defaults to the file's URL)
        #[arg(long)]
        base_url: Option<String>,

        /// Feed the parser in chunks of this many bytes
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        chunk_size: Option<u64>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
