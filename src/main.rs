mod cli;

use streamforge::{config, manifest, summary};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use manifest::Format;
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "streamforge=debug,streamforge_common=trace,streamforge_hls=trace,streamforge_dash=trace"
                .to_string()
        } else {
            "streamforge=info,streamforge_common=warn,streamforge_hls=warn,streamforge_dash=warn"
                .to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse {
            file,
            format,
            base_url,
            chunk_size,
            json,
        } => parse_file(
            &file,
            cli.config.as_deref(),
            format,
            base_url.as_deref(),
            chunk_size,
            json,
        ),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("streamforge {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn parse_file(
    file: &Path,
    config_path: Option<&Path>,
    format: Format,
    base_url: Option<&str>,
    chunk_size: Option<u64>,
    json: bool,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    if !file.exists() {
        anyhow::bail!("Manifest file does not exist: {:?}", file);
    }
    let input =
        std::fs::read(file).with_context(|| format!("Failed to read manifest: {:?}", file))?;

    let format = format.detect(file, &input)?;
    let options = manifest::parse_options(&config, base_url, file)?;
    let chunk_size = match chunk_size {
        Some(size) => Some(usize::try_from(size).context("Chunk size does not fit in memory")?),
        None => config.parser.chunk_size,
    };

    tracing::info!(?format, base_url = %options.base_url, ?chunk_size, "Parsing {:?}", file);
    let report = manifest::parse(&input, format, &config.parser, &options, chunk_size)
        .with_context(|| format!("Failed to parse manifest: {:?}", file))?;

    if json {
        let json_str = serde_json::to_string_pretty(&report.manifest)?;
        println!("{}", json_str);
    } else {
        print!("{}", summary::render(&report));
    }

    Ok(())
}

fn validate_config(config_path: Option<&Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Configuration is valid");
    match &config.parser.base_url {
        Some(url) => println!("Base URL: {}", url),
        None => println!("Base URL: file location"),
    }
    println!("Ignored tags: {}", config.parser.ignore_tags.len());
    match config.parser.chunk_size {
        Some(size) => println!("Parsing: progressive, {} byte chunks", size),
        None => println!("Parsing: full"),
    }
    println!("Defines: {}", config.define.len());

    Ok(())
}
