//! Command-line interface for classmap.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::analyzer::Analyzer;
use crate::config::Config;
use crate::report::{self, Format};
use crate::scan::strip_comments;
use crate::source::{read_source, SourceLoader};

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FAILED: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Structural source analyzer.
///
/// Maps the declarations of a source tree, their members and documentation,
/// inferred member behavior, and the cross-file usage graph between types.
#[derive(Parser)]
#[command(name = "classmap")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze a source tree and export the model
    #[command(visible_alias = "analyze")]
    Scan(ScanArgs),
    /// Write a default configuration file
    Init(InitArgs),
    /// Print a source file with all comments removed
    Strip(StripArgs),
}

/// Arguments for the scan command.
#[derive(Parser)]
pub struct ScanArgs {
    /// Path to scan (file or directory)
    pub path: PathBuf,

    /// Path to config YAML file (default: auto-discover)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: Format,

    /// Write the JSON model to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Include a truncated body excerpt for every member
    #[arg(long)]
    pub snippets: bool,

    /// Scan and resolve on a single thread
    #[arg(long)]
    pub no_parallel: bool,

    /// Exit non-zero when any file was skipped
    #[arg(long)]
    pub strict: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "classmap.yaml")]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the strip command.
#[derive(Parser)]
pub struct StripArgs {
    /// Source file to strip
    pub file: PathBuf,
}

/// Run the scan command.
pub fn run_scan(args: &ScanArgs) -> anyhow::Result<i32> {
    let cwd = std::env::current_dir()?;
    let (mut config, config_path) = match Config::load(args.config.as_deref(), &cwd) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: invalid config: {:#}", e);
            return Ok(EXIT_ERROR);
        }
    };

    if args.snippets {
        config.snippets = true;
    }
    if args.no_parallel {
        config.parallel = false;
    }

    if let Err(e) = std::fs::metadata(&args.path) {
        eprintln!("Error: cannot access path {:?}: {}", args.path, e);
        return Ok(EXIT_ERROR);
    }

    let loaded = SourceLoader::new(&config)?.load(&args.path)?;
    if loaded.files.is_empty() {
        tracing::warn!(path = %args.path.display(), "no source files found");
    }

    let mut analysis = Analyzer::from_config(&config).analyze(&loaded.files);
    // Unreadable files come first: they were rejected before scanning.
    let mut warnings = loaded.warnings;
    warnings.append(&mut analysis.warnings);
    analysis.warnings = warnings;

    match args.format {
        Format::Json => report::write_json(&analysis.model, args.output.as_deref())?,
        Format::Pretty => {
            if let Some(output) = &args.output {
                report::write_json(&analysis.model, Some(output.as_path()))?;
            }
            let config_str = config_path.map(|p| p.to_string_lossy().to_string());
            report::write_pretty(
                &args.path.to_string_lossy(),
                config_str.as_deref(),
                &analysis,
            );
        }
    }

    if args.strict && !analysis.warnings.is_empty() {
        Ok(EXIT_FAILED)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() && !args.force {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Use --force to overwrite it or --output to pick another path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            if let Err(e) = std::fs::create_dir_all(parent) {
                eprintln!("Error: failed to create directory: {}", e);
                return Ok(EXIT_ERROR);
            }
        }
    }

    let content = format!("# classmap configuration\n{}", Config::default().to_yaml()?);
    if let Err(e) = std::fs::write(&args.output, content) {
        eprintln!("Error: failed to write config: {}", e);
        return Ok(EXIT_ERROR);
    }

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to customize for your project", args.output.display());
    println!("  2. Run: classmap scan . --config {}", args.output.display());

    Ok(EXIT_SUCCESS)
}

/// Run the strip command.
pub fn run_strip(args: &StripArgs) -> anyhow::Result<i32> {
    let text = match read_source(&args.file) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: {}: {}", args.file.display(), e);
            return Ok(EXIT_ERROR);
        }
    };

    let (stripped, removed) = strip_comments(&text);
    tracing::info!(file = %args.file.display(), comments = removed, "stripped comments");
    println!("{}", stripped);
    Ok(EXIT_SUCCESS)
}
