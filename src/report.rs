//! Output formatting for analysis results.
//!
//! Two formats:
//! - JSON: the model as a map from FQN to type record
//! - Pretty: colored terminal summary for humans

use anyhow::Context;
use colored::*;
use std::fs;
use std::io::Write;
use std::path::Path;

use crate::analyzer::Analysis;
use crate::assemble::{Model, ModelStats};
use crate::error::ScanWarning;

/// Output format accepted by `scan --format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    Json,
    Pretty,
}

// =============================================================================
// JSON Format
// =============================================================================

/// Serialize the model as pretty JSON.
pub fn render_json(model: &Model) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(model)?)
}

/// Write the model as JSON to `output`, or to stdout when `None`.
pub fn write_json(model: &Model, output: Option<&Path>) -> anyhow::Result<()> {
    let json = render_json(model)?;
    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("creating {}", parent.display()))?;
                }
            }
            fs::write(path, json + "\n").with_context(|| format!("writing {}", path.display()))?;
            tracing::info!(path = %path.display(), types = model.len(), "wrote model");
        }
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", json)?;
        }
    }
    Ok(())
}

// =============================================================================
// Pretty Format
// =============================================================================

/// Write a human-readable summary of the batch.
pub fn write_pretty(path: &str, config_path: Option<&str>, analysis: &Analysis) {
    println!();
    print!("  ");
    print!("{}", "classmap".cyan().bold());
    println!(" v{}", env!("CARGO_PKG_VERSION"));
    println!();

    print!("  {}", "Scanning: ".dimmed());
    println!("{}", path);
    print!("  {}", "Config:   ".dimmed());
    println!("{}", config_path.unwrap_or("(defaults)"));
    println!();

    write_stats(&analysis.model.stats(), analysis.files_scanned);
    println!();

    if !analysis.model.is_empty() {
        write_types(&analysis.model);
        println!();
    }

    if !analysis.warnings.is_empty() {
        write_warnings(&analysis.warnings);
        println!();
    }

    write_final_status(analysis);
    println!();
}

fn write_stats(stats: &ModelStats, files: usize) {
    println!("  {}", "Summary:".bold());
    println!("    {:<16} {:>5}", "files", files);
    println!("    {:<16} {:>5}", "types", stats.types);
    println!("    {:<16} {:>5}", "constructors", stats.constructors);
    println!("    {:<16} {:>5}", "methods", stats.methods);
    println!("    {:<16} {:>5}", "documented", stats.documented_members);
    println!("    {:<16} {:>5}", "usage edges", stats.edges);
}

fn write_types(model: &Model) {
    println!("  {} ({}):", "Types".bold(), model.len());
    println!();

    for (fqn, record) in &model.types {
        print!("    {:<10}", record.kind.as_str().dimmed());
        print!("{}", fqn.blue());
        println!("{}", format!(" {}:{}", record.file, record.line).dimmed());

        let members = record.constructors.len() + record.methods.len();
        let plural = if members != 1 { "s" } else { "" };
        print!("              {} member{}", members, plural);
        if !record.uses.is_empty() {
            print!(", uses {}", record.uses.len());
        }
        if !record.used_by.is_empty() {
            print!(", used by {}", record.used_by.len());
        }
        println!();
    }
}

fn write_warnings(warnings: &[ScanWarning]) {
    println!("  {} ({}):", "Warnings".bold(), warnings.len());
    println!();

    for w in warnings {
        print!("    {} ", "WARN ".yellow());
        println!("{}", w.path.blue());
        println!("            {}", w.error);
    }
}

fn write_final_status(analysis: &Analysis) {
    let skipped = analysis.warnings.len();
    if skipped == 0 {
        print!("  {}", "✓ OK".green());
    } else {
        print!("  {}", "! OK WITH WARNINGS".yellow());
    }
    print!(
        "  {}",
        format!(
            "{} types from {} files",
            analysis.model.len(),
            analysis.files_scanned
        )
        .dimmed()
    );
    println!();
}
