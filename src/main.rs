//! exifedit - lossless Exif metadata editor for JPEG files.
//!
//! This binary is a thin shell over the editor facade: it parses arguments,
//! initializes logging, and renders rows or errors for the terminal.

use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exifedit::config::{parse_set_args, Cli, Command};
use exifedit::{read_exif, remove_exif, write_exif, ExifRow};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Command::Show { file, json } => run_show(&file, json),
        Command::Edit { src, dest, set } => run_edit(&src, &dest, &set),
        Command::Strip { src, dest } => run_strip(&src, &dest),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}

// =============================================================================
// Show Command
// =============================================================================

fn run_show(file: &Path, json: bool) -> Result<(), String> {
    let rows = read_exif(file).map_err(|e| e.to_string())?;

    if json {
        let out = serde_json::to_string_pretty(&rows).map_err(|e| e.to_string())?;
        println!("{out}");
        return Ok(());
    }

    print_table(&rows);
    Ok(())
}

fn print_table(rows: &[ExifRow]) {
    let dir_width = rows
        .iter()
        .map(|r| r.directory.len())
        .chain(["DIRECTORY".len()].into_iter())
        .max()
        .unwrap_or(0);
    let tag_width = rows
        .iter()
        .map(|r| r.tag.len())
        .chain(["TAG".len()].into_iter())
        .max()
        .unwrap_or(0);

    println!(
        "{:>4}  {:<dir_width$}  {:<tag_width$}  VALUE",
        "ROW", "DIRECTORY", "TAG"
    );
    for (index, row) in rows.iter().enumerate() {
        println!(
            "{index:>4}  {:<dir_width$}  {:<tag_width$}  {}",
            row.directory, row.tag, row.value
        );
    }
}

// =============================================================================
// Edit Command
// =============================================================================

fn run_edit(src: &Path, dest: &Path, set: &[String]) -> Result<(), String> {
    let edits = parse_set_args(set)?;

    let rows = read_exif(src).map_err(|e| e.to_string())?;
    let mut values: Vec<String> = rows.iter().map(|r| r.value.clone()).collect();

    for (index, value) in edits {
        if index >= values.len() {
            return Err(format!(
                "row {index} out of range: the file has {} rows",
                values.len()
            ));
        }
        values[index] = value;
    }

    write_exif(src, dest, &values).map_err(|e| e.to_string())?;

    println!(
        "Wrote {} ({} of {} rows replaced)",
        dest.display(),
        set.len(),
        values.len()
    );
    Ok(())
}

// =============================================================================
// Strip Command
// =============================================================================

fn run_strip(src: &Path, dest: &Path) -> Result<(), String> {
    remove_exif(src, dest).map_err(|e| e.to_string())?;
    println!("Wrote {} without Exif metadata", dest.display());
    Ok(())
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "exifedit=debug"
    } else {
        "exifedit=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
