//! CLI configuration.
//!
//! Argument parsing for the `exifedit` binary. The library core consumes no
//! configuration at all; everything here exists for the command-line shell.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

// =============================================================================
// CLI Arguments
// =============================================================================

/// exifedit - lossless Exif metadata editor for JPEG files.
///
/// Reads, edits and strips the APP1/Exif segment of a JPEG without touching
/// image data: the compressed scan is copied byte for byte.
#[derive(Parser, Debug, Clone)]
#[command(name = "exifedit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the metadata rows of a JPEG file.
    Show {
        /// Source JPEG file.
        file: PathBuf,

        /// Emit rows as JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Copy a JPEG, replacing the values of selected ASCII rows.
    Edit {
        /// Source JPEG file.
        src: PathBuf,

        /// Destination file; must differ from the source.
        dest: PathBuf,

        /// Replacement in ROW=VALUE form, repeatable.
        ///
        /// ROW is the zero-based row index printed by `show`. Only ASCII
        /// rows take effect; other rows keep their original bytes.
        #[arg(long = "set", value_name = "ROW=VALUE")]
        set: Vec<String>,
    },

    /// Copy a JPEG with its Exif metadata removed.
    Strip {
        /// Source JPEG file.
        src: PathBuf,

        /// Destination file; must differ from the source.
        dest: PathBuf,
    },
}

// =============================================================================
// Argument Helpers
// =============================================================================

/// Parse `--set ROW=VALUE` arguments into (row index, value) pairs.
pub fn parse_set_args(args: &[String]) -> Result<Vec<(usize, String)>, String> {
    args.iter()
        .map(|arg| {
            let (row, value) = arg
                .split_once('=')
                .ok_or_else(|| format!("invalid --set '{arg}': expected ROW=VALUE"))?;
            let index = row
                .trim()
                .parse::<usize>()
                .map_err(|_| format!("invalid --set '{arg}': row must be a number"))?;
            Ok((index, value.to_string()))
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
