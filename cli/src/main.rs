//! pdftext CLI - extract text from a PDF and its embedded PDF attachments.

use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;

use pdftext::{ExtractionConfig, Extractor, OutputMode, OutputSink, PdfDocument};

#[derive(Parser)]
#[command(name = "pdftext")]
#[command(version)]
#[command(about = "Extract text from a PDF document and its embedded PDFs", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Output file (derived from the input name if omitted)
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    /// Password to decrypt the document
    #[arg(long, value_name = "PASSWORD")]
    password: Option<String>,

    /// Output encoding (UTF-8, ISO-8859-1, UTF-16BE, UTF-16LE, ...)
    #[arg(long, value_name = "ENCODING", default_value = "UTF-8")]
    encoding: String,

    /// Send text to the console instead of a file
    #[arg(long)]
    console: bool,

    /// Output in HTML format instead of raw text
    #[arg(long)]
    html: bool,

    /// Sort the text by position before writing
    #[arg(long)]
    sort: bool,

    /// Disable the separation by article beads
    #[arg(long = "ignore-beads")]
    ignore_beads: bool,

    /// Enable debug output about the time consumption of every stage
    #[arg(long)]
    debug: bool,

    /// The first page to extract (1-based)
    #[arg(long = "start-page", value_name = "N", default_value = "1")]
    start_page: String,

    /// The last page to extract (inclusive)
    #[arg(long = "end-page", value_name = "N")]
    end_page: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    // --debug raises the log level; timings in the library go through
    // the log facade rather than a global flag
    env_logger::Builder::from_default_env()
        .filter_level(if cli.debug {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mode = if cli.html {
        OutputMode::Html
    } else {
        OutputMode::Text
    };

    let config = ExtractionConfig::new()
        .with_encoding(&cli.encoding)
        .with_sort_by_position(cli.sort)
        .with_separate_beads(!cli.ignore_beads)
        .with_mode(mode)
        .with_page_bounds_from_str(Some(&cli.start_page), cli.end_page.as_deref())?;

    let config = match &cli.password {
        Some(pw) => config.with_password(pw),
        None => config,
    };

    log::debug!("loading PDF {}", cli.input.display());
    let doc = PdfDocument::load(&cli.input, config.password.as_deref())?;

    let mut sink = if cli.console {
        OutputSink::console(&config.encoding)?
    } else {
        let output = match &cli.output {
            Some(path) => path.clone(),
            None => default_output_path(&cli.input, mode),
        };
        log::debug!("writing to {}", output.display());
        OutputSink::file(&output, &config.encoding)?
    };

    let extractor = Extractor::new(config);
    extractor.run(&doc, &mut sink)?;
    sink.flush()?;

    Ok(())
}

/// Default output path: input name with its last 4 characters removed,
/// plus `.txt` or `.html` depending on the output mode.
fn default_output_path(input: &Path, mode: OutputMode) -> PathBuf {
    let name = input.to_string_lossy();
    // Strip only when more than 4 characters remain before the suffix
    let stem = match name.char_indices().rev().nth(3) {
        Some((idx, _)) if idx > 0 => &name[..idx],
        _ => name.as_ref(),
    };
    PathBuf::from(format!("{}{}", stem, mode.extension()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_path_strips_suffix() {
        let path = default_output_path(&PathBuf::from("report.pdf"), OutputMode::Text);
        assert_eq!(path, PathBuf::from("report.txt"));

        let path = default_output_path(&PathBuf::from("report.pdf"), OutputMode::Html);
        assert_eq!(path, PathBuf::from("report.html"));
    }

    #[test]
    fn test_default_output_path_short_name() {
        let path = default_output_path(&PathBuf::from("a.p"), OutputMode::Text);
        assert_eq!(path, PathBuf::from("a.p.txt"));
    }
}
