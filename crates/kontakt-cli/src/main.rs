mod commands;
mod output;
mod progress;

use clap::{Parser, Subcommand};
use kontakt_core::config::{DEFAULT_CROP_RATIO, DEFAULT_DPI, DEFAULT_INPUT_DIR, DEFAULT_OUTPUT_DIR};
use kontakt_core::ocr::tesseract::{DEFAULT_COMMAND, DEFAULT_LANGUAGES, DEFAULT_PSM};
use std::path::PathBuf;

const ALL_COLUMNS: &str = "Company,City,StreetNo,PostalCode,Name,Title,Email,Phone";

#[derive(Parser)]
#[command(
    name = "kontakt",
    version,
    about = "Extract contact tables from scanned PDFs using OCR"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// OCR every PDF in the input directory and write CSV + XLSX tables
    Run {
        /// Rotation angle in degrees (0, 90, 180 or 270)
        #[arg(long, default_value_t = 0, value_parser = parse_rotation)]
        rotate: u16,

        /// Right margin crop ratio (0-1)
        #[arg(long, default_value_t = DEFAULT_CROP_RATIO)]
        crop: f64,

        /// Comma-separated columns to extract (Page is always included)
        #[arg(long, default_value = ALL_COLUMNS)]
        columns: String,

        /// Directory containing the input PDFs
        #[arg(short, long, default_value = DEFAULT_INPUT_DIR)]
        input: PathBuf,

        /// Directory for the generated tables (created if missing)
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        output: PathBuf,

        /// Rendering resolution
        #[arg(long, default_value_t = DEFAULT_DPI)]
        dpi: u32,

        /// Path to the tesseract executable
        #[arg(long, env = "KONTAKT_TESSERACT", default_value = DEFAULT_COMMAND)]
        tesseract: PathBuf,

        /// Tesseract language hints
        #[arg(long, default_value = DEFAULT_LANGUAGES)]
        lang: String,

        /// Tesseract page segmentation mode
        #[arg(long, default_value_t = DEFAULT_PSM)]
        psm: u8,

        /// Hide the per-page progress bar
        #[arg(long)]
        quiet: bool,
    },
    /// Parse an existing OCR transcription (pages separated by form feeds)
    Parse {
        /// Path to a text file, or "-" for stdin
        input_file: PathBuf,

        /// Comma-separated columns to extract (Page is always included)
        #[arg(long, default_value = ALL_COLUMNS)]
        columns: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn parse_rotation(s: &str) -> Result<u16, String> {
    match s.parse::<u16>() {
        Ok(deg @ (0 | 90 | 180 | 270)) => Ok(deg),
        _ => Err(format!("'{s}' is not one of 0, 90, 180, 270")),
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            rotate,
            crop,
            columns,
            input,
            output,
            dpi,
            tesseract,
            lang,
            psm,
            quiet,
        } => commands::run::run(commands::run::RunArgs {
            rotate,
            crop,
            columns,
            input,
            output,
            dpi,
            tesseract,
            lang,
            psm,
            quiet,
        }),
        Commands::Parse {
            input_file,
            columns,
            output,
        } => commands::parse::run(input_file, &columns, &output),
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
