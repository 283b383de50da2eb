//! sheetmd CLI - convert spreadsheet sheets to Markdown tables
//!
//! ```text
//! sheetmd sheets book.xlsx
//! sheetmd convert book.xlsx                    # writes book.md next to the input
//! sheetmd convert book.xlsx --sheet 売上 --sheet 在庫 -o out.md
//! sheetmd convert book.xlsx --index 0 --stdout
//! ```

use clap::{Parser, Subcommand};
use log::{info, warn};
use sheetmd::{default_output_path, ConverterBuilder, DateFormat, SheetMdError, SheetSelector};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

/// Spreadsheet sheets to GitHub-flavored Markdown tables
#[derive(Parser)]
#[command(name = "sheetmd", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheet names of a workbook
    Sheets {
        /// Input workbook (xlsx, xlsm, xlsb, xls, ods)
        input: PathBuf,
    },

    /// Convert selected sheets to Markdown
    Convert {
        /// Input workbook (xlsx, xlsm, xlsb, xls, ods)
        input: PathBuf,

        /// Output file path (default: <input stem>.md next to the input)
        #[arg(short, long, conflicts_with = "stdout")]
        output: Option<PathBuf>,

        /// Write Markdown to stdout
        #[arg(long)]
        stdout: bool,

        /// Sheet name to convert (repeatable, keeps the given order)
        #[arg(long = "sheet", value_name = "NAME", conflicts_with = "indices")]
        sheets: Vec<String>,

        /// 0-based sheet index to convert (repeatable)
        #[arg(long = "index", value_name = "N")]
        indices: Vec<usize>,

        /// chrono format string for date cells (default: ISO 8601)
        #[arg(long, value_name = "FMT")]
        date_format: Option<String>,

        /// Write cell text verbatim instead of escaping `|` and line breaks
        #[arg(long)]
        no_escape: bool,

        /// Convert sheets one after another instead of in parallel
        #[arg(long)]
        sequential: bool,

        /// Print a JSON summary of per-sheet results to stderr
        #[arg(long)]
        summary: bool,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Sheets { input } => list_sheets(&input),
        Commands::Convert {
            input,
            output,
            stdout,
            sheets,
            indices,
            date_format,
            no_escape,
            sequential,
            summary,
        } => {
            let selector = if !sheets.is_empty() {
                SheetSelector::Names(sheets)
            } else if !indices.is_empty() {
                SheetSelector::Indices(indices)
            } else {
                SheetSelector::All
            };
            let options = ConvertOptions {
                selector,
                date_format: date_format.map_or(DateFormat::Iso8601, DateFormat::Custom),
                escape: !no_escape,
                parallel: !sequential,
                summary,
            };
            let target = if stdout {
                None
            } else {
                Some(output.unwrap_or_else(|| default_output_path(&input)))
            };
            convert(&input, target, options)
        }
    };

    if let Err(e) = result {
        handle_error(e);
        process::exit(1);
    }
}

struct ConvertOptions {
    selector: SheetSelector,
    date_format: DateFormat,
    escape: bool,
    parallel: bool,
    summary: bool,
}

fn list_sheets(input: &Path) -> Result<(), SheetMdError> {
    let converter = ConverterBuilder::new().build()?;
    let names = converter.list_sheets(File::open(input)?)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for name in names {
        writeln!(handle, "{}", name)?;
    }
    Ok(())
}

fn convert(
    input: &Path,
    target: Option<PathBuf>,
    options: ConvertOptions,
) -> Result<(), SheetMdError> {
    let converter = ConverterBuilder::new()
        .with_sheet_selector(options.selector)
        .with_date_format(options.date_format)
        .escape_cells(options.escape)
        .parallel(options.parallel)
        .build()?;

    let result = converter.convert_file(input)?;

    for sheet in result.failed_sheets() {
        warn!("sheet '{}' was written as an error fragment", sheet.name);
    }

    if options.summary {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| SheetMdError::Config(format!("JSON serialization error: {}", e)))?;
        eprintln!("{}", json);
    }

    match target {
        Some(path) => {
            std::fs::write(&path, result.markdown.as_bytes())?;
            info!("wrote {} sheets to {}", result.sheets.len(), path.display());
            println!("Conversion completed: {} -> {}", input.display(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle.write_all(result.markdown.as_bytes())?;
            handle.flush()?;
        }
    }

    Ok(())
}

fn handle_error(error: SheetMdError) {
    match error {
        SheetMdError::Io(io_err) => {
            eprintln!("I/O Error: {}", io_err);
            eprintln!("Please check that the file exists and you have permission to access it.");
        }
        SheetMdError::Parse(parse_err) => {
            eprintln!("Parse Error: {}", parse_err);
            eprintln!("The file may not be a supported spreadsheet, or it may be corrupted or locked.");
        }
        SheetMdError::SheetRead { sheet, reason } => {
            eprintln!("Sheet Error: '{}': {}", sheet, reason);
        }
        SheetMdError::Config(msg) => {
            eprintln!("Configuration Error: {}", msg);
            eprintln!("Please check your sheet selection and date format.");
        }
        SheetMdError::NoSheetsSelected => {
            eprintln!("No sheets selected: select at least one sheet.");
        }
        SheetMdError::SecurityViolation(msg) => {
            eprintln!("Security Violation: {}", msg);
        }
    }
}
