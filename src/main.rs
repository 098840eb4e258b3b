//! goban-svg CLI
//!
//! Usage:
//!   goban-svg render [OPTIONS] [FILE]
//!   goban-svg sql [OPTIONS] <INPUT>
//!   goban-svg download <URL> <DEST> <COUNT> [START_INDEX] [EXTENSION]
//!
//! Set RUST_LOG (e.g. `RUST_LOG=goban_svg=debug`) or pass -v for diagnostics.

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use goban_svg::tools::{download_batch, generate_updates, sql::DEFAULT_TABLE, DownloadJob};
use goban_svg::{render_with_config, RenderConfig, RenderError, SvgConfig, Theme};

#[derive(Parser)]
#[command(name = "goban-svg")]
#[command(about = "Go board diagrams as SVG, plus batch data helpers")]
struct Cli {
    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a JSON board configuration to SVG
    Render {
        /// Board configuration (reads from stdin if not provided)
        input: Option<PathBuf>,

        /// Write the SVG here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Theme file for drawing constants and colours (TOML format)
        #[arg(short, long)]
        theme: Option<PathBuf>,

        /// Indent the SVG output
        #[arg(long)]
        pretty: bool,

        /// Prepend an XML declaration
        #[arg(long)]
        standalone: bool,

        /// Reject malformed intersections instead of drawing them off the grid
        #[arg(long)]
        strict: bool,
    },

    /// Generate an SQL update batch from a JSON array of records
    Sql {
        /// JSON records file
        input: PathBuf,

        /// Write the SQL here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Table to update
        #[arg(long, default_value = DEFAULT_TABLE)]
        table: String,
    },

    /// Download numbered images one after another
    Download {
        /// Base URL holding 1.EXT, 2.EXT, ...
        url: String,

        /// Destination directory (created if missing)
        dest: PathBuf,

        /// Number of images to fetch
        count: u32,

        /// Added to each image number when saving
        #[arg(default_value_t = 0, allow_negative_numbers = true)]
        start_index: i64,

        /// File extension of the images
        #[arg(default_value = "jpg")]
        extension: String,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Render {
            input,
            output,
            theme,
            pretty,
            standalone,
            strict,
        } => run_render(input, output, theme, pretty, standalone, strict),
        Command::Sql {
            input,
            output,
            table,
        } => run_sql(&input, output, &table),
        Command::Download {
            url,
            dest,
            count,
            start_index,
            extension,
        } => run_download(
            DownloadJob::new(url, dest, count)
                .with_start_index(start_index)
                .with_extension(extension),
        ),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_render(
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    theme: Option<PathBuf>,
    pretty: bool,
    standalone: bool,
    strict: bool,
) {
    // Load theme
    let theme = match &theme {
        Some(path) => match Theme::from_file(path) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("Error loading theme '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Theme::default(),
    };

    // Read input
    let (source, filename) = match &input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let config = RenderConfig::new()
        .with_theme(theme)
        .with_svg(
            SvgConfig::new()
                .with_pretty_print(pretty)
                .with_standalone(standalone),
        )
        .with_strict(strict);

    match render_with_config(&source, &config) {
        Ok(svg) => write_output(output.as_deref(), &svg),
        Err(RenderError::Config(errors)) => {
            for e in &errors {
                eprint!("{}", e.format(&source, &filename));
            }
            std::process::exit(1);
        }
    }
}

fn run_sql(input: &Path, output: Option<PathBuf>, table: &str) {
    let source = match fs::read_to_string(input) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input.display(), e);
            std::process::exit(1);
        }
    };

    match generate_updates(&source, table) {
        Ok(sql) => write_output(output.as_deref(), &sql),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn run_download(job: DownloadJob) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            std::process::exit(1);
        }
    };

    let client = reqwest::Client::new();
    match runtime.block_on(download_batch(&client, &job)) {
        Ok(paths) => {
            tracing::info!(count = paths.len(), dest = %job.dest.display(), "download finished");
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Write to `path`, or print to stdout followed by a newline
fn write_output(path: Option<&Path>, content: &str) {
    let result = match path {
        Some(path) => fs::write(path, content),
        None => writeln!(io::stdout().lock(), "{}", content),
    };
    if let Err(e) = result {
        eprintln!("Error writing output: {}", e);
        std::process::exit(1);
    }
}
