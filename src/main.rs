use anyhow::Context;
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use webpify::{AutoConfirm, ConvertSettings, Converter, OutputMode, ReplaceConfirm};

#[derive(Parser, Debug)]
#[command(
    name = "webpify",
    version,
    author,
    about = "Batch-convert JPEG/PNG images to WebP",
    long_about = "Batch-convert JPEG/PNG images to WebP with bounded concurrency.\n\n\
    Accepts any mix of image files and directories; directories are scanned \
    recursively for .jpg, .jpeg and .png files. Originals are deleted after a \
    successful conversion unless --keep-originals is given.\n\n\
    USAGE EXAMPLES:\n  \
      # Convert a directory into webp/ subdirectories\n  \
      webpify ./photos\n\n  \
      # Convert two files, keep the originals\n  \
      webpify a.jpg b.png --keep-originals\n\n  \
      # Collect everything into one directory, 8 conversions at a time\n  \
      webpify ./photos --mode custom --output-dir ./converted -j 8\n\n  \
      # Replace files in place without prompting\n  \
      webpify ./photos --mode same --yes"
)]
struct Cli {
    /// Image files or directories to convert
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// WebP quality factor (0.0-1.0)
    #[arg(short, long, default_value_t = 0.8)]
    quality: f32,

    /// Where converted files are written
    #[arg(short, long, value_enum, default_value = "webp")]
    mode: CliMode,

    /// Target directory for --mode custom (relative paths resolve against
    /// each input file's directory)
    #[arg(short, long, value_name = "PATH")]
    output_dir: Option<PathBuf>,

    /// Keep original files after successful conversion
    #[arg(short, long)]
    keep_originals: bool,

    /// Maximum number of simultaneous conversions
    #[arg(short = 'j', long, default_value_t = 5)]
    concurrency: usize,

    /// Answer yes to the in-place replacement prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliMode {
    /// webp/ subdirectory next to each input file
    Webp,
    /// Same directory as the input (in-place replacement)
    Same,
    /// The directory given by --output-dir
    Custom,
}

impl From<CliMode> for OutputMode {
    fn from(m: CliMode) -> Self {
        match m {
            CliMode::Webp => Self::Webp,
            CliMode::Same => Self::Same,
            CliMode::Custom => Self::Custom,
        }
    }
}

/// Interactive confirmation on stderr/stdin for in-place replacement.
struct StdinConfirm;

impl ReplaceConfirm for StdinConfirm {
    fn confirm_replace(&self, file_count: usize) -> bool {
        eprint!(
            "In-place mode will replace {file_count} files. This cannot be undone. Continue? [y/N] "
        );
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_tracing(cli.verbose)?;

    let mut builder = ConvertSettings::builder()
        .quality(cli.quality)
        .delete_original(!cli.keep_originals)
        .output_mode(cli.mode.into())
        .concurrent_limit(cli.concurrency);

    if let Some(dir) = cli.output_dir {
        builder = builder.custom_output_path(dir);
    }

    let settings = builder.build().context("Failed to build settings")?;
    let converter = Converter::new(settings);

    let stats = if cli.yes {
        converter.run(&cli.paths, &AutoConfirm::accept()).await
    } else {
        converter.run(&cli.paths, &StdinConfirm).await
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&stats).context("Failed to serialize summary")?
        );
    } else {
        stats.print_summary();
    }

    Ok(())
}

fn setup_tracing(verbosity: u8) -> anyhow::Result<()> {
    let filter = match verbosity {
        0 => EnvFilter::new("webpify=info"),
        1 => EnvFilter::new("webpify=debug"),
        _ => EnvFilter::new("webpify=trace"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(false))
        .init();

    Ok(())
}
