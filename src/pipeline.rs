use crate::{
    codec::{ImageCodec, WebpCodec},
    convert::{self, ConvertResult},
    resolve,
    scanner,
    scheduler::{self, ProgressFn},
    settings::{ConvertSettings, OutputMode},
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument, warn};

/// Answers the destructive-replace question for [`OutputMode::Same`] runs.
///
/// The library never talks to a user directly; callers plug in whatever
/// confirmation surface they have (an interactive prompt, a `--yes` flag,
/// a test stub).
pub trait ReplaceConfirm {
    /// Returns true if the caller accepts replacing `file_count` files
    /// in place.
    fn confirm_replace(&self, file_count: usize) -> bool;
}

/// Fixed confirmation answer, for non-interactive callers and tests.
#[derive(Debug, Clone, Copy)]
pub struct AutoConfirm(bool);

impl AutoConfirm {
    /// Always accepts the replacement.
    #[must_use]
    pub const fn accept() -> Self {
        Self(true)
    }

    /// Always declines the replacement.
    #[must_use]
    pub const fn decline() -> Self {
        Self(false)
    }
}

impl ReplaceConfirm for AutoConfirm {
    fn confirm_replace(&self, _file_count: usize) -> bool {
        self.0
    }
}

/// Aggregate statistics for one conversion run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConvertStats {
    /// Number of image files in the batch
    pub total_files: usize,

    /// Number of files successfully converted
    pub converted_count: usize,

    /// Number of originals deleted after conversion
    pub deleted_count: usize,

    /// Combined input size of successful conversions, in bytes
    pub total_original_size: u64,

    /// Combined output size of successful conversions, in bytes
    pub total_compressed_size: u64,

    /// Wall-clock duration of the run in seconds
    pub duration_secs: f64,
}

impl ConvertStats {
    /// Number of files that failed to convert.
    #[must_use]
    pub const fn failed_count(&self) -> usize {
        self.total_files - self.converted_count
    }

    /// Percentage saved across all successful conversions.
    #[must_use]
    pub fn compression_ratio(&self) -> f64 {
        compression_ratio(self.total_original_size, self.total_compressed_size)
    }

    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\nConversion summary");
        println!("  Files found:      {}", self.total_files);
        println!("  Converted:        {}", self.converted_count);
        println!("  Failed:           {}", self.failed_count());
        println!("  Originals deleted: {}", self.deleted_count);
        println!(
            "  Size:             {} -> {} ({:.1}% saved)",
            format_size(self.total_original_size),
            format_size(self.total_compressed_size),
            self.compression_ratio()
        );
        println!("  Duration:         {:.2}s\n", self.duration_secs);
    }
}

/// Per-file outcome carried back from the scheduler.
struct FileOutcome {
    result: ConvertResult,
    deleted: bool,
}

/// Top-level driver for a batch conversion run.
///
/// Expands input paths into an image-file list, applies the destructive-mode
/// confirmation, dispatches conversions through the bounded scheduler, and
/// aggregates the per-file results into [`ConvertStats`].
pub struct Converter {
    settings: ConvertSettings,
    codec: Arc<dyn WebpCodec>,
    on_progress: Option<ProgressFn>,
}

impl Converter {
    /// Creates a converter using the default image codec.
    #[must_use]
    pub fn new(settings: ConvertSettings) -> Self {
        Self::with_codec(settings, Arc::new(ImageCodec))
    }

    /// Creates a converter with a caller-supplied codec.
    #[must_use]
    pub fn with_codec(settings: ConvertSettings, codec: Arc<dyn WebpCodec>) -> Self {
        Self {
            settings,
            codec,
            on_progress: None,
        }
    }

    /// Registers a progress callback fired after each file completes.
    #[must_use]
    pub fn on_progress(mut self, callback: ProgressFn) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Runs the batch over `inputs` (a mix of files and directories).
    ///
    /// Missing paths and unsupported files are silently excluded. An empty
    /// batch or a declined [`OutputMode::Same`] confirmation returns
    /// zero-valued stats without touching the filesystem. Per-file failures
    /// are recorded, logged and never abort the batch.
    #[instrument(skip_all, fields(inputs = inputs.len()))]
    pub async fn run(&self, inputs: &[PathBuf], confirm: &dyn ReplaceConfirm) -> ConvertStats {
        let start = Instant::now();

        let files = scanner::scan(inputs);
        if files.is_empty() {
            warn!("No supported image files found");
            return ConvertStats::default();
        }

        if self.settings.output_mode == OutputMode::Same
            && !confirm.confirm_replace(files.len())
        {
            info!("In-place replacement declined, nothing converted");
            return ConvertStats::default();
        }

        let total = files.len();
        info!(
            "Converting {} files (concurrency {}, mode {:?}, quality {}%)",
            total,
            self.settings.concurrent_limit,
            self.settings.output_mode,
            self.settings.quality_percent()
        );

        // Deletion of an original happens inside its task, right after that
        // file's conversion succeeds, so a long batch frees disk space as it
        // goes instead of at the end.
        let tasks: Vec<_> = files
            .iter()
            .enumerate()
            .map(|(i, file)| {
                let index = i + 1;
                let input = file.path.clone();
                let output = resolve::output_path(&input, &self.settings);
                let name = file.file_name();
                let codec = Arc::clone(&self.codec);
                let quality = self.settings.quality_percent();
                let delete = self.settings.deletes_originals();

                async move {
                    let result = convert::convert_file(codec, &input, &output, quality).await;
                    let mut deleted = false;

                    if result.success {
                        info!(
                            "[{}/{}] {} - {} -> {} ({:.1}% saved)",
                            index,
                            total,
                            name,
                            format_size(result.original_size),
                            format_size(result.compressed_size),
                            compression_ratio(result.original_size, result.compressed_size)
                        );

                        if delete {
                            match convert::delete_original(&input).await {
                                Ok(()) => deleted = true,
                                Err(e) => warn!("Could not delete {}: {}", input.display(), e),
                            }
                        }
                    } else {
                        warn!(
                            "[{}/{}] {} - failed: {}",
                            index,
                            total,
                            name,
                            result.error.as_deref().unwrap_or("unknown error")
                        );
                    }

                    FileOutcome { result, deleted }
                }
            })
            .collect();

        let outcomes =
            scheduler::run_bounded(tasks, self.settings.concurrent_limit, self.on_progress.clone())
                .await;

        let mut stats = ConvertStats {
            total_files: total,
            ..ConvertStats::default()
        };

        for outcome in &outcomes {
            if outcome.result.success {
                stats.converted_count += 1;
                stats.total_original_size += outcome.result.original_size;
                stats.total_compressed_size += outcome.result.compressed_size;
                if outcome.deleted {
                    stats.deleted_count += 1;
                }
            }
        }
        stats.duration_secs = start.elapsed().as_secs_f64();

        info!("Converted {}/{} files", stats.converted_count, total);
        if stats.failed_count() > 0 {
            warn!("{} files failed to convert", stats.failed_count());
        }
        if stats.deleted_count > 0 {
            info!("Deleted {} original files", stats.deleted_count);
        }
        if stats.converted_count > 0 {
            info!(
                "Total size {} -> {} ({:.1}% saved)",
                format_size(stats.total_original_size),
                format_size(stats.total_compressed_size),
                stats.compression_ratio()
            );
        }

        stats
    }
}

/// Formats a byte count as a short human-readable size (1 decimal place,
/// trailing `.0` trimmed).
#[must_use]
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    if bytes == 0 {
        return "0 B".to_string();
    }

    let exp = (bytes.ilog2() / 10).min(UNITS.len() as u32 - 1) as usize;
    let value = bytes as f64 / f64::powi(1024.0, exp as i32);
    let rounded = (value * 10.0).round() / 10.0;

    if rounded.fract() == 0.0 {
        format!("{} {}", rounded as u64, UNITS[exp])
    } else {
        format!("{rounded:.1} {}", UNITS[exp])
    }
}

/// Percentage saved by compression; 0 when the original size is 0.
#[must_use]
pub fn compression_ratio(original_size: u64, compressed_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    (1.0 - compressed_size as f64 / original_size as f64) * 100.0
}
