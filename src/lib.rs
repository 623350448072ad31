//! # webpify
//!
//! Batch-convert JPEG/PNG images to WebP with bounded concurrency.
//!
//! ## Features
//!
//! - Recursive discovery of `.jpg`/`.jpeg`/`.png` files across mixed
//!   file/directory inputs
//! - Concurrency-limited conversion with per-file progress callbacks
//! - Three output policies: a `webp/` sibling subdirectory, in-place
//!   replacement, or a custom directory
//! - Optional deletion of originals after successful conversion
//! - Aggregate size and compression statistics per run
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::PathBuf;
//! use webpify::{AutoConfirm, ConvertSettings, Converter};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let settings = ConvertSettings::builder()
//!     .quality(0.8)
//!     .concurrent_limit(5)
//!     .build()
//!     .expect("valid settings");
//!
//! let stats = Converter::new(settings)
//!     .run(&[PathBuf::from("./photos")], &AutoConfirm::decline())
//!     .await;
//!
//! stats.print_summary();
//! # }
//! ```
//!
//! ## Architecture
//!
//! The library follows a pipeline architecture:
//! 1. **Scanner**: Expands input paths into a flat image-file list
//! 2. **Resolver**: Derives each output path from the output policy
//! 3. **Scheduler**: Runs conversions under the concurrency limit
//! 4. **Converter**: Aggregates per-file results into run statistics

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod codec;
mod convert;
mod error;
mod pipeline;
mod scanner;
mod scheduler;
mod settings;

pub mod resolve;

pub use codec::{ImageCodec, WebpCodec};
pub use convert::{convert_file, ConvertResult};
pub use error::{Error, Result};
pub use pipeline::{
    compression_ratio, format_size, AutoConfirm, ConvertStats, Converter, ReplaceConfirm,
};
pub use scanner::{scan, ImageFile};
pub use scheduler::{run_bounded, ProgressFn};
pub use settings::{ConvertSettings, OutputMode, SettingsBuilder};

use std::path::PathBuf;

/// Runs a complete conversion batch with the default codec.
///
/// This is the main entry point for the library. Destructive
/// [`OutputMode::Same`] runs are declined here; construct a [`Converter`]
/// and supply your own [`ReplaceConfirm`] to allow in-place replacement.
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use webpify::ConvertSettings;
///
/// # #[tokio::main]
/// # async fn main() {
/// let settings = ConvertSettings::builder().build().expect("valid settings");
/// let stats = webpify::run(&[PathBuf::from("./photos")], settings).await;
/// println!("converted {} files", stats.converted_count);
/// # }
/// ```
pub async fn run(inputs: &[PathBuf], settings: ConvertSettings) -> ConvertStats {
    Converter::new(settings)
        .run(inputs, &AutoConfirm::decline())
        .await
}
