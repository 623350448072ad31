use crate::codec::WebpCodec;
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::trace;

/// Outcome of converting a single image.
///
/// Produced exactly once per input file. A failed conversion carries an
/// error message and zero sizes; it never aborts the surrounding batch.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertResult {
    /// Whether the conversion succeeded
    pub success: bool,

    /// Input file size in bytes (0 on failure)
    pub original_size: u64,

    /// Output file size in bytes (0 on failure)
    pub compressed_size: u64,

    /// Failure description, present iff `success` is false
    pub error: Option<String>,
}

impl ConvertResult {
    /// Creates a successful result with the measured sizes.
    #[must_use]
    pub const fn ok(original_size: u64, compressed_size: u64) -> Self {
        Self {
            success: true,
            original_size,
            compressed_size,
            error: None,
        }
    }

    /// Creates a failed result carrying the error message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            original_size: 0,
            compressed_size: 0,
            error: Some(message.into()),
        }
    }
}

/// Converts one image file to WebP.
///
/// Steps: stat the input, create the output directory if absent, decode and
/// re-encode through the codec, write the output, stat the result. Every
/// failure along the way is folded into a failed [`ConvertResult`]; this
/// function never propagates an error to the caller. The input file is never
/// modified or removed.
pub async fn convert_file(
    codec: Arc<dyn WebpCodec>,
    input: &Path,
    output: &Path,
    quality_percent: u8,
) -> ConvertResult {
    match try_convert(codec, input, output, quality_percent).await {
        Ok((original_size, compressed_size)) => ConvertResult::ok(original_size, compressed_size),
        Err(e) => ConvertResult::failed(e.to_string()),
    }
}

async fn try_convert(
    codec: Arc<dyn WebpCodec>,
    input: &Path,
    output: &Path,
    quality_percent: u8,
) -> Result<(u64, u64)> {
    trace!("Converting {} -> {}", input.display(), output.display());

    let original_size = fs::metadata(input)
        .await
        .map_err(|e| Error::io(input, e))?
        .len();

    if let Some(parent) = output.parent() {
        // create_dir_all is idempotent, so concurrent tasks targeting the
        // same output directory cannot trip over each other here.
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent.to_path_buf(), e))?;
    }

    let bytes = fs::read(input).await.map_err(|e| Error::io(input, e))?;

    let encoded = encode_blocking(codec, bytes, quality_percent).await?;

    fs::write(output, &encoded)
        .await
        .map_err(|e| Error::io(output, e))?;

    let compressed_size = fs::metadata(output)
        .await
        .map_err(|e| Error::io(output, e))?
        .len();

    Ok((original_size, compressed_size))
}

/// Runs the CPU-bound codec call off the async runtime.
async fn encode_blocking(
    codec: Arc<dyn WebpCodec>,
    bytes: Vec<u8>,
    quality_percent: u8,
) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || codec.encode(&bytes, quality_percent))
        .await
        .map_err(|e| Error::codec(format!("encode task failed: {e}")))?
}

/// Removes the original file after a successful conversion.
pub(crate) async fn delete_original(path: &Path) -> Result<()> {
    fs::remove_file(path).await.map_err(|e| Error::io(path, e))
}
