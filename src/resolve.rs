//! Output-path resolution: pure policy mapping an input image path to its
//! `.webp` destination under the configured [`OutputMode`].

use crate::settings::{ConvertSettings, OutputMode};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Lower-cased extensions accepted as conversion input.
static SUPPORTED_EXTENSIONS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["jpg", "jpeg", "png"].into_iter().collect());

/// Name of the sibling subdirectory used by [`OutputMode::Webp`].
const WEBP_SUBDIR: &str = "webp";

/// Output file extension, always `webp`.
const WEBP_EXTENSION: &str = "webp";

/// Returns true if the path has a supported image extension
/// (case-insensitive).
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()))
}

/// Derives the output path for `input` under the settings' output policy.
///
/// Pure function: no filesystem access, always produces a valid path.
///
/// - [`OutputMode::Same`]: same directory, extension swapped to `.webp`.
/// - [`OutputMode::Webp`]: `<dir>/webp/<stem>.webp`.
/// - [`OutputMode::Custom`]: `<custom>/<stem>.webp` where a relative custom
///   path is resolved against the input's directory; an empty custom path
///   falls back to the `webp` subdirectory behaviour.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use webpify::{resolve::output_path, ConvertSettings};
///
/// let settings = ConvertSettings::default();
/// let out = output_path(Path::new("/photos/cat.jpg"), &settings);
/// assert_eq!(out, Path::new("/photos/webp/cat.webp"));
/// ```
#[must_use]
pub fn output_path(input: &Path, settings: &ConvertSettings) -> PathBuf {
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let file_name = format!("{stem}.{WEBP_EXTENSION}");

    match settings.output_mode {
        OutputMode::Same => dir.join(file_name),
        OutputMode::Custom if !settings.custom_output_path.as_os_str().is_empty() => {
            let custom = &settings.custom_output_path;
            if custom.is_absolute() {
                custom.join(file_name)
            } else {
                dir.join(custom).join(file_name)
            }
        }
        // Custom with an empty path degrades to the webp subdirectory.
        OutputMode::Webp | OutputMode::Custom => dir.join(WEBP_SUBDIR).join(file_name),
    }
}
