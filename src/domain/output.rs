//! Output location resolution

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::domain::codec::extension_for_codec;

/// Default base name inside the data directory
const DEFAULT_BASE_NAME: &str = "recording";

/// Default output base: `<data dir>/speech-recorder/recording`
pub fn default_output_base() -> PathBuf {
    output_base_in(dirs::data_dir(), dirs::home_dir())
}

/// Paths are never shell-expanded, so a missing data dir falls back to
/// `$HOME/.local/share`, then the working directory.
fn output_base_in(data_dir: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    data_dir
        .or_else(|| home.map(|h| h.join(".local").join("share")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join("speech-recorder")
        .join(DEFAULT_BASE_NAME)
}

/// Resolve where a recording is written.
///
/// The result is `base` with the codec's extension appended verbatim.
/// An empty `base` falls back to `fallback`.
pub fn resolve_output_path(base: &str, codec: &str, fallback: &Path) -> PathBuf {
    let mut path = if base.is_empty() {
        fallback.as_os_str().to_owned()
    } else {
        OsString::from(base)
    };
    path.push(extension_for_codec(codec));
    PathBuf::from(path)
}
