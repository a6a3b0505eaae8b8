//! Platform defaults.

/// The user's download directory, used as the initial output directory.
///
/// `None` on platforms where no such directory is configured; the session
/// then starts without an output directory and compression is rejected
/// until one is set.
pub fn default_output_dir() -> Option<String> {
    dirs::download_dir().map(|path| path.to_string_lossy().into_owned())
}
