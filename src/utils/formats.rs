//! Input format recognition.
//!
//! The orchestrator only accepts raster images the engine knows how to
//! decode. Acceptance is decided by file extension alone; no file content
//! is inspected at intake time.

/// Extensions accepted for intake, lowercase.
pub const ALLOWED_INPUT_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "webp"];

/// Extracts the extension of `path`, without the dot.
///
/// Splits on both separator styles so Windows-style paths coming out of a
/// drop event are handled the same as Unix ones. Returns `None` when the
/// final component has no dot at all.
pub fn extension_of(path: &str) -> Option<&str> {
    let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
    file_name.rsplit_once('.').map(|(_, ext)| ext)
}

/// Checks whether `path` names a supported input image.
///
/// Matching is case-insensitive, so `photo.JPG` and `photo.jpg` are both
/// accepted.
pub fn is_supported_image(path: &str) -> bool {
    match extension_of(path) {
        Some(ext) => ALLOWED_INPUT_EXTENSIONS
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
        None => false,
    }
}
