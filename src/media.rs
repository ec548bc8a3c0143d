//! Media classification by file extension

/// Kind of media a file holds, as far as the picker cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// MIME wildcard handed to the viewer side of a launch
    pub fn mime(&self) -> &'static str {
        match self {
            MediaKind::Image => "image/*",
            MediaKind::Video => "video/*",
        }
    }
}

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "bmp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mkv", "avi", "mov", "flv"];

/// Classifies a file name as image, video, or neither.
///
/// Matching is case-insensitive on the extension only; names without an
/// extension are never media.
pub fn classify(name: &str) -> Option<MediaKind> {
    let ext = name.rsplit_once('.')?.1.to_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaKind::Video)
    } else {
        None
    }
}
