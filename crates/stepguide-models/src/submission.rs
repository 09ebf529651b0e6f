//! Video submission models.

use std::fmt;

use crate::guide::GuideId;

/// Content types accepted for uploaded videos.
pub const ALLOWED_VIDEO_MIME_TYPES: &[&str] = &[
    "video/mp4",
    "video/mpeg",
    "video/quicktime",
    "video/x-msvideo",
    "video/x-ms-wmv",
];

/// Filename extensions accepted for uploaded videos (matched case-insensitively).
pub const ALLOWED_VIDEO_EXTENSIONS: &[&str] = &[".mp4", ".avi", ".mov", ".wmv", ".mpeg"];

/// A video file received as a multipart part.
#[derive(Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl UploadedFile {
    pub fn new(bytes: Vec<u8>, content_type: Option<String>, filename: Option<String>) -> Self {
        Self {
            bytes,
            content_type,
            filename,
        }
    }

    /// Payload size in bytes.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the declared content type is on the video allow-list.
    pub fn has_allowed_mime_type(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| ALLOWED_VIDEO_MIME_TYPES.contains(&ct))
            .unwrap_or(false)
    }

    /// Whether the filename ends with an allowed video extension.
    pub fn has_allowed_extension(&self) -> bool {
        self.filename
            .as_deref()
            .map(|name| {
                let name = name.to_lowercase();
                ALLOWED_VIDEO_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
            })
            .unwrap_or(false)
    }

    /// Either check alone is enough.
    pub fn is_allowed_video(&self) -> bool {
        self.has_allowed_mime_type() || self.has_allowed_extension()
    }
}

// Keep payload bytes out of logs.
impl fmt::Debug for UploadedFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadedFile")
            .field("size", &self.bytes.len())
            .field("content_type", &self.content_type)
            .field("filename", &self.filename)
            .finish()
    }
}

/// Where the video for a submission comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// A file uploaded with the request
    FileUpload(UploadedFile),
    /// An explicit `file` form field sent as text rather than as a file part
    FileReference(String),
    /// A video hosted elsewhere
    RemoteUrl(String),
}

impl VideoSource {
    pub fn kind(&self) -> &'static str {
        match self {
            VideoSource::FileUpload(_) => "file_upload",
            VideoSource::FileReference(_) => "file_reference",
            VideoSource::RemoteUrl(_) => "remote_url",
        }
    }

    /// True for both upload-mode variants.
    pub fn is_upload(&self) -> bool {
        matches!(self, VideoSource::FileUpload(_) | VideoSource::FileReference(_))
    }
}

/// A validated request to build a guide from a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionRequest {
    pub guide_id: GuideId,
    pub callback_url: String,
    pub video_source: VideoSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(content_type: Option<&str>, filename: Option<&str>) -> UploadedFile {
        UploadedFile::new(
            vec![0u8; 16],
            content_type.map(str::to_string),
            filename.map(str::to_string),
        )
    }

    #[test]
    fn test_mime_type_alone_is_enough() {
        let file = upload(Some("video/quicktime"), Some("clip.bin"));
        assert!(file.has_allowed_mime_type());
        assert!(!file.has_allowed_extension());
        assert!(file.is_allowed_video());
    }

    #[test]
    fn test_extension_alone_is_enough() {
        let file = upload(Some("application/octet-stream"), Some("Holiday.MOV"));
        assert!(!file.has_allowed_mime_type());
        assert!(file.is_allowed_video());
    }

    #[test]
    fn test_neither_check_passes() {
        assert!(!upload(Some("image/png"), Some("photo.png")).is_allowed_video());
        assert!(!upload(None, None).is_allowed_video());
        assert!(!upload(Some("video/webm"), Some("clip.webm")).is_allowed_video());
    }

    #[test]
    fn test_debug_hides_payload() {
        let rendered = format!("{:?}", upload(Some("video/mp4"), Some("a.mp4")));
        assert!(rendered.contains("size: 16"));
        assert!(!rendered.contains("[0, 0"));
    }

    #[test]
    fn test_source_kind() {
        assert_eq!(VideoSource::RemoteUrl("http://x".into()).kind(), "remote_url");
        assert!(VideoSource::FileReference("a.mp4".into()).is_upload());
        assert!(!VideoSource::RemoteUrl("http://x".into()).is_upload());
    }
}
