//! Clipboard input and output.
//!
//! The core never talks to a platform clipboard directly. Pasted data comes
//! in as [`ClipboardPayload`]s and copied PNGs go out through a
//! [`ClipboardSink`].

use thiserror::Error;

/// A clipboard write that the platform rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Clipboard write failed: {message}")]
pub struct ClipboardError {
    pub message: String,
}

impl ClipboardError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Destination for copied images.
pub trait ClipboardSink {
    /// Place PNG bytes on the clipboard.
    fn write_png(&mut self, png: &[u8]) -> Result<(), ClipboardError>;
}

/// One item of pasted data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipboardPayload {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ClipboardPayload {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Whether a MIME type may carry an image.
///
/// Some platforms deliver pasted files with no MIME type at all, so an
/// empty type is accepted and left to the decoder.
pub fn is_image_mime(mime_type: &str) -> bool {
    let mime = mime_type.trim();
    mime.is_empty()
        || mime
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
}

/// First non-empty payload that may hold an image.
pub fn pick_image_payload(payloads: &[ClipboardPayload]) -> Option<&ClipboardPayload> {
    payloads
        .iter()
        .find(|p| !p.bytes.is_empty() && is_image_mime(&p.mime_type))
}
