//! Document payloads accepted for submission

use std::path::Path;

use crate::error::{Error, Result};

/// Media types the review service accepts
pub const ACCEPTED_MEDIA_TYPES: [&str; 2] = [
    "application/pdf",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Submission size limit in bytes (5 MiB, matching the service)
pub const MAX_UPLOAD_SIZE: u64 = 5 * 1024 * 1024;

/// A document ready for submission: bytes plus declared identity.
///
/// Construction validates the declared media type and size, so every payload
/// the client sees is one the service could accept.
#[derive(Debug, Clone)]
pub struct DocumentPayload {
    filename: String,
    media_type: String,
    bytes: Vec<u8>,
}

impl DocumentPayload {
    /// Validate and build a payload from raw parts.
    pub fn new(
        filename: impl Into<String>,
        media_type: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Result<Self> {
        let media_type = media_type.into();
        if !ACCEPTED_MEDIA_TYPES.contains(&media_type.as_str()) {
            return Err(Error::UnsupportedMediaType(media_type));
        }
        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_SIZE {
            return Err(Error::FileTooLarge {
                size,
                limit: MAX_UPLOAD_SIZE,
            });
        }
        Ok(Self {
            filename: filename.into(),
            media_type,
            bytes,
        })
    }

    /// Read a file from disk, inferring the media type from its extension.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("document")
            .to_string();
        let media_type = mime_guess::from_path(path)
            .first_raw()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = std::fs::read(path)?;
        Self::new(filename, media_type, bytes)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub(crate) fn into_parts(self) -> (String, String, Vec<u8>) {
        (self.filename, self.media_type, self.bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn accepts_pdf_within_limit() {
        let payload =
            DocumentPayload::new("contract.pdf", "application/pdf", vec![0u8; 1024]).unwrap();
        assert_eq!(payload.filename(), "contract.pdf");
        assert_eq!(payload.media_type(), "application/pdf");
        assert_eq!(payload.size(), 1024);
    }

    #[test]
    fn accepts_docx() {
        let media = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
        assert!(DocumentPayload::new("contract.docx", media, vec![0u8; 16]).is_ok());
    }

    #[test]
    fn rejects_unsupported_media_type() {
        let err = DocumentPayload::new("notes.txt", "text/plain", vec![0u8; 16]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedMediaType(t) if t == "text/plain"));
    }

    #[test]
    fn rejects_oversized_payload() {
        let size = (MAX_UPLOAD_SIZE + 1) as usize;
        let err = DocumentPayload::new("big.pdf", "application/pdf", vec![0u8; size]).unwrap_err();
        match err {
            Error::FileTooLarge { size: s, limit } => {
                assert_eq!(s, MAX_UPLOAD_SIZE + 1);
                assert_eq!(limit, MAX_UPLOAD_SIZE);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn from_path_infers_pdf_media_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.pdf");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"%PDF-1.7 test bytes").unwrap();

        let payload = DocumentPayload::from_path(&path).unwrap();
        assert_eq!(payload.filename(), "contract.pdf");
        assert_eq!(payload.media_type(), "application/pdf");
    }

    #[test]
    fn from_path_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contract.csv");
        std::fs::write(&path, b"a,b,c").unwrap();

        assert!(matches!(
            DocumentPayload::from_path(&path),
            Err(Error::UnsupportedMediaType(_))
        ));
    }
}
