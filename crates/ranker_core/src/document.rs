/// The only media type the résumé picker accepts.
pub const ACCEPTED_MEDIA_TYPE: &str = "application/pdf";

/// A document picked by the user, before any text has been extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedDocument {
    pub file_name: String,
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(file_name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            media_type: media_type.into(),
            bytes,
        }
    }
}

/// Compares the essence of a media type (parameters dropped, case-insensitive).
pub fn is_accepted_media_type(media_type: &str) -> bool {
    let essence = media_type
        .split(';')
        .next()
        .unwrap_or(media_type)
        .trim();
    essence.eq_ignore_ascii_case(ACCEPTED_MEDIA_TYPE)
}
