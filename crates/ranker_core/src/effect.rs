#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    ExtractText {
        upload_id: crate::UploadId,
        bytes: Vec<u8>,
    },
    /// Best-effort abort of an extraction whose result is no longer wanted.
    CancelExtraction { upload_id: crate::UploadId },
    RequestRanking {
        request_id: crate::RequestId,
        url: String,
        resume: String,
    },
}
