use crate::{ExtractionFailure, RankingFailure, RankingReport, RequestId, UploadId, UploadedDocument};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the URL input box.
    InputChanged(String),
    /// Enter key in the input box. Shift+Enter never submits.
    EnterPressed { shift: bool },
    /// User clicked Send.
    SubmitClicked,
    /// User picked a file with the résumé picker.
    DocumentSelected(UploadedDocument),
    /// Engine finished reading an uploaded document.
    ExtractionFinished {
        upload_id: UploadId,
        result: Result<String, ExtractionFailure>,
    },
    /// Engine finished a ranking request.
    RankingFinished {
        request_id: RequestId,
        result: Result<RankingReport, RankingFailure>,
    },
}
