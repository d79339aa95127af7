use std::fmt;

use crate::url_check::is_valid_url;

/// User-correctable input problems shown in the error banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    ResumeAndUrlRequired,
    ResumeRequired,
    ValidUrlRequired,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::ResumeAndUrlRequired => {
                write!(f, "A resume and a valid job posting URL are both required.")
            }
            ValidationError::ResumeRequired => write!(f, "A resume must be uploaded."),
            ValidationError::ValidUrlRequired => write!(f, "Please enter a valid URL."),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateDecision {
    /// Error to show while the user is editing. Absent for a blank form.
    pub error: Option<ValidationError>,
    /// Error to surface when a submit is attempted anyway.
    pub rejection: Option<ValidationError>,
    pub submit_enabled: bool,
}

/// Decides whether `(input, document presence)` may be submitted.
///
/// First match wins: no document and no valid URL, no document, no valid URL.
pub fn evaluate_gate(input: &str, document_present: bool) -> GateDecision {
    let url_valid = is_valid_url(input);
    let rejection = match (document_present, url_valid) {
        (false, false) => Some(ValidationError::ResumeAndUrlRequired),
        (false, true) => Some(ValidationError::ResumeRequired),
        (true, false) => Some(ValidationError::ValidUrlRequired),
        (true, true) => None,
    };
    let blank = input.trim().is_empty();
    let error = if blank && !document_present {
        None
    } else {
        rejection
    };

    GateDecision {
        error,
        rejection,
        submit_enabled: rejection.is_none() && !blank,
    }
}
