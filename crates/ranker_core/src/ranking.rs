use std::fmt;

/// Structured result returned by the ranking service.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingReport {
    pub position_title: String,
    pub company_name: String,
    /// Fractional match score in `[0, 1]`.
    pub rank: f64,
    pub feedback: String,
}

/// Why a ranking request produced no report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingFailure {
    /// Transport problems: connection, timeout, non-success status.
    Network { reason: String },
    /// The service answered but the body did not match the contract.
    MalformedResponse { reason: String },
}

/// Why a document's text could not be extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionFailure {
    Unreadable { reason: String },
}

impl fmt::Display for ExtractionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionFailure::Unreadable { reason } => write!(f, "unreadable document: {reason}"),
        }
    }
}

impl fmt::Display for RankingFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RankingFailure::Network { reason } => write!(f, "network failure: {reason}"),
            RankingFailure::MalformedResponse { reason } => {
                write!(f, "malformed response: {reason}")
            }
        }
    }
}

pub fn user_prompt_text(url: &str) -> String {
    format!("Rank my resume against this job posting: {url}")
}

pub fn acknowledgment_text() -> &'static str {
    "Thanks! Reading the job posting and ranking your resume now..."
}

/// Renders a fractional rank as a percentage with two decimals, e.g. `0.8734` -> `87.34%`.
pub fn format_rank_percent(rank: f64) -> String {
    let percent = (rank * 10_000.0).round() / 100.0;
    format!("{percent:.2}%")
}

pub fn format_ranking_message(report: &RankingReport) -> String {
    format!(
        "{title} at {company}\nMatch: {percent}\n{feedback}",
        title = report.position_title.trim(),
        company = report.company_name.trim(),
        percent = format_rank_percent(report.rank),
        feedback = report.feedback.trim(),
    )
}

pub fn failure_text(failure: &RankingFailure) -> String {
    match failure {
        RankingFailure::Network { reason } => format!(
            "Sorry, the ranking service could not be reached ({reason}). Please try again."
        ),
        RankingFailure::MalformedResponse { reason } => {
            format!("Sorry, the ranking service returned an unexpected response ({reason}).")
        }
    }
}
