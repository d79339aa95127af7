use ranker_core::{AppViewModel, DocumentStatus, MessageView, SubmissionPhase};

use super::constants::*;

pub fn header(view: &AppViewModel) -> String {
    let rule = "=".repeat(view.title.len() + 4);
    format!("{rule}\n  {}\n{rule}\n", view.title)
}

/// Renders messages from index `shown` onward, then the banner and status line.
pub fn render(view: &AppViewModel, shown: usize) -> String {
    let mut out = String::new();
    for message in view.messages.iter().skip(shown) {
        out.push_str(&format_message(message));
        out.push('\n');
    }
    if let Some(banner) = &view.banner {
        out.push_str(&format!("{BANNER_MARK} {banner}\n"));
    }
    out.push_str(&status_line(view));
    out.push('\n');
    out
}

fn format_message(message: &MessageView) -> String {
    let avatar = if message.is_bot { BOT_AVATAR } else { USER_AVATAR };
    let indent = " ".repeat(avatar.len() + 1);
    let mut lines = message.text.lines();
    let mut out = format!("{avatar} {}", lines.next().unwrap_or_default());
    for line in lines {
        out.push('\n');
        out.push_str(&indent);
        out.push_str(line);
    }
    out
}

pub fn status_line(view: &AppViewModel) -> String {
    let resume = match (&view.document_name, view.document_status) {
        (Some(name), DocumentStatus::Reading) => format!("{name} (reading...)"),
        (Some(name), DocumentStatus::Ready { chars }) => format!("{name} ({chars} chars)"),
        _ => "none".to_string(),
    };
    let url = if view.input.trim().is_empty() {
        "-".to_string()
    } else {
        view.input.replace('\n', "\\n")
    };
    format!(
        "[resume: {resume} | url: {url} | {phase} | send: {send}]",
        phase = phase_label(&view.phase),
        send = if view.submit_enabled { "ready" } else { "disabled" },
    )
}

fn phase_label(phase: &SubmissionPhase) -> &'static str {
    match phase {
        SubmissionPhase::Idle => "idle",
        SubmissionPhase::Submitting { .. } => "reading resume",
        SubmissionPhase::AwaitingResponse { .. } => "ranking",
        SubmissionPhase::Completed { .. } => "done",
        SubmissionPhase::Failed { .. } => "failed",
    }
}
