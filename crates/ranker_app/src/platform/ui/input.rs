use std::path::PathBuf;

/// What a line typed at the prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// New URL field contents; `submit` is false for Shift+Enter.
    Edit { text: String, submit: bool },
    Upload(PathBuf),
    Send,
    Clear,
    Status,
    Help,
    Quit,
    Unknown(String),
}

/// Turns terminal lines into field edits, joining `\`-continued lines.
#[derive(Debug, Default)]
pub struct LineComposer {
    pending: String,
}

impl LineComposer {
    pub fn feed(&mut self, line: &str) -> InputAction {
        let line = line.trim_end_matches(&['\r', '\n'][..]);

        if self.pending.is_empty() {
            if let Some(command) = line.strip_prefix(':') {
                return parse_command(command);
            }
        }

        if let Some(continued) = line.strip_suffix('\\') {
            self.pending.push_str(continued);
            self.pending.push('\n');
            return InputAction::Edit {
                text: self.pending.clone(),
                submit: false,
            };
        }

        let mut text = std::mem::take(&mut self.pending);
        text.push_str(line);
        InputAction::Edit { text, submit: true }
    }
}

fn parse_command(command: &str) -> InputAction {
    let command = command.trim();
    let (name, argument) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "upload" | "u" if !argument.is_empty() => InputAction::Upload(PathBuf::from(argument)),
        "send" | "s" => InputAction::Send,
        "clear" => InputAction::Clear,
        "status" => InputAction::Status,
        "help" | "h" | "?" => InputAction::Help,
        "quit" | "q" | "exit" => InputAction::Quit,
        _ => InputAction::Unknown(command.to_string()),
    }
}
