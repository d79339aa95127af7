/// One conversation turn. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    text: String,
    is_bot: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bot: false,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_bot: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_bot(&self) -> bool {
        self.is_bot
    }
}

/// Append-only message log. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_user_turn(&mut self, text: impl Into<String>) {
        self.messages.push(Message::user(text));
    }

    pub fn append_bot_turn(&mut self, text: impl Into<String>) {
        self.messages.push(Message::bot(text));
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
