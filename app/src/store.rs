//! Append-only display log of chat turns.
//!
//! This is a view for rendering, not the conversation context the bot
//! remembers; that lives in the backend's `ChatSession`.

/// Opaque unique token for one chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageId(u64);

impl MessageId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Author {
    User,
    Bot,
}

/// One chat turn. Immutable once created.
#[derive(Debug, Clone)]
pub struct ChatTurn {
    pub id: MessageId,
    pub author: Author,
    pub text: String,
}

#[derive(Default)]
pub struct MessageStore {
    turns: Vec<ChatTurn>,
    next_id: u64,
    scroll_to_bottom: bool,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a turn to the tail. Never fails; ordering is insertion order.
    pub fn append(&mut self, author: Author, text: impl Into<String>) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.turns.push(ChatTurn {
            id,
            author,
            text: text.into(),
        });
        self.scroll_to_bottom = true;
        id
    }

    /// Full ordered sequence, read-only.
    pub fn all(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn get(&self, index: usize) -> Option<&ChatTurn> {
        self.turns.get(index)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Consume the scroll hint set by the latest append.
    pub fn take_scroll_hint(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_bottom)
    }
}
