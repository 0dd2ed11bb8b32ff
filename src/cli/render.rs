//! Incremental printing of the assistant reply.

use std::io::{self, Write};

use crate::models::{MessageId, MessageRole};
use crate::store::StoreState;

/// Prints only what was appended to the latest AI message since last time.
#[derive(Debug, Default)]
pub struct ReplyPrinter {
    message_id: Option<MessageId>,
    printed: usize,
}

impl ReplyPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text not yet printed, if any
    pub fn delta<'a>(&mut self, state: &'a StoreState) -> Option<&'a str> {
        let reply = state
            .active_messages()?
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::Ai)?;

        if self.message_id.as_ref() != Some(&reply.id) {
            self.message_id = Some(reply.id.clone());
            self.printed = 0;
        }

        // Content only grows while streaming; anything else restarts the count
        let content = reply.content.as_str();
        if content.len() < self.printed || !content.is_char_boundary(self.printed) {
            self.printed = 0;
        }

        let delta = &content[self.printed..];
        self.printed = content.len();
        (!delta.is_empty()).then_some(delta)
    }

    /// Write the delta, if any, and flush.
    pub fn write_delta<W: Write>(&mut self, state: &StoreState, out: &mut W) -> io::Result<()> {
        if let Some(delta) = self.delta(state) {
            out.write_all(delta.as_bytes())?;
            out.flush()?;
        }
        Ok(())
    }
}
