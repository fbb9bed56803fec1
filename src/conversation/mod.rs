use crate::responder::{ReplyRequest, ReplyScheduler};
use chrono::{DateTime, Local};

/// Distinguishes live conversations from torn-down ones: a deferred reply
/// addressed to an old id is dropped at delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversationId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageOrigin {
    User,
    Bot,
}

/// A single transcript entry. Immutable once appended.
#[derive(Debug, Clone)]
pub struct Message {
    pub seq: u64,
    pub text: String,
    pub origin: MessageOrigin,
    pub sent_at: DateTime<Local>,
}

/// Owns one chat session: the append-only message sequence and the draft
/// input text. The first message is always the persona's welcome.
pub struct Conversation {
    id: ConversationId,
    persona_id: String,
    messages: Vec<Message>,
    draft: String,
    next_seq: u64,
}

impl Conversation {
    pub fn open(
        id: ConversationId,
        persona_id: impl Into<String>,
        welcome_text: impl Into<String>,
    ) -> Self {
        let mut conversation = Self {
            id,
            persona_id: persona_id.into(),
            messages: Vec::new(),
            draft: String::new(),
            next_seq: 0,
        };
        conversation.append(welcome_text.into(), MessageOrigin::Bot);
        conversation
    }

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn persona_id(&self) -> &str {
        &self.persona_id
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Mutable access for the input widget; edits replace the draft text.
    pub fn draft_mut(&mut self) -> &mut String {
        &mut self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    pub fn can_submit(&self) -> bool {
        !self.draft.trim().is_empty()
    }

    /// Appends the draft as a user message, clears the draft, and asks the
    /// scheduler for one deferred reply. Whitespace-only drafts are left
    /// untouched and schedule nothing.
    pub fn submit(&mut self, scheduler: &dyn ReplyScheduler) -> bool {
        let text = self.draft.trim().to_string();
        if text.is_empty() {
            return false;
        }

        self.append(text.clone(), MessageOrigin::User);
        self.draft.clear();
        scheduler.schedule(ReplyRequest {
            conversation: self.id,
            persona_id: self.persona_id.clone(),
            incoming_text: text,
        });
        true
    }

    /// The deferred append: one bot message per fired reply.
    pub fn push_bot_reply(&mut self, text: impl Into<String>) {
        self.append(text.into(), MessageOrigin::Bot);
    }

    fn append(&mut self, text: String, origin: MessageOrigin) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.messages.push(Message {
            seq,
            text,
            origin,
            sent_at: Local::now(),
        });
    }
}
