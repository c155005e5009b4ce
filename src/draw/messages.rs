use crate::clock::Clock;
use crate::toast_log::append_toast_log;
use chrono::{DateTime, Duration, Utc};
use std::path::PathBuf;
use std::rc::Rc;

pub const DEFAULT_VISIBLE_MS: i64 = 3000;
pub const DEFAULT_FADE_MS: i64 = 500;
/// Upper bound for either phase; longer configured values are cut to this.
pub const MAX_PHASE_MS: i64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessagePhase {
    Visible,
    Fading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub kind: MessageKind,
    pub phase: MessagePhase,
    posted_at: DateTime<Utc>,
}

/// Transient user messages. Each message stays visible, then fades, then is
/// removed; time only moves when [`Notifier::tick`] is called.
pub struct Notifier {
    clock: Rc<dyn Clock>,
    visible_for: Duration,
    fade_for: Duration,
    messages: Vec<Message>,
    next_id: u64,
    log_path: Option<PathBuf>,
}

impl Notifier {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            visible_for: Duration::milliseconds(DEFAULT_VISIBLE_MS),
            fade_for: Duration::milliseconds(DEFAULT_FADE_MS),
            messages: Vec::new(),
            next_id: 0,
            log_path: None,
        }
    }

    pub fn with_timing(mut self, visible_ms: i64, fade_ms: i64) -> Self {
        self.visible_for = Duration::milliseconds(visible_ms.clamp(0, MAX_PHASE_MS));
        self.fade_for = Duration::milliseconds(fade_ms.clamp(0, MAX_PHASE_MS));
        self
    }

    pub fn with_log_file(mut self, path: Option<PathBuf>) -> Self {
        self.log_path = path;
        self
    }

    pub fn notify(&mut self, text: impl Into<String>, kind: MessageKind) -> MessageId {
        let text = text.into();
        if let Some(path) = &self.log_path {
            append_toast_log(path, &text);
        }
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text,
            kind,
            phase: MessagePhase::Visible,
            posted_at: self.clock.now(),
        });
        id
    }

    pub fn success(&mut self, text: impl Into<String>) -> MessageId {
        self.notify(text, MessageKind::Success)
    }

    pub fn warn(&mut self, text: impl Into<String>) -> MessageId {
        self.notify(text, MessageKind::Warning)
    }

    pub fn error(&mut self, text: impl Into<String>) -> MessageId {
        self.notify(text, MessageKind::Error)
    }

    /// Advance message phases against the clock and drop expired messages.
    pub fn tick(&mut self) {
        let now = self.clock.now();
        let visible_for = self.visible_for;
        let expires_after = self.visible_for + self.fade_for;
        self.messages.retain_mut(|msg| {
            let age = now - msg.posted_at;
            if age >= expires_after {
                return false;
            }
            if age >= visible_for {
                msg.phase = MessagePhase::Fading;
            }
            true
        });
    }

    /// Remove a message ahead of schedule. Removing one that is already gone
    /// is fine.
    pub fn dismiss(&mut self, id: MessageId) -> bool {
        let before = self.messages.len();
        self.messages.retain(|msg| msg.id != id);
        before != self.messages.len()
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Opacity in `0.0..=1.0` for rendering the fade-out.
    pub fn opacity(&self, message: &Message) -> f32 {
        if message.phase == MessagePhase::Visible {
            return 1.0;
        }
        let fade_ms = self.fade_for.num_milliseconds();
        if fade_ms <= 0 {
            return 0.0;
        }
        let into_fade = (self.clock.now() - message.posted_at - self.visible_for).num_milliseconds();
        (1.0 - into_fade as f32 / fade_ms as f32).clamp(0.0, 1.0)
    }
}
