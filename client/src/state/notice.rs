//! Transient success/failure messages shown after an action.

#[cfg(test)]
#[path = "notice_test.rs"]
mod notice_test;

use market::MarketError;
use market::error::user_message;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn success(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Success, text: text.into() }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { kind: NoticeKind::Error, text: text.into() }
    }

    /// Failure notice with the user-facing text for `err`; `fallback` is the
    /// action's generic message.
    #[must_use]
    pub fn from_error(err: &MarketError, fallback: &str) -> Self {
        Self::error(user_message(err, fallback))
    }

    #[must_use]
    pub fn css_class(&self) -> &'static str {
        match self.kind {
            NoticeKind::Success => "notice notice--success",
            NoticeKind::Error => "notice notice--error",
        }
    }
}
