//! UI/backend events and error modeling for the picker window.

use shared::{
    domain::ConfettiBurst,
    protocol::{PickerEvent, RunSnapshot},
};

pub enum UiEvent {
    Info(String),
    Error(UiError),
    Picker(PickerEvent),
    Snapshot(RunSnapshot),
    Celebrate(ConfettiBurst),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Assets,
    Clipboard,
    Backend,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    Logo,
    CopyWinner,
    General,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("clipboard") {
            UiErrorCategory::Clipboard
        } else if message_lower.contains("logo")
            || message_lower.contains("image")
            || message_lower.contains("no such file")
            || message_lower.contains("not found")
        {
            UiErrorCategory::Assets
        } else if message_lower.contains("runtime")
            || message_lower.contains("startup")
            || message_lower.contains("disconnected")
            || message_lower.contains("queue")
        {
            UiErrorCategory::Backend
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    /// Errors the operator can act on get a banner; the rest only a status line.
    pub fn is_blocking(&self) -> bool {
        self.category == UiErrorCategory::Backend
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

pub fn category_label(category: UiErrorCategory) -> &'static str {
    match category {
        UiErrorCategory::Assets => "Assets",
        UiErrorCategory::Clipboard => "Clipboard",
        UiErrorCategory::Backend => "Draw engine",
        UiErrorCategory::Unknown => "Error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_runtime_failure_as_blocking_backend_error() {
        let err = UiError::from_message(
            UiErrorContext::BackendStartup,
            "draw engine startup failure: failed to build runtime: out of threads",
        );
        assert_eq!(err.category(), UiErrorCategory::Backend);
        assert!(err.is_blocking());
        assert_eq!(err.context(), UiErrorContext::BackendStartup);
    }

    #[test]
    fn classifies_missing_logo_as_asset_error() {
        let err = UiError::from_message(
            UiErrorContext::Logo,
            "failed to open logo 'public/logo.png': No such file or directory",
        );
        assert_eq!(err.category(), UiErrorCategory::Assets);
        assert!(!err.is_blocking());
    }

    #[test]
    fn classifies_clipboard_failures() {
        let err = UiError::from_message(UiErrorContext::CopyWinner, "clipboard unavailable");
        assert_eq!(err.category(), UiErrorCategory::Clipboard);
        assert_eq!(category_label(err.category()), "Clipboard");
    }

    #[test]
    fn sound_messages_are_not_blocking() {
        let err = UiError::from_message(UiErrorContext::General, "audio output unavailable");
        assert_eq!(err.category(), UiErrorCategory::Unknown);
        assert!(!err.is_blocking());
    }
}
