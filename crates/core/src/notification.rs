/// Message shown after a successful save.
pub const SAVE_SUCCEEDED_MESSAGE: &str = "The Resource Container has been successfully saved!";

/// Message shown when a save is rejected before any I/O.
pub const SAVE_REJECTED_MESSAGE: &str =
    "The Resource Container has not been saved! Check the data filled in properly.";

/// Message shown when save is requested with nothing loaded.
pub const NOTHING_LOADED_MESSAGE: &str = "No Resource Container is loaded.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Error,
    Success,
}

/// 要呈現給使用者的訊息。 / A message for the notification popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Success,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NotificationKind::Error
    }
}
