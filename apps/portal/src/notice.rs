use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
}

/// A one-off message for the user plus where the client should go next.
/// Used for outcomes that are not errors, such as a repeated application.
#[derive(Debug, Clone, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub redirect: String,
}

impl Notice {
    pub fn success(message: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
            redirect: redirect.into(),
        }
    }

    pub fn info(message: impl Into<String>, redirect: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            redirect: redirect.into(),
        }
    }
}
