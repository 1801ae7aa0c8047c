//! UI logger for transient status messages.

use comic_series::viewer::{Notice, NoticeLevel};

use crate::prelude::*;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum UiLogLevel {
    Warning,
    Error,
    Info,
}

impl UiLogLevel {
    pub fn as_str(&self) -> &str {
        match self {
            UiLogLevel::Warning => "Warning",
            UiLogLevel::Error => "Error",
            UiLogLevel::Info => "Info",
        }
    }

    pub fn color(&self) -> Color32 {
        match self {
            UiLogLevel::Warning => Color32::YELLOW,
            UiLogLevel::Error => Color32::RED,
            UiLogLevel::Info => Color32::WHITE,
        }
    }
}

impl From<NoticeLevel> for UiLogLevel {
    fn from(level: NoticeLevel) -> Self {
        match level {
            NoticeLevel::Info => UiLogLevel::Info,
            NoticeLevel::Warning => UiLogLevel::Warning,
            NoticeLevel::Error => UiLogLevel::Error,
        }
    }
}

/// Logger that pushes messages to both `log` and the bottom bar.
#[derive(Clone, Default)]
pub struct UiLogger {
    pub message: Option<(String, UiLogLevel)>,
    message_time: Option<Instant>,
    pub timeout_override: Option<u64>,
}

impl UiLogger {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_message(&mut self, msg: String, level: UiLogLevel, timeout: Option<u64>) {
        self.message = Some((msg, level));
        self.message_time = Some(Instant::now());
        self.timeout_override = timeout;
    }

    pub fn warn(&mut self, msg: impl Into<String>, timeout: Option<u64>) {
        let msg = msg.into();
        log::warn!("{}", msg);
        self.set_message(msg, UiLogLevel::Warning, timeout);
    }

    pub fn error(&mut self, msg: impl Into<String>, timeout: Option<u64>) {
        let msg = msg.into();
        log::error!("{}", msg);
        self.set_message(msg, UiLogLevel::Error, timeout);
    }

    pub fn info(&mut self, msg: impl Into<String>, timeout: Option<u64>) {
        let msg = msg.into();
        log::info!("{}", msg);
        self.set_message(msg, UiLogLevel::Info, timeout);
    }

    /// Show a viewer notice. Refresh status is brief; errors linger.
    pub fn notice(&mut self, notice: &Notice) {
        let timeout = match notice {
            Notice::Refreshing => Some(1),
            Notice::SeriesFailed(_) | Notice::ListingFailed(_) => Some(5),
            _ => None,
        };
        match UiLogLevel::from(notice.level()) {
            UiLogLevel::Info => self.info(notice.message(), timeout),
            UiLogLevel::Warning => self.warn(notice.message(), timeout),
            UiLogLevel::Error => self.error(notice.message(), timeout),
        }
    }

    /// Call every frame to drop expired messages.
    pub fn clear_expired(&mut self) {
        if let Some(t) = self.message_time {
            let timeout = self.timeout_override.unwrap_or(LOG_TIMEOUT);
            if t.elapsed() >= Duration::from_secs(timeout) {
                self.message = None;
                self.message_time = None;
            }
        }
    }

    /// Time until the current message expires, for scheduling a repaint.
    pub fn remaining(&self) -> Option<Duration> {
        let t = self.message_time?;
        let timeout = Duration::from_secs(self.timeout_override.unwrap_or(LOG_TIMEOUT));
        Some(timeout.saturating_sub(t.elapsed()))
    }
}
