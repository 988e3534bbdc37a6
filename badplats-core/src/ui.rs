//! Presentation capabilities the place screen drives. Front ends inject
//! their own implementations.

use std::{fmt::Debug, time::Duration};

pub const TOAST_DURATION: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastPosition {
    #[default]
    Top,
    Bottom,
}

/// Dismissible notification banner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub duration: Duration,
    pub position: ToastPosition,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Success)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, ToastKind::Error)
    }

    fn new(message: impl Into<String>, kind: ToastKind) -> Self {
        Self {
            message: message.into(),
            kind,
            duration: TOAST_DURATION,
            position: ToastPosition::default(),
        }
    }
}

pub trait Notifier: Send + Sync + Debug {
    fn notify(&self, toast: Toast);
}

/// Overlay shown while a fetch is in flight.
pub trait LoadingIndicator: Send + Sync + Debug {
    fn show(&self, text: &str) -> Box<dyn LoadingHandle>;
}

pub trait LoadingHandle: Send {
    fn dismiss(self: Box<Self>);
}

/// Opens a URL outside the application.
pub trait LinkOpener: Send + Sync + Debug {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}
