//! Error types for the native window layer
//!
//! Hard failures (display, visual and window acquisition) surface as
//! `NativeError`. Window manager hints are best-effort and only ever logged.

use thiserror::Error;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};

/// Errors raised while talking to the X server
#[derive(Debug, Error)]
pub enum NativeError {
    /// `create_window` was called before `init_display` succeeded
    #[error("X11 Display has not been initialized")]
    DisplayNotInitialized,

    #[error("failed to open X11 display: {0}")]
    Connect(#[from] ConnectError),

    #[error("X11 connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X11 request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("failed to allocate X11 resource id: {0}")]
    Id(#[from] ReplyOrIdError),

    /// No visual on the default screen carries the requested id
    #[error("could not get a valid visual for id 0x{0:x}")]
    VisualNotFound(u32),

    #[error("XCreateWindow failed: {0}")]
    CreateWindow(ReplyError),

    /// Width or height cannot be expressed as a non-empty X11 window size
    #[error("invalid window geometry {width}x{height}")]
    InvalidGeometry { width: i32, height: i32 },

    /// One step of the RandR primary output query failed
    #[error("unable to {step}: {reason}")]
    PrimaryOutput { step: &'static str, reason: String },
}

impl NativeError {
    /// Whether the connection to the X server is gone
    pub fn is_connection_lost(&self) -> bool {
        matches!(
            self,
            NativeError::Connection(_)
                | NativeError::Reply(ReplyError::ConnectionError(_))
                | NativeError::Id(ReplyOrIdError::ConnectionError(_))
        )
    }
}

pub type Result<T, E = NativeError> = std::result::Result<T, E>;
