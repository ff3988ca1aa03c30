//! glmark2 native window layer for X11
//!
//! Opens the display, creates the benchmark's output window with the visual
//! and geometry the renderer asks for, and reports when the user wants to
//! quit (Escape or the window manager's close button).

pub mod config;
pub mod error;
pub mod native_state;
pub mod options;
pub mod util;
pub mod x11;

pub use error::{NativeError, Result};
pub use native_state::{NativeState, WindowProperties};
pub use options::{Options, WinsysOption};
pub use x11::{NativeStateX11, XConnection};
