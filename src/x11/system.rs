//! Window system boundary
//!
//! `WindowSystem` is the set of X11 primitives the native state drives. The
//! production implementation is `XConnection`; the window lifecycle policy
//! above it only ever talks to this trait.

use x11rb::protocol::xproto::{Atom, Colormap, Keysym, Visualid, Window};

use crate::error::Result;
use crate::x11::hints::SizeHints;

/// A created top-level window and the colormap it owns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeWindow {
    pub id: Window,
    pub colormap: Colormap,
}

/// Geometry and visual for a new top-level window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowRequest {
    pub x: i16,
    pub y: i16,
    pub width: u16,
    pub height: u16,
    pub visual_id: Visualid,
}

/// An event as far as quit detection cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeEvent {
    /// Key press, translated to the keysym in column 0 of the mapping
    KeyPress { keysym: Keysym },
    /// Client message carrying its first 32-bit data word
    ClientMessage { data0: u32 },
    /// Anything else
    Other,
}

pub trait WindowSystem {
    /// Resolution of the active mode on the primary output
    fn primary_output_size(&self) -> Result<(u16, u16)>;

    /// Create an unmapped top-level window on the default screen.
    ///
    /// The window gets a dedicated colormap for the requested visual, no
    /// background or border fill and selects key press events.
    fn create_window(&mut self, request: &WindowRequest) -> Result<NativeWindow>;

    /// Destroy a window and release its colormap
    fn destroy_window(&mut self, window: NativeWindow) -> Result<()>;

    /// Look up an existing atom without creating it
    fn lookup_atom(&self, name: &str) -> Result<Option<Atom>>;

    /// Replace an `ATOM[]` property on `window`
    fn set_atom_list(&self, window: Window, property: Atom, values: &[Atom]) -> Result<()>;

    /// Replace `WM_NORMAL_HINTS`
    fn set_normal_hints(&self, window: Window, hints: &SizeHints) -> Result<()>;

    /// Replace `WM_NAME`
    fn set_title(&self, window: Window, title: &str) -> Result<()>;

    /// Replace `WM_PROTOCOLS`
    fn set_wm_protocols(&self, window: Window, protocols: &[Atom]) -> Result<()>;

    fn map_window(&self, window: Window) -> Result<()>;

    fn flush(&self) -> Result<()>;

    /// Take one queued event without blocking
    fn poll_event(&mut self) -> Result<Option<NativeEvent>>;
}
