//! X11 native state
//!
//! Owns one display connection and one top-level output window, and turns
//! queued X events into a quit signal for the benchmark loop.
//!
//! - `connection`: x11rb implementation of the window system primitives
//! - `system`: the `WindowSystem` trait the lifecycle policy is written against
//! - `hints`: ICCCM size hints
//! - `keyboard`: keycode to keysym lookup
//! - `randr`: primary output resolution

pub mod connection;
pub mod hints;
pub mod keyboard;
pub mod randr;
pub mod system;

#[cfg(test)]
mod fake;

use tracing::{debug, error, info, warn};
use x11rb::protocol::xproto::{Atom, Window};

use crate::error::{NativeError, Result};
use crate::native_state::{NativeState, WindowProperties};
use crate::options::Options;
use crate::util::parse_pos;

pub use connection::XConnection;
use hints::SizeHints;
use keyboard::XK_ESCAPE;
pub use system::{NativeEvent, NativeWindow, WindowRequest, WindowSystem};

/// Title every output window carries
pub const WINDOW_TITLE: &str = concat!("glmark2 ", env!("CARGO_PKG_VERSION"));

/// Winsys option holding the `x,y` window position
pub const POSITION_OPTION: &str = "position";

/// Help line for the winsys options this backend understands
pub const WINSYS_OPTIONS_HELP: &str = "  position=x,y  position of the output window on screen\n";

/// Lifecycle state of the output window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    NoWindow,
    Windowed { width: i32, height: i32 },
    Fullscreen,
}

/// What `create_window` does with a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconcile {
    /// No window yet, build one
    Create,
    /// The current window already satisfies the request
    Reuse,
    /// Destroy the current window and build a new one
    Recreate,
}

impl WindowState {
    /// Decide how to satisfy `requested` from this state.
    ///
    /// A fullscreen window is reused for any fullscreen request whatever its
    /// size; a windowed one only for the same size. The visual is not
    /// compared.
    pub fn reconcile(self, requested: &WindowProperties) -> Reconcile {
        match self {
            WindowState::NoWindow => Reconcile::Create,
            WindowState::Fullscreen if requested.fullscreen => Reconcile::Reuse,
            WindowState::Windowed { width, height }
                if !requested.fullscreen
                    && width == requested.width
                    && height == requested.height =>
            {
                Reconcile::Reuse
            }
            _ => Reconcile::Recreate,
        }
    }
}

type Connector<S> = Box<dyn FnMut() -> Result<S>>;

/// Native state for X11
///
/// Teardown destroys the window before the display connection is closed.
pub struct NativeStateX11<S: WindowSystem = XConnection> {
    connect: Connector<S>,
    display: Option<S>,
    window: Option<NativeWindow>,
    properties: WindowProperties,
    wm_delete_window: Option<Atom>,
    options: Options,
}

impl NativeStateX11<XConnection> {
    /// Native state connecting to the display named by `$DISPLAY`
    pub fn new(options: Options) -> Self {
        Self::with_connector(options, || XConnection::open(None))
    }
}

impl<S: WindowSystem> NativeStateX11<S> {
    /// Native state that opens its display through `connect`.
    ///
    /// Registers the backend's winsys option help in `options`.
    pub fn with_connector<F>(mut options: Options, connect: F) -> Self
    where
        F: FnMut() -> Result<S> + 'static,
    {
        options.winsys_options_help = WINSYS_OPTIONS_HELP.to_string();
        Self {
            connect: Box::new(connect),
            display: None,
            window: None,
            properties: WindowProperties::default(),
            wm_delete_window: None,
            options,
        }
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }

    /// Current lifecycle state
    pub fn state(&self) -> WindowState {
        match self.window {
            None => WindowState::NoWindow,
            Some(_) if self.properties.fullscreen => WindowState::Fullscreen,
            Some(_) => WindowState::Windowed {
                width: self.properties.width,
                height: self.properties.height,
            },
        }
    }

    /// Position requested through the `position` winsys option
    fn requested_position(&self) -> Option<(i32, i32)> {
        self.options
            .winsys_option(POSITION_OPTION)
            .filter(|value| !value.is_empty())
            .map(parse_pos)
    }

    /// `create_window` with the failure cause instead of a flag
    pub fn try_create_window(&mut self, requested: WindowProperties) -> Result<()> {
        if self.display.is_none() {
            return Err(NativeError::DisplayNotInitialized);
        }

        let action = self.state().reconcile(&requested);
        let position = self.requested_position();
        let Some(display) = self.display.as_mut() else {
            return Err(NativeError::DisplayNotInitialized);
        };

        match action {
            Reconcile::Reuse => {
                debug!("Reusing existing window, geometry unchanged");
                return Ok(());
            }
            Reconcile::Recreate => {
                if let Some(old) = self.window.take() {
                    debug!("Window geometry changed, recreating window 0x{:x}", old.id);
                    self.wm_delete_window = None;
                    display.destroy_window(old)?;
                }
            }
            Reconcile::Create => {}
        }

        let mut resolved = WindowProperties {
            fullscreen: requested.fullscreen,
            visual_id: requested.visual_id,
            ..self.properties
        };
        if requested.fullscreen {
            match display.primary_output_size() {
                Ok((width, height)) => {
                    resolved.width = width.into();
                    resolved.height = height.into();
                }
                Err(e) => error!("Error: {}", e),
            }
        } else {
            resolved.width = requested.width;
            resolved.height = requested.height;
        }

        let (width, height) = match (u16::try_from(resolved.width), u16::try_from(resolved.height)) {
            (Ok(w), Ok(h)) if w > 0 && h > 0 => (w, h),
            _ => {
                return Err(NativeError::InvalidGeometry {
                    width: resolved.width,
                    height: resolved.height,
                })
            }
        };

        let (x, y) = position.unwrap_or((0, 0));
        match position {
            Some(_) => debug!(
                "Creating XWindow X: {} Y: {} W: {} H: {} VisualID: 0x{:x}",
                x, y, width, height, resolved.visual_id
            ),
            None => debug!(
                "Creating XWindow W: {} H: {} VisualID: 0x{:x}",
                width, height, resolved.visual_id
            ),
        }

        let window = display.create_window(&WindowRequest {
            x: clamp_coordinate(x),
            y: clamp_coordinate(y),
            width,
            height,
            visual_id: resolved.visual_id,
        })?;

        self.window = Some(window);
        self.properties = resolved;

        self.wm_delete_window = match publish_hints(display, window.id, &resolved, position) {
            Ok(atom) => atom,
            Err(e) => {
                warn!("Failed to publish window manager hints: {}", e);
                None
            }
        };

        info!(
            "Created window 0x{:x}: {}x{}{}",
            window.id,
            width,
            height,
            if resolved.fullscreen { " (fullscreen)" } else { "" }
        );
        Ok(())
    }
}

fn clamp_coordinate(value: i32) -> i16 {
    value.clamp(i16::MIN.into(), i16::MAX.into()) as i16
}

/// Publish window manager hints, title and protocols for a new window.
///
/// Returns the `WM_DELETE_WINDOW` atom if the server knows it. A missing
/// fullscreen atom only downgrades to fixed size hints.
fn publish_hints<S: WindowSystem>(
    display: &S,
    window: Window,
    properties: &WindowProperties,
    position: Option<(i32, i32)>,
) -> Result<Option<Atom>> {
    let mut fullscreen_hint = false;
    if properties.fullscreen {
        match (
            display.lookup_atom("_NET_WM_STATE")?,
            display.lookup_atom("_NET_WM_STATE_FULLSCREEN")?,
        ) {
            (Some(state), Some(fullscreen)) => {
                display.set_atom_list(window, state, &[fullscreen])?;
                fullscreen_hint = true;
            }
            _ => warn!("Warning: Could not set EWMH Fullscreen hint."),
        }
    }

    if !fullscreen_hint {
        let mut size_hints = SizeHints::fixed(properties.width, properties.height);
        if let Some((x, y)) = position {
            size_hints = size_hints.with_position(x, y);
        }
        display.set_normal_hints(window, &size_hints)?;
    }

    display.set_title(window, WINDOW_TITLE)?;

    let wm_delete_window = display.lookup_atom("WM_DELETE_WINDOW")?;
    match wm_delete_window {
        Some(atom) => display.set_wm_protocols(window, &[atom])?,
        None => warn!("WM_DELETE_WINDOW atom not found, window close requests will be ignored"),
    }

    display.flush()?;
    Ok(wm_delete_window)
}

impl<S: WindowSystem> NativeState for NativeStateX11<S> {
    type Display = S;
    type Window = Window;

    fn init_display(&mut self) -> bool {
        if self.display.is_none() {
            match (self.connect)() {
                Ok(display) => self.display = Some(display),
                Err(e) => error!("Error: {}", e),
            }
        }
        self.display.is_some()
    }

    fn display(&self) -> Option<&S> {
        self.display.as_ref()
    }

    fn create_window(&mut self, properties: WindowProperties) -> bool {
        match self.try_create_window(properties) {
            Ok(()) => self.window.is_some(),
            Err(e) => {
                error!("Error: {}", e);
                false
            }
        }
    }

    fn window(&self) -> (Option<Window>, WindowProperties) {
        (self.window.map(|w| w.id), self.properties)
    }

    fn visible(&mut self, visible: bool) {
        if !visible {
            return;
        }
        let (Some(display), Some(window)) = (self.display.as_ref(), self.window) else {
            warn!("visible() called without a window");
            return;
        };
        if let Err(e) = display.map_window(window.id).and_then(|()| display.flush()) {
            error!("Error: failed to map window 0x{:x}: {}", window.id, e);
        }
    }

    fn should_quit(&mut self) -> bool {
        let Some(display) = self.display.as_mut() else {
            return false;
        };

        match display.poll_event() {
            Ok(None) => false,
            Ok(Some(NativeEvent::KeyPress { keysym })) => keysym == XK_ESCAPE,
            Ok(Some(NativeEvent::ClientMessage { data0 })) => {
                // Window Delete event from window manager
                self.wm_delete_window == Some(data0)
            }
            Ok(Some(NativeEvent::Other)) => false,
            Err(e) if e.is_connection_lost() => {
                error!("Error: lost X11 connection while polling events: {}", e);
                true
            }
            Err(e) => {
                warn!("Failed to process X11 event: {}", e);
                false
            }
        }
    }
}

impl<S: WindowSystem> Drop for NativeStateX11<S> {
    fn drop(&mut self) {
        if let (Some(window), Some(display)) = (self.window.take(), self.display.as_mut()) {
            if let Err(e) = display.destroy_window(window) {
                warn!("Failed to destroy window 0x{:x}: {}", window.id, e);
            }
        }
        self.display = None;
    }
}
