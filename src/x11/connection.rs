//! X11 connection
//!
//! `XConnection` implements `WindowSystem` on top of an x11rb
//! `RustConnection`. The connection is closed when it is dropped.

use tracing::{debug, info, warn};
use x11rb::connection::Connection;
use x11rb::protocol::xproto::*;
use x11rb::protocol::Event;
use x11rb::rust_connection::RustConnection;
use x11rb::wrapper::ConnectionExt as _;

use crate::error::{NativeError, Result};
use crate::x11::hints::SizeHints;
use crate::x11::keyboard::KeyboardMap;
use crate::x11::randr;
use crate::x11::system::{NativeEvent, NativeWindow, WindowRequest, WindowSystem};

/// Frees a colormap unless ownership is handed on
struct ColormapGuard<F: FnOnce(Colormap)> {
    colormap: Colormap,
    free: Option<F>,
}

impl<F: FnOnce(Colormap)> ColormapGuard<F> {
    fn new(colormap: Colormap, free: F) -> Self {
        Self {
            colormap,
            free: Some(free),
        }
    }

    fn release(mut self) -> Colormap {
        self.free = None;
        self.colormap
    }
}

impl<F: FnOnce(Colormap)> Drop for ColormapGuard<F> {
    fn drop(&mut self) {
        if let Some(free) = self.free.take() {
            free(self.colormap);
        }
    }
}

/// Connection to the X server
pub struct XConnection {
    conn: RustConnection,
    screen_num: usize,
    keyboard: Option<KeyboardMap>,
}

impl XConnection {
    /// Connect to `display_name`, or to `$DISPLAY` when `None`
    pub fn open(display_name: Option<&str>) -> Result<Self> {
        let (conn, screen_num) = RustConnection::connect(display_name)?;

        let screen = &conn.setup().roots[screen_num];
        info!(
            "Connected to X server, screen {}, root window 0x{:x}, {}x{}",
            screen_num, screen.root, screen.width_in_pixels, screen.height_in_pixels
        );

        Ok(Self {
            conn,
            screen_num,
            keyboard: None,
        })
    }

    pub fn screen(&self) -> &Screen {
        &self.conn.setup().roots[self.screen_num]
    }

    /// Visual of the default screen's root window
    pub fn root_visual(&self) -> Visualid {
        self.screen().root_visual
    }

    /// Depth of `visual_id` on the default screen, if the screen offers it
    fn visual_depth(&self, visual_id: Visualid) -> Option<u8> {
        self.screen()
            .allowed_depths
            .iter()
            .find(|depth| depth.visuals.iter().any(|v| v.visual_id == visual_id))
            .map(|depth| depth.depth)
    }

    fn keysym(&mut self, keycode: Keycode) -> Result<Keysym> {
        let keyboard = match self.keyboard.take() {
            Some(keyboard) => keyboard,
            None => KeyboardMap::fetch(&self.conn)?,
        };
        let keysym = keyboard.keysym(keycode, 0);
        self.keyboard = Some(keyboard);
        Ok(keysym)
    }
}

impl WindowSystem for XConnection {
    fn primary_output_size(&self) -> Result<(u16, u16)> {
        randr::primary_output_size(&self.conn, self.screen().root)
    }

    fn create_window(&mut self, request: &WindowRequest) -> Result<NativeWindow> {
        let depth = self
            .visual_depth(request.visual_id)
            .ok_or(NativeError::VisualNotFound(request.visual_id))?;
        let root = self.screen().root;

        let colormap = self.conn.generate_id()?;
        self.conn
            .create_colormap(ColormapAlloc::NONE, colormap, root, request.visual_id)?;
        let conn = &self.conn;
        let colormap = ColormapGuard::new(colormap, |colormap| {
            debug!("Freeing colormap 0x{:x} of failed window", colormap);
            if let Err(e) = conn.free_colormap(colormap) {
                warn!("Failed to free colormap 0x{:x}: {}", colormap, e);
            }
        });

        let window = self.conn.generate_id()?;
        let aux = CreateWindowAux::new()
            .background_pixel(0)
            .border_pixel(0)
            .colormap(colormap.colormap)
            .event_mask(EventMask::KEY_PRESS);

        self.conn
            .create_window(
                depth,
                window,
                root,
                request.x,
                request.y,
                request.width,
                request.height,
                0,
                WindowClass::INPUT_OUTPUT,
                request.visual_id,
                &aux,
            )?
            .check()
            .map_err(NativeError::CreateWindow)?;

        debug!(
            "X window created: 0x{:x} (depth {}, visual 0x{:x})",
            window, depth, request.visual_id
        );
        Ok(NativeWindow {
            id: window,
            colormap: colormap.release(),
        })
    }

    fn destroy_window(&mut self, window: NativeWindow) -> Result<()> {
        debug!("Destroying X window 0x{:x}", window.id);
        self.conn.destroy_window(window.id)?;
        self.conn.free_colormap(window.colormap)?;
        self.conn.flush()?;
        Ok(())
    }

    fn lookup_atom(&self, name: &str) -> Result<Option<Atom>> {
        let atom = self.conn.intern_atom(true, name.as_bytes())?.reply()?.atom;
        Ok((atom != x11rb::NONE).then_some(atom))
    }

    fn set_atom_list(&self, window: Window, property: Atom, values: &[Atom]) -> Result<()> {
        self.conn
            .change_property32(PropMode::REPLACE, window, property, AtomEnum::ATOM, values)?;
        Ok(())
    }

    fn set_normal_hints(&self, window: Window, hints: &SizeHints) -> Result<()> {
        self.conn.change_property32(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NORMAL_HINTS,
            AtomEnum::WM_SIZE_HINTS,
            &hints.to_words(),
        )?;
        Ok(())
    }

    fn set_title(&self, window: Window, title: &str) -> Result<()> {
        self.conn.change_property8(
            PropMode::REPLACE,
            window,
            AtomEnum::WM_NAME,
            AtomEnum::STRING,
            title.as_bytes(),
        )?;
        Ok(())
    }

    fn set_wm_protocols(&self, window: Window, protocols: &[Atom]) -> Result<()> {
        let wm_protocols = self.conn.intern_atom(false, b"WM_PROTOCOLS")?.reply()?.atom;
        self.set_atom_list(window, wm_protocols, protocols)
    }

    fn map_window(&self, window: Window) -> Result<()> {
        self.conn.map_window(window)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.conn.flush()?;
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Option<NativeEvent>> {
        self.conn.flush()?;
        let Some(event) = self.conn.poll_for_event()? else {
            return Ok(None);
        };

        let event = match event {
            Event::KeyPress(key) => match self.keysym(key.detail) {
                Ok(keysym) => NativeEvent::KeyPress { keysym },
                Err(e) if e.is_connection_lost() => return Err(e),
                Err(e) => {
                    warn!("Failed to look up keysym for keycode {}: {}", key.detail, e);
                    NativeEvent::Other
                }
            },
            Event::ClientMessage(msg) => NativeEvent::ClientMessage {
                data0: msg.data.as_data32()[0],
            },
            Event::MappingNotify(notify) => {
                if notify.request == Mapping::KEYBOARD {
                    debug!("Keyboard mapping changed, dropping cached keysyms");
                    self.keyboard = None;
                }
                NativeEvent::Other
            }
            Event::Error(e) => {
                warn!("X11 error: {:?}", e);
                NativeEvent::Other
            }
            _ => NativeEvent::Other,
        };
        Ok(Some(event))
    }
}

impl Drop for XConnection {
    fn drop(&mut self) {
        info!("Closing X11 display connection (screen {})", self.screen_num);
    }
}
