//! In-memory window system for exercising the native state without a server

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::rc::Rc;

use x11rb::errors::{ConnectError, ConnectionError};
use x11rb::protocol::xproto::{Atom, Window};

use crate::error::{NativeError, Result};
use crate::x11::hints::SizeHints;
use crate::x11::system::{NativeEvent, NativeWindow, WindowRequest, WindowSystem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Create(Window),
    Destroy(Window),
    Close,
}

/// Everything the fake server saw, shared with the test
#[derive(Debug)]
pub struct FakeLog {
    pub connects: usize,
    pub refuse_connection: bool,
    pub visuals: Vec<u32>,
    pub atoms: HashMap<String, Atom>,
    pub output_size: Option<(u16, u16)>,
    pub next_id: u32,
    pub live: Vec<Window>,
    pub created: Vec<WindowRequest>,
    pub destroyed: Vec<Window>,
    pub atom_lists: Vec<(Window, Atom, Vec<Atom>)>,
    pub normal_hints: Vec<(Window, SizeHints)>,
    pub titles: Vec<String>,
    pub protocols: Vec<(Window, Vec<Atom>)>,
    pub mapped: Vec<Window>,
    pub events: VecDeque<NativeEvent>,
    /// Returned by the next `poll_event` instead of an event
    pub poll_error: Option<NativeError>,
    pub fail_title: bool,
    pub calls: Vec<Call>,
}

impl FakeLog {
    pub const WM_DELETE_WINDOW: Atom = 300;
    pub const NET_WM_STATE: Atom = 301;
    pub const NET_WM_STATE_FULLSCREEN: Atom = 302;

    pub fn shared() -> Rc<RefCell<Self>> {
        let atoms = [
            ("WM_DELETE_WINDOW", Self::WM_DELETE_WINDOW),
            ("_NET_WM_STATE", Self::NET_WM_STATE),
            ("_NET_WM_STATE_FULLSCREEN", Self::NET_WM_STATE_FULLSCREEN),
        ]
        .into_iter()
        .map(|(name, atom)| (name.to_string(), atom))
        .collect();

        Rc::new(RefCell::new(Self {
            connects: 0,
            refuse_connection: false,
            visuals: vec![0x21, 0x22],
            atoms,
            output_size: Some((1920, 1080)),
            next_id: 0x0040_0001,
            live: Vec::new(),
            created: Vec::new(),
            destroyed: Vec::new(),
            atom_lists: Vec::new(),
            normal_hints: Vec::new(),
            titles: Vec::new(),
            protocols: Vec::new(),
            mapped: Vec::new(),
            events: VecDeque::new(),
            poll_error: None,
            fail_title: false,
            calls: Vec::new(),
        }))
    }
}

pub struct FakeSystem {
    log: Rc<RefCell<FakeLog>>,
}

impl FakeSystem {
    pub fn connect(log: &Rc<RefCell<FakeLog>>) -> Result<Self> {
        let mut state = log.borrow_mut();
        state.connects += 1;
        if state.refuse_connection {
            return Err(NativeError::Connect(ConnectError::IoError(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "fake server refused the connection",
            ))));
        }
        Ok(Self {
            log: Rc::clone(log),
        })
    }
}

impl WindowSystem for FakeSystem {
    fn primary_output_size(&self) -> Result<(u16, u16)> {
        self.log
            .borrow()
            .output_size
            .ok_or_else(|| NativeError::PrimaryOutput {
                step: "get primary output",
                reason: "no primary output is set".to_string(),
            })
    }

    fn create_window(&mut self, request: &WindowRequest) -> Result<NativeWindow> {
        let mut log = self.log.borrow_mut();
        if !log.visuals.contains(&request.visual_id) {
            return Err(NativeError::VisualNotFound(request.visual_id));
        }
        let id = log.next_id;
        log.next_id += 2;
        log.live.push(id);
        log.created.push(*request);
        log.calls.push(Call::Create(id));
        Ok(NativeWindow {
            id,
            colormap: id + 1,
        })
    }

    fn destroy_window(&mut self, window: NativeWindow) -> Result<()> {
        let mut log = self.log.borrow_mut();
        log.live.retain(|&id| id != window.id);
        log.destroyed.push(window.id);
        log.calls.push(Call::Destroy(window.id));
        Ok(())
    }

    fn lookup_atom(&self, name: &str) -> Result<Option<Atom>> {
        Ok(self.log.borrow().atoms.get(name).copied())
    }

    fn set_atom_list(&self, window: Window, property: Atom, values: &[Atom]) -> Result<()> {
        self.log
            .borrow_mut()
            .atom_lists
            .push((window, property, values.to_vec()));
        Ok(())
    }

    fn set_normal_hints(&self, window: Window, hints: &SizeHints) -> Result<()> {
        self.log.borrow_mut().normal_hints.push((window, *hints));
        Ok(())
    }

    fn set_title(&self, _window: Window, title: &str) -> Result<()> {
        let mut log = self.log.borrow_mut();
        if log.fail_title {
            return Err(NativeError::Connection(ConnectionError::UnknownError));
        }
        log.titles.push(title.to_string());
        Ok(())
    }

    fn set_wm_protocols(&self, window: Window, protocols: &[Atom]) -> Result<()> {
        self.log
            .borrow_mut()
            .protocols
            .push((window, protocols.to_vec()));
        Ok(())
    }

    fn map_window(&self, window: Window) -> Result<()> {
        self.log.borrow_mut().mapped.push(window);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn poll_event(&mut self) -> Result<Option<NativeEvent>> {
        let mut log = self.log.borrow_mut();
        if let Some(e) = log.poll_error.take() {
            return Err(e);
        }
        Ok(log.events.pop_front())
    }
}

impl Drop for FakeSystem {
    fn drop(&mut self) {
        self.log.borrow_mut().calls.push(Call::Close);
    }
}
