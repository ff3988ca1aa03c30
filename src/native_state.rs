//! Native state contract
//!
//! What the benchmark harness needs from a window system backend: a display
//! connection, a single output window with known geometry and a way to tell
//! when the user wants to stop.

/// Requested or actual properties of the output window
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowProperties {
    pub width: i32,
    pub height: i32,
    pub fullscreen: bool,
    /// Id of the visual the window must be created with
    pub visual_id: u32,
}

impl WindowProperties {
    pub fn new(width: i32, height: i32, fullscreen: bool, visual_id: u32) -> Self {
        Self {
            width,
            height,
            fullscreen,
            visual_id,
        }
    }
}

/// Backend the benchmark renders through
///
/// Failures are reported by return value and logged by the implementation;
/// nothing is retried.
pub trait NativeState {
    /// Handle to the open display connection
    type Display;
    /// Handle identifying the output window
    type Window: Copy;

    /// Open the display connection if it is not open yet.
    ///
    /// Returns whether a connection is held afterwards.
    fn init_display(&mut self) -> bool;

    /// The display connection, if one is open
    fn display(&self) -> Option<&Self::Display>;

    /// Create the output window, or reuse the current one if its geometry
    /// already matches.
    ///
    /// Returns `true` if a window exists afterwards.
    fn create_window(&mut self, properties: WindowProperties) -> bool;

    /// The window handle and its actual properties.
    ///
    /// The properties may differ from the last request, e.g. a fullscreen
    /// window takes the size of the screen.
    fn window(&self) -> (Option<Self::Window>, WindowProperties);

    /// Show the window. Hiding is not supported.
    fn visible(&mut self, visible: bool);

    /// Consume at most one pending event and report whether it asks to quit.
    ///
    /// Never blocks.
    fn should_quit(&mut self) -> bool;
}
