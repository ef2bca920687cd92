//! Interacting with the X11 server
//!
//! Everything the window manager needs from the server goes through
//! [`XConn`], which is implemented over a real connection by
//! [`XConnection`](xconnection::XConnection)

pub(crate) mod error;
pub(crate) mod event;
pub(crate) mod input;
#[cfg(test)]
pub(crate) mod mock;
pub(crate) mod utils;
pub(crate) mod xconnection;

use crate::{
    core::{decoration::Decoration, Atom, Window},
    geometry::{Point, Rectangle},
};
use anyhow::Result;
use error::ErrorHandler;
use event::{WindowChanges, XEvent};
use x11rb::protocol::xproto::EventMask;

/// A window's geometry and state, as the server currently sees it
///
/// Never cached; queried again whenever a decision depends on it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct WindowAttributes {
    /// Position and size
    pub(crate) geom:              Rectangle,
    /// Width of the window's own border
    pub(crate) border_width:      u32,
    /// Is the window (and every ancestor) mapped?
    pub(crate) viewable:          bool,
    /// Has the window asked not to be managed?
    pub(crate) override_redirect: bool,
}

/// Result of querying the window tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowTree {
    /// The root of the queried window
    pub(crate) root:     Window,
    /// The parent of the queried window
    pub(crate) parent:   Window,
    /// Children in stacking order, bottom-most first
    pub(crate) children: Vec<Window>,
}

/// The operations the window manager requires from the display server
///
/// Requests without a reply are sent unchecked: an error they cause is
/// delivered later to the installed [`ErrorHandler`]. Only a broken connection
/// is returned as an `Err`
pub(crate) trait XConn {
    /// The root window of the screen being managed
    fn root(&self) -> Window;

    /// Name of the display the connection was opened on
    fn display_name(&self) -> &str;

    /// Resolve a named atom, creating it when missing
    fn intern_atom(&self, name: &str) -> Result<Atom>;

    /// Install a new [`ErrorHandler`], returning the previous one
    fn set_error_handler(&mut self, handler: ErrorHandler) -> ErrorHandler;

    /// Select the events the window manager wants from a window
    fn select_input(&self, window: Window, mask: EventMask) -> Result<()>;

    /// Round-trip to the server. Every error caused by an earlier request is
    /// handed to the [`ErrorHandler`] before this returns
    fn sync(&mut self) -> Result<()>;

    /// Stop the server from processing requests of other clients
    fn grab_server(&self) -> Result<()>;

    /// Undo [`XConn::grab_server`]
    fn ungrab_server(&self) -> Result<()>;

    /// List the children of a window
    fn query_tree(&self, window: Window) -> Result<WindowTree>;

    /// Query a window's geometry and state
    fn get_window_attributes(&self, window: Window) -> Result<WindowAttributes>;

    /// Create an unmapped window with a border
    fn create_simple_window(
        &self,
        parent: Window,
        rect: Rectangle,
        decoration: &Decoration,
    ) -> Result<Window>;

    /// Map a [`Window`], making it visible
    fn map_window(&self, window: Window) -> Result<()>;

    /// Unmap a [`Window`], hiding it
    fn unmap_window(&self, window: Window) -> Result<()>;

    /// Destroy the given [`Window`] and all of its sub-windows
    fn destroy_window(&self, window: Window) -> Result<()>;

    /// Put a [`Window`] into this client's save-set
    fn add_to_save_set(&self, window: Window) -> Result<()>;

    /// Take a [`Window`] out of this client's save-set
    fn remove_from_save_set(&self, window: Window) -> Result<()>;

    /// Make `window` a child of `parent` at the given position
    fn reparent_window(&self, window: Window, parent: Window, pnt: Point) -> Result<()>;

    /// Apply a partial geometry/stacking change
    fn configure_window(&self, window: Window, changes: &WindowChanges) -> Result<()>;

    /// Block until the next event arrives. Errors are routed to the
    /// [`ErrorHandler`] and never returned from here
    fn next_event(&mut self) -> Result<XEvent>;
}
