//! Base types used throughout [`bwm`]

pub(crate) mod decoration;

// Re-export
pub(crate) use x11rb::protocol::xproto::{Atom, Keycode, Window};

/// Window manager's name
#[macro_export]
macro_rules! WM_NAME (
    () => { "bwm" };
);

/// Name of the diagnostic log when none is configured
pub(crate) const DIAGNOSTIC_LOG_NAME: &str = "latest_log.txt";

/// Name of the protocol-list atom
pub(crate) const WM_PROTOCOLS_NAME: &str = "WM_PROTOCOLS";

/// Name of the "close window" protocol atom
pub(crate) const WM_DELETE_WINDOW_NAME: &str = "WM_DELETE_WINDOW";

/// The two protocol identifiers resolved when a session is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Protocols {
    /// `WM_PROTOCOLS`, the property listing the protocols a client takes part in
    pub(crate) wm_protocols:     Atom,
    /// `WM_DELETE_WINDOW`, the "close window" protocol
    pub(crate) wm_delete_window: Atom,
}
