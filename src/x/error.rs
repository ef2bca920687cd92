//! Protocol errors reported by the X-Server and the callbacks that receive them

use crate::bwm_assert_eq;
use std::{cell::Cell, fmt, rc::Rc};
use x11rb::{protocol::ErrorKind, x11_utils::X11Error};

// ============================== XError ==============================

/// An error the X-Server sent back for a request that had no reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct XError {
    /// What went wrong
    pub(crate) kind:         ErrorKind,
    /// Raw error code
    pub(crate) code:         u8,
    /// Resource (usually a window) the failed request referred to
    pub(crate) bad_value:    u32,
    /// Opcode of the failed request
    pub(crate) major_opcode: u8,
    /// Minor opcode of the failed request (extensions only)
    pub(crate) minor_opcode: u16,
    /// Sequence number of the failed request
    pub(crate) sequence:     u16,
}

impl XError {
    /// Create an [`XError`] of the given kind for a resource
    pub(crate) const fn new(kind: ErrorKind, code: u8, bad_value: u32, major_opcode: u8) -> Self {
        Self {
            kind,
            code,
            bad_value,
            major_opcode,
            minor_opcode: 0,
            sequence: 0,
        }
    }
}

impl From<X11Error> for XError {
    fn from(e: X11Error) -> Self {
        Self {
            kind:         e.error_kind,
            code:         e.error_code,
            bad_value:    e.bad_value,
            major_opcode: e.major_opcode,
            minor_opcode: e.minor_opcode,
            sequence:     e.sequence,
        }
    }
}

impl fmt::Display for XError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{:?} (code {}) for request {}.{} on resource {:#0x}, sequence {}",
            self.kind,
            self.code,
            self.major_opcode,
            self.minor_opcode,
            self.bad_value,
            self.sequence
        )
    }
}

// =========================== ConflictFlag ===========================

/// Set when another client already holds substructure redirection
///
/// Only meaningful between the start and the end of the startup handshake
#[derive(Debug, Clone, Default)]
pub(crate) struct ConflictFlag(Rc<Cell<bool>>);

impl ConflictFlag {
    /// Clear the flag
    pub(crate) fn reset(&self) {
        self.0.set(false);
    }

    /// Record that another window manager was detected
    pub(crate) fn raise(&self) {
        self.0.set(true);
    }

    /// Was another window manager detected?
    pub(crate) fn is_raised(&self) -> bool {
        self.0.get()
    }
}

// =========================== ErrorHandler ===========================

/// The callback invoked for every [`XError`] the connection receives
#[derive(Debug, Clone)]
pub(crate) enum ErrorHandler {
    /// Installed for the duration of the handshake. An `Access` error means
    /// another client is the window manager
    DetectConflict(ConflictFlag),
    /// Installed once the handshake succeeded. Errors are logged and dropped
    Log,
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::Log
    }
}

impl ErrorHandler {
    /// Handle an error delivered by the server
    pub(crate) fn handle(&self, err: &XError) {
        match self {
            Self::DetectConflict(flag) => {
                bwm_assert_eq!(
                    err.kind,
                    ErrorKind::Access,
                    "unexpected error while checking for another window manager: {}",
                    err
                );
                flag.raise();
            },
            Self::Log => log::error!("X error: {}", err),
        }
    }
}
