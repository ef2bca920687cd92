//! Errors found throughout this crate

use crate::core::Window;
use thiserror::Error;
use x11rb::errors::ConnectError;

/// Errors that occur from interacting with the X-Server
#[derive(Debug, Error)]
pub(crate) enum Error {
    /// Failure to connect to the server
    #[error("failed to connect to the X11 server: {0}")]
    Connection(#[from] ConnectError),

    /// Another client already holds substructure redirection on the root
    #[error("another window manager is already running on display {display}")]
    ProtocolConflict {
        /// Name of the display that is already managed
        display: String,
    },

    /// The [`Window`] has no frame in the client registry
    #[error("Window({0:#0x}) is not managed")]
    NotManaged(Window),

    /// A color in the configuration could not be parsed
    #[error("invalid color found in configuration: {0}")]
    InvalidColor(String),
}
