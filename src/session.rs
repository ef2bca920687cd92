//! The session with the display server and the startup handshake

use crate::{
    core::{Protocols, Window, WM_DELETE_WINDOW_NAME, WM_PROTOCOLS_NAME},
    error::Error,
    x::{
        error::{ConflictFlag, ErrorHandler},
        utils::XUtility,
        xconnection::XConnection,
        XConn,
    },
};
use anyhow::Result;
use x11rb::protocol::xproto::EventMask;

// ============================== Session ============================= [[[

/// The connection to the display server and what was resolved through it
///
/// Created once. Dropping it closes the connection
pub(crate) struct Session<C: XConn> {
    /// Connection to the display server
    conn:      C,
    /// The managed root window
    root:      Window,
    /// Atoms of the window-closing protocol
    protocols: Protocols,
    /// Set by the handshake's error handler when redirection is denied.
    /// Cleared when the handshake starts and again when it ends
    conflict:  ConflictFlag,
}

impl Session<XConnection> {
    /// Connect to `display`, or to `$DISPLAY` when `None`
    pub(crate) fn open(display: Option<&str>) -> Result<Self> {
        let name = XUtility::display_name(display);
        log::debug!("opening display {}", name);

        let (conn, screen_num) = XUtility::setup_connection(display).map_err(|e| {
            log::error!("failed to open X display {}: {}", name, e);
            e
        })?;

        Self::new(XConnection::new(conn, screen_num, name))
    }
}

impl<C: XConn> Session<C> {
    /// Create a [`Session`] over an established connection
    pub(crate) fn new(conn: C) -> Result<Self> {
        let root = conn.root();
        let protocols = Protocols {
            wm_protocols:     conn.intern_atom(WM_PROTOCOLS_NAME)?,
            wm_delete_window: conn.intern_atom(WM_DELETE_WINDOW_NAME)?,
        };

        log::info!(
            "connected to display {}, root: Window({:#0x})",
            conn.display_name(),
            root
        );

        Ok(Self {
            conn,
            root,
            protocols,
            conflict: ConflictFlag::default(),
        })
    }

    /// The connection to the display server
    pub(crate) fn conn(&self) -> &C {
        &self.conn
    }

    /// Mutable access to the connection
    pub(crate) fn conn_mut(&mut self) -> &mut C {
        &mut self.conn
    }

    /// The managed root window
    pub(crate) fn root(&self) -> Window {
        self.root
    }

    /// Atoms resolved when the session was opened
    pub(crate) fn protocols(&self) -> Protocols {
        self.protocols
    }

    /// Name of the connected display
    pub(crate) fn display_name(&self) -> &str {
        self.conn.display_name()
    }

    /// Claim substructure redirection on the root window
    ///
    /// Fails with [`Error::ProtocolConflict`] when another window manager
    /// already holds it. On success every later server error is only logged
    pub(crate) fn become_wm(&mut self) -> Result<()> {
        self.conflict.reset();
        self.conn
            .set_error_handler(ErrorHandler::DetectConflict(self.conflict.clone()));

        self.conn.select_input(
            self.root,
            EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
        )?;
        // Any denial is only delivered asynchronously
        self.conn.sync()?;

        let detected = self.conflict.is_raised();
        self.conflict.reset();

        if detected {
            log::error!(
                "detected another window manager on display {}",
                self.display_name()
            );
            return Err(Error::ProtocolConflict {
                display: self.display_name().to_owned(),
            }
            .into());
        }

        self.conn.set_error_handler(ErrorHandler::Log);
        log::debug!("substructure redirection acquired on Window({:#0x})", self.root);

        Ok(())
    }
}

impl<C: XConn> Drop for Session<C> {
    fn drop(&mut self) {
        log::info!("closing the connection to display {}", self.display_name());
    }
}

// ]]] === Session ===
