//! Various utilities specifically dealing with X

use crate::error::Error;
use std::env;
use x11rb::rust_connection::RustConnection;

// ============================= XUtility =============================

/// Wrapper to do basic X11 commands
pub(crate) struct XUtility;

impl XUtility {
    /// Setup the X11 [`Connection`](RustConnection)
    ///
    /// `None` uses the `DISPLAY` environment variable
    pub(crate) fn setup_connection(
        display: Option<&str>,
    ) -> Result<(RustConnection, usize), Error> {
        RustConnection::connect(display).map_err(Error::Connection)
    }

    /// Name of the display a connection would be opened on
    pub(crate) fn display_name(display: Option<&str>) -> String {
        display.map_or_else(
            || env::var("DISPLAY").unwrap_or_default(),
            ToOwned::to_owned,
        )
    }
}
