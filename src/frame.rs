//! Wrapping client windows into frames and releasing them again

use crate::{
    bwm_fatal,
    core::Window,
    error::Error,
    geometry::Point,
    manager::WindowManager,
    x::XConn,
};
use anyhow::Result;
use x11rb::protocol::xproto::EventMask;

impl<C: XConn> WindowManager<C> {
    /// Reparent `window` into a newly created frame
    ///
    /// Windows that existed before the window manager started are skipped when
    /// they are override-redirect or not viewable. Returns the frame, or
    /// `None` when the window was skipped. A window that is already managed
    /// keeps its frame
    pub(crate) fn frame(&mut self, window: Window, preexisting: bool) -> Result<Option<Window>> {
        if let Some(frame) = self.registry.frame_of(window) {
            log::debug!("Window({:#0x}) already lives in Frame({:#0x})", window, frame);
            return Ok(Some(frame));
        }

        let conn = self.session.conn();
        let attrs = match conn.get_window_attributes(window) {
            Ok(attrs) => attrs,
            Err(e) => bwm_fatal!(
                "failed to get the attributes of Window({:#0x}): {:#}",
                window,
                e
            ),
        };

        if preexisting && (attrs.override_redirect || !attrs.viewable) {
            log::debug!(
                "not framing Window({:#0x}): override_redirect: {}, viewable: {}",
                window,
                attrs.override_redirect,
                attrs.viewable
            );
            return Ok(None);
        }

        let frame = conn.create_simple_window(self.session.root(), attrs.geom, &self.decoration)?;
        conn.select_input(
            frame,
            EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
        )?;
        // The client survives if the window manager dies
        conn.add_to_save_set(window)?;
        conn.reparent_window(window, frame, Point::ORIGIN)?;
        conn.map_window(frame)?;

        self.registry.insert(window, frame);
        log::info!("framed Window({:#0x}) in Frame({:#0x})", window, frame);

        Ok(Some(frame))
    }

    /// Move a managed window back to the root and destroy its frame
    ///
    /// Returns the destroyed frame
    pub(crate) fn unframe(&mut self, window: Window) -> Result<Window> {
        let frame = self
            .registry
            .frame_of(window)
            .ok_or(Error::NotManaged(window))?;

        let conn = self.session.conn();
        conn.unmap_window(frame)?;
        conn.reparent_window(window, self.session.root(), Point::ORIGIN)?;
        conn.remove_from_save_set(window)?;
        conn.destroy_window(frame)?;

        self.registry.remove(window);
        log::info!("unframed Window({:#0x}) from Frame({:#0x})", window, frame);

        Ok(frame)
    }
}
