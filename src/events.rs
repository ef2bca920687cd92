//! Handlers for the events the window manager receives

use crate::{
    error::Error,
    manager::WindowManager,
    x::{
        event::{
            ConfigureEvent,
            ConfigureRequestData,
            CreateEvent,
            KeypressEvent,
            MapRequestEvent,
            NotifyEvent,
            ReparentEvent,
        },
        input::Keypress,
        XConn,
    },
};
use anyhow::Result;

impl<C: XConn> WindowManager<C> {
    pub(crate) fn handle_create_notify(&self, e: &CreateEvent) {
        log::info!(
            "Window({:#0x}) created under Window({:#0x}) at {}, override_redirect: {}",
            e.window,
            e.parent,
            e.geom,
            e.over_red
        );
    }

    pub(crate) fn handle_destroy_notify(&self, e: &NotifyEvent) {
        log::info!("Window({:#0x}) destroyed, reported to Window({:#0x})", e.window, e.event);
    }

    pub(crate) fn handle_reparent_notify(&self, e: &ReparentEvent) {
        log::info!(
            "Window({:#0x}) reparented to Window({:#0x}), reported to Window({:#0x}), \
             override_redirect: {}",
            e.window,
            e.parent,
            e.event,
            e.over_red
        );
    }

    pub(crate) fn handle_configure_notify(&self, e: &ConfigureEvent) {
        log::info!(
            "Window({:#0x}) configured: {}, reported to Window({:#0x})",
            e.window,
            e.geom,
            e.event
        );
    }

    pub(crate) fn handle_map_notify(&self, e: &NotifyEvent) {
        log::info!("Window({:#0x}) mapped, reported to Window({:#0x})", e.window, e.event);
    }

    /// Unmaps of managed clients, and unmaps reported through the root, are
    /// ignored. Anything else is released from its frame
    pub(crate) fn handle_unmap_notify(&mut self, e: &NotifyEvent) -> Result<()> {
        if self.registry.contains(e.window) {
            log::info!("ignoring UnmapNotify for non-client Window({:#0x})", e.window);
            return Ok(());
        }
        if e.event == self.session.root() {
            log::info!(
                "ignoring UnmapNotify for reparented pre-existing Window({:#0x})",
                e.window
            );
            return Ok(());
        }

        match self.unframe(e.window) {
            Ok(_) => Ok(()),
            Err(err) => match err.downcast_ref::<Error>() {
                Some(Error::NotManaged(_)) => {
                    log::warn!("cannot unframe: {}", err);
                    Ok(())
                },
                _ => Err(err),
            },
        }
    }

    /// Forward the requested changes to the client's frame
    pub(crate) fn handle_configure_request(&self, e: &ConfigureRequestData) -> Result<()> {
        let frame = match self.registry.frame_of(e.id) {
            Some(frame) => frame,
            None => {
                log::debug!("ignoring ConfigureRequest for unmanaged Window({:#0x})", e.id);
                return Ok(());
            },
        };

        if e.changes.is_empty() {
            log::debug!(
                "ConfigureRequest for Window({:#0x}) in Window({:#0x}) changes nothing",
                e.id,
                e.parent
            );
        }

        self.session.conn().configure_window(frame, &e.changes)?;
        log::info!("configured Frame({:#0x}) of Window({:#0x})", frame, e.id);

        Ok(())
    }

    /// Frame the window, then show it
    pub(crate) fn handle_map_request(&mut self, e: &MapRequestEvent) -> Result<()> {
        log::debug!("Window({:#0x}) in Window({:#0x}) asks to be mapped", e.window, e.parent);
        self.frame(e.window, false)?;
        self.session.conn().map_window(e.window)
    }

    pub(crate) fn handle_key_press(&mut self, e: &KeypressEvent) {
        let key = Keypress::new(e.mask, e.keycode);
        log::debug!("key pressed in Window({:#0x}): {}", e.window, key);
        self.diagnostic.checkpoint(format_args!("key pressed: {}", key));
    }
}
