//! The connection to the X-Server

use super::{
    error::{ErrorHandler, XError},
    event::{WindowChanges, XEvent},
    WindowAttributes,
    WindowTree,
    XConn,
};
use crate::{
    bwm_assert,
    core::{decoration::Decoration, Atom, Window},
    geometry::{Point, Rectangle},
};
use anyhow::{Context, Result};
use std::collections::VecDeque;
use x11rb::{
    connection::Connection,
    protocol::{
        xproto::{
            ChangeWindowAttributesAux,
            ConnectionExt,
            CreateWindowAux,
            EventMask,
            MapState,
            SetMode,
            WindowClass as XWindowClass,
        },
        Event,
    },
    rust_connection::RustConnection,
    wrapper::ConnectionExt as _,
};

// ============================ XConnection =========================== [[[

/// The main connection to the X-Server
pub(crate) struct XConnection {
    /// Connection to the X-Server
    conn:    RustConnection,
    /// Root window of the managed screen
    root:    Window,
    /// Name of the display
    display: String,
    /// Callback for errors the server reports
    handler: ErrorHandler,
    /// Events read while looking for errors during a sync
    pending: VecDeque<Event>,
}

impl XConnection {
    /// Create a new [`XConnection`]
    pub(crate) fn new(conn: RustConnection, screen_num: usize, display: String) -> Self {
        log::trace!("creating a new `XConnection` on screen {}", screen_num);
        let roots = &conn.setup().roots;
        bwm_assert!(
            screen_num < roots.len(),
            "screen {} does not exist on display {}",
            screen_num,
            display
        );
        let root = roots[screen_num].root;

        Self {
            conn,
            root,
            display,
            handler: ErrorHandler::default(),
            pending: VecDeque::new(),
        }
    }

    /// Flush all pending requests to the X-Server
    fn flush(&self) -> Result<()> {
        log::trace!("flushing requests to the X-Server");
        self.conn
            .flush()
            .context("failed to flush requests to the X-Server")
    }

    /// Hand an error to the installed [`ErrorHandler`]
    fn dispatch_error(&self, err: XError) {
        log::trace!("dispatching error: {}", err);
        self.handler.handle(&err);
    }
}

// ]]] === XConnection ===

impl XConn for XConnection {
    fn root(&self) -> Window {
        self.root
    }

    fn display_name(&self) -> &str {
        &self.display
    }

    fn intern_atom(&self, name: &str) -> Result<Atom> {
        log::debug!("interning an atom: {}", name);
        Ok(self
            .conn
            .intern_atom(false, name.as_bytes())
            .context("failed to get `InternAtomReply`")?
            .reply()
            .context(format!("failed to get `InternAtomReply` reply for {}", name))?
            .atom)
    }

    fn set_error_handler(&mut self, handler: ErrorHandler) -> ErrorHandler {
        log::debug!("installing error handler: {:?}", handler);
        std::mem::replace(&mut self.handler, handler)
    }

    fn select_input(&self, window: Window, mask: EventMask) -> Result<()> {
        log::debug!("selecting input on Window({:#0x})", window);
        self.conn
            .change_window_attributes(window, &ChangeWindowAttributesAux::new().event_mask(mask))
            .context(format!("failed to select input on Window({:#0x})", window))?;

        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        log::debug!("syncing with the X-Server");
        self.conn
            .sync()
            .context("failed to sync with the X-Server")?;

        // The round-trip guarantees every error for earlier requests is queued
        while let Some(event) = self
            .conn
            .poll_for_event()
            .context("failed to poll for next event")?
        {
            match event {
                Event::Error(e) => self.dispatch_error(e.into()),
                other => self.pending.push_back(other),
            }
        }

        Ok(())
    }

    fn grab_server(&self) -> Result<()> {
        log::debug!("grabbing the server");
        self.conn.grab_server().context("failed to grab server")?;
        Ok(())
    }

    fn ungrab_server(&self) -> Result<()> {
        log::debug!("ungrabbing the server");
        self.conn.ungrab_server().context("failed to ungrab server")?;
        self.flush()
    }

    fn query_tree(&self, window: Window) -> Result<WindowTree> {
        log::debug!("requesting a `QueryTreeReply` reply");
        let reply = self
            .conn
            .query_tree(window)
            .context("failed to get `QueryTreeReply`")?
            .reply()
            .context("failed to get `QueryTreeReply` reply")?;

        Ok(WindowTree {
            root:     reply.root,
            parent:   reply.parent,
            children: reply.children,
        })
    }

    fn get_window_attributes(&self, window: Window) -> Result<WindowAttributes> {
        log::debug!("requesting attributes of Window({:#0x})", window);
        let attrs = self
            .conn
            .get_window_attributes(window)
            .context("failed to get `GetWindowAttributesReply`")?;
        let geom = self
            .conn
            .get_geometry(window)
            .context("failed to get `GetGeometryReply`")?;

        let attrs = attrs
            .reply()
            .context("failed to get `GetWindowAttributesReply` reply")?;
        let geom = geom.reply().context("failed to get `GetGeometryReply` reply")?;

        Ok(WindowAttributes {
            geom:              Rectangle::new(
                geom.x.into(),
                geom.y.into(),
                geom.width.into(),
                geom.height.into(),
            ),
            border_width:      geom.border_width.into(),
            viewable:          attrs.map_state == MapState::VIEWABLE,
            override_redirect: attrs.override_redirect,
        })
    }

    fn create_simple_window(
        &self,
        parent: Window,
        rect: Rectangle,
        decoration: &Decoration,
    ) -> Result<Window> {
        log::debug!("creating a frame: Rectangle({})", rect);
        let wid = self.conn.generate_id().context("failed to generate an ID")?;
        let aux = CreateWindowAux::new()
            .border_pixel(decoration.colors.border)
            .background_pixel(decoration.colors.background);

        self.conn
            .create_window(
                x11rb::COPY_DEPTH_FROM_PARENT,
                wid,
                parent,
                rect.point.x as i16,
                rect.point.y as i16,
                rect.dimension.width as u16,
                rect.dimension.height as u16,
                decoration.border_width,
                XWindowClass::INPUT_OUTPUT,
                x11rb::COPY_FROM_PARENT,
                &aux,
            )
            .context(format!("failed to create Window({:#0x})", wid))?;

        Ok(wid)
    }

    fn map_window(&self, window: Window) -> Result<()> {
        log::debug!("attempting to map Window({:#0x})", window);
        self.conn
            .map_window(window)
            .context(format!("failed to map Window({:#0x})", window))?;

        Ok(())
    }

    fn unmap_window(&self, window: Window) -> Result<()> {
        log::debug!("attempting to unmap Window({:#0x})", window);
        self.conn
            .unmap_window(window)
            .context(format!("failed to unmap Window({:#0x})", window))?;

        Ok(())
    }

    fn destroy_window(&self, window: Window) -> Result<()> {
        log::debug!("attempting to destroy Window({:#0x})", window);
        self.conn
            .destroy_window(window)
            .context(format!("failed to destroy Window({:#0x})", window))?;

        Ok(())
    }

    fn add_to_save_set(&self, window: Window) -> Result<()> {
        log::debug!("inserting Window({:#0x}) into the save-set", window);
        self.conn
            .change_save_set(SetMode::INSERT, window)
            .context(format!(
                "failed to `change_save_set` for Window({:#0x})",
                window
            ))?;

        Ok(())
    }

    fn remove_from_save_set(&self, window: Window) -> Result<()> {
        log::debug!("removing Window({:#0x}) from the save-set", window);
        self.conn
            .change_save_set(SetMode::DELETE, window)
            .context(format!(
                "failed to `change_save_set` for Window({:#0x})",
                window
            ))?;

        Ok(())
    }

    fn reparent_window(&self, window: Window, parent: Window, pnt: Point) -> Result<()> {
        log::debug!(
            "attempting to reparent Window({:#0x}) to Window({:#0x})",
            window,
            parent
        );
        self.conn
            .reparent_window(window, parent, pnt.x as i16, pnt.y as i16)
            .context(format!(
                "failed to reparent Window({:#0x}) to Window({:#0x})",
                window, parent
            ))?;

        Ok(())
    }

    fn configure_window(&self, window: Window, changes: &WindowChanges) -> Result<()> {
        log::debug!("configuring Window({:#0x}): {:?}", window, changes);
        self.conn
            .configure_window(window, &changes.to_aux())
            .context(format!("failed to configure Window({:#0x})", window))?;

        Ok(())
    }

    fn next_event(&mut self) -> Result<XEvent> {
        loop {
            let event = match self.pending.pop_front() {
                Some(event) => event,
                None => {
                    self.flush()?;
                    log::trace!("waiting for an event");
                    self.conn
                        .wait_for_event()
                        .context("failed to wait for next event")?
                },
            };

            match event {
                Event::Error(e) => self.dispatch_error(e.into()),
                other => return Ok(other.into()),
            }
        }
    }
}

impl Drop for XConnection {
    fn drop(&mut self) {
        log::debug!("dropping the connection to {}", self.display);
        drop(self.conn.flush());
    }
}
