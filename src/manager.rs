//! The window manager: startup and the event loop

use crate::{
    bwm_assert_eq,
    bwm_fatal,
    core::decoration::Decoration,
    diagnostic::DiagnosticLog,
    registry::ClientRegistry,
    session::Session,
    x::{event::XEvent, XConn},
};
use anyhow::Result;

// =========================== WindowManager ========================== [[[

/// State shared by every event handler
pub(crate) struct WindowManager<C: XConn> {
    /// Connection and root window
    pub(crate) session:    Session<C>,
    /// Managed clients and their frames
    pub(crate) registry:   ClientRegistry,
    /// Border and colors every frame is created with
    pub(crate) decoration: Decoration,
    /// Checkpoint file
    pub(crate) diagnostic: DiagnosticLog,
}

impl<C: XConn> WindowManager<C> {
    /// Create a new [`WindowManager`]
    pub(crate) fn new(
        session: Session<C>,
        decoration: Decoration,
        diagnostic: DiagnosticLog,
    ) -> Self {
        log::debug!("frame decoration: {:?}", decoration);
        Self {
            session,
            registry: ClientRegistry::new(),
            decoration,
            diagnostic,
        }
    }

    /// Take over the display and frame the windows that already exist
    ///
    /// Nothing is touched when another window manager is running
    pub(crate) fn startup(&mut self) -> Result<()> {
        self.session.become_wm()?;
        log::debug!("resolved protocols: {:?}", self.session.protocols());

        self.scan_windows()?;
        self.diagnostic.checkpoint("startup framing complete");
        log::info!("managing {} pre-existing windows", self.registry.len());

        Ok(())
    }

    /// Run the window manager
    ///
    /// Only returns when startup fails or the connection breaks
    pub(crate) fn run(&mut self) -> Result<()> {
        self.startup()?;

        loop {
            let event = self.session.conn_mut().next_event()?;
            self.diagnostic
                .checkpoint(format_args!("received event: {}", event));
            self.handle_event(event)?;
        }
    }

    /// Frame every top-level window, with the server grabbed so that no
    /// client can map a window in between
    fn scan_windows(&mut self) -> Result<()> {
        self.session.conn().grab_server()?;
        let framed = self.frame_toplevels();
        let ungrabbed = self.session.conn().ungrab_server();

        framed?;
        ungrabbed
    }

    /// Frame the root's children, in the order the server lists them
    fn frame_toplevels(&mut self) -> Result<()> {
        let root = self.session.root();
        let tree = match self.session.conn().query_tree(root) {
            Ok(tree) => tree,
            Err(e) => bwm_fatal!("failed to query the window tree: {:#}", e),
        };
        bwm_assert_eq!(tree.root, root, "queried root does not match the session's root");

        for window in tree.children {
            self.frame(window, true)?;
        }

        Ok(())
    }

    /// Route an event to its handler
    pub(crate) fn handle_event(&mut self, event: XEvent) -> Result<()> {
        log::trace!("handling event: {:?}", event);
        match event {
            XEvent::CreateNotify(e) => self.handle_create_notify(&e),
            XEvent::DestroyNotify(e) => self.handle_destroy_notify(&e),
            XEvent::ReparentNotify(e) => self.handle_reparent_notify(&e),
            XEvent::ConfigureNotify(e) => self.handle_configure_notify(&e),
            XEvent::MapNotify(e) => self.handle_map_notify(&e),
            XEvent::UnmapNotify(e) => return self.handle_unmap_notify(&e),
            XEvent::ConfigureRequest(e) => return self.handle_configure_request(&e),
            XEvent::MapRequest(e) => return self.handle_map_request(&e),
            XEvent::KeyPress(e) => self.handle_key_press(&e),
            XEvent::Unknown(name) => log::warn!("ignored event: {}", name),
        }

        Ok(())
    }
}

// ]]] === WindowManager ===
