//! An in-memory display server used by the tests
//!
//! Several [`MockConn`]s can be opened on one [`MockServer`], which is how a
//! second window manager competing for the same display is modelled

use super::{
    error::{ErrorHandler, XError},
    event::{WindowChanges, XEvent},
    WindowAttributes,
    WindowTree,
    XConn,
};
use crate::{
    core::{
        decoration::{Color, Decoration},
        Atom,
        Window,
    },
    geometry::{Point, Rectangle},
};
use anyhow::{anyhow, Result};
use indexmap::IndexMap;
use std::{
    cell::{Cell, RefCell},
    collections::{HashMap, HashSet, VecDeque},
    rc::Rc,
};
use x11rb::protocol::{xproto::EventMask, ErrorKind};

/// Root window of every [`MockServer`]
pub(crate) const ROOT: Window = 1;

/// Opcodes reported in errors, matching the core protocol
const OP_CHANGE_WINDOW_ATTRIBUTES: u8 = 2;
const OP_DESTROY_WINDOW: u8 = 4;
const OP_CHANGE_SAVE_SET: u8 = 6;
const OP_REPARENT_WINDOW: u8 = 7;
const OP_MAP_WINDOW: u8 = 8;
const OP_UNMAP_WINDOW: u8 = 10;
const OP_CONFIGURE_WINDOW: u8 = 12;

/// A request that was sent to the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Request {
    SelectInput(Window, u32),
    GrabServer,
    UngrabServer,
    QueryTree(Window),
    CreateWindow(Window),
    MapWindow(Window),
    UnmapWindow(Window),
    DestroyWindow(Window),
    AddToSaveSet(Window),
    RemoveFromSaveSet(Window),
    ReparentWindow(Window, Window, Point),
    ConfigureWindow(Window, WindowChanges),
}

impl Request {
    /// Does the request change the server's state?
    pub(crate) const fn is_mutation(&self) -> bool {
        !matches!(self, Self::QueryTree(_))
    }
}

/// A window as the server stores it
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockWindow {
    pub(crate) parent:            Window,
    pub(crate) geom:              Rectangle,
    pub(crate) border_width:      u32,
    pub(crate) mapped:            bool,
    pub(crate) override_redirect: bool,
    pub(crate) border_color:      Option<Color>,
    pub(crate) background:        Option<Color>,
    pub(crate) event_mask:        u32,
    /// Client that created the window, `None` for windows made by tests
    pub(crate) owner:             Option<usize>,
}

#[derive(Debug, Default)]
struct ServerState {
    /// Every window but the root, in creation order
    windows:        IndexMap<Window, MockWindow>,
    /// Client holding substructure redirection per window
    redirect:       HashMap<Window, usize>,
    /// Save-set of every client
    save_sets:      HashMap<usize, HashSet<Window>>,
    /// Every request, tagged with the client that sent it
    requests:       Vec<(usize, Request)>,
    /// Errors waiting to be delivered to each client
    errors:         HashMap<usize, VecDeque<XError>>,
    /// Events waiting to be delivered to each client
    events:         HashMap<usize, VecDeque<XEvent>>,
    atoms:          HashMap<String, Atom>,
    clients:        usize,
    next_atom:      Atom,
    /// Client currently grabbing the server
    grabbed_by:     Option<usize>,
    /// Fail attribute queries for these windows even though they exist
    broken_queries: HashSet<Window>,
    /// No more window ids can be allocated
    ids_exhausted:  bool,
    /// Ungrabbing the server fails as if the connection broke
    broken_ungrab:  bool,
}

impl ServerState {
    fn error(&mut self, client: usize, kind: ErrorKind, code: u8, bad_value: u32, op: u8) {
        self.errors
            .entry(client)
            .or_default()
            .push_back(XError::new(kind, code, bad_value, op));
    }

    fn bad_window(&mut self, client: usize, window: Window, op: u8) {
        self.error(client, ErrorKind::Window, 3, window, op);
    }

    fn exists(&self, window: Window) -> bool {
        window == ROOT || self.windows.contains_key(&window)
    }

    fn is_viewable(&self, window: Window) -> bool {
        let mut current = window;
        while current != ROOT {
            match self.windows.get(&current) {
                Some(w) if w.mapped => current = w.parent,
                _ => return false,
            }
        }
        true
    }

    fn destroy(&mut self, window: Window) {
        let children = self
            .windows
            .iter()
            .filter(|(_, w)| w.parent == window)
            .map(|(id, _)| *id)
            .collect::<Vec<_>>();
        for child in children {
            self.destroy(child);
        }
        self.windows.shift_remove(&window);
        for set in self.save_sets.values_mut() {
            set.remove(&window);
        }
    }
}

// ============================ MockServer ============================

/// Shared state of the fake display
#[derive(Debug, Clone, Default)]
pub(crate) struct MockServer(Rc<RefCell<ServerState>>);

impl MockServer {
    /// Create a server with only a root window
    pub(crate) fn new() -> Self {
        let server = Self::default();
        server.0.borrow_mut().next_atom = 300;
        server
    }

    /// Open a new client connection
    pub(crate) fn connect(&self) -> MockConn {
        let mut state = self.0.borrow_mut();
        let client = state.clients;
        state.clients += 1;

        MockConn {
            server: self.clone(),
            client,
            handler: ErrorHandler::default(),
            next_id: Cell::new(((client as u32) + 1) << 21),
        }
    }

    /// Add a top-level window created by some other application
    pub(crate) fn add_window(&self, id: Window, geom: Rectangle, mapped: bool, over_red: bool) {
        self.0.borrow_mut().windows.insert(id, MockWindow {
            parent: ROOT,
            geom,
            border_width: 0,
            mapped,
            override_redirect: over_red,
            border_color: None,
            background: None,
            event_mask: 0,
            owner: None,
        });
    }

    /// Queue an event for a client
    pub(crate) fn push_event(&self, client: usize, event: XEvent) {
        self.0
            .borrow_mut()
            .events
            .entry(client)
            .or_default()
            .push_back(event);
    }

    /// Make attribute queries for an existing window fail
    pub(crate) fn break_queries(&self, window: Window) {
        self.0.borrow_mut().broken_queries.insert(window);
    }

    /// Make every later window creation fail
    pub(crate) fn exhaust_ids(&self) {
        self.0.borrow_mut().ids_exhausted = true;
    }

    /// Make ungrabbing the server fail
    pub(crate) fn break_ungrab(&self) {
        self.0.borrow_mut().broken_ungrab = true;
    }

    /// Look up a window
    pub(crate) fn window(&self, id: Window) -> Option<MockWindow> {
        self.0.borrow().windows.get(&id).cloned()
    }

    /// Is the window and every one of its ancestors mapped?
    pub(crate) fn is_viewable(&self, id: Window) -> bool {
        self.0.borrow().is_viewable(id)
    }

    /// Is the window in the save-set of the client?
    pub(crate) fn in_save_set(&self, client: usize, id: Window) -> bool {
        self.0
            .borrow()
            .save_sets
            .get(&client)
            .map_or(false, |set| set.contains(&id))
    }

    /// Requests a client has sent so far
    pub(crate) fn requests(&self, client: usize) -> Vec<Request> {
        self.0
            .borrow()
            .requests
            .iter()
            .filter(|(c, _)| *c == client)
            .map(|(_, r)| r.clone())
            .collect()
    }

    /// Number of state-changing requests a client has sent so far
    pub(crate) fn mutations(&self, client: usize) -> usize {
        self.requests(client)
            .iter()
            .filter(|r| r.is_mutation())
            .count()
    }

    /// Client holding substructure redirection on the root window
    pub(crate) fn redirect_owner(&self) -> Option<usize> {
        self.0.borrow().redirect.get(&ROOT).copied()
    }

    /// Client currently grabbing the server
    pub(crate) fn grabbed_by(&self) -> Option<usize> {
        self.0.borrow().grabbed_by
    }
}

// ============================= MockConn =============================

/// One client's connection to a [`MockServer`]
#[derive(Debug)]
pub(crate) struct MockConn {
    server:  MockServer,
    client:  usize,
    handler: ErrorHandler,
    next_id: Cell<Window>,
}

impl MockConn {
    fn record(&self, request: Request) {
        self.server
            .0
            .borrow_mut()
            .requests
            .push((self.client, request));
    }

    /// Hand every queued error to the installed handler
    fn deliver_errors(&self) {
        let errors = self
            .server
            .0
            .borrow_mut()
            .errors
            .remove(&self.client)
            .unwrap_or_default();

        for err in errors {
            self.handler.handle(&err);
        }
    }

    /// Run `f` on the window, or queue a `BadWindow` error
    fn with_window<F>(&self, window: Window, op: u8, f: F)
    where
        F: FnOnce(&mut MockWindow),
    {
        let mut state = self.server.0.borrow_mut();
        match state.windows.get_mut(&window) {
            Some(w) => f(w),
            None => state.bad_window(self.client, window, op),
        }
    }
}

impl XConn for MockConn {
    fn root(&self) -> Window {
        ROOT
    }

    fn display_name(&self) -> &str {
        ":99"
    }

    fn intern_atom(&self, name: &str) -> Result<Atom> {
        let mut state = self.server.0.borrow_mut();
        if let Some(atom) = state.atoms.get(name) {
            return Ok(*atom);
        }
        let atom = state.next_atom;
        state.next_atom += 1;
        state.atoms.insert(name.to_owned(), atom);
        Ok(atom)
    }

    fn set_error_handler(&mut self, handler: ErrorHandler) -> ErrorHandler {
        std::mem::replace(&mut self.handler, handler)
    }

    fn select_input(&self, window: Window, mask: EventMask) -> Result<()> {
        let mask = u32::from(mask);
        self.record(Request::SelectInput(window, mask));

        let mut state = self.server.0.borrow_mut();
        if !state.exists(window) {
            state.bad_window(self.client, window, OP_CHANGE_WINDOW_ATTRIBUTES);
            return Ok(());
        }

        if mask & u32::from(EventMask::SUBSTRUCTURE_REDIRECT) != 0 {
            match state.redirect.get(&window).copied() {
                Some(owner) if owner != self.client => {
                    state.error(
                        self.client,
                        ErrorKind::Access,
                        10,
                        window,
                        OP_CHANGE_WINDOW_ATTRIBUTES,
                    );
                    return Ok(());
                },
                _ => {
                    state.redirect.insert(window, self.client);
                },
            }
        }

        if let Some(w) = state.windows.get_mut(&window) {
            w.event_mask = mask;
        }

        Ok(())
    }

    fn sync(&mut self) -> Result<()> {
        self.deliver_errors();
        Ok(())
    }

    fn grab_server(&self) -> Result<()> {
        self.record(Request::GrabServer);
        self.server.0.borrow_mut().grabbed_by = Some(self.client);
        Ok(())
    }

    fn ungrab_server(&self) -> Result<()> {
        self.record(Request::UngrabServer);
        let mut state = self.server.0.borrow_mut();
        if state.broken_ungrab {
            return Err(anyhow!("failed to ungrab server"));
        }
        state.grabbed_by = None;
        Ok(())
    }

    fn query_tree(&self, window: Window) -> Result<WindowTree> {
        self.record(Request::QueryTree(window));
        let state = self.server.0.borrow();
        if !state.exists(window) {
            return Err(anyhow!("BadWindow: {:#0x}", window));
        }

        Ok(WindowTree {
            root:     ROOT,
            parent:   state.windows.get(&window).map_or(0, |w| w.parent),
            children: state
                .windows
                .iter()
                .filter(|(_, w)| w.parent == window)
                .map(|(id, _)| *id)
                .collect(),
        })
    }

    fn get_window_attributes(&self, window: Window) -> Result<WindowAttributes> {
        let state = self.server.0.borrow();
        if state.broken_queries.contains(&window) {
            return Err(anyhow!("failed to get `GetWindowAttributesReply` reply"));
        }
        let w = state
            .windows
            .get(&window)
            .ok_or_else(|| anyhow!("BadWindow: {:#0x}", window))?;

        Ok(WindowAttributes {
            geom:              w.geom,
            border_width:      w.border_width,
            viewable:          state.is_viewable(window),
            override_redirect: w.override_redirect,
        })
    }

    fn create_simple_window(
        &self,
        parent: Window,
        rect: Rectangle,
        decoration: &Decoration,
    ) -> Result<Window> {
        if self.server.0.borrow().ids_exhausted {
            return Err(anyhow!("failed to generate an ID"));
        }
        let wid = self.next_id.get();
        self.next_id.set(wid + 1);
        self.record(Request::CreateWindow(wid));

        let mut state = self.server.0.borrow_mut();
        state.windows.insert(wid, MockWindow {
            parent,
            geom: rect,
            border_width: u32::from(decoration.border_width),
            mapped: false,
            override_redirect: false,
            border_color: Some(decoration.colors.border),
            background: Some(decoration.colors.background),
            event_mask: 0,
            owner: Some(self.client),
        });

        Ok(wid)
    }

    fn map_window(&self, window: Window) -> Result<()> {
        self.record(Request::MapWindow(window));
        self.with_window(window, OP_MAP_WINDOW, |w| w.mapped = true);
        Ok(())
    }

    fn unmap_window(&self, window: Window) -> Result<()> {
        self.record(Request::UnmapWindow(window));
        self.with_window(window, OP_UNMAP_WINDOW, |w| w.mapped = false);
        Ok(())
    }

    fn destroy_window(&self, window: Window) -> Result<()> {
        self.record(Request::DestroyWindow(window));
        let mut state = self.server.0.borrow_mut();
        if state.windows.contains_key(&window) {
            state.destroy(window);
        } else {
            state.bad_window(self.client, window, OP_DESTROY_WINDOW);
        }
        Ok(())
    }

    fn add_to_save_set(&self, window: Window) -> Result<()> {
        self.record(Request::AddToSaveSet(window));
        let mut state = self.server.0.borrow_mut();
        if state.windows.contains_key(&window) {
            state.save_sets.entry(self.client).or_default().insert(window);
        } else {
            state.bad_window(self.client, window, OP_CHANGE_SAVE_SET);
        }
        Ok(())
    }

    fn remove_from_save_set(&self, window: Window) -> Result<()> {
        self.record(Request::RemoveFromSaveSet(window));
        let mut state = self.server.0.borrow_mut();
        if state.windows.contains_key(&window) {
            state.save_sets.entry(self.client).or_default().remove(&window);
        } else {
            state.bad_window(self.client, window, OP_CHANGE_SAVE_SET);
        }
        Ok(())
    }

    fn reparent_window(&self, window: Window, parent: Window, pnt: Point) -> Result<()> {
        self.record(Request::ReparentWindow(window, parent, pnt));
        let mut state = self.server.0.borrow_mut();
        if !state.exists(parent) {
            state.bad_window(self.client, parent, OP_REPARENT_WINDOW);
            return Ok(());
        }
        match state.windows.get_mut(&window) {
            Some(w) => {
                w.parent = parent;
                w.geom.point = pnt;
            },
            None => state.bad_window(self.client, window, OP_REPARENT_WINDOW),
        }
        Ok(())
    }

    fn configure_window(&self, window: Window, changes: &WindowChanges) -> Result<()> {
        self.record(Request::ConfigureWindow(window, *changes));
        self.with_window(window, OP_CONFIGURE_WINDOW, |w| {
            if let Some(x) = changes.x {
                w.geom.point.x = x;
            }
            if let Some(y) = changes.y {
                w.geom.point.y = y;
            }
            if let Some(width) = changes.width {
                w.geom.dimension.width = width;
            }
            if let Some(height) = changes.height {
                w.geom.dimension.height = height;
            }
            if let Some(border_width) = changes.border_width {
                w.border_width = border_width;
            }
        });
        Ok(())
    }

    fn next_event(&mut self) -> Result<XEvent> {
        self.deliver_errors();
        self.server
            .0
            .borrow_mut()
            .events
            .get_mut(&self.client)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| anyhow!("connection closed"))
    }
}
