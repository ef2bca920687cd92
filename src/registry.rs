//! Which client windows are managed, and by which frame

use crate::{core::Window, utils::BuildIdHasher};
use indexmap::IndexMap;

/// Mapping of client windows to the frames they were reparented into
///
/// A client is a key exactly while it is framed, and no two clients share a
/// frame. Only client to frame lookups are ever needed
#[derive(Debug, Default)]
pub(crate) struct ClientRegistry {
    clients: IndexMap<Window, Window, BuildIdHasher>,
}

impl ClientRegistry {
    /// Create an empty [`ClientRegistry`]
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Record that `client` now lives in `frame`
    pub(crate) fn insert(&mut self, client: Window, frame: Window) -> Option<Window> {
        debug_assert!(
            !self.clients.values().any(|f| *f == frame),
            "Frame({:#0x}) already belongs to a client",
            frame
        );
        log::trace!("registering Window({:#0x}) -> Frame({:#0x})", client, frame);
        self.clients.insert(client, frame)
    }

    /// The frame of a managed client
    pub(crate) fn frame_of(&self, client: Window) -> Option<Window> {
        self.clients.get(&client).copied()
    }

    /// Is the window a managed client?
    pub(crate) fn contains(&self, client: Window) -> bool {
        self.clients.contains_key(&client)
    }

    /// Forget a client, returning its frame
    pub(crate) fn remove(&mut self, client: Window) -> Option<Window> {
        log::trace!("unregistering Window({:#0x})", client);
        self.clients.shift_remove(&client)
    }

    /// Number of managed clients
    pub(crate) fn len(&self) -> usize {
        self.clients.len()
    }
}
