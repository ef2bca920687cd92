//! X11 Events

use crate::{
    core::{Keycode, Window},
    geometry::Rectangle,
};
use strum_macros::Display;
use x11rb::protocol::{
    xproto::{self, ConfigWindow, ConfigureWindowAux, StackMode},
    Event,
};

// ============================== XEvent ==============================

/// Low-level wrapper around X-server events
///
/// Dispatched to a handler by `WindowManager`
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub(crate) enum XEvent {
    /// A window was created
    CreateNotify(CreateEvent),
    /// A window was destroyed
    DestroyNotify(NotifyEvent),
    /// A window was reparented
    ReparentNotify(ReparentEvent),
    /// Notification that a window has changed its configuration
    ConfigureNotify(ConfigureEvent),
    /// A window was mapped
    MapNotify(NotifyEvent),
    /// A window was unmapped
    UnmapNotify(NotifyEvent),
    /// Request for configuration from a client
    ConfigureRequest(ConfigureRequestData),
    /// A Client is requesting to be mapped
    MapRequest(MapRequestEvent),
    /// A key was pressed
    KeyPress(KeypressEvent),
    /// Event kind without a handler; holds the kind's name
    Unknown(String),
}

/// Data shared by notifications that only name two windows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NotifyEvent {
    /// The window the event was reported to
    pub(crate) event:  Window,
    /// The window the event is about
    pub(crate) window: Window,
}

/// Data associated with a create event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct CreateEvent {
    /// The new window
    pub(crate) window:   Window,
    /// Its parent
    pub(crate) parent:   Window,
    /// Where the window was created
    pub(crate) geom:     Rectangle,
    /// Whether the window is override-redirect
    pub(crate) over_red: bool,
}

/// Data associated with a reparent event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ReparentEvent {
    /// The event window
    pub(crate) event:    Window,
    /// The window that was reparented
    pub(crate) window:   Window,
    /// The new parent window
    pub(crate) parent:   Window,
    /// Whether the window is override-redirect
    pub(crate) over_red: bool,
}

/// Data associated with a configure event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConfigureEvent {
    /// The event window
    pub(crate) event:  Window,
    /// The window associated with the event
    pub(crate) window: Window,
    /// The new geometry of the window
    pub(crate) geom:   Rectangle,
}

/// Data associated with a map request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MapRequestEvent {
    /// The parent of the window
    pub(crate) parent: Window,
    /// The window asking to be mapped
    pub(crate) window: Window,
}

/// Data associated with a configure request
///
/// Only the fields the client marked as present are `Some`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ConfigureRequestData {
    /// The window associated with the event
    pub(crate) id:      Window,
    /// The parent window of id
    pub(crate) parent:  Window,
    /// Changes the client asked for
    pub(crate) changes: WindowChanges,
}

/// A partial geometry/stacking change of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct WindowChanges {
    /// X coordinate to configure to
    pub(crate) x:            Option<i32>,
    /// Y coordinate to configure to
    pub(crate) y:            Option<i32>,
    /// Window width to configure to
    pub(crate) width:        Option<u32>,
    /// Window height to configure to
    pub(crate) height:       Option<u32>,
    /// Border width to configure to
    pub(crate) border_width: Option<u32>,
    /// Sibling window of id. Used if stack_mode is set
    pub(crate) sibling:      Option<Window>,
    /// Stack mode to configure to
    pub(crate) stack_mode:   Option<StackMode>,
}

impl WindowChanges {
    /// Is there nothing to change?
    pub(crate) fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Convert to a [`ConfigureWindowAux`]
    pub(crate) fn to_aux(self) -> ConfigureWindowAux {
        ConfigureWindowAux::new()
            .x(self.x)
            .y(self.y)
            .width(self.width)
            .height(self.height)
            .border_width(self.border_width)
            .sibling(self.sibling)
            .stack_mode(self.stack_mode)
    }
}

/// Data associated with a key press event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct KeypressEvent {
    /// The window the key was pressed in
    pub(crate) window:  Window,
    /// The state of modifier keys was active at the time
    pub(crate) mask:    u16,
    /// The keycode of the key pressed
    pub(crate) keycode: Keycode,
}

/// Is the `bit` set in the `mask`?
fn has(mask: u16, bit: ConfigWindow) -> bool {
    mask & u16::from(bit) != 0
}

impl From<&xproto::ConfigureRequestEvent> for ConfigureRequestData {
    fn from(e: &xproto::ConfigureRequestEvent) -> Self {
        let mask = u16::from(e.value_mask);

        Self {
            id:      e.window,
            parent:  e.parent,
            changes: WindowChanges {
                x:            has(mask, ConfigWindow::X).then(|| i32::from(e.x)),
                y:            has(mask, ConfigWindow::Y).then(|| i32::from(e.y)),
                width:        has(mask, ConfigWindow::WIDTH).then(|| u32::from(e.width)),
                height:       has(mask, ConfigWindow::HEIGHT).then(|| u32::from(e.height)),
                border_width: has(mask, ConfigWindow::BORDER_WIDTH)
                    .then(|| u32::from(e.border_width)),
                sibling:      has(mask, ConfigWindow::SIBLING).then(|| e.sibling),
                stack_mode:   has(mask, ConfigWindow::STACK_MODE).then(|| e.stack_mode),
            },
        }
    }
}

impl From<Event> for XEvent {
    fn from(event: Event) -> Self {
        match event {
            Event::CreateNotify(e) => Self::CreateNotify(CreateEvent {
                window:   e.window,
                parent:   e.parent,
                geom:     Rectangle::new(
                    e.x.into(),
                    e.y.into(),
                    e.width.into(),
                    e.height.into(),
                ),
                over_red: e.override_redirect,
            }),
            Event::DestroyNotify(e) => Self::DestroyNotify(NotifyEvent {
                event:  e.event,
                window: e.window,
            }),
            Event::ReparentNotify(e) => Self::ReparentNotify(ReparentEvent {
                event:    e.event,
                window:   e.window,
                parent:   e.parent,
                over_red: e.override_redirect,
            }),
            Event::ConfigureNotify(e) => Self::ConfigureNotify(ConfigureEvent {
                event:  e.event,
                window: e.window,
                geom:   Rectangle::new(e.x.into(), e.y.into(), e.width.into(), e.height.into()),
            }),
            Event::MapNotify(e) => Self::MapNotify(NotifyEvent {
                event:  e.event,
                window: e.window,
            }),
            Event::UnmapNotify(e) => Self::UnmapNotify(NotifyEvent {
                event:  e.event,
                window: e.window,
            }),
            Event::ConfigureRequest(ref e) => Self::ConfigureRequest(e.into()),
            Event::MapRequest(e) => Self::MapRequest(MapRequestEvent {
                parent: e.parent,
                window: e.window,
            }),
            Event::KeyPress(e) => Self::KeyPress(KeypressEvent {
                window:  e.event,
                mask:    u16::from(e.state),
                keycode: e.detail,
            }),
            other => Self::Unknown(event_name(&other)),
        }
    }
}

/// Name of the event's variant, e.g. `PropertyNotify`
fn event_name(event: &Event) -> String {
    let debug = format!("{:?}", event);
    debug
        .split(|c: char| !c.is_alphanumeric())
        .next()
        .unwrap_or_default()
        .to_owned()
}
