//! Input into the window manager

use crate::core::Keycode;
use std::fmt;
use strum::{EnumIter, IntoEnumIterator};
use strum_macros::Display;
use x11rb::protocol::xproto::ModMask as XModMask;

// ============================== ModMask =============================
// ====================================================================

/// Keycode modifier that is held
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter, Display)]
#[strum(serialize_all = "lowercase")]
pub(crate) enum ModMask {
    /// Left or right `shift` key
    Shift,
    /// Caps-lock
    Lock,
    /// Left or right `control` key
    Control,
    /// Modifier 1 as defined in `xmodmap` (usually `alt`)
    Mod1,
    /// Modifier 2 as defined in `xmodmap` (usually `num-lock`)
    Mod2,
    /// Modifier 3 as defined in `xmodmap` (usually blank)
    Mod3,
    /// Modifier 4 as defined in `xmodmap` (usually `super`)
    Mod4,
    /// Modifier 5 as defined or in `xmodmap` (usually `mode_shift`)
    Mod5,
}

impl ModMask {
    /// Was this modifier held in the event's `mask`?
    pub(crate) fn was_held(self, mask: u16) -> bool {
        mask & u16::from(self) > 0
    }

    /// Every modifier held in the `mask`
    pub(crate) fn held(mask: u16) -> Vec<Self> {
        Self::iter().filter(|m| m.was_held(mask)).collect()
    }
}

/// Convert from a [`ModMask`] to an [`x11rb`] [`ModMask`](XModMask)
impl From<ModMask> for XModMask {
    fn from(m: ModMask) -> Self {
        match m {
            ModMask::Shift => Self::SHIFT,
            ModMask::Lock => Self::LOCK,
            ModMask::Control => Self::CONTROL,
            ModMask::Mod1 => Self::M1,
            ModMask::Mod2 => Self::M2,
            ModMask::Mod3 => Self::M3,
            ModMask::Mod4 => Self::M4,
            ModMask::Mod5 => Self::M5,
        }
    }
}

impl From<ModMask> for u16 {
    fn from(m: ModMask) -> Self {
        u16::from(XModMask::from(m))
    }
}

// ============================== Keypress ============================
// ====================================================================

/// A pressed key and the modifiers held with it
#[derive(Debug, PartialEq, Eq, Clone)]
pub(crate) struct Keypress {
    /// Held modifiers
    pub(crate) mods: Vec<ModMask>,
    /// Keycode that was pressed
    pub(crate) code: Keycode,
}

impl Keypress {
    /// Decode the raw state mask of a key event
    pub(crate) fn new(mask: u16, code: Keycode) -> Self {
        Self { mods: ModMask::held(mask), code }
    }
}

impl fmt::Display for Keypress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "keycode {}", self.code)?;
        if !self.mods.is_empty() {
            let mods = self.mods.iter().map(ToString::to_string).collect::<Vec<_>>();
            write!(f, " [{}]", mods.join("+"))?;
        }
        Ok(())
    }
}
