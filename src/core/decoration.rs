use crate::{config::Config, error::Error};
use anyhow::{Context, Result};

// =========================== Decoration =============================
// ====================================================================

pub(crate) type Color = u32;

/// How every frame created by the window manager looks
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Decoration {
    /// Width of the border drawn around the frame
    pub(crate) border_width: u16,
    /// Colors of the frame
    pub(crate) colors:       Colorscheme,
}

impl Decoration {
    /// Border width and colors used when nothing else is configured
    pub(crate) const DEFAULT: Self = Self {
        border_width: 3,
        colors:       Colorscheme::DEFAULT,
    };

    /// Create a new [`Decoration`] from the user's [`Config`]
    pub(crate) fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            border_width: config.global.border_width,
            colors:       Colorscheme::new(config)?,
        })
    }
}

impl Default for Decoration {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// =========================== Colorscheme ============================
// ====================================================================

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct Colorscheme {
    pub(crate) border:     Color,
    pub(crate) background: Color,
}

macro_rules! if_6 {
    ($c:ident) => {
        ($c.len() == 6).then(|| $c)
    };
}

/// Convert `#rrggbb`, `0xrrggbb` or `rrggbb` into a [`Color`]
pub(crate) fn to_hex(s: &str) -> Result<Color> {
    let trim = s.strip_prefix("0x").map_or_else(
        || s.strip_prefix('#').map_or_else(|| if_6!(s), |c| if_6!(c)),
        |c| if_6!(c),
    );

    if let Some(color) = trim {
        return u32::from_str_radix(color, 16).context(format!("failed to convert {} to hex", s));
    }

    Err(Error::InvalidColor(s.to_owned()).into())
}

impl Colorscheme {
    /// Red border on a blue background
    pub(crate) const DEFAULT: Self = Self {
        border:     0xFF_0000,
        background: 0x00_00FF,
    };

    /// Create a new [`Colorscheme`]
    pub(crate) fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            border:     to_hex(&config.global.border_color)?,
            background: to_hex(&config.global.background_color)?,
        })
    }
}

impl Default for Colorscheme {
    fn default() -> Self {
        Self::DEFAULT
    }
}
