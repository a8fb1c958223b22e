//! Theme identifiers and palettes.
//!
//! A theme is a closed set of named colors consumed by the gauge widgets.
//! Resolution is total: any unknown, empty or missing identifier (for example
//! a hand-edited query string) yields [`ThemeId::default`].
//!
//! # Palette Roles
//!
//! | Field | Used for |
//! |-------|----------|
//! | `accent`, `accent_soft`, `accent_deep` | RPM arc gradient stops, ring fills |
//! | `track` | Background arc and ring tracks |
//! | `tick`, `tick_label` | Static scale layer |
//! | `text`, `text_muted` | Numeric readouts, unit and gauge labels |
//! | `glow`, `glow_soft` | Halo under the arc fill and beam |
//! | `needle` | Needle / beam core |
//!
//! Changing the active theme invalidates the cached static layer (see
//! [`GaugeRenderer::set_theme`](crate::render::GaugeRenderer::set_theme)).

use core::fmt;
use core::str::FromStr;

use embedded_graphics::pixelcolor::Rgb888;

use crate::colors::{BLACK, hex};

// =============================================================================
// Theme Identifier
// =============================================================================

/// One of the nine built-in themes.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Debug)]
pub enum ThemeId {
    /// Magenta arc, cyan readout. Baseline look.
    #[default]
    Neon,
    Teal,
    Ember,
    Arctic,
    Crimson,
    Lime,
    Amber,
    Violet,
    Mono,
}

impl ThemeId {
    pub const ALL: [Self; 9] = [
        Self::Neon,
        Self::Teal,
        Self::Ember,
        Self::Arctic,
        Self::Crimson,
        Self::Lime,
        Self::Amber,
        Self::Violet,
        Self::Mono,
    ];

    /// Identifier as accepted from configuration and query strings.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Neon => "neon",
            Self::Teal => "teal",
            Self::Ember => "ember",
            Self::Arctic => "arctic",
            Self::Crimson => "crimson",
            Self::Lime => "lime",
            Self::Amber => "amber",
            Self::Violet => "violet",
            Self::Mono => "mono",
        }
    }

    /// Resolve an optional external identifier, falling back to the default.
    pub fn resolve(name: Option<&str>) -> Self { name.and_then(|n| n.parse().ok()).unwrap_or_default() }

    /// Resolve the `theme` parameter of a URL query string.
    ///
    /// Accepts `"?theme=ember&x=1"` or `"theme=ember"`. Missing or unknown
    /// values give the default theme.
    pub fn from_query(query: &str) -> Self {
        let value = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| *key == "theme")
            .map(|(_, value)| value);
        Self::resolve(value)
    }

    /// Next theme in `ALL` order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Palette for this theme.
    pub const fn palette(self) -> &'static ThemePalette {
        match self {
            Self::Neon => &NEON,
            Self::Teal => &TEAL,
            Self::Ember => &EMBER,
            Self::Arctic => &ARCTIC,
            Self::Crimson => &CRIMSON,
            Self::Lime => &LIME,
            Self::Amber => &AMBER,
            Self::Violet => &VIOLET,
            Self::Mono => &MONO,
        }
    }
}

/// Unrecognised theme name.
#[derive(Debug, PartialEq, Eq)]
pub struct UnknownTheme;

impl FromStr for ThemeId {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(s))
            .ok_or(UnknownTheme)
    }
}

impl fmt::Display for ThemeId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Palette for an optional external identifier.
#[inline]
pub fn resolve(name: Option<&str>) -> &'static ThemePalette { ThemeId::resolve(name).palette() }

// =============================================================================
// Palettes
// =============================================================================

/// Immutable set of colors for one theme.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct ThemePalette {
    pub accent: Rgb888,
    pub accent_soft: Rgb888,
    pub accent_deep: Rgb888,
    pub track: Rgb888,
    pub tick: Rgb888,
    pub tick_label: Rgb888,
    pub text: Rgb888,
    pub text_muted: Rgb888,
    pub glow: Rgb888,
    pub glow_soft: Rgb888,
    pub needle: Rgb888,
    pub background: Rgb888,
}

pub static NEON: ThemePalette = ThemePalette {
    accent: hex(0xff00ff),
    accent_soft: hex(0xd64cff),
    accent_deep: hex(0x8a00b8),
    track: hex(0x1c1c20),
    tick: hex(0x737373),
    tick_label: hex(0xffffff),
    text: hex(0x00ffff),
    text_muted: hex(0x9ca3af),
    glow: hex(0x00ffff),
    glow_soft: hex(0x004d4d),
    needle: hex(0xffffff),
    background: BLACK,
};

pub static TEAL: ThemePalette = ThemePalette {
    accent: hex(0x14b8a6),
    accent_soft: hex(0x5eead4),
    accent_deep: hex(0x0f766e),
    track: hex(0x102422),
    tick: hex(0x4f8f88),
    tick_label: hex(0xccfbf1),
    text: hex(0x2dd4bf),
    text_muted: hex(0x7fa8a3),
    glow: hex(0x2dd4bf),
    glow_soft: hex(0x0b3b36),
    needle: hex(0xf0fdfa),
    background: BLACK,
};

pub static EMBER: ThemePalette = ThemePalette {
    accent: hex(0xff6a00),
    accent_soft: hex(0xffb347),
    accent_deep: hex(0xb33900),
    track: hex(0x2a1608),
    tick: hex(0x8f5a3a),
    tick_label: hex(0xffe0c2),
    text: hex(0xffa04d),
    text_muted: hex(0xb08a6e),
    glow: hex(0xff7a1a),
    glow_soft: hex(0x4a1f00),
    needle: hex(0xfff1e0),
    background: BLACK,
};

pub static ARCTIC: ThemePalette = ThemePalette {
    accent: hex(0x38bdf8),
    accent_soft: hex(0xbae6fd),
    accent_deep: hex(0x0369a1),
    track: hex(0x0f1d29),
    tick: hex(0x6b8aa3),
    tick_label: hex(0xe0f2fe),
    text: hex(0x7dd3fc),
    text_muted: hex(0x8aa4b8),
    glow: hex(0x38bdf8),
    glow_soft: hex(0x0b2e44),
    needle: hex(0xf0f9ff),
    background: BLACK,
};

pub static CRIMSON: ThemePalette = ThemePalette {
    accent: hex(0xe11d48),
    accent_soft: hex(0xfb7185),
    accent_deep: hex(0x881337),
    track: hex(0x2a0d14),
    tick: hex(0x8a4652),
    tick_label: hex(0xffe4e6),
    text: hex(0xf43f5e),
    text_muted: hex(0xa8838a),
    glow: hex(0xe11d48),
    glow_soft: hex(0x3d0815),
    needle: hex(0xfff1f2),
    background: BLACK,
};

pub static LIME: ThemePalette = ThemePalette {
    accent: hex(0x84cc16),
    accent_soft: hex(0xd9f99d),
    accent_deep: hex(0x3f6212),
    track: hex(0x18220a),
    tick: hex(0x6d8a45),
    tick_label: hex(0xecfccb),
    text: hex(0xa3e635),
    text_muted: hex(0x94a37a),
    glow: hex(0x84cc16),
    glow_soft: hex(0x243b06),
    needle: hex(0xf7fee7),
    background: BLACK,
};

pub static AMBER: ThemePalette = ThemePalette {
    accent: hex(0xf59e0b),
    accent_soft: hex(0xfcd34d),
    accent_deep: hex(0x92400e),
    track: hex(0x261b07),
    tick: hex(0x8f7439),
    tick_label: hex(0xfef3c7),
    text: hex(0xfbbf24),
    text_muted: hex(0xab9a70),
    glow: hex(0xf59e0b),
    glow_soft: hex(0x3f2a03),
    needle: hex(0xfffbeb),
    background: BLACK,
};

pub static VIOLET: ThemePalette = ThemePalette {
    accent: hex(0x8b5cf6),
    accent_soft: hex(0xc4b5fd),
    accent_deep: hex(0x4c1d95),
    track: hex(0x1a1430),
    tick: hex(0x6f6396),
    tick_label: hex(0xede9fe),
    text: hex(0xa78bfa),
    text_muted: hex(0x9a92b5),
    glow: hex(0x8b5cf6),
    glow_soft: hex(0x241048),
    needle: hex(0xf5f3ff),
    background: BLACK,
};

pub static MONO: ThemePalette = ThemePalette {
    accent: hex(0xe5e5e5),
    accent_soft: hex(0xa3a3a3),
    accent_deep: hex(0x525252),
    track: hex(0x1a1a1a),
    tick: hex(0x6b6b6b),
    tick_label: hex(0xf5f5f5),
    text: hex(0xffffff),
    text_muted: hex(0x8a8a8a),
    glow: hex(0xd4d4d4),
    glow_soft: hex(0x2b2b2b),
    needle: hex(0xfafafa),
    background: BLACK,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for id in ThemeId::ALL {
            assert_eq!(id.name().parse::<ThemeId>(), Ok(id));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" Ember ".parse::<ThemeId>(), Ok(ThemeId::Ember));
        assert_eq!("TEAL".parse::<ThemeId>(), Ok(ThemeId::Teal));
    }

    #[test]
    fn test_unknown_falls_back_to_default() {
        assert_eq!(ThemeId::resolve(Some("sepia")), ThemeId::Neon);
        assert_eq!(ThemeId::resolve(Some("")), ThemeId::Neon);
        assert_eq!(ThemeId::resolve(None), ThemeId::Neon);
        assert_eq!(resolve(Some("nope")), &NEON);
    }

    #[test]
    fn test_from_query() {
        assert_eq!(ThemeId::from_query("?theme=ember&scale=2"), ThemeId::Ember);
        assert_eq!(ThemeId::from_query("debug=1&theme=arctic"), ThemeId::Arctic);
        assert_eq!(ThemeId::from_query("?theme="), ThemeId::Neon);
        assert_eq!(ThemeId::from_query("?themes=teal"), ThemeId::Neon);
        assert_eq!(ThemeId::from_query(""), ThemeId::Neon);
    }

    #[test]
    fn test_next_cycles_through_all() {
        let mut id = ThemeId::default();
        for _ in 0..ThemeId::ALL.len() {
            id = id.next();
        }
        assert_eq!(id, ThemeId::default());
    }

    #[test]
    fn test_scale_colors_distinct_between_themes() {
        for (i, a) in ThemeId::ALL.iter().enumerate() {
            for b in &ThemeId::ALL[i + 1..] {
                assert_ne!(a.palette().tick, b.palette().tick, "{a} and {b} share a tick color");
                assert_ne!(
                    a.palette().tick_label,
                    b.palette().tick_label,
                    "{a} and {b} share a tick label color"
                );
            }
        }
    }
}
