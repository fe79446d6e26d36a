//! # Theme State
//!
//! Header colors shared by every chat surface in the process.
//!
//! The theme color paints the header background. The text color is either
//! set explicitly or, when unset, derived from the theme color's whiteness
//! each time it is read: light backgrounds (whiteness above 0.5) get black
//! text, everything else gets white text. The derived value is never
//! stored, so changing the theme color always re-derives it.
//!
//! A chat surface takes a [`ThemeSnapshot`] when it is created; later theme
//! changes only affect surfaces created afterwards.
//!
//! ```
//! use core_runtime::theme::{Color, ThemeStore};
//!
//! let store = ThemeStore::new();
//! assert!(store.set_theme_color_hex("#1F93FF"));
//! assert!(!store.set_theme_color_hex("not-a-color"));
//! assert_eq!(store.current_text_color(), Color::WHITE);
//! ```

use crate::error::{Error, Result};
use std::sync::{PoisonError, RwLock};

/// Whiteness above which a background counts as light.
pub const LIGHTNESS_THRESHOLD: f64 = 0.5;

/// An sRGB color with channels in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const GRAY: Color = Color::rgb(0.5, 0.5, 0.5);
    pub const LIGHT_GRAY: Color = Color::rgb(2.0 / 3.0, 2.0 / 3.0, 2.0 / 3.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// A gray of the given whiteness.
    pub const fn white(level: f64) -> Self {
        Self::rgb(level, level, level)
    }

    /// Same color with a different alpha.
    pub const fn with_alpha(self, alpha: f64) -> Self {
        Self { alpha, ..self }
    }

    /// Parse `RGB`, `RRGGBB` or `RRGGBBAA`, with or without a leading `#`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidColor`] for any other length or a non-hex
    /// digit.
    pub fn from_hex(input: &str) -> Result<Self> {
        let digits = input.strip_prefix('#').unwrap_or(input);

        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(Error::InvalidColor(input.to_string()));
        }

        // Every char is an ASCII hex digit, so byte offsets are char offsets.
        let channel = |range: std::ops::Range<usize>| -> Result<u8> {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| Error::InvalidColor(input.to_string()))
        };

        let (r, g, b, a) = match digits.len() {
            3 => (
                channel(0..1)? * 17,
                channel(1..2)? * 17,
                channel(2..3)? * 17,
                255,
            ),
            6 => (channel(0..2)?, channel(2..4)?, channel(4..6)?, 255),
            8 => (
                channel(0..2)?,
                channel(2..4)?,
                channel(4..6)?,
                channel(6..8)?,
            ),
            _ => return Err(Error::InvalidColor(input.to_string())),
        };

        Ok(Self::from_rgba8(r, g, b, a))
    }

    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            f64::from(r) / 255.0,
            f64::from(g) / 255.0,
            f64::from(b) / 255.0,
            f64::from(a) / 255.0,
        )
    }

    pub fn to_rgba8(&self) -> [u8; 4] {
        let scale = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [
            scale(self.red),
            scale(self.green),
            scale(self.blue),
            scale(self.alpha),
        ]
    }

    /// `#RRGGBBAA` representation.
    pub fn to_hex(&self) -> String {
        let [r, g, b, a] = self.to_rgba8();
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }

    /// Grayscale level of the color (Rec. 601 luma).
    pub fn whiteness(&self) -> f64 {
        // A gray of level w has whiteness exactly w
        if self.red == self.green && self.green == self.blue {
            return self.red;
        }
        0.299 * self.red + 0.587 * self.green + 0.114 * self.blue
    }

    pub fn is_light(&self) -> bool {
        self.whiteness() > LIGHTNESS_THRESHOLD
    }

    /// Text color readable on top of this color.
    pub fn contrasting_text(&self) -> Color {
        if self.is_light() {
            Color::BLACK
        } else {
            Color::WHITE
        }
    }
}

/// Theme values captured when a chat surface is created.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThemeSnapshot {
    pub theme_color: Color,
    pub text_color: Color,
}

impl Default for ThemeSnapshot {
    fn default() -> Self {
        Self {
            theme_color: ThemeStore::DEFAULT_THEME_COLOR,
            text_color: ThemeStore::DEFAULT_THEME_COLOR.contrasting_text(),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct ThemeState {
    theme_color: Option<Color>,
    text_color: Option<Color>,
}

/// Holder for the theme and text colors (last write wins).
#[derive(Debug, Default)]
pub struct ThemeStore {
    state: RwLock<ThemeState>,
}

static GLOBAL_THEME: ThemeStore = ThemeStore::new();

impl ThemeStore {
    /// Theme color used until one is set.
    pub const DEFAULT_THEME_COLOR: Color = Color::WHITE;

    pub const fn new() -> Self {
        Self {
            state: RwLock::new(ThemeState {
                theme_color: None,
                text_color: None,
            }),
        }
    }

    /// The process-wide theme store.
    pub fn global() -> &'static ThemeStore {
        &GLOBAL_THEME
    }

    pub fn set_theme_color(&self, color: Color) {
        self.write(|state| state.theme_color = Some(color));
    }

    /// Parse and store a theme color; returns `false` and leaves the current
    /// value untouched when `hex` is invalid.
    pub fn set_theme_color_hex(&self, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Ok(color) => {
                self.set_theme_color(color);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring theme color");
                false
            }
        }
    }

    pub fn set_text_color(&self, color: Color) {
        self.write(|state| state.text_color = Some(color));
    }

    /// Parse and store an explicit text color; returns `false` and leaves
    /// the current value untouched when `hex` is invalid.
    pub fn set_text_color_hex(&self, hex: &str) -> bool {
        match Color::from_hex(hex) {
            Ok(color) => {
                self.set_text_color(color);
                true
            }
            Err(err) => {
                tracing::warn!(error = %err, "Ignoring text color");
                false
            }
        }
    }

    /// Go back to deriving the text color from the theme color.
    pub fn clear_text_color(&self) {
        self.write(|state| state.text_color = None);
    }

    pub fn current_theme_color(&self) -> Color {
        self.read()
            .theme_color
            .unwrap_or(Self::DEFAULT_THEME_COLOR)
    }

    pub fn current_text_color(&self) -> Color {
        let state = self.read();
        state.text_color.unwrap_or_else(|| {
            state
                .theme_color
                .unwrap_or(Self::DEFAULT_THEME_COLOR)
                .contrasting_text()
        })
    }

    pub fn snapshot(&self) -> ThemeSnapshot {
        ThemeSnapshot {
            theme_color: self.current_theme_color(),
            text_color: self.current_text_color(),
        }
    }

    fn read(&self) -> ThemeState {
        *self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self, update: impl FnOnce(&mut ThemeState)) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        update(&mut state);
    }
}
