//! The palette of escape sequences backing the named markup tokens.

use std::borrow::Cow;

/// The reset sequence, also written after every formatting call.
pub(crate) const RESET: &str = "\x1b[0m";

const UNDERLINE: &str = "\x1b[4m";
const HIGHLIGHT: &str = "\x1b[1m";

/// A token's layer, i.e., whether it styles foreground or background.
///
/// Brace-delimited tokens select the foreground, bracket-delimited tokens
/// the background. The attribute tokens `clear`, `underline`, and
/// `highlight` mean the same in either layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    Foreground,
    Background,
}

impl Layer {
    /// Get the SGR selector prefixing a 24-bit color for this layer.
    pub(crate) fn selector(&self) -> &'static str {
        match self {
            Self::Foreground => "38",
            Self::Background => "48",
        }
    }
}

/// The eight configurable color names.
///
/// The discriminant is the color's offset within the SGR 30–37 and 40–47
/// blocks. The vocabulary says `purple` where SGR documentation says
/// magenta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorName {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Purple = 5,
    Cyan = 6,
    White = 7,
}

impl ColorName {
    /// Look up the color for a token body.
    pub(crate) fn from_body(body: &[u8]) -> Option<Self> {
        Some(match body {
            b"black" => Self::Black,
            b"red" => Self::Red,
            b"green" => Self::Green,
            b"yellow" => Self::Yellow,
            b"blue" => Self::Blue,
            b"purple" => Self::Purple,
            b"cyan" => Self::Cyan,
            b"white" => Self::White,
            _ => return None,
        })
    }

    /// Get this color's human-readable name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Blue => "blue",
            Self::Purple => "purple",
            Self::Cyan => "cyan",
            Self::White => "white",
        }
    }
}

/// The escape sequences for the named tokens.
///
/// A palette holds one sequence per color name and layer plus the `base`
/// accent triple, all of which the host application may replace. The
/// attribute tokens `clear`, `underline`, and `highlight` are fixed and not
/// part of the palette.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    base: String,
    foreground: [Cow<'static, str>; 8],
    background: [Cow<'static, str>; 8],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: String::from("254;228;208"),
            foreground: [
                Cow::Borrowed("\x1b[30m"),
                Cow::Borrowed("\x1b[31m"),
                Cow::Borrowed("\x1b[32m"),
                Cow::Borrowed("\x1b[33m"),
                Cow::Borrowed("\x1b[34m"),
                Cow::Borrowed("\x1b[35m"),
                Cow::Borrowed("\x1b[36m"),
                Cow::Borrowed("\x1b[37m"),
            ],
            background: [
                Cow::Borrowed("\x1b[40m"),
                Cow::Borrowed("\x1b[41m"),
                Cow::Borrowed("\x1b[42m"),
                Cow::Borrowed("\x1b[43m"),
                Cow::Borrowed("\x1b[44m"),
                Cow::Borrowed("\x1b[45m"),
                Cow::Borrowed("\x1b[46m"),
                Cow::Borrowed("\x1b[47m"),
            ],
        }
    }
}

impl Palette {
    /// Create a new palette with the default sequences.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the `base` accent triple in `R;G;B` form.
    pub fn base_rgb(&self) -> &str {
        &self.base
    }

    /// Replace the `base` accent triple.
    ///
    /// The triple is substituted verbatim into the composed escape
    /// sequence, so a malformed triple yields a malformed sequence.
    pub fn set_base_rgb(&mut self, rgb: impl Into<String>) {
        self.base = rgb.into();
    }

    /// Get the escape sequence for the color in the given layer.
    pub fn color(&self, name: ColorName, layer: Layer) -> &str {
        match layer {
            Layer::Foreground => &self.foreground[name as usize],
            Layer::Background => &self.background[name as usize],
        }
    }

    /// Replace the escape sequence for the color in the given layer.
    pub fn set_color(
        &mut self,
        name: ColorName,
        layer: Layer,
        sequence: impl Into<Cow<'static, str>>,
    ) {
        match layer {
            Layer::Foreground => self.foreground[name as usize] = sequence.into(),
            Layer::Background => self.background[name as usize] = sequence.into(),
        }
    }

    /// Resolve a named token body to its escape sequence.
    pub(crate) fn resolve(&self, body: &[u8], layer: Layer) -> Option<Cow<'_, str>> {
        if let Some(name) = ColorName::from_body(body) {
            return Some(Cow::Borrowed(self.color(name, layer)));
        }

        match body {
            b"clear" => Some(Cow::Borrowed(RESET)),
            b"underline" => Some(Cow::Borrowed(UNDERLINE)),
            b"highlight" => Some(Cow::Borrowed(HIGHLIGHT)),
            b"base" => Some(Cow::Owned(format!(
                "\x1b[1;{};2;{}m",
                layer.selector(),
                self.base
            ))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{ColorName, Layer, Palette};
    use std::borrow::Cow;

    #[test]
    fn test_named_resolution() {
        let palette = Palette::new();
        assert_eq!(
            palette.resolve(b"red", Layer::Foreground),
            Some(Cow::Borrowed("\x1b[31m"))
        );
        assert_eq!(
            palette.resolve(b"red", Layer::Background),
            Some(Cow::Borrowed("\x1b[41m"))
        );
        assert_eq!(
            palette.resolve(b"underline", Layer::Background),
            Some(Cow::Borrowed("\x1b[4m"))
        );
        assert_eq!(palette.resolve(b"orange", Layer::Foreground), None);
        assert_eq!(palette.resolve(b"", Layer::Foreground), None);
    }

    #[test]
    fn test_base_composition() {
        let mut palette = Palette::new();
        assert_eq!(
            palette.resolve(b"base", Layer::Foreground).unwrap(),
            "\x1b[1;38;2;254;228;208m"
        );

        palette.set_base_rgb("1;2;3");
        assert_eq!(
            palette.resolve(b"base", Layer::Background).unwrap(),
            "\x1b[1;48;2;1;2;3m"
        );
    }

    #[test]
    fn test_color_override() {
        let mut palette = Palette::new();
        palette.set_color(ColorName::Red, Layer::Foreground, "\x1b[91m");
        assert_eq!(palette.color(ColorName::Red, Layer::Foreground), "\x1b[91m");
        assert_eq!(palette.color(ColorName::Red, Layer::Background), "\x1b[41m");
        assert_eq!(ColorName::Purple.name(), "purple");
    }
}
