//! Formatting entry points and the process-wide configuration.

use std::borrow::Cow;
use std::fmt::{Display, Write as _};
use std::io::{stdout, Result};
use std::sync::{LazyLock, RwLock};

use crate::gate::{Destination, StyleGate};
use crate::markup;
use crate::palette::{ColorName, Layer, Palette};

/// A palette and gate bundled into one value.
///
/// The [`print`] and [`print_to`] functions consult the process-wide
/// configuration; callers that prefer passing configuration explicitly
/// build a styler instead and hand it around.
#[derive(Clone, Debug, Default)]
pub struct Styler {
    palette: Palette,
    gate: StyleGate,
}

impl Styler {
    /// Create a new styler with the default palette and gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new styler with the given palette.
    pub fn with_palette(palette: Palette) -> Self {
        Self {
            palette,
            gate: StyleGate::default(),
        }
    }

    /// Replace this styler's gate.
    #[must_use = "the method returns the updated styler"]
    pub fn gate(mut self, gate: StyleGate) -> Self {
        self.gate = gate;
        self
    }

    /// Get mutable access to this styler's palette.
    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Format to standard output.
    pub fn print(&self, format: &str, args: &[&dyn Display]) -> Result<()> {
        self.print_to(&mut stdout().lock(), format, args)
    }

    /// Format to the given destination.
    ///
    /// The format string's `{}` pairs are expanded with the arguments
    /// first; markup scanning runs on the expanded string, writes a
    /// trailing reset, and flushes the destination.
    pub fn print_to<D>(&self, out: &mut D, format: &str, args: &[&dyn Display]) -> Result<()>
    where
        D: Destination + ?Sized,
    {
        let styled = self.gate.admits(out);
        let expanded = expand(format, args);
        markup::render(out, &expanded, &self.palette, styled)
    }
}

static CONFIG: LazyLock<RwLock<Styler>> = LazyLock::new(|| RwLock::new(Styler::new()));

/// Format to standard output with the process-wide configuration.
pub fn print(format: &str, args: &[&dyn Display]) -> Result<()> {
    CONFIG
        .read()
        .expect("configuration lock is not poisoned")
        .print(format, args)
}

/// Format to the given destination with the process-wide configuration.
pub fn print_to<D>(out: &mut D, format: &str, args: &[&dyn Display]) -> Result<()>
where
    D: Destination + ?Sized,
{
    CONFIG
        .read()
        .expect("configuration lock is not poisoned")
        .print_to(out, format, args)
}

/// Replace the process-wide `base` accent triple.
pub fn set_base_rgb(rgb: impl Into<String>) {
    CONFIG
        .write()
        .expect("configuration lock is not poisoned")
        .palette
        .set_base_rgb(rgb);
}

/// Replace a process-wide color sequence.
pub fn set_color(name: ColorName, layer: Layer, sequence: impl Into<Cow<'static, str>>) {
    CONFIG
        .write()
        .expect("configuration lock is not poisoned")
        .palette
        .set_color(name, layer, sequence);
}

/// Replace the process-wide gate.
pub fn set_gate(gate: StyleGate) {
    CONFIG
        .write()
        .expect("configuration lock is not poisoned")
        .gate = gate;
}

/// Expand the `{}` placeholder pairs with the arguments.
///
/// This runs before markup scanning, so a literal `{}` never collides with
/// the named tokens, none of which has an empty body. Pair detection stops
/// before the final byte, and the final byte joins the output only when it
/// is not a closing brace, so a trailing lone `}` is dropped. Missing
/// arguments expand to nothing, surplus arguments are ignored.
pub(crate) fn expand(format: &str, args: &[&dyn Display]) -> String {
    let bytes = format.as_bytes();
    let length = bytes.len();
    let mut out = String::with_capacity(length);
    if length == 0 {
        return out;
    }

    let mut args = args.iter();
    let mut start = 0;
    let mut at = 0;
    while at + 1 < length {
        if bytes[at] == b'{' && bytes[at + 1] == b'}' {
            out.push_str(&format[start..at]);
            if let Some(arg) = args.next() {
                // Display implementations only fail through the formatter,
                // which a String never does.
                let _ = write!(out, "{}", arg);
            }
            at += 2;
            start = at;
        } else {
            at += 1;
        }
    }

    if start < length {
        if bytes[length - 1] == b'}' {
            out.push_str(&format[start..length - 1]);
        } else {
            out.push_str(&format[start..]);
        }
    }
    out
}

#[cfg(test)]
mod test {
    use super::{expand, set_base_rgb, set_gate, Styler};
    use crate::gate::StyleGate;
    use std::fmt::Display;

    fn expanded(format: &str, args: &[&dyn Display]) -> String {
        expand(format, args)
    }

    #[test]
    fn test_expansion() {
        assert_eq!(expanded("{} and {}", &[&"a", &"b"]), "a and b");
        assert_eq!(expanded("a{}b", &[&"X"]), "aXb");
        assert_eq!(expanded("{}", &[&42]), "42");
        assert_eq!(expanded("no placeholders", &[]), "no placeholders");
        assert_eq!(expanded("", &[]), "");
    }

    #[test]
    fn test_expansion_edges() {
        // missing arguments expand to nothing, surplus ones are ignored
        assert_eq!(expanded("{}", &[]), "");
        assert_eq!(expanded("{}{}", &[&"1"]), "1");
        assert_eq!(expanded("x", &[&"unused"]), "x");
        // a trailing lone closing brace is dropped by the final-byte guard
        assert_eq!(expanded("x{red}", &[]), "x{red");
        assert_eq!(expanded("a}", &[]), "a");
        // any other final byte is preserved verbatim
        assert_eq!(expanded("a{", &[]), "a{");
        assert_eq!(expanded("{red}b", &[]), "{red}b");
    }

    #[test]
    fn test_print_to_buffer() {
        let styler = Styler::new();
        let mut sink = Vec::new();
        styler
            .print_to(&mut sink, "{green}{}{clear}\n", &[&"ok"])
            .unwrap();
        assert_eq!(sink, b"ok\n");

        let styler = Styler::new().gate(StyleGate::Always);
        let mut sink = Vec::new();
        styler
            .print_to(&mut sink, "{green}{}{clear}\n", &[&"ok"])
            .unwrap();
        assert_eq!(sink, b"\x1b[32mok\x1b[0m\n\x1b[0m");
    }

    #[test]
    fn test_custom_palette() {
        let mut styler = Styler::new().gate(StyleGate::Always);
        styler.palette_mut().set_base_rgb("9;9;9");
        let mut sink = Vec::new();
        styler.print_to(&mut sink, "{base}x\n", &[]).unwrap();
        assert_eq!(sink, b"\x1b[1;38;2;9;9;9mx\n\x1b[0m");
    }

    #[test]
    fn test_global_configuration() {
        // The only test touching the process-wide configuration, so it
        // both mutates and restores it.
        set_gate(StyleGate::Always);
        set_base_rgb("1;2;3");

        let mut sink = Vec::new();
        crate::print_to(&mut sink, "[base]{}\n", &[&7]).unwrap();
        assert_eq!(sink, b"\x1b[1;48;2;1;2;3m7\n\x1b[0m");

        set_base_rgb("254;228;208");
        set_gate(StyleGate::OnlyTty);
    }
}
