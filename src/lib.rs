//! # Tintty
//!
//! This crate provides **printf-style terminal output with inline color
//! markup**. A format string mixes three kinds of tokens:
//!
//!   * `{}` inserts the next argument, rendered through
//!     [`Display`](std::fmt::Display);
//!   * `{name}` and `{R;G;B}` switch the foreground color or text
//!     attributes;
//!   * `[name]` and `[R;G;B]` switch the background color.
//!
//! The named vocabulary comprises `clear`, `black`, `red`, `green`,
//! `yellow`, `blue`, `purple`, `cyan`, `white`, `base`, `underline`, and
//! `highlight`; raw triples are three semicolon-separated numbers up to
//! 255 each. Anything else, unterminated or overlong tokens included,
//! degrades to literal output instead of failing. Every call ends with a
//! reset sequence and a flush.
//!
//! Escape sequences are only written when the destination is an
//! interactive terminal, i.e., a character device; see [`StyleGate`]. The
//! gate, the [`Palette`] behind the named tokens, and the `base` accent
//! color live in a process-wide configuration, or travel explicitly in a
//! [`Styler`].
//!
//! The loosely related [`is_dark_mode`] and [`color_scheme`] ask the
//! terminal for its background color via OSC 11 and classify it by
//! luminance, with a 0.1 second budget and graceful degradation when the
//! terminal stays silent.
//!
//! Like this crate's terminal access in general, the only dependency is
//! the low-level crate enabling system calls, i.e.,
//! [`libc`](https://crates.io/crates/libc) on Unix and
//! [`windows-sys`](https://crates.io/crates/windows-sys) on Windows.
//!
//!
//! # Example
//!
//! ```
//! # use std::io::Result;
//! # fn run() -> Result<()> {
//! let mut sink = Vec::new();
//! tintty::twrite!(&mut sink, "{red}error:{clear} {} missing\n", "config")?;
//!
//! // A byte buffer is not a terminal, so the markup resolved to nothing
//! // and the literal text went through untouched.
//! assert_eq!(sink, b"error: config missing\n");
//! # Ok(())
//! # }
//! # run().unwrap();
//! ```

mod err;
mod fmt;
mod gate;
mod markup;
mod palette;
mod sys;
mod theme;
mod util;

pub use fmt::{print, print_to, set_base_rgb, set_color, set_gate, Styler};
pub use gate::{Destination, StyleGate};
pub use palette::{ColorName, Layer, Palette};
pub use theme::{color_scheme, is_dark_mode, ColorScheme};

/// Print colorized output to standard output.
///
/// The macro collects its arguments as displayable values and invokes
/// [`print`].
#[macro_export]
macro_rules! tprint {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::print($format, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}

/// Print colorized output to the given destination.
///
/// The macro collects its arguments as displayable values and invokes
/// [`print_to`].
#[macro_export]
macro_rules! twrite {
    ($destination:expr, $format:expr $(, $arg:expr)* $(,)?) => {
        $crate::print_to($destination, $format, &[$(&$arg as &dyn ::std::fmt::Display),*])
    };
}
