//! The terminal background probe.
//!
//! Terminals answering the OSC 11 query report their background color,
//! which classifies the session as running on a dark or light theme. The
//! probe is strictly best effort: it only talks to stderr when stderr is a
//! character device, it gives the terminal 0.1 seconds to answer, and any
//! failure along the way collapses to [`ColorScheme::Unknown`].
//!
//! The probe changes the terminal configuration for the duration of the
//! query. Concurrent probes would interleave those changes, so callers
//! running it from multiple threads need their own mutual exclusion.

use std::io::Result;

use crate::err::ErrorKind;
use crate::gate::Destination as _;
use crate::sys;
use crate::util::{hex_run, parse_hex};

/// The OSC 11 background-color query, BEL-terminated.
const BACKGROUND_QUERY: &[u8] = b"\x1b]11;?\x07";

/// The read timeout in deciseconds.
const TIMEOUT: u8 = 1;

/// The upper bound on buffered reply bytes.
const REPLY_CAP: usize = 128;

/// A terminal's light-or-dark classification.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorScheme {
    /// The background luminance is at most half of the 16-bit range.
    Dark,
    /// The background luminance is above half of the 16-bit range.
    Light,
    /// The terminal's background could not be determined.
    #[default]
    Unknown,
}

/// Query the terminal for its color scheme.
///
/// This function returns [`ColorScheme::Unknown`] without any terminal
/// I/O when stderr is not a character device. Otherwise it blocks for up
/// to 0.1 seconds waiting for the terminal's reply.
pub fn color_scheme() -> ColorScheme {
    if !std::io::stderr().is_char_device() {
        return ColorScheme::Unknown;
    }

    query_background().map_or(ColorScheme::Unknown, classify)
}

/// Determine whether the terminal uses a dark background.
///
/// This is the boolean rendition of [`color_scheme`]: an undeterminable
/// background counts as not dark.
pub fn is_dark_mode() -> bool {
    color_scheme() == ColorScheme::Dark
}

/// Classify the background color by its luminance.
fn classify([r, g, b]: [u16; 3]) -> ColorScheme {
    // ITU-R BT.601 luma over the raw channel values.
    let luminance = 0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b);
    if luminance <= 32768.0 {
        ColorScheme::Dark
    } else {
        ColorScheme::Light
    }
}

/// Run the query against stderr.
fn query_background() -> Result<[u16; 3]> {
    let mut probe = sys::Probe::open(TIMEOUT)?;
    probe.send(BACKGROUND_QUERY)?;

    let mut reply = Vec::with_capacity(REPLY_CAP);
    let mut chunk = [0_u8; 32];
    loop {
        let count = probe.receive(&mut chunk)?;
        if count == 0 {
            break;
        }
        reply.extend_from_slice(&chunk[..count]);
        if REPLY_CAP <= reply.len() || has_terminator(&reply) {
            break;
        }
    }
    drop(probe);

    if reply.is_empty() {
        return Err(ErrorKind::NoReply.into());
    }
    parse_reply(&reply)
}

/// Determine whether the reply already carries a BEL or ST terminator.
fn has_terminator(reply: &[u8]) -> bool {
    reply.contains(&0x07) || reply.windows(2).any(|window| window == b"\x1b\\")
}

/// Parse a reply of the form `…rgb:RRRR/GGGG/BBBB…`.
///
/// Each component holds one to four hexadecimal digits; the terminator and
/// anything after it are ignored.
fn parse_reply(reply: &[u8]) -> Result<[u16; 3]> {
    let start = reply
        .windows(4)
        .position(|window| window == b"rgb:")
        .ok_or(ErrorKind::BadReply)?
        + 4;
    let tail = &reply[start..];
    let end = tail
        .iter()
        .position(|byte| *byte == 0x07 || *byte == 0x1b)
        .unwrap_or(tail.len());

    let mut components = tail[..end].split(|byte| *byte == b'/');
    let r = component(components.next())?;
    let g = component(components.next())?;
    let b = component(components.next())?;
    if components.next().is_some() {
        return Err(ErrorKind::TooManyComponents.into());
    }

    Ok([r, g, b])
}

/// Parse one color component.
fn component(bytes: Option<&[u8]>) -> Result<u16> {
    let bytes = bytes.ok_or(ErrorKind::TooFewComponents)?;
    if bytes.is_empty() {
        return Err(ErrorKind::EmptyComponent.into());
    }

    let run = hex_run(bytes);
    if run == 0 {
        return Err(ErrorKind::MalformedComponent.into());
    }
    if 4 < run {
        return Err(ErrorKind::OversizedComponent.into());
    }
    parse_hex(&bytes[..run]).ok_or_else(|| ErrorKind::MalformedComponent.into())
}

#[cfg(test)]
mod test {
    use super::{classify, is_dark_mode, parse_reply, ColorScheme};
    use crate::gate::Destination as _;

    #[test]
    fn test_parse_reply() {
        assert_eq!(
            parse_reply(b"\x1b]11;rgb:1e1e/2020/2a2a\x07").unwrap(),
            [0x1e1e, 0x2020, 0x2a2a]
        );
        assert_eq!(
            parse_reply(b"\x1b]11;rgb:ffff/ffff/ffff\x1b\\").unwrap(),
            [0xffff, 0xffff, 0xffff]
        );
        // short components are taken verbatim, without width scaling
        assert_eq!(parse_reply(b"rgb:ff/ff/ff").unwrap(), [0xff, 0xff, 0xff]);
    }

    #[test]
    fn test_parse_reply_failures() {
        assert!(parse_reply(b"\x1b]11;?").is_err());
        assert!(parse_reply(b"rgb:ffff/ffff").is_err());
        assert!(parse_reply(b"rgb:ffff/ffff/ffff/ffff").is_err());
        assert!(parse_reply(b"rgb:/ffff/ffff").is_err());
        assert!(parse_reply(b"rgb:fffff/0/0").is_err());
        assert!(parse_reply(b"rgb:zz/0/0").is_err());
    }

    #[test]
    fn test_classification() {
        assert_eq!(classify([0, 0, 0]), ColorScheme::Dark);
        assert_eq!(classify([0xffff, 0xffff, 0xffff]), ColorScheme::Light);
        // the boundary itself counts as dark
        assert_eq!(classify([0x8000, 0x8000, 0x8000]), ColorScheme::Dark);
        assert_eq!(classify([0x8001, 0x8001, 0x8001]), ColorScheme::Light);
        // short components land deep in the dark range
        assert_eq!(classify([0xff, 0xff, 0xff]), ColorScheme::Dark);
    }

    #[test]
    fn test_no_terminal_means_not_dark() {
        // With stderr redirected, the probe must bail before any terminal
        // I/O. When the test runs on an actual terminal, the probe is
        // allowed to answer either way, so there is nothing to assert.
        if !std::io::stderr().is_char_device() {
            assert!(!is_dark_mode());
        }
    }
}
