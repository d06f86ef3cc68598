//! The inline-markup scanner.
//!
//! [`render`] walks a string byte by byte and splits it into literal runs
//! and markup tokens. A token opens with `{` (foreground) or `[`
//! (background) and must close with the matching delimiter inside a
//! 16-byte window; its body is either one of the named vocabulary entries
//! or a raw `R;G;B` triple. Anything else degrades to literal output: the
//! opening delimiter is written as-is and scanning resumes right after it,
//! so the body of a failed token is reprocessed character by character.
//! Escape sequences only reach the destination when the gate admitted it;
//! literal text is written regardless.

use std::io::{Result, Write};

use crate::palette::{Layer, Palette, RESET};
use crate::util::leading_decimal;

/// The scan window for one token, opening delimiter included.
const TOKEN_WINDOW: usize = 16;

/// Interpret the markup in `text` and write the result.
///
/// Unconditionally ends with a reset sequence (subject to `styled`) and
/// flushes the destination.
pub(crate) fn render<W>(out: &mut W, text: &str, palette: &Palette, styled: bool) -> Result<()>
where
    W: Write + ?Sized,
{
    let bytes = text.as_bytes();
    let mut at = 0;
    while at < bytes.len() {
        at = match bytes[at] {
            b'{' => resolve(out, bytes, at, Layer::Foreground, palette, styled)?,
            b'[' => resolve(out, bytes, at, Layer::Background, palette, styled)?,
            _ => {
                out.write_all(&bytes[at..=at])?;
                at
            }
        } + 1;
    }

    if styled {
        out.write_all(RESET.as_bytes())?;
    }
    out.flush()
}

/// Resolve one token opening at `at`.
///
/// Returns the index of the consumed closing delimiter, or `at` itself if
/// no valid token was found, in which case the literal opening delimiter
/// has already been written.
fn resolve<W>(
    out: &mut W,
    bytes: &[u8],
    at: usize,
    layer: Layer,
    palette: &Palette,
    styled: bool,
) -> Result<usize>
where
    W: Write + ?Sized,
{
    let closer = match layer {
        Layer::Foreground => b'}',
        Layer::Background => b']',
    };

    let mut end = None;
    for offset in 1..TOKEN_WINDOW {
        match bytes.get(at + offset) {
            Some(&byte) if byte == closer => {
                end = Some(at + offset);
                break;
            }
            Some(_) => {}
            None => break,
        }
    }
    let Some(end) = end else {
        out.write_all(&bytes[at..=at])?;
        return Ok(at);
    };

    let body = &bytes[at + 1..end];
    if let Some(sequence) = palette.resolve(body, layer) {
        if styled {
            out.write_all(sequence.as_bytes())?;
        }
        return Ok(end);
    }

    if is_rgb_triple(body) {
        if styled {
            out.write_all(b"\x1b[")?;
            out.write_all(layer.selector().as_bytes())?;
            out.write_all(b";2;")?;
            out.write_all(body)?;
            out.write_all(b"m")?;
        }
        return Ok(end);
    }

    out.write_all(&bytes[at..=at])?;
    Ok(at)
}

/// Validate an `R;G;B` token body.
///
/// The body must consist of digits and exactly two semicolons, and the
/// numeric prefix at the start and after each semicolon must not exceed
/// 255. Because only prefixes are ranged-checked, digits trailing a prefix
/// within a group pass, and empty groups count as zero; that permissiveness
/// is observable behavior, matched deliberately.
fn is_rgb_triple(body: &[u8]) -> bool {
    if body
        .iter()
        .any(|byte| !byte.is_ascii_digit() && *byte != b';')
    {
        return false;
    }
    if body.iter().filter(|byte| **byte == b';').count() != 2 {
        return false;
    }
    if leading_decimal(body) > 255 {
        return false;
    }
    for (index, byte) in body.iter().enumerate() {
        if *byte == b';' && leading_decimal(&body[index + 1..]) > 255 {
            return false;
        }
    }
    true
}
