//! The policy gating escape-sequence emission.

use std::fs::File;
use std::io::{Stderr, StderrLock, Stdout, StdoutLock, Write};

use crate::sys;

#[cfg(target_family = "unix")]
fn device_of<T: std::os::fd::AsRawFd + ?Sized>(stream: &T) -> sys::RawHandle {
    stream.as_raw_fd()
}
#[cfg(target_family = "windows")]
fn device_of<T: std::os::windows::io::AsRawHandle + ?Sized>(stream: &T) -> sys::RawHandle {
    stream.as_raw_handle()
}

/// An output destination for colorized text.
///
/// A destination is a writer that also knows whether it is backed by an
/// interactive terminal, i.e., whether its descriptor reports as a
/// character device. That answer feeds the [`StyleGate`]; it never affects
/// literal text, which is written regardless.
///
/// This trait is object-safe.
pub trait Destination: Write {
    /// Determine whether this destination is backed by a character device.
    fn is_char_device(&self) -> bool;
}

macro_rules! impl_destination {
    ($($stream:ty),+ $(,)?) => {
        $(
            impl Destination for $stream {
                fn is_char_device(&self) -> bool {
                    sys::is_char_device(device_of(self))
                }
            }
        )+
    };
}

impl_destination!(Stdout, StdoutLock<'_>, Stderr, StderrLock<'_>, File);

/// A byte buffer never is a character device.
impl Destination for Vec<u8> {
    fn is_char_device(&self) -> bool {
        false
    }
}

/// A borrowed destination is a destination.
impl<D: Destination + ?Sized> Destination for &mut D {
    fn is_char_device(&self) -> bool {
        (**self).is_char_device()
    }
}

/// A boxed destination is a destination.
impl<D: Destination + ?Sized> Destination for Box<D> {
    fn is_char_device(&self) -> bool {
        (**self).is_char_device()
    }
}

/// The policy deciding whether ANSI escape sequences are written.
///
/// The gate is consulted once per formatting call, for the styled
/// sequences only. Unrecognized markup falls back to literal text and
/// bypasses the gate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StyleGate {
    /// Emit escape sequences only when the destination is a character
    /// device.
    #[default]
    OnlyTty,
    /// Emit escape sequences unconditionally.
    Always,
}

impl StyleGate {
    /// Decide whether escape sequences may reach the destination.
    pub fn admits<D: Destination + ?Sized>(&self, destination: &D) -> bool {
        match self {
            Self::OnlyTty => destination.is_char_device(),
            Self::Always => true,
        }
    }
}

#[cfg(test)]
mod test {
    use super::{Destination, StyleGate};

    #[test]
    fn test_buffer_is_not_a_device() {
        let mut buffer = Vec::new();
        assert!(!buffer.is_char_device());
        assert!(!(&mut buffer).is_char_device());
        assert!(!StyleGate::OnlyTty.admits(&buffer));
        assert!(StyleGate::Always.admits(&buffer));
    }

    #[cfg(target_family = "unix")]
    #[test]
    fn test_devices() -> std::io::Result<()> {
        let null = std::fs::File::open("/dev/null")?;
        assert!(null.is_char_device());

        let executable = std::fs::File::open(std::env::current_exe()?)?;
        assert!(!executable.is_char_device());
        Ok(())
    }
}
