use std::ffi::c_void;
use std::io::{Read, Result, Write};
use std::mem::MaybeUninit;
use std::ptr::{from_mut, from_ref};

use super::RawHandle;

/// Convert a Unix status return into a result.
fn check(status: i32) -> Result<i32> {
    if status == -1 {
        Err(std::io::Error::last_os_error())
    } else {
        Ok(status)
    }
}

/// Convert a Unix byte-count return into a result.
fn check_count(count: isize) -> Result<usize> {
    if count == -1 {
        Err(std::io::Error::last_os_error())
    } else {
        Ok(count as usize)
    }
}

/// Determine whether the descriptor refers to a character device.
pub(crate) fn is_char_device(handle: RawHandle) -> bool {
    let mut status = MaybeUninit::<libc::stat>::uninit();
    if unsafe { libc::fstat(handle, status.as_mut_ptr()) } != 0 {
        return false;
    }
    // SAFETY: fstat succeeded and hence initialized the buffer.
    let status = unsafe { status.assume_init() };
    status.st_mode & libc::S_IFMT == libc::S_IFCHR
}

// ----------------------------------------------------------------------------------------------------------

/// A saved terminal configuration.
struct Config {
    state: libc::termios,
}

impl Config {
    /// Read the descriptor's current configuration.
    fn read(handle: RawHandle) -> Result<Self> {
        let mut state = MaybeUninit::uninit();
        check(unsafe { libc::tcgetattr(handle, state.as_mut_ptr()) })?;
        Ok(Self {
            // SAFETY: tcgetattr succeeded and hence initialized the buffer.
            state: unsafe { state.assume_init() },
        })
    }

    /// Derive a raw-mode configuration whose reads time out after the given
    /// number of deciseconds.
    fn raw_with_timeout(&self, timeout: u8) -> Self {
        let mut state = self.state;
        unsafe { libc::cfmakeraw(from_mut(&mut state)) };
        state.c_cc[libc::VMIN] = 0;
        state.c_cc[libc::VTIME] = timeout;
        Self { state }
    }

    /// Write this configuration to the descriptor.
    fn write(&self, handle: RawHandle) -> Result<()> {
        check(unsafe { libc::tcsetattr(handle, libc::TCSAFLUSH, from_ref(&self.state)) })?;
        Ok(())
    }
}

// ----------------------------------------------------------------------------------------------------------

/// Raw unbuffered input from a terminal descriptor.
struct RawInput {
    handle: RawHandle,
}

impl Read for RawInput {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        check_count(unsafe {
            libc::read(
                self.handle,
                buf.as_mut_ptr() as *mut c_void,
                buf.len() as libc::size_t,
            )
        })
    }
}

/// Raw unbuffered output to a terminal descriptor.
struct RawOutput {
    handle: RawHandle,
}

impl Write for RawOutput {
    fn write(&mut self, buf: &[u8]) -> Result<usize> {
        check_count(unsafe {
            libc::write(
                self.handle,
                buf.as_ptr() as *const c_void,
                buf.len() as libc::size_t,
            )
        })
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

// ----------------------------------------------------------------------------------------------------------

/// A raw-mode session on the stderr descriptor.
///
/// Opening the probe saves the terminal configuration and switches to raw
/// mode with reads timing out in deciseconds. Dropping the probe restores
/// the saved configuration, on early-error paths included.
pub(crate) struct Probe {
    handle: RawHandle,
    saved: Config,
}

impl Probe {
    /// Switch stderr into raw mode with the given read timeout.
    pub fn open(timeout: u8) -> Result<Self> {
        let handle = libc::STDERR_FILENO;
        let saved = Config::read(handle)?;
        saved.raw_with_timeout(timeout).write(handle)?;
        Ok(Self { handle, saved })
    }

    /// Write the bytes to the terminal.
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        RawOutput {
            handle: self.handle,
        }
        .write_all(bytes)
    }

    /// Read reply bytes from the terminal, returning zero on timeout.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<usize> {
        RawInput {
            handle: self.handle,
        }
        .read(buffer)
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        // Restoring the saved configuration is best effort.
        let _ = self.saved.write(self.handle);
    }
}

#[cfg(test)]
mod test {
    use super::is_char_device;
    use std::fs::File;
    use std::os::fd::AsRawFd;

    #[test]
    fn test_char_device() -> std::io::Result<()> {
        let null = File::open("/dev/null")?;
        assert!(is_char_device(null.as_raw_fd()));

        let executable = File::open(std::env::current_exe()?)?;
        assert!(!is_char_device(executable.as_raw_fd()));
        Ok(())
    }
}
