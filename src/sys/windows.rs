use std::ffi::c_void;
use std::fs::OpenOptions;
use std::io::{Error, ErrorKind, Result};
use std::os::windows::io::{AsRawHandle, OwnedHandle};
use std::ptr::{from_mut, null};

use windows_sys::Win32::Foundation;
use windows_sys::Win32::Storage::FileSystem;
use windows_sys::Win32::System::Console::{self, CONSOLE_MODE as ConsoleMode};
use windows_sys::Win32::System::Threading;

use super::RawHandle;

/// Convert a Windows boolean status return into a result.
fn check(status: i32) -> Result<()> {
    if status == 0 {
        Err(Error::last_os_error())
    } else {
        Ok(())
    }
}

/// Determine whether the handle refers to a character device.
pub(crate) fn is_char_device(handle: RawHandle) -> bool {
    unsafe { FileSystem::GetFileType(handle) == FileSystem::FILE_TYPE_CHAR }
}

// ----------------------------------------------------------------------------------------------------------

/// A raw-mode session with the console.
///
/// Opening the probe saves the console's input mode and enables virtual
/// terminal input with echo and line editing disabled. Dropping the probe
/// restores the saved mode, on early-error paths included. The query itself
/// goes out through the standard error handle, and the reply comes back
/// through the console input buffer with reads timing out via
/// `WaitForSingleObject`.
pub(crate) struct Probe {
    input: OwnedHandle,
    errout: RawHandle,
    timeout: u32,
    saved: ConsoleMode,
}

impl Probe {
    /// Reconfigure the console with the given read timeout in deciseconds.
    pub fn open(timeout: u8) -> Result<Self> {
        let input: OwnedHandle = OpenOptions::new()
            .read(true)
            .write(true)
            .open("CONIN$")?
            .into();
        let errout = unsafe { Console::GetStdHandle(Console::STD_ERROR_HANDLE) };
        if errout == Foundation::INVALID_HANDLE_VALUE {
            return Err(Error::last_os_error());
        }

        let mut saved = 0;
        check(unsafe { Console::GetConsoleMode(input.as_raw_handle(), from_mut(&mut saved)) })?;
        let mode = (saved | Console::ENABLE_VIRTUAL_TERMINAL_INPUT)
            & !Console::ENABLE_ECHO_INPUT
            & !Console::ENABLE_LINE_INPUT
            & !Console::ENABLE_PROCESSED_INPUT;
        check(unsafe { Console::SetConsoleMode(input.as_raw_handle(), mode) })?;

        Ok(Self {
            input,
            errout,
            timeout: 100 * u32::from(timeout),
            saved,
        })
    }

    /// Write the bytes to the console.
    pub fn send(&mut self, bytes: &[u8]) -> Result<()> {
        let mut written = 0;
        while written < bytes.len() {
            let pending = &bytes[written..];
            let mut count: u32 = 0;
            check(unsafe {
                Console::WriteConsoleA(
                    self.errout,
                    pending.as_ptr() as *const c_void,
                    pending.len() as u32,
                    from_mut(&mut count),
                    null(),
                )
            })?;
            if count == 0 {
                return Err(ErrorKind::WriteZero.into());
            }
            written += count as usize;
        }
        Ok(())
    }

    /// Read reply bytes from the console, returning zero on timeout.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let status =
            unsafe { Threading::WaitForSingleObject(self.input.as_raw_handle(), self.timeout) };
        if status == Foundation::WAIT_OBJECT_0 {
            let mut count: u32 = 0;
            check(unsafe {
                Console::ReadConsoleA(
                    self.input.as_raw_handle(),
                    buffer.as_mut_ptr() as *mut c_void,
                    buffer.len() as u32,
                    from_mut(&mut count),
                    null(),
                )
            })?;
            Ok(count as usize)
        } else if status == Foundation::WAIT_TIMEOUT {
            Ok(0)
        } else if status == Foundation::WAIT_FAILED {
            Err(Error::last_os_error())
        } else {
            Err(ErrorKind::Other.into())
        }
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        // Restoring the saved input mode is best effort.
        let _ = unsafe { Console::SetConsoleMode(self.input.as_raw_handle(), self.saved) };
    }
}
