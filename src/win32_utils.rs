use windows::Win32::Foundation::{GetLastError, WIN32_ERROR};

/// Captures the calling thread's last-error code for the native call that just failed.
pub(crate) fn get_last_error_as_win32_error() -> WIN32_ERROR {
    unsafe { GetLastError() }
}
