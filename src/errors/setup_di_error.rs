use thiserror::Error;
use windows::Win32::Foundation::ERROR_NO_MORE_ITEMS;

/// Failure reported by one of the native setup API calls.
#[derive(Debug, Error)]
pub enum SetupDiError {
    /// A native call reported failure; the payload is the unmodified win32 error code.
    #[error("setup API call failed with win32 error {0}")]
    Win32Error(/*win32_error: */ u32),
    /// A wide-character buffer returned by a native call did not decode as UTF-16.
    #[error("setup API string could not be decoded as UTF-16: {0}")]
    StringDecodingError(#[from] std::string::FromUtf16Error),
}

impl SetupDiError {
    /// The native win32 error code, if this error carries one.
    pub fn win32_code(&self) -> Option<u32> {
        match self {
            SetupDiError::Win32Error(win32_error) => Some(*win32_error),
            SetupDiError::StringDecodingError(_) => None,
        }
    }

    /// Returns true when an enumeration call indexed past the end of the device
    /// information set; this is the conventional end-of-set signal, not a hard failure.
    pub fn is_no_more_items(&self) -> bool {
        self.win32_code() == Some(ERROR_NO_MORE_ITEMS.0)
    }
}
