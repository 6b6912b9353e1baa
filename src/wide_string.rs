// marshaling between Rust strings and the setup API's wide-character buffers

/// Encodes `value` as UTF-16 with a trailing null terminator, suitable for passing
/// to a native call as a PCWSTR.
pub(crate) fn to_utf16_with_nul(value: &str) -> Vec<u16> {
    value.encode_utf16().chain(std::iter::once(0)).collect()
}

/// Decodes a wide-character buffer into a String, truncating at the first null
/// terminator; a buffer with no terminator is decoded in full.
pub(crate) fn string_from_utf16_nul_terminated(
    buffer: &[u16],
) -> Result<String, std::string::FromUtf16Error> {
    let terminator_index = buffer.iter().position(|unit| *unit == 0).unwrap_or(buffer.len());
    String::from_utf16(&buffer[..terminator_index])
}
