use crate::foundation::error::{ScrubError, ScrubResult};

/// The two recognized GIF magic signatures.
pub const GIF_SIGNATURES: [&[u8; 6]; 2] = [b"GIF87a", b"GIF89a"];

/// Number of leading bytes shown in a signature failure.
pub const SIGNATURE_PREVIEW_BYTES: usize = 16;

/// Whether `bytes` starts with `GIF87a` or `GIF89a`.
pub fn has_gif_signature(bytes: &[u8]) -> bool {
    bytes
        .get(..6)
        .is_some_and(|head| GIF_SIGNATURES.iter().any(|sig| head == sig.as_slice()))
}

/// Lower-case, space separated hex of the first `count` bytes.
pub fn first_bytes_hex(bytes: &[u8], count: usize) -> String {
    bytes
        .iter()
        .take(count)
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Reject bytes that are not GIF data before any decoding is attempted.
pub fn ensure_gif_signature(bytes: &[u8]) -> ScrubResult<()> {
    if has_gif_signature(bytes) {
        return Ok(());
    }
    Err(ScrubError::signature(first_bytes_hex(
        bytes,
        SIGNATURE_PREVIEW_BYTES,
    )))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/signature.rs"]
mod tests;
