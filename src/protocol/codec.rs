//! Transfer encoding for file bytes carried inside text commands.
//!
//! Standard base64 alphabet with `=` padding. Every encoded unit is one
//! ASCII byte, so offsets into the encoded text are byte offsets.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Encode raw file bytes into the transfer representation.
pub fn encode(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Decode the transfer representation back into raw bytes.
///
/// Returns `None` if `text` is not canonical padded base64.
pub fn decode(text: &str) -> Option<Vec<u8>> {
    STANDARD.decode(text.as_bytes()).ok()
}

/// Number of encoded units produced for `raw_len` input bytes.
pub const fn encoded_len(raw_len: usize) -> usize {
    raw_len.div_ceil(3) * 4
}
