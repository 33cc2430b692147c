//! Base64 encoding and decoding.
//!
//! Three variants are provided: standard (padded `+/` alphabet),
//! URL-safe (unpadded `-_` alphabet) and MIME (padded, 76-symbol lines
//! separated by CRLF, lenient decoding). The top-level `encode` and
//! `decode` functions use the standard variant; the others are reached
//! through the [`Encoder`] and [`Decoder`] presets.
//!
//! ```
//! let encoded = b64::encode(b"hello world");
//! assert_eq!(encoded, "aGVsbG8gd29ybGQ=");
//! assert_eq!(b64::decode(&encoded), Ok(b"hello world".to_vec()));
//! ```
//!
//! Each call is a pure function over a complete input buffer. Output
//! sizes are computed exactly up front, so `encode_into` and
//! `decode_into` never write past, or partially into, a caller buffer
//! that turns out to be too small.

pub mod alphabet;
pub mod decode;
pub mod encode;

pub use alphabet::{Alphabet, PADDING, STANDARD, URL_SAFE};
pub use decode::{decode, decode_into, decoded_size, Decoder, Strictness};
pub use encode::{encode, encode_into, encoded_size, Encoder};
