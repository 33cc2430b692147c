use crate::alphabet::{self, Alphabet, PADDING};
use thiserror::Error;

const CR: u8 = 0x0d;
const LF: u8 = 0x0a;

/// How characters outside the alphabet are treated while decoding.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Strictness {
    /// Every character must be a symbol, padding, CR or LF.
    Strict,
    /// Anything else is silently skipped (MIME behaviour).
    Lenient,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    #[error("Output buffer too small")]
    BufferTooSmall,
    #[error("Invalid character '{character}' at index {index}")]
    InvalidCharacter { character: char, index: usize },
    #[error("Non-ascii character {character:#02x} at index {index}")]
    NonAsciiCharacter { character: u8, index: usize },
    /// The input ends with a single dangling symbol, which carries fewer
    /// than the 8 bits needed for a whole byte.
    #[error("Trailing symbol leaves fewer than 8 bits to decode")]
    RemainingBits,
}

impl From<alphabet::DecodeError> for Error {
    fn from(error: alphabet::DecodeError) -> Self {
        match error {
            alphabet::DecodeError::InvalidCharacter { character, index } => Error::InvalidCharacter { character, index },
            alphabet::DecodeError::NonAsciiCharacter { character, index } => Error::NonAsciiCharacter { character, index },
        }
    }
}

pub struct Decoder<'a> {
    alphabet: &'a Alphabet,
    strictness: Strictness,
}

impl<'a> Decoder<'a> {
    pub const fn new(alphabet: &'a Alphabet, strictness: Strictness) -> Self {
        Self { alphabet, strictness }
    }

    // Symbols contributing data: everything up to the first padding
    // character, minus whatever the policy skips.
    fn count_symbols(&self, input: &[u8]) -> usize {
        input
            .iter()
            .take_while(|&&value| value != PADDING)
            .filter(|&&value| self.alphabet.is_symbol(value))
            .count()
    }

    fn size_for(symbols: usize) -> Result<usize, Error> {
        let size = symbols / 4 * 3;
        match symbols % 4 {
            0 => Ok(size),
            1 => Err(Error::RemainingBits),
            remainder => Ok(size + remainder - 1),
        }
    }

    /// Exact decoded size for `input`. Fails with `RemainingBits` when
    /// the input cannot form whole bytes.
    pub fn decoded_size(&self, input: impl AsRef<[u8]>) -> Result<usize, Error> {
        Self::size_for(self.count_symbols(input.as_ref()))
    }

    fn validate(&self, input: &[u8]) -> Result<(), Error> {
        for (index, &value) in input.iter().enumerate() {
            if value == PADDING || value == CR || value == LF {
                continue;
            }
            self.alphabet.decode(value, index)?;
        }
        Ok(())
    }

    /// Decodes `input` into `output`, returning the number of bytes
    /// written. Character validation, the size check and the buffer
    /// check all happen before anything is written; on error `output`
    /// is untouched.
    pub fn decode_into(&self, input: impl AsRef<[u8]>, output: &mut impl AsMut<[u8]>) -> Result<usize, Error> {
        let input = input.as_ref();
        let output = output.as_mut();
        if let Strictness::Strict = self.strictness {
            self.validate(input)?;
        }
        let size = Self::size_for(self.count_symbols(input))?;
        if output.len() < size {
            return Err(Error::BufferTooSmall);
        }
        let mut accumulator: usize = 0;
        let mut bits: usize = 0;
        let mut output_index = 0;
        for (input_index, &value) in input.iter().enumerate() {
            if value == PADDING {
                break;
            }
            if !self.alphabet.is_symbol(value) {
                continue;
            }
            let symbol = self.alphabet.decode(value, input_index)?;
            accumulator = (accumulator << 6) | (symbol as usize);
            bits += 6;
            if bits >= 8 {
                bits -= 8;
                output[output_index] = (accumulator >> bits) as u8;
                output_index += 1;
                accumulator &= (1 << bits) - 1;
            }
        }
        // A short final group leaves up to 4 bits in the accumulator;
        // they carry no whole byte and are dropped.
        Ok(output_index)
    }

    pub fn decode(&self, input: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
        let input = input.as_ref();
        let mut output = vec![0u8; Self::size_for(self.count_symbols(input))?];
        let len = self.decode_into(input, &mut output)?;
        output.truncate(len);
        Ok(output)
    }

    pub fn standard() -> &'static Self {
        &STANDARD
    }

    pub fn url_safe() -> &'static Self {
        &URL_SAFE
    }

    pub fn mime() -> &'static Self {
        &MIME
    }
}

const STANDARD: Decoder = Decoder::new(&alphabet::STANDARD, Strictness::Strict);
const URL_SAFE: Decoder = Decoder::new(&alphabet::URL_SAFE, Strictness::Strict);
const MIME: Decoder = Decoder::new(&alphabet::STANDARD, Strictness::Lenient);

pub fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>, Error> {
    Decoder::standard().decode(input)
}

pub fn decode_into(input: impl AsRef<[u8]>, output: &mut impl AsMut<[u8]>) -> Result<usize, Error> {
    Decoder::standard().decode_into(input, output)
}

pub fn decoded_size(input: impl AsRef<[u8]>) -> Result<usize, Error> {
    Decoder::standard().decoded_size(input)
}

#[cfg(test)]
mod tests {
    use super::{Decoder, Error};
    use proptest::prelude::*;
    use crate::encode::Encoder;

    #[test]
    fn decode() {
        assert_eq!(super::decode("FPucA9l+"), Ok(vec![0x14, 0xfb, 0x9c, 0x03, 0xd9, 0x7e]));
        assert_eq!(super::decode("FPucA9k="), Ok(vec![0x14, 0xfb, 0x9c, 0x03, 0xd9]));
        assert_eq!(super::decode("FPucAw=="), Ok(vec![0x14, 0xfb, 0x9c, 0x03]));
        assert_eq!(super::decode(""), Ok(vec![]));
        assert_eq!(super::decode("Zg=="), Ok(b"f".to_vec()));
        assert_eq!(super::decode("Zm8="), Ok(b"fo".to_vec()));
        assert_eq!(super::decode("Zm9v"), Ok(b"foo".to_vec()));
        assert_eq!(super::decode("Zm9vYg=="), Ok(b"foob".to_vec()));
        assert_eq!(super::decode("Zm9vYmE="), Ok(b"fooba".to_vec()));
        assert_eq!(super::decode("Zm9vYmFy"), Ok(b"foobar".to_vec()));
    }

    #[test]
    fn decode_without_padding() {
        assert_eq!(super::decode("Zg"), Ok(b"f".to_vec()));
        assert_eq!(super::decode("Zm8"), Ok(b"fo".to_vec()));
        assert_eq!(Decoder::url_safe().decode("_w"), Ok(vec![0xff]));
        assert_eq!(Decoder::url_safe().decode("__8"), Ok(vec![0xff, 0xff]));
    }

    #[test]
    fn decode_skips_line_breaks() {
        assert_eq!(super::decode("Zm9v\r\nYmFy"), Ok(b"foobar".to_vec()));
        let wrapped = Encoder::mime().encode(vec![0x5au8; 100]);
        assert_eq!(Decoder::mime().decode(wrapped), Ok(vec![0x5au8; 100]));
    }

    #[test]
    fn decode_rejects_invalid_characters() {
        assert_eq!(
            super::decode("????"),
            Err(Error::InvalidCharacter { character: '?', index: 0 })
        );
        assert_eq!(
            super::decode("Zm9 v"),
            Err(Error::InvalidCharacter { character: ' ', index: 3 })
        );
        assert_eq!(
            super::decode([0xffu8, 0xff]),
            Err(Error::NonAsciiCharacter { character: 0xff, index: 0 })
        );
        // '-' belongs to the URL-safe alphabet only.
        assert_eq!(
            super::decode("ab-d"),
            Err(Error::InvalidCharacter { character: '-', index: 2 })
        );
    }

    #[test]
    fn decode_rejects_dangling_symbol() {
        assert_eq!(super::decode("/==="), Err(Error::RemainingBits));
        assert_eq!(super::decode("/"), Err(Error::RemainingBits));
        assert_eq!(super::decode("Zm9vY"), Err(Error::RemainingBits));
    }

    #[test]
    fn decode_lenient_skips_garbage() {
        assert_eq!(Decoder::mime().decode("/?w=="), Ok(vec![0xff]));
        assert_eq!(Decoder::mime().decode("Zm9v YmFy"), Ok(b"foobar".to_vec()));
        assert_eq!(Decoder::mime().decode("????"), Ok(vec![]));
    }

    #[test]
    fn decoded_size() {
        assert_eq!(super::decoded_size(""), Ok(0));
        assert_eq!(super::decoded_size("Zm9vYmE="), Ok(5));
        assert_eq!(super::decoded_size("Zm9v\r\nYmFy"), Ok(6));
        assert_eq!(super::decoded_size("/==="), Err(Error::RemainingBits));
    }

    #[test]
    fn decode_into_checks_buffer_before_writing() {
        let mut output = [0u8; 2];
        assert_eq!(super::decode_into("Zm9v", &mut output), Err(Error::BufferTooSmall));
        assert_eq!(output, [0u8; 2]);

        let mut output = [0u8; 3];
        assert_eq!(super::decode_into("Zm9v", &mut output), Ok(3));
        assert_eq!(&output, b"foo");
    }

    proptest! {
        #[test]
        fn round_trip_standard(input in proptest::collection::vec(any::<u8>(), 0..300)) {
            let encoded = Encoder::standard().encode(&input);
            prop_assert_eq!(Decoder::standard().decode(encoded), Ok(input));
        }

        #[test]
        fn round_trip_url_safe(input in proptest::collection::vec(any::<u8>(), 0..300)) {
            let encoded = Encoder::url_safe().encode(&input);
            prop_assert_eq!(Decoder::url_safe().decode(encoded), Ok(input));
        }

        #[test]
        fn round_trip_mime(input in proptest::collection::vec(any::<u8>(), 0..300)) {
            let encoded = Encoder::mime().encode(&input);
            prop_assert_eq!(Decoder::mime().decode(&encoded), Ok(input.clone()));
            prop_assert_eq!(Decoder::mime().decoded_size(&encoded), Ok(input.len()));
        }
    }
}
