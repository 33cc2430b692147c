use crate::alphabet::{self, Alphabet, PADDING};
use thiserror::Error;

const CR: u8 = 0x0d;
const LF: u8 = 0x0a;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The output buffer was too small to contain the entire result.
    #[error("Output buffer too small")]
    BufferTooSmall,
}

pub struct Encoder<'a> {
    alphabet: &'a Alphabet,
    padding: bool,
    line_length: usize,
}

impl<'a> Encoder<'a> {
    /// `line_length` is the number of symbols per line before a CRLF is
    /// inserted; 0 disables wrapping.
    pub const fn new(alphabet: &'a Alphabet, padding: bool, line_length: usize) -> Self {
        Self {
            alphabet,
            padding,
            line_length,
        }
    }

    /// Number of symbol characters (including padding, excluding CRLF)
    /// produced for `input_len` input bytes.
    const fn symbol_count(&self, input_len: usize) -> usize {
        (input_len / 3) * 4
            + match input_len % 3 {
                0 => 0,
                1 => {
                    if self.padding {
                        4
                    } else {
                        2
                    }
                }
                _ => {
                    if self.padding {
                        4
                    } else {
                        3
                    }
                }
            }
    }

    /// Exact output size in bytes for `input_len` input bytes, CRLF
    /// included. Empty input encodes to empty output.
    pub const fn encoded_size(&self, input_len: usize) -> usize {
        let symbols = self.symbol_count(input_len);
        if self.line_length > 0 && symbols > 0 {
            // No CRLF after the final symbol.
            symbols + (symbols - 1) / self.line_length * 2
        } else {
            symbols
        }
    }

    /// Encodes `input` into `output`, returning the number of bytes
    /// written. The buffer is checked against `encoded_size` before
    /// anything is written; on error `output` is untouched.
    pub fn encode_into(&self, input: impl AsRef<[u8]>, output: &mut impl AsMut<[u8]>) -> Result<usize, Error> {
        let input = input.as_ref();
        let output = output.as_mut();
        if output.len() < self.encoded_size(input.len()) {
            return Err(Error::BufferTooSmall);
        }
        let total = self.symbol_count(input.len());
        let mut accumulator: usize = 0;
        let mut bits: usize = 0;
        let mut index = 0;
        let mut written = 0;
        for &value in input {
            accumulator = (accumulator << 8) | (value as usize);
            bits += 8;
            while bits >= 6 {
                bits -= 6;
                index = self.put(output, index, &mut written, total, self.alphabet.encode(accumulator >> bits));
                accumulator &= (1 << bits) - 1;
            }
        }
        if bits > 0 {
            index = self.put(output, index, &mut written, total, self.alphabet.encode(accumulator << (6 - bits)));
        }
        if self.padding {
            while written % 4 != 0 {
                index = self.put(output, index, &mut written, total, PADDING);
            }
        }
        Ok(index)
    }

    // Writes one symbol, followed by a CRLF when the line is full and
    // more symbols remain.
    fn put(&self, output: &mut [u8], mut index: usize, written: &mut usize, total: usize, symbol: u8) -> usize {
        output[index] = symbol;
        index += 1;
        *written += 1;
        if self.line_length > 0 && *written < total && *written % self.line_length == 0 {
            output[index] = CR;
            output[index + 1] = LF;
            index += 2;
        }
        index
    }

    pub fn encode(&self, input: impl AsRef<[u8]>) -> String {
        let input = input.as_ref();
        let mut output = vec![0u8; self.encoded_size(input.len())];
        let len = self.encode_into(input, &mut output).unwrap();
        output.truncate(len);
        unsafe { String::from_utf8_unchecked(output) }
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

const STANDARD: Encoder = Encoder::new(&alphabet::STANDARD, true, 0);
const URL_SAFE: Encoder = Encoder::new(&alphabet::URL_SAFE, false, 0);
const MIME: Encoder = Encoder::new(&alphabet::STANDARD, true, 76);

pub fn encode(input: impl AsRef<[u8]>) -> String {
    Encoder::standard().encode(input)
}

pub fn encode_into(input: impl AsRef<[u8]>, output: &mut impl AsMut<[u8]>) -> Result<usize, Error> {
    Encoder::standard().encode_into(input, output)
}

pub fn encoded_size(input_len: usize) -> usize {
    Encoder::standard().encoded_size(input_len)
}
