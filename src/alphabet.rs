use thiserror::Error;

/// The character appended to round the encoded symbol count to a multiple of 4.
pub const PADDING: u8 = b'=';

pub const fn is_padding(value: u8) -> bool {
    value == PADDING
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum Error {
    #[error("Invalid character '{character}' at indexes {first} and {second}")]
    DuplicateCharacter { character: char, first: usize, second: usize },
    #[error("Non-ascii character {character:#02x} at index {index}")]
    NonAsciiCharacter { character: u8, index: usize },
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum DecodeError {
    #[error("Non-ascii character {character:#02x} at index {index}")]
    NonAsciiCharacter { character: u8, index: usize },
    #[error("Invalid character '{character}' at index {index}")]
    InvalidCharacter { character: char, index: usize },
}

/// A 64-character encoding alphabet with its reverse lookup table.
///
/// Immutable once constructed; encoders and decoders borrow it, so one
/// alphabet can serve any number of concurrent calls.
pub struct Alphabet {
    encode: [u8; 64],
    decode: [Option<u8>; 128],
}

impl Alphabet {
    pub const fn new(characters: &[u8; 64]) -> Result<Self, Error> {
        let mut encode = [0u8; 64];
        let mut decode: [Option<u8>; 128] = [None; 128];

        let mut index = 0;
        while index < encode.len() {
            let character = characters[index];
            if character >= 128 {
                return Err(Error::NonAsciiCharacter { index, character });
            }
            if let Some(v) = decode[character as usize] {
                return Err(Error::DuplicateCharacter {
                    character: character as char,
                    first: v as usize,
                    second: index,
                });
            }
            encode[index] = character;
            decode[character as usize] = Some(index as u8);
            index += 1;
        }

        Ok(Self { encode, decode })
    }

    /// Forward lookup: the character for a 6-bit value.
    pub fn encode(&self, value: usize) -> u8 {
        self.encode[value]
    }

    /// Reverse lookup: the 6-bit value for a character. `index` is the
    /// position in the input, reported in the error.
    pub fn decode(&self, value: u8, index: usize) -> Result<u8, DecodeError> {
        if value >= 128 {
            return Err(DecodeError::NonAsciiCharacter { index, character: value });
        }
        match self.decode[value as usize] {
            Some(value) => Ok(value),
            None => Err(DecodeError::InvalidCharacter {
                character: value as char,
                index,
            }),
        }
    }

    pub fn is_symbol(&self, value: u8) -> bool {
        value < 128 && self.decode[value as usize].is_some()
    }

    pub const fn len(&self) -> usize {
        self.encode.len()
    }
}

pub const STANDARD: Alphabet = match Alphabet::new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/") {
    Ok(alphabet) => alphabet,
    Err(_) => panic!("Could not build alphabet"),
};

pub const URL_SAFE: Alphabet = match Alphabet::new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_") {
    Ok(alphabet) => alphabet,
    Err(_) => panic!("Could not build alphabet"),
};
