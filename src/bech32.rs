// Rust Bech32 Address Library
// Written by
//   The Bech32 Address developers
//
// To the extent possible under law, the author(s) have dedicated all
// copyright and related and neighboring rights to this software to
// the public domain worldwide. This software is distributed without
// any warranty.
//
// You should have received a copy of the CC0 Public Domain Dedication
// along with this software.
// If not, see <http://creativecommons.org/publicdomain/zero/1.0/>.
//

//! # Bech32
//!
//! The checksummed base32 format: a human-readable part, a `'1'`
//! separator, the base32-rendered data and a six symbol checksum. The
//! whole string is case-insensitive but must not mix cases, and is at
//! most 90 characters long.
//!

use std::convert::TryFrom;
use std::fmt;

use crate::error::impl_std_error;

/// Human-readable part and data part separator.
const SEP: char = '1';

/// Number of checksum symbols appended to the data part.
const CHECKSUM_LENGTH: usize = 6;

/// Encoding character set. Maps data value -> char.
const CHARSET: [char; 32] = [
    'q', 'p', 'z', 'r', 'y', '9', 'x', '8', 'g', 'f', '2', 't', 'v', 'd', 'w', '0', 's', '3', 'j',
    'n', '5', '4', 'k', 'h', 'c', 'e', '6', 'm', 'u', 'a', '7', 'l',
];

// Reverse character set. Maps ASCII byte -> CHARSET index on [0,31]
const CHARSET_REV: [i8; 128] = [
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1,
    15, -1, 10, 17, 21, 20, 26, 30, 7, 5, -1, -1, -1, -1, -1, -1, -1, 29, -1, 24, 13, 25, 9, 8, 23,
    -1, 18, 22, 31, 27, 19, -1, 1, 0, 3, 16, 11, 28, 12, 14, 6, 4, 2, -1, -1, -1, -1, -1, -1, 29,
    -1, 24, 13, 25, 9, 8, 23, -1, 18, 22, 31, 27, 19, -1, 1, 0, 3, 16, 11, 28, 12, 14, 6, 4, 2, -1,
    -1, -1, -1, -1,
];

/// Generator coefficients of the BCH checksum polynomial.
const GEN: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

/// A 5-bit unsigned integer, one symbol of the bech32 data alphabet.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct U5(u8);

impl U5 {
    /// Converts a `u8` into a `U5`, failing if the value does not fit in 5 bits.
    pub fn try_from_u8(value: u8) -> Result<U5, Error> {
        if value > 31 {
            Err(Error::InvalidData(value))
        } else {
            Ok(U5(value))
        }
    }

    /// Returns the numeric value of the symbol.
    pub fn to_u8(self) -> u8 {
        self.0
    }
}

impl From<U5> for u8 {
    fn from(v: U5) -> u8 {
        v.0
    }
}

impl TryFrom<u8> for U5 {
    type Error = Error;

    fn try_from(value: u8) -> Result<U5, Error> {
        U5::try_from_u8(value)
    }
}

#[cfg(feature = "serde")]
impl crate::serde::Serialize for U5 {
    fn serialize<S: crate::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u8(self.0)
    }
}

#[cfg(feature = "serde")]
impl<'de> crate::serde::Deserialize<'de> for U5 {
    fn deserialize<D: crate::serde::Deserializer<'de>>(d: D) -> Result<U5, D::Error> {
        use crate::serde::de::{Error, Unexpected};

        let value = <u8 as crate::serde::Deserialize>::deserialize(d)?;
        U5::try_from_u8(value).map_err(|_| {
            D::Error::invalid_value(Unexpected::Unsigned(value.into()), &"a value in range 0..32")
        })
    }
}

/// A failure to encode or decode a bech32 string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A byte outside the printable US-ASCII range 33-126.
    InvalidCharacter {
        /// Byte index of the offending character.
        pos: usize,
        /// Value of the offending byte.
        byte: u8,
    },
    /// The string mixes lowercase and uppercase characters.
    MixedCase,
    /// The string does not contain the `'1'` separator.
    MissingSeparator,
    /// The separator leaves an empty human-readable part or a data part
    /// shorter than the checksum, or the string exceeds 90 characters.
    InvalidSeparatorPosition {
        /// Byte index of the last `'1'` in the string.
        pos: usize,
        /// Total length of the string.
        len: usize,
    },
    /// A data-part character that is not in the bech32 alphabet.
    UnknownDataCharacter {
        /// Byte index of the offending character.
        pos: usize,
        /// The offending character (lowercase-normalized).
        ch: char,
    },
    /// The checksum does not match the rest of the string.
    InvalidChecksum,
    /// A data value does not fit in 5 bits.
    InvalidData(u8),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::InvalidCharacter { pos, byte } => {
                write!(f, "invalid character (code={}) at position {}", byte, pos)
            }
            Error::MixedCase => write!(f, "mixed-case strings not allowed"),
            Error::MissingSeparator => {
                write!(f, "missing human-readable separator, \"{}\"", SEP)
            }
            Error::InvalidSeparatorPosition { pos, len } => {
                write!(f, "invalid separator position {} in string of length {}", pos, len)
            }
            Error::UnknownDataCharacter { pos, ch } => {
                write!(f, "unknown data character {:?} at position {}", ch, pos)
            }
            Error::InvalidChecksum => write!(f, "invalid checksum"),
            Error::InvalidData(v) => {
                write!(f, "invalid data value {}, must be in range 0..32", v)
            }
        }
    }
}

impl_std_error!(Error);

/// Encode a bech32 payload to a string.
///
/// The checksum is computed over the human-readable part and the data,
/// and the resulting string is decoded again before being returned; any
/// failure of that self-check (for example an HRP with bytes outside the
/// printable ASCII range, or a mixed-case result) is propagated.
pub fn encode(hrp: &str, data: &[U5]) -> Result<String, Error> {
    let mut ret = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LENGTH);
    ret.push_str(hrp);
    ret.push(SEP);
    let checksum = create_checksum(hrp.as_bytes(), data);
    for p in data.iter().chain(checksum.iter()) {
        ret.push(CHARSET[p.0 as usize]);
    }

    decode(&ret)?;
    Ok(ret)
}

/// Encode a bech32 payload to an [`fmt::Formatter`].
///
/// Unlike [`encode`] this performs no validation of the human-readable
/// part and no self-check of the produced string, so it is suitable for
/// `Display` impls of types whose parts are known to be valid.
pub fn encode_to_fmt<T: AsRef<[U5]>>(fmt: &mut fmt::Formatter, hrp: &str, data: T) -> fmt::Result {
    let checksum = create_checksum(hrp.as_bytes(), data.as_ref());
    write!(fmt, "{}{}", hrp, SEP)?;
    for p in data.as_ref().iter().chain(checksum.iter()) {
        write!(fmt, "{}", CHARSET[p.0 as usize])?;
    }
    Ok(())
}

/// Decode a bech32 string into the HRP and the data symbols.
///
/// The HRP is returned lowercase-normalized regardless of the case of
/// the input string. The six checksum symbols are verified and stripped
/// from the returned data.
pub fn decode(s: &str) -> Result<(String, Vec<U5>), Error> {
    let mut has_lower = false;
    let mut has_upper = false;
    for (pos, b) in s.bytes().enumerate() {
        // Valid subset of ASCII
        if !(33..=126).contains(&b) {
            return Err(Error::InvalidCharacter { pos, byte: b });
        }
        if b.is_ascii_lowercase() {
            has_lower = true;
        } else if b.is_ascii_uppercase() {
            has_upper = true;
        }
    }
    // Ensure no mixed case
    if has_lower && has_upper {
        return Err(Error::MixedCase);
    }
    let s = s.to_ascii_lowercase();

    // Split at the last separator and check the resulting lengths: a
    // one character HRP and the six checksum symbols are the minimum,
    // 90 characters the overall maximum.
    let pos = match s.rfind(SEP) {
        None => return Err(Error::MissingSeparator),
        Some(pos) => pos,
    };
    if pos < 1 || pos + 1 + CHECKSUM_LENGTH > s.len() || s.len() > 90 {
        return Err(Error::InvalidSeparatorPosition { pos, len: s.len() });
    }

    let hrp = &s[..pos];
    let mut data = Vec::with_capacity(s.len() - pos - 1);
    for (n, b) in s.bytes().enumerate().skip(pos + 1) {
        // The index is in range because every byte was checked to be in
        // [33, 126] above, and CHARSET_REV covers the whole ASCII range.
        let value = CHARSET_REV[b as usize];
        if value < 0 {
            return Err(Error::UnknownDataCharacter { pos: n, ch: b as char });
        }
        data.push(U5(value as u8));
    }

    if !verify_checksum(hrp.as_bytes(), &data) {
        return Err(Error::InvalidChecksum);
    }

    // Remove the checksum from the data payload
    let data_len = data.len() - CHECKSUM_LENGTH;
    data.truncate(data_len);

    Ok((hrp.to_owned(), data))
}

fn create_checksum(hrp: &[u8], data: &[U5]) -> [U5; CHECKSUM_LENGTH] {
    let mut values = Vec::with_capacity(2 * hrp.len() + 1 + data.len() + CHECKSUM_LENGTH);
    hrp_expand(hrp, &mut values);
    values.extend_from_slice(data);
    // Pad with 6 zeros
    values.extend_from_slice(&[U5(0); CHECKSUM_LENGTH]);
    let plm = polymod(&values) ^ 1;
    let mut checksum = [U5(0); CHECKSUM_LENGTH];
    for (p, sym) in checksum.iter_mut().enumerate() {
        *sym = U5(((plm >> (5 * (5 - p))) & 0x1f) as u8);
    }
    checksum
}

fn verify_checksum(hrp: &[u8], data: &[U5]) -> bool {
    let mut exp = Vec::with_capacity(2 * hrp.len() + 1 + data.len());
    hrp_expand(hrp, &mut exp);
    exp.extend_from_slice(data);
    polymod(&exp) == 1
}

/// Expands the HRP into its checksum-input form: the high 3 bits of each
/// byte, a zero separator, then the low 5 bits of each byte. Both case
/// and separator position feed the checksum this way.
fn hrp_expand(hrp: &[u8], v: &mut Vec<U5>) {
    for b in hrp {
        v.push(U5(b >> 5));
    }
    v.push(U5(0));
    for b in hrp {
        v.push(U5(b & 0x1f));
    }
}

/// The BCH polynomial remainder over the symbol stream: a 25-bit shift
/// register with top-bit feedback against the 5 generator coefficients,
/// seeded at 1.
fn polymod(values: &[U5]) -> u32 {
    let mut chk: u32 = 1;
    for v in values {
        let top = chk >> 25;
        chk = (chk & 0x1ff_ffff) << 5 ^ u32::from(v.0);
        for i in 0..5 {
            if (top >> i) & 1 == 1 {
                chk ^= GEN[i];
            }
        }
    }
    chk
}

#[cfg(test)]
mod tests {
    use super::*;

    fn u5s(values: &[u8]) -> Vec<U5> {
        values.iter().map(|&v| U5::try_from_u8(v).unwrap()).collect()
    }

    #[test]
    fn u5_range() {
        assert_eq!(U5::try_from_u8(31).map(U5::to_u8), Ok(31));
        assert_eq!(U5::try_from_u8(32), Err(Error::InvalidData(32)));
        assert_eq!(u8::from(U5::try_from_u8(7).unwrap()), 7);
    }

    #[test]
    fn hrp_expand_bc() {
        let mut v = Vec::new();
        hrp_expand(b"bc", &mut v);
        assert_eq!(v, u5s(&[3, 3, 0, 2, 3]));
    }

    #[test]
    fn checksum_of_empty_data() {
        // "a12uel5l" is a valid bech32 string, so the checksum of an
        // empty payload under HRP "a" is the charset-decoded "2uel5l".
        let checksum = create_checksum(b"a", &[]);
        assert_eq!(checksum.to_vec(), u5s(&[10, 28, 25, 31, 20, 31]));
        assert!(verify_checksum(b"a", &u5s(&[10, 28, 25, 31, 20, 31])));
    }

    #[test]
    fn encode_empty_data() {
        assert_eq!(encode("a", &[]).unwrap(), "a12uel5l");
    }

    #[test]
    fn decode_is_case_insensitive() {
        let (hrp, data) = decode("A12UEL5L").unwrap();
        assert_eq!(hrp, "a");
        assert!(data.is_empty());
        assert_eq!(decode("A12UEL5L").unwrap(), decode("a12uel5l").unwrap());
    }

    #[test]
    fn decode_rejects_mixed_case() {
        assert_eq!(decode("A12uel5l"), Err(Error::MixedCase));
    }

    #[test]
    fn decode_rejects_out_of_range_characters() {
        assert_eq!(
            decode("\u{20}1nwldj5"),
            Err(Error::InvalidCharacter { pos: 0, byte: 0x20 })
        );
        assert_eq!(
            decode("\u{7f}1axkwrx"),
            Err(Error::InvalidCharacter { pos: 0, byte: 0x7f })
        );
    }

    #[test]
    fn decode_rejects_missing_separator() {
        assert_eq!(decode("pzry9x0s0muk"), Err(Error::MissingSeparator));
    }

    #[test]
    fn decode_rejects_bad_separator_position() {
        // empty HRP
        assert_eq!(
            decode("1qzzfhee"),
            Err(Error::InvalidSeparatorPosition { pos: 0, len: 8 })
        );
        // data part shorter than the checksum
        assert_eq!(
            decode("a1qqqqq"),
            Err(Error::InvalidSeparatorPosition { pos: 1, len: 7 })
        );
        // 91 characters
        let long = format!("a1{}", "q".repeat(89));
        assert_eq!(
            decode(&long),
            Err(Error::InvalidSeparatorPosition { pos: 1, len: 91 })
        );
    }

    #[test]
    fn decode_rejects_unknown_data_character() {
        assert_eq!(
            decode("x1b4n0q5v"),
            Err(Error::UnknownDataCharacter { pos: 2, ch: 'b' })
        );
    }

    #[test]
    fn decode_rejects_corrupted_checksum() {
        let valid = "abcdef1qpzry9x8gf2tvdw0s3jn54khce6mua7lmqqqxw";
        assert!(decode(valid).is_ok());

        // flip a single data character
        let corrupted = valid.replacen("qpzry", "qqzry", 1);
        assert_eq!(decode(&corrupted), Err(Error::InvalidChecksum));
    }

    #[test]
    fn encode_rejects_invalid_hrp() {
        // The self-check decode catches HRP bytes outside [33, 126].
        assert_eq!(
            encode("\u{20}", &[]),
            Err(Error::InvalidCharacter { pos: 0, byte: 0x20 })
        );
    }

    #[test]
    fn encode_decode_roundtrip() {
        let data = u5s(&[0, 1, 2, 3, 31, 30, 29, 15]);
        let s = encode("test", &data).unwrap();
        let (hrp, decoded) = decode(&s).unwrap();
        assert_eq!(hrp, "test");
        assert_eq!(decoded, data);
    }

    #[test]
    fn encode_to_fmt_matches_encode() {
        struct DisplayBech32<'a>(&'a str, &'a [U5]);
        impl<'a> fmt::Display for DisplayBech32<'a> {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                encode_to_fmt(f, self.0, self.1)
            }
        }

        let data = u5s(&[16, 1, 2, 3, 4, 5]);
        let via_fmt = DisplayBech32("tb", &data).to_string();
        assert_eq!(via_fmt, encode("tb", &data).unwrap());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn u5_serde() {
        use serde_test::{assert_tokens, Token};

        let v = U5::try_from_u8(21).unwrap();
        assert_tokens(&v, &[Token::U8(21)]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn u5_serde_json() {
        let v: Vec<U5> = u5s(&[0, 15, 31]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[0,15,31]");
        let back: Vec<U5> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);

        assert!(serde_json::from_str::<U5>("32").is_err());
    }
}
