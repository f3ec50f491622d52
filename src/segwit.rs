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

//! # Segwit Addresses
//!
//! Encoding and decoding of a witness version and witness program as a
//! bech32 string. The caller supplies the human-readable part; this
//! module only enforces the witness version and program length rules.
//!

use std::fmt;

use crate::bech32::{self, U5};
use crate::bits;
use crate::error::write_err;

/// The minimum byte length of a witness program.
pub const MIN_PROGRAM_LENGTH: usize = 2;

/// The maximum byte length of a witness program.
pub const MAX_PROGRAM_LENGTH: usize = 40;

/// The only pubkey-hash length valid for a version 0 witness program.
pub const V0_PUBKEY_HASH_LENGTH: usize = 20;

/// The only script-hash length valid for a version 0 witness program.
pub const V0_SCRIPT_HASH_LENGTH: usize = 32;

/// The maximum witness version.
pub const MAX_VERSION: u8 = 16;

/// A failure to encode or decode a segwit address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Bech32 encoding error.
    Bech32(bech32::Error),
    /// Bit conversion error in the witness program.
    Bits(bits::Error),
    /// The decoded HRP does not match the expected one.
    HrpMismatch {
        /// The HRP supplied by the caller.
        expected: String,
        /// The HRP found in the address.
        found: String,
    },
    /// The data part is empty, so there is no witness version symbol.
    MissingWitnessVersion,
    /// Witness version must be 0 to 16 inclusive.
    InvalidWitnessVersion(u8),
    /// The witness program must be between 2 and 40 bytes in length.
    InvalidWitnessProgramLength(usize),
    /// A v0 witness program must be either of length 20 or 32.
    InvalidSegwitV0ProgramLength(usize),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::Bech32(ref e) => write_err!(f, "bech32 error"; e),
            Error::Bits(ref e) => write_err!(f, "witness program conversion error"; e),
            Error::HrpMismatch { ref expected, ref found } => {
                write!(f, "invalid human-readable part: {} != {}", expected, found)
            }
            Error::MissingWitnessVersion => write!(f, "the witness version symbol is missing"),
            Error::InvalidWitnessVersion(wver) => {
                write!(f, "invalid witness script version: {}", wver)
            }
            Error::InvalidWitnessProgramLength(len) => write!(
                f,
                "the witness program must be between {} and {} bytes in length, not {}",
                MIN_PROGRAM_LENGTH, MAX_PROGRAM_LENGTH, len
            ),
            Error::InvalidSegwitV0ProgramLength(len) => write!(
                f,
                "a v0 witness program must be length {} or {}, not {}",
                V0_PUBKEY_HASH_LENGTH, V0_SCRIPT_HASH_LENGTH, len
            ),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match *self {
            Error::Bech32(ref e) => Some(e),
            Error::Bits(ref e) => Some(e),
            Error::HrpMismatch { .. }
            | Error::MissingWitnessVersion
            | Error::InvalidWitnessVersion(_)
            | Error::InvalidWitnessProgramLength(_)
            | Error::InvalidSegwitV0ProgramLength(_) => None,
        }
    }
}

impl From<bech32::Error> for Error {
    fn from(e: bech32::Error) -> Error {
        Error::Bech32(e)
    }
}

impl From<bits::Error> for Error {
    fn from(e: bits::Error) -> Error {
        Error::Bits(e)
    }
}

/// Encode a witness version and witness program as a segwit address.
///
/// The program bytes are repacked into the 5-bit alphabet with padding,
/// the version symbol is prepended and the whole payload bech32-encoded.
/// The produced address is decoded again before being returned and any
/// failure of that self-check is propagated.
pub fn encode(hrp: &str, version: u8, program: &[u8]) -> Result<String, Error> {
    if version > MAX_VERSION {
        return Err(Error::InvalidWitnessVersion(version));
    }
    let converted = bits::convert_bits(program, 8, 5, true)?;
    let mut data = Vec::with_capacity(1 + converted.len());
    data.push(U5::try_from_u8(version).expect("version is at most 16"));
    for v in converted {
        data.push(U5::try_from_u8(v).expect("convert_bits masks its output to 5 bits"));
    }

    let ret = bech32::encode(hrp, &data)?;
    decode(hrp, &ret)?;
    Ok(ret)
}

/// Decode a segwit address into its witness version and witness program.
///
/// Fails if the decoded HRP differs from `hrp`, if the version exceeds
/// 16, if the 5-to-8 bit conversion finds non-canonical padding, or if
/// the program length is out of bounds (2 to 40 bytes, and exactly 20
/// or 32 for version 0).
pub fn decode(hrp: &str, addr: &str) -> Result<(u8, Vec<u8>), Error> {
    let (found_hrp, data) = bech32::decode(addr)?;
    if found_hrp != hrp {
        return Err(Error::HrpMismatch {
            expected: hrp.to_owned(),
            found: found_hrp,
        });
    }
    if data.is_empty() {
        return Err(Error::MissingWitnessVersion);
    }
    let version = data[0].to_u8();
    if version > MAX_VERSION {
        return Err(Error::InvalidWitnessVersion(version));
    }

    let fives: Vec<u8> = data[1..].iter().map(|v| v.to_u8()).collect();
    let program = bits::convert_bits(&fives, 5, 8, false)?;
    if program.len() < MIN_PROGRAM_LENGTH || program.len() > MAX_PROGRAM_LENGTH {
        return Err(Error::InvalidWitnessProgramLength(program.len()));
    }
    if version == 0
        && program.len() != V0_PUBKEY_HASH_LENGTH
        && program.len() != V0_SCRIPT_HASH_LENGTH
    {
        return Err(Error::InvalidSegwitV0ProgramLength(program.len()));
    }

    Ok((version, program))
}

#[cfg(test)]
mod tests {
    use super::*;

    const P2WPKH_PROGRAM: [u8; 20] = [
        0x75, 0x1e, 0x76, 0xe8, 0x19, 0x91, 0x96, 0xd4, 0x54, 0x94, 0x1c, 0x45, 0xd1, 0xb3, 0xa3,
        0x23, 0xf1, 0x43, 0x3b, 0xd6,
    ];

    #[test]
    fn decode_p2wpkh() {
        let (version, program) =
            decode("bc", "BC1QW508D6QEJXTDG4Y5R3ZARVARY0C5XW7KV8F3T4").unwrap();
        assert_eq!(version, 0);
        assert_eq!(program, P2WPKH_PROGRAM.to_vec());
    }

    #[test]
    fn encode_p2wpkh() {
        let addr = encode("bc", 0, &P2WPKH_PROGRAM).unwrap();
        assert_eq!(addr, "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
    }

    #[test]
    fn rejects_hrp_mismatch() {
        let err = decode("bc", "tc1qw508d6qejxtdg4y5r3zarvary0c5xw7kg3g4ty").unwrap_err();
        assert_eq!(
            err,
            Error::HrpMismatch { expected: "bc".to_owned(), found: "tc".to_owned() }
        );
    }

    #[test]
    fn rejects_invalid_program_length() {
        // 1-byte program
        assert_eq!(
            decode("bc", "bc1rw5uspcuh"),
            Err(Error::InvalidWitnessProgramLength(1))
        );
        // 41-byte program
        let err = decode(
            "bc",
            "bc10w508d6qejxtdg4y5r3zarvary0c5xw7kw508d6qejxtdg4y5r3zarvary0c5xw7kw5rljs90",
        )
        .unwrap_err();
        assert_eq!(err, Error::InvalidWitnessProgramLength(41));
    }

    #[test]
    fn rejects_bad_v0_program_length() {
        // 16-byte program is fine for v2 but not for v0.
        assert!(decode("bc", "bc1zw508d6qejxtdg4y5r3zarvaryvg6kdaj").is_ok());
        assert_eq!(
            decode("bc", "BC1QR508D6QEJXTDG4Y5R3ZARVARYV98GJ9P"),
            Err(Error::InvalidSegwitV0ProgramLength(16))
        );

        assert_eq!(
            encode("bc", 0, &[0x75; 16]),
            Err(Error::InvalidSegwitV0ProgramLength(16))
        );
    }

    #[test]
    fn rejects_corrupted_checksum() {
        assert_eq!(
            decode("bc", "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t5"),
            Err(Error::Bech32(bech32::Error::InvalidChecksum))
        );
    }

    #[test]
    fn witness_version_bounds() {
        let addr = encode("bc", 16, &[0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(decode("bc", &addr).unwrap(), (16, vec![0, 1, 2, 3, 4, 5]));

        assert_eq!(
            encode("bc", 17, &[0, 1, 2, 3, 4, 5]),
            Err(Error::InvalidWitnessVersion(17))
        );
        // v17 symbol smuggled in through the plain codec
        let raw = bech32::encode(
            "bc",
            &[17, 0, 0, 0, 0, 0, 0, 0, 0]
                .iter()
                .map(|&v| U5::try_from_u8(v).unwrap())
                .collect::<Vec<_>>(),
        )
        .unwrap();
        assert_eq!(decode("bc", &raw), Err(Error::InvalidWitnessVersion(17)));
    }

    #[test]
    fn rejects_empty_data_part() {
        let addr = bech32::encode("bc", &[]).unwrap();
        assert_eq!(decode("bc", &addr), Err(Error::MissingWitnessVersion));
    }
}
