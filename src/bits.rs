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

//! # Bit Group Conversion
//!
//! Repacking of fixed-width unsigned integer sequences between two bit
//! widths, MSB-first. Used to convert 8-bit witness program bytes to the
//! 5-bit bech32 alphabet and back.
//!

use std::fmt;

use crate::error::impl_std_error;

/// A failure to convert between bit widths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An input value does not fit in `from` bits.
    DataOutOfRange {
        /// Index of the offending value in the input.
        index: usize,
        /// The offending value.
        value: u8,
        /// The declared input width in bits.
        from: u32,
    },
    /// On an unpadded conversion, a whole input group was left unconsumed.
    IllegalPadding,
    /// On an unpadded conversion, the leftover bits were not all zero.
    NonZeroPadding,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Error::DataOutOfRange { index, value, from } => {
                write!(f, "invalid data range: data[{}]={} (from bits={})", index, value, from)
            }
            Error::IllegalPadding => write!(f, "illegal zero padding"),
            Error::NonZeroPadding => write!(f, "non-zero padding"),
        }
    }
}

impl_std_error!(Error);

/// Convert a sequence of `from`-bit groups into a sequence of `to`-bit
/// groups, MSB-first.
///
/// With `pad` set, leftover bits are emitted as one final group, left
/// shifted and zero filled. Without it, leftover bits must be shorter
/// than a whole input group and all zero, otherwise the conversion fails
/// rather than silently dropping them.
pub fn convert_bits(data: &[u8], from: u32, to: u32, pad: bool) -> Result<Vec<u8>, Error> {
    let mut acc: u32 = 0;
    let mut bits: u32 = 0;
    let mut ret = Vec::with_capacity((data.len() * from as usize + to as usize - 1) / to as usize);
    let maxv: u32 = (1 << to) - 1;
    for (index, &value) in data.iter().enumerate() {
        if u32::from(value) >> from != 0 {
            return Err(Error::DataOutOfRange { index, value, from });
        }
        acc = (acc << from) | u32::from(value);
        bits += from;
        while bits >= to {
            bits -= to;
            ret.push(((acc >> bits) & maxv) as u8);
        }
    }
    if pad {
        if bits > 0 {
            ret.push(((acc << (to - bits)) & maxv) as u8);
        }
    } else if bits >= from {
        return Err(Error::IllegalPadding);
    } else if (acc << (to - bits)) & maxv != 0 {
        return Err(Error::NonZeroPadding);
    }
    Ok(ret)
}
