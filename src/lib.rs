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

//! # Rust Bech32 Address Library
//!
//! Encoding and decoding of the bech32 checksummed base32 format, and of
//! segwit addresses (a witness version plus a witness program) built on
//! top of it.
//!
//! Every operation is a pure function of its inputs; there is no shared
//! state and all calls are safe to make concurrently.
//!

// Coding conventions
#![deny(non_upper_case_globals)]
#![deny(non_camel_case_types)]
#![deny(non_snake_case)]
#![deny(unused_mut)]
#![deny(missing_docs)]

#[cfg(feature = "serde")]
pub extern crate actual_serde as serde;

mod error;

pub mod bech32;
pub mod bits;
pub mod segwit;

// export the plain codec at the top level so it can be used as
// `bech32_addr::decode` etc.
pub use crate::bech32::{decode, encode, U5};
pub use crate::bits::convert_bits;
