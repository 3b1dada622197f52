//! Scalar arithmetic for the prime-order group of the curve9767 elliptic
//! curve.
//!
//! The group order is the 252-bit prime
//!
//! ```text
//! n = 0x0E204B002E7BDF539F8B2E0ED634742D33527E75417BE49BFB31F1A665275E71
//! ```
//!
//! and this crate implements constant-time arithmetic on integers modulo
//! `n`: addition, subtraction, negation, multiplication, equality and zero
//! tests, conditional selection, and byte encoding/decoding. Point and
//! base-field arithmetic live in the companion curve implementation; this
//! crate is only the scalar field.
//!
//! # Constructing a scalar
//!
//! To parse a canonical little-endian encoding (rejecting any value not
//! already in `[0, n-1]`), use [`Scalar::from_canonical_bytes`]:
//!
//! ```
//! use curve9767::Scalar;
//!
//! let bytes = Scalar::ONE.to_bytes();
//! let one = Scalar::from_canonical_bytes(&bytes).unwrap();
//! assert_eq!(one, Scalar::ONE);
//! ```
//!
//! To reduce a byte string of any length modulo `n` (e.g. the output of a
//! hash function), use [`Scalar::from_bytes_mod_order`]:
//!
//! ```
//! use curve9767::Scalar;
//!
//! let wide = [0xA5u8; 64];
//! let s = Scalar::from_bytes_mod_order(&wide);
//! assert_ne!(s, Scalar::ZERO);
//! ```
//!
//! # Constant-time operation
//!
//! Every operation executes in time independent of scalar values: all
//! conditional behavior is expressed through arithmetic masking and the
//! [`subtle`] traits, never through data-dependent branches or memory
//! accesses. The only fallible operation, [`Scalar::from_canonical_bytes`],
//! reports rejection through a [`subtle::CtOption`] flag computed without
//! branching on the decoded value.

#![no_std]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

pub mod scalar;

pub use scalar::Scalar;
