//! Scalar field arithmetic (integers modulo the group order `n`).
//!
//! A scalar is represented as 17 little-endian limbs of 15 bits each, held
//! in `u16` words whose top bit is always zero. The representation is
//! redundant: a scalar is not required to hold the canonical value in
//! `[0, n-1]`, and each operation documents the range it accepts and the
//! range it guarantees, expressed as a multiple of `n`. All values handled
//! at the public API level are below `1.27*n`; the canonical value is
//! produced on demand (encoding, equality, zero test), which lets chains of
//! operations skip the full reduction after every step.
//!
//! Multiplication is Montgomery multiplication: with `R = 2^255 mod n`,
//! a Montgomery multiplication of `a` and `b` yields `(a*b)/R mod n`.
//! Scalars are not kept in Montgomery form, since encoding and decoding are
//! expected to be more frequent than long multiplication chains; a full
//! multiplication instead composes two Montgomery multiplications, the
//! first of which (by `R2 = R^2 mod n`) moves one operand into Montgomery
//! form.

use core::borrow::Borrow;
use core::iter::{Product, Sum};
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use rand_core::CryptoRng;
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq, CtOption};

#[cfg(feature = "zeroize")]
use zeroize::Zeroize;

/// The number of 15-bit limbs used to represent a [`Scalar`].
const LIMBS: usize = 17;

/// The group order, in base 2^15 (little-endian order):
/// n = 0E204B00 2E7BDF53 9F8B2E0E D634742D 33527E75 417BE49B FB31F1A6 65275E71
const MODULUS: [u16; LIMBS] = [
    24177, 19022, 18073, 22927, 18879, 12156, 7504, 10559, 11571, 26856, 15192, 22896, 14840,
    31722, 2974, 9600, 3616,
];

/// R2 = 2^510 mod n, used to move an operand into Montgomery form.
const R2: Scalar = Scalar([
    14755, 1449, 7175, 1324, 11384, 15866, 31249, 13920, 17944, 6728, 3858, 5900, 25302, 432,
    5554, 29779, 1646,
]);

/// D248 = 2^503 mod n, the Montgomery representation of 2^248. Multiplier
/// for one 31-byte chunk of the reducing decoder.
const D248: Scalar = Scalar([
    167, 1579, 26634, 10886, 24646, 12845, 32322, 7660, 8304, 12054, 20731, 3487, 26407, 9107,
    22337, 7191, 1284,
]);

/// n mod 2^15
const N0: u32 = 24177;

/// -1/n mod 2^15
const N0I: u32 = 23919;

/// An integer modulo the curve9767 group order `n`.
///
/// The internal representation is redundant: two `Scalar` values may hold
/// different limbs yet represent the same integer modulo `n`. Equality and
/// the zero test account for this, so callers never need to canonicalize
/// explicitly.
#[derive(Clone, Copy, Debug, Default)]
pub struct Scalar(pub(crate) [u16; LIMBS]);

impl Scalar {
    /// The scalar 0.
    pub const ZERO: Self = Self([0; LIMBS]);

    /// The scalar 1.
    pub const ONE: Self = Self([1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);

    /// Decodes the canonical little-endian encoding of a scalar, rejecting
    /// any input that is not already in the `[0, n-1]` range.
    ///
    /// Inputs shorter than 32 bytes always decode successfully, since they
    /// cannot exceed `2^248 < n`. For longer inputs, the decode succeeds
    /// only if the value is below `n` and every bit beyond bit 251 (the
    /// high nibble of byte 31 and all subsequent bytes) is zero. Both
    /// checks are computed without branching on the decoded value.
    pub fn from_canonical_bytes(bytes: &[u8]) -> CtOption<Self> {
        let s = Self::from_bytes_trunc(bytes);
        if bytes.len() < 32 {
            return CtOption::new(s, Choice::from(1));
        }

        // All bits dropped by the truncated decode must have been zero.
        let mut r = u32::from(bytes[31] >> 4);
        for &byte in &bytes[32..] {
            r |= u32::from(byte);
        }
        let dropped_zero = Choice::from((r.wrapping_sub(1) >> 31) as u8);

        let (s, in_range) = s.normalize();
        CtOption::new(s, dropped_zero & in_range)
    }

    /// Decodes a little-endian byte string of any length and reduces it
    /// modulo `n`. This never fails and is the recommended way to turn a
    /// hash output into a scalar.
    ///
    /// Output is below `1.27*n`.
    pub fn from_bytes_mod_order(bytes: &[u8]) -> Self {
        if bytes.len() <= 31 {
            return Self::from_bytes_trunc(bytes);
        }

        // Process the input in 31-byte chunks, from most to least
        // significant: each step multiplies the accumulator by 2^248 (a
        // Montgomery multiplication by D248) and adds the next chunk.
        //
        // At the entry of each iteration the accumulator is below 1.27*n;
        // the Montgomery multiplication returns a value below 1.18*n and a
        // 31-byte chunk is below 2^248 (about 0.071*n), so the addition
        // keeps the accumulator below 1.27*n.
        let mut u = ((bytes.len() - 1) / 31) * 31;
        let mut s = Self::from_bytes_trunc(&bytes[u..]);
        while u > 0 {
            u -= 31;
            s = s.montgomery_mul(&D248);
            let chunk = Self::from_bytes_trunc(&bytes[u..u + 31]);
            s = s.add(&chunk);
        }
        s
    }

    /// Returns the canonical 32-byte little-endian encoding of this scalar.
    ///
    /// The value is normalized before packing, so the encoding is unique
    /// regardless of the internal representation; since `n < 2^252`, the
    /// top four bits of the last byte are always zero.
    pub fn to_bytes(&self) -> [u8; 32] {
        let (t, _) = self.normalize();
        let mut ret = [0u8; 32];
        let mut acc: u32 = 0;
        let mut acc_len = 0;
        let mut u = 0;
        for i in 0..LIMBS {
            acc |= u32::from(t.0[i]) << acc_len;
            acc_len += 15;
            while acc_len >= 8 {
                ret[u] = acc as u8;
                u += 1;
                acc >>= 8;
                acc_len -= 8;
            }
        }
        ret[31] = acc as u8;
        ret
    }

    /// Is this scalar congruent to zero modulo `n`?
    pub fn is_zero(&self) -> Choice {
        let (t, _) = self.normalize();
        let mut r = 0u16;
        for limb in &t.0 {
            r |= limb;
        }
        r.ct_eq(&0)
    }

    /// Addition.
    ///
    /// Inputs must be below `1.56*n` each; the output is below `2^252`,
    /// hence below `1.14*n`.
    pub fn add(&self, rhs: &Self) -> Self {
        // The sum is below 3.12*n. Subtracting n while the value is at
        // least 2^252 brings it under 2^252 in at most two steps, since
        // 3.12*n < 2^252 + 2*n.
        let mut d = [0u16; LIMBS];
        let mut cc: u32 = 0;
        for i in 0..LIMBS {
            let w = u32::from(self.0[i]) + u32::from(rhs.0[i]) + cc;
            d[i] = (w & 0x7FFF) as u16;
            cc = w >> 15;
        }

        // No carry is possible here (cc = 0). Subtract n twice,
        // conditionally on d >= 2^252.
        for _ in 0..2 {
            // d / 2^252 is 0, 1 or 2; build an all-ones mask when it is
            // nonzero.
            let m = ((u32::from(d[16]) >> 12).wrapping_neg() >> 31).wrapping_neg();

            let mut cc: u32 = 0;
            for i in 0..LIMBS {
                let w = u32::from(d[i])
                    .wrapping_sub(m & u32::from(MODULUS[i]))
                    .wrapping_sub(cc);
                d[i] = (w & 0x7FFF) as u16;
                cc = w >> 31;
            }
        }

        Self(d)
    }

    /// Subtraction.
    ///
    /// Inputs must be below `2*n` each; the output is nonnegative and does
    /// not exceed `max(self, n-1)`.
    pub fn sub(&self, rhs: &Self) -> Self {
        // Compute self - rhs, then add n while the result is negative.
        // Since rhs < 2*n, two additions are sufficient.
        let mut d = [0u16; LIMBS];
        let mut cc: u32 = 0;
        for i in 0..LIMBS {
            let w = u32::from(self.0[i])
                .wrapping_sub(u32::from(rhs.0[i]))
                .wrapping_sub(cc);
            d[i] = (w & 0x7FFF) as u16;
            cc = w >> 31;
        }

        // A negative value shows up as the top bit of the top limb.
        for _ in 0..2 {
            let m = (u32::from(d[16]) >> 14).wrapping_neg();
            let mut cc: u32 = 0;
            for i in 0..LIMBS {
                let w = u32::from(d[i]) + (m & u32::from(MODULUS[i])) + cc;
                d[i] = (w & 0x7FFF) as u16;
                cc = w >> 15;
            }
        }

        Self(d)
    }

    /// Negation: `n - self`, with input below `2*n`; the output is below
    /// `n`.
    pub fn negate(&self) -> Self {
        Self::ZERO.sub(self)
    }

    /// Multiplication modulo `n`.
    ///
    /// Inputs must be below `1.27*n`; the output is below `1.18*n`.
    pub fn mul(&self, rhs: &Self) -> Self {
        // The first Montgomery multiplication moves self into Montgomery
        // form (self * 2^255 mod n); the second takes the factor back out,
        // leaving the plain product.
        self.montgomery_mul(&R2).montgomery_mul(rhs)
    }

    /// Returns a uniformly random scalar in `[0, n-1]`.
    ///
    /// Draws 64 bytes from the generator and reduces them modulo `n`; the
    /// 260-bit excess makes the reduction bias negligible.
    pub fn random<R: CryptoRng + ?Sized>(rng: &mut R) -> Self {
        let mut bytes = [0u8; 64];
        rng.fill_bytes(&mut bytes);
        Self::from_bytes_mod_order(&bytes)
    }

    /// Normalizes into the `[0, n-1]` range. The input must be below
    /// `2*n`.
    ///
    /// The returned `Choice` is set when the source value was already in
    /// the `[0, n-1]` range.
    fn normalize(&self) -> (Self, Choice) {
        // Subtract n; keep the result if it is nonnegative, the source
        // value otherwise.
        let mut d = [0u16; LIMBS];
        let mut cc: u32 = 0;
        for i in 0..LIMBS {
            let w = u32::from(self.0[i])
                .wrapping_sub(u32::from(MODULUS[i]))
                .wrapping_sub(cc);
            d[i] = (w & 0x7FFF) as u16;
            cc = w >> 31;
        }

        // cc is 1 if the subtraction went negative (the source was already
        // canonical), 0 otherwise. Select limb-wise with a mask.
        let m = cc.wrapping_neg();
        for i in 0..LIMBS {
            let wa = u32::from(self.0[i]);
            let wd = u32::from(d[i]);
            d[i] = (wd ^ (m & (wa ^ wd))) as u16;
        }

        (Self(d), Choice::from(cc as u8))
    }

    /// Montgomery multiplication: `(self * rhs) / 2^255 mod n`.
    ///
    /// Inputs must be below `1.27*n`; the output is below `1.18*n`.
    fn montgomery_mul(&self, rhs: &Self) -> Self {
        let mut d = [0u16; LIMBS];
        let mut dh: u32 = 0;
        for i in 0..LIMBS {
            // For each limb f of self, pick the quotient digit g such that
            // adding g*n to the accumulator clears its lowest limb, then
            // shift that limb out.
            let f = u32::from(self.0[i]);
            let t = u32::from(d[0]) + f * u32::from(rhs.0[0]);
            let g = t.wrapping_mul(N0I) & 0x7FFF;
            let mut cc = (t + g * N0) >> 15;
            for j in 1..LIMBS {
                // If cc <= 2^16, then h <= 2^15-1 + 2*(2^15-1)^2 + 2^16,
                // so h < (2^15+1)*2^16 and cc stays at most 2^16.
                let h = u32::from(d[j]) + f * u32::from(rhs.0[j]) + g * u32::from(MODULUS[j]) + cc;
                d[j - 1] = (h & 0x7FFF) as u16;
                cc = h >> 15;
            }

            // dh <= 1 on entry, so dh + cc < 2^17 and the new dh is 0 or 1.
            dh += cc;
            d[16] = (dh & 0x7FFF) as u16;
            dh >>= 15;
        }

        // The loop computed d = (self*rhs + k*n) / 2^255 with k < 2^255
        // (the successive digits g are the base-2^15 representation of k).
        // With both inputs below 1.27*n this gives
        // d < ((1.27*n)^2 + 2^255*n) / 2^255 < 1.18*n, so d is already in
        // range and dh ended at 0.
        Self(d)
    }

    /// Decodes up to 32 little-endian bytes, truncating the value modulo
    /// 2^252: only the low four bits of byte 31 are used, and any further
    /// bytes are ignored.
    ///
    /// Output is below `2^252`, hence below `1.14*n`.
    fn from_bytes_trunc(bytes: &[u8]) -> Self {
        let mut limbs = [0u16; LIMBS];
        let mut i = 0;
        let mut acc: u32 = 0;
        let mut acc_len = 0;
        for (u, &byte) in bytes.iter().enumerate() {
            if u == 31 {
                acc |= u32::from(byte & 0x0F) << 8;
                limbs[16] = acc as u16;
                return Self(limbs);
            }
            acc |= u32::from(byte) << acc_len;
            acc_len += 8;
            if acc_len >= 15 {
                limbs[i] = (acc & 0x7FFF) as u16;
                i += 1;
                acc >>= 15;
                acc_len -= 15;
            }
        }
        if acc_len > 0 {
            limbs[i] = acc as u16;
        }
        Self(limbs)
    }
}

impl ConditionallySelectable for Scalar {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        let mut limbs = [0u16; LIMBS];
        for i in 0..LIMBS {
            limbs[i] = u16::conditional_select(&a.0[i], &b.0[i], choice);
        }
        Self(limbs)
    }
}

impl ConstantTimeEq for Scalar {
    fn ct_eq(&self, other: &Self) -> Choice {
        // The limbs cannot be compared directly: the representations might
        // need normalization. Subtract and test for zero instead.
        self.sub(other).is_zero()
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Scalar {}

impl From<u8> for Scalar {
    fn from(k: u8) -> Self {
        Self::from_bytes_trunc(&k.to_le_bytes())
    }
}

impl From<u16> for Scalar {
    fn from(k: u16) -> Self {
        Self::from_bytes_trunc(&k.to_le_bytes())
    }
}

impl From<u32> for Scalar {
    fn from(k: u32) -> Self {
        Self::from_bytes_trunc(&k.to_le_bytes())
    }
}

impl From<u64> for Scalar {
    fn from(k: u64) -> Self {
        Self::from_bytes_trunc(&k.to_le_bytes())
    }
}

impl<'b> Add<&'b Scalar> for &Scalar {
    type Output = Scalar;

    fn add(self, rhs: &'b Scalar) -> Scalar {
        Scalar::add(self, rhs)
    }
}

define_add_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl AddAssign<&Scalar> for Scalar {
    fn add_assign(&mut self, rhs: &Scalar) {
        *self = Scalar::add(self, rhs);
    }
}

define_add_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'b> Sub<&'b Scalar> for &Scalar {
    type Output = Scalar;

    fn sub(self, rhs: &'b Scalar) -> Scalar {
        Scalar::sub(self, rhs)
    }
}

define_sub_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl SubAssign<&Scalar> for Scalar {
    fn sub_assign(&mut self, rhs: &Scalar) {
        *self = Scalar::sub(self, rhs);
    }
}

define_sub_assign_variants!(LHS = Scalar, RHS = Scalar);

impl<'b> Mul<&'b Scalar> for &Scalar {
    type Output = Scalar;

    fn mul(self, rhs: &'b Scalar) -> Scalar {
        Scalar::mul(self, rhs)
    }
}

define_mul_variants!(LHS = Scalar, RHS = Scalar, Output = Scalar);

impl MulAssign<&Scalar> for Scalar {
    fn mul_assign(&mut self, rhs: &Scalar) {
        *self = Scalar::mul(self, rhs);
    }
}

define_mul_assign_variants!(LHS = Scalar, RHS = Scalar);

impl Neg for &Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        self.negate()
    }
}

impl Neg for Scalar {
    type Output = Scalar;

    fn neg(self) -> Scalar {
        -&self
    }
}

impl<T> Sum<T> for Scalar
where
    T: Borrow<Scalar>,
{
    fn sum<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Self::ZERO, |acc, item| acc + item.borrow())
    }
}

impl<T> Product<T> for Scalar
where
    T: Borrow<Scalar>,
{
    fn product<I>(iter: I) -> Self
    where
        I: Iterator<Item = T>,
    {
        iter.fold(Self::ONE, |acc, item| acc * item.borrow())
    }
}

#[cfg(feature = "zeroize")]
impl Zeroize for Scalar {
    fn zeroize(&mut self) {
        self.0.zeroize()
    }
}
