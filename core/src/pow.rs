// Compact difficulty encoding
// ===========================
//
// A compact target packs a 256-bit unsigned integer into 32 bits: the high byte is
// the size of the number in bytes, the low 23 bits are the most significant bytes
// of the number and bit 23 is a sign bit. Encodings that decode to a negative
// number or to more than 256 bits are rejected instead of being truncated.

use bitcoin::hashes::Hash;
use bitcoin::BlockHash;
use num_bigint::BigUint;
use thiserror::Error;

const SIGN_BIT: u32 = 0x0080_0000;
const MANTISSA_MASK: u32 = 0x007f_ffff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompactError {
    #[error("compact target {0:#010x} encodes a negative number")]
    Negative(u32),
    #[error("compact target {0:#010x} overflows 256 bits")]
    Overflow(u32),
    #[error("a {0}-bit target overflows the 256-bit compact range")]
    TargetOverflow(u64),
}

/// Expands a compact target into the full integer target.
pub fn decode_compact(compact: u32) -> Result<BigUint, CompactError> {
    let size = compact >> 24;
    let mut word = compact & MANTISSA_MASK;
    if size <= 3 {
        word >>= 8 * (3 - size);
    }

    if word != 0 && compact & SIGN_BIT != 0 {
        return Err(CompactError::Negative(compact));
    }
    if word != 0 && (size > 34 || (word > 0xff && size > 33) || (word > 0xffff && size > 32)) {
        return Err(CompactError::Overflow(compact));
    }

    let value = BigUint::from(word);
    if size <= 3 {
        Ok(value)
    } else {
        Ok(value << (8 * (size - 3)) as usize)
    }
}

/// Packs a target into its normalized compact form. Targets wider than 256 bits
/// have no compact form.
pub fn encode_compact(target: &BigUint) -> Result<u32, CompactError> {
    if target.bits() > 256 {
        return Err(CompactError::TargetOverflow(target.bits()));
    }
    let mut size = ((target.bits() + 7) / 8) as u32;

    let low_word = |value: &BigUint| value.iter_u32_digits().next().unwrap_or(0);
    let mut compact = if size <= 3 {
        low_word(target) << (8 * (3 - size))
    } else {
        low_word(&(target >> (8 * (size - 3)) as usize))
    };

    // The mantissa must not look negative, so shift it into the next size up.
    if compact & SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }
    Ok(compact | (size << 24))
}

/// Interprets the hash as a big-endian integer (its display order) and compares
/// it against the target.
pub fn hash_meets_target(hash: &BlockHash, target: &BigUint) -> bool {
    BigUint::from_bytes_le(hash.as_byte_array()) <= *target
}
