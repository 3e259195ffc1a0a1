//! # Value/Remoteness Record Module
//!
//! A bit-packed on-disk record for a single position: a value tag plus a
//! bounded remoteness. Laid out with [`bitvec`], following the same
//! fixed-size `BitArray` + `load_be`/`store_be` idiom used elsewhere in this
//! crate's database record types.

use anyhow::{bail, Result};
use bitvec::prelude::*;

use crate::model::{Remoteness, Value, R_MAX};

/* LAYOUT */

/// Three-bit tag distinguishing [`Value`] variants within a record, stored
/// ahead of the remoteness field.
const TAG_SIZE: usize = 3;

/// Bits needed to hold any remoteness up to [`R_MAX`] inclusive.
const REMOTENESS_SIZE: usize = 10;

/// Total record width in bits.
const BUFFER_SIZE: usize = TAG_SIZE + REMOTENESS_SIZE;

const TAG_LOSE: u8 = 0b000;
const TAG_TIE: u8 = 0b001;
const TAG_WIN: u8 = 0b010;
const TAG_DRAW: u8 = 0b011;
const TAG_UNDECIDED: u8 = 0b111;

/// A fixed-width, bit-packed encoding of a [`Value`] (or the absence of one,
/// for a position not yet solved).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValueRemotenessRecord {
    buffer: BitArr!(for BUFFER_SIZE, in u8, Msb0),
}

impl ValueRemotenessRecord {
    /// The number of bytes a record occupies once byte-aligned, used to
    /// size the flat array a [`crate::database::TierDatabase`] allocates
    /// for a tier.
    pub const BYTE_SIZE: usize = BUFFER_SIZE.div_ceil(8);

    /// A record representing "not yet decided".
    pub fn undecided() -> Self {
        let mut buffer = BitArray::ZERO;
        buffer[..TAG_SIZE].store_be(TAG_UNDECIDED);
        Self { buffer }
    }

    /// Encodes `value` into a new record. Fails if `value`'s remoteness
    /// exceeds [`R_MAX`].
    pub fn new(value: Value) -> Result<Self> {
        let mut buffer: BitArr!(for BUFFER_SIZE, in u8, Msb0) =
            BitArray::ZERO;
        let (tag, remoteness) = match value {
            Value::Lose(r) => (TAG_LOSE, r),
            Value::Tie(r) => (TAG_TIE, r),
            Value::Win(r) => (TAG_WIN, r),
            Value::Draw => (TAG_DRAW, 0),
        };
        if remoteness > R_MAX {
            bail!(
                "remoteness {remoteness} exceeds the maximum representable \
                value of {R_MAX}"
            );
        }
        buffer[..TAG_SIZE].store_be(tag);
        buffer[TAG_SIZE..].store_be(remoteness);
        Ok(Self { buffer })
    }

    /// Decodes the raw bytes of a persisted record. Returns `None` if the
    /// tag is the reserved "undecided" marker.
    pub fn value(&self) -> Option<Value> {
        let tag: u8 = self.buffer[..TAG_SIZE].load_be();
        let remoteness: Remoteness = self.buffer[TAG_SIZE..].load_be();
        match tag {
            TAG_LOSE => Some(Value::Lose(remoteness)),
            TAG_TIE => Some(Value::Tie(remoteness)),
            TAG_WIN => Some(Value::Win(remoteness)),
            TAG_DRAW => Some(Value::Draw),
            _ => None,
        }
    }

    /// Serializes this record to its on-disk byte representation.
    pub fn to_bytes(self) -> Vec<u8> {
        self.buffer.into_inner().to_vec()
    }

    /// Deserializes a record from bytes previously produced by
    /// [`ValueRemotenessRecord::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() * 8 < BUFFER_SIZE {
            bail!(
                "expected at least {} bytes for a value/remoteness record, \
                found {}",
                Self::BYTE_SIZE,
                bytes.len()
            );
        }
        let mut buffer: BitArr!(for BUFFER_SIZE, in u8, Msb0) =
            BitArray::ZERO;
        let raw = buffer.as_raw_mut_slice();
        raw.copy_from_slice(&bytes[..raw.len()]);
        Ok(Self { buffer })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_value_kind() {
        let values = [
            Value::Lose(0),
            Value::Tie(512),
            Value::Win(R_MAX),
            Value::Draw,
        ];
        for value in values {
            let record = ValueRemotenessRecord::new(value).unwrap();
            let bytes = record.to_bytes();
            let restored = ValueRemotenessRecord::from_bytes(&bytes).unwrap();
            assert_eq!(restored.value(), Some(value));
        }
    }

    #[test]
    fn undecided_has_no_value() {
        let record = ValueRemotenessRecord::undecided();
        assert_eq!(record.value(), None);
    }

    #[test]
    fn remoteness_above_maximum_is_rejected() {
        assert!(ValueRemotenessRecord::new(Value::Win(R_MAX + 1)).is_err());
    }
}
