use chrono::DateTime;
use thiserror::Error;

use super::BlockFact;
use crate::units::Hastings;

// Currency magnitudes above this are corrupt records, not real amounts. The
// total coin supply fits in well under 16 bytes.
const MAX_CURRENCY_LEN: u64 = 32;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("record truncated at byte {offset}, needed {needed} more bytes")]
    Truncated { offset: usize, needed: usize },
    #[error("currency length {len} at byte {offset} is not a plausible amount")]
    CurrencyTooLong { offset: usize, len: u64 },
    #[error("{0} trailing bytes after record")]
    TrailingBytes(usize),
    #[error("timestamp {0} is out of range")]
    TimestampOutOfRange(u64),
}

/// Decode one stored fact record.
///
/// Layout, owned by the ingester: fixed-width integers are 8-byte
/// little-endian; currency amounts are an 8-byte little-endian byte-length
/// followed by that many big-endian magnitude bytes.
pub fn decode_block_fact(bytes: &[u8]) -> Result<BlockFact, DecodeError> {
    let mut reader = Reader {
        bytes,
        offset: 0,
    };

    let height = reader.read_u64()?;
    let timestamp_secs = reader.read_u64()?;
    let timestamp = i64::try_from(timestamp_secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
        .ok_or(DecodeError::TimestampOutOfRange(timestamp_secs))?;
    let active_contract_cost = reader.read_currency()?;
    let active_contract_count = reader.read_u64()?;
    let active_contract_size = reader.read_u64()?;
    let total_contract_cost = reader.read_currency()?;
    let total_contract_count = reader.read_u64()?;
    let total_contract_size = reader.read_u64()?;
    reader.finish()?;

    Ok(BlockFact {
        height,
        timestamp,
        active_contract_cost,
        active_contract_count,
        active_contract_size,
        total_contract_cost,
        total_contract_count,
        total_contract_size,
    })
}

struct Reader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        let remaining = self.bytes.len() - self.offset;
        if remaining < len {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed: len - remaining,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().expect("slice is 8 bytes")))
    }

    fn read_currency(&mut self) -> Result<Hastings, DecodeError> {
        let offset = self.offset;
        let len = self.read_u64()?;
        if len > MAX_CURRENCY_LEN {
            return Err(DecodeError::CurrencyTooLong { offset, len });
        }
        let magnitude = self.take(len as usize)?;
        Ok(Hastings::from_be_bytes(magnitude))
    }

    fn finish(self) -> Result<(), DecodeError> {
        if self.offset < self.bytes.len() {
            return Err(DecodeError::TrailingBytes(self.bytes.len() - self.offset));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigUint;

    use super::*;
    use crate::block_facts::testing::{block_fact, encode_block_fact};

    #[test]
    fn decode_encoded_fact() {
        let fact = block_fact(62_000, Hastings::new(BigUint::from(10u32).pow(27)));
        let decoded = decode_block_fact(&encode_block_fact(&fact)).unwrap();
        assert_eq!(decoded, fact);
    }

    #[test]
    fn decode_zero_amount_fact() {
        let fact = block_fact(0, Hastings::from(0u64));
        let decoded = decode_block_fact(&encode_block_fact(&fact)).unwrap();
        assert_eq!(decoded.active_contract_cost, Hastings::from(0u64));
    }

    #[test]
    fn truncated_record_errors() {
        let bytes = encode_block_fact(&block_fact(10, Hastings::from(1u64)));
        let result = decode_block_fact(&bytes[..bytes.len() - 3]);
        assert!(matches!(result, Err(DecodeError::Truncated { .. })));
    }

    #[test]
    fn empty_record_errors() {
        assert_eq!(
            decode_block_fact(&[]),
            Err(DecodeError::Truncated {
                offset: 0,
                needed: 8
            })
        );
    }

    #[test]
    fn trailing_bytes_error() {
        let mut bytes = encode_block_fact(&block_fact(10, Hastings::from(1u64)));
        bytes.extend_from_slice(&[0, 0]);
        assert_eq!(decode_block_fact(&bytes), Err(DecodeError::TrailingBytes(2)));
    }

    #[test]
    fn implausible_currency_length_errors() {
        // A record whose currency length field claims 2^40 bytes.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&10u64.to_le_bytes());
        bytes.extend_from_slice(&1_433_600_000u64.to_le_bytes());
        bytes.extend_from_slice(&(1u64 << 40).to_le_bytes());
        assert!(matches!(
            decode_block_fact(&bytes),
            Err(DecodeError::CurrencyTooLong { offset: 16, .. })
        ));
    }
}
