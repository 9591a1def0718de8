//! Binary record codec
//!
//! Every record is serialized to a fixed 308-byte slot. A data file is the
//! plain concatenation of slots: no header, no separators, no checksum.
//!
//! ## Record Layout (little-endian, C struct padding)
//! ```text
//! ┌────────┬──────┬───────────────────────────────────────────┐
//! │ Offset │ Size │ Field                                     │
//! ├────────┼──────┼───────────────────────────────────────────┤
//! │      0 │    4 │ id: i32                                   │
//! │      4 │  128 │ full_name (NUL-padded)                    │
//! │    132 │  128 │ address (NUL-padded)                      │
//! │    260 │    2 │ birth_year: i16                           │
//! │    262 │   32 │ document (NUL-padded)                     │
//! │    294 │    1 │ customer_type                             │
//! │    295 │    1 │ sex                                       │
//! │    296 │    1 │ marital_status                            │
//! │    297 │    3 │ padding (zero)                            │
//! │    300 │    4 │ credit_limit: f32                         │
//! │    304 │    1 │ registration_status                       │
//! │    305 │    3 │ padding (zero)                            │
//! └────────┴──────┴───────────────────────────────────────────┘
//! ```
//!
//! The layout is the one a 4-byte-aligned little-endian C compiler gives the
//! original struct, so files written on x86-64 and ARM64 hosts agree.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Result, StoreError};

use super::{Address, Code, Document, Name, Record};

/// Size of one serialized record
pub const RECORD_SIZE: usize = 308;

const PAD_AFTER_CODES: usize = 3;
const TAIL_PADDING: usize = 3;

/// Append one record to `buf`
pub fn encode_record(record: &Record, buf: &mut BytesMut) {
    buf.reserve(RECORD_SIZE);
    buf.put_i32_le(record.id);
    buf.put_slice(&record.full_name.to_slot());
    buf.put_slice(&record.address.to_slot());
    buf.put_i16_le(record.birth_year);
    buf.put_slice(&record.document.to_slot());
    buf.put_u8(record.customer_type.as_byte());
    buf.put_u8(record.sex.as_byte());
    buf.put_u8(record.marital_status.as_byte());
    buf.put_bytes(0, PAD_AFTER_CODES);
    buf.put_f32_le(record.credit_limit);
    buf.put_u8(record.registration_status.as_byte());
    buf.put_bytes(0, TAIL_PADDING);
}

/// Decode one record from a slot of exactly [`RECORD_SIZE`] bytes
pub fn decode_record(slot: &[u8]) -> Result<Record> {
    if slot.len() != RECORD_SIZE {
        return Err(StoreError::Corruption(format!(
            "record slot is {} bytes, expected {}",
            slot.len(),
            RECORD_SIZE
        )));
    }

    let mut buf = slot;
    let id = buf.get_i32_le();
    let full_name = Name::from_slot(&buf[..Name::SLOT]);
    buf.advance(Name::SLOT);
    let address = Address::from_slot(&buf[..Address::SLOT]);
    buf.advance(Address::SLOT);
    let birth_year = buf.get_i16_le();
    let document = Document::from_slot(&buf[..Document::SLOT]);
    buf.advance(Document::SLOT);
    let customer_type = Code::from_byte(buf.get_u8());
    let sex = Code::from_byte(buf.get_u8());
    let marital_status = Code::from_byte(buf.get_u8());
    buf.advance(PAD_AFTER_CODES);
    let credit_limit = buf.get_f32_le();
    let registration_status = Code::from_byte(buf.get_u8());

    Ok(Record {
        id,
        full_name,
        address,
        birth_year,
        document,
        customer_type,
        sex,
        marital_status,
        credit_limit,
        registration_status,
    })
}

/// Serialize records back to back
pub fn encode_all(records: &[Record]) -> Bytes {
    let mut buf = BytesMut::with_capacity(records.len() * RECORD_SIZE);
    for record in records {
        encode_record(record, &mut buf);
    }
    buf.freeze()
}

/// Decode a whole data file
///
/// A length that is not a multiple of [`RECORD_SIZE`] means a torn or
/// foreign file and is reported, never silently truncated.
pub fn decode_all(data: &[u8]) -> Result<Vec<Record>> {
    let trailing = data.len() % RECORD_SIZE;
    if trailing != 0 {
        return Err(StoreError::Corruption(format!(
            "data file is {} bytes, leaving a partial record of {} bytes",
            data.len(),
            trailing
        )));
    }

    data.chunks_exact(RECORD_SIZE).map(decode_record).collect()
}
