use chrono::{Days, NaiveDate};
use thiserror::Error;

use crate::descriptor::FirmwareDescriptor;

/// Marker preceding the BIOS info record
pub const SIGNATURE: &[u8; 9] = b"$BOOTEFI$";

/// Bytes that must follow the signature for a record to be complete
pub const RECORD_SIZE: usize = 158;

/// A fixed-width, NUL-terminated field of the record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub offset: usize,
    pub len: usize,
}

pub const BOARD_NAME: Field = Field {
    name: "board name",
    offset: 0x05,
    len: 60,
};
pub const BRAND: Field = Field {
    name: "brand",
    offset: 0x41,
    len: 20,
};
pub const BUILD_DATE: Field = Field {
    name: "build date",
    offset: 0x56,
    len: 10,
};
pub const BUILD_NUMBER: Field = Field {
    name: "build number",
    offset: 0x61,
    len: 14,
};
pub const EXPECTED_NAME: Field = Field {
    name: "expected name",
    offset: 0x88,
    len: 12,
};

/// Record layout, offsets relative to the first byte after the signature
pub const LAYOUT: [Field; 5] = [BOARD_NAME, BRAND, BUILD_DATE, BUILD_NUMBER, EXPECTED_NAME];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("no $BOOTEFI$ signature found, not an ASUS BIOS capsule")]
    SignatureNotFound,

    #[error("BIOS info record at offset {base:#x} needs {} bytes, only {available} left", RECORD_SIZE)]
    BufferTooShort { base: usize, available: usize },
}

/// Find the offset of the first signature occurrence
pub fn find_signature(data: &[u8]) -> Option<usize> {
    if data.len() < SIGNATURE.len() {
        return None;
    }

    (0..=data.len() - SIGNATURE.len()).find(|&i| &data[i..i + SIGNATURE.len()] == SIGNATURE)
}

/// Slice out the record that follows the first signature
pub fn record_window(data: &[u8]) -> Result<&[u8; RECORD_SIZE], DecodeError> {
    let base = find_signature(data).ok_or(DecodeError::SignatureNotFound)? + SIGNATURE.len();

    data[base..]
        .first_chunk::<RECORD_SIZE>()
        .ok_or(DecodeError::BufferTooShort {
            base,
            available: data.len() - base,
        })
}

/// Read a field up to its first NUL, one char per byte (Latin-1)
pub fn read_field(record: &[u8; RECORD_SIZE], field: Field) -> String {
    record[field.offset..field.offset + field.len]
        .iter()
        .take_while(|&&b| b != 0)
        .map(|&b| b as char)
        .collect()
}

/// Parse a `month/day/year` date.
///
/// Out-of-range components are not rejected but roll over: month 13 is
/// January of the next year, day 0 is the last day of the previous month.
/// An empty component (`03//2024`) is rejected rather than read as zero.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let mut parts = raw.split('/');
    let month = parse_component(parts.next()?)?;
    let day = parse_component(parts.next()?)?;
    let year = parse_component(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }

    let months_from_epoch = year.checked_mul(12)?.checked_add(month.checked_sub(1)?)?;
    let year = i32::try_from(months_from_epoch.div_euclid(12)).ok()?;
    let month = months_from_epoch.rem_euclid(12) as u32 + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;

    let day_offset = day.checked_sub(1)?;
    if day_offset >= 0 {
        first.checked_add_days(Days::new(day_offset as u64))
    } else {
        first.checked_sub_days(Days::new(day_offset.unsigned_abs()))
    }
}

fn parse_component(token: &str) -> Option<i64> {
    token.trim().parse().ok()
}

/// Decode the BIOS info record of a capsule image
pub fn decode(data: &[u8]) -> Result<FirmwareDescriptor, DecodeError> {
    record_window(data).map(decode_record)
}

/// Decode a record already sliced out with [`record_window`]
pub fn decode_record(record: &[u8; RECORD_SIZE]) -> FirmwareDescriptor {
    FirmwareDescriptor {
        board_name: read_field(record, BOARD_NAME),
        brand: read_field(record, BRAND),
        build_date: parse_date(&read_field(record, BUILD_DATE)),
        build_number: read_field(record, BUILD_NUMBER),
        expected_name: read_field(record, EXPECTED_NAME),
    }
}
