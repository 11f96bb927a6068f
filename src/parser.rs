//! MBO CSV line parsing.
//!
//! One venue CSV line → one [`MboEvent`]. The expected field order is
//!
//! ```text
//! ts_recv,ts_event,rtype,publisher_id,instrument_id,action,side,
//! price,size,channel_id,order_id,flags,ts_in_delta,sequence,symbol
//! ```
//!
//! Timestamps arrive as ISO-8601 with nanosecond precision and are converted
//! to signed 64-bit nanoseconds since the Unix epoch. Prices arrive as
//! decimal text and are converted to fixed-point ×10⁶ using integer
//! arithmetic only; this is the one place in the crate where textual
//! decimals exist at all.
//!
//! Any malformed line yields `None` ("no event"); the pipeline counts and
//! skips these. The book engine never sees a partially-parsed record.

use chrono::DateTime;

use crate::types::{Action, MboEvent, Side, PRICE_SCALE};

/// Number of comma-separated fields in one MBO line.
const MBO_FIELD_COUNT: usize = 15;

/// Parse one MBO CSV line. Returns `None` for blank or malformed lines.
pub fn parse_mbo_line(line: &str) -> Option<MboEvent> {
    if line.is_empty() {
        return None;
    }

    let mut fields = [""; MBO_FIELD_COUNT];
    let mut count = 0;
    for field in line.split(',') {
        if count == MBO_FIELD_COUNT {
            return None; // too many fields
        }
        fields[count] = field;
        count += 1;
    }
    if count != MBO_FIELD_COUNT {
        return None;
    }

    Some(MboEvent {
        ts_recv: parse_timestamp(fields[0])?,
        ts_event: parse_timestamp(fields[1])?,
        rtype: fields[2].parse().ok()?,
        publisher_id: fields[3].parse().ok()?,
        instrument_id: fields[4].parse().ok()?,
        action: Action::from_byte(single_byte(fields[5])?)?,
        side: Side::from_byte(single_byte(fields[6])?)?,
        price: parse_price(fields[7])?,
        size: fields[8].parse().ok()?,
        channel_id: fields[9].parse().ok()?,
        order_id: fields[10].parse().ok()?,
        flags: fields[11].parse().ok()?,
        ts_in_delta: fields[12].parse().ok()?,
        sequence: fields[13].parse().ok()?,
        symbol: fields[14].to_string(),
    })
}

/// The single byte of a one-letter field.
#[inline]
fn single_byte(field: &str) -> Option<u8> {
    let bytes = field.as_bytes();
    (bytes.len() == 1).then(|| bytes[0])
}

/// Parse an ISO-8601 timestamp with nanosecond precision into ns since the
/// Unix epoch. An empty field is tolerated as 0 (the venue leaves some
/// timestamps blank on session-control rows).
fn parse_timestamp(field: &str) -> Option<i64> {
    if field.is_empty() {
        return Some(0);
    }
    DateTime::parse_from_rfc3339(field).ok()?.timestamp_nanos_opt()
}

/// Parse decimal price text into fixed-point ×10⁶.
///
/// Pure integer arithmetic: the integer part scales by [`PRICE_SCALE`], the
/// fraction is padded (or truncated) to six digits. An empty field is
/// tolerated as 0.
pub(crate) fn parse_price(field: &str) -> Option<i64> {
    if field.is_empty() {
        return Some(0);
    }

    let (negative, digits) = match field.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, field),
    };
    if digits.is_empty() {
        return None;
    }

    let (int_part, frac_part) = match digits.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (digits, ""),
    };

    let int_value: i64 = if int_part.is_empty() {
        0
    } else {
        if !int_part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        int_part.parse().ok()?
    };

    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut frac_value: i64 = 0;
    for i in 0..6 {
        let digit = frac_part.as_bytes().get(i).map_or(0, |b| i64::from(b - b'0'));
        frac_value = frac_value * 10 + digit;
    }

    let magnitude = int_value
        .checked_mul(PRICE_SCALE)?
        .checked_add(frac_value)?;
    Some(if negative { -magnitude } else { magnitude })
}
