//! MBP CSV output formatting.
//!
//! Renders one [`MbpRecord`] per CSV row in the consumer's expected column
//! order. Two quirks are reproduced verbatim for compatibility with the
//! downstream reader:
//!
//! - every row (and the header) begins with an empty leading column;
//! - level column indices are two-digit zero-padded (`bid_px_00` …).
//!
//! Prices render with six fraction digits, timestamps as
//! `YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ` in UTC. Like the parser, this is a
//! boundary module: the book itself never sees decimal text.

use std::fmt::Write as _;

use chrono::{TimeZone, Utc};

use crate::types::{MbpRecord, DEPTH, PRICE_SCALE};

/// The fixed MBP header row, including the trailing newline.
pub fn header() -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(",ts_recv,ts_event,rtype,publisher_id,instrument_id,action,side,depth,price,size,flags,ts_in_delta,sequence");
    for i in 0..DEPTH {
        let _ = write!(out, ",bid_px_{i:02},bid_sz_{i:02},bid_ct_{i:02}");
    }
    for i in 0..DEPTH {
        let _ = write!(out, ",ask_px_{i:02},ask_sz_{i:02},ask_ct_{i:02}");
    }
    out.push_str(",symbol,order_id\n");
    out
}

/// Append one MBP record as a CSV row (with trailing newline) onto `out`.
pub fn write_mbp_row(out: &mut String, record: &MbpRecord) {
    out.push(',');
    format_timestamp(out, record.ts_recv);
    out.push(',');
    format_timestamp(out, record.ts_event);
    let _ = write!(
        out,
        ",{},{},{},{},{},{},",
        record.rtype,
        record.publisher_id,
        record.instrument_id,
        record.action.to_byte() as char,
        record.side.to_byte() as char,
        record.depth,
    );
    format_price(out, record.price);
    let _ = write!(
        out,
        ",{},{},{},{}",
        record.size, record.flags, record.ts_in_delta, record.sequence
    );

    for level in record.bid_levels.iter().chain(record.ask_levels.iter()) {
        out.push(',');
        format_price(out, level.price);
        let _ = write!(out, ",{},{}", level.size, level.count);
    }

    let _ = write!(out, ",{},{}", record.symbol, record.order_id);
    out.push('\n');
}

/// Render one record as an owned row. Convenience over [`write_mbp_row`].
pub fn format_mbp_row(record: &MbpRecord) -> String {
    let mut out = String::with_capacity(512);
    write_mbp_row(&mut out, record);
    out
}

/// ns-since-epoch → `YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ` in UTC.
fn format_timestamp(out: &mut String, ts: i64) {
    let secs = ts.div_euclid(1_000_000_000);
    let nanos = ts.rem_euclid(1_000_000_000) as u32;
    match Utc.timestamp_opt(secs, nanos).single() {
        Some(dt) => {
            let _ = write!(out, "{}", dt.format("%Y-%m-%dT%H:%M:%S%.9fZ"));
        }
        None => out.push_str("1970-01-01T00:00:00.000000000Z"),
    }
}

/// Fixed-point ×10⁶ → decimal text with six fraction digits.
fn format_price(out: &mut String, price: i64) {
    let magnitude = price.unsigned_abs();
    let sign = if price < 0 { "-" } else { "" };
    let _ = write!(
        out,
        "{sign}{}.{:06}",
        magnitude / PRICE_SCALE as u64,
        magnitude % PRICE_SCALE as u64
    );
}
