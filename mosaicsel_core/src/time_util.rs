//! ISO-8601 parsing/formatting helpers for the canonical persisted form
//! (spec §8: "lowercase ISO-8601, 6-decimal floats").

use time::OffsetDateTime;
use time::format_description::well_known::Iso8601;

/// Candidate ISO date/time formats tried, in order, against XML metadata tag
/// values (spec §4.2 step 2). `time`'s `Iso8601` parser accepts the common
/// `YYYY-MM-DDTHH:MM:SS[.fff][Z]` variants directly; we additionally try a
/// bare-digits form for values lacking separators.
pub fn parse_candidate(raw: &str) -> Option<OffsetDateTime> {
	let trimmed = raw.trim();
	if let Ok(dt) = OffsetDateTime::parse(trimmed, &Iso8601::DEFAULT) {
		return Some(dt);
	}
	parse_compact(trimmed)
}

/// Parses the `YYYYMMDDTHHMMSS` token pulled from a bundle filename
/// (spec §4.2 step 2 fallback).
pub fn parse_compact(token: &str) -> Option<OffsetDateTime> {
	let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
	if digits.len() < 14 {
		return None;
	}
	let year: i32 = digits[0..4].parse().ok()?;
	let month: u8 = digits[4..6].parse().ok()?;
	let day: u8 = digits[6..8].parse().ok()?;
	let hour: u8 = digits[8..10].parse().ok()?;
	let minute: u8 = digits[10..12].parse().ok()?;
	let second: u8 = digits[12..14].parse().ok()?;
	let month = time::Month::try_from(month).ok()?;
	let date = time::Date::from_calendar_date(year, month, day).ok()?;
	let time = time::Time::from_hms(hour, minute, second).ok()?;
	Some(date.with_time(time).assume_utc())
}

/// Canonical lowercase ISO-8601 string for persistence (spec §8).
#[must_use]
pub fn to_canonical_string(dt: OffsetDateTime) -> String {
	dt.format(&Iso8601::DEFAULT)
		.unwrap_or_default()
		.to_lowercase()
}

/// Integer day difference of the absolute difference of two instants,
/// truncated to days (spec §6 "Numeric semantics").
#[must_use]
pub fn day_difference(a: OffsetDateTime, b: OffsetDateTime) -> i64 {
	let delta = if a >= b { a - b } else { b - a };
	delta.whole_days()
}

/// Rounds a probability-like float to 6 decimals for canonical serialization
/// (spec §8).
#[must_use]
pub fn round6(value: f64) -> f64 {
	(value * 1_000_000.0).round() / 1_000_000.0
}
