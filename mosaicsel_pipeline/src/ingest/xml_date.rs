//! Date and orbit extraction (spec §4.2 step 2–3), grounded on
//! `original_source/code/greedy_utils/metadata_utils.py`'s
//! `get_date_from_xml`/`extract_orbit_from_filename`: scan XML tag names for
//! a fixed list of substrings, fall back to the `YYYYMMDDTHHMMSS` token in
//! the filename, then (if both fail) leave the date unset.

use mosaicsel_core::time_util;
use quick_xml::Reader;
use quick_xml::events::Event;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use time::OffsetDateTime;

/// Candidate XML tag-name substrings tried in order (spec §4.2 step 2).
const DATE_TAGS: [&str; 4] =
	["DATATAKE_SENSING_START", "SENSING_TIME", "PRODUCT_START_TIME", "GENERATION_TIME"];

static FILENAME_DATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_(\d{8}T\d{6})_").unwrap());
static ORBIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"_R(\d{3})_").unwrap());

/// Extracts the UTC acquisition date: XML tags first, filename token
/// fallback, `None` if both fail (spec §4.2 step 2 — "tile proceeds with
/// date-dependent features disabled").
#[must_use]
pub fn extract_date(xml_path: &Path, bundle_filename: &str) -> Option<OffsetDateTime> {
	extract_date_from_xml(xml_path).or_else(|| extract_date_from_filename(bundle_filename))
}

fn extract_date_from_xml(xml_path: &Path) -> Option<OffsetDateTime> {
	let text = std::fs::read_to_string(xml_path).ok()?;
	let mut reader = Reader::from_str(&text);
	reader.config_mut().trim_text(true);

	let mut buf = Vec::new();
	let mut tag_matches = false;
	loop {
		match reader.read_event_into(&mut buf) {
			Ok(Event::Start(start)) | Ok(Event::Empty(start)) => {
				let name = String::from_utf8_lossy(start.name().as_ref()).to_string();
				tag_matches = DATE_TAGS.iter().any(|tag| name.contains(tag));
			}
			Ok(Event::Text(text_event)) => {
				if tag_matches
					&& let Ok(decoded) = text_event.unescape()
					&& let Some(dt) = time_util::parse_candidate(&decoded)
				{
					return Some(dt);
				}
			}
			Ok(Event::End(_)) => tag_matches = false,
			Ok(Event::Eof) => break,
			Err(_) => break,
			_ => {}
		}
		buf.clear();
	}
	None
}

fn extract_date_from_filename(filename: &str) -> Option<OffsetDateTime> {
	let captures = FILENAME_DATE.captures(filename)?;
	time_util::parse_compact(&captures[1])
}

/// Extracts the orbit number from the `R###` filename token (spec §4.2 step
/// 3). Absence is allowed.
#[must_use]
pub fn extract_orbit(filename: &str) -> Option<u32> {
	ORBIT.captures(filename).and_then(|c| c[1].parse().ok())
}
