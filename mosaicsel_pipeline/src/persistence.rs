//! C6 persistence (spec §4.6, §6): stable JSON schemas shared between
//! stages, written with `serde_json` in the canonical form of spec §8. Each
//! writer is write-once per batch into a fresh directory/file (spec §5:
//! "outputs are write-once per batch into a fresh directory" — callers are
//! responsible for choosing a fresh `--out-dir` per run, this module never
//! appends to an existing artifact).

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use mosaicsel_core::error::{PipelineError, Result};
use mosaicsel_core::schema::{OptimizationParameters, Selection, SelectionDiagnostics, TileRecord};

fn io_err(path: &Path, action: &str, e: impl std::fmt::Display) -> PipelineError {
	PipelineError::BadInput(format!("cannot {action} {}: {e}", path.display()))
}

/// Writes one `TileRecord` as its own JSON file under `dir`, named after the
/// bundle filename (spec §4.2 "writes a per-tile metadata record to a
/// durable store"; `original_source`'s `save_classification_metadata` writes
/// one file per tile for the same crash-resilience reason — a partially
/// completed batch still leaves every already-ingested tile readable).
pub fn write_tile_record(dir: &Path, record: &TileRecord) -> Result<()> {
	std::fs::create_dir_all(dir).map_err(|e| io_err(dir, "create directory", e))?;
	let path = tile_record_path(dir, &record.filename);
	let file = File::create(&path).map_err(|e| io_err(&path, "create", e))?;
	serde_json::to_writer_pretty(BufWriter::new(file), record).map_err(|e| io_err(&path, "write", e))?;
	Ok(())
}

fn tile_record_path(dir: &Path, filename: &str) -> PathBuf {
	let stem = Path::new(filename).file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_else(|| filename.to_string());
	dir.join(format!("{stem}.json"))
}

/// Reads every `*.json` file directly under `dir` as a `TileRecord`, sorted
/// by filename ascending (spec §5, §9 tie-break rule — composition depends
/// on a stable tile ordering).
pub fn read_tile_records(dir: &Path) -> Result<Vec<TileRecord>> {
	let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)
		.map_err(|e| io_err(dir, "read directory", e))?
		.filter_map(|entry| entry.ok())
		.map(|entry| entry.path())
		.filter(|path| path.extension().is_some_and(|ext| ext == "json"))
		.collect();
	entries.sort();

	let mut records = Vec::with_capacity(entries.len());
	for path in entries {
		let text = std::fs::read_to_string(&path).map_err(|e| io_err(&path, "read", e))?;
		let record: TileRecord = serde_json::from_str(&text).map_err(|e| io_err(&path, "parse", e))?;
		records.push(record);
	}
	records.sort_by(|a, b| a.filename.cmp(&b.filename));
	Ok(records)
}

/// Writes the C3 artifact `optimization_parameters.json` (spec §6).
pub fn write_optimization_parameters(path: &Path, params: &OptimizationParameters) -> Result<()> {
	write_json(path, params)
}

/// Reads the C3 artifact `optimization_parameters.json` (spec §6).
pub fn read_optimization_parameters(path: &Path) -> Result<OptimizationParameters> {
	read_json(path)
}

/// Writes the C4 artifact `*-precalc.json` (spec §6): the same
/// `OptimizationParameters` shape, each mosaic now carrying its `AreaMetrics`
/// fields flattened in alongside the C3 fields.
pub fn write_precalc(path: &Path, params: &OptimizationParameters) -> Result<()> {
	write_json(path, params)
}

/// Reads a `*-precalc.json` artifact (spec §6).
pub fn read_precalc(path: &Path) -> Result<OptimizationParameters> {
	read_json(path)
}

/// Writes the C5 selection output: an array of the selected, C4-enriched
/// mosaic records (spec §6 "Selection output").
pub fn write_selection(path: &Path, selection: &Selection) -> Result<()> {
	write_json(path, selection)
}

/// Reads a selection output artifact.
pub fn read_selection(path: &Path) -> Result<Selection> {
	read_json(path)
}

/// Writes the solver diagnostics (objective value, witness incremental
/// coverage) to a sibling file next to the selection output (spec §4.5:
/// "Report `Cᵣ` alongside the solver's objective value" — not part of the
/// load-bearing §6 array shape, so it is never merged into it).
pub fn write_diagnostics(path: &Path, diagnostics: &SelectionDiagnostics) -> Result<()> {
	write_json(path, diagnostics)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
	if let Some(parent) = path.parent()
		&& !parent.as_os_str().is_empty()
	{
		std::fs::create_dir_all(parent).map_err(|e| io_err(parent, "create directory", e))?;
	}
	let file = File::create(path).map_err(|e| io_err(path, "create", e))?;
	serde_json::to_writer_pretty(BufWriter::new(file), value).map_err(|e| io_err(path, "write", e))?;
	Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
	let text = std::fs::read_to_string(path).map_err(|e| io_err(path, "read", e))?;
	serde_json::from_str(&text).map_err(|e| io_err(path, "parse", e))
}

#[cfg(test)]
mod tests {
	use super::*;
	use mosaicsel_core::schema::{Bounds, Classification, TileStatus};

	fn sample_tile(filename: &str) -> TileRecord {
		TileRecord {
			filename: filename.into(),
			status: TileStatus::Accepted,
			class: Some(Classification::Central),
			date: Some("2023-06-15t10:30:00z".into()),
			orbit: Some(22),
			geographic_coverage: 0.95,
			valid_pixels_percentage: 0.9,
			effective_coverage: 0.855,
			cloud_coverage: 0.05,
			bounds: Some(Bounds { left: 0.0, bottom: 0.0, right: 1.0, top: 1.0 }),
			crs: Some("EPSG:4326".into()),
			tci_path: format!("{filename}/TCI.jp2"),
			cloud_mask_path: format!("{filename}/CLD.jp2"),
			reason: None,
		}
	}

	#[test]
	fn a_written_tile_record_round_trips() {
		let dir = tempfile::tempdir().unwrap();
		let record = sample_tile("T1.zip");
		write_tile_record(dir.path(), &record).unwrap();
		let records = read_tile_records(dir.path()).unwrap();
		assert_eq!(records, vec![record]);
	}

	#[test]
	fn tile_records_are_read_back_sorted_by_filename() {
		let dir = tempfile::tempdir().unwrap();
		write_tile_record(dir.path(), &sample_tile("B.zip")).unwrap();
		write_tile_record(dir.path(), &sample_tile("A.zip")).unwrap();
		let records = read_tile_records(dir.path()).unwrap();
		assert_eq!(records.iter().map(|r| r.filename.as_str()).collect::<Vec<_>>(), vec!["A.zip", "B.zip"]);
	}

	#[test]
	fn an_empty_selection_serializes_and_round_trips_as_a_bare_array() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("selection.json");
		let selection = Selection { mosaics: vec![] };
		write_selection(&path, &selection).unwrap();
		assert_eq!(std::fs::read_to_string(&path).unwrap().trim(), "[]");
		assert_eq!(read_selection(&path).unwrap(), selection);
	}
}
