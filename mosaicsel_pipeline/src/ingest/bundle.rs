//! Bundle member lookup and extraction (spec §4.2 step 1, §6 "Bundle
//! archives"). Required member-name substrings per spec §6.

use mosaicsel_core::error::{PipelineError, Result};
use std::fs::File;
use std::path::{Path, PathBuf};

pub const XML_SUBSTRING: &str = "MTD_MSIL2A.xml";
pub const CLOUD_SUBSTRING: &str = "MSK_CLDPRB_20m.jp2";
pub const TCI_SUBSTRING: &str = "TCI_10m.jp2";

/// Artifacts extracted from one bundle, plus the [`tempfile::TempDir`] that
/// owns their on-disk lifetime — deleted on drop regardless of outcome
/// (spec §5 "temporary extraction directories ... deleted afterwards
/// regardless of outcome").
pub struct BundleArtifacts {
	_tempdir: tempfile::TempDir,
	pub xml_path: PathBuf,
	pub xml_member: String,
	pub cloud_path: PathBuf,
	pub cloud_member: String,
	pub tci_path: PathBuf,
	pub tci_member: String,
}

fn bundle_name(path: &Path) -> String {
	path.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| path.display().to_string())
}

/// Locates and extracts the metadata XML, cloud-probability raster, and TCI
/// raster from `path` (spec §4.2 step 1). Any missing member is a fatal,
/// per-tile `MissingArtifact` error.
pub fn extract_bundle(path: &Path) -> Result<BundleArtifacts> {
	let name = bundle_name(path);
	let file = File::open(path).map_err(|e| PipelineError::BadInput(format!("cannot open bundle {name}: {e}")))?;
	let mut archive =
		zip::ZipArchive::new(file).map_err(|e| PipelineError::BadInput(format!("cannot read bundle {name}: {e}")))?;

	let members: Vec<String> = (0..archive.len())
		.filter_map(|i| archive.by_index(i).ok().map(|entry| entry.name().to_string()))
		.collect();

	let xml_member = find_member(&members, XML_SUBSTRING, &name)?;
	let cloud_member = find_member(&members, CLOUD_SUBSTRING, &name)?;
	let tci_member = find_member(&members, TCI_SUBSTRING, &name)?;

	let tempdir = tempfile::tempdir().map_err(|e| PipelineError::BadInput(format!("cannot create scratch dir: {e}")))?;
	let xml_path = extract_member(&mut archive, &xml_member, tempdir.path())?;
	let cloud_path = extract_member(&mut archive, &cloud_member, tempdir.path())?;
	let tci_path = extract_member(&mut archive, &tci_member, tempdir.path())?;

	Ok(BundleArtifacts { _tempdir: tempdir, xml_path, xml_member, cloud_path, cloud_member, tci_path, tci_member })
}

fn find_member(members: &[String], substring: &str, bundle: &str) -> Result<String> {
	members
		.iter()
		.find(|m| m.contains(substring))
		.cloned()
		.ok_or_else(|| PipelineError::MissingArtifact { bundle: bundle.to_string(), name: substring.to_string() })
}

fn extract_member(archive: &mut zip::ZipArchive<File>, member_name: &str, dir: &Path) -> Result<PathBuf> {
	let mut entry = archive
		.by_name(member_name)
		.map_err(|e| PipelineError::BadInput(format!("cannot read member {member_name}: {e}")))?;
	let file_name = Path::new(member_name).file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| "member".to_string());
	let dest = dir.join(file_name);
	let mut out = File::create(&dest).map_err(|e| PipelineError::BadInput(format!("cannot write {member_name}: {e}")))?;
	std::io::copy(&mut entry, &mut out).map_err(|e| PipelineError::BadInput(format!("cannot extract {member_name}: {e}")))?;
	Ok(dest)
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;

	fn write_zip(members: &[(&str, &[u8])]) -> tempfile::TempDir {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("bundle.zip");
		let file = File::create(&path).unwrap();
		let mut writer = zip::ZipWriter::new(file);
		let options = zip::write::SimpleFileOptions::default();
		for (name, contents) in members {
			writer.start_file(*name, options).unwrap();
			writer.write_all(contents).unwrap();
		}
		writer.finish().unwrap();
		dir
	}

	#[test]
	fn extracts_all_three_required_members() {
		let dir = write_zip(&[
			("GRANULE/MTD_MSIL2A.xml", b"<xml/>"),
			("GRANULE/IMG_DATA/R20m/MSK_CLDPRB_20m.jp2", b"cloud"),
			("GRANULE/IMG_DATA/R10m/TCI_10m.jp2", b"tci"),
		]);
		let artifacts = extract_bundle(&dir.path().join("bundle.zip")).unwrap();
		assert!(artifacts.xml_path.exists());
		assert!(artifacts.cloud_path.exists());
		assert!(artifacts.tci_path.exists());
	}

	#[test]
	fn missing_tci_is_a_missing_artifact_error() {
		let dir = write_zip(&[
			("GRANULE/MTD_MSIL2A.xml", b"<xml/>"),
			("GRANULE/IMG_DATA/R20m/MSK_CLDPRB_20m.jp2", b"cloud"),
		]);
		let err = extract_bundle(&dir.path().join("bundle.zip")).unwrap_err();
		match err {
			PipelineError::MissingArtifact { name, .. } => assert_eq!(name, TCI_SUBSTRING),
			other => panic!("expected MissingArtifact, got {other:?}"),
		}
	}
}
