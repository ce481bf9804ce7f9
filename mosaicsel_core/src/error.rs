//! Typed error taxonomy shared across the pipeline stages (see spec §7).

use thiserror::Error;

/// Errors that can abort a pipeline stage or be recorded against a single
/// tile/mosaic, depending on where they are caught.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum PipelineError {
	/// Missing AOI or missing bundle directory: fatal for the invoking stage.
	#[error("bad input: {0}")]
	BadInput(String),

	/// A raster could not be opened, or its CRS could not be determined.
	#[error("bad raster {path}: {reason}")]
	BadRaster { path: String, reason: String },

	/// One of the three required bundle members (metadata XML, cloud
	/// raster, TCI raster) was not found in the archive.
	#[error("missing artifact `{name}` in bundle {bundle}")]
	MissingArtifact { bundle: String, name: String },

	/// Reprojection failed, or failed repair + still invalid/nonpositive area.
	#[error("reprojection failed: {0}")]
	ReprojectError(String),

	/// A polygon was invalid and repair (`buffer(0)`) did not fix it.
	#[error("invalid polygon: {0}")]
	PolygonInvalid(String),

	/// The MILP solver returned an error or timed out.
	#[error("solver failure: {0}")]
	SolverFailure(String),

	/// The MILP model has no feasible solution.
	#[error("model infeasible")]
	Infeasible,
}

impl PipelineError {
	/// Maps the taxonomy onto the exit codes of spec §6.
	#[must_use]
	pub fn exit_code(&self) -> i32 {
		match self {
			PipelineError::BadInput(_)
			| PipelineError::BadRaster { .. }
			| PipelineError::MissingArtifact { .. }
			| PipelineError::ReprojectError(_)
			| PipelineError::PolygonInvalid(_) => 2,
			PipelineError::SolverFailure(_) | PipelineError::Infeasible => 3,
		}
	}
}

pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn exit_codes_follow_spec_table() {
		assert_eq!(PipelineError::BadInput("x".into()).exit_code(), 2);
		assert_eq!(
			PipelineError::BadRaster { path: "a".into(), reason: "b".into() }.exit_code(),
			2
		);
		assert_eq!(PipelineError::Infeasible.exit_code(), 3);
		assert_eq!(PipelineError::SolverFailure("timeout".into()).exit_code(), 3);
	}
}
