//! MILP model assembly and solving (spec §4.5), grounded on
//! `original_source/code/3-CPLEX.py`'s `solve_mosaic_selection_milp`: the
//! objective, cloud-veto/cardinality/exclusivity constraints, and the
//! linearized-coverage-floor linking variables, rebuilt with `good_lp`
//! against whichever [`MilpVariant`] is active instead of `docplex`.

use std::collections::HashMap;

use good_lp::{Expression, ProblemVariables, Solution, SolverModel, Variable, constraint, microlp, variable};
use mosaicsel_core::constants::{ALPHA, CLOUD_MAX_MILP, C_MIN, GAMMA, K_MAX, THETA_OVERLAP};
use mosaicsel_core::error::{PipelineError, Result};
use mosaicsel_core::schema::{MilpVariant, MosaicRecord, TileRecord};

use super::variants::{MosaicParams, mosaic_params, pair_intersection};

/// Outcome of one solve attempt. `infeasible` distinguishes "the model has
/// no feasible solution" (spec §4.5: emit empty result + diagnostic, not an
/// error) from a genuine solver error, which surfaces as `Err` instead.
pub struct ModelOutcome {
	pub selected: Vec<String>,
	pub objective_value: f64,
	pub infeasible: bool,
}

fn sum_expr(iter: impl IntoIterator<Item = Expression>) -> Expression {
	let mut iter = iter.into_iter();
	let mut acc = iter.next().expect("sum_expr requires at least one term");
	for term in iter {
		acc = acc + term;
	}
	acc
}

/// Builds and solves the MILP over `mosaics` (spec §4.5). `aoi_area` is the
/// AOI's area in the same CRS/units as the mosaics' `geometric_coverage_m2`
/// fields, needed only by [`good_lp`]'s `SharedImageRatio` `Iⱼₖ` path.
pub fn solve(mosaics: &[MosaicRecord], tiles: &HashMap<String, &TileRecord>, variant: MilpVariant, aoi_area: f64) -> Result<ModelOutcome> {
	let params = mosaic_params(mosaics, tiles);
	if params.is_empty() {
		return Ok(ModelOutcome { selected: vec![], objective_value: 0.0, infeasible: false });
	}

	let definition = variant.ijk_definition();

	let mut vars = ProblemVariables::new();
	let y: HashMap<String, Variable> = params.iter().map(|p| (p.group_id.clone(), vars.add(variable().binary()))).collect();

	// The linking variables for the linearized-coverage-floor variant must
	// be declared before `maximise` consumes `vars`.
	let mut o: HashMap<(usize, usize), Variable> = HashMap::new();
	if variant == MilpVariant::LinearizedCoverageFloor {
		for i in 0..params.len() {
			for j in (i + 1)..params.len() {
				o.insert((i, j), vars.add(variable().binary()));
			}
		}
	}

	let objective = sum_expr(params.iter().map(|p| {
		let yj = y[&p.group_id];
		let mut term = p.coverage * p.quality * yj - GAMMA * p.cloud * yj;
		if variant.cardinality_penalty_active() {
			term = term - ALPHA * yj;
		}
		term
	}));

	let mut problem = vars.maximise(objective).using(microlp);

	// Constraint 1: cloud veto.
	for p in &params {
		if p.cloud > CLOUD_MAX_MILP {
			problem = problem.with(constraint!(y[&p.group_id] <= 0));
		}
	}

	// Constraint 2: cardinality.
	problem = problem.with(constraint!(sum_expr(params.iter().map(|p| 1.0 * y[&p.group_id])) <= K_MAX as f64));

	// Constraint 3: tile exclusivity.
	let mut tile_to_groups: HashMap<&str, Vec<&str>> = HashMap::new();
	for p in &params {
		for tile in &p.tile_set {
			tile_to_groups.entry(tile.as_str()).or_default().push(p.group_id.as_str());
		}
	}
	for groups in tile_to_groups.values() {
		if groups.len() < 2 {
			continue;
		}
		let sum = sum_expr(groups.iter().map(|group_id| 1.0 * y[*group_id]));
		problem = problem.with(constraint!(sum <= 1));
	}

	// Constraint 4: variant-specific overlap control.
	match variant {
		MilpVariant::PairDisjunction => {
			for i in 0..params.len() {
				for j in (i + 1)..params.len() {
					let iij = pair_intersection(&params[i], &params[j], definition, aoi_area);
					if iij < THETA_OVERLAP {
						let yi = y[&params[i].group_id];
						let yj = y[&params[j].group_id];
						problem = problem.with(constraint!(yi + yj <= 1));
					}
				}
			}
		}
		MilpVariant::LinearizedCoverageFloor => {
			let mut coverage_terms = Vec::new();
			for p in &params {
				coverage_terms.push(p.coverage * y[&p.group_id]);
			}

			for i in 0..params.len() {
				for j in (i + 1)..params.len() {
					let yi = y[&params[i].group_id];
					let yj = y[&params[j].group_id];
					let oij = o[&(i, j)];

					problem = problem.with(constraint!(yi + yj - 1.0 <= oij));
					problem = problem.with(constraint!(oij <= yi));
					problem = problem.with(constraint!(oij <= yj));

					let iij = pair_intersection(&params[i], &params[j], definition, aoi_area);
					coverage_terms.push(-iij * oij);
				}
			}

			problem = problem.with(constraint!(sum_expr(coverage_terms) >= C_MIN));
		}
	}

	let solution = match problem.solve() {
		Ok(solution) => solution,
		Err(good_lp::ResolutionError::Infeasible) => {
			log::warn!("mosaic selection MILP is infeasible; emitting an empty selection");
			return Ok(ModelOutcome { selected: vec![], objective_value: 0.0, infeasible: true });
		}
		Err(e) => return Err(PipelineError::SolverFailure(e.to_string())),
	};

	let mut selected = Vec::new();
	let mut objective_value = 0.0;
	for p in &params {
		if solution.value(y[&p.group_id]) > 0.9 {
			selected.push(p.group_id.clone());
			objective_value += p.coverage * p.quality - GAMMA * p.cloud;
			if variant.cardinality_penalty_active() {
				objective_value -= ALPHA;
			}
		}
	}

	Ok(ModelOutcome { selected, objective_value, infeasible: false })
}

#[cfg(test)]
mod tests {
	use super::*;
	use mosaicsel_core::schema::{AreaMetrics, Bounds, Classification, TileRecord, TileStatus};

	fn mosaic(group_id: &str, images: Vec<&str>, coverage: f64) -> MosaicRecord {
		MosaicRecord {
			group_id: group_id.into(),
			base_image_id: images[0].into(),
			complementary_image_ids: images[1..].iter().map(|s| s.to_string()).collect(),
			images: images.into_iter().map(String::from).collect(),
			estimated_coverage: coverage,
			quality_factor: 0.9,
			start_date: "2023-06-01t00:00:00z".into(),
			end_date: "2023-06-02t00:00:00z".into(),
			overlap_details: vec![],
			area: Some(AreaMetrics {
				geometric_coverage: coverage,
				geometric_coverage_m2: coverage * 1000.0,
				total_individual_area: coverage * 1000.0,
				total_pairwise_overlap: 0.0,
				real_coverage_area: coverage * 1000.0,
				real_coverage_ratio: coverage,
				pie_coverage_area: coverage * 1000.0,
				pie_coverage_ratio: coverage,
				avg_cloud_coverage: 0.1,
			}),
			pairwise_intersections: vec![],
		}
	}

	fn tile(filename: &str, cloud: f64) -> TileRecord {
		TileRecord {
			filename: filename.into(),
			status: TileStatus::Accepted,
			class: Some(Classification::Central),
			date: Some("2023-06-01t00:00:00z".into()),
			orbit: Some(1),
			geographic_coverage: 0.9,
			valid_pixels_percentage: 0.9,
			effective_coverage: 0.81,
			cloud_coverage: cloud,
			bounds: Some(Bounds { left: 0.0, bottom: 0.0, right: 1.0, top: 1.0 }),
			crs: Some("EPSG:4326".into()),
			tci_path: String::new(),
			cloud_mask_path: String::new(),
			reason: None,
		}
	}

	#[test]
	fn a_single_clean_mosaic_is_selected() {
		let a = tile("A.zip", 0.1);
		let mut tiles = HashMap::new();
		tiles.insert("A.zip".to_string(), &a);
		let mosaics = vec![mosaic("mosaic-0000", vec!["A.zip"], 0.8)];
		let outcome = solve(&mosaics, &tiles, MilpVariant::LinearizedCoverageFloor, 1000.0).unwrap();
		assert_eq!(outcome.selected, vec!["mosaic-0000".to_string()]);
		assert!(!outcome.infeasible);
	}

	#[test]
	fn a_cloud_vetoed_mosaic_is_never_selected() {
		let a = tile("A.zip", 0.9);
		let mut tiles = HashMap::new();
		tiles.insert("A.zip".to_string(), &a);
		let mosaics = vec![mosaic("mosaic-0000", vec!["A.zip"], 0.8)];
		let outcome = solve(&mosaics, &tiles, MilpVariant::LinearizedCoverageFloor, 1000.0).unwrap();
		assert!(outcome.selected.is_empty());
	}

	#[test]
	fn sharing_a_tile_forces_exclusivity_between_two_mosaics() {
		let a = tile("A.zip", 0.1);
		let b = tile("B.zip", 0.1);
		let mut tiles = HashMap::new();
		tiles.insert("A.zip".to_string(), &a);
		tiles.insert("B.zip".to_string(), &b);
		let mosaics = vec![
			mosaic("mosaic-0000", vec!["A.zip", "B.zip"], 0.7),
			mosaic("mosaic-0001", vec!["B.zip"], 0.5),
		];
		let outcome = solve(&mosaics, &tiles, MilpVariant::PairDisjunction, 1000.0).unwrap();
		assert_eq!(outcome.selected.len(), 1);
	}
}
