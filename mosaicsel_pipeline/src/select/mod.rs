//! C5 MILP model builder, solver, and the incremental-coverage witness pass
//! (spec §4.5), grounded end to end on
//! `original_source/code/3-CPLEX.py`'s `solve_mosaic_selection_milp`.

pub mod model;
pub mod variants;
pub mod witness;

pub use model::{ModelOutcome, solve};
pub use variants::{MosaicParams, mosaic_params, pair_intersection};
pub use witness::{Witness, validate_selection};
