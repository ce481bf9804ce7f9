//! C2 tile ingestion, C3 greedy mosaic composition, C4 IEP area engine and
//! C5 MILP model builder/selector — the optimization core of the pipeline
//! (spec §2–§5). `mosaicsel` (the CLI binary) drives these modules in
//! sequence; `mosaicsel_core::schema` carries the JSON artifacts between them.

pub mod area;
pub mod compose;
pub mod ingest;
pub mod persistence;
pub mod select;
