//! Configuration module for loading the static model tables.
//!
//! Default tables carry the published NER parameter set.

mod parameters;

pub use parameters::{CatalysisParameters, IntermediateParameters, ProteinParameters, RepairParameters};
