//! NER Simulator - kinetic model of nucleotide excision repair
//!
//! This library integrates the assembly and disassembly of the multi-protein
//! NER complex as coupled ODEs over combinatorial occupancy lattices.

pub mod config;
pub mod repair;

pub use config::RepairParameters;
pub use repair::{
    build_pathway, CatalyticLink, DeltaRouting, Intermediate, IntermediateKind, OccupancyPattern,
    ParticipationMask, Pathway, PathwayConfig, PathwayDiagnostics, Protein, ProteinKind, RateTable,
    DEFAULT_DT_SEC, DEFAULT_INIT_DAMAGE, NUM_PROTEINS, NUM_STATES,
};
