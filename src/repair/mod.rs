//! Nucleotide excision repair (NER) pathway kinetics.
//!
//! Models the stochastic and reversible assembly of the NER complex as a set
//! of coupled ODEs integrated with a fixed-step explicit Euler scheme:
//! - Proteins are free species in solution with per-intermediate on/off rates
//! - Intermediates are repair-complex stages, each a dense lattice of 2^k
//!   binary occupancy patterns over the k protein slots
//! - Catalytic couplings inject flux from one intermediate's pattern into the
//!   same pattern of another (damage verification, incision, resynthesis)
//!
//! ## Data Flow
//! ```text
//! RepairParameters ──► build_pathway ──► Pathway::run
//!                                            │
//!              ┌─────────────────────────────┤
//!              ▼                             ▼
//!   Intermediate::compute_update     Protein::update
//!   (state lattice, Σ deltas)        (aggregate delta)
//! ```
//!
//! Reference: Luijsterburg MS et al. J Cell Biol. 2010;189:445-463

pub mod factory;
pub mod intermediate;
pub mod occupancy;
pub mod pathway;
pub mod protein;

pub use factory::build_pathway;
pub use intermediate::{CatalyticLink, Intermediate, IntermediateUpdate};
pub use occupancy::{OccupancyPattern, ParticipationMask};
pub use pathway::{DeltaRouting, Pathway, PathwayConfig, PathwayDiagnostics};
pub use protein::{Protein, RateTable};

use serde::{Deserialize, Serialize};

/// Number of protein species (occupancy slots) in the model
pub const NUM_PROTEINS: usize = 7;

/// Number of occupancy patterns per intermediate (2^NUM_PROTEINS)
pub const NUM_STATES: usize = 1 << NUM_PROTEINS;

/// Number of repair intermediates in the model
pub const NUM_INTERMEDIATES: usize = 6;

/// Default Euler timestep
pub const DEFAULT_DT_SEC: f64 = 1e-4;

/// Default initial concentration of damaged, unbound DNA
pub const DEFAULT_INIT_DAMAGE: f64 = 0.14;

/// Protein species participating in NER, in slot order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProteinKind {
    /// Damage recognition factor
    Xpc,
    /// Helicase complex, opens the DNA around the lesion
    Tfiih,
    /// 3' endonuclease
    Xpg,
    /// Damage verification
    Xpa,
    /// 5' endonuclease (XPF-ERCC1)
    Xpf,
    /// Single-strand binding protein
    Rpa,
    /// Sliding clamp for repair synthesis
    Pcna,
}

impl ProteinKind {
    /// All proteins in slot order
    pub const ALL: [ProteinKind; NUM_PROTEINS] = [
        ProteinKind::Xpc,
        ProteinKind::Tfiih,
        ProteinKind::Xpg,
        ProteinKind::Xpa,
        ProteinKind::Xpf,
        ProteinKind::Rpa,
        ProteinKind::Pcna,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            ProteinKind::Xpc => "XPC",
            ProteinKind::Tfiih => "TFIIH",
            ProteinKind::Xpg => "XPG",
            ProteinKind::Xpa => "XPA",
            ProteinKind::Xpf => "XPF",
            ProteinKind::Rpa => "RPA",
            ProteinKind::Pcna => "PCNA",
        }
    }
}

/// Repair-complex stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntermediateKind {
    /// Lesion recognized, DNA not yet opened
    Damaged,
    /// Partially opened pre-incision complex
    Partially,
    /// Fully opened pre-incision complex
    Fully,
    /// Dual incision performed
    Incised,
    /// Gap-filling repair synthesis
    Resynth,
    /// Chromatin restoration
    Rechrom,
}

impl IntermediateKind {
    /// All intermediates in pathway order
    pub const ALL: [IntermediateKind; NUM_INTERMEDIATES] = [
        IntermediateKind::Damaged,
        IntermediateKind::Partially,
        IntermediateKind::Fully,
        IntermediateKind::Incised,
        IntermediateKind::Resynth,
        IntermediateKind::Rechrom,
    ];

    /// Position in `ALL`, used to index rate tables
    #[inline]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Configuration name
    pub fn name(&self) -> &'static str {
        match self {
            IntermediateKind::Damaged => "damaged",
            IntermediateKind::Partially => "partially",
            IntermediateKind::Fully => "fully",
            IntermediateKind::Incised => "incised",
            IntermediateKind::Resynth => "resynth",
            IntermediateKind::Rechrom => "rechrom",
        }
    }
}
