//! Repair intermediates as occupancy-lattice state machines.
//!
//! Each intermediate holds one concentration per binary occupancy pattern
//! over the k protein slots (dense, 2^k entries). Patterns binding a slot
//! outside the participation mask are structurally unreachable and stay at
//! zero.
//!
//! ## Euler update for pattern s
//! For every slot i with bound flag b = bit_i(s), in slot order:
//! ```text
//! x_s += dt * ( on[b][i] * x_s^(1-b) + off[b][i] * x_s^b + E_s )
//! ```
//! where `on[1][i] = k_on,i * [P_i]`, `on[0][i] = -on[1][i]`,
//! `off[0][i] = k_off,i`, `off[1][i] = -off[0][i]`, and E_s is the catalytic
//! term Σ factor * source.x_s over the links registered for s. The per-slot
//! increments accumulate into the same running value x_s.
//!
//! Reference: Luijsterburg MS et al. J Cell Biol. 2010;189:445-463

use std::collections::BTreeMap;

use super::occupancy::{OccupancyPattern, ParticipationMask};
use super::protein::Protein;
use super::{IntermediateKind, NUM_PROTEINS, NUM_STATES};

/// Enzymatic coupling from a source intermediate's same-indexed pattern
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalyticLink {
    /// Position of the source intermediate in the pathway
    pub source: usize,
    pub factor: f64,
}

impl CatalyticLink {
    pub fn new(source: usize, factor: f64) -> Self {
        Self { source, factor }
    }
}

/// Result of one Euler step of an intermediate, not yet committed
#[derive(Debug, Clone)]
pub struct IntermediateUpdate {
    /// New state vector
    pub state: Vec<f64>,
    /// Net change of each free protein, already scaled by dt
    pub protein_delta: [f64; NUM_PROTEINS],
}

/// A repair-complex stage
#[derive(Debug, Clone)]
pub struct Intermediate {
    pub kind: IntermediateKind,
    mask: ParticipationMask,
    /// Concentration per occupancy pattern
    state: Vec<f64>,
    /// Catalytic links per destination pattern
    catalysis: BTreeMap<OccupancyPattern, Vec<CatalyticLink>>,
}

impl Intermediate {
    /// Create an intermediate with an all-zero state lattice
    pub fn new(kind: IntermediateKind, mask: ParticipationMask) -> Self {
        Self {
            kind,
            mask,
            state: vec![0.0; NUM_STATES],
            catalysis: BTreeMap::new(),
        }
    }

    pub fn mask(&self) -> &ParticipationMask {
        &self.mask
    }

    /// Dense state vector indexed by pattern
    pub fn state(&self) -> &[f64] {
        &self.state
    }

    #[inline]
    pub fn concentration(&self, pattern: OccupancyPattern) -> f64 {
        self.state[pattern.index()]
    }

    /// Set the concentration of a valid pattern
    ///
    /// Panics if the pattern binds a slot outside the mask.
    pub fn set_concentration(&mut self, pattern: OccupancyPattern, value: f64) {
        assert!(
            self.mask.admits(pattern),
            "pattern {} is outside the participation mask of {}",
            pattern,
            self.kind.name()
        );
        self.state[pattern.index()] = value;
    }

    /// Register a catalytic link feeding `pattern`
    pub fn add_catalysis(&mut self, pattern: OccupancyPattern, link: CatalyticLink) {
        self.catalysis.entry(pattern).or_default().push(link);
    }

    /// Links registered for a pattern (empty if none)
    pub fn catalysis(&self, pattern: OccupancyPattern) -> &[CatalyticLink] {
        self.catalysis.get(&pattern).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All catalytic links, keyed by destination pattern
    pub fn catalysis_table(&self) -> &BTreeMap<OccupancyPattern, Vec<CatalyticLink>> {
        &self.catalysis
    }

    /// Total concentration over valid patterns
    pub fn total_mass(&self) -> f64 {
        self.mask.valid_patterns().map(|p| self.state[p.index()]).sum()
    }

    /// Number of NaN or infinite entries in the state vector
    pub fn non_finite_count(&self) -> usize {
        self.state.iter().filter(|x| !x.is_finite()).count()
    }

    /// Catalytic term for a pattern, read from the sources' current state
    pub fn catalytic_term(&self, pattern: OccupancyPattern, intermediates: &[Intermediate]) -> f64 {
        self.catalysis(pattern)
            .iter()
            .map(|link| intermediates[link.source].state[pattern.index()] * link.factor)
            .sum()
    }

    /// Compute one Euler step without mutating anything
    ///
    /// `proteins` are the free proteins in slot order and `intermediates` is
    /// the pathway's full intermediate collection (catalytic sources are read
    /// from it, including `self` for self-referencing links).
    pub fn compute_update(
        &self,
        proteins: &[Protein],
        intermediates: &[Intermediate],
        dt: f64,
    ) -> IntermediateUpdate {
        assert_eq!(
            proteins.len(),
            NUM_PROTEINS,
            "expected {} proteins, got {}",
            NUM_PROTEINS,
            proteins.len()
        );
        assert_eq!(self.state.len(), NUM_STATES);

        let mut bound_on = [0.0; NUM_PROTEINS];
        let mut unbound_off = [0.0; NUM_PROTEINS];
        for (slot, protein) in proteins.iter().enumerate() {
            if !self.mask.contains(slot) {
                continue;
            }
            bound_on[slot] = protein.binding_flux(self.kind);
            unbound_off[slot] = protein.off_rate(self.kind);
        }
        let on_terms = [bound_on.map(|r| -r), bound_on];
        let off_terms = [unbound_off, unbound_off.map(|r| -r)];

        let mut state = self.state.clone();
        let mut protein_delta = [0.0; NUM_PROTEINS];

        for pattern in OccupancyPattern::all() {
            if !self.mask.admits(pattern) {
                continue;
            }
            let enzyme = self.catalytic_term(pattern, intermediates);

            let mut x = state[pattern.index()];
            for (slot, protein) in proteins.iter().enumerate() {
                let b = pattern.bit(slot);
                let e = b as i32;
                x += (on_terms[b][slot] * x.powi(1 - e) + off_terms[b][slot] * x.powi(e) + enzyme) * dt;

                if b == 0 {
                    protein_delta[slot] -= protein.binding_flux(self.kind) * x;
                } else {
                    protein_delta[slot] += protein.off_rate(self.kind) * x;
                }
            }
            state[pattern.index()] = x;
        }

        for delta in protein_delta.iter_mut() {
            *delta *= dt;
        }

        IntermediateUpdate {
            state,
            protein_delta,
        }
    }

    /// Commit a previously computed update
    pub fn apply(&mut self, update: IntermediateUpdate) {
        assert_eq!(update.state.len(), NUM_STATES);
        self.state = update.state;
    }
}
