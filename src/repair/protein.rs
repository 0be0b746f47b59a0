//! Free protein species in solution.

use super::{IntermediateKind, ProteinKind, NUM_INTERMEDIATES};

/// Rate constants keyed by intermediate
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RateTable([f64; NUM_INTERMEDIATES]);

impl RateTable {
    /// Same rate for every intermediate
    pub fn uniform(rate: f64) -> Self {
        Self([rate; NUM_INTERMEDIATES])
    }

    #[inline]
    pub fn get(&self, kind: IntermediateKind) -> f64 {
        self.0[kind.index()]
    }

    #[inline]
    pub fn set(&mut self, kind: IntermediateKind, rate: f64) {
        self.0[kind.index()] = rate;
    }
}

/// A protein species with its free concentration
///
/// The concentration is a bare accumulator: it is mutated only by the
/// pathway once per step and is never clamped.
#[derive(Debug, Clone)]
pub struct Protein {
    pub kind: ProteinKind,
    /// Free concentration
    pub concentration: f64,
    /// Association rate constants per intermediate
    pub on_rates: RateTable,
    /// Dissociation rate constants per intermediate
    pub off_rates: RateTable,
}

impl Protein {
    pub fn new(kind: ProteinKind, concentration: f64, on_rates: RateTable, off_rates: RateTable) -> Self {
        Self {
            kind,
            concentration,
            on_rates,
            off_rates,
        }
    }

    /// Protein with all rates zero
    pub fn inert(kind: ProteinKind, concentration: f64) -> Self {
        Self::new(kind, concentration, RateTable::default(), RateTable::default())
    }

    #[inline]
    pub fn on_rate(&self, intermediate: IntermediateKind) -> f64 {
        self.on_rates.get(intermediate)
    }

    #[inline]
    pub fn off_rate(&self, intermediate: IntermediateKind) -> f64 {
        self.off_rates.get(intermediate)
    }

    /// Pseudo-first-order binding rate (k_on × [P]) into an intermediate
    #[inline]
    pub fn binding_flux(&self, intermediate: IntermediateKind) -> f64 {
        self.on_rate(intermediate) * self.concentration
    }

    /// Add a signed change to the free concentration
    pub fn update(&mut self, delta: f64) {
        self.concentration += delta;
    }

    pub fn name(&self) -> &'static str {
        self.kind.name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_accumulates_without_clamping() {
        let mut protein = Protein::inert(ProteinKind::Xpa, 0.1);
        protein.update(-0.25);
        assert!((protein.concentration - (-0.15)).abs() < 1e-12);
        protein.update(0.05);
        assert!((protein.concentration - (-0.10)).abs() < 1e-12);
    }

    #[test]
    fn test_binding_flux() {
        let mut on = RateTable::default();
        on.set(IntermediateKind::Damaged, 1.6);
        let protein = Protein::new(ProteinKind::Tfiih, 0.36, on, RateTable::default());

        assert!((protein.binding_flux(IntermediateKind::Damaged) - 0.576).abs() < 1e-12);
        assert_eq!(protein.binding_flux(IntermediateKind::Fully), 0.0);
    }
}
