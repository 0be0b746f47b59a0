//! Pathway orchestration of one Euler step across all intermediates.
//!
//! Every intermediate is evaluated against the same pre-step snapshot of
//! protein concentrations and intermediate states. Their protein deltas are
//! summed into one aggregate vector before any protein is mutated, then the
//! new intermediate states are committed.
//!
//! ## Protein delta routing
//! The reference model adds the aggregate delta vector to every protein,
//! which in a scalar setting means each protein receives the sum of all
//! components. This is almost certainly a modelling defect but changing it
//! alters the trajectory, so `DeltaRouting::Broadcast` is the default.
//! `DeltaRouting::PerSlot` routes component i to protein i and must be
//! selected explicitly.

use serde::{Deserialize, Serialize};

use super::intermediate::{Intermediate, IntermediateUpdate};
use super::protein::Protein;
use super::{IntermediateKind, ProteinKind, DEFAULT_DT_SEC, NUM_PROTEINS};

/// How the aggregate protein delta is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaRouting {
    /// Every protein receives the sum of all delta components (reference behavior)
    #[default]
    Broadcast,
    /// Protein i receives component i only
    PerSlot,
}

/// Configuration for the pathway integrator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathwayConfig {
    /// Euler timestep. Default: 1e-4
    pub dt_sec: f64,
    /// Protein delta routing. Default: Broadcast
    pub delta_routing: DeltaRouting,
}

impl Default for PathwayConfig {
    fn default() -> Self {
        Self {
            dt_sec: DEFAULT_DT_SEC,
            delta_routing: DeltaRouting::Broadcast,
        }
    }
}

/// NER pathway: ordered proteins and intermediates
#[derive(Debug, Clone)]
pub struct Pathway {
    proteins: Vec<Protein>,
    intermediates: Vec<Intermediate>,
    pub config: PathwayConfig,
}

impl Pathway {
    /// Create a pathway from already-wired members
    ///
    /// Panics if the protein count differs from the number of slots or a
    /// catalytic link points outside `intermediates`. Use
    /// [`build_pathway`](super::build_pathway) for checked construction from
    /// configuration.
    pub fn new(proteins: Vec<Protein>, intermediates: Vec<Intermediate>, config: PathwayConfig) -> Self {
        assert_eq!(
            proteins.len(),
            NUM_PROTEINS,
            "pathway requires {} proteins",
            NUM_PROTEINS
        );
        for inter in &intermediates {
            for links in inter.catalysis_table().values() {
                for link in links {
                    assert!(
                        link.source < intermediates.len(),
                        "{} references intermediate {} of {}",
                        inter.kind.name(),
                        link.source,
                        intermediates.len()
                    );
                }
            }
        }
        Self {
            proteins,
            intermediates,
            config,
        }
    }

    pub fn proteins(&self) -> &[Protein] {
        &self.proteins
    }

    pub fn intermediates(&self) -> &[Intermediate] {
        &self.intermediates
    }

    pub fn protein(&self, kind: ProteinKind) -> Option<&Protein> {
        self.proteins.iter().find(|p| p.kind == kind)
    }

    pub fn intermediate(&self, kind: IntermediateKind) -> Option<&Intermediate> {
        self.intermediates.iter().find(|i| i.kind == kind)
    }

    pub fn intermediate_mut(&mut self, kind: IntermediateKind) -> Option<&mut Intermediate> {
        self.intermediates.iter_mut().find(|i| i.kind == kind)
    }

    /// Aggregate protein delta of one step from the current snapshot,
    /// together with each intermediate's uncommitted update
    fn compute_step(&self) -> ([f64; NUM_PROTEINS], Vec<IntermediateUpdate>) {
        let dt = self.config.dt_sec;
        let mut aggregate = [0.0; NUM_PROTEINS];
        let updates: Vec<IntermediateUpdate> = self
            .intermediates
            .iter()
            .map(|inter| {
                let update = inter.compute_update(&self.proteins, &self.intermediates, dt);
                for (total, delta) in aggregate.iter_mut().zip(update.protein_delta.iter()) {
                    *total += delta;
                }
                update
            })
            .collect();
        (aggregate, updates)
    }

    /// Perform one Euler step
    pub fn step(&mut self) {
        let (aggregate, updates) = self.compute_step();

        match self.config.delta_routing {
            DeltaRouting::Broadcast => {
                let total: f64 = aggregate.iter().sum();
                for protein in &mut self.proteins {
                    protein.update(total);
                }
            }
            DeltaRouting::PerSlot => {
                for (protein, delta) in self.proteins.iter_mut().zip(aggregate) {
                    protein.update(delta);
                }
            }
        }

        for (inter, update) in self.intermediates.iter_mut().zip(updates) {
            inter.apply(update);
        }
    }

    /// Run `num_steps` Euler steps
    pub fn run(&mut self, num_steps: usize) {
        log::debug!(
            "Running {} steps (dt = {:e}, routing = {:?})",
            num_steps,
            self.config.dt_sec,
            self.config.delta_routing
        );
        for _ in 0..num_steps {
            self.step();
        }
    }

    /// Snapshot of concentrations and health checks
    pub fn diagnostics(&self) -> PathwayDiagnostics {
        let protein_concentrations: Vec<(ProteinKind, f64)> = self
            .proteins
            .iter()
            .map(|p| (p.kind, p.concentration))
            .collect();
        let intermediate_masses: Vec<(IntermediateKind, f64)> = self
            .intermediates
            .iter()
            .map(|i| (i.kind, i.total_mass()))
            .collect();

        let non_finite_count = self
            .proteins
            .iter()
            .filter(|p| !p.concentration.is_finite())
            .count()
            + self
                .intermediates
                .iter()
                .map(Intermediate::non_finite_count)
                .sum::<usize>();

        if non_finite_count > 0 {
            log::warn!(
                "{} non-finite concentrations in pathway state; check rate parameters and dt",
                non_finite_count
            );
        }

        PathwayDiagnostics {
            protein_concentrations,
            intermediate_masses,
            non_finite_count,
        }
    }
}

/// Diagnostic snapshot of a pathway
#[derive(Debug, Clone, Serialize)]
pub struct PathwayDiagnostics {
    /// Free concentration per protein, slot order
    pub protein_concentrations: Vec<(ProteinKind, f64)>,
    /// Total mass over valid patterns per intermediate, pathway order
    pub intermediate_masses: Vec<(IntermediateKind, f64)>,
    /// NaN/inf entries across proteins and state vectors
    pub non_finite_count: usize,
}

impl PathwayDiagnostics {
    pub fn is_finite(&self) -> bool {
        self.non_finite_count == 0
    }

    /// Sum of every intermediate's mass
    pub fn total_intermediate_mass(&self) -> f64 {
        self.intermediate_masses.iter().map(|(_, m)| m).sum()
    }

    /// Print a formatted summary.
    pub fn print_summary(&self) {
        println!("=== NER Pathway State ===");
        println!();
        println!("Free proteins:");
        for (kind, conc) in &self.protein_concentrations {
            println!("  {:<6} {:.9}", kind.name(), conc);
        }
        println!();
        println!("Intermediates (total mass):");
        for (kind, mass) in &self.intermediate_masses {
            println!("  {:<10} {:.9}", kind.name(), mass);
        }
        println!();
        if self.is_finite() {
            println!("✓ All concentrations finite");
        } else {
            println!("⚠️  WARNING: {} non-finite concentrations", self.non_finite_count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repair::{CatalyticLink, OccupancyPattern, ParticipationMask, RateTable};

    fn proteins_with(on: f64, off: f64) -> Vec<Protein> {
        ProteinKind::ALL
            .iter()
            .map(|&k| Protein::new(k, 0.5, RateTable::uniform(on), RateTable::uniform(off)))
            .collect()
    }

    fn seeded_pathway(routing: DeltaRouting) -> Pathway {
        let mut damaged = Intermediate::new(
            IntermediateKind::Damaged,
            ParticipationMask::new([true, true, false, false, false, false, false]),
        );
        damaged.set_concentration(OccupancyPattern::EMPTY, 0.14);
        let partially = Intermediate::new(IntermediateKind::Partially, ParticipationMask::FULL);
        Pathway::new(
            proteins_with(0.3, 0.1),
            vec![damaged, partially],
            PathwayConfig {
                dt_sec: 1e-3,
                delta_routing: routing,
            },
        )
    }

    #[test]
    fn test_run_zero_is_identity() {
        let mut pathway = seeded_pathway(DeltaRouting::Broadcast);
        let before = pathway.clone();
        pathway.run(0);

        for (a, b) in pathway.proteins().iter().zip(before.proteins()) {
            assert_eq!(a.concentration.to_bits(), b.concentration.to_bits());
        }
        for (a, b) in pathway.intermediates().iter().zip(before.intermediates()) {
            assert_eq!(a.state(), b.state());
        }
    }

    #[test]
    fn test_broadcast_applies_total_to_every_protein() {
        let mut pathway = seeded_pathway(DeltaRouting::Broadcast);
        let (aggregate, _) = pathway.compute_step();
        let total: f64 = aggregate.iter().sum();
        pathway.step();

        for protein in pathway.proteins() {
            assert!(
                (protein.concentration - (0.5 + total)).abs() < 1e-15,
                "{} got {}",
                protein.name(),
                protein.concentration
            );
        }
    }

    #[test]
    fn test_per_slot_routing() {
        let mut pathway = seeded_pathway(DeltaRouting::PerSlot);
        let (aggregate, _) = pathway.compute_step();
        pathway.step();

        for (protein, delta) in pathway.proteins().iter().zip(aggregate) {
            assert!((protein.concentration - (0.5 + delta)).abs() < 1e-15);
        }
    }

    #[test]
    fn test_intermediates_read_pre_step_snapshot() {
        // partially reads damaged's pattern 0 catalytically; the flux must use
        // damaged's value before this step's update
        let mut damaged = Intermediate::new(IntermediateKind::Damaged, ParticipationMask::FULL);
        damaged.set_concentration(OccupancyPattern::EMPTY, 1.0);
        let mut partially = Intermediate::new(IntermediateKind::Partially, ParticipationMask::FULL);
        partially.add_catalysis(OccupancyPattern::EMPTY, CatalyticLink::new(0, 1.0));

        let mut pathway = Pathway::new(
            proteins_with(1.0, 0.0),
            vec![damaged, partially],
            PathwayConfig {
                dt_sec: 0.01,
                delta_routing: DeltaRouting::Broadcast,
            },
        );
        pathway.step();

        // Each slot adds dt * (-k_on[P] * x + E) with E = 1.0 * damaged[0] taken
        // before damaged loses mass this step
        let mut x = 0.0_f64;
        for _ in 0..7 {
            x += (-0.5 * x + 1.0) * 0.01;
        }
        let got = pathway.intermediates()[1].concentration(OccupancyPattern::EMPTY);
        assert!((got - x).abs() < 1e-15, "expected {}, got {}", x, got);
    }

    #[test]
    fn test_diagnostics_flags_non_finite() {
        let mut pathway = seeded_pathway(DeltaRouting::Broadcast);
        pathway
            .intermediate_mut(IntermediateKind::Partially)
            .unwrap()
            .set_concentration(OccupancyPattern::EMPTY, f64::NAN);

        let diag = pathway.diagnostics();
        assert!(!diag.is_finite());
        assert_eq!(diag.non_finite_count, 1);
    }

    #[test]
    #[should_panic]
    fn test_dangling_link_panics() {
        let mut inter = Intermediate::new(IntermediateKind::Damaged, ParticipationMask::FULL);
        inter.add_catalysis(OccupancyPattern::EMPTY, CatalyticLink::new(3, 1.0));
        Pathway::new(proteins_with(0.0, 0.0), vec![inter], PathwayConfig::default());
    }
}
