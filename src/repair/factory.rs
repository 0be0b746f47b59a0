//! Wiring of configuration tables into a runnable pathway.
//!
//! Two passes: every intermediate is constructed first, then catalysis
//! tables are resolved from configured source indices into links to
//! positions in the finished collection. Cyclic and self references are
//! therefore allowed.

use std::collections::HashSet;

use anyhow::{bail, ensure, Context, Result};

use crate::config::{IntermediateParameters, ProteinParameters, RepairParameters};

use super::intermediate::{CatalyticLink, Intermediate};
use super::occupancy::{OccupancyPattern, ParticipationMask};
use super::pathway::{Pathway, PathwayConfig};
use super::protein::{Protein, RateTable};
use super::{IntermediateKind, ProteinKind, NUM_PROTEINS};

/// Build a pathway from configuration tables
///
/// The `damaged` intermediate, if present, is seeded with
/// `params.init_damage` at the empty pattern.
pub fn build_pathway(params: &RepairParameters, config: PathwayConfig) -> Result<Pathway> {
    ensure!(
        params.proteins.len() == NUM_PROTEINS,
        "expected {} proteins, got {}",
        NUM_PROTEINS,
        params.proteins.len()
    );

    let mut seen_proteins = HashSet::new();
    for (slot, protein) in params.proteins.iter().enumerate() {
        ensure!(
            seen_proteins.insert(protein.name),
            "protein {} configured twice",
            protein.name.name()
        );
        ensure!(
            protein.name == ProteinKind::ALL[slot],
            "slot {} holds {}, expected {}",
            slot,
            protein.name.name(),
            ProteinKind::ALL[slot].name()
        );
    }

    let kinds: Vec<IntermediateKind> = params.intermediates.iter().map(|i| i.name).collect();
    let mut seen = HashSet::new();
    for kind in &kinds {
        ensure!(seen.insert(*kind), "intermediate {} configured twice", kind.name());
    }

    let proteins = params
        .proteins
        .iter()
        .map(|p| build_protein(p, &kinds))
        .collect::<Result<Vec<_>>>()?;

    let mut intermediates = params
        .intermediates
        .iter()
        .map(|i| -> Result<Intermediate> {
            let mask = ParticipationMask::from_slice(&i.mask)
                .with_context(|| format!("intermediate {}", i.name.name()))?;
            Ok(Intermediate::new(i.name, mask))
        })
        .collect::<Result<Vec<_>>>()?;

    for inter in intermediates.iter_mut() {
        if inter.kind == IntermediateKind::Damaged {
            inter.set_concentration(OccupancyPattern::EMPTY, params.init_damage);
        }
    }

    let count = intermediates.len();
    for (inter, table) in intermediates.iter_mut().zip(&params.intermediates) {
        resolve_catalysis(inter, table, count)
            .with_context(|| format!("catalysis table of {}", table.name.name()))?;
    }

    log::info!(
        "Wired NER pathway: {} proteins, {} intermediates, {} catalytic links",
        proteins.len(),
        intermediates.len(),
        intermediates
            .iter()
            .map(|i| i.catalysis_table().values().map(Vec::len).sum::<usize>())
            .sum::<usize>()
    );

    Ok(Pathway::new(proteins, intermediates, config))
}

/// Resolve name-keyed rates into tables, requiring a rate for every
/// configured intermediate
fn build_protein(params: &ProteinParameters, kinds: &[IntermediateKind]) -> Result<Protein> {
    let mut on_rates = RateTable::default();
    let mut off_rates = RateTable::default();
    for &kind in kinds {
        let Some(&on) = params.on_rates.get(&kind) else {
            bail!("protein {} has no on rate for {}", params.name.name(), kind.name());
        };
        let Some(&off) = params.off_rates.get(&kind) else {
            bail!("protein {} has no off rate for {}", params.name.name(), kind.name());
        };
        on_rates.set(kind, on);
        off_rates.set(kind, off);
    }
    Ok(Protein::new(params.name, params.init_concentration, on_rates, off_rates))
}

fn resolve_catalysis(inter: &mut Intermediate, table: &IntermediateParameters, count: usize) -> Result<()> {
    for (key, entry) in &table.catalysis {
        let pattern = OccupancyPattern::parse(key)?;
        if !inter.mask().admits(pattern) {
            log::warn!(
                "{}: catalysis pattern {} lies outside the participation mask and never fires",
                inter.kind.name(),
                key
            );
        }
        ensure!(
            entry.factors.len() == entry.sources.len(),
            "pattern {} has {} factors but {} sources",
            key,
            entry.factors.len(),
            entry.sources.len()
        );
        for (&source, &factor) in entry.sources.iter().zip(&entry.factors) {
            ensure!(
                source < count,
                "pattern {} references intermediate {}, only {} configured",
                key,
                source,
                count
            );
            inter.add_catalysis(pattern, CatalyticLink::new(source, factor));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalysisParameters;

    #[test]
    fn test_default_wiring() {
        let pathway = build_pathway(&RepairParameters::default(), PathwayConfig::default()).unwrap();
        assert_eq!(pathway.proteins().len(), 7);
        assert_eq!(pathway.intermediates().len(), 6);

        let damaged = pathway.intermediate(IntermediateKind::Damaged).unwrap();
        assert_eq!(damaged.concentration(OccupancyPattern::EMPTY), 0.14);

        // fully "1111110" couples to itself and to partially
        let fully = pathway.intermediate(IntermediateKind::Fully).unwrap();
        let links = fully.catalysis(OccupancyPattern::parse("1111110").unwrap());
        assert_eq!(links, &[CatalyticLink::new(2, -4.1), CatalyticLink::new(1, 0.74)]);

        let xpf = pathway.protein(ProteinKind::Xpf).unwrap();
        assert!((xpf.on_rate(IntermediateKind::Partially) - 1.2).abs() < 1e-12);
    }

    #[test]
    fn test_unresolved_source_rejected() {
        let mut params = RepairParameters::default();
        params.intermediates[5].catalysis.insert(
            "0000011".to_string(),
            CatalysisParameters {
                factors: vec![1.0],
                sources: vec![9],
            },
        );
        let err = build_pathway(&params, PathwayConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("references intermediate 9"));
    }

    #[test]
    fn test_bad_mask_rejected() {
        let mut params = RepairParameters::default();
        params.intermediates[0].mask.pop();
        let err = build_pathway(&params, PathwayConfig::default()).unwrap_err();
        assert!(format!("{:#}", err).contains("participation mask"));
    }

    #[test]
    fn test_missing_rate_rejected() {
        let mut params = RepairParameters::default();
        params.proteins[3].off_rates.remove(&IntermediateKind::Resynth);
        assert!(build_pathway(&params, PathwayConfig::default()).is_err());
    }
}
