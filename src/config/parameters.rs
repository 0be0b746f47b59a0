//! Static rate and coupling tables for the NER model.
//!
//! Default values are the published parameter set.
//! Source: Luijsterburg MS et al., J Cell Biol 2010;189:445-463

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::repair::{IntermediateKind, ProteinKind, DEFAULT_INIT_DAMAGE};

/// Top-level parameters container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairParameters {
    /// Proteins in slot order
    pub proteins: Vec<ProteinParameters>,
    /// Intermediates in pathway order (catalysis indices refer to this order)
    pub intermediates: Vec<IntermediateParameters>,
    /// Initial concentration of damaged, unbound DNA
    #[serde(default = "default_init_damage")]
    pub init_damage: f64,
}

fn default_init_damage() -> f64 {
    DEFAULT_INIT_DAMAGE
}

/// Protein species table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProteinParameters {
    pub name: ProteinKind,
    /// Initial free concentration
    #[serde(rename = "init_conc")]
    pub init_concentration: f64,
    /// Association rate per intermediate
    #[serde(rename = "on")]
    pub on_rates: BTreeMap<IntermediateKind, f64>,
    /// Dissociation rate per intermediate
    #[serde(rename = "off")]
    pub off_rates: BTreeMap<IntermediateKind, f64>,
}

/// Intermediate table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntermediateParameters {
    pub name: IntermediateKind,
    /// Participating protein slots, one flag per protein
    pub mask: Vec<bool>,
    /// Catalytic inputs keyed by occupancy pattern string (e.g. "0100000")
    #[serde(rename = "enzyme_dict", default)]
    pub catalysis: BTreeMap<String, CatalysisParameters>,
}

/// Catalytic inputs for one pattern: `factors[j]` applies to intermediate `sources[j]`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalysisParameters {
    #[serde(rename = "factor")]
    pub factors: Vec<f64>,
    /// Source positions in `RepairParameters::intermediates`
    #[serde(rename = "inter")]
    pub sources: Vec<usize>,
}

impl RepairParameters {
    /// Load from JSON file or return defaults
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match std::fs::read_to_string(path.as_ref()) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(params) => {
                    log::info!("Loaded repair parameters from {:?}", path.as_ref());
                    params
                }
                Err(e) => {
                    log::warn!("Failed to parse repair parameters: {}, using defaults", e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Repair parameters file not found, using defaults");
                Self::default()
            }
        }
    }

    /// Load from JSON file, failing on a missing or malformed file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("reading repair parameters from {}", path.display()))?;
        let params = serde_json::from_str(&contents)
            .with_context(|| format!("parsing repair parameters from {}", path.display()))?;
        log::info!("Loaded repair parameters from {:?}", path);
        Ok(params)
    }

    /// Same tables with every on/off rate set to zero
    pub fn without_rates(&self) -> Self {
        let mut params = self.clone();
        for protein in &mut params.proteins {
            protein.on_rates.values_mut().for_each(|r| *r = 0.0);
            protein.off_rates.values_mut().for_each(|r| *r = 0.0);
        }
        params
    }
}

/// Rate map in `IntermediateKind::ALL` order
fn rates(values: [f64; 6]) -> BTreeMap<IntermediateKind, f64> {
    IntermediateKind::ALL.into_iter().zip(values).collect()
}

fn catalysis(entries: Vec<(&str, Vec<f64>, Vec<usize>)>) -> BTreeMap<String, CatalysisParameters> {
    entries
        .into_iter()
        .map(|(pattern, factors, sources)| (pattern.to_string(), CatalysisParameters { factors, sources }))
        .collect()
}

impl Default for RepairParameters {
    fn default() -> Self {
        // Rate order: damaged, partially, fully, incised, resynth, rechrom
        let proteins = vec![
            ProteinParameters {
                name: ProteinKind::Xpc,
                init_concentration: 0.14,
                on_rates: rates([0.008, 0.002, 0.002, 0.22, 0.0, 0.0]),
                off_rates: rates([0.061, 0.007, 0.007, 0.4, 0.0, 0.0]),
            },
            ProteinParameters {
                name: ProteinKind::Tfiih,
                init_concentration: 0.36,
                on_rates: rates([1.6, 0.26, 0.26, 0.0004, 0.0, 0.0]),
                off_rates: rates([0.053, 0.012, 0.012, 0.05, 0.0, 0.0]),
            },
            ProteinParameters {
                name: ProteinKind::Xpg,
                init_concentration: 0.44,
                on_rates: rates([0.0, 0.28, 0.28, 0.001, 0.0, 0.0]),
                off_rates: rates([0.0, 0.015, 0.015, 0.1, 0.0, 0.0]),
            },
            ProteinParameters {
                name: ProteinKind::Xpa,
                init_concentration: 1.11,
                on_rates: rates([0.0, 0.13, 0.13, 0.004, 0.054, 0.0]),
                off_rates: rates([0.0, 1.04, 1.04, 0.06, 0.004, 0.0]),
            },
            ProteinParameters {
                name: ProteinKind::Xpf,
                init_concentration: 0.17,
                on_rates: rates([0.0, 1.2, 1.2, 0.09, 0.0, 0.0]),
                off_rates: rates([0.0, 0.01, 0.01, 0.05, 0.0, 0.0]),
            },
            ProteinParameters {
                name: ProteinKind::Rpa,
                init_concentration: 1.11,
                on_rates: rates([0.0, 0.15, 0.006, 0.006, 0.08, 0.07]),
                off_rates: rates([0.0, 2.6, 0.021, 0.021, 0.04, 0.04]),
            },
            ProteinParameters {
                name: ProteinKind::Pcna,
                init_concentration: 1.11,
                on_rates: rates([0.0, 0.0, 0.0, 0.001, 0.01, 0.31]),
                off_rates: rates([0.0, 0.0, 0.0, 0.004, 0.002, 0.05]),
            },
        ];

        // Indices: 0 damaged, 1 partially, 2 fully, 3 incised, 4 resynth, 5 rechrom
        let intermediates = vec![
            IntermediateParameters {
                name: IntermediateKind::Damaged,
                mask: vec![true, true, false, false, false, false, false],
                catalysis: catalysis(vec![
                    ("0000000", vec![3.1, 11.0], vec![1, 2]),
                    ("0100000", vec![-0.08], vec![0]),
                ]),
            },
            IntermediateParameters {
                name: IntermediateKind::Partially,
                mask: vec![true, true, true, true, true, true, false],
                catalysis: catalysis(vec![
                    ("0000000", vec![-3.1], vec![1]),
                    ("1100000", vec![11.0], vec![0]),
                    ("1111010", vec![-0.74], vec![1]),
                    ("1111110", vec![-0.74], vec![1]),
                ]),
            },
            IntermediateParameters {
                name: IntermediateKind::Fully,
                mask: vec![true, true, true, true, true, true, false],
                catalysis: catalysis(vec![
                    ("0000000", vec![-11.0], vec![2]),
                    ("0111110", vec![-4.1], vec![2]),
                    ("1111010", vec![0.74], vec![1]),
                    ("1111110", vec![-4.1, 0.74], vec![2, 1]),
                ]),
            },
            IntermediateParameters {
                name: IntermediateKind::Incised,
                mask: vec![true; 7],
                catalysis: catalysis(vec![("1111111", vec![4.1], vec![2])]),
            },
            IntermediateParameters {
                name: IntermediateKind::Resynth,
                mask: vec![false, false, false, true, false, true, true],
                catalysis: catalysis(vec![("0000011", vec![0.05, -0.012], vec![3, 4])]),
            },
            IntermediateParameters {
                name: IntermediateKind::Rechrom,
                mask: vec![false, false, false, false, false, true, true],
                catalysis: catalysis(vec![("0000011", vec![0.012], vec![4])]),
            },
        ];

        Self {
            proteins,
            intermediates,
            init_damage: DEFAULT_INIT_DAMAGE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_complete() {
        let params = RepairParameters::default();
        assert_eq!(params.proteins.len(), 7);
        assert_eq!(params.intermediates.len(), 6);
        for protein in &params.proteins {
            assert_eq!(protein.on_rates.len(), 6, "{:?} on rates", protein.name);
            assert_eq!(protein.off_rates.len(), 6, "{:?} off rates", protein.name);
        }
        assert!((params.init_damage - 0.14).abs() < 1e-12);
    }

    #[test]
    fn test_default_tfiih_rates() {
        let params = RepairParameters::default();
        let tfiih = &params.proteins[1];
        assert_eq!(tfiih.name, ProteinKind::Tfiih);
        assert!((tfiih.on_rates[&IntermediateKind::Damaged] - 1.6).abs() < 1e-12);
        assert!((tfiih.off_rates[&IntermediateKind::Incised] - 0.05).abs() < 1e-12);
    }

    #[test]
    fn test_serialization() {
        let params = RepairParameters::default();
        let json = serde_json::to_string_pretty(&params).unwrap();
        assert!(json.contains("\"enzyme_dict\""));
        assert!(json.contains("\"init_conc\""));

        let parsed: RepairParameters = serde_json::from_str(&json).unwrap();
        let fully = &parsed.intermediates[2];
        assert_eq!(fully.catalysis["1111110"].sources, vec![2, 1]);
    }

    #[test]
    fn test_init_damage_defaults_when_absent() {
        let json = r#"{
            "proteins": [],
            "intermediates": [
                {"name": "rechrom", "mask": [false, false, false, false, false, true, true]}
            ]
        }"#;
        let parsed: RepairParameters = serde_json::from_str(json).unwrap();
        assert!((parsed.init_damage - DEFAULT_INIT_DAMAGE).abs() < 1e-12);
        assert!(parsed.intermediates[0].catalysis.is_empty());
    }

    #[test]
    fn test_without_rates() {
        let params = RepairParameters::default().without_rates();
        for protein in &params.proteins {
            assert!(protein.on_rates.values().all(|&r| r == 0.0));
            assert!(protein.off_rates.values().all(|&r| r == 0.0));
        }
    }
}
