use super::domain::MaterialInputs;
use serde::Serialize;

/// One named reference material with tabulated properties.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BaselineMaterial {
    pub name: String,
    #[serde(flatten)]
    pub inputs: MaterialInputs,
}

impl BaselineMaterial {
    pub fn new(name: &str, band_gap_ev: f64, permittivity: f64, formation_energy_ev_atom: f64) -> Self {
        Self {
            name: name.to_string(),
            inputs: MaterialInputs {
                band_gap_ev,
                permittivity,
                formation_energy_ev_atom,
            },
        }
    }
}

/// Ordered collection of reference materials. Built once at startup and
/// shared read-only; every entry is evaluated under the candidate's
/// process parameters, never its own.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BaselineSet {
    entries: Vec<BaselineMaterial>,
}

impl BaselineSet {
    /// Conventional-semiconductor reference table. Band gaps and relative
    /// permittivities are room-temperature literature values; formation
    /// energies are per-atom DFT convex-hull figures.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                BaselineMaterial::new("Si", 1.12, 11.7, 0.0),
                BaselineMaterial::new("Ge", 0.66, 16.0, 0.0),
                BaselineMaterial::new("GaAs", 1.42, 12.9, -0.37),
                BaselineMaterial::new("4H-SiC", 3.26, 9.7, -0.64),
                BaselineMaterial::new("GaN", 3.39, 8.9, -1.17),
            ],
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<BaselineMaterial>) -> Self {
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = &BaselineMaterial> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_table_is_ordered_and_silicon_first() {
        let set = BaselineSet::standard();
        let names: Vec<&str> = set.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Si", "Ge", "GaAs", "4H-SiC", "GaN"]);
    }

    #[test]
    fn wide_gap_references_carry_negative_formation_energy() {
        let set = BaselineSet::standard();
        let gan = set
            .iter()
            .find(|b| b.name == "GaN")
            .expect("GaN tabulated");
        assert!(gan.inputs.band_gap_ev > 3.0);
        assert!(gan.inputs.formation_energy_ev_atom < 0.0);
    }
}
