use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// Raw metric names reported by the device-physics capability.
pub const SS_MVDEC: &str = "SS_mVdec";
pub const VTH_V: &str = "Vth_V";
pub const ION_A_PER_UM: &str = "Ion_A_per_um";
pub const GM_S_PER_UM: &str = "gm_S_per_um";
pub const FT_HZ: &str = "ft_Hz";
pub const R0_OHM_PER_UM: &str = "r0_ohm_per_um";
pub const DIBL_MV_PER_V: &str = "DIBL_mV_per_V";
pub const STAB_SCORE: &str = "Stab_score";
pub const IOFF_PROXY: &str = "Ioff_proxy";

// Percentile names derived from the raw metrics.
pub const SS_PERCENT: &str = "SS_percent";
pub const VTH_SCORE_PERCENT: &str = "Vth_score_percent";
pub const ION_PERCENT: &str = "Ion_percent";
pub const IOFF_PERCENT: &str = "Ioff_percent";
pub const GM_PERCENT: &str = "gm_percent";
pub const FT_PERCENT: &str = "fT_percent";
pub const R0_PERCENT: &str = "r0_percent";
pub const DIBL_PERCENT: &str = "DIBL_percent";
pub const STAB_PERCENT: &str = "Stab_percent";

/// Intrinsic physical identity of one material. Never mutated after
/// construction; baselines and candidates use the same representation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MaterialInputs {
    #[serde(rename = "Eg_eV")]
    pub band_gap_ev: f64,
    #[serde(rename = "eps_r")]
    pub permittivity: f64,
    #[serde(rename = "Ef_eV_atom")]
    pub formation_energy_ev_atom: f64,
}

/// Process and device-design knobs. One instance is resolved per request
/// and shared read-only by the candidate and every baseline evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProcessParameters {
    #[serde(rename = "tox_nm")]
    pub oxide_thickness_nm: f64,
    #[serde(rename = "eps_ox")]
    pub oxide_permittivity: f64,
    #[serde(rename = "NA_cm3")]
    pub doping_cm3: f64,
    #[serde(rename = "L_nm")]
    pub channel_length_nm: f64,
    #[serde(rename = "VDD_V")]
    pub supply_v: f64,
    #[serde(rename = "T_K")]
    pub temperature_k: f64,
    #[serde(rename = "W_um")]
    pub channel_width_um: f64,
    #[serde(rename = "mu_cm2_Vs")]
    pub mobility_cm2_vs: f64,
}

pub const DEFAULT_TEMPERATURE_K: f64 = 300.0;
pub const DEFAULT_SUPPLY_V: f64 = 0.9;

impl Default for ProcessParameters {
    fn default() -> Self {
        Self {
            oxide_thickness_nm: 1.2,
            oxide_permittivity: 3.9,
            doping_cm3: 1.0e17,
            channel_length_nm: 45.0,
            supply_v: DEFAULT_SUPPLY_V,
            temperature_k: DEFAULT_TEMPERATURE_K,
            channel_width_um: 1.0,
            mobility_cm2_vs: 450.0,
        }
    }
}

/// Insertion-ordered metric-name → value mapping.
///
/// The ranking stage appends keys outside its priority list in encounter
/// order, so ordering is part of the contract and a sorted map will not do.
/// Deserialization keeps only cells that coerce to a finite number; a
/// non-numeric cell is dropped on its own, never the whole mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricMap {
    entries: Vec<(String, f64)>,
}

pub type RawMetrics = MetricMap;
pub type PercentileScores = MetricMap;

impl MetricMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a value, keeping the key's original position
    /// when it is already present.
    pub fn insert(&mut self, key: impl Into<String>, value: f64) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| *v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, f64)> for MetricMap {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'a> FromIterator<(&'a str, f64)> for MetricMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

impl Serialize for MetricMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for MetricMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MetricMapVisitor;

        impl<'de> Visitor<'de> for MetricMapVisitor {
            type Value = MetricMap;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of metric names to numeric values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut map = MetricMap::new();
                while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
                    if let Some(number) = value.as_f64().filter(|v| v.is_finite()) {
                        map.insert(key, number);
                    }
                }
                Ok(map)
            }
        }

        deserializer.deserialize_map(MetricMapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_encounter_order() {
        let mut map = MetricMap::new();
        map.insert("b", 2.0);
        map.insert("a", 1.0);
        map.insert("c", 3.0);
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn reinsert_updates_value_in_place() {
        let mut map = MetricMap::new();
        map.insert("a", 1.0);
        map.insert("b", 2.0);
        map.insert("a", 9.0);
        assert_eq!(map.get("a"), Some(9.0));
        let keys: Vec<&str> = map.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[test]
    fn deserialize_drops_non_numeric_cells_only() {
        let map: MetricMap = serde_json::from_str(
            r#"{"Ion_percent": 42.5, "gm_percent": "n/a", "fT_percent": null, "SS_percent": 61.0}"#,
        )
        .expect("map deserializes");

        assert_eq!(map.get(ION_PERCENT), Some(42.5));
        assert_eq!(map.get(SS_PERCENT), Some(61.0));
        assert!(!map.contains_key(GM_PERCENT));
        assert!(!map.contains_key(FT_PERCENT));
    }

    #[test]
    fn serializes_as_plain_json_object() {
        let mut map = MetricMap::new();
        map.insert(ION_PERCENT, 25.0);
        let json = serde_json::to_value(&map).expect("serializes");
        assert_eq!(json, serde_json::json!({ "Ion_percent": 25.0 }));
    }

    #[test]
    fn process_parameter_defaults_match_library_table() {
        let defaults = ProcessParameters::default();
        assert_eq!(defaults.temperature_k, DEFAULT_TEMPERATURE_K);
        assert_eq!(defaults.supply_v, DEFAULT_SUPPLY_V);
        assert_eq!(defaults.oxide_permittivity, 3.9);
        assert_eq!(defaults.doping_cm3, 1.0e17);
    }
}
