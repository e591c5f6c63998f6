use super::domain::{
    MaterialInputs, ProcessParameters, DEFAULT_SUPPLY_V, DEFAULT_TEMPERATURE_K,
};
use super::ScreeningError;
use serde::Deserialize;

/// Wire names of the material properties every candidate must provide.
pub const REQUIRED_MATERIAL_KEYS: [&str; 3] = ["Eg_eV", "eps_r", "Ef_eV_atom"];

/// Raw candidate payload: the material identity plus any process overrides
/// the caller wants to pin. Every field is optional at the wire level; the
/// resolver decides what is required. JSON `null` counts as unset (the
/// browser client submits nulls for empty form fields).
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CandidateProperties {
    #[serde(rename = "Eg_eV")]
    pub band_gap_ev: Option<f64>,
    #[serde(rename = "eps_r")]
    pub permittivity: Option<f64>,
    #[serde(rename = "Ef_eV_atom")]
    pub formation_energy_ev_atom: Option<f64>,
    #[serde(rename = "tox_nm")]
    pub oxide_thickness_nm: Option<f64>,
    #[serde(rename = "eps_ox")]
    pub oxide_permittivity: Option<f64>,
    #[serde(rename = "NA_cm3")]
    pub doping_cm3: Option<f64>,
    #[serde(rename = "L_nm")]
    pub channel_length_nm: Option<f64>,
    #[serde(rename = "VDD_V")]
    pub supply_v: Option<f64>,
    #[serde(rename = "T_K")]
    pub temperature_k: Option<f64>,
    #[serde(rename = "W_um")]
    pub channel_width_um: Option<f64>,
    #[serde(rename = "mu_cm2_Vs")]
    pub mobility_cm2_vs: Option<f64>,
}

impl CandidateProperties {
    /// Convenience constructor carrying only the required material triple.
    pub fn material(band_gap_ev: f64, permittivity: f64, formation_energy_ev_atom: f64) -> Self {
        Self {
            band_gap_ev: Some(band_gap_ev),
            permittivity: Some(permittivity),
            formation_energy_ev_atom: Some(formation_energy_ev_atom),
            ..Self::default()
        }
    }
}

/// Request-level operating conditions, below per-material overrides in
/// precedence but above the library defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScreeningConditions {
    pub temp: Option<f64>,
    pub vdd: Option<f64>,
}

/// Merges candidate properties, request conditions, and library defaults
/// into a complete typed parameter set. Pure function of its inputs.
pub fn resolve(
    props: &CandidateProperties,
    conditions: &ScreeningConditions,
) -> Result<(MaterialInputs, ProcessParameters), ScreeningError> {
    let mut missing = Vec::new();
    if props.band_gap_ev.is_none() {
        missing.push(REQUIRED_MATERIAL_KEYS[0].to_string());
    }
    if props.permittivity.is_none() {
        missing.push(REQUIRED_MATERIAL_KEYS[1].to_string());
    }
    if props.formation_energy_ev_atom.is_none() {
        missing.push(REQUIRED_MATERIAL_KEYS[2].to_string());
    }
    if !missing.is_empty() {
        return Err(ScreeningError::MissingInput { missing });
    }

    let material = MaterialInputs {
        band_gap_ev: props.band_gap_ev.unwrap_or_default(),
        permittivity: props.permittivity.unwrap_or_default(),
        formation_energy_ev_atom: props.formation_energy_ev_atom.unwrap_or_default(),
    };

    let defaults = ProcessParameters::default();
    let process = ProcessParameters {
        oxide_thickness_nm: props.oxide_thickness_nm.unwrap_or(defaults.oxide_thickness_nm),
        oxide_permittivity: props.oxide_permittivity.unwrap_or(defaults.oxide_permittivity),
        doping_cm3: props.doping_cm3.unwrap_or(defaults.doping_cm3),
        channel_length_nm: props.channel_length_nm.unwrap_or(defaults.channel_length_nm),
        supply_v: props
            .supply_v
            .or(conditions.vdd)
            .unwrap_or(DEFAULT_SUPPLY_V),
        temperature_k: props
            .temperature_k
            .or(conditions.temp)
            .unwrap_or(DEFAULT_TEMPERATURE_K),
        channel_width_um: props.channel_width_um.unwrap_or(defaults.channel_width_um),
        mobility_cm2_vs: props.mobility_cm2_vs.unwrap_or(defaults.mobility_cm2_vs),
    };

    Ok((material, process))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn silicon() -> CandidateProperties {
        CandidateProperties::material(1.12, 11.7, 0.0)
    }

    #[test]
    fn missing_required_keys_are_all_named() {
        let props = CandidateProperties {
            permittivity: Some(11.7),
            ..CandidateProperties::default()
        };

        let err = resolve(&props, &ScreeningConditions::default())
            .expect_err("missing keys rejected");
        match &err {
            ScreeningError::MissingInput { missing } => {
                assert_eq!(missing, &vec!["Eg_eV".to_string(), "Ef_eV_atom".to_string()]);
            }
            other => panic!("expected MissingInput, got {other:?}"),
        }

        let message = err.to_string();
        assert!(message.contains("Eg_eV"));
        assert!(message.contains("Ef_eV_atom"));
        assert!(message.contains("eps_r"), "full required set is listed: {message}");
    }

    #[test]
    fn defaults_fill_every_unset_process_key() {
        let (material, process) =
            resolve(&silicon(), &ScreeningConditions::default()).expect("resolves");
        assert_eq!(material.band_gap_ev, 1.12);
        assert_eq!(process, ProcessParameters::default());
    }

    #[test]
    fn conditions_override_library_defaults() {
        let conditions = ScreeningConditions {
            temp: Some(350.0),
            vdd: Some(1.2),
        };
        let (_, process) = resolve(&silicon(), &conditions).expect("resolves");
        assert_eq!(process.temperature_k, 350.0);
        assert_eq!(process.supply_v, 1.2);
    }

    #[test]
    fn per_material_override_beats_conditions() {
        let props = CandidateProperties {
            temperature_k: Some(77.0),
            supply_v: Some(0.7),
            ..silicon()
        };
        let conditions = ScreeningConditions {
            temp: Some(350.0),
            vdd: Some(1.2),
        };
        let (_, process) = resolve(&props, &conditions).expect("resolves");
        assert_eq!(process.temperature_k, 77.0);
        assert_eq!(process.supply_v, 0.7);
    }

    #[test]
    fn process_overrides_replace_only_named_keys() {
        let props = CandidateProperties {
            oxide_thickness_nm: Some(2.0),
            doping_cm3: Some(5.0e17),
            ..silicon()
        };
        let (_, process) = resolve(&props, &ScreeningConditions::default()).expect("resolves");
        assert_eq!(process.oxide_thickness_nm, 2.0);
        assert_eq!(process.doping_cm3, 5.0e17);
        assert_eq!(
            process.channel_length_nm,
            ProcessParameters::default().channel_length_nm
        );
    }

    #[test]
    fn null_fields_deserialize_as_unset() {
        let props: CandidateProperties = serde_json::from_str(
            r#"{"Eg_eV": 1.1, "eps_r": null, "Ef_eV_atom": 0.0, "mu_cm2_Vs": null}"#,
        )
        .expect("payload deserializes");
        assert!(props.permittivity.is_none());
        assert!(props.mobility_cm2_vs.is_none());
        assert!(resolve(&props, &ScreeningConditions::default()).is_err());
    }
}
