use super::resolver::CandidateProperties;
use serde::Deserialize;
use std::io::Read;

/// One candidate material parsed from a batch CSV export.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedCandidate {
    pub name: String,
    pub properties: CandidateProperties,
}

#[derive(Debug, Deserialize)]
struct MaterialRow {
    name: String,
    #[serde(rename = "Eg_eV", default)]
    band_gap_ev: Option<f64>,
    #[serde(rename = "eps_r", default)]
    permittivity: Option<f64>,
    #[serde(rename = "Ef_eV_atom", default)]
    formation_energy_ev_atom: Option<f64>,
    #[serde(rename = "tox_nm", default)]
    oxide_thickness_nm: Option<f64>,
    #[serde(rename = "eps_ox", default)]
    oxide_permittivity: Option<f64>,
    #[serde(rename = "NA_cm3", default)]
    doping_cm3: Option<f64>,
    #[serde(rename = "L_nm", default)]
    channel_length_nm: Option<f64>,
    #[serde(rename = "VDD_V", default)]
    supply_v: Option<f64>,
    #[serde(rename = "T_K", default)]
    temperature_k: Option<f64>,
    #[serde(rename = "W_um", default)]
    channel_width_um: Option<f64>,
    #[serde(rename = "mu_cm2_Vs", default)]
    mobility_cm2_vs: Option<f64>,
}

/// Reads a candidate-materials CSV (`name,Eg_eV,eps_r,Ef_eV_atom` plus any
/// process-override columns; empty cells stay unset). Rows are returned in
/// file order; whether a row resolves is the resolver's call, not ours.
pub struct MaterialCsvImporter;

impl MaterialCsvImporter {
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<NamedCandidate>, csv::Error> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut candidates = Vec::new();
        for record in csv_reader.deserialize::<MaterialRow>() {
            let row = record?;
            candidates.push(NamedCandidate {
                name: row.name,
                properties: CandidateProperties {
                    band_gap_ev: row.band_gap_ev,
                    permittivity: row.permittivity,
                    formation_energy_ev_atom: row.formation_energy_ev_atom,
                    oxide_thickness_nm: row.oxide_thickness_nm,
                    oxide_permittivity: row.oxide_permittivity,
                    doping_cm3: row.doping_cm3,
                    channel_length_nm: row.channel_length_nm,
                    supply_v: row.supply_v,
                    temperature_k: row.temperature_k,
                    channel_width_um: row.channel_width_um,
                    mobility_cm2_vs: row.mobility_cm2_vs,
                },
            });
        }

        Ok(candidates)
    }
}
