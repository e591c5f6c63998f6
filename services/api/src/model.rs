//! Reference implementation of the device-physics capability: a
//! long-channel analytic MOSFET model plus percentile normalization
//! against fixed reference bands. The core treats this as opaque; any
//! other `DeviceModel` implementation can be wired in its place.

use mosfet_screener::screening::domain::{
    MaterialInputs, PercentileScores, ProcessParameters, RawMetrics, DIBL_MV_PER_V, DIBL_PERCENT,
    FT_HZ, FT_PERCENT, GM_PERCENT, GM_S_PER_UM, IOFF_PERCENT, IOFF_PROXY, ION_A_PER_UM,
    ION_PERCENT, R0_OHM_PER_UM, R0_PERCENT, SS_MVDEC, SS_PERCENT, STAB_PERCENT, STAB_SCORE,
    VTH_SCORE_PERCENT, VTH_V,
};
use mosfet_screener::screening::{DeviceModel, ModelError};

const ELEMENTARY_CHARGE_C: f64 = 1.602_176_634e-19;
const BOLTZMANN_J_PER_K: f64 = 1.380_649e-23;
// Vacuum permittivity in F/cm; every capacitance below is per cm^2.
const EPS0_F_PER_CM: f64 = 8.854_187_812_8e-14;
// Effective conduction/valence band densities of states at 300 K (cm^-3),
// silicon-like; scaled with (T/300)^1.5 each.
const NC_300_CM3: f64 = 2.8e19;
const NV_300_CM3: f64 = 1.04e19;

const CM_PER_NM: f64 = 1.0e-7;
const CM_PER_UM: f64 = 1.0e-4;

// Early voltage per 100 nm of channel, for the output-resistance estimate.
const EARLY_VOLTAGE_PER_100NM_V: f64 = 10.0;

// Threshold-voltage quality: full marks at the window center, falling
// linearly to zero at +/- VTH_WINDOW_HALF_WIDTH_V.
const VTH_IDEAL_V: f64 = 0.4;
const VTH_WINDOW_HALF_WIDTH_V: f64 = 0.8;

pub(crate) struct AnalyticDeviceModel;

impl AnalyticDeviceModel {
    fn thermal_voltage_v(temperature_k: f64) -> f64 {
        BOLTZMANN_J_PER_K * temperature_k / ELEMENTARY_CHARGE_C
    }

    fn intrinsic_density_cm3(band_gap_ev: f64, temperature_k: f64) -> f64 {
        let scale = (temperature_k / 300.0).powf(1.5);
        let dos = ((NC_300_CM3 * scale) * (NV_300_CM3 * scale)).sqrt();
        dos * (-band_gap_ev / (2.0 * Self::thermal_voltage_v(temperature_k))).exp()
    }

    fn validate(material: &MaterialInputs, process: &ProcessParameters) -> Result<(), ModelError> {
        let positive = [
            ("Eg_eV", material.band_gap_ev),
            ("eps_r", material.permittivity),
            ("tox_nm", process.oxide_thickness_nm),
            ("eps_ox", process.oxide_permittivity),
            ("NA_cm3", process.doping_cm3),
            ("L_nm", process.channel_length_nm),
            ("W_um", process.channel_width_um),
            ("mu_cm2_Vs", process.mobility_cm2_vs),
            ("T_K", process.temperature_k),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ModelError::Evaluation(format!(
                    "{name} must be finite and positive (got {value})"
                )));
            }
        }
        if !material.formation_energy_ev_atom.is_finite() || !process.supply_v.is_finite() {
            return Err(ModelError::Evaluation(
                "formation energy and supply voltage must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

impl DeviceModel for AnalyticDeviceModel {
    fn compute_metrics(
        &self,
        material: &MaterialInputs,
        process: &ProcessParameters,
    ) -> Result<RawMetrics, ModelError> {
        Self::validate(material, process)?;

        let ut = Self::thermal_voltage_v(process.temperature_k);
        let ni = Self::intrinsic_density_cm3(material.band_gap_ev, process.temperature_k);
        if process.doping_cm3 <= ni {
            return Err(ModelError::Evaluation(format!(
                "NA_cm3 = {:.3e} is below the intrinsic density {:.3e}",
                process.doping_cm3, ni
            )));
        }

        let tox_cm = process.oxide_thickness_nm * CM_PER_NM;
        let l_cm = process.channel_length_nm * CM_PER_NM;
        let w_cm = process.channel_width_um * CM_PER_UM;

        let cox = process.oxide_permittivity * EPS0_F_PER_CM / tox_cm;
        let phi_f = ut * (process.doping_cm3 / ni).ln();
        let w_dep = (2.0 * material.permittivity * EPS0_F_PER_CM * 2.0 * phi_f
            / (ELEMENTARY_CHARGE_C * process.doping_cm3))
            .sqrt();
        let q_dep = ELEMENTARY_CHARGE_C * process.doping_cm3 * w_dep;
        let c_dep = material.permittivity * EPS0_F_PER_CM / w_dep;

        let vth = 2.0 * phi_f + q_dep / cox;
        let ss_mvdec = 1000.0 * std::f64::consts::LN_10 * ut * (1.0 + c_dep / cox);

        let overdrive = process.supply_v - vth;
        let aspect = w_cm / l_cm;
        let (ion_total, gm_total) = if overdrive > 0.0 {
            (
                0.5 * process.mobility_cm2_vs * cox * aspect * overdrive * overdrive,
                process.mobility_cm2_vs * cox * aspect * overdrive,
            )
        } else {
            (0.0, 0.0)
        };
        let ion_per_um = ion_total / process.channel_width_um;
        let gm_per_um = gm_total / process.channel_width_um;

        let c_gate = cox * w_cm * l_cm;
        let ft_hz = if gm_total > 0.0 {
            gm_total / (2.0 * std::f64::consts::PI * c_gate)
        } else {
            0.0
        };

        let early_voltage = EARLY_VOLTAGE_PER_100NM_V * process.channel_length_nm / 100.0;
        let r0_ohm_per_um = if ion_per_um > 0.0 {
            early_voltage / ion_per_um
        } else {
            0.0
        };

        // Subthreshold leakage proxy: decades of swing available below Vth.
        let ioff_proxy = 10f64.powf(-vth * 1000.0 / ss_mvdec);

        // Short-channel control: charge-sharing length against L.
        let natural_length =
            ((material.permittivity / process.oxide_permittivity) * tox_cm * w_dep).sqrt();
        let dibl_mv_per_v = 1000.0 * (-l_cm / (2.0 * natural_length)).exp();

        // Thermodynamic stability from the formation energy alone.
        let stab_score = 1.0 / (1.0 + (1.5 * material.formation_energy_ev_atom).exp());

        Ok([
            (SS_MVDEC, ss_mvdec),
            (VTH_V, vth),
            (ION_A_PER_UM, ion_per_um),
            (GM_S_PER_UM, gm_per_um),
            (FT_HZ, ft_hz),
            (R0_OHM_PER_UM, r0_ohm_per_um),
            (DIBL_MV_PER_V, dibl_mv_per_v),
            (STAB_SCORE, stab_score),
            (IOFF_PROXY, ioff_proxy),
        ]
        .into_iter()
        .collect())
    }

    fn compute_percentiles(&self, metrics: &RawMetrics) -> Result<PercentileScores, ModelError> {
        let mut percentiles = PercentileScores::new();

        if let Some(ss) = metrics.get(SS_MVDEC) {
            percentiles.insert(SS_PERCENT, band_percentile(ss, 60.0, 120.0, false, false));
        }
        if let Some(vth) = metrics.get(VTH_V) {
            percentiles.insert(VTH_SCORE_PERCENT, vth_quality_percent(vth));
        }
        if let Some(ion) = metrics.get(ION_A_PER_UM) {
            percentiles.insert(ION_PERCENT, band_percentile(ion, 1.0e-6, 3.0e-3, true, true));
        }
        if let Some(ioff) = metrics.get(IOFF_PROXY) {
            percentiles.insert(IOFF_PERCENT, band_percentile(ioff, 1.0e-30, 1.0e-6, true, false));
        }
        if let Some(gm) = metrics.get(GM_S_PER_UM) {
            percentiles.insert(GM_PERCENT, band_percentile(gm, 1.0e-5, 5.0e-3, true, true));
        }
        if let Some(ft) = metrics.get(FT_HZ) {
            percentiles.insert(FT_PERCENT, band_percentile(ft, 1.0e9, 1.0e12, true, true));
        }
        if let Some(r0) = metrics.get(R0_OHM_PER_UM) {
            percentiles.insert(R0_PERCENT, band_percentile(r0, 1.0e2, 1.0e7, true, true));
        }
        if let Some(dibl) = metrics.get(DIBL_MV_PER_V) {
            percentiles.insert(DIBL_PERCENT, band_percentile(dibl, 0.0, 300.0, false, false));
        }
        if let Some(stab) = metrics.get(STAB_SCORE) {
            percentiles.insert(STAB_PERCENT, band_percentile(stab, 0.0, 1.0, false, true));
        }

        Ok(percentiles)
    }
}

/// Min-max position of `value` inside a fixed reference band, as a
/// percentile. Log-scaled bands cover quantities spanning decades; a
/// non-positive value on a log band collapses to the worst end.
fn band_percentile(value: f64, lo: f64, hi: f64, log: bool, higher_is_better: bool) -> f64 {
    let fraction = if log {
        if value <= 0.0 {
            0.0
        } else {
            let (lo, hi) = (lo.log10(), hi.log10());
            if (hi - lo).abs() < f64::EPSILON {
                0.5
            } else {
                ((value.log10() - lo) / (hi - lo)).clamp(0.0, 1.0)
            }
        }
    } else if (hi - lo).abs() < f64::EPSILON {
        0.5
    } else {
        ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
    };

    let oriented = if higher_is_better {
        fraction
    } else {
        1.0 - fraction
    };
    100.0 * oriented
}

fn vth_quality_percent(vth_v: f64) -> f64 {
    let distance = (vth_v - VTH_IDEAL_V).abs() / VTH_WINDOW_HALF_WIDTH_V;
    100.0 * (1.0 - distance).clamp(0.0, 1.0)
}
