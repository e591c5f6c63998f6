use crate::model::AnalyticDeviceModel;
use clap::Args;
use mosfet_screener::error::AppError;
use mosfet_screener::screening::{
    ranking, BaselineSet, CandidateProperties, MaterialCsvImporter, ScreeningConditions,
    ScreeningResult, ScreeningService,
};
use serde::Serialize;
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct ScreenArgs {
    /// Candidate band gap (eV)
    #[arg(long)]
    pub(crate) eg_ev: Option<f64>,
    /// Candidate relative permittivity
    #[arg(long)]
    pub(crate) eps_r: Option<f64>,
    /// Candidate formation energy per atom (eV)
    #[arg(long)]
    pub(crate) ef_ev_atom: Option<f64>,
    /// Gate oxide thickness override (nm)
    #[arg(long)]
    pub(crate) tox_nm: Option<f64>,
    /// Gate oxide permittivity override
    #[arg(long)]
    pub(crate) eps_ox: Option<f64>,
    /// Channel doping override (cm^-3)
    #[arg(long)]
    pub(crate) na_cm3: Option<f64>,
    /// Channel length override (nm)
    #[arg(long)]
    pub(crate) l_nm: Option<f64>,
    /// Channel width override (um)
    #[arg(long)]
    pub(crate) w_um: Option<f64>,
    /// Carrier mobility override (cm^2/Vs)
    #[arg(long)]
    pub(crate) mu_cm2_vs: Option<f64>,
    /// Operating temperature (K)
    #[arg(long)]
    pub(crate) temp: Option<f64>,
    /// Supply voltage (V)
    #[arg(long)]
    pub(crate) vdd: Option<f64>,
    /// Batch-screen every row of a candidate-materials CSV export
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Emit the raw JSON envelope instead of the text report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
struct ScreenReport {
    #[serde(flatten)]
    result: ScreeningResult,
    ranking: ranking::RankingView,
}

pub(crate) fn run_screen(args: ScreenArgs) -> Result<(), AppError> {
    let service = ScreeningService::new(Arc::new(AnalyticDeviceModel), BaselineSet::standard());
    let conditions = ScreeningConditions {
        temp: args.temp,
        vdd: args.vdd,
    };

    match &args.csv {
        Some(path) => run_batch(&service, path, &conditions),
        None => run_single(&service, &args, &conditions),
    }
}

fn run_single(
    service: &ScreeningService<AnalyticDeviceModel>,
    args: &ScreenArgs,
    conditions: &ScreeningConditions,
) -> Result<(), AppError> {
    let props = CandidateProperties {
        band_gap_ev: args.eg_ev,
        permittivity: args.eps_r,
        formation_energy_ev_atom: args.ef_ev_atom,
        oxide_thickness_nm: args.tox_nm,
        oxide_permittivity: args.eps_ox,
        doping_cm3: args.na_cm3,
        channel_length_nm: args.l_nm,
        channel_width_um: args.w_um,
        mobility_cm2_vs: args.mu_cm2_vs,
        ..CandidateProperties::default()
    };

    let result = service.screen(&props, conditions)?;

    if args.json {
        let ranking = ranking::assemble(&result.percentiles, &result.baseline_percentiles);
        let report = ScreenReport { result, ranking };
        let rendered = serde_json::to_string_pretty(&report)
            .map_err(|err| AppError::Io(err.into()))?;
        println!("{rendered}");
        return Ok(());
    }

    render_report(&result);
    Ok(())
}

fn run_batch(
    service: &ScreeningService<AnalyticDeviceModel>,
    path: &PathBuf,
    conditions: &ScreeningConditions,
) -> Result<(), AppError> {
    let file = File::open(path)?;
    let candidates = MaterialCsvImporter::from_reader(file)
        .map_err(|err| AppError::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, err)))?;

    println!("{:<16} {:>8}  {}", "material", "score", "decision");
    for candidate in candidates {
        match service.screen(&candidate.properties, conditions) {
            Ok(result) => println!(
                "{:<16} {:>8.1}  {}",
                candidate.name,
                result.score,
                result.decision.label()
            ),
            Err(err) => println!("{:<16} {:>8}  skipped: {err}", candidate.name, "-"),
        }
    }
    Ok(())
}

fn render_report(result: &ScreeningResult) {
    println!("Material screening report");
    println!("  decision      : {}", result.decision.label());
    println!("  score         : {:.1}", result.score);
    println!("  model version : {}", result.model_version);

    println!("  metrics:");
    for (key, value) in result.metrics.iter() {
        println!("    {key:<16} {value:>12.4e}");
    }

    let view = ranking::assemble(&result.percentiles, &result.baseline_percentiles);
    match &view.reference_key {
        Some(reference) => println!("  ranking vs baselines (legend: {reference}):"),
        None => println!("  ranking vs baselines:"),
    }
    for entry in &view.entries {
        println!("    {:<12} {:>5.1}%", entry.label, entry.value);
    }

    if !view.baseline_percentiles.is_empty() {
        let names: Vec<&str> = view
            .baseline_percentiles
            .keys()
            .map(String::as_str)
            .collect();
        println!("  baselines     : {}", names.join(", "));
    }
}
