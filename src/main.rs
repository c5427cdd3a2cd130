use anyhow::{Context, Result};
use clap::Parser;
use region_spectrum::audio::load_waveform;
use region_spectrum::model::{AttributeValue, Region};
use region_spectrum::spectrum::{SpectralFrames, SpectralSlice};
use region_spectrum::{AnalysisParameters, FeatureExtractor, SpectrumFeatureExtractor};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "region-spectrum")]
#[command(about = "Align spectrogram slices to time regions of an audio file", long_about = None)]
struct Args {
    /// Audio file to analyse
    #[arg(short = 'a', long)]
    audio: String,

    /// JSON array of regions: [{"start": 0.2, "end": 0.4}, ...]
    #[arg(short = 'r', long)]
    regions: String,

    /// Attribute name the spectrum is stored under
    #[arg(short = 'n', long, default_value = "spectrum")]
    feature_name: String,

    /// Seconds between frames
    #[arg(long, default_value = "0.01")]
    frame_step: f64,

    /// Hamming window duration in seconds
    #[arg(long, default_value = "0.02")]
    window: f64,

    /// Write the JSON report here instead of stdout
    #[arg(short = 'o', long)]
    output: Option<String>,

    /// Include every frame of every slice in the report
    #[arg(long)]
    full: bool,

    /// Verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Per-region entry of the JSON report
#[derive(Debug, Serialize)]
struct RegionReport<'a> {
    start: f64,
    end: f64,
    frames: usize,
    bins: usize,
    mean_energy: f64,
    mean_tilt: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    slice: Option<&'a SpectralSlice>,
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// Expand a leading ~ to the home directory
fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).as_ref())
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    // Expand ~ in paths
    let audio_path = expand_path(&args.audio);
    let regions_path = expand_path(&args.regions);
    let output_path = args.output.as_deref().map(expand_path);

    log::info!("Loading audio from {:?}", audio_path);
    let waveform = load_waveform(&audio_path)?;
    log::info!(
        "Audio loaded: {:.2}s at {}Hz",
        waveform.duration(),
        waveform.sample_rate()
    );

    let regions_json = std::fs::read_to_string(&regions_path)
        .with_context(|| format!("Failed to read regions: {:?}", regions_path))?;
    let mut regions: Vec<Region> = serde_json::from_str(&regions_json)
        .with_context(|| format!("Failed to parse regions: {:?}", regions_path))?;
    log::info!("{} regions loaded", regions.len());

    let params = AnalysisParameters::new(args.frame_step, args.window);
    let extractor =
        SpectrumFeatureExtractor::new(&waveform, args.feature_name.clone()).with_parameters(params);
    extractor.extract_features(&mut regions)?;

    let reports: Vec<RegionReport> = regions
        .iter()
        .filter_map(|region| {
            let slice = region
                .attribute(&args.feature_name)
                .and_then(AttributeValue::as_spectrum)?;
            Some(RegionReport {
                start: region.start(),
                end: region.end(),
                frames: slice.num_frames(),
                bins: slice.num_bins(),
                mean_energy: mean(&slice.frame_energy()),
                mean_tilt: mean(&slice.spectral_tilt()),
                slice: args.full.then_some(slice),
            })
        })
        .collect();

    let report = serde_json::to_string_pretty(&reports).context("Failed to serialize report")?;
    match &output_path {
        Some(path) => {
            std::fs::write(path, report)
                .with_context(|| format!("Failed to write report: {:?}", path))?;
            log::info!("Report written to {:?}", path);
        }
        None => println!("{}", report),
    }

    Ok(())
}
