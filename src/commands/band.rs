use crate::cli::BandScale;
use crate::scoring::{ComplianceBands, FortificationBand, NarrativeScale};
use anyhow::Result;

pub fn classify(value: f64, scale: BandScale) -> FortificationBand {
    match scale {
        BandScale::Percent => ComplianceBands::classify(value),
        BandScale::Twenty => NarrativeScale::TwentyPoint.classify(value),
        BandScale::Thirty => NarrativeScale::ThirtyPoint.classify(value),
    }
}

pub fn handle_band(value: f64, scale: BandScale) -> Result<()> {
    let band = classify(value, scale);
    tracing::debug!(value, ?scale, band = band.label(), "Classified value");
    println!("{}", band.label());
    Ok(())
}
