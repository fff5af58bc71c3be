//! Meter-value sampling (spec.md §4.5 "Meter-value sampling uses a
//! per-connector timer ... builds a MeterValues / TransactionEvent(Updated)
//! request containing the measurands selected").

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MeterSample {
    pub connector_id: u32,
    pub timestamp: DateTime<Utc>,
    pub energy_register_wh: u64,
    pub measurands: Vec<(String, String)>,
}

/// Produces one sample tick for `connector_id`. The simulator has no real
/// electrical measurement (spec.md §1 Non-goals), so non-energy measurands
/// are synthesized as plausible constants rather than modelled physically.
pub fn sample(connector_id: u32, energy_register_wh: u64, measurands: &[String]) -> MeterSample {
    let values = measurands
        .iter()
        .map(|name| (name.clone(), synthesize(name, energy_register_wh)))
        .collect();
    MeterSample {
        connector_id,
        timestamp: Utc::now(),
        energy_register_wh,
        measurands: values,
    }
}

fn synthesize(measurand: &str, energy_register_wh: u64) -> String {
    match measurand {
        "Energy.Active.Import.Register" => energy_register_wh.to_string(),
        "Power.Active.Import" => "7200".to_string(),
        "Current.Import" => "32".to_string(),
        "Voltage" => "230".to_string(),
        "SoC" => "50".to_string(),
        _ => "0".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn energy_measurand_reflects_the_register() {
        let sample = sample(1, 4200, &["Energy.Active.Import.Register".to_string()]);
        assert_eq!(sample.measurands[0].1, "4200");
    }

    #[test]
    fn unknown_measurand_defaults_to_zero() {
        let sample = sample(1, 4200, &["Frequency".to_string()]);
        assert_eq!(sample.measurands[0].1, "0");
    }
}
