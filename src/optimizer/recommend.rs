//! Advisory text derived from the ranked window list.

use super::types::{Confidence, OptimalWindow, HIGH_CONFIDENCE_HOURS};

pub const NO_DATA_MESSAGE: &str = "No safety check data available for the selected period";
pub const NO_WINDOWS_MESSAGE: &str =
    "No optimal maintenance windows found. Consider increasing safety check frequency.";
pub const LIMITED_WINDOWS_MESSAGE: &str =
    "Limited maintenance windows available. Plan maintenance activities carefully.";
pub const STABILITY_MESSAGE: &str =
    "Clusters show good stability with long safe windows available.";

pub fn generate_recommendations(windows: &[OptimalWindow]) -> Vec<String> {
    let mut recommendations = Vec::new();

    match windows.len() {
        0 => recommendations.push(NO_WINDOWS_MESSAGE.to_string()),
        1 | 2 => recommendations.push(LIMITED_WINDOWS_MESSAGE.to_string()),
        n => {
            recommendations.push(format!("Found {} optimal maintenance windows.", n));
            let high = windows
                .iter()
                .filter(|w| w.confidence == Confidence::High)
                .count();
            if high > 0 {
                recommendations.push(format!(
                    "{} high-confidence windows available for critical maintenance.",
                    high
                ));
            }
        }
    }

    if !windows.is_empty() {
        let mean = windows.iter().map(|w| w.duration_hours).sum::<f64>() / windows.len() as f64;
        if mean > HIGH_CONFIDENCE_HOURS {
            recommendations.push(STABILITY_MESSAGE.to_string());
        }
    }

    recommendations
}
