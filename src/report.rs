//! Plain-text rendering of estimates and rejections

use crate::config::{AppInfo, MapConfig};
use crate::error::PredictorError;
use crate::types::estimate::PriceEstimate;

/// Dollar amount with thousands separators and two decimals, e.g. `$450,000.50`.
///
/// The sign follows the input, so `-0.001` renders as `$-0.00`.
pub fn format_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return format!("${}", amount.to_string().to_lowercase());
    }

    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() { "-" } else { "" };

    format!("${sign}{grouped}.{cents}")
}

/// Title block shown once at start-up
pub fn render_banner(app: &AppInfo) -> String {
    let title = format!("{} v{}", app.name, app.version);
    let rule = "=".repeat(title.len().max(app.description.len()));
    format!("{rule}\n{title}\n{}\n{rule}\n", app.description)
}

/// Estimate box, market insights and map reference
pub fn render_estimate(estimate: &PriceEstimate, map: &MapConfig) -> String {
    let record = &estimate.record;
    let coordinates = &estimate.coordinates;

    let lines = [
        "Estimated Resale Price".to_string(),
        format!("  {}", format_currency(estimate.price)),
        "  Based on current market trends and similar properties".to_string(),
        String::new(),
        "Market Insights".to_string(),
        format!("  - Town: {}", record.town),
        format!("  - Flat Type: {}", record.flat_type),
        format!("  - Floor Area: {} sqm", record.floor_area_sqm),
        format!("  - Lease Commenced: {}", record.lease_commence_date),
        format!(
            "  - Remaining Lease: {} years (as of {})",
            estimate.remaining_lease, estimate.reference_year
        ),
        String::new(),
        "Transaction Map".to_string(),
        format!("  {} ({}px)", map.url, map.height),
        format!(
            "  Centre: {:.4}, {:.4} (zoom {})",
            coordinates.latitude, coordinates.longitude, map.default_zoom
        ),
    ];

    lines.iter().map(|line| format!("{line}\n")).collect()
}

/// Readable text for a failed submission
pub fn render_rejection(error: &PredictorError) -> String {
    match error {
        PredictorError::Input(input) => {
            let mut out = String::from("Please correct the property details:\n");
            for message in input.messages() {
                out.push_str(&format!("  - {message}\n"));
            }
            out
        }
        PredictorError::Resource(resource) => format!("Prediction error: {resource}\n"),
    }
}

/// Data source and disclaimer
pub fn render_footer(app: &AppInfo) -> String {
    format!(
        "Data Source: Housing & Development Board (HDB) | Last Updated: {}\n\
         Disclaimer: Predictions are estimates based on historical data and may not reflect actual transaction prices.\n",
        app.last_updated
    )
}
