//! Helpers shared across CLI commands.

use binscan::bins::{Bin, Severity, SeverityThresholds};
use binscan::coord::Coordinate;
use console::{style, StyledObject};

use crate::error::CliError;

/// Build a coordinate from optional `--lat`/`--lng` flags.
///
/// Both or neither must be given.
pub fn location_from_args(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Coordinate>, CliError> {
    match (lat, lng) {
        (Some(lat), Some(lng)) => Coordinate::new(lat, lng)
            .map(Some)
            .map_err(|e| CliError::InvalidArgument(e.to_string())),
        (None, None) => Ok(None),
        _ => Err(CliError::InvalidArgument(
            "--lat and --lng must be given together".to_string(),
        )),
    }
}

/// Colour a severity label.
pub fn styled_severity(severity: Severity) -> StyledObject<&'static str> {
    let label = severity.as_str();
    match severity {
        Severity::Critical => style(label).red().bold(),
        Severity::Warning => style(label).yellow(),
        Severity::Normal => style(label).green(),
    }
}

/// `current/max kg (pct%)`.
pub fn format_fill(bin: &Bin) -> String {
    format!(
        "{:.1}/{:.1} kg ({:.0}%)",
        bin.current_capacity,
        bin.max_capacity,
        bin.fill_percent()
    )
}

/// One table row: id, area, status, fill and severity.
pub fn bin_row(bin: &Bin, thresholds: &SeverityThresholds) -> String {
    let condition = bin.condition(thresholds);
    format!(
        "{:<14} {:<24} {:<9} {:<24} {}",
        bin.bin_id,
        truncate(bin.display_name(), 24),
        condition.status.as_str(),
        format_fill(bin),
        styled_severity(condition.severity)
    )
}

/// Five-star rating bar.
pub fn stars(rating: i64) -> String {
    let filled = rating.clamp(0, 5) as usize;
    format!("{}{}", "★".repeat(filled), "☆".repeat(5 - filled))
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_requires_both_flags() {
        assert!(location_from_args(Some(28.7), None).is_err());
        assert!(location_from_args(None, None).unwrap().is_none());
        assert!(location_from_args(Some(28.7), Some(77.2)).unwrap().is_some());
        assert!(location_from_args(Some(95.0), Some(77.2)).is_err());
    }

    #[test]
    fn test_stars() {
        assert_eq!(stars(3), "★★★☆☆");
        assert_eq!(stars(0), "☆☆☆☆☆");
        assert_eq!(stars(9), "★★★★★");
    }

    #[test]
    fn test_format_fill() {
        let bin = Bin::new("B", Coordinate::new(0.0, 0.0).unwrap()).with_capacity(45.0, 60.0);
        assert_eq!(format_fill(&bin), "45.0/60.0 kg (75%)");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 24), "short");
        assert_eq!(truncate("abcdefgh", 5).chars().count(), 5);
    }
}
