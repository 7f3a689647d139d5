//! Per-column humanizing formatters and color classification.
//!
//! Every column type implements [`ColumnFormat`]; the list view invokes the
//! two capabilities uniformly and never knows which kind of column it is
//! rendering.

#![allow(clippy::cast_precision_loss)]

use std::fmt;

use super::value::Value;

/// Color classification of a rendered cell, from calm to alarming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColorClass {
    #[default]
    Neutral,
    Low,
    Moderate,
    High,
    Extreme,
}

impl ColorClass {
    /// All classes in ascending severity.
    pub const ALL: [Self; 5] = [
        Self::Neutral,
        Self::Low,
        Self::Moderate,
        Self::High,
        Self::Extreme,
    ];

    /// Numeric level, 0 for [`ColorClass::Neutral`] up to 4.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Neutral => 0,
            Self::Low => 1,
            Self::Moderate => 2,
            Self::High => 3,
            Self::Extreme => 4,
        }
    }
}

/// Capability set a column type provides to the list view.
pub trait ColumnFormat: fmt::Debug + Send + Sync {
    /// Human-readable rendering of a raw value.
    fn format(&self, value: &Value) -> String;

    /// Color class for a raw value.
    fn classify(&self, value: &Value) -> ColorClass;
}

/// Ascending thresholds mapping a numeric value onto [`ColorClass`].
///
/// A value at or above `bounds[i]` reaches class `i + 1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    bounds: [f64; 4],
}

impl Thresholds {
    #[must_use]
    pub const fn new(low: f64, moderate: f64, high: f64, extreme: f64) -> Self {
        Self {
            bounds: [low, moderate, high, extreme],
        }
    }

    /// Thresholds that never leave [`ColorClass::Neutral`].
    #[must_use]
    pub const fn none() -> Self {
        Self::new(
            f64::INFINITY,
            f64::INFINITY,
            f64::INFINITY,
            f64::INFINITY,
        )
    }

    #[must_use]
    pub fn classify(&self, value: &Value) -> ColorClass {
        let Some(v) = value.as_f64() else {
            return ColorClass::Neutral;
        };
        self.bounds
            .iter()
            .zip(&ColorClass::ALL[1..])
            .rev()
            .find(|(bound, _)| v >= **bound)
            .map_or(ColorClass::Neutral, |(_, class)| *class)
    }
}

/// Free text (database names, query text).
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormat;

impl ColumnFormat for TextFormat {
    fn format(&self, value: &Value) -> String {
        // Query text arrives with embedded newlines and runs of whitespace.
        value.to_string().split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn classify(&self, _value: &Value) -> ColorClass {
        ColorClass::Neutral
    }
}

/// Counts and rates rendered with K/M/G/T suffixes.
#[derive(Debug, Clone, Copy)]
pub struct CountFormat {
    pub thresholds: Thresholds,
}

impl ColumnFormat for CountFormat {
    fn format(&self, value: &Value) -> String {
        value
            .as_f64()
            .map_or_else(|| value.to_string(), human_count)
    }

    fn classify(&self, value: &Value) -> ColorClass {
        self.thresholds.classify(value)
    }
}

/// Durations given in milliseconds.
#[derive(Debug, Clone, Copy)]
pub struct MillisFormat {
    pub thresholds: Thresholds,
}

impl ColumnFormat for MillisFormat {
    fn format(&self, value: &Value) -> String {
        value
            .as_f64()
            .map_or_else(|| value.to_string(), human_millis)
    }

    fn classify(&self, value: &Value) -> ColorClass {
        self.thresholds.classify(value)
    }
}

/// Byte quantities.
#[derive(Debug, Clone, Copy)]
pub struct BytesFormat {
    pub thresholds: Thresholds,
}

impl ColumnFormat for BytesFormat {
    fn format(&self, value: &Value) -> String {
        value
            .as_f64()
            .map_or_else(|| value.to_string(), human_bytes)
    }

    fn classify(&self, value: &Value) -> ColorClass {
        self.thresholds.classify(value)
    }
}

// ──────────────────── humanizers ────────────────────

/// Human-readable count: `999`, `1.2K`, `3.4M`.
#[must_use]
pub fn human_count(value: f64) -> String {
    const UNITS: &[&str] = &["K", "M", "G", "T"];
    if value.abs() < 1000.0 {
        return if value.fract() == 0.0 {
            format!("{value:.0}")
        } else {
            format!("{value:.1}")
        };
    }
    let mut scaled = value;
    for unit in UNITS {
        scaled /= 1000.0;
        if scaled.abs() < 1000.0 {
            return format!("{scaled:.1}{unit}");
        }
    }
    format!("{scaled:.1}T")
}

/// Human-readable duration from milliseconds: `250us`, `12.5ms`, `3.20s`, `2m05s`.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn human_millis(ms: f64) -> String {
    if ms < 1.0 {
        return format!("{:.0}us", ms * 1000.0);
    }
    if ms < 1000.0 {
        return format!("{ms:.1}ms");
    }
    let secs = ms / 1000.0;
    if secs < 60.0 {
        return format!("{secs:.2}s");
    }
    let whole = secs as u64;
    format!("{}m{:02}s", whole / 60, whole % 60)
}

/// Human-readable byte size: `512 B`, `1.00 KB`, `466 GB`.
#[must_use]
pub fn human_bytes(bytes: f64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB", "PB"];
    let mut size = bytes;
    for unit in UNITS {
        if size.abs() < 1024.0 {
            return if size.abs() >= 100.0 {
                format!("{size:.0} {unit}")
            } else if size.abs() >= 10.0 {
                format!("{size:.1} {unit}")
            } else {
                format!("{size:.2} {unit}")
            };
        }
        size /= 1024.0;
    }
    format!("{size:.1} EB")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_count_formatting() {
        assert_eq!(human_count(0.0), "0");
        assert_eq!(human_count(999.0), "999");
        assert_eq!(human_count(12.34), "12.3");
        assert_eq!(human_count(1_200.0), "1.2K");
        assert_eq!(human_count(3_400_000.0), "3.4M");
        assert_eq!(human_count(5_000_000_000.0), "5.0G");
    }

    #[test]
    fn human_millis_formatting() {
        assert_eq!(human_millis(0.25), "250us");
        assert_eq!(human_millis(12.5), "12.5ms");
        assert_eq!(human_millis(3_200.0), "3.20s");
        assert_eq!(human_millis(125_000.0), "2m05s");
    }

    #[test]
    fn human_bytes_formatting() {
        assert_eq!(human_bytes(0.0), "0.00 B");
        assert_eq!(human_bytes(512.0), "512 B");
        assert_eq!(human_bytes(1024.0), "1.00 KB");
        assert_eq!(human_bytes(1_048_576.0), "1.00 MB");
        assert_eq!(human_bytes(500_000_000_000.0), "466 GB");
    }

    #[test]
    fn thresholds_classify_by_highest_reached_bound() {
        let t = Thresholds::new(10.0, 100.0, 1_000.0, 10_000.0);
        assert_eq!(t.classify(&Value::Int(1)), ColorClass::Neutral);
        assert_eq!(t.classify(&Value::Int(10)), ColorClass::Low);
        assert_eq!(t.classify(&Value::Float(500.0)), ColorClass::Moderate);
        assert_eq!(t.classify(&Value::Int(1_000)), ColorClass::High);
        assert_eq!(t.classify(&Value::Int(1_000_000)), ColorClass::Extreme);
        assert_eq!(t.classify(&Value::from("n/a")), ColorClass::Neutral);
    }

    #[test]
    fn no_thresholds_stay_neutral() {
        assert_eq!(
            Thresholds::none().classify(&Value::Float(f64::MAX)),
            ColorClass::Neutral
        );
    }

    #[test]
    fn text_format_collapses_whitespace() {
        let q = Value::from("SELECT *\n  FROM t\tWHERE id = ?");
        assert_eq!(TextFormat.format(&q), "SELECT * FROM t WHERE id = ?");
    }

    #[test]
    fn numeric_formats_fall_back_to_raw_text() {
        let f = CountFormat {
            thresholds: Thresholds::none(),
        };
        assert_eq!(f.format(&Value::from("-")), "-");
    }

    #[test]
    fn color_levels_are_ordered() {
        let levels: Vec<u8> = ColorClass::ALL.iter().map(|c| c.level()).collect();
        assert_eq!(levels, vec![0, 1, 2, 3, 4]);
    }
}
