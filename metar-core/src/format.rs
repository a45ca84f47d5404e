use anyhow::{Context, Result};
use serde::Serialize;
use std::{convert::TryFrom, fmt::Write};

use crate::model::{Observation, Remarks};

/// How a decoded record is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    /// Canonical single-line METAR rendering.
    #[default]
    Text,
    /// One field per line.
    Detail,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Detail => "detail",
            OutputFormat::Json => "json",
        }
    }

    pub const fn all() -> &'static [OutputFormat] {
        &[OutputFormat::Text, OutputFormat::Detail, OutputFormat::Json]
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for OutputFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "text" => Ok(OutputFormat::Text),
            "detail" => Ok(OutputFormat::Detail),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow::anyhow!(
                "Unknown output format '{value}'. Supported formats: text, detail, json."
            )),
        }
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize record to JSON")
}

fn remarks_detail(out: &mut String, remarks: &Remarks, indent: &str) {
    let fields = [
        ("type_of_station", remarks.type_of_station.map(|t| t.as_str())),
        ("peak_wind", remarks.peak_wind.as_deref()),
        ("wind_shift", remarks.wind_shift.as_deref()),
        ("tower_visibility", remarks.tower_visibility.as_deref()),
        ("surface_visibility", remarks.surface_visibility.as_deref()),
        ("variable_visibility", remarks.variable_visibility.as_deref()),
        ("alternate_visibility", remarks.alternate_visibility.as_deref()),
        ("lightning", remarks.lightning.as_deref()),
    ];

    for (name, value) in fields {
        let _ = writeln!(out, "{indent}{name}: {}", or_dash(value));
    }
}

/// Render an observation in the requested format.
pub fn render_observation(observation: &Observation, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(observation.to_string()),
        OutputFormat::Json => to_json(observation),
        OutputFormat::Detail => {
            let sky = observation.sky_condition.join(" ");
            let report_type = observation
                .report_type
                .map(|t| format!("{t} ({})", t.description()));
            let report_modifier = observation
                .report_modifier
                .map(|m| format!("{m} ({})", m.description()));
            let fields = [
                ("report_type", report_type.as_deref()),
                ("station_id", Some(observation.station_id.as_str())),
                ("date_time", Some(observation.date_time.as_str())),
                ("report_modifier", report_modifier.as_deref()),
                ("wind", Some(observation.wind.as_str())),
                ("visibility", Some(observation.visibility.as_str())),
                ("runway_visual_range", observation.runway_visual_range.as_deref()),
                ("weather_phenomena", observation.weather_phenomena.as_deref()),
                ("sky_condition", (!sky.is_empty()).then_some(sky.as_str())),
                ("temperature", Some(observation.temperature.as_str())),
                ("altimeter", Some(observation.altimeter.as_str())),
            ];

            let mut out = String::new();
            for (name, value) in fields {
                let _ = writeln!(out, "{name}: {}", or_dash(value));
            }
            match &observation.remarks {
                Some(remarks) => {
                    let _ = writeln!(out, "remarks: {remarks}");
                    remarks_detail(&mut out, remarks, "  ");
                }
                None => out.push_str("remarks: -\n"),
            }

            Ok(out.trim_end().to_string())
        }
    }
}

/// Render a standalone remarks record in the requested format.
pub fn render_remarks(remarks: &Remarks, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(remarks.to_string()),
        OutputFormat::Json => to_json(remarks),
        OutputFormat::Detail => {
            let mut out = String::new();
            remarks_detail(&mut out, remarks, "");
            Ok(out.trim_end().to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{decode_observation, decode_remarks};

    const REPORT: &str = "METAR KJFK 201251Z 05008KT 10SM CLR 22/18 A3012 RMK AO2 PK WND 28045/1215";

    #[test]
    fn output_format_as_str_roundtrip() {
        for format in OutputFormat::all() {
            let parsed = OutputFormat::try_from(format.as_str()).expect("roundtrip should succeed");
            assert_eq!(*format, parsed);
        }
    }

    #[test]
    fn unknown_output_format_error() {
        let err = OutputFormat::try_from("yaml").unwrap_err();
        assert!(err.to_string().contains("Unknown output format"));
    }

    #[test]
    fn text_is_canonical_rendering() {
        let obs = decode_observation(REPORT).unwrap();
        assert_eq!(render_observation(&obs, OutputFormat::Text).unwrap(), REPORT);
    }

    #[test]
    fn detail_marks_absent_fields() {
        let obs = decode_observation(REPORT).unwrap();
        let out = render_observation(&obs, OutputFormat::Detail).unwrap();

        assert!(out.starts_with("report_type: METAR (Hourly (scheduled) report)\nstation_id: KJFK\n"));
        assert!(out.contains("report_modifier: -\n"));
        assert!(out.contains("sky_condition: CLR\n"));
        assert!(out.contains("remarks: AO2 PK WND 28045/1215\n"));
        assert!(out.contains("  peak_wind: 28045/1215\n"));
        assert!(out.ends_with("  lightning: -"));
    }

    #[test]
    fn detail_describes_report_type_and_modifier() {
        let obs = decode_observation("SPECI KJFK 201251Z COR 05008KT 10SM CLR 22/18 A3012").unwrap();
        let out = render_observation(&obs, OutputFormat::Detail).unwrap();

        assert!(out.contains("report_type: SPECI (Special (unscheduled) report)\n"));
        assert!(out.contains("report_modifier: COR (Correction of previous report)\n"));
        assert!(out.ends_with("remarks: -"));
    }

    #[test]
    fn json_round_trips_through_serde() {
        let obs = decode_observation(REPORT).unwrap();
        let json = render_observation(&obs, OutputFormat::Json).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["station_id"], "KJFK");
        assert_eq!(value["report_type"], "METAR");
        assert_eq!(value["report_modifier"], serde_json::Value::Null);
        assert_eq!(value["remarks"]["type_of_station"], "AO2");

        let back: Observation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, obs);
    }

    #[test]
    fn remarks_detail_lists_every_field() {
        let remarks = decode_remarks("AO2 FRQ LTGICCG OHD");
        let out = render_remarks(&remarks, OutputFormat::Detail).unwrap();

        assert_eq!(out.lines().count(), 8);
        assert!(out.starts_with("type_of_station: AO2\n"));
        assert!(out.ends_with("lightning: FRQ LTGICCG OHD"));
    }
}
