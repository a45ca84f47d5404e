use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, fmt};

/// Kind of report, taken from the optional leading `METAR`/`SPECI` token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    /// Hourly (scheduled) report.
    #[serde(rename = "METAR")]
    Metar,
    /// Special (unscheduled) report.
    #[serde(rename = "SPECI")]
    Speci,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Metar => "METAR",
            ReportType::Speci => "SPECI",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportType::Metar => "Hourly (scheduled) report",
            ReportType::Speci => "Special (unscheduled) report",
        }
    }

    pub const fn all() -> &'static [ReportType] {
        &[ReportType::Metar, ReportType::Speci]
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReportType {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ReportType::all()
            .iter()
            .copied()
            .find(|kind| kind.as_str() == value)
            .ok_or(())
    }
}

/// Report modifier following the date/time group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportModifier {
    #[serde(rename = "AUTO")]
    Auto,
    #[serde(rename = "COR")]
    Cor,
}

impl ReportModifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportModifier::Auto => "AUTO",
            ReportModifier::Cor => "COR",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ReportModifier::Auto => "Fully automated report",
            ReportModifier::Cor => "Correction of previous report",
        }
    }

    pub const fn all() -> &'static [ReportModifier] {
        &[ReportModifier::Auto, ReportModifier::Cor]
    }
}

impl fmt::Display for ReportModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ReportModifier {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        ReportModifier::all()
            .iter()
            .copied()
            .find(|modifier| modifier.as_str() == value)
            .ok_or(())
    }
}

/// Station type flag found in the remarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StationType {
    /// Automated station with a precipitation discriminator.
    #[serde(rename = "AO2")]
    Ao2,
}

impl StationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StationType::Ao2 => "AO2",
        }
    }
}

impl fmt::Display for StationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded METAR/SPECI report.
///
/// Values are kept as their original (uppercased) tokens; no unit
/// interpretation takes place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    pub report_type: Option<ReportType>,
    pub station_id: String,
    /// Raw `DDHHMMZ` token.
    pub date_time: String,
    pub report_modifier: Option<ReportModifier>,
    /// Wind group, with the variable direction group appended when present.
    pub wind: String,
    pub visibility: String,
    pub runway_visual_range: Option<String>,
    pub weather_phenomena: Option<String>,
    /// Sky layers in report order. Empty when none were recognized.
    pub sky_condition: Vec<String>,
    pub temperature: String,
    pub altimeter: String,
    pub remarks: Option<Remarks>,
}

/// Sub-fields decoded from the free text following `RMK`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Remarks {
    /// The remarks text, uppercased and trimmed.
    pub text: String,
    pub type_of_station: Option<StationType>,
    pub peak_wind: Option<String>,
    pub wind_shift: Option<String>,
    pub tower_visibility: Option<String>,
    pub surface_visibility: Option<String>,
    pub variable_visibility: Option<String>,
    pub alternate_visibility: Option<String>,
    pub lightning: Option<String>,
}
