//! Decoding of a full METAR/SPECI report.
//!
//! The body is consumed from the front (report type through runway visual
//! range) and then from the back (altimeter, temperature, sky condition).
//! Whatever is left in the middle is the weather phenomena group.

use log::{debug, trace};
use std::{convert::TryFrom, fmt, str::FromStr};

use crate::{
    error::DecodeError,
    model::{Observation, ReportModifier, ReportType},
    remarks::decode_remarks,
    token::{self, MIN_TOKENS, Tokens},
};

/// Separates the report body from the remarks trailer.
pub const REMARKS_MARKER: &str = " RMK ";

/// Split trimmed, normalized text into body and optional remarks trailer.
///
/// Text after a second marker occurrence is dropped. A blank trailer,
/// including a bare `RMK` ending the line, counts as absent.
fn split_remarks(text: &str) -> (&str, Option<&str>) {
    match text.split_once(REMARKS_MARKER) {
        Some((body, rest)) => {
            let remarks = match rest.split_once(REMARKS_MARKER) {
                Some((remarks, dropped)) => {
                    debug!("dropping text after second remarks marker: '{dropped}'");
                    remarks
                }
                None => rest,
            };
            let remarks = remarks.trim();
            (body, (!remarks.is_empty()).then_some(remarks))
        }
        None => match text.strip_suffix(REMARKS_MARKER.trim_end()) {
            Some(body) => (body, None),
            None => (text, None),
        },
    }
}

/// Decode a single METAR/SPECI report.
///
/// Decoding is all-or-nothing: the first malformed mandatory field aborts
/// with a [`DecodeError`].
pub fn decode_observation(text: &str) -> Result<Observation, DecodeError> {
    let normalized = text.trim().to_uppercase();
    let (body, remarks_text) = split_remarks(&normalized);

    let mut tokens = Tokens::new(body);
    let total = tokens.len();
    if total < MIN_TOKENS {
        return Err(DecodeError::TooFewTokens {
            found: total,
            required: MIN_TOKENS,
        });
    }
    trace!("decoding {total} body tokens");

    let exhausted = || DecodeError::TooFewTokens {
        found: total,
        required: MIN_TOKENS,
    };

    // Front of the report.
    let report_type = tokens
        .pop_front_if(|t| ReportType::try_from(t).is_ok())
        .and_then(|t| ReportType::try_from(t).ok());

    let station_id = tokens.pop_front().ok_or_else(exhausted)?;
    if !token::is_station_token(station_id) {
        return Err(DecodeError::InvalidStation {
            token: station_id.to_string(),
            expected: "the 4 character ICAO location id",
        });
    }

    let date_time = tokens.pop_front().ok_or_else(exhausted)?;
    if !token::is_date_time_token(date_time) {
        return Err(DecodeError::InvalidDateTime {
            token: date_time.to_string(),
            expected: "7 characters ending in 'Z'",
        });
    }

    let report_modifier = tokens
        .pop_front_if(|t| ReportModifier::try_from(t).is_ok())
        .and_then(|t| ReportModifier::try_from(t).ok());

    let wind_group = tokens.pop_front().ok_or_else(exhausted)?;
    if !token::is_wind_token(wind_group) {
        return Err(DecodeError::InvalidWind {
            token: wind_group.to_string(),
            expected: "at least 7 characters ending in 'KT'",
        });
    }
    let wind = match tokens.pop_front_if(token::is_variable_wind_token) {
        Some(variable) => format!("{wind_group} {variable}"),
        None => wind_group.to_string(),
    };

    let visibility = tokens.pop_front().ok_or_else(exhausted)?;
    if !token::is_visibility_token(visibility) {
        return Err(DecodeError::InvalidVisibility {
            token: visibility.to_string(),
            expected: "a value ending in 'SM'",
        });
    }

    let runway_visual_range = tokens
        .pop_front_if(token::is_runway_visual_range_token)
        .map(str::to_string);

    // Back of the report.
    let altimeter = tokens.pop_back().ok_or_else(exhausted)?;
    if !token::is_altimeter_token(altimeter) {
        return Err(DecodeError::InvalidAltimeter {
            token: altimeter.to_string(),
            expected: "5 characters starting with 'A'",
        });
    }

    let temperature = tokens.pop_back().ok_or_else(exhausted)?;
    if !token::is_temperature_token(temperature) {
        return Err(DecodeError::InvalidTemperature {
            token: temperature.to_string(),
            expected: "'/' at position 3 or 4",
        });
    }

    let mut sky_condition = Vec::new();
    while let Some(layer) = tokens.pop_back_if(token::is_sky_layer_token) {
        sky_condition.push(layer.to_string());
    }
    sky_condition.reverse();

    let weather_phenomena = if tokens.is_empty() {
        None
    } else {
        Some(tokens.remaining().join(" "))
    };

    let remarks = remarks_text.map(decode_remarks);

    debug!("decoded observation for station {station_id} at {date_time}");

    Ok(Observation {
        report_type,
        station_id: station_id.to_string(),
        date_time: date_time.to_string(),
        report_modifier,
        wind,
        visibility: visibility.to_string(),
        runway_visual_range,
        weather_phenomena,
        sky_condition,
        temperature: temperature.to_string(),
        altimeter: altimeter.to_string(),
        remarks,
    })
}

impl FromStr for Observation {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        decode_observation(s)
    }
}

impl fmt::Display for Observation {
    /// Canonical single-spaced rendering in report order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::with_capacity(12);

        if let Some(kind) = &self.report_type {
            parts.push(kind.as_str());
        }
        parts.push(&self.station_id);
        parts.push(&self.date_time);
        if let Some(modifier) = &self.report_modifier {
            parts.push(modifier.as_str());
        }
        parts.push(&self.wind);
        parts.push(&self.visibility);
        if let Some(rvr) = &self.runway_visual_range {
            parts.push(rvr);
        }
        if let Some(weather) = &self.weather_phenomena {
            parts.push(weather);
        }
        parts.extend(self.sky_condition.iter().map(String::as_str));
        parts.push(&self.temperature);
        parts.push(&self.altimeter);

        f.write_str(&parts.join(" "))?;

        match &self.remarks {
            Some(remarks) if !remarks.text.is_empty() => write!(f, " RMK {remarks}"),
            _ => Ok(()),
        }
    }
}
