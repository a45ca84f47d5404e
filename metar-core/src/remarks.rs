//! Best-effort decoding of the remarks (`RMK`) trailer.
//!
//! The remarks grammar is informal, so fields are located by keyword search
//! instead of position. Nothing here fails: a field that cannot be found is
//! simply `None`.

use log::trace;
use std::{convert::Infallible, fmt, str::FromStr};

use crate::{
    model::{Remarks, StationType},
    token::is_fraction,
};

const PEAK_WIND: &str = "PK WND ";
const WIND_SHIFT: &str = "WSHFT ";
const TOWER_VISIBILITY: &str = "TWR VIS ";
const SURFACE_VISIBILITY: &str = "SFC VIS ";
const VISIBILITY: &str = "VIS ";
const LIGHTNING: &str = "LTG";
const DISTANT_LIGHTNING: &str = "LTG DSNT ";

/// Byte offset of the first whitespace in `s` and the offset just past it.
fn find_whitespace(s: &str) -> Option<(usize, usize)> {
    s.char_indices()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| (i, i + c.len_utf8()))
}

/// Byte offset just past the last whitespace in `s`.
fn after_last_whitespace(s: &str) -> Option<usize> {
    s.char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, c)| i + c.len_utf8())
}

/// End of the word starting at `start`.
fn word_end(text: &str, start: usize) -> usize {
    find_whitespace(&text[start..]).map_or(text.len(), |(i, _)| start + i)
}

/// The word following the first occurrence of `marker`.
fn value_after(text: &str, marker: &str) -> Option<String> {
    let start = text.find(marker)? + marker.len();
    let value = &text[start..word_end(text, start)];
    (!value.is_empty()).then(|| value.to_string())
}

/// Variable and alternate-station visibility, in that order.
///
/// Both share the `VIS` keyword with the tower and surface groups, so every
/// bare occurrence is inspected and the last one of each kind wins.
fn visibilities(text: &str) -> (Option<String>, Option<String>) {
    let mut variable = None;
    let mut alternate = None;

    for (index, _) in text.match_indices(VISIBILITY) {
        let before = &text[..index];
        if before.ends_with("TWR ") || before.ends_with("SFC ") {
            continue;
        }

        let segments: Vec<&str> = text[index + VISIBILITY.len()..]
            .split_whitespace()
            .take(3)
            .collect();

        match segments.as_slice() {
            [] => break,
            [first, rest @ ..] if first.contains('V') => {
                variable = Some(match rest.first() {
                    Some(fraction) if is_fraction(fraction) => format!("{first} {fraction}"),
                    _ => first.to_string(),
                });
            }
            [first, second, ..] => alternate = Some(format!("{first} {second}")),
            [_] => {}
        }
    }

    (variable, alternate)
}

/// Lightning group, either automated (`LTG DSNT W`) or manual
/// (`FRQ LTGICCG OHD`: frequency, type and location).
fn lightning(text: &str) -> Option<String> {
    let ltg = text.find(LIGHTNING)?;

    if let Some(start) = text.find(DISTANT_LIGHTNING) {
        let rest = &text[start + DISTANT_LIGHTNING.len()..];
        let direction = text.len() - rest.trim_start().len();
        let end = word_end(text, direction);
        return Some(text[start..end].trim_end().to_string());
    }

    // The frequency word ends right before the word holding LTG.
    let (cut, _) = text[..ltg].char_indices().next_back()?;
    let start = after_last_whitespace(&text[..cut]).unwrap_or(0);

    let (_, location) = find_whitespace(&text[ltg..])?;
    let location = ltg + location;
    if location >= text.len() {
        return None;
    }

    Some(text[start..word_end(text, location)].to_string())
}

/// Decode a remarks trailer. Never fails.
pub fn decode_remarks(text: &str) -> Remarks {
    let text = text.trim().to_uppercase();

    let type_of_station = text
        .split_whitespace()
        .any(|t| t == StationType::Ao2.as_str())
        .then_some(StationType::Ao2);
    let (variable_visibility, alternate_visibility) = visibilities(&text);

    let remarks = Remarks {
        type_of_station,
        peak_wind: value_after(&text, PEAK_WIND),
        wind_shift: value_after(&text, WIND_SHIFT),
        tower_visibility: value_after(&text, TOWER_VISIBILITY),
        surface_visibility: value_after(&text, SURFACE_VISIBILITY),
        variable_visibility,
        alternate_visibility,
        lightning: lightning(&text),
        text,
    };
    trace!("decoded remarks: {remarks:?}");

    remarks
}

impl FromStr for Remarks {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(decode_remarks(s))
    }
}

impl fmt::Display for Remarks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_fields() {
        let remarks = decode_remarks("AO2 PK WND 28045/1215 WSHFT 1450 TWR VIS 3 RMK");

        assert_eq!(remarks.type_of_station, Some(StationType::Ao2));
        assert_eq!(remarks.peak_wind.as_deref(), Some("28045/1215"));
        assert_eq!(remarks.wind_shift.as_deref(), Some("1450"));
        assert_eq!(remarks.tower_visibility.as_deref(), Some("3"));
        assert_eq!(remarks.surface_visibility, None);
    }

    #[test]
    fn search_field_at_end_of_text() {
        let remarks = decode_remarks("ao2 sfc vis 1/2");

        assert_eq!(remarks.surface_visibility.as_deref(), Some("1/2"));
        assert_eq!(remarks.text, "AO2 SFC VIS 1/2");
    }

    #[test]
    fn tower_and_surface_markers_are_not_bare_visibility() {
        let remarks = decode_remarks("TWR VIS 1 1/2 SFC VIS 2 SLP201");

        assert_eq!(remarks.tower_visibility.as_deref(), Some("1"));
        assert_eq!(remarks.surface_visibility.as_deref(), Some("2"));
        assert_eq!(remarks.variable_visibility, None);
        assert_eq!(remarks.alternate_visibility, None);
    }

    #[test]
    fn variable_visibility() {
        let remarks = decode_remarks("AO2 VIS 1/2V2 SLP201");
        assert_eq!(remarks.variable_visibility.as_deref(), Some("1/2V2"));

        let remarks = decode_remarks("AO2 VIS 1V2 1/2 SLP201");
        assert_eq!(remarks.variable_visibility.as_deref(), Some("1V2 1/2"));
        assert_eq!(remarks.alternate_visibility, None);
    }

    #[test]
    fn alternate_station_visibility() {
        let remarks = decode_remarks("AO2 VIS 2 RWY11 SLP201");

        assert_eq!(remarks.alternate_visibility.as_deref(), Some("2 RWY11"));
        assert_eq!(remarks.variable_visibility, None);
    }

    #[test]
    fn last_visibility_of_each_kind_wins() {
        let remarks = decode_remarks("VIS 1V2 VIS 2 RWY11 VIS 3V5 VIS 4 RWY29");

        assert_eq!(remarks.variable_visibility.as_deref(), Some("3V5"));
        assert_eq!(remarks.alternate_visibility.as_deref(), Some("4 RWY29"));
    }

    #[test]
    fn lone_visibility_value_is_ignored() {
        let remarks = decode_remarks("AO2 VIS 3");

        assert_eq!(remarks.variable_visibility, None);
        assert_eq!(remarks.alternate_visibility, None);
    }

    #[test]
    fn distant_lightning() {
        let remarks = decode_remarks("OCNL LTG DSNT W");
        assert_eq!(remarks.lightning.as_deref(), Some("LTG DSNT W"));

        let remarks = decode_remarks("AO2 LTG DSNT NE AND SE SLP132");
        assert_eq!(remarks.lightning.as_deref(), Some("LTG DSNT NE"));

        let remarks = decode_remarks("AO2 LTG DSNT  W SLP132");
        assert_eq!(remarks.lightning.as_deref(), Some("LTG DSNT  W"));
    }

    #[test]
    fn manual_lightning() {
        let remarks = decode_remarks("FRQ LTGICCG OHD");
        assert_eq!(remarks.lightning.as_deref(), Some("FRQ LTGICCG OHD"));

        let remarks = decode_remarks("AO2 OCNL LTGICCG VC SLP201");
        assert_eq!(remarks.lightning.as_deref(), Some("OCNL LTGICCG VC"));
    }

    #[test]
    fn lightning_without_word_boundaries_is_absent() {
        assert_eq!(decode_remarks("LTGICCG OHD").lightning, None);
        assert_eq!(decode_remarks("AO2 FRQ LTGICCG").lightning, None);
        assert_eq!(decode_remarks("AO2 SLP201").lightning, None);
    }

    #[test]
    fn station_type_needs_exact_token() {
        assert_eq!(decode_remarks("AO2A SLP201").type_of_station, None);
        assert_eq!(decode_remarks("SLP201 AO2").type_of_station, Some(StationType::Ao2));
    }

    #[test]
    fn empty_remarks() {
        let remarks: Remarks = "   ".parse().unwrap();

        assert_eq!(remarks, Remarks::default());
        assert_eq!(remarks.to_string(), "");
    }
}
