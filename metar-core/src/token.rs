//! Token shape predicates and the front/back cursor used by the observation
//! decoder.
//!
//! METAR fields carry no explicit tags, so each field is recognized by the
//! shape of its token alone: length, prefix and suffix. All checks count
//! characters, not bytes.

/// Minimum number of body tokens a report must have before any is consumed.
pub const MIN_TOKENS: usize = 7;

/// Recognized sky-layer prefixes.
pub const SKY_LAYER_PREFIXES: &[&str] = &["CLR", "FEW", "SCT", "BKN", "OVC", "VV"];

fn char_len(token: &str) -> usize {
    token.chars().count()
}

fn char_at(token: &str, index: usize) -> Option<char> {
    token.chars().nth(index)
}

/// Exactly 4 characters (ICAO location id).
pub fn is_station_token(token: &str) -> bool {
    char_len(token) == 4
}

/// Exactly 7 characters ending in `Z`, e.g. `201251Z`.
pub fn is_date_time_token(token: &str) -> bool {
    char_len(token) == 7 && token.ends_with('Z')
}

/// At least 7 characters ending in `KT`, e.g. `05008KT`.
pub fn is_wind_token(token: &str) -> bool {
    char_len(token) >= 7 && token.ends_with("KT")
}

/// Variable wind direction sub-group, e.g. `180V240`.
pub fn is_variable_wind_token(token: &str) -> bool {
    char_len(token) == 7 && char_at(token, 3) == Some('V')
}

pub fn is_visibility_token(token: &str) -> bool {
    token.ends_with("SM")
}

pub fn is_runway_visual_range_token(token: &str) -> bool {
    token.ends_with("FT")
}

/// Exactly 5 characters starting with `A`, e.g. `A3012`.
pub fn is_altimeter_token(token: &str) -> bool {
    char_len(token) == 5 && token.starts_with('A')
}

/// Temperature/dew point group, e.g. `22/18` or `M22/M18`.
///
/// Only fails when the separator sits at neither index 2 nor index 3.
pub fn is_temperature_token(token: &str) -> bool {
    char_at(token, 2) == Some('/') || char_at(token, 3) == Some('/')
}

pub fn is_sky_layer_token(token: &str) -> bool {
    char_len(token) >= 3
        && SKY_LAYER_PREFIXES
            .iter()
            .any(|prefix| token.starts_with(prefix))
}

/// Digits, a single `/`, digits. Whitespace anywhere makes this false.
pub fn is_fraction(value: &str) -> bool {
    match value.split_once('/') {
        Some((numerator, denominator)) => {
            !numerator.is_empty()
                && !denominator.is_empty()
                && numerator.chars().all(|c| c.is_ascii_digit())
                && denominator.chars().all(|c| c.is_ascii_digit())
        }
        None => false,
    }
}

/// Cursor consuming an immutable token slice from both ends.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    tokens: Vec<&'a str>,
    front: usize,
    back: usize,
}

impl<'a> Tokens<'a> {
    /// Split `text` on runs of whitespace.
    pub fn new(text: &'a str) -> Self {
        let tokens: Vec<&'a str> = text.split_whitespace().collect();
        let back = tokens.len();
        Self {
            tokens,
            front: 0,
            back,
        }
    }

    /// Number of tokens not consumed yet.
    pub fn len(&self) -> usize {
        self.back - self.front
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn peek_front(&self) -> Option<&'a str> {
        if self.is_empty() {
            None
        } else {
            Some(self.tokens[self.front])
        }
    }

    pub fn peek_back(&self) -> Option<&'a str> {
        if self.is_empty() {
            None
        } else {
            Some(self.tokens[self.back - 1])
        }
    }

    pub fn pop_front(&mut self) -> Option<&'a str> {
        let token = self.peek_front()?;
        self.front += 1;
        Some(token)
    }

    pub fn pop_back(&mut self) -> Option<&'a str> {
        let token = self.peek_back()?;
        self.back -= 1;
        Some(token)
    }

    /// Consume the front token only if `accept` matches it.
    pub fn pop_front_if(&mut self, accept: impl Fn(&str) -> bool) -> Option<&'a str> {
        match self.peek_front() {
            Some(token) if accept(token) => self.pop_front(),
            _ => None,
        }
    }

    /// Consume the back token only if `accept` matches it.
    pub fn pop_back_if(&mut self, accept: impl Fn(&str) -> bool) -> Option<&'a str> {
        match self.peek_back() {
            Some(token) if accept(token) => self.pop_back(),
            _ => None,
        }
    }

    /// Tokens not consumed yet, in original order.
    pub fn remaining(&self) -> &[&'a str] {
        &self.tokens[self.front..self.back]
    }
}
