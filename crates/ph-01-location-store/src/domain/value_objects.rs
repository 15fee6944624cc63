//! Value objects carried inside a position report.

use std::cmp::Ordering;
use std::fmt;

use crate::error::PositionError;

const NANOS_PER_SEC: i128 = 1_000_000_000;
const MAX_FRACTION_DIGITS: usize = 9;

/// Returns true if `token` is an unsigned decimal: digits with at most one
/// decimal point and at least one digit. No sign, no exponent.
pub fn is_unsigned_decimal(token: &str) -> bool {
    let mut digits = 0usize;
    let mut points = 0usize;
    for c in token.chars() {
        match c {
            '0'..='9' => digits += 1,
            '.' => points += 1,
            _ => return false,
        }
    }
    digits > 0 && points <= 1
}

/// Returns true if `token` is a non-empty run of ASCII digits.
pub fn is_unsigned_integer(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

/// Client-supplied timestamp.
///
/// Keeps the exact text the client sent, so it can be re-emitted on the wire
/// byte-for-byte, plus a fixed-point value used for ordering. Fraction digits
/// beyond nanoseconds are ignored for ordering.
#[derive(Clone, Debug)]
pub struct ClientTimestamp {
    text: String,
    secs: u64,
    nanos: u32,
}

impl ClientTimestamp {
    /// Parse a timestamp token such as `1520023934.918963`.
    pub fn parse(token: &str) -> Result<Self, PositionError> {
        if !is_unsigned_decimal(token) {
            return Err(PositionError::InvalidTimestamp(token.to_string()));
        }

        let (whole, fraction) = token.split_once('.').unwrap_or((token, ""));
        let secs = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u64>()
                .map_err(|_| PositionError::TimestampOverflow(token.to_string()))?
        };

        let mut nanos = 0u32;
        let mut scale = 100_000_000u32;
        for digit in fraction.bytes().take(MAX_FRACTION_DIGITS) {
            nanos += u32::from(digit - b'0') * scale;
            scale /= 10;
        }

        Ok(Self {
            text: token.to_string(),
            secs,
            nanos,
        })
    }

    /// The token exactly as the client sent it.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn secs(&self) -> u64 {
        self.secs
    }

    pub fn subsec_nanos(&self) -> u32 {
        self.nanos
    }

    /// Total value in nanoseconds since the Unix epoch.
    pub fn as_nanos(&self) -> i128 {
        i128::from(self.secs) * NANOS_PER_SEC + i128::from(self.nanos)
    }
}

impl PartialEq for ClientTimestamp {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ClientTimestamp {}

impl PartialOrd for ClientTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ClientTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.secs, self.nanos).cmp(&(other.secs, other.nanos))
    }
}

impl fmt::Display for ClientTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Signed latitude/longitude pair, e.g. `+34.068930-118.445127`.
#[derive(Clone, Debug, PartialEq)]
pub struct Coordinates {
    text: String,
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Parse a coordinate token: two explicitly signed decimals with no
    /// separator between them.
    pub fn parse(token: &str) -> Result<Self, PositionError> {
        let invalid = || PositionError::InvalidCoordinates(token.to_string());

        if !token.starts_with(|c: char| c == '+' || c == '-') {
            return Err(invalid());
        }
        let split = token[1..]
            .find(|c: char| c == '+' || c == '-')
            .map(|i| i + 1)
            .ok_or_else(invalid)?;
        let (lat, lon) = token.split_at(split);

        if !is_unsigned_decimal(&lat[1..]) || !is_unsigned_decimal(&lon[1..]) {
            return Err(invalid());
        }

        let latitude: f64 = lat.parse().map_err(|_| invalid())?;
        let longitude: f64 = lon.parse().map_err(|_| invalid())?;

        if !(-90.0..=90.0).contains(&latitude) {
            return Err(PositionError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(PositionError::LongitudeOutOfRange(longitude));
        }

        Ok(Self {
            text: token.to_string(),
            latitude,
            longitude,
        })
    }

    /// The token exactly as the client sent it.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
