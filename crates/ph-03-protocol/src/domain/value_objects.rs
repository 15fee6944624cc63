//! Validated WHATSAT arguments and the time difference carried by `AT`.

use std::fmt;
use std::time::Duration;

use ph_01_location_store::{is_unsigned_decimal, is_unsigned_integer, ClientTimestamp};

use crate::error::ProtocolError;

/// Largest accepted search radius, in kilometers.
pub const MAX_RADIUS_KM: f64 = 50.0;

/// Largest accepted result bound.
pub const MAX_RESULTS: usize = 20;

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// Search radius in kilometers, 0 < r ≤ 50.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadiusKm(f64);

impl RadiusKm {
    pub fn parse(token: &str) -> Result<Self, ProtocolError> {
        if !is_unsigned_decimal(token) {
            return Err(ProtocolError::InvalidRadius(token.to_string()));
        }
        let km: f64 = token
            .parse()
            .map_err(|_| ProtocolError::InvalidRadius(token.to_string()))?;
        if km <= 0.0 || km > MAX_RADIUS_KM {
            return Err(ProtocolError::InvalidRadius(token.to_string()));
        }
        Ok(Self(km))
    }

    pub fn km(self) -> f64 {
        self.0
    }

    pub fn meters(self) -> f64 {
        self.0 * 1000.0
    }
}

/// Upper bound on the number of places returned, 0 ≤ n ≤ 20.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxResults(usize);

impl MaxResults {
    pub fn parse(token: &str) -> Result<Self, ProtocolError> {
        if !is_unsigned_integer(token) {
            return Err(ProtocolError::InvalidMaxResults(token.to_string()));
        }
        // Long digit runs overflow usize; they are out of range anyway.
        match token.parse::<usize>() {
            Ok(n) if n <= MAX_RESULTS => Ok(Self(n)),
            _ => Err(ProtocolError::InvalidMaxResults(token.to_string())),
        }
    }

    pub fn get(self) -> usize {
        self.0
    }
}

/// Arguments handed to the nearby-places collaborator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_meters: f64,
    /// Applied by the dispatcher; lookups may return more.
    pub max_results: usize,
}

/// Client clock minus server clock, exact to the nanosecond.
///
/// Rendered with an explicit sign and trailing fractional zeros trimmed,
/// keeping at least one fractional digit: `+0.0`, `-0.134963`, `+12.5`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeDiff {
    nanos: i128,
}

impl TimeDiff {
    pub fn from_nanos(nanos: i128) -> Self {
        Self { nanos }
    }

    /// `client_time - now`, where `now` is time since the Unix epoch.
    pub fn between(client_time: &ClientTimestamp, now: Duration) -> Self {
        let now = i128::from(now.as_secs()) * NANOS_PER_SEC + i128::from(now.subsec_nanos());
        Self::from_nanos(client_time.as_nanos() - now)
    }

    pub fn as_nanos(self) -> i128 {
        self.nanos
    }
}

impl fmt::Display for TimeDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.nanos < 0 { '-' } else { '+' };
        let magnitude = self.nanos.unsigned_abs();
        let whole = magnitude / NANOS_PER_SEC.unsigned_abs();
        let fraction = magnitude % NANOS_PER_SEC.unsigned_abs();

        let digits = format!("{fraction:09}");
        let trimmed = digits.trim_end_matches('0');
        let trimmed = if trimmed.is_empty() { "0" } else { trimmed };
        write!(f, "{sign}{whole}.{trimmed}")
    }
}

/// Returns true if `token` is an unsigned decimal with an optional sign,
/// e.g. a rendered [`TimeDiff`].
pub fn is_signed_decimal(token: &str) -> bool {
    let unsigned = token
        .strip_prefix('+')
        .or_else(|| token.strip_prefix('-'))
        .unwrap_or(token);
    is_unsigned_decimal(unsigned)
}
