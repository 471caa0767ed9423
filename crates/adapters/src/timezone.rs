// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Cronspine Contributors

//! The IANA timezone converter collaborator.
//!
//! Two failure modes must stay distinct:
//! an unrecognized zone identifier (`InvalidZone`, permanent — drop the
//! job) versus a valid zone whose local-time conversion lands in a
//! DST gap or ambiguous fold (`InvalidDateTimeForTimezone`, transient —
//! the caller bumps the probe time and retries).

use chrono::{LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TzError {
    #[error("zone identifier '{zone}' is not recognized")]
    InvalidZone { zone: String },

    #[error("datetime {local} has no valid interpretation in zone '{zone}'")]
    InvalidDateTimeForTimezone { zone: String, local: NaiveDateTime },
}

/// Converts naive wall-clock times between UTC and a named IANA zone.
pub trait TimezoneConverter: Send + Sync {
    /// Convert a naive UTC instant into the zone's local wall-clock time.
    fn to_tz(&self, naive_utc: NaiveDateTime, zone: &str) -> Result<NaiveDateTime, TzError>;

    /// Convert a zone-local wall-clock time back into naive UTC.
    fn to_utc(&self, local: NaiveDateTime, zone: &str) -> Result<NaiveDateTime, TzError>;
}

/// Production converter backed by `chrono-tz`'s IANA database.
#[derive(Debug, Clone, Default)]
pub struct SystemTimezoneConverter;

fn parse_zone(zone: &str) -> Result<Tz, TzError> {
    if zone.eq_ignore_ascii_case("utc") {
        return Ok(Tz::UTC);
    }
    Tz::from_str(zone).map_err(|_| TzError::InvalidZone { zone: zone.to_string() })
}

impl TimezoneConverter for SystemTimezoneConverter {
    fn to_tz(&self, naive_utc: NaiveDateTime, zone: &str) -> Result<NaiveDateTime, TzError> {
        let tz = parse_zone(zone)?;
        // A UTC instant always has exactly one local representation in any
        // zone (UTC offsets never fold or gap), so this conversion itself
        // cannot fail — only `to_utc` (local -> UTC) can hit a DST anomaly.
        Ok(tz.from_utc_datetime(&naive_utc).naive_local())
    }

    fn to_utc(&self, local: NaiveDateTime, zone: &str) -> Result<NaiveDateTime, TzError> {
        let tz = parse_zone(zone)?;
        match tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Ok(dt.naive_utc()),
            // Ambiguous (DST fall-back fold): pick the earlier of the two
            // candidates so evaluation always makes forward progress.
            LocalResult::Ambiguous(earlier, _later) => Ok(earlier.naive_utc()),
            LocalResult::None => {
                Err(TzError::InvalidDateTimeForTimezone { zone: zone.to_string(), local })
            }
        }
    }
}

#[cfg(test)]
#[path = "timezone_tests.rs"]
mod tests;
