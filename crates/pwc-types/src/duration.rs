//! Accumulated solve time with a compact text encoding.
//!
//! Durations are stored and sent to viewers as strings such as `2h12m9s`.
//! Leading zero components are omitted, inner ones are kept:
//!
//! | Value | Text |
//! |-------|------|
//! | 0 | `0s` |
//! | 1 second | `1s` |
//! | 1 minute | `1m0s` |
//! | 1 hour | `1h0m0s` |
//! | 1.5 seconds | `1.5s` |
//! | 250 milliseconds | `250ms` |
//!
//! Parsing accepts any sequence of `<decimal><unit>` pairs with the units
//! `h`, `m`, `s`, `ms`, `us`/`µs` and `ns`, so every formatted value parses
//! back to the identical duration.

use crate::error::TypeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::AddAssign;
use std::str::FromStr;
use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// Total time spent solving a puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SolveDuration(Duration);

impl SolveDuration {
    /// Zero elapsed time.
    pub const ZERO: Self = Self(Duration::ZERO);

    /// Wraps a standard duration.
    #[must_use]
    pub const fn new(duration: Duration) -> Self {
        Self(duration)
    }

    /// Creates a duration from whole seconds.
    #[must_use]
    pub const fn from_secs(secs: u64) -> Self {
        Self(Duration::from_secs(secs))
    }

    /// Returns the wrapped standard duration.
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Returns `true` if no time has been recorded.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0.is_zero()
    }
}

impl From<Duration> for SolveDuration {
    fn from(duration: Duration) -> Self {
        Self(duration)
    }
}

impl AddAssign<Duration> for SolveDuration {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 = self.0.saturating_add(rhs);
    }
}

impl fmt::Display for SolveDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nanos = self.0.as_nanos();
        if nanos == 0 {
            return f.write_str("0s");
        }

        if nanos < NANOS_PER_SEC {
            let (scale, width, unit) = match nanos {
                n if n < 1_000 => (1, 0, "ns"),
                n if n < 1_000_000 => (1_000, 3, "µs"),
                _ => (1_000_000, 6, "ms"),
            };
            write_decimal(f, nanos / scale, nanos % scale, width)?;
            return f.write_str(unit);
        }

        let secs = self.0.as_secs();
        let hours = secs / 3600;
        let minutes = (secs % 3600) / 60;
        if hours > 0 {
            write!(f, "{hours}h")?;
        }
        if hours > 0 || minutes > 0 {
            write!(f, "{minutes}m")?;
        }
        write_decimal(
            f,
            u128::from(secs % 60),
            u128::from(self.0.subsec_nanos()),
            9,
        )?;
        f.write_str("s")
    }
}

/// Writes `whole[.fraction]` with trailing fraction zeros removed.
fn write_decimal(f: &mut fmt::Formatter<'_>, whole: u128, fraction: u128, width: usize) -> fmt::Result {
    write!(f, "{whole}")?;
    if fraction > 0 {
        let digits = format!("{fraction:0width$}");
        write!(f, ".{}", digits.trim_end_matches('0'))?;
    }
    Ok(())
}

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(1),
        "us" | "µs" | "μs" => Some(1_000),
        "ms" => Some(1_000_000),
        "s" => Some(NANOS_PER_SEC),
        "m" => Some(60 * NANOS_PER_SEC),
        "h" => Some(3600 * NANOS_PER_SEC),
        _ => None,
    }
}

impl FromStr for SolveDuration {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TypeError::InvalidDuration(s.to_string());

        if s == "0" {
            return Ok(Self::ZERO);
        }
        if s.is_empty() {
            return Err(invalid());
        }

        let mut rest = s;
        let mut total: u128 = 0;
        while !rest.is_empty() {
            let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
            let (int_part, after) = rest.split_at(int_len);
            let (frac_part, after) = match after.strip_prefix('.') {
                Some(tail) => tail.split_at(tail.bytes().take_while(u8::is_ascii_digit).count()),
                None => ("", after),
            };
            if int_part.is_empty() && frac_part.is_empty() {
                return Err(invalid());
            }

            let unit_len = after
                .find(|c: char| c.is_ascii_digit() || c == '.')
                .unwrap_or(after.len());
            let (unit, tail) = after.split_at(unit_len);
            let scale = unit_nanos(unit).ok_or_else(invalid)?;

            let whole: u128 = if int_part.is_empty() {
                0
            } else {
                int_part.parse().map_err(|_| invalid())?
            };
            let mut value = whole.checked_mul(scale).ok_or_else(invalid)?;

            if !frac_part.is_empty() {
                // Digits past nanosecond precision of an hour cannot contribute.
                let digits = &frac_part[..frac_part.len().min(18)];
                let fraction: u128 = digits.parse().map_err(|_| invalid())?;
                let denominator = 10u128.pow(digits.len() as u32);
                value = value
                    .checked_add(fraction * scale / denominator)
                    .ok_or_else(invalid)?;
            }

            total = total.checked_add(value).ok_or_else(invalid)?;
            rest = tail;
        }

        let secs = u64::try_from(total / NANOS_PER_SEC).map_err(|_| invalid())?;
        let nanos = (total % NANOS_PER_SEC) as u32;
        Ok(Self(Duration::new(secs, nanos)))
    }
}

impl Serialize for SolveDuration {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SolveDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
