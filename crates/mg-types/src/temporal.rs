use std::fmt;
use std::ops::Sub;

use serde::{Deserialize, Serialize};

const NANOS_PER_SEC: i128 = 1_000_000_000;

/// A TAI timestamp with nanosecond resolution.
///
/// Ordering: `sec` → `ns` (total order).
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Whole seconds since the TAI epoch.
    pub sec: u64,
    /// Nanoseconds within the second (`< 1_000_000_000`).
    pub ns: u32,
}

impl Timestamp {
    /// Create a timestamp, carrying any nanosecond overflow into seconds.
    pub fn new(sec: u64, ns: u32) -> Self {
        Self {
            sec: sec + u64::from(ns / 1_000_000_000),
            ns: ns % 1_000_000_000,
        }
    }

    /// The zero timestamp.
    pub const fn zero() -> Self {
        Self { sec: 0, ns: 0 }
    }

    /// Total nanoseconds since the epoch.
    pub fn to_nanos(&self) -> i128 {
        i128::from(self.sec) * NANOS_PER_SEC + i128::from(self.ns)
    }

    /// This timestamp shifted by `offset`, saturating at zero.
    pub fn offset_by(&self, offset: TimeOffset) -> Self {
        let total = (self.to_nanos() + i128::from(offset.nanos)).max(0);
        Self {
            sec: (total / NANOS_PER_SEC) as u64,
            ns: (total % NANOS_PER_SEC) as u32,
        }
    }
}

impl Sub for Timestamp {
    type Output = TimeOffset;

    fn sub(self, rhs: Self) -> TimeOffset {
        let nanos = (self.to_nanos() - rhs.to_nanos()).clamp(i64::MIN.into(), i64::MAX.into());
        TimeOffset::from_nanos(nanos as i64)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}:{})", self.sec, self.ns)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.sec, self.ns)
    }
}

/// A signed time difference with nanosecond resolution.
///
/// Differences beyond roughly ±292 years saturate.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeOffset {
    nanos: i64,
}

impl TimeOffset {
    pub const fn from_nanos(nanos: i64) -> Self {
        Self { nanos }
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self {
            nanos: millis.saturating_mul(1_000_000),
        }
    }

    pub const fn from_secs(secs: i64) -> Self {
        Self {
            nanos: secs.saturating_mul(1_000_000_000),
        }
    }

    pub const fn zero() -> Self {
        Self { nanos: 0 }
    }

    pub fn as_nanos(&self) -> i64 {
        self.nanos
    }
}

impl fmt::Debug for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeOffset({self})")
    }
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.nanos < 0 { '-' } else { '+' };
        let abs = self.nanos.unsigned_abs();
        write!(
            f,
            "{sign}{}.{:09}",
            abs / 1_000_000_000,
            abs % 1_000_000_000
        )
    }
}

/// A reduced fraction, used for grain rates and durations.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rational {
    pub num: i64,
    pub den: i64,
}

impl Rational {
    /// Create a fraction in lowest terms with a positive denominator.
    /// A zero denominator yields `1/0` for a non-zero numerator, `0/0` otherwise.
    pub fn new(num: i64, den: i64) -> Self {
        if den == 0 {
            return Self {
                num: i64::from(num != 0),
                den: 0,
            };
        }
        let g = gcd(num.unsigned_abs(), den.unsigned_abs()) as i64;
        let sign = if den < 0 { -1 } else { 1 };
        Self {
            num: sign * num / g,
            den: sign * den / g,
        }
    }

    pub const fn zero() -> Self {
        Self { num: 0, den: 1 }
    }

    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({}/{})", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a.max(1)
}
