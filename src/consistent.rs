//! Consistent region configuration.
//!
//! The runtime implements the region; the graph only carries its settings.
//! Every value is validated when the config is built.

use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::fmt;
use std::time::Duration;

pub const DEFAULT_DRAIN_TIMEOUT: f64 = 180.0;
pub const DEFAULT_RESET_TIMEOUT: f64 = 180.0;
pub const DEFAULT_MAX_CONSECUTIVE_ATTEMPTS: i64 = 5;
pub const MAX_CONSECUTIVE_ATTEMPTS_LIMIT: i64 = 0x7FFF_FFFF;

/// A time value given either as a duration or a number of seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Seconds {
    Duration(Duration),
    Number(f64),
}

impl Seconds {
    pub fn as_secs_f64(&self) -> f64 {
        match self {
            Seconds::Duration(d) => d.as_secs_f64(),
            Seconds::Number(n) => *n,
        }
    }

    pub fn is_positive(&self) -> bool {
        let s = self.as_secs_f64();
        s.is_finite() && s > 0.0
    }

    pub fn as_micros(&self) -> u64 {
        (self.as_secs_f64() * 1_000_000.0).round() as u64
    }
}

/// Seconds as emitted in the graph: durations always carry a fraction
/// (`180.0`), plain numbers print as given (`180`, `2.5`).
impl fmt::Display for Seconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seconds::Duration(d) => {
                let s = d.as_secs_f64();
                if s.fract() == 0.0 {
                    write!(f, "{s:.1}")
                } else {
                    write!(f, "{s}")
                }
            }
            Seconds::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<Duration> for Seconds {
    fn from(d: Duration) -> Self {
        Seconds::Duration(d)
    }
}

impl From<f64> for Seconds {
    fn from(n: f64) -> Self {
        Seconds::Number(n)
    }
}

impl From<i64> for Seconds {
    fn from(n: i64) -> Self {
        Seconds::Number(n as f64)
    }
}

impl From<i32> for Seconds {
    fn from(n: i32) -> Self {
        Seconds::Number(n as f64)
    }
}

impl From<u32> for Seconds {
    fn from(n: u32) -> Self {
        Seconds::Number(n as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// The start operator triggers drain and checkpoint.
    OperatorDriven,
    /// The runtime triggers at a fixed period.
    Periodic,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::OperatorDriven => "OPERATOR_DRIVEN",
            Trigger::Periodic => "PERIODIC",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConsistentRegionConfig {
    trigger: Trigger,
    period: Option<Seconds>,
    drain_timeout: Seconds,
    reset_timeout: Seconds,
    max_consecutive_attempts: u32,
}

impl ConsistentRegionConfig {
    pub fn new(
        trigger: Trigger,
        period: Option<Seconds>,
        drain_timeout: impl Into<Seconds>,
        reset_timeout: impl Into<Seconds>,
        max_consecutive_attempts: i64,
    ) -> Result<Self, ConfigError> {
        let invalid = |msg: &str| ConfigError::ConsistentRegion(msg.to_string());

        match (trigger, period) {
            (Trigger::OperatorDriven, Some(_)) => {
                return Err(invalid("period does not apply to an operator driven region"));
            }
            (Trigger::Periodic, None) => {
                return Err(invalid("period must be specified for a periodic region"));
            }
            (Trigger::Periodic, Some(p)) if !p.is_positive() => {
                return Err(invalid("period must be greater than zero"));
            }
            _ => {}
        }

        let drain_timeout = drain_timeout.into();
        if !drain_timeout.is_positive() {
            return Err(invalid("drain timeout must be greater than zero"));
        }
        let reset_timeout = reset_timeout.into();
        if !reset_timeout.is_positive() {
            return Err(invalid("reset timeout must be greater than zero"));
        }

        if !(1..=MAX_CONSECUTIVE_ATTEMPTS_LIMIT).contains(&max_consecutive_attempts) {
            return Err(ConfigError::ConsistentRegion(format!(
                "max_consecutive_attempts must be between 1 and {MAX_CONSECUTIVE_ATTEMPTS_LIMIT}, inclusive"
            )));
        }

        Ok(Self {
            trigger,
            period,
            drain_timeout,
            reset_timeout,
            max_consecutive_attempts: max_consecutive_attempts as u32,
        })
    }

    pub fn operator_driven(
        drain_timeout: impl Into<Seconds>,
        reset_timeout: impl Into<Seconds>,
        max_consecutive_attempts: i64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            Trigger::OperatorDriven,
            None,
            drain_timeout,
            reset_timeout,
            max_consecutive_attempts,
        )
    }

    pub fn periodic(
        period: impl Into<Seconds>,
        drain_timeout: impl Into<Seconds>,
        reset_timeout: impl Into<Seconds>,
        max_consecutive_attempts: i64,
    ) -> Result<Self, ConfigError> {
        Self::new(
            Trigger::Periodic,
            Some(period.into()),
            drain_timeout,
            reset_timeout,
            max_consecutive_attempts,
        )
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    pub fn period(&self) -> Option<Seconds> {
        self.period
    }

    pub fn max_consecutive_attempts(&self) -> u32 {
        self.max_consecutive_attempts
    }

    pub fn spl_json(&self) -> Value {
        let mut out = Map::new();
        out.insert("trigger".to_string(), Value::from(self.trigger.as_str()));
        if let Some(period) = &self.period {
            out.insert("period".to_string(), Value::from(period.to_string()));
        }
        out.insert(
            "drainTimeout".to_string(),
            Value::from(self.drain_timeout.to_string()),
        );
        out.insert(
            "resetTimeout".to_string(),
            Value::from(self.reset_timeout.to_string()),
        );
        out.insert(
            "maxConsecutiveResetAttempts".to_string(),
            Value::from(self.max_consecutive_attempts),
        );
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn defaults_periodic(period: impl Into<Seconds>) -> Result<ConsistentRegionConfig, ConfigError> {
        ConsistentRegionConfig::periodic(
            period,
            DEFAULT_DRAIN_TIMEOUT,
            DEFAULT_RESET_TIMEOUT,
            DEFAULT_MAX_CONSECUTIVE_ATTEMPTS,
        )
    }

    #[test]
    fn operator_driven_defaults() {
        let c = ConsistentRegionConfig::operator_driven(
            DEFAULT_DRAIN_TIMEOUT,
            DEFAULT_RESET_TIMEOUT,
            DEFAULT_MAX_CONSECUTIVE_ATTEMPTS,
        )
        .unwrap();
        assert_eq!(c.trigger(), Trigger::OperatorDriven);
        assert_eq!(
            c.spl_json(),
            json!({
                "trigger": "OPERATOR_DRIVEN",
                "drainTimeout": "180",
                "resetTimeout": "180",
                "maxConsecutiveResetAttempts": 5
            })
        );
    }

    #[test]
    fn periodic_with_durations() {
        let c = ConsistentRegionConfig::periodic(
            Duration::from_millis(2500),
            Duration::from_secs(30),
            12.5,
            3,
        )
        .unwrap();
        assert_eq!(
            c.spl_json(),
            json!({
                "trigger": "PERIODIC",
                "period": "2.5",
                "drainTimeout": "30.0",
                "resetTimeout": "12.5",
                "maxConsecutiveResetAttempts": 3
            })
        );
    }

    #[test]
    fn rejects_bad_period() {
        assert!(defaults_periodic(0).is_err());
        assert!(defaults_periodic(-1.0).is_err());
        assert!(defaults_periodic(Duration::ZERO).is_err());
        assert!(defaults_periodic(f64::NAN).is_err());
        assert!(
            ConsistentRegionConfig::new(Trigger::Periodic, None, 180, 180, 5).is_err()
        );
        assert!(
            ConsistentRegionConfig::new(
                Trigger::OperatorDriven,
                Some(Seconds::Number(1.0)),
                180,
                180,
                5
            )
            .is_err()
        );
    }

    #[test]
    fn rejects_bad_timeouts() {
        assert!(ConsistentRegionConfig::operator_driven(0, 180, 5).is_err());
        assert!(ConsistentRegionConfig::operator_driven(-3.0, 180, 5).is_err());
        assert!(ConsistentRegionConfig::operator_driven(180, -1, 5).is_err());
        assert!(ConsistentRegionConfig::operator_driven(180, Duration::ZERO, 5).is_err());
    }

    #[test]
    fn attempts_boundaries() {
        assert!(ConsistentRegionConfig::operator_driven(180, 180, 0).is_err());
        assert!(
            ConsistentRegionConfig::operator_driven(180, 180, MAX_CONSECUTIVE_ATTEMPTS_LIMIT + 1)
                .is_err()
        );
        assert!(ConsistentRegionConfig::operator_driven(180, 180, -1).is_err());

        let low = ConsistentRegionConfig::operator_driven(180, 180, 1).unwrap();
        assert_eq!(low.max_consecutive_attempts(), 1);
        let high =
            ConsistentRegionConfig::operator_driven(180, 180, MAX_CONSECUTIVE_ATTEMPTS_LIMIT)
                .unwrap();
        assert_eq!(high.max_consecutive_attempts(), 0x7FFF_FFFF);
    }

    #[test]
    fn seconds_formatting_and_micros() {
        assert_eq!(Seconds::from(180).to_string(), "180");
        assert_eq!(Seconds::from(Duration::from_secs(180)).to_string(), "180.0");
        assert_eq!(Seconds::from(0.25).as_micros(), 250_000);
    }
}
