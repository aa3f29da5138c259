//! Window configuration for input ports.

use crate::error::ConfigError;
use serde_json::{Map, Value};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowKind {
    Sliding,
    Tumbling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    Count(u64),
    Time(Duration),
    Punct,
}

impl Policy {
    fn name(&self) -> &'static str {
        match self {
            Policy::Count(_) => "COUNT",
            Policy::Time(_) => "TIME",
            Policy::Punct => "PUNCTUATION",
        }
    }

    fn insert_into(&self, out: &mut Map<String, Value>, prefix: &str) {
        out.insert(format!("{prefix}Policy"), Value::from(self.name()));
        match self {
            Policy::Count(n) => {
                out.insert(format!("{prefix}Config"), Value::from(*n));
            }
            Policy::Time(d) => {
                out.insert(format!("{prefix}Config"), Value::from(d.as_millis() as u64));
                out.insert(format!("{prefix}TimeUnit"), Value::from("MILLISECONDS"));
            }
            Policy::Punct => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowConfig {
    pub kind: WindowKind,
    pub evict: Policy,
    pub trigger: Option<Policy>,
}

impl WindowConfig {
    /// Sliding window evicting by `evict`, firing by `trigger`.
    pub fn sliding(evict: Policy, trigger: Policy) -> Result<Self, ConfigError> {
        if trigger == Policy::Punct {
            return Err(ConfigError::Window(
                "sliding windows cannot trigger on punctuation".to_string(),
            ));
        }
        Self::check(evict)?;
        Self::check(trigger)?;
        Ok(Self {
            kind: WindowKind::Sliding,
            evict,
            trigger: Some(trigger),
        })
    }

    pub fn tumbling(evict: Policy) -> Result<Self, ConfigError> {
        Self::check(evict)?;
        Ok(Self {
            kind: WindowKind::Tumbling,
            evict,
            trigger: None,
        })
    }

    fn check(policy: Policy) -> Result<(), ConfigError> {
        match policy {
            Policy::Count(0) => Err(ConfigError::Window("count must be positive".to_string())),
            Policy::Time(d) if d.is_zero() => {
                Err(ConfigError::Window("time must be positive".to_string()))
            }
            _ => Ok(()),
        }
    }

    pub fn spl_json(&self) -> Value {
        let mut out = Map::new();
        let kind = match self.kind {
            WindowKind::Sliding => "SLIDING",
            WindowKind::Tumbling => "TUMBLING",
        };
        out.insert("type".to_string(), Value::from(kind));
        self.evict.insert_into(&mut out, "evict");
        if let Some(trigger) = &self.trigger {
            trigger.insert_into(&mut out, "trigger");
        }
        Value::Object(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn sliding_count_window() {
        let w = WindowConfig::sliding(Policy::Count(10), Policy::Count(1)).unwrap();
        assert_eq!(
            w.spl_json(),
            json!({
                "type": "SLIDING",
                "evictPolicy": "COUNT",
                "evictConfig": 10,
                "triggerPolicy": "COUNT",
                "triggerConfig": 1
            })
        );
    }

    #[test]
    fn tumbling_time_window() {
        let w = WindowConfig::tumbling(Policy::Time(Duration::from_secs(2))).unwrap();
        assert_eq!(
            w.spl_json(),
            json!({
                "type": "TUMBLING",
                "evictPolicy": "TIME",
                "evictConfig": 2000,
                "evictTimeUnit": "MILLISECONDS"
            })
        );
    }

    #[test]
    fn invalid_windows() {
        assert!(WindowConfig::tumbling(Policy::Count(0)).is_err());
        assert!(WindowConfig::tumbling(Policy::Time(Duration::ZERO)).is_err());
        assert!(WindowConfig::sliding(Policy::Count(3), Policy::Punct).is_err());
    }
}
