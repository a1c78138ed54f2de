use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// How finely engine operations are broken into steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verbosity {
    /// Only swaps and settle points are recorded while sifting.
    Compact,
    /// A compare step before every swap. This is the reference granularity.
    #[default]
    Detailed,
    /// Like `Detailed`, with an extra step isolating the pair about to swap.
    Selection,
}

/// Per-step playback delay presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Speed {
    Fast,
    Normal,
    Slow,
}

impl Speed {
    pub fn delay(self) -> Duration {
        match self {
            Speed::Fast => Duration::from_millis(400),
            Speed::Normal => Duration::from_millis(800),
            Speed::Slow => Duration::from_millis(1200),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Heaviest weight accepted for a new person.
    pub max_weight: f64,
    #[serde(with = "millis")]
    pub step_delay: Duration,
    pub verbosity: Verbosity,
    /// Size of the generated starting roster.
    pub initial_people: usize,
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_weight: 500.0,
            step_delay: Speed::Normal.delay(),
            verbosity: Verbosity::default(),
            initial_people: 30,
            seed: 0x5eed,
        }
    }
}

impl Config {
    pub fn from_json(s: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_weight.is_finite() || self.max_weight < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "max_weight must be finite and at least 1, got {}",
                self.max_weight
            )));
        }
        if self.step_delay.is_zero() {
            return Err(Error::InvalidConfig("step_delay must be non-zero".into()));
        }
        Ok(())
    }

    pub fn with_speed(mut self, speed: Speed) -> Self {
        self.step_delay = speed.delay();
        self
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(d.as_millis() as u64)
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.max_weight, 500.0);
        assert_eq!(config.step_delay, Duration::from_millis(800));
        assert_eq!(config.verbosity, Verbosity::Detailed);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = Config::from_json(r#"{"step_delay": 400, "verbosity": "compact"}"#).unwrap();
        assert_eq!(config.step_delay, Speed::Fast.delay());
        assert_eq!(config.verbosity, Verbosity::Compact);
        assert_eq!(config.initial_people, 30);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_json(r#"{"max_weight": -1}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"max_weight": 0.5}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"step_delay": 0}"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            Config::from_json(r#"{"colour": "red"}"#),
            Err(Error::Json(_))
        ));
    }
}
