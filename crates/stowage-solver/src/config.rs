// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Solver configuration.
//!
//! `SolverConfig` is plain data with serde support, so applications can embed
//! it in their own settings. Every field has a default; an empty object
//! deserializes to `SolverConfig::default()`.

use crate::error::SolverConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use stowage_bnb::precheck::DEFAULT_SIEVE_LIMIT;

/// Which location is decided at which depth of the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationOrder {
    /// Model declaration order.
    #[default]
    Declared,
    /// Descending demand, ties in declaration order.
    LargestDemandFirst,
}

impl LocationOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            LocationOrder::Declared => "declared",
            LocationOrder::LargestDemandFirst => "largest_demand_first",
        }
    }
}

impl std::fmt::Display for LocationOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Budgets and strategy for one `AllocationSolver`.
///
/// Limits apply per material, not to the whole solve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Maximum nodes explored per material.
    pub node_limit: Option<u64>,
    /// Wall-clock budget per material in milliseconds.
    pub time_limit_ms: Option<u64>,
    /// Solve materials on scoped worker threads.
    pub parallel: bool,
    pub location_order: LocationOrder,
    /// Largest demand for which the exact representability table is built.
    pub sieve_limit: u64,
    /// Attach a progress `LogMonitor` to every search.
    pub log_progress: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            node_limit: None,
            time_limit_ms: None,
            parallel: true,
            location_order: LocationOrder::default(),
            sieve_limit: DEFAULT_SIEVE_LIMIT as u64,
            log_progress: false,
        }
    }
}

impl SolverConfig {
    /// Checks the configuration for values the solver cannot honor.
    ///
    /// # Errors
    ///
    /// Returns the first `SolverConfigError` found.
    pub fn validate(&self) -> Result<(), SolverConfigError> {
        if self.node_limit == Some(0) {
            return Err(SolverConfigError::ZeroNodeLimit);
        }
        if self.time_limit_ms == Some(0) {
            return Err(SolverConfigError::ZeroTimeLimit);
        }
        self.sieve_limit_usize().map(|_| ())
    }

    #[inline]
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    /// The sieve limit as a table length.
    pub fn sieve_limit_usize(&self) -> Result<usize, SolverConfigError> {
        if self.sieve_limit == 0 {
            return Err(SolverConfigError::ZeroSieveLimit);
        }
        usize::try_from(self.sieve_limit)
            .map_err(|_| SolverConfigError::SieveLimitTooLarge(self.sieve_limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_yields_defaults() {
        let config: SolverConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, SolverConfig::default());
        assert!(config.parallel);
        assert_eq!(config.sieve_limit, 1 << 20);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_partial_object_overrides_fields() {
        let json = r#"{
            "node_limit": 5000,
            "time_limit_ms": 250,
            "parallel": false,
            "location_order": "largest_demand_first"
        }"#;
        let config: SolverConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.node_limit, Some(5000));
        assert_eq!(config.time_limit(), Some(Duration::from_millis(250)));
        assert!(!config.parallel);
        assert_eq!(config.location_order, LocationOrder::LargestDemandFirst);
        assert!(!config.log_progress);
    }

    #[test]
    fn test_unknown_location_order_is_rejected() {
        let result = serde_json::from_str::<SolverConfig>(r#"{"location_order": "random"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialization_round_trip_keeps_snake_case() {
        let config = SolverConfig {
            location_order: LocationOrder::LargestDemandFirst,
            ..SolverConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"largest_demand_first\""));
        assert_eq!(serde_json::from_str::<SolverConfig>(&json).unwrap(), config);
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let config = SolverConfig {
            node_limit: Some(0),
            ..SolverConfig::default()
        };
        assert_eq!(config.validate(), Err(SolverConfigError::ZeroNodeLimit));

        let config = SolverConfig {
            time_limit_ms: Some(0),
            ..SolverConfig::default()
        };
        assert_eq!(config.validate(), Err(SolverConfigError::ZeroTimeLimit));

        let config = SolverConfig {
            sieve_limit: 0,
            ..SolverConfig::default()
        };
        assert_eq!(config.validate(), Err(SolverConfigError::ZeroSieveLimit));
    }

    #[test]
    fn test_location_order_display() {
        assert_eq!(LocationOrder::Declared.to_string(), "declared");
        assert_eq!(
            LocationOrder::LargestDemandFirst.to_string(),
            "largest_demand_first"
        );
    }
}
