//! Reducer policies and output settings.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// What to do when a whole track spans zero seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ZeroDurationPolicy {
    /// Fail with `ReduceError::DegenerateDuration`.
    #[default]
    Reject,
    /// Report an average speed of zero.
    ZeroSpeed,
}

/// How to treat a point whose timestamp is earlier than the previous one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OrderingPolicy {
    /// Fail with `ReduceError::InvalidPoint`.
    #[default]
    Strict,
    /// Accept the point and report zero speed for the leg.
    Tolerant,
}

/// Shape of the JSON written for reduced activities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// `reportHistory` envelope with comma-joined point strings.
    #[default]
    Legacy,
    /// Snake-case fields with structured points.
    Clean,
}

/// Configuration for a [`TrackReducer`](crate::reducer::TrackReducer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReduceOptions {
    pub zero_duration: ZeroDurationPolicy,
    pub ordering: OrderingPolicy,
}

impl ReduceOptions {
    pub fn with_zero_duration(mut self, policy: ZeroDurationPolicy) -> Self {
        self.zero_duration = policy;
        self
    }

    pub fn with_ordering(mut self, policy: OrderingPolicy) -> Self {
        self.ordering = policy;
        self
    }
}
