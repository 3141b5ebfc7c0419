// Copyright 2025 the Flexcut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by [`perforate`](crate::perforate).

use core::fmt;

/// A [`PerforationConfig`](crate::PerforationConfig) value that cannot be used.
///
/// Each variant carries the rejected value. Lengths and the flattening
/// tolerance must be strictly positive and finite.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum ConfigError {
    /// The cut length was zero, negative or not finite.
    CutLength(f64),
    /// The bridge length was zero, negative or not finite.
    BridgeLength(f64),
    /// The relative flattening tolerance was zero, negative or not finite.
    Tolerance(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::CutLength(value) => {
                write!(f, "cut length must be positive and finite, got {value}")
            }
            ConfigError::BridgeLength(value) => {
                write!(f, "bridge length must be positive and finite, got {value}")
            }
            ConfigError::Tolerance(value) => {
                write!(f, "flattening tolerance must be positive and finite, got {value}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

/// A [`Path`](crate::Path) that cannot be perforated.
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum InvalidPathError {
    /// The path has no segments.
    Empty,
    /// The segment at `index` has a NaN or infinite coordinate.
    NonFinite {
        /// Index of the offending segment.
        index: usize,
    },
    /// The segment at `index` does not start where the previous one ends.
    Discontinuity {
        /// Index of the segment whose start point is off.
        index: usize,
        /// Distance between the previous end point and this start point.
        gap: f64,
    },
    /// The path's extent or arc length is too large to represent as a
    /// finite `f64`.
    Overflow,
}

impl fmt::Display for InvalidPathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidPathError::Empty => write!(f, "path has no segments"),
            InvalidPathError::NonFinite { index } => {
                write!(f, "segment {index} has a non-finite coordinate")
            }
            InvalidPathError::Discontinuity { index, gap } => {
                write!(f, "segment {index} starts {gap} away from the previous end point")
            }
            InvalidPathError::Overflow => write!(f, "path length overflows"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidPathError {}

/// Any error returned by [`perforate`](crate::perforate).
#[derive(Clone, Copy, Debug, PartialEq)]
#[non_exhaustive]
pub enum PerforateError {
    /// The configuration was rejected.
    Config(ConfigError),
    /// The path was rejected.
    InvalidPath(InvalidPathError),
}

impl From<ConfigError> for PerforateError {
    fn from(err: ConfigError) -> Self {
        PerforateError::Config(err)
    }
}

impl From<InvalidPathError> for PerforateError {
    fn from(err: InvalidPathError) -> Self {
        PerforateError::InvalidPath(err)
    }
}

impl fmt::Display for PerforateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerforateError::Config(err) => write!(f, "invalid perforation config: {err}"),
            PerforateError::InvalidPath(err) => write!(f, "invalid path: {err}"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PerforateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PerforateError::Config(err) => Some(err),
            PerforateError::InvalidPath(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(
            ConfigError::CutLength(0.0).to_string(),
            "cut length must be positive and finite, got 0"
        );
        let err = PerforateError::from(InvalidPathError::Discontinuity { index: 2, gap: 0.5 });
        assert_eq!(
            err.to_string(),
            "invalid path: segment 2 starts 0.5 away from the previous end point"
        );
        assert_eq!(
            InvalidPathError::Overflow.to_string(),
            "path length overflows"
        );
    }

    #[cfg(feature = "std")]
    #[test]
    fn source_chain() {
        use std::error::Error;

        let err = PerforateError::from(ConfigError::BridgeLength(-1.0));
        let source = err.source().map(ToString::to_string);
        assert_eq!(
            source.as_deref(),
            Some("bridge length must be positive and finite, got -1")
        );
    }
}
