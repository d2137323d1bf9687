//! Dotted numeric version triples.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// An ordered (major, minor, patch) triple.
///
/// Parsed from a `major.minor.patch` string of non-negative integers and
/// immutable afterwards. The derived ordering is the lexicographic numeric
/// comparison of the three fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseVersionError {
    #[error("expected three dot-separated fields, got {0}")]
    FieldCount(usize),
    #[error("non-numeric version field '{0}'")]
    NotNumeric(String),
}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let fields: Vec<&str> = s.trim().split('.').collect();
        if fields.len() != 3 {
            return Err(ParseVersionError::FieldCount(fields.len()));
        }
        let number = |field: &str| {
            field
                .parse::<u32>()
                .map_err(|_| ParseVersionError::NotNumeric(field.to_string()))
        };
        Ok(Version {
            major: number(fields[0])?,
            minor: number(fields[1])?,
            patch: number(fields[2])?,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl Version {
    pub fn older_than(&self, other: Version) -> bool {
        *self < other
    }
}
