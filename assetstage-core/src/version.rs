//! Unity editor versions
//!
//! Versions look like `2019.4.3f1`: major, minor, build, then an optional
//! release-type letter (`a`, `b`, `f`, `p`, ...) and release number.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid Unity version '{0}'")]
    Invalid(String),
}

/// A parsed Unity version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct UnityVersion {
    pub major: u16,
    pub minor: u16,
    pub build: u16,
    pub release_type: Option<char>,
    pub release_number: u16,
}

impl UnityVersion {
    pub const fn new(major: u16, minor: u16, build: u16) -> Self {
        Self {
            major,
            minor,
            build,
            release_type: None,
            release_number: 0,
        }
    }

    /// True if this version is `major.minor` or newer
    pub fn is_greater_equal(&self, major: u16, minor: u16) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl Ord for UnityVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor, self.build)
            .cmp(&(other.major, other.minor, other.build))
            .then_with(|| release_rank(self.release_type).cmp(&release_rank(other.release_type)))
            .then_with(|| self.release_number.cmp(&other.release_number))
    }
}

impl PartialOrd for UnityVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Alpha < beta < china < final < patch; unknown letters sort with final
fn release_rank(release_type: Option<char>) -> u8 {
    match release_type {
        Some('a') => 0,
        Some('b') => 1,
        Some('c') => 2,
        Some('p') => 4,
        Some('x') => 5,
        _ => 3,
    }
}

impl FromStr for UnityVersion {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || VersionError::Invalid(s.to_string());
        let trimmed = s.trim();

        let mut parts = trimmed.splitn(3, '.');
        let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        let minor = match parts.next() {
            Some(p) => p.parse().map_err(|_| invalid())?,
            None => 0,
        };

        let (build, release_type, release_number) = match parts.next() {
            None => (0, None, 0),
            Some(rest) => {
                let digits_end = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
                let build = rest[..digits_end].parse().map_err(|_| invalid())?;
                let tail = &rest[digits_end..];
                let mut chars = tail.chars();
                match chars.next() {
                    None => (build, None, 0),
                    Some(letter) if letter.is_ascii_alphabetic() => {
                        let number = chars.as_str();
                        let number = if number.is_empty() {
                            0
                        } else {
                            number.parse().map_err(|_| invalid())?
                        };
                        (build, Some(letter), number)
                    }
                    Some(_) => return Err(invalid()),
                }
            }
        };

        Ok(Self {
            major,
            minor,
            build,
            release_type,
            release_number,
        })
    }
}

impl fmt::Display for UnityVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.build)?;
        if let Some(letter) = self.release_type {
            write!(f, "{}{}", letter, self.release_number)?;
        }
        Ok(())
    }
}

impl Serialize for UnityVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for UnityVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_version() {
        let version: UnityVersion = "2019.4.3f1".parse().unwrap();
        assert_eq!(version.major, 2019);
        assert_eq!(version.minor, 4);
        assert_eq!(version.build, 3);
        assert_eq!(version.release_type, Some('f'));
        assert_eq!(version.release_number, 1);
        assert_eq!(version.to_string(), "2019.4.3f1");
    }

    #[test]
    fn test_parse_short_versions() {
        assert_eq!("2017.3".parse::<UnityVersion>().unwrap(), UnityVersion::new(2017, 3, 0));
        assert_eq!("5".parse::<UnityVersion>().unwrap(), UnityVersion::new(5, 0, 0));
    }

    #[test]
    fn test_parse_invalid() {
        assert!("".parse::<UnityVersion>().is_err());
        assert!("abc".parse::<UnityVersion>().is_err());
        assert!("2019.x".parse::<UnityVersion>().is_err());
        assert!("2019.4.3f".parse::<UnityVersion>().is_ok());
        assert!("2019.4.3-1".parse::<UnityVersion>().is_err());
    }

    #[test]
    fn test_is_greater_equal() {
        let old: UnityVersion = "2017.2.5f1".parse().unwrap();
        let exact: UnityVersion = "2017.3.0b1".parse().unwrap();
        let new: UnityVersion = "2018.1.0f2".parse().unwrap();

        assert!(!old.is_greater_equal(2017, 3));
        assert!(exact.is_greater_equal(2017, 3));
        assert!(new.is_greater_equal(2017, 3));
    }

    #[test]
    fn test_ordering() {
        let beta: UnityVersion = "2020.1.0b5".parse().unwrap();
        let final_: UnityVersion = "2020.1.0f1".parse().unwrap();
        let patch: UnityVersion = "2020.1.0p1".parse().unwrap();
        assert!(beta < final_);
        assert!(final_ < patch);
        assert!(patch < "2020.1.1f1".parse().unwrap());
    }

    #[test]
    fn test_serde_as_string() {
        let version: UnityVersion = serde_json::from_str("\"2021.3.0f1\"").unwrap();
        assert_eq!(version, "2021.3.0f1".parse().unwrap());
        assert_eq!(serde_json::to_string(&version).unwrap(), "\"2021.3.0f1\"");
    }
}
