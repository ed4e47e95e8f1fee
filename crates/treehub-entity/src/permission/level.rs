//! Access levels and derived roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use treehub_core::AppError;

/// The level a grant confers on a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessLevel {
    /// May list and download.
    Read,
    /// May upload and modify.
    Write,
    /// Both of the above.
    ReadWrite,
}

impl AccessLevel {
    /// All levels, in reporting precedence order.
    pub const ALL: [AccessLevel; 3] = [Self::Read, Self::Write, Self::ReadWrite];

    /// Return the level as its contract string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::ReadWrite => "readWrite",
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AccessLevel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "read" => Ok(Self::Read),
            "write" => Ok(Self::Write),
            "readwrite" => Ok(Self::ReadWrite),
            _ => Err(AppError::validation(format!(
                "Invalid access level: '{s}'"
            ))),
        }
    }
}

/// A user's role on a folder, derived from the grant sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// Holds a `read` grant.
    Read,
    /// Holds a `write` grant.
    Write,
    /// Holds a `readWrite` grant.
    ReadWrite,
    /// Holds no grant.
    None,
}

impl Role {
    /// Return the role as its contract string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Write => "write",
            Self::ReadWrite => "readWrite",
            Self::None => "none",
        }
    }
}

impl From<AccessLevel> for Role {
    fn from(level: AccessLevel) -> Self {
        match level {
            AccessLevel::Read => Self::Read,
            AccessLevel::Write => Self::Write,
            AccessLevel::ReadWrite => Self::ReadWrite,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_parsing() {
        assert_eq!("read".parse::<AccessLevel>().unwrap(), AccessLevel::Read);
        assert_eq!(
            "readWrite".parse::<AccessLevel>().unwrap(),
            AccessLevel::ReadWrite
        );
        assert_eq!(
            "read-write".parse::<AccessLevel>().unwrap(),
            AccessLevel::ReadWrite
        );
        assert!("owner".parse::<AccessLevel>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&AccessLevel::ReadWrite).unwrap(),
            "\"readWrite\""
        );
        assert_eq!(serde_json::to_string(&Role::None).unwrap(), "\"none\"");
    }
}
