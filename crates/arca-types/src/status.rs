use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Lifecycle status of a version.
///
/// The only transition is `Used` → `Deleted`. A deleted version stays in its
/// chain and can still be addressed by uuid, number, or tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    #[serde(rename = "USED")]
    Used,
    #[serde(rename = "DELETED")]
    Deleted,
}

impl Status {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Used => "USED",
            Self::Deleted => "DELETED",
        }
    }

    pub const fn is_used(&self) -> bool {
        matches!(self, Self::Used)
    }
}

impl FromStr for Status {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USED" => Ok(Self::Used),
            "DELETED" => Ok(Self::Deleted),
            other => Err(TypeError::UnknownStatus(other.to_string())),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_values() {
        assert_eq!("USED".parse::<Status>().unwrap(), Status::Used);
        assert_eq!("DELETED".parse::<Status>().unwrap(), Status::Deleted);
    }

    #[test]
    fn unknown_value_is_an_error() {
        let err = "used".parse::<Status>().unwrap_err();
        assert_eq!(err, TypeError::UnknownStatus("used".into()));
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_string(&Status::Deleted).unwrap(), "\"DELETED\"");
    }
}
