//! Election types and their default voting behaviour.

use serde::Serialize;
use std::fmt;

/// Kind of election, stored as text in `elections.type`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ElectionType {
    Leadership,
    Board,
    Initiative,
}

/// Values an election inherits when its own column is null.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeDefaults {
    pub enable_separate_voting_periods: bool,
    pub show_unopposed_status: bool,
    pub typical_duration_days: i64,
}

/// Stored type string matched none of the known election types.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownElectionType(pub String);

impl fmt::Display for UnknownElectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown election type '{}'", self.0)
    }
}

impl std::error::Error for UnknownElectionType {}

impl ElectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Leadership => "leadership",
            Self::Board => "board",
            Self::Initiative => "initiative",
        }
    }

    pub fn parse(s: &str) -> Result<Self, UnknownElectionType> {
        match s {
            "leadership" => Ok(Self::Leadership),
            "board" => Ok(Self::Board),
            "initiative" => Ok(Self::Initiative),
            other => Err(UnknownElectionType(other.to_string())),
        }
    }

    pub fn defaults(&self) -> TypeDefaults {
        match self {
            Self::Leadership => TypeDefaults {
                enable_separate_voting_periods: true,
                show_unopposed_status: true,
                typical_duration_days: 14,
            },
            Self::Board => TypeDefaults {
                enable_separate_voting_periods: true,
                show_unopposed_status: true,
                typical_duration_days: 10,
            },
            Self::Initiative => TypeDefaults {
                enable_separate_voting_periods: false,
                show_unopposed_status: false,
                typical_duration_days: 21,
            },
        }
    }
}

impl fmt::Display for ElectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
