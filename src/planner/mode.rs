use crate::MothballError;
use std::fmt;
use std::str::FromStr;

/// How a run decides which message ids to visit
///
/// The reverse modes walk the id space downward, which is how a group with
/// an existing partial archive is extended back toward message 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveMode {
    /// Extend the frontier: scan from the highest archived id + 1 upward.
    /// Holes below the frontier are assumed permanent and are not revisited.
    Update,
    /// Scan the whole id space upward, skipping ids already archived.
    Retry,
    /// Delete the group's archive and scan the whole id space from 1.
    Restart,
    /// Extend backward: scan from the lowest archived id - 1 down to 1.
    ReverseUpdate,
    /// Scan the whole id space downward, skipping ids already archived.
    ReverseRetry,
}

impl ArchiveMode {
    /// True for the modes that walk the id space downward
    pub fn is_descending(&self) -> bool {
        matches!(self, Self::ReverseUpdate | Self::ReverseRetry)
    }
}

impl FromStr for ArchiveMode {
    type Err = MothballError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "update" => Ok(Self::Update),
            "retry" => Ok(Self::Retry),
            "restart" => Ok(Self::Restart),
            "reverse-update" => Ok(Self::ReverseUpdate),
            "reverse-retry" => Ok(Self::ReverseRetry),
            other => Err(MothballError::InvalidMode {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for ArchiveMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Update => "update",
            Self::Retry => "retry",
            Self::Restart => "restart",
            Self::ReverseUpdate => "reverse-update",
            Self::ReverseRetry => "reverse-retry",
        };
        f.write_str(name)
    }
}
