use serde::{Deserialize, Serialize};
use std::fmt;

/// Booking status of a game.
///
/// Games on managed fields start `Pending` until the field's manager acts;
/// games on public fields are `Approved` at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Pending,
    Approved,
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GameStatus {
    /// Convert from database string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

/// Status of a user's participation in a game.
///
/// No row for a (game, user) pair means "not associated". Only `Approved`
/// rows count against a game's capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticipantStatus {
    Pending,
    Approved,
    Declined,
    Rejected,
}

impl fmt::Display for ParticipantStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ParticipantStatus {
    /// Convert from database string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "declined" => Some(Self::Declined),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Declined => "declined",
            Self::Rejected => "rejected",
        }
    }
}

/// Status of a friend relation. Rejection deletes the row, so no terminal
/// rejected state is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FriendStatus {
    Pending,
    Approved,
}

impl FriendStatus {
    /// Convert from database string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }
}

/// Supported sports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameType {
    Football,
    Basketball,
}

impl GameType {
    /// Convert from database string representation
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "football" => Some(Self::Football),
            "basketball" => Some(Self::Basketball),
            _ => None,
        }
    }

    /// Convert to database string representation
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Football => "football",
            Self::Basketball => "basketball",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_status_round_trip() {
        assert_eq!(GameStatus::from_str("pending"), Some(GameStatus::Pending));
        assert_eq!(GameStatus::from_str("APPROVED"), Some(GameStatus::Approved));
        assert_eq!(GameStatus::from_str("done"), None);
        assert_eq!(GameStatus::Pending.as_str(), "pending");
    }

    #[test]
    fn test_participant_status_from_str() {
        assert_eq!(
            ParticipantStatus::from_str("declined"),
            Some(ParticipantStatus::Declined)
        );
        assert_eq!(
            ParticipantStatus::from_str("Rejected"),
            Some(ParticipantStatus::Rejected)
        );
        assert_eq!(ParticipantStatus::from_str("maybe"), None);
    }

    #[test]
    fn test_game_type_from_str() {
        assert_eq!(GameType::from_str("football"), Some(GameType::Football));
        assert_eq!(GameType::from_str("basketball"), Some(GameType::Basketball));
        assert_eq!(GameType::from_str("cricket"), None);
    }
}
