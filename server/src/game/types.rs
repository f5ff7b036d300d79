use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Tier stored for members without a ranked solo-queue entry.
pub const UNRANKED: &str = "UNRANKED";

/// Which team won a match, or `Pending` while the result is unknown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum WinSide {
    #[default]
    Pending,
    Blue,
    Red,
}

/// Which team a participant played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TeamSide {
    Blue,
    Red,
}

impl WinSide {
    pub fn as_str(self) -> &'static str {
        match self {
            WinSide::Pending => "PENDING",
            WinSide::Blue => "BLUE",
            WinSide::Red => "RED",
        }
    }

    /// A match is completed once its win-side is anything but `Pending`.
    pub fn is_completed(self) -> bool {
        self != WinSide::Pending
    }

    pub fn winner(self) -> Option<TeamSide> {
        match self {
            WinSide::Pending => None,
            WinSide::Blue => Some(TeamSide::Blue),
            WinSide::Red => Some(TeamSide::Red),
        }
    }
}

impl TeamSide {
    pub fn as_str(self) -> &'static str {
        match self {
            TeamSide::Blue => "BLUE",
            TeamSide::Red => "RED",
        }
    }
}

impl From<TeamSide> for WinSide {
    fn from(side: TeamSide) -> Self {
        match side {
            TeamSide::Blue => WinSide::Blue,
            TeamSide::Red => WinSide::Red,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown side `{0}`")]
pub struct ParseSideError(pub String);

impl FromStr for WinSide {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => Ok(WinSide::Pending),
            "BLUE" => Ok(WinSide::Blue),
            "RED" => Ok(WinSide::Red),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

impl FromStr for TeamSide {
    type Err = ParseSideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "BLUE" => Ok(TeamSide::Blue),
            "RED" => Ok(TeamSide::Red),
            _ => Err(ParseSideError(s.to_string())),
        }
    }
}

impl fmt::Display for WinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One registered player on the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    pub id: Uuid,
    pub name: String,
    /// Verified handle, `gameName#tagLine`.
    pub riot_id: String,
    pub riot_puuid: String,
    pub tier: String,
    pub created_at: DateTime<Utc>,
}

/// Member data as produced by registration, before it has an identity.
#[derive(Debug, Clone)]
pub struct NewMember {
    pub name: String,
    pub riot_id: String,
    pub riot_puuid: String,
    pub tier: String,
}

/// A member's seat in one match. Refers to its match by id only.
#[derive(Debug, Clone, PartialEq)]
pub struct Participation {
    pub id: Uuid,
    pub match_id: Uuid,
    pub member_id: Uuid,
    pub team_side: TeamSide,
    /// Always `win_side == team_side` for the owning match.
    pub win: bool,
    pub position: Option<String>,
    pub champion_name: Option<String>,
}

/// A played (or scheduled) game together with every participation it owns.
#[derive(Debug, Clone, PartialEq)]
pub struct Match {
    pub id: Uuid,
    pub played_at: DateTime<Utc>,
    pub info: Option<String>,
    pub win_side: WinSide,
    pub participations: Vec<Participation>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A participation in a non-pending match, as seen by the aggregator.
///
/// `win` is optional because rows imported before the column became
/// mandatory may carry NULL.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedParticipation {
    pub participation_id: Uuid,
    pub match_id: Uuid,
    pub win_side: WinSide,
    pub team_side: TeamSide,
    pub win: Option<bool>,
}

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMatchRequest {
    #[serde(default, deserialize_with = "played_at::deserialize")]
    pub played_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub info: Option<String>,
    /// Usually omitted; a `BLUE`/`RED` value records the result right away.
    #[serde(default)]
    pub win_side: Option<WinSide>,
    pub players: Vec<ParticipantRequest>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRequest {
    pub member_id: Uuid,
    pub team_side: TeamSide,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub champion_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultRequest {
    #[serde(default)]
    pub win_side: Option<WinSide>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMemberRequest {
    pub name: String,
    pub game_name: String,
    pub tag_line: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBalanceRequest {
    pub member_ids: Vec<Uuid>,
}

/// Accepts RFC 3339 timestamps as well as the zone-less
/// `YYYY-MM-DDTHH:MM[:SS]` a browser `datetime-local` input sends (read as UTC).
mod played_at {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    pub fn deserialize<'de, D>(de: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(raw) = Option::<String>::deserialize(de)? else {
            return Ok(None);
        };
        if let Ok(dt) = DateTime::parse_from_rfc3339(&raw) {
            return Ok(Some(dt.with_timezone(&Utc)));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(&raw, fmt).ok())
            .map(|naive| Some(naive.and_utc()))
            .ok_or_else(|| D::Error::custom(format!("invalid playedAt `{raw}`")))
    }
}
