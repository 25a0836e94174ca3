//! Wire types for the gym state endpoint.
//!
//! The server answers `GET /gyms[?after=<timestamp>]` with a [`GymsResponse`]
//! encoded as JSON. Everything the watcher knows about a gym flows through
//! [`GymRecord`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Points required to reach each level above 1.
pub const LEVEL_THRESHOLDS: [i64; 9] = [2000, 4000, 8000, 12000, 16000, 20000, 30000, 40000, 50000];

/// Factions that can control a gym.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Team {
    Neutral,
    Mystic,
    Valor,
    Instinct,
}

impl Team {
    pub const ALL: [Team; 4] = [Team::Neutral, Team::Mystic, Team::Valor, Team::Instinct];

    /// Maps a raw team id to a team. Ids outside `0..=3` are unrecognized.
    pub fn from_id(id: i64) -> Option<Self> {
        match id {
            0 => Some(Team::Neutral),
            1 => Some(Team::Mystic),
            2 => Some(Team::Valor),
            3 => Some(Team::Instinct),
            _ => None,
        }
    }

    pub fn id(self) -> i64 {
        match self {
            Team::Neutral => 0,
            Team::Mystic => 1,
            Team::Valor => 2,
            Team::Instinct => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Team::Neutral => "Neutral",
            Team::Mystic => "Mystic",
            Team::Valor => "Valor",
            Team::Instinct => "Instinct",
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Raw team identifier as reported by the server.
///
/// Kept as the raw integer so that unrecognized values survive decoding and
/// can be compared like any other id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub i64);

impl TeamId {
    pub const NEUTRAL: TeamId = TeamId(0);

    pub fn team(self) -> Option<Team> {
        Team::from_id(self.0)
    }

    pub fn is_neutral(self) -> bool {
        self == Self::NEUTRAL
    }
}

impl From<Team> for TeamId {
    fn from(team: Team) -> Self {
        TeamId(team.id())
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.team() {
            Some(team) => write!(f, "{}", team),
            None => write!(f, "Equipo {}", self.0),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GymRecord {
    pub id: String,
    pub name: String,
    pub team_id: TeamId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    pub gym_points: i64,
    pub members_count: i64,
    pub latitude: f64,
    pub longitude: f64,
}

impl GymRecord {
    /// Level reported by the server, or derived from the points when absent.
    pub fn effective_level(&self) -> u32 {
        self.level.unwrap_or_else(|| level_for_points(self.gym_points))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GymsResponse {
    pub timestamp: i64,
    #[serde(default)]
    pub gyms: Vec<GymRecord>,
}

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("failed to decode gyms response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub fn level_for_points(points: i64) -> u32 {
    let reached = LEVEL_THRESHOLDS
        .iter()
        .take_while(|threshold| points >= **threshold)
        .count();
    1 + reached as u32
}

pub fn decode_response_json(data: &str) -> Result<GymsResponse, ProtoError> {
    Ok(serde_json::from_str(data)?)
}

pub fn encode_response_json(response: &GymsResponse) -> serde_json::Result<String> {
    serde_json::to_string(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "timestamp": 1469872800,
        "gyms": [
            {
                "id": "a1b2",
                "name": "Praza do Obradoiro",
                "team_id": 2,
                "level": 3,
                "gym_points": 4500,
                "members_count": 3,
                "latitude": 42.880596,
                "longitude": -8.545669,
                "description": "ignored"
            },
            {
                "id": "c3d4",
                "name": "Alameda",
                "team_id": 9,
                "gym_points": 12000,
                "members_count": 5,
                "latitude": 42.877,
                "longitude": -8.548
            }
        ]
    }"#;

    #[test]
    fn decodes_sample_response() {
        let response = decode_response_json(SAMPLE).expect("sample decodes");
        assert_eq!(response.timestamp, 1469872800);
        assert_eq!(response.gyms.len(), 2);

        let first = &response.gyms[0];
        assert_eq!(first.team_id.team(), Some(Team::Valor));
        assert_eq!(first.effective_level(), 3);

        let second = &response.gyms[1];
        assert_eq!(second.team_id.team(), None);
        assert_eq!(second.level, None);
        assert_eq!(second.effective_level(), 5);
    }

    #[test]
    fn missing_gyms_defaults_to_empty() {
        let response = decode_response_json(r#"{"timestamp": 0}"#).expect("decodes");
        assert!(response.gyms.is_empty());
    }

    #[test]
    fn rejects_malformed_payload() {
        assert!(decode_response_json(r#"{"gyms": []}"#).is_err());
        assert!(decode_response_json("not json").is_err());
    }

    #[test]
    fn team_ids_round_trip_through_enum() {
        for team in Team::ALL {
            assert_eq!(Team::from_id(team.id()), Some(team));
        }
        assert_eq!(Team::from_id(-1), None);
        assert_eq!(Team::from_id(4), None);
    }

    #[test]
    fn unrecognized_team_label() {
        assert_eq!(TeamId(1).to_string(), "Mystic");
        assert_eq!(TeamId(7).to_string(), "Equipo 7");
        assert!(TeamId(0).is_neutral());
    }

    #[test]
    fn level_table_boundaries() {
        assert_eq!(level_for_points(0), 1);
        assert_eq!(level_for_points(1999), 1);
        assert_eq!(level_for_points(2000), 2);
        assert_eq!(level_for_points(7999), 3);
        assert_eq!(level_for_points(8000), 4);
        assert_eq!(level_for_points(49_999), 9);
        assert_eq!(level_for_points(50_000), 10);
        assert_eq!(level_for_points(1_000_000), 10);
    }
}
