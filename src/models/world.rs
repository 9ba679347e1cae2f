use serde::{Deserialize, Serialize};

use super::{FinderError, Player, Result};

/// Worlds offered by the picker. Requests always use the lower-cased name.
pub const WORLDS: &[&str] = &[
    "Aethera", "Antica", "Astera", "Belobra", "Blumera", "Bona", "Bravoria",
    "Calmera", "Cantabra", "Celebra", "Celesta", "Citra", "Collabra", "Descubra",
    "Dia", "Dracobra", "Eclipta", "Epoca", "Escura", "Etebra", "Ferobra",
    "Firmera", "Gentebra", "Gladera", "Gladibra", "Harmonia", "Havera", "Honbra",
    "Hostera", "Idyllia", "Ignitera", "Inabra", "Issobra", "Jadebra", "Kalanta",
    "Kalibra", "Kalimera", "Karmeya", "Lobera", "Luminera", "Lutabra", "Luzibra",
    "Menera", "Monstera", "Monza", "Mystera", "Nefera", "Nevia", "Noctalia",
    "Oceanis", "Ombra", "Ourobra", "Pacera", "Peloria", "Penumbra", "Premia",
    "Quelibra", "Quidera", "Quintera", "Rasteibra", "Refugia", "Retalia", "Secura",
    "Serdebra", "Solidera", "Sombra", "Sonira", "Stralis", "Talera", "Tempestera",
    "Terribra", "Thyria", "Tornabra", "Unebra", "Ustebra", "Venebra", "Victoris",
    "Vunira", "Wintera", "Xybra", "Xyla", "Xymera", "Yonabra", "Yovera", "Yubra",
    "Zuna", "Zunera",
];

/// Case-insensitive lookup returning the canonical spelling.
pub fn find_world(name: &str) -> Option<&'static str> {
    let name = name.trim();
    WORLDS
        .iter()
        .copied()
        .find(|world| world.eq_ignore_ascii_case(name))
}

/// Body of `GET /world/{name}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldResponse {
    pub world: WorldData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub players_online: Option<u32>,
    #[serde(default)]
    pub online_players: Option<Vec<Player>>,
}

impl WorldResponse {
    /// Online roster. A body without the `online_players` list is malformed;
    /// an empty world still sends `[]`.
    pub fn into_players(self) -> Result<Vec<Player>> {
        self.world.online_players.ok_or_else(|| {
            FinderError::MalformedResponse("online_players missing from world data".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_world() {
        assert_eq!(find_world("antica"), Some("Antica"));
        assert_eq!(find_world(" ZUNERA "), Some("Zunera"));
        assert_eq!(find_world("Atlantis"), None);
    }

    #[test]
    fn test_world_list_is_sorted_and_unique() {
        let mut sorted = WORLDS.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, WORLDS.to_vec());
    }

    #[test]
    fn test_parse_world_response() {
        let body = r#"{
            "world": {
                "name": "Antica",
                "players_online": 2,
                "online_players": [
                    {"name": "Alpha", "level": 120, "vocation": "Elite Knight"},
                    {"name": "Beta", "level": 8, "vocation": "None"}
                ]
            },
            "information": {"api": {"version": 4}}
        }"#;

        let response: WorldResponse = serde_json::from_str(body).unwrap();
        let players = response.into_players().unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0], Player::new("Alpha", 120, "Elite Knight"));
    }

    #[test]
    fn test_missing_online_players_is_malformed() {
        for body in [
            r#"{"world": {"name": "Dia", "online_players": null}}"#,
            r#"{"world": {"name": "Antica"}}"#,
        ] {
            let response: WorldResponse = serde_json::from_str(body).unwrap();
            assert!(matches!(
                response.into_players(),
                Err(FinderError::MalformedResponse(_))
            ));
        }
    }

    #[test]
    fn test_empty_world_is_not_malformed() {
        let response: WorldResponse =
            serde_json::from_str(r#"{"world": {"name": "Dia", "online_players": []}}"#).unwrap();
        assert!(response.into_players().unwrap().is_empty());
    }

    #[test]
    fn test_missing_world_is_rejected() {
        let parsed = serde_json::from_str::<WorldResponse>(r#"{"information": {}}"#);
        assert!(parsed.is_err());
    }
}
