use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{FinderError, Result};

/// Houses listed on a character sheet before the rest are summarized.
pub const HOUSES_SHOWN: usize = 3;
/// Deaths listed on a character sheet.
pub const DEATHS_SHOWN: usize = 3;
/// A character whose last login is at most this old is reported online.
pub const ONLINE_THRESHOLD_MINUTES: i64 = 5;

/// Body of `GET /character/{name}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterResponse {
    #[serde(default)]
    pub character: Option<CharacterEnvelope>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterEnvelope {
    #[serde(default)]
    pub character: Option<CharacterInfo>,
    #[serde(default)]
    pub deaths: Option<Vec<Death>>,
    #[serde(default)]
    pub account_information: Option<AccountInformation>,
    #[serde(default)]
    pub other_characters: Option<Vec<OtherCharacter>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacterInfo {
    pub name: Option<String>,
    pub sex: Option<String>,
    pub level: Option<u32>,
    pub vocation: Option<String>,
    pub world: Option<String>,
    pub title: Option<String>,
    pub account_status: Option<String>,
    pub residence: Option<String>,
    pub last_login: Option<String>,
    pub achievement_points: Option<u32>,
    pub unlocked_titles: Option<u32>,
    pub guild: Option<Guild>,
    pub houses: Option<Vec<House>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Guild {
    pub name: Option<String>,
    pub rank: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct House {
    pub name: Option<String>,
    pub town: Option<String>,
    pub paid: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Death {
    pub level: Option<u32>,
    pub time: Option<String>,
    #[serde(default)]
    pub killers: Vec<Killer>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Killer {
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AccountInformation {
    pub created: Option<String>,
    pub loyalty_title: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OtherCharacter {
    pub name: Option<String>,
    pub world: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    Online,
    Offline,
    Unknown,
}

impl Presence {
    pub fn from_last_login(last_login: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Self {
        match last_login {
            Some(login) if now.signed_duration_since(login) <= Duration::minutes(ONLINE_THRESHOLD_MINUTES) => {
                Presence::Online
            }
            Some(_) => Presence::Offline,
            None => Presence::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Online => "Online",
            Presence::Offline => "Offline",
            Presence::Unknown => "Unknown",
        }
    }
}

/// First `cap` items of a list plus how many there were in total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capped<T> {
    pub shown: Vec<T>,
    pub total: usize,
}

impl<T> Capped<T> {
    pub fn new(items: Vec<T>, cap: usize) -> Self {
        let total = items.len();
        let shown = items.into_iter().take(cap).collect();
        Self { shown, total }
    }

    pub fn overflow(&self) -> usize {
        self.total.saturating_sub(self.shown.len())
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuildLine {
    pub name: String,
    pub rank: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseLine {
    pub name: String,
    pub town: String,
    pub paid_until: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathLine {
    pub level: Option<u32>,
    pub date: Option<NaiveDate>,
    pub killers: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountLine {
    pub created: Option<NaiveDate>,
    pub loyalty_title: Option<String>,
}

/// Display-ready view of a character lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    pub sex: Sex,
    pub level: Option<u32>,
    pub vocation: Option<String>,
    pub world: Option<String>,
    pub title: Option<String>,
    pub account_status: Option<String>,
    pub guild: Option<GuildLine>,
    pub houses: Capped<HouseLine>,
    pub deaths: Capped<DeathLine>,
    pub account: Option<AccountLine>,
    pub residence: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
    pub achievement_points: Option<u32>,
    pub unlocked_titles: Option<u32>,
    pub other_characters: usize,
    pub presence: Presence,
}

impl CharacterSheet {
    pub fn from_response(response: CharacterResponse, now: DateTime<Utc>) -> Result<Self> {
        Self::from_response_capped(response, now, HOUSES_SHOWN, DEATHS_SHOWN)
    }

    pub fn from_response_capped(
        response: CharacterResponse,
        now: DateTime<Utc>,
        houses_shown: usize,
        deaths_shown: usize,
    ) -> Result<Self> {
        let envelope = response.character.unwrap_or_default();
        let info = envelope.character.ok_or_else(|| {
            FinderError::MalformedResponse("character data not found in API response".to_string())
        })?;

        let guild = info.guild.and_then(|g| {
            g.name.filter(|n| !n.is_empty()).map(|name| GuildLine { name, rank: g.rank })
        });

        let houses = info
            .houses
            .unwrap_or_default()
            .into_iter()
            .map(|h| HouseLine {
                name: h.name.unwrap_or_default(),
                town: h.town.unwrap_or_default(),
                paid_until: h.paid.as_deref().and_then(parse_date),
            })
            .collect();

        let deaths = envelope
            .deaths
            .unwrap_or_default()
            .into_iter()
            .map(|d| DeathLine {
                level: d.level,
                date: d.time.as_deref().and_then(parse_date),
                killers: d
                    .killers
                    .iter()
                    .map(|k| k.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
            .collect();

        let account = envelope.account_information.map(|a| AccountLine {
            created: a.created.as_deref().and_then(parse_date),
            loyalty_title: a.loyalty_title.filter(|t| !t.is_empty()),
        });

        let last_login = info.last_login.as_deref().and_then(parse_timestamp);

        Ok(Self {
            name: info.name.unwrap_or_default(),
            sex: match info.sex.as_deref() {
                Some("female") => Sex::Female,
                _ => Sex::Male,
            },
            level: info.level,
            vocation: non_empty(info.vocation),
            world: non_empty(info.world),
            title: non_empty(info.title),
            account_status: non_empty(info.account_status),
            guild,
            houses: Capped::new(houses, houses_shown),
            deaths: Capped::new(deaths, deaths_shown),
            account,
            residence: non_empty(info.residence),
            last_login,
            achievement_points: info.achievement_points,
            unlocked_titles: info.unlocked_titles,
            other_characters: envelope.other_characters.map(|o| o.len()).unwrap_or(0),
            presence: Presence::from_last_login(last_login, now),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    parse_timestamp(raw).map(|ts| ts.date_naive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_body() -> &'static str {
        r#"{
            "character": {
                "character": {
                    "name": "Bubble",
                    "sex": "female",
                    "level": 412,
                    "vocation": "Elite Knight",
                    "world": "Antica",
                    "title": "",
                    "account_status": "Premium Account",
                    "residence": "Thais",
                    "last_login": "2024-05-01T12:00:00Z",
                    "achievement_points": 730,
                    "unlocked_titles": 12,
                    "guild": {"name": "Red Rose", "rank": "Leader"},
                    "houses": [
                        {"name": "Alpha Street 1", "town": "Thais", "paid": "2024-06-01"},
                        {"name": "Alpha Street 2", "town": "Thais", "paid": "2024-06-01"},
                        {"name": "Beta Lane", "town": "Venore", "paid": "2024-06-02"},
                        {"name": "Gamma Road", "town": "Carlin", "paid": "2024-06-03"},
                        {"name": "Delta Way", "town": "Edron", "paid": "bogus"}
                    ]
                },
                "deaths": [
                    {"level": 410, "time": "2024-04-30T21:15:00Z", "killers": [{"name": "a dragon lord"}, {"name": "Evil Guy"}], "reason": "x"},
                    {"level": 400, "time": "2024-04-20T21:15:00Z", "killers": [{"name": "a demon"}]},
                    {"level": 390, "time": "2024-04-10T21:15:00Z", "killers": []},
                    {"level": 380, "time": "2024-04-01T21:15:00Z", "killers": [{"name": "a hydra"}]}
                ],
                "account_information": {"created": "2010-02-03T10:00:00Z", "loyalty_title": "Warden of Tibia"},
                "other_characters": [{"name": "Bubble"}, {"name": "Bubble Two"}]
            }
        }"#
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 3, 0).unwrap()
    }

    #[test]
    fn test_sheet_from_full_response() {
        let response: CharacterResponse = serde_json::from_str(sample_body()).unwrap();
        let sheet = CharacterSheet::from_response(response, now()).unwrap();

        assert_eq!(sheet.name, "Bubble");
        assert_eq!(sheet.sex, Sex::Female);
        assert_eq!(sheet.level, Some(412));
        assert_eq!(sheet.title, None);
        assert_eq!(
            sheet.guild,
            Some(GuildLine { name: "Red Rose".to_string(), rank: Some("Leader".to_string()) })
        );
        assert_eq!(sheet.houses.shown.len(), HOUSES_SHOWN);
        assert_eq!(sheet.houses.total, 5);
        assert_eq!(sheet.houses.overflow(), 2);
        assert_eq!(sheet.houses.shown[0].paid_until, NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(sheet.deaths.shown.len(), DEATHS_SHOWN);
        assert_eq!(sheet.deaths.total, 4);
        assert_eq!(sheet.deaths.shown[0].killers, "a dragon lord, Evil Guy");
        assert_eq!(sheet.deaths.shown[2].killers, "");
        assert_eq!(sheet.other_characters, 2);
        assert_eq!(
            sheet.account.as_ref().and_then(|a| a.created),
            NaiveDate::from_ymd_opt(2010, 2, 3)
        );
        assert_eq!(sheet.presence, Presence::Online);
    }

    #[test]
    fn test_missing_inner_character_is_malformed() {
        let response: CharacterResponse =
            serde_json::from_str(r#"{"character": {"deaths": []}}"#).unwrap();
        let err = CharacterSheet::from_response(response, now()).unwrap_err();
        assert!(matches!(err, FinderError::MalformedResponse(_)));

        let empty: CharacterResponse = serde_json::from_str("{}").unwrap();
        assert!(CharacterSheet::from_response(empty, now()).is_err());
    }

    #[test]
    fn test_presence_threshold() {
        let now = now();
        assert_eq!(Presence::from_last_login(Some(now - Duration::minutes(5)), now), Presence::Online);
        assert_eq!(Presence::from_last_login(Some(now - Duration::minutes(6)), now), Presence::Offline);
        assert_eq!(Presence::from_last_login(None, now), Presence::Unknown);
    }

    #[test]
    fn test_minimal_character_defaults() {
        let response: CharacterResponse =
            serde_json::from_str(r#"{"character": {"character": {"name": "Solo", "sex": "male"}}}"#).unwrap();
        let sheet = CharacterSheet::from_response(response, now()).unwrap();
        assert_eq!(sheet.sex, Sex::Male);
        assert!(sheet.guild.is_none());
        assert!(sheet.houses.is_empty());
        assert!(sheet.deaths.is_empty());
        assert!(sheet.account.is_none());
        assert_eq!(sheet.presence, Presence::Unknown);
    }

    #[test]
    fn test_capped_without_overflow() {
        let capped = Capped::new(vec![1, 2], 3);
        assert_eq!(capped.shown, vec![1, 2]);
        assert_eq!(capped.overflow(), 0);
    }
}
