//! Plain-text rendering shared by the CLI and the TUI.

use chrono::NaiveDate;

use crate::models::{CharacterSheet, ClassBucket, Player};
use crate::roster::FilteredRoster;

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub rows: Vec<(String, String)>,
}

impl Section {
    fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), rows: Vec::new() }
    }

    fn row(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.rows.push((label.into(), value.into()));
    }
}

fn or_na<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn date(value: Option<NaiveDate>) -> String {
    or_na(value.map(|d| d.format("%Y-%m-%d")))
}

pub fn player_line(player: &Player) -> String {
    format!("{} ({}) - Level {}", player.name, player.vocation, player.level)
}

pub fn bucket_title(view: &FilteredRoster, class: ClassBucket) -> String {
    format!("{} ({})", class.label(), view.bucket(class).len())
}

pub fn summary_line(view: &FilteredRoster) -> String {
    match view.range() {
        Some(range) => format!(
            "Range {} | In range: {} | Total players: {}",
            range, view.total_in_range, view.total_players
        ),
        None => format!(
            "Range - | In range: {} | Total players: {}",
            view.total_in_range, view.total_players
        ),
    }
}

pub fn character_sections(sheet: &CharacterSheet) -> Vec<Section> {
    let mut sections = Vec::new();

    let mut basic = Section::new("Basic Information");
    basic.row("Name", if sheet.name.is_empty() { NOT_AVAILABLE.to_string() } else { sheet.name.clone() });
    basic.row("Sex", sheet.sex.as_str());
    basic.row("Level", or_na(sheet.level));
    basic.row("Vocation", or_na(sheet.vocation.as_deref()));
    basic.row("World", or_na(sheet.world.as_deref()));
    basic.row("Title", sheet.title.clone().unwrap_or_else(|| "None".to_string()));
    basic.row("Account Status", or_na(sheet.account_status.as_deref()));
    basic.row("Status", sheet.presence.as_str());
    sections.push(basic);

    if let Some(guild) = &sheet.guild {
        let mut section = Section::new("Guild");
        section.row("Name", guild.name.clone());
        section.row("Rank", or_na(guild.rank.as_deref()));
        sections.push(section);
    }

    if !sheet.houses.is_empty() {
        let mut section = Section::new(format!("Houses ({})", sheet.houses.total));
        for house in &sheet.houses.shown {
            section.row(
                house.name.clone(),
                format!("{} - Paid until {}", house.town, date(house.paid_until)),
            );
        }
        if sheet.houses.overflow() > 0 {
            section.row("...", format!("+{} houses", sheet.houses.overflow()));
        }
        sections.push(section);
    }

    if !sheet.deaths.is_empty() {
        let mut section = Section::new(format!("Recent Deaths ({})", sheet.deaths.total));
        for death in &sheet.deaths.shown {
            section.row(
                format!("Level {}", or_na(death.level)),
                format!("{} - {}", date(death.date), death.killers),
            );
        }
        sections.push(section);
    }

    if let Some(account) = &sheet.account {
        let mut section = Section::new("Account Information");
        if account.created.is_some() {
            section.row("Created", date(account.created));
        }
        if let Some(title) = &account.loyalty_title {
            section.row("Loyalty Title", title.clone());
        }
        sections.push(section);
    }

    let mut extra = Section::new("Additional Information");
    if let Some(residence) = &sheet.residence {
        extra.row("Residence", residence.clone());
    }
    if let Some(login) = sheet.last_login {
        extra.row("Last Login", login.format("%Y-%m-%d %H:%M UTC").to_string());
    }
    if let Some(points) = sheet.achievement_points {
        extra.row("Achievement Points", points.to_string());
    }
    if let Some(titles) = sheet.unlocked_titles {
        extra.row("Unlocked Titles", titles.to_string());
    }
    if sheet.other_characters > 0 {
        extra.row("Other Characters", sheet.other_characters.to_string());
    }
    sections.push(extra);

    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Capped, HouseLine, Presence, Sex};
    use crate::roster::{classify, filter_by_range};

    fn sheet() -> CharacterSheet {
        CharacterSheet {
            name: "Bubble".to_string(),
            sex: Sex::Male,
            level: Some(100),
            vocation: Some("Elite Knight".to_string()),
            world: Some("Antica".to_string()),
            title: None,
            account_status: None,
            guild: None,
            houses: Capped::new(
                (0..5)
                    .map(|i| HouseLine {
                        name: format!("House {}", i),
                        town: "Thais".to_string(),
                        paid_until: NaiveDate::from_ymd_opt(2024, 6, 1),
                    })
                    .collect(),
                3,
            ),
            deaths: Capped::new(Vec::new(), 3),
            account: None,
            residence: None,
            last_login: None,
            achievement_points: None,
            unlocked_titles: None,
            other_characters: 0,
            presence: Presence::Unknown,
        }
    }

    #[test]
    fn test_character_sections() {
        let sections = character_sections(&sheet());
        let titles: Vec<&str> = sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Basic Information", "Houses (5)", "Additional Information"]);

        let basic = &sections[0];
        assert!(basic.rows.contains(&("Title".to_string(), "None".to_string())));
        assert!(basic.rows.contains(&("Account Status".to_string(), "N/A".to_string())));

        let houses = &sections[1];
        assert_eq!(houses.rows.len(), 4);
        assert_eq!(houses.rows[3], ("...".to_string(), "+2 houses".to_string()));
        assert_eq!(houses.rows[0].1, "Thais - Paid until 2024-06-01");
    }

    #[test]
    fn test_summary_line() {
        let roster = classify(&[
            Player::new("A", 50, "Elite Knight"),
            Player::new("B", 10, "Knight"),
        ]);
        assert_eq!(
            summary_line(&filter_by_range(&roster, 50)),
            "Range 33 - 75 | In range: 1 | Total players: 2"
        );
        assert_eq!(
            summary_line(&filter_by_range(&roster, 0)),
            "Range - | In range: 2 | Total players: 2"
        );
    }
}
