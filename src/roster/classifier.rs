use serde::{Deserialize, Serialize};
use tracing::debug;

use super::range::{compute_range, is_in_range, LevelRange};
use crate::models::{ClassBucket, Player, RosterByClass};

/// Groups players into the five class buckets, highest level first.
///
/// Each vocation is tested against the buckets in [`ClassBucket::ALL`] order
/// and lands in the first that matches. Players matching no bucket are
/// dropped and only counted in [`RosterByClass::unclassified`]. The sort is
/// stable, so equal levels keep their roster order.
pub fn classify(players: &[Player]) -> RosterByClass {
    let mut buckets: [Vec<Player>; 5] = Default::default();
    let mut unclassified = 0;

    for player in players {
        match ClassBucket::from_vocation(&player.vocation) {
            Some(class) => buckets[class.index()].push(player.clone()),
            None => {
                debug!("Skipping {} with unmapped vocation {:?}", player.name, player.vocation);
                unclassified += 1;
            }
        }
    }

    for bucket in buckets.iter_mut() {
        bucket.sort_by(|a, b| b.level.cmp(&a.level));
    }

    RosterByClass::from_buckets(buckets, unclassified)
}

/// A roster narrowed to a reference level, with counts for the summary line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilteredRoster {
    pub roster: RosterByClass,
    pub reference_level: i64,
    /// Players across all buckets before filtering.
    pub total_players: usize,
    /// Players across all buckets that passed the filter.
    pub total_in_range: usize,
}

impl FilteredRoster {
    pub fn range(&self) -> Option<LevelRange> {
        (self.reference_level > 0).then(|| compute_range(self.reference_level))
    }

    pub fn is_filtered(&self) -> bool {
        self.reference_level > 0
    }

    pub fn bucket(&self, class: ClassBucket) -> &[Player] {
        self.roster.bucket(class)
    }
}

/// Keeps the players inside the range of `reference_level`.
///
/// A reference level of zero (or below) leaves the roster untouched.
pub fn filter_by_range(roster: &RosterByClass, reference_level: i64) -> FilteredRoster {
    let total_players = roster.total();

    if reference_level <= 0 {
        return FilteredRoster {
            roster: roster.clone(),
            reference_level: 0,
            total_players,
            total_in_range: total_players,
        };
    }

    let mut buckets: [Vec<Player>; 5] = Default::default();
    for (class, players) in roster.iter() {
        buckets[class.index()] = players
            .iter()
            .filter(|p| is_in_range(i64::from(p.level), reference_level))
            .cloned()
            .collect();
    }

    let filtered = RosterByClass::from_buckets(buckets, roster.unclassified);
    let total_in_range = filtered.total();

    FilteredRoster {
        roster: filtered,
        reference_level,
        total_players,
        total_in_range,
    }
}
