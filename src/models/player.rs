use serde::{Deserialize, Serialize};

use super::{FinderError, Result};

/// One entry of a world's online roster, as reported by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub level: u32,
    pub vocation: String,
}

impl Player {
    pub fn new(name: impl Into<String>, level: u32, vocation: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level,
            vocation: vocation.into(),
        }
    }
}

/// Normalized class grouping. Promoted vocations collapse into their base class.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ClassBucket {
    Knight,
    Druid,
    Sorcerer,
    Paladin,
    Monk,
}

impl ClassBucket {
    /// Matching order. The first bucket whose variants match a vocation wins.
    pub const ALL: [ClassBucket; 5] = [
        ClassBucket::Knight,
        ClassBucket::Druid,
        ClassBucket::Sorcerer,
        ClassBucket::Paladin,
        ClassBucket::Monk,
    ];

    /// Column order used when presenting a roster.
    pub const DISPLAY_ORDER: [ClassBucket; 5] = [
        ClassBucket::Knight,
        ClassBucket::Paladin,
        ClassBucket::Druid,
        ClassBucket::Sorcerer,
        ClassBucket::Monk,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClassBucket::Knight => "knight",
            ClassBucket::Druid => "druid",
            ClassBucket::Sorcerer => "sorcerer",
            ClassBucket::Paladin => "paladin",
            ClassBucket::Monk => "monk",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ClassBucket::Knight => "Knight / Elite Knight",
            ClassBucket::Druid => "Druid / Elder Druid",
            ClassBucket::Sorcerer => "Sorcerer / Master Sorcerer",
            ClassBucket::Paladin => "Paladin / Royal Paladin",
            ClassBucket::Monk => "Monk / Exalted Monk",
        }
    }

    /// Lower-case vocation fragments accepted by this bucket.
    pub fn variants(&self) -> &'static [&'static str] {
        match self {
            ClassBucket::Knight => &["knight", "elite knight"],
            ClassBucket::Druid => &["druid", "elder druid"],
            ClassBucket::Sorcerer => &["sorcerer", "master sorcerer"],
            ClassBucket::Paladin => &["paladin", "royal paladin"],
            ClassBucket::Monk => &["monk", "exalted monk"],
        }
    }

    /// Case-insensitive substring match of a raw vocation against the variant table.
    pub fn from_vocation(vocation: &str) -> Option<Self> {
        let vocation = vocation.to_lowercase();
        Self::ALL.into_iter().find(|bucket| {
            bucket
                .variants()
                .iter()
                .any(|variant| vocation.contains(variant))
        })
    }

    pub(crate) fn index(&self) -> usize {
        match self {
            ClassBucket::Knight => 0,
            ClassBucket::Druid => 1,
            ClassBucket::Sorcerer => 2,
            ClassBucket::Paladin => 3,
            ClassBucket::Monk => 4,
        }
    }
}

impl std::str::FromStr for ClassBucket {
    type Err = FinderError;

    /// Bucket names and their common short forms, case-insensitive.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "knight" | "ek" => Ok(ClassBucket::Knight),
            "druid" | "ed" => Ok(ClassBucket::Druid),
            "sorcerer" | "ms" => Ok(ClassBucket::Sorcerer),
            "paladin" | "rp" => Ok(ClassBucket::Paladin),
            "monk" | "em" => Ok(ClassBucket::Monk),
            other => Err(FinderError::ValidationError(format!("Unknown class: {}", other))),
        }
    }
}

impl std::fmt::Display for ClassBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Players grouped by class, each bucket sorted by level descending.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterByClass {
    buckets: [Vec<Player>; 5],
    /// Players whose vocation matched no bucket.
    pub unclassified: usize,
}

impl RosterByClass {
    pub(crate) fn from_buckets(buckets: [Vec<Player>; 5], unclassified: usize) -> Self {
        Self {
            buckets,
            unclassified,
        }
    }

    pub fn bucket(&self, class: ClassBucket) -> &[Player] {
        &self.buckets[class.index()]
    }

    /// Buckets in matching order.
    pub fn iter(&self) -> impl Iterator<Item = (ClassBucket, &[Player])> + '_ {
        ClassBucket::ALL
            .into_iter()
            .map(move |class| (class, self.bucket(class)))
    }

    /// Players across all five buckets. Unclassified players are not counted.
    pub fn total(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocation_matching_is_case_insensitive() {
        assert_eq!(ClassBucket::from_vocation("Elite Knight"), Some(ClassBucket::Knight));
        assert_eq!(ClassBucket::from_vocation("elite knight"), Some(ClassBucket::Knight));
        assert_eq!(ClassBucket::from_vocation("Knight"), Some(ClassBucket::Knight));
        assert_eq!(ClassBucket::from_vocation("Druid"), Some(ClassBucket::Druid));
        assert_eq!(ClassBucket::from_vocation("Elder Druid"), Some(ClassBucket::Druid));
        assert_eq!(ClassBucket::from_vocation("MASTER SORCERER"), Some(ClassBucket::Sorcerer));
        assert_eq!(ClassBucket::from_vocation("Royal Paladin"), Some(ClassBucket::Paladin));
        assert_eq!(ClassBucket::from_vocation("Exalted Monk"), Some(ClassBucket::Monk));
    }

    #[test]
    fn test_unknown_vocations_match_nothing() {
        assert_eq!(ClassBucket::from_vocation("Necromancer"), None);
        assert_eq!(ClassBucket::from_vocation("None"), None);
        assert_eq!(ClassBucket::from_vocation(""), None);
    }

    #[test]
    fn test_bucket_parsing() {
        assert_eq!("knight".parse::<ClassBucket>().ok(), Some(ClassBucket::Knight));
        assert_eq!("RP".parse::<ClassBucket>().ok(), Some(ClassBucket::Paladin));
        assert_eq!(" monk ".parse::<ClassBucket>().ok(), Some(ClassBucket::Monk));
        assert!(matches!(
            "warrior".parse::<ClassBucket>(),
            Err(FinderError::ValidationError(_))
        ));
        for class in ClassBucket::ALL {
            assert_eq!(class.as_str().parse::<ClassBucket>().ok(), Some(class));
        }
    }

    #[test]
    fn test_index_follows_matching_order() {
        for (i, class) in ClassBucket::ALL.iter().enumerate() {
            assert_eq!(class.index(), i);
        }
    }
}
