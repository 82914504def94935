use std::{
    collections::BTreeMap,
    fmt,
    str::FromStr,
};

use serde::{
    Deserialize,
    Serialize,
};

use super::TrainerError;

pub const STRING_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Difficulty::Easy
    }
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Key of the localized label, e.g. `difficulty_easy`.
    pub fn lang_key(&self) -> &'static str {
        match self {
            Difficulty::Easy => "difficulty_easy",
            Difficulty::Medium => "difficulty_medium",
            Difficulty::Hard => "difficulty_hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Difficulty {
    type Err = TrainerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            other => Err(TrainerError::UnknownDifficulty(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChordRecord {
    pub name: String,
    #[serde(default)]
    pub fingering: Vec<String>,
    #[serde(default)]
    pub fingers: Vec<String>,
    #[serde(default)]
    pub notes_on_strings: Vec<String>,
    #[serde(default)]
    pub chord_notes: Vec<String>,
    #[serde(default)]
    pub intervals: Vec<String>,
}

impl ChordRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Default::default() }
    }

    /// Comparison key used everywhere chord names are matched.
    pub fn key(&self) -> String {
        normalize_name(&self.name)
    }

    pub fn matches(&self, name: &str) -> bool {
        self.key() == normalize_name(name)
    }
}

pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Chord records grouped by difficulty tier.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tiers: BTreeMap<Difficulty, Vec<ChordRecord>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tier(&self, difficulty: Difficulty) -> &[ChordRecord] {
        self.tiers.get(&difficulty).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_tier(&mut self, difficulty: Difficulty, chords: Vec<ChordRecord>) {
        self.tiers.insert(difficulty, chords);
    }

    pub fn push(&mut self, difficulty: Difficulty, chord: ChordRecord) {
        self.tiers.entry(difficulty).or_default().push(chord);
    }

    pub fn find(&self, difficulty: Difficulty, name: &str) -> Option<&ChordRecord> {
        self.tier(difficulty).iter().find(|chord| chord.matches(name))
    }

    pub fn is_empty(&self) -> bool {
        self.tiers.values().all(Vec::is_empty)
    }

    pub fn len(&self) -> usize {
        self.tiers.values().map(Vec::len).sum()
    }

    pub fn tiers(&self) -> impl Iterator<Item = (Difficulty, &[ChordRecord])> {
        Difficulty::ALL.into_iter().map(move |difficulty| (difficulty, self.tier(difficulty)))
    }
}

// A tier stored as an empty list equals a tier that is absent.
impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.tiers().eq(other.tiers())
    }
}

impl Eq for Catalog {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("Medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!(" hard ".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert!(matches!(
            "expert".parse::<Difficulty>(),
            Err(TrainerError::UnknownDifficulty(value)) if value == "expert"
        ));
    }

    #[test]
    fn test_catalog_lookup_ignores_case_and_padding() {
        let mut catalog = Catalog::new();
        catalog.push(Difficulty::Easy, ChordRecord::new("Am"));
        catalog.push(Difficulty::Easy, ChordRecord::new(" C7 "));

        assert_eq!(catalog.find(Difficulty::Easy, "am").map(|c| c.name.as_str()), Some("Am"));
        assert!(catalog.find(Difficulty::Easy, "c7").is_some());
        assert!(catalog.find(Difficulty::Hard, "Am").is_none());
        assert_eq!(catalog.len(), 2);
        assert!(catalog.tier(Difficulty::Medium).is_empty());
    }

    #[test]
    fn test_catalog_json_is_keyed_by_tier() {
        let json = r#"{
            "easy": [{"name": "C", "fingering": ["0", "0", "0", "3"]}],
            "hard": []
        }"#;
        let catalog: Catalog = serde_json::from_str(json).unwrap();

        assert_eq!(catalog.tier(Difficulty::Easy)[0].fingering, vec!["0", "0", "0", "3"]);
        assert!(catalog.tier(Difficulty::Easy)[0].intervals.is_empty());
        assert!(catalog.tier(Difficulty::Medium).is_empty());
    }
}
