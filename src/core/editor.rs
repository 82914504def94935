use std::{
    collections::{
        BTreeMap,
        HashMap,
        HashSet,
    },
    fmt,
    path::Path,
};

use regex::Regex;

use super::{
    catalog::save_catalog,
    models::{
        normalize_name,
        Catalog,
        ChordRecord,
        Difficulty,
        STRING_COUNT,
    },
    TrainerError,
};

pub const UNKNOWN_PLACEHOLDER: &str = "???";
const MAX_FRET: u32 = 12;
const MIN_NOTES: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Fingering,
    Fingers,
    NotesOnStrings,
    ChordNotes,
    Intervals,
}

impl Column {
    pub const ALL: [Column; 6] = [
        Column::Name,
        Column::Fingering,
        Column::Fingers,
        Column::NotesOnStrings,
        Column::ChordNotes,
        Column::Intervals,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Column::Name => "name",
            Column::Fingering => "fingering",
            Column::Fingers => "fingers",
            Column::NotesOnStrings => "notes_on_strings",
            Column::ChordNotes => "chord_notes",
            Column::Intervals => "intervals",
        }
    }

    pub fn is_list(&self) -> bool {
        !matches!(self, Column::Name)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One chord as it appears in the editor table: every cell is free text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EditorRow {
    pub name: String,
    pub fingering: String,
    pub fingers: String,
    pub notes_on_strings: String,
    pub chord_notes: String,
    pub intervals: String,
}

impl EditorRow {
    pub fn from_chord(chord: &ChordRecord) -> Self {
        Self {
            name: chord.name.clone(),
            fingering: chord.fingering.join(", "),
            fingers: chord.fingers.join(", "),
            notes_on_strings: chord.notes_on_strings.join(", "),
            chord_notes: chord.chord_notes.join(", "),
            intervals: chord.intervals.join(", "),
        }
    }

    pub fn cell(&self, column: Column) -> &str {
        match column {
            Column::Name => &self.name,
            Column::Fingering => &self.fingering,
            Column::Fingers => &self.fingers,
            Column::NotesOnStrings => &self.notes_on_strings,
            Column::ChordNotes => &self.chord_notes,
            Column::Intervals => &self.intervals,
        }
    }

    pub fn cell_mut(&mut self, column: Column) -> &mut String {
        match column {
            Column::Name => &mut self.name,
            Column::Fingering => &mut self.fingering,
            Column::Fingers => &mut self.fingers,
            Column::NotesOnStrings => &mut self.notes_on_strings,
            Column::ChordNotes => &mut self.chord_notes,
            Column::Intervals => &mut self.intervals,
        }
    }

    pub fn to_chord(&self) -> ChordRecord {
        ChordRecord {
            name: self.name.trim().to_string(),
            fingering: split_list(&self.fingering),
            fingers: split_list(&self.fingers),
            notes_on_strings: split_list(&self.notes_on_strings),
            chord_notes: split_list(&self.chord_notes),
            intervals: split_list(&self.intervals),
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split(',').map(|part| part.trim().to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    EmptyOrPlaceholder,
    DotInsteadOfComma { value: String },
    EmptyListElement { value: String },
    InvalidLength { expected: usize, found: usize },
    InvalidNumber { value: String },
    MinimumLength { min_length: usize },
    InvalidNoteFormat { value: String },
    InvalidIntervalFormat { value: String },
    DuplicateName { name: String, previous_row: usize },
    DuplicateFingering { fingering: String, previous_row: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub difficulty: Difficulty,
    /// 1-based, as shown to the user.
    pub row: usize,
    pub column: Column,
    pub kind: IssueKind,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] row {}, {}: ", self.difficulty, self.row, self.column)?;
        match &self.kind {
            IssueKind::EmptyOrPlaceholder => write!(f, "empty or placeholder value"),
            IssueKind::DotInsteadOfComma { value } => {
                write!(f, "'{value}' uses '.' instead of ','")
            }
            IssueKind::EmptyListElement { value } => write!(f, "'{value}' has an empty element"),
            IssueKind::InvalidLength { expected, found } => {
                write!(f, "expected {expected} values, found {found}")
            }
            IssueKind::InvalidNumber { value } => {
                write!(f, "'{value}' is not a number between 0 and {MAX_FRET}")
            }
            IssueKind::MinimumLength { min_length } => {
                write!(f, "needs at least {min_length} values")
            }
            IssueKind::InvalidNoteFormat { value } => write!(f, "'{value}' is not a note"),
            IssueKind::InvalidIntervalFormat { value } => {
                write!(f, "'{value}' is not an interval")
            }
            IssueKind::DuplicateName { name, previous_row } => {
                write!(f, "name '{name}' already used in row {previous_row}")
            }
            IssueKind::DuplicateFingering { fingering, previous_row } => {
                write!(f, "fingering '{fingering}' already used in row {previous_row}")
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn error_count(&self) -> usize {
        self.issues.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Cell and row checks for the chord editor.
#[derive(Debug, Clone)]
pub struct ChordValidator {
    placeholders: HashSet<String>,
    note_pattern: Regex,
    interval_pattern: Regex,
}

impl ChordValidator {
    /// `placeholders` are the localized default cell texts that must be replaced.
    pub fn new<I, S>(placeholders: I) -> Result<Self, TrainerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut placeholders: HashSet<String> =
            placeholders.into_iter().map(|p| p.into().trim().to_string()).collect();
        placeholders.insert(UNKNOWN_PLACEHOLDER.to_string());

        Ok(Self {
            placeholders,
            note_pattern: Regex::new(r"^[A-Ga-g](?:#|b|♯|♭)?$")?,
            interval_pattern: Regex::new(r"^(?:b|#)?\d+$")?,
        })
    }

    pub fn validate(&self, tables: &BTreeMap<Difficulty, Vec<EditorRow>>) -> ValidationReport {
        let mut report = ValidationReport::default();

        for (&difficulty, rows) in tables {
            let mut seen_names: HashMap<String, usize> = HashMap::new();
            let mut seen_fingerings: HashMap<String, usize> = HashMap::new();

            for (index, row) in rows.iter().enumerate() {
                let row_number = index + 1;
                let mut push = |column: Column, kind: IssueKind| {
                    report.issues.push(ValidationIssue { difficulty, row: row_number, column, kind })
                };

                for column in Column::ALL {
                    if let Some(kind) = self.check_cell(column, row.cell(column).trim()) {
                        push(column, kind);
                    }
                }

                let name = row.name.trim();
                if !name.is_empty() {
                    let key = normalize_name(name);
                    match seen_names.get(&key) {
                        Some(&previous_row) => push(
                            Column::Name,
                            IssueKind::DuplicateName { name: name.to_string(), previous_row },
                        ),
                        None => {
                            seen_names.insert(key, row_number);
                        }
                    }
                }

                let fingering = row.fingering.trim();
                if !fingering.is_empty() {
                    let key: String = fingering.chars().filter(|c| !c.is_whitespace()).collect();
                    match seen_fingerings.get(&key) {
                        Some(&previous_row) => push(
                            Column::Fingering,
                            IssueKind::DuplicateFingering {
                                fingering: fingering.to_string(),
                                previous_row,
                            },
                        ),
                        None => {
                            seen_fingerings.insert(key, row_number);
                        }
                    }
                }
            }
        }

        for issue in &report.issues {
            tracing::debug!("Invalid cell {}", issue);
        }
        report
    }

    /// Returns the first problem found in a single cell.
    fn check_cell(&self, column: Column, value: &str) -> Option<IssueKind> {
        if value.is_empty() || self.placeholders.contains(value) {
            return Some(IssueKind::EmptyOrPlaceholder);
        }
        if !column.is_list() {
            return None;
        }
        if value.contains('.') {
            return Some(IssueKind::DotInsteadOfComma { value: value.to_string() });
        }

        let parts: Vec<&str> = value.split(',').map(str::trim).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Some(IssueKind::EmptyListElement { value: value.to_string() });
        }

        match column {
            Column::Fingering | Column::Fingers => {
                if parts.len() != STRING_COUNT {
                    return Some(IssueKind::InvalidLength {
                        expected: STRING_COUNT,
                        found: parts.len(),
                    });
                }
                parts
                    .iter()
                    .find(|p| !is_fret_number(p))
                    .map(|p| IssueKind::InvalidNumber { value: p.to_string() })
            }
            Column::NotesOnStrings | Column::ChordNotes => {
                if parts.len() < MIN_NOTES {
                    return Some(IssueKind::MinimumLength { min_length: MIN_NOTES });
                }
                parts
                    .iter()
                    .find(|p| !self.note_pattern.is_match(p))
                    .map(|p| IssueKind::InvalidNoteFormat { value: p.to_string() })
            }
            Column::Intervals => {
                if parts.len() < MIN_NOTES {
                    return Some(IssueKind::MinimumLength { min_length: MIN_NOTES });
                }
                parts
                    .iter()
                    .find(|p| !self.interval_pattern.is_match(p))
                    .map(|p| IssueKind::InvalidIntervalFormat { value: p.to_string() })
            }
            Column::Name => None,
        }
    }
}

fn is_fret_number(value: &str) -> bool {
    !value.is_empty()
        && value.chars().all(|c| c.is_ascii_digit())
        && value.parse::<u32>().is_ok_and(|n| n <= MAX_FRET)
}

/// Texts used for freshly added rows.
#[derive(Debug, Clone)]
pub struct RowTemplate {
    pub name: String,
    pub fingering: String,
}

impl Default for RowTemplate {
    fn default() -> Self {
        Self { name: "New chord".to_string(), fingering: "Edit...".to_string() }
    }
}

/// In-memory state of the chord editor window.
#[derive(Debug, Clone)]
pub struct ChordEditor {
    original: Catalog,
    tables: BTreeMap<Difficulty, Vec<EditorRow>>,
    validator: ChordValidator,
    template: RowTemplate,
    dirty: bool,
    saved: bool,
}

impl ChordEditor {
    pub fn new(catalog: Catalog, template: RowTemplate) -> Result<Self, TrainerError> {
        let validator =
            ChordValidator::new([template.name.clone(), template.fingering.clone()])?;
        let tables = tables_from(&catalog);
        Ok(Self { original: catalog, tables, validator, template, dirty: false, saved: false })
    }

    pub fn rows(&self, difficulty: Difficulty) -> &[EditorRow] {
        self.tables.get(&difficulty).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether a save succeeded since the editor was opened.
    pub fn saved(&self) -> bool {
        self.saved
    }

    pub fn add_row(&mut self, difficulty: Difficulty) {
        let row = EditorRow {
            name: self.template.name.clone(),
            fingering: self.template.fingering.clone(),
            fingers: UNKNOWN_PLACEHOLDER.to_string(),
            notes_on_strings: UNKNOWN_PLACEHOLDER.to_string(),
            chord_notes: UNKNOWN_PLACEHOLDER.to_string(),
            intervals: UNKNOWN_PLACEHOLDER.to_string(),
        };
        self.tables.entry(difficulty).or_default().push(row);
        self.dirty = true;
    }

    /// Removes the rows at `indices`; returns how many were removed.
    pub fn delete_rows(&mut self, difficulty: Difficulty, indices: &[usize]) -> usize {
        let Some(rows) = self.tables.get_mut(&difficulty) else {
            return 0;
        };

        let doomed: HashSet<usize> = indices.iter().copied().filter(|&i| i < rows.len()).collect();
        if doomed.is_empty() {
            return 0;
        }

        let mut index = 0;
        rows.retain(|_| {
            let keep = !doomed.contains(&index);
            index += 1;
            keep
        });
        self.dirty = true;
        doomed.len()
    }

    pub fn set_cell(
        &mut self,
        difficulty: Difficulty,
        row: usize,
        column: Column,
        value: impl Into<String>,
    ) -> bool {
        let Some(cell) =
            self.tables.get_mut(&difficulty).and_then(|rows| rows.get_mut(row)).map(|r| r.cell_mut(column))
        else {
            return false;
        };

        let value = value.into();
        if *cell != value {
            *cell = value;
            self.dirty = true;
        }
        true
    }

    pub fn reset(&mut self) {
        self.tables = tables_from(&self.original);
        self.dirty = false;
    }

    pub fn validate(&self) -> ValidationReport {
        self.validator.validate(&self.tables)
    }

    pub fn prepare_save_data(&self) -> Catalog {
        let mut catalog = Catalog::new();
        for (&difficulty, rows) in &self.tables {
            catalog.set_tier(difficulty, rows.iter().map(EditorRow::to_chord).collect());
        }
        catalog
    }

    /// Validates and writes the chord file. Returns the saved catalog, or `None`
    /// when there was nothing to save.
    pub fn save(&mut self, path: &Path) -> Result<Option<Catalog>, TrainerError> {
        if !self.dirty {
            return Ok(None);
        }

        let report = self.validate();
        if !report.is_clean() {
            tracing::warn!("Refusing to save chords: {} invalid cells", report.error_count());
            return Err(TrainerError::Validation { errors: report.error_count() });
        }

        let catalog = self.prepare_save_data();
        save_catalog(&catalog, path)?;

        self.original = catalog.clone();
        self.dirty = false;
        self.saved = true;
        Ok(Some(catalog))
    }
}

fn tables_from(catalog: &Catalog) -> BTreeMap<Difficulty, Vec<EditorRow>> {
    catalog
        .tiers()
        .map(|(difficulty, chords)| (difficulty, chords.iter().map(EditorRow::from_chord).collect()))
        .collect()
}
