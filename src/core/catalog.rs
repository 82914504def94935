use std::{
    fmt::Write as _,
    fs,
    path::Path,
};

use super::{
    models::{
        Catalog,
        ChordRecord,
    },
    TrainerError,
};

pub const DEFAULT_CHORD_FILE: &str = "chords/chord_db.json";

const INDENT: &str = "  ";

pub fn load_catalog(path: &Path) -> Result<Catalog, TrainerError> {
    let content = fs::read_to_string(path)
        .map_err(|e| TrainerError::Custom(format!("Failed to read {}: {}", path.display(), e)))?;
    let catalog: Catalog = serde_json::from_str(&content)?;
    tracing::info!("Loaded {} chords from {}", catalog.len(), path.display());
    Ok(catalog)
}

/// A missing or unreadable chord file degrades to an empty catalog.
pub fn load_catalog_or_empty(path: &Path) -> Catalog {
    if !path.exists() {
        tracing::warn!("Chord file {} not found", path.display());
        return Catalog::new();
    }

    load_catalog(path).unwrap_or_else(|e| {
        tracing::warn!("Could not load chords: {}", e);
        Catalog::new()
    })
}

pub fn save_catalog(catalog: &Catalog, path: &Path) -> Result<(), TrainerError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_pretty_json(catalog)?)?;
    tracing::info!("Saved {} chords to {}", catalog.len(), path.display());
    Ok(())
}

/// Indents objects but keeps every string array on a single line.
pub fn to_pretty_json(catalog: &Catalog) -> Result<String, TrainerError> {
    let mut out = String::from("{\n");
    let tiers: Vec<_> = catalog.tiers().collect();

    for (tier_index, (difficulty, chords)) in tiers.iter().enumerate() {
        let _ = write!(out, "{INDENT}{}: [", serde_json::to_string(difficulty.key())?);

        if chords.is_empty() {
            out.push(']');
        } else {
            out.push('\n');
            for (chord_index, chord) in chords.iter().enumerate() {
                write_chord(&mut out, chord)?;
                if chord_index + 1 < chords.len() {
                    out.push(',');
                }
                out.push('\n');
            }
            let _ = write!(out, "{INDENT}]");
        }

        if tier_index + 1 < tiers.len() {
            out.push(',');
        }
        out.push('\n');
    }

    out.push_str("}\n");
    Ok(out)
}

fn write_chord(out: &mut String, chord: &ChordRecord) -> Result<(), TrainerError> {
    let pad = INDENT.repeat(2);
    let field_pad = INDENT.repeat(3);
    let lists: [(&str, &Vec<String>); 5] = [
        ("fingering", &chord.fingering),
        ("fingers", &chord.fingers),
        ("notes_on_strings", &chord.notes_on_strings),
        ("chord_notes", &chord.chord_notes),
        ("intervals", &chord.intervals),
    ];

    let _ = writeln!(out, "{pad}{{");
    let _ = write!(out, "{field_pad}\"name\": {}", serde_json::to_string(&chord.name)?);
    for (key, values) in lists {
        let items = values
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");
        let _ = write!(out, ",\n{field_pad}\"{key}\": [{items}]");
    }
    let _ = write!(out, "\n{pad}}}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::core::models::Difficulty;

    fn c_major() -> ChordRecord {
        ChordRecord {
            name: "C".to_string(),
            fingering: vec!["0", "0", "0", "3"].into_iter().map(String::from).collect(),
            fingers: vec!["0", "0", "0", "3"].into_iter().map(String::from).collect(),
            notes_on_strings: vec!["G", "C", "E", "C"].into_iter().map(String::from).collect(),
            chord_notes: vec!["C", "E", "G"].into_iter().map(String::from).collect(),
            intervals: vec!["1", "3", "5"].into_iter().map(String::from).collect(),
        }
    }

    #[test]
    fn test_pretty_json_keeps_arrays_on_one_line() {
        let mut catalog = Catalog::new();
        catalog.push(Difficulty::Easy, c_major());

        let json = to_pretty_json(&catalog).unwrap();

        assert!(json.contains("      \"fingering\": [\"0\", \"0\", \"0\", \"3\"]"));
        assert!(json.contains("  \"medium\": []"));
        let reparsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(reparsed, catalog);
    }

    #[test]
    fn test_save_then_load_from_disk() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chords").join("chord_db.json");
        let mut catalog = Catalog::new();
        catalog.push(Difficulty::Hard, c_major());
        catalog.push(Difficulty::Hard, ChordRecord { name: "C\"add9".to_string(), ..c_major() });

        save_catalog(&catalog, &path).unwrap();
        assert_eq!(load_catalog(&path).unwrap(), catalog);
    }

    #[test]
    fn test_missing_or_broken_file_gives_empty_catalog() {
        let dir = tempdir().unwrap();
        assert!(load_catalog_or_empty(&dir.path().join("missing.json")).is_empty());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "[1, 2").unwrap();
        assert!(load_catalog_or_empty(&broken).is_empty());
    }
}
