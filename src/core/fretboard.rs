use super::{
    config::{
        ChordDisplay,
        Hand,
    },
    models::{
        ChordRecord,
        STRING_COUNT,
    },
};

pub const FRET_COUNT: u32 = 12;
pub const STRING_NAMES: [&str; STRING_COUNT] = ["G", "C", "E", "A"];

/// What a single string does in a chord.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringState {
    Open,
    Muted,
    Fretted { fret: u32, label: String },
}

/// Per-string states in display order (left to right).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordShape {
    pub strings: Vec<(&'static str, StringState)>,
}

impl ChordShape {
    pub fn from_chord(chord: &ChordRecord, display: ChordDisplay, hand: Hand) -> Self {
        let mut strings: Vec<_> = STRING_NAMES
            .iter()
            .enumerate()
            .map(|(index, &name)| {
                let fret = chord.fingering.get(index).map(|f| f.trim()).unwrap_or_default();
                let finger = chord.fingers.get(index).map(|f| f.trim()).unwrap_or_default();
                (name, string_state(fret, finger, display))
            })
            .collect();

        if hand == Hand::Left {
            strings.reverse();
        }
        Self { strings }
    }

    pub fn fretted(&self) -> impl Iterator<Item = (usize, u32, &str)> {
        self.strings.iter().enumerate().filter_map(|(index, (_, state))| match state {
            StringState::Fretted { fret, label } => Some((index, *fret, label.as_str())),
            _ => None,
        })
    }
}

fn string_state(fret: &str, finger: &str, display: ChordDisplay) -> StringState {
    match fret.parse::<u32>() {
        Ok(0) => StringState::Open,
        Ok(n) if n <= FRET_COUNT => {
            let label = match display {
                ChordDisplay::Frets => n.to_string(),
                ChordDisplay::Fingers if !finger.is_empty() => finger.to_string(),
                ChordDisplay::Fingers => n.to_string(),
            };
            StringState::Fretted { fret: n, label }
        }
        _ => StringState::Muted,
    }
}

/// Pixel geometry of the fretboard for a given canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FretboardGeometry {
    pub left: f32,
    pub top: f32,
    pub bottom: f32,
    pub string_spacing: f32,
    pub fret_spacing: f32,
}

impl FretboardGeometry {
    pub const TOP_PADDING: f32 = 40.0;
    pub const BOTTOM_PADDING: f32 = 20.0;
    pub const STRING_SPACING: f32 = 40.0;
    pub const MARKER_RADIUS: f32 = 9.0;

    pub fn new(width: f32, height: f32) -> Self {
        let board_width = Self::STRING_SPACING * (STRING_COUNT - 1) as f32;
        let usable = (height - Self::TOP_PADDING - Self::BOTTOM_PADDING).max(0.0);
        Self {
            left: ((width - board_width) / 2.0).max(0.0),
            top: Self::TOP_PADDING,
            bottom: (height - Self::BOTTOM_PADDING).max(Self::TOP_PADDING),
            string_spacing: Self::STRING_SPACING,
            fret_spacing: usable / FRET_COUNT as f32,
        }
    }

    pub fn string_x(&self, index: usize) -> f32 {
        self.left + index as f32 * self.string_spacing
    }

    pub fn fret_y(&self, fret: u32) -> f32 {
        self.top + fret as f32 * self.fret_spacing
    }

    /// Markers sit between fret `n - 1` and fret `n`.
    pub fn marker_center(&self, string_index: usize, fret: u32) -> (f32, f32) {
        (self.string_x(string_index), self.fret_y(fret) - self.fret_spacing / 2.0)
    }

    pub fn right(&self) -> f32 {
        self.string_x(STRING_COUNT - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chord(fingering: [&str; 4], fingers: [&str; 4]) -> ChordRecord {
        ChordRecord {
            name: "test".to_string(),
            fingering: fingering.iter().map(|s| s.to_string()).collect(),
            fingers: fingers.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_open_muted_and_fretted_strings() {
        let shape = ChordShape::from_chord(
            &chord(["0", "x", "13", "3"], ["0", "0", "0", "3"]),
            ChordDisplay::Frets,
            Hand::Right,
        );

        assert_eq!(shape.strings[0], ("G", StringState::Open));
        assert_eq!(shape.strings[1], ("C", StringState::Muted));
        assert_eq!(shape.strings[2], ("E", StringState::Muted));
        assert_eq!(shape.fretted().collect::<Vec<_>>(), vec![(3, 3, "3")]);
    }

    #[test]
    fn test_finger_labels_and_left_hand() {
        let shape = ChordShape::from_chord(
            &chord(["2", "1", "2", "0"], ["2", "1", "3", "0"]),
            ChordDisplay::Fingers,
            Hand::Left,
        );

        let names: Vec<_> = shape.strings.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, vec!["A", "E", "C", "G"]);
        assert_eq!(shape.fretted().collect::<Vec<_>>(), vec![(1, 2, "3"), (2, 1, "1"), (3, 2, "2")]);
    }

    #[test]
    fn test_geometry_centers_the_board() {
        let geometry = FretboardGeometry::new(220.0, 300.0);

        assert_eq!(geometry.left, 50.0);
        assert_eq!(geometry.right(), 170.0);
        assert_eq!(geometry.fret_spacing, 20.0);
        assert_eq!(geometry.marker_center(1, 1), (90.0, 50.0));
        assert_eq!(geometry.fret_y(FRET_COUNT), geometry.bottom);
    }
}
