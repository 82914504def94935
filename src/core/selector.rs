use rand::{
    rngs::StdRng,
    seq::IndexedRandom,
    SeedableRng,
};

use super::{
    history::{
        HistoryBuffer,
        HistorySink,
    },
    models::ChordRecord,
};

/// Picks chords at random while avoiding the ones still in the history window.
pub struct Selector {
    rng: StdRng,
}

impl Default for Selector {
    fn default() -> Self {
        Self::new()
    }
}

impl Selector {
    pub fn new() -> Self {
        Self { rng: StdRng::from_os_rng() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Returns `None` only for an empty tier.
    ///
    /// When every chord of the tier is in `history` the window is cleared and the
    /// whole tier becomes eligible again. The chosen name is appended to `history`
    /// and the buffer is handed to `sink`.
    pub fn select_next<'a>(
        &mut self,
        chords: &'a [ChordRecord],
        history: &mut HistoryBuffer,
        sink: &mut dyn HistorySink,
    ) -> Option<&'a ChordRecord> {
        if chords.is_empty() {
            return None;
        }

        let mut candidates: Vec<&ChordRecord> =
            chords.iter().filter(|chord| !history.contains(&chord.name)).collect();

        if candidates.is_empty() {
            tracing::debug!("All {} chords seen, resetting history window", chords.len());
            history.clear();
            candidates = chords.iter().collect();
        }

        let chord = *candidates.choose(&mut self.rng)?;
        history.append(chord.name.trim());
        sink.write(history);

        tracing::debug!("Selected {} (history: {})", chord.name, history.joined());
        Some(chord)
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::core::history::NullSink;

    fn chords(names: &[&str]) -> Vec<ChordRecord> {
        names.iter().map(|name| ChordRecord::new(*name)).collect()
    }

    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<String>,
    }

    impl HistorySink for RecordingSink {
        fn write(&mut self, history: &HistoryBuffer) {
            self.writes.push(history.joined());
        }
    }

    #[test]
    fn test_five_chords_capacity_four_never_repeat_within_five_picks() {
        let catalog = chords(&["A", "B", "C", "D", "E"]);

        for seed in 0..50 {
            let mut selector = Selector::seeded(seed);
            let mut history = HistoryBuffer::new(4);
            let mut seen = Vec::new();

            for _ in 0..5 {
                let chord = selector.select_next(&catalog, &mut history, &mut NullSink).unwrap();
                assert!(!seen.contains(&chord.name), "seed {seed} repeated {}", chord.name);
                seen.push(chord.name.clone());
            }
        }
    }

    #[test]
    fn test_exhausted_pool_clears_history_first() {
        let catalog = chords(&["A", "B", "C"]);
        let mut history = HistoryBuffer::new(4);
        for name in ["c", "b", "a"] {
            history.append(name);
        }

        let mut selector = Selector::seeded(7);
        let chord = selector.select_next(&catalog, &mut history, &mut NullSink).unwrap();

        assert_eq!(history.len(), 1);
        assert_eq!(history.latest(), Some(chord.name.as_str()));
    }

    #[test]
    fn test_every_selection_is_written_to_sink() {
        let catalog = chords(&[" G ", "D"]);
        let mut history = HistoryBuffer::new(4);
        let mut sink = RecordingSink::default();
        let mut selector = Selector::seeded(1);

        selector.select_next(&catalog, &mut history, &mut sink);
        selector.select_next(&catalog, &mut history, &mut sink);

        assert_eq!(sink.writes.len(), 2);
        assert_eq!(sink.writes[1], history.joined());
        assert!(history.names().all(|name| name == "G" || name == "D"));
    }

    #[test]
    fn test_empty_tier_returns_none() {
        let mut history = HistoryBuffer::default();
        let mut selector = Selector::seeded(3);
        assert!(selector.select_next(&[], &mut history, &mut NullSink).is_none());
        assert!(history.is_empty());
    }

    proptest! {
        #[test]
        fn prop_never_returns_a_chord_in_history(
            seed in any::<u64>(),
            size in 2usize..10,
            seen in 0usize..9,
        ) {
            let names: Vec<String> = (0..size).map(|i| format!("Chord{i}")).collect();
            let catalog: Vec<ChordRecord> = names.iter().map(ChordRecord::new).collect();
            let seen = seen.min(size - 1);

            let mut history = HistoryBuffer::new(size);
            for name in names.iter().take(seen) {
                history.append(name.to_uppercase());
            }
            let before: Vec<String> = history.names().map(str::to_string).collect();

            let mut selector = Selector::seeded(seed);
            let chord = selector.select_next(&catalog, &mut history, &mut NullSink).unwrap();

            prop_assert!(!before.iter().any(|name| chord.matches(name)));
        }
    }
}
