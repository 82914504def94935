use super::history::HistoryBuffer;

/// Non-fatal reasons a navigation step did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavSignal {
    NoMoreBack,
    AlreadyLatest,
}

/// Read-only cursor over the history window. `None` is the live position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Navigator {
    cursor: Option<isize>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cursor(&self) -> Option<isize> {
        self.cursor
    }

    pub fn is_live(&self) -> bool {
        self.cursor.is_none()
    }

    pub fn reset(&mut self) {
        self.cursor = None;
    }

    /// Moves one entry into the past and returns the name found there.
    pub fn step_back<'h>(&mut self, history: &'h HistoryBuffer) -> Result<&'h str, NavSignal> {
        let target = match self.cursor {
            None => -2,
            Some(cursor) => cursor - 1,
        };

        if target.unsigned_abs() > history.len() {
            return Err(NavSignal::NoMoreBack);
        }

        let name = history.get(target).ok_or(NavSignal::NoMoreBack)?;
        self.cursor = Some(target);
        Ok(name)
    }

    /// Moves one entry toward the present. Reaching the newest entry returns to live.
    pub fn step_forward<'h>(&mut self, history: &'h HistoryBuffer) -> Result<&'h str, NavSignal> {
        let cursor = self.cursor.ok_or(NavSignal::AlreadyLatest)?;
        let target = (cursor + 1).min(-1);

        let name = history.get(target).ok_or(NavSignal::AlreadyLatest)?;
        self.cursor = if target == -1 { None } else { Some(target) };
        Ok(name)
    }

    pub fn can_step_back(&self, history: &HistoryBuffer) -> bool {
        let target = self.cursor.map_or(-2, |cursor| cursor - 1);
        target.unsigned_abs() <= history.len()
    }

    pub fn can_step_forward(&self) -> bool {
        self.cursor.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(names: &[&str]) -> HistoryBuffer {
        let mut history = HistoryBuffer::new(4);
        for name in names {
            history.append(*name);
        }
        history
    }

    #[test]
    fn test_step_back_walks_to_oldest_then_stops() {
        let history = history(&["A", "B", "C"]);
        let mut nav = Navigator::new();

        assert_eq!(nav.step_back(&history), Ok("B"));
        assert_eq!(nav.cursor(), Some(-2));
        assert_eq!(nav.step_back(&history), Ok("A"));
        assert_eq!(nav.cursor(), Some(-3));
        assert_eq!(nav.step_back(&history), Err(NavSignal::NoMoreBack));
        assert_eq!(nav.cursor(), Some(-3));
        assert!(!nav.can_step_back(&history));
    }

    #[test]
    fn test_step_back_with_single_entry_stays_live() {
        let history = history(&["A"]);
        let mut nav = Navigator::new();

        assert_eq!(nav.step_back(&history), Err(NavSignal::NoMoreBack));
        assert!(nav.is_live());
    }

    #[test]
    fn test_step_forward_at_live_is_noop() {
        let history = history(&["A", "B"]);
        let mut nav = Navigator::new();

        assert_eq!(nav.step_forward(&history), Err(NavSignal::AlreadyLatest));
        assert!(nav.is_live());
        assert!(!nav.can_step_forward());
    }

    #[test]
    fn test_back_then_forward_restores_cursor_and_chord() {
        let history = history(&["A", "B", "C", "D"]);

        for steps in 1..=3 {
            let mut nav = Navigator::new();
            for _ in 0..steps {
                nav.step_back(&history).unwrap();
            }
            let mut last = "";
            for _ in 0..steps {
                last = nav.step_forward(&history).unwrap();
            }
            assert!(nav.is_live());
            assert_eq!(last, "D");
        }
    }

    #[test]
    fn test_forward_from_minus_one_returns_live() {
        let history = history(&["A", "B"]);
        let mut nav = Navigator { cursor: Some(-1) };

        assert_eq!(nav.step_forward(&history), Ok("B"));
        assert!(nav.is_live());
    }
}
