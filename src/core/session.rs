use std::ops::ControlFlow;

use super::{
    history::{
        HistoryBuffer,
        HistorySink,
        NullSink,
    },
    models::{
        Catalog,
        Difficulty,
    },
    navigator::Navigator,
    presenter::{
        ChordPresenter,
        Notice,
        TrainerCommand,
    },
    selector::Selector,
    timer::{
        Countdown,
        TickOutcome,
    },
};

pub const DEFAULT_TIMER_INTERVAL_SECS: u32 = 10;

/// Owns the catalog and all selection state. Lives on the UI thread.
pub struct TrainerSession {
    catalog: Catalog,
    difficulty: Difficulty,
    history: HistoryBuffer,
    navigator: Navigator,
    selector: Selector,
    sink: Box<dyn HistorySink>,
    countdown: Countdown,
    timer_interval: u32,
    shown: u32,
}

impl TrainerSession {
    pub fn new(catalog: Catalog, difficulty: Difficulty, history_capacity: usize) -> Self {
        Self {
            catalog,
            difficulty,
            history: HistoryBuffer::new(history_capacity),
            navigator: Navigator::new(),
            selector: Selector::new(),
            sink: Box::new(NullSink),
            countdown: Countdown::default(),
            timer_interval: DEFAULT_TIMER_INTERVAL_SECS,
            shown: 0,
        }
    }

    /// Without a sink the history is kept in memory only.
    pub fn with_sink(mut self, sink: impl HistorySink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    pub fn with_selector(mut self, selector: Selector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_timer_interval(mut self, secs: u32) -> Self {
        self.timer_interval = secs.max(1);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn history(&self) -> &HistoryBuffer {
        &self.history
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn timer_running(&self) -> bool {
        self.countdown.is_running()
    }

    /// The chord shown at start-up does not count as learned.
    pub fn learned(&self) -> u32 {
        self.shown.saturating_sub(1)
    }

    /// Picks and shows a new chord, returning its name.
    pub fn next_chord(&mut self, presenter: &mut dyn ChordPresenter) -> Option<String> {
        let chords = self.catalog.tier(self.difficulty);
        let chord = match self.selector.select_next(chords, &mut self.history, self.sink.as_mut()) {
            Some(chord) => chord.clone(),
            None => {
                tracing::warn!("No chords available for difficulty '{}'", self.difficulty);
                presenter.update_status(Some(Notice::EmptyTier(self.difficulty)));
                return None;
            }
        };

        self.shown += 1;
        presenter.update_learned(self.learned());
        presenter.update_history(&self.history);
        self.navigator.reset();
        presenter.update_status(None);
        presenter.show_chord(&chord);
        self.refresh_navigation(presenter);

        Some(chord.name)
    }

    pub fn previous_chord(&mut self, presenter: &mut dyn ChordPresenter) {
        match self.navigator.step_back(&self.history) {
            Ok(name) => {
                let name = name.to_string();
                self.show_chord_by_name(&name, presenter);
                presenter.update_status(None);
            }
            Err(signal) => presenter.update_status(Some(signal.into())),
        }
        self.refresh_navigation(presenter);
    }

    pub fn forward_chord(&mut self, presenter: &mut dyn ChordPresenter) {
        match self.navigator.step_forward(&self.history) {
            Ok(name) => {
                let name = name.to_string();
                self.show_chord_by_name(&name, presenter);
                presenter.update_status(None);
            }
            Err(signal) => presenter.update_status(Some(signal.into())),
        }
        self.refresh_navigation(presenter);
    }

    pub fn show_chord_by_name(&self, name: &str, presenter: &mut dyn ChordPresenter) -> bool {
        match self.catalog.find(self.difficulty, name) {
            Some(chord) => {
                presenter.show_chord(chord);
                true
            }
            None => {
                tracing::debug!("Chord '{}' not found in '{}'", name, self.difficulty);
                false
            }
        }
    }

    pub fn clear_history(&mut self, presenter: &mut dyn ChordPresenter) {
        self.history.clear();
        self.navigator.reset();
        self.next_chord(presenter);
    }

    /// Returns `false` when `difficulty` is already active.
    pub fn set_difficulty(
        &mut self,
        difficulty: Difficulty,
        presenter: &mut dyn ChordPresenter,
    ) -> bool {
        if difficulty == self.difficulty {
            return false;
        }
        tracing::info!("Difficulty changed to '{}'", difficulty);
        self.difficulty = difficulty;
        self.clear_history(presenter);
        true
    }

    /// Keeps the current catalog when `catalog` is empty.
    pub fn reload_catalog(&mut self, catalog: Catalog) -> bool {
        if catalog.is_empty() {
            tracing::warn!("Reloaded chord catalog is empty, keeping the previous one");
            return false;
        }
        tracing::info!("Reloaded {} chords", catalog.len());
        self.catalog = catalog;
        true
    }

    /// Used after the editor saved: swap the catalog in and start a fresh window.
    pub fn apply_edited_catalog(&mut self, catalog: Catalog, presenter: &mut dyn ChordPresenter) {
        if self.reload_catalog(catalog) {
            self.clear_history(presenter);
        }
    }

    /// Starts or stops the countdown and returns whether it is running afterwards.
    pub fn toggle_timer(&mut self, presenter: &mut dyn ChordPresenter) -> bool {
        if self.countdown.is_running() {
            self.countdown.cancel();
            presenter.set_timer_running(false);
            presenter.update_status(None);
            self.refresh_navigation(presenter);
        } else {
            self.countdown.start(self.timer_interval);
            presenter.set_timer_running(true);
            presenter.update_status(self.countdown.remaining().map(Notice::Countdown));
        }
        self.countdown.is_running()
    }

    /// Call once per elapsed second.
    pub fn tick_timer(&mut self, presenter: &mut dyn ChordPresenter) {
        match self.countdown.tick() {
            TickOutcome::Idle => {}
            TickOutcome::Remaining(secs) => presenter.update_status(Some(Notice::Countdown(secs))),
            TickOutcome::Advance => {
                self.next_chord(presenter);
                presenter.update_status(self.countdown.remaining().map(Notice::Countdown));
            }
        }
    }

    pub fn handle_command(
        &mut self,
        command: TrainerCommand,
        presenter: &mut dyn ChordPresenter,
    ) -> ControlFlow<()> {
        tracing::debug!("Handling command {:?}", command);
        match command {
            TrainerCommand::Next => {
                self.next_chord(presenter);
            }
            TrainerCommand::Previous => self.previous_chord(presenter),
            TrainerCommand::Forward => self.forward_chord(presenter),
            TrainerCommand::ToggleTimer => {
                self.toggle_timer(presenter);
            }
            TrainerCommand::Stop => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn refresh_navigation(&self, presenter: &mut dyn ChordPresenter) {
        presenter.update_navigation(
            self.navigator.can_step_back(&self.history),
            self.navigator.can_step_forward(),
        );
    }
}
