use super::{
    history::HistoryBuffer,
    models::{
        ChordRecord,
        Difficulty,
    },
    navigator::NavSignal,
};

/// Short, non-fatal status messages shown next to the controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    NoMoreBack,
    AlreadyLatest,
    EmptyTier(Difficulty),
    Countdown(u32),
}

impl From<NavSignal> for Notice {
    fn from(signal: NavSignal) -> Self {
        match signal {
            NavSignal::NoMoreBack => Notice::NoMoreBack,
            NavSignal::AlreadyLatest => Notice::AlreadyLatest,
        }
    }
}

/// Everything the trainer needs from a UI.
pub trait ChordPresenter {
    fn show_chord(&mut self, chord: &ChordRecord);
    fn update_learned(&mut self, count: u32);
    fn update_history(&mut self, history: &HistoryBuffer);
    fn update_status(&mut self, notice: Option<Notice>);
    fn update_navigation(&mut self, can_go_back: bool, can_go_forward: bool);
    fn set_timer_running(&mut self, running: bool);
}

/// Commands that reach the trainer from outside the UI thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainerCommand {
    Next,
    Previous,
    Forward,
    ToggleTimer,
    Stop,
}
