use eframe::egui;

use super::{
    fretboard::fretboard,
    theme::Theme,
};
use crate::core::{
    config::{
        ChordDisplay,
        Hand,
    },
    fretboard::ChordShape,
    history::HistoryBuffer,
    lang::Lang,
    ChordPresenter,
    ChordRecord,
    Notice,
    TrainerCommand,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewAction {
    Command(TrainerCommand),
    SetDisplay(ChordDisplay),
    SetHand(Hand),
}

/// Main trainer screen. Holds only what the session last told it to show.
#[derive(Default)]
pub struct TrainerView {
    chord: Option<ChordRecord>,
    learned: u32,
    history: Vec<String>,
    notice: Option<Notice>,
    can_go_back: bool,
    can_go_forward: bool,
    timer_running: bool,
}

impl ChordPresenter for TrainerView {
    fn show_chord(&mut self, chord: &ChordRecord) {
        self.chord = Some(chord.clone());
    }

    fn update_learned(&mut self, count: u32) {
        self.learned = count;
    }

    fn update_history(&mut self, history: &HistoryBuffer) {
        self.history = history.names().map(String::from).collect();
    }

    fn update_status(&mut self, notice: Option<Notice>) {
        self.notice = notice;
    }

    fn update_navigation(&mut self, can_go_back: bool, can_go_forward: bool) {
        self.can_go_back = can_go_back;
        self.can_go_forward = can_go_forward;
    }

    fn set_timer_running(&mut self, running: bool) {
        self.timer_running = running;
    }
}

impl TrainerView {
    pub fn show(
        &self,
        ctx: &egui::Context,
        theme: &Theme,
        lang: &Lang,
        display: ChordDisplay,
        hand: Hand,
    ) -> Option<ViewAction> {
        let mut action = None;

        egui::TopBottomPanel::bottom("status_panel").min_height(36.0).show(ctx, |ui| {
            ui.centered_and_justified(|ui| {
                if let Some(text) = self.notice.map(|notice| notice_text(notice, lang)) {
                    ui.label(egui::RichText::new(text).size(16.0));
                }
            });
        });

        egui::SidePanel::left("chord_info_panel").resizable(false).exact_width(220.0).show(
            ctx,
            |ui| {
                ui.add_space(8.0);
                self.chord_info(ui, theme, lang);
                ui.separator();
                self.statistics(ui, theme, lang);
            },
        );

        egui::SidePanel::right("controls_panel").resizable(false).exact_width(220.0).show(
            ctx,
            |ui| {
                ui.add_space(8.0);
                if let Some(a) = display_settings(ui, theme, lang, display, hand) {
                    action = Some(a);
                }
                ui.separator();
                if let Some(a) = self.controls(ui, theme, lang) {
                    action = Some(a);
                }
            },
        );

        egui::CentralPanel::default().show(ctx, |ui| {
            let shape = self.chord.as_ref().map(|chord| ChordShape::from_chord(chord, display, hand));
            ui.vertical_centered(|ui| {
                fretboard(ui, shape.as_ref(), &theme.fretboard);
            });
        });

        action
    }

    fn chord_info(&self, ui: &mut egui::Ui, theme: &Theme, lang: &Lang) {
        ui.vertical_centered(|ui| {
            ui.label(theme.heading(ui.visuals().dark_mode, lang.get("current_chord")));
            match &self.chord {
                Some(chord) => {
                    ui.label(theme.chord_name(&chord.name));
                    if chord.intervals.is_empty() {
                        ui.label(lang.get("error_intervals"));
                    } else {
                        ui.label(format!("{} {}", lang.get("chord_interval"), chord.intervals.join("-")));
                    }
                    if chord.chord_notes.is_empty() {
                        ui.label(lang.get("error_notes"));
                    } else {
                        ui.label(format!("{} {}", lang.get("chord_notes"), chord.chord_notes.join("-")));
                    }
                }
                None => {
                    ui.label(theme.chord_name("-"));
                }
            }
        });
    }

    fn statistics(&self, ui: &mut egui::Ui, theme: &Theme, lang: &Lang) {
        ui.vertical_centered(|ui| {
            ui.label(theme.heading(ui.visuals().dark_mode, lang.get("chord_statistics")));
            ui.label(lang.format("learned_chords_text", &[("count", &self.learned)]));
            ui.add_space(6.0);
            ui.label(lang.get("chord_history"));
            ui.label(self.history.join(" "));
        });
    }

    fn controls(&self, ui: &mut egui::Ui, theme: &Theme, lang: &Lang) -> Option<ViewAction> {
        let mut command = None;
        let manual = !self.timer_running;

        ui.vertical_centered(|ui| {
            ui.label(theme.heading(ui.visuals().dark_mode, lang.get("trainer_controls")));
            ui.add_space(4.0);

            if ui.add_enabled(manual, egui::Button::new(lang.get("next_chord_button"))).clicked() {
                command = Some(TrainerCommand::Next);
            }
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(manual && self.can_go_back, egui::Button::new(lang.get("previous_chord_button")))
                    .clicked()
                {
                    command = Some(TrainerCommand::Previous);
                }
                if ui
                    .add_enabled(manual && self.can_go_forward, egui::Button::new(lang.get("forward_chord_button")))
                    .clicked()
                {
                    command = Some(TrainerCommand::Forward);
                }
            });

            let timer_label =
                if self.timer_running { "timer_button_stop" } else { "timer_button_start" };
            if ui.button(lang.get(timer_label)).clicked() {
                command = Some(TrainerCommand::ToggleTimer);
            }
        });

        command.map(ViewAction::Command)
    }
}

fn display_settings(
    ui: &mut egui::Ui,
    theme: &Theme,
    lang: &Lang,
    display: ChordDisplay,
    hand: Hand,
) -> Option<ViewAction> {
    let mut action = None;

    ui.vertical_centered(|ui| {
        ui.label(theme.heading(ui.visuals().dark_mode, lang.get("chord_display_headline")));
        ui.label(lang.get("chord_display_setting"));
        ui.horizontal(|ui| {
            for (value, key) in
                [(ChordDisplay::Frets, "chord_setting_frets"), (ChordDisplay::Fingers, "chord_setting_fingering")]
            {
                if ui.selectable_label(display == value, lang.get(key)).clicked() && display != value {
                    action = Some(ViewAction::SetDisplay(value));
                }
            }
        });

        ui.label(lang.get("chord_hand_preference"));
        ui.horizontal(|ui| {
            for (value, key) in [(Hand::Left, "chord_hand_left"), (Hand::Right, "chord_hand_right")] {
                if ui.selectable_label(hand == value, lang.get(key)).clicked() && hand != value {
                    action = Some(ViewAction::SetHand(value));
                }
            }
        });
    });

    action
}

pub fn notice_text(notice: Notice, lang: &Lang) -> String {
    match notice {
        Notice::NoMoreBack => lang.get("no_more_back").to_string(),
        Notice::AlreadyLatest => lang.get("already_latest").to_string(),
        Notice::EmptyTier(difficulty) => {
            lang.format("error_empty_difficulty", &[("difficulty", &lang.get(difficulty.lang_key()))])
        }
        Notice::Countdown(seconds_left) => {
            lang.format("timer_text", &[("seconds_left", &seconds_left)])
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use serde_json::json;

    use super::*;

    fn lang() -> Lang {
        let strings: HashMap<String, serde_json::Value> = serde_json::from_value(json!({
            "no_more_back": "No more chords back",
            "timer_text": "Next chord in {seconds_left}s",
            "difficulty_hard": "Hard",
            "error_empty_difficulty": "No chords for {difficulty}"
        }))
        .unwrap();
        Lang::from_map("en_US", strings)
    }

    #[test]
    fn test_notice_text() {
        let lang = lang();
        assert_eq!(notice_text(Notice::NoMoreBack, &lang), "No more chords back");
        assert_eq!(notice_text(Notice::Countdown(3), &lang), "Next chord in 3s");
        assert_eq!(
            notice_text(Notice::EmptyTier(crate::core::Difficulty::Hard), &lang),
            "No chords for Hard"
        );
    }

    #[test]
    fn test_view_records_presenter_updates() {
        let mut view = TrainerView::default();
        let mut history = HistoryBuffer::new(4);
        history.append("C");
        history.append("Am");

        view.show_chord(&ChordRecord::new("Am"));
        view.update_history(&history);
        view.update_navigation(true, false);

        assert_eq!(view.chord.as_ref().map(|c| c.name.as_str()), Some("Am"));
        assert_eq!(view.history, vec!["C", "Am"]);
        assert!(view.can_go_back && !view.can_go_forward);
    }
}
