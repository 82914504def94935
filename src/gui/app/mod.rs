mod modals;

use std::{
    ops::ControlFlow,
    path::PathBuf,
    sync::mpsc::{
        Receiver,
        TryRecvError,
    },
    time::{
        Duration,
        Instant,
    },
};

use eframe::egui;
use modals::Modals;

use super::{
    theme::{
        apply_theme_mode,
        set_theme,
        Theme,
    },
    top_bar::{
        TopBar,
        TopBarAction,
        PROJECT_URL,
    },
    view::{
        TrainerView,
        ViewAction,
    },
};
use crate::{
    core::{
        catalog::load_catalog_or_empty,
        config::AppConfig,
        lang::Lang,
        TrainerCommand,
        TrainerSession,
    },
    speech::VoiceListener,
};

const TICK: Duration = Duration::from_secs(1);
const COMMAND_POLL: Duration = Duration::from_millis(200);

/// Everything `main` prepares before the window opens.
pub struct Startup {
    pub session: TrainerSession,
    pub config: AppConfig,
    pub config_path: PathBuf,
    pub lang: Lang,
    pub commands: Receiver<TrainerCommand>,
    pub listener: Option<VoiceListener>,
}

pub struct TrainerApp {
    session: TrainerSession,
    view: TrainerView,

    // Configuration
    config: AppConfig,
    config_path: PathBuf,
    lang: Lang,

    // UI State
    theme: Theme,
    modals: Modals,
    ticker: SecondTicker,

    // Voice input
    commands: Receiver<TrainerCommand>,
    listener: Option<VoiceListener>,
}

impl TrainerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, startup: Startup) -> Self {
        let Startup { session, config, config_path, lang, commands, listener } = startup;

        let mut app = Self {
            session,
            view: TrainerView::default(),
            config,
            config_path,
            lang,
            theme: Theme::default(),
            modals: Modals::default(),
            ticker: SecondTicker::default(),
            commands,
            listener,
        };

        cc.egui_ctx.set_zoom_factor(cc.egui_ctx.zoom_factor() + 0.2);
        set_theme(&cc.egui_ctx, &app.theme, app.config.theme);

        if app.session.next_chord(&mut app.view).is_none() {
            tracing::warn!("Starting without a chord for '{}'", app.session.difficulty());
        }

        app
    }

    fn handle_command(&mut self, command: TrainerCommand, ctx: &egui::Context) {
        if let ControlFlow::Break(()) = self.session.handle_command(command, &mut self.view) {
            tracing::info!("Stop requested");
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
            return;
        }

        if command == TrainerCommand::ToggleTimer {
            sync_timer_state(&self.session, self.listener.as_ref(), &mut self.ticker);
        }
    }

    fn poll_commands(&mut self, ctx: &egui::Context) {
        loop {
            match self.commands.try_recv() {
                Ok(command) => self.handle_command(command, ctx),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    if self.listener.take().is_some() {
                        tracing::debug!("Voice listener channel closed");
                    }
                    break;
                }
            }
        }
    }

    fn tick_timer(&mut self, ctx: &egui::Context) {
        if !self.session.timer_running() {
            return;
        }

        for _ in 0..self.ticker.due(Instant::now()) {
            self.session.tick_timer(&mut self.view);
        }
        ctx.request_repaint_after(self.ticker.until_next(Instant::now()));
    }

    fn handle_top_bar(&mut self, action: TopBarAction, ctx: &egui::Context) {
        match action {
            TopBarAction::ReloadChords => {
                let catalog = load_catalog_or_empty(&self.config.chord_file);
                if !self.session.reload_catalog(catalog) {
                    self.modals.dialog.show_error(
                        self.lang.get("error_title"),
                        self.lang.get("error_missing_chords_file"),
                        Some(self.config.chord_file.display().to_string()),
                    );
                }
            }
            TopBarAction::Quit => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
            TopBarAction::SetTheme(mode) => {
                apply_theme_mode(ctx, mode);
                self.config.theme = mode;
                self.save_config();
            }
            TopBarAction::SetDifficulty(difficulty) => {
                if self.session.set_difficulty(difficulty, &mut self.view) {
                    self.config.difficulty = difficulty;
                    self.save_config();
                }
            }
            TopBarAction::OpenEditor => {
                let catalog = self.session.catalog().clone();
                if let Err(e) =
                    self.modals.editor.open_editor(catalog, self.config.chord_file.clone(), &self.lang)
                {
                    self.modals.dialog.show_error(
                        self.lang.get("error_title"),
                        self.lang.get("error_editor_open"),
                        Some(e.to_string()),
                    );
                }
            }
            TopBarAction::ShowInfo => {
                let lang = &self.lang;
                let text = format!(
                    "{}\n{}\n\n{}\n\n{}:\n{}",
                    lang.get("info_title"),
                    lang.format("info_version", &[("version", &env!("CARGO_PKG_VERSION"))]),
                    lang.get("info_author"),
                    lang.get("info_description_heading"),
                    lang.get("info_description"),
                );
                self.modals.dialog.show_info(lang.get("submenu_info"), text);
            }
            TopBarAction::OpenProjectPage => {
                ctx.open_url(egui::OpenUrl::new_tab(PROJECT_URL));
            }
            TopBarAction::ShowManual => {
                self.modals
                    .dialog
                    .show_info(self.lang.get("short_manual_title"), self.lang.lines("short_manual_text"));
            }
        }
    }

    fn handle_view(&mut self, action: ViewAction, ctx: &egui::Context) {
        match action {
            ViewAction::Command(command) => self.handle_command(command, ctx),
            ViewAction::SetDisplay(display) => {
                self.config.chord_display = display;
                self.save_config();
            }
            ViewAction::SetHand(hand) => {
                self.config.preferred_hand = hand;
                self.save_config();
            }
        }
    }

    fn save_config(&self) {
        self.config.save_best_effort(&self.config_path);
    }
}

impl eframe::App for TrainerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_commands(ctx);
        self.tick_timer(ctx);

        if let Some(action) =
            TopBar::show(ctx, &self.lang, self.config.theme, self.session.difficulty())
        {
            self.handle_top_bar(action, ctx);
        }

        if let Some(action) = self.view.show(
            ctx,
            &self.theme,
            &self.lang,
            self.config.chord_display,
            self.config.preferred_hand,
        ) {
            self.handle_view(action, ctx);
        }

        if let Some(catalog) = self.modals.editor.show(ctx, &self.lang) {
            self.session.apply_edited_catalog(catalog, &mut self.view);
        }
        self.modals.dialog.show(ctx, self.lang.get("button_ok"), self.lang.get("error_details"));

        if self.listener.is_some() {
            ctx.request_repaint_after(COMMAND_POLL);
        }
    }
}

/// Speech input stays off while the countdown runs.
fn sync_timer_state(
    session: &TrainerSession,
    listener: Option<&VoiceListener>,
    ticker: &mut SecondTicker,
) {
    let running = session.timer_running();
    if let Some(listener) = listener {
        listener.set_enabled(!running);
    }
    ticker.reset(running.then(Instant::now));
}

/// Converts wall time into whole-second timer ticks.
#[derive(Debug, Default)]
struct SecondTicker {
    last: Option<Instant>,
}

impl SecondTicker {
    fn reset(&mut self, start: Option<Instant>) {
        self.last = start;
    }

    /// Number of whole seconds elapsed since the last tick.
    fn due(&mut self, now: Instant) -> u32 {
        let last = *self.last.get_or_insert(now);
        let elapsed = now.saturating_duration_since(last);
        let ticks = (elapsed.as_millis() / TICK.as_millis()) as u32;
        if ticks > 0 {
            self.last = Some(last + TICK * ticks);
        }
        ticks
    }

    fn until_next(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => (last + TICK).saturating_duration_since(now),
            None => TICK,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        io::Cursor,
        sync::mpsc,
    };

    use super::*;
    use crate::{
        core::{
            ChordRecord,
            Difficulty,
        },
        speech::{
            ConsoleRecognizer,
            VoicePhrases,
        },
    };

    #[test]
    fn test_timer_switches_voice_input_off_and_back_on() {
        let (sender, _commands) = mpsc::channel();
        let phrases = VoicePhrases { next: "next".to_string(), stop: "stop".to_string() };
        let listener =
            VoiceListener::spawn(ConsoleRecognizer::from_reader(Cursor::new("")), phrases, sender);
        let mut catalog = crate::core::Catalog::new();
        catalog.push(Difficulty::Easy, ChordRecord::new("C"));
        let mut session = TrainerSession::new(catalog, Difficulty::Easy, 4);
        let mut view = TrainerView::default();
        let mut ticker = SecondTicker::default();

        assert!(session.handle_command(TrainerCommand::ToggleTimer, &mut view).is_continue());
        sync_timer_state(&session, Some(&listener), &mut ticker);
        assert!(!listener.is_enabled());
        assert!(ticker.last.is_some());

        assert!(session.handle_command(TrainerCommand::ToggleTimer, &mut view).is_continue());
        sync_timer_state(&session, Some(&listener), &mut ticker);
        assert!(listener.is_enabled());
        assert!(ticker.last.is_none());
    }

    #[test]
    fn test_ticker_counts_whole_seconds() {
        let start = Instant::now();
        let mut ticker = SecondTicker::default();
        ticker.reset(Some(start));

        assert_eq!(ticker.due(start + Duration::from_millis(900)), 0);
        assert_eq!(ticker.due(start + Duration::from_millis(1100)), 1);
        assert_eq!(ticker.due(start + Duration::from_millis(3500)), 2);
        assert_eq!(ticker.until_next(start + Duration::from_millis(3500)), Duration::from_millis(500));
    }

    #[test]
    fn test_ticker_starts_on_first_poll() {
        let now = Instant::now();
        let mut ticker = SecondTicker::default();

        assert_eq!(ticker.due(now), 0);
        assert_eq!(ticker.due(now + Duration::from_secs(2)), 2);
    }
}
