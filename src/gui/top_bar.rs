use eframe::egui::{
    self,
    containers,
};

use crate::core::{
    config::ThemeMode,
    lang::Lang,
    Difficulty,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopBarAction {
    ReloadChords,
    Quit,
    SetTheme(ThemeMode),
    SetDifficulty(Difficulty),
    OpenEditor,
    ShowInfo,
    ShowManual,
    OpenProjectPage,
}

pub const PROJECT_URL: &str = "https://github.com/Ma-Ko-dev/UkuleleAkkordtrainer";

const HELP_ENTRIES: [(&str, TopBarAction); 3] = [
    ("submenu_info", TopBarAction::ShowInfo),
    ("submenu_short_manual", TopBarAction::ShowManual),
    ("submenu_github", TopBarAction::OpenProjectPage),
];

pub struct TopBar;

impl TopBar {
    pub fn show(
        ctx: &egui::Context,
        lang: &Lang,
        theme: ThemeMode,
        difficulty: Difficulty,
    ) -> Option<TopBarAction> {
        let mut action = None;

        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            containers::menu::Bar::new().ui(ui, |ui| {
                ui.menu_button(lang.get("menu_file"), |ui| {
                    if ui.button(lang.get("submenu_reload_chords")).clicked() {
                        action = Some(TopBarAction::ReloadChords);
                    }
                    if ui.button(lang.get("submenu_exit")).clicked() {
                        action = Some(TopBarAction::Quit);
                    }
                });

                ui.menu_button(lang.get("menu_options"), |ui| {
                    ui.menu_button(lang.get("submenu_colortheme"), |ui| {
                        for (mode, key) in
                            [(ThemeMode::Light, "theme_light"), (ThemeMode::Dark, "theme_dark")]
                        {
                            if ui.radio(theme == mode, lang.get(key)).clicked() && theme != mode {
                                action = Some(TopBarAction::SetTheme(mode));
                            }
                        }
                    });

                    ui.menu_button(lang.get("difficulty"), |ui| {
                        for level in Difficulty::ALL {
                            let button = egui::Button::new(lang.get(level.lang_key()));
                            if ui.add_enabled(level != difficulty, button).clicked() {
                                action = Some(TopBarAction::SetDifficulty(level));
                            }
                        }
                    });

                    if ui.button(lang.get("editor_title")).clicked() {
                        action = Some(TopBarAction::OpenEditor);
                    }
                });

                ui.menu_button(lang.get("menu_help"), |ui| {
                    for (key, entry) in HELP_ENTRIES {
                        if ui.button(lang.get(key)).clicked() {
                            action = Some(entry);
                        }
                    }
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(lang.get(difficulty.lang_key()));
                });
            });
        });

        action
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn test_help_menu_links_the_project_page() {
        assert!(HELP_ENTRIES.contains(&("submenu_github", TopBarAction::OpenProjectPage)));
        assert!(PROJECT_URL.starts_with("https://"));

        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("lang");
        let lang = Lang::load(&dir, "de_DE").unwrap();
        for (key, _) in HELP_ENTRIES {
            assert_ne!(lang.get(key), key, "missing label for {key}");
        }
    }
}
