use std::{
    collections::BTreeSet,
    path::{
        Path,
        PathBuf,
    },
};

use eframe::egui::{
    self,
    Modal,
};
use egui_extras::{
    Column as TableColumn,
    TableBuilder,
};

use super::error_modal::ErrorModal;
use crate::core::{
    editor::{
        ChordEditor,
        Column,
        RowTemplate,
    },
    lang::Lang,
    Catalog,
    Difficulty,
    TrainerError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Confirm {
    Delete,
    Close,
}

/// The chord editor window.
pub struct EditorModal {
    editor: Option<ChordEditor>,
    chord_file: PathBuf,
    tab: Difficulty,
    selected: BTreeSet<usize>,
    confirm: Option<Confirm>,
    dialog: ErrorModal,
}

impl Default for EditorModal {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorModal {
    pub fn new() -> Self {
        Self {
            editor: None,
            chord_file: PathBuf::new(),
            tab: Difficulty::Easy,
            selected: BTreeSet::new(),
            confirm: None,
            dialog: ErrorModal::new(),
        }
    }

    pub fn is_open(&self) -> bool {
        self.editor.is_some()
    }

    pub fn open_editor(
        &mut self,
        catalog: Catalog,
        chord_file: PathBuf,
        lang: &Lang,
    ) -> Result<(), TrainerError> {
        if self.is_open() {
            return Ok(());
        }

        let template = RowTemplate {
            name: lang.get("editor_placeholder1").to_string(),
            fingering: lang.get("editor_placeholder2").to_string(),
        };
        self.editor = Some(ChordEditor::new(catalog, template)?);
        self.chord_file = chord_file;
        self.tab = Difficulty::Easy;
        self.selected.clear();
        self.confirm = None;
        tracing::info!("Chord editor opened");
        Ok(())
    }

    /// Returns the saved catalog on the frame the window closes after a successful save.
    pub fn show(&mut self, ctx: &egui::Context, lang: &Lang) -> Option<Catalog> {
        let Some(editor) = self.editor.as_mut() else {
            return None;
        };

        let mut close_requested = false;
        let mut save_clicked = false;
        let mut edits: Vec<(usize, Column, String)> = Vec::new();

        let modal = Modal::new(egui::Id::new("chord_editor_modal")).show(ctx, |ui| {
            ui.set_width(900.0);
            ui.heading(lang.get("editor_title"));
            ui.label(lang.get("editor_info_text"));
            ui.add_space(6.0);

            ui.horizontal(|ui| {
                for difficulty in Difficulty::ALL {
                    if ui
                        .selectable_label(self.tab == difficulty, lang.get(difficulty.lang_key()))
                        .clicked()
                        && self.tab != difficulty
                    {
                        self.tab = difficulty;
                        self.selected.clear();
                    }
                }
            });
            ui.separator();

            let rows = editor.rows(self.tab);
            egui::ScrollArea::vertical().max_height(380.0).auto_shrink([false, true]).show(
                ui,
                |ui| {
                    let mut table = TableBuilder::new(ui)
                        .striped(true)
                        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                        .column(TableColumn::exact(26.0));
                    for column in Column::ALL {
                        table = table.column(match column {
                            Column::Name => TableColumn::initial(110.0).at_least(80.0),
                            _ => TableColumn::initial(140.0).at_least(90.0),
                        });
                    }

                    table
                        .header(24.0, |mut header| {
                            header.col(|_ui| {});
                            for column in Column::ALL {
                                header.col(|ui| {
                                    ui.label(egui::RichText::new(lang.get(header_key(column))).strong());
                                });
                            }
                        })
                        .body(|body| {
                            body.rows(28.0, rows.len(), |mut row| {
                                let index = row.index();
                                let chord = &rows[index];

                                row.col(|ui| {
                                    let mut checked = self.selected.contains(&index);
                                    if ui.add(egui::Checkbox::without_text(&mut checked)).changed() {
                                        if checked {
                                            self.selected.insert(index);
                                        } else {
                                            self.selected.remove(&index);
                                        }
                                    }
                                });

                                for column in Column::ALL {
                                    row.col(|ui| {
                                        let mut value = chord.cell(column).to_string();
                                        let response = ui.add(
                                            egui::TextEdit::singleline(&mut value)
                                                .desired_width(f32::INFINITY),
                                        );
                                        if response.changed() {
                                            edits.push((index, column, value));
                                        }
                                    });
                                }
                            });
                        });
                },
            );

            ui.separator();

            let dirty = editor.is_dirty();
            ui.horizontal(|ui| {
                if ui.button(lang.get("editor_button_add")).clicked() {
                    editor.add_row(self.tab);
                }
                if ui.button(lang.get("editor_button_delete")).clicked() {
                    if self.selected.is_empty() {
                        self.dialog.show_info(
                            lang.get("error_editor_no_selection_title"),
                            lang.get("error_editor_no_selection_message"),
                        );
                    } else {
                        self.confirm = Some(Confirm::Delete);
                    }
                }
                if ui.add_enabled(dirty, egui::Button::new(lang.get("editor_button_reset"))).clicked() {
                    editor.reset();
                    self.selected.clear();
                }
                save_clicked =
                    ui.add_enabled(dirty, egui::Button::new(lang.get("editor_button_save"))).clicked();

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button(lang.get("editor_button_close")).clicked() {
                        close_requested = true;
                    }
                    if dirty {
                        ui.colored_label(ui.visuals().warn_fg_color, "●");
                    }
                });
            });
        });

        for (row, column, value) in edits {
            editor.set_cell(self.tab, row, column, value);
        }

        if save_clicked {
            Self::save(editor, &self.chord_file, &mut self.dialog, lang);
        }

        if modal.should_close() {
            close_requested = true;
        }

        if let Some(choice) = self.confirm {
            match confirm_modal(ctx, lang, choice) {
                Some(ConfirmAnswer::Yes) => {
                    self.confirm = None;
                    match choice {
                        Confirm::Delete => {
                            let indices: Vec<usize> = self.selected.iter().copied().collect();
                            editor.delete_rows(self.tab, &indices);
                            self.selected.clear();
                        }
                        Confirm::Close => {
                            if Self::save(editor, &self.chord_file, &mut self.dialog, lang) {
                                return self.close();
                            }
                        }
                    }
                }
                Some(ConfirmAnswer::No) => {
                    self.confirm = None;
                    if choice == Confirm::Close {
                        return self.close();
                    }
                }
                Some(ConfirmAnswer::Cancel) => self.confirm = None,
                None => {}
            }
        } else if close_requested && !self.dialog.is_open() {
            if editor.is_dirty() {
                self.confirm = Some(Confirm::Close);
            } else {
                return self.close();
            }
        }

        self.dialog.show(ctx, lang.get("button_ok"), lang.get("error_details"));
        None
    }

    /// Returns whether the editor is clean afterwards.
    fn save(editor: &mut ChordEditor, path: &Path, dialog: &mut ErrorModal, lang: &Lang) -> bool {
        match editor.save(path) {
            Ok(Some(_)) => {
                dialog.show_info(lang.get("editor_button_save"), lang.get("editor_save_success_message"));
                true
            }
            Ok(None) => true,
            Err(TrainerError::Validation { errors }) => {
                let details = editor
                    .validate()
                    .issues
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("\n");
                dialog.show_error(
                    lang.get("error_editor_validation_title"),
                    lang.format("error_editor_validation_message", &[("errors", &errors)]),
                    Some(details),
                );
                false
            }
            Err(e) => {
                tracing::error!("Failed to save chords to {}: {}", path.display(), e);
                dialog.show_error(
                    lang.get("error_editor_saving_title"),
                    lang.get("error_editor_saving_message"),
                    Some(e.to_string()),
                );
                false
            }
        }
    }

    fn close(&mut self) -> Option<Catalog> {
        let editor = self.editor.take()?;
        tracing::info!("Chord editor closed");
        editor.saved().then(|| editor.prepare_save_data())
    }
}

fn header_key(column: Column) -> &'static str {
    match column {
        Column::Name => "editor_chordname",
        Column::Fingering => "editor_fingering",
        Column::Fingers => "editor_fingers",
        Column::NotesOnStrings => "editor_notes_on_strings",
        Column::ChordNotes => "editor_chord_notes",
        Column::Intervals => "editor_interval",
    }
}

enum ConfirmAnswer {
    Yes,
    No,
    Cancel,
}

fn confirm_modal(ctx: &egui::Context, lang: &Lang, confirm: Confirm) -> Option<ConfirmAnswer> {
    let (title, message) = match confirm {
        Confirm::Delete => ("editor_confirm_delete_title", "editor_confirm_delete_message"),
        Confirm::Close => ("editor_confirm_close_title", "editor_confirm_close_message"),
    };

    let mut answer = None;
    let modal = Modal::new(egui::Id::new("editor_confirm_modal")).show(ctx, |ui| {
        ui.set_width(360.0);
        ui.label(egui::RichText::new(lang.get(title)).size(16.0).strong());
        ui.add_space(8.0);
        ui.label(lang.get(message));
        ui.add_space(12.0);

        ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
            if confirm == Confirm::Close && ui.button(lang.get("button_cancel")).clicked() {
                answer = Some(ConfirmAnswer::Cancel);
            }
            if ui.button(lang.get("button_no")).clicked() {
                answer = Some(ConfirmAnswer::No);
            }
            if ui.button(lang.get("button_yes")).clicked() {
                answer = Some(ConfirmAnswer::Yes);
            }
        });
    });

    if answer.is_none() && modal.should_close() {
        answer = Some(ConfirmAnswer::Cancel);
    }
    answer
}
