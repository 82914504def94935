use eframe::egui;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DialogKind {
    #[default]
    Error,
    Info,
}

#[derive(Default, Clone)]
pub struct DialogData {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
    pub details: Option<String>,
}

/// Blocking message box used for errors, the info page and the manual.
pub struct ErrorModal {
    open: bool,
    data: DialogData,
}

impl ErrorModal {
    pub fn new() -> Self {
        Self { open: false, data: DialogData::default() }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn show_error(
        &mut self,
        title: impl Into<String>,
        message: impl Into<String>,
        details: Option<impl Into<String>>,
    ) {
        self.data = DialogData {
            kind: DialogKind::Error,
            title: title.into(),
            message: message.into(),
            details: details.map(|d| d.into()),
        };
        self.open = true;
    }

    pub fn show_info(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.data = DialogData {
            kind: DialogKind::Info,
            title: title.into(),
            message: message.into(),
            details: None,
        };
        self.open = true;
    }

    /// Returns `true` on the frame the dialog is dismissed.
    pub fn show(&mut self, ctx: &egui::Context, ok_label: &str, details_label: &str) -> bool {
        if !self.open {
            return false;
        }

        let modal = egui::Modal::new(egui::Id::new("dialog_modal")).show(ctx, |ui| {
            ui.set_width(450.0);

            ui.horizontal(|ui| {
                let (icon, color) = match self.data.kind {
                    DialogKind::Error => ("⚠", ui.visuals().warn_fg_color),
                    DialogKind::Info => ("ℹ", egui::Color32::LIGHT_BLUE),
                };
                ui.label(egui::RichText::new(icon).size(24.0).color(color));
                ui.label(egui::RichText::new(&self.data.title).size(18.0).strong());
            });

            ui.add_space(10.0);

            egui::ScrollArea::vertical().max_height(360.0).show(ui, |ui| {
                ui.label(egui::RichText::new(&self.data.message).size(14.0));
            });

            if let Some(details) = &self.data.details {
                ui.add_space(10.0);
                ui.collapsing(details_label, |ui| {
                    ui.add(
                        egui::TextEdit::multiline(&mut details.as_str())
                            .desired_width(f32::INFINITY)
                            .desired_rows(6)
                            .code_editor(),
                    );
                });
            }

            ui.add_space(15.0);

            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button(ok_label).clicked() {
                    ui.close();
                }
            });
        });

        if modal.should_close() {
            self.open = false;
            self.data = DialogData::default();
            return true;
        }

        false
    }
}

impl Default for ErrorModal {
    fn default() -> Self {
        Self::new()
    }
}
