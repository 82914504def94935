use crate::gui::{
    editor_modal::EditorModal,
    error_modal::ErrorModal,
};

pub struct Modals {
    pub dialog: ErrorModal,
    pub editor: EditorModal,
}

impl Default for Modals {
    fn default() -> Self {
        Self { dialog: ErrorModal::new(), editor: EditorModal::new() }
    }
}
