pub mod app;
pub mod editor_modal;
pub mod error_modal;
pub mod fretboard;
pub mod theme;
pub mod top_bar;
pub mod view;

pub use app::{
    Startup,
    TrainerApp,
};
