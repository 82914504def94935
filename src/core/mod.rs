pub mod catalog;
pub mod config;
pub mod editor;
pub mod errors;
pub mod fretboard;
pub mod history;
pub mod lang;
pub mod models;
pub mod navigator;
pub mod presenter;
pub mod selector;
pub mod session;
pub mod timer;

pub use errors::TrainerError;
pub use models::{ Catalog, ChordRecord, Difficulty };
pub use presenter::{ ChordPresenter, Notice, TrainerCommand };
pub use session::TrainerSession;
