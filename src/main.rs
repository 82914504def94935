use std::sync::mpsc;

use eframe::egui;
use tracing_subscriber::EnvFilter;
use uketrainer::{
    core::{
        catalog::load_catalog_or_empty,
        config::AppConfig,
        history::FileHistorySink,
        lang::{
            system_language,
            Lang,
        },
        TrainerSession,
    },
    gui::{
        Startup,
        TrainerApp,
    },
    speech::{
        open_recognizer,
        SpeechSettings,
        VoiceListener,
        VoicePhrases,
    },
};

fn main() -> eframe::Result {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("uketrainer=info")),
        )
        .init();

    let config_path = AppConfig::default_path();
    let config = AppConfig::load(&config_path);

    let lang = match Lang::load(&config.lang_dir, &system_language()) {
        Ok(lang) => lang,
        Err(e) => {
            tracing::error!("Cannot start without language files: {}", e);
            std::process::exit(1);
        }
    };

    let catalog = load_catalog_or_empty(&config.chord_file);
    let session = TrainerSession::new(catalog, config.difficulty, config.max_history)
        .with_sink(FileHistorySink::in_app_data_dir())
        .with_timer_interval(config.timer_interval_secs);

    let (sender, commands) = mpsc::channel();
    let listener = config.speech_enabled.then(|| {
        let recognizer = open_recognizer(&SpeechSettings::new(&config, &lang));
        tracing::info!("{}", lang.get("speech_info"));
        VoiceListener::spawn(recognizer, VoicePhrases::from_lang(&lang), sender)
    });

    let version = lang.format("info_version", &[("version", &env!("CARGO_PKG_VERSION"))]);
    let title = format!("{} - {}", lang.get("title"), version);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(&title)
            .with_inner_size([900.0, 640.0])
            .with_min_inner_size([760.0, 520.0]),
        ..Default::default()
    };

    tracing::info!("Starting {}", title);
    eframe::run_native(
        &title,
        options,
        Box::new(move |cc| {
            Ok(Box::new(TrainerApp::new(
                cc,
                Startup { session, config, config_path, lang, commands, listener },
            )))
        }),
    )
}
