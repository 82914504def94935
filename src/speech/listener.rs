use std::{
    sync::{
        atomic::{
            AtomicBool,
            Ordering,
        },
        mpsc::Sender,
        Arc,
    },
    thread::{
        self,
        JoinHandle,
    },
    time::Duration,
};

use super::{
    Recognizer,
    SpeechError,
};
use crate::core::{
    lang::Lang,
    TrainerCommand,
};

pub const LISTEN_TIMEOUT: Duration = Duration::from_secs(5);
const DISABLED_POLL: Duration = Duration::from_millis(500);

/// Lowercased trigger phrases for the voice commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePhrases {
    pub next: String,
    pub stop: String,
}

impl VoicePhrases {
    pub fn from_lang(lang: &Lang) -> Self {
        Self { next: lang.phrase("speech_next"), stop: lang.phrase("speech_stop") }
    }

    pub fn command_for(&self, transcript: &str) -> Option<TrainerCommand> {
        let transcript = transcript.to_lowercase();
        if !self.next.is_empty() && transcript.contains(&self.next) {
            Some(TrainerCommand::Next)
        } else if !self.stop.is_empty() && transcript.contains(&self.stop) {
            Some(TrainerCommand::Stop)
        } else {
            None
        }
    }
}

/// Handle to the background thread that turns speech into trainer commands.
pub struct VoiceListener {
    running: Arc<AtomicBool>,
    enabled: Arc<AtomicBool>,
    join_handle: Option<JoinHandle<()>>,
}

impl VoiceListener {
    pub fn spawn<R>(recognizer: R, phrases: VoicePhrases, commands: Sender<TrainerCommand>) -> Self
    where
        R: Recognizer + 'static,
    {
        let running = Arc::new(AtomicBool::new(true));
        let enabled = Arc::new(AtomicBool::new(true));

        let worker_running = Arc::clone(&running);
        let worker_enabled = Arc::clone(&enabled);
        let join_handle = thread::spawn(move || {
            let mut recognizer = recognizer;
            listen_loop(
                &mut recognizer,
                &phrases,
                &commands,
                &worker_running,
                &worker_enabled,
                DISABLED_POLL,
            );
            worker_running.store(false, Ordering::Relaxed);
        });

        tracing::info!("Voice listener started");
        Self { running, enabled, join_handle: Some(join_handle) }
    }

    /// Speech is ignored while disabled; the timer turns it off.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::Relaxed);
    }
}

impl Drop for VoiceListener {
    fn drop(&mut self) {
        // The thread may be blocked in `listen`; it is not joined.
        self.stop();
    }
}

fn listen_loop(
    recognizer: &mut dyn Recognizer,
    phrases: &VoicePhrases,
    commands: &Sender<TrainerCommand>,
    running: &AtomicBool,
    enabled: &AtomicBool,
    disabled_poll: Duration,
) {
    while running.load(Ordering::Relaxed) {
        if !enabled.load(Ordering::Relaxed) {
            thread::sleep(disabled_poll);
            continue;
        }

        tracing::debug!("Listening for voice commands");
        let transcript = match recognizer.listen(LISTEN_TIMEOUT) {
            Ok(transcript) => transcript,
            Err(SpeechError::Timeout | SpeechError::Unintelligible) => continue,
            Err(e) => {
                tracing::error!("Voice listener stopped: {}", e);
                return;
            }
        };

        if !enabled.load(Ordering::Relaxed) {
            continue;
        }

        tracing::info!("Heard: {}", transcript);
        let Some(command) = phrases.command_for(&transcript) else {
            continue;
        };

        if commands.send(command).is_err() {
            tracing::debug!("Command receiver gone, voice listener exiting");
            return;
        }
        if command == TrainerCommand::Stop {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::VecDeque,
        sync::{
            atomic::AtomicUsize,
            mpsc,
        },
    };

    use super::*;

    struct ScriptedRecognizer {
        script: VecDeque<Result<String, SpeechError>>,
    }

    impl ScriptedRecognizer {
        fn new(script: Vec<Result<&str, SpeechError>>) -> Self {
            Self { script: script.into_iter().map(|r| r.map(String::from)).collect() }
        }
    }

    impl Recognizer for ScriptedRecognizer {
        fn listen(&mut self, _timeout: Duration) -> Result<String, SpeechError> {
            self.script
                .pop_front()
                .unwrap_or_else(|| Err(SpeechError::Request("script exhausted".to_string())))
        }
    }

    fn phrases() -> VoicePhrases {
        VoicePhrases { next: "next".to_string(), stop: "stop".to_string() }
    }

    fn run(recognizer: &mut ScriptedRecognizer) -> Vec<TrainerCommand> {
        let (sender, receiver) = mpsc::channel();
        let running = AtomicBool::new(true);
        let enabled = AtomicBool::new(true);
        listen_loop(recognizer, &phrases(), &sender, &running, &enabled, Duration::ZERO);
        drop(sender);
        receiver.iter().collect()
    }

    #[test]
    fn test_phrase_matching_is_case_insensitive() {
        assert_eq!(phrases().command_for("NEXT chord please"), Some(TrainerCommand::Next));
        assert_eq!(phrases().command_for("Stop it"), Some(TrainerCommand::Stop));
        assert_eq!(phrases().command_for("hello"), None);
    }

    #[test]
    fn test_retries_until_a_request_error() {
        let mut recognizer = ScriptedRecognizer::new(vec![
            Err(SpeechError::Timeout),
            Ok("next one"),
            Err(SpeechError::Unintelligible),
            Ok("something else"),
            Ok("Next"),
            Err(SpeechError::Request("offline".to_string())),
            Ok("next"),
        ]);

        let commands = run(&mut recognizer);

        assert_eq!(commands, vec![TrainerCommand::Next, TrainerCommand::Next]);
        assert_eq!(recognizer.script.len(), 1);
    }

    #[test]
    fn test_stop_ends_the_loop() {
        let mut recognizer = ScriptedRecognizer::new(vec![Ok("stop"), Ok("next")]);

        assert_eq!(run(&mut recognizer), vec![TrainerCommand::Stop]);
        assert_eq!(recognizer.script.len(), 1);
    }

    /// Switches speech off while "listening", as the timer does mid-phrase.
    struct GatingRecognizer<'a> {
        enabled: &'a AtomicBool,
        calls: &'a AtomicUsize,
    }

    impl Recognizer for GatingRecognizer<'_> {
        fn listen(&mut self, _timeout: Duration) -> Result<String, SpeechError> {
            match self.calls.fetch_add(1, Ordering::SeqCst) {
                0 => {
                    self.enabled.store(false, Ordering::SeqCst);
                    Ok("next".to_string())
                }
                _ => Ok("stop".to_string()),
            }
        }
    }

    #[test]
    fn test_transcript_heard_while_disabled_is_dropped() {
        let (sender, receiver) = mpsc::channel();
        let running = AtomicBool::new(true);
        let enabled = AtomicBool::new(true);
        let calls = AtomicUsize::new(0);

        thread::scope(|scope| {
            scope.spawn(|| {
                let mut recognizer = GatingRecognizer { enabled: &enabled, calls: &calls };
                listen_loop(
                    &mut recognizer,
                    &phrases(),
                    &sender,
                    &running,
                    &enabled,
                    Duration::from_millis(5),
                );
            });

            while calls.load(Ordering::SeqCst) == 0 {
                thread::sleep(Duration::from_millis(5));
            }
            thread::sleep(Duration::from_millis(50));

            // Disabled: the "next" was discarded and nobody is listening.
            assert!(receiver.try_recv().is_err());
            assert_eq!(calls.load(Ordering::SeqCst), 1);

            enabled.store(true, Ordering::SeqCst);
        });

        assert_eq!(receiver.try_iter().collect::<Vec<_>>(), vec![TrainerCommand::Stop]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_spawned_listener_forwards_commands() {
        let (sender, receiver) = mpsc::channel();
        let recognizer = ScriptedRecognizer::new(vec![Ok("next"), Ok("stop")]);

        let listener = VoiceListener::spawn(recognizer, phrases(), sender);

        assert_eq!(receiver.recv_timeout(Duration::from_secs(5)), Ok(TrainerCommand::Next));
        assert_eq!(receiver.recv_timeout(Duration::from_secs(5)), Ok(TrainerCommand::Stop));
        assert!(listener.is_enabled());
    }
}
