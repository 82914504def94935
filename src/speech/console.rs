use std::{
    io::{
        self,
        BufRead,
        BufReader,
    },
    sync::mpsc::{
        self,
        Receiver,
        RecvTimeoutError,
    },
    thread,
    time::Duration,
};

use super::{
    Recognizer,
    SpeechError,
};

/// Reads transcripts line by line from stdin.
///
/// A reader thread forwards lines so that `listen` can give up after its timeout.
pub struct ConsoleRecognizer {
    lines: Receiver<io::Result<String>>,
}

impl ConsoleRecognizer {
    pub fn spawn() -> Self {
        Self::from_reader(BufReader::new(io::stdin()))
    }

    pub fn from_reader<R: BufRead + Send + 'static>(reader: R) -> Self {
        let (sender, lines) = mpsc::channel();

        thread::spawn(move || {
            for line in reader.lines() {
                if sender.send(line).is_err() {
                    break;
                }
            }
        });

        Self { lines }
    }
}

impl Recognizer for ConsoleRecognizer {
    fn listen(&mut self, timeout: Duration) -> Result<String, SpeechError> {
        match self.lines.recv_timeout(timeout) {
            Ok(Ok(line)) if line.trim().is_empty() => Err(SpeechError::Unintelligible),
            Ok(Ok(line)) => Ok(line),
            Ok(Err(e)) => Err(SpeechError::Request(e.to_string())),
            Err(RecvTimeoutError::Timeout) => Err(SpeechError::Timeout),
            Err(RecvTimeoutError::Disconnected) => {
                Err(SpeechError::Request("input stream closed".to_string()))
            }
        }
    }
}
