//! Executes a command script against a [`SolveService`].

use crate::puzzle_file::{FileError, PuzzleFile};
use crate::script::{parse_line, Command, ParseError};
use chrono::Utc;
use pwc_engine::{acrostic, crossword, spellingbee, Solve};
use pwc_event::Event;
use pwc_runtime::{EventSink, KeyValueStore, ServiceError, SolveService, ViewerStream};
use pwc_types::{ChannelName, ErrorCode, PuzzleKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::debug;

/// Failure of one script line. The script continues with the next line.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("cannot read {}: {source}", path.display())]
    ReadPuzzle {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    PuzzleFile(#[from] FileError),

    #[error("{command} is not available for {kind} puzzles")]
    WrongKind {
        command: &'static str,
        kind: PuzzleKind,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl ErrorCode for CommandError {
    fn code(&self) -> &'static str {
        match self {
            Self::Parse(_) => "CLI_PARSE",
            Self::ReadPuzzle { .. } => "CLI_READ_PUZZLE",
            Self::PuzzleFile(FileError::Json(_)) => "CLI_PUZZLE_FILE",
            Self::PuzzleFile(FileError::Puzzle(e)) => e.code(),
            Self::WrongKind { .. } => "CLI_WRONG_KIND",
            Self::Service(e) => e.code(),
        }
    }

    fn is_recoverable(&self) -> bool {
        match self {
            Self::Service(e) => e.is_recoverable(),
            _ => false,
        }
    }
}

/// Writes each event as one JSON line.
pub struct JsonLines<W> {
    out: W,
}

impl<W> JsonLines<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: AsyncWrite + Unpin + Send> EventSink for JsonLines<W> {
    type Error = std::io::Error;

    async fn send(&mut self, event: &Event) -> Result<(), std::io::Error> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');
        self.out.write_all(&line).await?;
        self.out.flush().await
    }
}

/// Runs `script` for one channel and kind.
///
/// Events reach `sink` after every line; command failures go to `errors`
/// as `error[CODE]: message`.
///
/// # Returns
///
/// Number of lines that failed.
///
/// # Errors
///
/// Only when the viewer stream cannot be opened or a write fails.
pub async fn run_script<S, O, E>(
    service: &SolveService<S>,
    kind: PuzzleKind,
    channel: &ChannelName,
    script: &str,
    sink: &mut O,
    errors: &mut E,
) -> anyhow::Result<usize>
where
    S: KeyValueStore,
    O: EventSink,
    O::Error: std::error::Error + Sync + 'static,
    E: AsyncWrite + Unpin,
{
    match kind {
        PuzzleKind::Crossword => {
            Runner::<crossword::State, _>::new(service, channel).run(script, sink, errors).await
        }
        PuzzleKind::Acrostic => {
            Runner::<acrostic::State, _>::new(service, channel).run(script, sink, errors).await
        }
        PuzzleKind::SpellingBee => {
            Runner::<spellingbee::State, _>::new(service, channel).run(script, sink, errors).await
        }
    }
}

struct Runner<'a, P, S> {
    service: &'a SolveService<S>,
    channel: &'a ChannelName,
    rng: StdRng,
    _kind: std::marker::PhantomData<P>,
}

impl<'a, P, S> Runner<'a, P, S>
where
    P: Solve,
    P::Puzzle: PuzzleFile,
    S: KeyValueStore,
{
    fn new(service: &'a SolveService<S>, channel: &'a ChannelName) -> Self {
        Self {
            service,
            channel,
            rng: StdRng::from_entropy(),
            _kind: std::marker::PhantomData,
        }
    }

    async fn run<O, E>(&mut self, script: &str, sink: &mut O, errors: &mut E) -> anyhow::Result<usize>
    where
        O: EventSink,
        O::Error: std::error::Error + Sync + 'static,
        E: AsyncWrite + Unpin,
    {
        let mut viewer = self.service.connect::<P>(self.channel).await?;
        relay(&mut viewer, sink).await?;

        let mut failed = 0;
        for (number, line) in script.lines().enumerate() {
            let result = match parse_line(line) {
                Ok(Some(command)) => self.execute(command).await,
                Ok(None) => continue,
                Err(e) => Err(e.into()),
            };
            if let Err(e) = result {
                failed += 1;
                debug!(line = number + 1, error = %e, "Command failed");
                let message = format!("error[{}]: {e}\n", e.code());
                errors.write_all(message.as_bytes()).await?;
                errors.flush().await?;
            }
            relay(&mut viewer, sink).await?;
        }
        Ok(failed)
    }

    async fn execute(&mut self, command: Command) -> Result<(), CommandError> {
        let (service, channel) = (self.service, self.channel);
        let now = Utc::now();
        match command {
            Command::Select(path) => {
                let bytes = tokio::fs::read(&path)
                    .await
                    .map_err(|source| CommandError::ReadPuzzle { path, source })?;
                let puzzle = P::Puzzle::from_json(&bytes)?;
                service.select_puzzle::<P>(channel, puzzle).await?;
            }
            Command::Toggle => {
                service.toggle_status::<P>(channel, now).await?;
            }
            Command::Answer { clue, answer } => match P::KIND {
                PuzzleKind::Crossword => {
                    service.answer_crossword(channel, &clue, &answer, now).await?;
                }
                PuzzleKind::Acrostic => {
                    service.answer_acrostic(channel, &clue, &answer, now).await?;
                }
                PuzzleKind::SpellingBee => return Err(wrong_kind::<P>("answer")),
            },
            Command::Word(word) => {
                if P::KIND != PuzzleKind::SpellingBee {
                    return Err(wrong_kind::<P>("word"));
                }
                service.answer_spelling_bee(channel, &word, now).await?;
            }
            Command::Show(clue) => {
                service.show_clue::<P>(channel, &clue).await?;
            }
            Command::Setting { name, value } => {
                service.update_setting::<P>(channel, &name, &value, now).await?;
            }
            Command::Shuffle => {
                if P::KIND != PuzzleKind::SpellingBee {
                    return Err(wrong_kind::<P>("shuffle"));
                }
                service.shuffle_letters(channel, &mut self.rng).await?;
            }
        }
        Ok(())
    }
}

fn wrong_kind<P: Solve>(command: &'static str) -> CommandError {
    CommandError::WrongKind {
        command,
        kind: P::KIND,
    }
}

/// Forwards every event already waiting on `viewer`.
async fn relay<O: EventSink>(viewer: &mut ViewerStream, sink: &mut O) -> Result<(), O::Error> {
    while let Some(event) = viewer.try_recv() {
        sink.send(&event).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwc_runtime::config::PwcConfig;
    use pwc_runtime::MemoryStore;
    use serde_json::Value;

    async fn run(kind: PuzzleKind, script: &str) -> (Vec<Value>, String, usize) {
        let service = SolveService::from_config(MemoryStore::new(), &PwcConfig::default());
        let channel: ChannelName = "streamer".parse().unwrap();
        let mut sink = JsonLines::new(Vec::new());
        let mut errors = Vec::new();
        let failed = run_script(&service, kind, &channel, script, &mut sink, &mut errors)
            .await
            .unwrap();
        let events = String::from_utf8(sink.out)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        (events, String::from_utf8(errors).unwrap(), failed)
    }

    #[tokio::test]
    async fn errors_are_reported_and_execution_continues() {
        let (events, errors, failed) = run(
            PuzzleKind::Crossword,
            "toggle\nfrobnicate\nword hello\nsetting show_notes true\n",
        )
        .await;

        assert_eq!(failed, 3);
        let lines: Vec<_> = errors.lines().collect();
        assert!(lines[0].starts_with("error[ENGINE_NO_PUZZLE_SELECTED]:"));
        assert!(lines[1].starts_with("error[CLI_PARSE]:"));
        assert!(lines[2].starts_with("error[CLI_WRONG_KIND]:"));

        let kinds: Vec<_> = events.iter().map(|e| e["kind"].clone()).collect();
        assert_eq!(kinds, vec![Value::from("settings"), Value::from("settings")]);
        assert_eq!(events[1]["payload"]["show_notes"], Value::Bool(true));
    }

    #[tokio::test]
    async fn missing_puzzle_file() {
        let (_, errors, failed) = run(PuzzleKind::SpellingBee, "select /nonexistent/bee.json").await;
        assert_eq!(failed, 1);
        assert!(errors.starts_with("error[CLI_READ_PUZZLE]: cannot read /nonexistent/bee.json"));
    }

    #[test]
    fn error_codes() {
        use pwc_types::assert_error_code;
        assert_error_code(&CommandError::from(ParseError::UnknownCommand("x".into())), "CLI_");
        assert_error_code(
            &CommandError::WrongKind {
                command: "shuffle",
                kind: PuzzleKind::Crossword,
            },
            "CLI_",
        );
    }
}
