//! Stdin touch source: the line protocol of the headless runner.
//!
//! Reads one command per line from standard input on a dedicated thread
//! and forwards the result to the runner over a Tokio channel. The
//! protocol keeps touch traces scriptable from a shell or a file:
//!
//! ```text
//! down 1000 0:100:200          # finger 0 lands at (100, 200)
//! move 1040 0:110:205          # it slides
//! move 1080 0:110:205 1:300:400   # a second finger joins (two-finger pan)
//! up 1200                      # everything lifts
//! cancel 1300                  # or the system steals the gesture
//! source 720 748               # capture surface dimensions, px
//! target 1080 2640             # render surface dimensions, px
//! scale 3.0                    # movement scale
//! on                           # enable translation
//! off                          # disable translation
//! quit                         # end of input
//! ```
//!
//! Timestamps are milliseconds on the sender's monotonic clock; pointer
//! groups are `id:x:y`. A `#` starts a comment, whole-line or trailing;
//! blank lines are skipped and malformed or unreadable lines are logged
//! and ignored so a bad trace never kills the run. The reader tracks
//! the current `source` geometry and stamps it onto every sample it
//! emits.

use std::io::BufRead;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use touchbridge_core::{PointerSample, SurfaceGeometry, TouchPhase, TouchSample};

use super::{SourceError, SourceEvent};

/// Error type for a single protocol line.
#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    /// The leading word is not a known command.
    #[error("unknown command `{command}`")]
    UnknownCommand { command: String },

    /// A required field was missing from the line.
    #[error("missing field `{field}`")]
    MissingField { field: &'static str },

    /// A numeric field did not parse.
    #[error("invalid number `{value}` for `{field}`")]
    InvalidNumber { field: &'static str, value: String },

    /// A pointer group was not of the form `id:x:y`.
    #[error("invalid pointer `{value}`, expected `id:x:y`")]
    InvalidPointer { value: String },

    /// A touch command that needs pointer data had none.
    #[error("`{command}` requires at least one pointer")]
    MissingPointers { command: String },
}

/// One successfully parsed protocol line.
#[derive(Debug, PartialEq)]
enum ParsedLine {
    Touch {
        phase: TouchPhase,
        timestamp_ms: u64,
        pointers: Vec<PointerSample>,
    },
    Source(SurfaceGeometry),
    Target(SurfaceGeometry),
    Scale(f64),
    Enabled(bool),
    Quit,
}

/// Spawns the stdin reader thread.
///
/// Returns a receiver from which the runner reads [`SourceEvent`]s. The
/// thread exits on `quit`, on end of input, when `running` is cleared,
/// or when the receiver is dropped; a final [`SourceEvent::Shutdown`]
/// is emitted in every case. The thread is detached: if it sits in a
/// blocking read at process shutdown it simply dies with the process.
///
/// # Errors
///
/// Returns [`SourceError::Spawn`] if the reader thread cannot be spawned.
pub fn start_stdin_source(
    initial_source: SurfaceGeometry,
    running: Arc<AtomicBool>,
) -> Result<mpsc::Receiver<SourceEvent>, SourceError> {
    let (tx, rx) = mpsc::channel(64);

    std::thread::Builder::new()
        .name("touch-stdin".to_string())
        .spawn(move || {
            read_loop(std::io::stdin().lock(), initial_source, tx, running);
        })
        .map_err(SourceError::Spawn)?;

    info!("stdin touch source started");
    Ok(rx)
}

/// The reader loop executed on the source thread.
fn read_loop<R: BufRead>(
    reader: R,
    mut source: SurfaceGeometry,
    tx: mpsc::Sender<SourceEvent>,
    running: Arc<AtomicBool>,
) {
    for line in reader.lines() {
        if !running.load(Ordering::Relaxed) {
            break;
        }
        let line = match line {
            Ok(line) => line,
            // Non-UTF-8 bytes in a piped trace poison only the line they
            // sit on; the reader has already consumed through its newline.
            Err(err) if err.kind() == std::io::ErrorKind::InvalidData => {
                warn!(%err, "ignoring unreadable input line");
                continue;
            }
            Err(err) => {
                error!(%err, "touch source read failed");
                break;
            }
        };
        let content = match line.split_once('#') {
            Some((data, _comment)) => data,
            None => line.as_str(),
        };
        let trimmed = content.trim();
        if trimmed.is_empty() {
            continue;
        }

        let event = match parse_line(trimmed) {
            Ok(ParsedLine::Touch { phase, timestamp_ms, pointers }) => SourceEvent::Sample {
                sample: TouchSample::new(phase, pointers, timestamp_ms),
                source,
            },
            Ok(ParsedLine::Source(geometry)) => {
                debug!(
                    width_px = geometry.width_px,
                    height_px = geometry.height_px,
                    "source geometry updated"
                );
                source = geometry;
                continue;
            }
            Ok(ParsedLine::Target(geometry)) => SourceEvent::TargetGeometry(geometry),
            Ok(ParsedLine::Scale(scale)) => SourceEvent::MovementScale(scale),
            Ok(ParsedLine::Enabled(enabled)) => SourceEvent::Enabled(enabled),
            Ok(ParsedLine::Quit) => break,
            Err(err) => {
                warn!(%err, line = trimmed, "ignoring malformed input line");
                continue;
            }
        };

        if tx.blocking_send(event).is_err() {
            // Receiver gone; the runner has already stopped.
            return;
        }
    }

    let _ = tx.blocking_send(SourceEvent::Shutdown);
    debug!("touch source stopped");
}

fn parse_line(line: &str) -> Result<ParsedLine, ParseError> {
    let mut parts = line.split_whitespace();
    let command = parts
        .next()
        .ok_or(ParseError::MissingField { field: "command" })?;

    match command {
        "down" | "move" | "up" | "cancel" => {
            let phase = match command {
                "down" => TouchPhase::Down,
                "move" => TouchPhase::Move,
                "up" => TouchPhase::Up,
                _ => TouchPhase::Cancel,
            };
            let timestamp_ms: u64 = parse_number(parts.next(), "timestamp_ms")?;
            let pointers = parts
                .map(parse_pointer)
                .collect::<Result<Vec<_>, ParseError>>()?;
            if pointers.is_empty() && matches!(phase, TouchPhase::Down | TouchPhase::Move) {
                return Err(ParseError::MissingPointers {
                    command: command.to_string(),
                });
            }
            Ok(ParsedLine::Touch { phase, timestamp_ms, pointers })
        }
        "source" | "target" => {
            let width_px: f64 = parse_number(parts.next(), "width_px")?;
            let height_px: f64 = parse_number(parts.next(), "height_px")?;
            let geometry = SurfaceGeometry::new(width_px, height_px);
            if command == "source" {
                Ok(ParsedLine::Source(geometry))
            } else {
                Ok(ParsedLine::Target(geometry))
            }
        }
        "scale" => Ok(ParsedLine::Scale(parse_number(parts.next(), "scale")?)),
        "on" => Ok(ParsedLine::Enabled(true)),
        "off" => Ok(ParsedLine::Enabled(false)),
        "quit" => Ok(ParsedLine::Quit),
        other => Err(ParseError::UnknownCommand {
            command: other.to_string(),
        }),
    }
}

fn parse_number<T: std::str::FromStr>(
    value: Option<&str>,
    field: &'static str,
) -> Result<T, ParseError> {
    let raw = value.ok_or(ParseError::MissingField { field })?;
    raw.parse().map_err(|_| ParseError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

fn parse_pointer(value: &str) -> Result<PointerSample, ParseError> {
    let invalid = || ParseError::InvalidPointer {
        value: value.to_string(),
    };
    let mut fields = value.split(':');
    let id: u32 = fields
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(invalid)?;
    let x: f64 = fields
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(invalid)?;
    let y: f64 = fields
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(invalid)?;
    if fields.next().is_some() {
        return Err(invalid());
    }
    Ok(PointerSample { id, x, y })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
