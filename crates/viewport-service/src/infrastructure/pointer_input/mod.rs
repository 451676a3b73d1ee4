//! Line-oriented pointer sample source.
//!
//! Each non-blank line is one raw panel sample:
//!
//! ```text
//! <unique_id> <action> <x> <y> [pointer_id]
//! local:0 down 12.5 300
//! local:0 move 14 310 0
//! ```
//!
//! `action` is one of `down`, `move`, `up`, `cancel`, `hover`.  Lines starting
//! with `#` are comments.  `viewportd` reads samples from stdin, which makes
//! the routing path drivable from a shell or a recorded trace.

use std::sync::Arc;

use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::Mutex;
use tracing::warn;
use viewport_core::PointF;

use crate::application::route_pointer::{PointerAction, PointerRouter, RawPointerEvent};

#[derive(Debug, Error, PartialEq)]
pub enum SampleParseError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("unknown pointer action '{0}'")]
    UnknownAction(String),
    #[error("invalid {field} value '{value}'")]
    InvalidNumber { field: &'static str, value: String },
    #[error("unexpected trailing input '{0}'")]
    TrailingInput(String),
}

/// Counters reported when a sample stream ends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PumpStats {
    pub routed: u64,
    pub dropped: u64,
    pub malformed: u64,
}

/// Parses one sample line.  Returns `Ok(None)` for blank and comment lines.
pub fn parse_sample(line: &str) -> Result<Option<RawPointerEvent>, SampleParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let unique_id = fields.next().ok_or(SampleParseError::MissingField("unique_id"))?;
    let action = parse_action(fields.next().ok_or(SampleParseError::MissingField("action"))?)?;
    let x = parse_coordinate("x", fields.next())?;
    let y = parse_coordinate("y", fields.next())?;
    let pointer_id = match fields.next() {
        Some(raw) => parse_number::<u32>("pointer_id", Some(raw))?,
        None => 0,
    };
    if let Some(extra) = fields.next() {
        return Err(SampleParseError::TrailingInput(extra.to_string()));
    }

    Ok(Some(RawPointerEvent {
        unique_id: unique_id.to_string(),
        pointer_id,
        action,
        position: PointF::new(x, y),
    }))
}

fn parse_action(raw: &str) -> Result<PointerAction, SampleParseError> {
    match raw.to_ascii_lowercase().as_str() {
        "down" => Ok(PointerAction::Down),
        "move" => Ok(PointerAction::Move),
        "up" => Ok(PointerAction::Up),
        "cancel" => Ok(PointerAction::Cancel),
        "hover" => Ok(PointerAction::HoverMove),
        _ => Err(SampleParseError::UnknownAction(raw.to_string())),
    }
}

/// Like [`parse_number`] but also refuses `NaN` and infinities, which `f64`
/// parsing accepts.
fn parse_coordinate(field: &'static str, raw: Option<&str>) -> Result<f64, SampleParseError> {
    let value = parse_number::<f64>(field, raw)?;
    if !value.is_finite() {
        return Err(SampleParseError::InvalidNumber {
            field,
            value: raw.unwrap_or_default().to_string(),
        });
    }
    Ok(value)
}

fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    raw: Option<&str>,
) -> Result<T, SampleParseError> {
    let raw = raw.ok_or(SampleParseError::MissingField(field))?;
    raw.parse().map_err(|_| SampleParseError::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Reads samples from `reader` until EOF and routes each through `router`.
///
/// Malformed lines and routing failures are logged and counted; only an I/O
/// error on the reader ends the pump early.
pub async fn pump_samples<R>(reader: R, router: Arc<Mutex<PointerRouter>>) -> std::io::Result<PumpStats>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();
    let mut stats = PumpStats::default();

    while let Some(line) = lines.next_line().await? {
        let event = match parse_sample(&line) {
            Ok(Some(event)) => event,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = %line, error = %e, "skipping malformed pointer sample");
                stats.malformed += 1;
                continue;
            }
        };

        let unique_id = event.unique_id.clone();
        match router.lock().await.route(event) {
            Ok(()) => stats.routed += 1,
            Err(e) => {
                warn!(unique_id = %unique_id, error = %e, "pointer sample dropped");
                stats.dropped += 1;
            }
        }
    }

    Ok(stats)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
