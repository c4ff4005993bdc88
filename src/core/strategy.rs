//! Generation strategies: the deterministic generator, an external command
//! acting as remote generator, and the fallback chain composing them.

use crate::core::calculator::schedule::{DEFAULT_BUFFER_HOURS, generate_with_buffer};
use crate::errors::{AppError, AppResult};
use crate::models::event::EventRecord;
use crate::models::operation::{Operation, OperationStatus};
use crate::models::schedule_diff::GenerationPath;
use crate::utils::date::format_date;
use crate::utils::time::format_time;
use serde_json::{Value, json};
use std::io::Write;
use std::process::{Command, Stdio};
use tracing::{info, instrument, warn};

pub trait ScheduleGenerator {
    /// `Ok(None)` means "no schedule from this path", not an error.
    fn generate(&self, event: &EventRecord) -> AppResult<Option<Vec<Operation>>>;

    fn path(&self) -> GenerationPath;
}

#[derive(Debug, Clone, Copy)]
pub struct DeterministicGenerator {
    pub buffer_hours: i64,
}

impl Default for DeterministicGenerator {
    fn default() -> Self {
        Self {
            buffer_hours: DEFAULT_BUFFER_HOURS,
        }
    }
}

impl DeterministicGenerator {
    pub fn new(buffer_hours: i64) -> Self {
        Self { buffer_hours }
    }
}

impl ScheduleGenerator for DeterministicGenerator {
    fn generate(&self, event: &EventRecord) -> AppResult<Option<Vec<Operation>>> {
        generate_with_buffer(&event.window, event.class, self.buffer_hours).map(Some)
    }

    fn path(&self) -> GenerationPath {
        GenerationPath::Deterministic
    }
}

/// External generation path: a command that reads the event as JSON on
/// stdin and prints a JSON array of operation records on stdout.
#[derive(Debug, Clone)]
pub struct RemoteGenerator {
    program: String,
    args: Vec<String>,
}

impl RemoteGenerator {
    pub fn new(program: &str, args: &[&str]) -> Self {
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Split a configured command line on whitespace. `None` when blank.
    pub fn from_command_line(cmd: &str) -> Option<Self> {
        let mut parts = cmd.split_whitespace();
        let program = parts.next()?;
        Some(Self {
            program: program.to_string(),
            args: parts.map(str::to_string).collect(),
        })
    }

    fn run(&self, input: &[u8]) -> AppResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AppError::RemoteGenerator(format!("{}: {}", self.program, e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(input)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(AppError::RemoteGenerator(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(output.stdout)
    }
}

impl ScheduleGenerator for RemoteGenerator {
    fn generate(&self, event: &EventRecord) -> AppResult<Option<Vec<Operation>>> {
        let input = serde_json::to_vec(&event_payload(event))?;
        let stdout = self.run(&input)?;

        if stdout.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }

        let mut ops: Vec<Operation> = serde_json::from_slice(&stdout)
            .map_err(|e| AppError::RemoteGenerator(format!("invalid output: {e}")))?;
        if ops.is_empty() {
            return Ok(None);
        }

        for op in &mut ops {
            op.status = OperationStatus::Scheduled;
        }
        Ok(Some(ops))
    }

    fn path(&self) -> GenerationPath {
        GenerationPath::External
    }
}

fn event_payload(event: &EventRecord) -> Value {
    let w = &event.window;
    json!({
        "id": event.id,
        "class": event.class,
        "source": w.origin,
        "startDate": format_date(w.start_date),
        "endDate": format_date(w.end_date),
        "startTime": w.start_time.map(format_time),
        "endTime": w.end_time.map(format_time),
        "mobilizationAt": w.mobilization_at,
        "demobilizationAt": w.demobilization_at,
        "recurrence": w.recurrence.as_ref().map(|r| r.to_payload()),
    })
}

/// Tries `primary` first and falls back on any error or empty result.
/// Events that require the deterministic path skip `primary` entirely.
pub struct FallbackGenerator {
    primary: Option<Box<dyn ScheduleGenerator + Send + Sync>>,
    fallback: Box<dyn ScheduleGenerator + Send + Sync>,
}

impl FallbackGenerator {
    pub fn new(
        primary: Box<dyn ScheduleGenerator + Send + Sync>,
        fallback: Box<dyn ScheduleGenerator + Send + Sync>,
    ) -> Self {
        Self {
            primary: Some(primary),
            fallback,
        }
    }

    pub fn deterministic_only(buffer_hours: i64) -> Self {
        Self {
            primary: None,
            fallback: Box::new(DeterministicGenerator::new(buffer_hours)),
        }
    }

    /// Build the chain from the configured remote command, if any.
    pub fn from_settings(remote_command: Option<&str>, buffer_hours: i64) -> Self {
        match remote_command.and_then(RemoteGenerator::from_command_line) {
            Some(remote) => Self::new(
                Box::new(remote),
                Box::new(DeterministicGenerator::new(buffer_hours)),
            ),
            None => Self::deterministic_only(buffer_hours),
        }
    }

    #[instrument(skip_all, fields(event_id = event.id))]
    pub fn generate(&self, event: &EventRecord) -> AppResult<(Vec<Operation>, GenerationPath)> {
        if let Some(primary) = &self.primary
            && !event.requires_deterministic()
        {
            match primary.generate(event) {
                Ok(Some(ops)) => {
                    info!(count = ops.len(), path = %primary.path(), "schedule generated");
                    return Ok((ops, primary.path()));
                }
                Ok(None) => warn!(path = %primary.path(), "no schedule returned, falling back"),
                Err(e) => warn!(path = %primary.path(), error = %e, "generation failed, falling back"),
            }
        }

        match self.fallback.generate(event)? {
            Some(ops) => Ok((ops, self.fallback.path())),
            None => Err(AppError::Input(format!(
                "no schedule could be generated for event {}",
                event.id
            ))),
        }
    }
}
