//! Output formatting abstraction for text vs JSON rendering
//!
//! The report and the scenario listing flow through [`OutputWriter`], which
//! handles format switching.

use std::io::Write;

use reqres_domain::{RunReport, ScenarioId, ScenarioOutcome};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Writes command output to stdout in the selected format.
pub struct OutputWriter {
    format: OutputFormat,
}

impl OutputWriter {
    /// Create a new output writer with the specified format.
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a payload to stdout.
    ///
    /// For `Text` format, delegates to `Render::render_text()`.
    /// For `Json` format, serialises via `serde_json`.
    pub fn render<T: Render + Serialize>(&self, payload: &T) -> Result<(), CliError> {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.render_to(payload, &mut handle)
    }

    fn render_to<T: Render + Serialize>(
        &self,
        payload: &T,
        w: &mut dyn Write,
    ) -> Result<(), CliError> {
        match self.format {
            OutputFormat::Text => payload.render_text(w)?,
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *w, payload)?;
                writeln!(w)?;
            }
        }
        w.flush()?;
        Ok(())
    }

    /// Prints a banner line. JSON output stays machine-readable, so banners
    /// only appear in text mode.
    pub fn banner(&self, line: &str) -> Result<(), CliError> {
        if self.format == OutputFormat::Text {
            let mut handle = std::io::stdout().lock();
            writeln!(handle, "{line}")?;
            handle.flush()?;
        }
        Ok(())
    }
}

/// Trait for human-readable text rendering.
pub trait Render {
    /// Writes the text form of `self`.
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()>;
}

impl Render for RunReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        writeln!(w)?;
        writeln!(w, "Run {}", self.run_id)?;
        let width = self
            .results
            .iter()
            .map(|r| r.scenario.name().len())
            .max()
            .unwrap_or(0);

        for result in &self.results {
            let name = result.scenario.name();
            match &result.outcome {
                ScenarioOutcome::Passed => writeln!(
                    w,
                    "  PASS  {name:<width$}  {} ms",
                    result.duration_ms
                )?,
                ScenarioOutcome::Skipped { reason } => {
                    writeln!(w, "  SKIP  {name:<width$}  {reason}")?;
                }
                ScenarioOutcome::Failed { failure } => {
                    writeln!(w, "  FAIL  {name:<width$}  {failure}")?;
                }
            }
        }

        writeln!(
            w,
            "{} scenarios: {} passed, {} failed, {} skipped",
            self.total(),
            self.passed,
            self.failed,
            self.skipped
        )
    }
}

/// One row of `--list`.
#[derive(Debug, Serialize)]
pub struct ScenarioEntry {
    /// Scenario name.
    pub name: &'static str,
    /// HTTP method.
    pub method: &'static str,
    /// What it checks.
    pub description: &'static str,
    /// Scenario whose state it reuses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<&'static str>,
}

/// The `--list` payload.
#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct ScenarioListing(Vec<ScenarioEntry>);

impl ScenarioListing {
    /// Every scenario in catalog order.
    pub fn all() -> Self {
        Self(
            ScenarioId::ALL
                .into_iter()
                .map(|id| ScenarioEntry {
                    name: id.name(),
                    method: id.method().as_str(),
                    description: id.description(),
                    depends_on: id.requirement().map(|_| ScenarioId::CreateUser.name()),
                })
                .collect(),
        )
    }
}

impl Render for ScenarioListing {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        for entry in &self.0 {
            write!(w, "{:<24} {:<6} {}", entry.name, entry.method, entry.description)?;
            if let Some(dependency) = entry.depends_on {
                write!(w, " (needs {dependency})")?;
            }
            writeln!(w)?;
        }
        Ok(())
    }
}
