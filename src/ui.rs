// UI layer: everything that reaches the terminal goes through the `Output`
// trait so commands can be exercised without one. `Terminal` renders with
// crossterm colours and an indicatif spinner; `Recorder` keeps what was
// rendered for assertions. The interactive configure prompts (dialoguer)
// also live here.

use std::time::Duration;

use anyhow::Result;
use crossterm::style::Stylize;
use dialoguer::{Input, MultiSelect};
use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::Platform;
use crate::config::{ConfigAnswers, Configuration};
use crate::error::ApiError;

/// How a line of output should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Heading,
    Success,
    Warning,
    Error,
    Dim,
}

/// A simple column table. Rows shorter than the header are padded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn add_row<S: Into<String>>(&mut self, cells: impl IntoIterator<Item = S>) {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }
}

/// A titled box of `label: value` fields with optional free-text notes.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Panel {
    pub title: String,
    pub fields: Vec<(String, String)>,
    pub notes: Vec<String>,
}

impl Panel {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn field(mut self, label: impl Into<String>, value: impl ToString) -> Self {
        self.fields.push((label.into(), value.to_string()));
        self
    }

    pub fn note(mut self, text: impl Into<String>) -> Self {
        self.notes.push(text.into());
        self
    }
}

/// Rendering sink injected into every command.
pub trait Output {
    fn line(&mut self, tone: Tone, text: &str);

    fn table(&mut self, table: &Table);

    fn panel(&mut self, panel: &Panel);

    /// Show an indeterminate progress indicator until `finish_progress`.
    fn start_progress(&mut self, message: &str);

    fn finish_progress(&mut self);

    fn plain(&mut self, text: &str) {
        self.line(Tone::Plain, text);
    }

    fn heading(&mut self, text: &str) {
        self.line(Tone::Heading, text);
    }

    fn success(&mut self, text: &str) {
        self.line(Tone::Success, text);
    }

    fn warning(&mut self, text: &str) {
        self.line(Tone::Warning, text);
    }

    fn error(&mut self, text: &str) {
        self.line(Tone::Error, text);
    }

    fn dim(&mut self, text: &str) {
        self.line(Tone::Dim, text);
    }
}

/// Writes to stdout with colours.
#[derive(Default)]
pub struct Terminal {
    spinner: Option<ProgressBar>,
}

impl Terminal {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Output for Terminal {
    fn line(&mut self, tone: Tone, text: &str) {
        match tone {
            Tone::Plain => println!("{}", text),
            Tone::Heading => println!("{}", text.bold()),
            Tone::Success => println!("{} {}", "✓".green(), text),
            Tone::Warning => println!("{}", text.yellow()),
            Tone::Error => println!("{}", text.red()),
            Tone::Dim => println!("{}", text.dim()),
        }
    }

    fn table(&mut self, table: &Table) {
        let widths = column_widths(table);
        let header = format_row(&table.headers, &widths);
        println!("{}", header.bold().magenta());
        println!("{}", separator(&widths).dim());
        for row in &table.rows {
            println!("{}", format_row(row, &widths));
        }
    }

    fn panel(&mut self, panel: &Panel) {
        let label_width = panel
            .fields
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        println!("{}", format!("── {} ──", panel.title).cyan().bold());
        for (label, value) in &panel.fields {
            let padded = format!("{:<width$}", format!("{}:", label), width = label_width + 1);
            println!("  {} {}", padded.cyan().bold(), value);
        }
        if !panel.notes.is_empty() {
            println!();
            for note in &panel.notes {
                println!("  {}", note);
            }
        }
        println!("{}", "─".repeat(panel.title.chars().count() + 6).cyan());
    }

    fn start_progress(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
            spinner.set_style(style);
        }
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.spinner = Some(spinner);
    }

    fn finish_progress(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }
}

fn column_widths(table: &Table) -> Vec<usize> {
    let mut widths: Vec<usize> = table.headers.iter().map(|h| h.chars().count()).collect();
    for row in &table.rows {
        for (i, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            match widths.get_mut(i) {
                Some(w) => *w = (*w).max(len),
                None => widths.push(len),
            }
        }
    }
    widths
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    widths
        .iter()
        .enumerate()
        .map(|(i, w)| {
            let cell = cells.get(i).map(String::as_str).unwrap_or("");
            format!("{:<width$}", cell, width = *w)
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

fn separator(widths: &[usize]) -> String {
    widths
        .iter()
        .map(|w| "─".repeat(*w))
        .collect::<Vec<_>>()
        .join("  ")
}

/// Render a backend failure. An unreachable backend gets remediation
/// advice; a bad status only its code.
pub fn report_api_error(out: &mut dyn Output, err: &ApiError) {
    match err {
        ApiError::Unreachable { url } => {
            out.error(&format!("✗ Cannot connect to backend server at {}!", url));
            out.warning("Make sure the backend is running:");
            out.plain("  cd backend && npm start");
        }
        ApiError::Status(code) => out.error(&format!("Error: {}", code)),
        other => out.error(&format!("Error: {}", other)),
    }
}

/// Something rendered through a `Recorder`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Line(Tone, String),
    Table(Table),
    Panel(Panel),
    Progress(String),
}

/// Output sink that keeps everything in memory.
#[derive(Debug, Default)]
pub struct Recorder {
    pub rendered: Vec<Rendered>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All lines rendered with the given tone.
    pub fn lines(&self, tone: Tone) -> Vec<&str> {
        self.rendered
            .iter()
            .filter_map(|r| match r {
                Rendered::Line(t, text) if *t == tone => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn tables(&self) -> Vec<&Table> {
        self.rendered
            .iter()
            .filter_map(|r| match r {
                Rendered::Table(t) => Some(t),
                _ => None,
            })
            .collect()
    }

    pub fn panels(&self) -> Vec<&Panel> {
        self.rendered
            .iter()
            .filter_map(|r| match r {
                Rendered::Panel(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Whether any rendered line, cell, field or note contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.rendered.iter().any(|r| match r {
            Rendered::Line(_, text) | Rendered::Progress(text) => text.contains(needle),
            Rendered::Table(t) => t
                .headers
                .iter()
                .chain(t.rows.iter().flatten())
                .any(|c| c.contains(needle)),
            Rendered::Panel(p) => {
                p.title.contains(needle)
                    || p
                        .fields
                        .iter()
                        .any(|(l, v)| l.contains(needle) || v.contains(needle))
                    || p.notes.iter().any(|n| n.contains(needle))
            }
        })
    }
}

impl Output for Recorder {
    fn line(&mut self, tone: Tone, text: &str) {
        self.rendered.push(Rendered::Line(tone, text.to_string()));
    }

    fn table(&mut self, table: &Table) {
        self.rendered.push(Rendered::Table(table.clone()));
    }

    fn panel(&mut self, panel: &Panel) {
        self.rendered.push(Rendered::Panel(panel.clone()));
    }

    fn start_progress(&mut self, message: &str) {
        self.rendered.push(Rendered::Progress(message.to_string()));
    }

    fn finish_progress(&mut self) {}
}

/// Ask for each setting, showing the current value as the default. Empty
/// answers keep the current value.
pub fn prompt_configuration(current: &Configuration) -> Result<ConfigAnswers> {
    let keywords: String = Input::new()
        .with_prompt(format!("Job keywords [{}]", current.keywords))
        .allow_empty(true)
        .interact_text()?;
    let location: String = Input::new()
        .with_prompt(format!("Location [{}]", current.location))
        .allow_empty(true)
        .interact_text()?;

    // `MultiSelect` toggles with space and confirms with Enter.
    let choices = Platform::all();
    let names: Vec<&str> = choices.iter().map(|p| p.as_str()).collect();
    let defaults: Vec<bool> = names
        .iter()
        .map(|n| current.platforms.iter().any(|p| p == n))
        .collect();
    let picked = MultiSelect::new()
        .with_prompt("Platforms")
        .items(&names)
        .defaults(&defaults)
        .interact()?;
    let platforms: Vec<String> = picked.into_iter().map(|i| names[i].to_string()).collect();

    let resume_shown = if current.resume_path.is_empty() {
        "None"
    } else {
        current.resume_path.as_str()
    };
    let resume_path: String = Input::new()
        .with_prompt(format!("Resume path [{}]", resume_shown))
        .allow_empty(true)
        .interact_text()?;
    let daily_limit: String = Input::new()
        .with_prompt(format!("Daily limit [{}]", current.daily_limit))
        .allow_empty(true)
        .interact_text()?;

    Ok(ConfigAnswers {
        keywords: Some(keywords),
        location: Some(location),
        platforms: Some(platforms),
        resume_path: Some(resume_path),
        daily_limit: Some(daily_limit),
    })
}
