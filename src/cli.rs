// CLI argument definitions for `jobbot` and `jobbot-monitor`.

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::api::DEFAULT_API_URL;
use crate::context::Context;
use crate::jobs::JobBot;
use crate::monitor::{Monitor, WatchDraft};
use crate::ui::{Output, Terminal};

/// Job boards the backend knows how to scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Platform {
    Linkedin,
    Indeed,
    Glassdoor,
    Upwork,
}

impl Platform {
    pub fn all() -> [Platform; 4] {
        [
            Platform::Linkedin,
            Platform::Indeed,
            Platform::Glassdoor,
            Platform::Upwork,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Linkedin => "linkedin",
            Platform::Indeed => "indeed",
            Platform::Glassdoor => "glassdoor",
            Platform::Upwork => "upwork",
        }
    }
}

#[derive(Parser)]
#[command(name = "jobbot")]
#[command(about = "Job Application Bot - automate your job search")]
#[command(version)]
#[command(after_help = "Examples:
  jobbot search                        Search with the configured keywords
  jobbot search -k \"Python Developer\"  Search with custom keywords
  jobbot apply                         Apply to all found jobs
  jobbot apply -i 1 2 3                Apply to specific jobs
  jobbot stats                         Show statistics
  jobbot config                        Configure settings")]
pub struct JobBotCli {
    /// Backend base URL
    #[arg(long, global = true, env = "JOB_BOT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[command(subcommand)]
    pub command: JobCommand,
}

#[derive(Subcommand)]
pub enum JobCommand {
    /// Search job boards and cache the results
    Search(SearchArgs),

    /// Apply to jobs from the last search
    Apply(ApplyArgs),

    /// Show application statistics
    Stats,

    /// Configure settings interactively
    Config,

    /// Show the current configuration
    ShowConfig,

    /// List past applications
    Applications,

    /// Check that the backend is up
    Health,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Job search keywords (default: configured keywords)
    #[arg(long, short = 'k')]
    pub keywords: Option<String>,

    /// Job location (default: configured location)
    #[arg(long, short = 'l')]
    pub location: Option<String>,
}

#[derive(Args)]
pub struct ApplyArgs {
    /// 1-based positions from the last search (default: all)
    #[arg(long, short = 'i', num_args = 1.., allow_negative_numbers = true)]
    pub indices: Option<Vec<i64>>,
}

impl JobBotCli {
    pub fn run(self) -> Result<()> {
        let ctx = Context::preflight(&self.api_url)?;
        let mut out = Terminal::new();
        out.heading("🤖 Job Application Bot");
        out.plain("");

        let bot = JobBot::new(&ctx.api, &ctx.config, &ctx.session);
        let result = match self.command {
            JobCommand::Search(args) => bot.search(&mut out, args.keywords, args.location).map(drop),
            JobCommand::Apply(args) => bot.apply(&mut out, args.indices.as_deref()),
            JobCommand::Stats => bot.stats(&mut out),
            JobCommand::Config => bot.configure(&mut out),
            JobCommand::ShowConfig => bot.show_config(&mut out),
            JobCommand::Applications => bot.applications(&mut out),
            JobCommand::Health => bot.health(&mut out),
        };
        report_failure(&mut out, result);
        Ok(())
    }
}

#[derive(Parser)]
#[command(name = "jobbot-monitor")]
#[command(about = "Job Monitor - real-time job watching and auto-apply")]
#[command(version)]
#[command(after_help = "Examples:
  jobbot-monitor add -k \"Python Developer\" -l Remote
  jobbot-monitor add -k \"DevOps Engineer\" -l \"San Francisco\" --email me@email.com
  jobbot-monitor list
  jobbot-monitor start
  jobbot-monitor status
  jobbot-monitor stop
  jobbot-monitor remove 1696789012345.678")]
pub struct MonitorCli {
    /// Backend base URL
    #[arg(long, global = true, env = "JOB_BOT_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    #[command(subcommand)]
    pub command: MonitorCommand,
}

#[derive(Subcommand)]
pub enum MonitorCommand {
    /// Add watch criteria
    Add(AddArgs),

    /// List all watch criteria
    List,

    /// Remove watch criteria
    Remove(RemoveArgs),

    /// Start the background monitor
    Start,

    /// Stop the background monitor
    Stop,

    /// Show monitor status
    Status,

    /// Pause a watch without removing it
    Pause(WatchIdArg),

    /// Resume a paused watch
    Resume(WatchIdArg),

    /// Change how often the monitor checks for new jobs
    Interval(IntervalArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Job search keywords (required)
    #[arg(long, short = 'k')]
    pub keywords: Option<String>,

    /// Job location (required)
    #[arg(long, short = 'l')]
    pub location: Option<String>,

    /// Platforms to search (default: linkedin indeed)
    #[arg(long, value_enum, num_args = 1..)]
    pub platforms: Vec<Platform>,

    /// Apply automatically to matching jobs (the default)
    #[arg(long, overrides_with = "no_auto_apply")]
    pub auto_apply: bool,

    /// Only notify, never apply automatically
    #[arg(long, overrides_with = "auto_apply")]
    pub no_auto_apply: bool,

    /// Email for notifications
    #[arg(long)]
    pub email: Option<String>,

    /// Path to resume file
    #[arg(long)]
    pub resume: Option<String>,

    /// Only remote jobs
    #[arg(long)]
    pub remote: bool,

    /// Minimum salary requirement
    #[arg(long)]
    pub min_salary: Option<u64>,
}

impl AddArgs {
    pub fn into_draft(self) -> WatchDraft {
        WatchDraft {
            keywords: self.keywords,
            location: self.location,
            platforms: self
                .platforms
                .into_iter()
                .map(|p| p.as_str().to_string())
                .collect(),
            auto_apply: !self.no_auto_apply,
            remote: self.remote,
            email: self.email,
            resume_path: self.resume,
            min_salary: self.min_salary,
        }
    }
}

#[derive(Args)]
pub struct RemoveArgs {
    /// Watch ID to remove
    pub id: Option<String>,

    /// Watch ID to remove (alternative to the positional form)
    #[arg(long)]
    pub watch_id: Option<String>,
}

#[derive(Args)]
pub struct WatchIdArg {
    /// Watch ID
    pub id: String,
}

#[derive(Args)]
pub struct IntervalArgs {
    /// Minutes between checks
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub minutes: u32,
}

impl MonitorCli {
    pub fn run(self) -> Result<()> {
        let ctx = Context::preflight(&self.api_url)?;
        let mut out = Terminal::new();
        out.heading("🤖 Job Application Bot - Monitor");
        out.plain("");

        let monitor = Monitor::new(&ctx.api);
        let result = match self.command {
            MonitorCommand::Add(args) => monitor.add(&mut out, args.into_draft()),
            MonitorCommand::List => monitor.list(&mut out),
            MonitorCommand::Remove(args) => monitor.remove(&mut out, args.id.or(args.watch_id)),
            MonitorCommand::Start => monitor.start(&mut out),
            MonitorCommand::Stop => monitor.stop(&mut out),
            MonitorCommand::Status => monitor.status(&mut out),
            MonitorCommand::Pause(arg) => monitor.set_enabled(&mut out, &arg.id, false),
            MonitorCommand::Resume(arg) => monitor.set_enabled(&mut out, &arg.id, true),
            MonitorCommand::Interval(args) => monitor.interval(&mut out, args.minutes),
        };
        report_failure(&mut out, result);
        Ok(())
    }
}

/// Unexpected failures end the current operation with a message; the
/// process still exits normally.
fn report_failure(out: &mut dyn Output, result: Result<()>) {
    if let Err(err) = result {
        out.finish_progress();
        out.error(&format!("Error: {:#}", err));
    }
}
