// Command-line surface of the `timelapse` client. Every subcommand owns its
// argument struct; nothing is shared between invocations.

use crate::modules::time_entries::core::time_entry::EntryType;
use crate::shared::core::duration::parse_duration;
use chrono::TimeDelta;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Timelapse is a project time tracker for the command line.
#[derive(Debug, Parser)]
#[command(name = "timelapse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Server URL (default http://localhost:8080).
    #[arg(long, global = true, env = "TIMELAPSE_SERVER_URL", value_name = "URL")]
    pub server_url: Option<String>,

    /// Configuration directory (default $XDG_CONFIG_HOME/timelapse).
    #[arg(long = "config", global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    /// Activate trace logging. Tokens may end up in the log.
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Add a project.
    AddProject(AddProjectArgs),

    /// Show a project.
    GetProject(ProjectNameArgs),

    /// Update a project; only the given fields change.
    UpdateProject(UpdateProjectArgs),

    /// List all projects.
    ListProjects,

    /// Add a time entry to a project.
    AddEntry(AddEntryArgs),

    /// Show time entries of one project or of all projects.
    GetEntries(GetEntriesArgs),

    /// Start tracking time on a project.
    Start(StartArgs),

    /// Stop the running time entry.
    Stop(StopArgs),

    /// Update a time entry; only the given fields change.
    UpdateEntry(UpdateEntryArgs),

    /// Log in to the timelapse server through the identity provider.
    Login(LoginArgs),
}

#[derive(Debug, clap::Args)]
pub struct ProjectNameArgs {
    #[arg(value_name = "PROJECTNAME")]
    pub name: String,
}

#[derive(Debug, clap::Args)]
pub struct AddProjectArgs {
    #[arg(value_name = "PROJECTNAME")]
    pub name: String,

    /// Project description.
    #[arg(short, long, default_value = "")]
    pub description: String,

    /// Mark the project as billable.
    #[arg(short, long)]
    pub billable: bool,
}

#[derive(Debug, clap::Args)]
pub struct UpdateProjectArgs {
    #[arg(value_name = "PROJECTNAME")]
    pub name: String,

    /// Rename the project.
    #[arg(short, long = "rename-to", value_name = "NEW_NAME")]
    pub rename_to: Option<String>,

    /// Set the description.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Set whether the project is billable.
    #[arg(short, long, value_name = "BOOL")]
    pub billable: Option<bool>,
}

#[derive(Debug, clap::Args)]
pub struct AddEntryArgs {
    #[arg(value_name = "PROJECTNAME")]
    pub project: String,

    /// Entry start time/date.
    #[arg(short, long, value_name = "WHEN")]
    pub start: Option<String>,

    /// Entry end time/date.
    #[arg(short, long, value_name = "WHEN")]
    pub end: Option<String>,

    /// Break duration, e.g. 30m or 1h15m.
    #[arg(short, long, value_parser = parse_duration)]
    pub breaks: Option<TimeDelta>,

    /// Entry type (work|sick|sick-child|vacation).
    #[arg(short = 't', long = "type", default_value_t = EntryType::Work)]
    pub entry_type: EntryType,

    /// Entry comment.
    #[arg(short, long, default_value = "")]
    pub comment: String,
}

#[derive(Debug, clap::Args)]
pub struct GetEntriesArgs {
    #[arg(value_name = "PROJECTNAME")]
    pub project: Option<String>,

    /// Only entries starting at or after this time/date.
    #[arg(short, long, value_name = "WHEN")]
    pub start: Option<String>,

    /// Only entries ending at or before this time/date.
    #[arg(short, long, value_name = "WHEN")]
    pub end: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct StartArgs {
    #[arg(value_name = "PROJECTNAME")]
    pub project: String,

    /// Start time/date (default now).
    #[arg(value_name = "WHEN")]
    pub when: Option<String>,

    /// Break duration.
    #[arg(short, long, value_parser = parse_duration)]
    pub breaks: Option<TimeDelta>,

    /// Entry type (work|sick|sick-child|vacation).
    #[arg(short = 't', long = "type", default_value_t = EntryType::Work)]
    pub entry_type: EntryType,

    /// Entry comment.
    #[arg(short, long, default_value = "")]
    pub comment: String,
}

#[derive(Debug, clap::Args)]
pub struct StopArgs {
    /// Project of the running entry; any project when omitted.
    #[arg(value_name = "PROJECTNAME")]
    pub project: Option<String>,

    /// End time/date (default now).
    #[arg(value_name = "WHEN")]
    pub when: Option<String>,

    /// Break duration.
    #[arg(short, long, value_parser = parse_duration)]
    pub breaks: Option<TimeDelta>,
}

#[derive(Debug, clap::Args)]
pub struct UpdateEntryArgs {
    #[arg(value_name = "PROJECTNAME")]
    pub project: String,

    #[arg(value_name = "ENTRYID")]
    pub id: String,

    /// New start time/date, relative to the current start.
    #[arg(short, long, value_name = "WHEN")]
    pub start: Option<String>,

    /// New end time/date, relative to the current end.
    #[arg(short, long, value_name = "WHEN")]
    pub end: Option<String>,

    /// Break duration.
    #[arg(short, long, value_parser = parse_duration)]
    pub breaks: Option<TimeDelta>,

    /// Entry type (work|sick|sick-child|vacation).
    #[arg(short = 't', long = "type")]
    pub entry_type: Option<EntryType>,

    /// Entry comment.
    #[arg(short, long)]
    pub comment: Option<String>,
}

#[derive(Debug, clap::Args)]
pub struct LoginArgs {
    /// Identity provider name as configured in config.json.
    #[arg(long)]
    pub provider: Option<String>,
}
