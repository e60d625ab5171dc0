//! Command-line interface for cgrs
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is defined in its own submodule.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::error::Result;
use crate::storage::Storage;

mod board;
mod calendar;
mod request;
mod rsvp;
mod task;

/// cgrs - community resident services
///
/// Work the maintenance task board, file management requests, and keep
/// track of event RSVPs.
#[derive(Parser, Debug)]
#[command(name = "cgrs")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory containing `.cgrs.toml` (defaults to current directory)
    #[arg(long, global = true, env = "CGRS_DIR")]
    pub dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Task board views
    #[command(subcommand)]
    Board(BoardCommands),

    /// Task inspection and status moves
    #[command(subcommand)]
    Task(TaskCommands),

    /// Management requests
    #[command(subcommand)]
    Request(RequestCommands),

    /// Event RSVPs
    #[command(subcommand)]
    Rsvp(RsvpCommands),

    /// Community calendar
    #[command(subcommand)]
    Calendar(CalendarCommands),
}

#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Show tasks grouped into status columns
    Show {
        /// Board id (defaults to `board.default_board`, else every task)
        #[arg(long)]
        board: Option<String>,

        /// Only tasks assigned to this member (repeatable)
        #[arg(long = "assignee")]
        assignees: Vec<String>,

        /// Only tasks with this priority: urgent, high, medium, low (repeatable)
        #[arg(long = "priority")]
        priorities: Vec<String>,

        /// Only tasks carrying this tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },

    /// List boards with their task counts
    List,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Move a task to another status column
    Move {
        /// Task id
        id: String,

        /// Target status: backlog, todo, in_progress, review, done
        status: String,
    },

    /// Show a single task
    Show {
        /// Task id
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RequestCommands {
    /// Validate and submit a management request
    Submit {
        /// Category: maintenance, landscaping, security, noise, parking, amenities, billing, general
        #[arg(long, default_value = "")]
        category: String,

        /// Resident's full name
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        subject: String,

        #[arg(long, default_value = "")]
        description: String,

        /// Photo to attach (repeatable)
        #[arg(long = "photo")]
        photos: Vec<PathBuf>,

        /// Latitude of the reported location
        #[arg(long, requires = "lng")]
        lat: Option<f64>,

        /// Longitude of the reported location
        #[arg(long, requires = "lat")]
        lng: Option<f64>,
    },

    /// Generate a request id for a category
    Id {
        /// Category id (unknown ids use the REQ abbreviation)
        category: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum RsvpCommands {
    /// Record an RSVP
    Set {
        /// Event id
        event_id: String,

        /// attending or interested
        #[arg(long, default_value = "attending")]
        status: String,
    },

    /// Select a status, or clear it if already selected
    Toggle {
        /// Event id
        event_id: String,

        /// attending or interested
        #[arg(long, default_value = "attending")]
        status: String,
    },

    /// Show the RSVP for one event, or every recorded RSVP
    Show {
        /// Event id
        event_id: Option<String>,
    },

    /// Remove an RSVP
    Clear {
        /// Event id
        event_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum CalendarCommands {
    /// Show a month grid with its events
    Month {
        /// Year (defaults to the current year)
        #[arg(long)]
        year: Option<i32>,

        /// Month 1-12 (defaults to the current month)
        #[arg(long)]
        month: Option<u32>,
    },

    /// Show a single event by slug
    Event {
        /// Event slug
        slug: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let dir = self.dir;
        let json = self.json;
        let quiet = self.quiet;
        let verbose = self.verbose;
        match self.command {
            Commands::Board(cmd) => match cmd {
                BoardCommands::Show {
                    board,
                    assignees,
                    priorities,
                    tags,
                } => board::run_show(board::ShowOptions {
                    board,
                    assignees,
                    priorities,
                    tags,
                    dir,
                    json,
                    quiet,
                    verbose,
                }),
                BoardCommands::List => board::run_list(board::ListOptions { dir, json, quiet }),
            },
            Commands::Task(cmd) => match cmd {
                TaskCommands::Move { id, status } => task::run_move(task::MoveOptions {
                    id,
                    status,
                    dir,
                    json,
                    quiet,
                }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions {
                    id,
                    dir,
                    json,
                    quiet,
                }),
            },
            Commands::Request(cmd) => match cmd {
                RequestCommands::Submit {
                    category,
                    name,
                    email,
                    subject,
                    description,
                    photos,
                    lat,
                    lng,
                } => request::run_submit(request::SubmitOptions {
                    category,
                    name,
                    email,
                    subject,
                    description,
                    photos,
                    lat,
                    lng,
                    dir,
                    json,
                    quiet,
                }),
                RequestCommands::Id { category } => request::run_id(request::IdOptions {
                    category,
                    dir,
                    json,
                    quiet,
                }),
            },
            Commands::Rsvp(cmd) => match cmd {
                RsvpCommands::Set { event_id, status } => rsvp::run_set(rsvp::SetOptions {
                    event_id,
                    status,
                    toggle: false,
                    dir,
                    json,
                    quiet,
                }),
                RsvpCommands::Toggle { event_id, status } => rsvp::run_set(rsvp::SetOptions {
                    event_id,
                    status,
                    toggle: true,
                    dir,
                    json,
                    quiet,
                }),
                RsvpCommands::Show { event_id } => rsvp::run_show(rsvp::ShowOptions {
                    event_id,
                    dir,
                    json,
                    quiet,
                }),
                RsvpCommands::Clear { event_id } => rsvp::run_clear(rsvp::ClearOptions {
                    event_id,
                    dir,
                    json,
                    quiet,
                }),
            },
            Commands::Calendar(cmd) => match cmd {
                CalendarCommands::Month { year, month } => {
                    calendar::run_month(calendar::MonthOptions {
                        year,
                        month,
                        dir,
                        json,
                        quiet,
                    })
                }
                CalendarCommands::Event { slug } => calendar::run_event(calendar::EventOptions {
                    slug,
                    dir,
                    json,
                    quiet,
                }),
            },
        }
    }
}

/// Open the data directory rooted at `dir`, or the current directory.
pub(crate) fn open_storage(dir: Option<&Path>) -> Storage {
    let root = dir
        .map(Path::to_path_buf)
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));
    Storage::open(&root)
}
