use clap::{Parser, Subcommand};

/// Command-line interface definition for opsched
/// Field operation schedules for event equipment rentals, stored in SQLite
#[derive(Parser)]
#[command(
    name = "opsched",
    version = env!("CARGO_PKG_VERSION"),
    about = "Generate and maintain field operation schedules (mobilization, cleanings, suction, demobilization)",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Tenant the command acts for (default: from the configuration)
    #[arg(global = true, long = "tenant")]
    pub tenant: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Show the configuration
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        /// Only rows about this event
        #[arg(long = "event")]
        event: Option<i64>,
    },

    /// Register or inspect events
    Event {
        #[command(subcommand)]
        action: EventAction,
    },

    /// Preview the generated schedule of an event (nothing is stored)
    Schedule {
        /// Event id
        id: i64,

        #[arg(long, help = "Print operation records as JSON")]
        json: bool,
    },

    /// Regenerate and store the schedule of an event; completed operations are kept
    Regenerate {
        /// Event id
        id: i64,
    },

    /// List or update stored operations
    Ops {
        #[command(subcommand)]
        action: OpsAction,
    },
}

#[derive(Subcommand)]
pub enum EventAction {
    /// Register an event window
    Add {
        /// Start date (YYYY-MM-DD)
        #[arg(long = "start")]
        start: String,

        /// Start time (HH:MM)
        #[arg(long = "start-time")]
        start_time: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long = "end")]
        end: String,

        /// End time (HH:MM)
        #[arg(long = "end-time")]
        end_time: Option<String>,

        /// Explicit mobilization timestamp (YYYY-MM-DDTHH:MM)
        #[arg(long = "mobilization")]
        mobilization: Option<String>,

        /// Explicit demobilization timestamp (YYYY-MM-DDTHH:MM)
        #[arg(long = "demobilization")]
        demobilization: Option<String>,

        /// Data origin: auto | manual
        #[arg(long = "source", default_value = "auto")]
        source: String,

        /// Classification: single | intermittent | other
        #[arg(long = "class", default_value = "other")]
        class: String,

        /// Cleaning rule as JSON, e.g. {"type":"daily","time":"19:00"}
        #[arg(long = "recurrence")]
        recurrence: Option<String>,
    },

    /// Show a registered event
    Show {
        /// Event id
        id: i64,
    },
}

#[derive(Subcommand)]
pub enum OpsAction {
    /// List stored operations of an event
    List {
        /// Event id
        id: i64,

        #[arg(long, help = "Print operation records as JSON")]
        json: bool,
    },

    /// Change the status of a stored operation
    Status {
        /// Operation id
        op_id: i64,

        /// scheduled | in_progress | cancelled | completed
        status: String,
    },
}
