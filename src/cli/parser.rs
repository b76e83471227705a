use clap::{ArgGroup, Parser, Subcommand};

/// Command-line interface definition for rPetFeed
/// CLI application to track daily pet feedings with SQLite
#[derive(Parser)]
#[command(
    name = "rpetfeed",
    version = env!("CARGO_PKG_VERSION"),
    about = "A small pet feeding tracker: daily feedings, 14-day history and feeding intervals, stored in SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// Pretend the local time is this (YYYY-MM-DD[ HH:MM[:SS]])
    #[arg(global = true, long = "now", hide = true)]
    pub now: Option<String>,

    /// Disable ANSI colours in the list output
    #[arg(global = true, long = "no-color")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields to the configuration file")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Add a pet
    Add {
        /// Pet name
        name: String,

        /// Pet type (cat, gecko, ...)
        #[arg(value_name = "TYPE")]
        kind: String,

        #[arg(long = "min", help = "Ideal minimum number of days between feedings")]
        min: Option<u32>,

        #[arg(long = "max", help = "Ideal maximum number of days between feedings")]
        max: Option<u32>,

        #[arg(long = "image", value_name = "FILE", help = "Picture used as 32x32 thumbnail")]
        image: Option<String>,
    },

    /// Edit a pet
    Edit {
        /// Pet id
        id: i64,

        #[arg(long = "name")]
        name: Option<String>,

        #[arg(long = "type", value_name = "TYPE")]
        kind: Option<String>,

        #[arg(long = "min", conflicts_with = "clear_min")]
        min: Option<u32>,

        #[arg(long = "max", conflicts_with = "clear_max")]
        max: Option<u32>,

        #[arg(long = "clear-min", help = "Remove the ideal minimum")]
        clear_min: bool,

        #[arg(long = "clear-max", help = "Remove the ideal maximum")]
        clear_max: bool,
    },

    /// Delete a pet and all of its feedings
    Del {
        /// Pet id
        id: i64,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Mark pets as fed today
    Feed {
        /// Pet ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// Remove today's feeding of pets
    Unfeed {
        /// Pet ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },

    /// Mark every pet as fed (or not fed) today
    #[command(group(ArgGroup::new("state").required(true).args(["fed", "unfed"])))]
    Bulk {
        #[arg(long)]
        fed: bool,

        #[arg(long)]
        unfed: bool,
    },

    /// Show all pets with today's state and the feeding history
    List {
        #[arg(long = "reorder", help = "Show move hints next to every pet")]
        reorder: bool,

        #[arg(long = "date", value_name = "YYYY-MM-DD", help = "Show the list as of another day")]
        date: Option<String>,

        #[arg(long = "json", help = "Print the view model as JSON")]
        json: bool,
    },

    /// Show one pet in detail
    Show {
        /// Pet id
        id: i64,
    },

    /// Move a pet one position up or down in the list
    #[command(group(ArgGroup::new("direction").required(true).args(["up", "down"])))]
    Move {
        /// Pet id
        id: i64,

        #[arg(long)]
        up: bool,

        #[arg(long)]
        down: bool,
    },

    /// List or delete entries of a pet's feeding history
    History {
        #[arg(long = "pet", help = "Pet id")]
        pet: i64,

        #[arg(long = "delete", value_name = "YYYY-MM-DD", help = "Delete the feeding of that day")]
        delete: Option<String>,
    },

    /// Set, save or remove a pet's thumbnail
    Thumb {
        /// Pet id
        id: i64,

        /// Picture to turn into a 32x32 thumbnail
        #[arg(conflicts_with_all = ["clear", "out"])]
        image: Option<String>,

        #[arg(long = "clear", help = "Remove the thumbnail")]
        clear: bool,

        #[arg(long = "out", value_name = "FILE", help = "Write the stored thumbnail as PNG")]
        out: Option<String>,
    },

    /// Export pets and feedings as JSON
    Export {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Replace all pets and feedings with the content of a JSON export
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Interactive session: keeps the list current and refreshes at midnight
    Watch,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bulk_needs_exactly_one_state() {
        assert!(Cli::try_parse_from(["rpetfeed", "bulk"]).is_err());
        assert!(Cli::try_parse_from(["rpetfeed", "bulk", "--fed", "--unfed"]).is_err());
        assert!(Cli::try_parse_from(["rpetfeed", "bulk", "--fed"]).is_ok());
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["rpetfeed", "feed", "1", "2", "--db", "x.sqlite"]).unwrap();
        assert_eq!(cli.db.as_deref(), Some("x.sqlite"));
        match cli.command {
            Commands::Feed { ids } => assert_eq!(ids, vec![1, 2]),
            _ => panic!("wrong command"),
        }
    }
}
