use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Fetch demo employee records and load them into MySQL."
)]
pub struct Cli {
    /// Employees JSON file (overrides EMPLOYEES_FILE).
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Employee API endpoint (overrides API_URL).
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Download the employee list and save it as pretty JSON.
    Fetch {
        /// Also print the fetched document.
        #[arg(long, action = ArgAction::SetTrue)]
        echo: bool,
    },

    /// Print employees from the JSON file with derived salaries.
    Show {
        #[arg(long, default_value_t = 5)]
        limit: usize,
    },

    /// Insert every employee from the JSON file into the table.
    Load {
        /// Append instead of clearing the table first.
        #[arg(long = "keep-existing", action = ArgAction::SetTrue)]
        keep_existing: bool,
    },

    /// Create the database and table if missing, then seed sample rows.
    Init {
        #[arg(long = "skip-seed", action = ArgAction::SetTrue)]
        skip_seed: bool,
    },

    /// Drop and recreate the table, then seed sample rows.
    Reset,

    /// Print every row in the table.
    List,

    /// Check that the database is reachable.
    Ping,
}

impl Cli {
    pub fn apply(&self, config: &mut Config) {
        if let Some(file) = &self.file {
            config.employees_file = file.clone();
        }
        if let Some(url) = &self.url {
            config.api_url = url.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::parse_from([
            "employee-sync",
            "fetch",
            "--file",
            "/tmp/staff.json",
            "--url",
            "http://localhost:8080/employees",
        ]);
        let mut config = Config::from_lookup(|_| None).unwrap();

        cli.apply(&mut config);

        assert_eq!(config.employees_file, PathBuf::from("/tmp/staff.json"));
        assert_eq!(config.api_url, "http://localhost:8080/employees");
        assert!(matches!(cli.command, Command::Fetch { echo: false }));
    }

    #[test]
    fn load_clears_by_default() {
        let cli = Cli::parse_from(["employee-sync", "load"]);
        assert!(matches!(cli.command, Command::Load { keep_existing: false }));

        let cli = Cli::parse_from(["employee-sync", "show"]);
        assert!(matches!(cli.command, Command::Show { limit: 5 }));
    }
}
