use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;

/// Output format for commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    Text,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

impl OutputFormat {
    /// Resolve the effective output format.
    /// If user specified a format, use it.
    /// Otherwise: TTY → Text, non-TTY (pipe) → Json
    pub fn resolve(user_choice: Option<OutputFormat>) -> OutputFormat {
        match user_choice {
            Some(fmt) => fmt,
            None => {
                if std::io::stdout().is_terminal() {
                    OutputFormat::Text
                } else {
                    OutputFormat::Json
                }
            }
        }
    }
}

#[derive(Parser)]
#[command(
    name = "dojo",
    about = "Allocate offices and living spaces to Dojo fellows and staff",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: $DOJO_DIR/logs/dojo.log (DOJO_DIR defaults to ~/.local/share/dojo)"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to dojo.yaml config file")]
    pub config: Option<PathBuf>,

    /// Use this state file instead of the configured one
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Grammar for a single line typed into `dojo shell`
#[derive(Parser)]
#[command(name = "dojo", no_binary_name = true, disable_version_flag = true)]
pub struct ShellLine {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create one or more rooms of the same type
    CreateRoom {
        /// Room type: office or livingspace
        kind: String,

        /// Room names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Register a fellow or staff member and allocate rooms
    AddPerson {
        first_name: String,

        last_name: String,

        /// fellow or staff
        role: String,

        /// Fellow wants a living space
        #[arg(short = 'a', long)]
        wants_accommodation: bool,
    },

    /// List everyone with a given name, with their ids
    Find {
        /// First and last name
        #[arg(required = true, num_args = 2..)]
        name: Vec<String>,
    },

    /// Move a person to another room
    Reallocate {
        /// Person id (see `dojo find`) or a quoted full name
        person: String,

        /// Destination room name
        room: String,

        /// Only look for the room among this type: office or livingspace
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Add people from a text file (FIRST LAST ROLE [Y|N] per line)
    LoadPeople {
        file: PathBuf,
    },

    /// Show every room and its occupants
    PrintAllocations {
        /// Also write the report to this file in the output directory
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show everyone without an office or requested living space
    PrintUnallocated {
        /// Also write the report to this file in the output directory
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Show the occupants of one room
    PrintRoom {
        name: String,

        /// Only look for the room among this type: office or livingspace
        #[arg(short, long)]
        kind: Option<String>,
    },

    /// Save the current state to a file
    SaveState {
        /// Destination (defaults to the configured state file)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Replace the current state with a saved one
    LoadState {
        db: PathBuf,
    },

    /// Show room, occupancy and vacancy counts
    Status {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run commands interactively against one session
    Shell,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: clap_complete::Shell,
    },
}

impl Commands {
    /// Commands that may change the engine state
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::CreateRoom { .. }
                | Commands::AddPerson { .. }
                | Commands::Reallocate { .. }
                | Commands::LoadPeople { .. }
                | Commands::LoadState { .. }
        )
    }
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show {
        /// Output format (default: text for TTY, json for pipes)
        #[arg(long, short = 'o', value_enum)]
        format: Option<OutputFormat>,
    },

    /// Get a configuration value
    Get {
        /// Configuration key (dot notation)
        key: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_parse_add_person() {
        let cli = Cli::try_parse_from(["dojo", "add-person", "Robley", "Gori", "fellow", "-a"]).unwrap();
        match cli.command {
            Commands::AddPerson {
                first_name,
                role,
                wants_accommodation,
                ..
            } => {
                assert_eq!(first_name, "Robley");
                assert_eq!(role, "fellow");
                assert!(wants_accommodation);
            }
            _ => panic!("expected add-person"),
        }
    }

    #[test]
    fn test_parse_create_room_many() {
        let cli = Cli::try_parse_from(["dojo", "create-room", "office", "Blue", "Yellow"]).unwrap();
        match cli.command {
            Commands::CreateRoom { kind, names } => {
                assert_eq!(kind, "office");
                assert_eq!(names, vec!["Blue", "Yellow"]);
            }
            _ => panic!("expected create-room"),
        }
    }

    #[test]
    fn test_create_room_needs_a_name() {
        assert!(Cli::try_parse_from(["dojo", "create-room", "office"]).is_err());
    }

    #[test]
    fn test_shell_line_has_no_binary_name() {
        let line = ShellLine::try_parse_from(["reallocate", "3", "Blue"]).unwrap();
        assert!(line.command.mutates());
        match line.command {
            Commands::Reallocate { person, room, kind } => {
                assert_eq!(person, "3");
                assert_eq!(room, "Blue");
                assert!(kind.is_none());
            }
            _ => panic!("expected reallocate"),
        }
    }

    #[test]
    fn test_parse_reallocate_by_name_and_kind() {
        let cli = Cli::try_parse_from(["dojo", "reallocate", "Robley Gori", "Blue", "--kind", "livingspace"]).unwrap();
        match cli.command {
            Commands::Reallocate { person, kind, .. } => {
                assert_eq!(person, "Robley Gori");
                assert_eq!(kind.as_deref(), Some("livingspace"));
            }
            _ => panic!("expected reallocate"),
        }
    }

    #[test]
    fn test_help_names_log_dir_override() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("$DOJO_DIR/logs/dojo.log"));
    }

    #[test]
    fn test_find_requires_two_names() {
        assert!(Cli::try_parse_from(["dojo", "find", "Robley"]).is_err());
        assert!(Cli::try_parse_from(["dojo", "find", "Robley", "Gori"]).is_ok());
    }
}
