//! Interactive session
//!
//! Reads one command per line from stdin, using the same grammar as the
//! command line (without the leading `dojo`). The engine stays in memory for
//! the whole session and is saved once on exit.

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use std::io::{self, BufRead, IsTerminal, Write};

use crate::cli::ShellLine;
use crate::config::Config;
use crate::dojo::Dojo;

pub fn run(config: &Config) -> Result<()> {
    let mut dojo = super::open(config)?;
    let interactive = io::stdin().is_terminal();

    if interactive {
        println!("{}", "Dojo shell".bold());
        println!("  {}", "Type `help` for commands, `exit` to leave.".dimmed());
    }

    let changed = session(&mut dojo, config, io::stdin().lock(), interactive)?;

    if changed {
        super::autosave(&dojo, config)?;
    }
    Ok(())
}

/// Run lines until `exit` or end of input. Returns whether anything changed.
fn session<R: BufRead>(dojo: &mut Dojo, config: &Config, input: R, interactive: bool) -> Result<bool> {
    let mut changed = false;
    let mut lines = input.lines();

    loop {
        if interactive {
            print!("{} ", "dojo>".cyan());
            io::stdout().flush().context("Failed to flush prompt")?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read command")?;
        let words: Vec<&str> = line.split_whitespace().collect();

        match words.first() {
            None => continue,
            Some(&"exit") | Some(&"quit") => break,
            Some(word) if word.starts_with('#') => continue,
            Some(_) => {}
        }

        let parsed = match ShellLine::try_parse_from(words.iter().copied()) {
            Ok(parsed) => parsed,
            Err(err) => {
                err.print().context("Failed to print usage")?;
                continue;
            }
        };

        let mutates = parsed.command.mutates();
        match super::execute(parsed.command, dojo, config) {
            Ok(()) => changed |= mutates,
            Err(err) => {
                log::warn!("Shell command '{}' failed: {:#}", line, err);
                eprintln!("{} {:#}", "✗".red(), err);
            }
        }
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dojo::{FirstEligible, RoomKind};
    use std::io::Cursor;

    fn run_script(script: &str) -> (Dojo, bool) {
        let mut dojo = Dojo::with_selector(Box::new(FirstEligible));
        let changed = session(&mut dojo, &Config::default(), Cursor::new(script.to_string()), false).unwrap();
        (dojo, changed)
    }

    #[test]
    fn test_session_runs_commands_in_order() {
        let (dojo, changed) = run_script(
            "create-room office Blue Yellow\n\
             add-person Faith Gori staff\n\
             reallocate 1 Yellow\n",
        );
        assert!(changed);
        assert_eq!(dojo.room_of(1, RoomKind::Office).unwrap().name, "Yellow");
    }

    #[test]
    fn test_session_survives_bad_lines() {
        let (dojo, changed) = run_script(
            "not-a-command\n\
             reallocate 9 Nowhere\n\
             \n\
             # comment\n\
             create-room livingspace Mara\n",
        );
        assert!(changed);
        assert_eq!(dojo.rooms(RoomKind::LivingSpace).count(), 1);
    }

    #[test]
    fn test_session_stops_at_exit() {
        let (dojo, changed) = run_script("exit\ncreate-room office Blue\n");
        assert!(!changed);
        assert_eq!(dojo.rooms(RoomKind::Office).count(), 0);
    }

    #[test]
    fn test_read_only_session_is_unchanged() {
        let (_, changed) = run_script("print-allocations\nstatus -o json\n");
        assert!(!changed);
    }
}
