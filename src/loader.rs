//! Bulk person loading
//!
//! Parses text files describing one person per line.
//!
//! # Format
//!
//! ```text
//! OLUWAFEMI SULE FELLOW Y
//! DOMINIC WALTERS STAFF
//! SIMON PATTERSON FELLOW N
//! ```
//!
//! The trailing flag marks a fellow who wants accommodation. Blank lines and
//! lines starting with `#` are skipped.

use eyre::{Context, Result};
use lazy_regex::regex_captures;
use std::fs;
use std::path::Path;

use crate::dojo::{PersonRecord, Role};

/// Read and parse a people file
pub fn read_people_file(path: &Path) -> Result<Vec<PersonRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read people file {}", path.display()))?;

    parse_people(&content).with_context(|| format!("Failed to parse people file {}", path.display()))
}

/// Parse every line, failing on the first malformed one
pub fn parse_people(content: &str) -> Result<Vec<PersonRecord>> {
    let mut records = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let record = parse_line(line).with_context(|| format!("line {}: '{}'", idx + 1, line))?;
        records.push(record);
    }

    log::debug!("Parsed {} people records", records.len());
    Ok(records)
}

fn parse_line(line: &str) -> Result<PersonRecord> {
    let Some((_, first_name, last_name, role, flag)) =
        regex_captures!(r"^(\S+)\s+(\S+)\s+(\S+)(?:\s+(\S+))?$", line)
    else {
        eyre::bail!("expected FIRST LAST ROLE [Y|N]");
    };

    let role: Role = role.parse()?;

    Ok(PersonRecord {
        first_name: first_name.to_string(),
        last_name: last_name.to_string(),
        role,
        wants_accommodation: wants_accommodation(flag),
    })
}

/// Only an explicit yes counts; anything else defaults to no
fn wants_accommodation(flag: &str) -> bool {
    matches!(flag.to_lowercase().as_str(), "y" | "yes")
}
