//! Occupancy status command
//!
//! Summarizes rooms, people and free places.

use colored::*;
use eyre::Result;
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::dojo::{Dojo, Role, RoomKind};

#[derive(Debug, Serialize)]
struct Status {
    version: String,
    state_file: String,
    rooms: Vec<KindStatus>,
    people: Vec<RoleStatus>,
    unallocated: usize,
}

#[derive(Debug, Serialize)]
struct KindStatus {
    kind: String,
    rooms: Vec<RoomStatus>,
    vacancies: usize,
    /// People entitled to a room of this kind who have none
    waiting: usize,
}

#[derive(Debug, Serialize)]
struct RoomStatus {
    name: String,
    occupants: usize,
    capacity: usize,
}

#[derive(Debug, Serialize)]
struct RoleStatus {
    role: String,
    count: usize,
}

fn gather(dojo: &Dojo, config: &Config) -> Status {
    let unallocated = dojo.unallocated();
    let rooms = RoomKind::ALL
        .iter()
        .map(|&kind| KindStatus {
            kind: kind.to_string(),
            rooms: dojo
                .rooms(kind)
                .map(|room| RoomStatus {
                    name: room.name.clone(),
                    occupants: room.occupants.len(),
                    capacity: room.capacity,
                })
                .collect(),
            vacancies: dojo.vacancies(kind),
            waiting: unallocated.iter().filter(|u| u.missing.contains(&kind)).count(),
        })
        .collect();

    let people = Role::ALL
        .iter()
        .map(|&role| RoleStatus {
            role: role.to_string(),
            count: dojo.people(role).len(),
        })
        .collect();

    Status {
        version: env!("CARGO_PKG_VERSION").to_string(),
        state_file: config.state_path().display().to_string(),
        rooms,
        people,
        unallocated: unallocated.len(),
    }
}

pub fn run(dojo: &Dojo, format: OutputFormat, config: &Config) -> Result<()> {
    let status = gather(dojo, config);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Yaml => println!("{}", serde_yaml::to_string(&status)?),
        OutputFormat::Text => print_text_status(&status),
    }

    Ok(())
}

fn print_text_status(status: &Status) {
    println!("{}", "Dojo Status".bold());
    println!();

    println!("  {:14} {}", "Version:".dimmed(), status.version);
    println!("  {:14} {}", "State:".dimmed(), status.state_file);
    println!();

    for kind in &status.rooms {
        println!(
            "{} ({}):",
            format!("{}s", kind.kind).cyan(),
            format!("{} free places, {} waiting", kind.vacancies, kind.waiting).dimmed()
        );
        if kind.rooms.is_empty() {
            println!("  {}", "(none)".dimmed());
        }
        for room in &kind.rooms {
            let badge = if room.occupants >= room.capacity {
                "[full]".yellow().to_string()
            } else {
                String::new()
            };
            println!("  {:15} {}/{} {}", room.name, room.occupants, room.capacity, badge);
        }
        println!();
    }

    println!("{}:", "People".cyan());
    for role in &status.people {
        println!("  {:15} {:>5}", role.role, role.count.to_string().yellow());
    }
    println!();

    if status.unallocated == 0 {
        println!("  {} Everyone is allocated", "✓".green());
    } else {
        println!(
            "  {} {} waiting for a room (see `dojo print-unallocated`)",
            "⚠".yellow(),
            status.unallocated
        );
    }
}
