//! Room creation, registration and reallocation commands

use colored::*;
use eyre::Result;
use std::path::Path;

use crate::dojo::{Dojo, DojoError, RoomKind};
use crate::loader;

pub fn create_room(dojo: &mut Dojo, kind_name: &str, names: &[String]) -> Result<()> {
    let kind: RoomKind = kind_name.parse()?;
    if names.iter().any(|n| n.trim().is_empty()) {
        return Err(DojoError::InvalidInput("room name cannot be empty".to_string()).into());
    }

    for name in names {
        let existed = dojo.room(kind, name).is_some();
        let room = dojo.create_room(name, kind_name)?;
        if existed {
            println!("  {} {} {} already exists", "○".dimmed(), kind, room.name.cyan());
        } else {
            println!(
                "  {} Created {} {} {}",
                "✓".green(),
                kind,
                room.name.cyan(),
                format!("(capacity {})", room.capacity).dimmed()
            );
        }
    }
    Ok(())
}

pub fn add_person(dojo: &mut Dojo, first_name: &str, last_name: &str, role: &str, wants_accommodation: bool) -> Result<()> {
    let person = dojo.add_person(first_name, last_name, role, wants_accommodation)?.clone();

    println!(
        "  {} Added {} {} {}",
        "✓".green(),
        person.role,
        person.full_name().green(),
        format!("(id {})", person.id).dimmed()
    );
    print_placement(dojo, person.id, RoomKind::Office, true);
    if person.role.can_occupy(RoomKind::LivingSpace) {
        print_placement(dojo, person.id, RoomKind::LivingSpace, person.wants_accommodation);
    }
    Ok(())
}

fn print_placement(dojo: &Dojo, person_id: u32, kind: RoomKind, wanted: bool) {
    match dojo.room_of(person_id, kind) {
        Some(room) => println!("    {} {}: {}", "→".blue(), kind, room.name.cyan()),
        None if wanted => println!("    {} No {} available, added to unallocated", "⚠".yellow(), kind),
        None => {}
    }
}

/// First step of reallocation: show ids for a name
pub fn find(dojo: &Dojo, full_name: &str) -> Result<()> {
    let matches = dojo.get_person_id(full_name);
    if matches.is_empty() {
        println!("  {} Nobody named {}", "○".dimmed(), full_name.cyan());
        return Ok(());
    }

    for person in matches {
        let office = dojo
            .room_of(person.id, RoomKind::Office)
            .map(|r| r.name.as_str())
            .unwrap_or("-");
        let livingspace = dojo
            .room_of(person.id, RoomKind::LivingSpace)
            .map(|r| r.name.as_str())
            .unwrap_or("-");
        println!(
            "  {:>4}  {} {}  office: {}  livingspace: {}",
            person.id.to_string().yellow(),
            person.full_name(),
            format!("[{}]", person.role).dimmed(),
            office.cyan(),
            livingspace.cyan()
        );
    }
    Ok(())
}

/// Who a reallocation is for: an id, or a full name naming exactly one person
fn resolve_person(dojo: &Dojo, person: &str) -> Result<(u32, String, bool)> {
    if let Ok(id) = person.trim().parse::<u32>() {
        let full_name = dojo.get_person_object(id).map(|p| p.full_name()).unwrap_or_default();
        return Ok((id, full_name, false));
    }

    let matches = dojo.get_person_id(person);
    match matches.as_slice() {
        [only] => Ok((only.id, only.full_name(), true)),
        [] => Err(DojoError::InvalidInput(format!("nobody named '{}'", person.trim())).into()),
        _ => {
            let ids: Vec<String> = matches.iter().map(|p| p.id.to_string()).collect();
            eyre::bail!(
                "'{}' matches ids {}; reallocate by id instead",
                person.trim(),
                ids.join(", ")
            )
        }
    }
}

/// Second step of reallocation: act on an id (or a unique full name)
pub fn reallocate(dojo: &mut Dojo, person: &str, room_name: &str, kind: Option<&str>) -> Result<()> {
    let kind = kind.map(str::parse::<RoomKind>).transpose()?;
    let (person_id, full_name, by_name) = resolve_person(dojo, person)?;

    let target_kind = match kind {
        Some(kind) => Some(kind),
        None => dojo.check_room(room_name, &full_name).map(|room| room.kind),
    };
    let previous = target_kind
        .and_then(|target| match (by_name, target) {
            (true, RoomKind::Office) => dojo.get_old_office(&full_name),
            (true, RoomKind::LivingSpace) => dojo.get_old_livingspace(&full_name),
            (false, target) => dojo.room_of(person_id, target),
        })
        .map(|room| room.name.clone());

    let moved = match kind {
        Some(_) => dojo.reallocate_person_in(person_id, room_name, kind),
        None => dojo.reallocate_person(person_id, room_name),
    };

    match moved {
        Ok(room) => {
            let from = previous
                .map(|name| format!("(was {})", name).dimmed().to_string())
                .unwrap_or_default();
            println!(
                "  {} {} is now in {} {} {}",
                "✓".green(),
                full_name.green(),
                room.kind,
                room.name.cyan(),
                from
            );
            Ok(())
        }
        Err(err) => {
            let hint = match &err {
                DojoError::PersonNotFound(_) => "use `dojo find FIRST LAST` to look up ids",
                DojoError::RoomNotFound(_) => "create it first with `dojo create-room`",
                DojoError::RoomFull(_) => "pick a room with space, see `dojo status`",
                DojoError::InvalidRoomKind { .. } => "staff can only be moved between offices",
                DojoError::InvalidInput(_) => "check the arguments",
            };
            eprintln!("  {} {} ({})", "✗".red(), err, hint.dimmed());
            Err(err.into())
        }
    }
}

pub fn load_people(dojo: &mut Dojo, file: &Path) -> Result<()> {
    let records = loader::read_people_file(file)?;
    let ids = dojo.load_people(records)?;

    let unallocated = dojo
        .unallocated()
        .iter()
        .filter(|u| ids.contains(&u.person.id))
        .count();

    println!(
        "  {} Loaded {} people from {}",
        "✓".green(),
        ids.len().to_string().yellow(),
        file.display()
    );
    if unallocated > 0 {
        println!("    {} {} still waiting for a room", "⚠".yellow(), unallocated);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dojo::{FirstEligible, Role};
    use std::fs;
    use tempfile::tempdir;

    fn deterministic() -> Dojo {
        Dojo::with_selector(Box::new(FirstEligible))
    }

    #[test]
    fn test_create_room_many_names() {
        let mut dojo = deterministic();
        let names = vec!["Blue".to_string(), "Yellow".to_string(), "Blue".to_string()];
        create_room(&mut dojo, "office", &names).unwrap();
        assert_eq!(dojo.rooms(RoomKind::Office).count(), 2);
    }

    #[test]
    fn test_create_room_rejects_empty_name_up_front() {
        let mut dojo = deterministic();
        let names = vec!["Blue".to_string(), " ".to_string()];
        assert!(create_room(&mut dojo, "office", &names).is_err());
        assert_eq!(dojo.rooms(RoomKind::Office).count(), 0);
    }

    #[test]
    fn test_reallocate_reports_engine_error() {
        let mut dojo = deterministic();
        let err = reallocate(&mut dojo, "5", "Blue", None).unwrap_err();
        assert_eq!(err.downcast_ref::<DojoError>(), Some(&DojoError::PersonNotFound(5)));
    }

    #[test]
    fn test_reallocate_by_unique_name() {
        let mut dojo = deterministic();
        create_room(&mut dojo, "office", &["Blue".to_string()]).unwrap();
        let id = dojo.add_person("Robley", "Gori", "staff", false).unwrap().id;
        dojo.create_room("Yellow", "office").unwrap();

        reallocate(&mut dojo, "robley gori", "Yellow", None).unwrap();
        assert_eq!(dojo.get_old_office("Robley Gori").unwrap().name, "Yellow");
        assert_eq!(dojo.room_of(id, RoomKind::Office).unwrap().name, "Yellow");
    }

    #[test]
    fn test_reallocate_by_ambiguous_or_unknown_name() {
        let mut dojo = deterministic();
        dojo.create_room("Blue", "office").unwrap();
        dojo.add_person("Robley", "Gori", "staff", false).unwrap();
        dojo.add_person("Robley", "Gori", "fellow", false).unwrap();

        let err = reallocate(&mut dojo, "Robley Gori", "Blue", None).unwrap_err();
        assert!(format!("{:#}", err).contains("matches ids 1, 2"));

        let err = reallocate(&mut dojo, "Nobody Here", "Blue", None).unwrap_err();
        assert!(matches!(err.downcast_ref::<DojoError>(), Some(DojoError::InvalidInput(_))));
    }

    #[test]
    fn test_reallocate_with_kind_qualifier() {
        let mut dojo = deterministic();
        dojo.create_room("Blue", "office").unwrap();
        dojo.add_person("Robley", "Gori", "fellow", true).unwrap();
        dojo.create_room("Blue", "livingspace").unwrap();

        reallocate(&mut dojo, "1", "Blue", Some("livingspace")).unwrap();
        assert_eq!(dojo.get_old_livingspace("Robley Gori").unwrap().name, "Blue");
        assert!(reallocate(&mut dojo, "1", "Blue", Some("kitchen")).is_err());
    }

    #[test]
    fn test_load_people_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("people.txt");
        fs::write(
            &path,
            "OLUWAFEMI SULE FELLOW Y\nDOMINIC WALTERS STAFF\nSIMON PATTERSON FELLOW Y\n\
             MARI LAWRENCE FELLOW Y\nLEIGH RILEY STAFF\nTANA LOPEZ FELLOW Y\n\
             KELLY McGUIRE STAFF\nJOHN DOE FELLOW N\n",
        )
        .unwrap();

        let mut dojo = deterministic();
        load_people(&mut dojo, &path).unwrap();

        assert_eq!(dojo.people(Role::Fellow).len(), 5);
        assert_eq!(dojo.people(Role::Staff).len(), 3);
        assert_eq!(dojo.all_people().len(), 8);
    }
}
