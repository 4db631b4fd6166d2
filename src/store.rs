//! Save/Load of the full engine state
//!
//! State is stored as a single pretty-printed JSON document. Occupancy is
//! kept as person ids on each room so a reload restores exactly what was
//! saved instead of re-running allocation.

use chrono::{DateTime, Utc};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::dojo::{Dojo, Person, Role, Room, RoomKind};

/// Version number for the state file format (increment when format changes)
const STATE_VERSION: u32 = 1;

/// Serializable snapshot of the engine
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedState {
    /// State format version
    pub version: u32,
    /// When the snapshot was written
    pub saved_at: DateTime<Utc>,
    /// Next person id to hand out
    pub next_id: u32,
    /// Offices then living spaces, each in creation order
    pub rooms: Vec<Room>,
    /// Everyone, ordered by id
    pub people: Vec<Person>,
}

impl SavedState {
    pub fn capture(dojo: &Dojo) -> Self {
        let rooms = RoomKind::ALL
            .iter()
            .flat_map(|&kind| dojo.rooms(kind).cloned())
            .collect();
        let people = dojo.all_people().into_iter().cloned().collect();

        Self {
            version: STATE_VERSION,
            saved_at: Utc::now(),
            next_id: dojo.next_id(),
            rooms,
            people,
        }
    }

    /// Reject anything that would break the engine's invariants
    pub fn validate(&self) -> Result<()> {
        if self.version != STATE_VERSION {
            eyre::bail!(
                "Unsupported state version: expected {}, found {}",
                STATE_VERSION,
                self.version
            );
        }

        if self.next_id == u32::MAX {
            eyre::bail!("Next person id {} leaves no ids to hand out", self.next_id);
        }

        let mut ids = HashSet::new();
        for person in &self.people {
            if person.id == u32::MAX {
                eyre::bail!("Person id {} leaves no ids to hand out", person.id);
            }
            if !ids.insert(person.id) {
                eyre::bail!("Duplicate person id {}", person.id);
            }
        }

        let mut room_names = HashSet::new();
        let mut placed: HashSet<(u32, RoomKind)> = HashSet::new();
        for room in &self.rooms {
            if !room_names.insert((room.kind, room.name.as_str())) {
                eyre::bail!("Duplicate {} '{}'", room.kind, room.name);
            }
            if room.capacity != room.kind.capacity() {
                eyre::bail!(
                    "{} '{}' has capacity {}, expected {}",
                    room.kind,
                    room.name,
                    room.capacity,
                    room.kind.capacity()
                );
            }
            if room.occupants.len() > room.capacity {
                eyre::bail!("{} '{}' is over capacity", room.kind, room.name);
            }

            for &id in &room.occupants {
                let person = self
                    .people
                    .iter()
                    .find(|p| p.id == id)
                    .ok_or_else(|| eyre::eyre!("{} '{}' lists unknown person id {}", room.kind, room.name, id))?;
                if !person.role.can_occupy(room.kind) {
                    eyre::bail!("{} {} cannot occupy {} '{}'", person.role, person.full_name(), room.kind, room.name);
                }
                if !placed.insert((id, room.kind)) {
                    eyre::bail!("{} is in more than one {}", person.full_name(), room.kind);
                }
            }
        }

        Ok(())
    }
}

/// Write the engine state to `path`, replacing any previous file atomically
pub fn save(dojo: &Dojo, path: &Path) -> Result<()> {
    let state = SavedState::capture(dojo);
    let json = serde_json::to_string_pretty(&state).context("Failed to serialize state")?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).with_context(|| format!("Failed to create state directory {}", dir.display()))?;

    let mut tmp = NamedTempFile::new_in(dir).context("Failed to create temporary state file")?;
    tmp.write_all(json.as_bytes()).context("Failed to write state")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to save state to {}", path.display()))?;

    log::info!(
        "Saved {} rooms and {} people to {}",
        state.rooms.len(),
        state.people.len(),
        path.display()
    );
    Ok(())
}

/// Read and validate a state file
pub fn load(path: &Path) -> Result<SavedState> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read state file {}", path.display()))?;
    let state: SavedState =
        serde_json::from_str(&content).with_context(|| format!("Failed to parse state file {}", path.display()))?;
    state
        .validate()
        .with_context(|| format!("Invalid state file {}", path.display()))?;

    log::info!("Loaded state saved at {} from {}", state.saved_at, path.display());
    Ok(state)
}

/// Load the engine from `path`, or start empty when nothing was saved yet
pub fn open(path: &Path, dojo: Dojo) -> Result<Dojo> {
    let mut dojo = dojo;
    if path.exists() {
        dojo.load_state(path)?;
    } else {
        log::info!("No state at {}, starting empty", path.display());
    }
    Ok(dojo)
}

/// Count of people per role in a saved state, for summaries
pub fn role_counts(state: &SavedState) -> (usize, usize) {
    let fellows = state.people.iter().filter(|p| p.role == Role::Fellow).count();
    (fellows, state.people.len() - fellows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dojo::FirstEligible;
    use tempfile::tempdir;

    fn populated() -> Dojo {
        let mut dojo = Dojo::with_selector(Box::new(FirstEligible));
        dojo.create_room("Blue", "office").unwrap();
        dojo.create_room("Mara", "livingspace").unwrap();
        dojo.create_room("Hello", "office").unwrap();
        dojo.add_person("Another", "Lady", "fellow", true).unwrap();
        dojo.add_person("Faith", "Gori", "staff", false).unwrap();
        dojo
    }

    #[test]
    fn test_save_creates_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("dojo.json");

        populated().save_state(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_round_trip_preserves_occupancy() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("dojo.json");
        let original = populated();
        original.save_state(&path).unwrap();

        let mut loaded = Dojo::new();
        loaded.load_state(&path).unwrap();

        for kind in RoomKind::ALL {
            let before: Vec<&Room> = original.rooms(kind).collect();
            let after: Vec<&Room> = loaded.rooms(kind).collect();
            assert_eq!(before, after);
        }
        assert_eq!(original.all_people(), loaded.all_people());
        assert_eq!(loaded.next_id(), original.next_id());

        let offices: Vec<&str> = loaded.rooms(RoomKind::Office).map(|r| r.name.as_str()).collect();
        assert!(offices.contains(&"Hello"));
    }

    #[test]
    fn test_load_replaces_existing_state() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("dojo.json");
        populated().save_state(&path).unwrap();

        let mut dojo = Dojo::with_selector(Box::new(FirstEligible));
        dojo.create_room("Other", "office").unwrap();
        dojo.add_person("Someone", "Else", "staff", false).unwrap();
        dojo.load_state(&path).unwrap();

        assert!(dojo.room(RoomKind::Office, "Other").is_none());
        assert!(dojo.get_person_id("Someone Else").is_empty());
        assert_eq!(dojo.all_people().len(), 2);

        let id = dojo.add_person("New", "Comer", "staff", false).unwrap().id;
        assert_eq!(id, 3);
    }

    #[test]
    fn test_rejects_unknown_occupant() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("dojo.json");

        let mut state = SavedState::capture(&populated());
        state.rooms[0].occupants.push(99);
        fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();

        let mut dojo = populated();
        let err = dojo.load_state(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("unknown person id 99"));
        // failed load leaves the engine untouched
        assert_eq!(dojo.all_people().len(), 2);
    }

    #[test]
    fn test_rejects_staff_in_livingspace() {
        let mut state = SavedState::capture(&populated());
        let staff_id = state.people.iter().find(|p| p.role == Role::Staff).unwrap().id;
        let mara = state.rooms.iter_mut().find(|r| r.kind == RoomKind::LivingSpace).unwrap();
        mara.occupants.push(staff_id);

        assert!(state.validate().is_err());
    }

    #[test]
    fn test_rejects_exhausted_person_id() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("dojo.json");

        let mut state = SavedState::capture(&Dojo::with_selector(Box::new(FirstEligible)));
        state.people.push(Person::new(u32::MAX, "Faith", "Gori", Role::Staff, false));
        state.next_id = 1;
        fs::write(&path, serde_json::to_string(&state).unwrap()).unwrap();

        let mut dojo = populated();
        let err = dojo.load_state(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("leaves no ids"));
        assert_eq!(dojo.all_people().len(), 2);
    }

    #[test]
    fn test_rejects_exhausted_next_id() {
        let mut state = SavedState::capture(&populated());
        state.next_id = u32::MAX;
        assert!(state.validate().is_err());

        state.next_id = u32::MAX - 1;
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_rejects_version_mismatch() {
        let mut state = SavedState::capture(&populated());
        state.version = 99;
        assert!(state.validate().is_err());
    }

    #[test]
    fn test_open_missing_file_starts_empty() {
        let temp = tempdir().unwrap();
        let dojo = open(&temp.path().join("absent.json"), Dojo::new()).unwrap();
        assert!(dojo.all_people().is_empty());
    }

    #[test]
    fn test_role_counts() {
        let state = SavedState::capture(&populated());
        assert_eq!(role_counts(&state), (1, 1));
    }
}
