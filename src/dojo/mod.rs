//! Room allocation engine
//!
//! The `Dojo` owns every room and every person. Occupancy lives only on the
//! rooms: whether someone is allocated is always derived by scanning room
//! membership, never stored on the person.
//!
//! Allocation rules:
//! - Everyone is offered an office on registration
//! - Fellows who ask for accommodation are also offered a living space
//! - Staff are never placed in a living space
//! - Lack of space leaves the person unallocated; it is not an error

use eyre::Result;
use indexmap::IndexMap;
use std::path::Path;

pub mod error;
pub mod person;
pub mod room;
pub mod selector;

pub use error::DojoError;
pub use person::{Person, Role};
pub use room::{Room, RoomKind};
pub use selector::{FirstEligible, RandomSelector, RoomSelector};

use person::split_full_name;

/// One parsed line of a bulk load
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRecord {
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub wants_accommodation: bool,
}

/// A person lacking one or more rooms they are entitled to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unallocated<'a> {
    pub person: &'a Person,
    pub missing: Vec<RoomKind>,
}

/// The allocation engine
#[derive(Debug)]
pub struct Dojo {
    offices: IndexMap<String, Room>,
    livingspaces: IndexMap<String, Room>,
    fellows: Vec<Person>,
    staff: Vec<Person>,
    next_id: u32,
    selector: Box<dyn RoomSelector>,
}

impl Default for Dojo {
    fn default() -> Self {
        Self::new()
    }
}

impl Dojo {
    /// Create an empty engine that allocates rooms at random
    pub fn new() -> Self {
        Self::with_selector(Box::new(RandomSelector::from_entropy()))
    }

    pub fn with_selector(selector: Box<dyn RoomSelector>) -> Self {
        Self {
            offices: IndexMap::new(),
            livingspaces: IndexMap::new(),
            fellows: Vec::new(),
            staff: Vec::new(),
            next_id: 1,
            selector,
        }
    }

    fn bucket(&self, kind: RoomKind) -> &IndexMap<String, Room> {
        match kind {
            RoomKind::Office => &self.offices,
            RoomKind::LivingSpace => &self.livingspaces,
        }
    }

    fn bucket_mut(&mut self, kind: RoomKind) -> &mut IndexMap<String, Room> {
        match kind {
            RoomKind::Office => &mut self.offices,
            RoomKind::LivingSpace => &mut self.livingspaces,
        }
    }

    fn people_mut(&mut self, role: Role) -> &mut Vec<Person> {
        match role {
            Role::Fellow => &mut self.fellows,
            Role::Staff => &mut self.staff,
        }
    }

    /// Rooms of one kind in creation order
    pub fn rooms(&self, kind: RoomKind) -> impl Iterator<Item = &Room> {
        self.bucket(kind).values()
    }

    /// People of one role in creation order
    pub fn people(&self, role: Role) -> &[Person] {
        match role {
            Role::Fellow => &self.fellows,
            Role::Staff => &self.staff,
        }
    }

    /// Everyone, ordered by id (creation order)
    pub fn all_people(&self) -> Vec<&Person> {
        let mut everyone: Vec<&Person> = self.fellows.iter().chain(self.staff.iter()).collect();
        everyone.sort_by_key(|p| p.id);
        everyone
    }

    pub fn next_id(&self) -> u32 {
        self.next_id
    }

    /// Create a room from a textual kind such as "office" or "livingspace"
    pub fn create_room(&mut self, name: &str, kind: &str) -> Result<&Room, DojoError> {
        let kind: RoomKind = kind.parse()?;
        self.create_room_of(name, kind)
    }

    /// Create a room, or return the existing one with the same name and kind
    pub fn create_room_of(&mut self, name: &str, kind: RoomKind) -> Result<&Room, DojoError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DojoError::InvalidInput("room name cannot be empty".to_string()));
        }

        let bucket = self.bucket_mut(kind);
        if bucket.contains_key(name) {
            log::debug!("{} '{}' already exists", kind, name);
        } else {
            bucket.insert(name.to_string(), Room::new(name, kind));
            log::info!("Created {} '{}'", kind, name);
        }

        Ok(&bucket[name])
    }

    /// Register a person from a textual role and try to allocate them
    pub fn add_person(
        &mut self,
        first_name: &str,
        last_name: &str,
        role: &str,
        wants_accommodation: bool,
    ) -> Result<&Person, DojoError> {
        let role: Role = role.parse()?;
        self.add_person_as(first_name, last_name, role, wants_accommodation)
    }

    /// Register a person and try to allocate them an office, plus a living
    /// space for fellows who asked for one
    pub fn add_person_as(
        &mut self,
        first_name: &str,
        last_name: &str,
        role: Role,
        wants_accommodation: bool,
    ) -> Result<&Person, DojoError> {
        let (first_name, last_name) = validate_names(first_name, last_name)?;
        let next_id = self
            .next_id
            .checked_add(1)
            .ok_or_else(|| DojoError::InvalidInput("no person ids left".to_string()))?;

        let person = Person::new(self.next_id, first_name, last_name, role, wants_accommodation);
        self.next_id = next_id;
        log::info!("Added {} {} with id {}", role, person.full_name(), person.id);

        self.allocate(&person, RoomKind::Office);
        if person.wants_accommodation {
            self.allocate(&person, RoomKind::LivingSpace);
        }

        let bucket = self.people_mut(role);
        bucket.push(person);
        Ok(&bucket[bucket.len() - 1])
    }

    /// Place a person in one of the rooms of `kind` that still has space
    fn allocate(&mut self, person: &Person, kind: RoomKind) -> Option<String> {
        let eligible: Vec<usize> = self
            .bucket(kind)
            .values()
            .enumerate()
            .filter(|(_, room)| room.has_vacancy())
            .map(|(idx, _)| idx)
            .collect();

        let picked = self.selector.select(&eligible).filter(|idx| eligible.contains(idx));
        let Some(idx) = picked else {
            log::warn!("No {} available for {}", kind, person.full_name());
            return None;
        };

        let room = &mut self.bucket_mut(kind)[idx];
        if !room.add_occupant(person) {
            return None;
        }
        log::info!("Allocated {} to {} '{}'", person.full_name(), kind, room.name);
        Some(room.name.clone())
    }

    /// Look a room up by name, offices first
    pub fn find_room(&self, name: &str) -> Option<&Room> {
        let name = name.trim();
        self.offices.get(name).or_else(|| self.livingspaces.get(name))
    }

    /// Look a room up by name, within `kind` when given
    pub fn lookup_room(&self, name: &str, kind: Option<RoomKind>) -> Option<&Room> {
        match kind {
            Some(kind) => self.room(kind, name),
            None => self.find_room(name),
        }
    }

    /// Look a room up by name within one kind
    pub fn room(&self, kind: RoomKind, name: &str) -> Option<&Room> {
        self.bucket(kind).get(name.trim())
    }

    /// Return the named room when it exists and has space for `full_name`
    pub fn check_room(&self, room_name: &str, full_name: &str) -> Option<&Room> {
        let room = self.find_room(room_name)?;
        if room.is_full() {
            log::debug!("{} '{}' has no space for {}", room.kind, room.name, full_name);
            return None;
        }
        Some(room)
    }

    /// The room of `kind` a person currently occupies
    pub fn room_of(&self, person_id: u32, kind: RoomKind) -> Option<&Room> {
        self.bucket(kind).values().find(|room| room.contains(person_id))
    }

    pub fn get_old_office(&self, full_name: &str) -> Option<&Room> {
        let person = self.get_person_id(full_name).into_iter().next()?;
        self.room_of(person.id, RoomKind::Office)
    }

    pub fn get_old_livingspace(&self, full_name: &str) -> Option<&Room> {
        let person = self.get_person_id(full_name).into_iter().next()?;
        self.room_of(person.id, RoomKind::LivingSpace)
    }

    /// Everyone whose first and last name match `full_name`, oldest first
    pub fn get_person_id(&self, full_name: &str) -> Vec<&Person> {
        let Some((first, last)) = split_full_name(full_name) else {
            return Vec::new();
        };
        self.all_people()
            .into_iter()
            .filter(|p| p.is_named(&first, &last))
            .collect()
    }

    pub fn get_person_object(&self, person_id: u32) -> Option<&Person> {
        self.fellows
            .iter()
            .chain(self.staff.iter())
            .find(|p| p.id == person_id)
    }

    /// Occupants of a room, resolved to people
    pub fn occupants<'a>(&'a self, room: &'a Room) -> impl Iterator<Item = &'a Person> + 'a {
        room.occupants.iter().filter_map(|&id| self.get_person_object(id))
    }

    /// Move a person into `new_room_name`, leaving their current room of
    /// the same kind. Nothing changes unless the move succeeds.
    pub fn reallocate_person(&mut self, person_id: u32, new_room_name: &str) -> Result<&Room, DojoError> {
        self.reallocate_person_in(person_id, new_room_name, None)
    }

    /// Like `reallocate_person`, but only looks for the room among `kind`
    /// when given, so a living space sharing an office's name is reachable.
    pub fn reallocate_person_in(
        &mut self,
        person_id: u32,
        new_room_name: &str,
        kind: Option<RoomKind>,
    ) -> Result<&Room, DojoError> {
        let person = self
            .get_person_object(person_id)
            .cloned()
            .ok_or(DojoError::PersonNotFound(person_id))?;

        let room_name = new_room_name.trim();
        let kind = self
            .lookup_room(room_name, kind)
            .map(|room| room.kind)
            .ok_or_else(|| DojoError::RoomNotFound(room_name.to_string()))?;

        let bucket = self.bucket_mut(kind);
        let dest = bucket
            .get_index_of(room_name)
            .ok_or_else(|| DojoError::RoomNotFound(room_name.to_string()))?;

        if bucket[dest].contains(person_id) {
            log::info!("{} is already in {} '{}'", person.full_name(), kind, room_name);
            return Ok(&bucket[dest]);
        }
        if bucket[dest].is_full() {
            return Err(DojoError::RoomFull(room_name.to_string()));
        }
        if !person.role.can_occupy(kind) {
            return Err(DojoError::InvalidRoomKind { role: person.role, kind });
        }

        if let Some(old) = bucket.values_mut().find(|room| room.contains(person_id)) {
            old.remove_occupant(&person);
            log::info!("Removed {} from {} '{}'", person.full_name(), kind, old.name);
        }
        bucket[dest].add_occupant(&person);
        log::info!("Reallocated {} to {} '{}'", person.full_name(), kind, room_name);

        Ok(&bucket[dest])
    }

    /// Register every record in order. Records are validated up front so a
    /// bad record adds nobody.
    pub fn load_people<I>(&mut self, records: I) -> Result<Vec<u32>, DojoError>
    where
        I: IntoIterator<Item = PersonRecord>,
    {
        let records: Vec<PersonRecord> = records.into_iter().collect();
        for record in &records {
            validate_names(&record.first_name, &record.last_name)?;
        }

        let mut ids = Vec::with_capacity(records.len());
        for record in records {
            let person = self.add_person_as(
                &record.first_name,
                &record.last_name,
                record.role,
                record.wants_accommodation,
            )?;
            ids.push(person.id);
        }
        log::info!("Loaded {} people", ids.len());
        Ok(ids)
    }

    /// People missing an office, or a living space they asked for
    pub fn unallocated(&self) -> Vec<Unallocated<'_>> {
        self.all_people()
            .into_iter()
            .filter_map(|person| {
                let mut missing = Vec::new();
                if self.room_of(person.id, RoomKind::Office).is_none() {
                    missing.push(RoomKind::Office);
                }
                if person.wants_accommodation && self.room_of(person.id, RoomKind::LivingSpace).is_none() {
                    missing.push(RoomKind::LivingSpace);
                }
                if missing.is_empty() {
                    None
                } else {
                    Some(Unallocated { person, missing })
                }
            })
            .collect()
    }

    /// Free places left across all rooms of one kind
    pub fn vacancies(&self, kind: RoomKind) -> usize {
        self.rooms(kind).map(Room::vacancies).sum()
    }

    /// Write the whole engine state to `path`
    pub fn save_state(&self, path: &Path) -> Result<()> {
        crate::store::save(self, path)
    }

    /// Replace the whole engine state with the one saved at `path`
    pub fn load_state(&mut self, path: &Path) -> Result<()> {
        let state = crate::store::load(path)?;
        self.restore(state.rooms, state.people, state.next_id);
        Ok(())
    }

    /// Swap in previously validated state, keeping the current selector
    pub(crate) fn restore(&mut self, rooms: Vec<Room>, people: Vec<Person>, next_id: u32) {
        self.offices.clear();
        self.livingspaces.clear();
        self.fellows.clear();
        self.staff.clear();

        for room in rooms {
            self.bucket_mut(room.kind).insert(room.name.clone(), room);
        }

        let max_id = people.iter().map(|p| p.id).max().unwrap_or(0);
        for person in people {
            self.people_mut(person.role).push(person);
        }
        self.next_id = next_id.max(max_id.saturating_add(1));

        log::info!(
            "Restored {} rooms and {} people",
            self.offices.len() + self.livingspaces.len(),
            self.fellows.len() + self.staff.len()
        );
    }
}

fn validate_names<'a>(first_name: &'a str, last_name: &'a str) -> Result<(&'a str, &'a str), DojoError> {
    let first_name = first_name.trim();
    let last_name = last_name.trim();
    if first_name.is_empty() || last_name.is_empty() {
        return Err(DojoError::InvalidInput(
            "first and last name cannot be empty".to_string(),
        ));
    }
    Ok((first_name, last_name))
}
