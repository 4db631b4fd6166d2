//! Offices and living spaces

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DojoError;
use super::person::Person;

/// Kind of room, carrying its fixed capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    Office,
    LivingSpace,
}

impl RoomKind {
    pub const ALL: [RoomKind; 2] = [RoomKind::Office, RoomKind::LivingSpace];

    pub fn capacity(self) -> usize {
        match self {
            RoomKind::Office => 6,
            RoomKind::LivingSpace => 4,
        }
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomKind::Office => write!(f, "office"),
            RoomKind::LivingSpace => write!(f, "livingspace"),
        }
    }
}

impl FromStr for RoomKind {
    type Err = DojoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "office" => Ok(RoomKind::Office),
            "livingspace" | "living_space" | "living-space" => Ok(RoomKind::LivingSpace),
            other => Err(DojoError::InvalidInput(format!(
                "unknown room type '{}' (expected office or livingspace)",
                other
            ))),
        }
    }
}

/// A room with a fixed capacity and the ids of its occupants in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub name: String,
    pub kind: RoomKind,
    pub capacity: usize,
    pub occupants: Vec<u32>,
}

impl Room {
    pub fn new(name: &str, kind: RoomKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            capacity: kind.capacity(),
            occupants: Vec::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.occupants.len() >= self.capacity
    }

    pub fn has_vacancy(&self) -> bool {
        !self.is_full()
    }

    pub fn vacancies(&self) -> usize {
        self.capacity.saturating_sub(self.occupants.len())
    }

    pub fn contains(&self, person_id: u32) -> bool {
        self.occupants.contains(&person_id)
    }

    /// Admit a person; false if the room is full or they are already here
    pub fn add_occupant(&mut self, person: &Person) -> bool {
        if self.is_full() || self.contains(person.id) {
            return false;
        }
        self.occupants.push(person.id);
        true
    }

    /// Remove a person; false if they were not here
    pub fn remove_occupant(&mut self, person: &Person) -> bool {
        match self.occupants.iter().position(|&id| id == person.id) {
            Some(idx) => {
                self.occupants.remove(idx);
                true
            }
            None => false,
        }
    }
}
