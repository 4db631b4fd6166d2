//! People registered at the Dojo

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::DojoError;
use super::room::RoomKind;

/// The role a person holds at the Dojo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Fellow,
    Staff,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Fellow, Role::Staff];

    /// Whether someone in this role may occupy a room of `kind`
    pub fn can_occupy(self, kind: RoomKind) -> bool {
        match kind {
            RoomKind::Office => true,
            RoomKind::LivingSpace => self == Role::Fellow,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Fellow => write!(f, "fellow"),
            Role::Staff => write!(f, "staff"),
        }
    }
}

impl FromStr for Role {
    type Err = DojoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fellow" => Ok(Role::Fellow),
            "staff" => Ok(Role::Staff),
            other => Err(DojoError::InvalidInput(format!(
                "unknown role '{}' (expected fellow or staff)",
                other
            ))),
        }
    }
}

/// A fellow or staff member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: u32,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Only ever true for fellows
    #[serde(default)]
    pub wants_accommodation: bool,
}

impl Person {
    pub fn new(id: u32, first_name: &str, last_name: &str, role: Role, wants_accommodation: bool) -> Self {
        Self {
            id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            role,
            wants_accommodation: wants_accommodation && role.can_occupy(RoomKind::LivingSpace),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Case-insensitive comparison against an already split first/last name
    pub fn is_named(&self, first_name: &str, last_name: &str) -> bool {
        self.first_name.eq_ignore_ascii_case(first_name) && self.last_name.eq_ignore_ascii_case(last_name)
    }
}

/// Split a full name into first name and the remaining tokens as last name
pub fn split_full_name(full_name: &str) -> Option<(String, String)> {
    let mut parts = full_name.split_whitespace();
    let first = parts.next()?;
    let rest: Vec<&str> = parts.collect();
    if rest.is_empty() {
        return None;
    }
    Some((first.to_string(), rest.join(" ")))
}
