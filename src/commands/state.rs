use colored::*;
use eyre::Result;
use std::path::Path;

use crate::config::Config;
use crate::dojo::{Dojo, Role, RoomKind};
use crate::store;

pub fn save(dojo: &Dojo, db: Option<&Path>, config: &Config) -> Result<()> {
    let path = match db {
        Some(path) => Config::expand_path(path),
        None => config.state_path(),
    };
    dojo.save_state(&path)?;

    println!(
        "  {} Saved {} rooms and {} people to {}",
        "✓".green(),
        RoomKind::ALL.iter().map(|&k| dojo.rooms(k).count()).sum::<usize>(),
        dojo.all_people().len(),
        path.display()
    );
    Ok(())
}

pub fn load(dojo: &mut Dojo, db: &Path) -> Result<()> {
    let path = Config::expand_path(db);
    let saved = store::load(&path)?;
    let (fellows, staff) = store::role_counts(&saved);
    let rooms = saved.rooms.len();
    let saved_at = saved.saved_at;

    dojo.restore(saved.rooms, saved.people, saved.next_id);

    println!(
        "  {} Loaded {} rooms, {} {}s and {} {} from {} {}",
        "✓".green(),
        rooms,
        fellows,
        Role::Fellow,
        staff,
        Role::Staff,
        path.display(),
        format!("(saved {})", saved_at.format("%Y-%m-%d %H:%M")).dimmed()
    );
    Ok(())
}
