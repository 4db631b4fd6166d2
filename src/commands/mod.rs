//! Command implementations
//!
//! Every engine command runs against a `Dojo` opened from the configured
//! state file. One-shot invocations save it back after a mutating command;
//! `dojo shell` keeps a single engine for the whole session.

use eyre::{Context, Result};

pub mod allocation;
pub mod completions;
pub mod config;
pub mod print;
pub mod shell;
pub mod state;
pub mod status;

use crate::cli::Commands;
use crate::config::{AllocationStrategy, Config};
use crate::dojo::{Dojo, FirstEligible, RandomSelector};

/// Open the engine from the configured state file
pub fn open(config: &Config) -> Result<Dojo> {
    let dojo = match (config.allocation.strategy, config.allocation.seed) {
        (AllocationStrategy::Sequential, _) => Dojo::with_selector(Box::new(FirstEligible)),
        (AllocationStrategy::Random, Some(seed)) => Dojo::with_selector(Box::new(RandomSelector::seeded(seed))),
        (AllocationStrategy::Random, None) => Dojo::new(),
    };
    let path = config.state_path();
    crate::store::open(&path, dojo)
        .with_context(|| format!("Failed to open state {}", path.display()))
}

/// Persist the engine when autosave is on
pub fn autosave(dojo: &Dojo, config: &Config) -> Result<()> {
    if config.allocation.autosave {
        dojo.save_state(&config.state_path())?;
    } else {
        log::debug!("Autosave disabled, state not written");
    }
    Ok(())
}

/// Run one command in a fresh process
pub fn run_once(command: Commands, config: &Config) -> Result<()> {
    let mut dojo = open(config)?;
    let mutates = command.mutates();

    execute(command, &mut dojo, config)?;

    if mutates {
        autosave(&dojo, config)?;
    }
    Ok(())
}

/// Dispatch a command against an open engine
pub fn execute(command: Commands, dojo: &mut Dojo, config: &Config) -> Result<()> {
    match command {
        Commands::CreateRoom { kind, names } => allocation::create_room(dojo, &kind, &names),
        Commands::AddPerson {
            first_name,
            last_name,
            role,
            wants_accommodation,
        } => allocation::add_person(dojo, &first_name, &last_name, &role, wants_accommodation),
        Commands::Find { name } => allocation::find(dojo, &name.join(" ")),
        Commands::Reallocate { person, room, kind } => {
            allocation::reallocate(dojo, &person, &room, kind.as_deref())
        }
        Commands::LoadPeople { file } => allocation::load_people(dojo, &file),
        Commands::PrintAllocations { file } => print::allocations(dojo, file.as_deref(), config),
        Commands::PrintUnallocated { file } => print::unallocated(dojo, file.as_deref(), config),
        Commands::PrintRoom { name, kind } => print::room(dojo, &name, kind.as_deref()),
        Commands::SaveState { db } => state::save(dojo, db.as_deref(), config),
        Commands::LoadState { db } => state::load(dojo, &db),
        Commands::Status { format } => status::run(dojo, crate::cli::OutputFormat::resolve(format), config),
        Commands::Config { action } => config::run(action, config),
        Commands::Completions { shell } => completions::run(shell),
        Commands::Shell => eyre::bail!("Already inside a dojo shell"),
    }
}
