use colored::*;
use eyre::Result;
use std::path::Path;

use crate::config::Config;
use crate::dojo::{Dojo, RoomKind};
use crate::report::{self, ReportSink};

pub fn allocations(dojo: &Dojo, file: Option<&Path>, config: &Config) -> Result<()> {
    let text = report::allocations(dojo);
    if text.is_empty() {
        println!("  {}", "(no rooms yet)".dimmed());
    } else {
        ReportSink::Console.write(&text)?;
    }
    write_file(&text, file, config)
}

pub fn unallocated(dojo: &Dojo, file: Option<&Path>, config: &Config) -> Result<()> {
    let text = report::unallocated(dojo);
    if text.is_empty() {
        println!("  {}", "(everyone is allocated)".dimmed());
    } else {
        println!("{}", "Unallocated:".bold());
        ReportSink::Console.write(&text)?;
    }
    write_file(&text, file, config)
}

pub fn room(dojo: &Dojo, name: &str, kind: Option<&str>) -> Result<()> {
    let kind = kind.map(str::parse::<RoomKind>).transpose()?;
    let text = report::room(dojo, name, kind)?;
    ReportSink::Console.write(&text)?;
    Ok(())
}

fn write_file(text: &str, file: Option<&Path>, config: &Config) -> Result<()> {
    if file.is_none() {
        return Ok(());
    }
    let sink = ReportSink::resolve(file, &config.output_dir());
    if let Some(path) = sink.write(text)? {
        println!("  {} Saved to {}", "✓".green(), path.display());
    }
    Ok(())
}
