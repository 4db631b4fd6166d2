//! Allocation reports
//!
//! Reports are built as plain text, one room header or person per line, and
//! then handed to a sink: the console (with colour) or a file in the output
//! directory (exact text).

use colored::*;
use eyre::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::dojo::{Dojo, DojoError, Room, RoomKind};

/// Where a report ends up
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportSink {
    Console,
    File(PathBuf),
}

impl ReportSink {
    /// Console by default, or `file_name` inside `output_dir`
    pub fn resolve(file_name: Option<&Path>, output_dir: &Path) -> Self {
        match file_name {
            Some(name) if name.is_absolute() => ReportSink::File(name.to_path_buf()),
            Some(name) => ReportSink::File(output_dir.join(name)),
            None => ReportSink::Console,
        }
    }

    /// Emit `report`. Returns the file written, if any.
    pub fn write(&self, report: &str) -> Result<Option<PathBuf>> {
        match self {
            ReportSink::Console => {
                print_colored(report);
                Ok(None)
            }
            ReportSink::File(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("Failed to create output directory {}", parent.display()))?;
                }
                fs::write(path, report).with_context(|| format!("Failed to write report to {}", path.display()))?;
                log::info!("Wrote report to {}", path.display());
                Ok(Some(path.clone()))
            }
        }
    }
}

fn print_colored(report: &str) {
    for line in report.lines() {
        if let Some((name, kind)) = line.rsplit_once(" - ")
            && !line.starts_with(' ')
            && kind.parse::<RoomKind>().is_ok()
        {
            println!("{} - {}", name.bold(), kind.cyan());
        } else {
            println!("{}", line);
        }
    }
}

fn push_room(out: &mut String, dojo: &Dojo, room: &Room) {
    out.push_str(&format!("{} - {}\n", room.name, room.kind));
    for person in dojo.occupants(room) {
        out.push_str(&format!("{}\n", person.full_name()));
    }
    out.push('\n');
}

/// Every room, offices first, with its occupants
pub fn allocations(dojo: &Dojo) -> String {
    let mut out = String::new();
    for kind in RoomKind::ALL {
        for room in dojo.rooms(kind) {
            push_room(&mut out, dojo, room);
        }
    }
    out
}

/// A single room with its occupants, offices first unless `kind` is given
pub fn room(dojo: &Dojo, name: &str, kind: Option<RoomKind>) -> Result<String, DojoError> {
    let room = dojo
        .lookup_room(name, kind)
        .ok_or_else(|| DojoError::RoomNotFound(name.trim().to_string()))?;
    let mut out = String::new();
    push_room(&mut out, dojo, room);
    Ok(out)
}

/// Everyone still waiting for an office or a requested living space
pub fn unallocated(dojo: &Dojo) -> String {
    dojo.unallocated()
        .iter()
        .map(|entry| format!(" {} - {}\n", entry.person.full_name(), entry.person.role))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn seeded_dojo() -> Dojo {
        let mut dojo = Dojo::new();
        dojo.create_room("Blue", "office").unwrap();
        dojo.create_room("Mara", "livingspace").unwrap();
        dojo.add_person("Another", "Lady", "fellow", true).unwrap();
        dojo
    }

    #[test]
    fn test_allocations_lists_rooms_and_people() {
        let mut dojo = seeded_dojo();
        dojo.add_person("Faith", "Gori", "staff", false).unwrap();
        dojo.add_person("Robley", "Gori", "fellow", true).unwrap();

        let report = allocations(&dojo);
        let lines: Vec<&str> = report.lines().collect();
        assert!(lines.contains(&"Blue - office"));
        assert!(lines.contains(&"Mara - livingspace"));
        assert!(lines.contains(&"Faith Gori"));
        assert!(lines.contains(&"Robley Gori"));
    }

    #[test]
    fn test_room_report() {
        let mut dojo = seeded_dojo();
        dojo.add_person("Faith", "Gori", "staff", false).unwrap();
        dojo.add_person("Robley", "Gori", "fellow", true).unwrap();

        let blue = room(&dojo, "Blue", None).unwrap();
        assert!(blue.starts_with("Blue - office\n"));
        assert!(blue.contains("Faith Gori\n"));

        let mara = room(&dojo, "Mara", None).unwrap();
        assert!(mara.starts_with("Mara - livingspace\n"));
        assert!(mara.contains("Robley Gori\n"));
        assert!(!mara.contains("Faith Gori"));

        assert!(matches!(room(&dojo, "Nowhere", None), Err(DojoError::RoomNotFound(_))));
    }

    #[test]
    fn test_room_report_by_kind() {
        let mut dojo = seeded_dojo();
        dojo.create_room("Blue", "livingspace").unwrap();

        assert!(room(&dojo, "Blue", None).unwrap().starts_with("Blue - office\n"));
        assert_eq!(
            room(&dojo, "Blue", Some(RoomKind::LivingSpace)).unwrap(),
            "Blue - livingspace\n\n"
        );
        assert!(matches!(
            room(&dojo, "Mara", Some(RoomKind::Office)),
            Err(DojoError::RoomNotFound(_))
        ));
    }

    #[test]
    fn test_unallocated_report() {
        let mut dojo = Dojo::new();
        dojo.add_person("New", "Guy", "staff", false).unwrap();
        dojo.add_person("New", "Lady", "fellow", false).unwrap();

        let report = unallocated(&dojo);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines, vec![" New Guy - staff", " New Lady - fellow"]);
    }

    #[test]
    fn test_unallocated_report_empty_when_everyone_placed() {
        let mut dojo = seeded_dojo();
        dojo.add_person("Faith", "Gori", "staff", false).unwrap();
        assert_eq!(unallocated(&dojo), "");
    }

    #[test]
    fn test_file_sink_writes_exact_text() {
        let temp = tempdir().unwrap();
        let mut dojo = seeded_dojo();
        dojo.add_person("Faith", "Gori", "staff", false).unwrap();

        let sink = ReportSink::resolve(Some(Path::new("newfile.txt")), &temp.path().join("output_files"));
        let written = sink.write(&allocations(&dojo)).unwrap().unwrap();

        let content = fs::read_to_string(&written).unwrap();
        assert!(content.lines().any(|l| l == "Blue - office"));
        assert!(content.lines().any(|l| l == "Faith Gori"));
    }

    #[test]
    fn test_resolve_sink() {
        let out = Path::new("/tmp/out");
        assert_eq!(ReportSink::resolve(None, out), ReportSink::Console);
        assert_eq!(
            ReportSink::resolve(Some(Path::new("a.txt")), out),
            ReportSink::File(PathBuf::from("/tmp/out/a.txt"))
        );
        assert_eq!(
            ReportSink::resolve(Some(Path::new("/abs/a.txt")), out),
            ReportSink::File(PathBuf::from("/abs/a.txt"))
        );
    }
}
