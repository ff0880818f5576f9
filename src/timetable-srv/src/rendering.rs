//! Plain text rendering of search outcomes and reference lists, used by the command line binary.

use crate::resolver::SearchOutcome;
use crate::schema::{Department, Staff, TimetableEntry};
use std::fmt;

/// The name of the school shown in the banner.
pub const SCHOOL_NAME: &str = "School of Computer Science";

/// The title shown under the banner.
pub const TOOL_TITLE: &str = "Timetable Management System";

/// The banner printed before anything else.
pub fn header() -> String {
  let width = SCHOOL_NAME.len().max(TOOL_TITLE.len()) + 4;
  let rule = "=".repeat(width);
  format!("{rule}\n  {SCHOOL_NAME}\n  {TOOL_TITLE}\n{rule}\n")
}

/// A single entry block: period + day on the first line, then the joined names.
fn write_entry(formatter: &mut fmt::Formatter, entry: &TimetableEntry) -> fmt::Result {
  writeln!(formatter, "Period {} [{}]", entry.period, entry.day)?;
  writeln!(formatter, "  Staff:      {}", entry.staff_name())?;
  writeln!(formatter, "  Subject:    {}", entry.subject_name())?;
  writeln!(formatter, "  Department: {}", entry.department_name())
}

/// The "Search Result" panel of an outcome.
struct OutcomePanel<'a>(&'a SearchOutcome);

impl fmt::Display for OutcomePanel<'_> {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    writeln!(formatter, "Search Result")?;

    match self.0 {
      SearchOutcome::Entries(entries) => {
        for (index, entry) in entries.iter().enumerate() {
          if index > 0 {
            writeln!(formatter)?;
          }
          write_entry(formatter, entry)?;
        }
        Ok(())
      }
      SearchOutcome::Empty(message) | SearchOutcome::Invalid(message) | SearchOutcome::Failed(message) => {
        writeln!(formatter, "{message}")
      }
    }
  }
}

/// Renders the "Search Result" panel.
pub fn outcome(outcome: &SearchOutcome) -> String {
  OutcomePanel(outcome).to_string()
}

/// An `id  name` listing with the ids padded to a common width.
struct Listing<'a>(Vec<(&'a str, &'a str)>);

impl fmt::Display for Listing<'_> {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    let width = self.0.iter().map(|(id, _)| id.len()).max().unwrap_or_default();
    self
      .0
      .iter()
      .try_for_each(|(id, name)| writeln!(formatter, "{id:<width$}  {name}"))
  }
}

/// An `id  name` listing of departments.
pub fn departments(departments: &[Department]) -> String {
  Listing(
    departments
      .iter()
      .map(|department| (department.id.as_str(), department.name.as_str()))
      .collect(),
  )
  .to_string()
}

/// An `id  name` listing of staff.
pub fn staff(staff: &[Staff]) -> String {
  Listing(staff.iter().map(|member| (member.id.as_str(), member.name.as_str())).collect()).to_string()
}

#[cfg(test)]
mod tests {
  use super::{departments, header, outcome, staff, SCHOOL_NAME};
  use crate::resolver::{SearchOutcome, FREE_PERIOD};
  use crate::schema::{Day, Department, Identifier};
  use crate::store::memory::entry;

  #[test]
  fn test_header() {
    assert!(header().contains(SCHOOL_NAME));
  }

  #[test]
  fn test_message_outcome() {
    assert_eq!(
      outcome(&SearchOutcome::Empty(FREE_PERIOD.into())),
      "Search Result\nFree Period\n"
    );
  }

  #[test]
  fn test_entries_outcome() {
    let mut orphan = entry("s2", "cs", Day::Monday, 2);
    orphan.subject = None;
    let rendered = outcome(&SearchOutcome::Entries(vec![entry("s1", "cs", Day::Monday, 1), orphan]));

    assert!(rendered.contains("Period 1 [Monday]"));
    assert!(rendered.contains("  Staff:      staff s1"));
    assert!(rendered.contains("  Department: department cs"));
    assert!(rendered.contains("Period 2 [Monday]\n  Staff:      staff s2\n  Subject:    \n"));
  }

  #[test]
  fn test_listing_alignment() {
    let rows = vec![
      Department {
        id: Identifier::new("1"),
        name: "Physics".into(),
      },
      Department {
        id: Identifier::new("cse"),
        name: "Computer Science".into(),
      },
    ];
    assert_eq!(departments(&rows), "1    Physics\ncse  Computer Science\n");
  }

  #[test]
  fn test_empty_listing() {
    assert_eq!(staff(&[]), "");
  }
}
