//! The shapes of the rows we read from the hosted store. Everything here is owned by the store; the
//! application only ever holds read-only copies of it.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Days + periods are small enough to live on their own.
mod day;
pub use day::{Day, PeriodSelector, MAX_PERIOD};

/// Row ids are opaque to us. Depending on how the tables were created they come back as uuid strings or
/// as integers, so both are accepted and held as text.
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash, Default)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
  /// Wraps some text as an id.
  pub fn new<S>(value: S) -> Self
  where
    S: Into<String>,
  {
    Self(value.into())
  }

  /// The id as text, ready to be used in a query filter.
  pub fn as_str(&self) -> &str {
    self.0.as_str()
  }
}

impl fmt::Display for Identifier {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    write!(formatter, "{}", self.0)
  }
}

impl<'de> Deserialize<'de> for Identifier {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: Deserializer<'de>,
  {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawIdentifier {
      Text(String),
      Number(i64),
    }

    Ok(match RawIdentifier::deserialize(deserializer)? {
      RawIdentifier::Text(text) => Identifier(text),
      RawIdentifier::Number(number) => Identifier(number.to_string()),
    })
  }
}

/// A row from the `departments` table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Department {
  /// The store's id for this department.
  pub id: Identifier,
  /// The display name.
  pub name: String,
}

/// A row from the `staff` table.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Staff {
  /// The store's id for this staff member.
  pub id: Identifier,
  /// The display name.
  pub name: String,
  /// The department this staff member belongs to.
  #[serde(default)]
  pub department_id: Option<Identifier>,
}

/// The `{"name": ...}` object the store embeds for each foreign key we ask it to join.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct JoinedName {
  #[allow(clippy::missing_docs_in_private_items)]
  pub name: String,
}

/// A row from `timetable_entries`, widened with the names of the staff member, subject and department it
/// references. The names are resolved by the store; any of them is `None` when the referenced row is gone.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TimetableEntry {
  /// Who teaches.
  pub staff_id: Identifier,
  /// What is taught.
  pub subject_id: Identifier,
  /// Who is taught.
  pub department_id: Identifier,
  /// The day of the week.
  pub day: Day,
  /// The slot within the day, `1..=8`.
  pub period: u8,

  #[serde(default)]
  #[allow(clippy::missing_docs_in_private_items)]
  pub staff: Option<JoinedName>,
  #[serde(default)]
  #[allow(clippy::missing_docs_in_private_items)]
  pub subject: Option<JoinedName>,
  #[serde(default)]
  #[allow(clippy::missing_docs_in_private_items)]
  pub department: Option<JoinedName>,
}

impl TimetableEntry {
  /// The joined staff name, or an empty string.
  pub fn staff_name(&self) -> &str {
    self.staff.as_ref().map(|joined| joined.name.as_str()).unwrap_or_default()
  }

  /// The joined subject name, or an empty string.
  pub fn subject_name(&self) -> &str {
    self.subject.as_ref().map(|joined| joined.name.as_str()).unwrap_or_default()
  }

  /// The joined department name, or an empty string.
  pub fn department_name(&self) -> &str {
    self
      .department
      .as_ref()
      .map(|joined| joined.name.as_str())
      .unwrap_or_default()
  }
}
