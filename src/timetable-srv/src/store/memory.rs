use super::{Cardinality, EntryFilter, Identity, StoreError, StoreResult, TimetableStore};
use crate::schema::{Day, Department, Identifier, JoinedName, Staff, TimetableEntry};
use crate::session::LoadingFlag;
use std::sync::Mutex;

/// Builds an entry with every joined name present.
pub(crate) fn entry(staff: &str, department: &str, day: Day, period: u8) -> TimetableEntry {
  TimetableEntry {
    staff_id: Identifier::new(staff),
    subject_id: Identifier::new(format!("{department}-{period}")),
    department_id: Identifier::new(department),
    day,
    period,
    staff: Some(JoinedName {
      name: format!("staff {staff}"),
    }),
    subject: Some(JoinedName {
      name: format!("subject {department}-{period}"),
    }),
    department: Some(JoinedName {
      name: format!("department {department}"),
    }),
  }
}

/// Returns true if the entry satisfies every equality filter, the way the store would apply them.
pub(crate) fn matches_filter(filter: &EntryFilter, entry: &TimetableEntry) -> bool {
  let identity = match &filter.identity {
    Identity::Staff(id) => entry.staff_id.as_str() == id,
    Identity::Department(id) => entry.department_id.as_str() == id,
  };

  identity && entry.day == filter.day && filter.period.map(|period| period == entry.period).unwrap_or(true)
}

/// A store holding its rows in memory. Every `entries` call is recorded along with the loading flag value
/// observed while it ran.
#[derive(Default)]
pub(crate) struct MemoryStore {
  pub(crate) departments: Vec<Department>,
  pub(crate) staff: Vec<Staff>,
  pub(crate) entries: Vec<TimetableEntry>,
  /// When set, every call fails like a dropped connection.
  pub(crate) offline: bool,
  /// When set, `entries` calls record `LoadingFlag::is_set`.
  pub(crate) loading: Option<LoadingFlag>,
  pub(crate) calls: Mutex<Vec<(EntryFilter, Cardinality)>>,
  pub(crate) observed_loading: Mutex<Vec<bool>>,
}

impl MemoryStore {
  pub(crate) fn with_entries(entries: Vec<TimetableEntry>) -> Self {
    Self {
      entries,
      ..Default::default()
    }
  }

  pub(crate) fn offline() -> Self {
    Self {
      offline: true,
      ..Default::default()
    }
  }

  pub(crate) fn call_count(&self) -> usize {
    self.calls.lock().map(|calls| calls.len()).unwrap_or_default()
  }

  pub(crate) fn last_call(&self) -> Option<(EntryFilter, Cardinality)> {
    self.calls.lock().ok().and_then(|calls| calls.last().cloned())
  }

  fn check_online(&self) -> StoreResult<()> {
    if self.offline {
      return Err(StoreError::Transport(anyhow::Error::msg("connection refused")));
    }
    Ok(())
  }
}

impl TimetableStore for MemoryStore {
  async fn departments(&self) -> StoreResult<Vec<Department>> {
    self.check_online()?;
    Ok(self.departments.clone())
  }

  async fn staff(&self) -> StoreResult<Vec<Staff>> {
    self.check_online()?;
    Ok(self.staff.clone())
  }

  async fn entries(&self, filter: &EntryFilter, cardinality: Cardinality) -> StoreResult<Vec<TimetableEntry>> {
    if let Ok(mut calls) = self.calls.lock() {
      calls.push((filter.clone(), cardinality));
    }

    if let (Some(flag), Ok(mut observed)) = (self.loading.as_ref(), self.observed_loading.lock()) {
      observed.push(flag.is_set());
    }

    self.check_online()?;

    let rows = self
      .entries
      .iter()
      .filter(|entry| matches_filter(filter, entry))
      .cloned()
      .collect::<Vec<TimetableEntry>>();

    if cardinality == Cardinality::One && rows.len() > 1 {
      return Err(StoreError::Cardinality(format!("The result contains {} rows", rows.len())));
    }

    Ok(rows)
  }
}

#[cfg(test)]
mod tests {
  use super::{entry, matches_filter};
  use crate::schema::Day;
  use crate::store::{EntryFilter, Identity};

  #[test]
  fn test_matches_filter() {
    let row = entry("s1", "cs", Day::Tuesday, 3);
    let filter = |identity: Identity, day: Day, period: Option<u8>| EntryFilter { identity, day, period };

    assert!(matches_filter(&filter(Identity::Staff("s1".into()), Day::Tuesday, None), &row));
    assert!(matches_filter(&filter(Identity::Department("cs".into()), Day::Tuesday, Some(3)), &row));
    assert!(!matches_filter(&filter(Identity::Staff("cs".into()), Day::Tuesday, None), &row));
    assert!(!matches_filter(&filter(Identity::Staff("s1".into()), Day::Monday, None), &row));
    assert!(!matches_filter(&filter(Identity::Staff("s1".into()), Day::Tuesday, Some(4)), &row));
  }
}
