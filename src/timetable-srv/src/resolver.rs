//! Turns a (mode, identity, day, period) selection into exactly one store query, and the store's answer
//! into a `SearchOutcome`. Nothing in here fails; every path ends in an outcome the caller can render.

use crate::schema::{Day, PeriodSelector, TimetableEntry};
use crate::store::{Cardinality, EntryFilter, Identity, TimetableStore};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Shown when a staff search is attempted without choosing someone.
pub const MISSING_STAFF: &str = "Please select a staff member";

/// Shown when a department search is attempted without choosing one.
pub const MISSING_DEPARTMENT: &str = "Please select a department";

/// A staff member has nothing scheduled in the requested period.
pub const FREE_PERIOD: &str = "Free Period";

/// A staff member has nothing scheduled all day.
pub const NO_STAFF_SCHEDULE: &str = "No Schedule for this day";

/// A department has nothing scheduled in the requested period.
pub const NO_CLASS_ASSIGNED: &str = "No Class Assigned";

/// A department has nothing scheduled all day.
pub const NO_DEPARTMENT_CLASSES: &str = "No Classes for this day";

/// The only thing users see when the store misbehaves; the cause goes to the logs.
pub const SEARCH_FAILED: &str = "Error occurred while searching";

/// The period searched by the single period policy when none was chosen.
const SINGLE_PERIOD_FALLBACK: u8 = 1;

/// The two lookup axes.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
  /// Look up what a staff member teaches.
  #[default]
  Staff,
  /// Look up what a department is taught. Older clients call this "student".
  #[serde(alias = "student")]
  Department,
}

impl FromStr for SearchMode {
  type Err = String;

  fn from_str(input: &str) -> Result<Self, Self::Err> {
    match input.trim().to_ascii_lowercase().as_str() {
      "staff" => Ok(SearchMode::Staff),
      "department" | "student" => Ok(SearchMode::Department),
      other => Err(format!("unknown search mode '{other}'")),
    }
  }
}

impl fmt::Display for SearchMode {
  fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
    match self {
      SearchMode::Staff => write!(formatter, "staff"),
      SearchMode::Department => write!(formatter, "department"),
    }
  }
}

/// How queries are shaped. A resolver uses exactly one of these; they are never mixed.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum QueryPolicy {
  /// Period is optional. Without one, every entry of the day is returned sorted by period.
  #[default]
  AllPeriods,
  /// Period is mandatory (defaulting to the first). Department lookups must match at most one row.
  SinglePeriod,
}

/// Everything a search needs from the current selection.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchRequest {
  /// Which identity is used.
  pub mode: SearchMode,
  /// The day to look at.
  #[serde(default)]
  pub day: Day,
  /// The period(s) to look at.
  #[serde(default)]
  pub period: PeriodSelector,
  /// Required in staff mode.
  #[serde(default)]
  pub staff_id: Option<String>,
  /// Required in department mode.
  #[serde(default)]
  pub department_id: Option<String>,
}

impl SearchRequest {
  /// The identity for the current mode. Absent or empty ids count as missing; the error is the message to
  /// show.
  fn identity(&self) -> Result<Identity, &'static str> {
    let chosen = |id: &Option<String>| id.as_ref().filter(|id| !id.is_empty()).cloned();

    match self.mode {
      SearchMode::Staff => chosen(&self.staff_id).map(Identity::Staff).ok_or(MISSING_STAFF),
      SearchMode::Department => chosen(&self.department_id)
        .map(Identity::Department)
        .ok_or(MISSING_DEPARTMENT),
    }
  }
}

/// The result of a search. Renderers are expected to match on every variant.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "timetable:kind", content = "timetable:content")]
pub enum SearchOutcome {
  /// The entries found, in display order.
  Entries(Vec<TimetableEntry>),
  /// The query ran and matched nothing.
  Empty(String),
  /// The query was never sent because the selection is incomplete.
  Invalid(String),
  /// The query failed.
  Failed(String),
}

impl SearchOutcome {
  /// The message of every non-entries outcome.
  pub fn message(&self) -> Option<&str> {
    match self {
      SearchOutcome::Entries(_) => None,
      SearchOutcome::Empty(message) | SearchOutcome::Invalid(message) | SearchOutcome::Failed(message) => {
        Some(message.as_str())
      }
    }
  }
}

/// The single query a request turns into, plus what is needed to interpret its rows.
#[derive(Debug, PartialEq, Eq)]
struct QueryPlan {
  #[allow(clippy::missing_docs_in_private_items)]
  filter: EntryFilter,
  #[allow(clippy::missing_docs_in_private_items)]
  cardinality: Cardinality,
  /// Rows come back sorted ascending by period.
  sort: bool,
}

impl QueryPlan {
  #[allow(clippy::missing_docs_in_private_items)]
  fn new(policy: QueryPolicy, identity: Identity, day: Day, period: PeriodSelector) -> Self {
    match policy {
      QueryPolicy::AllPeriods => QueryPlan {
        filter: EntryFilter {
          identity,
          day,
          period: period.period(),
        },
        cardinality: Cardinality::Many,
        sort: period.period().is_none(),
      },
      QueryPolicy::SinglePeriod => {
        let cardinality = match identity {
          Identity::Staff(_) => Cardinality::Many,
          Identity::Department(_) => Cardinality::One,
        };

        QueryPlan {
          filter: EntryFilter {
            identity,
            day,
            period: Some(period.period().unwrap_or(SINGLE_PERIOD_FALLBACK)),
          },
          cardinality,
          sort: false,
        }
      }
    }
  }

  /// Maps the rows returned for this plan onto an outcome.
  fn outcome(&self, mut rows: Vec<TimetableEntry>) -> SearchOutcome {
    if rows.is_empty() {
      let message = match (&self.filter.identity, self.filter.period.is_some()) {
        (Identity::Staff(_), true) => FREE_PERIOD,
        (Identity::Staff(_), false) => NO_STAFF_SCHEDULE,
        (Identity::Department(_), true) => NO_CLASS_ASSIGNED,
        (Identity::Department(_), false) => NO_DEPARTMENT_CLASSES,
      };

      return SearchOutcome::Empty(message.to_string());
    }

    if self.sort {
      rows.sort_by_key(|entry| entry.period);
    }

    SearchOutcome::Entries(rows)
  }
}

/// Runs a single search against the store.
pub async fn search<S>(store: &S, policy: QueryPolicy, request: &SearchRequest) -> SearchOutcome
where
  S: TimetableStore,
{
  let identity = match request.identity() {
    Ok(identity) => identity,
    Err(message) => {
      log::debug!("incomplete {} search - {message}", request.mode);
      return SearchOutcome::Invalid(message.to_string());
    }
  };

  let plan = QueryPlan::new(policy, identity, request.day, request.period);

  match store.entries(&plan.filter, plan.cardinality).await {
    Ok(rows) => {
      log::debug!("store returned {} row(s) for {:?}", rows.len(), plan.filter);
      plan.outcome(rows)
    }
    Err(error) => {
      log::error!("timetable search failed - {error}");
      SearchOutcome::Failed(SEARCH_FAILED.to_string())
    }
  }
}
