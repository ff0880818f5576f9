//! A single user's lookup session: the reference lists, what is currently selected, whether a search is in
//! flight, and the last result. One of these is created per interactive run and dropped with it.

use crate::reference::ReferenceData;
use crate::resolver::{self, QueryPolicy, SearchMode, SearchOutcome, SearchRequest};
use crate::schema::{Day, Department, PeriodSelector, Staff};
use crate::store::TimetableStore;
use std::sync::{
  atomic::{AtomicBool, Ordering},
  Arc,
};

/// Whether a search is in flight. Cloning shares the underlying flag, so something rendering the search
/// control can hold on to one.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag {
  #[allow(clippy::missing_docs_in_private_items)]
  raised: Arc<AtomicBool>,
  /// Every value the flag was set to, oldest first.
  #[cfg(test)]
  transitions: Arc<std::sync::Mutex<Vec<bool>>>,
}

impl LoadingFlag {
  /// True between the start of a search and the assignment of its result.
  pub fn is_set(&self) -> bool {
    self.raised.load(Ordering::SeqCst)
  }

  #[allow(clippy::missing_docs_in_private_items)]
  fn set(&self, value: bool) {
    self.raised.store(value, Ordering::SeqCst);
    self.record(value);
  }

  #[cfg(test)]
  fn record(&self, value: bool) {
    if let Ok(mut transitions) = self.transitions.lock() {
      transitions.push(value);
    }
  }

  #[cfg(not(test))]
  fn record(&self, _value: bool) {}

  /// Raises the flag until the returned guard is dropped.
  fn begin(&self) -> LoadingGuard {
    self.set(true);
    LoadingGuard(self.clone())
  }

  #[cfg(test)]
  pub(crate) fn transitions(&self) -> Vec<bool> {
    self.transitions.lock().map(|transitions| transitions.clone()).unwrap_or_default()
  }
}

/// Lowers the loading flag when dropped, whichever way the search ended.
struct LoadingGuard(LoadingFlag);

impl Drop for LoadingGuard {
  fn drop(&mut self) {
    self.0.set(false);
  }
}

/// The user's current choices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
  #[allow(clippy::missing_docs_in_private_items)]
  pub mode: SearchMode,
  #[allow(clippy::missing_docs_in_private_items)]
  pub day: Day,
  #[allow(clippy::missing_docs_in_private_items)]
  pub period: PeriodSelector,
  #[allow(clippy::missing_docs_in_private_items)]
  pub staff_id: Option<String>,
  #[allow(clippy::missing_docs_in_private_items)]
  pub department_id: Option<String>,
}

impl Selection {
  /// The request the resolver should run for this selection.
  pub fn request(&self) -> SearchRequest {
    SearchRequest {
      mode: self.mode,
      day: self.day,
      period: self.period,
      staff_id: self.staff_id.clone(),
      department_id: self.department_id.clone(),
    }
  }
}

/// Owns everything session-scoped.
pub struct Session<S> {
  #[allow(clippy::missing_docs_in_private_items)]
  store: S,
  #[allow(clippy::missing_docs_in_private_items)]
  policy: QueryPolicy,
  #[allow(clippy::missing_docs_in_private_items)]
  reference: ReferenceData,
  #[allow(clippy::missing_docs_in_private_items)]
  selection: Selection,
  #[allow(clippy::missing_docs_in_private_items)]
  loading: LoadingFlag,
  /// The last write wins.
  result: Option<SearchOutcome>,
}

impl<S> Session<S>
where
  S: TimetableStore,
{
  /// Creates an empty session. Nothing is fetched until `initialize`.
  pub fn new(store: S, policy: QueryPolicy) -> Self {
    Self {
      store,
      policy,
      reference: ReferenceData::default(),
      selection: Selection::default(),
      loading: LoadingFlag::default(),
      result: None,
    }
  }

  /// Loads the departments + staff used for selection.
  pub async fn initialize(&mut self) {
    self.reference.load(&self.store).await;
  }

  #[allow(clippy::missing_docs_in_private_items)]
  pub fn reference(&self) -> &ReferenceData {
    &self.reference
  }

  #[allow(clippy::missing_docs_in_private_items)]
  pub fn departments(&self) -> &[Department] {
    self.reference.departments()
  }

  #[allow(clippy::missing_docs_in_private_items)]
  pub fn staff(&self) -> &[Staff] {
    self.reference.staff()
  }

  #[allow(clippy::missing_docs_in_private_items)]
  pub fn selection(&self) -> &Selection {
    &self.selection
  }

  /// Switching modes keeps every other choice.
  pub fn set_mode(&mut self, mode: SearchMode) {
    self.selection.mode = mode;
  }

  #[allow(clippy::missing_docs_in_private_items)]
  pub fn set_day(&mut self, day: Day) {
    self.selection.day = day;
  }

  #[allow(clippy::missing_docs_in_private_items)]
  pub fn set_period(&mut self, period: PeriodSelector) {
    self.selection.period = period;
  }

  /// `None` clears the choice.
  pub fn select_staff(&mut self, staff_id: Option<String>) {
    self.selection.staff_id = staff_id;
  }

  /// `None` clears the choice.
  pub fn select_department(&mut self, department_id: Option<String>) {
    self.selection.department_id = department_id;
  }

  /// A shared handle on the loading flag.
  pub fn loading(&self) -> LoadingFlag {
    self.loading.clone()
  }

  #[allow(clippy::missing_docs_in_private_items)]
  pub fn is_loading(&self) -> bool {
    self.loading.is_set()
  }

  /// The outcome of the most recent search, if any ran.
  pub fn result(&self) -> Option<&SearchOutcome> {
    self.result.as_ref()
  }

  /// Runs the current selection through the resolver and stores the outcome. The loading flag is raised
  /// for the whole call, validation failures included, and lowered once the outcome is assigned.
  pub async fn search(&mut self) -> &SearchOutcome {
    let _searching = self.loading.begin();
    let request = self.selection.request();
    log::info!("searching {} timetable for {} ({})", request.mode, request.day, request.period);
    let outcome = resolver::search(&self.store, self.policy, &request).await;
    self.result.insert(outcome)
  }
}
