use crate::reference::ReferenceData;
use crate::resolver::{QueryPolicy, SearchOutcome, SearchRequest};
use crate::store::PostgrestStore;
use std::sync::Arc;

/// The state shared by every request handler.
#[derive(Clone)]
pub struct Worker {
  pub(super) store: PostgrestStore,
  pub(super) policy: QueryPolicy,
  pub(super) reference: Arc<ReferenceData>,
}

impl Worker {
  /// Wraps already-loaded reference data.
  pub fn new(store: PostgrestStore, policy: QueryPolicy, reference: ReferenceData) -> Self {
    Worker {
      store,
      policy,
      reference: Arc::new(reference),
    }
  }

  /// Builds the store from configuration and loads the reference lists before any request is served.
  pub async fn from_configuration(config: &crate::config::Configuration) -> Self {
    let store = PostgrestStore::new(config.store.clone());
    let mut reference = ReferenceData::default();
    reference.load(&store).await;

    log::info!(
      "web worker ready with {} department(s), {} staff member(s), policy {:?}",
      reference.departments().len(),
      reference.staff().len(),
      config.resolver.policy
    );

    Self::new(store, config.resolver.policy, reference)
  }

  pub(super) async fn search(&self, request: &SearchRequest) -> SearchOutcome {
    crate::resolver::search(&self.store, self.policy, request).await
  }
}
