use super::{Cardinality, EntryFilter, StoreError, StoreResult, TimetableStore};
use crate::schema::{Department, Staff, TimetableEntry};
use anyhow::Context;
use serde::{de::DeserializeOwned, Deserialize};
use std::io;

/// The embedded resources requested alongside every timetable row; the store resolves each foreign key
/// into a `{"name": ...}` object.
const TIMETABLE_SELECT: &str = "*,staff:staff_id(name),subject:subject_id(name),department:department_id(name)";

/// Asking for this media type makes PostgREST respond with a single object, or a 406 when the filter did
/// not match exactly one row.
const SINGLE_OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

/// The schema of PostgREST error bodies.
#[derive(Deserialize, Debug, Default)]
struct PostgrestErrorBody {
  #[allow(clippy::missing_docs_in_private_items)]
  code: Option<String>,
  #[allow(clippy::missing_docs_in_private_items)]
  message: Option<String>,
  /// For cardinality failures this reads like "The result contains 2 rows".
  details: Option<String>,
}

/// What came back from a successful request, before decoding.
#[derive(Debug, PartialEq)]
enum FetchedBody {
  /// A json array of rows.
  Rows(String),
  /// A single json object.
  Object(String),
  /// A single object was requested and the filter matched nothing.
  Nothing,
}

/// A `TimetableStore` backed by a hosted PostgREST api (e.g supabase).
#[derive(Debug, Clone)]
pub struct PostgrestStore {
  /// Connection details + table names.
  config: crate::config::StoreConfiguration,
}

impl PostgrestStore {
  /// Wraps the configuration; no connection is made until the first request.
  pub fn new(config: crate::config::StoreConfiguration) -> Self {
    Self { config }
  }

  /// The rest endpoint of a table, with its `select` already applied.
  fn table_url(&self, table: &str, select: &str) -> anyhow::Result<url::Url> {
    let base = self.config.url.trim_end_matches('/');
    let mut uri = url::Url::parse(format!("{base}/rest/v1/{table}").as_str())
      .with_context(|| format!("invalid store url '{}'", self.config.url))?;

    uri.query_pairs_mut().append_pair("select", select);
    Ok(uri)
  }

  /// The endpoint + query string of a filtered timetable lookup.
  fn entries_url(&self, filter: &EntryFilter) -> anyhow::Result<url::Url> {
    let mut uri = self.table_url(&self.config.tables.timetable_entries, TIMETABLE_SELECT)?;

    {
      let mut query = uri.query_pairs_mut();
      query.append_pair(filter.identity.column(), format!("eq.{}", filter.identity.value()).as_str());
      query.append_pair("day", format!("eq.{}", filter.day).as_str());

      if let Some(period) = filter.period {
        query.append_pair("period", format!("eq.{period}").as_str());
      }
    }

    Ok(uri)
  }

  /// Sends the request and sorts the response into something decodable.
  async fn fetch(&self, uri: &url::Url, cardinality: Cardinality) -> StoreResult<FetchedBody> {
    log::trace!("fetching '{uri}' ({cardinality:?})");

    let mut request = surf::get(uri.as_str())
      .header("apikey", self.config.api_key.as_str())
      .header("Authorization", format!("Bearer {}", self.config.api_key));

    if let Some(schema) = self.config.schema.as_ref() {
      request = request.header("Accept-Profile", schema.as_str());
    }

    if cardinality == Cardinality::One {
      request = request.header("Accept", SINGLE_OBJECT_MEDIA_TYPE);
    }

    let response = match self.config.timeout_seconds {
      Some(seconds) => async_std::future::timeout(std::time::Duration::from_secs(seconds), request)
        .await
        .map_err(|error| io::Error::new(io::ErrorKind::TimedOut, error.to_string()))
        .with_context(|| format!("no response after {seconds} second(s)"))?,
      None => request.await,
    };

    let mut response = response
      .map_err(|error| io::Error::new(io::ErrorKind::Other, error.to_string()))
      .with_context(|| format!("cannot fetch '{}'", uri.path()))?;

    let status = response.status();
    let body = response
      .body_string()
      .await
      .map_err(|error| io::Error::new(io::ErrorKind::Other, error.to_string()))
      .with_context(|| "unable to read store response body")?;

    log::trace!("status: '{status}'");
    log::trace!("body:   '{body}'");

    if status.is_success() {
      return Ok(match cardinality {
        Cardinality::Many => FetchedBody::Rows(body),
        Cardinality::One => FetchedBody::Object(body),
      });
    }

    if cardinality == Cardinality::One && status == surf::StatusCode::NotAcceptable {
      return classify_single_row_failure(&body);
    }

    log::warn!("bad response from store - '{status}'");
    Err(StoreError::Status(status.into(), body))
  }

  /// Fetches and decodes rows of `T`.
  async fn rows<T>(&self, uri: url::Url, cardinality: Cardinality) -> StoreResult<Vec<T>>
  where
    T: DeserializeOwned,
  {
    match self.fetch(&uri, cardinality).await? {
      FetchedBody::Rows(body) => {
        serde_json::from_str::<Vec<T>>(&body).map_err(|error| StoreError::Decode(error.to_string()))
      }
      FetchedBody::Object(body) => serde_json::from_str::<T>(&body)
        .map(|row| vec![row])
        .map_err(|error| StoreError::Decode(error.to_string())),
      FetchedBody::Nothing => Ok(Vec::new()),
    }
  }
}

/// A 406 on a single-object request means the filter matched zero or several rows. Zero is an empty
/// result; several is a violation of the one-row-per-slot assumption.
fn classify_single_row_failure(body: &str) -> StoreResult<FetchedBody> {
  let parsed = serde_json::from_str::<PostgrestErrorBody>(body).map_err(|error| {
    log::warn!("unrecognized 406 body from store - '{body}'");
    StoreError::Decode(error.to_string())
  })?;

  let details = parsed.details.unwrap_or_default();

  if details.contains(" 0 rows") {
    log::debug!("single row request matched nothing");
    return Ok(FetchedBody::Nothing);
  }

  log::warn!(
    "single row request failed ({}) - {}",
    parsed.code.as_deref().unwrap_or("unknown"),
    parsed.message.as_deref().unwrap_or_default()
  );

  Err(StoreError::Cardinality(details))
}

impl TimetableStore for PostgrestStore {
  async fn departments(&self) -> StoreResult<Vec<Department>> {
    let uri = self.table_url(&self.config.tables.departments, "*")?;
    self.rows(uri, Cardinality::Many).await
  }

  async fn staff(&self) -> StoreResult<Vec<Staff>> {
    let uri = self.table_url(&self.config.tables.staff, "*")?;
    self.rows(uri, Cardinality::Many).await
  }

  async fn entries(&self, filter: &EntryFilter, cardinality: Cardinality) -> StoreResult<Vec<TimetableEntry>> {
    let uri = self.entries_url(filter)?;
    log::debug!("querying timetable entries - {filter:?} ({cardinality:?})");
    self.rows(uri, cardinality).await
  }
}
