use crate::resolver::SearchRequest;

/// Route: search
///
/// Parses the selection out of the query string and runs it through the resolver. Every resolver path,
/// including store failures, is a 200 carrying the serialized outcome; only unparseable selections
/// (unknown day or mode, period outside `0..=8`) are rejected.
pub async fn find(request: tide::Request<super::worker::Worker>) -> tide::Result {
  let query = request.query::<SearchRequest>().map_err(|error| {
    log::warn!("invalid search query - {error}");
    tide::Error::from_str(422, "bad-query")
  })?;

  log::debug!("search request - {query:?}");

  let outcome = request.state().search(&query).await;
  tide::Body::from_json(&outcome).map(|body| tide::Response::builder(200).body(body).build())
}
