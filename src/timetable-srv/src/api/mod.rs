//! The json api served by `timetable-web`. Reference lists are loaded once when the worker is built;
//! every search goes to the store.

use serde::Serialize;

mod lists;
mod search;
mod worker;

pub use worker::Worker;

#[derive(Serialize, Debug)]
struct HeartbeatPayload {
  version: String,
  timestamp: chrono::DateTime<chrono::Utc>,
}

impl Default for HeartbeatPayload {
  fn default() -> Self {
    HeartbeatPayload {
      version: option_env!("TIMETABLE_VERSION").unwrap_or("dev").into(),
      timestamp: chrono::Utc::now(),
    }
  }
}

async fn heartbeat<T>(_request: tide::Request<T>) -> tide::Result {
  Ok(
    tide::Response::builder(200)
      .body(tide::Body::from_json(&HeartbeatPayload::default())?)
      .build(),
  )
}

async fn missing(_request: tide::Request<worker::Worker>) -> tide::Result {
  log::debug!("not-found");
  Ok(tide::Response::builder(404).build())
}

pub fn new(worker: worker::Worker) -> tide::Server<worker::Worker> {
  let mut app = tide::with_state(worker);

  app.at("/departments").get(lists::departments);
  app.at("/staff").get(lists::staff);
  app.at("/search").get(search::find);

  app.at("/status").get(heartbeat);
  app.at("/*").all(missing);
  app.at("/").all(missing);

  app
}
