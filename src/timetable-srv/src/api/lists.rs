/// Route: departments
///
/// Every department, as loaded when the server started.
pub async fn departments(request: tide::Request<super::worker::Worker>) -> tide::Result {
  let worker = request.state();
  tide::Body::from_json(&worker.reference.departments()).map(|body| tide::Response::builder(200).body(body).build())
}

/// Route: staff
///
/// Every staff member, as loaded when the server started.
pub async fn staff(request: tide::Request<super::worker::Worker>) -> tide::Result {
  let worker = request.state();
  tide::Body::from_json(&worker.reference.staff()).map(|body| tide::Response::builder(200).body(body).build())
}
