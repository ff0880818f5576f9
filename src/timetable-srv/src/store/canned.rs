use std::sync::{Arc, Mutex};

/// What a canned server saw of a single request.
#[derive(Debug, Clone, Default)]
pub(crate) struct SeenRequest {
  pub(crate) path: String,
  pub(crate) query: String,
  pub(crate) accept: Option<String>,
  pub(crate) api_key: Option<String>,
}

/// A local http server answering every `/rest/v1/*` request with the same status + body.
pub(crate) struct CannedServer {
  pub(crate) url: String,
  pub(crate) seen: Arc<Mutex<Vec<SeenRequest>>>,
}

impl CannedServer {
  /// Binds an ephemeral port and starts serving in the background. The listener is bound before this
  /// returns, so requests made right away are queued rather than refused.
  pub(crate) fn start(status: u16, body: &str) -> std::io::Result<Self> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let url = format!("http://{}", listener.local_addr()?);
    let seen = Arc::new(Mutex::new(Vec::new()));

    let mut app = tide::new();
    let body = body.to_string();
    let recorder = seen.clone();

    app.at("/rest/v1/*").get(move |request: tide::Request<()>| {
      let body = body.clone();
      let recorder = recorder.clone();

      async move {
        let header = |name: &str| request.header(name).map(|values| values.as_str().to_string());
        let observed = SeenRequest {
          path: request.url().path().to_string(),
          query: request.url().query().unwrap_or_default().to_string(),
          accept: header("Accept"),
          api_key: header("apikey"),
        };

        if let Ok(mut seen) = recorder.lock() {
          seen.push(observed);
        }

        Ok(
          tide::Response::builder(status)
            .content_type(tide::http::mime::JSON)
            .body(body)
            .build(),
        )
      }
    });

    async_std::task::spawn(async move {
      if let Err(error) = app.listen(listener).await {
        log::warn!("canned server stopped - {error}");
      }
    });

    Ok(Self { url, seen })
  }

  pub(crate) fn last_seen(&self) -> Option<SeenRequest> {
    self.seen.lock().ok().and_then(|seen| seen.last().cloned())
  }
}
