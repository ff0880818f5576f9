use serde::Deserialize;
use std::io;

/// Where the web binary listens when nothing else was configured.
pub const DEFAULT_WEB_ADDR: &str = "0.0.0.0:8337";

/// The names of the three tables we read. These only need to be configured when a project renamed them.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct StoreTablesConfiguration {
  pub(crate) departments: String,
  pub(crate) staff: String,
  pub(crate) timetable_entries: String,
}

impl Default for StoreTablesConfiguration {
  fn default() -> Self {
    StoreTablesConfiguration {
      departments: "departments".into(),
      staff: "staff".into(),
      timetable_entries: "timetable_entries".into(),
    }
  }
}

/// Connection details for the hosted (PostgREST) store.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct StoreConfiguration {
  /// The project url, e.g `https://abcdefg.supabase.co`.
  pub(crate) url: String,
  /// The anonymous (read-only) api key.
  pub(crate) api_key: String,
  /// Sent as `Accept-Profile` when the tables live outside of the default schema.
  #[serde(default)]
  pub(crate) schema: Option<String>,
  /// When absent, requests wait on the store indefinitely.
  #[serde(default)]
  pub(crate) timeout_seconds: Option<u64>,
  #[serde(default)]
  pub(crate) tables: StoreTablesConfiguration,
}

impl StoreConfiguration {
  /// Builds a configuration for the default table names.
  pub fn new<U, K>(url: U, api_key: K) -> Self
  where
    U: Into<String>,
    K: Into<String>,
  {
    StoreConfiguration {
      url: url.into(),
      api_key: api_key.into(),
      schema: None,
      timeout_seconds: None,
      tables: StoreTablesConfiguration::default(),
    }
  }
}

#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "snake_case")]
pub struct ResolverConfiguration {
  #[serde(default)]
  pub(crate) policy: crate::resolver::QueryPolicy,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct WebConfiguration {
  pub(crate) addr: String,
}

impl Default for WebConfiguration {
  fn default() -> Self {
    WebConfiguration {
      addr: DEFAULT_WEB_ADDR.into(),
    }
  }
}

/// The publicly deserializable configuration shared by both binaries.
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "snake_case")]
pub struct Configuration {
  /// The store configuration.
  pub store: StoreConfiguration,
  /// Which query policy searches use.
  #[serde(default)]
  pub resolver: ResolverConfiguration,
  /// Only used by the web binary.
  #[serde(default)]
  pub web: WebConfiguration,
}

impl Configuration {
  /// Parses the toml contents of a configuration file.
  pub fn from_toml<S>(contents: S) -> io::Result<Self>
  where
    S: AsRef<str>,
  {
    toml::from_str::<Self>(contents.as_ref()).map_err(|error| {
      log::warn!("invalid toml config file - {error}");
      io::Error::new(io::ErrorKind::Other, "bad-config")
    })
  }

  /// Reads the configuration file at `path` and applies any environment overrides on top of it. If the
  /// file does not exist, the environment alone must provide the store url and key.
  pub async fn load<P>(path: P) -> io::Result<Self>
  where
    P: AsRef<std::path::Path>,
  {
    let path = async_std::path::PathBuf::from(path.as_ref().to_path_buf());

    let mut config = match async_std::fs::read_to_string(&path).await {
      Ok(contents) => Self::from_toml(contents)?,
      Err(error) if error.kind() == io::ErrorKind::NotFound => {
        log::info!("no config file at '{path:?}', using environment only");
        Self::from_environment()?
      }
      Err(error) => return Err(error),
    };

    config.apply_environment();
    Ok(config)
  }

  /// Builds a configuration from `TIMETABLE_STORE_URL` + `TIMETABLE_STORE_KEY`.
  fn from_environment() -> io::Result<Self> {
    let (url, key) = std::env::var("TIMETABLE_STORE_URL")
      .ok()
      .zip(std::env::var("TIMETABLE_STORE_KEY").ok())
      .ok_or_else(|| {
        io::Error::new(
          io::ErrorKind::NotFound,
          "missing config file and TIMETABLE_STORE_URL/TIMETABLE_STORE_KEY",
        )
      })?;

    Ok(Configuration {
      store: StoreConfiguration::new(url, key),
      resolver: ResolverConfiguration::default(),
      web: WebConfiguration::default(),
    })
  }

  /// Environment variables win over whatever was in the file.
  fn apply_environment(&mut self) {
    if let Ok(url) = std::env::var("TIMETABLE_STORE_URL") {
      self.store.url = url;
    }

    if let Ok(key) = std::env::var("TIMETABLE_STORE_KEY") {
      self.store.api_key = key;
    }

    if let Ok(addr) = std::env::var("TIMETABLE_WEB_ADDR") {
      self.web.addr = addr;
    }
  }

  /// The query policy searches should use.
  pub fn policy(&self) -> crate::resolver::QueryPolicy {
    self.resolver.policy
  }

  /// The address the web binary should listen on.
  pub fn web_addr(&self) -> &str {
    self.web.addr.as_str()
  }
}

#[cfg(test)]
mod tests {
  use super::{Configuration, DEFAULT_WEB_ADDR};
  use crate::resolver::QueryPolicy;

  #[test]
  fn test_minimal_config() {
    let config = Configuration::from_toml(
      r#"
      [store]
      url = "https://example.supabase.co"
      api_key = "anon"
      "#,
    )
    .expect("failed parse");

    assert_eq!(config.store.url, "https://example.supabase.co");
    assert_eq!(config.store.tables.timetable_entries, "timetable_entries");
    assert_eq!(config.store.timeout_seconds, None);
    assert_eq!(config.resolver.policy, QueryPolicy::AllPeriods);
    assert_eq!(config.web_addr(), DEFAULT_WEB_ADDR);
  }

  #[test]
  fn test_full_config() {
    let config = Configuration::from_toml(
      r#"
      [store]
      url = "https://example.supabase.co"
      api_key = "anon"
      schema = "timetable"
      timeout_seconds = 4

      [store.tables]
      departments = "depts"
      staff = "faculty"
      timetable_entries = "slots"

      [resolver]
      policy = "single_period"

      [web]
      addr = "127.0.0.1:9000"
      "#,
    )
    .expect("failed parse");

    assert_eq!(config.store.schema.as_deref(), Some("timetable"));
    assert_eq!(config.store.timeout_seconds, Some(4));
    assert_eq!(config.store.tables.staff, "faculty");
    assert_eq!(config.resolver.policy, QueryPolicy::SinglePeriod);
    assert_eq!(config.web_addr(), "127.0.0.1:9000");
  }

  #[test]
  fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("timetable-config-{}.toml", std::process::id()));
    std::fs::write(
      &path,
      "[store]\nurl = \"https://file.supabase.co\"\napi_key = \"anon\"\n\n[resolver]\npolicy = \"single_period\"\n",
    )
    .expect("unable to write config");

    let config = async_std::task::block_on(Configuration::load(&path));
    std::fs::remove_file(&path).ok();

    let config = config.expect("failed load");
    assert_eq!(config.policy(), QueryPolicy::SinglePeriod);
    assert!(!config.store.api_key.is_empty());
  }

  #[test]
  fn test_missing_store() {
    assert!(Configuration::from_toml("[web]\naddr = \"0.0.0.0:1\"").is_err());
  }
}
