//! MySQL-driver style connection strings.
//!
//! Format: `user:password@tcp(host:port)/dbname?key=value&...`
//!
//! Parameters are written sorted by key with query-escaped values, so
//! the same inputs always give byte-identical output.

use std::collections::BTreeMap;

use url::form_urlencoded;
use zeroize::Zeroizing;

/// Parameter name the TLS profile is written under.
const TLS_PARAM: &str = "tls";

/// The parts of a connection string that rotation never changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DsnTemplate {
    pub database: String,
    pub params: BTreeMap<String, String>,
    pub tls_profile: Option<String>,
}

impl DsnTemplate {
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_params<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.params
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Name of a TLS configuration registered with the driver.
    pub fn with_tls_profile(mut self, profile: impl Into<String>) -> Self {
        self.tls_profile = Some(profile.into());
        self
    }

    /// Render a full connection string for the given credentials.
    pub fn render(&self, user: &str, password: &str, host: &str, port: u16) -> Zeroizing<String> {
        let mut dsn = Zeroizing::new(String::new());
        dsn.push_str(user);
        dsn.push(':');
        dsn.push_str(password);
        dsn.push_str("@tcp(");
        dsn.push_str(&join_host_port(host, port));
        dsn.push_str(")/");
        dsn.push_str(&self.database);

        let query = self.query();
        if !query.is_empty() {
            dsn.push('?');
            dsn.push_str(&query);
        }
        dsn
    }

    fn query(&self) -> String {
        let mut params: BTreeMap<&str, &str> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        if let Some(ref profile) = self.tls_profile {
            params.insert(TLS_PARAM, profile);
        }

        params
            .into_iter()
            .map(|(k, v)| {
                let escaped: String = form_urlencoded::byte_serialize(v.as_bytes()).collect();
                format!("{k}={escaped}")
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// `host:port`, bracketing IPv6 literals.
fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        format!("[{host}]:{port}")
    } else {
        format!("{host}:{port}")
    }
}

/// Extract the `host:port` part of a `...@tcp(host:port)/...` string.
pub fn address_of(dsn: &str) -> Option<&str> {
    let start = dsn.rfind("@tcp(")? + "@tcp(".len();
    let len = dsn[start..].find(')')?;
    Some(&dsn[start..start + len])
}
