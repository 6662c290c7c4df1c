use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::warn;

/// Server configuration, loaded from environment variables or defaults.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    port: u16,
    catalog_path: Option<PathBuf>,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 3000;

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let value = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let default_ip = IpAddr::from([0, 0, 0, 0]);
        let bind_ip = match value("BOXFIT_API_HOST") {
            Some(raw) => raw.parse::<IpAddr>().unwrap_or_else(|err| {
                warn!(
                    "Could not parse BOXFIT_API_HOST ('{}'): {}. Using {}.",
                    raw,
                    err,
                    Self::DEFAULT_HOST
                );
                default_ip
            }),
            None => default_ip,
        };

        let port = match value("BOXFIT_API_PORT") {
            Some(raw) => match raw.parse::<u16>() {
                Ok(port) if port != 0 => port,
                Ok(_) => {
                    warn!(
                        "BOXFIT_API_PORT must not be 0. Using {}.",
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    warn!(
                        "Could not parse BOXFIT_API_PORT ('{}'): {}. Using {}.",
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            port,
            catalog_path: value("BOXFIT_CATALOG").map(PathBuf::from),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Catalog file to load instead of the built-in catalog.
    pub fn catalog_path(&self) -> Option<&PathBuf> {
        self.catalog_path.as_ref()
    }
}
