//! Process configuration. The only knob is the listening port.

use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT value {0:?}")]
    InvalidPort(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], DEFAULT_PORT)),
        }
    }
}

impl ServerConfig {
    /// Read `PORT` from the environment; unset means the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_port_var(std::env::var("PORT").ok().as_deref())
    }

    fn from_port_var(port: Option<&str>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = port {
            let port: u16 = raw
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidPort(raw.to_string()))?;
            config.bind_addr.set_port(port);
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = ServerConfig::default();
        assert_eq!(c.bind_addr, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn unset_port_keeps_default() {
        assert_eq!(ServerConfig::from_port_var(None), Ok(ServerConfig::default()));
    }

    #[test]
    fn port_override() {
        let c = ServerConfig::from_port_var(Some("9000")).unwrap();
        assert_eq!(c.bind_addr.port(), 9000);
    }

    #[test]
    fn bad_port_is_an_error() {
        assert_eq!(
            ServerConfig::from_port_var(Some("eighty")),
            Err(ConfigError::InvalidPort("eighty".into()))
        );
        assert!(ServerConfig::from_port_var(Some("70000")).is_err());
    }
}
