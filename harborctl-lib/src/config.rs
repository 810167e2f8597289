use std::collections::BTreeMap;

use harborctl_api_lib::auth::RegistryAuth;
use serde::{Deserialize, Serialize};

/// The CLI's own configuration file: stored credentials per server and
/// a pointer to the one in use.
#[derive(Default, Clone, Debug)]
pub struct CliConfig {
    current: Option<String>,
    servers: BTreeMap<String, RegistryAuth>,
}

#[derive(Serialize, Deserialize)]
struct RawConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    current: Option<String>,

    #[serde(default)]
    servers: BTreeMap<String, RegistryAuth>,
}

impl<'de> Deserialize<'de> for CliConfig {
    fn deserialize<D>(deserializer: D) -> Result<CliConfig, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawConfig::deserialize(deserializer)?;

        let servers = raw
            .servers
            .into_iter()
            .map(|(server, auth)| (normalize_server(&server), auth))
            .collect();

        Ok(CliConfig {
            current: raw.current.as_deref().map(normalize_server),
            servers,
        })
    }
}

impl Serialize for CliConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        RawConfig {
            current: self.current.clone(),
            servers: self.servers.clone(),
        }
        .serialize(serializer)
    }
}

/// Trailing slashes are insignificant and a bare host means https.
pub fn normalize_server(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');

    if server.contains("://") {
        server.to_string()
    } else {
        format!("https://{server}")
    }
}

impl CliConfig {
    pub fn add_server(&mut self, server: &str, auth: RegistryAuth) {
        let server = normalize_server(server);
        self.servers.insert(server.clone(), auth);
        self.current = Some(server);
    }

    pub fn remove_server(&mut self, server: &str) -> bool {
        let server = normalize_server(server);
        if self.current.as_deref() == Some(server.as_str()) {
            self.current = None;
        }
        self.servers.remove(&server).is_some()
    }

    pub fn auth_for(&self, server: &str) -> Option<&RegistryAuth> {
        self.servers.get(&normalize_server(server))
    }

    pub fn current_server(&self) -> Option<(&str, &RegistryAuth)> {
        let server = self.current.as_deref()?;
        let auth = self.servers.get(server)?;
        Some((server, auth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn servers_are_normalized_on_load() {
        let raw = r#"{
            "current": "harbor.example.com/",
            "servers": {
                "harbor.example.com/": {
                    "type": "basic",
                    "username": "admin",
                    "password": "Harbor12345"
                }
            }
        }"#;

        let config: CliConfig = serde_json::from_str(raw).unwrap();
        let (server, auth) = config.current_server().unwrap();

        assert_eq!(server, "https://harbor.example.com");
        assert_eq!(auth.username(), Some("admin"));
        assert!(
            config
                .auth_for("https://harbor.example.com/")
                .is_some()
        );
    }

    #[test]
    fn removing_the_current_server_clears_the_pointer() {
        let mut config = CliConfig::default();
        config.add_server(
            "https://harbor.example.com",
            RegistryAuth::basic("admin", "secret"),
        );

        assert!(config.current_server().is_some());
        assert!(config.remove_server("harbor.example.com"));
        assert!(config.current_server().is_none());
        assert!(!config.remove_server("harbor.example.com"));
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = CliConfig::default();
        config.add_server(
            "https://harbor.example.com",
            RegistryAuth::basic("admin", "secret"),
        );

        let raw = serde_json::to_string(&config).unwrap();
        let reloaded: CliConfig = serde_json::from_str(&raw).unwrap();

        assert_eq!(
            reloaded.current_server().map(|(server, _)| server),
            Some("https://harbor.example.com")
        );
    }
}
