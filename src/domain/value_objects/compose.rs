//! Compose project value object

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{IndirectorError, IndirectorResult};

/// File names `docker compose` looks for, in its own lookup order
pub const COMPOSE_FILE_NAMES: [&str; 4] = [
    "compose.yaml",
    "compose.yml",
    "docker-compose.yml",
    "docker-compose.yaml",
];

#[derive(Debug, Default, Deserialize)]
struct ComposeFile {
    /// `services: ~` is an empty stack, as for `docker compose`
    #[serde(default)]
    services: Option<BTreeMap<String, Option<ServiceDef>>>,
}

#[derive(Debug, Default, Deserialize)]
struct ServiceDef {
    #[serde(default)]
    container_name: Option<String>,
}

/// One service entry from the Compose file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeService {
    pub name: String,
    pub container_name: Option<String>,
}

/// The services a Compose file declares
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    pub file: PathBuf,
    pub services: Vec<ComposeService>,
}

impl ComposeProject {
    /// Parse Compose YAML. Only service names and container names are read.
    pub fn parse(file: &Path, content: &str) -> IndirectorResult<Self> {
        let parsed: ComposeFile = if content.trim().is_empty() {
            ComposeFile::default()
        } else {
            serde_yaml_ng::from_str(content).map_err(|e| IndirectorError::InvalidComposeFile {
                file: file.to_path_buf(),
                message: e.to_string(),
            })?
        };

        let services = parsed
            .services
            .unwrap_or_default()
            .into_iter()
            .map(|(name, def)| ComposeService {
                name,
                container_name: def.and_then(|d| d.container_name),
            })
            .collect();

        Ok(Self {
            file: file.to_path_buf(),
            services,
        })
    }

    pub fn service_names(&self) -> Vec<&str> {
        self.services.iter().map(|s| s.name.as_str()).collect()
    }

    /// True if a service would run under this container name
    pub fn provides_container(&self, container: &str) -> bool {
        self.services.iter().any(|s| match &s.container_name {
            Some(name) => name == container,
            None => s.name == container,
        })
    }
}
