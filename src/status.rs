use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{to_string, Map, Value};

use crate::mode::Mode;

/// Presence message on the online topic, also used as the last will.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct OnlineStatus {
    pub ip: String,
    pub online: bool,
}

impl OnlineStatus {
    pub fn new(ip: &str, online: bool) -> OnlineStatus {
        OnlineStatus {
            ip: ip.to_string(),
            online,
        }
    }

    pub fn to_message(&self) -> Result<Vec<u8>> {
        Ok(to_string(self)?.into_bytes())
    }
}

/// Firmware build metadata published on the info topic.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct BuildInfo {
    pub sha: String,
    pub repo: String,
}

impl BuildInfo {
    /// Revision and origin recorded by the build script: the short commit
    /// sha (`unknown` outside a git checkout) and the `origin` remote, falling
    /// back to the package's `repository` field and then its name.
    pub fn current() -> BuildInfo {
        BuildInfo {
            sha: env!("LEDSTRIP_GIT_SHA").to_string(),
            repo: env!("LEDSTRIP_REPO").to_string(),
        }
    }

    pub fn to_message(&self) -> Result<Vec<u8>> {
        Ok(to_string(self)?.into_bytes())
    }
}

/// Name to index table of every selectable mode.
pub fn modes_message() -> Result<Vec<u8>> {
    let modes: Map<String, Value> = Mode::ALL
        .iter()
        .map(|mode| (mode.as_str().to_string(), Value::from(mode.id())))
        .collect();

    Ok(to_string(&modes)?.into_bytes())
}
