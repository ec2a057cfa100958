//! Shared fixtures for puppet-motion tests and benches.
//!
//! Fixture files live under the workspace `fixtures/` directory and are
//! listed in `fixtures/manifest.json`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    motions: HashMap<String, String>,
    models: HashMap<String, String>,
}

/// A rig description: parameter ids with their default values.
#[derive(Clone, Debug, Deserialize)]
pub struct ModelFixture {
    pub parameters: Vec<ParameterFixture>,
    #[serde(default)]
    pub eye_blink: Vec<String>,
    #[serde(default)]
    pub lip_sync: Vec<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ParameterFixture {
    pub id: String,
    #[serde(default)]
    pub default: f32,
}

fn fixtures_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../../fixtures")
}

fn resolve_path(rel: &str) -> PathBuf {
    fixtures_root().join(rel)
}

fn read_to_string(rel: &str) -> Result<String> {
    let path = resolve_path(rel);
    fs::read_to_string(&path)
        .with_context(|| format!("failed to read fixture at {}", path.display()))
}

fn lookup<'a>(map: &'a HashMap<String, String>, kind: &str, name: &str) -> Result<&'a str> {
    map.get(name)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("unknown {kind} fixture '{name}'"))
}

pub mod motions {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.motions.keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Raw motion JSON, ready for the motion loader.
    pub fn json(name: &str) -> Result<String> {
        read_to_string(lookup(&MANIFEST.motions, "motion", name)?)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Ok(resolve_path(lookup(&MANIFEST.motions, "motion", name)?))
    }
}

pub mod models {
    use super::*;

    pub fn keys() -> Vec<String> {
        let mut keys: Vec<String> = MANIFEST.models.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn load(name: &str) -> Result<ModelFixture> {
        let rel = lookup(&MANIFEST.models, "model", name)?;
        load_json(rel)
    }

    fn load_json<T: DeserializeOwned>(rel: &str) -> Result<T> {
        let text = read_to_string(rel)?;
        serde_json::from_str(&text).with_context(|| format!("failed to parse JSON fixture {rel}"))
    }
}
