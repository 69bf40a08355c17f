// ABOUTME: Scripted control-plane double for driving the core in tests.
// ABOUTME: Records every scale and cname call for assertion.

use async_trait::async_trait;
use cutover::platform::{PlatformClient, PlatformError, ScaleDirection};
use cutover::types::AppName;
use nonempty::NonEmpty;
use std::collections::HashMap;
use std::sync::Mutex;

/// One recorded `scale_units` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScaleCall {
    pub app: String,
    pub process: Option<String>,
    pub delta: u32,
    pub direction: ScaleDirection,
}

/// A `PlatformClient` double driven by scripted responses.
///
/// Topology snapshots are consumed per app in sequence, mirroring how
/// the remote unit counts change between calls; the last snapshot
/// repeats once the script runs out. Scale results are consumed
/// globally in call order and default to success.
#[derive(Default)]
pub struct ScriptedPlatform {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    topologies: HashMap<String, Vec<HashMap<String, u32>>>,
    scale_results: Vec<bool>,
    cnames: HashMap<String, Vec<String>>,
    env: HashMap<String, HashMap<String, String>>,
    set_cnames_ok: Option<bool>,
    remove_cnames_ok: Option<bool>,
    set_env_ok: Option<bool>,
    scale_calls: Vec<ScaleCall>,
    cname_removals: Vec<(String, Vec<String>)>,
    cname_sets: Vec<(String, Vec<String>)>,
    env_sets: Vec<(String, String, String)>,
}

impl ScriptedPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue topology snapshots for an app, consumed one per
    /// `unit_topology` call.
    pub fn script_topology(&self, app: &str, snapshots: Vec<HashMap<String, u32>>) {
        let mut state = self.state.lock().unwrap();
        state.topologies.insert(app.to_string(), snapshots);
    }

    /// Queue results for `scale_units` calls, consumed in order.
    pub fn script_scale_results(&self, results: Vec<bool>) {
        let mut state = self.state.lock().unwrap();
        state.scale_results = results;
    }

    pub fn set_cnames_on(&self, app: &str, cnames: Vec<&str>) {
        let mut state = self.state.lock().unwrap();
        state.cnames.insert(
            app.to_string(),
            cnames.into_iter().map(str::to_string).collect(),
        );
    }

    pub fn set_env_on(&self, app: &str, key: &str, value: &str) {
        let mut state = self.state.lock().unwrap();
        state
            .env
            .entry(app.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
    }

    pub fn fail_set_cnames(&self) {
        self.state.lock().unwrap().set_cnames_ok = Some(false);
    }

    pub fn fail_remove_cnames(&self) {
        self.state.lock().unwrap().remove_cnames_ok = Some(false);
    }

    pub fn fail_set_env(&self) {
        self.state.lock().unwrap().set_env_ok = Some(false);
    }

    pub fn scale_calls(&self) -> Vec<ScaleCall> {
        self.state.lock().unwrap().scale_calls.clone()
    }

    pub fn cname_removals(&self) -> Vec<(String, Vec<String>)> {
        self.state.lock().unwrap().cname_removals.clone()
    }

    pub fn cname_sets(&self) -> Vec<(String, Vec<String>)> {
        self.state.lock().unwrap().cname_sets.clone()
    }

    pub fn env_sets(&self) -> Vec<(String, String, String)> {
        self.state.lock().unwrap().env_sets.clone()
    }
}

#[async_trait]
impl PlatformClient for ScriptedPlatform {
    async fn get_cnames(&self, app: &AppName) -> Result<Option<NonEmpty<String>>, PlatformError> {
        let state = self.state.lock().unwrap();
        let cnames = state.cnames.get(app.as_str()).cloned().unwrap_or_default();
        Ok(NonEmpty::from_vec(cnames))
    }

    async fn set_cnames(
        &self,
        app: &AppName,
        cnames: &NonEmpty<String>,
    ) -> Result<bool, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state
            .cname_sets
            .push((app.to_string(), cnames.iter().cloned().collect()));
        Ok(state.set_cnames_ok.unwrap_or(true))
    }

    async fn remove_cnames(
        &self,
        app: &AppName,
        cnames: &NonEmpty<String>,
    ) -> Result<bool, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state
            .cname_removals
            .push((app.to_string(), cnames.iter().cloned().collect()));
        Ok(state.remove_cnames_ok.unwrap_or(true))
    }

    async fn get_env(&self, app: &AppName, key: &str) -> Result<Option<String>, PlatformError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .env
            .get(app.as_str())
            .and_then(|vars| vars.get(key))
            .cloned())
    }

    async fn set_env(
        &self,
        app: &AppName,
        key: &str,
        value: &str,
    ) -> Result<bool, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state
            .env_sets
            .push((app.to_string(), key.to_string(), value.to_string()));
        Ok(state.set_env_ok.unwrap_or(true))
    }

    async fn unit_topology(&self, app: &AppName) -> Result<HashMap<String, u32>, PlatformError> {
        let mut state = self.state.lock().unwrap();
        let Some(snapshots) = state.topologies.get_mut(app.as_str()) else {
            return Ok(HashMap::new());
        };

        if snapshots.len() > 1 {
            Ok(snapshots.remove(0))
        } else {
            Ok(snapshots.first().cloned().unwrap_or_default())
        }
    }

    async fn scale_units(
        &self,
        app: &AppName,
        process: Option<&str>,
        delta: u32,
        direction: ScaleDirection,
    ) -> Result<bool, PlatformError> {
        let mut state = self.state.lock().unwrap();
        state.scale_calls.push(ScaleCall {
            app: app.to_string(),
            process: process.map(str::to_string),
            delta,
            direction,
        });

        if state.scale_results.is_empty() {
            Ok(true)
        } else {
            Ok(state.scale_results.remove(0))
        }
    }
}
