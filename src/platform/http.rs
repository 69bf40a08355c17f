// ABOUTME: reqwest-based control-plane client speaking the tsuru-style REST API.
// ABOUTME: Maps HTTP statuses to boolean results per the platform contract.

use super::{PlatformClient, PlatformError, ScaleDirection};
use crate::types::AppName;
use async_trait::async_trait;
use nonempty::NonEmpty;
use serde::Deserialize;
use std::collections::HashMap;

/// HTTP client for the control-plane API.
///
/// Every request carries the bearer token; no retries are attempted and
/// no deadline is imposed beyond reqwest's defaults.
pub struct ControlPlane {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

/// Shape of `GET /apps/{name}`, reduced to the fields the core reads.
#[derive(Debug, Deserialize)]
struct AppInfo {
    #[serde(default)]
    cname: Vec<String>,
    #[serde(default)]
    units: Vec<UnitInfo>,
}

#[derive(Debug, Deserialize)]
struct UnitInfo {
    #[serde(rename = "ProcessName")]
    process_name: String,
}

#[derive(Debug, Deserialize)]
struct EnvVarInfo {
    name: String,
    value: Option<String>,
}

impl ControlPlane {
    pub fn new(host: &str, token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: host.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn auth_value(&self) -> String {
        format!("bearer {}", self.token)
    }

    async fn app_info(&self, app: &AppName) -> Result<AppInfo, PlatformError> {
        let path = format!("/apps/{}", urlencoding::encode(app.as_str()));
        let response = self
            .http
            .get(self.url(&path))
            .header(reqwest::header::AUTHORIZATION, self.auth_value())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlatformError::Status {
                status: response.status().as_u16(),
                path,
            });
        }

        response
            .json::<AppInfo>()
            .await
            .map_err(|e| PlatformError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl PlatformClient for ControlPlane {
    async fn get_cnames(&self, app: &AppName) -> Result<Option<NonEmpty<String>>, PlatformError> {
        let info = self.app_info(app).await?;
        Ok(NonEmpty::from_vec(info.cname))
    }

    async fn set_cnames(
        &self,
        app: &AppName,
        cnames: &NonEmpty<String>,
    ) -> Result<bool, PlatformError> {
        let path = format!("/apps/{}/cname", urlencoding::encode(app.as_str()));
        let body = serde_json::json!({ "cname": cnames });
        let response = self
            .http
            .post(self.url(&path))
            .header(reqwest::header::AUTHORIZATION, self.auth_value())
            .json(&body)
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn remove_cnames(
        &self,
        app: &AppName,
        cnames: &NonEmpty<String>,
    ) -> Result<bool, PlatformError> {
        let path = format!("/apps/{}/cname", urlencoding::encode(app.as_str()));
        let body = serde_json::json!({ "cname": cnames });
        let response = self
            .http
            .delete(self.url(&path))
            .header(reqwest::header::AUTHORIZATION, self.auth_value())
            .json(&body)
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn get_env(&self, app: &AppName, key: &str) -> Result<Option<String>, PlatformError> {
        let path = format!("/apps/{}/env", urlencoding::encode(app.as_str()));
        let response = self
            .http
            .get(self.url(&path))
            .header(reqwest::header::AUTHORIZATION, self.auth_value())
            .json(&[key])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PlatformError::Status {
                status: response.status().as_u16(),
                path,
            });
        }

        // The endpoint answers `null` when the app has no env at all.
        let vars: Option<Vec<EnvVarInfo>> = response
            .json()
            .await
            .map_err(|e| PlatformError::MalformedResponse(e.to_string()))?;

        Ok(vars
            .unwrap_or_default()
            .into_iter()
            .find(|v| v.name == key)
            .and_then(|v| v.value))
    }

    async fn set_env(
        &self,
        app: &AppName,
        key: &str,
        value: &str,
    ) -> Result<bool, PlatformError> {
        let path = format!("/apps/{}/env", urlencoding::encode(app.as_str()));
        let body = serde_json::json!({ key: value });
        let response = self
            .http
            .post(self.url(&path))
            .header(reqwest::header::AUTHORIZATION, self.auth_value())
            .json(&body)
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    async fn unit_topology(&self, app: &AppName) -> Result<HashMap<String, u32>, PlatformError> {
        let info = self.app_info(app).await?;

        let mut topology = HashMap::new();
        for unit in info.units {
            *topology.entry(unit.process_name).or_insert(0) += 1;
        }
        Ok(topology)
    }

    async fn scale_units(
        &self,
        app: &AppName,
        process: Option<&str>,
        delta: u32,
        direction: ScaleDirection,
    ) -> Result<bool, PlatformError> {
        let mut path = format!(
            "/apps/{}/units?units={}",
            urlencoding::encode(app.as_str()),
            delta
        );
        if let Some(process) = process {
            path.push_str(&format!("&process={}", urlencoding::encode(process)));
        }

        let request = match direction {
            ScaleDirection::Add => self.http.put(self.url(&path)),
            ScaleDirection::Remove => self.http.delete(self.url(&path)),
        };

        let response = request
            .header(reqwest::header::AUTHORIZATION, self.auth_value())
            .send()
            .await?;

        Ok(response.status().is_success())
    }
}
