//! HTTP client for the logbook REST backend

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::models::{
    ClearFaultRequest, CostEntry, FaultRecord, ImportFaultsRequest, ImportFaultsResponse,
    IntervalTable, MaintenanceRecord, ModRecord, Reminder, SettingUpdate, Vehicle,
};

use super::LogbookApi;

/// Settings key holding the interval table
pub const SERVICE_INTERVALS_KEY: &str = "service_intervals";

#[derive(Debug, Deserialize)]
struct IdResponse {
    id: i64,
}

/// reqwest-backed implementation of [`LogbookApi`]
#[derive(Debug, Clone)]
pub struct LogbookClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl LogbookClient {
    pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(Error::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        config.validate()?;
        Self::new(
            &config.api_url,
            config.api_token.clone(),
            Duration::from_secs(config.timeout_seconds),
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        log::debug!("[api] GET {}", path);
        let response = self.request(Method::GET, path).query(query).send().await?;
        Self::decode(path, response).await
    }

    async fn send_json<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        log::debug!("[api] {} {}", method, path);
        let response = self.request(method, path).json(body).send().await?;
        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(Error::not_found(path.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("[api] {} returned {}: {}", path, status, body);
            return Err(Error::api(status.as_u16(), body));
        }
        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Decode the interval setting, which the backend may hold either as a JSON
/// object or as a JSON-encoded string
fn decode_intervals(value: serde_json::Value) -> Result<IntervalTable> {
    match value {
        serde_json::Value::String(raw) => Ok(serde_json::from_str(&raw)?),
        serde_json::Value::Null => Ok(IntervalTable::defaults()),
        other => Ok(serde_json::from_value(other)?),
    }
}

#[async_trait]
impl LogbookApi for LogbookClient {
    async fn list_vehicles(&self) -> Result<Vec<Vehicle>> {
        self.get_json("/api/vehicles", &[]).await
    }

    async fn get_vehicle(&self, id: i64) -> Result<Vehicle> {
        self.get_json(&format!("/api/vehicles/{}", id), &[]).await
    }

    async fn list_maintenance(&self, vehicle_id: i64) -> Result<Vec<MaintenanceRecord>> {
        self.get_json("/api/maintenance", &[("vehicle_id", vehicle_id.to_string())])
            .await
    }

    async fn list_mods(&self, vehicle_id: i64) -> Result<Vec<ModRecord>> {
        self.get_json("/api/mods", &[("vehicle_id", vehicle_id.to_string())])
            .await
    }

    async fn list_costs(&self, vehicle_id: i64) -> Result<Vec<CostEntry>> {
        self.get_json("/api/costs", &[("vehicle_id", vehicle_id.to_string())])
            .await
    }

    async fn get_service_intervals(&self) -> Result<IntervalTable> {
        let mut settings: HashMap<String, serde_json::Value> =
            self.get_json("/api/settings", &[]).await?;
        match settings.remove(SERVICE_INTERVALS_KEY) {
            Some(value) => {
                let table = decode_intervals(value)?;
                table.validate()?;
                Ok(table)
            }
            None => {
                log::info!("[api] No service intervals configured, using defaults");
                Ok(IntervalTable::defaults())
            }
        }
    }

    async fn put_service_intervals(&self, intervals: &IntervalTable) -> Result<()> {
        intervals.validate()?;
        let update = SettingUpdate {
            key: SERVICE_INTERVALS_KEY.to_string(),
            value: serde_json::to_string(intervals)?,
            value_type: "json".to_string(),
        };
        let _: serde_json::Value = self.send_json(Method::PUT, "/api/settings", &update).await?;
        Ok(())
    }

    async fn list_reminders(&self, vehicle_id: i64) -> Result<Vec<Reminder>> {
        self.get_json("/api/reminders", &[("vehicle_id", vehicle_id.to_string())])
            .await
    }

    async fn create_reminder(&self, reminder: &Reminder) -> Result<i64> {
        reminder.rule().validate(&reminder.service_type)?;
        let created: IdResponse = self
            .send_json(Method::POST, "/api/reminders", reminder)
            .await?;
        Ok(created.id)
    }

    async fn update_reminder(&self, id: i64, reminder: &Reminder) -> Result<()> {
        reminder.rule().validate(&reminder.service_type)?;
        let _: serde_json::Value = self
            .send_json(Method::PUT, &format!("/api/reminders/{}", id), reminder)
            .await?;
        Ok(())
    }

    async fn list_faults(&self, vehicle_id: i64) -> Result<Vec<FaultRecord>> {
        self.get_json("/api/vcds", &[("vehicle_id", vehicle_id.to_string())])
            .await
    }

    async fn import_faults(&self, vehicle_id: i64, faults: &[FaultRecord]) -> Result<usize> {
        let request = ImportFaultsRequest {
            vehicle_id,
            faults: faults.to_vec(),
        };
        let response: ImportFaultsResponse = self
            .send_json(Method::POST, "/api/vcds/import", &request)
            .await?;
        log::info!(
            "[api] Imported {} of {} faults for vehicle {}",
            response.imported,
            faults.len(),
            vehicle_id
        );
        Ok(response.imported)
    }

    async fn clear_fault(&self, id: i64, date: NaiveDate) -> Result<()> {
        let _: serde_json::Value = self
            .send_json(
                Method::PUT,
                &format!("/api/vcds/{}", id),
                &ClearFaultRequest::on(date),
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ServiceIntervalRule, ServiceType};

    #[test]
    fn test_base_url_trailing_slash() {
        let client = LogbookClient::new("http://localhost:5000/", None, Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:5000");
        assert_eq!(client.url("/api/vehicles"), "http://localhost:5000/api/vehicles");
    }

    #[test]
    fn test_from_config_rejects_invalid_url() {
        let config = AppConfig {
            api_url: "localhost".to_string(),
            ..AppConfig::default()
        };
        assert!(LogbookClient::from_config(&config).is_err());
    }

    #[test]
    fn test_decode_intervals_object_and_string() {
        let object = serde_json::json!({"oil_change": {"miles": 3000, "months": 3}});
        let table = decode_intervals(object).unwrap();
        assert_eq!(
            table.get(&ServiceType::OilChange),
            Some(&ServiceIntervalRule::new(3000, 3))
        );

        let string = serde_json::Value::String(r#"{"brakes": {"miles": 10000, "months": 12}}"#.into());
        let table = decode_intervals(string).unwrap();
        assert_eq!(table.len(), 1);

        assert_eq!(decode_intervals(serde_json::Value::Null).unwrap(), IntervalTable::defaults());
    }
}
