use reqwest::blocking::{Client, Response};

use crate::models::{CreateTaskRequest, TaskInfo, UpdateStatusRequest, UpdateStatusResponse};

pub struct HTTPClient {
    pub base_url: String,
    client: Client,
}

impl HTTPClient {
    pub fn new(base_url: &str) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|err| err.to_string())?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn create_task(&self, transcript: &str) -> Result<TaskInfo, String> {
        let url = format!("{}/api/tasks", self.base_url);
        let req = CreateTaskRequest {
            transcript: transcript.to_string(),
        };
        let resp = self
            .client
            .post(url)
            .json(&req)
            .send()
            .map_err(|err| err.to_string())?;
        decode(resp)
    }

    pub fn list_tasks(&self, status: Option<&str>) -> Result<Vec<TaskInfo>, String> {
        let url = format!("{}/api/tasks", self.base_url);
        let mut req = self.client.get(url);
        if let Some(status) = status {
            req = req.query(&[("status", status)]);
        }
        let resp = req.send().map_err(|err| err.to_string())?;
        decode(resp)
    }

    pub fn update_status(&self, id: i64, status: &str) -> Result<UpdateStatusResponse, String> {
        let url = format!("{}/api/tasks/{}", self.base_url, id);
        let req = UpdateStatusRequest {
            status: status.to_string(),
        };
        let resp = self
            .client
            .put(url)
            .json(&req)
            .send()
            .map_err(|err| err.to_string())?;
        decode(resp)
    }
}

fn decode<T: serde::de::DeserializeOwned>(resp: Response) -> Result<T, String> {
    if resp.status().is_success() {
        return resp.json::<T>().map_err(|err| err.to_string());
    }
    let status = resp.status();
    let body = resp.text().unwrap_or_default();
    let message = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|value| value.get("error").and_then(|v| v.as_str()).map(str::to_string))
        .unwrap_or(body);
    Err(format!("http {}: {}", status.as_u16(), message))
}
