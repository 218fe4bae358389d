//! HTTP load client

use serde_json::Value;
use tracing::{error, info};

use crate::error::Result;
use super::{random_book, random_id, ticker, Schedule};

/// Issues create/read requests against `POST/GET <endpoint>`
#[derive(Clone)]
pub struct HttpLoad {
    http: reqwest::Client,
    endpoint: String,
}

impl HttpLoad {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// POST a random record
    pub async fn send_write(&self) -> Result<Value> {
        let record = random_book();
        info!("HTTP: Sending write request: {:?}", record.title);

        let reply = self
            .http
            .post(&self.endpoint)
            .json(&record)
            .send()
            .await?
            .json::<Value>()
            .await?;
        Ok(reply)
    }

    /// GET every record
    pub async fn send_read_all(&self) -> Result<Value> {
        info!("HTTP: Sending read request for all records");

        let reply = self.http.get(&self.endpoint).send().await?.json::<Value>().await?;
        Ok(reply)
    }

    /// GET one of the known catalog ids
    pub async fn send_read_by_id(&self) -> Result<Value> {
        let id = random_id();
        info!("HTTP: Sending read request for id '{}'", id);

        let reply = self
            .http
            .get(format!("{}/{}", self.endpoint, id))
            .send()
            .await?
            .json::<Value>()
            .await?;
        Ok(reply)
    }

    /// Fire requests on `schedule` forever; failures are logged and skipped
    ///
    /// Every tick runs on its own task, so a slow request never holds back
    /// the other timers.
    pub async fn run(&self, schedule: Schedule) {
        let mut writes = ticker(schedule.write);
        let mut reads = ticker(schedule.read_all);
        let mut lookups = ticker(schedule.read_by_id);

        loop {
            let client = self.clone();
            tokio::select! {
                _ = writes.tick() => {
                    tokio::spawn(async move { report("write", client.send_write().await) });
                }
                _ = reads.tick() => {
                    tokio::spawn(async move { report("read all", client.send_read_all().await) });
                }
                _ = lookups.tick() => {
                    tokio::spawn(async move { report("read by id", client.send_read_by_id().await) });
                }
            }
        }
    }
}

fn report(label: &str, outcome: Result<Value>) {
    match outcome {
        Ok(reply) => info!("HTTP: Received {} response: {}", label, reply),
        Err(e) => error!("HTTP: Error in {} request: {}", label, e),
    }
}
