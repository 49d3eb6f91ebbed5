//! Test support: a scripted transport and worker fixtures.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use awning_core::{AppConfig, CachedResponse, Error, Request, StoreDb, Transport};

use crate::worker::Worker;

#[derive(Clone)]
enum Scripted {
    Respond(CachedResponse),
    Fail,
}

/// A transport whose responses are scripted per URL.
///
/// Each URL holds a queue of steps; the last step repeats once the queue
/// would otherwise run dry, and unscripted URLs fail like a dead network.
#[derive(Default)]
pub struct FakeTransport {
    script: Mutex<HashMap<String, VecDeque<Scripted>>>,
    log: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, url: &str, response: CachedResponse) {
        self.script
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(Scripted::Respond(response));
    }

    pub fn fail(&self, url: &str) {
        self.script
            .lock()
            .unwrap()
            .entry(url.to_string())
            .or_default()
            .push_back(Scripted::Fail);
    }

    pub fn calls(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn calls_for(&self, url: &str) -> usize {
        self.log.lock().unwrap().iter().filter(|u| u.as_str() == url).count()
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn fetch(&self, request: &Request) -> Result<CachedResponse, Error> {
        let url = request.url.as_str().to_string();
        self.log.lock().unwrap().push(url.clone());

        let mut script = self.script.lock().unwrap();
        let step = match script.get_mut(&url) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match step {
            Some(Scripted::Respond(response)) => Ok(response),
            Some(Scripted::Fail) | None => Err(Error::Network(format!("no route to {url}"))),
        }
    }
}

/// Config pointing at a fictional origin with one external asset and one
/// live-data host.
pub fn test_config() -> AppConfig {
    AppConfig {
        origin: "https://app.example.com".into(),
        cache_version: "v2".into(),
        external_assets: vec!["https://cdn.example.net/lib.js".into()],
        live_hosts: vec!["realtime.example.net".into()],
        ..Default::default()
    }
}

/// A worker over an in-memory store and a fresh scripted transport.
pub async fn test_worker(config: AppConfig) -> (Arc<Worker>, Arc<FakeTransport>) {
    let store = StoreDb::open_in_memory().await.unwrap();
    let transport = Arc::new(FakeTransport::new());
    let worker = Worker::new(config, store, transport.clone()).unwrap();
    (Arc::new(worker), transport)
}
