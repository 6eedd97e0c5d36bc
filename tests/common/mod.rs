//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::time::Duration;

use countryinfo_service::{HttpServer, ServiceConfig, Shutdown};
use httpmock::MockServer;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Config pointing both providers at mock servers.
pub fn config_for(countries: &MockServer, cities: &MockServer) -> ServiceConfig {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstreams.countries_base_url = countries.base_url();
    config.upstreams.cities_base_url = cities.base_url();
    config.upstreams.request_timeout_secs = 5;
    config.observability.metrics_enabled = false;
    config
}

/// A running service instance; shuts down on drop.
pub struct TestService {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("service unreachable")
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the service on an ephemeral port.
pub async fn start_service(config: ServiceConfig) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, None).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestService {
        addr,
        client,
        shutdown,
    }
}

/// Accept connections and never answer, to exercise timeouts.
#[allow(dead_code)]
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((socket, _)) => {
                    tokio::spawn(async move {
                        tokio::time::sleep(Duration::from_secs(30)).await;
                        drop(socket);
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}

/// REST Countries payload for Norway.
#[allow(dead_code)]
pub fn norway() -> Value {
    json!([{
        "name": {"common": "Norway", "official": "Kingdom of Norway"},
        "cca3": "NOR",
        "continents": ["Europe"],
        "population": 5379475,
        "languages": {"nno": "Norwegian Nynorsk", "nob": "Norwegian Bokmål", "smi": "Sami"},
        "borders": ["FIN", "SWE", "RUS"],
        "flags": {"png": "https://flagcdn.com/w320/no.png", "svg": "https://flagcdn.com/no.svg"},
        "capital": ["Oslo"]
    }])
}
