//! Mock upstream balance API

use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Balance API double serving `GET /v1/balances/{address}`
pub struct MockUpstream {
    pub server: MockServer,
}

impl MockUpstream {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// Base URL to configure the lookup client with
    pub fn base_url(&self) -> String {
        format!("{}/v1/balances", self.server.uri())
    }

    /// Answer `address` with `status` and `body`
    pub async fn respond(&self, address: &str, status: u16, body: Value) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/balances/{}", address)))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer `address` with 429 for the first `times` requests
    pub async fn throttle(&self, address: &str, times: u64) {
        Mock::given(method("GET"))
            .and(path(format!("/v1/balances/{}", address)))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(times)
            .with_priority(1)
            .mount(&self.server)
            .await;
    }

    /// Answer every other address with a small balance payload
    pub async fn default_balance(&self) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"sol": 1.0})))
            .with_priority(10)
            .mount(&self.server)
            .await;
    }

    /// Requests received for `address`
    pub async fn hits(&self, address: &str) -> usize {
        let wanted = format!("/v1/balances/{}", address);
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == wanted)
            .count()
    }
}
