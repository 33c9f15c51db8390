use std::{
    sync::{Arc, LazyLock, RwLock},
    time::Duration,
};

use ureq::{
    http::{self, Uri},
    typestate::WithoutBody,
    Agent, RequestBuilder,
};

/// Timeout for receiving response headers. Bounds how long a stalled
/// mirror can hold a sync task; the body itself is not deadline-bound.
pub const RESPONSE_HEADERS_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub user_agent: Option<String>,
    pub response_headers_timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            user_agent: Some("debferry".into()),
            response_headers_timeout: Some(RESPONSE_HEADERS_TIMEOUT),
        }
    }
}

impl ClientConfig {
    /// Builds an HTTP `Agent` configured from this `ClientConfig`.
    pub fn build(&self) -> Agent {
        let mut config = ureq::Agent::config_builder()
            .timeout_recv_response(self.response_headers_timeout);

        if let Some(user_agent) = &self.user_agent {
            config = config.user_agent(user_agent);
        }

        config.build().into()
    }
}

struct SharedClient {
    agent: Agent,
    config: ClientConfig,
}

static SHARED_CLIENT_STATE: LazyLock<Arc<RwLock<SharedClient>>> = LazyLock::new(|| {
    let config = ClientConfig::default();
    let agent = config.build();

    Arc::new(RwLock::new(SharedClient { agent, config }))
});

#[derive(Clone, Default)]
pub struct SharedAgent;

impl SharedAgent {
    pub fn new() -> Self {
        Self
    }

    pub fn get<T>(&self, uri: T) -> RequestBuilder<WithoutBody>
    where
        Uri: TryFrom<T>,
        <Uri as TryFrom<T>>::Error: Into<http::Error>,
    {
        let state = SHARED_CLIENT_STATE.read().unwrap();
        state.agent.get(uri)
    }
}

pub static SHARED_AGENT: LazyLock<SharedAgent> = LazyLock::new(SharedAgent::new);

/// Replaces the global client configuration and rebuilds the shared agent.
pub fn configure_http_client<F>(updater: F)
where
    F: FnOnce(&mut ClientConfig),
{
    let mut state = SHARED_CLIENT_STATE.write().unwrap();
    let mut new_config = state.config.clone();
    updater(&mut new_config);
    let new_agent = new_config.build();
    state.agent = new_agent;
    state.config = new_config;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_default() {
        let config = ClientConfig::default();
        assert_eq!(config.user_agent, Some("debferry".to_string()));
        assert_eq!(
            config.response_headers_timeout,
            Some(RESPONSE_HEADERS_TIMEOUT)
        );
    }

    #[test]
    fn test_client_config_build() {
        let config = ClientConfig {
            user_agent: Some("test-agent".to_string()),
            response_headers_timeout: Some(Duration::from_secs(30)),
        };
        let agent = config.build();
        let _ = agent;
    }

    #[test]
    fn test_configure_http_client() {
        configure_http_client(|cfg| {
            cfg.user_agent = Some("custom-agent/1.0".to_string());
        });

        let agent = SharedAgent::new();
        let _ = agent.get("https://example.com");
    }
}
