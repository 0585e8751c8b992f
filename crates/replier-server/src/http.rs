// crates/replier-server/src/http.rs
// Outbound client for the reply provider

use std::time::Duration;

/// Upper bound on one Messages call. Replies are capped at a few hundred
/// tokens, so anything slower is treated as a failed generation.
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(120);

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client shared by every `/generate-reply` request.
///
/// Each request makes exactly one provider call through it; pooled
/// connections to the provider host are reused between requests.
pub fn create_shared_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(PROVIDER_TIMEOUT)
        .connect_timeout(CONNECT_TIMEOUT)
        .pool_max_idle_per_host(10)
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_timeout_within_provider_timeout() {
        assert!(CONNECT_TIMEOUT <= PROVIDER_TIMEOUT);
    }

    #[tokio::test]
    async fn test_closed_provider_port_is_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = create_shared_client()
            .post(format!("http://{}/v1/messages", addr))
            .send()
            .await
            .unwrap_err();
        assert!(err.is_connect());
    }
}
