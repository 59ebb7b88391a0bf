use std::time::Duration;

use digest_auth::AuthContext;
use reqwest::{header, Client, Response, StatusCode};
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::endpoint::Endpoint;
use crate::readings::StatusPayload;

/// Response header the server uses to hand a hub off to another ASN.
const ASN_HEADER: &str = "x_myenergi-asn";
/// Status query covering every sub-device attached to the hub.
const STATUS_PATH: &str = "/cgi-jstatus-*";

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Hub serial plus the password set in the myenergi app, used for digest
/// authentication on every request.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub serial: String,
    pub password: String,
}

/// Cycle-terminal fetch failures. A server reassignment is not one of these,
/// see [`FetchOutcome::Redirected`].
#[derive(Debug, Error)]
pub enum FetchError {
    /// The hub rejected the credentials. Never retried.
    #[error("unauthorized; check hub serial and password settings")]
    Auth,
    /// Every attempt in the budget failed with a transient error.
    #[error("no data after {attempts} attempts: {last_error}")]
    Exhausted { attempts: u32, last_error: String },
}

/// What one fetch operation produced.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Decoded status payload.
    Payload(StatusPayload),
    /// The server pointed us at a different ASN. The endpoint has already
    /// been updated; the response that carried the header is not a data
    /// response, so the cycle ends here and the next scheduled cycle fetches
    /// from the new base.
    Redirected,
}

pub struct HubClient {
    client: Client,
    credentials: Credentials,
    max_attempts: u32,
}

impl HubClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_config(credentials, DEFAULT_MAX_ATTEMPTS, DEFAULT_TIMEOUT)
    }

    pub fn with_config(credentials: Credentials, max_attempts: u32, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("http client with static configuration");
        Self {
            client,
            credentials,
            max_attempts: max_attempts.max(1),
        }
    }

    /// Fetches and decodes one status payload, retrying transient failures
    /// up to the attempt budget. Attempts are serial and each is bounded by
    /// the request timeout; there is no backoff between them.
    pub async fn fetch(&self, endpoint: &mut Endpoint) -> Result<FetchOutcome, FetchError> {
        let url = format!("{}{}", endpoint.resolve(), STATUS_PATH);
        let mut last_error = String::new();

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                debug!("previous attempt failed, trying again ({attempt}/{})", self.max_attempts);
            }

            let response = match self.get_with_digest(&url).await {
                Ok(response) => response,
                Err(e) => {
                    warn!("no data from {url}: {e}");
                    last_error = e.to_string();
                    continue;
                }
            };

            if let Some(asn) = header_str(&response, ASN_HEADER) {
                if endpoint.update(&asn) {
                    debug!("base URL has changed to {}", endpoint.resolve());
                    return Ok(FetchOutcome::Redirected);
                }
            }

            if response.status() == StatusCode::UNAUTHORIZED {
                error!("unauthorized; check hub serial and password settings");
                return Err(FetchError::Auth);
            }
            if !response.status().is_success() {
                warn!("no data from {url}: HTTP {}", response.status());
                last_error = format!("HTTP {}", response.status());
                continue;
            }

            // A 2xx with an undecodable body costs this attempt like any
            // other transient failure.
            match response.json::<StatusPayload>().await {
                Ok(payload) => {
                    debug!("received {} status records", payload.len());
                    return Ok(FetchOutcome::Payload(payload));
                }
                Err(e) => {
                    warn!("undecodable body from {url}: {e}");
                    last_error = e.to_string();
                }
            }
        }

        error!("failed to retrieve data from {}, cancelling", endpoint.resolve());
        Err(FetchError::Exhausted {
            attempts: self.max_attempts,
            last_error,
        })
    }

    /// One authenticated GET. Digest auth needs the server's challenge, so
    /// the request goes out bare first and is re-sent with an Authorization
    /// answer when the hub replies 401 carrying a challenge. A 401 without a
    /// usable challenge is returned as-is.
    async fn get_with_digest(&self, url: &str) -> Result<Response, reqwest::Error> {
        let first = self.get_json(url, None).await?;
        if first.status() != StatusCode::UNAUTHORIZED {
            return Ok(first);
        }
        let answer = match header_str(&first, "www-authenticate") {
            Some(challenge) => self.answer_challenge(url, &challenge),
            None => None,
        };
        match answer {
            Some(authorization) => self.get_json(url, Some(authorization)).await,
            None => Ok(first),
        }
    }

    fn answer_challenge(&self, url: &str, challenge: &str) -> Option<String> {
        let mut prompt = digest_auth::parse(challenge).ok()?;
        let parsed = reqwest::Url::parse(url).ok()?;
        let context = AuthContext::new(
            self.credentials.serial.as_str(),
            self.credentials.password.as_str(),
            parsed.path(),
        );
        prompt.respond(&context).ok().map(|answer| answer.to_string())
    }

    async fn get_json(
        &self,
        url: &str,
        authorization: Option<String>,
    ) -> Result<Response, reqwest::Error> {
        let mut request = self
            .client
            .get(url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if let Some(authorization) = authorization {
            request = request.header(header::AUTHORIZATION, authorization);
        }
        request.send().await
    }
}

fn header_str(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)?
        .to_str()
        .ok()
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn test_client() -> HubClient {
        HubClient::new(Credentials {
            serial: "12345678".to_string(),
            password: "hub-password".to_string(),
        })
    }

    fn endpoint_for(server: &mockito::Server) -> Endpoint {
        Endpoint::new(server.url())
    }

    #[tokio::test]
    async fn test_successful_fetch_decodes_the_payload() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cgi-jstatus-*")
            .match_header("accept", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"zappi":[{"grd":240,"vol":2301}]}]"#)
            .expect(1)
            .create_async()
            .await;

        let mut endpoint = endpoint_for(&server);
        let outcome = test_client().fetch(&mut endpoint).await.unwrap();

        match outcome {
            FetchOutcome::Payload(payload) => assert_eq!(payload.len(), 1),
            FetchOutcome::Redirected => panic!("unexpected redirect"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_digest_challenge_is_answered() {
        let mut server = mockito::Server::new_async().await;
        let challenge = server
            .mock("GET", "/cgi-jstatus-*")
            .match_header("authorization", Matcher::Missing)
            .with_status(401)
            .with_header(
                "www-authenticate",
                r#"Digest realm="MyEnergi Telemetry", qop="auth", nonce="dcd98b7102dd2f0e8b11d0f600bfb0c093", opaque="5ccc069c403ebaf9f0171e9517f40e41""#,
            )
            .expect(1)
            .create_async()
            .await;
        let data = server
            .mock("GET", "/cgi-jstatus-*")
            .match_header("authorization", Matcher::Regex("^Digest ".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"zappi":[{"div":1400}]}]"#)
            .expect(1)
            .create_async()
            .await;

        let mut endpoint = endpoint_for(&server);
        let outcome = test_client().fetch(&mut endpoint).await.unwrap();

        assert!(matches!(outcome, FetchOutcome::Payload(_)));
        challenge.assert_async().await;
        data.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_fails_without_a_second_request() {
        let mut server = mockito::Server::new_async().await;
        // 401 with no challenge to answer: terminal immediately
        let mock = server
            .mock("GET", "/cgi-jstatus-*")
            .with_status(401)
            .expect(1)
            .create_async()
            .await;

        let mut endpoint = endpoint_for(&server);
        let err = test_client().fetch(&mut endpoint).await.unwrap_err();

        assert!(matches!(err, FetchError::Auth));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_transient_failures_consume_the_whole_budget() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cgi-jstatus-*")
            .with_status(500)
            .expect(3)
            .create_async()
            .await;

        let mut endpoint = endpoint_for(&server);
        let err = test_client().fetch(&mut endpoint).await.unwrap_err();

        match err {
            FetchError::Exhausted { attempts, .. } => assert_eq!(attempts, 3),
            FetchError::Auth => panic!("expected exhausted retries"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_malformed_body_counts_as_a_transient_failure() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cgi-jstatus-*")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("{ not json")
            .expect(3)
            .create_async()
            .await;

        let mut endpoint = endpoint_for(&server);
        let err = test_client().fetch(&mut endpoint).await.unwrap_err();

        assert!(matches!(err, FetchError::Exhausted { .. }));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_asn_header_redirects_without_consuming_an_attempt() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/cgi-jstatus-*")
            .with_status(200)
            .with_header("x_myenergi-asn", "s18.myenergi.net")
            .with_header("content-type", "application/json")
            .with_body("[]")
            .expect(1)
            .create_async()
            .await;

        let mut endpoint = endpoint_for(&server);
        let outcome = test_client().fetch(&mut endpoint).await.unwrap();

        assert!(matches!(outcome, FetchOutcome::Redirected));
        assert_eq!(endpoint.resolve(), "https://s18.myenergi.net");
        mock.assert_async().await;
    }
}
