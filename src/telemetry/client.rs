// client.rs
use crate::domain::TelemetryEntry;
use crate::telemetry::models::decode_feed;
use crate::telemetry::{TelemetryError, TelemetryFeed};
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT};
use std::time::{Duration, Instant};
use tracing::{info, warn};

const USER_AGENT: &str = concat!("fleet-monitor/", env!("CARGO_PKG_VERSION"));

/// Where the tracker lives and how to authenticate.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    pub url: String,
    pub token: String,
    pub user: String,
    pub password: String,
    pub token_header: String,
    pub user_header: String,
    pub password_header: String,
    pub timeout: Duration,
    /// Some tracker deployments sit behind self-signed certificates.
    pub accept_invalid_certs: bool,
}

/// Blocking client for the tracker's position endpoint. One GET per fetch,
/// no retries; the request timeout is the only bound.
pub struct TrackerClient {
    client: Client,
    url: String,
}

impl TrackerClient {
    pub fn new(config: &TrackerConfig) -> Result<Self, TelemetryError> {
        let headers = credential_headers(config)?;

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| TelemetryError::Config(e.to_string()))?;

        Ok(Self {
            client,
            url: config.url.clone(),
        })
    }

    fn fetch_body(&self) -> Result<String, TelemetryError> {
        let resp = self.client.get(&self.url).send()?;

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            return Err(TelemetryError::Status {
                status: status.as_u16(),
            });
        }

        Ok(resp.text()?)
    }
}

impl TelemetryFeed for TrackerClient {
    fn fetch(&self) -> Result<Vec<TelemetryEntry>, TelemetryError> {
        let start = Instant::now();

        let result = self.fetch_body().and_then(|body| decode_feed(&body));

        match &result {
            Ok(entries) => info!(entries = entries.len(), elapsed = ?start.elapsed(), "tracker feed fetched"),
            Err(e) => warn!(error = %e, elapsed = ?start.elapsed(), "tracker feed unavailable"),
        }

        result
    }
}

fn credential_headers(config: &TrackerConfig) -> Result<HeaderMap, TelemetryError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    let credentials = [
        (&config.token_header, &config.token),
        (&config.user_header, &config.user),
        (&config.password_header, &config.password),
    ];

    for (name, value) in credentials {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| TelemetryError::Config(format!("header name {name:?}: {e}")))?;
        let mut value = HeaderValue::from_str(value)
            .map_err(|e| TelemetryError::Config(format!("header {}: {e}", name.as_str())))?;
        value.set_sensitive(true);
        headers.insert(name, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answers one connection per canned response and hands back the
    /// request heads it received, lower-cased.
    fn tracker(responses: Vec<(&'static str, &'static str)>) -> (String, thread::JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/posicoes", listener.local_addr().unwrap());

        let server = thread::spawn(move || {
            responses
                .into_iter()
                .map(|(status, body)| {
                    let (stream, _) = listener.accept().unwrap();
                    let mut reader = BufReader::new(stream);
                    let mut head = String::new();
                    loop {
                        let mut line = String::new();
                        if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                            break;
                        }
                        head.push_str(&line);
                    }

                    let mut stream = reader.into_inner();
                    write!(
                        stream,
                        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    )
                    .unwrap();
                    stream.flush().unwrap();

                    head.to_lowercase()
                })
                .collect()
        });

        (url, server)
    }

    fn config(url: String) -> TrackerConfig {
        TrackerConfig {
            url,
            token: "t0k".to_string(),
            user: "frota".to_string(),
            password: "s3nha".to_string(),
            token_header: "token".to_string(),
            user_header: "login".to_string(),
            password_header: "senha".to_string(),
            timeout: Duration::from_secs(5),
            accept_invalid_certs: false,
        }
    }

    #[test]
    fn non_ok_status_and_non_list_body_yield_no_entries() {
        let (url, server) = tracker(vec![
            ("503 Service Unavailable", ""),
            ("200 OK", r#"{"erro":"sem dados"}"#),
        ]);
        let client = TrackerClient::new(&config(url)).unwrap();

        assert!(matches!(client.fetch(), Err(TelemetryError::Status { status: 503 })));
        assert!(matches!(client.fetch(), Err(TelemetryError::UnexpectedShape(_))));

        let requests = server.join().unwrap();
        assert_eq!(requests.len(), 2);
        for head in &requests {
            assert!(head.starts_with("get /posicoes"), "{head}");
            assert!(head.contains("\r\ntoken: t0k\r\n"), "{head}");
            assert!(head.contains("\r\nlogin: frota\r\n"), "{head}");
            assert!(head.contains("\r\nsenha: s3nha\r\n"), "{head}");
        }
    }

    #[test]
    fn list_body_is_decoded() {
        let (url, server) = tracker(vec![("200 OK", r#"[{"placa":"RDT-0A85","ignicao":"1"}]"#)]);
        let client = TrackerClient::new(&config(url)).unwrap();

        let entries = client.fetch().unwrap();

        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_valid());
        server.join().unwrap();
    }

    #[test]
    fn invalid_header_name_is_a_config_error() {
        let mut config = config("http://127.0.0.1:9/".to_string());
        config.token_header = "bad header".to_string();

        assert!(matches!(TrackerClient::new(&config), Err(TelemetryError::Config(_))));
    }
}
