//! Blocking HTTP transport for the wire protocol.

use std::fmt::Debug;
use std::time::Duration;

use serde_json::Value;

use super::command::{RequestData, RequestMethod};
use crate::error::{SuiteError, SuiteResult, WireErrorKind};

pub struct HttpClientCreateParams {
    pub server_url: String,
    pub timeout: Option<Duration>,
}

/// Trait for executing HTTP requests against a WebDriver server.
///
/// [`wire::WireBrowser`](super::wire::WireBrowser) is written against this
/// trait so the transport can be swapped without touching the session logic.
pub trait WebDriverHttpClient: Debug + Send + Sync {
    fn create(params: HttpClientCreateParams) -> SuiteResult<Self>
    where
        Self: Sized;

    fn set_request_timeout(&mut self, timeout: Duration);

    fn execute(&self, request_data: RequestData) -> SuiteResult<Value>;
}

/// Synchronous connection to the remote WebDriver server.
#[derive(Debug)]
pub struct ReqwestClient {
    url: String,
    client: reqwest::blocking::Client,
    timeout: Duration,
}

impl WebDriverHttpClient for ReqwestClient {
    fn create(params: HttpClientCreateParams) -> SuiteResult<Self> {
        let url = params.server_url.trim_end_matches('/').to_owned();
        Ok(ReqwestClient {
            url,
            client: reqwest::blocking::Client::builder().build()?,
            timeout: params.timeout.unwrap_or_else(|| Duration::from_secs(120)),
        })
    }

    fn set_request_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    /// Execute the specified command and return the response body as JSON.
    fn execute(&self, request_data: RequestData) -> SuiteResult<Value> {
        let url = self.url.clone() + &request_data.url;
        let mut request = match request_data.method {
            RequestMethod::Get => self.client.get(&url),
            RequestMethod::Post => self.client.post(&url),
            RequestMethod::Delete => self.client.delete(&url),
        };
        request = request.timeout(self.timeout);

        if let Some(body) = request_data.body {
            request = request.json(&body);
        }

        let resp = request.send()?;

        match resp.status().as_u16() {
            200..=399 => Ok(resp.json()?),
            status => Err(parse_wire_error(status, &resp.text()?)),
        }
    }
}

/// Decode a W3C error payload (`{"value": {"error", "message"}}`); anything
/// unparseable is preserved verbatim.
pub fn parse_wire_error(status: u16, body: &str) -> SuiteError {
    match serde_json::from_str::<Value>(body) {
        Ok(payload) => {
            let error = payload["value"]["error"].as_str().unwrap_or("unknown error");
            let message = payload["value"]["message"]
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string());
            SuiteError::wire(error, message)
        }
        Err(_) => SuiteError::Wire {
            kind: WireErrorKind::Other,
            message: format!("http status {}: {}", status, body),
        },
    }
}
