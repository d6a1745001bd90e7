// File:    service.rs
// Author:  apezoo
// Date:    2026-10-14
//
// Description: The Verification Service port and the blocking HTTP adapter that talks to the remote backend.
//
// License:
// This project is licensed under the terms of the GNU AGPLv3 license.
// See the LICENSE.md file in the project root for full license information.

use crate::error::{Result, VerifyError};
use crate::request::{OperationKind, VerificationRequest, ENDPOINT_PATH};
use log::debug;
use reqwest::blocking::Client;
use reqwest::Method;
use std::time::Duration;

/// The raw outcome of one exchange with the Verification Service.
///
/// Status and body are handed back untouched; deciding what counts as
/// success is left to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceReply {
    /// The HTTP status code.
    pub status: u16,
    /// The response body as text.
    pub body: String,
}

/// Anything that can carry a `VerificationRequest` to the backend.
pub trait VerificationService {
    /// Performs one exchange.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::Transport` if no reply was received at all.
    fn send(&self, request: &VerificationRequest<'_>) -> Result<ServiceReply>;
}

/// The Verification Service reached over HTTP.
#[derive(Debug)]
pub struct HttpVerificationService {
    client: Client,
    endpoint: String,
}

impl HttpVerificationService {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns `VerifyError::Config` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| VerifyError::Config(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: format!("{}{ENDPOINT_PATH}", base_url.trim_end_matches('/')),
        })
    }

    /// The full URL requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl VerificationService for HttpVerificationService {
    fn send(&self, request: &VerificationRequest<'_>) -> Result<ServiceReply> {
        let method = match request.kind() {
            OperationKind::Query => Method::GET,
            OperationKind::Issue => Method::POST,
        };
        debug!("Sending {method} {}", self.endpoint);

        let response = self
            .client
            .request(method, &self.endpoint)
            .query(&request.query_pairs())
            .send()
            .map_err(|e| VerifyError::Transport(e.without_url().to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| VerifyError::Transport(e.without_url().to_string()))?;
        debug!("Verification service answered {status} ({} bytes)", body.len());

        Ok(ServiceReply { status, body })
    }
}
