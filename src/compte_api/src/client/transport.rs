use std::{future::Future, time::Duration};

use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use super::error::ServiceError;

/// Raw HTTP answer of the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapReply {
    pub status: u16,
    pub body: String,
}

/// Sends a serialized envelope and hands back whatever the server answered.
pub trait SoapTransport {
    fn call(
        &self,
        endpoint: &str,
        action: &str,
        envelope: String,
    ) -> impl Future<Output = Result<SoapReply, ServiceError>> + Send;
}

/// SOAP 1.1 over HTTP POST.
///
/// A fresh `reqwest::Client` is built for every call, nothing is shared between calls.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    timeout: Duration,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Self {
        HttpTransport { timeout }
    }
}

impl SoapTransport for HttpTransport {
    async fn call(
        &self,
        endpoint: &str,
        action: &str,
        envelope: String,
    ) -> Result<SoapReply, ServiceError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        debug!("POST {} (SOAPAction: {})", endpoint, action);

        let res = client
            .post(endpoint)
            .header(CONTENT_TYPE, "text/xml; charset=utf-8")
            .header("SOAPAction", action)
            .body(envelope)
            .send()
            .await?;

        let status = res.status().as_u16();
        let body = res.text().await?;

        Ok(SoapReply { status, body })
    }
}
