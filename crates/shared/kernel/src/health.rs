use crate::error::{KernelError, KernelErrorExt};
use std::fmt::Debug;
use std::sync::OnceLock;
use std::time::Duration;

/// Issues a single HTTP GET and reports the status code.
pub trait HttpProbe: Debug {
    /// # Errors
    /// Fails if no response was received (refused, reset, timed out).
    fn status(&self, url: &str) -> Result<u16, KernelError>;
}

/// [`HttpProbe`] backed by a blocking `reqwest` client.
///
/// The client is built on the first request.
#[derive(Debug)]
pub struct ReqwestProbe {
    timeout: Duration,
    client: OnceLock<reqwest::blocking::Client>,
}

impl ReqwestProbe {
    #[must_use]
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout, client: OnceLock::new() }
    }

    #[cfg(test)]
    fn is_ready(&self) -> bool {
        self.client.get().is_some()
    }

    fn client(&self) -> Result<&reqwest::blocking::Client, KernelError> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .context("building the HTTP client")?;
        Ok(self.client.get_or_init(|| client))
    }
}

impl HttpProbe for ReqwestProbe {
    fn status(&self, url: &str) -> Result<u16, KernelError> {
        let response = self.client()?.get(url).send().context(format!("GET {url}"))?;
        Ok(response.status().as_u16())
    }
}
