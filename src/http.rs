use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::QueryError;

/// Fetches the raw body found at a URL
pub trait HttpGet {
    fn get(&self, url: &str) -> Result<Vec<u8>, QueryError>;
}

/// Blocking client used for the lifetime of a run. No custom headers and no
/// deadline, a hung request blocks the run.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new() -> Result<Self, QueryError> {
        // reqwest's blocking client would otherwise give up after 30s
        let client = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self { client })
    }
}

impl HttpGet for ReqwestClient {
    fn get(&self, url: &str) -> Result<Vec<u8>, QueryError> {
        debug!("GET {url}");
        let response = self.client.get(url).send()?;
        // Status is not checked, the body is handed to the caller as is
        debug!("{url} responded with {}", response.status());
        let body = response.bytes()?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::{cell::RefCell, collections::HashMap};

    use super::*;

    /// Produces a real `reqwest::Error` without touching the network
    pub fn network_error() -> QueryError {
        Client::new()
            .get("not a url")
            .send()
            .expect_err("an unparsable url cannot be sent")
            .into()
    }

    /// Serves canned bodies by URL. URLs without a body fail as network errors.
    #[derive(Default)]
    pub struct FakeHttp {
        bodies: HashMap<String, String>,
        pub requested: RefCell<Vec<String>>,
    }

    impl FakeHttp {
        pub fn with_body(mut self, url: &str, body: &str) -> Self {
            self.bodies.insert(url.to_string(), body.to_string());
            self
        }
    }

    impl HttpGet for FakeHttp {
        fn get(&self, url: &str) -> Result<Vec<u8>, QueryError> {
            self.requested.borrow_mut().push(url.to_string());
            match self.bodies.get(url) {
                Some(body) => Ok(body.as_bytes().to_vec()),
                None => Err(network_error()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_without_deadline_builds() {
        assert!(ReqwestClient::new().is_ok());
    }
}
