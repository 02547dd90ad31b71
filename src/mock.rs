//! Scripted in-memory transport for tests.

use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;
use std::time::Duration;

use crate::coap::Code;
use crate::errors::Error;
use crate::transport::{Dialer, Gateway, Response, Transport};

type Result<T> = std::result::Result<T, Error>;

/// A request as the mock saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Request {
    pub method: &'static str,
    pub path: String,
    pub payload: Vec<u8>,
}

impl Request {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.payload).unwrap()
    }
}

/// Answers requests from a queue and records them.
///
/// An exhausted queue answers with a transport failure.
#[derive(Default)]
pub(crate) struct MockTransport {
    script: Mutex<VecDeque<Result<Response>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, code: Code, payload: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Ok(Response::new(code, payload.as_bytes().to_vec())));
        self
    }

    pub fn fail(self, err: Error) -> Self {
        self.script.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests().into_iter().map(|r| r.path).collect()
    }

    fn answer(&self, method: &'static str, path: &str, payload: &[u8]) -> Result<Response> {
        self.requests.lock().unwrap().push(Request {
            method,
            path: path.to_string(),
            payload: payload.to_vec(),
        });
        self.script.lock().unwrap().pop_front().unwrap_or_else(|| {
            Err(Error::transport(
                "receive",
                io::Error::new(io::ErrorKind::TimedOut, "no scripted response"),
            ))
        })
    }
}

impl Transport for MockTransport {
    async fn get(&self, path: &str) -> Result<Response> {
        self.answer("GET", path, &[])
    }

    async fn put(&self, path: &str, payload: &[u8]) -> Result<Response> {
        self.answer("PUT", path, payload)
    }

    async fn post(&self, path: &str, payload: &[u8]) -> Result<Response> {
        self.answer("POST", path, payload)
    }
}

/// Hands out one prepared [`MockTransport`] and records the dial arguments.
pub(crate) struct MockDialer {
    session: Mutex<Option<MockTransport>>,
    pub dialed: Mutex<Vec<(String, String, String)>>,
}

impl MockDialer {
    pub fn new(session: MockTransport) -> Self {
        MockDialer {
            session: Mutex::new(Some(session)),
            dialed: Mutex::new(Vec::new()),
        }
    }
}

impl Dialer for MockDialer {
    type Session = MockTransport;

    async fn dial(
        &self,
        gateway: &Gateway,
        identity: &str,
        psk: &str,
        _timeout: Duration,
    ) -> Result<MockTransport> {
        self.dialed.lock().unwrap().push((
            gateway.to_string(),
            identity.to_string(),
            psk.to_string(),
        ));
        self.session.lock().unwrap().take().ok_or_else(|| {
            Error::transport(
                "connect",
                io::Error::new(io::ErrorKind::ConnectionRefused, "mock already dialed"),
            )
        })
    }
}
