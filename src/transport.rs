//! Request/response sessions with a gateway.
//!
//! [`Transport`] is the seam the rest of the crate talks through: one
//! addressed request in, one response code and payload out. [`Dialer`] opens
//! such a session for a username/pre-shared-key pair.
//!
//! Gateways are secured with DTLS: `udp://` and `coaps://` addresses are
//! dialed by `DtlsDialer`. [`PlainDialer`] speaks unsecured CoAP to
//! `coap://` addresses and refuses to carry credentials.

use std::fmt;
use std::future::Future;
use std::io;
use std::str::FromStr;
use std::time::Duration;

use coap_lite::{MessageType, Packet, RequestType};
use log::{debug, trace};
use strum_macros::{Display, EnumString};

use crate::coap::{self, Code};
use crate::errors::Error;
use crate::runtime::{self, AsyncUdpSocket, UdpSocket};

type Result<T> = std::result::Result<T, Error>;

/// Port used when a gateway address does not name one.
pub const DEFAULT_PORT: u16 = 5684;

/// Bound applied to dialing and to every single request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Transport scheme of a gateway address.
///
/// `udp` and `coaps` both mean a DTLS-secured session; `coap` is unsecured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Scheme {
    Udp,
    Coap,
    Coaps,
}

impl Scheme {
    pub fn is_secure(self) -> bool {
        matches!(self, Scheme::Udp | Scheme::Coaps)
    }
}

/// Address of a gateway, parsed from `scheme://host[:port]`.
///
/// IPv6 hosts must be bracketed.
///
/// # Examples
///
/// ```
/// use lightctl::{Gateway, Scheme};
///
/// let gateway: Gateway = "udp://10.0.1.11:5684".parse().unwrap();
/// assert_eq!(gateway.scheme(), Scheme::Udp);
/// assert_eq!(gateway.authority(), "10.0.1.11:5684");
///
/// let gateway: Gateway = "coaps://[fe80::1]".parse().unwrap();
/// assert_eq!(gateway.port(), 5684);
/// assert_eq!(gateway.authority(), "[fe80::1]:5684");
///
/// assert!("coaps://fe80::1".parse::<Gateway>().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gateway {
    scheme: Scheme,
    host: String,
    port: u16,
}

impl Gateway {
    pub fn new(scheme: Scheme, host: &str, port: u16) -> Self {
        Gateway {
            scheme,
            host: host.to_string(),
            port,
        }
    }

    pub fn scheme(&self) -> Scheme {
        self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// `host:port`, with IPv6 hosts bracketed.
    pub fn authority(&self) -> String {
        if self.is_ipv6() {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Wildcard address to bind the local socket to.
    pub(crate) fn local_bind(&self) -> &'static str {
        if self.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" }
    }

    fn is_ipv6(&self) -> bool {
        self.host.contains(':')
    }
}

impl fmt::Display for Gateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.authority())
    }
}

impl FromStr for Gateway {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (scheme, rest) = s
            .split_once("://")
            .ok_or_else(|| Error::invalid_gateway(s, "missing scheme"))?;
        let scheme: Scheme = scheme
            .parse()
            .map_err(|_| Error::invalid_gateway(s, "unknown scheme"))?;
        let rest = rest.trim_end_matches('/');

        let (host, port) = if let Some(bracketed) = rest.strip_prefix('[') {
            let (host, after) = bracketed
                .split_once(']')
                .ok_or_else(|| Error::invalid_gateway(s, "unterminated IPv6 host"))?;
            let port = match after {
                "" => None,
                after => Some(
                    after
                        .strip_prefix(':')
                        .ok_or_else(|| Error::invalid_gateway(s, "invalid port"))?,
                ),
            };
            (host, port)
        } else {
            let (host, port) = match rest.split_once(':') {
                Some((host, port)) => (host, Some(port)),
                None => (rest, None),
            };
            if port.is_some_and(|port| port.contains(':')) {
                return Err(Error::invalid_gateway(s, "IPv6 host must be bracketed"));
            }
            (host, port)
        };

        if host.is_empty() {
            return Err(Error::invalid_gateway(s, "missing host"));
        }
        let port = match port {
            Some(port) => port
                .parse()
                .map_err(|_| Error::invalid_gateway(s, "invalid port"))?,
            None => DEFAULT_PORT,
        };

        Ok(Gateway::new(scheme, host, port))
    }
}

/// Response code and raw payload of one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub code: Code,
    pub payload: Vec<u8>,
}

impl Response {
    pub fn new(code: Code, payload: impl Into<Vec<u8>>) -> Self {
        Response {
            code,
            payload: payload.into(),
        }
    }
}

/// An open session with one gateway.
///
/// Implementations send exactly one request per call and never retry.
/// Payloads are JSON documents.
pub trait Transport: Send + Sync {
    /// Addressed read.
    fn get(&self, path: &str) -> impl Future<Output = Result<Response>> + Send;

    /// Addressed write replacing the given attributes.
    fn put(&self, path: &str, payload: &[u8]) -> impl Future<Output = Result<Response>> + Send;

    /// Addressed write creating or triggering something.
    fn post(&self, path: &str, payload: &[u8]) -> impl Future<Output = Result<Response>> + Send;
}

/// Opens [`Transport`] sessions.
pub trait Dialer: Send + Sync {
    type Session: Transport;

    /// Open a session authenticated as `identity` with the pre-shared key `psk`.
    fn dial(
        &self,
        gateway: &Gateway,
        identity: &str,
        psk: &str,
        timeout: Duration,
    ) -> impl Future<Output = Result<Self::Session>> + Send;
}

/// A connected datagram channel a CoAP session runs over.
pub trait Datagram: Send + Sync {
    fn send(&self, buf: &[u8]) -> impl Future<Output = io::Result<usize>> + Send;

    fn recv(&self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send;
}

impl Datagram for UdpSocket {
    fn send(&self, buf: &[u8]) -> impl Future<Output = io::Result<usize>> + Send {
        AsyncUdpSocket::send(self, buf)
    }

    fn recv(&self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send {
        AsyncUdpSocket::recv(self, buf)
    }
}

/// CoAP request/response exchanges over a [`Datagram`] channel.
///
/// One confirmable request per call. The answer may be piggybacked on the
/// acknowledgement or arrive separately, in which case it is acknowledged.
/// Nothing is retransmitted; the exchange fails once the timeout elapses.
pub struct CoapTransport<C> {
    channel: C,
    timeout: Duration,
}

/// Unsecured CoAP over UDP.
pub type PlainTransport = CoapTransport<UdpSocket>;

impl<C: Datagram> CoapTransport<C> {
    const RECV_BUFFER: usize = 4096;

    pub fn new(channel: C, timeout: Duration) -> Self {
        CoapTransport { channel, timeout }
    }

    async fn exchange(&self, request: Packet) -> Result<Response> {
        let path = coap::uri_path(&request);
        debug!("{:?} {path} ({} bytes)", request.header.code, request.payload.len());

        self.channel
            .send(&coap::encode(&request)?)
            .await
            .map_err(|e| Error::transport("send", e))?;

        let response = runtime::timeout(self.timeout, self.await_response(&request))
            .await
            .map_err(|_| Error::timeout("receive", self.timeout))??;

        debug!("{path} -> {}", response.code);
        trace!("payload: {}", String::from_utf8_lossy(&response.payload));
        Ok(response)
    }

    async fn await_response(&self, request: &Packet) -> Result<Response> {
        let mut buffer = vec![0u8; Self::RECV_BUFFER];

        loop {
            let bytes = self
                .channel
                .recv(&mut buffer)
                .await
                .map_err(|e| Error::transport("receive", e))?;

            let msg = match coap::decode(&buffer[..bytes]) {
                Ok(msg) => msg,
                Err(e) => {
                    debug!("dropping datagram: {e}");
                    continue;
                }
            };

            let kind = msg.header.get_type();
            let message_id = msg.header.message_id;
            let same_exchange = message_id == request.header.message_id;
            let same_token = msg.get_token() == request.get_token();
            let code = Code::from(msg.header.code);

            match kind {
                MessageType::Reset if same_exchange => {
                    return Err(Error::transport(
                        "receive",
                        io::Error::new(io::ErrorKind::ConnectionRefused, "request reset by peer"),
                    ));
                }
                // Empty ACK: the response arrives later as a separate message.
                MessageType::Acknowledgement if same_exchange && code.is_empty() => continue,
                _ => {}
            }

            if !same_token || code.is_empty() {
                continue;
            }

            if matches!(kind, MessageType::Confirmable) {
                self.channel
                    .send(&coap::encode(&coap::ack(message_id))?)
                    .await
                    .map_err(|e| Error::transport("send", e))?;
            }

            return Ok(Response::new(code, msg.payload));
        }
    }
}

impl PlainTransport {
    /// Open an unsecured session to `gateway`.
    pub async fn connect(gateway: &Gateway, timeout: Duration) -> Result<Self> {
        let socket = UdpSocket::bind(gateway.local_bind())
            .await
            .map_err(|e| Error::transport("bind", e))?;

        runtime::timeout(timeout, socket.connect(&gateway.authority()))
            .await
            .map_err(|_| Error::timeout("connect", timeout))?
            .map_err(|e| Error::transport("connect", e))?;

        Ok(CoapTransport::new(socket, timeout))
    }
}

impl<C: Datagram> Transport for CoapTransport<C> {
    async fn get(&self, path: &str) -> Result<Response> {
        self.exchange(coap::request(RequestType::Get, path, None))
            .await
    }

    async fn put(&self, path: &str, payload: &[u8]) -> Result<Response> {
        self.exchange(coap::request(RequestType::Put, path, Some(payload)))
            .await
    }

    async fn post(&self, path: &str, payload: &[u8]) -> Result<Response> {
        self.exchange(coap::request(RequestType::Post, path, Some(payload)))
            .await
    }
}

/// Dials unsecured CoAP sessions to `coap://` gateways.
///
/// There is nothing to authenticate with, so a non-empty pre-shared key is
/// refused instead of being dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainDialer;

impl Dialer for PlainDialer {
    type Session = PlainTransport;

    async fn dial(
        &self,
        gateway: &Gateway,
        identity: &str,
        psk: &str,
        timeout: Duration,
    ) -> Result<PlainTransport> {
        if gateway.scheme().is_secure() {
            return Err(Error::UnsupportedScheme(gateway.scheme().to_string()));
        }
        if !psk.is_empty() {
            return Err(Error::InsecureCredentials {
                gateway: gateway.to_string(),
            });
        }
        debug!("dialing {gateway} as {identity:?} without DTLS");
        PlainTransport::connect(gateway, timeout).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coap_lite::{MessageClass, ResponseType};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_gateway() {
        let gateway: Gateway = "udp://10.0.1.11:5864".parse().unwrap();
        assert_eq!(gateway, Gateway::new(Scheme::Udp, "10.0.1.11", 5864));
        assert_eq!(gateway.to_string(), "udp://10.0.1.11:5864");

        let gateway: Gateway = "COAPS://gateway.local/".parse().unwrap();
        assert_eq!(gateway.scheme(), Scheme::Coaps);
        assert_eq!(gateway.host(), "gateway.local");
        assert_eq!(gateway.port(), DEFAULT_PORT);

        let gateway: Gateway = "coap://[fe80::1]:5683".parse().unwrap();
        assert_eq!(gateway.host(), "fe80::1");
        assert_eq!(gateway.port(), 5683);
    }

    #[test]
    fn test_parse_gateway_errors() {
        assert!(matches!(
            "10.0.1.11:5684".parse::<Gateway>(),
            Err(Error::InvalidGateway { .. })
        ));
        assert!("http://10.0.1.11".parse::<Gateway>().is_err());
        assert!("udp://:5684".parse::<Gateway>().is_err());
        assert!("udp://10.0.1.11:port".parse::<Gateway>().is_err());
        assert!("udp://[fe80::1".parse::<Gateway>().is_err());
        assert!("udp://[fe80::1]5684".parse::<Gateway>().is_err());
    }

    #[test]
    fn test_unbracketed_ipv6_is_rejected() {
        for address in ["coaps://fe80::1", "udp://fe80::1:5684", "coap://::1"] {
            match address.parse::<Gateway>() {
                Err(Error::InvalidGateway { reason, .. }) => {
                    assert_eq!(reason, "IPv6 host must be bracketed", "{address}")
                }
                other => panic!("{address} parsed as {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_plain_dialer_refuses_secured_schemes() {
        for address in ["coaps://127.0.0.1", "udp://127.0.0.1"] {
            let gateway: Gateway = address.parse().unwrap();
            let result = PlainDialer.dial(&gateway, "", "", DEFAULT_TIMEOUT).await;
            assert!(matches!(result, Err(Error::UnsupportedScheme(_))), "{address}");
        }
    }

    #[tokio::test]
    async fn test_plain_dialer_refuses_credentials() {
        let gateway: Gateway = "coap://127.0.0.1".parse().unwrap();
        let result = PlainDialer
            .dial(&gateway, "lightctl", "right-key", DEFAULT_TIMEOUT)
            .await;
        assert!(matches!(result, Err(Error::InsecureCredentials { .. })));
    }

    fn content(request: &Packet, payload: &[u8]) -> Packet {
        let mut response = coap::ack(request.header.message_id);
        response.header.code = MessageClass::Response(ResponseType::Content);
        response.set_token(request.get_token().to_vec());
        response.payload = payload.to_vec();
        response
    }

    #[tokio::test]
    async fn test_piggybacked_response() {
        let peer = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = peer.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let (n, from) = peer.recv_from(&mut buf).await.unwrap();
            let request = coap::decode(&buf[..n]).unwrap();
            assert_eq!(coap::uri_path(&request), "/15001");

            let response = content(&request, b"[65537]");
            peer.send_to(&coap::encode(&response).unwrap(), from)
                .await
                .unwrap();
        });

        let gateway = Gateway::new(Scheme::Coap, "127.0.0.1", port);
        let transport = PlainDialer
            .dial(&gateway, "", "", DEFAULT_TIMEOUT)
            .await
            .unwrap();
        let response = transport.get("/15001").await.unwrap();
        assert_eq!(response, Response::new(Code::CONTENT, b"[65537]".to_vec()));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_separate_response_is_acknowledged() {
        let peer = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = peer.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let mut buf = [0u8; 1024];
            let (n, from) = peer.recv_from(&mut buf).await.unwrap();
            let request = coap::decode(&buf[..n]).unwrap();

            // empty ACK first, then the answer as its own confirmable message
            let empty = coap::ack(request.header.message_id);
            peer.send_to(&coap::encode(&empty).unwrap(), from)
                .await
                .unwrap();

            let mut response = content(&request, br#"{"9001":"Desk"}"#);
            response.header.set_type(MessageType::Confirmable);
            response.header.message_id = request.header.message_id.wrapping_add(1);
            peer.send_to(&coap::encode(&response).unwrap(), from)
                .await
                .unwrap();

            let (n, _) = peer.recv_from(&mut buf).await.unwrap();
            let ack = coap::decode(&buf[..n]).unwrap();
            assert!(matches!(ack.header.get_type(), MessageType::Acknowledgement));
            assert_eq!(ack.header.message_id, response.header.message_id);
            assert_eq!(Code::from(ack.header.code), Code::EMPTY);
        });

        let gateway = Gateway::new(Scheme::Coap, "127.0.0.1", port);
        let transport = PlainTransport::connect(&gateway, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        let response = transport.get("/15001/65537").await.unwrap();
        assert_eq!(response.code, Code::CONTENT);
        assert_eq!(response.payload, br#"{"9001":"Desk"}"#.to_vec());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_request_times_out() {
        let peer = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let port = peer.local_addr().unwrap().port();

        let gateway = Gateway::new(Scheme::Coap, "127.0.0.1", port);
        let transport = PlainTransport::connect(&gateway, Duration::from_millis(50))
            .await
            .unwrap();
        let err = transport.get("/15001").await.unwrap_err();
        assert!(err.is_transport_failure());
        assert!(matches!(err, Error::Timeout { .. }));
        drop(peer);
    }
}
