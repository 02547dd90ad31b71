//! DTLS-secured sessions with a gateway.
//!
//! Gateways only answer over DTLS with a pre-shared key. The key is the one
//! issued by [`crate::bootstrap`] and the PSK identity is the username it was
//! issued for.

use std::future::Future;
use std::io;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use tokio::net::UdpSocket;
use webrtc_dtls::cipher_suite::CipherSuiteId;
use webrtc_dtls::config::Config;
use webrtc_dtls::conn::DTLSConn;

use crate::errors::Error;
use crate::runtime;
use crate::transport::{CoapTransport, Datagram, Dialer, Gateway, Scheme};

type Result<T> = std::result::Result<T, Error>;

/// Cipher suites offered during the handshake.
pub const PSK_CIPHER_SUITES: [CipherSuiteId; 3] = [
    CipherSuiteId::Tls_Psk_With_Aes_128_Ccm,
    CipherSuiteId::Tls_Psk_With_Aes_128_Ccm_8,
    CipherSuiteId::Tls_Psk_With_Aes_128_Gcm_Sha256,
];

/// Handshake configuration for `identity` and `psk`.
pub(crate) fn psk_config(identity: &str, psk: &str) -> Config {
    let key = psk.as_bytes().to_vec();
    Config {
        psk: Some(Arc::new(move |_hint: &[u8]| {
            Ok::<_, webrtc_dtls::Error>(key.clone())
        })),
        psk_identity_hint: Some(identity.as_bytes().to_vec()),
        cipher_suites: PSK_CIPHER_SUITES.to_vec(),
        ..Default::default()
    }
}

fn dtls_error(e: webrtc_dtls::Error) -> io::Error {
    io::Error::other(e.to_string())
}

/// An established DTLS association over a connected UDP socket.
pub struct DtlsChannel(DTLSConn);

impl DtlsChannel {
    /// Run the client handshake with `gateway`.
    pub async fn handshake(gateway: &Gateway, identity: &str, psk: &str) -> Result<Self> {
        let socket = UdpSocket::bind(gateway.local_bind())
            .await
            .map_err(|e| Error::transport("bind", e))?;
        socket
            .connect(gateway.authority())
            .await
            .map_err(|e| Error::transport("connect", e))?;

        let conn = DTLSConn::new(Arc::new(socket), psk_config(identity, psk), true, None)
            .await
            .map_err(|e| Error::transport("handshake", dtls_error(e)))?;
        Ok(DtlsChannel(conn))
    }
}

impl Datagram for DtlsChannel {
    fn send(&self, buf: &[u8]) -> impl Future<Output = io::Result<usize>> + Send {
        async move { self.0.write(buf, None).await.map_err(dtls_error) }
    }

    fn recv(&self, buf: &mut [u8]) -> impl Future<Output = io::Result<usize>> + Send {
        async move { self.0.read(buf, None).await.map_err(dtls_error) }
    }
}

/// CoAP over DTLS.
pub type DtlsTransport = CoapTransport<DtlsChannel>;

/// Dials DTLS-PSK sessions to `udp://` and `coaps://` gateways.
///
/// # Examples
///
/// ```no_run
/// use lightctl::{Client, Credentials, DtlsDialer, Gateway, DEFAULT_TIMEOUT};
///
/// # async fn run() -> Result<(), lightctl::Error> {
/// let gateway: Gateway = "udp://10.0.1.11".parse()?;
/// let creds = Credentials::new("lightctl", "issued-psk");
/// let client = Client::connect(&DtlsDialer, &gateway, &creds, DEFAULT_TIMEOUT).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DtlsDialer;

impl Dialer for DtlsDialer {
    type Session = DtlsTransport;

    async fn dial(
        &self,
        gateway: &Gateway,
        identity: &str,
        psk: &str,
        timeout: Duration,
    ) -> Result<DtlsTransport> {
        if gateway.scheme() == Scheme::Coap {
            return Err(Error::UnsupportedScheme(gateway.scheme().to_string()));
        }
        debug!("dialing {gateway} as {identity:?}");

        let channel = runtime::timeout(timeout, DtlsChannel::handshake(gateway, identity, psk))
            .await
            .map_err(|_| Error::timeout("handshake", timeout))??;
        Ok(CoapTransport::new(channel, timeout))
    }
}
