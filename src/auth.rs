//! One-time exchange of a setup code for a pre-shared key.
//!
//! The setup code printed on the gateway only opens a bootstrap session.
//! Within it the client registers a username and receives a PSK, which is
//! then used for every later session together with that username.

use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::codec;
use crate::credentials::Credentials;
use crate::errors::Error;
use crate::transport::{Dialer, Gateway, Transport};

type Result<T> = std::result::Result<T, Error>;

/// Identity under which the bootstrap session is opened.
pub const BOOTSTRAP_IDENTITY: &str = "Client_identity";

/// Resource that issues pre-shared keys.
pub const AUTH_PATH: &str = "/15011/9063";

#[derive(Debug, Serialize)]
struct AuthRequest<'a> {
    #[serde(rename = "9090")]
    username: &'a str,
}

/// What the gateway answers a successful key request with.
#[derive(Default, Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AuthGrant {
    #[serde(rename = "9091")]
    psk: String,
    #[serde(rename = "9029")]
    firmware_version: String,
}

impl AuthGrant {
    pub fn psk(&self) -> &str {
        &self.psk
    }

    /// Gateway firmware, when reported alongside the key.
    pub fn firmware_version(&self) -> Option<&str> {
        (!self.firmware_version.is_empty()).then_some(self.firmware_version.as_str())
    }
}

/// Ask an open bootstrap session for a key issued to `username`.
pub async fn request_psk<T: Transport>(transport: &T, username: &str) -> Result<AuthGrant> {
    let request = AuthRequest { username };
    let response = transport.post(AUTH_PATH, &codec::encode(&request)?).await?;
    if !response.code.is_success() {
        return Err(Error::AuthenticationRejected {
            code: response.code,
        });
    }

    let grant: AuthGrant = codec::decode(AUTH_PATH, &response.payload)?;
    if grant.psk.is_empty() {
        return Err(Error::malformed(AUTH_PATH, "no pre-shared key issued"));
    }
    Ok(grant)
}

/// Exchange the gateway's setup code for credentials.
///
/// Opens a session as [`BOOTSTRAP_IDENTITY`] keyed by `setup_code`, requests
/// a key for `username` and returns the pair to store. A rejected request is
/// not retried.
///
/// ```ignore
/// let creds = lightctl::bootstrap(&dialer, &gateway, "lightctl", "ABCD1234EFGH5678", DEFAULT_TIMEOUT).await?;
/// ```
pub async fn bootstrap<D: Dialer>(
    dialer: &D,
    gateway: &Gateway,
    username: &str,
    setup_code: &str,
    timeout: Duration,
) -> Result<Credentials> {
    debug!("bootstrapping {username} against {gateway}");
    let session = dialer
        .dial(gateway, BOOTSTRAP_IDENTITY, setup_code, timeout)
        .await?;
    let grant = request_psk(&session, username).await?;

    if let Some(firmware) = grant.firmware_version() {
        debug!("gateway {gateway} runs firmware {firmware}");
    }
    Ok(Credentials::new(username, grant.psk()).with_gateway(gateway.clone()))
}
