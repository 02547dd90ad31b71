//! Credentials issued by the gateway.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::transport::Gateway;

/// A username and the pre-shared key the gateway issued for it.
///
/// Serializes as `{"username": ..., "psk": ...}`, plus the address of the
/// gateway that issued the key when it is known. Where the document is
/// stored is up to the caller.
///
/// # Examples
///
/// ```
/// use lightctl::Credentials;
///
/// let creds: Credentials = serde_json::from_str(r#"{"username":"lightctl","psk":"s3cr3t"}"#).unwrap();
/// assert_eq!(creds.username(), "lightctl");
/// assert_eq!(creds.psk(), "s3cr3t");
/// assert!(!format!("{creds:?}").contains("s3cr3t"));
/// assert!(creds.gateway().is_none());
/// ```
#[serde_as]
#[serde_with::skip_serializing_none]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    username: String,
    psk: String,
    #[serde_as(as = "Option<DisplayFromStr>")]
    gateway: Option<Gateway>,
}

impl Credentials {
    pub fn new(username: &str, psk: &str) -> Self {
        Credentials {
            username: username.to_string(),
            psk: psk.to_string(),
            gateway: None,
        }
    }

    /// Remember which gateway issued the key.
    pub fn with_gateway(mut self, gateway: Gateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn psk(&self) -> &str {
        &self.psk
    }

    pub fn gateway(&self) -> Option<&Gateway> {
        self.gateway.as_ref()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("psk", &"<redacted>")
            .field("gateway", &self.gateway)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_gateway_is_optional() {
        let creds = Credentials::new("lightctl", "k");
        assert_eq!(
            serde_json::to_value(&creds).unwrap(),
            json!({"username": "lightctl", "psk": "k"})
        );

        let gateway: Gateway = "coaps://10.0.1.11".parse().unwrap();
        let creds = creds.with_gateway(gateway.clone());
        let value = serde_json::to_value(&creds).unwrap();
        assert_eq!(value["gateway"], "coaps://10.0.1.11:5684");

        let back: Credentials = serde_json::from_value(value).unwrap();
        assert_eq!(back.gateway(), Some(&gateway));
    }
}
