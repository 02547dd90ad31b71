//! # lightctl
//!
//! An async Rust library for controlling the lights behind a CoAP lighting
//! gateway (TRÅDFRI-style) on your local network.
//!
//! The gateway exposes devices and groups as numbered resources with
//! numeric-keyed JSON payloads. This crate reads them into typed records and
//! sends partial light updates back.
//!
//! ## Quick Start
//!
//! ```ignore
//! use lightctl::{Client, Credentials, DtlsDialer, Gateway, Intent, Root, DEFAULT_TIMEOUT};
//!
//! async fn dim_living_room() -> Result<(), lightctl::Error> {
//!     let gateway: Gateway = "udp://10.0.1.11".parse()?;
//!     let creds = Credentials::new("lightctl", "issued-psk");
//!     let client = Client::connect(&DtlsDialer, &gateway, &creds, DEFAULT_TIMEOUT).await?;
//!
//!     for group in client.list_groups().await? {
//!         println!("{}", group.summary());
//!     }
//!     Intent::Level(30)
//!         .apply(&client, Root::Groups, 131073, std::time::Duration::from_secs(1))
//!         .await
//! }
//! ```
//!
//! ## Features
//!
//! - **Authentication**: Trade the gateway's setup code for a pre-shared key with [`bootstrap`]
//! - **Devices and groups**: Typed snapshots with [`Device`] and [`Group`]
//! - **Partial updates**: Change only what you set with [`LightControlUpdate`]
//! - **Percent commands**: Level and white temperature with [`Intent`]
//! - **Secured sessions**: DTLS with a pre-shared key through `DtlsDialer`
//! - **Pluggable transport**: Bring your own session through [`Dialer`]
//!
//! ## Communication
//!
//! Requests are CoAP messages over UDP, port 5684 unless the gateway address
//! says otherwise. Gateways require DTLS with a pre-shared key, which is
//! what `udp://` and `coaps://` addresses mean. [`PlainDialer`] speaks
//! unsecured CoAP to `coap://` addresses and never carries credentials.
//!
//! ## Feature Flags
//!
//! - `runtime-tokio` (default): Use the tokio async runtime
//! - `dtls` (default): DTLS-PSK sessions through `DtlsDialer`

mod auth;
mod client;
pub mod coap;
pub mod codec;
mod credentials;
mod device;
#[cfg(feature = "dtls")]
mod dtls;
mod errors;
mod group;
mod intent;
mod light_control;
#[cfg(test)]
mod mock;
mod resource;
pub mod runtime;
pub mod transport;
mod types;

// Re-export public API
pub use auth::{AUTH_PATH, AuthGrant, BOOTSTRAP_IDENTITY, bootstrap, request_psk};
pub use client::Client;
pub use coap::Code;
pub use credentials::Credentials;
pub use device::{Device, DeviceInfo};
#[cfg(feature = "dtls")]
pub use dtls::{DtlsChannel, DtlsDialer, DtlsTransport, PSK_CIPHER_SUITES};
pub use errors::Error;
pub use group::Group;
pub use intent::{Intent, dimmer_for_level, mireds_for_white};
pub use light_control::{LightControl, LightControlUpdate};
pub use resource::{Resource, Root};
pub use transport::{
    CoapTransport, DEFAULT_PORT, DEFAULT_TIMEOUT, Datagram, Dialer, Gateway, PlainDialer,
    PlainTransport, Response, Scheme, Transport,
};
pub use types::{
    Dimmer, Mireds, OnOff, Percent, PowerSource, Timestamp, Transition, YesNo,
};
