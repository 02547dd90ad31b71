//! Addressed reads and writes against a gateway.

use std::time::Duration;

use log::debug;
use serde::de::DeserializeOwned;

use crate::codec;
use crate::coap::Code;
use crate::credentials::Credentials;
use crate::device::Device;
use crate::errors::Error;
use crate::group::Group;
use crate::light_control::LightControlUpdate;
use crate::resource::Root;
use crate::transport::{Dialer, Gateway, Transport};
use crate::types::{Dimmer, Mireds, OnOff};

type Result<T> = std::result::Result<T, Error>;

/// Issues typed requests over one open [`Transport`] session.
///
/// Every call is a single round trip (or, for listings, a sequence of
/// them). Nothing is cached: each read decodes a fresh snapshot, and writes
/// are not read back.
///
/// # Example
///
/// ```ignore
/// use lightctl::{Client, Credentials, DtlsDialer, Gateway, Root, DEFAULT_TIMEOUT};
///
/// let gateway: Gateway = "coaps://10.0.1.11".parse()?;
/// let creds = Credentials::new("lightctl", "issued-psk");
/// let client = Client::connect(&DtlsDialer, &gateway, &creds, DEFAULT_TIMEOUT).await?;
///
/// for device in client.list_devices().await? {
///     println!("{}", device.summary());
/// }
/// client.set_light_state(Root::Groups, 131073, true).await?;
/// ```
pub struct Client<T> {
    transport: T,
}

impl<T: Transport> Client<T> {
    pub fn new(transport: T) -> Self {
        Client { transport }
    }

    /// Dial `gateway` with stored credentials and wrap the session.
    pub async fn connect<D>(
        dialer: &D,
        gateway: &Gateway,
        credentials: &Credentials,
        timeout: Duration,
    ) -> Result<Self>
    where
        D: Dialer<Session = T>,
    {
        let transport = dialer
            .dial(gateway, credentials.username(), credentials.psk(), timeout)
            .await?;
        Ok(Client::new(transport))
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub async fn get_device(&self, id: u32) -> Result<Device> {
        self.get_resource(&Root::Devices.item_path(id)).await
    }

    pub async fn get_group(&self, id: u32) -> Result<Group> {
        self.get_resource(&Root::Groups.item_path(id)).await
    }

    /// Fetch every device, one request at a time in listing order.
    ///
    /// Fails as a whole if any single fetch fails.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        let ids = self.list_ids(Root::Devices).await?;
        let mut devices = Vec::with_capacity(ids.len());
        for id in ids {
            devices.push(self.get_device(id).await?);
        }
        Ok(devices)
    }

    /// Fetch every group, one request at a time in listing order.
    ///
    /// Fails as a whole if any single fetch fails.
    pub async fn list_groups(&self) -> Result<Vec<Group>> {
        let ids = self.list_ids(Root::Groups).await?;
        let mut groups = Vec::with_capacity(ids.len());
        for id in ids {
            groups.push(self.get_group(id).await?);
        }
        Ok(groups)
    }

    /// IDs in a collection, in the order the gateway lists them.
    pub async fn list_ids(&self, root: Root) -> Result<Vec<u32>> {
        let path = root.path();
        let ids: Vec<u32> = self.get_resource(&path).await?;
        debug!("{root}: {} ids", ids.len());
        Ok(ids)
    }

    /// Undecoded payload of any addressed read.
    pub async fn get_raw(&self, path: &str) -> Result<Vec<u8>> {
        self.fetch(path).await
    }

    /// Send a partial light update to a device or group.
    ///
    /// The gateway's answer is only checked for success; the resulting
    /// light state is not verified.
    pub async fn set_light(&self, root: Root, id: u32, update: &LightControlUpdate) -> Result<()> {
        if !update.is_valid() {
            return Err(Error::NoAttribute);
        }

        let path = root.item_path(id);
        let payload = codec::encode(update)?;
        let response = self.transport.put(&path, &payload).await?;
        if !response.code.is_success() {
            return Err(Error::WriteRejected {
                path,
                code: response.code,
            });
        }
        Ok(())
    }

    pub async fn set_light_state(&self, root: Root, id: u32, on: bool) -> Result<()> {
        self.set_light(root, id, &LightControlUpdate::from(OnOff::from(on)))
            .await
    }

    pub async fn set_light_dimmer(
        &self,
        root: Root,
        id: u32,
        dimmer: Dimmer,
        transition: Duration,
    ) -> Result<()> {
        let mut update = LightControlUpdate::from(dimmer);
        update.transition(transition);
        self.set_light(root, id, &update).await
    }

    pub async fn set_light_color_temperature(
        &self,
        root: Root,
        id: u32,
        mireds: Mireds,
        transition: Duration,
    ) -> Result<()> {
        let mut update = LightControlUpdate::from(mireds);
        update.transition(transition);
        self.set_light(root, id, &update).await
    }

    async fn get_resource<R: DeserializeOwned>(&self, path: &str) -> Result<R> {
        let payload = self.fetch(path).await?;
        codec::decode(path, &payload)
    }

    async fn fetch(&self, path: &str) -> Result<Vec<u8>> {
        let response = self.transport.get(path).await?;
        match response.code {
            code if code.is_success() => Ok(response.payload),
            Code::NOT_FOUND => Err(Error::ResourceNotFound {
                path: path.to_string(),
            }),
            code => Err(Error::RequestFailed {
                path: path.to_string(),
                code,
            }),
        }
    }
}
