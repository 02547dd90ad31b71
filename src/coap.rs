//! Response codes and request packets.
//!
//! Framing is done by `coap-lite`; this module only builds the packets a
//! gateway client sends and reduces answers to a [`Code`].

use std::fmt;
use std::io;

use coap_lite::{CoapOption, ContentFormat, MessageClass, MessageType, Packet, RequestType};
use uuid::Uuid;

use crate::errors::Error;

type Result<T> = std::result::Result<T, Error>;

/// A response code, stored as `class << 5 | detail`.
///
/// # Examples
///
/// ```
/// use lightctl::Code;
///
/// assert!(Code::CONTENT.is_success());
/// assert!(!Code::NOT_FOUND.is_success());
/// assert_eq!(Code::NOT_FOUND.to_string(), "4.04");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(u8);

impl Code {
    pub const EMPTY: Code = Code::new(0, 0);
    pub const CREATED: Code = Code::new(2, 1);
    pub const CHANGED: Code = Code::new(2, 4);
    pub const CONTENT: Code = Code::new(2, 5);
    pub const BAD_REQUEST: Code = Code::new(4, 0);
    pub const UNAUTHORIZED: Code = Code::new(4, 1);
    pub const NOT_FOUND: Code = Code::new(4, 4);
    pub const METHOD_NOT_ALLOWED: Code = Code::new(4, 5);
    pub const INTERNAL_SERVER_ERROR: Code = Code::new(5, 0);
    pub const SERVICE_UNAVAILABLE: Code = Code::new(5, 3);

    pub const fn new(class: u8, detail: u8) -> Self {
        Code((class << 5) | (detail & 0x1f))
    }

    pub fn class(self) -> u8 {
        self.0 >> 5
    }

    pub fn detail(self) -> u8 {
        self.0 & 0x1f
    }

    pub fn raw(self) -> u8 {
        self.0
    }

    /// True for every 2.xx response.
    pub fn is_success(self) -> bool {
        self.class() == 2
    }

    pub fn is_empty(self) -> bool {
        self == Code::EMPTY
    }
}

impl From<u8> for Code {
    fn from(raw: u8) -> Self {
        Code(raw)
    }
}

impl From<MessageClass> for Code {
    fn from(class: MessageClass) -> Self {
        Code(u8::from(class))
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.class(), self.detail())
    }
}

/// A confirmable request for `path` with a fresh token and message ID.
///
/// A payload is always tagged `application/json`.
pub(crate) fn request(method: RequestType, path: &str, payload: Option<&[u8]>) -> Packet {
    let random = Uuid::new_v4();
    let bytes = random.as_bytes();

    let mut packet = Packet::new();
    packet.header.set_type(MessageType::Confirmable);
    packet.header.code = MessageClass::Request(method);
    packet.header.message_id = u16::from_be_bytes([bytes[0], bytes[1]]);
    packet.set_token(bytes[2..6].to_vec());
    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        packet.add_option(CoapOption::UriPath, segment.as_bytes().to_vec());
    }
    if let Some(payload) = payload {
        packet.set_content_format(ContentFormat::ApplicationJSON);
        packet.payload = payload.to_vec();
    }
    packet
}

/// The empty acknowledgement for a confirmable message.
pub(crate) fn ack(message_id: u16) -> Packet {
    let mut packet = Packet::new();
    packet.header.set_type(MessageType::Acknowledgement);
    packet.header.code = MessageClass::Empty;
    packet.header.message_id = message_id;
    packet
}

/// The path assembled from the Uri-Path options.
pub(crate) fn uri_path(packet: &Packet) -> String {
    let segments: Vec<String> = packet
        .get_option(CoapOption::UriPath)
        .map(|values| {
            values
                .iter()
                .map(|value| String::from_utf8_lossy(value).into_owned())
                .collect()
        })
        .unwrap_or_default();
    format!("/{}", segments.join("/"))
}

pub(crate) fn encode(packet: &Packet) -> Result<Vec<u8>> {
    packet.to_bytes().map_err(|e| {
        Error::transport(
            "encode",
            io::Error::new(io::ErrorKind::InvalidInput, format!("{e:?}")),
        )
    })
}

pub(crate) fn decode(datagram: &[u8]) -> Result<Packet> {
    Packet::from_bytes(datagram).map_err(|e| {
        Error::transport(
            "decode",
            io::Error::new(io::ErrorKind::InvalidData, format!("{e:?}")),
        )
    })
}
