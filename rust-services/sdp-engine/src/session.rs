//! SDP session description model (RFC 4566)
//!
//! Plain owned values: `Clone` is a deep copy and `PartialEq` is structural
//! equality, except that the origin's session version is never compared.
// Copyright 2025 Francisco F. Pinochet
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

use crate::direction::Direction;
use crate::media::Media;

/// Seconds between 1900-01-01 (NTP epoch) and 1970-01-01 (Unix epoch)
pub const NTP_UNIX_OFFSET_SECS: i64 = 2_208_988_800;

/// Transport protocol tokens of the m= line
pub mod proto {
    pub const RTP_AVP: &str = "RTP/AVP";
    pub const RTP_AVPF: &str = "RTP/AVPF";
    pub const RTP_SAVP: &str = "RTP/SAVP";
    pub const RTP_SAVPF: &str = "RTP/SAVPF";
    pub const UDP_TLS_RTP_SAVPF: &str = "UDP/TLS/RTP/SAVPF";
    pub const UDPTL: &str = "udptl";
    pub const TCP: &str = "TCP";
}

/// Whether a flow carries RTP (audio or video over an RTP profile)
pub fn is_rtp(media_type: &MediaType, proto: &str) -> bool {
    matches!(media_type, MediaType::Audio | MediaType::Video)
        && (proto.contains(proto::RTP_AVP) || proto.contains(proto::RTP_SAVP))
}

/// The instant SDP writes as time `0`
pub fn ntp_epoch() -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(-NTP_UNIX_OFFSET_SECS, 0).unwrap_or_default()
}

/// Media type of an m= line
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    #[default]
    Audio,
    Video,
    Text,
    Application,
    Message,
    Image,
    /// Any token not listed above, kept verbatim
    Other(String),
}

impl MediaType {
    pub fn from_token(token: &str) -> Self {
        match token {
            "audio" => MediaType::Audio,
            "video" => MediaType::Video,
            "text" => MediaType::Text,
            "application" => MediaType::Application,
            "message" => MediaType::Message,
            "image" => MediaType::Image,
            other => MediaType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            MediaType::Audio => "audio",
            MediaType::Video => "video",
            MediaType::Text => "text",
            MediaType::Application => "application",
            MediaType::Message => "message",
            MediaType::Image => "image",
            MediaType::Other(token) => token,
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SDP origin (o=)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Origin {
    /// Username, "-" when unused
    pub username: String,
    /// Session ID
    pub session_id: u64,
    /// Session version, increased on every re-offered change
    pub session_version: u64,
    /// Network type ("IN")
    pub network_type: String,
    /// Address type ("IP4"/"IP6")
    pub address_type: String,
    /// Unicast address
    pub address: String,
}

impl Origin {
    /// Increase the session version and return the new value
    pub fn next_version(&mut self) -> u64 {
        self.session_version = self.session_version.saturating_add(1);
        self.session_version
    }
}

// Renegotiation counters do not make two descriptions different.
impl PartialEq for Origin {
    fn eq(&self, other: &Self) -> bool {
        self.username == other.username
            && self.session_id == other.session_id
            && self.network_type == other.network_type
            && self.address_type == other.address_type
            && self.address == other.address
    }
}

impl Eq for Origin {}

/// Connection data (c=)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Connection {
    /// Network type ("IN")
    pub network_type: String,
    /// Address type ("IP4"/"IP6")
    pub address_type: String,
    /// Connection address
    pub address: String,
    /// Multicast TTL
    pub ttl: Option<u8>,
    /// Number of multicast addresses
    pub address_count: Option<u32>,
}

impl Connection {
    /// IN IP4 connection to `address`
    pub fn ipv4(address: impl Into<String>) -> Self {
        Connection {
            network_type: "IN".to_string(),
            address_type: "IP4".to_string(),
            address: address.into(),
            ttl: None,
            address_count: None,
        }
    }

    /// Empty or 0.0.0.0 addresses carry no media
    pub fn is_null_address(&self) -> bool {
        is_null_address(&self.address)
    }
}

pub(crate) fn is_null_address(address: &str) -> bool {
    address.is_empty() || address == "0.0.0.0"
}

/// Bandwidth (b=)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bandwidth {
    /// Modifier ("AS", "CT", "TIAS")
    pub bandwidth_type: String,
    /// Value in the unit of the modifier
    pub value: u64,
}

/// Time zone adjustment (z=)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeZone {
    /// When the adjustment takes effect
    pub adjustment: DateTime<Utc>,
    /// Offset applied from that instant, in seconds
    pub offset_secs: i64,
}

/// Encryption key (k=), stored opaquely
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Key {
    /// Method ("clear", "base64", "uri", "prompt")
    pub method: String,
    /// Key material
    pub value: Option<String>,
}

/// Session timing (t=)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timing {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
}

impl Timing {
    /// "t=0 0": permanent session
    pub fn unbounded() -> Self {
        Timing {
            start: ntp_epoch(),
            stop: ntp_epoch(),
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start == ntp_epoch() && self.stop == ntp_epoch()
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing::unbounded()
    }
}

/// Repeat times (r=)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Repeat {
    pub interval: Duration,
    pub duration: Duration,
    pub offsets: Vec<Duration>,
}

/// Attribute (a=); flag attributes have no value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: Option<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    pub fn flag(name: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: None,
        }
    }
}

/// Ordered attribute list; repeated names are legal
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub fn new() -> Self {
        Attributes(Vec::new())
    }

    /// Value of the first attribute called `name`; flags yield `""`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    /// Values of every attribute called `name`, in order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.0
            .iter()
            .filter(move |a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.iter().any(|a| a.name == name)
    }

    pub fn push(&mut self, attribute: Attribute) {
        self.0.push(attribute);
    }

    /// Remove every attribute called `name`; returns how many were removed
    pub fn delete(&mut self, name: &str) -> usize {
        let before = self.0.len();
        self.0.retain(|a| a.name != name);
        before - self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Attribute> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Attribute>> for Attributes {
    fn from(attributes: Vec<Attribute>) -> Self {
        Attributes(attributes)
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = std::slice::Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// SDP session description
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    /// Protocol version (v=)
    pub version: u32,
    /// Origin (o=)
    pub origin: Origin,
    /// Session name (s=)
    pub name: String,
    /// Session information (i=)
    pub information: Option<String>,
    /// URI (u=)
    pub uri: Option<String>,
    /// Email addresses (e=)
    pub emails: Vec<String>,
    /// Phone numbers (p=)
    pub phones: Vec<String>,
    /// Session-level connection (c=)
    pub connection: Option<Connection>,
    /// Bandwidth (b=)
    pub bandwidths: Vec<Bandwidth>,
    /// Time zones (z=)
    pub time_zones: Vec<TimeZone>,
    /// Encryption keys (k=)
    pub keys: Vec<Key>,
    /// Timing (t=)
    pub timing: Timing,
    /// Repeat times (r=)
    pub repeats: Vec<Repeat>,
    /// Session-level attributes, direction and ptime excluded
    pub attributes: Attributes,
    /// Session-level direction
    pub mode: Direction,
    /// Session-level packet time (ms)
    pub ptime: Option<u32>,
    /// Media descriptions, in m= line order
    pub media: Vec<Media>,
}

impl Session {
    /// First flow of the given type
    pub fn media_of(&self, media_type: &MediaType) -> Option<&Media> {
        self.media.iter().find(|m| &m.media_type == media_type)
    }

    pub fn media_of_mut(&mut self, media_type: &MediaType) -> Option<&mut Media> {
        self.media.iter_mut().find(|m| &m.media_type == media_type)
    }

    pub fn audio(&self) -> Option<&Media> {
        self.media_of(&MediaType::Audio)
    }

    pub fn audio_mut(&mut self) -> Option<&mut Media> {
        self.media_of_mut(&MediaType::Audio)
    }

    /// Increase the origin's session version and return the new value
    pub fn bump_version(&mut self) -> u64 {
        self.origin.next_version()
    }

    /// Remove every session-level attribute called `name`
    pub fn delete_attribute(&mut self, name: &str) -> usize {
        self.attributes.delete(name)
    }
}
