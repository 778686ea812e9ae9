//! Seams to the external collaborators: text parser, encoder and UDP
//! address resolver. The engine only relies on these contracts.
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


use std::io;
use std::net::{SocketAddr, ToSocketAddrs};
use tracing::debug;

use crate::error::{SdpEngineError, SdpEngineResult};
use crate::session::{MediaType, Session};

/// Parser output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub session: Session,
    /// Non-fatal issues found while parsing
    pub warnings: Vec<String>,
}

/// Turns SDP text into a [`Session`]
pub trait SdpParser {
    type Error: std::error::Error + Send + Sync + 'static;

    fn parse(&self, text: &str) -> Result<Parsed, Self::Error>;
}

/// Turns a [`Session`] into SDP text
pub trait SdpEncoder {
    fn encode(&self, session: &Session) -> Vec<u8>;
}

/// Resolves "ip:port" for a network such as "udp"
pub trait AddressResolver {
    fn resolve(&self, network: &str, address: &str) -> io::Result<SocketAddr>;
}

/// Run `parser`, wrapping its error as [`SdpEngineError::Parse`]
pub fn parse_with<P: SdpParser + ?Sized>(parser: &P, text: &str) -> SdpEngineResult<Parsed> {
    let parsed = parser
        .parse(text)
        .map_err(|err| SdpEngineError::Parse(Box::new(err)))?;
    if !parsed.warnings.is_empty() {
        debug!(warnings = ?parsed.warnings, "SDP parsed with warnings");
    }
    Ok(parsed)
}

/// Resolver backed by the operating system
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl AddressResolver for SystemResolver {
    fn resolve(&self, network: &str, address: &str) -> io::Result<SocketAddr> {
        let want_v4 = match network {
            "udp" => None,
            "udp4" => Some(true),
            "udp6" => Some(false),
            other => {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("unsupported network {}", other),
                ))
            }
        };

        address
            .to_socket_addrs()?
            .find(|addr| want_v4.map_or(true, |v4| addr.is_ipv4() == v4))
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("no {} address for {}", network, address),
                )
            })
    }
}

impl Session {
    /// UDP address where the flow of `media_type` receives media
    pub fn effective_media_addr<R: AddressResolver + ?Sized>(
        &self,
        media_type: &MediaType,
        resolver: &R,
    ) -> SdpEngineResult<SocketAddr> {
        let media = self
            .media_of(media_type)
            .ok_or_else(|| SdpEngineError::MediaFlowNotFound {
                media_type: media_type.to_string(),
            })?;
        let socket = self
            .effective_media_socket(media)
            .ok_or_else(|| SdpEngineError::NoUsableAddress {
                media_type: media_type.to_string(),
            })?;
        Ok(resolver.resolve("udp", &socket)?)
    }
}
