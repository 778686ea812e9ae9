//! SDP negotiation engine
//!
//! In-memory offer/answer core for SIP and WebRTC signaling stacks:
//! - Session/media/format model with deep clone and structural equality
//! - Codec knowledge base and RTP payload sizes
//! - Format selection, filtering and preference ordering
//! - Direction negotiation including hold/resume
//! - Media flow alignment between offer and answer
//!
//! Parsing and encoding of SDP text, and address resolution, are left to
//! collaborators behind the traits in [`collab`].
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


pub mod error;
pub mod codecs;
pub mod payload;
pub mod direction;
pub mod session;
pub mod format;
pub mod media;
pub mod flows;
pub mod align;
pub mod builder;
pub mod answer;
pub mod collab;

// Re-export main types
pub use error::{SdpEngineError, SdpEngineResult};
pub use codecs::{
    codec_name, codec_names, describe_codec, describe_codec_by_name,
    identify_payload_type_by_name, CodecInfo, CodingFamily, MediaUse,
    SUPPORTED_CODECS, SUPPORTED_CODEC_NAMES,
};
pub use payload::compute_payload_size;
pub use direction::{is_holding, negotiate_answer_direction, next_local_directive, Direction};
pub use session::{
    Attribute, Attributes, Bandwidth, Connection, Key, MediaType, Origin, Repeat, Session,
    TimeZone, Timing,
};
pub use format::Format;
pub use media::Media;
pub use builder::{build_format, build_format_by_name, new_session, SessionBuilder};
pub use answer::{build_self_answer, Negotiator};
pub use collab::{parse_with, AddressResolver, Parsed, SdpEncoder, SdpParser, SystemResolver};
pub use sdp_config::NegotiationConfig;
