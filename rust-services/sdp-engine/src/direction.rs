//! Media direction negotiation (RFC 3264)
//!
//! Two pure functions drive every direction decision:
//! - [`next_local_directive`] turns a hold/resume intent into the direction
//!   the local side wants to request in its next offer.
//! - [`negotiate_answer_direction`] intersects that wish with what the peer
//!   declared: a side may only send if the peer receives, and may only
//!   receive if the peer sends.
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


use serde::{Deserialize, Serialize};
use std::fmt;

/// Streaming mode of a session or media flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// No direction attribute present; behaves as sendrecv
    #[default]
    Unspecified,
    /// a=sendrecv
    SendRecv,
    /// a=sendonly
    SendOnly,
    /// a=recvonly
    RecvOnly,
    /// a=inactive
    Inactive,
}

impl Direction {
    /// All concrete directions (excludes `Unspecified`)
    pub const ALL: [Direction; 4] = [
        Direction::SendRecv,
        Direction::SendOnly,
        Direction::RecvOnly,
        Direction::Inactive,
    ];

    /// Parse a direction attribute name. The empty string maps to `Unspecified`.
    pub fn from_attribute(name: &str) -> Option<Self> {
        match name {
            "" => Some(Direction::Unspecified),
            "sendrecv" => Some(Direction::SendRecv),
            "sendonly" => Some(Direction::SendOnly),
            "recvonly" => Some(Direction::RecvOnly),
            "inactive" => Some(Direction::Inactive),
            _ => None,
        }
    }

    /// Wire form; empty for `Unspecified`
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Unspecified => "",
            Direction::SendRecv => "sendrecv",
            Direction::SendOnly => "sendonly",
            Direction::RecvOnly => "recvonly",
            Direction::Inactive => "inactive",
        }
    }

    /// Missing direction defaults to sendrecv (RFC 4566 section 6)
    pub fn effective(self) -> Self {
        match self {
            Direction::Unspecified => Direction::SendRecv,
            other => other,
        }
    }

    pub fn is_specified(self) -> bool {
        self != Direction::Unspecified
    }

    /// Whether this side transmits media
    pub fn sends(self) -> bool {
        matches!(self.effective(), Direction::SendRecv | Direction::SendOnly)
    }

    /// Whether this side accepts media
    pub fn receives(self) -> bool {
        matches!(self.effective(), Direction::SendRecv | Direction::RecvOnly)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A direction that pauses local reception (sendonly or inactive)
pub fn is_holding(direction: Direction) -> bool {
    matches!(direction, Direction::SendOnly | Direction::Inactive)
}

/// Direction the local side requests when putting a call on hold or resuming it.
///
/// Returns `None` when the transition cannot be represented: holding an
/// already held flow (sendonly/inactive) or resuming a flow that was never
/// held locally (recvonly).
pub fn next_local_directive(current_local: Direction, put_on_hold: bool) -> Option<Direction> {
    if put_on_hold {
        match current_local {
            Direction::Unspecified | Direction::SendRecv => Some(Direction::SendOnly),
            Direction::RecvOnly => Some(Direction::Inactive),
            Direction::SendOnly | Direction::Inactive => None,
        }
    } else {
        match current_local {
            Direction::SendOnly => Some(Direction::SendRecv),
            Direction::Inactive => Some(Direction::RecvOnly),
            Direction::Unspecified | Direction::SendRecv => Some(Direction::SendRecv),
            Direction::RecvOnly => None,
        }
    }
}

/// Direction the local side may answer with, given its own directive and the
/// direction the remote side offered. Never returns `Unspecified`.
pub fn negotiate_answer_direction(local: Direction, remote: Direction) -> Direction {
    use Direction::*;

    match (remote.effective(), local.effective()) {
        (SendRecv, RecvOnly | SendRecv) => SendRecv,
        (SendRecv, Inactive | SendOnly) => SendOnly,
        (SendOnly, Inactive | RecvOnly | SendRecv) => RecvOnly,
        (RecvOnly, Inactive | SendOnly) => SendOnly,
        (RecvOnly, SendRecv) => SendRecv,
        _ => Inactive,
    }
}
