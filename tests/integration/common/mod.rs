//! Line-oriented SDP parser and encoder stand-ins for integration tests
//!
//! Only the lines the scenarios need are handled: v, o, s, c, m, a=rtpmap,
//! a=fmtp, a=ptime and the direction attributes.

#![allow(dead_code)]

use sdp_engine::{
    Attribute, Connection, Direction, Format, Media, MediaType, Origin, Parsed, SdpEncoder,
    SdpParser, Session,
};
use std::fmt;
use std::fmt::Write as _;

#[derive(Debug)]
pub struct ParseError(pub String);

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ParseError {}

pub struct LineParser;

impl SdpParser for LineParser {
    type Error = ParseError;

    fn parse(&self, text: &str) -> Result<Parsed, Self::Error> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        if lines.next() != Some("v=0") {
            return Err(ParseError("first line must be v=0".to_string()));
        }

        let mut session = Session::default();
        let mut warnings = Vec::new();

        for line in lines {
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| ParseError(format!("malformed line: {}", line)))?;
            match key {
                "o" => session.origin = parse_origin(value)?,
                "s" => session.name = value.to_string(),
                "c" => {
                    let address = value.rsplit(' ').next().unwrap_or_default();
                    let connection = Connection::ipv4(address);
                    match session.media.last_mut() {
                        Some(media) => media.connections.push(connection),
                        None => session.connection = Some(connection),
                    }
                }
                "m" => session.media.push(parse_media(value)?),
                "a" => apply_attribute(&mut session, value, &mut warnings)?,
                "t" => {}
                other => warnings.push(format!("ignored line type {}", other)),
            }
        }

        Ok(Parsed { session, warnings })
    }
}

fn parse_origin(value: &str) -> Result<Origin, ParseError> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() != 6 {
        return Err(ParseError(format!("malformed origin: {}", value)));
    }
    let number = |s: &str| {
        s.parse::<u64>()
            .map_err(|_| ParseError(format!("bad number in origin: {}", s)))
    };
    Ok(Origin {
        username: parts[0].to_string(),
        session_id: number(parts[1])?,
        session_version: number(parts[2])?,
        network_type: parts[3].to_string(),
        address_type: parts[4].to_string(),
        address: parts[5].to_string(),
    })
}

fn parse_media(value: &str) -> Result<Media, ParseError> {
    let parts: Vec<&str> = value.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(ParseError(format!("malformed media: {}", value)));
    }
    let port = parts[1]
        .parse::<u16>()
        .map_err(|_| ParseError(format!("bad port: {}", parts[1])))?;
    let mut media = Media::new(MediaType::from_token(parts[0]), port, parts[2]);

    if sdp_engine::session::is_rtp(&media.media_type, &media.proto) {
        for token in &parts[3..] {
            let payload = token
                .parse::<u8>()
                .map_err(|_| ParseError(format!("bad payload type: {}", token)))?;
            media.formats.push(Format::new(payload, "", 0, 0));
        }
    } else {
        media.format_descr = parts[3..].join(" ");
    }
    Ok(media)
}

fn apply_attribute(
    session: &mut Session,
    value: &str,
    warnings: &mut Vec<String>,
) -> Result<(), ParseError> {
    let (name, rest) = match value.split_once(':') {
        Some((name, rest)) => (name, Some(rest)),
        None => (value, None),
    };

    if let Some(direction) = Direction::from_attribute(name).filter(|d| d.is_specified()) {
        match session.media.last_mut() {
            Some(media) => media.mode = direction,
            None => session.mode = direction,
        }
        return Ok(());
    }

    let Some(media) = session.media.last_mut() else {
        session.attributes.push(attribute(name, rest));
        return Ok(());
    };

    match (name, rest) {
        ("rtpmap", Some(rest)) => {
            let (payload, encoding) = rest
                .split_once(' ')
                .ok_or_else(|| ParseError(format!("malformed rtpmap: {}", rest)))?;
            let payload = payload
                .parse::<u8>()
                .map_err(|_| ParseError(format!("bad rtpmap payload: {}", payload)))?;
            let mut fields = encoding.split('/');
            // omitted channel count means mono for audio
            let default_channels = if media.media_type == MediaType::Audio { 1 } else { 0 };
            let Some(format) = media.format_by_payload_mut(payload) else {
                warnings.push(format!("rtpmap for unlisted payload {}", payload));
                return Ok(());
            };
            format.name = fields.next().unwrap_or_default().to_string();
            format.clock_rate = fields.next().and_then(|c| c.parse().ok()).unwrap_or(0);
            format.channels = fields
                .next()
                .and_then(|c| c.parse().ok())
                .unwrap_or(default_channels);
        }
        ("fmtp", Some(rest)) => {
            let parsed = rest
                .split_once(' ')
                .and_then(|(pt, params)| pt.parse::<u8>().ok().map(|pt| (pt, params)));
            if let Some((payload, params)) = parsed {
                if let Some(format) = media.format_by_payload_mut(payload) {
                    format.params.push(params.to_string());
                }
            }
        }
        ("ptime", Some(rest)) => media.ptime = rest.parse().ok(),
        _ => media.attributes.push(attribute(name, rest)),
    }
    Ok(())
}

fn attribute(name: &str, value: Option<&str>) -> Attribute {
    match value {
        Some(value) => Attribute::new(name, value),
        None => Attribute::flag(name),
    }
}

pub struct LineEncoder;

impl SdpEncoder for LineEncoder {
    fn encode(&self, session: &Session) -> Vec<u8> {
        let mut out = String::new();
        let o = &session.origin;
        let _ = writeln!(out, "v={}", session.version);
        let _ = writeln!(
            out,
            "o={} {} {} {} {} {}",
            o.username, o.session_id, o.session_version, o.network_type, o.address_type, o.address
        );
        let _ = writeln!(out, "s={}", session.name);
        if let Some(c) = &session.connection {
            let _ = writeln!(out, "c={} {} {}", c.network_type, c.address_type, c.address);
        }
        let _ = writeln!(out, "t=0 0");
        if session.mode.is_specified() {
            let _ = writeln!(out, "a={}", session.mode);
        }

        for media in &session.media {
            let formats = if media.formats.is_empty() {
                media.format_descr.clone()
            } else {
                media
                    .payload_types()
                    .iter()
                    .map(u8::to_string)
                    .collect::<Vec<_>>()
                    .join(" ")
            };
            let _ = writeln!(
                out,
                "m={} {} {} {}",
                media.media_type, media.port, media.proto, formats
            );
            for c in &media.connections {
                let _ = writeln!(out, "c={} {} {}", c.network_type, c.address_type, c.address);
            }
            for f in &media.formats {
                if f.channels > 1 {
                    let _ = writeln!(out, "a=rtpmap:{} {}/{}/{}", f.payload, f.name, f.clock_rate, f.channels);
                } else {
                    let _ = writeln!(out, "a=rtpmap:{} {}/{}", f.payload, f.name, f.clock_rate);
                }
                for p in &f.params {
                    let _ = writeln!(out, "a=fmtp:{} {}", f.payload, p);
                }
            }
            if let Some(ptime) = media.ptime {
                let _ = writeln!(out, "a=ptime:{}", ptime);
            }
            for a in &media.attributes {
                match &a.value {
                    Some(v) => {
                        let _ = writeln!(out, "a={}:{}", a.name, v);
                    }
                    None => {
                        let _ = writeln!(out, "a={}", a.name);
                    }
                }
            }
            if media.mode.is_specified() {
                let _ = writeln!(out, "a={}", media.mode);
            }
        }
        out.into_bytes()
    }
}

/// Encode then parse again
pub fn round_trip(session: &Session) -> anyhow::Result<Session> {
    let text = String::from_utf8(LineEncoder.encode(session))?;
    Ok(sdp_engine::parse_with(&LineParser, &text)?.session)
}

/// Remote offer with audio, video and an application flow
pub fn remote_offer_text() -> &'static str {
    "v=0
o=- 3000 7 IN IP4 198.51.100.20
s=-
c=IN IP4 198.51.100.20
t=0 0
m=audio 30000 RTP/AVP 0 18 8 13 101
a=rtpmap:0 PCMU/8000
a=rtpmap:18 G729/8000
a=rtpmap:8 PCMA/8000
a=rtpmap:13 CN/8000
a=rtpmap:101 telephone-event/8000
a=fmtp:101 0-15
a=ptime:20
a=sendrecv
m=video 30002 RTP/AVP 103
a=rtpmap:103 H264/90000
m=application 30004 UDP/BFCP *
"
}
