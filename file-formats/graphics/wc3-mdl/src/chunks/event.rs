//! Event objects and the `<TYPE><counter><ID>` naming schema

use std::fmt;
use std::str::FromStr;

use crate::block::Item;
use crate::error::Result;
use crate::track::EventTrack;
use crate::writer::MdlWriter;

/// Category of a game event, encoded as the name's 3-letter prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EventKind {
    /// `SND`
    Sound,
    /// `FTP`
    Footprint,
    /// `SPN`, spawned model
    Spawn,
    /// `SPL`
    Splat,
    /// `UBR`
    Ubersplat,
}

impl EventKind {
    pub const ALL: [Self; 5] = [
        Self::Sound,
        Self::Footprint,
        Self::Spawn,
        Self::Splat,
        Self::Ubersplat,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Self::Sound => "SND",
            Self::Footprint => "FTP",
            Self::Spawn => "SPN",
            Self::Splat => "SPL",
            Self::Ubersplat => "UBR",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.prefix() == prefix)
    }
}

/// A parsed event object name such as `SND0FOOT`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventName {
    pub kind: EventKind,
    pub counter: u32,
    /// Four-character code looked up in the per-kind event tables
    pub id: String,
}

impl EventName {
    pub fn new(kind: EventKind, counter: u32, id: impl Into<String>) -> Self {
        Self {
            kind,
            counter,
            id: id.into(),
        }
    }

    /// `None` for names that do not follow the schema
    pub fn parse(name: &str) -> Option<Self> {
        if !name.is_ascii() || name.len() < 8 {
            return None;
        }
        let kind = EventKind::from_prefix(&name[..3])?;
        let (counter, id) = name[3..].split_at(name.len() - 7);
        if !counter.bytes().all(|b| b.is_ascii_digit())
            || !id.bytes().all(|b| b.is_ascii_alphanumeric())
        {
            return None;
        }
        Some(Self {
            kind,
            counter: counter.parse().ok()?,
            id: id.to_string(),
        })
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.kind.prefix(), self.counter, self.id)
    }
}

impl FromStr for EventName {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or(())
    }
}

/// Payload of an `EventObject` node
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventObject {
    pub track: EventTrack,
}

impl EventObject {
    pub(crate) fn read(&mut self, item: &Item) -> Result<bool> {
        if item.is("EventTrack") {
            self.track = EventTrack::parse(item)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub(crate) fn write(&self, w: &mut MdlWriter) {
        if !self.track.times.is_empty() || self.track.global_sequence.is_some() {
            self.track.write(w);
        }
    }
}
