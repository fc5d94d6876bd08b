use log::debug;

use super::{ExtentReader, skip_unknown, write_extent};
use crate::block::Item;
use crate::error::{MdlError, Result};
use crate::geometry::Extent;
use crate::writer::{MdlWriter, format_float};

/// A named animation (`Anim "Stand" { ... }`)
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sequence {
    /// Sequence name
    pub name: String,
    /// First frame in milliseconds
    pub start: u32,
    /// Last frame in milliseconds, inclusive
    pub end: u32,
    /// Plays once instead of looping
    pub non_looping: bool,
    /// Movement speed of the unit while playing
    pub move_speed: f32,
    /// Relative chance of being picked among same-named sequences
    pub rarity: f32,
    /// Bounds while playing
    pub extent: Extent,
}

impl Sequence {
    pub fn new(name: impl Into<String>, start: u32, end: u32) -> Self {
        Self {
            name: name.into(),
            start,
            end,
            ..Self::default()
        }
    }

    /// Length in milliseconds
    pub fn duration(&self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    pub fn contains(&self, time: u32) -> bool {
        (self.start..=self.end).contains(&time)
    }

    pub fn parse(item: &Item) -> Result<Self> {
        let name = item.arg_str(0)?.to_string();
        let mut interval = None;
        let mut sequence = Self {
            name,
            ..Self::default()
        };
        let mut extent = ExtentReader::default();

        for child in item.children()? {
            if extent.read(child)? {
                continue;
            }
            match child.keyword() {
                Some("Interval") => {
                    let [start, end] = child.arg_u32_vector::<2>(0)?;
                    interval = Some((start, end));
                }
                Some("NonLooping") => sequence.non_looping = true,
                Some("MoveSpeed") => sequence.move_speed = child.arg_f32(0)?,
                Some("Rarity") => sequence.rarity = child.arg_f32(0)?,
                _ => skip_unknown("Anim", child),
            }
        }

        let (start, end) = interval.ok_or_else(|| {
            MdlError::structural(
                item.pos,
                format!("'Interval' in sequence \"{}\"", sequence.name),
                "'}'",
            )
        })?;
        sequence.start = start;
        sequence.end = end;
        sequence.extent = extent.finish().unwrap_or_default();

        debug!(
            "Sequence \"{}\": [{}, {}]{}",
            sequence.name,
            start,
            end,
            if sequence.non_looping { " non-looping" } else { "" }
        );
        Ok(sequence)
    }

    pub fn write(&self, w: &mut MdlWriter) {
        w.open(format!("Anim \"{}\"", self.name));
        w.keyed("Interval", format!("{{ {}, {} }}", self.start, self.end));
        w.flag("NonLooping", self.non_looping);
        if self.move_speed != 0.0 {
            w.keyed("MoveSpeed", format_float(self.move_speed));
        }
        if self.rarity != 0.0 {
            w.keyed("Rarity", format_float(self.rarity));
        }
        write_extent(w, &self.extent);
        w.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::parse_items;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_anim() {
        let items = parse_items(
            b"Anim \"Walk\" {\n\tInterval { 3334, 4334 },\n\tNonLooping,\n\tMoveSpeed 270,\n\tMinimumExtent { -1, -1, 0 },\n\tMaximumExtent { 1, 1, 2 },\n\tBoundsRadius 1.5,\n}",
        )
        .unwrap();
        let seq = Sequence::parse(&items[0]).unwrap();
        assert_eq!(seq.name, "Walk");
        assert_eq!((seq.start, seq.end), (3334, 4334));
        assert!(seq.non_looping);
        assert_eq!(seq.move_speed, 270.0);
        assert_eq!(seq.extent.radius, 1.5);
        assert_eq!(seq.duration(), 1000);
    }

    #[test]
    fn test_interval_is_exact_integer() {
        let items = parse_items(b"Anim \"Long\" {\n\tInterval { 16777217, 4294967295 },\n}").unwrap();
        let seq = Sequence::parse(&items[0]).unwrap();
        assert_eq!((seq.start, seq.end), (16_777_217, u32::MAX));

        for bad in ["{ 0.5, 1000 }", "{ -1, 1000 }", "{ 0, 4294967296 }"] {
            let src = format!("Anim \"Bad\" {{\n\tInterval {bad},\n}}");
            let items = parse_items(src.as_bytes()).unwrap();
            assert!(matches!(
                Sequence::parse(&items[0]).unwrap_err(),
                MdlError::Structural { .. }
            ));
        }
    }

    #[test]
    fn test_missing_interval() {
        let items = parse_items(b"Anim \"Stand\" {\n\tRarity 1,\n}").unwrap();
        assert!(Sequence::parse(&items[0]).is_err());
    }

    #[test]
    fn test_write_minimal() {
        let mut w = MdlWriter::new();
        Sequence::new("Stand", 0, 3333).write(&mut w);
        assert_eq!(
            w.finish(),
            "Anim \"Stand\" {\n\tInterval { 0, 3333 },\n\tMinimumExtent { 0, 0, 0 },\n\tMaximumExtent { 0, 0, 0 },\n\tBoundsRadius 0,\n}\n"
        );
    }
}
