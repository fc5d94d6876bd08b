//! Keyframed animation tracks.
//!
//! A track block on the wire:
//!
//! ```text
//! Translation 2 {
//!     Hermite,
//!     GlobalSeqId 0,
//!     0: { 0, 0, 0 },
//!         InTan { 0, 0, 0 },
//!         OutTan { 0, 0, 0 },
//!     1000: { 0, 0, 10 },
//!         InTan { 0, 0, 0 },
//!         OutTan { 0, 0, 0 },
//! }
//! ```
//!
//! Rotations are stored as [`glam::Quat`], which already uses (x, y, z, w)
//! order, so no reordering happens between the wire and memory. Colors are
//! stored as [`Rgb`] and reversed to (b, g, r) on the wire.

use std::fmt;

use glam::{Quat, Vec3};
use log::{trace, warn};

use crate::block::{Head, Item, whole_number};
use crate::error::{MdlError, Result};
use crate::geometry::Rgb;
use crate::writer::{MdlWriter, format_float, format_vector};

/// Interpolation between keyframes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    DontInterp,
    #[default]
    Linear,
    Hermite,
    Bezier,
}

impl Interpolation {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "DontInterp" => Some(Self::DontInterp),
            "Linear" => Some(Self::Linear),
            "Hermite" => Some(Self::Hermite),
            "Bezier" => Some(Self::Bezier),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::DontInterp => "DontInterp",
            Self::Linear => "Linear",
            Self::Hermite => "Hermite",
            Self::Bezier => "Bezier",
        }
    }

    /// Whether each key carries `InTan`/`OutTan`
    pub fn has_tangents(self) -> bool {
        matches!(self, Self::Hermite | Self::Bezier)
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

/// A value type that can live in an animation track
pub trait TrackValue: Copy + PartialEq + fmt::Debug {
    /// Number of numeric components on the wire
    const ARITY: usize;

    /// Build from wire components; `components.len() == ARITY`
    fn from_wire(components: &[f64]) -> Self;

    /// Wire text: a bare scalar or a brace-wrapped tuple
    fn to_wire(&self) -> String;

    /// Components in wire order, used for cubic sampling
    fn to_components(&self) -> [f32; 4];

    fn lerp(&self, other: &Self, t: f32) -> Self;

    /// Distance used by the keyframe optimizer
    fn deviation(&self, other: &Self) -> f32;

    /// How far the value is from unit length, for values that must be
    /// normalized
    fn unit_error(&self) -> f32 {
        0.0
    }

    fn is_finite(&self) -> bool {
        self.to_components()[..Self::ARITY]
            .iter()
            .all(|c| f32::is_finite(*c))
    }

    /// Hermite or Bezier segment from `p0` to `p1`
    fn cubic(interpolation: Interpolation, p0: &Self, out_tan: &Self, in_tan: &Self, p1: &Self, t: f32) -> Self {
        let (a, b, c, d) = (
            p0.to_components(),
            out_tan.to_components(),
            in_tan.to_components(),
            p1.to_components(),
        );
        let t2 = t * t;
        let t3 = t2 * t;
        let weights = if interpolation == Interpolation::Bezier {
            let inv = 1.0 - t;
            [inv * inv * inv, 3.0 * t * inv * inv, 3.0 * t2 * inv, t3]
        } else {
            [
                2.0 * t3 - 3.0 * t2 + 1.0,
                t3 - 2.0 * t2 + t,
                t3 - t2,
                -2.0 * t3 + 3.0 * t2,
            ]
        };
        let mut out = [0.0f64; 4];
        for i in 0..Self::ARITY {
            out[i] = f64::from(
                a[i] * weights[0] + b[i] * weights[1] + c[i] * weights[2] + d[i] * weights[3],
            );
        }
        Self::from_wire(&out[..Self::ARITY])
    }
}

impl TrackValue for f32 {
    const ARITY: usize = 1;

    fn from_wire(components: &[f64]) -> Self {
        components[0] as f32
    }

    fn to_wire(&self) -> String {
        format_float(*self)
    }

    fn to_components(&self) -> [f32; 4] {
        [*self, 0.0, 0.0, 0.0]
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }

    fn deviation(&self, other: &Self) -> f32 {
        (self - other).abs()
    }
}

/// Integer tracks (texture ids, texture slots) step between keys
impl TrackValue for u32 {
    const ARITY: usize = 1;

    fn from_wire(components: &[f64]) -> Self {
        components[0].round().max(0.0) as u32
    }

    fn to_wire(&self) -> String {
        self.to_string()
    }

    fn to_components(&self) -> [f32; 4] {
        [*self as f32, 0.0, 0.0, 0.0]
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        if t < 1.0 { *self } else { *other }
    }

    fn deviation(&self, other: &Self) -> f32 {
        self.abs_diff(*other) as f32
    }
}

impl TrackValue for Vec3 {
    const ARITY: usize = 3;

    fn from_wire(components: &[f64]) -> Self {
        Self::new(
            components[0] as f32,
            components[1] as f32,
            components[2] as f32,
        )
    }

    fn to_wire(&self) -> String {
        format_vector(&self.to_array())
    }

    fn to_components(&self) -> [f32; 4] {
        [self.x, self.y, self.z, 0.0]
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        Vec3::lerp(*self, *other, t)
    }

    fn deviation(&self, other: &Self) -> f32 {
        self.distance(*other)
    }
}

impl TrackValue for Quat {
    const ARITY: usize = 4;

    fn from_wire(components: &[f64]) -> Self {
        Self::from_xyzw(
            components[0] as f32,
            components[1] as f32,
            components[2] as f32,
            components[3] as f32,
        )
    }

    fn to_wire(&self) -> String {
        format_vector(&self.to_array())
    }

    fn to_components(&self) -> [f32; 4] {
        self.to_array()
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        self.slerp(*other, t)
    }

    fn unit_error(&self) -> f32 {
        (self.length() - 1.0).abs()
    }

    /// `1 - |dot|`, zero for identical orientations regardless of sign
    fn deviation(&self, other: &Self) -> f32 {
        (1.0 - self.dot(*other).abs()).max(0.0)
    }

    fn cubic(interpolation: Interpolation, p0: &Self, out_tan: &Self, in_tan: &Self, p1: &Self, t: f32) -> Self {
        let a = p0.to_array();
        let b = out_tan.to_array();
        let c = in_tan.to_array();
        let d = p1.to_array();
        let t2 = t * t;
        let t3 = t2 * t;
        let w = if interpolation == Interpolation::Bezier {
            let inv = 1.0 - t;
            [inv * inv * inv, 3.0 * t * inv * inv, 3.0 * t2 * inv, t3]
        } else {
            [
                2.0 * t3 - 3.0 * t2 + 1.0,
                t3 - 2.0 * t2 + t,
                t3 - t2,
                -2.0 * t3 + 3.0 * t2,
            ]
        };
        let mut out = [0.0f32; 4];
        for (i, o) in out.iter_mut().enumerate() {
            *o = a[i] * w[0] + b[i] * w[1] + c[i] * w[2] + d[i] * w[3];
        }
        let q = Self::from_array(out);
        if q.length_squared() > f32::EPSILON {
            q.normalize()
        } else {
            *p0
        }
    }
}

impl TrackValue for Rgb {
    const ARITY: usize = 3;

    fn from_wire(components: &[f64]) -> Self {
        Self::from_bgr([
            components[0] as f32,
            components[1] as f32,
            components[2] as f32,
        ])
    }

    fn to_wire(&self) -> String {
        format_vector(&self.to_bgr())
    }

    fn to_components(&self) -> [f32; 4] {
        let [b, g, r] = self.to_bgr();
        [b, g, r, 0.0]
    }

    fn lerp(&self, other: &Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    fn deviation(&self, other: &Self) -> f32 {
        Vec3::new(self.r, self.g, self.b).distance(Vec3::new(other.r, other.g, other.b))
    }
}

/// In/out tangents of a Hermite or Bezier key
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tangents<T> {
    pub in_tan: T,
    pub out_tan: T,
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Keyframe<T> {
    /// Milliseconds
    pub time: u32,
    pub value: T,
    pub tangents: Option<Tangents<T>>,
}

impl<T> Keyframe<T> {
    pub fn new(time: u32, value: T) -> Self {
        Self {
            time,
            value,
            tangents: None,
        }
    }

    pub fn with_tangents(time: u32, value: T, in_tan: T, out_tan: T) -> Self {
        Self {
            time,
            value,
            tangents: Some(Tangents { in_tan, out_tan }),
        }
    }
}

/// A keyframed property
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnimTrack<T> {
    pub interpolation: Interpolation,
    /// Index into the document's global sequences
    pub global_sequence: Option<usize>,
    pub keys: Vec<Keyframe<T>>,
}

impl<T> Default for AnimTrack<T> {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::Linear,
            global_sequence: None,
            keys: Vec::new(),
        }
    }
}

impl<T: TrackValue> AnimTrack<T> {
    pub fn new(interpolation: Interpolation) -> Self {
        Self {
            interpolation,
            global_sequence: None,
            keys: Vec::new(),
        }
    }

    /// Linear track from `(time, value)` pairs
    pub fn linear(keys: impl IntoIterator<Item = (u32, T)>) -> Self {
        Self {
            interpolation: Interpolation::Linear,
            global_sequence: None,
            keys: keys
                .into_iter()
                .map(|(time, value)| Keyframe::new(time, value))
                .collect(),
        }
    }

    pub fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key times strictly increase
    pub fn is_sorted(&self) -> bool {
        self.keys.windows(2).all(|w| w[0].time < w[1].time)
    }

    /// Order keys by time. Of several keys at the same time the first is kept.
    pub fn sort(&mut self) {
        self.keys.sort_by_key(|k| k.time);
        self.keys.dedup_by_key(|k| k.time);
    }

    /// Sample the track at `time` (milliseconds on the track's own clock).
    ///
    /// Times before the first key or after the last clamp to the end keys.
    pub fn value_at(&self, time: f32) -> Option<T> {
        let first = self.keys.first()?;
        if self.keys.len() == 1 || time <= first.time as f32 {
            return Some(first.value);
        }

        let idx = self.keys.partition_point(|k| k.time as f32 <= time);
        if idx >= self.keys.len() {
            return self.keys.last().map(|k| k.value);
        }
        let k0 = &self.keys[idx - 1];
        let k1 = &self.keys[idx];
        let span = k1.time.saturating_sub(k0.time) as f32;
        let t = if span > 0.0 {
            ((time - k0.time as f32) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };

        Some(match self.interpolation {
            Interpolation::DontInterp => k0.value,
            Interpolation::Linear => k0.value.lerp(&k1.value, t),
            Interpolation::Hermite | Interpolation::Bezier => match (&k0.tangents, &k1.tangents) {
                (Some(a), Some(b)) => {
                    T::cubic(self.interpolation, &k0.value, &a.out_tan, &b.in_tan, &k1.value, t)
                }
                _ => k0.value.lerp(&k1.value, t),
            },
        })
    }

    /// Decode the scope of `Keyword N { ... }`
    pub fn parse(item: &Item) -> Result<Self> {
        let declared = item.arg_usize(0)?;
        let children = item.children()?;
        let mut iter = children.iter().peekable();

        let interpolation = match iter.next() {
            Some(first) => first
                .keyword()
                .and_then(Interpolation::from_keyword)
                .ok_or_else(|| {
                    MdlError::structural(
                        first.pos,
                        "an interpolation type (DontInterp, Linear, Hermite, Bezier)",
                        first.label(),
                    )
                })?,
            None if declared == 0 => Interpolation::Linear,
            None => {
                return Err(MdlError::count_mismatch(item.pos, item.label(), declared, 0));
            }
        };

        let mut track = Self::new(interpolation);

        if let Some(next) = iter.peek()
            && next.is("GlobalSeqId")
        {
            track.global_sequence = Some(next.arg_usize(0)?);
            iter.next();
        }

        while let Some(child) = iter.next() {
            let Head::Frame(time) = child.head else {
                return Err(MdlError::structural(
                    child.pos,
                    format!("a keyframe in {}", item.label()),
                    child.label(),
                ));
            };
            let time = u32::try_from(time).map_err(|_| {
                MdlError::structural(child.pos, "a non-negative key time", time.to_string())
            })?;
            let value = read_value::<T>(child, &item.label())?;

            let tangents = if interpolation.has_tangents() {
                let in_tan = expect_tangent::<T>(iter.next(), "InTan", child, &item.label())?;
                let out_tan = expect_tangent::<T>(iter.next(), "OutTan", child, &item.label())?;
                Some(Tangents { in_tan, out_tan })
            } else {
                None
            };

            track.keys.push(Keyframe {
                time,
                value,
                tangents,
            });
        }

        if track.keys.len() != declared {
            return Err(MdlError::count_mismatch(
                item.pos,
                item.label(),
                declared,
                track.keys.len(),
            ));
        }

        if !track.is_sorted() {
            warn!(
                "{} track at {} has non-monotonic key times",
                item.label(),
                item.pos
            );
        }

        trace!(
            "{} track: {} {} keys{}",
            item.label(),
            declared,
            interpolation,
            track
                .global_sequence
                .map(|g| format!(", global sequence {g}"))
                .unwrap_or_default()
        );

        Ok(track)
    }

    /// Encode as `keyword N { ... }`
    pub fn write(&self, keyword: &str, w: &mut MdlWriter) {
        w.open(format!("{keyword} {}", self.keys.len()));
        w.field(self.interpolation.keyword());
        if let Some(gs) = self.global_sequence {
            w.int("GlobalSeqId", gs);
        }
        for key in &self.keys {
            w.field(format!("{}: {}", key.time, key.value.to_wire()));
            if self.interpolation.has_tangents() {
                let tangents = key.tangents.unwrap_or(Tangents {
                    in_tan: key.value,
                    out_tan: key.value,
                });
                w.nested_field(format!("InTan {}", tangents.in_tan.to_wire()));
                w.nested_field(format!("OutTan {}", tangents.out_tan.to_wire()));
            }
        }
        w.close();
    }
}

fn read_value<T: TrackValue>(item: &Item, context: &str) -> Result<T> {
    let components = item.arg_components(0)?;
    if components.len() != T::ARITY {
        return Err(MdlError::arity_mismatch(
            item.pos,
            context,
            T::ARITY,
            components.len(),
        ));
    }
    Ok(T::from_wire(&components))
}

fn expect_tangent<T: TrackValue>(
    item: Option<&Item>,
    keyword: &str,
    key: &Item,
    context: &str,
) -> Result<T> {
    match item {
        Some(i) if i.is(keyword) => read_value(i, context),
        Some(i) => Err(MdlError::structural(
            i.pos,
            format!("'{keyword}' after {}", key.head),
            i.label(),
        )),
        None => Err(MdlError::structural(
            key.pos,
            format!("'{keyword}' after {}", key.head),
            "'}'",
        )),
    }
}

/// A property that is either a constant or a keyframed track
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Animated<T> {
    Static(T),
    Track(AnimTrack<T>),
}

impl<T: TrackValue> Animated<T> {
    /// `static Keyword v,` / `Keyword v,` or `Keyword N { ... }`
    pub fn parse(item: &Item) -> Result<Self> {
        if item.is_block() {
            AnimTrack::parse(item).map(Self::Track)
        } else {
            read_value(item, &item.label()).map(Self::Static)
        }
    }

    pub fn write(&self, keyword: &str, w: &mut MdlWriter) {
        match self {
            Self::Static(v) => w.field(format!("static {keyword} {}", v.to_wire())),
            Self::Track(track) => track.write(keyword, w),
        }
    }

    /// Write only when animated or different from `default`
    pub fn write_unless(&self, keyword: &str, default: T, w: &mut MdlWriter) {
        if *self != Self::Static(default) {
            self.write(keyword, w);
        }
    }

    pub fn track(&self) -> Option<&AnimTrack<T>> {
        match self {
            Self::Track(t) => Some(t),
            Self::Static(_) => None,
        }
    }

    pub fn track_mut(&mut self) -> Option<&mut AnimTrack<T>> {
        match self {
            Self::Track(t) => Some(t),
            Self::Static(_) => None,
        }
    }

    /// Constant value, or the first key of a track
    pub fn initial(&self) -> Option<T> {
        match self {
            Self::Static(v) => Some(*v),
            Self::Track(t) => t.keys.first().map(|k| k.value),
        }
    }
}

impl<T: Default> Default for Animated<T> {
    fn default() -> Self {
        Self::Static(T::default())
    }
}

/// Event firing times (`EventTrack N { t0, t1, ... }`)
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EventTrack {
    pub global_sequence: Option<usize>,
    pub times: Vec<u32>,
}

impl EventTrack {
    pub fn parse(item: &Item) -> Result<Self> {
        let declared = item.arg_usize(0)?;
        let global_sequence = item
            .children_or_empty()
            .iter()
            .find(|c| c.is("GlobalSeqId"))
            .map(|c| c.arg_usize(0))
            .transpose()?;

        let times = item
            .flat_numbers()?
            .into_iter()
            .map(|t| whole_number(item.pos, "event times", t))
            .collect::<Result<Vec<_>>>()?;

        if times.len() != declared {
            return Err(MdlError::count_mismatch(
                item.pos,
                item.label(),
                declared,
                times.len(),
            ));
        }
        if !times.windows(2).all(|w| w[0] < w[1]) {
            warn!("EventTrack at {} has non-monotonic times", item.pos);
        }

        Ok(Self {
            global_sequence,
            times,
        })
    }

    pub fn write(&self, w: &mut MdlWriter) {
        w.open(format!("EventTrack {}", self.times.len()));
        if let Some(gs) = self.global_sequence {
            w.int("GlobalSeqId", gs);
        }
        for t in &self.times {
            w.field(t.to_string());
        }
        w.close();
    }

    pub fn is_sorted(&self) -> bool {
        self.times.windows(2).all(|w| w[0] < w[1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::parse_items;
    use pretty_assertions::assert_eq;

    fn first_item(src: &str) -> Item {
        parse_items(src.as_bytes()).unwrap().remove(0)
    }

    #[test]
    fn test_parse_linear_translation() {
        let item = first_item(
            "Translation 2 {\n\tLinear,\n\t0: { 0, 0, 0 },\n\t1000: { 0, 0, 10 },\n}",
        );
        let track = AnimTrack::<Vec3>::parse(&item).unwrap();
        assert_eq!(track.interpolation, Interpolation::Linear);
        assert_eq!(track.keys.len(), 2);
        assert_eq!(track.keys[1].value, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(track.value_at(500.0), Some(Vec3::new(0.0, 0.0, 5.0)));
    }

    #[test]
    fn test_parse_bezier_with_global_sequence() {
        let item = first_item(
            "Scaling 1 {\n\tBezier,\n\tGlobalSeqId 0,\n\t0: { 1, 1, 1 },\n\t\tInTan { 0.5, 0.5, 0.5 },\n\t\tOutTan { 2, 2, 2 },\n}",
        );
        let track = AnimTrack::<Vec3>::parse(&item).unwrap();
        assert_eq!(track.global_sequence, Some(0));
        let tangents = track.keys[0].tangents.unwrap();
        assert_eq!(tangents.in_tan, Vec3::splat(0.5));
        assert_eq!(tangents.out_tan, Vec3::splat(2.0));
    }

    #[test]
    fn test_unknown_interpolation() {
        let item = first_item("Alpha 1 {\n\tCubic,\n\t0: 1,\n}");
        let err = AnimTrack::<f32>::parse(&item).unwrap_err();
        assert!(matches!(err, MdlError::Structural { .. }));
    }

    #[test]
    fn test_key_count_mismatch() {
        let item = first_item("Alpha 3 {\n\tLinear,\n\t0: 1,\n\t100: 0,\n}");
        let err = AnimTrack::<f32>::parse(&item).unwrap_err();
        assert!(matches!(
            err,
            MdlError::CountMismatch {
                expected: 3,
                found: 2,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_tangent() {
        let item = first_item("Alpha 1 {\n\tHermite,\n\t0: 1,\n\t\tInTan 0,\n}");
        let err = AnimTrack::<f32>::parse(&item).unwrap_err();
        assert!(err.to_string().contains("OutTan"));
    }

    #[test]
    fn test_rotation_arity() {
        let item = first_item("Rotation 1 {\n\tLinear,\n\t0: { 0, 0, 1 },\n}");
        let err = AnimTrack::<Quat>::parse(&item).unwrap_err();
        assert!(matches!(
            err,
            MdlError::ArityMismatch {
                expected: 4,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn test_color_is_bgr_on_wire() {
        let item = first_item("static Color { 0.25, 0.5, 1 },");
        let color = Animated::<Rgb>::parse(&item).unwrap();
        assert_eq!(color, Animated::Static(Rgb::new(1.0, 0.5, 0.25)));

        let mut w = MdlWriter::new();
        color.write("Color", &mut w);
        assert_eq!(w.finish(), "static Color { 0.25, 0.5, 1 },\n");
    }

    #[test]
    fn test_write_hermite() {
        let mut track = AnimTrack::new(Interpolation::Hermite);
        track.keys.push(Keyframe::with_tangents(0, 1.0f32, 0.0, 0.5));
        let mut w = MdlWriter::new();
        track.write("Alpha", &mut w);
        assert_eq!(
            w.finish(),
            "Alpha 1 {\n\tHermite,\n\t0: 1,\n\t\tInTan 0,\n\t\tOutTan 0.5,\n}\n"
        );
    }

    #[test]
    fn test_sort_and_sample_dont_interp() {
        let mut track = AnimTrack::<u32>::new(Interpolation::DontInterp);
        track.keys = vec![Keyframe::new(100, 2), Keyframe::new(0, 1)];
        assert!(!track.is_sorted());
        track.sort();
        assert!(track.is_sorted());
        assert_eq!(track.value_at(50.0), Some(1));
        assert_eq!(track.value_at(150.0), Some(2));
    }

    #[test]
    fn test_slerp_midpoint_is_unit() {
        let track = AnimTrack::linear([
            (0, Quat::IDENTITY),
            (100, Quat::from_rotation_z(std::f32::consts::FRAC_PI_2)),
        ]);
        let mid = track.value_at(50.0).unwrap();
        assert!((mid.length() - 1.0).abs() < 1e-5);
        let expected = Quat::from_rotation_z(std::f32::consts::FRAC_PI_4);
        assert!(mid.deviation(&expected) < 1e-5);
    }

    #[test]
    fn test_event_track_forms() {
        let plain = first_item("EventTrack 2 {\n\t0,\n\t500,\n}");
        let track = EventTrack::parse(&plain).unwrap();
        assert_eq!(track.times, vec![0, 500]);

        let global = first_item("EventTrack 1 {\n\tGlobalSeqId 0,\n\t250,\n}");
        let track = EventTrack::parse(&global).unwrap();
        assert_eq!(track.global_sequence, Some(0));
        assert_eq!(track.times, vec![250]);
    }
}
