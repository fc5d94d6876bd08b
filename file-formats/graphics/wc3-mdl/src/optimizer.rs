//! Keyframe reduction for translation, rotation and scaling tracks.
//!
//! Each sequence is simplified on its own with a Douglas-Peucker pass: the
//! first and last keys inside the sequence are kept, and an interior key is
//! kept only when linear interpolation (slerp for rotations) between the
//! kept neighbours misses it by more than the tolerance. Keys outside every
//! sequence are never touched.

use log::{debug, info};

use crate::chunks::Sequence;
use crate::document::Document;
use crate::track::{AnimTrack, Interpolation, TrackValue};

/// Which tracks to simplify and how far a dropped key may deviate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizeOptions {
    /// Largest allowed deviation: distance for vectors, `1 - |dot|` for
    /// rotations
    pub tolerance: f32,
    pub translation: bool,
    pub rotation: bool,
    pub scaling: bool,
}

impl OptimizeOptions {
    /// All three track kinds with the given tolerance
    pub fn new(tolerance: f32) -> Self {
        Self {
            tolerance: tolerance.max(0.0),
            translation: true,
            rotation: true,
            scaling: true,
        }
    }
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self::new(1e-4)
    }
}

/// Key counts across the tracks the optimizer looked at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OptimizeReport {
    pub tracks: usize,
    pub tracks_changed: usize,
    pub keys_before: usize,
    pub keys_after: usize,
}

impl OptimizeReport {
    pub fn keys_removed(&self) -> usize {
        self.keys_before - self.keys_after
    }

    fn record<T: TrackValue>(&mut self, track: &mut AnimTrack<T>, sequences: &[Sequence], tolerance: f32) {
        self.tracks += 1;
        self.keys_before += track.key_count();
        if optimize_track(track, sequences, tolerance) {
            self.tracks_changed += 1;
        }
        self.keys_after += track.key_count();
    }
}

/// Simplify every node and texture animation track with `tolerance`
pub fn optimize(doc: &mut Document, tolerance: f32) -> OptimizeReport {
    optimize_with(doc, &OptimizeOptions::new(tolerance))
}

pub fn optimize_with(doc: &mut Document, options: &OptimizeOptions) -> OptimizeReport {
    let mut report = OptimizeReport::default();
    let tolerance = options.tolerance.max(0.0);
    let sequences = &doc.sequences;

    let headers = doc.nodes.iter_mut().map(|n| {
        let h = &mut n.header;
        (&mut h.translation, &mut h.rotation, &mut h.scaling)
    });
    let texture_anims = doc
        .texture_anims
        .iter_mut()
        .map(|a| (&mut a.translation, &mut a.rotation, &mut a.scaling));

    for (translation, rotation, scaling) in headers.chain(texture_anims) {
        if options.translation
            && let Some(track) = translation
        {
            report.record(track, sequences, tolerance);
        }
        if options.rotation
            && let Some(track) = rotation
        {
            report.record(track, sequences, tolerance);
        }
        if options.scaling
            && let Some(track) = scaling
        {
            report.record(track, sequences, tolerance);
        }
    }

    info!(
        "Optimized {} of {} tracks: {} keys down to {}",
        report.tracks_changed, report.tracks, report.keys_before, report.keys_after
    );
    report
}

/// Simplify one track against `sequences`. Returns whether the track
/// changed.
///
/// Global tracks, tracks with fewer than three keys, `DontInterp` tracks
/// and tracks with unsorted keys are left alone. Hermite and Bezier tracks
/// become linear first.
pub fn optimize_track<T: TrackValue>(
    track: &mut AnimTrack<T>,
    sequences: &[Sequence],
    tolerance: f32,
) -> bool {
    if track.global_sequence.is_some()
        || track.keys.len() < 3
        || track.interpolation == Interpolation::DontInterp
        || !track.is_sorted()
    {
        return false;
    }

    let mut changed = false;
    if track.interpolation.has_tangents() {
        track.interpolation = Interpolation::Linear;
        for key in &mut track.keys {
            key.tangents = None;
        }
        changed = true;
    }

    let keys = &track.keys;
    let mut in_sequence = vec![false; keys.len()];
    let mut anchors = vec![false; keys.len()];

    for sequence in sequences {
        let lo = keys.partition_point(|k| k.time < sequence.start);
        let hi = keys.partition_point(|k| k.time <= sequence.end);
        if hi <= lo {
            continue;
        }
        for flag in &mut in_sequence[lo..hi] {
            *flag = true;
        }
        anchors[lo] = true;
        anchors[hi - 1] = true;
    }
    // Keys outside every sequence stay, as do the ends of every sequence.
    // Spans between consecutive anchors are simplified independently, so a
    // dropped key is always measured against the neighbours it ends up with.
    let mut keep: Vec<bool> = anchors
        .iter()
        .zip(&in_sequence)
        .map(|(&anchor, &inside)| anchor || !inside)
        .collect();
    let kept: Vec<usize> = (0..keys.len()).filter(|&i| keep[i]).collect();
    let mut stack: Vec<(usize, usize)> = kept.windows(2).map(|w| (w[0], w[1])).collect();

    while let Some((a, b)) = stack.pop() {
        if b <= a + 1 {
            continue;
        }
        let (start, end) = (&keys[a], &keys[b]);
        let span = (end.time - start.time) as f32;
        let mut worst: Option<(usize, f32)> = None;
        for (k, key) in keys.iter().enumerate().take(b).skip(a + 1) {
            let t = ((key.time - start.time) as f32 / span).clamp(0.0, 1.0);
            let predicted = start.value.lerp(&end.value, t);
            let deviation = key.value.deviation(&predicted);
            if worst.is_none_or(|(_, d)| deviation > d) {
                worst = Some((k, deviation));
            }
        }
        if let Some((k, deviation)) = worst
            && deviation > tolerance
        {
            keep[k] = true;
            stack.push((a, k));
            stack.push((k, b));
        }
    }

    let before = track.keys.len();
    let mut flags = keep.into_iter();
    track.keys.retain(|_| flags.next().unwrap_or(true));
    let removed = before - track.keys.len();
    if removed > 0 {
        debug!("Track reduced from {before} to {} keys", track.keys.len());
    }
    changed || removed > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Keyframe;
    use glam::{Quat, Vec3};
    use pretty_assertions::assert_eq;

    fn straight_line(keys: u32) -> AnimTrack<Vec3> {
        AnimTrack::linear((0..keys).map(|i| (i * 100, Vec3::new(0.0, 0.0, i as f32))))
    }

    #[test]
    fn test_straight_line_keeps_endpoints() {
        let mut track = straight_line(11);
        let sequences = [Sequence::new("Walk", 0, 1000)];
        assert!(optimize_track(&mut track, &sequences, 1e-4));
        let times: Vec<u32> = track.keys.iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0, 1000]);
    }

    #[test]
    fn test_corner_is_kept() {
        let mut track = AnimTrack::linear([
            (0, Vec3::ZERO),
            (100, Vec3::new(1.0, 0.0, 0.0)),
            (200, Vec3::new(2.0, 0.0, 0.0)),
            (300, Vec3::new(2.0, 1.0, 0.0)),
            (400, Vec3::new(2.0, 2.0, 0.0)),
        ]);
        let sequences = [Sequence::new("Stand", 0, 400)];
        optimize_track(&mut track, &sequences, 0.01);
        let times: Vec<u32> = track.keys.iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0, 200, 400]);
    }

    #[test]
    fn test_sequence_boundaries_are_kept() {
        let mut track = straight_line(21);
        let sequences = [
            Sequence::new("Stand", 0, 1000),
            Sequence::new("Walk", 1100, 2000),
        ];
        optimize_track(&mut track, &sequences, 1e-4);
        let times: Vec<u32> = track.keys.iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0, 1000, 1100, 2000]);
    }

    /// Largest distance between a removed key and the reduced track
    fn worst_deviation(original: &AnimTrack<Vec3>, reduced: &AnimTrack<Vec3>) -> f32 {
        original
            .keys
            .iter()
            .filter_map(|k| Some(k.value.distance(reduced.value_at(k.time as f32)?)))
            .fold(0.0, f32::max)
    }

    #[test]
    fn test_overlapping_sequences_respect_tolerance() {
        let mut track = AnimTrack::linear((0..16u32).map(|i| {
            let y = match i {
                3 => -0.9,
                5 => 0.9,
                _ => 0.0,
            };
            (i * 100, Vec3::new(i as f32, y, 0.0))
        }));
        let original = track.clone();
        let sequences = [
            Sequence::new("A", 0, 1000),
            Sequence::new("B", 500, 1500),
        ];
        optimize_track(&mut track, &sequences, 1.0);

        let times: Vec<u32> = track.keys.iter().map(|k| k.time).collect();
        assert!(times.contains(&300), "{times:?}");
        assert!(worst_deviation(&original, &track) <= 1.0);
    }

    #[test]
    fn test_keys_outside_sequences_survive() {
        let mut track = straight_line(11);
        let sequences = [Sequence::new("Stand", 0, 500)];
        optimize_track(&mut track, &sequences, 1e-4);
        let times: Vec<u32> = track.keys.iter().map(|k| k.time).collect();
        assert_eq!(times, vec![0, 500, 600, 700, 800, 900, 1000]);
    }

    #[test]
    fn test_rotation_slerp() {
        let axis = Vec3::Z;
        let mut track = AnimTrack::linear(
            (0..5).map(|i| (i * 250, Quat::from_axis_angle(axis, i as f32 * 0.25))),
        );
        let sequences = [Sequence::new("Spin", 0, 1000)];
        optimize_track(&mut track, &sequences, 1e-5);
        assert_eq!(track.keys.len(), 2);
    }

    #[test]
    fn test_skipped_tracks() {
        let sequences = [Sequence::new("Stand", 0, 1000)];

        let mut global = straight_line(5);
        global.global_sequence = Some(0);
        assert!(!optimize_track(&mut global, &sequences, 1.0));
        assert_eq!(global.keys.len(), 5);

        let mut stepped = straight_line(5);
        stepped.interpolation = Interpolation::DontInterp;
        assert!(!optimize_track(&mut stepped, &sequences, 1.0));

        let mut unsorted = straight_line(5);
        unsorted.keys.swap(1, 2);
        assert!(!optimize_track(&mut unsorted, &sequences, 1.0));
        assert_eq!(unsorted.keys.len(), 5);
    }

    #[test]
    fn test_bezier_is_coerced() {
        let mut track = AnimTrack::new(Interpolation::Bezier);
        for i in 0..3u32 {
            let v = Vec3::splat(i as f32);
            track.keys.push(Keyframe::with_tangents(i * 10, v, v, v));
        }
        let sequences = [Sequence::new("Stand", 0, 20)];
        assert!(optimize_track(&mut track, &sequences, 1e-4));
        assert_eq!(track.interpolation, Interpolation::Linear);
        assert_eq!(track.keys.len(), 2);
        assert!(track.keys.iter().all(|k| k.tangents.is_none()));
    }
}
