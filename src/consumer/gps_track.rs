//! GPS track accumulation.
//!
//! Track updates are deltas: each message adds new points and removes old
//! ones by id, so they are applied incrementally rather than replacing the
//! previous state.

use crate::message::GpsTrackPoint;
use std::collections::BTreeMap;

/// Points of the GPS track currently shown, keyed by point id.
#[derive(Debug, Default, Clone)]
pub struct GpsTrackPoints {
    points: BTreeMap<u32, GpsTrackPoint>,
}

impl GpsTrackPoints {
    /// Create an empty track.
    pub const fn new() -> Self {
        Self {
            points: BTreeMap::new(),
        }
    }

    /// Apply one delta. Removals run before additions, so a point both
    /// removed and re-added in the same delta survives.
    pub fn apply(&mut self, to_add: Vec<GpsTrackPoint>, to_remove: &[u32]) {
        for id in to_remove {
            self.points.remove(id);
        }
        self.points
            .extend(to_add.into_iter().map(|point| (point.id, point)));
    }

    /// Remove every point.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Point with `id`.
    pub fn get(&self, id: u32) -> Option<&GpsTrackPoint> {
        self.points.get(&id)
    }

    /// Points in id order.
    pub fn iter(&self) -> impl Iterator<Item = &GpsTrackPoint> {
        self.points.values()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the track is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::PointD;

    fn point(id: u32) -> GpsTrackPoint {
        GpsTrackPoint {
            id,
            point: PointD::new(f64::from(id), 0.0),
            speed: 1.5,
            timestamp: f64::from(id) * 10.0,
        }
    }

    #[test]
    fn test_deltas_accumulate() {
        let mut track = GpsTrackPoints::new();
        track.apply(vec![point(1), point(2)], &[]);
        track.apply(vec![point(3)], &[1]);

        let ids: Vec<u32> = track.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 3]);
        assert_eq!(track.get(3).map(|p| p.point.x), Some(3.0));
    }

    #[test]
    fn test_remove_then_add_same_id() {
        let mut track = GpsTrackPoints::new();
        track.apply(vec![point(1)], &[]);
        track.apply(vec![point(1)], &[1]);
        assert_eq!(track.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut track = GpsTrackPoints::new();
        track.apply(vec![point(1), point(2)], &[]);
        track.clear();
        assert!(track.is_empty());
        track.apply(Vec::new(), &[7]);
        assert!(track.is_empty());
    }
}
