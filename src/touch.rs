// touch.rs — turns raw touch / trackpad input into rig gesture signals

use panorama_tour::gesture::GestureEvent;
use std::collections::HashMap;
use winit::event::TouchPhase;

/// Below this finger distance (px) the spread ratio is meaningless.
const MIN_SPREAD_PX: f64 = 1.0;

/// Two-finger spread gesture.
///
/// The gesture starts when a second finger lands; every later move reports
/// the distance between the same two fingers over their distance at the
/// start. Extra fingers are ignored. When one of the pair lifts, the two
/// lowest remaining ids (if any) start a fresh gesture.
#[derive(Debug, Default)]
pub struct SpreadTracker {
    touches: HashMap<u64, (f64, f64)>,
    pair: Option<(u64, u64)>,
    start_spread: f64,
}

impl SpreadTracker {
    pub fn on_touch(&mut self, id: u64, phase: TouchPhase, x: f64, y: f64) -> Option<GestureEvent> {
        match phase {
            TouchPhase::Started => {
                self.touches.insert(id, (x, y));
                if self.pair.is_some() {
                    return None;
                }
                self.restart()
            }
            TouchPhase::Moved => {
                self.touches.insert(id, (x, y));
                let (a, b) = self.pair?;
                if id != a && id != b {
                    return None;
                }
                let current = self.spread(a, b)?;
                let multiplier =
                    (self.start_spread >= MIN_SPREAD_PX).then(|| (current / self.start_spread) as f32);
                Some(GestureEvent::Move { multiplier })
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.touches.remove(&id);
                match self.pair {
                    Some((a, b)) if id == a || id == b => {
                        self.pair = None;
                        self.restart()
                    }
                    _ => None,
                }
            }
        }
    }

    /// Picks the two lowest finger ids still down as the new pair.
    fn restart(&mut self) -> Option<GestureEvent> {
        let mut ids: Vec<u64> = self.touches.keys().copied().collect();
        ids.sort_unstable();
        let (a, b) = match *ids.as_slice() {
            [a, b, ..] => (a, b),
            _ => return None,
        };
        self.start_spread = self.spread(a, b)?;
        self.pair = Some((a, b));
        Some(GestureEvent::Start)
    }

    fn spread(&self, a: u64, b: u64) -> Option<f64> {
        let (ax, ay) = self.touches.get(&a)?;
        let (bx, by) = self.touches.get(&b)?;
        Some((ax - bx).hypot(ay - by))
    }
}

/// Trackpad magnify gesture, with per-event deltas folded into one running
/// multiplier.
#[derive(Debug, Default)]
pub struct MagnifyTracker {
    accumulated: Option<f64>,
}

impl MagnifyTracker {
    pub fn on_magnify(&mut self, delta: f64, phase: TouchPhase) -> Option<GestureEvent> {
        match phase {
            TouchPhase::Started => {
                self.accumulated = Some(1.0 + delta);
                Some(GestureEvent::Start)
            }
            TouchPhase::Moved => {
                let acc = self.accumulated.as_mut()?;
                *acc *= 1.0 + delta;
                Some(GestureEvent::Move {
                    multiplier: Some(*acc as f32),
                })
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                self.accumulated = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn multiplier(event: Option<GestureEvent>) -> f32 {
        match event {
            Some(GestureEvent::Move { multiplier: Some(m) }) => m,
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn second_finger_starts_gesture() {
        let mut t = SpreadTracker::default();
        assert_eq!(t.on_touch(1, TouchPhase::Started, 0.0, 0.0), None);
        assert_eq!(t.on_touch(2, TouchPhase::Started, 100.0, 0.0), Some(GestureEvent::Start));
        assert_relative_eq!(multiplier(t.on_touch(2, TouchPhase::Moved, 200.0, 0.0)), 2.0);
        assert_relative_eq!(multiplier(t.on_touch(1, TouchPhase::Moved, 150.0, 0.0)), 0.5);
    }

    #[test]
    fn lifting_a_finger_ends_tracking() {
        let mut t = SpreadTracker::default();
        t.on_touch(1, TouchPhase::Started, 0.0, 0.0);
        t.on_touch(2, TouchPhase::Started, 10.0, 0.0);
        t.on_touch(2, TouchPhase::Ended, 10.0, 0.0);
        assert_eq!(t.on_touch(1, TouchPhase::Moved, 5.0, 5.0), None);
    }

    #[test]
    fn third_finger_does_not_skew_spread() {
        let mut t = SpreadTracker::default();
        t.on_touch(1, TouchPhase::Started, 0.0, 0.0);
        assert_eq!(t.on_touch(2, TouchPhase::Started, 100.0, 0.0), Some(GestureEvent::Start));
        assert_eq!(t.on_touch(3, TouchPhase::Started, 1000.0, 0.0), None);
        assert_eq!(t.on_touch(3, TouchPhase::Moved, 2000.0, 0.0), None);
        assert_relative_eq!(multiplier(t.on_touch(2, TouchPhase::Moved, 100.0, 0.0)), 1.0);

        // fingers 2 and 3 take over with their own distance
        assert_eq!(t.on_touch(1, TouchPhase::Ended, 0.0, 0.0), Some(GestureEvent::Start));
        assert_relative_eq!(multiplier(t.on_touch(2, TouchPhase::Moved, 100.0, 0.0)), 1.0);
        assert_relative_eq!(multiplier(t.on_touch(3, TouchPhase::Moved, 3900.0, 0.0)), 2.0);
    }

    #[test]
    fn lifting_the_extra_finger_keeps_the_pair() {
        let mut t = SpreadTracker::default();
        t.on_touch(1, TouchPhase::Started, 0.0, 0.0);
        t.on_touch(2, TouchPhase::Started, 100.0, 0.0);
        t.on_touch(3, TouchPhase::Started, 500.0, 0.0);
        assert_eq!(t.on_touch(3, TouchPhase::Ended, 500.0, 0.0), None);
        assert_relative_eq!(multiplier(t.on_touch(1, TouchPhase::Moved, -100.0, 0.0)), 2.0);
    }

    #[test]
    fn coincident_fingers_give_neutral_move() {
        let mut t = SpreadTracker::default();
        t.on_touch(1, TouchPhase::Started, 3.0, 3.0);
        t.on_touch(2, TouchPhase::Started, 3.0, 3.0);
        assert_eq!(
            t.on_touch(2, TouchPhase::Moved, 50.0, 3.0),
            Some(GestureEvent::Move { multiplier: None })
        );
    }

    #[test]
    fn magnify_accumulates() {
        let mut m = MagnifyTracker::default();
        assert_eq!(m.on_magnify(0.0, TouchPhase::Started), Some(GestureEvent::Start));
        m.on_magnify(0.5, TouchPhase::Moved);
        assert_relative_eq!(multiplier(m.on_magnify(1.0, TouchPhase::Moved)), 3.0);
        assert_eq!(m.on_magnify(0.0, TouchPhase::Ended), None);
        assert_eq!(m.on_magnify(0.1, TouchPhase::Moved), None);
    }
}
