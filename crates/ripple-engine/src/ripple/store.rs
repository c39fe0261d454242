use std::time::{Duration, Instant};

use crate::coords::Vec2;

use super::export::{ExportBlock, RippleRecord};

/// Ripple lifetime used when none is configured, in seconds.
pub const DEFAULT_TIME_TO_DIE: f32 = 10.0;

/// A single live ripple.
///
/// Age is never stored; it is derived from `spawned_at` on every export.
#[derive(Debug, Copy, Clone)]
struct Ripple {
    origin: Vec2,
    spawned_at: Instant,
}

impl Ripple {
    /// Time elapsed between spawn and `now`. Zero if `now` precedes the spawn.
    #[inline]
    fn elapsed_at(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.spawned_at)
    }
}

/// Tracks live ripples and feeds them to the fragment stage once per frame.
///
/// Ripples are kept in insertion order. A ripple survives an export while
/// `age < time_to_die`; once pruned it never comes back.
///
/// The store is single-threaded: `add` and `update_and_export` are expected to
/// run on the event-loop thread that also records GPU commands.
#[derive(Debug)]
pub struct RippleStore {
    ripples: Vec<Ripple>,

    /// Reused per export; holds the survivors of the last prune.
    records: Vec<RippleRecord>,

    time_to_die: f32,

    /// `time_to_die` as a `Duration`; survival is decided at this resolution.
    lifetime: Duration,
}

impl RippleStore {
    /// Creates an empty store whose ripples expire after `time_to_die` seconds.
    pub fn new(time_to_die: f32) -> Self {
        debug_assert!(
            time_to_die.is_finite() && time_to_die > 0.0,
            "time_to_die must be a positive number of seconds, got {time_to_die}"
        );

        Self {
            ripples: Vec::new(),
            records: Vec::new(),
            time_to_die,
            lifetime: Duration::try_from_secs_f32(time_to_die).unwrap_or(Duration::ZERO),
        }
    }

    #[inline]
    pub fn time_to_die(&self) -> f32 {
        self.time_to_die
    }

    /// Number of ripples currently held (including any that expired since the
    /// last export).
    #[inline]
    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    /// Spawns a ripple at `origin` (UV space) now.
    pub fn add(&mut self, origin: Vec2) {
        self.add_at(origin, Instant::now());
    }

    /// Spawns a ripple at `origin` with an explicit spawn timestamp.
    pub fn add_at(&mut self, origin: Vec2, now: Instant) {
        debug_assert!(origin.is_finite(), "ripple origin must be finite: {origin:?}");

        log::debug!("ripple spawned at ({:.3}, {:.3})", origin.x, origin.y);
        self.ripples.push(Ripple {
            origin,
            spawned_at: now,
        });
    }

    /// Drops every ripple.
    pub fn clear(&mut self) {
        self.ripples.clear();
        self.records.clear();
    }

    /// Ages, prunes, and exports the live set against the current time.
    pub fn update_and_export(&mut self) -> ExportBlock<'_> {
        self.update_and_export_at(Instant::now())
    }

    /// Ages every ripple against `now`, removes those with `age >= time_to_die`,
    /// and exports exactly the survivors.
    ///
    /// Survival compares the exact elapsed `Duration`, so a ripple a few
    /// nanoseconds short of its lifetime is kept even when its `f32` age
    /// rounds up to `time_to_die`.
    pub fn update_and_export_at(&mut self, now: Instant) -> ExportBlock<'_> {
        let (time_to_die, lifetime) = (self.time_to_die, self.lifetime);
        let records = &mut self.records;
        records.clear();

        let before = self.ripples.len();
        self.ripples.retain(|ripple| {
            let elapsed = ripple.elapsed_at(now);
            if elapsed < lifetime {
                let age = elapsed.as_secs_f32();
                records.push(RippleRecord::new(age, ripple.origin.to_array()));
                true
            } else {
                false
            }
        });

        let pruned = before - self.ripples.len();
        if pruned > 0 {
            log::trace!("pruned {pruned} expired ripple(s), {} live", self.ripples.len());
        }

        ExportBlock::new(&self.records, time_to_die)
    }
}

impl Default for RippleStore {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_TO_DIE)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::ripple::PLACEHOLDER_RECORD;

    fn secs(s: f32) -> Duration {
        Duration::from_secs_f32(s)
    }

    // ── lifecycle ─────────────────────────────────────────────────────────

    #[test]
    fn fresh_ripple_survives_immediate_export() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.5, 0.5), t0);

        let block = store.update_and_export_at(t0);
        assert_eq!(block.count(), 1);
        assert_eq!(block.records(), &[RippleRecord::new(0.0, [0.5, 0.5])]);
    }

    #[test]
    fn add_then_export_with_wall_clock() {
        let mut store = RippleStore::default();
        store.add(Vec2::new(0.5, 0.5));

        let block = store.update_and_export();
        assert_eq!(block.count(), 1);
        assert_eq!(block.survivors()[0].origin, [0.5, 0.5]);
        assert!(block.survivors()[0].age < 1.0);
    }

    #[test]
    fn expired_ripple_is_pruned_for_good() {
        let mut store = RippleStore::new(2.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.1, 0.1), t0);

        assert!(store.update_and_export_at(t0 + secs(3.0)).is_empty());
        assert!(store.is_empty());

        // A later export cannot bring it back.
        let block = store.update_and_export_at(t0 + secs(1.0));
        assert_eq!(block.count(), 0);
        assert_eq!(block.records(), &[PLACEHOLDER_RECORD]);
    }

    #[test]
    fn age_equal_to_lifetime_is_pruned() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.3, 0.3), t0);

        let block = store.update_and_export_at(t0 + Duration::from_secs(10));
        assert_eq!(block.count(), 0);
    }

    #[test]
    fn age_just_below_lifetime_survives() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.3, 0.3), t0);

        let block = store.update_and_export_at(t0 + Duration::from_millis(9_999));
        assert_eq!(block.count(), 1);
        assert_abs_diff_eq!(block.survivors()[0].age, 9.999, epsilon = 1e-4);
    }

    #[test]
    fn nanoseconds_short_of_lifetime_still_survive() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.3, 0.3), t0);

        // 100ns is below f32 resolution at 10s; the age rounds to 10.0.
        let almost = t0 + Duration::from_secs(10) - Duration::from_nanos(100);
        let block = store.update_and_export_at(almost);
        assert_eq!(block.count(), 1);
        assert_abs_diff_eq!(block.survivors()[0].age, 10.0, epsilon = 1e-5);

        assert!(store.update_and_export_at(t0 + Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn empty_store_exports_placeholder() {
        let mut store = RippleStore::new(10.0);
        let block = store.update_and_export();

        assert_eq!(block.count(), 0);
        assert_eq!(block.records().len(), 1);
        assert_eq!(block.records()[0], RippleRecord::new(0.0, [0.0, 0.0]));
        assert_eq!(block.time_to_die(), 10.0);
    }

    #[test]
    fn clear_drops_everything() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.1, 0.2), t0);
        store.add_at(Vec2::new(0.3, 0.4), t0);
        store.clear();

        assert!(store.is_empty());
        assert_eq!(store.update_and_export_at(t0).count(), 0);
    }

    // ── ages ──────────────────────────────────────────────────────────────

    #[test]
    fn ages_are_per_ripple() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.1, 0.1), t0);
        store.add_at(Vec2::new(0.9, 0.9), t0 + secs(2.0));
        store.add_at(Vec2::new(0.5, 0.5), t0 + secs(5.0));

        let block = store.update_and_export_at(t0 + secs(6.0));
        let ages: Vec<f32> = block.survivors().iter().map(|r| r.age).collect();

        assert_eq!(ages.len(), 3);
        assert_abs_diff_eq!(ages[0], 6.0, epsilon = 1e-4);
        assert_abs_diff_eq!(ages[1], 4.0, epsilon = 1e-4);
        assert_abs_diff_eq!(ages[2], 1.0, epsilon = 1e-4);
    }

    #[test]
    fn ages_never_decrease_between_exports() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.4, 0.6), t0);
        store.add_at(Vec2::new(0.6, 0.4), t0 + secs(1.0));

        let first: Vec<f32> = store
            .update_and_export_at(t0 + secs(2.0))
            .survivors()
            .iter()
            .map(|r| r.age)
            .collect();
        let second: Vec<f32> = store
            .update_and_export_at(t0 + secs(2.0))
            .survivors()
            .iter()
            .map(|r| r.age)
            .collect();
        let third: Vec<f32> = store
            .update_and_export_at(t0 + secs(2.5))
            .survivors()
            .iter()
            .map(|r| r.age)
            .collect();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
        for (a, b) in second.iter().zip(&third) {
            assert!(b >= a);
        }
    }

    #[test]
    fn clock_before_spawn_reads_zero_age() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.5, 0.5), t0 + secs(1.0));

        let block = store.update_and_export_at(t0);
        assert_eq!(block.count(), 1);
        assert_eq!(block.survivors()[0].age, 0.0);
    }

    #[test]
    fn only_expired_ripples_are_removed() {
        let mut store = RippleStore::new(5.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.1, 0.1), t0);
        store.add_at(Vec2::new(0.2, 0.2), t0 + secs(3.0));
        store.add_at(Vec2::new(0.3, 0.3), t0 + secs(1.0));

        let block = store.update_and_export_at(t0 + secs(5.5));
        let origins: Vec<[f32; 2]> = block.survivors().iter().map(|r| r.origin).collect();

        assert_eq!(block.count(), 2);
        assert_eq!(origins, vec![[0.2, 0.2], [0.3, 0.3]]);
        assert_eq!(store.len(), 2);
    }

    // ── scenarios ─────────────────────────────────────────────────────────

    #[test]
    fn single_ripple_lives_then_dies() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.5, 0.5), t0);

        let block = store.update_and_export_at(t0 + secs(5.0));
        assert_eq!(block.count(), 1);
        assert_abs_diff_eq!(block.survivors()[0].age, 5.0, epsilon = 1e-4);

        let block = store.update_and_export_at(t0 + secs(11.0));
        assert_eq!(block.count(), 0);
        assert_eq!(block.to_words(), vec![0.0, 0.0, 0.0, 0.0, 10.0]);
    }

    #[test]
    fn two_ripples_keep_order_and_origins() {
        let mut store = RippleStore::new(10.0);
        let t0 = Instant::now();
        store.add_at(Vec2::new(0.5, 0.5), t0);
        store.add_at(Vec2::new(0.2, 0.8), t0 + secs(3.0));

        let block = store.update_and_export_at(t0 + secs(4.0));
        let survivors = block.survivors();

        assert_eq!(block.count(), 2);
        assert_abs_diff_eq!(survivors[0].age, 4.0, epsilon = 1e-4);
        assert_abs_diff_eq!(survivors[1].age, 1.0, epsilon = 1e-4);
        assert_eq!(survivors[0].origin, [0.5, 0.5]);
        assert_eq!(survivors[1].origin, [0.2, 0.8]);
    }
}
