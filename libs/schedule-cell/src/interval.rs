// libs/schedule-cell/src/interval.rs
//
// Half-open UTC interval arithmetic backing the availability resolver and the
// commit-time conflict check.

use chrono::{DateTime, Utc};

/// A `[start, end)` interval on a professional's timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Interval {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Half-open overlap: exact abutment (`a.end == b.start`) does not count.
    pub fn overlaps(&self, other: &Interval) -> bool {
        self.start < other.end && other.start < self.end
    }

    pub fn contains(&self, other: &Interval) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Sort and coalesce a busy set. Abutting intervals are merged as well; the
/// union is unchanged and the merged set stays pairwise disjoint.
pub fn merge_intervals(mut intervals: Vec<Interval>) -> Vec<Interval> {
    intervals.retain(|iv| !iv.is_empty());
    if intervals.is_empty() {
        return intervals;
    }

    intervals.sort_by_key(|iv| iv.start);

    let mut merged: Vec<Interval> = Vec::with_capacity(intervals.len());
    for interval in intervals {
        match merged.last_mut() {
            Some(last) if interval.start <= last.end => {
                if interval.end > last.end {
                    last.end = interval.end;
                }
            }
            _ => merged.push(interval),
        }
    }

    merged
}

/// True when `candidate` intersects any interval of a merged, sorted busy set.
pub fn intersects_any(candidate: &Interval, busy: &[Interval]) -> bool {
    // Busy set is sorted; a binary search would do, but busy sets here are a
    // handful of entries per day.
    busy.iter().any(|iv| iv.overlaps(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 16, h, m, 0).unwrap()
    }

    fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> Interval {
        Interval::new(at(sh, sm), at(eh, em))
    }

    #[test]
    fn abutting_intervals_do_not_overlap() {
        assert!(!iv(9, 0, 10, 0).overlaps(&iv(10, 0, 11, 0)));
        assert!(!iv(10, 0, 11, 0).overlaps(&iv(9, 0, 10, 0)));
    }

    #[test]
    fn partial_overlap_is_detected() {
        assert!(iv(9, 0, 10, 30).overlaps(&iv(10, 0, 11, 0)));
        assert!(iv(10, 0, 11, 0).overlaps(&iv(9, 0, 10, 30)));
    }

    #[test]
    fn containment_is_overlap() {
        assert!(iv(9, 0, 12, 0).overlaps(&iv(10, 0, 11, 0)));
    }

    #[test]
    fn merge_coalesces_overlapping_and_abutting() {
        let merged = merge_intervals(vec![
            iv(13, 0, 14, 0),
            iv(9, 0, 10, 0),
            iv(10, 0, 10, 30),
            iv(9, 30, 9, 45),
        ]);
        assert_eq!(merged, vec![iv(9, 0, 10, 30), iv(13, 0, 14, 0)]);
    }

    #[test]
    fn merge_drops_empty_intervals() {
        let merged = merge_intervals(vec![iv(9, 0, 9, 0), iv(10, 0, 11, 0)]);
        assert_eq!(merged, vec![iv(10, 0, 11, 0)]);
    }

    #[test]
    fn intersects_any_respects_half_open_bounds() {
        let busy = merge_intervals(vec![iv(10, 0, 11, 0)]);
        assert!(!intersects_any(&iv(9, 0, 10, 0), &busy));
        assert!(!intersects_any(&iv(11, 0, 12, 0), &busy));
        assert!(intersects_any(&iv(10, 45, 11, 15), &busy));
    }
}
