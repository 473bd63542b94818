use std::fmt;

use crate::maps::region::Region;

/// Classification of one structural change between two snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    /// A region present in one snapshot with no counterpart in the other.
    New,
    /// The same logical region with a moved boundary.
    Modification,
}

/// One detected change, with its byte-size magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapDiff {
    pub kind: DiffKind,
    pub magnitude: u64,
}

impl fmt::Display for MapDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            DiffKind::New => "new",
            DiffKind::Modification => "modification",
        };
        write!(f, "{} {:#x} ({} bytes)", kind, self.magnitude, self.magnitude)
    }
}

/// What to do with trailing regions once the shorter snapshot is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailPolicy {
    /// Stop at the shorter sequence; trailing regions go unreported.
    Ignore,
    /// Report each trailing region as [`DiffKind::New`] with its byte
    /// length as the magnitude.
    ReportNew,
}

/// Computes the structural diff between two address-ordered snapshots.
///
/// A linear two-cursor sweep: both snapshots list regions in strictly
/// increasing start order, so merging them like two sorted sequences is
/// enough, no edit-distance machinery. A pair whose start *and* end both
/// differ is a wholesale insertion (`New`, magnitude = start gap) and only
/// the cursor with the larger start advances, holding the other region
/// back to align against a later entry. A pair sharing either boundary is
/// the same logical mapping seen twice: a differing start or end becomes a
/// `Modification` with the absolute delta, identical pairs emit nothing,
/// and both cursors advance.
///
/// Infallible on valid input; `out` is caller-owned, cleared first, and
/// never holds more than `a.len() + b.len()` entries.
pub fn diff_snapshots(a: &[Region], b: &[Region], tail: TailPolicy, out: &mut Vec<MapDiff>) {
    out.clear();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        let (ra, rb) = (&a[i], &b[j]);
        if ra.start != rb.start && ra.end != rb.end {
            out.push(MapDiff {
                kind: DiffKind::New,
                magnitude: ra.start.abs_diff(rb.start),
            });
            if ra.start < rb.start {
                i += 1;
            } else {
                j += 1;
            }
        } else {
            if ra.start != rb.start {
                // a start moving while the end matches; not known to
                // happen on Linux but handled the same as end drift
                out.push(MapDiff {
                    kind: DiffKind::Modification,
                    magnitude: ra.start.abs_diff(rb.start),
                });
            } else if ra.end != rb.end {
                out.push(MapDiff {
                    kind: DiffKind::Modification,
                    magnitude: ra.end.abs_diff(rb.end),
                });
            }
            i += 1;
            j += 1;
        }
    }
    if tail == TailPolicy::ReportNew {
        for region in a[i..].iter().chain(&b[j..]) {
            out.push(MapDiff {
                kind: DiffKind::New,
                magnitude: region.len(),
            });
        }
    }
}
