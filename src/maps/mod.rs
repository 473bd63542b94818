mod differ;
mod parser;
mod region;

pub use differ::{diff_snapshots, DiffKind, MapDiff, TailPolicy};
pub use parser::parse_snapshot;
pub use region::{Device, Perms, Region};

/// Hard cap on regions per snapshot. Parsing fails explicitly rather than
/// truncate when a map has more; the bound keeps snapshot buffers at a
/// fixed reserved size so the inspector's own allocations stay off the
/// map it is measuring.
pub const MAX_REGIONS: usize = 1024;

/// Hard cap on the byte length of a single maps line.
pub const MAX_LINE_LEN: usize = 1024;
