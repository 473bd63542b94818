use crate::error::{Field, MapsError};
use crate::maps::region::{Device, Perms, Region};
use crate::maps::{MAX_LINE_LEN, MAX_REGIONS};

/// Parses the full text of a `/proc/<pid>/maps` read into `out`.
///
/// `out` is caller-owned and cleared first; reserve it with
/// [`MAX_REGIONS`](crate::maps::MAX_REGIONS) once and reuse it across
/// snapshots so parsing itself never allocates. Regions borrow their path
/// from `text`, so callers that measure their own address space should
/// read both raw snapshots before parsing either one.
///
/// Fail-fast: the first malformed line aborts the whole parse, since a
/// partial snapshot cannot be safely diffed. Returns the region count.
pub fn parse_snapshot<'a>(text: &'a str, out: &mut Vec<Region<'a>>) -> Result<usize, MapsError> {
    out.clear();
    for (idx, line) in text.lines().enumerate() {
        if line.len() > MAX_LINE_LEN {
            return Err(MapsError::SnapshotTooLarge {
                what: "line length",
                limit: MAX_LINE_LEN,
            });
        }
        if out.len() == MAX_REGIONS {
            return Err(MapsError::SnapshotTooLarge {
                what: "region count",
                limit: MAX_REGIONS,
            });
        }
        out.push(parse_line(line, idx + 1)?);
    }
    Ok(out.len())
}

/// One maps line: `start-end perms offset major:minor inode [path]`.
///
/// The path may itself contain spaces; only the first whitespace-delimited
/// remainder is kept. It is advisory metadata and never used for diff
/// alignment, so the truncation is harmless.
fn parse_line(line: &str, line_no: usize) -> Result<Region<'_>, MapsError> {
    let mut tokens = line.split_whitespace();
    let mut next = |field: Field| {
        tokens.next().ok_or(MapsError::MissingField {
            line: line_no,
            field,
        })
    };

    let range_tok = next(Field::AddressRange)?;
    let perms_tok = next(Field::Permissions)?;
    let offset_tok = next(Field::Offset)?;
    let device_tok = next(Field::Device)?;
    let inode_tok = next(Field::Inode)?;
    let path = tokens.next();

    let (start, end) = parse_addr_range(range_tok, line_no)?;
    let device = parse_device(device_tok, line_no)?;
    // offset is hex in the kernel's output, inode decimal
    let offset = parse_number(offset_tok, 16, Field::Offset, line_no)?;
    let inode = parse_number(inode_tok, 10, Field::Inode, line_no)?;

    Ok(Region {
        start,
        end,
        perms: Perms::from_flags(perms_tok),
        offset,
        device,
        inode,
        path,
    })
}

fn parse_addr_range(token: &str, line_no: usize) -> Result<(u64, u64), MapsError> {
    let malformed = || MapsError::MalformedAddressRange {
        line: line_no,
        token: token.to_string(),
    };
    let (start_tok, end_tok) = token.split_once('-').ok_or_else(malformed)?;
    if end_tok.contains('-') {
        return Err(malformed());
    }
    let start = u64::from_str_radix(start_tok, 16).map_err(|_| malformed())?;
    let end = u64::from_str_radix(end_tok, 16).map_err(|_| malformed())?;
    if start >= end {
        return Err(malformed());
    }
    Ok((start, end))
}

fn parse_device(token: &str, line_no: usize) -> Result<Device, MapsError> {
    let malformed = || MapsError::MalformedDevice {
        line: line_no,
        token: token.to_string(),
    };
    let (major_tok, minor_tok) = token.split_once(':').ok_or_else(malformed)?;
    if minor_tok.contains(':') {
        return Err(malformed());
    }
    let major = u8::from_str_radix(major_tok, 16).map_err(|_| malformed())?;
    let minor = u8::from_str_radix(minor_tok, 16).map_err(|_| malformed())?;
    Ok(Device { major, minor })
}

fn parse_number(token: &str, radix: u32, field: Field, line_no: usize) -> Result<u64, MapsError> {
    u64::from_str_radix(token, radix).map_err(|_| MapsError::MalformedNumber {
        line: line_no,
        field,
        token: token.to_string(),
    })
}
