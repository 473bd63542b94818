use std::fmt;

use bitflags::bitflags;

bitflags! {
    /// Permission flags of one mapped region.
    ///
    /// Exactly one of SHARED/PRIVATE is set for any region the kernel
    /// reports; an unrecognized character in the flag string simply leaves
    /// the corresponding bit clear.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Perms: u8 {
        const READ    = 0b10000;
        const WRITE   = 0b01000;
        const EXEC    = 0b00100;
        const SHARED  = 0b00010;
        const PRIVATE = 0b00001;
    }
}

impl Perms {
    /// Decodes a `rwxp`-style flag string. Positions past the fourth
    /// character are ignored, and a token shorter than four characters
    /// leaves the missing positions unset, the same as a `-` would.
    pub fn from_flags(token: &str) -> Self {
        let mut perms = Perms::empty();
        let bytes = token.as_bytes();
        if bytes.first() == Some(&b'r') {
            perms |= Perms::READ;
        }
        if bytes.get(1) == Some(&b'w') {
            perms |= Perms::WRITE;
        }
        if bytes.get(2) == Some(&b'x') {
            perms |= Perms::EXEC;
        }
        match bytes.get(3) {
            Some(&b's') => perms |= Perms::SHARED,
            Some(&b'p') => perms |= Perms::PRIVATE,
            _ => {}
        }
        perms
    }
}

impl fmt::Display for Perms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}{}",
            if self.contains(Perms::READ) { 'r' } else { '-' },
            if self.contains(Perms::WRITE) { 'w' } else { '-' },
            if self.contains(Perms::EXEC) { 'x' } else { '-' },
            if self.contains(Perms::SHARED) {
                's'
            } else if self.contains(Perms::PRIVATE) {
                'p'
            } else {
                '-'
            },
        )
    }
}

/// Backing block device, (0, 0) for anonymous mappings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device {
    pub major: u8,
    pub minor: u8,
}

impl fmt::Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}:{:02x}", self.major, self.minor)
    }
}

/// One contiguous mapped virtual-address interval `[start, end)`.
///
/// The path borrows from the snapshot text it was parsed out of, so a
/// snapshot costs no allocation per region. Absent path (anonymous
/// mapping) is distinct from an empty one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region<'a> {
    pub start: u64,
    pub end: u64,
    pub perms: Perms,
    pub offset: u64,
    pub device: Device,
    pub inode: u64,
    pub path: Option<&'a str>,
}

impl Region<'_> {
    pub fn len(&self) -> u64 {
        self.end - self.start
    }
}

impl fmt::Display for Region<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:016x}-{:016x} {} {:08x} {} {:>10} {}",
            self.start,
            self.end,
            self.perms,
            self.offset,
            self.device,
            self.inode,
            self.path.unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perms_from_flags() {
        assert_eq!(
            Perms::from_flags("r-xp"),
            Perms::READ | Perms::EXEC | Perms::PRIVATE
        );
        assert_eq!(
            Perms::from_flags("rw-s"),
            Perms::READ | Perms::WRITE | Perms::SHARED
        );
        assert_eq!(Perms::from_flags("----"), Perms::empty());
    }

    #[test]
    fn test_perms_short_token_leaves_missing_positions_unset() {
        assert_eq!(Perms::from_flags("rw"), Perms::READ | Perms::WRITE);
        assert_eq!(Perms::from_flags(""), Perms::empty());
    }

    #[test]
    fn test_perms_unknown_fourth_char_leaves_flags_unset() {
        let perms = Perms::from_flags("rwx-");
        assert!(!perms.contains(Perms::SHARED));
        assert!(!perms.contains(Perms::PRIVATE));
    }

    #[test]
    fn test_perms_display_round_trip() {
        for flags in ["r-xp", "rw-s", "----", "rwxp"] {
            assert_eq!(Perms::from_flags(flags).to_string(), flags);
        }
    }

    #[test]
    fn test_region_display_includes_all_fields() {
        let region = Region {
            start: 0x400000,
            end: 0x401000,
            perms: Perms::from_flags("r-xp"),
            offset: 0x1000,
            device: Device { major: 8, minor: 1 },
            inode: 1234,
            path: Some("/bin/x"),
        };
        let line = region.to_string();
        assert!(line.contains("0000000000400000-0000000000401000"));
        assert!(line.contains("r-xp"));
        assert!(line.contains("00001000"));
        assert!(line.contains("08:01"));
        assert!(line.contains("1234"));
        assert!(line.ends_with("/bin/x"));
    }
}
