//! Shared types for permission inspection.

use std::fmt;

const PERMISSION_MASK: u32 = 0o7777;
const FILE_TYPE_MASK: u32 = 0o170000;
const DIRECTORY_TYPE: u32 = 0o040000;

const SETUID: u32 = 0o4000;
const SETGID: u32 = 0o2000;
const STICKY: u32 = 0o1000;

/// Permission bits of a filesystem entry plus whether it is a directory.
///
/// Two modes compare equal only when both the permission bits (including
/// setuid, setgid and sticky) and the directory flag match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode {
    bits: u32,
    is_dir: bool,
}

impl FileMode {
    /// A directory with the given permission bits.
    pub const fn dir(bits: u32) -> Self {
        Self {
            bits: bits & PERMISSION_MASK,
            is_dir: true,
        }
    }

    /// A non-directory entry with the given permission bits.
    pub const fn file(bits: u32) -> Self {
        Self {
            bits: bits & PERMISSION_MASK,
            is_dir: false,
        }
    }

    /// Builds a mode from a raw `st_mode` value.
    pub const fn from_raw(st_mode: u32) -> Self {
        Self {
            bits: st_mode & PERMISSION_MASK,
            is_dir: st_mode & FILE_TYPE_MASK == DIRECTORY_TYPE,
        }
    }

    /// Permission bits, including setuid/setgid/sticky.
    pub const fn permissions(&self) -> u32 {
        self.bits
    }

    pub const fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub const fn is_setuid(&self) -> bool {
        self.bits & SETUID != 0
    }
}

impl fmt::Display for FileMode {
    /// Renders the mode the way `ls -l` does, e.g. `drwxr-xr-x` or `-rwsr-xr-x`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::with_capacity(10);
        out.push(if self.is_dir { 'd' } else { '-' });

        let triples = [(6, SETUID, 's'), (3, SETGID, 's'), (0, STICKY, 't')];
        for (shift, special, marker) in triples {
            let triple = (self.bits >> shift) & 0o7;
            out.push(if triple & 0o4 != 0 { 'r' } else { '-' });
            out.push(if triple & 0o2 != 0 { 'w' } else { '-' });

            let exec = triple & 0o1 != 0;
            let special_set = self.bits & special != 0;
            out.push(match (special_set, exec) {
                (true, true) => marker,
                (true, false) => marker.to_ascii_uppercase(),
                (false, true) => 'x',
                (false, false) => '-',
            });
        }

        f.write_str(&out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_display_directory_modes() {
        assert_eq!(FileMode::dir(0o755).to_string(), "drwxr-xr-x");
        assert_eq!(FileMode::dir(0o555).to_string(), "dr-xr-xr-x");
        assert_eq!(FileMode::dir(0o700).to_string(), "drwx------");
    }

    #[test]
    fn test_display_special_bits() {
        assert_eq!(FileMode::file(0o4755).to_string(), "-rwsr-xr-x");
        assert_eq!(FileMode::file(0o4644).to_string(), "-rwSr--r--");
        assert_eq!(FileMode::dir(0o1777).to_string(), "drwxrwxrwt");
    }

    #[test]
    fn test_from_raw_detects_directories() {
        let dir = FileMode::from_raw(0o040755);
        assert!(dir.is_dir());
        assert_eq!(dir, FileMode::dir(0o755));

        let file = FileMode::from_raw(0o104755);
        assert!(!file.is_dir());
        assert!(file.is_setuid());
        assert_eq!(file.permissions(), 0o4755);
    }

    #[test]
    fn test_directory_flag_participates_in_equality() {
        assert_ne!(FileMode::dir(0o755), FileMode::file(0o755));
    }
}
