//! Memory usage counters from `/proc/meminfo`.
//!
//! Parsing is best effort. A counter whose line is missing or malformed
//! stays at zero, problems are logged, and the caller always gets a value.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, warn};

use crate::hardware::types::{MemInfo, MemoryCounters};

const LINE_BUF_LEN: usize = 512;

/// Counters recognised in the file, matched by line prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    MemTotal,
    MemFree,
    MemAvailable,
    Buffers,
    Cached,
    SwapCached,
    Active,
    Inactive,
    SwapTotal,
    SwapFree,
    Dirty,
    Shmem,
    Slab,
    Mapped,
}

impl Field {
    const ALL: [Field; 14] = [
        Field::MemTotal,
        Field::MemFree,
        Field::MemAvailable,
        Field::Buffers,
        Field::Cached,
        Field::SwapCached,
        Field::Active,
        Field::Inactive,
        Field::SwapTotal,
        Field::SwapFree,
        Field::Dirty,
        Field::Shmem,
        Field::Slab,
        Field::Mapped,
    ];

    fn label(self) -> &'static str {
        match self {
            Field::MemTotal => "MemTotal",
            Field::MemFree => "MemFree",
            Field::MemAvailable => "MemAvailable",
            Field::Buffers => "Buffers",
            Field::Cached => "Cached",
            Field::SwapCached => "SwapCached",
            Field::Active => "Active",
            Field::Inactive => "Inactive",
            Field::SwapTotal => "SwapTotal",
            Field::SwapFree => "SwapFree",
            Field::Dirty => "Dirty",
            Field::Shmem => "Shmem",
            Field::Slab => "Slab",
            Field::Mapped => "Mapped",
        }
    }

    fn slot(self, info: &mut MemInfo) -> &mut u64 {
        match self {
            Field::MemTotal => &mut info.mem_total,
            Field::MemFree => &mut info.mem_free,
            Field::MemAvailable => &mut info.mem_available,
            Field::Buffers => &mut info.buffers,
            Field::Cached => &mut info.cached,
            Field::SwapCached => &mut info.swap_cached,
            Field::Active => &mut info.active,
            Field::Inactive => &mut info.inactive,
            Field::SwapTotal => &mut info.swap_total,
            Field::SwapFree => &mut info.swap_free,
            Field::Dirty => &mut info.dirty,
            Field::Shmem => &mut info.shmem,
            Field::Slab => &mut info.slab,
            Field::Mapped => &mut info.mapped,
        }
    }

    /// Match `line` against `"<label>:"` and return the text after the colon.
    fn strip(self, line: &str) -> Option<&str> {
        line.strip_prefix(self.label())?.strip_prefix(':')
    }
}

/// Read the counter file at `path`. Never fails; see the module docs.
pub fn parse_counters(path: &Path) -> MemoryCounters {
    MemoryCounters::from(&read_meminfo(path))
}

/// Read raw counters from the file at `path`, all zero if it cannot be opened.
pub fn read_meminfo(path: &Path) -> MemInfo {
    match File::open(path) {
        Ok(file) => parse_meminfo(BufReader::with_capacity(LINE_BUF_LEN, file), path),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to open meminfo, using zero counters");
            MemInfo::default()
        }
    }
}

/// Scan `reader` line by line. `path` is only used in log messages.
pub fn parse_meminfo<R: BufRead>(mut reader: R, path: &Path) -> MemInfo {
    let mut info = MemInfo::default();
    let mut line = Vec::with_capacity(LINE_BUF_LEN);

    loop {
        line.clear();
        // Bytes, not `read_line`: a line that is not UTF-8 is just an unknown line
        match reader.read_until(b'\n', &mut line) {
            Ok(0) => break,
            Ok(_) => parse_line(&String::from_utf8_lossy(&line), &mut info, path),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "read meminfo failed");
                break;
            }
        }
    }

    debug!(path = %path.display(), ?info, "parsed meminfo");
    info
}

fn parse_line(line: &str, info: &mut MemInfo, path: &Path) {
    for field in Field::ALL {
        if let Some(rest) = field.strip(line) {
            match parse_kb(rest) {
                Some(value) => *field.slot(info) = value,
                None => warn!(
                    path = %path.display(),
                    field = field.label(),
                    "parse meminfo field failed"
                ),
            }
            return;
        }
    }
}

/// Leading unsigned decimal after optional whitespace, e.g. `"   8000000 kB"`.
fn parse_kb(text: &str) -> Option<u64> {
    let text = text.trim_start();
    let end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    text[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read, Write};
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
MemTotal:       16384000 kB
MemFree:         1234567 kB
MemAvailable:    8000000 kB
Buffers:          204800 kB
Cached:          4096000 kB
SwapCached:         1024 kB
Active:          6000000 kB
Inactive:        3000000 kB
Active(anon):    2500000 kB
Inactive(anon):   400000 kB
SwapTotal:       2000000 kB
SwapFree:        1999000 kB
Dirty:               512 kB
Writeback:             0 kB
AnonPages:       2800000 kB
Mapped:           700000 kB
Shmem:            300000 kB
Slab:             450000 kB
SReclaimable:     300000 kB
HugePages_Total:       0
";

    fn fixture(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    fn assert_all_zero(counters: &MemoryCounters) {
        let values = [
            counters.swap_size(),
            counters.swap_total(),
            counters.available(),
            counters.buffers(),
            counters.cached(),
            counters.active(),
            counters.inactive(),
            counters.shared_size(),
            counters.swap_free(),
            counters.swap_cached(),
            counters.slab(),
            counters.dirty(),
            counters.mapped(),
        ];
        assert!(values.iter().all(|v| *v == "0"), "{:?}", values);
    }

    #[test]
    fn parses_every_known_counter() {
        let file = fixture(SAMPLE);
        let counters = parse_counters(file.path());

        assert_eq!(counters.available(), "8000000");
        assert_eq!(counters.buffers(), "204800");
        assert_eq!(counters.cached(), "4096000");
        assert_eq!(counters.swap_cached(), "1024");
        assert_eq!(counters.active(), "6000000");
        assert_eq!(counters.inactive(), "3000000");
        assert_eq!(counters.swap_size(), "2000000");
        assert_eq!(counters.swap_total(), "2000000");
        assert_eq!(counters.swap_free(), "1999000");
        assert_eq!(counters.dirty(), "512");
        assert_eq!(counters.mapped(), "700000");
        assert_eq!(counters.shared_size(), "300000");
        assert_eq!(counters.slab(), "450000");
    }

    #[test]
    fn raw_totals_are_parsed() {
        let file = fixture(SAMPLE);
        let info = read_meminfo(file.path());
        assert_eq!(info.mem_total, 16_384_000);
        assert_eq!(info.mem_free, 1_234_567);
    }

    #[test]
    fn minimal_file() {
        let file = fixture("MemTotal: 16384000 kB\nMemAvailable: 8000000 kB\nSwapTotal: 2000000 kB\n");
        let counters = parse_counters(file.path());
        assert_eq!(counters.available(), "8000000");
        assert_eq!(counters.swap_size(), "2000000");
    }

    #[test]
    fn missing_line_defaults_to_zero() {
        let without_slab: String = SAMPLE
            .lines()
            .filter(|l| !l.starts_with("Slab:"))
            .map(|l| format!("{}\n", l))
            .collect();
        let file = fixture(&without_slab);
        let counters = parse_counters(file.path());

        assert_eq!(counters.slab(), "0");
        assert_eq!(counters.mapped(), "700000");
    }

    #[test]
    fn malformed_value_keeps_default_and_scan_continues() {
        let file = fixture("Buffers: lots kB\nCached: 4096 kB\nDirty:\n");
        let counters = parse_counters(file.path());

        assert_eq!(counters.buffers(), "0");
        assert_eq!(counters.dirty(), "0");
        assert_eq!(counters.cached(), "4096");
    }

    #[test]
    fn overflowing_value_is_rejected() {
        let info = parse_meminfo(
            Cursor::new("Mapped: 99999999999999999999999 kB\n"),
            Path::new("fixture"),
        );
        assert_eq!(info.mapped, 0);
    }

    #[test]
    fn labels_are_exact_and_case_sensitive() {
        let input = "Active(anon): 10 kB\nactive: 20 kB\nActive 30 kB\nMemAvailableX: 40 kB\n";
        let info = parse_meminfo(Cursor::new(input), Path::new("fixture"));
        assert_eq!(info, MemInfo::default());
    }

    #[test]
    fn swap_cached_is_not_confused_with_cached() {
        let info = parse_meminfo(
            Cursor::new("SwapCached: 7 kB\nCached: 9 kB\n"),
            Path::new("fixture"),
        );
        assert_eq!(info.swap_cached, 7);
        assert_eq!(info.cached, 9);
    }

    #[test]
    fn last_line_without_newline() {
        let info = parse_meminfo(Cursor::new("Slab: 42 kB"), Path::new("fixture"));
        assert_eq!(info.slab, 42);
    }

    #[test]
    fn nonexistent_file_gives_zero_counters() {
        let counters = parse_counters(Path::new("/nonexistent/proc/meminfo"));
        assert_all_zero(&counters);
    }

    #[test]
    fn empty_file_gives_zero_counters() {
        let file = fixture("");
        assert_all_zero(&parse_counters(file.path()));
    }

    /// Yields some good lines, then fails.
    struct FailingReader {
        data: Cursor<&'static [u8]>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::Other, "device gone")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn read_error_keeps_already_parsed_fields() {
        let reader = BufReader::new(FailingReader {
            data: Cursor::new(&b"MemAvailable: 123 kB\nSlab: 456 kB\n"[..]),
        });
        let info = parse_meminfo(reader, Path::new("fixture"));

        assert_eq!(info.mem_available, 123);
        assert_eq!(info.slab, 456);
        assert_eq!(info.mapped, 0);
    }

    #[test]
    fn invalid_utf8_line_is_skipped() {
        let bytes: &[u8] = b"Cached: 5 kB\n\xff\xfe: 1 kB\nSlab: 6 kB\n";
        let info = parse_meminfo(Cursor::new(bytes), Path::new("fixture"));
        assert_eq!(info.cached, 5);
        assert_eq!(info.slab, 6);
    }

    #[test]
    fn counters_after_non_utf8_line_are_read() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"MemAvailable: 8000000 kB\nVendorJunk: \xff\xfe\nSwapTotal: 2000000 kB\nSlab: 450000 kB\n")
            .unwrap();
        let counters = parse_counters(file.path());

        assert_eq!(counters.available(), "8000000");
        assert_eq!(counters.swap_size(), "2000000");
        assert_eq!(counters.slab(), "450000");
    }

    #[test]
    fn non_utf8_bytes_inside_a_known_line_fail_that_field_only() {
        let bytes: &[u8] = b"Dirty: \xff12 kB\nMapped: 3 kB\n";
        let info = parse_meminfo(Cursor::new(bytes), Path::new("fixture"));
        assert_eq!(info.dirty, 0);
        assert_eq!(info.mapped, 3);
    }

    #[test]
    fn parse_kb_variants() {
        assert_eq!(parse_kb("   8000000 kB\n"), Some(8_000_000));
        assert_eq!(parse_kb("0"), Some(0));
        assert_eq!(parse_kb("\t12kB"), Some(12));
        assert_eq!(parse_kb(" kB"), None);
        assert_eq!(parse_kb(""), None);
        assert_eq!(parse_kb(" -5 kB"), None);
    }
}
