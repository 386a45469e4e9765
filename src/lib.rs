#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::style,
    clippy::pedantic
)]

//! A small, forgiving INI reader.
//!
//! The input is parsed once into an immutable [`Ini`] document, which can then be queried with
//! [`Ini::read`] for any type implementing [`FromIniValue`]. Nothing here fails loudly: an
//! unreadable file is an empty document, and a missing key or an unconvertible value yields the
//! default supplied by the caller.
//!
//! ```
//! use ini_reader::Ini;
//!
//! let ini = Ini::parse(
//!     "
//! [Window]
//! width = 800   ; pixels
//! fullscreen = yes
//! title = Main Window // shown in the title bar
//! ",
//! );
//!
//! assert_eq!(ini.read("Window", "width", 640), 800);
//! assert_eq!(ini.read("Window", "height", 480), 480);
//! assert!(ini.read("Window", "fullscreen", false));
//! assert_eq!(ini.read_with("Window", "title", String::new(), true), "main window");
//! ```

mod error;
mod number;
mod parser;
mod section;
mod value;

use std::collections::HashMap;
use std::collections::hash_map;
use std::fs;
use std::io::Read;
use std::path::Path;

use tracing::debug;

pub use crate::error::LoadError;
use crate::parser::Parser;
pub use crate::section::{Iter, Section};
pub use crate::value::FromIniValue;

/// Byte Order Mark (BOM) is used to signal the endianness of an encoding. The order `0xFF 0xFE`
/// strongly suggests that the encoding is using little-endian byte order.
///
/// <https://en.wikipedia.org/wiki/Byte_order_mark>
const BOM_UTF16_LE: &[u8] = &[0xFF, 0xFE];
const BOM_UTF8: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Upper bounds for [`Capacity`] hints; anything larger is only pre-allocated up to these.
const MAX_SECTIONS_HINT: usize = 4096;
const MAX_KEYS_HINT: usize = 1024;

/// Pre-allocation hints for the lookup tables.
///
/// These only affect allocation; any values produce the same document. Hints are clamped to
/// `1..=4096` sections and `1..=1024` keys per section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    /// Expected number of sections.
    pub sections: usize,
    /// Expected number of keys in each section.
    pub keys: usize,
}

impl Capacity {
    #[must_use]
    pub fn new(sections: usize, keys: usize) -> Self {
        Self { sections, keys }
    }

    pub(crate) fn clamped(self) -> Self {
        Self {
            sections: self.sections.clamp(1, MAX_SECTIONS_HINT),
            keys: self.keys.clamp(1, MAX_KEYS_HINT),
        }
    }
}

impl Default for Capacity {
    fn default() -> Self {
        Self {
            sections: 32,
            keys: 8,
        }
    }
}

/// A parsed INI document.
///
/// Built once and never modified afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ini {
    sections: HashMap<String, Section>,
}

impl Ini {
    /// Parses `text` with the default [`Capacity`].
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self::parse_with_capacity(text, Capacity::default())
    }

    #[must_use]
    pub fn parse_with_capacity(text: &str, capacity: Capacity) -> Self {
        let sections = Parser::new(text, capacity).into_sections();
        debug!(sections = sections.len(), "parsed INI document");

        Self { sections }
    }

    /// Decodes `buffer` and parses it.
    ///
    /// A UTF-16 LE byte order mark switches decoding to UTF-16 LE and a UTF-8 byte order mark is
    /// dropped. Anything else is read as UTF-8, replacing invalid sequences with U+FFFD.
    #[must_use]
    pub fn from_bytes(buffer: &[u8]) -> Self {
        Self::from_bytes_with_capacity(buffer, Capacity::default())
    }

    #[must_use]
    pub fn from_bytes_with_capacity(buffer: &[u8], capacity: Capacity) -> Self {
        Self::parse_with_capacity(&decode_data(buffer), capacity)
    }

    /// Reads everything from `reader` and parses it.
    ///
    /// If reading fails, the result is an empty document. Use [`Ini::try_from_reader`] to observe
    /// the error instead.
    #[must_use]
    pub fn from_reader<R: Read>(reader: R) -> Self {
        Self::from_reader_with_capacity(reader, Capacity::default())
    }

    #[must_use]
    pub fn from_reader_with_capacity<R: Read>(reader: R, capacity: Capacity) -> Self {
        Self::try_from_reader_with_capacity(reader, capacity).unwrap_or_else(|e| {
            debug!(error = %e, "unreadable INI source, using an empty document");
            Self::default()
        })
    }

    /// Reads and parses the file at `path`.
    ///
    /// If the file cannot be opened or read, the result is an empty document. Use
    /// [`Ini::try_open`] to observe the error instead.
    #[must_use]
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        Self::open_with_capacity(path, Capacity::default())
    }

    #[must_use]
    pub fn open_with_capacity<P: AsRef<Path>>(path: P, capacity: Capacity) -> Self {
        let path = path.as_ref();

        Self::try_open_with_capacity(path, capacity).unwrap_or_else(|e| {
            debug!(
                path = %path.display(),
                error = %e,
                "unreadable INI file, using an empty document"
            );
            Self::default()
        })
    }

    /// Like [`Ini::from_reader`], but reports read failures.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if `reader` fails.
    pub fn try_from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        Self::try_from_reader_with_capacity(reader, Capacity::default())
    }

    /// # Errors
    ///
    /// Returns [`LoadError::Read`] if `reader` fails.
    pub fn try_from_reader_with_capacity<R: Read>(
        mut reader: R,
        capacity: Capacity,
    ) -> Result<Self, LoadError> {
        let mut buffer = Vec::with_capacity(4096);
        reader
            .read_to_end(&mut buffer)
            .map_err(|source| LoadError::Read { source })?;

        Ok(Self::from_bytes_with_capacity(&buffer, capacity))
    }

    /// Like [`Ini::open`], but reports failures.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::Open`] if the file cannot be opened, or [`LoadError::Read`] if reading
    /// it fails part way.
    pub fn try_open<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        Self::try_open_with_capacity(path, Capacity::default())
    }

    /// # Errors
    ///
    /// See [`Ini::try_open`].
    pub fn try_open_with_capacity<P: AsRef<Path>>(
        path: P,
        capacity: Capacity,
    ) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let file = fs::File::open(path).map_err(|source| LoadError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        Self::try_from_reader_with_capacity(file, capacity)
    }

    /// Converts the value at `section`/`key` into `T`, or returns `default`.
    ///
    /// - `bool`: true only for the exact text `true`, `1`, `on` or `yes`, false otherwise.
    /// - `char`: the first character; `default` if the value is empty.
    /// - Integers and floats: the numeric token at the start of the value (`42xyz` is `42`);
    ///   `default` if there is none or it is out of range.
    /// - `String`: the value unchanged.
    ///
    /// `default` is also returned when the section or key does not exist.
    #[must_use]
    pub fn read<T: FromIniValue>(&self, section: &str, key: &str, default: T) -> T {
        self.read_with(section, key, default, false)
    }

    /// Same as [`Ini::read`], but ASCII-lowercases `String` values when `fold_case` is set.
    #[must_use]
    pub fn read_with<T: FromIniValue>(
        &self,
        section: &str,
        key: &str,
        default: T,
        fold_case: bool,
    ) -> T {
        match self.section(section) {
            Some(s) => s.read_with(key, default, fold_case),
            None => default,
        }
    }

    /// Returns the raw, unconverted value at `section`/`key`.
    #[must_use]
    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.section(section)?.get(key)
    }

    #[must_use]
    pub fn contains(&self, section: &str, key: &str) -> bool {
        self.get(section, key).is_some()
    }

    /// Use `""` for keys that appear before the first section header.
    #[must_use]
    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.get(name)
    }

    /// Iterates over every section in unspecified order.
    pub fn sections(&self) -> hash_map::Values<'_, String, Section> {
        self.sections.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

impl std::str::FromStr for Ini {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

fn decode_data(data: &[u8]) -> String {
    if let Some(data) = data.strip_prefix(BOM_UTF16_LE) {
        let utf16 = data
            .chunks_exact(2)
            .map(|chunk| u16::from_le_bytes([chunk[0], chunk[1]]))
            .collect::<Vec<u16>>();

        char::decode_utf16(utf16)
            .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect::<String>()
    } else {
        let data = data.strip_prefix(BOM_UTF8).unwrap_or(data);
        String::from_utf8_lossy(data).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Write};

    use super::*;

    fn init_test_logging() {
        _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::TRACE)
            .try_init();
    }

    #[test]
    fn empty_input_has_no_sections() {
        assert!(Ini::parse("").is_empty());
        assert!(Ini::parse("\n\n; only a comment\n").is_empty());
        assert!(Ini::default().is_empty());
    }

    #[test]
    fn missing_file_is_empty_document() {
        init_test_logging();

        let dir = tempfile::tempdir().expect("failed to create temporary directory");
        let ini = Ini::open(dir.path().join("does-not-exist.ini"));

        assert!(ini.is_empty());
        assert_eq!(ini.read("", "k", 7), 7);
    }

    #[test]
    fn try_open_reports_missing_file() {
        let dir = tempfile::tempdir().expect("failed to create temporary directory");
        let path = dir.path().join("does-not-exist.ini");

        match Ini::try_open(&path) {
            Err(LoadError::Open { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected an open error, got {other:?}"),
        }
    }

    #[test]
    fn open_reads_file() {
        init_test_logging();

        let mut file = tempfile::NamedTempFile::new().expect("failed to create temporary file");
        write!(file, "[Server]\nport = 8080 # default\nhost = localhost\n")
            .expect("failed to write temporary file");

        let ini = Ini::open(file.path());

        assert_eq!(ini.read("Server", "port", 0_u16), 8080);
        assert_eq!(ini.get("Server", "host"), Some("localhost"));
        assert!(Ini::try_open(file.path()).is_ok());
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn failing_reader_is_empty_document() {
        init_test_logging();

        assert!(Ini::from_reader(FailingReader).is_empty());
        assert!(matches!(
            Ini::try_from_reader(FailingReader),
            Err(LoadError::Read { .. })
        ));
    }

    #[test]
    fn reopened_section_merges() {
        let ini = Ini::parse("[A]\nk=1\n[A]\nj=2");

        assert_eq!(ini.len(), 1);
        assert_eq!(ini.get("A", "k"), Some("1"));
        assert_eq!(ini.get("A", "j"), Some("2"));
    }

    #[test]
    fn slash_comment_stripped_before_integer_read() {
        let ini = Ini::parse("k = 5 // five");

        assert_eq!(ini.get("", "k"), Some("5"));
        assert_eq!(ini.read("", "k", 0), 5);
    }

    #[test]
    fn bool_reads() {
        let ini = Ini::parse("[B]\noff = off ; note\ncapital = True\nyes = yes\none = 1");

        assert!(!ini.read("B", "off", true));
        assert!(!ini.read("B", "capital", false));
        assert!(ini.read("B", "yes", false));
        assert!(ini.read("B", "one", false));
        assert!(ini.read("B", "missing", true));
    }

    #[test]
    fn integer_reads() {
        let ini = Ini::parse("prefix = 42xyz\nfruit = banana\nbig = 300");

        assert_eq!(ini.read("", "prefix", -1), 42);
        assert_eq!(ini.read("", "fruit", -1), -1);
        assert_eq!(ini.read("", "big", 1_u8), 1);
        assert_eq!(ini.read("", "big", 1_u16), 300);
    }

    #[test]
    fn float_reads() {
        let ini = Ini::parse("ratio = 0.75\nscale = 2e2x\nword = half");

        assert!((ini.read("", "ratio", 0.0_f64) - 0.75).abs() < f64::EPSILON);
        assert!((ini.read("", "scale", 0.0_f32) - 200.0).abs() < f32::EPSILON);
        assert!((ini.read("", "word", 0.5_f64) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn char_reads() {
        let ini = Ini::parse("letter = xyz\nblank =");

        assert_eq!(ini.read("", "letter", '?'), 'x');
        assert_eq!(ini.read("", "blank", '?'), '?');
    }

    #[test]
    fn repeated_key_last_wins() {
        let ini = Ini::parse("[S]\nk=1\nk=2");

        assert_eq!(ini.get("S", "k"), Some("2"));
    }

    #[test]
    fn implicit_section() {
        let ini = Ini::parse("k = top\n[S]\nk = nested");

        assert_eq!(ini.get("", "k"), Some("top"));
        assert_eq!(ini.get("S", "k"), Some("nested"));
        assert_eq!(ini.section("").map(Section::name), Some(""));
    }

    #[test]
    fn fold_case_is_opt_in() {
        let ini = Ini::parse("greeting = HELLO");

        assert_eq!(ini.read_with("", "greeting", String::new(), true), "hello");
        assert_eq!(ini.read("", "greeting", String::new()), "HELLO");
    }

    #[test]
    fn same_value_read_as_different_types() {
        let ini = Ini::parse("v = 1");

        assert!(ini.read("", "v", false));
        assert_eq!(ini.read("", "v", 0_i64), 1);
        assert_eq!(ini.read("", "v", '0'), '1');
        assert_eq!(ini.read("", "v", String::new()), "1");
    }

    #[test]
    fn unterminated_header_is_ignored() {
        init_test_logging();

        let ini = Ini::parse("[unterminated\nk = v\n[Next]\nj = w");

        assert!(ini.section("unterminated").is_none());
        assert_eq!(ini.get("", "k"), Some("v"));
        assert_eq!(ini.get("Next", "j"), Some("w"));
        assert_eq!(ini.len(), 2);
    }

    #[test]
    fn lookup_misses_return_default() {
        let ini = Ini::parse("[S]\nk = v");

        assert_eq!(ini.read("Missing", "k", String::from("dflt")), "dflt");
        assert_eq!(ini.read("S", "missing", 3), 3);
        assert!(!ini.contains("S", "missing"));
        assert!(ini.contains("S", "k"));
    }

    #[test]
    fn capacity_does_not_change_results() {
        let text = "top = 1\n[A]\nx = 1\ny = 2\n[B]\n[A]\nz = 3";
        let reference = Ini::parse(text);

        for capacity in [
            Capacity::new(0, 0),
            Capacity::new(1, 1),
            Capacity::new(1024, 256),
            Capacity::new(usize::MAX, 8),
            Capacity::new(32, usize::MAX / 4),
            Capacity::new(usize::MAX, usize::MAX),
        ] {
            assert_eq!(Ini::parse_with_capacity(text, capacity), reference);
        }
    }

    #[test]
    fn capacity_is_clamped() {
        assert_eq!(
            Capacity::new(0, usize::MAX).clamped(),
            Capacity::new(1, MAX_KEYS_HINT)
        );
        assert_eq!(
            Capacity::new(usize::MAX, 0).clamped(),
            Capacity::new(MAX_SECTIONS_HINT, 1)
        );
    }

    #[test]
    fn decodes_utf16_le_with_bom() {
        let mut buffer = BOM_UTF16_LE.to_vec();
        for unit in "[Ünï]\nkey = välue".encode_utf16() {
            buffer.extend_from_slice(&unit.to_le_bytes());
        }

        let ini = Ini::from_bytes(&buffer);

        assert_eq!(ini.get("Ünï", "key"), Some("välue"));
    }

    #[test]
    fn drops_utf8_bom() {
        let mut buffer = BOM_UTF8.to_vec();
        buffer.extend_from_slice(b"first = 1");

        let ini = Ini::from_bytes(&buffer);

        assert_eq!(ini.get("", "first"), Some("1"));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let ini = Ini::from_bytes(b"key = a\xFFb");

        assert_eq!(ini.get("", "key"), Some("a\u{FFFD}b"));
    }

    #[test]
    fn from_str_parses() {
        let ini: Ini = "[S]\nk = v".parse().expect("parsing is infallible");

        assert_eq!(ini.get("S", "k"), Some("v"));
    }

    #[test]
    fn document_is_shareable_across_threads() {
        let ini = Ini::parse("[S]\nn = 10");

        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| assert_eq!(ini.read("S", "n", 0), 10));
            }
        });
    }
}
