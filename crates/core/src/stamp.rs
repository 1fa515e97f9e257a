//! Stamp codec: field layouts, date encoding, counter encodings.
//!
//! Two layouts share the `:` delimiter:
//!
//! ```text
//! version 0:  0:date:resource:suffix
//!             suffix = base64(rand[8] || counter as i32, little-endian)
//!
//! version 1:  1:bits:date:resource::random:counter
//!             random and counter drawn from Alphabet::STAMP
//! ```
//!
//! The stamp text is exactly the byte sequence that was hashed. Nothing here
//! trims, normalizes, or re-encodes a field.

use core::fmt;
use core::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{NaiveDate, NaiveDateTime};

use crate::error::{HashcashError, Result};
use crate::params::{BLOCK_SIZE, FIELD_DELIMITER};

const DELIMITER: char = FIELD_DELIMITER as char;

/// Stamp layout, selected by the leading version field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum StampFormat {
    /// Legacy layout, minted by the sequential counter scan
    Version0,
    /// Current layout, minted by randomized mutation
    #[default]
    Version1,
}

impl StampFormat {
    pub const fn version_field(self) -> &'static str {
        match self {
            Self::Version0 => "0",
            Self::Version1 => "1",
        }
    }

    /// Number of `:` separated fields in a complete stamp.
    pub const fn field_count(self) -> usize {
        match self {
            Self::Version0 => 4,
            Self::Version1 => 7,
        }
    }

    /// Date width each minter has always emitted.
    pub const fn default_precision(self) -> DatePrecision {
        match self {
            Self::Version0 => DatePrecision::Second,
            Self::Version1 => DatePrecision::Day,
        }
    }
}

impl fmt::Display for StampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.version_field())
    }
}

impl FromStr for StampFormat {
    type Err = HashcashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "v0" => Ok(Self::Version0),
            "1" | "v1" => Ok(Self::Version1),
            other => Err(HashcashError::InvalidArgument(format!(
                "unsupported stamp format '{other}', expected 0 or 1"
            ))),
        }
    }
}

/// Width of the date field: `YYMMDD[hhmm[ss]]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DatePrecision {
    Day,
    Minute,
    Second,
}

impl DatePrecision {
    const fn pattern(self) -> &'static str {
        match self {
            Self::Day => "%y%m%d",
            Self::Minute => "%y%m%d%H%M",
            Self::Second => "%y%m%d%H%M%S",
        }
    }

    pub const fn width(self) -> usize {
        match self {
            Self::Day => 6,
            Self::Minute => 10,
            Self::Second => 12,
        }
    }

    /// Render `date` as fixed-width digits, 24-hour clock, no separators.
    pub fn format(self, date: &NaiveDateTime) -> String {
        date.format(self.pattern()).to_string()
    }
}

impl FromStr for DatePrecision {
    type Err = HashcashError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "minute" => Ok(Self::Minute),
            "second" => Ok(Self::Second),
            other => Err(HashcashError::InvalidArgument(format!(
                "unknown date precision '{other}', expected day, minute or second"
            ))),
        }
    }
}

/// Parse a `YYMMDD`, `YYMMDDhhmm` or `YYMMDDhhmmss` date field.
pub fn parse_date(text: &str) -> Result<NaiveDateTime> {
    let malformed = || HashcashError::MalformedStamp(format!("invalid date field '{text}'"));

    if !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }

    match text.len() {
        6 => NaiveDate::parse_from_str(text, DatePrecision::Day.pattern())
            .ok()
            .and_then(|day| day.and_hms_opt(0, 0, 0))
            .ok_or_else(malformed),
        10 => NaiveDateTime::parse_from_str(text, DatePrecision::Minute.pattern())
            .map_err(|_| malformed()),
        12 => NaiveDateTime::parse_from_str(text, DatePrecision::Second.pattern())
            .map_err(|_| malformed()),
        _ => Err(malformed()),
    }
}

/// Reject resources that cannot round-trip through the field layout.
pub fn validate_resource(resource: &str) -> Result<()> {
    if resource.is_empty() {
        return Err(HashcashError::InvalidArgument(
            "the resource cannot be empty".into(),
        ));
    }
    if resource.contains(DELIMITER) {
        return Err(HashcashError::InvalidArgument(format!(
            "the resource cannot contain the field delimiter '{DELIMITER}'"
        )));
    }
    if resource.chars().any(char::is_control) {
        return Err(HashcashError::InvalidArgument(
            "the resource cannot contain control characters".into(),
        ));
    }
    Ok(())
}

/// Fixed leading part of a stamp, up to and including the delimiter before
/// the searched fields.
pub fn stamp_prefix(format: StampFormat, bits: u32, date_text: &str, resource: &str) -> String {
    match format {
        StampFormat::Version0 => format!("0:{date_text}:{resource}:"),
        StampFormat::Version1 => format!("1:{bits}:{date_text}:{resource}::"),
    }
}

/// Total buffer length for a version 1 search: prefix plus at least
/// `minimum_random` filler bytes, rounded up to the SHA-1 block size.
pub fn padded_length(prefix_len: usize, minimum_random: usize) -> usize {
    (prefix_len + minimum_random).next_multiple_of(BLOCK_SIZE)
}

/// Raw bytes behind a version 0 suffix: the random run followed by the
/// counter's little-endian bytes, re-encoded with standard base64.
#[derive(Debug, Clone)]
pub struct LegacySuffix {
    raw: Vec<u8>,
}

impl LegacySuffix {
    pub fn new(random: &[u8]) -> Self {
        let mut raw = Vec::with_capacity(random.len() + 4);
        raw.extend_from_slice(random);
        raw.extend_from_slice(&0i32.to_le_bytes());
        Self { raw }
    }

    #[inline]
    pub fn set_counter(&mut self, counter: i32) {
        let at = self.raw.len() - 4;
        self.raw[at..].copy_from_slice(&counter.to_le_bytes());
    }

    /// Append the encoded suffix to `out`.
    #[inline]
    pub fn encode_into(&self, out: &mut String) {
        STANDARD.encode_string(&self.raw, out);
    }
}

/// Version 0 suffix for one counter value.
pub fn legacy_suffix(random: &[u8], counter: i32) -> String {
    let mut suffix = LegacySuffix::new(random);
    suffix.set_counter(counter);
    let mut out = String::new();
    suffix.encode_into(&mut out);
    out
}

/// A stamp split into its fields.
///
/// Parsing goes by delimiter, never by character offset, so any width of
/// bits or date field is read correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stamp<'a> {
    text: &'a str,
    format: StampFormat,
    bits: Option<u32>,
    fields: Vec<&'a str>,
}

impl<'a> Stamp<'a> {
    pub fn parse(text: &'a str) -> Result<Self> {
        let fields: Vec<&str> = text.split(DELIMITER).collect();

        let format = match fields[0] {
            "0" => StampFormat::Version0,
            "1" => StampFormat::Version1,
            other => {
                return Err(HashcashError::MalformedStamp(format!(
                    "unsupported version field '{other}'"
                )));
            }
        };

        if fields.len() != format.field_count() {
            return Err(HashcashError::MalformedStamp(format!(
                "version {format} stamp needs {} fields, found {}",
                format.field_count(),
                fields.len()
            )));
        }

        let bits = match format {
            StampFormat::Version0 => None,
            StampFormat::Version1 => Some(parse_bits(fields[1])?),
        };

        Ok(Self {
            text,
            format,
            bits,
            fields,
        })
    }

    pub fn format(&self) -> StampFormat {
        self.format
    }

    /// Claimed denomination; version 0 stamps carry none.
    pub fn bits(&self) -> Option<u32> {
        self.bits
    }

    pub fn date_text(&self) -> &'a str {
        match self.format {
            StampFormat::Version0 => self.fields[1],
            StampFormat::Version1 => self.fields[2],
        }
    }

    pub fn date(&self) -> Result<NaiveDateTime> {
        parse_date(self.date_text())
    }

    pub fn resource(&self) -> &'a str {
        match self.format {
            StampFormat::Version0 => self.fields[2],
            StampFormat::Version1 => self.fields[3],
        }
    }

    /// Version 0: the base64 suffix. Version 1: the random field.
    pub fn random_text(&self) -> &'a str {
        match self.format {
            StampFormat::Version0 => self.fields[3],
            StampFormat::Version1 => self.fields[5],
        }
    }

    /// Version 1 counter digits; `None` for version 0.
    pub fn counter_text(&self) -> Option<&'a str> {
        match self.format {
            StampFormat::Version0 => None,
            StampFormat::Version1 => Some(self.fields[6]),
        }
    }

    /// Counter embedded in a version 0 suffix produced by this crate.
    pub fn legacy_counter(&self) -> Option<i32> {
        if self.format != StampFormat::Version0 {
            return None;
        }
        let raw = STANDARD.decode(self.fields[3]).ok()?;
        let tail: [u8; 4] = raw.get(raw.len().checked_sub(4)?..)?.try_into().ok()?;
        Some(i32::from_le_bytes(tail))
    }

    pub fn fields(&self) -> &[&'a str] {
        &self.fields
    }

    /// The exact text that is hashed.
    pub fn as_str(&self) -> &'a str {
        self.text
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }
}

impl fmt::Display for Stamp<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text)
    }
}

fn parse_bits(field: &str) -> Result<u32> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(HashcashError::MalformedStamp(format!(
            "bits field '{field}' is not a number"
        )));
    }
    field
        .parse()
        .map_err(|_| HashcashError::MalformedStamp(format!("bits field '{field}' is out of range")))
}
