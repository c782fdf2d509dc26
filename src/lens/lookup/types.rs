//! Types for the prefix lookup lens

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "display")]
use tabled::Tabled;

// =============================================================================
// AS number
// =============================================================================

/// A validated, publicly routable 32-bit AS number.
///
/// Only produced by [`super::validate::parse_asn`], so holding one means the
/// value is non-zero and outside every reserved range it was checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AsNumber(u32);

impl AsNumber {
    pub(crate) fn new(value: u32) -> Self {
        Self(value)
    }

    /// Numeric value of the ASN
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for AsNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl Serialize for AsNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Inclusive range of AS numbers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AsnRange {
    pub start: u32,
    pub end: u32,
}

impl AsnRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub const fn single(asn: u32) -> Self {
        Self {
            start: asn,
            end: asn,
        }
    }

    pub fn contains(&self, asn: u32) -> bool {
        self.start <= asn && asn <= self.end
    }
}

/// Reserved, private-use and documentation AS numbers
pub const DEFAULT_RESERVED_ASN_RANGES: &[AsnRange] = &[
    AsnRange::single(23456), // AS_TRANS, RFC 6793
    AsnRange::new(64496, 64511), // documentation, RFC 5398
    AsnRange::new(64512, 65534), // private use, RFC 6996
    AsnRange::single(65535), // RFC 7300
    AsnRange::new(65536, 65551), // documentation, RFC 5398
    AsnRange::new(4200000000, 4294967294), // private use, RFC 6996
    AsnRange::single(4294967295), // RFC 7300
];

impl fmt::Display for AsnRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for AsnRange {
    type Err = String;

    /// Parse either a single ASN (`"23456"`) or an inclusive range (`"64512-65534"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |v: &str| {
            v.trim()
                .parse::<u32>()
                .map_err(|_| format!("Invalid ASN range '{}'", s))
        };

        let range = match s.split_once('-') {
            Some((start, end)) => AsnRange::new(parse(start)?, parse(end)?),
            None => AsnRange::single(parse(s)?),
        };

        if range.start > range.end {
            return Err(format!(
                "Invalid ASN range '{}': start is greater than end",
                s
            ));
        }
        Ok(range)
    }
}

// =============================================================================
// IRR sources
// =============================================================================

/// Internet Routing Registry databases known to the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IrrSource {
    Afrinic,
    Altdb,
    Apnic,
    Arin,
    Bell,
    Level3,
    Nttcom,
    Radb,
    Reach,
    Ripe,
    Rpki,
    Savvis,
    Tc,
}

impl IrrSource {
    /// All known sources, in alphabetical order
    pub const ALL: [IrrSource; 13] = [
        IrrSource::Afrinic,
        IrrSource::Altdb,
        IrrSource::Apnic,
        IrrSource::Arin,
        IrrSource::Bell,
        IrrSource::Level3,
        IrrSource::Nttcom,
        IrrSource::Radb,
        IrrSource::Reach,
        IrrSource::Ripe,
        IrrSource::Rpki,
        IrrSource::Savvis,
        IrrSource::Tc,
    ];

    /// Registry name as understood by bgpq4's `-S` option
    pub fn as_str(&self) -> &'static str {
        match self {
            IrrSource::Afrinic => "AFRINIC",
            IrrSource::Altdb => "ALTDB",
            IrrSource::Apnic => "APNIC",
            IrrSource::Arin => "ARIN",
            IrrSource::Bell => "BELL",
            IrrSource::Level3 => "LEVEL3",
            IrrSource::Nttcom => "NTTCOM",
            IrrSource::Radb => "RADB",
            IrrSource::Reach => "REACH",
            IrrSource::Ripe => "RIPE",
            IrrSource::Rpki => "RPKI",
            IrrSource::Savvis => "SAVVIS",
            IrrSource::Tc => "TC",
        }
    }
}

impl fmt::Display for IrrSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for IrrSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IrrSource::ALL
            .iter()
            .find(|source| source.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("Unknown IRR source '{}'", s))
    }
}

/// Ordered, duplicate-free, non-empty set of IRR sources
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrrSourceSet(Vec<IrrSource>);

impl IrrSourceSet {
    /// Build a set from sources in priority order; later duplicates are ignored.
    ///
    /// Returns `None` when no sources are given.
    pub(crate) fn from_ordered(sources: impl IntoIterator<Item = IrrSource>) -> Option<Self> {
        let mut unique: Vec<IrrSource> = Vec::new();
        for source in sources {
            if !unique.contains(&source) {
                unique.push(source);
            }
        }
        if unique.is_empty() {
            None
        } else {
            Some(Self(unique))
        }
    }

    /// Every known source, alphabetically
    pub fn all() -> Self {
        Self(IrrSource::ALL.to_vec())
    }

    pub fn contains(&self, source: IrrSource) -> bool {
        self.0.contains(&source)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &IrrSource> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[IrrSource] {
        &self.0
    }

    /// Comma-joined names, e.g. `RADB,RIPE`
    pub fn joined(&self) -> String {
        self.0
            .iter()
            .map(IrrSource::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for IrrSourceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.joined())
    }
}

// =============================================================================
// Prefix records and responses
// =============================================================================

/// One route object returned by the IRR query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "display", derive(Tabled))]
pub struct PrefixRecord {
    /// IPv4 prefix in CIDR notation
    pub prefix: String,
    /// Whether the route object matches the prefix length exactly
    pub exact: bool,
    /// IRR database the route object came from
    pub source: String,
}

/// Result of a successful lookup.
///
/// Serializes as a single-key object: `{"AS15169": [{...}, ...]}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub asn: AsNumber,
    pub prefixes: Vec<PrefixRecord>,
}

impl LookupResponse {
    pub fn new(asn: AsNumber, prefixes: Vec<PrefixRecord>) -> Self {
        Self { asn, prefixes }
    }

    /// Response key, the canonical `AS<number>` form
    pub fn key(&self) -> String {
        self.asn.to_string()
    }
}

impl Serialize for LookupResponse {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key(), &self.prefixes)?;
        map.end()
    }
}
