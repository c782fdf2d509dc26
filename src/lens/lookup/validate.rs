//! Request input validation
//!
//! Turns the raw `asn` and `irr` query parameters into an [`AsNumber`] and an
//! [`IrrSourceSet`]. Everything here is pure; nothing is spawned until both
//! values have been accepted.

use super::types::{AsNumber, AsnRange, IrrSource, IrrSourceSet};
use crate::config::LookupConfig;
use crate::error::ValidationError;

/// Validate both request parameters against the configured policy tables
pub fn validate(
    config: &LookupConfig,
    raw_asn: &str,
    raw_irr: Option<&str>,
) -> Result<(AsNumber, IrrSourceSet), ValidationError> {
    let asn = parse_asn(raw_asn, &config.reserved_asn_ranges)?;
    let sources = parse_irr_sources(raw_irr, &config.irr_sources)?;
    Ok((asn, sources))
}

/// Parse an ASN given as `15169`, `AS15169` or `as15169`.
///
/// The part after the optional prefix must be ASCII digits only; leading
/// zeros are accepted. Zero, values above `u32::MAX` and values inside any of
/// the `reserved` ranges are rejected with `AsnOutOfRange`.
pub fn parse_asn(raw: &str, reserved: &[AsnRange]) -> Result<AsNumber, ValidationError> {
    let digits = strip_as_prefix(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidAsnFormat(raw.to_string()));
    }

    let significant = digits.trim_start_matches('0');
    // u32::MAX has 10 digits
    if significant.is_empty() || significant.len() > 10 {
        return Err(ValidationError::AsnOutOfRange(raw.to_string()));
    }

    let value = significant
        .parse::<u64>()
        .ok()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| ValidationError::AsnOutOfRange(raw.to_string()))?;

    if reserved.iter().any(|range| range.contains(value)) {
        return Err(ValidationError::AsnOutOfRange(raw.to_string()));
    }

    Ok(AsNumber::new(value))
}

fn strip_as_prefix(raw: &str) -> &str {
    match (raw.get(..2), raw.get(2..)) {
        (Some(prefix), Some(rest)) if prefix.eq_ignore_ascii_case("as") => rest,
        _ => raw,
    }
}

/// Parse a comma-separated IRR source list.
///
/// A missing or blank list selects every `allowed` source. Tokens are trimmed
/// and upper-cased, empty tokens are skipped and duplicates collapse to their
/// first occurrence. The first token not in `allowed` is reported.
pub fn parse_irr_sources(
    raw: Option<&str>,
    allowed: &IrrSourceSet,
) -> Result<IrrSourceSet, ValidationError> {
    let Some(raw) = raw else {
        return Ok(allowed.clone());
    };

    let mut selected: Vec<IrrSource> = Vec::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let token = token.to_ascii_uppercase();
        let source = token
            .parse::<IrrSource>()
            .ok()
            .filter(|source| allowed.contains(*source))
            .ok_or(ValidationError::UnknownIrrSource(token))?;
        selected.push(source);
    }

    Ok(IrrSourceSet::from_ordered(selected).unwrap_or_else(|| allowed.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::lookup::types::DEFAULT_RESERVED_ASN_RANGES;

    fn asn(raw: &str) -> Result<u32, ValidationError> {
        parse_asn(raw, DEFAULT_RESERVED_ASN_RANGES).map(|a| a.value())
    }

    fn sources(raw: Option<&str>) -> Result<String, ValidationError> {
        parse_irr_sources(raw, &IrrSourceSet::all()).map(|s| s.joined())
    }

    #[test]
    fn test_asn_accepted_forms() {
        assert_eq!(asn("15169"), Ok(15169));
        assert_eq!(asn("AS15169"), Ok(15169));
        assert_eq!(asn("as15169"), Ok(15169));
        assert_eq!(asn("As15169"), Ok(15169));
        assert_eq!(asn("AS0015169"), Ok(15169));
        assert_eq!(asn("1"), Ok(1));
        assert_eq!(asn("400427"), Ok(400427));
        assert_eq!(asn("4199999999"), Ok(4199999999));
        // leading zeros beyond ten digits are fine
        assert_eq!(asn("000000000003356"), Ok(3356));
    }

    #[test]
    fn test_asn_invalid_format() {
        for raw in [
            "", "AS", "as", "ASN15169", "AS-1", "-1", "+15169", " 15169", "15169 ", "AS 15169",
            "15169a", "1.5", "0x10", "ASAS1", "١٢٣", "AS15169;rm", "$(id)",
        ] {
            assert_eq!(
                asn(raw),
                Err(ValidationError::InvalidAsnFormat(raw.to_string())),
                "input {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_asn_out_of_range() {
        for raw in [
            "0",
            "AS0",
            "000",
            "4294967296",
            "99999999999",
            "AS12345678901234567890",
            // reserved ranges
            "23456",
            "64496",
            "64512",
            "AS65000",
            "65534",
            "65535",
            "65551",
            "4200000000",
            "4294967294",
            "4294967295",
        ] {
            assert_eq!(
                asn(raw),
                Err(ValidationError::AsnOutOfRange(raw.to_string())),
                "input {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_asn_range_boundaries() {
        assert_eq!(asn("64495"), Ok(64495));
        assert_eq!(asn("65552"), Ok(65552));
        assert_eq!(asn("23455"), Ok(23455));
        assert_eq!(asn("23457"), Ok(23457));
    }

    #[test]
    fn test_asn_custom_reserved_table() {
        let reserved = [AsnRange::new(100, 200)];
        assert!(parse_asn("150", &reserved).is_err());
        assert_eq!(parse_asn("64512", &reserved).map(|a| a.value()), Ok(64512));
        assert!(parse_asn("0", &[]).is_err());
    }

    #[test]
    fn test_irr_default_when_missing_or_blank() {
        let all = IrrSourceSet::all().joined();
        assert_eq!(sources(None), Ok(all.clone()));
        assert_eq!(sources(Some("")), Ok(all.clone()));
        assert_eq!(sources(Some(" , ,")), Ok(all));
    }

    #[test]
    fn test_irr_normalization() {
        assert_eq!(sources(Some("radb")), Ok("RADB".to_string()));
        assert_eq!(sources(Some(" ripe , Level3 ")), Ok("RIPE,LEVEL3".to_string()));
        assert_eq!(sources(Some("RIPE,,RADB,")), Ok("RIPE,RADB".to_string()));
        assert_eq!(
            sources(Some("RADB,ripe,radb,RIPE")),
            Ok("RADB,RIPE".to_string())
        );
    }

    #[test]
    fn test_irr_unknown_reports_first_invalid() {
        assert_eq!(
            sources(Some("FAKE")),
            Err(ValidationError::UnknownIrrSource("FAKE".to_string()))
        );
        assert_eq!(
            sources(Some("RADB,bogus,ALSOBAD")),
            Err(ValidationError::UnknownIrrSource("BOGUS".to_string()))
        );
        assert_eq!(
            sources(Some("RADB;id")),
            Err(ValidationError::UnknownIrrSource("RADB;ID".to_string()))
        );
    }

    #[test]
    fn test_irr_respects_allow_list() {
        let allowed = IrrSourceSet::from_ordered([IrrSource::Radb, IrrSource::Ripe]).unwrap();
        assert_eq!(
            parse_irr_sources(Some("ARIN"), &allowed),
            Err(ValidationError::UnknownIrrSource("ARIN".to_string()))
        );
        assert_eq!(parse_irr_sources(None, &allowed), Ok(allowed.clone()));
    }

    #[test]
    fn test_validate_checks_asn_first() {
        let config = LookupConfig::default();
        let err = validate(&config, "AS0", Some("FAKE")).unwrap_err();
        assert_eq!(err, ValidationError::AsnOutOfRange("AS0".to_string()));

        let (asn, sources) = validate(&config, "AS15169", Some("RADB")).unwrap();
        assert_eq!(asn.value(), 15169);
        assert_eq!(sources.joined(), "RADB");
    }
}
