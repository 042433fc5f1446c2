use dpk_core::digest::DigestType;
use dpk_core::package::{Package, PackageParseError};
use dpk_core::raw_index::RawIndex;
use dpk_core::requirement::{Capability, Requirement};

const MINIMAL: &str = "\
C:Q1fAC5FUAUZuBpW1uE01XS4pCKcYg=
P:zlib
V:1.3.1-r2
T:A compression/decompression Library
U:https://zlib.net/
L:Zlib
S:53241
I:102400
";

fn parse(text: &str) -> Result<Package, PackageParseError> {
    let raw = RawIndex::parse(text).unwrap();
    Package::from_raw(&raw.entries[0])
}

#[test]
fn minimal_entry() {
    let package = parse(MINIMAL).unwrap();
    assert_eq!(package.name, "zlib");
    assert_eq!(package.version, "1.3.1-r2");
    assert_eq!(package.size, 53241);
    assert_eq!(package.installed_size, 102400);
    assert_eq!(package.architecture, None);
    assert_eq!(
        package.checksum.as_ref().map(|c| c.digest_type()),
        Some(DigestType::Sha1)
    );
}

#[test]
fn lists_and_optional_fields() {
    let text = format!(
        "{MINIMAL}A:aarch64\nD:so:libc.musl-aarch64.so.1 !zlib-dev\np:so:libz.so.1=1.3.1 libz\ni:zlib-dev=1.3.1-r2 docs\nk:10\nt:1700000000\no:zlib\nc:abc123\n"
    );
    let package = parse(&text).unwrap();
    assert_eq!(package.architecture.as_deref(), Some("aarch64"));
    assert_eq!(
        package.dependencies,
        vec![
            Requirement::any("so:libc.musl-aarch64.so.1"),
            Requirement::parse("!zlib-dev").unwrap(),
        ]
    );
    assert_eq!(
        package.provides,
        vec![
            Capability::Specific {
                name: "so:libz.so.1".to_string(),
                version: "1.3.1".to_string()
            },
            Capability::Any {
                name: "libz".to_string()
            },
        ]
    );
    assert_eq!(package.install_if.len(), 2);
    assert_eq!(package.provider_priority, Some(10));
    assert_eq!(package.build_time, Some(1_700_000_000));
    assert_eq!(package.origin.as_deref(), Some("zlib"));
    assert_eq!(package.commit.as_deref(), Some("abc123"));
}

#[test]
fn missing_required_key() {
    let text = MINIMAL.replace("L:Zlib\n", "");
    assert_eq!(parse(&text).unwrap_err(), PackageParseError::Required { key: 'L' });
}

#[test]
fn missing_checksum_is_reported_first() {
    let text = MINIMAL.replace("C:Q1fAC5FUAUZuBpW1uE01XS4pCKcYg=\n", "").replace("P:zlib\n", "");
    assert_eq!(parse(&text).unwrap_err(), PackageParseError::Required { key: 'C' });
}

#[test]
fn bad_values() {
    let bad_size = MINIMAL.replace("S:53241", "S:lots");
    assert!(matches!(
        parse(&bad_size).unwrap_err(),
        PackageParseError::BadValue { key: 'S', .. }
    ));

    let bad_digest = MINIMAL.replace("C:Q1fAC5FUAUZuBpW1uE01XS4pCKcYg=", "C:nope");
    assert!(matches!(
        parse(&bad_digest).unwrap_err(),
        PackageParseError::BadValue { key: 'C', .. }
    ));

    let bad_priority = format!("{MINIMAL}k:70000\n");
    assert!(matches!(
        parse(&bad_priority).unwrap_err(),
        PackageParseError::BadValue { key: 'k', .. }
    ));

    let reserved_priority = format!("{MINIMAL}k:65535\n");
    assert!(matches!(
        parse(&reserved_priority).unwrap_err(),
        PackageParseError::BadValue { key: 'k', .. }
    ));

    let bad_dependency = format!("{MINIMAL}D:foo<>1\n");
    assert!(matches!(
        parse(&bad_dependency).unwrap_err(),
        PackageParseError::BadValue { key: 'D', .. }
    ));

    let bad_provision = format!("{MINIMAL}p:foo>=1\n");
    assert!(matches!(
        parse(&bad_provision).unwrap_err(),
        PackageParseError::BadValue { key: 'p', .. }
    ));
}

#[test]
fn highest_provider_priority() {
    let package = parse(&format!("{MINIMAL}k:65534\n")).unwrap();
    assert_eq!(package.provider_priority, Some(65534));
}

#[test]
fn installed_database_and_lowercase_keys_are_ignored() {
    let text = format!("{MINIMAL}F:usr/lib\nR:libz.so.1\nZ:Q1abc\na:0:0:755\nx:whatever\n");
    assert!(parse(&text).is_ok());
}

#[test]
fn unknown_uppercase_key_is_rejected() {
    let text = format!("{MINIMAL}W:what\n");
    assert_eq!(
        parse(&text).unwrap_err(),
        PackageParseError::UnexpectedKey { key: 'W' }
    );
}

#[test]
fn descriptions() {
    let package = parse(&format!("{MINIMAL}A:x86_64\n")).unwrap();
    assert_eq!(package.name_description(), "zlib-1.3.1-r2 x86_64");
    assert_eq!(
        package.short_description(),
        "zlib-1.3.1-r2 x86_64\n \\_ A compression/decompression Library"
    );
}

#[test]
fn info_block() {
    let text = format!("{MINIMAL}D:so:libc.musl-x86_64.so.1\n");
    let info = parse(&text).unwrap().to_string();
    assert!(info.starts_with(
        "index checksum: [SHA-1] 7C00B915401466E0695B5B84D355D2E2908A7188\n"
    ));
    assert!(info.contains("name: --------- zlib\n"));
    assert!(info.contains("package size: - 53241 byte(s) (53.2 KB)\n"));
    assert!(info.contains("dependencies: - so:libc.musl-x86_64.so.1\n"));
    assert!(!info.contains("provides:"));
}

#[test]
fn serializes_to_json() {
    let package = parse(MINIMAL).unwrap();
    let json = serde_json::to_value(&package).unwrap();
    assert_eq!(json["name"], "zlib");
    assert_eq!(
        json["checksum"],
        "[SHA-1] 7C00B915401466E0695B5B84D355D2E2908A7188"
    );
    assert!(json.get("origin").is_none());
}
