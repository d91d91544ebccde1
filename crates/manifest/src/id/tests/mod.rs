//! Tests for identifier validation, covering accepted shapes and each rejection path.

use super::*;

#[test]
fn identifiers() {
    for ok in [
        "Microsoft.PowerToys",
        "a.b",
        "Company.Product.Beta",
        "Ölf.Über",
        "7zip.7zip",
    ] {
        assert!(PackageIdentifier::try_from(ok).is_ok(), "{ok} should be valid");
    }
}

#[test]
fn identifier_rejections() {
    assert_eq!(
        PackageIdentifier::try_from(""),
        Err(Error::Empty("package identifier"))
    );
    for bad in [
        "NoDots",
        "Has Space.Pkg",
        "Trailing.",
        ".Leading",
        "A..B",
        "Bad:Char.Pkg",
        "a.b.c.d.e.f.g.h.i",
    ] {
        assert!(
            matches!(
                PackageIdentifier::try_from(bad),
                Err(Error::Malformed { .. })
            ),
            "{bad} should be malformed"
        );
    }

    let segment = "x".repeat(32);
    let long = [segment.as_str(); 5].join(".");
    assert_eq!(
        PackageIdentifier::try_from(long.as_str()),
        Err(Error::TooLong {
            kind: "package identifier",
            max: 128
        })
    );
}

#[test]
fn publisher_segment() -> anyhow::Result<()> {
    let id = PackageIdentifier::try_from("JanDeDobbeleer.OhMyPosh")?;
    assert_eq!(id.publisher_segment(), "JanDeDobbeleer");
    Ok(())
}

#[test]
fn versions() {
    assert!(PackageVersion::try_from("1.2.3-beta+4").is_ok());
    assert!(PackageVersion::try_from("2024.01").is_ok());
    assert_eq!(
        PackageVersion::try_from("  "),
        Err(Error::Empty("package version"))
    );
    assert!(matches!(
        PackageVersion::try_from("1/2"),
        Err(Error::Malformed { .. })
    ));
}

#[test]
fn locales() -> anyhow::Result<()> {
    for ok in ["en", "en-US", "zh-Hans-CN", "es-419", "x-klingon"] {
        assert!(Locale::try_from(ok).is_ok(), "{ok} should be valid");
    }
    for bad in ["e", "en_US", "english-us-"] {
        assert!(Locale::try_from(bad).is_err(), "{bad} should be invalid");
    }
    let locale = Locale::try_from("en-US")?;
    assert!(locale.matches("EN-us"));
    assert!(!locale.matches("en-GB"));
    Ok(())
}

#[test]
fn serde_rejects_invalid() {
    let ok: Result<PackageIdentifier, _> = serde_json::from_str(r#""Foo.Bar""#);
    assert!(ok.is_ok());
    let bad: Result<PackageIdentifier, _> = serde_json::from_str(r#""FooBar""#);
    assert!(bad.is_err());
}
