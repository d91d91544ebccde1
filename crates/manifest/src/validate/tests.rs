use serde_json::json;

use super::switch::{InstallerSwitch, SwitchRequirement};
use super::*;
use crate::record::{InstallerSwitches, InstallerType};

#[test]
fn blank_rejected_when_required() {
    let boundaries = Boundaries::default();
    for category in FieldCategory::ALL {
        for blank in ["", "   ", "\t\n"] {
            assert_eq!(
                boundaries.validate(blank, category, false),
                Err(ValidationError::BlankInput {
                    label: category.label()
                }),
                "{category:?} should reject {blank:?}"
            );
        }
    }
}

#[test]
fn blank_allowed_never_blank_error() {
    let boundaries = Boundaries::default();
    for category in FieldCategory::ALL {
        let max = boundaries.get(category).max;
        for candidate in ["", " ", "x", "  padded  ", &"y".repeat(max + 1)] {
            let outcome = boundaries.validate(candidate, category, true);
            assert!(
                !matches!(outcome, Err(ValidationError::BlankInput { .. })),
                "{category:?} produced a blank error for {candidate:?}"
            );
        }
    }
}

#[test]
fn too_long_carries_exact_boundary() {
    let boundaries = Boundaries::default();
    for category in FieldCategory::ALL {
        let Boundary { min, max } = category.default_boundary();
        let candidate = "a".repeat(max + 1);
        for allow_blank in [true, false] {
            assert_eq!(
                boundaries.validate(&candidate, category, allow_blank),
                Err(ValidationError::InvalidLength { min, max })
            );
        }
        assert!(boundaries.validate(&"a".repeat(max), category, false).is_ok());
    }
}

#[test]
fn length_counts_characters() {
    let boundaries = Boundaries::default();
    let candidate = "ü".repeat(40);
    assert_eq!(
        boundaries.validate(&candidate, FieldCategory::Tag, false),
        Ok(candidate)
    );
}

#[test]
fn accepted_value_is_trimmed() {
    let boundaries = Boundaries::default();
    assert_eq!(
        boundaries.validate("  Foo Corp \n", FieldCategory::Publisher, false),
        Ok("Foo Corp".to_owned())
    );
}

#[test]
fn schema_boundaries() {
    let schema = json!({
        "definitions": {
            "Tag": { "type": "string", "minLength": 2, "maxLength": 10 },
            "InstallerSwitches": {
                "properties": {
                    "Silent": { "maxLength": 64 }
                }
            }
        },
        "properties": {
            "Publisher": { "minLength": 4, "maxLength": 8 },
            "Moniker": { "$ref": "#/definitions/Tag" }
        }
    });
    let boundaries = Boundaries::from_schema(&schema);

    assert_eq!(boundaries.get(FieldCategory::Publisher), Boundary { min: 4, max: 8 });
    assert_eq!(boundaries.get(FieldCategory::Moniker), Boundary { min: 2, max: 10 });
    assert_eq!(boundaries.get(FieldCategory::SilentSwitch), Boundary { min: 1, max: 64 });
    assert_eq!(
        boundaries.get(FieldCategory::License),
        FieldCategory::License.default_boundary()
    );
    assert_eq!(
        boundaries.validate("Too long name", FieldCategory::Publisher, false),
        Err(ValidationError::InvalidLength { min: 4, max: 8 })
    );
}

#[test]
fn merged_schemas() {
    let locale = Boundaries::from_schema(&json!({
        "properties": { "Publisher": { "maxLength": 8 } }
    }));
    let installer = Boundaries::from_schema(&json!({
        "definitions": { "InstallerSwitches": { "properties": { "Custom": { "maxLength": 5 } } } }
    }));
    let merged = locale.merge(installer);
    assert_eq!(merged.get(FieldCategory::Publisher).max, 8);
    assert_eq!(merged.get(FieldCategory::CustomSwitch).max, 5);
}

#[test]
fn category_parsing() {
    assert_eq!("publisher".parse(), Ok(FieldCategory::Publisher));
    assert_eq!("short-description".parse(), Ok(FieldCategory::ShortDescription));
    assert_eq!("SilentWithProgressSwitch".parse(), Ok(FieldCategory::SilentWithProgressSwitch));
    assert!("nope".parse::<FieldCategory>().is_err());
}

#[test]
fn switch_requirements() {
    use InstallerSwitch::*;
    let exe = Some(InstallerType::Exe);
    let msi = Some(InstallerType::Msi);

    assert_eq!(Silent.requirement(exe), SwitchRequirement::Required);
    assert_eq!(SilentWithProgress.requirement(exe), SwitchRequirement::Required);
    assert_eq!(Custom.requirement(exe), SwitchRequirement::Optional);
    assert_eq!(Silent.requirement(msi), SwitchRequirement::Skip);
    assert_eq!(Custom.requirement(msi), SwitchRequirement::Optional);
    assert_eq!(Silent.requirement(None), SwitchRequirement::Skip);
}

#[test]
fn accept_switch() {
    let boundaries = Boundaries::default();
    assert_eq!(
        boundaries.accept_switch("", InstallerSwitch::Silent, SwitchRequirement::Required),
        Err(ValidationError::BlankInput {
            label: "Silent switch"
        })
    );
    assert_eq!(
        boundaries.accept_switch("  ", InstallerSwitch::Custom, SwitchRequirement::Optional),
        Ok(None)
    );
    assert_eq!(
        boundaries.accept_switch(" /S ", InstallerSwitch::Silent, SwitchRequirement::Required),
        Ok(Some("/S".to_owned()))
    );

    let mut switches = InstallerSwitches::default();
    switches.set(InstallerSwitch::Custom, Some("/norestart".into()));
    assert_eq!(switches.get(InstallerSwitch::Custom), Some("/norestart"));
    assert!(!switches.is_empty());
}
