use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

/// Counts calls per field and answers from a fixed table.
#[derive(Default)]
struct CountingProbe {
    inner: StaticProbe,
    calls: Mutex<HashMap<DetectedField, usize>>,
}

impl CountingProbe {
    fn calls(&self, field: DetectedField) -> usize {
        self.calls
            .lock()
            .map(|c| c.get(&field).copied().unwrap_or(0))
            .unwrap_or(0)
    }
}

impl Probe for CountingProbe {
    fn probe(
        &self,
        field: DetectedField,
    ) -> impl Future<Output = Result<Option<String>, BoxError>> + Send {
        if let Ok(mut calls) = self.calls.lock() {
            *calls.entry(field).or_default() += 1;
        }
        self.inner.probe(field)
    }
}

struct FailingProbe;

impl Probe for FailingProbe {
    async fn probe(&self, _: DetectedField) -> Result<Option<String>, BoxError> {
        Err("platform unreachable".into())
    }
}

struct SlowProbe(AtomicUsize);

impl Probe for SlowProbe {
    async fn probe(&self, _: DetectedField) -> Result<Option<String>, BoxError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(Some("MIT".into()))
    }
}

#[tokio::test]
async fn fields_resolve_independently_and_once() {
    let probe = CountingProbe {
        inner: StaticProbe::default()
            .with(DetectedField::License, "MIT")
            .with(DetectedField::PackageUrl, "https://example.com/pkg"),
        ..Default::default()
    };
    let detector = Detector::new(probe);

    assert_eq!(detector.license().await, Some("MIT"));
    assert!(detector.is_resolved(DetectedField::License));
    assert!(!detector.is_resolved(DetectedField::PackageUrl));

    let (a, b) = tokio::join!(detector.license(), detector.license());
    assert_eq!((a, b), (Some("MIT"), Some("MIT")));
    assert_eq!(detector.probe.calls(DetectedField::License), 1);
    assert_eq!(detector.probe.calls(DetectedField::PackageUrl), 0);

    let url = detector.package_url().await.map(Url::as_str);
    assert_eq!(url, Some("https://example.com/pkg"));
    assert_eq!(detector.probe.calls(DetectedField::PackageUrl), 1);
}

#[tokio::test]
async fn absent_outcome_is_cached() {
    let detector = Detector::new(CountingProbe::default());
    assert_eq!(detector.short_description().await, None);
    assert_eq!(detector.short_description().await, None);
    assert_eq!(detector.probe.calls(DetectedField::ShortDescription), 1);
}

#[tokio::test]
async fn failures_resolve_to_absent() {
    let detector = Detector::new(FailingProbe);
    assert_eq!(detector.license().await, None);
    assert_eq!(detector.release_notes_url().await, None);
}

#[tokio::test]
async fn malformed_and_blank_values_are_absent() {
    let probe = StaticProbe::default()
        .with(DetectedField::PublisherUrl, "not a url")
        .with(DetectedField::License, "   ")
        .with(DetectedField::ReleaseNotes, "  Fixed a crash.\n");
    let detector = Detector::new(probe);
    assert_eq!(detector.publisher_url().await, None);
    assert_eq!(detector.license().await, None);
    assert_eq!(detector.release_notes().await, Some("Fixed a crash."));
}

#[tokio::test]
async fn timeout_resolves_to_absent() {
    let detector =
        Detector::new(SlowProbe(AtomicUsize::new(0))).with_timeout(Duration::from_millis(10));
    assert_eq!(detector.license().await, None);
    assert_eq!(detector.license().await, None);
    assert_eq!(detector.probe.0.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn composed_probes() {
    let primary = StaticProbe::default().with(DetectedField::License, "MIT");
    let fallback = StaticProbe::default()
        .with(DetectedField::License, "GPL-3.0")
        .with(DetectedField::ShortDescription, "A tool");
    let detector = Detector::new((Some(primary), fallback));
    assert_eq!(detector.license().await, Some("MIT"));
    assert_eq!(detector.short_description().await, Some("A tool"));

    let none: Option<StaticProbe> = None;
    let detector = Detector::new((none, (FailingProbe, StaticProbe::default())));
    assert_eq!(detector.license().await, None);
}

#[test]
fn static_probe_from_toml() -> anyhow::Result<()> {
    let probe = StaticProbe::from_toml(
        r#"
        license = "MIT"
        release_notes_url = "https://example.com/notes"
        "#,
    )?;
    assert_eq!(
        probe,
        StaticProbe::default()
            .with(DetectedField::License, "MIT")
            .with(DetectedField::ReleaseNotesUrl, "https://example.com/notes")
    );

    let err = StaticProbe::from_toml(r#"licence = "MIT""#);
    assert!(matches!(err, Err(StaticProbeError::UnknownField(f)) if f == "licence"));
    Ok(())
}
