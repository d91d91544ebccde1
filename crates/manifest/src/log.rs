//! Progress presentation for detector probes.
//!
//! Styling only takes effect when the binary installs an indicatif layer; otherwise these
//! calls do nothing.
use std::fmt::Display;

use tracing::Span;
use tracing_indicatif::span_ext::IndicatifSpanExt;
use tracing_indicatif::style::ProgressStyle;

/// Style `span` as a spinner for a pending probe of `field`.
pub fn probe_spinner(span: &Span, field: impl Display) {
    span.pb_set_style(
        &ProgressStyle::with_template("  {spinner:.blue} {wide_msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    span.pb_set_message(&format!("detecting {field}"));
}
