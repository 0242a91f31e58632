//! Metrics for token verification and Management API traffic.

// std
#[cfg(feature = "prometheus")] use std::sync::OnceLock;
// crates.io
use http::StatusCode;
use metrics::Label;
#[cfg(feature = "prometheus")]
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use smallvec::SmallVec;
// self
use crate::{_prelude::*, error::AuthError};

type LabelSet = SmallVec<[Label; 4]>;

const METRIC_VERIFICATIONS_TOTAL: &str = "auth0_token_verifications_total";
const METRIC_MANAGEMENT_REQUESTS_TOTAL: &str = "auth0_management_requests_total";
const METRIC_MANAGEMENT_DURATION: &str = "auth0_management_request_duration_seconds";

/// Shared Prometheus handle installed by [`install_default_exporter`].
#[cfg(feature = "prometheus")]
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the default Prometheus recorder backed by `metrics`.
///
/// Multiple invocations are safe; subsequent calls become no-ops once the recorder is installed.
#[cfg(feature = "prometheus")]
pub fn install_default_exporter() -> Result<()> {
	if PROMETHEUS_HANDLE.get().is_some() {
		return Ok(());
	}

	let handle = PrometheusBuilder::new()
		.install_recorder()
		.map_err(|err| Error::Validation { field: "metrics", reason: err.to_string() })?;
	let _ = PROMETHEUS_HANDLE.set(handle);

	Ok(())
}

/// Access the global Prometheus exporter handle when installed.
#[cfg(feature = "prometheus")]
pub fn prometheus_handle() -> Option<&'static PrometheusHandle> {
	PROMETHEUS_HANDLE.get()
}

/// Record the outcome of a token verification.
pub fn record_verification(failure: Option<&AuthError>) {
	let outcome = match failure {
		None => "verified",
		Some(AuthError::MissingToken) => "missing",
		Some(AuthError::Expired) => "expired",
		Some(AuthError::InvalidAudience) => "audience",
		Some(AuthError::InvalidIssuer) => "issuer",
		Some(AuthError::InvalidSignature) => "signature",
		Some(_) => "invalid",
	};
	let mut labels = LabelSet::new();

	labels.push(Label::new("outcome", outcome));

	metrics::counter!(METRIC_VERIFICATIONS_TOTAL, labels.iter()).increment(1);
}

/// Record a completed Management API request with its status and latency.
pub fn record_management_request(operation: &'static str, status: StatusCode, elapsed: Duration) {
	let mut labels = operation_labels(operation);

	metrics::histogram!(METRIC_MANAGEMENT_DURATION, labels.iter()).record(elapsed.as_secs_f64());

	labels.push(Label::new("status", status.as_u16().to_string()));

	metrics::counter!(METRIC_MANAGEMENT_REQUESTS_TOTAL, labels.iter()).increment(1);
}

fn operation_labels(operation: &'static str) -> LabelSet {
	let mut labels = LabelSet::with_capacity(2);

	labels.push(Label::new("operation", operation));

	labels
}
