//! Observability for token operations.
//!
//! # Feature Flags
//!
//! - `tracing` wraps each operation in a `box_oauth2.flow` span carrying `flow`, `stage` and the
//!   authenticating `client_id`. Failures fill in the `error` and `status` fields.
//! - `metrics` increments `box_oauth2_flow_total`, labeled by `flow`, `outcome`, `error` and
//!   `status`. Attempts and successes use `none` for the last two.
//!
//! Secrets, assertions, and issued tokens are never recorded.

// self
use crate::{
	_prelude::*,
	auth::ClientId,
	grant::{GrantType, param},
};

const NONE_LABEL: &str = "none";

/// Token operations observed by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowKind {
	/// Client Credentials grant.
	ClientCredentials,
	/// JWT bearer grant.
	JwtBearer,
	/// Acquisition whose `grant_type` is missing or unknown.
	Unsupported,
	/// Token refresh.
	Refresh,
	/// Token revocation.
	Revoke,
}
impl FlowKind {
	/// Classifies a loose parameter map by its `grant_type`.
	pub fn of_params(params: &BTreeMap<String, String>) -> Self {
		params
			.get(param::GRANT_TYPE)
			.and_then(|value| value.parse::<GrantType>().ok())
			.map_or(FlowKind::Unsupported, FlowKind::from)
	}

	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowKind::ClientCredentials => "client_credentials",
			FlowKind::JwtBearer => "jwt_bearer",
			FlowKind::Unsupported => "unsupported",
			FlowKind::Refresh => "refresh",
			FlowKind::Revoke => "revoke",
		}
	}
}
impl Display for FlowKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
impl From<GrantType> for FlowKind {
	fn from(grant: GrantType) -> Self {
		match grant {
			GrantType::ClientCredentials => FlowKind::ClientCredentials,
			GrantType::JwtBearer => FlowKind::JwtBearer,
		}
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FlowOutcome {
	/// Entry to a token operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl FlowOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			FlowOutcome::Attempt => "attempt",
			FlowOutcome::Success => "success",
			FlowOutcome::Failure => "failure",
		}
	}
}
impl Display for FlowOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Failure class and upstream status attached to a failed operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FlowFailure {
	/// [`Error::kind`] label.
	pub error: &'static str,
	/// HTTP status, when the token endpoint answered.
	pub status: Option<u16>,
}
impl FlowFailure {
	/// Classifies `err`.
	pub fn of(err: &Error) -> Self {
		Self { error: err.kind(), status: err.status() }
	}

	/// Status rendered as a label value.
	pub fn status_label(&self) -> String {
		self.status.map_or_else(|| NONE_LABEL.to_owned(), |status| status.to_string())
	}
}

/// Records one outcome through the global metrics recorder (when enabled).
pub fn record_flow_outcome(kind: FlowKind, outcome: FlowOutcome, failure: Option<FlowFailure>) {
	#[cfg(test)]
	recorded::push(kind, outcome, failure);

	#[cfg(feature = "metrics")]
	{
		let (error, status) = match failure {
			Some(failure) => (failure.error, failure.status_label()),
			None => (NONE_LABEL, NONE_LABEL.to_owned()),
		};

		metrics::counter!(
			"box_oauth2_flow_total",
			"flow" => kind.as_str(),
			"outcome" => outcome.as_str(),
			"error" => error,
			"status" => status
		)
		.increment(1);
	}

	#[cfg(not(any(test, feature = "metrics")))]
	{
		let _ = (kind, outcome, failure);
	}
}

/// Observation scope of one token operation.
#[derive(Debug)]
pub(crate) struct FlowSpan {
	kind: FlowKind,
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl FlowSpan {
	pub(crate) fn new(kind: FlowKind, stage: &'static str, client_id: Option<&ClientId>) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!(
				"box_oauth2.flow",
				flow = kind.as_str(),
				stage,
				client_id = client_id.map(|id| id.as_ref()),
				error = tracing::field::Empty,
				status = tracing::field::Empty,
			);

			Self { kind, span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (stage, client_id);

			Self { kind }
		}
	}

	/// Drives `operation` inside the span and records attempt plus success or failure.
	pub(crate) async fn observe<T, F>(self, operation: F) -> Result<T>
	where
		F: Future<Output = Result<T>>,
	{
		record_flow_outcome(self.kind, FlowOutcome::Attempt, None);

		#[cfg(feature = "tracing")]
		let result = {
			use tracing::Instrument;

			operation.instrument(self.span.clone()).await
		};
		#[cfg(not(feature = "tracing"))]
		let result = operation.await;

		match &result {
			Ok(_) => record_flow_outcome(self.kind, FlowOutcome::Success, None),
			Err(err) => self.fail(FlowFailure::of(err)),
		}

		result
	}

	fn fail(&self, failure: FlowFailure) {
		#[cfg(feature = "tracing")]
		{
			self.span.record("error", failure.error);

			if let Some(status) = failure.status {
				self.span.record("status", status);
			}
		}

		record_flow_outcome(self.kind, FlowOutcome::Failure, Some(failure));
	}
}
