// self
use crate::obs::{GrantKind, GrantOutcome, TokenOutcome};

/// Records a grant exchange outcome via the global metrics recorder (when enabled).
pub fn record_grant_outcome(kind: GrantKind, outcome: GrantOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_bearer_grant_total",
			"grant" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records how a token lookup was served (when metrics are enabled).
pub fn record_token_outcome(outcome: TokenOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_bearer_token_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}
