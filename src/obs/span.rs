// self
use crate::{_prelude::*, obs::GrantKind};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type Instrumented<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type Instrumented<F> = F;

/// Span wrapper used around grant exchanges and manager lookups.
#[derive(Clone, Debug)]
pub struct ObsSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl ObsSpan {
	/// Creates a span for a token endpoint exchange.
	pub fn grant(kind: GrantKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_bearer.grant", grant = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Creates a span for a token manager operation.
	pub fn manager(stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::debug_span!("oauth2_bearer.manager", stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = stage;

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> Instrumented<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Emits a warning event when tracing is enabled.
pub(crate) fn warn(message: &str, error: &dyn StdError) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = %error, "{message}");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (message, error);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn instrument_passes_values_through() {
		let span = ObsSpan::grant(GrantKind::RefreshToken, "instrument_passes_values_through");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
		assert_eq!(ObsSpan::manager("test").instrument(async { "ok" }).await, "ok");
	}
}
