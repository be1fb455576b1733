// self
use crate::{
	_prelude::*,
	obs::{self, OpKind},
	store::{StorageError, StoreMode},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by request operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation kind + stage.
	pub fn new(kind: OpKind, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("oauth2_page_login.op", op = kind.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, stage);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
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

/// Notes the mode a store settled on after its probe.
pub fn store_mode_selected(mode: StoreMode) {
	#[cfg(feature = "tracing")]
	tracing::debug!(mode = mode.as_str(), "key/value store mode selected");

	obs::record_store_mode(mode);
}

/// Notes a durable-storage failure that was absorbed instead of surfaced.
pub fn storage_error_absorbed(op: &'static str, error: &StorageError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(op, %error, "durable storage call failed");

	#[cfg(not(feature = "tracing"))]
	{
		let _ = (op, error);
	}
}
