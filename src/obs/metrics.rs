// self
use crate::{
	obs::{OpKind, OpOutcome},
	store::StoreMode,
};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_op_outcome(kind: OpKind, outcome: OpOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"oauth2_page_login_op_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

/// Records which mode a store settled on (when enabled).
pub fn record_store_mode(mode: StoreMode) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("oauth2_page_login_store_mode_total", "mode" => mode.as_str())
			.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = mode;
	}
}
