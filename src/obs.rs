//! Optional observability helpers for requests and store decisions.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `oauth2_page_login.op` with the `op` and
//!   `stage` fields, plus events for store-mode decisions and absorbed storage errors.
//! - Enable `metrics` to increment the `oauth2_page_login_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`, and the
//!   `oauth2_page_login_store_mode_total` counter labeled by `mode`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
///
/// Typed and untyped posts share [`OpKind::Post`]; spans tell them apart through their `stage`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpKind {
	/// Token-attaching form POST.
	Post,
}
impl OpKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpKind::Post => "post",
		}
	}
}
impl Display for OpKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to a helper.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn labels_are_stable() {
		assert_eq!(OpKind::Post.to_string(), "post");
		assert_eq!(OpOutcome::Failure.to_string(), "failure");
	}
}
