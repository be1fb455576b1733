//! Page-context contract: the live location plus read/write access to the cookie header.

pub mod memory;

pub use memory::MemoryPage;

// crates.io
use time::{PrimitiveDateTime, format_description::BorrowedFormatItem, macros};
// self
use crate::_prelude::*;

/// Cookie `expires` layout, identical to `Date.prototype.toUTCString`.
const HTTP_DATE: &[BorrowedFormatItem<'static>] = macros::format_description!(
	"[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// Host page capabilities consumed by the link and store layers.
///
/// Browser hosts bridge these calls to `location` and `document.cookie`; other hosts can use
/// [`MemoryPage`].
pub trait PageContext
where
	Self: Send + Sync,
{
	/// Full URL of the current page.
	fn current_url(&self) -> String;

	/// Query string of the current page, without the leading `?`.
	fn current_query_string(&self) -> String;

	/// Outgoing cookie header (`name=value; other=value`).
	fn cookie_header(&self) -> String;

	/// Writes one cookie using `document.cookie` assignment syntax.
	fn set_cookie(&self, cookie: &str);
}

/// Formats `instant` as an HTTP date (`Tue, 20 Oct 2026 08:00:00 GMT`).
pub fn format_http_date(instant: OffsetDateTime) -> String {
	instant
		.to_offset(time::UtcOffset::UTC)
		.format(HTTP_DATE)
		.unwrap_or_else(|_| instant.unix_timestamp().to_string())
}

/// Parses an HTTP date produced by [`format_http_date`].
pub fn parse_http_date(raw: &str) -> Option<OffsetDateTime> {
	PrimitiveDateTime::parse(raw.trim(), HTTP_DATE).ok().map(PrimitiveDateTime::assume_utc)
}
