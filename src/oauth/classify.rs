//! Heuristics mapping token endpoint error responses onto authentication failure categories.
//!
//! Structured OAuth fields win, then hints inside `error_description`, then the HTTP status.

/// Category assigned to a token endpoint error response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ErrorClass {
	InvalidGrant,
	InvalidClient,
	InsufficientScope,
	Transient,
}

pub(crate) fn classify(
	oauth_error: Option<&str>,
	error_description: Option<&str>,
	status: Option<u16>,
) -> ErrorClass {
	oauth_error
		.and_then(match_exact_value)
		.or_else(|| error_description.and_then(match_exact_value))
		.or_else(|| classify_text(error_description))
		.unwrap_or_else(|| classify_status(status))
}

fn match_exact_value(value: &str) -> Option<ErrorClass> {
	if value.eq_ignore_ascii_case("invalid_grant") || value.eq_ignore_ascii_case("access_denied") {
		Some(ErrorClass::InvalidGrant)
	} else if value.eq_ignore_ascii_case("invalid_client")
		|| value.eq_ignore_ascii_case("unauthorized_client")
	{
		Some(ErrorClass::InvalidClient)
	} else if value.eq_ignore_ascii_case("invalid_scope")
		|| value.eq_ignore_ascii_case("insufficient_scope")
	{
		Some(ErrorClass::InsufficientScope)
	} else if value.eq_ignore_ascii_case("temporarily_unavailable")
		|| value.eq_ignore_ascii_case("server_error")
	{
		Some(ErrorClass::Transient)
	} else {
		None
	}
}

fn classify_text(text: Option<&str>) -> Option<ErrorClass> {
	let lowered = text?.to_ascii_lowercase();

	match lowered.as_str() {
		text if text.contains("invalid_grant") => Some(ErrorClass::InvalidGrant),
		text if text.contains("invalid_client") => Some(ErrorClass::InvalidClient),
		text if text.contains("insufficient_scope") || text.contains("invalid_scope") =>
			Some(ErrorClass::InsufficientScope),
		text if text.contains("temporarily_unavailable") || text.contains("retry") =>
			Some(ErrorClass::Transient),
		_ => None,
	}
}

fn classify_status(status: Option<u16>) -> ErrorClass {
	match status {
		Some(400 | 404 | 410) => ErrorClass::InvalidGrant,
		Some(401) => ErrorClass::InvalidClient,
		Some(403) => ErrorClass::InsufficientScope,
		_ => ErrorClass::Transient,
	}
}
