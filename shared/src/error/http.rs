//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            // 404 Not Found
            //
            // A rule with an unusable basePrice is reported like a missing rule:
            // the caller cannot do anything different about it.
            Self::NotFound
            | Self::PricingRuleNotFound
            | Self::PricingRuleNotConfigured => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists => StatusCode::CONFLICT,

            // 503 Service Unavailable (transient, client can retry)
            Self::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 400 Bad Request
            Self::ValidationFailed => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_and_unavailable_are_distinct() {
        assert_eq!(
            ErrorCode::PricingRuleNotConfigured.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::ServiceUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_validation_is_bad_request() {
        assert_eq!(
            ErrorCode::ValidationFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
    }
}
