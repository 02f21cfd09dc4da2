//! # Request Body Validation
//!
//! Validates an HTTP request body against a [`Validator`] without consuming
//! it. The body is read in full and an equivalent body is put back on the
//! request before validation runs, so handlers invoked afterwards read the
//! same bytes. This holds for every outcome except an oversized body.
//!
//! Reading stops once the body exceeds the caller's byte limit. A declared
//! `Content-Length` above the limit is refused before anything is read and
//! leaves the body untouched; a streamed body that overruns the limit is
//! dropped.

use std::error::Error as StdError;

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::header::CONTENT_LENGTH;
use http_body_util::LengthLimitError;
use jsv_schema::{ValidationResult, Validator, ValidatorError};
use thiserror::Error;

/// Operational failure while validating a request body.
#[derive(Error, Debug)]
pub enum RequestValidationError {
    /// The body is larger than the configured limit.
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },

    /// The body stream failed before it could be read in full.
    #[error("cannot read request body: {0}")]
    Body(#[source] axum::Error),

    /// The validator rejected the call (empty body, engine failure).
    #[error(transparent)]
    Validator(#[from] ValidatorError),
}

/// Read at most `limit` body bytes, re-attach them, and validate.
///
/// # Errors
///
/// [`RequestValidationError::TooLarge`] past `limit`,
/// [`RequestValidationError::Body`] if the body cannot be read, otherwise
/// the validator's operational errors (e.g. an empty body).
pub async fn validate_request(
    validator: &Validator,
    request: &mut Request,
    limit: usize,
) -> Result<ValidationResult, RequestValidationError> {
    let bytes = take_body(request, limit).await?;
    Ok(validator.validate_slice(&bytes)?)
}

/// Read the full body and replace it with a replayable copy.
async fn take_body(request: &mut Request, limit: usize) -> Result<Bytes, RequestValidationError> {
    if declared_length(request).is_some_and(|len| len > limit as u64) {
        return Err(RequestValidationError::TooLarge { limit });
    }
    let body = std::mem::take(request.body_mut());
    let bytes = axum::body::to_bytes(body, limit).await.map_err(|err| {
        if exceeds_limit(&err) {
            RequestValidationError::TooLarge { limit }
        } else {
            RequestValidationError::Body(err)
        }
    })?;
    *request.body_mut() = Body::from(bytes.clone());
    Ok(bytes)
}

fn declared_length(request: &Request) -> Option<u64> {
    request
        .headers()
        .get(CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// `to_bytes` reports an overrun as a boxed `LengthLimitError`.
fn exceeds_limit(err: &axum::Error) -> bool {
    let mut source = Some(err as &(dyn StdError + 'static));
    while let Some(current) = source {
        if current.is::<LengthLimitError>() {
            return true;
        }
        source = current.source();
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    const SCHEMA: &str = r#"{
        "type": "object",
        "properties": {"name": {"type": "string", "minLength": 2}},
        "required": ["name"]
    }"#;

    const LIMIT: usize = 1024;

    fn post(body: &'static str) -> Request {
        Request::builder()
            .method("POST")
            .uri("/users")
            .body(Body::from(body))
            .unwrap()
    }

    async fn read_again(request: Request) -> Vec<u8> {
        request.into_body().collect().await.unwrap().to_bytes().to_vec()
    }

    #[tokio::test]
    async fn valid_body_is_replayable() {
        let validator = Validator::from_json_str(SCHEMA).unwrap();
        let mut request = post(r#"{"name": "Ana"}"#);
        let result = validate_request(&validator, &mut request, LIMIT).await.unwrap();
        assert!(result.is_valid());
        assert_eq!(read_again(request).await, br#"{"name": "Ana"}"#);
    }

    #[tokio::test]
    async fn invalid_body_is_replayable() {
        let validator = Validator::from_json_str(SCHEMA).unwrap();
        let mut request = post(r#"{"name": "A"}"#);
        let result = validate_request(&validator, &mut request, LIMIT).await.unwrap();
        assert!(!result.is_valid());
        assert_eq!(read_again(request).await, br#"{"name": "A"}"#);
    }

    #[tokio::test]
    async fn non_json_body_is_invalid_data() {
        let validator = Validator::from_json_str(SCHEMA).unwrap();
        let mut request = post("not json");
        let result = validate_request(&validator, &mut request, LIMIT).await.unwrap();
        assert_eq!(result.errors().len(), 1);
        assert_eq!(result.errors()[0].constraint, "format");
        assert_eq!(read_again(request).await, b"not json");
    }

    #[tokio::test]
    async fn empty_body_is_an_error_and_still_replayable() {
        let validator = Validator::from_json_str(SCHEMA).unwrap();
        let mut request = post("");
        let err = validate_request(&validator, &mut request, LIMIT).await.unwrap_err();
        match err {
            RequestValidationError::Validator(inner) => assert!(inner.is_empty_input()),
            other => panic!("expected empty input, got: {other}"),
        }
        assert!(read_again(request).await.is_empty());
    }

    #[tokio::test]
    async fn body_can_be_validated_twice() {
        let validator = Validator::from_json_str(SCHEMA).unwrap();
        let mut request = post(r#"{"name": "J"}"#);
        let first = validate_request(&validator, &mut request, LIMIT).await.unwrap();
        let second = validate_request(&validator, &mut request, LIMIT).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn streamed_body_over_limit_is_too_large() {
        let validator = Validator::from_json_str(SCHEMA).unwrap();
        let mut request = post(r#"{"name": "a name that is far too long"}"#);
        let err = validate_request(&validator, &mut request, 8).await.unwrap_err();
        assert!(
            matches!(err, RequestValidationError::TooLarge { limit: 8 }),
            "got: {err:?}"
        );
    }

    #[tokio::test]
    async fn declared_length_over_limit_is_refused_unread() {
        let validator = Validator::from_json_str(SCHEMA).unwrap();
        let mut request = Request::builder()
            .method("POST")
            .uri("/users")
            .header(CONTENT_LENGTH, "4096")
            .body(Body::from(r#"{"name": "Ana"}"#))
            .unwrap();
        let err = validate_request(&validator, &mut request, LIMIT).await.unwrap_err();
        assert!(matches!(err, RequestValidationError::TooLarge { .. }), "got: {err:?}");
        assert_eq!(read_again(request).await, br#"{"name": "Ana"}"#);
    }

    #[tokio::test]
    async fn body_exactly_at_limit_is_read() {
        let validator = Validator::from_json_str(SCHEMA).unwrap();
        let body = r#"{"name": "Ana"}"#;
        let mut request = post(body);
        let result = validate_request(&validator, &mut request, body.len()).await.unwrap();
        assert!(result.is_valid());
    }
}
