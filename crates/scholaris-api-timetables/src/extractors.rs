//! Request extractors for organization scoping.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use uuid::Uuid;

use crate::error::TimetablesError;

/// Header carrying the organization scope for every request.
pub const ORGANIZATION_HEADER: &str = "X-Organization-Id";

/// Extracts the organization id from the `X-Organization-Id` header.
///
/// Scoping is always explicit: a missing or malformed header is rejected
/// with a 400 before any handler logic runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrgContext(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for OrgContext
where
    S: Send + Sync,
{
    type Rejection = TimetablesError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(ORGANIZATION_HEADER)
            .ok_or_else(|| {
                TimetablesError::Validation(format!("Missing {ORGANIZATION_HEADER} header"))
            })?
            .to_str()
            .map_err(|_| {
                TimetablesError::Validation(format!("Invalid {ORGANIZATION_HEADER} header"))
            })?;

        let organization_id = Uuid::parse_str(header).map_err(|_| {
            TimetablesError::Validation(format!(
                "Invalid {ORGANIZATION_HEADER} header: expected a UUID"
            ))
        })?;

        Ok(OrgContext(organization_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_extracts_valid_header() {
        let id = Uuid::new_v4();
        let request = Request::builder()
            .header(ORGANIZATION_HEADER, id.to_string())
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let extracted = OrgContext::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(extracted.0, id);
    }

    #[tokio::test]
    async fn test_rejects_missing_header() {
        let request = Request::builder().body(()).unwrap();
        let (mut parts, _) = request.into_parts();

        let result = OrgContext::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(TimetablesError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rejects_malformed_uuid() {
        let request = Request::builder()
            .header(ORGANIZATION_HEADER, "not-a-uuid")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let result = OrgContext::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(TimetablesError::Validation(_))));
    }
}
