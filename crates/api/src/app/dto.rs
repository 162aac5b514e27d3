use std::num::IntErrorKind;

use serde::Deserialize;

use skuflow_infra::FindAllParams;
use skuflow_products::SkuStatus;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransitionRequest {
    pub target: SkuStatus,
}

/// Raw `GET /skus` query string. Everything arrives as text so that
/// non-numeric paging values can fall back to defaults instead of failing.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
    pub q: Option<String>,
}

impl ListQuery {
    /// Non-numeric `page`/`limit` are treated as absent; an unknown `status`
    /// is a client error.
    pub fn into_params(self) -> Result<FindAllParams, axum::response::Response> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<SkuStatus>().map_err(|e| {
                errors::json_error(
                    axum::http::StatusCode::BAD_REQUEST,
                    "invalid_status",
                    e.to_string(),
                )
            })?),
        };

        Ok(FindAllParams {
            page: parse_number(self.page.as_deref()),
            limit: parse_number(self.limit.as_deref()),
            status,
            q: self.q,
        })
    }
}

/// Integers outside `i64` saturate so clamping still applies; anything else
/// non-numeric is treated as absent.
fn parse_number(raw: Option<&str>) -> Option<i64> {
    let raw = raw?.trim();
    match raw.parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}
