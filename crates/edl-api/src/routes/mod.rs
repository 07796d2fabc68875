//! # Route Modules
//!
//! Each module defines an Axum router for one API surface area. The
//! routers are assembled into the application in the crate root.
//!
//! Every data route is tenant-scoped through a `tenant_id` query
//! parameter. A missing or blank value is a validation failure (422),
//! and an invalid slug never reaches a handler body.

pub mod audit;
pub mod entities;
pub mod evidence;
pub mod suggestions;
pub mod workitems;

use serde::Deserialize;
use utoipa::IntoParams;

use edl_core::TenantId;

use crate::AppError;

/// Query parameters for routes that need only the tenant scope.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TenantQuery {
    /// Tenant slug, e.g. `tenant-demo`. Required.
    #[serde(default)]
    pub tenant_id: String,
}

impl TenantQuery {
    pub fn tenant(&self) -> Result<TenantId, AppError> {
        tenant_param(&self.tenant_id)
    }
}

/// Parse a `tenant_id` query value.
///
/// Absent and blank both land here as the empty string, so the two
/// cases produce the same 422.
pub(crate) fn tenant_param(slug: &str) -> Result<TenantId, AppError> {
    if slug.is_empty() {
        return Err(AppError::Validation(
            "the tenant_id query parameter is required".to_string(),
        ));
    }
    TenantId::new(slug).map_err(|err| AppError::Validation(err.to_string()))
}
