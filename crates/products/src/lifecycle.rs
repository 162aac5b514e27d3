//! SKU lifecycle rules (pure, deterministic).
//!
//! Each `plan_*` function inspects the current record and the caller's
//! request and either rejects it or returns exactly what a store has to
//! write. None of them perform IO; the caller supplies `now`.
//!
//! ```text
//! PRE_CADASTRO      -> CADASTRO_COMPLETO | CANCELADO
//! CADASTRO_COMPLETO -> PRE_CADASTRO | ATIVO | CANCELADO
//! ATIVO             -> DESATIVADO
//! DESATIVADO        -> ATIVO | PRE_CADASTRO
//! CANCELADO         -> (terminal)
//!
//! CADASTRO_COMPLETO --(descricaoComercial edit)--> PRE_CADASTRO
//! ```

use chrono::{DateTime, Utc};

use skuflow_core::DomainError;

use crate::error::SkuError;
use crate::patch::{Patch, SkuChanges, SkuPatch};
use crate::sku::{CreateSku, NewSkuRecord, Sku, require_text};
use crate::status::{EditPermission, SkuStatus};

/// Whether `create` honours a caller-requested initial status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialStatusPolicy {
    /// Records always start in `PRE_CADASTRO`; a requested status is ignored.
    #[default]
    PreCadastroOnly,
    /// Any requested status is stored as-is. This lets a caller place a
    /// record anywhere in the graph without walking it.
    AllowRequested,
}

/// Validate creation input and build the record to persist.
pub fn plan_create(
    input: CreateSku,
    policy: InitialStatusPolicy,
    now: DateTime<Utc>,
) -> Result<NewSkuRecord, SkuError> {
    input.validate()?;

    let status = match policy {
        InitialStatusPolicy::PreCadastroOnly => SkuStatus::PreCadastro,
        InitialStatusPolicy::AllowRequested => input.status.unwrap_or_default(),
    };

    Ok(NewSkuRecord {
        descricao: input.descricao,
        descricao_comercial: input.descricao_comercial,
        sku: input.sku,
        status,
        created_at: now,
        updated_at: now,
    })
}

/// Decide what an edit writes.
///
/// Returns `Ok(None)` when the patch supplies no key and the status permits
/// that (nothing to write).
pub fn plan_update(
    current: &Sku,
    patch: SkuPatch,
    now: DateTime<Utc>,
) -> Result<Option<SkuChanges>, SkuError> {
    match current.status.edit_permission() {
        EditPermission::Locked => {
            if patch.is_empty() {
                Ok(None)
            } else {
                Err(SkuError::EditNotAllowed {
                    status: current.status,
                })
            }
        }
        EditPermission::AnyField => {
            if patch.is_empty() {
                return Ok(None);
            }
            Ok(Some(SkuChanges {
                descricao: resolve_field("descricao", patch.descricao)?,
                descricao_comercial: resolve_field(
                    "descricaoComercial",
                    patch.descricao_comercial,
                )?,
                sku: resolve_field("sku", patch.sku)?,
                status: None,
                updated_at: now,
            }))
        }
        EditPermission::CommercialDescriptionWithRollback => {
            if patch.descricao.is_present() || patch.sku.is_present() {
                return Err(SkuError::InvalidEdit);
            }
            let Patch::Value(descricao_comercial) = patch.descricao_comercial else {
                return Err(SkuError::InvalidEdit);
            };
            require_text("descricaoComercial", &descricao_comercial)?;

            // Re-opens the registration for full review.
            Ok(Some(SkuChanges {
                descricao_comercial: Some(descricao_comercial),
                status: Some(SkuStatus::PreCadastro),
                ..SkuChanges::touch(now)
            }))
        }
    }
}

/// Decide what an explicit status change writes.
pub fn plan_transition(
    current: &Sku,
    target: SkuStatus,
    now: DateTime<Utc>,
) -> Result<SkuChanges, SkuError> {
    if current.status.is_terminal() {
        return Err(SkuError::TerminalState);
    }
    if !current.status.can_transition_to(target) {
        return Err(SkuError::InvalidTransition {
            from: current.status,
            to: target,
        });
    }

    Ok(SkuChanges {
        status: Some(target),
        ..SkuChanges::touch(now)
    })
}

fn resolve_field(field: &str, patch: Patch<String>) -> Result<Option<String>, SkuError> {
    match patch {
        Patch::Absent => Ok(None),
        Patch::Null => Err(DomainError::validation(format!("{field} não pode ser nulo")).into()),
        Patch::Value(value) => {
            require_text(field, &value)?;
            Ok(Some(value))
        }
    }
}
