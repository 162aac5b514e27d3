use thiserror::Error;

use skuflow_core::DomainError;

use crate::status::SkuStatus;

/// Rejections produced by the SKU lifecycle rules.
///
/// Every variant is a deterministic consequence of caller input and the
/// record's current status.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkuError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Any edit while the status locks all fields.
    #[error("Edição não permitida neste status ({status})")]
    EditNotAllowed { status: SkuStatus },

    /// An edit in `CADASTRO_COMPLETO` that is not exactly a new
    /// `descricaoComercial`.
    #[error("Em CADASTRO_COMPLETO apenas descricaoComercial pode ser alterada")]
    InvalidEdit,

    #[error("Transição inválida de {from} para {to}")]
    InvalidTransition { from: SkuStatus, to: SkuStatus },

    /// Any transition out of `CANCELADO`.
    #[error("Status CANCELADO é definitivo; nenhuma transição é permitida")]
    TerminalState,
}
