//! SKU registration status and the rule tables keyed by it.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use skuflow_core::DomainError;

/// SKU lifecycle status.
///
/// There is no numeric ordering between variants; only the transition graph
/// relates them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkuStatus {
    #[default]
    PreCadastro,
    CadastroCompleto,
    Ativo,
    Desativado,
    Cancelado,
}

/// Which fields an edit may touch in a given status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPermission {
    /// Any subset of `descricao`, `descricaoComercial` and `sku`.
    AnyField,
    /// Only `descricaoComercial`; a successful edit rolls status back to
    /// `PRE_CADASTRO`.
    CommercialDescriptionWithRollback,
    /// No field may change.
    Locked,
}

impl SkuStatus {
    pub const ALL: [SkuStatus; 5] = [
        SkuStatus::PreCadastro,
        SkuStatus::CadastroCompleto,
        SkuStatus::Ativo,
        SkuStatus::Desativado,
        SkuStatus::Cancelado,
    ];

    /// Targets reachable from `self` through an explicit transition.
    pub fn allowed_targets(self) -> &'static [SkuStatus] {
        use SkuStatus::*;
        match self {
            PreCadastro => &[CadastroCompleto, Cancelado],
            CadastroCompleto => &[PreCadastro, Ativo, Cancelado],
            Ativo => &[Desativado],
            Desativado => &[Ativo, PreCadastro],
            Cancelado => &[],
        }
    }

    pub fn can_transition_to(self, target: SkuStatus) -> bool {
        self.allowed_targets().contains(&target)
    }

    pub fn is_terminal(self) -> bool {
        self == SkuStatus::Cancelado
    }

    pub fn edit_permission(self) -> EditPermission {
        match self {
            SkuStatus::PreCadastro => EditPermission::AnyField,
            SkuStatus::CadastroCompleto => EditPermission::CommercialDescriptionWithRollback,
            SkuStatus::Ativo | SkuStatus::Desativado | SkuStatus::Cancelado => {
                EditPermission::Locked
            }
        }
    }

    /// Wire name (`PRE_CADASTRO`, ...).
    pub fn as_str(self) -> &'static str {
        match self {
            SkuStatus::PreCadastro => "PRE_CADASTRO",
            SkuStatus::CadastroCompleto => "CADASTRO_COMPLETO",
            SkuStatus::Ativo => "ATIVO",
            SkuStatus::Desativado => "DESATIVADO",
            SkuStatus::Cancelado => "CANCELADO",
        }
    }
}

impl core::fmt::Display for SkuStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkuStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkuStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "status deve ser um de: PRE_CADASTRO, CADASTRO_COMPLETO, ATIVO, DESATIVADO, CANCELADO (recebido: {s})"
                ))
            })
    }
}
