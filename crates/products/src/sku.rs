use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use skuflow_core::{DomainError, DomainResult, RecordId};

use crate::patch::SkuChanges;
use crate::status::SkuStatus;

/// SKU identifier (assigned by the record store).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkuId(pub RecordId);

impl SkuId {
    pub fn new(id: RecordId) -> Self {
        Self(id)
    }

    /// Fresh time-ordered identifier.
    pub fn generate() -> Self {
        Self(RecordId::new())
    }
}

impl core::fmt::Display for SkuId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl core::str::FromStr for SkuId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(SkuId)
    }
}

/// A stored SKU record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sku {
    pub id: SkuId,
    pub descricao: String,
    pub descricao_comercial: String,
    pub sku: String,
    pub status: SkuStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sku {
    /// Apply resolved changes in place (used by stores that keep records in
    /// memory).
    pub fn apply(&mut self, changes: SkuChanges) {
        if let Some(descricao) = changes.descricao {
            self.descricao = descricao;
        }
        if let Some(descricao_comercial) = changes.descricao_comercial {
            self.descricao_comercial = descricao_comercial;
        }
        if let Some(sku) = changes.sku {
            self.sku = sku;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = changes.updated_at.max(self.created_at);
    }

    /// Case-insensitive substring match over the text fields.
    pub fn matches_text(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        [&self.descricao, &self.descricao_comercial, &self.sku]
            .into_iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// Caller input for SKU creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSku {
    pub descricao: String,
    pub descricao_comercial: String,
    pub sku: String,
    #[serde(default)]
    pub status: Option<SkuStatus>,
}

impl CreateSku {
    pub fn new(
        descricao: impl Into<String>,
        descricao_comercial: impl Into<String>,
        sku: impl Into<String>,
    ) -> Self {
        Self {
            descricao: descricao.into(),
            descricao_comercial: descricao_comercial.into(),
            sku: sku.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: SkuStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn validate(&self) -> DomainResult<()> {
        require_text("descricao", &self.descricao)?;
        require_text("descricaoComercial", &self.descricao_comercial)?;
        require_text("sku", &self.sku)?;
        Ok(())
    }
}

/// Record data handed to a store on creation; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSkuRecord {
    pub descricao: String,
    pub descricao_comercial: String,
    pub sku: String,
    pub status: SkuStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewSkuRecord {
    pub fn into_sku(self, id: SkuId) -> Sku {
        Sku {
            id,
            descricao: self.descricao,
            descricao_comercial: self.descricao_comercial,
            sku: self.sku,
            status: self.status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

pub(crate) fn require_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} não pode ser vazio")));
    }
    Ok(())
}
