//! Presence-aware partial updates.
//!
//! A JSON body of `{}` and one of `{"sku": null}` must not look the same to
//! the edit rules: the second one *touches* `sku` even though it carries no
//! value. `Patch<T>` keeps the three cases apart.

use serde::{Deserialize, Deserializer, Serialize};

/// One field of a partial update.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    /// Key not supplied.
    #[default]
    Absent,
    /// Key supplied with an explicit `null`.
    Null,
    /// Key supplied with a value.
    Value(T),
}

impl<T> Patch<T> {
    /// Whether the caller supplied the key at all.
    pub fn is_present(&self) -> bool {
        !matches!(self, Patch::Absent)
    }

    pub fn as_value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Patch::Null, Patch::Value)
    }
}

// Only reached when the key is present; `#[serde(default)]` covers absence.
impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

/// Partial update of the editable SKU fields.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SkuPatch {
    #[serde(default)]
    pub descricao: Patch<String>,
    #[serde(default)]
    pub descricao_comercial: Patch<String>,
    #[serde(default)]
    pub sku: Patch<String>,
}

impl SkuPatch {
    /// No key supplied at all.
    pub fn is_empty(&self) -> bool {
        !self.descricao.is_present()
            && !self.descricao_comercial.is_present()
            && !self.sku.is_present()
    }

    pub fn with_descricao(mut self, value: impl Into<String>) -> Self {
        self.descricao = Patch::Value(value.into());
        self
    }

    pub fn with_descricao_comercial(mut self, value: impl Into<String>) -> Self {
        self.descricao_comercial = Patch::Value(value.into());
        self
    }

    pub fn with_sku(mut self, value: impl Into<String>) -> Self {
        self.sku = Patch::Value(value.into());
        self
    }
}

/// Resolved field changes ready to be written by a record store.
///
/// `None` means "leave as is". `updated_at` is always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkuChanges {
    pub descricao: Option<String>,
    pub descricao_comercial: Option<String>,
    pub sku: Option<String>,
    pub status: Option<crate::SkuStatus>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl SkuChanges {
    pub fn touch(updated_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            descricao: None,
            descricao_comercial: None,
            sku: None,
            status: None,
            updated_at,
        }
    }
}
