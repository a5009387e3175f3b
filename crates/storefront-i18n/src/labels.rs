//! Persisted UI labels: the store seam, admin grouping, and staged edits.
//!
//! # Design
//!
//! - Label rows are keyed by `(locale, namespace, key)`; writes overwrite.
//! - Grouping sorts explicitly so output never depends on store row order.
//! - [`LabelBoard`] applies edits locally first; the caller decides whether a
//!   failed save rolls the edit back.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{I18nError, I18nResult};
use crate::locale::Locale;

/// One persisted label row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelRow {
    /// Locale the label belongs to.
    pub locale: Locale,
    /// Dictionary namespace (for example `home`).
    pub namespace: String,
    /// Stable key within the namespace.
    pub key: String,
    /// Localized text.
    pub value: String,
}

/// Key/value pair exposed to admin clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEntry {
    /// Stable key within the namespace.
    pub key: String,
    /// Localized text.
    pub value: String,
}

/// Labels grouped by namespace, each group sorted by key.
pub type LabelsByNamespace = BTreeMap<String, Vec<LabelEntry>>;

/// Storage seam for persisted labels.
#[async_trait]
pub trait LabelStore: Send + Sync {
    /// Every label row stored for `locale`, in no particular order.
    async fn labels_for_locale(&self, locale: Locale) -> anyhow::Result<Vec<LabelRow>>;

    /// Insert or overwrite the row keyed by `(locale, namespace, key)`.
    async fn upsert_label(&self, row: &LabelRow) -> anyhow::Result<()>;
}

/// Group rows by namespace, ordering namespaces and keys ascending.
#[must_use]
pub fn group_labels(rows: impl IntoIterator<Item = LabelRow>) -> LabelsByNamespace {
    let mut grouped = LabelsByNamespace::new();
    for row in rows {
        grouped.entry(row.namespace).or_default().push(LabelEntry {
            key: row.key,
            value: row.value,
        });
    }
    for entries in grouped.values_mut() {
        entries.sort_by(|a, b| a.key.cmp(&b.key));
    }
    grouped
}

/// Validate and normalise a label write.
///
/// # Errors
///
/// Returns [`I18nError::UnsupportedLocale`] for locales outside the registry
/// and [`I18nError::InvalidLabel`] when the namespace or key is blank.
pub fn validate_label(
    locale: &str,
    namespace: &str,
    key: &str,
    value: &str,
) -> I18nResult<LabelRow> {
    let locale = Locale::parse(locale).ok_or_else(|| I18nError::UnsupportedLocale {
        locale: locale.to_string(),
    })?;
    let namespace = namespace.trim();
    if namespace.is_empty() {
        return Err(I18nError::InvalidLabel {
            field: "namespace",
            reason: "empty",
        });
    }
    let key = key.trim();
    if key.is_empty() {
        return Err(I18nError::InvalidLabel {
            field: "key",
            reason: "empty",
        });
    }
    Ok(LabelRow {
        locale,
        namespace: namespace.to_string(),
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Create or update a label. Callers own cache invalidation after success.
///
/// # Errors
///
/// Validation failures as in [`validate_label`]; store failures surface as
/// [`I18nError::Store`].
pub async fn upsert_label(
    store: &dyn LabelStore,
    locale: &str,
    namespace: &str,
    key: &str,
    value: &str,
) -> I18nResult<LabelRow> {
    let row = validate_label(locale, namespace, key, value)?;
    store
        .upsert_label(&row)
        .await
        .map_err(|err| I18nError::store("labels.upsert", err))?;
    debug!(
        locale = %row.locale,
        namespace = %row.namespace,
        key = %row.key,
        "label upserted"
    );
    Ok(row)
}

/// Labels for `locale`, grouped for the admin editor.
///
/// # Errors
///
/// Returns [`I18nError::UnsupportedLocale`] for unknown locales and
/// [`I18nError::Store`] when the store fails.
pub async fn get_labels_for_locale(
    store: &dyn LabelStore,
    locale: &str,
) -> I18nResult<LabelsByNamespace> {
    let locale = Locale::parse(locale).ok_or_else(|| I18nError::UnsupportedLocale {
        locale: locale.to_string(),
    })?;
    let rows = store
        .labels_for_locale(locale)
        .await
        .map_err(|err| I18nError::store("labels.fetch", err))?;
    Ok(group_labels(rows))
}

/// A locally applied edit awaiting the outcome of its save.
#[derive(Clone, Debug, PartialEq, Eq)]
#[must_use = "commit or roll back the staged edit"]
pub struct StagedEdit {
    /// Namespace of the edited label.
    pub namespace: String,
    /// Key of the edited label.
    pub key: String,
    /// Value before the edit, `None` when the label did not exist.
    pub previous: Option<String>,
    /// Value applied by the edit.
    pub value: String,
}

impl StagedEdit {
    /// Acknowledge a successful save. The board already holds the value.
    pub fn commit(self) {
        debug!(namespace = %self.namespace, key = %self.key, "label edit committed");
    }
}

/// Client-side copy of one locale's labels with optimistic editing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelBoard {
    labels: BTreeMap<String, BTreeMap<String, String>>,
}

impl LabelBoard {
    /// Board seeded from grouped labels.
    #[must_use]
    pub fn new(grouped: &LabelsByNamespace) -> Self {
        let labels = grouped
            .iter()
            .map(|(namespace, entries)| {
                let keys = entries
                    .iter()
                    .map(|entry| (entry.key.clone(), entry.value.clone()))
                    .collect();
                (namespace.clone(), keys)
            })
            .collect();
        Self { labels }
    }

    /// Current value of a label.
    #[must_use]
    pub fn value(&self, namespace: &str, key: &str) -> Option<&str> {
        self.labels
            .get(namespace)
            .and_then(|keys| keys.get(key))
            .map(String::as_str)
    }

    /// Apply an edit locally and return what is needed to undo it.
    pub fn stage(&mut self, namespace: &str, key: &str, value: &str) -> StagedEdit {
        let previous = self
            .labels
            .entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_string());
        StagedEdit {
            namespace: namespace.to_string(),
            key: key.to_string(),
            previous,
            value: value.to_string(),
        }
    }

    /// Restore the value a failed save replaced.
    pub fn rollback(&mut self, edit: StagedEdit) {
        match edit.previous {
            Some(previous) => {
                self.labels
                    .entry(edit.namespace)
                    .or_default()
                    .insert(edit.key, previous);
            }
            None => {
                if let Some(keys) = self.labels.get_mut(&edit.namespace) {
                    keys.remove(&edit.key);
                    if keys.is_empty() {
                        self.labels.remove(&edit.namespace);
                    }
                }
            }
        }
    }

    /// Snapshot in the same shape as [`get_labels_for_locale`].
    #[must_use]
    pub fn grouped(&self) -> LabelsByNamespace {
        self.labels
            .iter()
            .map(|(namespace, keys)| {
                let entries = keys
                    .iter()
                    .map(|(key, value)| LabelEntry {
                        key: key.clone(),
                        value: value.clone(),
                    })
                    .collect();
                (namespace.clone(), entries)
            })
            .collect()
    }
}
