//! The advertised feature registry.
//!
//! Features are composed by explicit merge of named sets, never by spreading
//! ad hoc maps, so a conflicting double registration is an error at
//! construction rather than a silent overwrite at dispatch.

use std::collections::BTreeMap;
use thiserror::Error;
use wallet_types::{FeatureName, WalletError, WalletResult};

/// Whether an advertised feature actually has an implementation behind it.
///
/// A `Placeholder` entry is advertised (pages can discover it and its
/// version) but every invocation deterministically yields
/// [`WalletError::NotImplemented`]. It never silently succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureStatus {
    Implemented,
    Placeholder,
}

/// One advertised feature: its semantic version and implementation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureEntry {
    pub version: &'static str,
    pub status: FeatureStatus,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FeatureConflict {
    /// Both sets advertise the same feature.
    #[error("feature advertised twice: {0}")]
    Duplicate(FeatureName),
}

/// The set of features a provider advertises.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSet {
    entries: BTreeMap<FeatureName, FeatureEntry>,
}

impl FeatureSet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The chain-independent standard features.
    #[must_use]
    pub fn standard() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            FeatureName::StandardConnect,
            FeatureEntry {
                version: "1.0.0",
                status: FeatureStatus::Implemented,
            },
        );
        entries.insert(
            FeatureName::StandardEvents,
            FeatureEntry {
                version: "1.0.0",
                status: FeatureStatus::Implemented,
            },
        );
        Self { entries }
    }

    /// The Sui chain feature family.
    #[must_use]
    pub fn sui() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(
            FeatureName::SignPersonalMessage,
            FeatureEntry {
                version: "1.1.0",
                status: FeatureStatus::Implemented,
            },
        );
        entries.insert(
            FeatureName::SignTransaction,
            FeatureEntry {
                version: "2.0.0",
                status: FeatureStatus::Implemented,
            },
        );
        entries.insert(
            FeatureName::SignAndExecuteTransaction,
            FeatureEntry {
                version: "2.0.0",
                status: FeatureStatus::Implemented,
            },
        );
        entries.insert(
            FeatureName::ReportTransactionEffects,
            FeatureEntry {
                version: "1.0.0",
                status: FeatureStatus::Implemented,
            },
        );
        Self { entries }
    }

    /// Combine two sets; advertising the same feature from both sides is a
    /// construction error.
    pub fn merge(mut self, other: Self) -> Result<Self, FeatureConflict> {
        for (name, entry) in other.entries {
            if self.entries.contains_key(&name) {
                return Err(FeatureConflict::Duplicate(name));
            }
            self.entries.insert(name, entry);
        }
        Ok(self)
    }

    /// Downgrade an advertised feature to an explicit placeholder.
    #[must_use]
    pub fn with_placeholder(mut self, feature: FeatureName) -> Self {
        if let Some(entry) = self.entries.get_mut(&feature) {
            entry.status = FeatureStatus::Placeholder;
        }
        self
    }

    /// Gate an invocation: unadvertised and placeholder features both yield
    /// `NotImplemented`, so callers can distinguish a contract gap from
    /// anything breaking.
    pub fn ensure_implemented(&self, feature: FeatureName) -> WalletResult<()> {
        match self.entries.get(&feature).map(|e| e.status) {
            Some(FeatureStatus::Implemented) => Ok(()),
            Some(FeatureStatus::Placeholder) | None => {
                Err(WalletError::NotImplemented(feature))
            }
        }
    }

    #[must_use]
    pub fn contains(&self, feature: FeatureName) -> bool {
        self.entries.contains_key(&feature)
    }

    #[must_use]
    pub fn version(&self, feature: FeatureName) -> Option<&'static str> {
        self.entries.get(&feature).map(|e| e.version)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The discovery view: feature name → version, what a page enumerates.
    #[must_use]
    pub fn descriptor(&self) -> BTreeMap<FeatureName, &'static str> {
        self.entries
            .iter()
            .map(|(name, entry)| (*name, entry.version))
            .collect()
    }
}
