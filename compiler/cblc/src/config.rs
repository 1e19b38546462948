//! Analysis configuration.
//!
//! [`ConfigStore`] holds the current [`AnalysisConfig`] behind a lock and
//! hands out `Arc` snapshots, so an analysis keeps the configuration it
//! started with even if the client changes settings halfway through.

use std::sync::Arc;

use cbl_copybook::{CopybookConfig, CopybookProcessingMode, DialectSet, UnknownMode};
use cbl_ir::{DialectKind, UnknownDialect};
use parking_lot::RwLock;
use tracing::debug;

/// Everything an analysis needs besides the document and the copybooks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    pub copybook: CopybookConfig,
    /// Dialects enabled on top of plain COBOL.
    pub dialects: Vec<DialectKind>,
}

impl AnalysisConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_mode(mut self, mode: CopybookProcessingMode) -> Self {
        self.copybook.mode = mode;
        self
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        if !self.dialects.contains(&dialect) {
            self.dialects.push(dialect);
        }
        self
    }

    pub fn dialect_set(&self) -> DialectSet {
        DialectSet::new(&self.dialects)
    }

    /// Validate raw client settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, ConfigError> {
        let mut config = AnalysisConfig::new();
        if let Some(mode) = &settings.copybook_mode {
            config = config.with_mode(mode.parse()?);
        }
        for dialect in &settings.dialects {
            config = config.with_dialect(dialect.parse()?);
        }
        Ok(config)
    }
}

/// Settings as a client sends them: unvalidated strings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub dialects: Vec<String>,
    pub copybook_mode: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Dialect(#[from] UnknownDialect),
    #[error(transparent)]
    Mode(#[from] UnknownMode),
}

/// Copy-on-write holder of the current configuration.
#[derive(Debug, Default)]
pub struct ConfigStore {
    current: RwLock<Arc<AnalysisConfig>>,
}

impl ConfigStore {
    pub fn new(config: AnalysisConfig) -> Self {
        ConfigStore {
            current: RwLock::new(Arc::new(config)),
        }
    }

    pub fn snapshot(&self) -> Arc<AnalysisConfig> {
        Arc::clone(&self.current.read())
    }

    /// Snapshot with the processing mode overridden for one request.
    pub fn config_for(&self, mode: CopybookProcessingMode) -> Arc<AnalysisConfig> {
        let snapshot = self.snapshot();
        if snapshot.copybook.mode == mode {
            return snapshot;
        }
        Arc::new((*snapshot).clone().with_mode(mode))
    }

    pub fn update(&self, config: AnalysisConfig) {
        debug!(?config, "configuration updated");
        *self.current.write() = Arc::new(config);
    }

    /// Replace the configuration from client settings. On error the
    /// current configuration is kept.
    pub fn update_from_settings(&self, settings: &Settings) -> Result<(), ConfigError> {
        let config = AnalysisConfig::from_settings(settings)?;
        self.update(config);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_enabled_plain_cobol() {
        let config = AnalysisConfig::default();
        assert_eq!(config.copybook.mode, CopybookProcessingMode::Enabled);
        assert!(config.dialects.is_empty());
        assert_eq!(config.dialect_set().kinds(), vec![DialectKind::Cobol]);
    }

    #[test]
    fn dialects_are_deduplicated() {
        let config = AnalysisConfig::new()
            .with_dialect(DialectKind::Idms)
            .with_dialect(DialectKind::DaCo)
            .with_dialect(DialectKind::Idms);
        assert_eq!(config.dialects, vec![DialectKind::Idms, DialectKind::DaCo]);
    }

    #[test]
    fn settings_are_validated() {
        let settings = Settings {
            dialects: vec!["idms".into(), "DaCo".into()],
            copybook_mode: Some("disabled".into()),
        };
        let config = AnalysisConfig::from_settings(&settings);
        assert_eq!(
            config,
            Ok(AnalysisConfig::new()
                .with_mode(CopybookProcessingMode::Disabled)
                .with_dialect(DialectKind::Idms)
                .with_dialect(DialectKind::DaCo))
        );

        let bad = Settings {
            dialects: vec!["PL/I".into()],
            copybook_mode: None,
        };
        assert_eq!(
            AnalysisConfig::from_settings(&bad),
            Err(ConfigError::Dialect(UnknownDialect("PL/I".into())))
        );
    }

    #[test]
    fn snapshots_survive_updates() {
        let store = ConfigStore::default();
        let before = store.snapshot();
        store.update(AnalysisConfig::new().with_dialect(DialectKind::DaCo));
        assert!(before.dialects.is_empty());
        assert_eq!(store.snapshot().dialects, vec![DialectKind::DaCo]);
    }

    #[test]
    fn config_for_overrides_mode_only() {
        let store = ConfigStore::new(AnalysisConfig::new().with_dialect(DialectKind::Idms));
        let same = store.config_for(CopybookProcessingMode::Enabled);
        assert!(Arc::ptr_eq(&same, &store.snapshot()));

        let disabled = store.config_for(CopybookProcessingMode::Disabled);
        assert_eq!(disabled.copybook.mode, CopybookProcessingMode::Disabled);
        assert_eq!(disabled.dialects, vec![DialectKind::Idms]);
        assert_eq!(store.snapshot().copybook.mode, CopybookProcessingMode::Enabled);
    }

    #[test]
    fn invalid_settings_keep_current_config() {
        let store = ConfigStore::new(AnalysisConfig::new().with_dialect(DialectKind::Idms));
        let result = store.update_from_settings(&Settings {
            dialects: Vec::new(),
            copybook_mode: Some("sometimes".into()),
        });
        assert!(matches!(result, Err(ConfigError::Mode(_))));
        assert_eq!(store.snapshot().dialects, vec![DialectKind::Idms]);
    }
}
