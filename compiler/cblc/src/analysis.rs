//! The analysis entry point.
//!
//! One call to [`Analyzer::analyze`] resolves every copybook of a document
//! and returns an [`AnalysisFragment`]: the node tree, the diagnostics, the
//! expanded text and a flattened map from expanded offsets back to the
//! documents they came from. Analyses are independent; [`Analyzer::analyze_many`]
//! runs a batch on the rayon pool.

use std::collections::BTreeMap;
use std::sync::Arc;

use cbl_copybook::{
    CancellationToken, Completeness, CopybookProcessingMode, CopybookProvider, CopybookResolver,
};
use cbl_diagnostic::{by_document, DefaultMessages, MessageService, SyntaxError};
use cbl_ir::{DocumentUri, Locality, LocalityMapper, Node, SourceText};
use cbl_transform::LocalityMap;
use rayon::prelude::*;

use crate::config::{AnalysisConfig, ConfigStore};

/// Result of analyzing one document.
#[derive(Clone, Debug)]
pub struct AnalysisFragment {
    pub uri: DocumentUri,
    pub root_nodes: Vec<Node>,
    /// Deduplicated, ordered by document then offset.
    pub diagnostics: Vec<SyntaxError>,
    pub extended_text: String,
    pub mapping: LocalityMap,
    pub completeness: Completeness,
}

impl AnalysisFragment {
    pub fn diagnostics_by_document(&self) -> BTreeMap<DocumentUri, Vec<&SyntaxError>> {
        by_document(&self.diagnostics)
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.completeness.is_complete()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(SyntaxError::is_error)
    }
}

impl LocalityMapper for AnalysisFragment {
    fn map_offset(&self, offset: u32) -> Option<Locality> {
        self.mapping.map_offset(offset)
    }

    fn extended_len(&self) -> u32 {
        self.mapping.len()
    }
}

/// Runs analyses against one copybook provider.
pub struct Analyzer {
    provider: Arc<dyn CopybookProvider>,
    messages: Arc<dyn MessageService>,
    config: ConfigStore,
    cancel: CancellationToken,
}

impl Analyzer {
    pub fn new(provider: Arc<dyn CopybookProvider>) -> Self {
        Analyzer {
            provider,
            messages: Arc::new(DefaultMessages),
            config: ConfigStore::default(),
            cancel: CancellationToken::new(),
        }
    }

    #[must_use]
    pub fn with_config(self, config: AnalysisConfig) -> Self {
        self.config.update(config);
        self
    }

    #[must_use]
    pub fn with_messages(mut self, messages: Arc<dyn MessageService>) -> Self {
        self.messages = messages;
        self
    }

    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn config(&self) -> &ConfigStore {
        &self.config
    }

    /// Analyze with the current configuration.
    pub fn analyze(&self, source: &SourceText) -> AnalysisFragment {
        self.run(source, &self.config.snapshot())
    }

    /// Analyze with the processing mode overridden for this request.
    pub fn analyze_with_mode(&self, source: &SourceText, mode: CopybookProcessingMode) -> AnalysisFragment {
        self.run(source, &self.config.config_for(mode))
    }

    /// Analyze independent documents in parallel. Results are in input order.
    pub fn analyze_many(&self, sources: &[SourceText]) -> Vec<AnalysisFragment> {
        let config = self.config.snapshot();
        sources.par_iter().map(|source| self.run(source, &config)).collect()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(uri = %source.uri(), mode = %config.copybook.mode))]
    fn run(&self, source: &SourceText, config: &AnalysisConfig) -> AnalysisFragment {
        let resolver = CopybookResolver::new(Arc::clone(&self.provider))
            .with_messages(Arc::clone(&self.messages))
            .with_config(config.copybook)
            .with_cancellation(self.cancel.clone());
        let resolution = resolver.resolve_document(source, &config.dialect_set());
        let extended_text = resolution.extended_text();
        let mapping = resolution.transformation.locality_map();
        AnalysisFragment {
            uri: source.uri().clone(),
            root_nodes: resolution.nodes,
            diagnostics: resolution.errors,
            extended_text,
            mapping,
            completeness: resolution.completeness,
        }
    }
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("config", &self.config.snapshot())
            .finish_non_exhaustive()
    }
}
