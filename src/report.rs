//! Report pipeline: resolve, execute, render

use std::io;
use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{DataFlowError, Error, Result};
use crate::execution::{DataSourceProvider, QueryExecutor, bind_arguments};
use crate::expression::{ExpressionEvaluator, TypeVocabulary};
use crate::model::ReportDefinition;
use crate::render::{
    ComponentRegistry, KeyLocalizer, Localizer, MarkupWriter, RenderContext, ViewDocument,
    ViewRenderer, global_registry,
};
use crate::resolver::{MetadataRepository, ReferenceResolver};
use crate::result::{Arguments, ResultSet};

/// Renders reports from a metadata repository and a set of data sources
///
/// Each call resolves the report afresh, so the stored definitions stay
/// reusable templates. Every render gets its own expression evaluator and
/// therefore its own compiled-expression cache; only the type vocabulary is
/// shared between renders.
pub struct ReportEngine<'e> {
    repository: &'e dyn MetadataRepository,
    provider: &'e dyn DataSourceProvider,
    registry: &'e ComponentRegistry,
    vocabulary: Arc<TypeVocabulary>,
    localizer: Arc<dyn Localizer>,
    config: EngineConfig,
}

impl<'e> ReportEngine<'e> {
    /// Create an engine using the built-in components and default configuration
    pub fn new(repository: &'e dyn MetadataRepository, provider: &'e dyn DataSourceProvider) -> Self {
        Self {
            repository,
            provider,
            registry: global_registry(),
            vocabulary: Arc::new(TypeVocabulary::standard()),
            localizer: Arc::new(KeyLocalizer),
            config: EngineConfig::default(),
        }
    }

    /// Replace the configuration
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Render with a custom component registry
    pub fn with_registry(mut self, registry: &'e ComponentRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Translate labels with `localizer`
    pub fn with_localizer(mut self, localizer: Arc<dyn Localizer>) -> Self {
        self.localizer = localizer;
        self
    }

    /// Compile expressions against a custom type vocabulary
    pub fn with_vocabulary(mut self, vocabulary: Arc<TypeVocabulary>) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetch a report and resolve every reference in it
    pub fn resolve_report(&self, report_id: &str) -> Result<ReportDefinition> {
        let resolver =
            ReferenceResolver::new(self.repository).with_max_depth(self.config.max_resolution_depth);
        Ok(resolver.resolve_by_id::<ReportDefinition>(report_id)?)
    }

    /// Bind the report's arguments and run its datasets and indicators
    ///
    /// Datasets are keyed by name or identifier. An indicator's primary
    /// result is keyed by the indicator's name or identifier, its measures and
    /// stratifiers by `indicator.member`.
    pub fn execute(&self, report: &ReportDefinition, arguments: &Arguments) -> Result<(Arguments, ResultSet)> {
        let bound = bind_arguments(&report.parameters, arguments)
            .map_err(|e| DataFlowError::failed(report.header.name_or_id(), e))?;
        let executor = QueryExecutor::new(self.provider).with_max_rows(self.config.max_result_rows);

        let mut results = ResultSet::new();
        for dataset in &report.datasets {
            let result = executor.execute_query(dataset, &bound)?;
            results.insert(dataset.header.name_or_id(), result);
        }
        for indicator in &report.indicators {
            let name = indicator.header.name_or_id();
            for result in executor.execute_indicator(indicator, &bound)? {
                let key = if result.is_primary() {
                    name.to_string()
                } else {
                    format!("{name}.{}", result.measure_or_stratifier())
                };
                results.insert(key, result);
            }
        }
        Ok((bound, results))
    }

    /// Resolve a report, run it and render one of its views to `out`
    ///
    /// `view` selects a view by name or identifier; `None` renders the first.
    pub fn render_report(
        &self,
        report_id: &str,
        view: Option<&str>,
        arguments: &Arguments,
        out: &mut dyn io::Write,
    ) -> Result<()> {
        let report = self.resolve_report(report_id)?;
        let definition = report.view(view).ok_or_else(|| Error::ViewNotFound {
            report: report.header.name_or_id().to_string(),
            view: view.unwrap_or_default().to_string(),
        })?;
        let document = ViewDocument::parse(&definition.content)?;
        let (bound, results) = self.execute(&report, arguments)?;

        let evaluator = ExpressionEvaluator::new(self.vocabulary.clone())
            .with_cache(self.config.expression_cache);
        let renderer = ViewRenderer::new(self.registry)
            .with_mode(self.config.render_mode)
            .with_evaluator(Arc::new(evaluator))
            .with_localizer(self.localizer.clone());
        let context = RenderContext::root(&bound).with_datasets(&results);

        log::debug!(
            "rendering view '{}' of report '{}'",
            definition.header.name_or_id(),
            report.header.name_or_id()
        );
        let mut writer = MarkupWriter::new(out);
        renderer.render_document(&document, &mut writer, &context)?;
        Ok(())
    }
}
