/*
 * Taint Analysis Application Layer
 *
 * Use cases and orchestration on top of the engine.
 *
 * Architecture:
 * ```
 * +------------------+     +-------------------+     +----------------------+
 * |   Input Port     | --> |    Use Case       | --> |   Infrastructure     |
 * | (Service Trait)  |     | (config, catalog) |     | (Interprocedural     |
 * +------------------+     +-------------------+     |  TaintAnalyzer)      |
 *                                                    +----------------------+
 * ```
 *
 * Settings resolution for one request:
 * 1. the service's base settings
 * 2. replaced by the request preset, if any
 * 3. replaced by the request's full settings, if any
 * 4. the catalog file's `analysis:` overrides on top
 */

use rayon::prelude::*;
use std::borrow::Cow;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use super::infrastructure::{InterproceduralTaintAnalyzer, TaintCatalog};
use super::ports::{
    TaintAnalysisError, TaintAnalysisRequest, TaintAnalysisResponse, TaintAnalysisService,
};
use crate::config::{AnalysisConfig, CatalogConfig};

// ============================================================================
// Main Use Case: Analyze Taint
// ============================================================================

/// Analyze one program against a catalog
pub struct AnalyzeTaintUseCase {
    catalog: TaintCatalog,
    base_config: AnalysisConfig,
}

impl AnalyzeTaintUseCase {
    pub fn new(catalog: TaintCatalog, base_config: AnalysisConfig) -> Self {
        Self {
            catalog,
            base_config,
        }
    }

    pub fn catalog(&self) -> &TaintCatalog {
        &self.catalog
    }

    /// Execute analysis
    pub fn execute(
        &self,
        request: TaintAnalysisRequest,
    ) -> Result<TaintAnalysisResponse, TaintAnalysisError> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();

        // 1. Settings from the request
        let mut config = match (&request.config, request.preset) {
            (Some(config), _) => config.clone(),
            (None, Some(preset)) => AnalysisConfig::from_preset(preset),
            (None, None) => self.base_config.clone(),
        };

        // 2. User catalog and its overrides
        let catalog = match &request.catalog_yaml {
            Some(yaml) => {
                let user = CatalogConfig::from_yaml_str(yaml)
                    .map_err(|e| TaintAnalysisError::from(e).with_context(run_id.to_string()))?;
                config = user.analysis_config(&config)?;
                let mut merged = self.catalog.clone();
                merged.merge(&user);
                Cow::Owned(merged)
            }
            None => Cow::Borrowed(&self.catalog),
        };

        // 3. Run
        let report = InterproceduralTaintAnalyzer::new(&catalog, &config)
            .analyze(&request.program)
            .map_err(|e| TaintAnalysisError::from(e).with_context(run_id.to_string()))?;

        if !report.stats.converged {
            warn!(%run_id, rounds = report.stats.rounds, "Global taint table did not converge");
        }
        info!(
            %run_id,
            diagnostics = report.diagnostics.len(),
            warnings = report.warnings.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Taint analysis request completed"
        );

        Ok(TaintAnalysisResponse {
            run_id,
            diagnostics: report.diagnostics,
            warnings: report.warnings,
            stats: report.stats,
            config,
        })
    }
}

// ============================================================================
// Service Implementation
// ============================================================================

/// Default implementation of `TaintAnalysisService`
pub struct DefaultTaintAnalysisService {
    use_case: AnalyzeTaintUseCase,
}

impl DefaultTaintAnalysisService {
    /// Built-in catalog, balanced settings
    pub fn new() -> Self {
        Self::with_catalog(TaintCatalog::builtin(), AnalysisConfig::default())
    }

    pub fn with_catalog(catalog: TaintCatalog, base_config: AnalysisConfig) -> Self {
        Self {
            use_case: AnalyzeTaintUseCase::new(catalog, base_config),
        }
    }

    /// Built-in catalog overlaid with a user catalog file's entries and
    /// analysis overrides
    pub fn with_user_catalog(
        user: &CatalogConfig,
        base_config: &AnalysisConfig,
    ) -> Result<Self, TaintAnalysisError> {
        let config = user.analysis_config(base_config)?;
        Ok(Self::with_catalog(
            TaintCatalog::with_user_entries(user),
            config,
        ))
    }
}

impl Default for DefaultTaintAnalysisService {
    fn default() -> Self {
        Self::new()
    }
}

impl TaintAnalysisService for DefaultTaintAnalysisService {
    fn analyze(
        &self,
        request: TaintAnalysisRequest,
    ) -> Result<TaintAnalysisResponse, TaintAnalysisError> {
        self.use_case.execute(request)
    }

    fn analyze_batch(
        &self,
        requests: Vec<TaintAnalysisRequest>,
    ) -> Vec<Result<TaintAnalysisResponse, TaintAnalysisError>> {
        info!(programs = requests.len(), "Starting batch taint analysis");
        requests
            .into_par_iter()
            .map(|request| self.use_case.execute(request))
            .collect()
    }

    fn supported_sources(&self) -> Vec<String> {
        self.use_case
            .catalog()
            .source_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }

    fn supported_sinks(&self) -> Vec<String> {
        self.use_case
            .catalog()
            .sink_names()
            .into_iter()
            .map(|n| n.to_string())
            .collect()
    }
}
