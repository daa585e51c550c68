use crate::core::import::ImportEngine;
use crate::domain::model::{ImportLinksRequest, ImportStatistics, LinkSource};
use crate::utils::error::ImportError;

#[derive(Debug)]
pub struct RunReport {
    pub source: LinkSource,
    pub outcome: Result<ImportStatistics, ImportError>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Imports every configured source one after another. Each source keeps its
/// own checkpoint, so a failing source does not hold back the others.
pub struct ImportRunner {
    engines: Vec<ImportEngine>,
}

impl ImportRunner {
    pub fn new(engines: Vec<ImportEngine>) -> Self {
        Self { engines }
    }

    pub fn sources(&self) -> Vec<LinkSource> {
        self.engines.iter().map(|e| e.source()).collect()
    }

    pub fn engines(&self) -> &[ImportEngine] {
        &self.engines
    }

    pub async fn run_all(&self, request: &ImportLinksRequest) -> Vec<RunReport> {
        let mut reports = Vec::with_capacity(self.engines.len());

        for engine in &self.engines {
            let source = engine.source();
            let outcome = engine.execute(request).await;
            if let Err(e) = &outcome {
                tracing::error!(
                    %source,
                    error = %e,
                    category = ?e.category(),
                    "❌ Import failed"
                );
            }
            reports.push(RunReport { source, outcome });
        }

        let failed = reports.iter().filter(|r| !r.is_success()).count();
        tracing::info!(
            sources = reports.len(),
            failed,
            "Import run finished"
        );
        reports
    }
}
