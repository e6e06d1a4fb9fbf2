use std::sync::Arc;

use crate::config::Config;
use crate::extraction::InvoiceExtractor;

use super::gate::ExtractionGate;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub extractor: Arc<InvoiceExtractor>,
    pub gate: ExtractionGate,
}

impl AppState {
    pub fn new(config: Config, extractor: InvoiceExtractor) -> Self {
        Self {
            config: Arc::new(config),
            extractor: Arc::new(extractor),
            gate: ExtractionGate::new(),
        }
    }
}
