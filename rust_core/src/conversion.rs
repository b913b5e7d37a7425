//! Conversion orchestrator
//!
//! Validates a request, resolves the slip through the configured
//! [`SlipSource`], canonicalizes its markets and synthesizes the target code.
//! Every outcome is a [`ConversionResult`]; failures never escape as errors.

use crate::canonical::Canonicalizer;
use crate::codegen::CodeSynthesizer;
use crate::markets::MarketTranslator;
use crate::models::{ConversionRequest, ConversionResult, Platform};
use crate::sources::SlipSource;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    #[error("From/To platforms are the same.")]
    SamePlatform,

    #[error("Booking code is required.")]
    EmptyCode,

    #[error("Converting from {from} to {to} is not supported yet.")]
    UnsupportedPath { from: Platform, to: Platform },

    /// Miss or collapsed fetch failure; carries the source's client message
    #[error("{0}")]
    NotFound(String),
}

impl ConversionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::SamePlatform | ConversionError::EmptyCode => "validation",
            ConversionError::UnsupportedPath { .. } => "unsupported_path",
            ConversionError::NotFound(_) => "not_found",
        }
    }
}

pub struct ConversionOrchestrator {
    source: Arc<dyn SlipSource>,
    canonicalizer: Canonicalizer,
    synthesizer: CodeSynthesizer,
}

impl ConversionOrchestrator {
    pub fn new(source: Arc<dyn SlipSource>, translator: MarketTranslator) -> Self {
        Self {
            source,
            canonicalizer: Canonicalizer::new(translator),
            synthesizer: CodeSynthesizer::new(),
        }
    }

    pub fn source_name(&self) -> &str {
        self.source.source_name()
    }

    /// Run one conversion. Always produces a result; `ok` tells the outcome.
    pub async fn convert(&self, request: &ConversionRequest) -> ConversionResult {
        let span = info_span!(
            "convert",
            request_id = %Uuid::new_v4(),
            from = %request.from_platform,
            to = %request.to_platform,
            code = %request.code.trim(),
        );

        async {
            match self.try_convert(request).await {
                Ok(result) => result,
                Err(e) => {
                    warn!(kind = e.kind(), "Conversion failed: {}", e);
                    ConversionResult::failure(e.to_string())
                }
            }
        }
        .instrument(span)
        .await
    }

    pub async fn try_convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResult, ConversionError> {
        let from = request.from_platform;
        let to = request.to_platform;

        if from == to {
            return Err(ConversionError::SamePlatform);
        }

        let code = request.code.trim();
        if code.is_empty() {
            return Err(ConversionError::EmptyCode);
        }

        if !self.source.supports(from) {
            return Err(ConversionError::UnsupportedPath { from, to });
        }

        let slip = self
            .source
            .resolve(from, code)
            .await
            .map_err(|_| ConversionError::NotFound(self.source.miss_message(from, code)))?;

        let preview = self.canonicalizer.apply(&slip, from, to);
        let converted_code = self.synthesizer.synthesize(to, code);

        info!(
            "Converted {} ({} legs) -> {} via {}",
            code,
            preview.len(),
            converted_code,
            self.source.source_name()
        );

        Ok(ConversionResult::success(
            self.source.success_message(),
            converted_code,
            preview,
        ))
    }
}
