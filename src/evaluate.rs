//! Evaluator seam
//!
//! Hands the virtual document of a template to something that can run PHP
//! and reads back the JSON it prints. Running PHP is not this crate's job;
//! callers supply an [`Evaluator`].
//!
//! ```text
//! template → virtual document → Evaluator::evaluate → JSON
//! ```

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::config::TemplateConfig;
use crate::virtual_document;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    #[error("evaluation failed: {reason}")]
    Failed { reason: String },
    #[error("evaluator output is not valid JSON")]
    InvalidOutput,
}

/// Runs a PHP script and returns what it printed.
pub trait Evaluator {
    fn evaluate(&self, script: &str) -> impl Future<Output = Result<String, EvaluationError>> + Send;
}

/// Evaluate the virtual document of `text` with the default configuration.
///
/// Returns `None` if the template cannot be synthesized, `cancel` fires,
/// the evaluator fails or its output is not JSON.
pub async fn evaluate_template<E: Evaluator>(
    evaluator: &E,
    text: &str,
    cancel: &CancellationToken,
) -> Option<serde_json::Value> {
    evaluate_template_with(evaluator, text, &TemplateConfig::default(), cancel).await
}

pub async fn evaluate_template_with<E: Evaluator>(
    evaluator: &E,
    text: &str,
    config: &TemplateConfig,
    cancel: &CancellationToken,
) -> Option<serde_json::Value> {
    if cancel.is_cancelled() {
        return None;
    }
    let script = virtual_document::synthesize(text, config)?;
    let output = match cancel.run_until_cancelled(evaluator.evaluate(&script)).await {
        Some(Ok(output)) => output,
        Some(Err(err)) => {
            debug!(%err, "evaluation abandoned");
            return None;
        }
        None => {
            debug!("evaluation cancelled");
            return None;
        }
    };
    match parse_output(&output) {
        Ok(value) => Some(value),
        Err(err) => {
            debug!(%err, "evaluation abandoned");
            None
        }
    }
}

fn parse_output(output: &str) -> Result<serde_json::Value, EvaluationError> {
    serde_json::from_str(output.trim()).map_err(|_| EvaluationError::InvalidOutput)
}
