//! The conversion request orchestrator.

use tracing::debug;

use crate::error::Result;
use crate::inference::{GenerateOptions, InferenceService, build_prompt};
use crate::materialize::{ConversionResult, materialize};

/// Send a raw document through the inference service and materialize the
/// validated reply.
///
/// Stateless per call: single-flight enforcement belongs to the session
/// that triggers this. The reply is treated as opaque JSON text. Type
/// coercion is entirely the service's contract; nothing here inspects or
/// repairs values. A stray Markdown code fence around the reply is
/// stripped before validation, since providers occasionally fence despite
/// the instruction not to.
pub async fn convert(raw_text: &str, service: &dyn InferenceService) -> Result<ConversionResult> {
    let prompt = build_prompt(raw_text);
    let options = GenerateOptions { json_output: true };

    debug!(
        provider = service.name(),
        bytes = raw_text.len(),
        "dispatching conversion request"
    );

    let reply = service.generate(&prompt, &options).await?;
    debug!(reply_bytes = reply.len(), "inference reply received");

    materialize(normalize_reply(&reply))
}

/// Strip a Markdown code fence if the provider wrapped its reply in one.
fn normalize_reply(reply: &str) -> &str {
    let text = if reply.contains("```json") {
        reply
            .split("```json")
            .nth(1)
            .and_then(|inner| inner.split("```").next())
            .unwrap_or(reply)
    } else if reply.contains("```") {
        reply.split("```").nth(1).unwrap_or(reply)
    } else {
        reply
    };
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngotError;
    use crate::inference::MockService;

    #[test]
    fn test_normalize_passes_plain_text_through() {
        assert_eq!(normalize_reply("[1, 2]"), "[1, 2]");
        assert_eq!(normalize_reply("  [1, 2]\n"), "[1, 2]");
    }

    #[test]
    fn test_normalize_strips_json_fence() {
        let fenced = "```json\n[{\"a\": 1}]\n```";
        assert_eq!(normalize_reply(fenced), "[{\"a\": 1}]");
    }

    #[test]
    fn test_normalize_strips_bare_fence() {
        let fenced = "```\n[1]\n```";
        assert_eq!(normalize_reply(fenced), "[1]");
    }

    #[tokio::test]
    async fn test_convert_materializes_the_reply() {
        let service = MockService::returning(r#"[{"a": 1, "b": true}]"#);
        let result = convert("a,b\n1,true", &service).await.unwrap();
        assert!(result.text().contains("\"a\": 1"));
        assert!(result.text().contains("\"b\": true"));
    }

    #[tokio::test]
    async fn test_convert_accepts_fenced_reply() {
        let service = MockService::returning("```json\n[{\"a\": 1}]\n```");
        let result = convert("a\n1", &service).await.unwrap();
        assert_eq!(result.text(), "[\n  {\n    \"a\": 1\n  }\n]");
    }

    #[tokio::test]
    async fn test_convert_requests_json_output_with_the_document_embedded() {
        let service = MockService::new();
        convert("x,y\n1,2", &service).await.unwrap();

        let calls = service.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].json_output);
        assert!(calls[0].prompt.contains("x,y\n1,2"));
    }

    #[tokio::test]
    async fn test_service_failure_propagates_as_request_error() {
        let service = MockService::failing("connection refused");
        let err = convert("a\n1", &service).await.unwrap_err();
        assert!(matches!(err, IngotError::Request(_)));
    }

    #[tokio::test]
    async fn test_non_json_reply_is_a_validation_error() {
        let service = MockService::returning("certainly, here is your data");
        let err = convert("a\n1", &service).await.unwrap_err();
        assert!(matches!(err, IngotError::ResponseValidation(_)));
    }
}
