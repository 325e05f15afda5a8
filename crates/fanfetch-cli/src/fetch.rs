//! Fetch command handler.

use fanfetch_dispatch::{CancellationToken, FanOut, RetrieverPort};
use tracing::info;

use crate::error::CliError;
use crate::presentation::{render_json, render_text};

/// How the report is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub const fn from_json_flag(json: bool) -> Self {
        if json { Self::Json } else { Self::Text }
    }
}

/// Fetch every URL and render the report.
///
/// Failed fetches are part of the output, not errors.
pub async fn execute<R>(
    fan_out: &FanOut<R>,
    urls: &[String],
    format: OutputFormat,
    cancel: CancellationToken,
) -> Result<String, CliError>
where
    R: RetrieverPort + ?Sized + 'static,
{
    let report = fan_out
        .run_with_cancel(urls.iter().map(String::as_str), cancel)
        .await?;

    let cancelled = report
        .failures()
        .filter(|o| o.error().is_some_and(|e| e.is_cancelled()))
        .count();
    if cancelled > 0 {
        info!(cancelled, "run interrupted, unfinished fetches reported as cancelled");
    }

    match format {
        OutputFormat::Text => Ok(render_text(&report)),
        OutputFormat::Json => render_json(&report),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use fanfetch_core::testing::ScriptedRetriever;
    use fanfetch_dispatch::DispatchConfig;

    fn urls(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_text_output_in_arrival_order() {
        let fan_out = FanOut::new(
            Arc::new(
                ScriptedRetriever::new()
                    .ok("A", 100, 50)
                    .fail("B", "connection refused", 52)
                    .ok("C", 0, 10),
            ),
            DispatchConfig::new(),
        );

        let output = execute(
            &fan_out,
            &urls(&["A", "B", "C"]),
            OutputFormat::Text,
            CancellationToken::new(),
        )
        .await
        .unwrap();

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "0.01s        0  C");
        assert_eq!(lines[1], "0.05s      100  A");
        assert!(lines[2].ends_with("B: connection refused"));
        assert!(lines[3].ends_with("s elapsed"));
    }

    #[tokio::test]
    async fn test_json_output_when_no_urls() {
        let fan_out = FanOut::new(Arc::new(ScriptedRetriever::new()), DispatchConfig::new());

        let output = tokio_test::assert_ok!(
            execute(&fan_out, &[], OutputFormat::Json, CancellationToken::new()).await
        );

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["results"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn test_output_format_from_flag() {
        assert_eq!(OutputFormat::from_json_flag(true), OutputFormat::Json);
        assert_eq!(OutputFormat::from_json_flag(false), OutputFormat::Text);
    }
}
