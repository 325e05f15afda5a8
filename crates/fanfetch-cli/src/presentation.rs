//! Report formatting.
//!
//! Text output keeps the classic fetchall layout: seconds, byte count and
//! URL per line, then the total elapsed time.

use std::time::Duration;

use fanfetch_dispatch::{Outcome, Report};

use crate::error::CliError;

/// One line per outcome.
pub fn format_outcome(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Success {
            target,
            bytes,
            elapsed,
        } => format!("{:.2}s  {bytes:>7}  {target}", elapsed.as_secs_f64()),
        Outcome::Failure {
            target,
            elapsed,
            error,
        } => format!("{:.2}s  {target}: {error}", elapsed.as_secs_f64()),
    }
}

pub fn format_total(total_elapsed: Duration) -> String {
    format!("{:.2}s elapsed", total_elapsed.as_secs_f64())
}

/// Render the whole report as text, newline-terminated.
pub fn render_text(report: &Report) -> String {
    let mut out = String::new();
    for outcome in report.results() {
        out.push_str(&format_outcome(outcome));
        out.push('\n');
    }
    out.push_str(&format_total(report.total_elapsed()));
    out.push('\n');
    out
}

/// Render the whole report as pretty JSON, newline-terminated.
pub fn render_json(report: &Report) -> Result<String, CliError> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fanfetch_dispatch::{RetrievalError, Target};

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    fn sample_report() -> Report {
        Report::new(
            vec![
                Outcome::success(Target::new("https://c.example"), 0, ms(10)),
                Outcome::success(Target::new("https://a.example"), 12345, ms(1250)),
                Outcome::failure(
                    Target::new("https://b.example"),
                    ms(3),
                    RetrievalError::transport("connection refused"),
                ),
            ],
            ms(1260),
        )
    }

    #[test]
    fn test_success_line_layout() {
        let line = format_outcome(&Outcome::success(
            Target::new("https://golang.org"),
            12345,
            ms(1250),
        ));
        assert_eq!(line, "1.25s    12345  https://golang.org");
    }

    #[test]
    fn test_failure_line_shows_cause() {
        let line = format_outcome(&Outcome::failure(
            Target::new("https://b.example"),
            ms(3),
            RetrievalError::transport("connection refused"),
        ));
        assert_eq!(line, "0.00s  https://b.example: connection refused");
    }

    #[test]
    fn test_body_failure_names_target_once() {
        let line = format_outcome(&Outcome::failure(
            Target::new("http://x.example"),
            ms(3),
            RetrievalError::body("end of file before message length reached"),
        ));
        assert_eq!(
            line,
            "0.00s  http://x.example: while reading response body: end of file before message length reached"
        );
        assert_eq!(line.matches("http://x.example").count(), 1);
    }

    #[test]
    fn test_render_text_ends_with_total() {
        let text = render_text(&sample_report());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].ends_with("https://c.example"));
        assert_eq!(lines[3], "1.26s elapsed");
    }

    #[test]
    fn test_render_text_empty_report() {
        let text = render_text(&Report::new(Vec::new(), Duration::ZERO));
        assert_eq!(text, "0.00s elapsed\n");
    }

    #[test]
    fn test_render_json() {
        let json = render_json(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["total_elapsed_ms"], 1260);
        assert_eq!(value["results"][1]["bytes"], 12345);
        assert_eq!(value["results"][2]["status"], "failure");
    }
}
