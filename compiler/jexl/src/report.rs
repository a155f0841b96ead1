//! Human-readable error reports pointing into the source.

use ariadne::{Color, Config, Label, Report, ReportKind, Source};

use crate::JexlError;

/// Render `err` against `source` as an annotated report.
///
/// `colored` enables ANSI colors for terminal output.
pub fn render(name: &str, source: &str, err: &JexlError, colored: bool) -> String {
    let range = match err.span() {
        Some(span) => {
            let start = (span.start as usize).min(source.len());
            let end = (span.end as usize).clamp(start, source.len());
            start..end
        }
        None => 0..0,
    };
    let mut report = Report::build(ReportKind::Error, name, range.start)
        .with_config(Config::default().with_color(colored))
        .with_message(err.message());
    if let JexlError::Parse(parse) = err {
        report = report.with_code(parse.code);
    }
    let report = report
        .with_label(
            Label::new((name, range))
                .with_message(label_text(err))
                .with_color(Color::Red),
        )
        .finish();

    let mut out = Vec::new();
    if report.write((name, Source::from(source)), &mut out).is_err() {
        return err.to_string();
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn label_text(err: &JexlError) -> &'static str {
    match err {
        JexlError::Parse(_) => "here",
        JexlError::Eval(_) => "while evaluating this",
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use crate::Engine;

    use super::*;

    #[test]
    fn parse_errors_carry_code_and_message() {
        let err = Engine::new().create_expression("1 + )").unwrap_err();
        let text = render("input", "1 + )", &err, false);
        assert!(text.contains("E1002"), "{text}");
        assert!(text.contains("expected expression"), "{text}");
    }

    #[test]
    fn evaluation_errors_point_at_the_node() {
        let engine = Engine::builder().strict(true).build();
        let ctx = jexl_value::MapContext::new().into_shared();
        let err = engine
            .create_expression("1 + missing")
            .and_then(|e| e.evaluate(&ctx))
            .unwrap_err();
        let text = render("input", "1 + missing", &err, false);
        assert!(text.contains("undefined variable"), "{text}");
        assert!(text.contains("input"), "{text}");
    }
}
