// Standard Library Imports
use std::{fmt::Debug, iter::successors};

// External Crate Imports
use miette::Diagnostic;

pub trait UnwrapDiagnostic<E> {
    fn unwrap_diagnostic(self) -> E;
}

impl<T: Debug, E: Diagnostic> UnwrapDiagnostic<E> for Result<T, E> {
    fn unwrap_diagnostic(self) -> E {
        self.unwrap_err()
    }
}

impl<T: Debug, E: Diagnostic> UnwrapDiagnostic<E> for Result<T, Box<E>> {
    fn unwrap_diagnostic(self) -> E {
        *self.unwrap_err()
    }
}

macro_rules! assert_miette_snapshot {
    ($diag:expr) => {{
        use insta::{with_settings, assert_snapshot};
        use miette::{GraphicalReportHandler, GraphicalTheme};
        use crate::testing_tools::UnwrapDiagnostic;

        let mut out = String::new();
        GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor())
            .with_width(80)
            .render_report(&mut out, &$diag.unwrap_diagnostic())
            .unwrap();
        with_settings!({
            description => stringify!($diag)
        }, {
            assert_snapshot!(out);
        });
    }};
}

pub(crate) use assert_miette_snapshot;

/// Lists a diagnostic's messages, labels, and help text (following its chain of diagnostic sources) one per line. Each
/// label is shown with the first line of the `source` text it points at.
pub fn diagnostic_outline(diagnostic: &dyn Diagnostic, source: &str) -> String {
    let mut lines = Vec::new();
    for (depth, diagnostic) in successors(Some(diagnostic), |d| d.diagnostic_source()).enumerate() {
        let prefix = if depth == 0 { "" } else { "caused by: " };
        lines.push(format!("{prefix}{diagnostic}"));

        for label in diagnostic.labels().into_iter().flatten() {
            let start = label.offset();
            let text = source[start..start + label.len()].lines().next().unwrap_or_default();
            lines.push(format!("[{}] {}", label.label().unwrap_or_default(), text.trim()));
        }

        if let Some(help) = diagnostic.help() {
            lines.push(format!("help: {help}"));
        }
    }
    lines.join("\n")
}
