//! Miette-based error diagnostics for CLI error presentation.
//!
//! Every crate error is mapped to a diagnostic with a stable code and a help
//! line for its category. TOML syntax errors are shown against the file
//! content with the offending span labeled.

use std::path::Path;

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

use crate::domain::ValidationError;
use crate::error::{ConfigError, Error, SubmissionError};

/// TOML syntax error with source location context.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(
    code(wagerline::config::syntax),
    help("fix the TOML syntax, or regenerate the file with `wagerline config init --force`")
)]
pub struct ConfigSyntaxDiagnostic {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: SourceSpan,
}

/// Any other error, with a category code and an optional help line.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CliDiagnostic {
    pub message: String,
    pub code: &'static str,
    pub help: Option<String>,
}

impl Diagnostic for CliDiagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        Some(Box::new(self.code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn std::fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|help| Box::new(help) as Box<dyn std::fmt::Display + 'a>)
    }
}

impl CliDiagnostic {
    #[must_use]
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code,
            help: None,
        }
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

fn syntax(err: &toml::de::Error, config_path: &Path) -> Option<ConfigSyntaxDiagnostic> {
    let span = err.span()?;
    let content = std::fs::read_to_string(config_path).ok()?;
    Some(ConfigSyntaxDiagnostic {
        message: err.message().to_string(),
        src: NamedSource::new(config_path.display().to_string(), content),
        span: (span.start, span.end.saturating_sub(span.start)).into(),
    })
}

fn validation_help(err: &ValidationError) -> &'static str {
    match err {
        ValidationError::StaleBet { .. } => {
            "the epoch has ended; the bet no longer accepts stakes or resolutions"
        }
        ValidationError::UnknownBet { .. } => "run `wagerline list` to see existing bet ids",
        ValidationError::EmptyTitle => "pass a non-blank --title",
        ValidationError::TooPrecise { .. } => "use fewer decimal places",
        _ => "amounts and thresholds are positive decimal numbers such as 0.5",
    }
}

/// Turn a crate error into a miette report.
pub fn diagnose(err: Error, config_path: &Path) -> Report {
    let message = err.to_string();
    let diagnostic = match &err {
        Error::Config(ConfigError::Parse(parse)) => {
            if let Some(diagnostic) = syntax(parse, config_path) {
                return Report::new(diagnostic);
            }
            CliDiagnostic::new("wagerline::config", message)
        }
        Error::Config(ConfigError::ReadFile(_)) => CliDiagnostic::new("wagerline::config", message)
            .with_help(format!(
                "create {} with `wagerline config init` or pass --config",
                config_path.display()
            )),
        Error::Config(_) => CliDiagnostic::new("wagerline::config", message)
            .with_help("run `wagerline config validate` after fixing the value"),
        Error::Validation(validation) => CliDiagnostic::new("wagerline::validation", message)
            .with_help(validation_help(validation)),
        Error::Submission(SubmissionError::Wallet(_)) => {
            CliDiagnostic::new("wagerline::wallet", message)
                .with_help("set WALLET_PRIVATE_KEY or configure wallet.keystore_path")
        }
        Error::Submission(_) => CliDiagnostic::new("wagerline::submission", message)
            .with_help("nothing was submitted; check the wallet balance and the bet state"),
        Error::Confirmation(_) => CliDiagnostic::new("wagerline::confirmation", message)
            .with_help("open the explorer link to inspect the transaction"),
        Error::Oracle(_) => CliDiagnostic::new("wagerline::oracle", message)
            .with_help("the epoch was not ended; retry once the price service is reachable"),
        Error::Ledger(_) | Error::Http(_) | Error::Url(_) => {
            CliDiagnostic::new("wagerline::connection", message)
                .with_help("check ledger.rpc_url and your network connection")
        }
        Error::Cancelled => CliDiagnostic::new("wagerline::cancelled", message),
        Error::Json(_) | Error::Io(_) => CliDiagnostic::new("wagerline::io", message),
    };
    Report::new(diagnostic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::BetId;
    use crate::error::OracleError;

    fn code_of(report: &Report) -> Option<String> {
        report.code().map(|code| code.to_string())
    }

    #[test]
    fn categories_get_their_own_codes() {
        let path = Path::new("/nonexistent/config.toml");
        let stale = diagnose(ValidationError::StaleBet { bet_id: BetId::new(1) }.into(), path);
        assert_eq!(code_of(&stale).as_deref(), Some("wagerline::validation"));

        let oracle = diagnose(OracleError::Status { status: 503 }.into(), path);
        assert_eq!(code_of(&oracle).as_deref(), Some("wagerline::oracle"));
        assert!(oracle
            .help()
            .is_some_and(|help| help.to_string().contains("not ended")));
    }

    #[test]
    fn syntax_errors_point_into_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[ledger\nkind = 1\n").unwrap();
        let err = crate::infrastructure::config::Config::load(&path).unwrap_err();

        let report = diagnose(err, &path);
        assert_eq!(code_of(&report).as_deref(), Some("wagerline::config::syntax"));
        assert!(report.source_code().is_some());
    }
}
