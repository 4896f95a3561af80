//! Logging setup utilities for the Hiroma binaries.

use std::str::FromStr;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human readable, colored output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}' (expected 'pretty' or 'json')")),
        }
    }
}

/// Build the default filter directive used when `RUST_LOG` is not set.
///
/// Every Hiroma crate plus the binary itself log at `default_log_level`;
/// `tower_http` is kept at the same level so request traces show up.
pub fn default_filter(binary_name: &str, default_log_level: &str) -> String {
    [
        "hiroma_shared",
        "hiroma_server",
        "hiroma_client",
        "tower_http",
        &binary_name.replace('-', "_"),
    ]
    .iter()
    .map(|target| format!("{target}={default_log_level}"))
    .collect::<Vec<_>>()
    .join(",")
}

/// Initialize the tracing subscriber.
///
/// The log level can be overridden using the `RUST_LOG` environment variable.
///
/// # Arguments
///
/// * `binary_name` - The name of the binary (e.g., "hiroma-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
/// * `format` - Pretty or JSON output
///
/// # Examples
///
/// ```no_run
/// use hiroma_shared::logger::{LogFormat, setup_logger};
///
/// setup_logger("hiroma-server", "info", LogFormat::Pretty);
/// ```
pub fn setup_logger(binary_name: &str, default_log_level: &str, format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter(binary_name, default_log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parses_case_insensitively() {
        // テスト項目: ログ形式の文字列が大文字小文字を区別せずに解析される
        // given (前提条件):
        let inputs = ["pretty", "JSON", "Json"];

        // when (操作):
        let parsed: Vec<LogFormat> = inputs.iter().map(|s| s.parse().unwrap()).collect();

        // then (期待する結果):
        assert_eq!(parsed, vec![LogFormat::Pretty, LogFormat::Json, LogFormat::Json]);
    }

    #[test]
    fn test_log_format_rejects_unknown_value() {
        // テスト項目: 未知のログ形式はエラーになる
        // given (前提条件):
        let input = "xml";

        // when (操作):
        let result = input.parse::<LogFormat>();

        // then (期待する結果):
        assert!(result.is_err());
    }

    #[test]
    fn test_default_filter_covers_crates_and_binary() {
        // テスト項目: デフォルトのフィルタに各クレートとバイナリが含まれる
        // given (前提条件):
        let binary = "hiroma-server";

        // when (操作):
        let filter = default_filter(binary, "debug");

        // then (期待する結果):
        assert!(filter.contains("hiroma_server=debug"));
        assert!(filter.contains("tower_http=debug"));
        assert!(filter.ends_with("hiroma_server=debug"));
    }
}
