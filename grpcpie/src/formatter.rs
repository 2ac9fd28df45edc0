use colored::*;
use grpcpie_core::{CallError, prost_reflect::DynamicMessage};

use crate::cli::{ArgsError, Format};

/// A wrapper struct for a formatted, colored string.
///
/// Implements `Display` so it can be printed directly.
pub struct FormattedString(pub String);

/// A decoded response paired with the format it should be printed in.
pub struct Response(pub DynamicMessage, pub Format);

impl std::fmt::Display for FormattedString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.0)
    }
}

impl From<Response> for FormattedString {
    fn from(Response(message, format): Response) -> Self {
        match format {
            Format::Json => FormattedString(
                serde_json::to_string_pretty(&message)
                    .unwrap_or_else(|_| message.to_text_format()),
            ),
            Format::Text => FormattedString(message.to_text_format()),
        }
    }
}

impl From<ArgsError> for FormattedString {
    fn from(err: ArgsError) -> Self {
        FormattedString(format!("{} {}", "Invalid Arguments:".red().bold(), err))
    }
}

impl From<CallError> for FormattedString {
    fn from(err: CallError) -> Self {
        let label = match &err {
            CallError::InvocationFailed(status) => {
                return FormattedString(format!(
                    "{} code={:?} message={:?}",
                    "gRPC Failed:".red().bold(),
                    status.code(),
                    status.message()
                ));
            }
            CallError::EndpointMissing => "Invalid Arguments:",
            CallError::ProtoResolutionFailed(_) | CallError::StreamingNotSupported(_) => {
                "Schema Error:"
            }
            CallError::MessageBuild(_) => "Invalid Request:",
            CallError::ConnectionFailed { .. } => "Connection Error:",
            CallError::Request(_) => "Call Failed:",
        };

        FormattedString(format!("{} {}", label.red().bold(), one_line(&err)))
    }
}

/// Joins the error and its sources, so the root cause of parse and transport
/// failures is visible without a backtrace.
fn one_line(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !out.contains(&cause_msg) {
            out.push_str(": ");
            out.push_str(&cause_msg);
        }
        source = cause.source();
    }

    out.replace('\n', " ")
}
