//! # CLI
//!
//! This module defines the command-line interface of `grpcpie` using `clap`.
//!
//! Clap only collects raw strings; turning them into a [`Call`] (endpoint parsing,
//! `name=value` splitting, `key:value` headers) happens in [`Cli::into_call`].
use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};
use grpcpie_core::{Call, Endpoint, EndpointError};

#[derive(Debug, thiserror::Error)]
pub enum ArgsError {
    #[error("Host missing. Usage: grpcpie [OPTIONS] <host:port/service/method> [name=value ...]")]
    HostMissing,
    #[error("Invalid field assignment '{0}'. Expected 'name=value'")]
    InvalidFieldAssignment(String),
    #[error("Invalid header '{0}'. Expected 'key:value'")]
    InvalidHeader(String),
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Protobuf JSON mapping, pretty printed
    #[default]
    Json,
    /// Protobuf text format
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "grpcpie", version, about = "Invoke a unary gRPC method from .proto sources")]
pub struct Cli {
    /// Proto file declaring the service (repeatable, searched in order)
    #[arg(long = "proto", value_name = "PATH", default_value = "")]
    pub proto_files: Vec<String>,

    /// Directory used to resolve imports of the proto files (repeatable)
    #[arg(short = 'I', long = "import-path", value_name = "DIR")]
    pub import_paths: Vec<PathBuf>,

    /// Metadata sent with the request (repeatable)
    #[arg(short = 'H', long = "header", value_name = "KEY:VALUE")]
    pub headers: Vec<String>,

    /// Deadline of the call, in seconds
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Output format of the response
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Endpoint (host:port/service/method) followed by request fields (name=value)
    #[arg(value_name = "ARGS")]
    pub args: Vec<String>,
}

impl Cli {
    pub fn into_call(self) -> Result<Call, ArgsError> {
        let (endpoint, assignments) = self.args.split_first().ok_or(ArgsError::HostMissing)?;

        let mut builder = Call::builder(Endpoint::parse(endpoint)?);

        for assignment in assignments {
            let (name, value) = parse_assignment(assignment)?;
            builder = builder.field(name, value);
        }

        for header in &self.headers {
            let (key, value) = parse_header(header)?;
            builder = builder.header(key, value);
        }

        for path in self.proto_files {
            builder = builder.proto_file(path);
        }

        for dir in self.import_paths {
            builder = builder.import_path(dir);
        }

        if let Some(secs) = self.timeout {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(builder.build())
    }
}

fn parse_assignment(arg: &str) -> Result<(&str, &str), ArgsError> {
    let mut parts = arg.split('=');

    match (parts.next(), parts.next(), parts.next()) {
        (Some(name), Some(value), None) => Ok((name, value)),
        _ => Err(ArgsError::InvalidFieldAssignment(arg.to_string())),
    }
}

fn parse_header(arg: &str) -> Result<(String, String), ArgsError> {
    arg.split_once(':')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| ArgsError::InvalidHeader(arg.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn parse(argv: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("grpcpie").chain(argv.iter().copied())).unwrap()
    }

    #[test]
    fn test_no_args_is_host_missing() {
        assert!(matches!(
            parse(&[]).into_call(),
            Err(ArgsError::HostMissing)
        ));
    }

    #[test]
    fn test_bare_host_is_invalid_endpoint() {
        match parse(&["localhost"]).into_call() {
            Err(ArgsError::Endpoint(EndpointError::Invalid(raw))) => assert_eq!(raw, "localhost"),
            other => panic!("Expected invalid endpoint, got {other:?}"),
        }
    }

    #[test]
    fn test_endpoint_only() {
        let call = parse(&["localhost:50051/EchoService/UnaryEcho"])
            .into_call()
            .unwrap();

        let endpoint = call.endpoint().unwrap();
        assert_eq!(endpoint.host(), "localhost");
        assert_eq!(endpoint.port(), 50051);
        assert_eq!(endpoint.service(), "EchoService");
        assert_eq!(endpoint.method(), "UnaryEcho");
        assert!(call.fields().is_empty());
        // `--proto` defaults to a single empty path
        assert_eq!(call.proto_files(), &[PathBuf::new()]);
    }

    #[test]
    fn test_fields_and_proto() {
        let call = parse(&[
            "--proto",
            "file",
            "localhost:50051/EchoService/UnaryEcho",
            "a=b",
            "c=d",
        ])
        .into_call()
        .unwrap();

        let expected: BTreeMap<String, String> = [("a", "b"), ("c", "d")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        assert_eq!(call.fields(), &expected);
        assert_eq!(call.proto_files(), &[PathBuf::from("file")]);
    }

    #[test]
    fn test_empty_value_is_allowed() {
        let call = parse(&["localhost:50051/EchoService/UnaryEcho", "message="])
            .into_call()
            .unwrap();

        assert_eq!(call.field_value("message"), Some(""));
    }

    #[test]
    fn test_invalid_field_assignments() {
        for arg in ["c", "a=b=c", "=="] {
            match parse(&["localhost:50051/EchoService/UnaryEcho", arg]).into_call() {
                Err(ArgsError::InvalidFieldAssignment(raw)) => assert_eq!(raw, arg),
                other => panic!("Expected InvalidFieldAssignment for '{arg}', got {other:?}"),
            }
        }
    }

    #[test]
    fn test_options() {
        let call = parse(&[
            "--proto",
            "a.proto",
            "--proto",
            "b.proto",
            "-I",
            "vendor",
            "-H",
            "authorization: Bearer token",
            "--timeout",
            "5",
            "localhost:50051/EchoService/UnaryEcho",
        ])
        .into_call()
        .unwrap();

        assert_eq!(
            call.proto_files(),
            &[PathBuf::from("a.proto"), PathBuf::from("b.proto")]
        );
        assert_eq!(call.import_paths(), &[PathBuf::from("vendor")]);
        assert_eq!(
            call.headers(),
            &[("authorization".to_string(), "Bearer token".to_string())]
        );
        assert_eq!(call.timeout(), Some(Duration::from_secs(5)));
    }

    #[test]
    fn test_invalid_header() {
        match parse(&["-H", "no-colon", "localhost:50051/EchoService/UnaryEcho"]).into_call() {
            Err(ArgsError::InvalidHeader(raw)) => assert_eq!(raw, "no-colon"),
            other => panic!("Expected InvalidHeader, got {other:?}"),
        }
    }

    #[test]
    fn test_format() {
        assert_eq!(parse(&[]).format, Format::Json);
        assert_eq!(parse(&["--format", "text"]).format, Format::Text);
        assert!(Cli::try_parse_from(["grpcpie", "--format", "yaml"]).is_err());
    }
}
