//! # Schema Resolver
//!
//! Turns the `.proto` sources of a [`Call`] into the descriptors needed to build and
//! send the request.
//!
//! ## Resolution
//!
//! 1. Every source file is compiled on its own (with `protox`, no `protoc` required) into
//!    a `DescriptorPool`. The file's directory is the first include path, followed by the
//!    call's import paths. Well-known types (`google/protobuf/*.proto`) are always available.
//! 2. Files are searched in the order they were supplied. In each file the endpoint's
//!    service is qualified with the file's package (`package.Service`, or just `Service`
//!    for package-less files) and matched against the services declared in that file.
//! 3. The first match wins. The method and its input message are then looked up in it.
use std::path::{Path, PathBuf};

use prost_reflect::{FileDescriptor, MessageDescriptor, MethodDescriptor, ServiceDescriptor};
use protox::Compiler;

use crate::{BoxError, Call};

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Failed to parse proto file '{}': {source}", path.display())]
    ProtoParseFailed {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("Service '{0}' not found")]
    ServiceNotFound(String),
    #[error("Method '{method}' not found in service '{service}'")]
    MethodNotFound { service: String, method: String },
    #[error("Input message '{message}' of method '{method}' not found")]
    MessageNotFound { method: String, message: String },
}

/// Descriptors of the method targeted by a [`Call`].
#[derive(Debug, Clone)]
pub struct ResolvedMethod {
    pub service: ServiceDescriptor,
    pub method: MethodDescriptor,
    pub input: MessageDescriptor,
}

/// Resolves the service, method and input message a [`Call`] refers to.
///
/// The endpoint of the call must be present; the [`crate::Invoker`] checks this before
/// resolving, so a missing endpoint is reported here as an unknown, empty service.
pub fn resolve_method(call: &Call) -> Result<ResolvedMethod, SchemaError> {
    let (service_name, method_name) = call
        .endpoint()
        .map(|e| (e.service(), e.method()))
        .unwrap_or_default();

    let files = call
        .proto_files()
        .iter()
        .map(|path| parse_proto_file(path, call.import_paths()))
        .collect::<Result<Vec<_>, _>>()?;

    let service = files
        .iter()
        .find_map(|file| find_service(file, service_name))
        .ok_or_else(|| SchemaError::ServiceNotFound(service_name.to_string()))?;

    tracing::debug!(service = service.full_name(), "resolved service");

    let method = service
        .methods()
        .find(|m| m.name() == method_name)
        .ok_or_else(|| SchemaError::MethodNotFound {
            service: service.full_name().to_string(),
            method: method_name.to_string(),
        })?;

    let input = input_message(&method)?;

    Ok(ResolvedMethod {
        service,
        method,
        input,
    })
}

/// Compiles a single `.proto` source into a [`FileDescriptor`].
///
/// The returned descriptor keeps its whole pool alive, imports included.
pub fn parse_proto_file(
    path: &Path,
    import_paths: &[PathBuf],
) -> Result<FileDescriptor, SchemaError> {
    let parse_failed = |source: BoxError| SchemaError::ProtoParseFailed {
        path: path.to_path_buf(),
        source,
    };

    // protox requires opened files to live under an include path.
    let absolute = std::fs::canonicalize(path).map_err(|e| parse_failed(e.into()))?;
    let (directory, file_name) = match (absolute.parent(), absolute.file_name()) {
        (Some(directory), Some(file_name)) => (directory, file_name.to_string_lossy()),
        _ => return Err(parse_failed("path does not name a file".into())),
    };

    let includes = std::iter::once(directory.to_path_buf()).chain(import_paths.iter().cloned());

    let mut compiler = Compiler::new(includes).map_err(|e| parse_failed(e.into()))?;
    compiler
        .include_imports(true)
        .open_file(&absolute)
        .map_err(|e| parse_failed(e.into()))?;

    let file = compiler
        .descriptor_pool()
        .get_file_by_name(&file_name)
        .ok_or_else(|| parse_failed(format!("'{file_name}' missing from compiled pool").into()))?;

    tracing::debug!(
        path = %path.display(),
        package = file.package_name(),
        services = file.services().count(),
        "parsed proto file"
    );

    Ok(file)
}

/// Looks for `service` among the services declared by `file`, qualified with its package.
fn find_service(file: &FileDescriptor, service: &str) -> Option<ServiceDescriptor> {
    let qualified = qualify_service_name(file.package_name(), service);
    file.services().find(|s| s.full_name() == qualified)
}

fn qualify_service_name(package: &str, service: &str) -> String {
    if package.is_empty() {
        service.to_string()
    } else {
        format!("{package}.{service}")
    }
}

/// Looks the declared input type of `method` up by name in its pool.
fn input_message(method: &MethodDescriptor) -> Result<MessageDescriptor, SchemaError> {
    let declared = method.method_descriptor_proto().input_type();
    let name = declared.strip_prefix('.').unwrap_or(declared);

    method
        .parent_pool()
        .get_message_by_name(name)
        .ok_or_else(|| SchemaError::MessageNotFound {
            method: method.full_name().to_string(),
            message: name.to_string(),
        })
}
