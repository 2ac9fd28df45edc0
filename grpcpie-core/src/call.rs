//! # Call
//!
//! A [`Call`] is everything needed to perform one invocation: the [`Endpoint`], the
//! `field=value` assignments that make up the request body, and the `.proto` files
//! describing the schema.
//!
//! Calls are assembled with a [`CallBuilder`] and are immutable afterwards.
//!
//! ```rust
//! use grpcpie_core::{Call, Endpoint};
//!
//! let endpoint = Endpoint::parse("localhost:50051/Library/GetBook").unwrap();
//! let call = Call::builder(endpoint)
//!     .proto_file("proto/library.proto")
//!     .field("id", "42")
//!     .build();
//!
//! assert_eq!(call.field_value("id"), Some("42"));
//! ```
use std::{collections::BTreeMap, path::PathBuf, time::Duration};

use crate::Endpoint;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Call {
    endpoint: Option<Endpoint>,
    fields: BTreeMap<String, String>,
    proto_files: Vec<PathBuf>,
    import_paths: Vec<PathBuf>,
    headers: Vec<(String, String)>,
    timeout: Option<Duration>,
}

impl Call {
    /// Starts building a call. Passing `None` yields a call that can be inspected
    /// but will be rejected by the [`crate::Invoker`].
    pub fn builder(endpoint: impl Into<Option<Endpoint>>) -> CallBuilder {
        CallBuilder {
            call: Call {
                endpoint: endpoint.into(),
                ..Default::default()
            },
        }
    }

    pub fn endpoint(&self) -> Option<&Endpoint> {
        self.endpoint.as_ref()
    }

    /// Field assignments, keyed by field name.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn field_value(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Proto sources in the order they were supplied. Earlier files win when
    /// resolving the service.
    pub fn proto_files(&self) -> &[PathBuf] {
        &self.proto_files
    }

    pub fn import_paths(&self) -> &[PathBuf] {
        &self.import_paths
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Incrementally assembles a [`Call`].
#[derive(Debug, Clone, Default)]
pub struct CallBuilder {
    call: Call,
}

impl CallBuilder {
    /// Assigns `value` to the field `name`. Assigning the same name twice keeps the last value.
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.call.fields.insert(name.into(), value.into());
        self
    }

    /// Appends a `.proto` source file.
    pub fn proto_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.call.proto_files.push(path.into());
        self
    }

    /// Appends a directory searched for `import`ed proto files.
    pub fn import_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.call.import_paths.push(path.into());
        self
    }

    /// Appends a gRPC metadata entry sent along with the request.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.call.headers.push((key.into(), value.into()));
        self
    }

    /// Bounds how long the RPC may take. Without it the call waits indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.call.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Call {
        self.call
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn endpoint() -> Endpoint {
        Endpoint::parse("localhost:30000/Service/Method").unwrap()
    }

    #[test]
    fn builder_without_options() {
        let call = Call::builder(endpoint()).build();

        assert_eq!(call.endpoint(), Some(&endpoint()));
        assert!(call.fields().is_empty());
        assert!(call.proto_files().is_empty());
        assert!(call.headers().is_empty());
        assert_eq!(call.timeout(), None);
    }

    #[test]
    fn builder_without_endpoint() {
        let call = Call::builder(None).build();

        assert_eq!(call, Call::default());
        assert!(call.endpoint().is_none());
    }

    #[test]
    fn builder_with_fields_and_files() {
        let call = Call::builder(endpoint())
            .field("a", "b")
            .field("c", "d")
            .proto_file("file1")
            .proto_file("file2")
            .build();

        assert_eq!(call.field_value("a"), Some("b"));
        assert_eq!(call.field_value("c"), Some("d"));
        assert_eq!(call.field_value("e"), None);
        assert_eq!(
            call.proto_files(),
            &[PathBuf::from("file1"), PathBuf::from("file2")]
        );
    }

    #[test]
    fn last_field_assignment_wins() {
        let call = Call::builder(endpoint())
            .field("a", "first")
            .field("a", "second")
            .build();

        assert_eq!(call.fields().len(), 1);
        assert_eq!(call.field_value("a"), Some("second"));
    }

    #[test]
    fn field_order_does_not_matter() {
        let forward = Call::builder(endpoint())
            .field("a", "1")
            .field("b", "2")
            .build();
        let backward = Call::builder(endpoint())
            .field("b", "2")
            .field("a", "1")
            .build();

        assert_eq!(forward, backward);
    }

    #[test]
    fn proto_file_order_is_kept() {
        let call = Call::builder(endpoint())
            .proto_file("b.proto")
            .field("x", "y")
            .proto_file("a.proto")
            .build();

        assert_eq!(
            call.proto_files(),
            &[PathBuf::from("b.proto"), PathBuf::from("a.proto")]
        );
    }

    #[test]
    fn headers_and_timeout() {
        let call = Call::builder(endpoint())
            .header("authorization", "token")
            .import_path("vendor/protos")
            .timeout(Duration::from_secs(3))
            .build();

        assert_eq!(
            call.headers(),
            &[("authorization".to_string(), "token".to_string())]
        );
        assert_eq!(call.import_paths(), &[PathBuf::from("vendor/protos")]);
        assert_eq!(call.timeout(), Some(Duration::from_secs(3)));
    }
}
