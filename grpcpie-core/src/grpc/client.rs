//! # Generic gRPC Client
//!
//! This module wraps a standard `tonic` client to provide a generic interface for
//! unary gRPC communication. It is agnostic to the specific Protobuf messages being exchanged.
//!
//! ## How it works
//!
//! The [`GrpcClient`] utilizes the [`super::codec::DynamicCodec`] to handle serialization.
//! It does not need to know the structure of the data it is sending; it simply ensures
//! the service is ready and passes the `DynamicMessage` and `MethodDescriptor` to the codec.
//!
//! ## Features
//!
//! * **Dynamic Pathing**: Constructs the HTTP/2 path (e.g., `/package.Service/Method`) at runtime.
//! * **Metadata Handling**: Converts standard Rust string tuples into Tonic's `MetadataMap` for headers.
//! * **Any transport**: Works over a `Channel` or any other `GrpcService`, such as an in-process server.
use super::codec::DynamicCodec;
use crate::BoxError;
use http_body::Body as HttpBody;
use prost_reflect::{DynamicMessage, MethodDescriptor};
use std::str::FromStr;
use tonic::{
    client::GrpcService,
    metadata::{
        MetadataKey, MetadataValue,
        errors::{InvalidMetadataKey, InvalidMetadataValue},
    },
    transport::Channel,
};

#[derive(thiserror::Error, Debug)]
pub enum GrpcRequestError {
    #[error("Internal error, the client was not ready: '{0}'")]
    ClientNotReady(#[source] BoxError),
    #[error("Invalid metadata (header) key '{key}': '{source}'")]
    InvalidMetadataKey {
        key: String,
        source: InvalidMetadataKey,
    },
    #[error("Invalid metadata (header) value for key '{key}': '{source}'")]
    InvalidMetadataValue {
        key: String,
        source: InvalidMetadataValue,
    },
}

/// A generic client for unary calls with runtime-typed messages.
#[derive(Debug, Clone)]
pub struct GrpcClient<S = Channel> {
    client: tonic::client::Grpc<S>,
}

impl<S> GrpcClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn new(service: S) -> Self {
        let client = tonic::client::Grpc::new(service);
        Self { client }
    }

    /// Performs a Unary gRPC call (Single Request -> Single Response).
    ///
    /// # Returns
    /// * `Ok(Ok(DynamicMessage))` - Successful RPC execution.
    /// * `Ok(Err(Status))` - RPC executed, but server returned an error.
    /// * `Err(GrpcRequestError)` - Failed to prepare or send the request.
    pub async fn unary(
        &mut self,
        method: &MethodDescriptor,
        payload: DynamicMessage,
        headers: &[(String, String)],
    ) -> Result<Result<DynamicMessage, tonic::Status>, GrpcRequestError> {
        self.client
            .ready()
            .await
            .map_err(|e| GrpcRequestError::ClientNotReady(e.into()))?;

        let codec = DynamicCodec::new(method.output());
        let path = http_path(method);
        let request = build_request(payload, headers)?;

        match self.client.unary(request, path, codec).await {
            Ok(response) => Ok(Ok(response.into_inner())),
            Err(status) => Ok(Err(status)),
        }
    }
}

fn http_path(method: &MethodDescriptor) -> http::uri::PathAndQuery {
    let path = format!("/{}/{}", method.parent_service().full_name(), method.name());
    http::uri::PathAndQuery::from_str(&path).expect("valid gRPC path")
}

fn build_request<T>(
    payload: T,
    headers: &[(String, String)],
) -> Result<tonic::Request<T>, GrpcRequestError> {
    let mut request = tonic::Request::new(payload);
    for (k, v) in headers {
        let key =
            MetadataKey::from_str(k).map_err(|source| GrpcRequestError::InvalidMetadataKey {
                key: k.clone(),
                source,
            })?;
        let val = MetadataValue::from_str(v).map_err(|source| {
            GrpcRequestError::InvalidMetadataValue {
                key: k.clone(),
                source,
            }
        })?;
        request.metadata_mut().insert(key, val);
    }
    Ok(request)
}
