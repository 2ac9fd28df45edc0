//! # Invoker
//!
//! Executes a [`Call`] end to end. Every step is terminal on failure:
//!
//! 1. **Resolve**: locate service, method and input message in the call's proto files.
//! 2. **Build**: populate the request message from the call's field assignments.
//! 3. **Connect**: open a plaintext channel to `host:port`. Dialing is lazy, so an
//!    unreachable target is only noticed by the next step.
//! 4. **Invoke**: perform one unary call, without retries.
//! 5. **Close**: drop the channel, whatever the outcome of step 4.
//!
//! Steps 1-2 are available on their own through [`Invoker::prepare`], and the resulting
//! [`PreparedCall`] can be sent over any [`GrpcService`], not only a network channel.
use std::{error::Error as _, time::Duration};

use http_body::Body as HttpBody;
use prost_reflect::{DynamicMessage, MethodDescriptor};
use tonic::{
    Code,
    client::GrpcService,
    transport::{Channel, Endpoint as ChannelEndpoint},
};

use crate::{
    BoxError, Call, Endpoint,
    grpc::client::{GrpcClient, GrpcRequestError},
    message::{self, MessageBuildError},
    schema::{self, SchemaError},
};

#[derive(Debug, thiserror::Error)]
pub enum CallError {
    #[error("No endpoint given")]
    EndpointMissing,
    #[error("Failed to resolve the method from the proto files: {0}")]
    ProtoResolutionFailed(#[from] SchemaError),
    #[error("Method '{0}' is streaming, only unary methods are supported")]
    StreamingNotSupported(String),
    #[error(transparent)]
    MessageBuild(#[from] MessageBuildError),
    #[error("Failed to connect to '{target}': {source}")]
    ConnectionFailed {
        target: String,
        #[source]
        source: BoxError,
    },
    #[error("gRPC call failed: code={:?} message={:?}", .0.code(), .0.message())]
    InvocationFailed(#[source] tonic::Status),
    #[error("gRPC client request error: '{0}'")]
    Request(#[from] GrpcRequestError),
}

/// A resolved method and a fully built request, ready to be sent.
#[derive(Debug, Clone)]
pub struct PreparedCall {
    method: MethodDescriptor,
    request: DynamicMessage,
    headers: Vec<(String, String)>,
}

impl PreparedCall {
    pub fn method(&self) -> &MethodDescriptor {
        &self.method
    }

    pub fn request(&self) -> &DynamicMessage {
        &self.request
    }

    /// Sends the request through `client` and waits for the response.
    pub async fn invoke<S>(self, client: &mut GrpcClient<S>) -> Result<DynamicMessage, CallError>
    where
        S: GrpcService<tonic::body::Body>,
        S::Error: Into<BoxError>,
        S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
        <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
    {
        tracing::debug!(method = self.method.full_name(), "sending request");

        client
            .unary(&self.method, self.request, &self.headers)
            .await?
            .map_err(CallError::InvocationFailed)
    }
}

/// Runs calls against the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct Invoker;

impl Invoker {
    pub fn new() -> Self {
        Self
    }

    /// Resolves the method and builds the request, without touching the network.
    pub fn prepare(&self, call: &Call) -> Result<PreparedCall, CallError> {
        if call.endpoint().is_none() {
            return Err(CallError::EndpointMissing);
        }

        let resolved = schema::resolve_method(call)?;

        if resolved.method.is_client_streaming() || resolved.method.is_server_streaming() {
            return Err(CallError::StreamingNotSupported(
                resolved.method.full_name().to_string(),
            ));
        }

        let request = message::build_message(&resolved.input, call.fields())?;

        Ok(PreparedCall {
            method: resolved.method,
            request,
            headers: call.headers().to_vec(),
        })
    }

    /// Performs `call` and returns the decoded response.
    pub async fn exec(&self, call: &Call) -> Result<DynamicMessage, CallError> {
        let endpoint = call.endpoint().ok_or(CallError::EndpointMissing)?;
        let prepared = self.prepare(call)?;

        let target = endpoint.host_and_port();
        let mut client = GrpcClient::new(connect(endpoint, call.timeout())?);
        tracing::debug!(addr = %target, "channel opened");

        let result = prepared.invoke(&mut client).await;

        drop(client);
        tracing::debug!(addr = %target, "channel closed");

        result.map_err(|err| surface_connection_failure(err, &target))
    }
}

fn connect(endpoint: &Endpoint, timeout: Option<Duration>) -> Result<Channel, CallError> {
    let uri = format!("http://{}", endpoint.host_and_port());

    let mut channel = ChannelEndpoint::from_shared(uri).map_err(|e| CallError::ConnectionFailed {
        target: endpoint.host_and_port(),
        source: e.into(),
    })?;

    if let Some(timeout) = timeout {
        channel = channel.timeout(timeout);
    }

    Ok(channel.connect_lazy())
}

/// Dialing happens on first use, so transport errors show up as statuses of the call.
/// Those carry the underlying error as their source, unlike statuses sent by a server.
fn surface_connection_failure(err: CallError, target: &str) -> CallError {
    match err {
        CallError::InvocationFailed(status)
            if status.code() == Code::Unavailable && status.source().is_some() =>
        {
            CallError::ConnectionFailed {
                target: target.to_string(),
                source: status.into(),
            }
        }
        CallError::Request(GrpcRequestError::ClientNotReady(source)) => {
            CallError::ConnectionFailed {
                target: target.to_string(),
                source,
            }
        }
        err => err,
    }
}
