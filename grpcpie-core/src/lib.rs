//! # grpcpie Core
//!
//! `grpcpie-core` is the library powering the `grpcpie` CLI. It invokes a unary gRPC method
//! without a compiled client stub: the schema comes from `.proto` sources parsed at runtime,
//! and the request is built from plain `name=value` strings.
//!
//! ## Key Components
//!
//! * **[`Endpoint`]:** The `host:port/service/method` coordinate of the RPC.
//! * **[`Call`]:** An endpoint, field assignments and proto sources, assembled with a [`CallBuilder`].
//! * **[`schema`]:** Parses the proto sources and resolves service, method and input message.
//! * **[`message`]:** Builds a `DynamicMessage`, coercing each string to its field's type.
//! * **[`Invoker`]:** Runs the whole pipeline and performs the call over a plaintext channel.
//!
//! ## Example
//!
//! ```rust,no_run
//! use grpcpie_core::{Call, Endpoint, Invoker};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let endpoint = Endpoint::parse("localhost:50051/EchoService/UnaryEcho")?;
//! let call = Call::builder(endpoint)
//!     .proto_file("proto/echo.proto")
//!     .field("message", "hello")
//!     .build();
//!
//! let response = Invoker::new().exec(&call).await?;
//! println!("{response:?}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Internal client
//!
//! * **[`grpc::client::GrpcClient`]:** A generic unary gRPC client over any `tonic` transport,
//!   using [`grpc::codec::DynamicCodec`] to move `DynamicMessage`s on the wire.
//!
//! ## Re-exports
//!
//! This crate re-exports `prost`, `prost-reflect`, and `tonic` to ensure that consumers
//! use compatible versions of these underlying dependencies.
pub mod call;
pub mod endpoint;
pub mod grpc;
pub mod invoker;
pub mod message;
pub mod schema;

pub use call::{Call, CallBuilder};
pub use endpoint::{Endpoint, EndpointError};
pub use invoker::{CallError, Invoker, PreparedCall};

// Re-exports
pub use prost;
pub use prost_reflect;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
