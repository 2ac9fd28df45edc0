//! # Echo Service
//!
//! **INTERNAL USE ONLY**: This crate exists solely to provide a gRPC server implementation
//! and its `.proto` source for integration testing the `grpcpie` CLI tool.
//! It is not intended for production use.

pub mod pb {
    include!(concat!(env!("OUT_DIR"), "/echo.rs"));
}

pub use pb::echo_service_server::{EchoService, EchoServiceServer};

/// Absolute path to the `.proto` source the server was generated from.
pub const PROTO_FILE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/proto/echo.proto");
