//! # Generic gRPC Transport
//!
//! This module contains the low-level building blocks for performing gRPC calls using
//! dynamic message types.
//!
//! Unlike standard `tonic` clients which are strongly typed (e.g., `HelloRequest`),
//! the components here work with `prost_reflect::DynamicMessage`, whose schema is
//! resolved at runtime from `.proto` sources.
pub mod client;
pub mod codec;
