//! # Dynamic Protobuf Codec
//!
//! This module implements `tonic::codec::Codec` for [`DynamicMessage`], so `tonic` can
//! transport messages whose structure is only known at runtime.
//!
//! ## How it works
//!
//! 1. **Encoder**: Serializes an already-populated `DynamicMessage` into the gRPC byte buffer.
//! 2. **Decoder**: Reads raw bytes from the wire and merges them into an empty
//!    `DynamicMessage` of the method's output type.
use prost::Message;
use prost_reflect::{DynamicMessage, MessageDescriptor};
use tonic::{
    Status,
    codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder},
};

/// A Codec that sends and receives [`DynamicMessage`]s.
///
/// Only the response schema is needed: requests carry their own descriptor.
pub struct DynamicCodec {
    /// Schema for the output message.
    res_desc: MessageDescriptor,
}

impl DynamicCodec {
    /// Creates a new `DynamicCodec` decoding responses as `res_desc`.
    pub fn new(res_desc: MessageDescriptor) -> Self {
        Self { res_desc }
    }
}

impl Codec for DynamicCodec {
    type Encode = DynamicMessage;
    type Decode = DynamicMessage;

    type Encoder = DynamicEncoder;
    type Decoder = DynamicDecoder;

    fn encoder(&mut self) -> Self::Encoder {
        DynamicEncoder
    }

    fn decoder(&mut self) -> Self::Decoder {
        DynamicDecoder(self.res_desc.clone())
    }
}

/// Responsible for encoding a message into Protobuf bytes.
pub struct DynamicEncoder;

impl Encoder for DynamicEncoder {
    type Item = DynamicMessage;
    type Error = Status;

    fn encode(&mut self, item: Self::Item, dst: &mut EncodeBuf<'_>) -> Result<(), Self::Error> {
        item.encode(dst)
            .map_err(|e| Status::internal(format!("Failed to encode request: {}", e)))
    }
}

/// Responsible for decoding Protobuf bytes into a message of the expected output type.
pub struct DynamicDecoder(MessageDescriptor);

impl Decoder for DynamicDecoder {
    type Item = DynamicMessage;
    type Error = Status;

    fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Self::Item>, Self::Error> {
        let mut msg = DynamicMessage::new(self.0.clone());
        msg.merge(src)
            .map_err(|e| Status::internal(format!("Failed to decode Protobuf bytes: {}", e)))?;

        Ok(Some(msg))
    }
}
