use bytes::{Buf, BufMut, Bytes};
use tonic::Status;
use tonic::codec::{Codec, DecodeBuf, Decoder, EncodeBuf, Encoder};

/// Codec that passes protobuf frames through as raw bytes
///
/// The client encodes request messages with prost before dispatch and decodes
/// replies after, so the transport layer can send any unary RPC through one
/// code path instead of a generated client per service method. The frame
/// content is exactly what a prost codec would produce.
#[derive(Debug, Clone, Default)]
pub struct RawCodec;

impl Codec for RawCodec {
  type Encode = Bytes;
  type Decode = Bytes;
  type Encoder = RawEncoder;
  type Decoder = RawDecoder;

  fn encoder(&mut self) -> Self::Encoder {
    RawEncoder
  }

  fn decoder(&mut self) -> Self::Decoder {
    RawDecoder
  }
}

#[derive(Debug)]
pub struct RawEncoder;

impl Encoder for RawEncoder {
  type Item = Bytes;
  type Error = Status;

  fn encode(&mut self, item: Bytes, dst: &mut EncodeBuf<'_>) -> Result<(), Status> {
    dst.put(item);
    Ok(())
  }
}

#[derive(Debug)]
pub struct RawDecoder;

impl Decoder for RawDecoder {
  type Item = Bytes;
  type Error = Status;

  fn decode(&mut self, src: &mut DecodeBuf<'_>) -> Result<Option<Bytes>, Status> {
    let remaining = src.remaining();
    Ok(Some(src.copy_to_bytes(remaining)))
  }
}
