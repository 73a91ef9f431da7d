//! Input decoders

pub mod encoder;

pub use encoder::QuadratureDecoder;
