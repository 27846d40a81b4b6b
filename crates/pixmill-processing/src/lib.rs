//! Pixmill image processing
//!
//! Content sniffing, codec glue and the image operations exposed over HTTP:
//! resize, format conversion and border trimming.

pub mod codec;
pub mod heif;
pub mod operations;
pub mod sniff;
pub mod trim;

pub use operations::{ImageOperations, ProcessedImage, ProcessingOptions};
pub use sniff::{detect_content_type, sniff_content_type, OCTET_STREAM, SNIFF_LEN};
