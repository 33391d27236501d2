//! Recognition Common Types
//!
//! Shared types used by both the recognition server and the example client.

pub mod protocol;
pub mod record;

pub use protocol::{
    AddImagesRequest, DeleteResponse, ErrorResponse, ImageResponse, ImagesResponse, NewImage,
};
pub use record::{ImageRecord, InferenceOutcome, Prediction};
