mod upload_progress;

#[rustfmt::skip]
pub use {
    upload_progress::{Arrival, UploadProgress},
};
