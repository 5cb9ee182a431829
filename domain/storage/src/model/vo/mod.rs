mod chunk;
mod receipt;
mod retry_policy;
mod upload_id;

#[rustfmt::skip]
pub use {
    chunk::*,
    receipt::*,
    retry_policy::*,
    upload_id::*,
};
