//! Token model: the immutable [`RawToken`], its redacted secrets, and the input shapes accepted by
//! `set_access_token`.

pub mod input;
pub mod raw;
pub mod secret;

pub use input::*;
pub use raw::*;
pub use secret::*;
