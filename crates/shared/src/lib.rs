//! Wire types and pure data logic shared by the console and its backend client.

pub mod domain;
pub mod error;
pub mod partition;
pub mod protocol;
