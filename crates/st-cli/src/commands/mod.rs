//! Command implementations

pub mod common;
pub mod init;
pub mod make;
pub mod snapshot;
pub mod status;
pub mod sync;
pub mod unlock;
pub mod up;
