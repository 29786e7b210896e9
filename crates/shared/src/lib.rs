//! Types shared between the backend client and the desktop UI.

pub mod domain;
pub mod protocol;
