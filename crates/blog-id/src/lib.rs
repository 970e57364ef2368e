#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod entity;
mod error;
mod generator;
mod id;
#[cfg(feature = "serde")]
pub mod serde;
mod status;
mod time;

pub use crate::entity::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::status::*;
pub use crate::time::*;
