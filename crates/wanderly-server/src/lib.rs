#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod action;
pub mod extract;
pub mod handler;
pub mod middleware;
pub mod model;
pub mod page;
pub mod service;
pub mod validation;

#[cfg(test)]
pub(crate) mod mock;

pub use crate::error::{BoxedError, Error, ErrorKind, Result};
