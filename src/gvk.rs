//! Main module for gvk-scan library functionality

pub mod decoding;
pub mod error;
pub mod extract;
pub mod header;
pub mod lexing;
pub mod pipeline;
pub mod reader;
pub mod testing;
