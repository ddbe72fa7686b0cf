//! s3x-s3: AWS SDK adapter for the s3x client
//!
//! The only crate that talks to the wire. It owns the [`Session`] every
//! operation group hangs off and implements the seams defined in
//! s3x-core over aws-sdk-s3.

mod client;
mod listing;
mod ops;
mod transfer;

pub use client::Session;
