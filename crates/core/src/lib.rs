//! s3x-core: Core library for the s3x object storage client
//!
//! This crate provides the SDK-independent half of the client:
//! - Account configuration and endpoint resolution
//! - Plain value types handed to the presentation layer
//! - The listing engine (prefix normalization, pagination, ordering)
//! - The chunked transfer engine (progress reporting, cancellation)
//!
//! Everything that talks to an actual S3-compatible endpoint lives in
//! s3x-s3, which implements the seams defined here. Keeping this crate
//! free of any SDK dependency lets the engines be tested against
//! synthetic page sources and in-memory streams.

pub mod account;
pub mod acl;
pub mod error;
pub mod listing;
pub mod object;
pub mod transfer;

pub use account::Account;
pub use acl::{AclGrant, AclOwner, CannedAcl, GranteeType, ObjectAcl};
pub use error::{Error, Result};
pub use listing::{ListingPage, PageSource, RawObject};
pub use object::{StorageEntry, TagEntry, TransferProgress};
pub use transfer::{copy_chunked, CancelToken, ProgressFn, CHUNK_SIZE};
