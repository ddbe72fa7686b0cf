//! Access control types
//!
//! Reads materialize the owner and the full grant list; writes only
//! accept a canned ACL name. The remote API offers no per-grant edit
//! path, so the read/write granularity mismatch is kept as-is.

use serde::{Deserialize, Serialize};

/// Owner identity attached to an ACL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclOwner {
    pub id: String,
    pub display_name: String,
}

/// Kind of grantee a grant applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GranteeType {
    CanonicalUser,
    Email,
    Group,
    Unknown,
}

/// One grant from a remote ACL, read-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclGrant {
    /// Grantee identity: canonical id or display name, email address, or
    /// group URI depending on the grantee type
    pub grantee: String,
    pub grantee_type: GranteeType,
    pub permission: String,
}

/// Owner plus grants, as one remote ACL read returns them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectAcl {
    pub owner: AclOwner,
    pub grants: Vec<AclGrant>,
}

/// Provider-predefined access control templates accepted on the write
/// path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CannedAcl {
    Private,
    PublicRead,
    PublicReadWrite,
    AuthenticatedRead,
    AwsExecRead,
    BucketOwnerRead,
    BucketOwnerFullControl,
}

impl CannedAcl {
    /// The wire name of this canned ACL
    pub fn name(&self) -> &'static str {
        match self {
            CannedAcl::Private => "private",
            CannedAcl::PublicRead => "public-read",
            CannedAcl::PublicReadWrite => "public-read-write",
            CannedAcl::AuthenticatedRead => "authenticated-read",
            CannedAcl::AwsExecRead => "aws-exec-read",
            CannedAcl::BucketOwnerRead => "bucket-owner-read",
            CannedAcl::BucketOwnerFullControl => "bucket-owner-full-control",
        }
    }

    /// Resolve a wire name back to a canned ACL
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "private" => Some(CannedAcl::Private),
            "public-read" => Some(CannedAcl::PublicRead),
            "public-read-write" => Some(CannedAcl::PublicReadWrite),
            "authenticated-read" => Some(CannedAcl::AuthenticatedRead),
            "aws-exec-read" => Some(CannedAcl::AwsExecRead),
            "bucket-owner-read" => Some(CannedAcl::BucketOwnerRead),
            "bucket-owner-full-control" => Some(CannedAcl::BucketOwnerFullControl),
            _ => None,
        }
    }
}

impl std::fmt::Display for CannedAcl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canned_acl_names_round_trip() {
        let all = [
            CannedAcl::Private,
            CannedAcl::PublicRead,
            CannedAcl::PublicReadWrite,
            CannedAcl::AuthenticatedRead,
            CannedAcl::AwsExecRead,
            CannedAcl::BucketOwnerRead,
            CannedAcl::BucketOwnerFullControl,
        ];
        for acl in all {
            assert_eq!(CannedAcl::from_name(acl.name()), Some(acl));
        }
    }

    #[test]
    fn test_canned_acl_unknown_name() {
        assert_eq!(CannedAcl::from_name("log-delivery-write"), None);
        assert_eq!(CannedAcl::from_name(""), None);
    }

    #[test]
    fn test_canned_acl_display() {
        assert_eq!(CannedAcl::PublicRead.to_string(), "public-read");
    }
}
