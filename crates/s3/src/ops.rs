//! Object operations
//!
//! Metadata, tagging, ACLs, bucket lifecycle, directory markers, and
//! single-key deletion. Each call maps 1:1 to one remote request and
//! nothing here retries; the provider's error is surfaced with the
//! operation context attached.

use std::collections::BTreeMap;

use aws_sdk_s3::operation::head_object::HeadObjectOutput;
use aws_sdk_s3::types::{self, ObjectCannedAcl, Type};

use s3x_core::{AclGrant, AclOwner, CannedAcl, Error, GranteeType, ObjectAcl, Result, TagEntry};

use crate::client::{Session, sdk_message};

impl Session {
    /// List bucket names, ascending.
    pub async fn list_buckets(&self) -> Result<Vec<String>> {
        let response = self
            .inner()
            .list_buckets()
            .send()
            .await
            .map_err(|e| Error::operation("ListBuckets", "", "", sdk_message(e)))?;

        let mut names: Vec<String> = response
            .buckets()
            .iter()
            .filter_map(|b| b.name().map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Fetch object metadata as a display-ready header map.
    ///
    /// Well-known headers are always present; optional ones render a
    /// sentinel instead of being omitted, so callers never distinguish
    /// "absent" from "explicitly none". User metadata entries carry the
    /// provider's `x-amz-meta-` prefix.
    pub async fn metadata(&self, bucket: &str, key: &str) -> Result<BTreeMap<String, String>> {
        let response = self
            .inner()
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::operation("GetObjectMetadata", bucket, key, sdk_message(e)))?;

        Ok(metadata_map(&response))
    }

    /// Fetch the object's tag set in the order the provider returns it.
    pub async fn tags(&self, bucket: &str, key: &str) -> Result<Vec<TagEntry>> {
        let response = self
            .inner()
            .get_object_tagging()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::operation("GetObjectTagging", bucket, key, sdk_message(e)))?;

        Ok(response
            .tag_set()
            .iter()
            .map(|tag| TagEntry::new(tag.key(), tag.value()))
            .collect())
    }

    /// Replace the object's entire tag set. No merging: the supplied
    /// sequence becomes the tag set.
    pub async fn set_tags(&self, bucket: &str, key: &str, tags: &[TagEntry]) -> Result<()> {
        let tag_set = tags
            .iter()
            .map(|tag| {
                types::Tag::builder()
                    .key(&tag.key)
                    .value(&tag.value)
                    .build()
                    .map_err(|e| {
                        Error::operation("PutObjectTagging", bucket, key, e.to_string())
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        let tagging = types::Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| Error::operation("PutObjectTagging", bucket, key, e.to_string()))?;

        self.inner()
            .put_object_tagging()
            .bucket(bucket)
            .key(key)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| Error::operation("PutObjectTagging", bucket, key, sdk_message(e)))?;

        tracing::debug!(bucket, key, tags = tags.len(), "tag set replaced");
        Ok(())
    }

    /// Read the object's owner and grant list.
    pub async fn acl(&self, bucket: &str, key: &str) -> Result<ObjectAcl> {
        let response = self
            .inner()
            .get_object_acl()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::operation("GetObjectAcl", bucket, key, sdk_message(e)))?;

        Ok(object_acl(response.owner(), response.grants()))
    }

    /// Apply a canned ACL to the object.
    ///
    /// The write path accepts only canned names while the read path
    /// returns full grants; the remote API has no per-grant edit call,
    /// so the asymmetry stays.
    pub async fn set_acl(&self, bucket: &str, key: &str, canned: CannedAcl) -> Result<()> {
        self.inner()
            .put_object_acl()
            .bucket(bucket)
            .key(key)
            .acl(canned_acl(canned))
            .send()
            .await
            .map_err(|e| Error::operation("PutObjectAcl", bucket, key, sdk_message(e)))?;

        tracing::debug!(bucket, key, acl = canned.name(), "canned acl applied");
        Ok(())
    }

    /// Create a bucket.
    pub async fn create_bucket(&self, name: &str) -> Result<()> {
        self.inner()
            .create_bucket()
            .bucket(name)
            .send()
            .await
            .map_err(|e| Error::operation("CreateBucket", name, "", sdk_message(e)))?;

        tracing::debug!(bucket = name, "bucket created");
        Ok(())
    }

    /// Delete a bucket. The provider enforces emptiness; its error is
    /// surfaced untouched rather than pre-checked here.
    pub async fn delete_bucket(&self, name: &str) -> Result<()> {
        self.inner()
            .delete_bucket()
            .bucket(name)
            .send()
            .await
            .map_err(|e| Error::operation("DeleteBucket", name, "", sdk_message(e)))?;

        tracing::debug!(bucket = name, "bucket deleted");
        Ok(())
    }

    /// Delete a single object. No batch form.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> Result<()> {
        self.inner()
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| Error::operation("DeleteObject", bucket, key, sdk_message(e)))?;

        tracing::debug!(bucket, key, "object deleted");
        Ok(())
    }

    /// Create a zero-byte marker object so an otherwise-empty prefix
    /// shows up in listings. The key is forced to end with the
    /// separator; any key ending in the separator is always treated as a
    /// marker, never a real leaf object.
    pub async fn create_directory_marker(&self, bucket: &str, key: &str) -> Result<()> {
        let marker = marker_key(key);

        self.inner()
            .put_object()
            .bucket(bucket)
            .key(&marker)
            .body(aws_sdk_s3::primitives::ByteStream::from(Vec::<u8>::new()))
            .send()
            .await
            .map_err(|e| Error::operation("CreateDirectoryMarker", bucket, marker.clone(), sdk_message(e)))?;

        tracing::debug!(bucket, key = %marker, "directory marker created");
        Ok(())
    }
}

/// Force the trailing separator that makes a key a directory marker
fn marker_key(key: &str) -> String {
    if key.ends_with('/') {
        key.to_string()
    } else {
        format!("{key}/")
    }
}

const NONE_SENTINEL: &str = "(none)";

/// Build the display-ready header map from a metadata response
fn metadata_map(response: &HeadObjectOutput) -> BTreeMap<String, String> {
    let mut map = BTreeMap::new();

    map.insert(
        "Content-Type".to_string(),
        response.content_type().unwrap_or_default().to_string(),
    );
    map.insert(
        "Content-Length".to_string(),
        response.content_length().unwrap_or(0).to_string(),
    );
    map.insert(
        "ETag".to_string(),
        response.e_tag().unwrap_or_default().to_string(),
    );
    map.insert(
        "Last-Modified".to_string(),
        response
            .last_modified()
            .and_then(|t| jiff::Timestamp::from_second(t.secs()).ok())
            .map(|t| t.strftime("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| NONE_SENTINEL.to_string()),
    );
    map.insert(
        "Storage-Class".to_string(),
        response
            .storage_class()
            .map(|sc| sc.as_str().to_string())
            .unwrap_or_else(|| "STANDARD".to_string()),
    );
    map.insert(
        "Version-Id".to_string(),
        response.version_id().unwrap_or(NONE_SENTINEL).to_string(),
    );
    map.insert(
        "Server-Side-Encryption".to_string(),
        response
            .server_side_encryption()
            .map(|sse| sse.as_str().to_string())
            .unwrap_or_else(|| NONE_SENTINEL.to_string()),
    );

    if let Some(user_metadata) = response.metadata() {
        for (name, value) in user_metadata {
            map.insert(format!("x-amz-meta-{name}"), value.clone());
        }
    }

    map
}

/// Map a canned ACL name onto the SDK's enum
fn canned_acl(canned: CannedAcl) -> ObjectCannedAcl {
    match canned {
        CannedAcl::Private => ObjectCannedAcl::Private,
        CannedAcl::PublicRead => ObjectCannedAcl::PublicRead,
        CannedAcl::PublicReadWrite => ObjectCannedAcl::PublicReadWrite,
        CannedAcl::AuthenticatedRead => ObjectCannedAcl::AuthenticatedRead,
        CannedAcl::AwsExecRead => ObjectCannedAcl::AwsExecRead,
        CannedAcl::BucketOwnerRead => ObjectCannedAcl::BucketOwnerRead,
        CannedAcl::BucketOwnerFullControl => ObjectCannedAcl::BucketOwnerFullControl,
    }
}

/// Materialize the remote owner and grant list into plain values
fn object_acl(owner: Option<&types::Owner>, grants: &[types::Grant]) -> ObjectAcl {
    let owner = AclOwner {
        id: owner
            .and_then(|o| o.id())
            .unwrap_or_default()
            .to_string(),
        display_name: owner
            .and_then(|o| o.display_name())
            .unwrap_or_default()
            .to_string(),
    };

    let grants = grants
        .iter()
        .filter_map(|grant| {
            let grantee = grant.grantee()?;
            let (grantee_type, identity) = match grantee.r#type() {
                Type::CanonicalUser => (
                    GranteeType::CanonicalUser,
                    grantee.display_name().or(grantee.id()).unwrap_or_default(),
                ),
                Type::AmazonCustomerByEmail => {
                    (GranteeType::Email, grantee.email_address().unwrap_or_default())
                }
                Type::Group => (GranteeType::Group, grantee.uri().unwrap_or_default()),
                _ => (GranteeType::Unknown, grantee.id().unwrap_or_default()),
            };

            Some(AclGrant {
                grantee: identity.to_string(),
                grantee_type,
                permission: grant
                    .permission()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default(),
            })
        })
        .collect();

    ObjectAcl { owner, grants }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::types::{Grant, Grantee, Owner, Permission, ServerSideEncryption, StorageClass};

    #[test]
    fn test_marker_key_forces_trailing_separator() {
        assert_eq!(marker_key("photos"), "photos/");
        assert_eq!(marker_key("photos/"), "photos/");
        assert_eq!(marker_key("a/b/c"), "a/b/c/");
    }

    #[test]
    fn test_metadata_map_sentinels_for_missing_fields() {
        let response = HeadObjectOutput::builder().build();
        let map = metadata_map(&response);

        assert_eq!(map["Content-Type"], "");
        assert_eq!(map["Content-Length"], "0");
        assert_eq!(map["ETag"], "");
        assert_eq!(map["Last-Modified"], "(none)");
        assert_eq!(map["Storage-Class"], "STANDARD");
        assert_eq!(map["Version-Id"], "(none)");
        assert_eq!(map["Server-Side-Encryption"], "(none)");
    }

    #[test]
    fn test_metadata_map_populated_fields_and_user_metadata() {
        let response = HeadObjectOutput::builder()
            .content_type("text/plain")
            .content_length(42)
            .e_tag("\"abc123\"")
            .storage_class(StorageClass::StandardIa)
            .version_id("v7")
            .server_side_encryption(ServerSideEncryption::Aes256)
            .metadata("author", "somebody")
            .build();

        let map = metadata_map(&response);

        assert_eq!(map["Content-Type"], "text/plain");
        assert_eq!(map["Content-Length"], "42");
        assert_eq!(map["ETag"], "\"abc123\"");
        assert_eq!(map["Storage-Class"], "STANDARD_IA");
        assert_eq!(map["Version-Id"], "v7");
        assert_eq!(map["Server-Side-Encryption"], "AES256");
        assert_eq!(map["x-amz-meta-author"], "somebody");
    }

    #[test]
    fn test_canned_acl_mapping() {
        assert_eq!(canned_acl(CannedAcl::Private), ObjectCannedAcl::Private);
        assert_eq!(canned_acl(CannedAcl::PublicRead), ObjectCannedAcl::PublicRead);
        assert_eq!(
            canned_acl(CannedAcl::BucketOwnerFullControl),
            ObjectCannedAcl::BucketOwnerFullControl
        );
    }

    #[test]
    fn test_object_acl_materialization() {
        let owner = Owner::builder()
            .id("owner-id")
            .display_name("owner")
            .build();
        let user_grant = Grant::builder()
            .grantee(
                Grantee::builder()
                    .r#type(Type::CanonicalUser)
                    .id("user-id")
                    .display_name("user")
                    .build()
                    .unwrap(),
            )
            .permission(Permission::FullControl)
            .build();
        let group_grant = Grant::builder()
            .grantee(
                Grantee::builder()
                    .r#type(Type::Group)
                    .uri("http://acs.amazonaws.com/groups/global/AllUsers")
                    .build()
                    .unwrap(),
            )
            .permission(Permission::Read)
            .build();

        let acl = object_acl(Some(&owner), &[user_grant, group_grant]);

        assert_eq!(acl.owner.id, "owner-id");
        assert_eq!(acl.owner.display_name, "owner");
        assert_eq!(acl.grants.len(), 2);
        assert_eq!(acl.grants[0].grantee, "user");
        assert_eq!(acl.grants[0].grantee_type, GranteeType::CanonicalUser);
        assert_eq!(acl.grants[0].permission, "FULL_CONTROL");
        assert_eq!(
            acl.grants[1].grantee,
            "http://acs.amazonaws.com/groups/global/AllUsers"
        );
        assert_eq!(acl.grants[1].grantee_type, GranteeType::Group);
        assert_eq!(acl.grants[1].permission, "READ");
    }

    #[test]
    fn test_object_acl_missing_owner() {
        let acl = object_acl(None, &[]);
        assert_eq!(acl.owner.id, "");
        assert!(acl.grants.is_empty());
    }
}
