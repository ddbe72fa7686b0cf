//! Listing engine
//!
//! Converts the remote store's flat, delimiter-based key listing into a
//! one-level-deep hierarchical view. The engine drives the continuation
//! protocol to exhaustion, collapses common prefixes that misbehaving
//! servers report more than one level deep, and returns a deterministic
//! ordering: prefixes first, then leaf objects, each group sorted by
//! display name.

use std::collections::HashSet;

use async_trait::async_trait;
use jiff::Timestamp;

use crate::error::Result;
use crate::object::StorageEntry;

/// A single object row as the remote API reports it, before filtering
#[derive(Debug, Clone)]
pub struct RawObject {
    pub key: String,
    pub size: i64,
    pub last_modified: Option<Timestamp>,
    pub storage_class: Option<String>,
    pub etag: Option<String>,
}

/// One page of a delimiter-based listing plus its continuation state
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Common prefix strings, possibly deeper than one level
    pub common_prefixes: Vec<String>,
    /// Objects directly under the query prefix, markers included
    pub objects: Vec<RawObject>,
    /// Token for the next page; `None` on the last page
    pub next_token: Option<String>,
}

/// Source of raw listing pages.
///
/// The s3 adapter implements this over ListObjectsV2; tests feed
/// synthetic pages through it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page starting at `token` (`None` for the first page)
    async fn fetch_page(
        &self,
        bucket: &str,
        prefix: &str,
        token: Option<String>,
    ) -> Result<ListingPage>;
}

/// List everything one level below `prefix`.
///
/// Pages are fetched strictly sequentially until the continuation
/// protocol is exhausted; the result is fully materialized before
/// returning. Any page failure aborts the whole call with no partial
/// result.
///
/// Postconditions the caller may rely on:
/// - every returned key is unique,
/// - no entry equals the query prefix itself,
/// - prefix entries come before leaf entries, each group ordered by
///   display name ascending (case-sensitive).
pub async fn list_entries<S>(source: &S, bucket: &str, prefix: &str) -> Result<Vec<StorageEntry>>
where
    S: PageSource + ?Sized,
{
    let mut entries = Vec::new();
    let mut seen_prefixes = HashSet::new();
    let mut token: Option<String> = None;
    let mut pages = 0usize;

    loop {
        let page = source.fetch_page(bucket, prefix, token.take()).await?;
        pages += 1;
        collect_page(prefix, &page, &mut seen_prefixes, &mut entries);

        match page.next_token {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    sort_entries(&mut entries);
    tracing::debug!(bucket, prefix, pages, entries = entries.len(), "listing complete");
    Ok(entries)
}

/// Fold one raw page into the accumulated result
fn collect_page(
    prefix: &str,
    page: &ListingPage,
    seen_prefixes: &mut HashSet<String>,
    out: &mut Vec<StorageEntry>,
) {
    for raw in &page.common_prefixes {
        if raw == prefix {
            continue;
        }
        if let Some(entry) = normalize_common_prefix(prefix, raw) {
            if seen_prefixes.insert(entry.key.clone()) {
                out.push(entry);
            }
        }
    }

    for obj in &page.objects {
        // A key equal to the prefix or ending in the separator is a
        // directory marker; those surface through the prefix list.
        if obj.key == prefix || obj.key.ends_with('/') {
            continue;
        }

        let display_name = leaf_display_name(&obj.key);
        if display_name.is_empty() {
            continue;
        }

        out.push(StorageEntry {
            key: obj.key.clone(),
            display_name: display_name.to_string(),
            is_prefix: false,
            size: obj.size,
            last_modified: obj.last_modified,
            storage_class: obj.storage_class.clone(),
            etag: obj.etag.clone(),
        });
    }
}

/// Normalize a reported common prefix to exactly one segment below the
/// query prefix.
///
/// Compliant servers already return one level, but some S3-compatible
/// servers report deeply nested prefixes: querying `"test/"` may yield
/// `"test/a/b/c/"`, which must collapse to `"test/a/"`. Returns `None`
/// for self-references and empty segments.
fn normalize_common_prefix(prefix: &str, raw: &str) -> Option<StorageEntry> {
    let mut relative = raw.strip_prefix(prefix).unwrap_or(raw);
    if let Some(pos) = relative.find('/') {
        relative = &relative[..=pos];
    }

    let display = relative.trim_end_matches('/');
    if display.is_empty() {
        return None;
    }

    let key = format!("{prefix}{relative}");
    if key == prefix {
        return None;
    }

    Some(StorageEntry::prefix(key, format!("{display}/")))
}

/// Display name of a leaf object: the segment after the last separator
fn leaf_display_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Sort postcondition of a listing result: prefixes before leaves, each
/// group by display name ascending
fn sort_entries(entries: &mut [StorageEntry]) {
    entries.sort_by(|a, b| {
        b.is_prefix
            .cmp(&a.is_prefix)
            .then_with(|| a.display_name.cmp(&b.display_name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn obj(key: &str, size: i64) -> RawObject {
        RawObject {
            key: key.to_string(),
            size,
            last_modified: None,
            storage_class: None,
            etag: None,
        }
    }

    fn page(prefixes: &[&str], objects: Vec<RawObject>, next: Option<&str>) -> ListingPage {
        ListingPage {
            common_prefixes: prefixes.iter().map(|p| p.to_string()).collect(),
            objects,
            next_token: next.map(str::to_string),
        }
    }

    fn single_page_source(page: ListingPage) -> MockPageSource {
        let mut source = MockPageSource::new();
        source
            .expect_fetch_page()
            .return_once(move |_, _, _| Ok(page));
        source
    }

    #[tokio::test]
    async fn test_nested_prefixes_collapse_to_one_level() {
        // Misbehaving server: querying "a/" returns prefixes three
        // levels deep. The nested object only surfaces via its prefix.
        let source = single_page_source(page(&["a/b/c/", "a/b/d/"], vec![], None));

        let entries = list_entries(&source, "bucket", "a/").await.unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key, "a/b/");
        assert_eq!(entries[0].display_name, "b/");
        assert!(entries[0].is_prefix);
    }

    #[tokio::test]
    async fn test_compliant_prefixes_pass_through() {
        let source = single_page_source(page(&["docs/reports/", "docs/images/"], vec![], None));

        let entries = list_entries(&source, "bucket", "docs/").await.unwrap();

        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["docs/images/", "docs/reports/"]);
    }

    #[tokio::test]
    async fn test_root_listing_normalizes_without_prefix() {
        let source = single_page_source(page(
            &["dir/", "deep/nested/tree/"],
            vec![obj("top.txt", 5)],
            None,
        ));

        let entries = list_entries(&source, "bucket", "").await.unwrap();

        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["deep/", "dir/", "top.txt"]);
        assert_eq!(entries[2].display_name, "top.txt");
    }

    #[tokio::test]
    async fn test_self_reference_and_markers_excluded() {
        let source = single_page_source(page(
            &["a/"],
            vec![obj("a/", 0), obj("a/sub/", 0), obj("a/file.txt", 7)],
            None,
        ));

        let entries = list_entries(&source, "bucket", "a/").await.unwrap();

        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a/file.txt"]);
    }

    #[tokio::test]
    async fn test_ordering_prefixes_first_then_by_display_name() {
        let source = single_page_source(page(
            &["a/zeta/", "a/alpha/"],
            vec![obj("a/beta.txt", 1), obj("a/Alpha.txt", 1)],
            None,
        ));

        let entries = list_entries(&source, "bucket", "a/").await.unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.display_name.as_str()).collect();
        // Case-sensitive: "Alpha.txt" sorts before "beta.txt".
        assert_eq!(names, vec!["alpha/", "zeta/", "Alpha.txt", "beta.txt"]);
    }

    #[tokio::test]
    async fn test_pagination_union_without_loss_or_duplication() {
        let mut source = MockPageSource::new();
        let first = page(
            &["logs/2023/january/"],
            vec![obj("logs/a.log", 1)],
            Some("t2"),
        );
        let second = page(
            &["logs/2023/february/"],
            vec![obj("logs/b.log", 2)],
            Some("t3"),
        );
        let third = page(&["logs/2024/"], vec![obj("logs/c.log", 3)], None);

        source
            .expect_fetch_page()
            .withf(|_, _, token| token.is_none())
            .return_once(move |_, _, _| Ok(first));
        source
            .expect_fetch_page()
            .withf(|_, _, token| token.as_deref() == Some("t2"))
            .return_once(move |_, _, _| Ok(second));
        source
            .expect_fetch_page()
            .withf(|_, _, token| token.as_deref() == Some("t3"))
            .return_once(move |_, _, _| Ok(third));

        let entries = list_entries(&source, "bucket", "logs/").await.unwrap();

        let keys: Vec<&str> = entries.iter().map(|e| e.key.as_str()).collect();
        // "logs/2023/january/" and "logs/2023/february/" collapse onto
        // "logs/2023/" once, across page boundaries.
        assert_eq!(
            keys,
            vec!["logs/2023/", "logs/2024/", "logs/a.log", "logs/b.log", "logs/c.log"]
        );
    }

    #[tokio::test]
    async fn test_page_failure_aborts_whole_call() {
        let mut source = MockPageSource::new();
        let first = page(&["a/b/"], vec![], Some("t2"));

        source
            .expect_fetch_page()
            .withf(|_, _, token| token.is_none())
            .return_once(move |_, _, _| Ok(first));
        source
            .expect_fetch_page()
            .withf(|_, _, token| token.as_deref() == Some("t2"))
            .return_once(|bucket, prefix, _| Err(Error::listing(bucket, prefix, "connection reset")));

        let err = list_entries(&source, "bucket", "a/").await.unwrap_err();
        assert!(matches!(err, Error::Listing { .. }));
    }

    #[test]
    fn test_normalize_is_idempotent_on_depth() {
        for raw in ["a/b/", "a/b/c/", "a/b/c/d/e/f/"] {
            let entry = normalize_common_prefix("a/", raw).unwrap();
            assert_eq!(entry.key, "a/b/");
            assert_eq!(entry.display_name, "b/");
        }
    }

    #[test]
    fn test_normalize_rejects_self_and_empty() {
        assert!(normalize_common_prefix("a/", "a/").is_none());
        assert!(normalize_common_prefix("", "/").is_none());
    }

    #[test]
    fn test_normalize_foreign_prefix_truncates_raw() {
        // A prefix that does not start with the query prefix is still
        // truncated at its first separator and reattached.
        let entry = normalize_common_prefix("a/", "x/y/").unwrap();
        assert_eq!(entry.key, "a/x/");
        assert_eq!(entry.display_name, "x/");
    }

    #[test]
    fn test_leaf_display_name() {
        assert_eq!(leaf_display_name("a/b/c.txt"), "c.txt");
        assert_eq!(leaf_display_name("c.txt"), "c.txt");
    }
}
