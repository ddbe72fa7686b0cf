//! Session construction
//!
//! A session holds the resolved connection parameters for one account
//! and owns the transport handle every operation runs through. The
//! transport tolerates concurrent calls; connection pooling is its
//! concern, not ours.

use aws_smithy_types::error::display::DisplayErrorContext;

use s3x_core::{Account, Error, Result};

/// One logical account connection.
///
/// Immutable once opened. All operations borrow the session, so a caller
/// may run independent listings and transfers against it concurrently.
#[derive(Debug)]
pub struct Session {
    inner: aws_sdk_s3::Client,
    endpoint: Option<String>,
}

impl Session {
    /// Open a session for `account`.
    ///
    /// Fails with [`Error::Connection`] when the region is empty or the
    /// endpoint does not parse. No network probe happens here: a dead or
    /// misconfigured endpoint surfaces on the first real call as that
    /// operation's error.
    pub async fn open(account: &Account) -> Result<Self> {
        if account.region.trim().is_empty() {
            return Err(Error::Connection("region must not be empty".into()));
        }
        let endpoint = account.endpoint_url()?;

        let credentials = aws_credential_types::Credentials::new(
            account.access_key.clone(),
            account.secret_key.clone(),
            None, // session token
            None, // expiry
            "s3x-static-credentials",
        );

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .credentials_provider(credentials)
            .region(aws_config::Region::new(account.region.clone()));
        if let Some(url) = &endpoint {
            loader = loader.endpoint_url(url);
        }
        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(account.force_path_style)
            .build();

        tracing::debug!(
            endpoint = endpoint.as_deref().unwrap_or("(provider default)"),
            region = %account.region,
            "session opened"
        );

        Ok(Self {
            inner: aws_sdk_s3::Client::from_conf(s3_config),
            endpoint,
        })
    }

    /// Tear down the session, releasing the transport handle.
    ///
    /// Dropping the session is equivalent; this form makes account
    /// switches explicit at the call site.
    pub fn close(self) {
        tracing::debug!(
            endpoint = self.endpoint.as_deref().unwrap_or("(provider default)"),
            "session closed"
        );
    }

    pub(crate) fn inner(&self) -> &aws_sdk_s3::Client {
        &self.inner
    }
}

/// Render an SDK error with its full source chain, so the surfaced
/// message names the actual service problem instead of "service error".
pub(crate) fn sdk_message<E>(err: E) -> String
where
    E: std::error::Error,
{
    format!("{}", DisplayErrorContext(&err))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(service_url: &str) -> Account {
        Account::new(service_url, "access", "secret")
    }

    #[tokio::test]
    async fn test_open_with_endpoint() {
        let session = Session::open(&account("localhost:9000")).await.unwrap();
        assert_eq!(session.endpoint.as_deref(), Some("https://localhost:9000"));
        session.close();
    }

    #[tokio::test]
    async fn test_open_rejects_empty_region() {
        let mut acct = account("localhost:9000");
        acct.region = "  ".to_string();

        let err = Session::open(&acct).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }

    #[tokio::test]
    async fn test_open_rejects_invalid_endpoint() {
        let err = Session::open(&account("[")).await.unwrap_err();
        assert!(matches!(err, Error::Connection(_)));
    }
}
