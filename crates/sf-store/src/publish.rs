//! Publishing: subdomain validation and the go-live flow.
//!
//! Validation runs synchronously before any network call; a request
//! that fails it never reaches the store. Publish itself is a blocking,
//! user-initiated terminal action — the caller awaits and shows the
//! outcome, unlike autosave which reports in the background.

use crate::error::StoreError;
use crate::remote::{PublishRequest, PublishedSite, RemoteStore};

const MIN_SUBDOMAIN_LEN: usize = 3;
const MAX_SUBDOMAIN_LEN: usize = 63;

/// Subdomain rules: 3–63 chars, lowercase ASCII letters, digits, and
/// hyphens; no leading/trailing hyphen.
pub fn validate_subdomain(subdomain: &str) -> Result<(), StoreError> {
    if subdomain.len() < MIN_SUBDOMAIN_LEN {
        return Err(StoreError::validation(
            "subdomain",
            format!("must be at least {MIN_SUBDOMAIN_LEN} characters"),
        ));
    }
    if subdomain.len() > MAX_SUBDOMAIN_LEN {
        return Err(StoreError::validation(
            "subdomain",
            format!("must be at most {MAX_SUBDOMAIN_LEN} characters"),
        ));
    }
    if subdomain.starts_with('-') || subdomain.ends_with('-') {
        return Err(StoreError::validation(
            "subdomain",
            "must not start or end with a hyphen",
        ));
    }
    if let Some(bad) = subdomain
        .chars()
        .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
    {
        return Err(StoreError::validation(
            "subdomain",
            format!("character {bad:?} is not allowed"),
        ));
    }
    Ok(())
}

pub fn validate_title(title: &str) -> Result<(), StoreError> {
    if title.trim().is_empty() {
        return Err(StoreError::validation("title", "must not be empty"));
    }
    Ok(())
}

/// Validate, confirm the subdomain is free (ignoring this project's own
/// claim), then publish.
pub async fn publish_site(
    store: &dyn RemoteStore,
    request: &PublishRequest,
) -> Result<PublishedSite, StoreError> {
    validate_subdomain(&request.subdomain)?;
    validate_title(&request.title)?;

    let available = store
        .check_subdomain_available(&request.subdomain, Some(&request.project_id))
        .await?;
    if !available {
        return Err(StoreError::SubdomainTaken(request.subdomain.clone()));
    }

    let site = store.publish(request).await?;
    log::info!("published {} at {}", request.project_id, site.url);
    Ok(site)
}
