// Functions for interacting with the hosted Supabase project (PostgREST)

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use thiserror::Error;

use crate::models::{Listing, NewListing, User};

/// Failure taxonomy for remote store calls.
///
/// Every call round-trips; there is no caching layer and no retry policy, so
/// a single failed call surfaces immediately to the caller. An empty result
/// set is a success, never an error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network failure or the service itself is unavailable.
    #[error("store unreachable: {0}")]
    Transport(String),
    /// No row matched the requested id.
    #[error("not found: {0}")]
    NotFound(String),
    /// The store rejected the shape of the record.
    #[error("store rejected record: {0}")]
    Validation(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        StoreError::Transport(error.to_string())
    }
}

/// The listing/user repository contract.
///
/// Controllers take an implementation by reference rather than reaching for
/// a global client, so tests can substitute an in-memory fake.
#[async_trait]
pub trait ListingStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Listing>, StoreError>;
    async fn fetch_by_id(&self, id: &str) -> Result<Listing, StoreError>;
    async fn create(&self, draft: &NewListing) -> Result<Listing, StoreError>;
    /// Ok(None) means the target id no longer exists; the absence of a result
    /// communicates a no-op, not an error.
    async fn update(&self, listing: &Listing) -> Result<Option<Listing>, StoreError>;
    /// Idempotent; deleting an id that is already gone succeeds.
    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError>;
    async fn fetch_users(&self) -> Result<Vec<User>, StoreError>;
    async fn delete_user(&self, id: &str) -> Result<(), StoreError>;
}

/// Maps a non-success PostgREST status to the store taxonomy.
fn classify(status: StatusCode, body: &str) -> StoreError {
    match status {
        StatusCode::NOT_FOUND | StatusCode::NOT_ACCEPTABLE => {
            StoreError::NotFound(body.to_string())
        }
        StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY => {
            StoreError::Validation(body.to_string())
        }
        other => StoreError::Transport(format!("{}: {}", other, body)),
    }
}

/// PostgREST-backed implementation of [`ListingStore`].
#[derive(Clone)]
pub struct SupabaseStore {
    client: Client,
    rest_url: String,
    anon_key: String,
}

impl SupabaseStore {
    pub fn new(client: Client, base_url: &str, anon_key: &str) -> Self {
        SupabaseStore {
            client,
            rest_url: format!("{}/rest/v1", base_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .get(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    fn post(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .post(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    fn patch(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .patch(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    fn delete(&self, url: &str) -> reqwest::RequestBuilder {
        self.client
            .delete(url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
    }

    /// Turns a non-success response into a classified [`StoreError`].
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify(status, &body))
    }
}

#[async_trait]
impl ListingStore for SupabaseStore {
    async fn fetch_all(&self) -> Result<Vec<Listing>, StoreError> {
        let url = format!("{}/listings?select=*", self.rest_url);
        let response = Self::check(self.get(&url).send().await?).await?;
        let listings: Vec<Listing> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("malformed listings payload: {}", e)))?;
        tracing::debug!("Fetched {} listings from the store.", listings.len());
        Ok(listings)
    }

    async fn fetch_by_id(&self, id: &str) -> Result<Listing, StoreError> {
        let url = format!("{}/listings?id=eq.{}&select=*", self.rest_url, id);
        let response = Self::check(self.get(&url).send().await?).await?;
        let mut rows: Vec<Listing> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("malformed listing payload: {}", e)))?;
        if rows.is_empty() {
            return Err(StoreError::NotFound(format!("listing {}", id)));
        }
        Ok(rows.swap_remove(0))
    }

    async fn create(&self, draft: &NewListing) -> Result<Listing, StoreError> {
        let url = format!("{}/listings", self.rest_url);
        let response = self
            .post(&url)
            .header("Prefer", "return=representation")
            .json(&[draft])
            .send()
            .await?;
        let response = Self::check(response).await?;
        let mut rows: Vec<Listing> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("malformed insert response: {}", e)))?;
        let created = rows
            .pop()
            .ok_or_else(|| StoreError::Transport("insert returned no representation".into()))?;
        tracing::info!("Created listing with ID: {}", created.id);
        Ok(created)
    }

    async fn update(&self, listing: &Listing) -> Result<Option<Listing>, StoreError> {
        let url = format!("{}/listings?id=eq.{}", self.rest_url, listing.id);
        let response = self
            .patch(&url)
            .header("Prefer", "return=representation")
            .json(listing)
            .send()
            .await?;
        let response = Self::check(response).await?;
        let mut rows: Vec<Listing> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("malformed update response: {}", e)))?;
        // An empty representation means the id vanished between fetch and
        // update; callers treat that as a handled no-op.
        Ok(rows.pop())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let url = format!("{}/listings?id=eq.{}", self.rest_url, id);
        match Self::check(self.delete(&url).send().await?).await {
            Ok(_) => Ok(()),
            // Deleting an id that is already gone is a success for the caller.
            Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }

    async fn fetch_users(&self) -> Result<Vec<User>, StoreError> {
        let url = format!("{}/users?select=*", self.rest_url);
        let response = Self::check(self.get(&url).send().await?).await?;
        let users: Vec<User> = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("malformed users payload: {}", e)))?;
        tracing::debug!("Fetched {} users from the store.", users.len());
        Ok(users)
    }

    async fn delete_user(&self, id: &str) -> Result<(), StoreError> {
        let url = format!("{}/users?id=eq.{}", self.rest_url, id);
        match Self::check(self.delete(&url).send().await?).await {
            Ok(_) => Ok(()),
            Err(StoreError::NotFound(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
