// Image uploads to the hosted object storage (Supabase Storage)

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use thiserror::Error;

/// An object storage write failed. The batch it belonged to is aborted.
#[derive(Debug, Error)]
#[error("image upload failed: {0}")]
pub struct UploadError(pub String);

/// A file handle taken off the listing form, held in memory until submit.
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Write-by-name object storage; `put` returns the public URL of the object.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, object_name: &str, file: &ImageFile) -> Result<String, UploadError>;
}

/// Uploads every file, one at a time, returning the public URLs in input
/// order.
///
/// The loop is strictly sequential: the first failure returns immediately,
/// later files are never attempted, and objects already written are NOT
/// rolled back. An empty input is a valid batch and yields an empty output.
pub async fn upload_all<S: ObjectStore + ?Sized>(
    store: &S,
    files: &[ImageFile],
) -> Result<Vec<String>, UploadError> {
    let mut urls = Vec::with_capacity(files.len());
    for (index, file) in files.iter().enumerate() {
        let name = object_name(index, &file.file_name);
        let url = store.put(&name, file).await?;
        urls.push(url);
    }
    Ok(urls)
}

/// Object names carry a millisecond timestamp and the batch index so a batch
/// never collides with itself or with a retry.
fn object_name(index: usize, file_name: &str) -> String {
    let stamp = chrono::Utc::now().timestamp_millis();
    format!("{}_{}_{}", stamp, index, sanitize(file_name))
}

fn sanitize(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Supabase Storage implementation of [`ObjectStore`].
#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    anon_key: String,
    bucket: String,
}

impl SupabaseStorage {
    pub fn new(client: Client, base_url: &str, anon_key: &str, bucket: &str) -> Self {
        SupabaseStorage {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            bucket: bucket.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn put(&self, object_name: &str, file: &ImageFile) -> Result<String, UploadError> {
        let url = format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url, self.bucket, object_name
        );

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .header(CONTENT_TYPE, &file.content_type)
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(|e| UploadError(format!("storage unreachable: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(UploadError(format!("storage write failed ({}): {}", status, body)));
        }

        tracing::info!("Uploaded image object: {}", object_name);
        Ok(format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, object_name
        ))
    }
}
