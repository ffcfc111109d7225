/// Asset-host client. Takes a local file (a multipart temp file), puts it in
/// the configured S3-compatible bucket, and returns the durable public URL.
use std::path::Path;

use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use uuid::Uuid;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};

#[derive(Clone)]
pub struct Storage {
    client: Client,
    bucket: String,
    public_base_url: String,
}

impl Storage {
    /// Build an S3 client from the provided configuration.
    pub async fn new(config: &StorageConfig) -> Result<Self> {
        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "vidtube-service",
        );

        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared_config);
        if let Some(endpoint) = &config.endpoint {
            if !endpoint.trim().is_empty() {
                builder = builder.endpoint_url(endpoint);
            }
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Upload a local file under `prefix/` and return its public URL.
    pub async fn upload_file(
        &self,
        local_path: &Path,
        prefix: &str,
        file_name: Option<&str>,
        content_type: Option<&str>,
    ) -> Result<String> {
        let key = object_key(prefix, file_name);

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read upload: {e}")))?;

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(body);
        if let Some(content_type) = content_type {
            request = request.content_type(content_type);
        }

        request
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Asset upload failed: {e}")))?;

        Ok(format!("{}/{}", self.public_base_url, key))
    }
}

/// Namespace uploads by prefix and a random id, keeping the original
/// extension so the asset host serves a sensible content type.
fn object_key(prefix: &str, file_name: Option<&str>) -> String {
    let extension = file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str());

    match extension {
        Some(ext) => format!("{}/{}.{}", prefix, Uuid::new_v4(), ext),
        None => format!("{}/{}", prefix, Uuid::new_v4()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_key_keeps_extension() {
        let key = object_key("avatars", Some("me.png"));
        assert!(key.starts_with("avatars/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn test_object_key_without_extension() {
        let key = object_key("videos", None);
        assert!(key.starts_with("videos/"));
        assert!(!key.contains('.'));
    }
}
