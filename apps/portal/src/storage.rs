//! Resume blob storage on S3-compatible object storage (MinIO locally, S3 in production).
//!
//! Profile resumes and application snapshots live under separate prefixes so a
//! profile update never touches a resume already attached to an application.

use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;

const PROFILE_PREFIX: &str = "resumes";
const APPLICATION_PREFIX: &str = "application_resumes";
const MAX_FILE_NAME_LEN: usize = 100;

/// A resume file received in a multipart form.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

#[derive(Clone)]
pub struct ResumeStore {
    s3: S3Client,
    bucket: String,
}

impl ResumeStore {
    pub fn new(s3: S3Client, bucket: String) -> Self {
        Self { s3, bucket }
    }

    /// Stores a resume uploaded on the caller's profile and returns its key.
    pub async fn put_profile_resume(
        &self,
        user_id: Uuid,
        upload: &ResumeUpload,
    ) -> Result<String, AppError> {
        let key = profile_key(user_id, &upload.file_name);
        self.put(&key, upload).await?;
        Ok(key)
    }

    /// Stores a resume uploaded with an application and returns its key.
    pub async fn put_application_resume(
        &self,
        job_id: Uuid,
        user_id: Uuid,
        upload: &ResumeUpload,
    ) -> Result<String, AppError> {
        let key = application_key(job_id, user_id, &upload.file_name);
        self.put(&key, upload).await?;
        Ok(key)
    }

    /// Copies the profile resume at `profile_key` into the application namespace.
    pub async fn snapshot_for_application(
        &self,
        profile_key: &str,
        job_id: Uuid,
        user_id: Uuid,
    ) -> Result<String, AppError> {
        let file_name = profile_key.rsplit('/').next().unwrap_or(profile_key);
        let key = application_key(job_id, user_id, strip_key_prefix(file_name));

        self.s3
            .copy_object()
            .bucket(&self.bucket)
            .copy_source(format!("{}/{}", self.bucket, profile_key))
            .key(&key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("copy of {profile_key} failed: {e}")))?;

        info!("Copied resume s3://{}/{} -> {}", self.bucket, profile_key, key);
        Ok(key)
    }

    /// Best-effort removal, used to clean up after a write that lost a race.
    pub async fn discard(&self, key: &str) {
        if let Err(e) = self
            .s3
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            warn!("Failed to delete orphaned resume s3://{}/{}: {e}", self.bucket, key);
        }
    }

    /// Passes `result` through, discarding the freshly written `key` when it is an error
    /// so a failed database write leaves no orphaned resume behind.
    pub async fn release_on_error<T, E>(&self, key: Option<&str>, result: Result<T, E>) -> Result<T, E> {
        if let Some(key) = key.filter(|_| result.is_err()) {
            self.discard(key).await;
        }
        result
    }

    async fn put(&self, key: &str, upload: &ResumeUpload) -> Result<(), AppError> {
        let content_type = upload
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(upload.bytes.clone()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("upload of {key} failed: {e}")))?;

        info!("Uploaded resume to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

fn profile_key(user_id: Uuid, file_name: &str) -> String {
    format!(
        "{PROFILE_PREFIX}/{user_id}/{}-{}",
        Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}

fn application_key(job_id: Uuid, user_id: Uuid, file_name: &str) -> String {
    format!(
        "{APPLICATION_PREFIX}/{job_id}/{user_id}/{}-{}",
        Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}

/// Drops the `{uuid}-` prefix that key generation put in front of the file name.
fn strip_key_prefix(file_name: &str) -> &str {
    match file_name.get(..36) {
        Some(head) if Uuid::parse_str(head).is_ok() && file_name[36..].starts_with('-') => {
            &file_name[37..]
        }
        _ => file_name,
    }
}

/// Reduces a client-supplied file name to `[A-Za-z0-9._-]`, without path components.
pub fn sanitize_file_name(raw: &str) -> String {
    let base = raw.rsplit(|c: char| c == '/' || c == '\\').next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() {
        return "resume".to_string();
    }
    cleaned.chars().take(MAX_FILE_NAME_LEN).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A store whose client has no credentials, so every request fails without network I/O.
    fn offline_store() -> ResumeStore {
        use aws_sdk_s3::config::{BehaviorVersion, Region};
        use aws_sdk_s3::config::retry::RetryConfig;

        let config = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .endpoint_url("http://127.0.0.1:1")
            .retry_config(RetryConfig::disabled())
            .build();
        ResumeStore::new(S3Client::from_conf(config), "resumes".to_string())
    }

    #[tokio::test]
    async fn test_release_on_error_passes_results_through() {
        let store = offline_store();

        let ok: Result<u32, &str> = store.release_on_error(Some("resumes/a/b-cv.pdf"), Ok(7)).await;
        assert_eq!(ok, Ok(7));

        // The cleanup attempt fails too; the original error still comes back.
        let err: Result<u32, &str> = store
            .release_on_error(Some("resumes/a/b-cv.pdf"), Err("insert failed"))
            .await;
        assert_eq!(err, Err("insert failed"));

        let no_key: Result<u32, &str> = store.release_on_error(None, Err("insert failed")).await;
        assert_eq!(no_key, Err("insert failed"));
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("C:\\Users\\me\\cv.pdf"), "cv.pdf");
    }

    #[test]
    fn test_sanitize_replaces_unsafe_chars() {
        assert_eq!(sanitize_file_name("my resume (final).pdf"), "my_resume__final_.pdf");
    }

    #[test]
    fn test_sanitize_empty_and_hidden_names() {
        assert_eq!(sanitize_file_name(""), "resume");
        assert_eq!(sanitize_file_name("..."), "resume");
        assert_eq!(sanitize_file_name(".bashrc"), "bashrc");
    }

    #[test]
    fn test_sanitize_truncates_long_names() {
        let long = "a".repeat(500);
        assert_eq!(sanitize_file_name(&long).len(), MAX_FILE_NAME_LEN);
    }

    #[test]
    fn test_keys_are_namespaced() {
        let user = Uuid::new_v4();
        let job = Uuid::new_v4();
        let profile = profile_key(user, "cv.pdf");
        let application = application_key(job, user, "cv.pdf");
        assert!(profile.starts_with(&format!("resumes/{user}/")));
        assert!(profile.ends_with("-cv.pdf"));
        assert!(application.starts_with(&format!("application_resumes/{job}/{user}/")));
        assert!(application.ends_with("-cv.pdf"));
    }

    #[test]
    fn test_strip_key_prefix_recovers_file_name() {
        let key = profile_key(Uuid::new_v4(), "cv.pdf");
        let file_name = key.rsplit('/').next().unwrap();
        assert_eq!(strip_key_prefix(file_name), "cv.pdf");
        assert_eq!(strip_key_prefix("plain-name.pdf"), "plain-name.pdf");
    }
}
