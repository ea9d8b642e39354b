use aws_sdk_s3::Client as S3Client;
use sqlx::PgPool;

use crate::config::Config;
use crate::storage::ResumeStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub resumes: ResumeStore,
    pub config: Config,
}

impl AppState {
    pub fn new(db: PgPool, s3: S3Client, config: Config) -> Self {
        let resumes = ResumeStore::new(s3, config.s3_bucket.clone());
        Self {
            db,
            resumes,
            config,
        }
    }
}
