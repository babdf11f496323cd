//! Environment configuration for different deployment stages

use std::env;
use std::time::Duration;

use aws_config::{retry::RetryConfig, timeout::TimeoutConfig, BehaviorVersion};

/// Application environment configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Production environment
    Production,
    /// Staging environment
    Staging,
    /// Development environment (uses `LocalStack`)
    Development,
}

impl Environment {
    /// Creates an Environment from the `APP_ENV` environment variable
    ///
    /// # Panics
    ///
    /// Panics if `APP_ENV` contains an invalid value
    #[must_use]
    pub fn from_env() -> Self {
        let env = env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .trim()
            .to_lowercase();

        match env.as_str() {
            "production" => Self::Production,
            "staging" => Self::Staging,
            "development" => Self::Development,
            _ => panic!("Invalid environment: {env}"),
        }
    }

    /// Returns the `DynamoDB` table name holding image records
    ///
    /// # Panics
    ///
    /// Panics if the `IMAGES_TABLE_NAME` environment variable is not set
    /// outside development
    #[must_use]
    pub fn images_table_name(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("IMAGES_TABLE_NAME")
                .expect("IMAGES_TABLE_NAME environment variable is not set"),
            Self::Development => {
                env::var("IMAGES_TABLE_NAME").unwrap_or_else(|_| "image-vault-dev".to_string())
            }
        }
    }

    /// Returns the name of the owner GSI on the image record table
    #[must_use]
    pub fn owner_index_name(&self) -> String {
        env::var("OWNER_INDEX_NAME").unwrap_or_else(|_| "owner-index".to_string())
    }

    /// Returns the S3 bucket name for blob storage
    ///
    /// # Panics
    ///
    /// Panics if the `S3_BUCKET_NAME` environment variable is not set outside
    /// development
    #[must_use]
    pub fn s3_bucket(&self) -> String {
        match self {
            Self::Production | Self::Staging => {
                env::var("S3_BUCKET_NAME").expect("S3_BUCKET_NAME environment variable is not set")
            }
            Self::Development => {
                env::var("S3_BUCKET_NAME").unwrap_or_else(|_| "image-vault-media".to_string())
            }
        }
    }

    /// Public base URL under which uploaded blobs are reachable
    ///
    /// # Panics
    ///
    /// Panics if the `BLOB_PUBLIC_BASE_URL` environment variable is not set
    /// outside development
    #[must_use]
    pub fn blob_public_base_url(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("BLOB_PUBLIC_BASE_URL")
                .expect("BLOB_PUBLIC_BASE_URL environment variable is not set"),
            Self::Development => env::var("BLOB_PUBLIC_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:4566/{}", self.s3_bucket())),
        }
    }

    /// Secret used to verify bearer tokens
    ///
    /// # Panics
    ///
    /// Panics if the `AUTH_TOKEN_SECRET` environment variable is not set
    /// outside development
    #[must_use]
    pub fn auth_token_secret(&self) -> String {
        match self {
            Self::Production | Self::Staging => env::var("AUTH_TOKEN_SECRET")
                .expect("AUTH_TOKEN_SECRET environment variable is not set"),
            Self::Development => {
                env::var("AUTH_TOKEN_SECRET").unwrap_or_else(|_| "local-dev-secret".to_string())
            }
        }
    }

    /// Whether token verification is disabled
    ///
    /// Only honored in development: with `DISABLE_AUTH=true` the raw bearer
    /// token is used as the acting identity's id.
    #[must_use]
    pub fn disable_auth(&self) -> bool {
        matches!(self, Self::Development)
            && env::var("DISABLE_AUTH").is_ok_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    /// Returns the endpoint URL to use for AWS services
    #[must_use]
    pub const fn override_aws_endpoint_url(&self) -> Option<&str> {
        match self {
            // Regular AWS endpoints for production and staging
            Self::Production | Self::Staging => None,
            // LocalStack endpoint for development
            Self::Development => Some("http://localhost:4566"),
        }
    }

    /// AWS configuration with retry and timeout settings
    pub async fn aws_config(&self) -> aws_config::SdkConfig {
        let retry_config = RetryConfig::standard()
            .with_max_attempts(3)
            .with_initial_backoff(Duration::from_millis(50));

        let timeout_config = TimeoutConfig::builder()
            .operation_timeout(Duration::from_secs(30))
            .build();

        let mut config_builder = aws_config::load_defaults(BehaviorVersion::latest())
            .await
            .to_builder()
            .retry_config(retry_config)
            .timeout_config(timeout_config);

        if let Some(endpoint_url) = self.override_aws_endpoint_url() {
            config_builder = config_builder.endpoint_url(endpoint_url);
        }

        config_builder.build()
    }

    /// AWS S3 service configuration
    pub async fn s3_client_config(&self) -> aws_sdk_s3::Config {
        let aws_config = self.aws_config().await;
        let s3_config: aws_sdk_s3::Config = (&aws_config).into();
        let mut builder = s3_config.to_builder();

        // Override "force path style" to true for compatibility with LocalStack
        // https://github.com/awslabs/aws-sdk-rust/discussions/874
        if matches!(self, Self::Development) {
            builder.set_force_path_style(Some(true));
        }

        builder.build()
    }
}
