use std::sync::Arc;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_s3::Client as S3Client;

use backend::auth::TokenVerifier;
use backend::blob_storage::{BlobStorage, S3BlobStorage};
use backend::server;
use backend::state::AppState;
use backend::types::Environment;
use image_storage::image_record::{DynamoImageRecordStore, ImageRecordStore};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let environment = Environment::from_env();

    // Configure logging format based on environment
    // Use JSON format for staging/production, regular format for development
    match environment {
        Environment::Production | Environment::Staging => {
            fmt()
                .json()
                .with_env_filter(EnvFilter::from_default_env())
                .init();
        }
        Environment::Development => {
            fmt().with_env_filter(EnvFilter::from_default_env()).init();
        }
    }

    let aws_config = environment.aws_config().await;

    let dynamodb_client = Arc::new(DynamoDbClient::new(&aws_config));
    let record_store: Arc<dyn ImageRecordStore> = Arc::new(DynamoImageRecordStore::new(
        dynamodb_client,
        environment.images_table_name(),
        environment.owner_index_name(),
    ));

    let s3_client = Arc::new(S3Client::from_conf(environment.s3_client_config().await));
    let blob_storage: Arc<dyn BlobStorage> = Arc::new(S3BlobStorage::new(
        s3_client,
        environment.s3_bucket(),
        environment.blob_public_base_url(),
    ));

    let token_verifier = Arc::new(TokenVerifier::new(&environment.auth_token_secret()));

    server::start(AppState {
        record_store,
        blob_storage,
        token_verifier,
        environment,
    })
    .await
}
