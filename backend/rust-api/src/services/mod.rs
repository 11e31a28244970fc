use std::sync::Arc;

use crate::config::Config;
use mongodb::{Client as MongoClient, Database};

pub mod answer_key_service;
pub mod archive_service;
pub mod attempt_service;
pub mod eligibility_service;
pub mod grading_service;
pub mod mongo_store;
pub mod object_storage;
pub mod review_state;
pub mod stores;
pub mod submission_error;
pub mod submission_service;

use mongo_store::MongoStore;
use object_storage::ObjectStorageClient;
use submission_service::QuizSubmissionService;

pub struct AppState {
    pub config: Config,
    /// Absent when the pipeline runs on non-Mongo collaborators.
    pub mongo: Option<Database>,
    pub submissions: Arc<QuizSubmissionService>,
}

impl AppState {
    pub async fn new(config: Config, mongo_client: MongoClient) -> anyhow::Result<Self> {
        let mongo = mongo_client.database(&config.mongo_database);

        tracing::info!("Checking MongoDB connection with ping...");
        tokio::time::timeout(
            std::time::Duration::from_secs(5),
            mongo.run_command(mongodb::bson::doc! { "ping": 1 }),
        )
        .await
        .map_err(|_| anyhow::anyhow!("MongoDB ping timeout after 5s"))??;

        let store = Arc::new(MongoStore::new(mongo.clone()));
        let objects = Arc::new(ObjectStorageClient::new(config.object_storage.clone())?);
        tracing::info!(
            "Object storage client ready for bucket {}",
            config.object_storage.bucket
        );

        let submissions = QuizSubmissionService::from_stores(
            store.clone(),
            store.clone(),
            objects,
            store,
            config.object_storage.account_id.clone(),
        );

        Ok(Self {
            config,
            mongo: Some(mongo),
            submissions: Arc::new(submissions),
        })
    }

    pub fn with_submission_service(config: Config, submissions: QuizSubmissionService) -> Self {
        Self {
            config,
            mongo: None,
            submissions: Arc::new(submissions),
        }
    }
}
