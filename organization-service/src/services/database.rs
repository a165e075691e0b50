use async_trait::async_trait;
use chrono::Utc;
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, DateTime as BsonDateTime},
    error::{ErrorKind, WriteFailure},
    options::{FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

use crate::models::{Identity, Organization, OrganizationUpdate};
use crate::services::{IdentityStore, OrganizationStore, ServiceError};

const DUPLICATE_KEY_CODE: i32 = 11000;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for organization-service");

        // Unique email backs the duplicate check at sign-up under concurrency
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name("identity_email_unique".to_string())
                    .build(),
            )
            .build();

        self.identities()
            .create_index(email_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create email index on identities collection: {}", e);
                AppError::from(e)
            })?;
        tracing::info!("Created unique index on identities.email");

        Ok(())
    }

    pub fn identities(&self) -> Collection<Identity> {
        self.db.collection("identities")
    }

    pub fn organizations(&self) -> Collection<Organization> {
        self.db.collection("organizations")
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}

#[async_trait]
impl IdentityStore for MongoDb {
    async fn find_identity_by_email(&self, email: &str) -> Result<Option<Identity>, ServiceError> {
        Ok(self
            .identities()
            .find_one(doc! { "email": email }, None)
            .await?)
    }

    async fn insert_identity(&self, identity: Identity) -> Result<Identity, ServiceError> {
        match self.identities().insert_one(&identity, None).await {
            Ok(_) => Ok(identity),
            Err(e) if is_duplicate_key(&e) => Err(ServiceError::DuplicateIdentity),
            Err(e) => Err(ServiceError::Database(e)),
        }
    }
}

#[async_trait]
impl OrganizationStore for MongoDb {
    async fn find_organization_by_id(
        &self,
        id: &str,
    ) -> Result<Option<Organization>, ServiceError> {
        Ok(self
            .organizations()
            .find_one(doc! { "_id": id }, None)
            .await?)
    }

    async fn add_invite(&self, id: &str, email: &str) -> Result<(), ServiceError> {
        let result = self
            .organizations()
            .update_one(
                doc! { "_id": id },
                doc! { "$addToSet": { "invited_emails": email } },
                None,
            )
            .await?;

        if result.matched_count == 0 {
            return Err(ServiceError::OrganizationNotFound);
        }

        Ok(())
    }

    async fn create_organization(&self, org: Organization) -> Result<Organization, ServiceError> {
        self.organizations().insert_one(&org, None).await?;
        Ok(org)
    }

    async fn list_organizations(&self) -> Result<Vec<Organization>, ServiceError> {
        let cursor = self.organizations().find(None, None).await?;
        Ok(cursor.try_collect::<Vec<Organization>>().await?)
    }

    async fn update_organization(
        &self,
        id: &str,
        update: OrganizationUpdate,
    ) -> Result<Option<Organization>, ServiceError> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();

        Ok(self
            .organizations()
            .find_one_and_update(
                doc! { "_id": id },
                doc! {
                    "$set": {
                        "name": update.name,
                        "description": update.description,
                        "updated_at": BsonDateTime::from_chrono(Utc::now()),
                    }
                },
                options,
            )
            .await?)
    }

    async fn delete_organization(&self, id: &str) -> Result<bool, ServiceError> {
        let result = self
            .organizations()
            .delete_one(doc! { "_id": id }, None)
            .await?;
        Ok(result.deleted_count > 0)
    }

    async fn health_check(&self) -> Result<(), ServiceError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                ServiceError::Database(e)
            })?;
        Ok(())
    }
}
