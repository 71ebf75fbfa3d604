//! SeaORM implementation of UserRepository

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, SqlErr,
};

use crate::domain::{DomainError, User, UserRepository};
use crate::models::user::{self, ActiveModel, Entity as UserEntity};

pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, username: &str) -> Result<Option<user::Model>, DomainError> {
        Ok(UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await?)
    }
}

/// A second insert of the same username surfaces as `Conflict`
fn map_unique_username(err: DbErr, username: &str) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            DomainError::Conflict(format!("User {}", username))
        }
        _ => DomainError::from(err),
    }
}

impl From<user::Model> for User {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
        }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn find_all(&self) -> Result<Vec<User>, DomainError> {
        let users = UserEntity::find()
            .order_by_asc(user::Column::Username)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(User::from).collect())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        Ok(self.find_model(username).await?.map(User::from))
    }

    async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, DomainError> {
        Ok(self.find_model(username).await?.map(|model| {
            let hash = model.password_hash.clone();
            (User::from(model), hash)
        }))
    }

    async fn create(&self, username: String, password_hash: String) -> Result<User, DomainError> {
        let now = chrono::Utc::now().to_rfc3339();

        let user = ActiveModel {
            username: Set(username.clone()),
            password_hash: Set(password_hash),
            created_at: Set(now.clone()),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = user
            .insert(&self.db)
            .await
            .map_err(|e| map_unique_username(e, &username))?;
        tracing::info!("Created user {} (id {})", result.username, result.id);

        Ok(User::from(result))
    }
}
