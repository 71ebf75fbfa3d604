//! SeaORM implementation of GenreRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

use crate::domain::{DomainError, Genre, GenreRepository};
use crate::models::genre::{self, Entity as GenreEntity};

pub struct SeaOrmGenreRepository {
    db: DatabaseConnection,
}

impl SeaOrmGenreRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl From<genre::Model> for Genre {
    fn from(model: genre::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
        }
    }
}

#[async_trait]
impl GenreRepository for SeaOrmGenreRepository {
    async fn find_all(&self) -> Result<Vec<Genre>, DomainError> {
        let genres = GenreEntity::find()
            .order_by_asc(genre::Column::Name)
            .all(&self.db)
            .await?;

        Ok(genres.into_iter().map(Genre::from).collect())
    }
}
