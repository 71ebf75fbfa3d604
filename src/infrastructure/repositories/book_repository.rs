//! SeaORM implementation of BookRepository

use async_trait::async_trait;
use sea_orm::{DatabaseConnection, EntityTrait, ModelTrait, QueryOrder};

use crate::domain::{Author, Book, BookRepository, BookSummary, DomainError, Genre};
use crate::models::author::Entity as AuthorEntity;
use crate::models::book::{Column, Entity as BookEntity};
use crate::models::genre::{self, Entity as GenreEntity};

/// SeaORM-based implementation of BookRepository
pub struct SeaOrmBookRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl BookRepository for SeaOrmBookRepository {
    async fn find_all(&self) -> Result<Vec<BookSummary>, DomainError> {
        let rows = BookEntity::find()
            .find_also_related(AuthorEntity)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(book, author)| BookSummary {
                id: book.id,
                title: book.title,
                author_name: author.map(|a| a.name),
            })
            .collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Book>, DomainError> {
        let Some((model, author)) = BookEntity::find_by_id(id)
            .find_also_related(AuthorEntity)
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let genres = model
            .find_related(GenreEntity)
            .order_by_asc(genre::Column::Name)
            .all(&self.db)
            .await?;

        Ok(Some(Book {
            id: model.id,
            title: model.title,
            publish_date: model.publish_date,
            audience: model.audience,
            author: author.map(Author::from),
            genres: genres.into_iter().map(Genre::from).collect(),
        }))
    }
}
