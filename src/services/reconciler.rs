//! Entity reconciler - maps validated forms onto new or existing records.
//!
//! The mapping itself is pure (`*_active_model`); the `save_*` functions
//! commit it. A book write covers the row and its whole genre set in one
//! transaction, so a failed write leaves nothing behind.
#![allow(clippy::needless_update)] // SeaORM ActiveModels require ..Default::default()

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, Set, TransactionTrait,
};

use crate::domain::DomainError;
use crate::domain::forms::{DATE_FORMAT, ValidatedAuthor, ValidatedBook, ValidatedGenre};
use crate::models::{author, book, book_genres, genre};

/// Where a validated book form lands
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BookTarget {
    Create,
    /// Replace every field of the stored book with this id
    Update(i32),
}

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// Assign every form field onto a new book (`existing` is `None`) or onto a
/// stored one. On update all fields are rewritten, including ones whose value
/// did not change.
pub fn book_active_model(
    existing: Option<book::Model>,
    input: &ValidatedBook,
    now: &str,
) -> book::ActiveModel {
    let mut active = match existing {
        None => book::ActiveModel {
            created_at: Set(now.to_string()),
            ..Default::default()
        },
        Some(model) => model.into_active_model(),
    };

    active.title = Set(input.title.clone());
    active.publish_date = Set(input.publish_date.format(DATE_FORMAT).to_string());
    active.author_id = Set(input.author_id);
    active.audience = Set(input.audience);
    active.updated_at = Set(now.to_string());
    active
}

/// Join rows for exactly the chosen genres
pub fn genre_links(book_id: i32, genre_ids: &[i32]) -> Vec<book_genres::ActiveModel> {
    genre_ids
        .iter()
        .map(|genre_id| book_genres::ActiveModel {
            book_id: Set(book_id),
            genre_id: Set(*genre_id),
        })
        .collect()
}

pub fn author_active_model(input: &ValidatedAuthor, now: &str) -> author::ActiveModel {
    author::ActiveModel {
        name: Set(input.name.clone()),
        biography: Set(input.biography.clone()),
        created_at: Set(now.to_string()),
        updated_at: Set(now.to_string()),
        ..Default::default()
    }
}

pub fn genre_active_model(input: &ValidatedGenre, now: &str) -> genre::ActiveModel {
    genre::ActiveModel {
        name: Set(input.name.clone()),
        created_at: Set(now.to_string()),
        updated_at: Set(now.to_string()),
        ..Default::default()
    }
}

/// Referenced rows may have vanished since the form was validated.
async fn ensure_references<C: ConnectionTrait>(
    conn: &C,
    input: &ValidatedBook,
) -> Result<(), DomainError> {
    if author::Entity::find_by_id(input.author_id)
        .one(conn)
        .await?
        .is_none()
    {
        return Err(DomainError::NotFound(format!("Author {}", input.author_id)));
    }

    if !input.genre_ids.is_empty() {
        let found = genre::Entity::find()
            .filter(genre::Column::Id.is_in(input.genre_ids.clone()))
            .count(conn)
            .await?;
        if found != input.genre_ids.len() as u64 {
            return Err(DomainError::NotFound("Genre".to_string()));
        }
    }

    Ok(())
}

/// Replace the book's genre set with `genre_ids`.
async fn replace_genres<C: ConnectionTrait>(
    conn: &C,
    book_id: i32,
    genre_ids: &[i32],
) -> Result<(), DomainError> {
    book_genres::Entity::delete_many()
        .filter(book_genres::Column::BookId.eq(book_id))
        .exec(conn)
        .await?;

    let links = genre_links(book_id, genre_ids);
    if !links.is_empty() {
        book_genres::Entity::insert_many(links)
            .exec_without_returning(conn)
            .await?;
    }
    Ok(())
}

/// Create or fully update a book and its genre set.
pub async fn save_book(
    db: &DatabaseConnection,
    target: BookTarget,
    input: ValidatedBook,
) -> Result<book::Model, DomainError> {
    let txn = db.begin().await?;

    let existing = match target {
        BookTarget::Create => None,
        BookTarget::Update(id) => Some(
            book::Entity::find_by_id(id)
                .one(&txn)
                .await?
                .ok_or_else(|| DomainError::NotFound(format!("Book {}", id)))?,
        ),
    };

    ensure_references(&txn, &input).await?;

    let is_new = existing.is_none();
    let active = book_active_model(existing, &input, &now());
    let model = if is_new {
        active.insert(&txn).await?
    } else {
        active.update(&txn).await?
    };

    replace_genres(&txn, model.id, &input.genre_ids).await?;

    txn.commit().await?;

    tracing::info!(
        "{} book {} '{}' (author {}, {} genres)",
        if is_new { "Created" } else { "Updated" },
        model.id,
        model.title,
        model.author_id,
        input.genre_ids.len()
    );
    Ok(model)
}

pub async fn save_author(
    db: &DatabaseConnection,
    input: ValidatedAuthor,
) -> Result<author::Model, DomainError> {
    let model = author_active_model(&input, &now()).insert(db).await?;
    tracing::info!("Created author {} '{}'", model.id, model.name);
    Ok(model)
}

pub async fn save_genre(
    db: &DatabaseConnection,
    input: ValidatedGenre,
) -> Result<genre::Model, DomainError> {
    let model = genre_active_model(&input, &now()).insert(db).await?;
    tracing::info!("Created genre {} '{}'", model.id, model.name);
    Ok(model)
}
