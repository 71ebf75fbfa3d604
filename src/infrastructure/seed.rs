//! Demo catalog for local runs (`SEED_DEMO`).
//!
//! Everything goes through the same save paths the forms use, so seeded rows
//! look exactly like user-created ones.

use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::domain::DomainError;
use crate::domain::forms::{DATE_FORMAT, ValidatedAuthor, ValidatedBook, ValidatedGenre};
use crate::infrastructure::auth::hash_password;
use crate::models::{Audience, user};
use crate::services::{BookTarget, save_author, save_book, save_genre};

pub const DEMO_USERNAME: &str = "demo";

const AUTHORS: &[(&str, &str)] = &[
    (
        "J.R.R. Tolkien",
        "Philologist and author of The Hobbit and The Lord of the Rings.",
    ),
    (
        "Isaac Asimov",
        "Biochemist and prolific writer of science fiction and popular science.",
    ),
    (
        "Ursula K. Le Guin",
        "Novelist of Earthsea and the Hainish Cycle.",
    ),
];

const GENRES: &[&str] = &["Fantasy", "Science Fiction", "Classic"];

// (title, publish date, author index, audience, genre indexes)
const BOOKS: &[(&str, &str, usize, Audience, &[usize])] = &[
    ("The Hobbit", "1937-09-21", 0, Audience::All, &[0, 2]),
    ("Foundation", "1951-06-01", 1, Audience::Adult, &[1, 2]),
    (
        "A Wizard of Earthsea",
        "1968-11-01",
        2,
        Audience::YoungAdult,
        &[0],
    ),
];

pub async fn seed_demo_data(db: &DatabaseConnection) -> Result<(), DomainError> {
    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(DEMO_USERNAME))
        .one(db)
        .await?;
    if existing.is_some() {
        tracing::info!("Demo user already present, skipping seed");
        return Ok(());
    }

    // 1. Authors
    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for (name, biography) in AUTHORS {
        let author = save_author(
            db,
            ValidatedAuthor {
                name: name.to_string(),
                biography: biography.to_string(),
            },
        )
        .await?;
        author_ids.push(author.id);
    }

    // 2. Genres
    let mut genre_ids = Vec::with_capacity(GENRES.len());
    for name in GENRES {
        let genre = save_genre(
            db,
            ValidatedGenre {
                name: name.to_string(),
            },
        )
        .await?;
        genre_ids.push(genre.id);
    }

    // 3. Books
    for (title, date, author, audience, genres) in BOOKS {
        let publish_date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|e| DomainError::Internal(format!("Bad seed date {}: {}", date, e)))?;
        save_book(
            db,
            BookTarget::Create,
            ValidatedBook {
                title: title.to_string(),
                publish_date,
                author_id: author_ids[*author],
                audience: *audience,
                genre_ids: genres.iter().map(|i| genre_ids[*i]).collect(),
            },
        )
        .await?;
    }

    // 4. Demo account last: its presence marks a completed seed
    let now = chrono::Utc::now().to_rfc3339();
    let demo = user::ActiveModel {
        username: Set(DEMO_USERNAME.to_owned()),
        password_hash: Set(hash_password(DEMO_USERNAME)?),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    user::Entity::insert(demo).exec(db).await?;

    Ok(())
}
