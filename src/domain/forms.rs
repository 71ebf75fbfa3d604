//! Form definitions and their validation rules.
//!
//! Each form is the raw, string-typed bag of submitted values. Validation
//! turns it into a typed `Validated*` value or a per-field `FormErrors` map
//! that the page re-renders next to the inputs.

use chrono::NaiveDate;
use garde::Validate;
use serde::Deserialize;
use std::collections::BTreeMap;

use super::repositories::{Author, Book, Genre};
use crate::models::Audience;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const REQUIRED: &str = "This field is required.";
const INVALID_DATE: &str = "Not a valid date value.";
const INVALID_CHOICE: &str = "Not a valid choice.";

/// Field name -> first error message for that field
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors(BTreeMap<String, String>);

impl FormErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    /// Record an error; a field keeps only its first message.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<garde::Report> for FormErrors {
    fn from(report: garde::Report) -> Self {
        let mut errors = FormErrors::new();
        for (path, error) in report.iter() {
            errors.add(&path.to_string(), error.message());
        }
        errors
    }
}

fn present(value: &str) -> garde::Result {
    if value.trim().is_empty() {
        return Err(garde::Error::new(REQUIRED));
    }
    Ok(())
}

fn required(value: &str, _ctx: &()) -> garde::Result {
    present(value)
}

fn parse_date(value: &str) -> Result<NaiveDate, &'static str> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|_| INVALID_DATE)
}

fn parse_choice(value: &str, allowed: &[i32]) -> Result<i32, &'static str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(REQUIRED);
    }
    match trimmed.parse::<i32>() {
        Ok(id) if allowed.contains(&id) => Ok(id),
        _ => Err(INVALID_CHOICE),
    }
}

fn parse_audience(value: &str) -> Result<Audience, &'static str> {
    value.trim().parse().map_err(|_| INVALID_CHOICE)
}

/// Ids a book form may reference, loaded from the store before validation.
#[derive(Debug, Clone, Default)]
pub struct BookChoices {
    pub author_ids: Vec<i32>,
    pub genre_ids: Vec<i32>,
}

impl BookChoices {
    pub fn new(authors: &[Author], genres: &[Genre]) -> Self {
        Self {
            author_ids: authors.iter().map(|a| a.id).collect(),
            genre_ids: genres.iter().map(|g| g.id).collect(),
        }
    }
}

fn title_present(value: &str, _choices: &BookChoices) -> garde::Result {
    present(value)
}

fn valid_date(value: &str, _choices: &BookChoices) -> garde::Result {
    parse_date(value).map(|_| ()).map_err(|e| garde::Error::new(e))
}

fn known_author(value: &str, choices: &BookChoices) -> garde::Result {
    parse_choice(value, &choices.author_ids)
        .map(|_| ())
        .map_err(|e| garde::Error::new(e))
}

fn known_audience(value: &str, _choices: &BookChoices) -> garde::Result {
    parse_audience(value).map(|_| ()).map_err(|e| garde::Error::new(e))
}

fn known_genres(values: &[String], choices: &BookChoices) -> garde::Result {
    for value in values {
        parse_choice(value, &choices.genre_ids).map_err(|_| garde::Error::new(INVALID_CHOICE))?;
    }
    Ok(())
}

/// Book create/edit form
#[derive(Debug, Clone, Default, PartialEq, Validate)]
#[garde(context(BookChoices))]
pub struct BookForm {
    #[garde(custom(title_present), length(chars, min = 3, max = 80))]
    pub title: String,
    #[garde(custom(valid_date))]
    pub publish_date: String,
    #[garde(custom(known_author))]
    pub author: String,
    #[garde(custom(known_audience))]
    pub audience: String,
    #[garde(custom(known_genres))]
    pub genres: Vec<String>,
}

/// A book form whose values passed validation
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBook {
    pub title: String,
    pub publish_date: NaiveDate,
    pub author_id: i32,
    pub audience: Audience,
    /// Deduplicated, in submission order
    pub genre_ids: Vec<i32>,
}

impl BookForm {
    /// Bind submitted key/value pairs. `genres` may repeat; every other key
    /// takes its last value.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = BookForm::default();
        for (key, value) in pairs {
            match key.as_str() {
                "title" => form.title = value,
                "publish_date" => form.publish_date = value,
                "author" => form.author = value,
                "audience" => form.audience = value,
                "genres" => form.genres.push(value),
                _ => {}
            }
        }
        form
    }

    /// Pre-populate from a stored book for the edit page.
    pub fn from_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            publish_date: book.publish_date.clone(),
            author: book
                .author
                .as_ref()
                .map(|a| a.id.to_string())
                .unwrap_or_default(),
            audience: book.audience.key().to_string(),
            genres: book.genres.iter().map(|g| g.id.to_string()).collect(),
        }
    }

    pub fn validate_against(&self, choices: &BookChoices) -> Result<ValidatedBook, FormErrors> {
        self.validate_with(choices)?;

        let publish_date =
            parse_date(&self.publish_date).map_err(|e| FormErrors::single("publish_date", e))?;
        let author_id = parse_choice(&self.author, &choices.author_ids)
            .map_err(|e| FormErrors::single("author", e))?;
        let audience =
            parse_audience(&self.audience).map_err(|e| FormErrors::single("audience", e))?;

        let mut genre_ids = Vec::with_capacity(self.genres.len());
        for value in &self.genres {
            let id = parse_choice(value, &choices.genre_ids)
                .map_err(|e| FormErrors::single("genres", e))?;
            if !genre_ids.contains(&id) {
                genre_ids.push(id);
            }
        }

        Ok(ValidatedBook {
            title: self.title.clone(),
            publish_date,
            author_id,
            audience,
            genre_ids,
        })
    }
}

/// Author create form
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct AuthorForm {
    #[garde(custom(required), length(chars, min = 4, max = 80))]
    pub name: String,
    #[garde(custom(required), length(chars, min = 5, max = 200))]
    pub biography: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedAuthor {
    pub name: String,
    pub biography: String,
}

impl AuthorForm {
    pub fn validated(&self) -> Result<ValidatedAuthor, FormErrors> {
        self.validate()?;
        Ok(ValidatedAuthor {
            name: self.name.clone(),
            biography: self.biography.clone(),
        })
    }
}

/// Genre create form
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Validate)]
#[serde(default)]
pub struct GenreForm {
    #[garde(custom(required), length(chars, min = 3, max = 80))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedGenre {
    pub name: String,
}

impl GenreForm {
    pub fn validated(&self) -> Result<ValidatedGenre, FormErrors> {
        self.validate()?;
        Ok(ValidatedGenre {
            name: self.name.clone(),
        })
    }
}

/// Account signup form
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct SignupForm {
    #[garde(custom(required), length(chars, min = 3, max = 50))]
    pub username: String,
    #[garde(custom(required))]
    pub password: String,
}

/// Login form; `next` is where to go after a successful login
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct LoginForm {
    #[garde(custom(required), length(chars, min = 3, max = 50))]
    pub username: String,
    #[garde(custom(required))]
    pub password: String,
    #[garde(skip)]
    pub next: Option<String>,
}
