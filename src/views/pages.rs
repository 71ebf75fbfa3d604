//! Page bodies. Each returns the markup placed inside `layout`.

use super::{escape, fields};
use crate::domain::forms::{AuthorForm, BookForm, GenreForm, LoginForm, SignupForm};
use crate::domain::{Author, Book, BookSummary, FormErrors, Genre, User};
use crate::models::Audience;

pub fn home(books: &[BookSummary], users: &[User]) -> String {
    let books_html = if books.is_empty() {
        "<p>No books yet.</p>".to_string()
    } else {
        let items: String = books
            .iter()
            .map(|book| {
                let by = book
                    .author_name
                    .as_deref()
                    .map(|name| format!(" by {}", escape(name)))
                    .unwrap_or_default();
                format!(
                    r#"<li><a href="/book/{}">{}</a>{}</li>"#,
                    book.id,
                    escape(&book.title),
                    by
                )
            })
            .collect();
        format!(r#"<ul class="books">{}</ul>"#, items)
    };

    let users_html: String = users
        .iter()
        .map(|user| {
            format!(
                r#"<li><a href="/profile/{}">{}</a></li>"#,
                urlencoding::encode(&user.username),
                escape(&user.username)
            )
        })
        .collect();

    format!(
        r#"<h2>All Books</h2>
{}
<h2>All Users</h2>
<ul class="users">{}</ul>"#,
        books_html, users_html
    )
}

fn book_fields(
    form: &BookForm,
    errors: &FormErrors,
    authors: &[Author],
    genres: &[Genre],
) -> Vec<String> {
    let author_choices: Vec<(String, String)> = authors
        .iter()
        .map(|a| (a.id.to_string(), a.name.clone()))
        .collect();
    let audience_choices: Vec<(String, String)> = Audience::choices()
        .into_iter()
        .map(|(key, label)| (key.to_string(), label.to_string()))
        .collect();
    let genre_choices: Vec<(String, String)> = genres
        .iter()
        .map(|g| (g.id.to_string(), g.name.clone()))
        .collect();

    vec![
        fields::input("text", "title", "Book Title", &form.title, errors),
        fields::input(
            "date",
            "publish_date",
            "Date Published",
            &form.publish_date,
            errors,
        ),
        fields::select("author", "Author", &author_choices, &form.author, errors),
        fields::select(
            "audience",
            "Audience",
            &audience_choices,
            &form.audience,
            errors,
        ),
        fields::multi_select("genres", "Genres", &genre_choices, &form.genres, errors),
    ]
}

pub fn create_book(
    form: &BookForm,
    errors: &FormErrors,
    authors: &[Author],
    genres: &[Genre],
) -> String {
    fields::form(
        "/create_book",
        &book_fields(form, errors, authors, genres),
        "Submit",
    )
}

pub fn book_detail(
    book: &Book,
    form: &BookForm,
    errors: &FormErrors,
    authors: &[Author],
    genres: &[Genre],
) -> String {
    let author = book
        .author
        .as_ref()
        .map(|a| escape(&a.name))
        .unwrap_or_else(|| "Unknown author".to_string());
    let genre_names = if book.genres.is_empty() {
        "None".to_string()
    } else {
        book.genres
            .iter()
            .map(|g| escape(&g.name))
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        r#"<section class="book">
<p><strong>Author:</strong> {author}</p>
<p><strong>Published:</strong> {published}</p>
<p><strong>Audience:</strong> {audience}</p>
<p><strong>Genres:</strong> {genres}</p>
<form method="POST" action="/favorite/{id}"><input type="submit" value="Favorite"></form>
<form method="POST" action="/unfavorite/{id}"><input type="submit" value="Unfavorite"></form>
</section>
<h2>Edit Book</h2>
{edit}"#,
        author = author,
        published = escape(&book.publish_date),
        audience = book.audience.label(),
        genres = genre_names,
        id = book.id,
        edit = fields::form(
            &format!("/book/{}", book.id),
            &book_fields(form, errors, authors, genres),
            "Submit"
        )
    )
}

pub fn create_author(form: &AuthorForm, errors: &FormErrors) -> String {
    fields::form(
        "/create_author",
        &[
            fields::input("text", "name", "Author Name", &form.name, errors),
            fields::textarea("biography", "Author Biography", &form.biography, errors),
        ],
        "Submit",
    )
}

pub fn create_genre(form: &GenreForm, errors: &FormErrors) -> String {
    fields::form(
        "/create_genre",
        &[fields::input("text", "name", "Genre Name", &form.name, errors)],
        "Submit",
    )
}

pub fn signup(form: &SignupForm, errors: &FormErrors) -> String {
    fields::form(
        "/signup",
        &[
            fields::input("text", "username", "User Name", &form.username, errors),
            fields::input("password", "password", "Password", "", errors),
        ],
        "Sign Up",
    )
}

pub fn login(form: &LoginForm, errors: &FormErrors) -> String {
    let mut inputs = vec![
        fields::input("text", "username", "User Name", &form.username, errors),
        fields::input("password", "password", "Password", "", errors),
    ];
    if let Some(next) = form.next.as_deref() {
        inputs.push(fields::hidden("next", next));
    }
    fields::form("/login", &inputs, "Log In")
}

pub fn profile(user: &User) -> String {
    format!(
        r#"<section class="profile">
<p><strong>Username:</strong> {}</p>
<p>Favorite books are not available yet.</p>
</section>"#,
        escape(&user.username)
    )
}

pub fn error(message: &str) -> String {
    format!(r#"<p class="error">{}</p>"#, escape(message))
}
