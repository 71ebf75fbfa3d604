use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use books_catalog::auth;
use books_catalog::db;
use books_catalog::domain::DomainError;
use books_catalog::domain::forms::{ValidatedAuthor, ValidatedBook, ValidatedGenre};
use books_catalog::models::{Audience, book, book_genres, genre, user};
use books_catalog::server::build_router;
use books_catalog::services::{BookTarget, save_author, save_book, save_genre};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test database and the full router over it
async fn setup_test_app() -> (Router, DatabaseConnection) {
    let db = db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB");
    (build_router(db.clone(), "static"), db)
}

// Helper to create a test user and a session cookie for it
async fn login_cookie(db: &DatabaseConnection, username: &str) -> String {
    let now = chrono::Utc::now().to_rfc3339();
    let reader = user::ActiveModel {
        username: Set(username.to_string()),
        password_hash: Set(auth::hash_password("secret").unwrap()),
        created_at: Set(now.clone()),
        updated_at: Set(now),
        ..Default::default()
    };
    let reader = reader.insert(db).await.expect("Failed to create user");
    let token = auth::create_jwt(reader.id, &reader.username).expect("Failed to create token");
    format!("{}={}", auth::SESSION_COOKIE, token)
}

async fn create_author(db: &DatabaseConnection, name: &str) -> i32 {
    save_author(
        db,
        ValidatedAuthor {
            name: name.to_string(),
            biography: "Wrote a great many books.".to_string(),
        },
    )
    .await
    .expect("Failed to create author")
    .id
}

async fn create_genre(db: &DatabaseConnection, name: &str) -> i32 {
    save_genre(
        db,
        ValidatedGenre {
            name: name.to_string(),
        },
    )
    .await
    .expect("Failed to create genre")
    .id
}

fn post_form(uri: &str, cookie: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body)).unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).method("GET");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn book_body(title: &str, author: i32, genres: &[i32]) -> String {
    let mut body = format!(
        "title={}&publish_date=1965-08-01&author={}&audience=ADULT",
        urlencoding::encode(title),
        author
    );
    for genre in genres {
        body.push_str(&format!("&genres={}", genre));
    }
    body.push_str("&submit=Submit");
    body
}

async fn body_text(res: Response) -> String {
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(res: &Response) -> &str {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

async fn book_count(db: &DatabaseConnection) -> u64 {
    book::Entity::find().count(db).await.unwrap()
}

async fn link_count(db: &DatabaseConnection) -> u64 {
    book_genres::Entity::find().count(db).await.unwrap()
}

fn validated_book(title: &str, author_id: i32, genre_ids: Vec<i32>) -> ValidatedBook {
    ValidatedBook {
        title: title.to_string(),
        publish_date: NaiveDate::from_ymd_opt(1965, 8, 1).unwrap(),
        author_id,
        audience: Audience::Adult,
        genre_ids,
    }
}

#[tokio::test]
async fn test_create_book_redirects_to_detail() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;
    let author = create_author(&db, "Frank Herbert").await;
    let sf = create_genre(&db, "Science Fiction").await;
    let classic = create_genre(&db, "Classic").await;

    let res = app
        .oneshot(post_form(
            "/create_book",
            Some(&cookie),
            book_body("Dune", author, &[sf, classic]),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/book/1");
    let flash = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(flash.starts_with("flash="));

    let stored = book::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.title, "Dune");
    assert_eq!(stored.publish_date, "1965-08-01");
    assert_eq!(stored.author_id, author);
    assert_eq!(stored.audience, Audience::Adult);

    let links = book_genres::Entity::find()
        .filter(book_genres::Column::BookId.eq(1))
        .all(&db)
        .await
        .unwrap();
    let mut genre_ids: Vec<i32> = links.into_iter().map(|l| l.genre_id).collect();
    genre_ids.sort();
    assert_eq!(genre_ids, vec![sf, classic]);
}

#[tokio::test]
async fn test_create_book_rejects_title_out_of_bounds() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;
    let author = create_author(&db, "Frank Herbert").await;

    for title in ["Du".to_string(), "x".repeat(81)] {
        let res = app
            .clone()
            .oneshot(post_form(
                "/create_book",
                Some(&cookie),
                book_body(&title, author, &[]),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = body_text(res).await;
        assert!(html.contains(r#"id="title-error""#));
        // submitted values survive the re-render
        assert!(html.contains(&format!(r#"value="{}""#, title)));
        assert!(html.contains(r#"<option value="ADULT" selected>Adult</option>"#));
    }

    assert_eq!(book_count(&db).await, 0);
}

#[tokio::test]
async fn test_title_bounds_are_inclusive() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;
    let author = create_author(&db, "Frank Herbert").await;

    for title in ["Emm".to_string(), "y".repeat(80)] {
        let res = app
            .clone()
            .oneshot(post_form(
                "/create_book",
                Some(&cookie),
                book_body(&title, author, &[]),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    assert_eq!(book_count(&db).await, 2);
}

#[tokio::test]
async fn test_unknown_genre_is_not_a_valid_choice() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;
    let author = create_author(&db, "Frank Herbert").await;

    let res = app
        .oneshot(post_form(
            "/create_book",
            Some(&cookie),
            book_body("Dune", author, &[42]),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(res).await;
    assert!(html.contains(r#"id="genres-error""#));
    assert!(html.contains("Not a valid choice."));
    assert_eq!(book_count(&db).await, 0);
}

#[tokio::test]
async fn test_edit_keeps_author_and_replaces_fields() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;
    let author = create_author(&db, "Frank Herbert").await;
    let sf = create_genre(&db, "Science Fiction").await;
    let classic = create_genre(&db, "Classic").await;

    let res = app
        .clone()
        .oneshot(post_form(
            "/create_book",
            Some(&cookie),
            book_body("Dune", author, &[sf, classic]),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let res = app
        .clone()
        .oneshot(post_form(
            "/book/1",
            None,
            book_body("Dune Messiah", author, &[classic]),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/book/1");

    let stored = book::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.title, "Dune Messiah");
    assert_eq!(stored.author_id, author);
    assert_eq!(stored.publish_date, "1965-08-01");

    let links = book_genres::Entity::find()
        .filter(book_genres::Column::BookId.eq(1))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].genre_id, classic);

    let res = app.oneshot(get("/book/1", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains("Dune Messiah"));
    assert!(html.contains("Frank Herbert"));
}

#[tokio::test]
async fn test_invalid_edit_leaves_book_untouched() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;
    let author = create_author(&db, "Frank Herbert").await;

    app.clone()
        .oneshot(post_form(
            "/create_book",
            Some(&cookie),
            book_body("Dune", author, &[]),
        ))
        .await
        .unwrap();

    let res = app
        .oneshot(post_form("/book/1", None, book_body("D", author, &[])))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let stored = book::Entity::find_by_id(1).one(&db).await.unwrap().unwrap();
    assert_eq!(stored.title, "Dune");
}

#[tokio::test]
async fn test_unknown_book_is_not_found() {
    let (app, db) = setup_test_app().await;
    let author = create_author(&db, "Frank Herbert").await;

    let res = app.clone().oneshot(get("/book/999", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    // a non-numeric id gets the same HTML page
    let res = app.clone().oneshot(get("/book/abc", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(body_text(res).await.contains(r#"<p class="error">Book abc not found.</p>"#));

    let res = app
        .oneshot(post_form("/book/999", None, book_body("Dune", author, &[])))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(book_count(&db).await, 0);
}

#[tokio::test]
async fn test_author_biography_bounds() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;

    for (biography, expected) in [
        ("a".repeat(5), StatusCode::SEE_OTHER),
        ("b".repeat(200), StatusCode::SEE_OTHER),
        ("c".repeat(4), StatusCode::UNPROCESSABLE_ENTITY),
        ("d".repeat(201), StatusCode::UNPROCESSABLE_ENTITY),
    ] {
        let res = app
            .clone()
            .oneshot(post_form(
                "/create_author",
                Some(&cookie),
                format!("name=Octavia+Butler&biography={}", biography),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), expected, "biography of {}", biography.len());
        if expected == StatusCode::SEE_OTHER {
            assert_eq!(location(&res), "/");
        }
    }

    let authors = books_catalog::models::author::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(authors, 2);
}

#[tokio::test]
async fn test_create_genre() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;

    let res = app
        .clone()
        .oneshot(post_form("/create_genre", Some(&cookie), "name=Poetry".to_string()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), "/");

    let res = app
        .oneshot(post_form("/create_genre", Some(&cookie), "name=Po".to_string()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(res).await.contains(r#"id="name-error""#));
}

#[tokio::test]
async fn test_protected_routes_redirect_to_login() {
    let (app, db) = setup_test_app().await;
    login_cookie(&db, "reader").await;

    for uri in [
        "/create_book",
        "/create_author",
        "/create_genre",
        "/profile/reader",
    ] {
        let res = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER, "{}", uri);
        assert_eq!(
            location(&res),
            format!("/login?next={}", urlencoding::encode(uri))
        );
        assert!(!body_text(res).await.contains("reader"));
    }
}

#[tokio::test]
async fn test_anonymous_posts_create_nothing() {
    let (app, db) = setup_test_app().await;
    let author = create_author(&db, "Frank Herbert").await;

    let res = app
        .clone()
        .oneshot(post_form("/create_book", None, book_body("Dune", author, &[])))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert!(location(&res).starts_with("/login"));

    let res = app
        .clone()
        .oneshot(post_form(
            "/create_author",
            None,
            "name=Octavia+Butler&biography=Kindred+and+more".to_string(),
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    let res = app
        .oneshot(post_form("/create_genre", None, "name=Poetry".to_string()))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);

    assert_eq!(book_count(&db).await, 0);
    let authors = books_catalog::models::author::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(authors, 1);
    let genres = books_catalog::models::genre::Entity::find()
        .count(&db)
        .await
        .unwrap();
    assert_eq!(genres, 0);
}

#[tokio::test]
async fn test_tampered_session_is_rejected() {
    let (app, _db) = setup_test_app().await;

    let res = app
        .oneshot(get("/create_book", Some("session=not.a.token")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_favorite_routes_are_stubs() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;
    let author = create_author(&db, "Frank Herbert").await;
    app.clone()
        .oneshot(post_form(
            "/create_book",
            Some(&cookie),
            book_body("Dune", author, &[]),
        ))
        .await
        .unwrap();
    let before = book::Entity::find_by_id(1).one(&db).await.unwrap();

    for uri in ["/favorite/1", "/unfavorite/1"] {
        let res = app
            .clone()
            .oneshot(post_form(uri, Some(&cookie), String::new()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(body_text(res).await, "Not yet implemented!");

        let res = app
            .clone()
            .oneshot(post_form(uri, None, String::new()))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    let after = book::Entity::find_by_id(1).one(&db).await.unwrap();
    assert_eq!(before, after);
    assert_eq!(book_count(&db).await, 1);
}

#[tokio::test]
async fn test_homepage_lists_books_and_users() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;
    let author = create_author(&db, "Frank Herbert").await;
    app.clone()
        .oneshot(post_form(
            "/create_book",
            Some(&cookie),
            book_body("Dune", author, &[]),
        ))
        .await
        .unwrap();

    let res = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains(r#"<a href="/book/1">Dune</a> by Frank Herbert"#));
    assert!(html.contains(r#"<a href="/profile/reader">reader</a>"#));
}

#[tokio::test]
async fn test_flash_is_shown_once() {
    let (app, _db) = setup_test_app().await;

    let res = app
        .oneshot(get("/", Some("flash=Book%20successfully%20updated")))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let cleared = res
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cleared.contains("Max-Age=0"));
    assert!(body_text(res).await.contains(r#"<p class="flash">Book successfully updated</p>"#));
}

#[tokio::test]
async fn test_profile_pages() {
    let (app, db) = setup_test_app().await;
    let cookie = login_cookie(&db, "reader").await;

    let res = app
        .clone()
        .oneshot(get("/profile/reader", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(body_text(res).await.contains("<strong>Username:</strong> reader"));

    let res = app
        .oneshot(get("/profile/nobody", Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_check() {
    let (app, _db) = setup_test_app().await;

    let res = app.oneshot(get("/health", None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["service"], "books-catalog");
}

#[tokio::test]
async fn test_save_book_with_missing_author_writes_nothing() {
    let (_app, db) = setup_test_app().await;
    let sf = create_genre(&db, "Science Fiction").await;

    let result = save_book(&db, BookTarget::Create, validated_book("Dune", 99, vec![sf])).await;

    assert!(matches!(result, Err(DomainError::NotFound(_))));
    assert_eq!(book_count(&db).await, 0);
    assert_eq!(link_count(&db).await, 0);
}

#[tokio::test]
async fn test_save_book_with_missing_genre_writes_nothing() {
    let (_app, db) = setup_test_app().await;
    let author = create_author(&db, "Frank Herbert").await;
    let sf = create_genre(&db, "Science Fiction").await;

    let result = save_book(
        &db,
        BookTarget::Create,
        validated_book("Dune", author, vec![sf, 99]),
    )
    .await;

    assert!(matches!(result, Err(DomainError::NotFound(_))));
    assert_eq!(book_count(&db).await, 0);
    assert_eq!(link_count(&db).await, 0);
}

#[tokio::test]
async fn test_update_with_vanished_genre_rolls_back() {
    let (_app, db) = setup_test_app().await;
    let author = create_author(&db, "Frank Herbert").await;
    let sf = create_genre(&db, "Science Fiction").await;
    let poetry = create_genre(&db, "Poetry").await;

    let created = save_book(
        &db,
        BookTarget::Create,
        validated_book("Dune", author, vec![sf]),
    )
    .await
    .unwrap();

    // the genre disappears between validation and commit
    genre::Entity::delete_by_id(poetry).exec(&db).await.unwrap();

    let result = save_book(
        &db,
        BookTarget::Update(created.id),
        validated_book("Dune Messiah", author, vec![poetry]),
    )
    .await;

    assert!(matches!(result, Err(DomainError::NotFound(_))));
    let stored = book::Entity::find_by_id(created.id)
        .one(&db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored, created);
    let links = book_genres::Entity::find().all(&db).await.unwrap();
    assert_eq!(links.len(), 1);
    assert_eq!(links[0].genre_id, sf);
}
