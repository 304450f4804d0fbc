//! HTTP routes over the [`Dispatcher`].

use axum::extract::{ Form, Path, State };
use axum::response::{ Html, IntoResponse, Response };
use axum::routing::get;
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::dispatcher::{ Dispatcher, Page, Reply, SearchForm };
use crate::views;

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.page {
            Page::Search(page) => (self.status, Html(views::render_search(&page))).into_response(),
            Page::Book(view) => (self.status, Html(views::render_book(&view))).into_response(),
            Page::Author(view) => (self.status, Html(views::render_author(&view))).into_response(),
            Page::Message(message) => (self.status, message).into_response(),
        }
    }
}

pub fn router(dispatcher: Arc<Dispatcher>) -> Router {
    Router::new()
        .route("/", get(index).post(search))
        .route("/book/:id", get(book_detail))
        .route("/author/:id", get(author_detail))
        .with_state(dispatcher)
}

async fn index(State(dispatcher): State<Arc<Dispatcher>>) -> Reply {
    dispatcher.home()
}

async fn search(State(dispatcher): State<Arc<Dispatcher>>, Form(form): Form<SearchForm>) -> Reply {
    dispatcher.search(form).await
}

async fn book_detail(State(dispatcher): State<Arc<Dispatcher>>, Path(id): Path<String>) -> Reply {
    dispatcher.book_detail(&id).await
}

async fn author_detail(State(dispatcher): State<Arc<Dispatcher>>, Path(id): Path<String>) -> Reply {
    dispatcher.author_detail(&id).await
}

/// Serves until Ctrl-C.
pub async fn serve(addr: SocketAddr, dispatcher: Arc<Dispatcher>) -> std::io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(dispatcher))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Shutting down");
            }
        }).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ record_key, AuthorEntry, BookEntry, NewAuthor, NewBook };
    use crate::store::SurrealCatalog;
    use crate::testing::StubEncoder;
    use axum::body::{ to_bytes, Body };
    use axum::http::{ header, Request, StatusCode };
    use tower::ServiceExt;

    async fn setup_app() -> (Router, Arc<SurrealCatalog>) {
        let catalog = Arc::new(
            SurrealCatalog::in_memory("test", "catalog", 4).await.expect("Failed to create catalog")
        );
        let encoder = StubEncoder::new(4).with("lem", vec![0.9, 0.1, 0.1, 0.1]);
        let dispatcher = Dispatcher::new(Arc::new(encoder), catalog.clone());
        (router(Arc::new(dispatcher)), catalog)
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_get_index_renders_form() {
        let (app, _catalog) = setup_app().await;

        let (status, body) = send(app, get_request("/")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<form method=\"post\""));
        assert!(!body.contains("results for"));
    }

    #[tokio::test]
    async fn test_post_author_search() {
        let (app, catalog) = setup_app().await;
        let stored = catalog
            .upsert_author(
                NewAuthor::new(
                    AuthorEntry {
                        name: "Stanislaw Lem".to_string(),
                        about: None,
                        born: None,
                    },
                    vec![1.0, 0.1, 0.1, 0.1]
                )
            ).await
            .unwrap();

        let (status, body) = send(app, post_form("search_type=author&query=lem")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Author results for &quot;lem&quot;"));
        assert!(body.contains(&format!("/author/{}", record_key(&stored.id))));
    }

    #[tokio::test]
    async fn test_post_with_missing_fields_shows_empty_form() {
        let (app, _catalog) = setup_app().await;

        let (status, body) = send(app, post_form("query=lem")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(!body.contains("results for"));
    }

    #[tokio::test]
    async fn test_book_detail_routes() {
        let (app, catalog) = setup_app().await;
        let stored = catalog
            .upsert_book(
                NewBook::new(
                    BookEntry {
                        title: "His Master's Voice".to_string(),
                        author: Some("Stanislaw Lem".to_string()),
                        description: Some("A scientist decodes a neutrino signal.".to_string()),
                        published_year: Some(1968),
                    },
                    vec![0.1, 1.0, 0.1, 0.1]
                )
            ).await
            .unwrap();

        let uri = format!("/book/{}", record_key(&stored.id));
        let (status, body) = send(app.clone(), get_request(&uri)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("His Master&#39;s Voice"));

        let (status, body) = send(app.clone(), get_request("/book/missing")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Book not found");

        let (status, body) = send(app, get_request("/book/bad-id!")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("Malformed identifier"));
    }

    #[tokio::test]
    async fn test_author_not_found_route() {
        let (app, _catalog) = setup_app().await;

        let (status, body) = send(app, get_request("/author/nobody")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, "Author not found");
    }
}
