use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use estante::{
    client::CatalogClient, error::TransportError, traits::CatalogApi, types::book::BookEntry,
};

#[derive(Default)]
struct Backend {
    books:    Vec<Value>,
    next_id:  i64,
    received: Vec<(String, Value)>,
    broken:   bool,
}

type Shared = Arc<Mutex<Backend>>;

async fn list(State(state): State<Shared>) -> Result<Json<Vec<Value>>, StatusCode> {
    let backend = state.lock().unwrap();
    if backend.broken {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    Ok(Json(backend.books.clone()))
}

async fn create(
    State(state): State<Shared>,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    let mut backend = state.lock().unwrap();
    if backend.broken {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }
    backend.received.push(("create".into(), body.clone()));
    backend.next_id += 1;
    let mut book = body;
    book["id"] = json!(backend.next_id);
    backend.books.push(book.clone());
    Ok((StatusCode::CREATED, Json(book)))
}

async fn update(
    State(state): State<Shared>,
    Path(id): Path<i64>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut backend = state.lock().unwrap();
    backend.received.push((format!("update {id}"), body.clone()));
    let book = backend
        .books
        .iter_mut()
        .find(|book| book["id"] == json!(id))
        .ok_or(StatusCode::NOT_FOUND)?;
    let mut updated = body;
    updated["id"] = json!(id);
    *book = updated.clone();
    Ok(Json(updated))
}

async fn remove(State(state): State<Shared>, Path(id): Path<i64>) -> StatusCode {
    let mut backend = state.lock().unwrap();
    let before = backend.books.len();
    backend.books.retain(|book| book["id"] != json!(id));
    if backend.books.len() == before {
        StatusCode::NOT_FOUND
    } else {
        StatusCode::ACCEPTED
    }
}

async fn spawn(backend: Backend) -> (CatalogClient, Shared) {
    let state = Arc::new(Mutex::new(backend));
    let app = Router::new()
        .route("/api/livros/listarLivros", get(list))
        .route("/api/livros/cadastrarLivro", post(create))
        .route("/api/livros/atualizarLivro/:id", put(update))
        .route("/api/livros/deletarLivro/:id", delete(remove))
        .with_state(state.clone());
    let server = axum::Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0)))
        .serve(app.into_make_service());
    let addr = server.local_addr();
    tokio::spawn(server);
    (CatalogClient::new(format!("http://{addr}/api/livros/")), state)
}

fn dom_casmurro() -> BookEntry {
    BookEntry {
        id:         None,
        title:      "Dom Casmurro".into(),
        genre:      "Romance".into(),
        page_count: 256,
        cover_url:  "".into(),
    }
}

#[tokio::test]
async fn list_decodes_wire_format_in_order() {
    let (client, _) = spawn(Backend {
        books: vec![
            json!({"id": 2, "nome": "Iracema", "genero": "Romance", "paginas": 160, "foto": null}),
            json!({"id": 1, "nome": "Dom Casmurro", "genero": "Romance", "paginas": 256, "foto": "https://example.com/dc.jpg"}),
        ],
        ..Backend::default()
    })
    .await;

    let books = client.list().await.unwrap();
    assert_eq!(
        books.iter().map(|book| book.id).collect::<Vec<_>>(),
        vec![Some(2), Some(1)]
    );
    assert_eq!(books[0].cover(), None);
    assert_eq!(books[1].cover(), Some("https://example.com/dc.jpg"));
}

#[tokio::test]
async fn create_sends_fields_without_id_and_returns_assigned_id() {
    let (client, state) = spawn(Backend::default()).await;

    let created = client
        .create(&BookEntry {
            id: Some(99),
            ..dom_casmurro()
        })
        .await
        .unwrap();
    assert_eq!(
        created,
        BookEntry {
            id: Some(1),
            ..dom_casmurro()
        }
    );
    assert_eq!(
        state.lock().unwrap().received,
        vec![(
            "create".to_string(),
            json!({"nome": "Dom Casmurro", "genero": "Romance", "paginas": 256, "foto": ""})
        )]
    );
}

#[tokio::test]
async fn update_puts_fields_under_id() {
    let (client, state) = spawn(Backend {
        books: vec![json!({"id": 5, "nome": "Dom Casmurro", "genero": "Romance", "paginas": 250, "foto": ""})],
        ..Backend::default()
    })
    .await;

    let updated = client.update(5, &dom_casmurro()).await.unwrap();
    assert_eq!(updated.id, Some(5));
    assert_eq!(updated.page_count, 256);
    assert_eq!(state.lock().unwrap().received[0].0, "update 5");
    assert_eq!(client.list().await.unwrap(), vec![updated]);
}

#[tokio::test]
async fn update_of_unknown_id_is_left_to_the_server() {
    let (client, state) = spawn(Backend::default()).await;

    let err = client.update(42, &dom_casmurro()).await.unwrap_err();
    assert!(matches!(err, TransportError::Status { .. }));
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert_eq!(state.lock().unwrap().received.len(), 1);
}

#[tokio::test]
async fn delete_accepts_any_success_status() {
    let (client, state) = spawn(Backend {
        books: vec![json!({"id": 1, "nome": "Dom Casmurro", "genero": "Romance", "paginas": 256, "foto": ""})],
        ..Backend::default()
    })
    .await;

    client.delete(1).await.unwrap();
    assert!(state.lock().unwrap().books.is_empty());

    let err = client.delete(1).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn server_errors_become_transport_errors() {
    let (client, _) = spawn(Backend {
        broken: true,
        ..Backend::default()
    })
    .await;

    match client.list().await {
        Err(TransportError::Status { method, url, status }) => {
            assert_eq!(method, reqwest::Method::GET);
            assert!(url.ends_with("/api/livros/listarLivros"));
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        }
        other => panic!("expected a status error, got {other:?}"),
    }
    assert!(client.create(&dom_casmurro()).await.is_err());
}

#[tokio::test]
async fn malformed_body_reports_the_offending_path() {
    let (client, _) = spawn(Backend {
        books: vec![json!({"id": 1, "nome": 5})],
        ..Backend::default()
    })
    .await;

    match client.list().await {
        Err(TransportError::Decode(e)) => assert_eq!(e.path().to_string(), "[0].nome"),
        other => panic!("expected a decode error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = CatalogClient::new(format!("http://{addr}/api/livros"));
    assert!(matches!(
        client.list().await,
        Err(TransportError::Network(_))
    ));
}
