use super::*;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use shared::domain::UtteranceId;
use shared::error::ErrorCode;
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    sync::{oneshot, Mutex},
};

async fn spawn_backend(app: Router) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn lists_corpora_from_collection_endpoint() {
    let app = Router::new().route(
        "/corpus",
        get(|| async {
            Json(json!([
                { "corpus_id": 1, "name": "na-tones" },
                { "corpus_id": 2, "name": "kunwinjku" },
            ]))
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let corpora = backend.list_corpora().await.expect("list corpora");

    assert_eq!(corpora.len(), 2);
    assert_eq!(corpora[0].corpus_id, CorpusId(1));
    assert_eq!(corpora[0].name, "na-tones");
    assert_eq!(corpora[1].corpus_id, CorpusId(2));
}

#[tokio::test]
async fn lists_models_with_their_corpus_reference() {
    let app = Router::new().route(
        "/model",
        get(|| async {
            Json(json!([
                { "model_id": 7, "name": "na-tones-base", "corpus_id": 1 },
            ]))
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let models = backend.list_models().await.expect("list models");

    assert_eq!(models.len(), 1);
    assert_eq!(models[0].model_id, ModelId(7));
    assert_eq!(models[0].corpus_id, CorpusId(1));
}

#[tokio::test]
async fn fetches_corpus_detail_with_overlapping_partition() {
    let app = Router::new().route(
        "/corpus/:corpus_id",
        get(|Path(corpus_id): Path<i64>| async move {
            Json(json!({
                "corpus_id": corpus_id,
                "name": "na-tones",
                "feature_type": "fbank",
                "label_type": "phonemes",
                "partition": {
                    "training": ["utt-1", "utt-2"],
                    "validation": ["utt-2"],
                    "testing": ["utt-3"],
                },
            }))
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let detail = backend.get_corpus(CorpusId(5)).await.expect("get corpus");

    assert_eq!(detail.corpus_id, CorpusId(5));
    assert_eq!(detail.feature_type, "fbank");
    assert_eq!(detail.maximum_samples, None);
    assert_eq!(
        detail.partition.validation,
        vec![UtteranceId("utt-2".to_string())]
    );
}

#[tokio::test]
async fn unknown_corpus_maps_to_not_found() {
    let app = Router::new().route(
        "/corpus/:corpus_id",
        get(|| async { StatusCode::NOT_FOUND }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend.get_corpus(CorpusId(99)).await.expect_err("missing corpus");

    assert!(matches!(err, BackendError::NotFound));
}

#[tokio::test]
async fn preprocess_posts_the_selected_corpus_id() {
    #[derive(Clone)]
    struct CaptureState {
        tx: Arc<Mutex<Option<oneshot::Sender<serde_json::Value>>>>,
    }

    let (tx, rx) = oneshot::channel();
    let state = CaptureState {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route(
            "/corpus/preprocess",
            post(
                |State(state): State<CaptureState>, Json(payload): Json<serde_json::Value>| async move {
                    if let Some(tx) = state.tx.lock().await.take() {
                        let _ = tx.send(payload);
                    }
                    StatusCode::OK
                },
            ),
        )
        .with_state(state);
    let backend = HttpBackend::new(spawn_backend(app).await);

    backend
        .preprocess_corpus(CorpusId(3))
        .await
        .expect("preprocess");

    let payload = rx.await.expect("captured payload");
    assert_eq!(payload, json!({ "corpus_id": 3 }));
}

#[tokio::test]
async fn preprocess_rejection_preserves_the_structured_payload() {
    let app = Router::new().route(
        "/corpus/preprocess",
        post(|| async {
            (
                StatusCode::CONFLICT,
                Json(json!({ "code": "conflict", "message": "corpus is already preprocessing" })),
            )
        }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend
        .preprocess_corpus(CorpusId(3))
        .await
        .expect_err("rejected preprocess");

    match err {
        BackendError::Rejected(payload) => {
            assert_eq!(payload.code, ErrorCode::Conflict);
            assert_eq!(payload.message, "corpus is already preprocessing");
        }
        other => panic!("expected structured rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn train_rejection_keeps_the_plain_text_body() {
    let app = Router::new().route(
        "/model/train",
        post(|| async { (StatusCode::BAD_REQUEST, "quota exceeded") }),
    );
    let backend = HttpBackend::new(spawn_backend(app).await);

    let err = backend
        .train_model(ModelId(7))
        .await
        .expect_err("rejected training");

    match &err {
        BackendError::Message { status, body } => {
            assert_eq!(*status, StatusCode::BAD_REQUEST);
            assert_eq!(body, "quota exceeded");
        }
        other => panic!("expected text rejection, got {other:?}"),
    }
    assert!(err.to_string().contains("quota exceeded"));
}

#[tokio::test]
async fn train_success_posts_the_selected_model_id() {
    #[derive(Clone)]
    struct CaptureState {
        tx: Arc<Mutex<Option<oneshot::Sender<serde_json::Value>>>>,
    }

    let (tx, rx) = oneshot::channel();
    let state = CaptureState {
        tx: Arc::new(Mutex::new(Some(tx))),
    };
    let app = Router::new()
        .route(
            "/model/train",
            post(
                |State(state): State<CaptureState>, Json(payload): Json<serde_json::Value>| async move {
                    if let Some(tx) = state.tx.lock().await.take() {
                        let _ = tx.send(payload);
                    }
                    StatusCode::OK
                },
            ),
        )
        .with_state(state);
    let backend = HttpBackend::new(spawn_backend(app).await);

    backend.train_model(ModelId(11)).await.expect("train");

    let payload = rx.await.expect("captured payload");
    assert_eq!(payload, json!({ "model_id": 11 }));
}

#[tokio::test]
async fn trailing_slashes_in_the_server_url_are_tolerated() {
    let app = Router::new().route("/corpus", get(|| async { Json(json!([])) }));
    let server_url = spawn_backend(app).await;
    let backend = HttpBackend::new(format!("{server_url}///"));

    let corpora = backend.list_corpora().await.expect("list corpora");

    assert!(corpora.is_empty());
}
