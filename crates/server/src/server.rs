use axum::{
    Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::Response,
    routing::get,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Basic},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

use std::sync::Arc;

use crate::{settlement, user};
use engine::Engine;

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub db: DatabaseConnection,
}

async fn auth(
    auth_header: TypedHeader<Authorization<Basic>>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    if auth_header.username().is_empty() || auth_header.password().is_empty() {
        return Err(StatusCode::UNAUTHORIZED);
    }

    let user: Option<user::Model> = user::Entity::find()
        .filter(user::Column::Username.eq(auth_header.username()))
        .filter(user::Column::Password.eq(auth_header.password()))
        .one(&state.db)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let Some(user) = user else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

fn router(state: ServerState) -> Router {
    Router::new()
        .route("/sessions/{id}/settlement", get(settlement::get))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth))
        .with_state(state)
}

pub async fn run(engine: Engine, db: DatabaseConnection) {
    let listener = match tokio::net::TcpListener::bind("127.0.0.1:3000").await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind server listener: {err}");
            return;
        }
    };
    if let Err(err) = run_with_listener(engine, db, listener).await {
        tracing::error!("server failed: {err}");
    }
}

pub async fn run_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    let state = ServerState {
        engine: Arc::new(engine),
        db,
    };

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    engine: Engine,
    db: DatabaseConnection,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, db, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, header},
    };
    use base64::Engine as _;
    use http_body_util::BodyExt;
    use migration::MigratorTrait;
    use sea_orm::{ConnectionTrait, Database, Statement};
    use tower::ServiceExt;

    async fn state_with_fixtures() -> ServerState {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        migration::Migrator::up(&db, None).await.unwrap();
        let backend = db.get_database_backend();
        for (sql, values) in [
            (
                "INSERT INTO users (username, password, currency) VALUES (?, ?, ?)",
                vec!["alice".into(), "password".into(), "USD".into()],
            ),
            (
                "INSERT INTO sessions (id, name, created_by) VALUES (?, ?, ?)",
                vec!["trip-1".into(), "Rome".into(), "alice".into()],
            ),
            (
                "INSERT INTO session_members (session_id, user_id) VALUES (?, ?)",
                vec!["trip-1".into(), "alice".into()],
            ),
        ] {
            db.execute(Statement::from_sql_and_values(backend, sql, values))
                .await
                .unwrap();
        }

        let engine = Engine::builder().database(db.clone()).build().unwrap();
        ServerState {
            engine: Arc::new(engine),
            db,
        }
    }

    fn basic(username: &str, password: &str) -> String {
        let encoded =
            base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
        format!("Basic {encoded}")
    }

    #[tokio::test]
    async fn settlement_requires_auth() {
        let state = state_with_fixtures().await;
        let response = router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/sessions/trip-1/settlement")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        // missing Authorization header is rejected by the TypedHeader extractor
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn settlement_rejects_wrong_password() {
        let state = state_with_fixtures().await;
        let response = router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/sessions/trip-1/settlement")
                    .header(header::AUTHORIZATION, basic("alice", "nope"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn settlement_returns_empty_report_for_quiet_session() {
        let state = state_with_fixtures().await;
        let response = router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/sessions/trip-1/settlement")
                    .header(header::AUTHORIZATION, basic("alice", "password"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let report: api_types::settlement::SettlementResponse =
            serde_json::from_slice(&body).unwrap();
        assert!(report.settlements.is_empty());
        assert_eq!(report.session_usage.total_budget, 0.0);
    }

    #[tokio::test]
    async fn settlement_unknown_session_is_404() {
        let state = state_with_fixtures().await;
        let response = router(state)
            .oneshot(
                HttpRequest::builder()
                    .uri("/sessions/nope/settlement")
                    .header(header::AUTHORIZATION, basic("alice", "password"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
