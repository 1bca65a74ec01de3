use daybook_api::{app, AppState};
use daybook_auth::{CognitoIdentityProvider, JwtVerifier, StaticIdentityProvider, TokenVerifier};
use daybook_store::{DynamoRecordStore, MemoryRecordStore};
use tracing_subscriber::EnvFilter;

fn env_or(name: &str, default: &str) -> String {
    std::env::var(name).unwrap_or_else(|_| default.to_string())
}

async fn serve(router: axum::Router, port: u16) {
    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("failed to bind address");
    tracing::info!(%addr, "server starting");
    axum::serve(listener, router).await.expect("server error");
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let port: u16 = env_or("PORT", "3000").parse().expect("invalid PORT");

    // With no issuer configured the service runs self-contained: in-memory
    // records, in-process accounts, bearer token taken as the user id.
    // That mode exists for local development only.
    match std::env::var("AUTH_ISSUER") {
        Ok(issuer) => {
            let client_id = std::env::var("AUTH_CLIENT_ID").expect("AUTH_CLIENT_ID is required");
            let table_name = env_or("TABLE_NAME", "daybook-records");

            let verifier = JwtVerifier::from_issuer(&issuer, Some(client_id.clone()))
                .await
                .expect("failed to load JWKS");
            let store = DynamoRecordStore::new(&table_name).await;
            let idp = CognitoIdentityProvider::new(client_id).await;

            let state = AppState::new(store, idp, TokenVerifier::Jwt(verifier));
            serve(app(state), port).await;
        }
        Err(_) => {
            tracing::warn!("AUTH_ISSUER not set; running with in-memory store and insecure auth");
            let state = AppState::new(
                MemoryRecordStore::new(),
                StaticIdentityProvider::new(),
                TokenVerifier::Insecure,
            );
            serve(app(state), port).await;
        }
    }
}
