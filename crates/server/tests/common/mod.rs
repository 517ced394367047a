#![allow(dead_code)]

//! Shared harness for the server integration tests: spins the real router
//! up on an ephemeral port around a scripted mock store.

use buyback::TableStore;
use buyback_postgrest::StoreConfig;
use buyback_server::{config::Config, router::create_router, state::with_store};
use buyback_test_utils::MockTableStore;
use std::sync::Arc;
use tokio::{net::TcpListener, sync::oneshot};

/// A running server instance plus the handles the tests assert with.
pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub store: Arc<MockTableStore>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the full application against a fresh mock store.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(MockTableStore::new())).await
    }

    /// Spawns the application against a pre-scripted store.
    pub async fn spawn_with_store(store: Arc<MockTableStore>) -> Self {
        let config = Config {
            port: 0,
            store: StoreConfig {
                url: "http://store.local".to_string(),
                service_role_key: "service-role-test-key".to_string(),
            },
        };

        let dyn_store: Arc<dyn TableStore> = store.clone();
        let app = create_router(with_store(config, dyn_store));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let address = format!("http://{}", listener.local_addr().unwrap());

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            address,
            client: reqwest::Client::new(),
            store,
            shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.address)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Builds a well-formed semicolon-delimited price CSV with `rows` data rows.
pub fn price_csv(rows: usize) -> String {
    let mut csv = String::from("brand;model;storage_gb;base_price\n");
    for i in 0..rows {
        csv.push_str(&format!("Apple;iPhone {i};128;450\n"));
    }
    csv
}
