#[tokio::main]
async fn main() {
    shelfline_observability::init();

    let data_path = std::env::var("SHELFLINE_DATA").unwrap_or_else(|_| {
        tracing::warn!("SHELFLINE_DATA not set; using ./grocery_data.csv");
        "grocery_data.csv".to_string()
    });
    let addr = std::env::var("SHELFLINE_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = shelfline_api::app::build_app(std::path::Path::new(&data_path))
        .expect("failed to initialize service");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {addr}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
