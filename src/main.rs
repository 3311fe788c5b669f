mod api;
mod handlers;
mod models;
mod services;

use anyhow::Result;
use dotenv::dotenv;
use std::env;
use std::sync::Arc;

use handlers::AnalysisHandler;
use services::{AiGatewayClient, InferenceService};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logger
    env_logger::init();

    // Load environment variables
    dotenv().ok();

    log::info!("🚀 Starting Recycling Scan API...");

    // Load configuration. A missing credential is reported per-request as a
    // configuration error, the process still starts.
    let api_key = match env::var("AI_GATEWAY_API_KEY") {
        Ok(key) => Some(key),
        Err(_) => {
            log::warn!("⚠️ AI_GATEWAY_API_KEY not set, analysis requests will fail until it is configured");
            None
        }
    };

    let model = env::var("AI_GATEWAY_MODEL")
        .unwrap_or_else(|_| "google/gemini-2.5-flash".to_string());
    let endpoint = env::var("AI_GATEWAY_URL")
        .unwrap_or_else(|_| "https://ai.gateway.lovable.dev/v1/chat/completions".to_string());

    let gateway = Arc::new(AiGatewayClient::new(api_key, model.clone(), endpoint));
    let inference = gateway as Arc<dyn InferenceService>;
    log::info!("✅ AI gateway client initialized with model: {}", model);

    let analysis_handler = Arc::new(AnalysisHandler::new(inference));
    log::info!("✅ Analysis handler initialized");

    // Start HTTP server
    #[cfg(feature = "http-server")]
    {
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let server_addr = format!("0.0.0.0:{}", port);
        let app = api::server::create_router(analysis_handler.clone());

        log::info!("🌐 HTTP server starting on {}", server_addr);

        tokio::spawn(async move {
            let listener = tokio::net::TcpListener::bind(&server_addr)
                .await
                .expect("Failed to bind HTTP server");
            axum::serve(listener, app)
                .await
                .expect("Failed to start HTTP server");
        });

        log::info!("✅ HTTP server started");

        println!("\n♻️ Recycling Scan API is running!");
        println!("🌐 Endpoint: http://localhost:{}/analyze", port);
        println!("💚 Health check: http://localhost:{}/health", port);
        println!("\n🛑 Press Ctrl+C to stop\n");
    }

    #[cfg(not(feature = "http-server"))]
    {
        let _ = analysis_handler;
        log::warn!("⚠️ Built without the http-server feature, no inbound transport is running");
    }

    log::info!("🎉 Service is ready!");

    // Keep running
    tokio::signal::ctrl_c().await?;

    log::info!("🛑 Shutting down...");

    Ok(())
}
