use std::net::SocketAddr;
use std::sync::Arc;

use dotenv::dotenv;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{self, TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;
mod seed;

use booking_cell::models::BookingPolicy;
use booking_cell::state::BookingCellState;
use chat_cell::services::channel::ChatChannel;
use doctor_cell::services::directory::DoctorDirectory;
use hospital_cell::services::directory::HospitalDirectory;
use patient_cell::services::directory::PatientDirectory;
use shared_config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HealthNet API server");

    // Load configuration
    let config = Arc::new(AppConfig::from_env());

    // Build the shared directories and the booking core state
    let doctors = Arc::new(DoctorDirectory::new());
    let patients = Arc::new(PatientDirectory::new());
    let hospitals = Arc::new(HospitalDirectory::new());
    let policy = BookingPolicy {
        weekend_booking_allowed: config.weekend_booking_allowed,
    };
    let booking = Arc::new(BookingCellState::new(
        Arc::clone(&doctors),
        Arc::clone(&patients),
        Arc::clone(&hospitals),
        policy,
    ));
    let chat = ChatChannel::new();

    if config.seed_demo_data {
        seed::seed_demo_data(&hospitals, &doctors, &patients).await;
    }

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Build the application router
    let app = router::create_router(router::Cells {
        config: Arc::clone(&config),
        hospitals,
        doctors,
        patients,
        booking,
        chat,
    })
    .layer(
        TraceLayer::new_for_http()
            .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
            .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
    )
    .layer(cors);

    // Run the server
    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port).parse()?;
    info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
