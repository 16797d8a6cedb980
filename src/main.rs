use std::sync::Arc;

use hr_intake::config::IntakeConfig;
use hr_intake::manager::IntakeManager;
use hr_intake::routes::{intake_routes, IntakeRouteState};
use hr_intake::services::http::{HttpFileStore, HttpPincodeLookup, HttpRecordService};
use rust_decimal::Decimal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let api_token = std::env::var("HR_INTAKE_API_TOKEN").unwrap_or_else(|_| {
        eprintln!("Error: HR_INTAKE_API_TOKEN not set");
        eprintln!("  export HR_INTAKE_API_TOKEN=...");
        std::process::exit(1);
    });

    let backend_url = std::env::var("HR_INTAKE_BACKEND_URL")
        .unwrap_or_else(|_| "https://api.example.com/hr".to_string());
    let files_url =
        std::env::var("HR_INTAKE_FILES_URL").unwrap_or_else(|_| format!("{backend_url}/storage"));
    let pincode_url = std::env::var("HR_INTAKE_PINCODE_URL")
        .unwrap_or_else(|_| "https://api.postalpincode.in".to_string());
    let user_id = std::env::var("HR_INTAKE_USER_ID").unwrap_or_else(|_| "default".to_string());

    let port: u16 = std::env::var("HR_INTAKE_PORT")
        .unwrap_or_else(|_| "8090".to_string())
        .parse()
        .unwrap_or(8090);

    let mut config = IntakeConfig::default();
    if let Ok(threshold) = std::env::var("HR_INTAKE_GMC_THRESHOLD") {
        match threshold.parse::<Decimal>() {
            Ok(value) => config.gmc_salary_threshold = value,
            Err(e) => eprintln!("   Warning: ignoring bad HR_INTAKE_GMC_THRESHOLD: {e}"),
        }
    }
    if matches!(
        std::env::var("HR_INTAKE_VERIFY_PINCODES").as_deref(),
        Ok("0") | Ok("false")
    ) {
        config.verify_pincodes = false;
    }

    eprintln!("🗂  HR Intake v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {backend_url}");
    eprintln!("   Files: {files_url}");
    eprintln!("   GMC threshold: {}", config.gmc_salary_threshold);
    eprintln!("   API: http://0.0.0.0:{port}/api/intake/status\n");

    let token = secrecy::SecretString::from(api_token);
    let manager = Arc::new(IntakeManager::new(
        config,
        Arc::new(HttpPincodeLookup::new(pincode_url)),
        Arc::new(HttpFileStore::new(files_url, token.clone())),
        Arc::new(HttpRecordService::new(backend_url, token)),
        user_id,
    ));

    let app = intake_routes(IntakeRouteState { manager });
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!(port, "Intake API server started");
    axum::serve(listener, app).await?;

    Ok(())
}
