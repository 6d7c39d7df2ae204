use eframe::egui;
use std::sync::Arc;
use streamlet::application::auth_service::AuthGateway;
use streamlet::application::trailer_service::TrailerService;
use streamlet::domain::models::AppConfig;
use streamlet::domain::traits::ConfigStore;
use streamlet::infrastructure::catalog_client::ReqwestCatalogClient;
use streamlet::infrastructure::config_store::FileConfigStore;
use streamlet::infrastructure::firestore_client::ReqwestDocumentStore;
use streamlet::infrastructure::identity_client::ReqwestIdentityProvider;
use streamlet::presentation::ui::StreamletApp;
use tokio::runtime::Runtime;

fn main() -> eframe::Result<()> {
    env_logger::init();

    // Dependency Injection
    let config_store = Arc::new(FileConfigStore::new());
    let config = match config_store.load() {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Falling back to default settings: {}", e);
            AppConfig::default()
        }
    };
    let config = config.with_env_overrides();

    let identity = Arc::new(
        ReqwestIdentityProvider::new(&config).expect("Failed to create identity client"),
    );
    let store =
        Arc::new(ReqwestDocumentStore::new(&config).expect("Failed to create document store"));
    let catalog =
        Arc::new(ReqwestCatalogClient::new(&config).expect("Failed to create catalog client"));

    let auth_gateway = Arc::new(AuthGateway::new(identity, store));
    let trailer_service = Arc::new(TrailerService::new(catalog));
    let rt = Runtime::new().expect("Failed to start async runtime");

    // Create App
    let app = StreamletApp::new(auth_gateway, trailer_service, config_store, config, rt);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([720.0, 540.0])
            .with_resizable(true),
        renderer: eframe::Renderer::Glow,
        ..Default::default()
    };

    eframe::run_native("Streamlet", options, Box::new(|_cc| Ok(Box::new(app))))
}
