use std::sync::Arc;

use axum::Router;
use orientnet_core::catalog::{Catalog, CatalogError};
use orientnet_core::checkout::{PaymentError, PaymentGateway};
use orientnet_core::config::{AppConfig, ConfigError, LoadOptions};
use orientnet_core::pricing::DeterministicPricingEngine;
use orientnet_core::recommend::ScoreTableRecommender;
use thiserror::Error;
use tower_http::services::ServeDir;
use tracing::info;

use crate::api::{self, ApiState, CheckoutSettings};
use crate::health::{self, HealthState};
use crate::paypal::PaypalClient;

pub struct Application {
    pub config: AppConfig,
    pub state: ApiState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("plan catalog failed to load: {0}")]
    Catalog(#[from] CatalogError),
    #[error("payment gateway setup failed: {0}")]
    Payments(#[from] PaymentError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let catalog = Catalog::load(config.catalog.path.as_deref())?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        plans = catalog.len(),
        source = %config
            .catalog
            .path
            .as_deref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(|| "embedded".to_string()),
        "plan catalog loaded"
    );

    let payments = PaypalClient::from_config(&config.paypal)?
        .map(|client| Arc::new(client) as Arc<dyn PaymentGateway>);
    info!(
        event_name = "system.bootstrap.payments",
        correlation_id = "bootstrap",
        enabled = payments.is_some(),
        environment = ?config.paypal.environment,
        "payment gateway configured"
    );

    let state = ApiState::new(
        Arc::new(catalog),
        Arc::new(DeterministicPricingEngine::new(
            config.pricing.exchange_rate,
            config.pricing.foreign_currency.clone(),
        )),
        Arc::new(ScoreTableRecommender),
        payments,
        CheckoutSettings {
            public_base_url: config.server.public_base_url.clone(),
            charge_currency: config.paypal.charge_currency.clone(),
            whatsapp_number: config.whatsapp.office_number.clone(),
        },
    );

    Ok(Application { config, state })
}

impl Application {
    /// API, health and (when configured) the static site as fallback.
    pub fn router(&self) -> Router {
        let health_state = HealthState::new(self.state.catalog(), self.state.payments_enabled());
        let router = api::router(self.state.clone()).merge(health::router(health_state));

        match &self.config.server.static_dir {
            Some(dir) => router.fallback_service(ServeDir::new(dir)),
            None => router,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use orientnet_core::config::{ConfigOverrides, LoadOptions};
    use rust_decimal::Decimal;
    use tempfile::TempDir;
    use tower::ServiceExt;

    use crate::bootstrap::{bootstrap, bootstrap_with_config, BootstrapError};

    fn overrides(overrides: ConfigOverrides) -> LoadOptions {
        LoadOptions { overrides, ..LoadOptions::default() }
    }

    #[test]
    fn bootstrap_fails_fast_on_invalid_exchange_rate() {
        let result = bootstrap(overrides(ConfigOverrides {
            exchange_rate: Some(Decimal::ZERO),
            ..ConfigOverrides::default()
        }));

        let message = result.err().expect("error").to_string();
        assert!(message.contains("pricing.exchange_rate"));
    }

    #[test]
    fn bootstrap_reports_unreadable_catalog() {
        let dir = TempDir::new().expect("temp dir");
        let result = bootstrap(overrides(ConfigOverrides {
            catalog_path: Some(dir.path().join("missing.json")),
            ..ConfigOverrides::default()
        }));

        assert!(matches!(result, Err(BootstrapError::Catalog(_))));
    }

    #[tokio::test]
    async fn bootstrapped_router_serves_health_api_and_static_site() {
        let dir = TempDir::new().expect("temp dir");
        fs::write(dir.path().join("index.html"), "<h1>Orient Net</h1>").expect("write index");

        let mut config = orientnet_core::config::AppConfig::default();
        config.server.static_dir = Some(dir.path().to_path_buf());
        let app = bootstrap_with_config(config).expect("bootstrap").router();

        for (uri, expected) in [
            ("/health", StatusCode::OK),
            ("/api/plans/smart", StatusCode::OK),
            ("/index.html", StatusCode::OK),
            ("/nope.html", StatusCode::NOT_FOUND),
        ] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
                .await
                .expect("router responds");
            assert_eq!(response.status(), expected, "{uri}");
        }

        let response = app
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        let body = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        assert_eq!(&body[..], b"<h1>Orient Net</h1>");
    }
}
