//! JSON API for the marketing site.
//!
//! - `GET  /api/plans`                 catalog with formatted prices
//! - `GET  /api/plans/{slug}`          single plan
//! - `POST /api/recommend`             questionnaire to recommended plan
//! - `POST /api/quote`                 plan and duration to totals
//! - `POST /api/order`                 manual order hand-off over WhatsApp
//! - `POST /api/paypal/create-order`   start a PayPal checkout
//! - `GET  /api/paypal/capture-order`  PayPal return URL, redirects

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use orientnet_core::catalog::Catalog;
use orientnet_core::checkout::{
    find_plan, whatsapp, OrderSummary, PaymentError, PaymentGateway, PaymentOrder, CANCEL_PATH,
    SUCCESS_PATH,
};
use orientnet_core::domain::order::{CustomerDetails, OrderRequest, SubscriptionTerm, TermInput};
use orientnet_core::domain::plan::{Plan, PlanSlug};
use orientnet_core::errors::{ApplicationError, DomainError, InterfaceError};
use orientnet_core::pricing::{money, PricingEngine, PricingResult};
use orientnet_core::recommend::{PlanScore, Questionnaire, Recommender};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::paypal::is_valid_order_id;

#[derive(Clone, Debug)]
pub struct CheckoutSettings {
    pub public_base_url: String,
    pub charge_currency: String,
    pub whatsapp_number: String,
}

#[derive(Clone)]
pub struct ApiState {
    catalog: Arc<Catalog>,
    pricing: Arc<dyn PricingEngine>,
    recommender: Arc<dyn Recommender>,
    payments: Option<Arc<dyn PaymentGateway>>,
    checkout: Arc<CheckoutSettings>,
}

impl ApiState {
    pub fn new(
        catalog: Arc<Catalog>,
        pricing: Arc<dyn PricingEngine>,
        recommender: Arc<dyn Recommender>,
        payments: Option<Arc<dyn PaymentGateway>>,
        checkout: CheckoutSettings,
    ) -> Self {
        Self { catalog, pricing, recommender, payments, checkout: Arc::new(checkout) }
    }

    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    pub fn payments_enabled(&self) -> bool {
        self.payments.is_some()
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub error: String,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanView {
    #[serde(flatten)]
    pub plan: Plan,
    pub monthly_display: String,
}

impl From<&Plan> for PlanView {
    fn from(plan: &Plan) -> Self {
        Self { plan: plan.clone(), monthly_display: money::format_local(plan.price_all) }
    }
}

#[derive(Debug, Serialize)]
pub struct PlansResponse {
    pub plans: Vec<PlanView>,
    pub included: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendResponse {
    pub slug: String,
    pub name: String,
    pub scores: Vec<PlanScore>,
    pub overridden: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub plan_slug: PlanSlug,
    #[serde(default)]
    pub duration: TermInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub plan_slug: PlanSlug,
    pub plan_name: String,
    pub months: u32,
    pub offered_term: bool,
    pub monthly_display: String,
    pub total_local_display: String,
    pub total_foreign_display: String,
    pub pricing: PricingResult,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub ok: bool,
    pub order_id: String,
    pub total_local: String,
    pub total_foreign: String,
    pub whatsapp_url: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub plan_slug: PlanSlug,
    #[serde(default)]
    pub duration: TermInput,
    #[serde(default)]
    pub customer: Option<CustomerDetails>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentResponse {
    pub id: String,
    pub approval_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CaptureQuery {
    pub token: Option<String>,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/plans", get(list_plans))
        .route("/api/plans/{slug}", get(get_plan))
        .route("/api/recommend", post(recommend))
        .route("/api/quote", post(quote))
        .route("/api/order", post(submit_order))
        .route("/api/paypal/create-order", post(create_payment))
        .route("/api/paypal/capture-order", get(capture_payment))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn list_plans(State(state): State<ApiState>) -> Json<PlansResponse> {
    Json(PlansResponse {
        plans: state.catalog.plans().iter().map(PlanView::from).collect(),
        included: state.catalog.included().to_vec(),
    })
}

async fn get_plan(Path(slug): Path<String>, State(state): State<ApiState>) -> ApiResult<PlanView> {
    let slug = PlanSlug(slug);
    let plan = find_plan(&state.catalog, &slug)
        .map_err(|error| domain_error(error, &new_correlation_id()))?;
    Ok(Json(PlanView::from(plan)))
}

async fn recommend(
    State(state): State<ApiState>,
    Json(questionnaire): Json<Questionnaire>,
) -> ApiResult<RecommendResponse> {
    let correlation_id = new_correlation_id();
    let recommendation = state.recommender.evaluate(&questionnaire);

    let plan = state.catalog.find_scored(recommendation.plan).ok_or_else(|| {
        error!(
            event_name = "recommend.catalog_mismatch",
            correlation_id = %correlation_id,
            plan = %recommendation.plan,
            "recommended plan is missing from the catalog"
        );
        interface_error(InterfaceError::Internal {
            message: format!("plan `{}` is not in the catalog", recommendation.plan),
            correlation_id: correlation_id.clone(),
        })
    })?;

    info!(
        event_name = "recommend.evaluated",
        correlation_id = %correlation_id,
        household = %questionnaire.household.as_str(),
        plan = %recommendation.plan,
        overridden = recommendation.overridden,
        "questionnaire evaluated"
    );

    Ok(Json(RecommendResponse {
        slug: plan.slug.to_string(),
        name: plan.name.clone(),
        scores: recommendation.scores,
        overridden: recommendation.overridden,
    }))
}

async fn quote(
    State(state): State<ApiState>,
    Json(request): Json<QuoteRequest>,
) -> ApiResult<QuoteResponse> {
    let correlation_id = new_correlation_id();
    let (plan, term, pricing) =
        price_request(&state, &request.plan_slug, &request.duration, &correlation_id)?;

    Ok(Json(QuoteResponse {
        plan_slug: plan.slug.clone(),
        plan_name: plan.name.clone(),
        months: pricing.months,
        offered_term: term.is_offered(),
        monthly_display: money::format_local(pricing.monthly_local),
        total_local_display: money::format_local(pricing.total_local),
        total_foreign_display: money::format_foreign(
            pricing.total_foreign,
            &pricing.foreign_currency,
        ),
        pricing,
    }))
}

async fn submit_order(
    State(state): State<ApiState>,
    Json(request): Json<OrderRequest>,
) -> ApiResult<OrderResponse> {
    let order_id = format!("ORD-{}", &Uuid::new_v4().simple().to_string()[..12]);
    let summary = OrderSummary::prepare(&state.catalog, state.pricing.as_ref(), &request)
        .map_err(|error| domain_error(error, &order_id))?;

    info!(
        event_name = "checkout.order.received",
        correlation_id = %order_id,
        plan = %summary.plan_slug,
        months = summary.term.months(),
        order_type = summary.order_type.label(),
        city = %summary.customer.city,
        total_local = %summary.pricing.total_local,
        total_foreign = %summary.pricing.total_foreign,
        "manual order received"
    );

    let message = whatsapp::order_message(&summary);
    let whatsapp_url = whatsapp::deep_link(&state.checkout.whatsapp_number, &message);

    Ok(Json(OrderResponse {
        ok: true,
        total_local: summary.total_local_display(),
        total_foreign: summary.total_foreign_display(),
        order_id,
        whatsapp_url,
    }))
}

async fn create_payment(
    State(state): State<ApiState>,
    Json(request): Json<PaymentRequest>,
) -> ApiResult<PaymentResponse> {
    let correlation_id = new_correlation_id();
    let Some(gateway) = state.payments.clone() else {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiError {
                error: PaymentError::Disabled.to_string(),
                correlation_id,
                details: None,
            }),
        ));
    };

    if let Some(customer) = &request.customer {
        customer.validate().map_err(|error| domain_error(error, &correlation_id))?;
    }

    let (plan, term, pricing) =
        price_request(&state, &request.plan_slug, &request.duration, &correlation_id)?;
    let order = PaymentOrder::new(
        &plan.name,
        term,
        &pricing,
        &state.checkout.charge_currency,
        &state.checkout.public_base_url,
    );

    let created = gateway.create_order(&order).await.map_err(|error| {
        warn!(
            event_name = "checkout.paypal.create_failed",
            correlation_id = %correlation_id,
            plan = %plan.slug,
            error = %error,
            "paypal order creation failed"
        );
        payment_error(error, &correlation_id)
    })?;

    Ok(Json(PaymentResponse { id: created.id, approval_url: created.approval_url }))
}

async fn capture_payment(
    State(state): State<ApiState>,
    Query(query): Query<CaptureQuery>,
) -> Redirect {
    let token = query.token.unwrap_or_default();
    let (Some(gateway), true) = (state.payments.clone(), is_valid_order_id(&token)) else {
        warn!(
            event_name = "checkout.paypal.capture_skipped",
            correlation_id = %token,
            "capture requested without a usable token or with payments disabled"
        );
        return Redirect::temporary(CANCEL_PATH);
    };

    match gateway.capture_order(&token).await {
        Ok(captured) => {
            info!(
                event_name = "checkout.paypal.captured",
                correlation_id = %captured.id,
                status = %captured.status,
                "paypal order captured"
            );
            Redirect::temporary(SUCCESS_PATH)
        }
        Err(error) => {
            warn!(
                event_name = "checkout.paypal.capture_failed",
                correlation_id = %token,
                error = %error,
                "paypal capture failed"
            );
            Redirect::temporary(CANCEL_PATH)
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn price_request<'a>(
    state: &'a ApiState,
    slug: &PlanSlug,
    duration: &TermInput,
    correlation_id: &str,
) -> Result<(&'a Plan, SubscriptionTerm, PricingResult), (StatusCode, Json<ApiError>)> {
    let term = duration.resolve().map_err(|error| domain_error(error, correlation_id))?;
    let plan =
        find_plan(&state.catalog, slug).map_err(|error| domain_error(error, correlation_id))?;
    let pricing = state
        .pricing
        .price(plan, term)
        .map_err(|error| domain_error(DomainError::from(error), correlation_id))?;
    Ok((plan, term, pricing))
}

fn new_correlation_id() -> String {
    Uuid::new_v4().to_string()
}

fn domain_error(error: DomainError, correlation_id: &str) -> (StatusCode, Json<ApiError>) {
    if matches!(error, DomainError::Pricing(_)) {
        error!(
            event_name = "pricing.failed",
            correlation_id = %correlation_id,
            error = %error,
            "pricing failed"
        );
    }
    interface_error(ApplicationError::from(error).into_interface(correlation_id))
}

fn interface_error(error: InterfaceError) -> (StatusCode, Json<ApiError>) {
    let status = match &error {
        InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ApiError {
            error: error.message().to_string(),
            correlation_id: error.correlation_id().to_string(),
            details: None,
        }),
    )
}

fn payment_error(error: PaymentError, correlation_id: &str) -> (StatusCode, Json<ApiError>) {
    let (status, details) = match &error {
        PaymentError::Disabled => (StatusCode::FORBIDDEN, None),
        PaymentError::Rejected { body, .. } => {
            (StatusCode::BAD_REQUEST, Some(body.clone()).filter(|body| !body.is_null()))
        }
        PaymentError::InvalidResponse(_) => (StatusCode::BAD_GATEWAY, None),
        PaymentError::Authentication(_) | PaymentError::Transport(_) => {
            return interface_error(
                ApplicationError::Integration(error.to_string()).into_interface(correlation_id),
            );
        }
    };
    (
        status,
        Json(ApiError { error: error.to_string(), correlation_id: correlation_id.to_string(), details }),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use orientnet_core::catalog::Catalog;
    use orientnet_core::checkout::{
        CapturedPayment, CreatedPayment, PaymentError, PaymentGateway, PaymentOrder,
    };
    use orientnet_core::pricing::DeterministicPricingEngine;
    use orientnet_core::recommend::ScoreTableRecommender;
    use rust_decimal::Decimal;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::{router, ApiState, CheckoutSettings};

    #[derive(Default)]
    struct FakeGateway {
        orders: Mutex<Vec<PaymentOrder>>,
        captures: Mutex<Vec<String>>,
        reject_with: Option<PaymentError>,
    }

    #[async_trait]
    impl PaymentGateway for FakeGateway {
        async fn create_order(&self, order: &PaymentOrder) -> Result<CreatedPayment, PaymentError> {
            if let Some(error) = &self.reject_with {
                return Err(error.clone());
            }
            self.orders.lock().expect("orders lock").push(order.clone());
            Ok(CreatedPayment {
                id: "PAYID-1".to_string(),
                approval_url: Some("https://paypal.test/approve/PAYID-1".to_string()),
            })
        }

        async fn capture_order(&self, order_id: &str) -> Result<CapturedPayment, PaymentError> {
            if let Some(error) = &self.reject_with {
                return Err(error.clone());
            }
            self.captures.lock().expect("captures lock").push(order_id.to_string());
            Ok(CapturedPayment { id: order_id.to_string(), status: "COMPLETED".to_string() })
        }
    }

    fn state_with(rate: Decimal, payments: Option<Arc<FakeGateway>>) -> ApiState {
        ApiState::new(
            Arc::new(Catalog::embedded().expect("embedded catalog")),
            Arc::new(DeterministicPricingEngine::new(rate, "EUR")),
            Arc::new(ScoreTableRecommender),
            payments.map(|gateway| gateway as Arc<dyn PaymentGateway>),
            CheckoutSettings {
                public_base_url: "https://orientnet.al".to_string(),
                charge_currency: "EUR".to_string(),
                whatsapp_number: "+355 68 666 6419".to_string(),
            },
        )
    }

    fn app() -> Router {
        router(state_with(Decimal::from(100), None))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response =
            app.oneshot(request.body(body).expect("request")).await.expect("router responds");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    fn order_body(plan: &str, duration: Value) -> Value {
        json!({
            "planSlug": plan,
            "duration": duration,
            "type": "rinovim",
            "firstName": "Arta",
            "lastName": "Hoxha",
            "city": "Kamëz",
            "address": "Rruga e Dritës 12",
            "phone": "+355690000000",
            "email": "arta@example.com"
        })
    }

    #[tokio::test]
    async fn plans_are_listed_with_formatted_prices() {
        let (status, body) = send(app(), "GET", "/api/plans", None).await;

        assert_eq!(status, StatusCode::OK);
        let plans = body["plans"].as_array().expect("plans array");
        assert_eq!(plans.len(), 5);
        assert_eq!(plans[0]["slug"], "standarte");
        assert_eq!(plans[0]["monthlyDisplay"], "1,300L");
        assert!(!body["included"].as_array().expect("included").is_empty());
    }

    #[tokio::test]
    async fn unknown_plan_is_404_with_message() {
        let (status, body) = send(app(), "GET", "/api/plans/giga", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "plan not found");
        assert!(body["correlationId"].as_str().is_some_and(|id| !id.is_empty()));
    }

    #[tokio::test]
    async fn recommend_returns_catalog_plan_and_scores() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/recommend",
            Some(json!({ "household": "4-7", "devices": { "gaming": true, "tvAndPc": true } })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "turbo");
        assert_eq!(body["name"], "Turbo");
        assert_eq!(body["overridden"], false);
        assert_eq!(body["scores"][2], json!({ "plan": "turbo", "score": 7 }));
    }

    #[tokio::test]
    async fn recommend_for_business_is_premium() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/recommend",
            Some(json!({ "household": "biznes", "devices": { "camera": true } })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "premium");
        assert_eq!(body["overridden"], true);
    }

    #[tokio::test]
    async fn empty_questionnaire_recommends_smart() {
        let (status, body) = send(app(), "POST", "/api/recommend", Some(json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "smart");
    }

    #[tokio::test]
    async fn quote_computes_totals_server_side() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/quote",
            Some(json!({ "planSlug": "standarte", "duration": 3 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["months"], 3);
        assert_eq!(body["offeredTerm"], true);
        assert_eq!(body["totalLocalDisplay"], "3,900L");
        assert_eq!(body["totalForeignDisplay"], "39.00 EUR");
    }

    #[tokio::test]
    async fn quote_accepts_numeric_strings_and_flags_unoffered_terms() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/quote",
            Some(json!({ "planSlug": "smart", "duration": "5" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["offeredTerm"], false);
        assert_eq!(body["totalLocalDisplay"], "8,000L");
    }

    #[tokio::test]
    async fn quote_with_zero_duration_is_rejected() {
        let (status, _) = send(
            app(),
            "POST",
            "/api/quote",
            Some(json!({ "planSlug": "smart", "duration": 0 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn quote_with_invalid_exchange_rate_is_internal_error() {
        let app = router(state_with(Decimal::ZERO, None));
        let (status, body) = send(
            app,
            "POST",
            "/api/quote",
            Some(json!({ "planSlug": "smart", "duration": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().is_some_and(|msg| msg.contains("exchange rate")));
    }

    #[tokio::test]
    async fn order_returns_totals_and_whatsapp_link() {
        let (status, body) =
            send(app(), "POST", "/api/order", Some(order_body("standarte", json!(3)))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["ok"], true);
        assert!(body["orderId"].as_str().is_some_and(|id| id.starts_with("ORD-")));
        assert_eq!(body["totalLocal"], "3,900L");
        assert_eq!(body["totalForeign"], "39.00 EUR");
        let link = body["whatsappUrl"].as_str().expect("whatsapp url");
        assert!(link.starts_with("https://wa.me/355686666419?text="));
        assert!(link.contains("Rinovim"));
    }

    #[tokio::test]
    async fn order_missing_customer_fields_is_bad_request() {
        let mut body = order_body("smart", json!(1));
        body["email"] = json!("not-an-email");

        let (status, _) = send(app(), "POST", "/api/order", Some(body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn paypal_disabled_is_forbidden() {
        let (status, body) = send(
            app(),
            "POST",
            "/api/paypal/create-order",
            Some(json!({ "planSlug": "smart", "duration": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "payments are disabled");
    }

    #[tokio::test]
    async fn paypal_order_is_priced_from_catalog() {
        let gateway = Arc::new(FakeGateway::default());
        let app = router(state_with(Decimal::from(100), Some(Arc::clone(&gateway))));

        let (status, body) = send(
            app,
            "POST",
            "/api/paypal/create-order",
            Some(json!({ "planSlug": "turbo", "duration": 6, "totalEur": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["id"], "PAYID-1");
        assert_eq!(body["approvalUrl"], "https://paypal.test/approve/PAYID-1");

        let orders = gateway.orders.lock().expect("orders lock");
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].value, "120.00");
        assert_eq!(orders[0].description, "Orient Net - Turbo (6 muaj)");
        assert_eq!(orders[0].return_url, "https://orientnet.al/api/paypal/capture-order");
    }

    #[tokio::test]
    async fn paypal_rejection_is_bad_request_with_upstream_body() {
        let gateway = Arc::new(FakeGateway {
            reject_with: Some(PaymentError::Rejected {
                status: 422,
                body: json!({ "name": "UNPROCESSABLE_ENTITY" }),
            }),
            ..FakeGateway::default()
        });
        let app = router(state_with(Decimal::from(100), Some(gateway)));

        let (status, body) = send(
            app,
            "POST",
            "/api/paypal/create-order",
            Some(json!({ "planSlug": "smart", "duration": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["name"], "UNPROCESSABLE_ENTITY");
    }

    #[tokio::test]
    async fn paypal_transport_failure_is_service_unavailable() {
        let gateway = Arc::new(FakeGateway {
            reject_with: Some(PaymentError::Transport("connection refused".to_string())),
            ..FakeGateway::default()
        });
        let app = router(state_with(Decimal::from(100), Some(gateway)));

        let (status, body) = send(
            app,
            "POST",
            "/api/paypal/create-order",
            Some(json!({ "planSlug": "smart", "duration": 1 })),
        )
        .await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "payment provider request failed: connection refused");
        assert!(body["correlationId"].as_str().is_some_and(|id| !id.is_empty()));
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn capture_redirects_to_success() {
        let gateway = Arc::new(FakeGateway::default());
        let app = router(state_with(Decimal::from(100), Some(Arc::clone(&gateway))));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/paypal/capture-order?token=5O190127TN364715T")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/checkout/success");
        assert_eq!(*gateway.captures.lock().expect("captures lock"), vec!["5O190127TN364715T"]);
    }

    #[tokio::test]
    async fn capture_without_token_redirects_to_cancel() {
        let gateway = Arc::new(FakeGateway::default());
        let app = router(state_with(Decimal::from(100), Some(Arc::clone(&gateway))));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/paypal/capture-order")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], "/checkout/cancel");
        assert!(gateway.captures.lock().expect("captures lock").is_empty());
    }

    #[tokio::test]
    async fn failed_capture_redirects_to_cancel() {
        let gateway = Arc::new(FakeGateway {
            reject_with: Some(PaymentError::Rejected { status: 422, body: json!({}) }),
            ..FakeGateway::default()
        });
        let app = router(state_with(Decimal::from(100), Some(gateway)));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/paypal/capture-order?token=ABC123")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("router responds");

        assert_eq!(response.headers()[header::LOCATION], "/checkout/cancel");
    }
}
