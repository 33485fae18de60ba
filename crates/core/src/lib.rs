pub mod catalog;
pub mod checkout;
pub mod config;
pub mod domain;
pub mod errors;
pub mod pricing;
pub mod recommend;

pub use catalog::{Catalog, CatalogError};
pub use checkout::{
    CapturedPayment, CreatedPayment, OrderSummary, PaymentError, PaymentGateway, PaymentOrder,
};
pub use domain::order::{CustomerDetails, OrderRequest, OrderType, SubscriptionTerm, TermInput};
pub use domain::plan::{Plan, PlanSlug};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use pricing::{DeterministicPricingEngine, PricingEngine, PricingError, PricingResult};
pub use recommend::{
    DeviceFlags, HouseholdSize, Questionnaire, Recommendation, Recommender, ScoreTableRecommender,
    ScoredPlan,
};
