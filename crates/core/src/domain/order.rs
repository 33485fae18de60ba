use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::plan::PlanSlug;
use crate::errors::DomainError;

pub const DEFAULT_COUNTRY: &str = "Shqipëri / Albania";

/// Subscription durations offered by the checkout form.
pub const OFFERED_TERMS: [u32; 4] = [1, 3, 6, 12];

/// Number of months paid up front. Always at least one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubscriptionTerm(u32);

impl SubscriptionTerm {
    pub fn new(months: u32) -> Result<Self, DomainError> {
        if months == 0 {
            return Err(DomainError::InvariantViolation(
                "duration must be at least one month".to_string(),
            ));
        }
        Ok(Self(months))
    }

    pub fn months(self) -> u32 {
        self.0
    }

    pub fn is_offered(self) -> bool {
        OFFERED_TERMS.contains(&self.0)
    }
}

impl fmt::Display for SubscriptionTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Duration as submitted by a client: the form posts it as a string
/// (`"3"`), API callers usually send a number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TermInput {
    Months(u32),
    Text(String),
}

impl TermInput {
    pub fn resolve(&self) -> Result<SubscriptionTerm, DomainError> {
        match self {
            Self::Months(months) => SubscriptionTerm::new(*months),
            Self::Text(raw) => {
                let months = raw.trim().parse::<u32>().map_err(|_| {
                    DomainError::InvariantViolation(format!("duration `{raw}` is not a number"))
                })?;
                SubscriptionTerm::new(months)
            }
        }
    }
}

impl Default for TermInput {
    fn default() -> Self {
        Self::Months(1)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderType {
    #[serde(rename = "rinovim")]
    Renewal,
    #[default]
    #[serde(rename = "lidhjeRe")]
    NewConnection,
}

impl OrderType {
    pub fn label(self) -> &'static str {
        match self {
            Self::Renewal => "Rinovim",
            Self::NewConnection => "Lidhje e Re",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub notes: String,
}

impl Default for CustomerDetails {
    fn default() -> Self {
        Self {
            first_name: String::new(),
            last_name: String::new(),
            country: default_country(),
            city: String::new(),
            address: String::new(),
            phone: String::new(),
            email: String::new(),
            notes: String::new(),
        }
    }
}

fn default_country() -> String {
    DEFAULT_COUNTRY.to_string()
}

impl CustomerDetails {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim()).trim().to_string()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let required = [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("city", &self.city),
            ("address", &self.address),
            ("phone", &self.phone),
            ("email", &self.email),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(DomainError::InvariantViolation(format!("{field} is required")));
            }
        }

        if !self.email.contains('@') {
            return Err(DomainError::InvariantViolation(format!(
                "email `{}` is not a valid address",
                self.email.trim()
            )));
        }

        Ok(())
    }
}

/// Manual order submitted from the checkout form. Totals are never taken
/// from the client; they are recomputed from the catalog.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub plan_slug: PlanSlug,
    #[serde(default)]
    pub duration: TermInput,
    #[serde(default, rename = "type")]
    pub order_type: OrderType,
    #[serde(flatten)]
    pub customer: CustomerDetails,
}

impl OrderRequest {
    pub fn validate(&self) -> Result<SubscriptionTerm, DomainError> {
        let term = self.duration.resolve()?;
        self.customer.validate()?;
        Ok(term)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CustomerDetails, OrderRequest, OrderType, SubscriptionTerm, TermInput};
    use crate::errors::DomainError;

    fn customer() -> CustomerDetails {
        CustomerDetails {
            first_name: "Arta".to_string(),
            last_name: "Hoxha".to_string(),
            city: "Kamëz".to_string(),
            address: "Rruga e Dritës 12".to_string(),
            phone: "+355690000000".to_string(),
            email: "arta@example.com".to_string(),
            ..CustomerDetails::default()
        }
    }

    #[test]
    fn zero_month_term_is_rejected() {
        assert!(matches!(SubscriptionTerm::new(0), Err(DomainError::InvariantViolation(_))));
        assert_eq!(SubscriptionTerm::new(7).map(SubscriptionTerm::months), Ok(7));
    }

    #[test]
    fn offered_terms_match_checkout_options() {
        let offered: Vec<u32> = (1..=12)
            .filter_map(|months| SubscriptionTerm::new(months).ok())
            .filter(|term| term.is_offered())
            .map(SubscriptionTerm::months)
            .collect();
        assert_eq!(offered, vec![1, 3, 6, 12]);
    }

    #[test]
    fn term_accepts_form_strings_and_numbers() {
        assert_eq!(TermInput::Text(" 6 ".to_string()).resolve().map(|t| t.months()), Ok(6));
        assert_eq!(TermInput::Months(12).resolve().map(|t| t.months()), Ok(12));
        assert!(TermInput::Text("six".to_string()).resolve().is_err());
    }

    #[test]
    fn order_request_parses_checkout_form_payload() {
        let request: OrderRequest = serde_json::from_value(json!({
            "planSlug": "turbo",
            "duration": "3",
            "type": "rinovim",
            "firstName": "Arta",
            "lastName": "Hoxha",
            "city": "Kamëz",
            "address": "Rruga e Dritës 12",
            "phone": "+355690000000",
            "email": "arta@example.com",
            "notes": ""
        }))
        .expect("payload should parse");

        assert_eq!(request.plan_slug.as_str(), "turbo");
        assert_eq!(request.order_type, OrderType::Renewal);
        assert_eq!(request.customer.country, "Shqipëri / Albania");
        assert_eq!(request.validate().map(|t| t.months()), Ok(3));
    }

    #[test]
    fn blank_required_field_is_named_in_the_violation() {
        let mut details = customer();
        details.phone = "   ".to_string();

        let error = details.validate().expect_err("phone is required");
        assert_eq!(error, DomainError::InvariantViolation("phone is required".to_string()));
    }

    #[test]
    fn full_name_trims_parts() {
        let mut details = customer();
        details.first_name = "  Arta ".to_string();
        details.last_name = String::new();
        assert_eq!(details.full_name(), "Arta");
    }
}
