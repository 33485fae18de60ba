use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::plan::{Plan, PlanSlug};
use crate::recommend::ScoredPlan;

const EMBEDDED_PLANS: &str = include_str!("../../../content/plans.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("could not read plan catalog `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse plan catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("plan catalog is empty")]
    Empty,
    #[error("plan slug `{0}` appears more than once")]
    DuplicateSlug(PlanSlug),
    #[error("plan `{slug}` has a negative price ({price})")]
    NegativePrice { slug: PlanSlug, price: Decimal },
    #[error("plan catalog has no `{0}` plan, which the recommender can return")]
    MissingScoredPlan(&'static str),
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    plans: Vec<Plan>,
    #[serde(default)]
    included: Vec<String>,
}

/// Plan catalog, loaded once at startup and never mutated afterwards.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    plans: Vec<Plan>,
    included: Vec<String>,
}

impl Catalog {
    pub fn embedded() -> Result<Self, CatalogError> {
        Self::from_json(EMBEDDED_PLANS)
    }

    /// Reads the catalog from `path`, or the embedded content when unset.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| CatalogError::ReadFile {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json(&raw)
            }
            None => Self::embedded(),
        }
    }

    pub fn from_json(raw: &str) -> Result<Self, CatalogError> {
        let document: CatalogDocument = serde_json::from_str(raw)?;
        Self::validated(document.plans, document.included)
    }

    fn validated(plans: Vec<Plan>, included: Vec<String>) -> Result<Self, CatalogError> {
        if plans.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for plan in &plans {
            if !seen.insert(plan.slug.as_str()) {
                return Err(CatalogError::DuplicateSlug(plan.slug.clone()));
            }
            if plan.price_all < Decimal::ZERO {
                return Err(CatalogError::NegativePrice {
                    slug: plan.slug.clone(),
                    price: plan.price_all,
                });
            }
        }

        if let Some(missing) =
            ScoredPlan::ALL.iter().find(|scored| !seen.contains(scored.slug()))
        {
            return Err(CatalogError::MissingScoredPlan(missing.slug()));
        }

        Ok(Self { plans, included })
    }

    pub fn find(&self, slug: &PlanSlug) -> Option<&Plan> {
        self.plans.iter().find(|plan| &plan.slug == slug)
    }

    pub fn find_scored(&self, scored: ScoredPlan) -> Option<&Plan> {
        self.plans.iter().find(|plan| plan.slug.as_str() == scored.slug())
    }

    pub fn plans(&self) -> &[Plan] {
        &self.plans
    }

    /// Perks shared by every plan (installation, router, support).
    pub fn included(&self) -> &[String] {
        &self.included
    }

    pub fn len(&self) -> usize {
        self.plans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plans.is_empty()
    }
}
