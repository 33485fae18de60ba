//! Score table and selection for plan recommendations

use super::types::*;
use super::BASELINE_SCORES;

/// Per-call score table. Built fresh for every questionnaire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoreTable {
    scores: [u32; 5],
}

impl Default for ScoreTable {
    fn default() -> Self {
        Self { scores: BASELINE_SCORES }
    }
}

impl ScoreTable {
    pub fn add(&mut self, plan: ScoredPlan, points: u32) {
        self.scores[plan.index()] += points;
    }

    pub fn score(&self, plan: ScoredPlan) -> u32 {
        self.scores[plan.index()]
    }

    /// Highest score; on ties the plan declared first in
    /// [`ScoredPlan::ALL`] wins.
    pub fn best(&self) -> ScoredPlan {
        let mut best = ScoredPlan::ALL[0];
        for plan in ScoredPlan::ALL {
            if self.score(plan) > self.score(best) {
                best = plan;
            }
        }
        best
    }

    pub fn entries(&self) -> Vec<PlanScore> {
        ScoredPlan::ALL.iter().map(|&plan| PlanScore { plan, score: self.score(plan) }).collect()
    }

    fn apply(&mut self, questionnaire: &Questionnaire) {
        let devices = questionnaire.devices;

        match questionnaire.household {
            HouseholdSize::OneToThree => {
                self.add(ScoredPlan::Smart, 2);
                self.add(ScoredPlan::Standarte, 1);
                if devices.gaming {
                    self.add(ScoredPlan::Turbo, 3);
                }
                if devices.tv_and_pc {
                    self.add(ScoredPlan::Smart, 2);
                }
                if devices.camera {
                    self.add(ScoredPlan::Smart, 1);
                }
            }
            HouseholdSize::FourToSeven => {
                self.add(ScoredPlan::Smart, 2);
                self.add(ScoredPlan::Turbo, 2);
                if devices.gaming {
                    self.add(ScoredPlan::Turbo, 3);
                }
                if devices.tv_and_pc {
                    self.add(ScoredPlan::Turbo, 2);
                }
                if devices.camera {
                    self.add(ScoredPlan::Ultra, 2);
                }
            }
            // Unspecified, "8+" and anything unrecognised. `tv_and_pc`
            // carries no weight here.
            _ => {
                if devices.gaming {
                    self.add(ScoredPlan::Turbo, 2);
                }
                if devices.camera {
                    self.add(ScoredPlan::Ultra, 1);
                }
            }
        }
    }
}

/// Scores a questionnaire and returns the winning plan with its table.
pub fn evaluate(questionnaire: &Questionnaire) -> Recommendation {
    let mut table = ScoreTable::default();

    if questionnaire.household.overrides_devices() {
        return Recommendation {
            plan: ScoredPlan::Premium,
            scores: table.entries(),
            overridden: true,
        };
    }

    table.apply(questionnaire);
    Recommendation { plan: table.best(), scores: table.entries(), overridden: false }
}

pub fn recommend(questionnaire: &Questionnaire) -> ScoredPlan {
    evaluate(questionnaire).plan
}

pub trait Recommender: Send + Sync {
    fn evaluate(&self, questionnaire: &Questionnaire) -> Recommendation;

    fn recommend(&self, questionnaire: &Questionnaire) -> ScoredPlan {
        self.evaluate(questionnaire).plan
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct ScoreTableRecommender;

impl Recommender for ScoreTableRecommender {
    fn evaluate(&self, questionnaire: &Questionnaire) -> Recommendation {
        evaluate(questionnaire)
    }
}

#[cfg(test)]
mod tests {
    use super::{evaluate, recommend, Recommender, ScoreTable, ScoreTableRecommender};
    use crate::recommend::{DeviceFlags, HouseholdSize, Questionnaire, ScoredPlan};

    fn all_device_combinations() -> Vec<DeviceFlags> {
        (0u8..8)
            .map(|bits| DeviceFlags {
                gaming: bits & 1 != 0,
                tv_and_pc: bits & 2 != 0,
                camera: bits & 4 != 0,
            })
            .collect()
    }

    fn devices(gaming: bool, tv_and_pc: bool, camera: bool) -> DeviceFlags {
        DeviceFlags { gaming, tv_and_pc, camera }
    }

    fn scores_of(questionnaire: &Questionnaire) -> Vec<u32> {
        evaluate(questionnaire).scores.iter().map(|entry| entry.score).collect()
    }

    #[test]
    fn premium_and_biznes_always_recommend_premium() {
        for household in ["premium", "biznes"] {
            for flags in all_device_combinations() {
                let recommendation = evaluate(&Questionnaire::new(household, flags));
                assert_eq!(recommendation.plan, ScoredPlan::Premium, "{household} {flags:?}");
                assert!(recommendation.overridden);
            }
        }
    }

    #[test]
    fn blank_questionnaire_recommends_smart() {
        let questionnaire = Questionnaire::default();
        assert!(questionnaire.is_blank());
        assert_eq!(recommend(&questionnaire), ScoredPlan::Smart);
        assert_eq!(scores_of(&questionnaire), vec![0, 4, 0, 0, 0]);
    }

    #[test]
    fn small_household_without_devices() {
        let questionnaire = Questionnaire::new("1-3", DeviceFlags::default());
        assert_eq!(scores_of(&questionnaire), vec![1, 6, 0, 0, 0]);
        assert_eq!(recommend(&questionnaire), ScoredPlan::Smart);
    }

    #[test]
    fn small_household_gaming_stays_on_smart_baseline() {
        // turbo reaches 3 but smart already holds 4 + 2.
        let questionnaire = Questionnaire::new("1-3", devices(true, false, false));
        assert_eq!(scores_of(&questionnaire), vec![1, 6, 3, 0, 0]);
        assert_eq!(recommend(&questionnaire), ScoredPlan::Smart);
    }

    #[test]
    fn small_household_devices_only_raise_smart() {
        let questionnaire = Questionnaire::new("1-3", devices(false, true, true));
        assert_eq!(scores_of(&questionnaire), vec![1, 9, 0, 0, 0]);
        assert_eq!(recommend(&questionnaire), ScoredPlan::Smart);
    }

    #[test]
    fn medium_household_gaming_and_tv_recommends_turbo() {
        let questionnaire = Questionnaire::new("4-7", devices(true, true, false));
        assert_eq!(scores_of(&questionnaire), vec![0, 6, 7, 0, 0]);
        assert_eq!(recommend(&questionnaire), ScoredPlan::Turbo);
    }

    #[test]
    fn medium_household_tv_and_camera_stays_on_smart() {
        // turbo 2 + 2 and ultra 2 stay below smart 4 + 2.
        let questionnaire = Questionnaire::new("4-7", devices(false, true, true));
        assert_eq!(scores_of(&questionnaire), vec![0, 6, 4, 2, 0]);
        assert_eq!(recommend(&questionnaire), ScoredPlan::Smart);
    }

    #[test]
    fn medium_household_all_devices_recommends_turbo() {
        let questionnaire = Questionnaire::new("4-7", devices(true, true, true));
        assert_eq!(scores_of(&questionnaire), vec![0, 6, 7, 2, 0]);
        assert_eq!(recommend(&questionnaire), ScoredPlan::Turbo);
    }

    #[test]
    fn large_household_camera_keeps_smart_baseline() {
        let questionnaire = Questionnaire::new("8+", devices(false, false, true));
        assert_eq!(questionnaire.household, HouseholdSize::EightPlus);
        assert_eq!(scores_of(&questionnaire), vec![0, 4, 0, 1, 0]);
        assert_eq!(recommend(&questionnaire), ScoredPlan::Smart);
    }

    #[test]
    fn fallthrough_branch_ignores_tv_and_pc() {
        for household in ["", "8+", "dozens"] {
            let with_tv = Questionnaire::new(household, devices(true, true, true));
            let without_tv = Questionnaire::new(household, devices(true, false, true));
            assert_eq!(scores_of(&with_tv), scores_of(&without_tv), "household {household:?}");
            assert_eq!(scores_of(&with_tv), vec![0, 4, 2, 1, 0]);
        }
    }

    #[test]
    fn tie_break_prefers_declaration_order() {
        let mut table = ScoreTable::default();
        table.add(ScoredPlan::Ultra, 4);
        table.add(ScoredPlan::Premium, 4);
        assert_eq!(table.best(), ScoredPlan::Smart);

        table.add(ScoredPlan::Premium, 1);
        assert_eq!(table.best(), ScoredPlan::Premium);
    }

    #[test]
    fn repeated_calls_yield_identical_results() {
        let recommender = ScoreTableRecommender;
        for flags in all_device_combinations() {
            for household in ["", "1-3", "4-7", "8+"] {
                let questionnaire = Questionnaire::new(household, flags);
                assert_eq!(
                    recommender.evaluate(&questionnaire),
                    recommender.evaluate(&questionnaire)
                );
                assert_eq!(recommender.recommend(&questionnaire), recommend(&questionnaire));
            }
        }
    }
}
