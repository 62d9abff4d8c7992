// Composite cabinet health score from five business ratios
use serde::Serialize;

/// Weighting of each sub-score. Must keep summing to 1.0 if retuned.
pub const WEIGHTS: Weights = Weights {
    encaissement: 0.30,
    evolution: 0.25,
    absence: 0.15,
    production: 0.20,
    nouveaux: 0.10,
};

// 400 EUR/hour is the production benchmark scoring 100.
const PRODUCTION_BENCHMARK: f64 = 400.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthInputs {
    /// Collection rate, already a percentage (encaissé / facturé * 100).
    pub taux_encaissement: f64,
    /// Period-over-period revenue growth in percent.
    pub evolution_ca: f64,
    /// Missed-appointment rate in percent.
    pub taux_absence: f64,
    /// Revenue per worked hour.
    pub production_horaire: f64,
    /// New patients as a percentage of patients seen.
    pub taux_nouveaux_patients: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Weights {
    pub encaissement: f64,
    pub evolution: f64,
    pub absence: f64,
    pub production: f64,
    pub nouveaux: f64,
}

impl Weights {
    pub fn sum(&self) -> f64 {
        self.encaissement + self.evolution + self.absence + self.production + self.nouveaux
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SubScores {
    pub encaissement: f64,
    pub evolution: f64,
    pub absence: f64,
    pub production: f64,
    pub nouveaux: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthLevel {
    Excellent,
    Bon,
    Moyen,
    Critique,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HealthScore {
    pub global_score: u8,
    pub scores: SubScores,
    pub weights: Weights,
    pub level: HealthLevel,
}

impl HealthScore {
    pub fn zero() -> Self {
        Self {
            global_score: 0,
            scores: SubScores {
                encaissement: 0.0,
                evolution: 0.0,
                absence: 0.0,
                production: 0.0,
                nouveaux: 0.0,
            },
            weights: WEIGHTS,
            level: HealthLevel::Critique,
        }
    }
}

/// Weighted 0-100 health score for a cabinet.
///
/// Each ratio is normalized to [0, 100] independently:
/// - encaissement: used as-is (already a percentage)
/// - evolution: 0% growth sits at 50, ±25 points of growth saturate
/// - absence: inverted, 20% absences hit the floor
/// - production: scaled against the 400 EUR/h benchmark
/// - nouveaux: 20% new-patient ratio saturates
pub fn cabinet_health_score(inputs: &HealthInputs) -> HealthScore {
    let scores = SubScores {
        encaissement: inputs.taux_encaissement.clamp(0.0, 100.0),
        evolution: (50.0 + inputs.evolution_ca * 2.0).clamp(0.0, 100.0),
        absence: (100.0 - inputs.taux_absence * 5.0).clamp(0.0, 100.0),
        production: (inputs.production_horaire / PRODUCTION_BENCHMARK * 100.0).clamp(0.0, 100.0),
        nouveaux: (inputs.taux_nouveaux_patients * 5.0).clamp(0.0, 100.0),
    };

    let weighted = scores.encaissement * WEIGHTS.encaissement
        + scores.evolution * WEIGHTS.evolution
        + scores.absence * WEIGHTS.absence
        + scores.production * WEIGHTS.production
        + scores.nouveaux * WEIGHTS.nouveaux;

    let global_score = weighted.clamp(0.0, 100.0).round() as u8;

    HealthScore {
        global_score,
        scores,
        weights: WEIGHTS,
        level: level_for(global_score),
    }
}

fn level_for(score: u8) -> HealthLevel {
    if score >= 80 {
        HealthLevel::Excellent
    } else if score >= 65 {
        HealthLevel::Bon
    } else if score >= 50 {
        HealthLevel::Moyen
    } else {
        HealthLevel::Critique
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weights_sum_to_one() {
        assert!((WEIGHTS.sum() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_perfect_encaissement_alone_scores_thirty() {
        let score = cabinet_health_score(&HealthInputs {
            taux_encaissement: 100.0,
            evolution_ca: -25.0, // evolution sub-score bottoms out at 0
            taux_absence: 20.0,
            production_horaire: 0.0,
            taux_nouveaux_patients: 0.0,
        });
        assert_eq!(score.global_score, 30);
        assert_eq!(score.level, HealthLevel::Critique);
    }

    #[test]
    fn test_healthy_cabinet_is_excellent() {
        let score = cabinet_health_score(&HealthInputs {
            taux_encaissement: 95.0,
            evolution_ca: 10.0,
            taux_absence: 3.0,
            production_horaire: 380.0,
            taux_nouveaux_patients: 18.0,
        });
        assert!(score.global_score >= 80, "score: {}", score.global_score);
        assert_eq!(score.level, HealthLevel::Excellent);
    }

    #[test]
    fn test_normalization_saturates() {
        let score = cabinet_health_score(&HealthInputs {
            taux_encaissement: 150.0,
            evolution_ca: 60.0,
            taux_absence: -5.0,
            production_horaire: 1_000.0,
            taux_nouveaux_patients: 40.0,
        });
        assert_eq!(score.global_score, 100);
        assert_eq!(score.scores.encaissement, 100.0);
        assert_eq!(score.scores.evolution, 100.0);
        assert_eq!(score.scores.absence, 100.0);
        assert_eq!(score.scores.production, 100.0);
        assert_eq!(score.scores.nouveaux, 100.0);
    }

    #[test]
    fn test_zero_growth_centers_evolution() {
        let score = cabinet_health_score(&HealthInputs {
            taux_encaissement: 0.0,
            evolution_ca: 0.0,
            taux_absence: 100.0,
            production_horaire: 0.0,
            taux_nouveaux_patients: 0.0,
        });
        assert_eq!(score.scores.evolution, 50.0);
    }

    #[test]
    fn test_level_banding() {
        for (value, expected) in [
            (85u8, HealthLevel::Excellent),
            (80, HealthLevel::Excellent),
            (70, HealthLevel::Bon),
            (65, HealthLevel::Bon),
            (55, HealthLevel::Moyen),
            (50, HealthLevel::Moyen),
            (49, HealthLevel::Critique),
            (0, HealthLevel::Critique),
        ] {
            assert_eq!(level_for(value), expected, "score {value}");
        }
    }
}
