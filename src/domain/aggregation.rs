// Aggregation of raw monthly records into dashboard series and ratios
use crate::domain::record::{MonthlyRecord, Period};
use crate::domain::stats::safe_div;
use serde::Serialize;
use std::collections::BTreeMap;

/// Sum a metric across all practitioners, per calendar month.
/// The BTreeMap keeps periods in chronological order.
pub fn monthly_totals<F>(records: &[MonthlyRecord], select: F) -> BTreeMap<Period, f64>
where
    F: Fn(&MonthlyRecord) -> f64,
{
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(record.periode).or_insert(0.0) += select(record);
    }
    totals
}

/// Chronological series of values out of a per-period total map.
pub fn to_series(totals: &BTreeMap<Period, f64>) -> Vec<f64> {
    totals.values().copied().collect()
}

/// Sum a metric across all months for one practitioner code.
pub fn practitioner_total<F>(records: &[MonthlyRecord], praticien: &str, select: F) -> f64
where
    F: Fn(&MonthlyRecord) -> f64,
{
    records
        .iter()
        .filter(|r| r.praticien == praticien)
        .map(select)
        .sum()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaDirection {
    Hausse,
    Baisse,
    Stable,
}

/// Comparison of the last two periods' totals. Distinct from the
/// regression-based trend: only the most recent move matters here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodDelta {
    pub pct: f64,
    pub direction: DeltaDirection,
}

impl PeriodDelta {
    pub fn flat() -> Self {
        Self {
            pct: 0.0,
            direction: DeltaDirection::Stable,
        }
    }
}

/// Percentage move between the last two periods, classified against a
/// single threshold in percent.
pub fn period_delta(totals: &BTreeMap<Period, f64>, threshold_pct: f64) -> PeriodDelta {
    let values: Vec<f64> = totals.values().rev().take(2).copied().collect();
    if values.len() < 2 {
        return PeriodDelta::flat();
    }
    let (last, prev) = (values[0], values[1]);

    let pct = safe_div(last - prev, prev) * 100.0;
    let direction = if pct > threshold_pct {
        DeltaDirection::Hausse
    } else if pct < -threshold_pct {
        DeltaDirection::Baisse
    } else {
        DeltaDirection::Stable
    };

    PeriodDelta { pct, direction }
}

/// Field sums over a set of records, with the derived business ratios.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub ca_facture: f64,
    pub ca_encaisse: f64,
    pub heures_travaillees: f64,
    pub rdv_pris: f64,
    pub patients_vus: f64,
    pub nouveaux_patients: f64,
    pub devis_proposes: f64,
    pub devis_acceptes: f64,
}

impl Totals {
    pub fn from_records(records: &[MonthlyRecord]) -> Self {
        let mut totals = Self::default();
        for r in records {
            totals.ca_facture += r.ca_facture;
            totals.ca_encaisse += r.ca_encaisse;
            totals.heures_travaillees += r.heures_travaillees;
            totals.rdv_pris += r.rdv_pris;
            totals.patients_vus += r.patients_vus;
            totals.nouveaux_patients += r.nouveaux_patients;
            totals.devis_proposes += r.devis_proposes;
            totals.devis_acceptes += r.devis_acceptes;
        }
        totals
    }

    /// Collected over invoiced revenue, in percent.
    pub fn taux_encaissement(&self) -> f64 {
        safe_div(self.ca_encaisse, self.ca_facture) * 100.0
    }

    /// Booked appointments with no recorded attendance, in percent.
    pub fn taux_absence(&self) -> f64 {
        safe_div(self.rdv_pris - self.patients_vus, self.rdv_pris) * 100.0
    }

    /// Collected revenue per worked hour.
    pub fn production_horaire(&self) -> f64 {
        safe_div(self.ca_encaisse, self.heures_travaillees)
    }

    /// New patients over patients seen, in percent.
    pub fn taux_nouveaux_patients(&self) -> f64 {
        safe_div(self.nouveaux_patients, self.patients_vus) * 100.0
    }

    /// Accepted over proposed treatment quotes, in percent.
    pub fn taux_acceptation_devis(&self) -> f64 {
        safe_div(self.devis_acceptes, self.devis_proposes) * 100.0
    }
}
