// Monthly activity record domain model
use chrono::Datelike;
use serde::{Deserialize, Serialize};

/// Sortable YYYYMM period key. Chronological order equals numeric order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Period(pub u32);

impl Period {
    pub fn new(year: u32, month: u32) -> Self {
        Self(year * 100 + month.clamp(1, 12))
    }

    pub fn from_date(date: chrono::NaiveDate) -> Self {
        Self::new(date.year() as u32, date.month())
    }

    pub fn year(&self) -> u32 {
        self.0 / 100
    }

    pub fn month(&self) -> u32 {
        self.0 % 100
    }

    /// Display key, e.g. "2025-03".
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year(), self.month())
    }
}

/// One practitioner-month document from the reporting service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub praticien: String,
    pub periode: Period,
    #[serde(default)]
    pub ca_facture: f64,
    #[serde(default)]
    pub ca_encaisse: f64,
    #[serde(default)]
    pub heures_travaillees: f64,
    #[serde(default)]
    pub rdv_pris: f64,
    #[serde(default)]
    pub patients_vus: f64,
    #[serde(default)]
    pub nouveaux_patients: f64,
    #[serde(default)]
    pub devis_proposes: f64,
    #[serde(default)]
    pub devis_acceptes: f64,
}

/// Metric a widget can aggregate, as named in the dashboards config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CaFacture,
    CaEncaisse,
    HeuresTravaillees,
    RdvPris,
    PatientsVus,
    NouveauxPatients,
    DevisProposes,
    DevisAcceptes,
}

impl Metric {
    pub fn value(&self, record: &MonthlyRecord) -> f64 {
        match self {
            Metric::CaFacture => record.ca_facture,
            Metric::CaEncaisse => record.ca_encaisse,
            Metric::HeuresTravaillees => record.heures_travaillees,
            Metric::RdvPris => record.rdv_pris,
            Metric::PatientsVus => record.patients_vus,
            Metric::NouveauxPatients => record.nouveaux_patients,
            Metric::DevisProposes => record.devis_proposes,
            Metric::DevisAcceptes => record.devis_acceptes,
        }
    }

    /// Display label used in insight sentences.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::CaFacture => "Chiffre d'affaires facturé",
            Metric::CaEncaisse => "Chiffre d'affaires encaissé",
            Metric::HeuresTravaillees => "Heures travaillées",
            Metric::RdvPris => "Rendez-vous pris",
            Metric::PatientsVus => "Patients vus",
            Metric::NouveauxPatients => "Nouveaux patients",
            Metric::DevisProposes => "Devis proposés",
            Metric::DevisAcceptes => "Devis acceptés",
        }
    }
}
