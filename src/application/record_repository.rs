// Repository trait for monthly activity data access
use crate::domain::record::MonthlyRecord;
use async_trait::async_trait;

#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// List all cabinet IDs known to the reporting service.
    async fn list_cabinet_ids(&self) -> anyhow::Result<Vec<String>>;

    /// List practitioner codes active in a cabinet.
    async fn list_praticiens(&self, cabinet_id: &str) -> anyhow::Result<Vec<String>>;

    /// Fetch the per-practitioner monthly records for the last `months`
    /// calendar months of a cabinet.
    async fn fetch_monthly_records(
        &self,
        cabinet_id: &str,
        months: u32,
    ) -> anyhow::Result<Vec<MonthlyRecord>>;
}
