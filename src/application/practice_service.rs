// Practice service - Use case for listing cabinets and practitioners
use crate::application::record_repository::RecordRepository;
use crate::domain::cabinet::Cabinet;
use std::sync::Arc;

#[derive(Clone)]
pub struct PracticeService {
    repository: Arc<dyn RecordRepository>,
}

impl PracticeService {
    pub fn new(repository: Arc<dyn RecordRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_cabinets(&self) -> anyhow::Result<Vec<Cabinet>> {
        let ids = self.repository.list_cabinet_ids().await?;
        Ok(ids.into_iter().map(Cabinet::new).collect())
    }

    pub async fn list_praticiens(&self, cabinet_id: &str) -> anyhow::Result<Vec<String>> {
        self.repository.list_praticiens(cabinet_id).await
    }
}
