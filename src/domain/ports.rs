use crate::domain::model::{CatalogSnapshot, Service};
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::watch;

/// 目錄的讀取端，注入到 view model
pub trait CatalogSource: Send + Sync {
    fn snapshot(&self) -> CatalogSnapshot;
    fn subscribe(&self) -> watch::Receiver<CatalogSnapshot>;
}

#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<Service>>;
}
