use crate::domain::model::{CatalogSnapshot, Service};
use crate::domain::ports::{CatalogLoader, CatalogSource};
use crate::utils::error::{ListingError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// 記憶體內的目錄；每次變更都發佈版本遞增的新快照
#[derive(Debug)]
pub struct CatalogStore {
    sender: watch::Sender<CatalogSnapshot>,
}

impl CatalogStore {
    /// 尚未載入任何資料 (`loading == true`)
    pub fn new() -> Self {
        let (sender, _) = watch::channel(CatalogSnapshot {
            loading: true,
            ..CatalogSnapshot::default()
        });
        Self { sender }
    }

    pub fn begin_loading(&self) {
        self.sender.send_modify(|snapshot| {
            snapshot.loading = true;
            snapshot.revision += 1;
        });
    }

    /// 載入失敗時保留舊資料，只結束 loading 狀態
    pub fn finish_loading(&self) {
        self.sender.send_modify(|snapshot| {
            snapshot.loading = false;
            snapshot.revision += 1;
        });
    }

    pub fn replace(&self, services: Vec<Service>) {
        self.sender.send_modify(|snapshot| {
            *snapshot = CatalogSnapshot::ready(services, snapshot.revision + 1);
        });
    }

    /// 新增服務，或取代相同 id 的服務
    pub fn upsert(&self, service: Service) {
        self.sender.send_modify(|snapshot| {
            let services = Arc::make_mut(&mut snapshot.services);
            match services.iter_mut().find(|existing| existing.id == service.id) {
                Some(existing) => *existing = service,
                None => services.push(service),
            }
            snapshot.revision += 1;
        });
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sender.send_if_modified(|snapshot| {
            let Some(index) = snapshot.services.iter().position(|s| s.id == id) else {
                return false;
            };
            Arc::make_mut(&mut snapshot.services).remove(index);
            snapshot.revision += 1;
            true
        })
    }

    pub fn len(&self) -> usize {
        self.sender.borrow().services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 從 `loader` 重新載入整份目錄，失敗時保留舊資料
    pub async fn refresh_from(&self, loader: &dyn CatalogLoader) -> Result<usize> {
        self.begin_loading();
        match loader.load().await {
            Ok(services) => {
                let count = services.len();
                self.replace(services);
                tracing::info!("Catalog refreshed with {} services", count);
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Catalog refresh failed: {}", e);
                self.finish_loading();
                Err(e)
            }
        }
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogSource for CatalogStore {
    fn snapshot(&self) -> CatalogSnapshot {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<CatalogSnapshot> {
        self.sender.subscribe()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// 讀取 JSON 目錄：陣列，或是 `{ "services": [...] }`
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 無法讀取的項目會被略過並記錄警告，其餘項目照常載入
    pub fn parse(content: &str) -> Result<Vec<Service>> {
        let entries = match serde_json::from_str::<Value>(content)? {
            Value::Array(entries) => entries,
            Value::Object(mut document) => match document.remove("services") {
                Some(Value::Array(entries)) => entries,
                Some(other) => {
                    return Err(ListingError::InvalidCatalog {
                        message: format!("'services' must be an array, found {}", json_kind(&other)),
                    });
                }
                None => {
                    return Err(ListingError::InvalidCatalog {
                        message: "object catalog has no 'services' field".to_string(),
                    });
                }
            },
            other => {
                return Err(ListingError::InvalidCatalog {
                    message: format!("expected an array of services, found {}", json_kind(&other)),
                });
            }
        };

        let total = entries.len();
        let mut services = Vec::with_capacity(total);
        for (index, entry) in entries.into_iter().enumerate() {
            let id = entry.get("id").and_then(Value::as_str).unwrap_or("-").to_string();
            match serde_json::from_value::<Service>(entry) {
                Ok(service) => services.push(service),
                Err(e) => tracing::warn!(
                    index,
                    service_id = %id,
                    error = %e,
                    "Skipping catalog entry that cannot be read"
                ),
            }
        }
        if services.len() < total {
            tracing::warn!("Loaded {} of {} catalog entries", services.len(), total);
        }

        for service in services.iter().filter(|s| s.has_malformed_fields()) {
            tracing::warn!(
                service_id = %service.id,
                has_price = service.price.is_some(),
                has_created_at = service.created_at.is_some(),
                "Service has malformed fields, it will sort last"
            );
        }

        Ok(services)
    }
}

#[async_trait]
impl CatalogLoader for JsonFileLoader {
    async fn load(&self) -> Result<Vec<Service>> {
        tracing::debug!("Reading catalog from {}", self.path.display());
        let content = tokio::fs::read_to_string(&self.path).await?;
        Self::parse(&content)
    }
}
