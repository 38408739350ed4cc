use crate::core::derive::derive_view;
use crate::core::indicator::FilteringIndicator;
use crate::domain::model::{
    CatalogSnapshot, CategoryFilter, CategorySet, FilterState, ListingView, Service, SortOption,
};
use crate::domain::ports::CatalogSource;
use crate::utils::error::{ListingError, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

struct Memo {
    revision: u64,
    filter: FilterState,
    services: Arc<Vec<Service>>,
}

/// 服務列表的篩選/排序狀態與推導結果
pub struct ServiceListViewModel {
    catalog: watch::Receiver<CatalogSnapshot>,
    categories: CategorySet,
    filter: FilterState,
    indicator: FilteringIndicator,
    memo: Option<Memo>,
}

impl ServiceListViewModel {
    pub fn new(source: &dyn CatalogSource, categories: CategorySet, debounce: Duration) -> Self {
        Self {
            catalog: source.subscribe(),
            categories,
            filter: FilterState::default(),
            indicator: FilteringIndicator::new(debounce),
            memo: None,
        }
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    pub fn sort_options(&self) -> impl Iterator<Item = (&'static str, &'static str)> {
        SortOption::ALL
            .into_iter()
            .map(|option| (option.key(), option.label()))
    }

    pub fn set_search_term(&mut self, term: impl Into<String>) {
        let term = term.into();
        if self.filter.search_term == term {
            return;
        }
        tracing::debug!(search_term = %term, "Search term changed");
        self.filter.search_term = term;
        self.indicator.arm();
    }

    /// 接受類別標籤或 `"all"`；未知標籤會被拒絕，狀態不變
    pub fn set_category(&mut self, raw: &str) -> Result<()> {
        let filter = self.categories.parse_filter(raw).inspect_err(|e| {
            tracing::warn!("Rejected category selection: {}", e);
        })?;
        self.apply_category(filter);
        Ok(())
    }

    pub fn select_category(&mut self, filter: CategoryFilter) -> Result<()> {
        if let CategoryFilter::Only(category) = &filter {
            if !self.categories.contains(category) {
                tracing::warn!("Rejected unknown category: {}", category);
                return Err(ListingError::InvalidCategory {
                    value: category.to_string(),
                });
            }
        }
        self.apply_category(filter);
        Ok(())
    }

    fn apply_category(&mut self, filter: CategoryFilter) {
        if self.filter.category == filter {
            return;
        }
        tracing::debug!(category = %filter, "Category changed");
        self.filter.category = filter;
        self.indicator.arm();
    }

    pub fn set_sort_option(&mut self, key: &str) -> Result<()> {
        let sort = key.parse::<SortOption>().inspect_err(|e| {
            tracing::warn!("Rejected sort option: {}", e);
        })?;
        self.set_sort(sort);
        Ok(())
    }

    pub fn set_sort(&mut self, sort: SortOption) {
        if self.filter.sort == sort {
            return;
        }
        tracing::debug!(sort = %sort, "Sort option changed");
        self.filter.sort = sort;
        self.indicator.arm();
    }

    /// 推導可見列表；目錄載入中時回傳 [`ListingView::Loading`]。
    /// 目錄版本與篩選狀態都沒變時重用上次結果
    pub fn compute_derived_view(&mut self) -> ListingView {
        let snapshot = self.catalog.borrow_and_update().clone();
        if snapshot.loading {
            return ListingView::Loading;
        }
        let catalog_len = snapshot.services.len();

        if let Some(memo) = &self.memo {
            if memo.revision == snapshot.revision && memo.filter == self.filter {
                return ListingView::Ready {
                    services: Arc::clone(&memo.services),
                    catalog_len,
                };
            }
        }

        let services = Arc::new(derive_view(&snapshot.services, &self.filter));
        tracing::debug!(
            revision = snapshot.revision,
            catalog_len,
            visible = services.len(),
            "Derived service listing"
        );

        self.memo = Some(Memo {
            revision: snapshot.revision,
            filter: self.filter.clone(),
            services: Arc::clone(&services),
        });

        ListingView::Ready {
            services,
            catalog_len,
        }
    }

    /// 未篩選前的目錄筆數
    pub fn catalog_len(&self) -> usize {
        self.catalog.borrow().services.len()
    }

    pub fn is_loading(&self) -> bool {
        self.catalog.borrow().loading
    }

    pub fn is_filtering(&self) -> bool {
        self.indicator.is_filtering()
    }

    pub fn subscribe_filtering(&self) -> watch::Receiver<bool> {
        self.indicator.subscribe()
    }

    pub fn indicator(&self) -> &FilteringIndicator {
        &self.indicator
    }

    /// 等待目錄發佈新快照；目錄已釋放時回傳 false
    pub async fn catalog_changed(&mut self) -> bool {
        self.catalog.changed().await.is_ok()
    }

    /// 取消尚未觸發的計時器，畫面卸載時呼叫
    pub fn teardown(mut self) {
        tracing::debug!("Tearing down service listing view");
        self.indicator.cancel();
    }
}
