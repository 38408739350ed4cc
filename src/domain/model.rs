use crate::utils::error::{ListingError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// 類別選單中代表「不篩選」的值
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Active,
    Inactive,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rating {
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

impl Rating {
    pub fn new(rating: f64) -> Self {
        Self {
            rating,
            user_id: None,
            comment: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 目錄項目；來源的 `price` / `created_at` 缺少或格式錯誤時為 None
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    #[serde(default, deserialize_with = "lenient::price")]
    pub price: Option<f64>,
    #[serde(default)]
    pub status: ServiceStatus,
    #[serde(default, deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "lenient::ratings")]
    pub ratings: Vec<Rating>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_name: Option<String>,
}

impl Service {
    pub fn is_active(&self) -> bool {
        self.status == ServiceStatus::Active
    }

    /// 平均評分，沒有評分時為 0
    pub fn average_rating(&self) -> f64 {
        if self.ratings.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.ratings.iter().map(|r| r.rating).sum();
        sum / self.ratings.len() as f64
    }

    pub fn has_malformed_fields(&self) -> bool {
        self.price.is_none() || self.created_at.is_none()
    }
}

/// 寬鬆解析：格式錯誤的欄位變成 None，不讓整份目錄載入失敗
mod lenient {
    use super::Rating;
    use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    fn number(value: Option<Value>) -> Option<f64> {
        let parsed = match value {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|n| n.is_finite())
    }

    pub fn price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(number(value).filter(|p| *p >= 0.0))
    }

    /// 無法解析分數的評分直接略過，不計入平均
    pub fn ratings<'de, D>(deserializer: D) -> Result<Vec<Rating>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let items = match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Array(items)) => items,
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(other) => {
                tracing::warn!(found = %other, "Ratings is not an array, ignoring it");
                return Ok(Vec::new());
            }
        };

        let mut ratings = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(mut fields) = item else {
                tracing::warn!(index, "Skipping rating that is not an object");
                continue;
            };
            let Some(score) = number(fields.remove("rating")) else {
                tracing::warn!(index, "Skipping rating without a numeric score");
                continue;
            };
            let text = |value: Option<Value>| match value {
                Some(Value::String(s)) => Some(s),
                _ => None,
            };
            ratings.push(Rating {
                rating: score,
                user_id: text(fields.remove("userId")),
                comment: text(fields.remove("comment")),
            });
        }
        Ok(ratings)
    }

    pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        let parsed = match value {
            Some(Value::String(s)) => parse_timestamp(&s),
            // epoch millis
            Some(Value::Number(n)) => n.as_i64().and_then(DateTime::from_timestamp_millis),
            _ => None,
        };
        Ok(parsed)
    }

    fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        // 沒有時區的時間一律視為 UTC
        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(naive.and_utc());
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// 固定且有順序的類別清單
#[derive(Debug, Clone, PartialEq)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl CategorySet {
    pub fn from_labels(labels: Vec<String>) -> Result<Self> {
        crate::utils::validation::validate_category_labels("categories", &labels)?;
        Ok(Self {
            categories: labels.into_iter().map(Category::new).collect(),
        })
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// 解析類別選擇，接受 `"all"`
    pub fn parse_filter(&self, raw: &str) -> Result<CategoryFilter> {
        if raw == ALL_CATEGORIES {
            return Ok(CategoryFilter::All);
        }
        let category = Category::new(raw);
        if self.contains(&category) {
            Ok(CategoryFilter::Only(category))
        } else {
            Err(ListingError::InvalidCategory {
                value: raw.to_string(),
            })
        }
    }
}

impl Default for CategorySet {
    fn default() -> Self {
        let categories = [
            "Desain Grafis",
            "Penulisan & Penerjemahan",
            "Pemrograman & Teknologi",
            "Video & Animasi",
            "Pemasaran Digital",
            "Musik & Audio",
            "Les Privat",
            "Lainnya",
        ];
        Self {
            categories: categories.iter().map(|c| Category::new(*c)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(selected) => selected == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CategoryFilter::All => f.write_str(ALL_CATEGORIES),
            CategoryFilter::Only(category) => fmt::Display::fmt(category, f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    Newest,
    Rating,
    PriceAsc,
}

impl SortOption {
    pub const ALL: [SortOption; 3] = [SortOption::Newest, SortOption::Rating, SortOption::PriceAsc];

    pub fn key(&self) -> &'static str {
        match self {
            SortOption::Newest => "newest",
            SortOption::Rating => "rating",
            SortOption::PriceAsc => "price_asc",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::Newest => "Terbaru",
            SortOption::Rating => "Rating Tertinggi",
            SortOption::PriceAsc => "Harga Terendah",
        }
    }
}

impl FromStr for SortOption {
    type Err = ListingError;

    fn from_str(s: &str) -> Result<Self> {
        SortOption::ALL
            .into_iter()
            .find(|option| option.key() == s)
            .ok_or_else(|| ListingError::InvalidSortOption {
                value: s.to_string(),
            })
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterState {
    pub search_term: String,
    pub category: CategoryFilter,
    pub sort: SortOption,
}

/// 目錄來源目前的內容
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    pub services: Arc<Vec<Service>>,
    pub loading: bool,
    pub revision: u64,
}

impl CatalogSnapshot {
    pub fn ready(services: Vec<Service>, revision: u64) -> Self {
        Self {
            services: Arc::new(services),
            loading: false,
            revision,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    CatalogEmpty,
    NoMatches,
}

impl EmptyState {
    pub fn title(&self) -> &'static str {
        match self {
            EmptyState::CatalogEmpty => "Belum Ada Jasa yang Tersedia",
            EmptyState::NoMatches => "Jasa Tidak Ditemukan",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            EmptyState::CatalogEmpty => {
                "Saat ini belum ada jasa yang diposting. Coba lagi nanti atau jadilah yang pertama memposting!"
            }
            EmptyState::NoMatches => {
                "Tidak ada jasa yang cocok dengan pencarian atau filter Anda. Coba kata kunci atau kategori lain."
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListingView {
    /// 目錄仍在載入，尚未推導
    Loading,
    Ready {
        services: Arc<Vec<Service>>,
        /// 未篩選前的目錄筆數
        catalog_len: usize,
    },
}

impl ListingView {
    pub fn services(&self) -> &[Service] {
        match self {
            ListingView::Loading => &[],
            ListingView::Ready { services, .. } => services.as_slice(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListingView::Loading)
    }

    pub fn is_catalog_empty(&self) -> bool {
        matches!(self, ListingView::Ready { catalog_len: 0, .. })
    }

    pub fn is_filtered_out(&self) -> bool {
        match self {
            ListingView::Ready {
                services,
                catalog_len,
            } => services.is_empty() && *catalog_len > 0,
            ListingView::Loading => false,
        }
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.is_catalog_empty() {
            Some(EmptyState::CatalogEmpty)
        } else if self.is_filtered_out() {
            Some(EmptyState::NoMatches)
        } else {
            None
        }
    }
}
