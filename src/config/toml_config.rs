use crate::domain::model::{CategorySet, SortOption};
use crate::utils::error::{ListingError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MAX_DEBOUNCE_MS: u64 = 5_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingConfig {
    pub listing: Option<ListingSection>,
    pub catalog: Option<CatalogSection>,
    pub categories: Option<CategoriesSection>,
    pub logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingSection {
    pub debounce_ms: Option<u64>,
    pub default_sort: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSection {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesSection {
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSection {
    pub json: Option<bool>,
}

impl ListingConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ListingError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${CATALOG_PATH})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ListingError::ConfigValidationError {
            field: "env_substitution".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(ms) = self.listing.as_ref().and_then(|l| l.debounce_ms) {
            crate::utils::validation::validate_range("listing.debounce_ms", ms, 0, MAX_DEBOUNCE_MS)?;
        }

        if let Some(path) = self.catalog_path() {
            crate::utils::validation::validate_path("catalog.path", path)?;
        }

        if let Some(categories) = &self.categories {
            crate::utils::validation::validate_category_labels(
                "categories.labels",
                &categories.labels,
            )?;
        }

        self.default_sort()?;
        Ok(())
    }

    pub fn debounce(&self) -> Duration {
        self.listing
            .as_ref()
            .and_then(|l| l.debounce_ms)
            .map(Duration::from_millis)
            .unwrap_or(crate::core::indicator::DEFAULT_DEBOUNCE)
    }

    pub fn default_sort(&self) -> Result<SortOption> {
        match self.listing.as_ref().and_then(|l| l.default_sort.as_deref()) {
            Some(key) => key.parse().map_err(|_| ListingError::InvalidConfigValueError {
                field: "listing.default_sort".to_string(),
                value: key.to_string(),
                reason: "Valid options: newest, rating, price_asc".to_string(),
            }),
            None => Ok(SortOption::default()),
        }
    }

    pub fn catalog_path(&self) -> Option<&str> {
        self.catalog.as_ref().and_then(|c| c.path.as_deref())
    }

    /// 取得類別設定，未設定時使用內建類別
    pub fn category_set(&self) -> Result<CategorySet> {
        match &self.categories {
            Some(section) => CategorySet::from_labels(section.labels.clone()),
            None => Ok(CategorySet::default()),
        }
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

impl Validate for ListingConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[listing]
debounce_ms = 150
default_sort = "rating"

[catalog]
path = "./data/services.json"

[categories]
labels = ["Desain Grafis", "Les Privat"]

[logging]
json = true
"#;

        let config = ListingConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_millis(150));
        assert_eq!(config.default_sort().unwrap(), SortOption::Rating);
        assert_eq!(config.catalog_path(), Some("./data/services.json"));
        assert_eq!(config.category_set().unwrap().len(), 2);
        assert!(config.json_logs());
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ListingConfig::from_toml_str("").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.debounce(), Duration::from_millis(300));
        assert_eq!(config.default_sort().unwrap(), SortOption::Newest);
        assert_eq!(config.category_set().unwrap(), CategorySet::default());
        assert_eq!(config.catalog_path(), None);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("KAMPUS_SKILL_TEST_CATALOG", "/tmp/catalog.json");

        let toml_content = r#"
[catalog]
path = "${KAMPUS_SKILL_TEST_CATALOG}"
"#;

        let config = ListingConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.catalog_path(), Some("/tmp/catalog.json"));

        std::env::remove_var("KAMPUS_SKILL_TEST_CATALOG");
    }

    #[test]
    fn test_invalid_values_fail_validation() {
        let bad_sort = ListingConfig::from_toml_str("[listing]\ndefault_sort = \"cheapest\"\n").unwrap();
        assert!(bad_sort.validate().is_err());

        let bad_debounce = ListingConfig::from_toml_str("[listing]\ndebounce_ms = 60000\n").unwrap();
        assert!(bad_debounce.validate().is_err());

        let bad_labels =
            ListingConfig::from_toml_str("[categories]\nlabels = [\"Bisnis\", \"Bisnis\"]\n").unwrap();
        assert!(bad_labels.validate().is_err());

        assert!(ListingConfig::from_toml_str("[listing\n").is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[catalog]\npath = \"services.json\"\n")
            .unwrap();

        let config = ListingConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.catalog_path(), Some("services.json"));
    }
}
