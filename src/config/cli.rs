use crate::adapters::output::OutputFormat;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "kampus-skill")]
#[command(about = "Search, filter and sort the KampusSkill service catalog")]
pub struct CliConfig {
    /// Path to the JSON service catalog (overrides [catalog] path)
    #[arg(long)]
    pub catalog: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Case-insensitive text matched against title and description
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Category label, or "all"
    #[arg(long, default_value = crate::domain::model::ALL_CATEGORIES)]
    pub category: String,

    /// newest, rating or price_asc (defaults to [listing] default_sort)
    #[arg(long)]
    pub sort: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Print the configured categories and exit
    #[arg(long)]
    pub list_categories: bool,

    /// Print the sort options and exit
    #[arg(long)]
    pub list_sort_options: bool,

    /// Print the header destinations for a member (or admin with --admin) and exit
    #[arg(long)]
    pub show_nav: bool,

    #[arg(long, requires = "show_nav")]
    pub admin: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(catalog) = &self.catalog {
            validate_path("--catalog", catalog)?;
        }
        if let Some(config) = &self.config {
            validate_path("--config", config)?;
        }
        Ok(())
    }
}
