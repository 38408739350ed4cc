use clap::Parser;
use kampus_skill::adapters::output::render_listing;
use kampus_skill::core::navigation::{visible_destinations, SessionUser, UserRole};
use kampus_skill::utils::error::ErrorSeverity;
use kampus_skill::utils::validation::{validate_required_field, Validate};
use kampus_skill::utils::logger;
use kampus_skill::{
    CatalogStore, CliConfig, JsonFileLoader, ListingConfig, Result, ServiceListViewModel,
};

#[tokio::main]
async fn main() {
    let cli = CliConfig::parse();

    // 先讀設定檔才知道日誌格式
    let config = match cli.config.as_deref() {
        Some(path) => ListingConfig::from_file(path),
        None => Ok(ListingConfig::default()),
    };

    let json_logs = cli.log_json || config.as_ref().map(|c| c.json_logs()).unwrap_or(false);
    logger::init_logger(logger::LogFormat::from_json_flag(json_logs), cli.verbose);

    tracing::debug!("CLI config: {:?}", cli);

    let result = match config {
        Ok(config) => run(cli, config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Listing failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: CliConfig, config: ListingConfig) -> Result<()> {
    cli.validate()?;
    config.validate()?;

    let categories = config.category_set()?;

    if cli.list_categories {
        for category in categories.iter() {
            println!("{}", category);
        }
        return Ok(());
    }

    if cli.list_sort_options {
        for option in kampus_skill::core::SortOption::ALL {
            println!("{:<10} {}", option.key(), option.label());
        }
        return Ok(());
    }

    if cli.show_nav {
        let user = SessionUser {
            id: "cli".to_string(),
            name: "cli".to_string(),
            role: if cli.admin { UserRole::Admin } else { UserRole::Member },
        };
        for page in visible_destinations(&user) {
            println!("{:<8} {}", page.to_string(), page.label());
        }
        return Ok(());
    }

    let catalog_path = cli
        .catalog
        .clone()
        .or_else(|| config.catalog_path().map(str::to_string));
    let catalog_path = validate_required_field("catalog.path", &catalog_path)?;

    let store = CatalogStore::new();
    store.refresh_from(&JsonFileLoader::new(catalog_path)).await?;

    let mut view_model = ServiceListViewModel::new(&store, categories, config.debounce());
    view_model.set_sort(config.default_sort()?);
    view_model.set_search_term(cli.search.as_str());
    view_model.set_category(&cli.category)?;
    if let Some(sort) = cli.sort.as_deref() {
        view_model.set_sort_option(sort)?;
    }

    let view = view_model.compute_derived_view();
    tracing::info!(
        "Showing {} of {} services",
        view.services().len(),
        view_model.catalog_len()
    );

    let mut stdout = std::io::stdout().lock();
    render_listing(&view, cli.format, &mut stdout)?;

    view_model.teardown();
    Ok(())
}
