use anyhow::Result;
use kampus_skill::adapters::output::{render_listing, OutputFormat};
use kampus_skill::core::{CatalogSource, CategoryFilter, SortOption};
use kampus_skill::{CatalogStore, JsonFileLoader, ListingConfig, ServiceListViewModel};
use std::time::Duration;
use tempfile::TempDir;

const CATALOG: &str = r#"{
  "services": [
    {
      "id": "svc-logo",
      "title": "Desain Logo Profesional",
      "description": "Logo modern untuk usaha kecil",
      "category": "Desain Grafis",
      "price": 150000,
      "status": "active",
      "createdAt": "2024-05-01T09:00:00Z",
      "ratings": [{"rating": 5}, {"rating": 5}],
      "providerName": "Sari"
    },
    {
      "id": "svc-poster",
      "title": "Poster Acara Kampus",
      "description": "Termasuk revisi logo acara",
      "category": "Desain Grafis",
      "price": 50000,
      "status": "active",
      "createdAt": "2024-05-03T09:00:00Z",
      "ratings": [{"rating": 1}]
    },
    {
      "id": "svc-web",
      "title": "Website Portofolio",
      "description": "Landing page responsif",
      "category": "Pemrograman & Teknologi",
      "price": 300000,
      "status": "active",
      "createdAt": "2024-05-02T09:00:00Z",
      "ratings": []
    },
    {
      "id": "svc-old",
      "title": "Logo Lama",
      "description": "Sudah tidak dijual",
      "category": "Desain Grafis",
      "price": 10000,
      "status": "inactive",
      "createdAt": "2024-05-04T09:00:00Z",
      "ratings": [{"rating": 5}]
    },
    {
      "id": "svc-broken",
      "title": "Les Privat Logika",
      "description": "Data harga rusak",
      "category": "Les Privat",
      "price": "gratis?",
      "status": "active",
      "createdAt": "kemarin",
      "ratings": [{"rating": 3}]
    }
  ]
}"#;

async fn loaded_store(dir: &TempDir) -> Result<CatalogStore> {
    let path = dir.path().join("services.json");
    tokio::fs::write(&path, CATALOG).await?;

    let store = CatalogStore::new();
    store.refresh_from(&JsonFileLoader::new(&path)).await?;
    Ok(store)
}

fn ids(vm: &mut ServiceListViewModel) -> Vec<String> {
    vm.compute_derived_view()
        .services()
        .iter()
        .map(|s| s.id.clone())
        .collect()
}

#[tokio::test]
async fn test_listing_from_json_catalog() -> Result<()> {
    let dir = TempDir::new()?;
    let store = loaded_store(&dir).await?;
    let config = ListingConfig::default();
    let mut vm = ServiceListViewModel::new(&store, config.category_set()?, config.debounce());

    // 預設：只顯示 active，依時間新到舊，缺日期者最後
    assert_eq!(
        ids(&mut vm),
        vec!["svc-poster", "svc-web", "svc-logo", "svc-broken"]
    );
    assert_eq!(vm.catalog_len(), 5);

    vm.set_search_term("LOGO");
    assert_eq!(ids(&mut vm), vec!["svc-poster", "svc-logo"]);

    vm.set_sort_option("rating")?;
    assert_eq!(ids(&mut vm), vec!["svc-logo", "svc-poster"]);

    vm.set_search_term("");
    vm.set_sort_option("price_asc")?;
    assert_eq!(
        ids(&mut vm),
        vec!["svc-poster", "svc-logo", "svc-web", "svc-broken"]
    );

    vm.set_category("Pemrograman & Teknologi")?;
    assert_eq!(ids(&mut vm), vec!["svc-web"]);

    vm.select_category(CategoryFilter::All)?;
    vm.set_sort(SortOption::Rating);
    assert_eq!(
        ids(&mut vm),
        vec!["svc-logo", "svc-broken", "svc-poster", "svc-web"]
    );

    vm.teardown();
    Ok(())
}

#[tokio::test]
async fn test_no_matches_vs_empty_catalog_output() -> Result<()> {
    let dir = TempDir::new()?;
    let store = loaded_store(&dir).await?;
    let mut vm = ServiceListViewModel::new(&store, Default::default(), Duration::from_millis(300));

    vm.set_search_term("xyz123");
    let view = vm.compute_derived_view();
    assert!(view.is_filtered_out());

    let mut out = Vec::new();
    render_listing(&view, OutputFormat::Table, &mut out)?;
    let no_matches = String::from_utf8(out)?;

    store.replace(vec![]);
    let view = vm.compute_derived_view();
    assert!(view.is_catalog_empty());

    let mut out = Vec::new();
    render_listing(&view, OutputFormat::Table, &mut out)?;
    let empty = String::from_utf8(out)?;

    assert_ne!(no_matches, empty);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn test_three_quick_searches_settle_once() -> Result<()> {
    let dir = TempDir::new()?;
    let store = loaded_store(&dir).await?;
    let mut vm = ServiceListViewModel::new(&store, Default::default(), Duration::from_millis(300));
    let mut filtering = vm.subscribe_filtering();

    for term in ["d", "de", "desain"] {
        vm.set_search_term(term);
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(vm.is_filtering());

    let mut settles = 0;
    while filtering.changed().await.is_ok() {
        if !*filtering.borrow_and_update() {
            settles += 1;
            break;
        }
    }

    assert_eq!(settles, 1);
    assert_eq!(vm.indicator().settle_count(), 1);

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(vm.indicator().settle_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_loading_state_while_refreshing() -> Result<()> {
    let store = CatalogStore::new();
    let mut vm = ServiceListViewModel::new(&store, Default::default(), Duration::from_millis(300));

    assert!(vm.compute_derived_view().is_loading());
    assert!(store.snapshot().loading);

    let dir = TempDir::new()?;
    let path = dir.path().join("missing.json");
    let result = store.refresh_from(&JsonFileLoader::new(&path)).await;
    assert!(result.is_err());

    // 失敗後結束 loading，目錄為空
    let view = vm.compute_derived_view();
    assert!(!view.is_loading());
    assert!(view.is_catalog_empty());
    Ok(())
}
