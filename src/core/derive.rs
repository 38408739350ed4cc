use crate::domain::model::{FilterState, Service, SortOption};
use std::cmp::Ordering;

pub type Comparator = fn(&Service, &Service) -> Ordering;

/// 標題或描述的不分大小寫子字串比對；空字串全部符合
pub fn matches_search(service: &Service, search_term: &str) -> bool {
    if search_term.is_empty() {
        return true;
    }
    let needle = search_term.to_lowercase();
    service.title.to_lowercase().contains(&needle)
        || service.description.to_lowercase().contains(&needle)
}

pub fn comparator_for(sort: SortOption) -> Comparator {
    match sort {
        SortOption::Newest => newest_first,
        SortOption::Rating => highest_rated_first,
        SortOption::PriceAsc => cheapest_first,
    }
}

/// 缺少 created_at 的項目排在最後
fn newest_first(a: &Service, b: &Service) -> Ordering {
    match (a.created_at, b.created_at) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 沒有評分視為 0，且排在同分的已評分項目之後
fn highest_rated_first(a: &Service, b: &Service) -> Ordering {
    b.average_rating()
        .total_cmp(&a.average_rating())
        .then_with(|| (!b.ratings.is_empty()).cmp(&!a.ratings.is_empty()))
}

fn cheapest_first(a: &Service, b: &Service) -> Ordering {
    match (a.price, b.price) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// 篩選並排序目錄的副本，不改動輸入
pub fn derive_view(services: &[Service], state: &FilterState) -> Vec<Service> {
    let mut result: Vec<Service> = services
        .iter()
        .filter(|service| service.is_active())
        .filter(|service| matches_search(service, &state.search_term))
        .filter(|service| state.category.matches(&service.category))
        .cloned()
        .collect();

    // sort_by 是穩定排序，相同鍵值保持原順序
    result.sort_by(comparator_for(state.sort));
    result
}
