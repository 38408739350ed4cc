use crate::domain::model::{EmptyState, ListingView, Service};
use crate::utils::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ListingReport<'a> {
    catalog_len: usize,
    visible: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    empty_state: Option<&'static str>,
    services: &'a [Service],
}

#[derive(Serialize)]
struct CsvRow<'a> {
    id: &'a str,
    title: &'a str,
    category: &'a str,
    price: Option<f64>,
    average_rating: f64,
    rating_count: usize,
    created_at: Option<String>,
    provider_name: Option<&'a str>,
}

/// 以印尼盾格式顯示價格，例如 `Rp 150.000`
pub fn format_rupiah(price: f64) -> String {
    let whole = price.round() as u64;
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("Rp {}", grouped)
}

pub fn render_listing<W: Write>(view: &ListingView, format: OutputFormat, out: &mut W) -> Result<()> {
    match format {
        OutputFormat::Table => render_table(view, out),
        OutputFormat::Json => render_json(view, out),
        OutputFormat::Csv => render_csv(view, out),
    }
}

fn empty_state_key(state: EmptyState) -> &'static str {
    match state {
        EmptyState::CatalogEmpty => "catalog_empty",
        EmptyState::NoMatches => "no_matches",
    }
}

fn render_table<W: Write>(view: &ListingView, out: &mut W) -> Result<()> {
    let ListingView::Ready { catalog_len, .. } = view else {
        writeln!(out, "Memuat jasa...")?;
        return Ok(());
    };

    if let Some(state) = view.empty_state() {
        writeln!(out, "{}", state.title())?;
        writeln!(out, "{}", state.detail())?;
        return Ok(());
    }

    writeln!(
        out,
        "{:<36} {:<26} {:>14} {:>7} {:<10}",
        "Jasa", "Kategori", "Harga", "Rating", "Diposting"
    )?;
    for service in view.services() {
        let price = service.price.map(format_rupiah).unwrap_or_else(|| "-".to_string());
        let rating = if service.ratings.is_empty() {
            "-".to_string()
        } else {
            format!("{:.1}", service.average_rating())
        };
        let posted = service
            .created_at
            .map(|at| at.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());

        writeln!(
            out,
            "{:<36} {:<26} {:>14} {:>7} {:<10}",
            truncate(&service.title, 36),
            truncate(service.category.as_str(), 26),
            price,
            rating,
            posted
        )?;
    }
    writeln!(out, "\n{} dari {} jasa", view.services().len(), catalog_len)?;
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn render_json<W: Write>(view: &ListingView, out: &mut W) -> Result<()> {
    let catalog_len = match view {
        ListingView::Ready { catalog_len, .. } => *catalog_len,
        ListingView::Loading => 0,
    };
    let report = ListingReport {
        catalog_len,
        visible: view.services().len(),
        empty_state: view.empty_state().map(empty_state_key),
        services: view.services(),
    };
    serde_json::to_writer_pretty(&mut *out, &report)?;
    writeln!(out)?;
    Ok(())
}

fn render_csv<W: Write>(view: &ListingView, out: &mut W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for service in view.services() {
        writer.serialize(CsvRow {
            id: &service.id,
            title: &service.title,
            category: service.category.as_str(),
            price: service.price,
            average_rating: service.average_rating(),
            rating_count: service.ratings.len(),
            created_at: service.created_at.map(|at| at.to_rfc3339()),
            provider_name: service.provider_name.as_deref(),
        })?;
    }
    writer.flush()?;
    Ok(())
}
