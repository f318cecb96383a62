//! Read-side query engine: category scope, text search, exact-match
//! filters, sorting, and facet-value enumeration for the filter controls.
//! Pure functions over an already-loaded collection.

use crate::facet::{extract_facets, specs_to_table, ProductFacets, SpecRow};
use catalog_types::product::Product;
use catalog_types::slug::sanitize_category;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Product as served to the presentation layer: the stored record plus the
/// derived specs table and numeric facets.
#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct CatalogItem {
    #[serde(flatten)]
    pub product: Product,
    pub specs_table: Vec<SpecRow>,
    #[serde(flatten)]
    pub facets: ProductFacets,
}

impl From<Product> for CatalogItem {
    fn from(product: Product) -> Self {
        let specs_table = specs_to_table(&product.specs);
        let facets = extract_facets(&specs_table);
        Self {
            product,
            specs_table,
            facets,
        }
    }
}

pub fn enrich(products: Vec<Product>) -> Vec<CatalogItem> {
    products.into_iter().map(CatalogItem::from).collect()
}

#[derive(Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct QueryParams {
    pub category: Option<String>,
    pub q: Option<String>,
    pub brand: Option<String>,
    pub year: Option<String>,
    pub cargo: Option<String>,
    pub outreach: Option<String>,
    pub sections: Option<String>,
    pub sort: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SortKey {
    NameAsc,
    YearDesc,
    UpdatedDesc,
    Relevance,
}

impl SortKey {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "name_asc" => SortKey::NameAsc,
            "year_desc" => SortKey::YearDesc,
            "updated_desc" => SortKey::UpdatedDesc,
            _ => SortKey::Relevance,
        }
    }
}

/// Filter and sort pipeline. Every stage is skipped when its parameter is
/// absent; all sorts are stable, and relevance without a query keeps the
/// input order untouched.
pub fn query(items: &[CatalogItem], params: &QueryParams) -> Vec<CatalogItem> {
    let mut list: Vec<&CatalogItem> = items.iter().collect();

    if let Some(category) = non_empty(&params.category) {
        let want = sanitize_category(category);
        list.retain(|i| sanitize_category(&i.product.category) == want);
    }

    let text_query = non_empty(&params.q).map(str::to_lowercase);
    if let Some(q) = &text_query {
        list.retain(|i| {
            i.product.title.to_lowercase().contains(q)
                || i.product.short.to_lowercase().contains(q)
        });
    }

    if let Some(brand) = non_empty(&params.brand) {
        let want = brand.to_lowercase();
        list.retain(|i| i.product.brand.to_lowercase() == want);
    }
    if let Some(year) = non_empty(&params.year) {
        list.retain(|i| i.product.year == year);
    }
    if let Some(filter) = non_empty(&params.cargo) {
        list.retain(|i| facet_matches_f64(i.facets.cargo, filter));
    }
    if let Some(filter) = non_empty(&params.outreach) {
        list.retain(|i| facet_matches_f64(i.facets.outreach, filter));
    }
    if let Some(filter) = non_empty(&params.sections) {
        list.retain(|i| facet_matches_i64(i.facets.sections, filter));
    }

    let sort = SortKey::parse(params.sort.as_deref().unwrap_or(""));
    match sort {
        SortKey::NameAsc => list.sort_by_key(|i| collation_key(&i.product.title)),
        SortKey::YearDesc => list.sort_by_key(|i| Reverse(leading_int(&i.product.year))),
        SortKey::UpdatedDesc => {
            list.sort_by(|a, b| b.product.updated_at.cmp(&a.product.updated_at))
        }
        SortKey::Relevance => {
            if let Some(q) = &text_query {
                list.sort_by_key(|i| Reverse(relevance_score(i, q)));
            }
        }
    }

    list.into_iter().cloned().collect()
}

/// 3 points for a title match, 1 for a short-description match. Used only
/// to order, never to exclude.
fn relevance_score(item: &CatalogItem, query: &str) -> u32 {
    let mut score = 0;
    if item.product.title.to_lowercase().contains(query) {
        score += 3;
    }
    if item.product.short.to_lowercase().contains(query) {
        score += 1;
    }
    score
}

/// Distinct values available for the filter selects, scoped to a category
/// when one is given.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct FacetOptions {
    pub brands: Vec<String>,
    pub years: Vec<String>,
    pub cargo: Vec<f64>,
    pub outreach: Vec<f64>,
    pub sections: Vec<i64>,
}

pub fn enumerate_facets(items: &[CatalogItem], category: Option<&str>) -> FacetOptions {
    let scope: Vec<&CatalogItem> = match category.map(str::trim).filter(|c| !c.is_empty()) {
        Some(cat) => {
            let want = sanitize_category(cat);
            items
                .iter()
                .filter(|i| sanitize_category(&i.product.category) == want)
                .collect()
        }
        None => items.iter().collect(),
    };

    let brands: Vec<String> = scope
        .iter()
        .map(|i| i.product.brand.trim().to_string())
        .filter(|b| !b.is_empty())
        .unique()
        .sorted_by_key(|b| collation_key(b))
        .collect();

    let years: Vec<String> = scope
        .iter()
        .map(|i| i.product.year.trim().to_string())
        .filter(|y| !y.is_empty())
        .unique()
        .sorted_by_key(|y| Reverse(leading_int(y)))
        .collect();

    FacetOptions {
        brands,
        years,
        cargo: numeric_options(scope.iter().filter_map(|i| i.facets.cargo)),
        outreach: numeric_options(scope.iter().filter_map(|i| i.facets.outreach)),
        sections: sorted_unique(scope.iter().filter_map(|i| i.facets.sections)),
    }
}

fn numeric_options(values: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.collect();
    out.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    out.dedup();
    out
}

fn sorted_unique(values: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut out: Vec<i64> = values.collect();
    out.sort_unstable();
    out.dedup();
    out
}

/// Exact string match against the facet's shortest decimal rendering, the
/// same representation the filter options are built from.
fn facet_matches_f64(facet: Option<f64>, filter: &str) -> bool {
    facet.is_some_and(|v| format!("{v}") == filter.trim())
}

fn facet_matches_i64(facet: Option<i64>, filter: &str) -> bool {
    facet.is_some_and(|v| format!("{v}") == filter.trim())
}

/// Collation stand-in for ru locale ordering: lowercase with `ё` folded to
/// `е`, compared by code point.
fn collation_key(s: &str) -> String {
    s.to_lowercase().replace('ё', "е")
}

/// `parseInt` semantics: leading integer, anything else is 0.
fn leading_int(s: &str) -> i64 {
    let t = s.trim();
    let (sign, digits) = match t.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, t),
    };
    let lead: String = digits.chars().take_while(char::is_ascii_digit).collect();
    lead.parse::<i64>().map(|n| sign * n).unwrap_or(0)
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
