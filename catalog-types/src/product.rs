//! Catalog product record, its partial-input form and normalization rules.

use crate::slug::{sanitize_category, slugify};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use time::OffsetDateTime;

pub const PLACEHOLDER_IMAGE: &str = "/assets/img/placeholder.svg";
pub const MAX_IMAGES: usize = 10;

pub const DEFAULT_STATUS: &str = "В наличии";
pub const DEFAULT_PRICE: &str = "Цена по запросу";
pub const DEFAULT_CTA: &str = "Узнать цену";
pub const DEFAULT_TITLE: &str = "Товар";

/// Fields an update keeps from the stored record when the payload omits
/// them. Everything else falls back to normalization defaults.
pub const PRESERVED_ON_UPDATE: &[&str] = &[
    "featured",
    "featured_rank",
    "cta",
    "cargo",
    "outreach",
    "sections",
    "control",
];

/// Persisted product record. Every field is concrete; `ProductPatch` +
/// [`ProductPatch::normalize`] is the only way records are produced, so the
/// invariants (sanitized category, non-empty title, capped image list) hold
/// for anything that reaches the store.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Default)]
#[serde(default)]
pub struct Product {
    pub id: String,
    pub slug: String,
    pub category: String,
    pub title: String,
    pub brand: String,
    pub model: String,
    pub year: String,
    pub status: String,
    pub price: String,
    pub city: String,
    pub short: String,
    pub description: String,
    pub specs: String,
    pub cta: String,
    pub cargo: String,
    pub outreach: String,
    pub sections: String,
    pub control: String,
    pub featured: bool,
    pub featured_rank: String,
    pub images: Vec<String>,
    /// First entry of `images`, kept for consumers that read a single cover.
    pub image: String,
    pub updated_at: String,
}

/// Image input as it arrives from admin forms and CSV: either a real list
/// or one text blob with one path per line.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum ImagesInput {
    List(Vec<String>),
    Text(String),
}

/// Canonical image list: trimmed, no empties, first-seen dedup, at most
/// [`MAX_IMAGES`] entries. Idempotent.
pub fn normalize_images(input: &ImagesInput) -> Vec<String> {
    let items: Vec<&str> = match input {
        ImagesInput::List(v) => v.iter().map(String::as_str).collect(),
        ImagesInput::Text(s) => s.split(['\n', '\r']).collect(),
    };
    items
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unique()
        .take(MAX_IMAGES)
        .map(str::to_string)
        .collect()
}

/// Partial product as submitted by the admin API or built from a CSV row.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct ProductPatch {
    pub id: Option<String>,
    pub slug: Option<String>,
    pub category: Option<String>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub status: Option<String>,
    pub price: Option<String>,
    pub city: Option<String>,
    pub short: Option<String>,
    pub description: Option<String>,
    pub specs: Option<String>,
    pub cta: Option<String>,
    pub cargo: Option<String>,
    pub outreach: Option<String>,
    pub sections: Option<String>,
    pub control: Option<String>,
    pub featured: Option<bool>,
    pub featured_rank: Option<String>,
    pub images: Option<ImagesInput>,
    pub image: Option<String>,
    pub updated_at: Option<String>,
}

impl ProductPatch {
    /// Applies trimming, defaults, the title fallback chain, slug
    /// derivation, specs synthesis and image canonicalization.
    pub fn normalize(self) -> Product {
        let id = trimmed(self.id);
        let category = sanitize_category(&self.category.unwrap_or_default());
        let brand = trimmed(self.brand);
        let model = trimmed(self.model);

        let mut title = trimmed(self.title);
        if title.is_empty() {
            title = [brand.as_str(), model.as_str()]
                .iter()
                .filter(|s| !s.is_empty())
                .join(" ");
        }
        if title.is_empty() {
            title = if id.is_empty() {
                DEFAULT_TITLE.to_string()
            } else {
                id.clone()
            };
        }

        let mut slug = trimmed(self.slug);
        if slug.is_empty() {
            slug = slugify(&title);
        }

        let cargo = trimmed(self.cargo);
        let outreach = trimmed(self.outreach);
        let sections = trimmed(self.sections);
        let control = trimmed(self.control);

        let mut specs = trimmed(self.specs);
        if specs.is_empty() {
            specs = specs_from_fields(&cargo, &outreach, &sections, &control);
        }

        let main = trimmed(self.image);
        let mut images = self
            .images
            .as_ref()
            .map(normalize_images)
            .unwrap_or_default();
        if !main.is_empty() && !images.iter().any(|x| x == &main) {
            images.insert(0, main);
            images.truncate(MAX_IMAGES);
        }
        if images.is_empty() {
            images.push(PLACEHOLDER_IMAGE.to_string());
        }
        let image = images[0].clone();

        Product {
            id,
            slug,
            category,
            title,
            brand,
            model,
            year: trimmed(self.year),
            status: trimmed_or(self.status, DEFAULT_STATUS),
            price: trimmed_or(self.price, DEFAULT_PRICE),
            city: trimmed(self.city),
            short: trimmed(self.short),
            description: trimmed(self.description),
            specs,
            cta: trimmed_or(self.cta, DEFAULT_CTA),
            cargo,
            outreach,
            sections,
            control,
            featured: self.featured.unwrap_or(false),
            featured_rank: trimmed(self.featured_rank),
            images,
            image,
            updated_at: trimmed(self.updated_at),
        }
    }
}

/// Merge an update payload over the stored record. Present patch fields
/// win; the [`PRESERVED_ON_UPDATE`] fields fall back to the stored value
/// instead of resetting to defaults. The id is always the stored one.
pub fn merge(existing: &Product, mut patch: ProductPatch) -> ProductPatch {
    patch.id = Some(existing.id.clone());
    patch.featured = patch.featured.or(Some(existing.featured));
    patch.featured_rank = patch
        .featured_rank
        .or_else(|| Some(existing.featured_rank.clone()));
    patch.cta = patch.cta.or_else(|| Some(existing.cta.clone()));
    patch.cargo = patch.cargo.or_else(|| Some(existing.cargo.clone()));
    patch.outreach = patch.outreach.or_else(|| Some(existing.outreach.clone()));
    patch.sections = patch.sections.or_else(|| Some(existing.sections.clone()));
    patch.control = patch.control.or_else(|| Some(existing.control.clone()));
    patch
}

/// Time-derived id token, `p{unix millis}`, bumped until it misses the
/// taken set so same-millisecond batch rows still get distinct ids.
pub fn mint_id(taken: &HashSet<String>) -> String {
    let mut millis = OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000;
    loop {
        let id = format!("p{millis}");
        if !taken.contains(&id) {
            return id;
        }
        millis += 1;
    }
}

fn specs_from_fields(cargo: &str, outreach: &str, sections: &str, control: &str) -> String {
    [
        ("Груз", cargo),
        ("Вылет", outreach),
        ("Секций", sections),
        ("Управление", control),
    ]
    .iter()
    .filter(|(_, v)| !v.is_empty())
    .map(|(k, v)| format!("{k}: {v}"))
    .join("\n")
}

fn trimmed(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_string()
}

fn trimmed_or(value: Option<String>, default: &str) -> String {
    let s = trimmed(value);
    if s.is_empty() {
        default.to_string()
    } else {
        s
    }
}
