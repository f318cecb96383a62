//! Numeric facets derived from the free-text specs block. Best-effort
//! enrichment: a missing row or an unparseable value is simply absent.

use lazy_regex::regex;
use serde::{Deserialize, Serialize};

/// Keyword sets matched as lowercase substrings of a spec row key. The
/// first matching row in table order wins, so facet values are
/// order-dependent on the specs table by design.
pub const CARGO_KEYWORDS: &[&str] = &["грузопод", "груз", "грузовой"];
pub const OUTREACH_KEYWORDS: &[&str] = &["вылет", "радиус"];
pub const SECTIONS_KEYWORDS: &[&str] = &["секц"];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SpecRow {
    pub k: String,
    pub v: String,
}

/// Splits a specs blob into key/value rows. Separators: line breaks, `;`
/// and `|`; rows without a colon become a generic "Параметр" row.
pub fn specs_to_table(specs: &str) -> Vec<SpecRow> {
    if specs.trim().is_empty() {
        return vec![];
    }
    regex!(r"[\n\r;|]\s*")
        .split(specs)
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            Some(match part.split_once(':') {
                Some((k, v)) => SpecRow {
                    k: k.trim().to_string(),
                    v: v.trim().to_string(),
                },
                None => SpecRow {
                    k: "Параметр".to_string(),
                    v: part.to_string(),
                },
            })
        })
        .collect()
}

#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq)]
pub struct ProductFacets {
    #[serde(rename = "_cargo")]
    pub cargo: Option<f64>,
    #[serde(rename = "_outreach")]
    pub outreach: Option<f64>,
    #[serde(rename = "_sections")]
    pub sections: Option<i64>,
}

pub fn extract_facets(rows: &[SpecRow]) -> ProductFacets {
    let cargo = pick_spec(rows, CARGO_KEYWORDS).and_then(first_number);
    let outreach = pick_spec(rows, OUTREACH_KEYWORDS).and_then(first_number);
    let sections = pick_spec(rows, SECTIONS_KEYWORDS)
        .and_then(first_number)
        .map(|n| n.round() as i64);
    ProductFacets {
        cargo,
        outreach,
        sections,
    }
}

/// Value of the first row whose lowercased key contains any keyword.
fn pick_spec<'a>(rows: &'a [SpecRow], keywords: &[&str]) -> Option<&'a str> {
    rows.iter().find_map(|row| {
        let key = row.k.to_lowercase();
        if !key.is_empty() && keywords.iter().any(|kw| key.contains(kw)) {
            Some(row.v.as_str())
        } else {
            None
        }
    })
}

/// First signed decimal in the text; comma is a decimal separator.
pub fn first_number(value: &str) -> Option<f64> {
    let normalized = value.replace(',', ".");
    regex!(r"-?\d+(\.\d+)?")
        .find(&normalized)
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(specs: &str) -> Vec<SpecRow> {
        specs_to_table(specs)
    }

    #[test]
    fn table_splits_on_all_separators() {
        let rows = table("Груз: 7 т; Вылет: 14 м | Секций: 5\nпульт");
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].k, "Груз");
        assert_eq!(rows[0].v, "7 т");
        assert_eq!(rows[3].k, "Параметр");
        assert_eq!(rows[3].v, "пульт");
    }

    #[test]
    fn cargo_from_capacity_row() {
        let facets = extract_facets(&table("Грузоподъёмность: 7.0 т"));
        assert_eq!(facets.cargo, Some(7.0));
        assert_eq!(facets.outreach, None);
        assert_eq!(facets.sections, None);
    }

    #[test]
    fn comma_decimal_separator() {
        let facets = extract_facets(&table("Вылет стрелы: 12,5 м"));
        assert_eq!(facets.outreach, Some(12.5));
    }

    #[test]
    fn sections_rounded_to_integer() {
        let facets = extract_facets(&table("Секции: 5.6"));
        assert_eq!(facets.sections, Some(6));
    }

    #[test]
    fn first_matching_row_wins() {
        // "грузовой момент" matches before the dedicated capacity row
        let facets = extract_facets(&table("Грузовой момент: 17 тм\nГрузоподъёмность: 7 т"));
        assert_eq!(facets.cargo, Some(17.0));
    }

    #[test]
    fn unparseable_value_is_absent() {
        let facets = extract_facets(&table("Груз: большой"));
        assert_eq!(facets.cargo, None);
    }

    #[test]
    fn number_parsing() {
        assert_eq!(first_number("до 7 т"), Some(7.0));
        assert_eq!(first_number("-2,75 м"), Some(-2.75));
        assert_eq!(first_number("нет"), None);
    }
}
