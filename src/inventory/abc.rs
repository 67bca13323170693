//! ABC classification by annual value.

use super::types::{AbcAnalysis, AbcClass, AbcEntry, ClassShare, InventoryItem};
use crate::error::{Error, Result};

/// Cumulative value share, in percent, up to which items are class A.
pub const CLASS_A_CUTOFF: f64 = 70.0;
/// Cumulative value share, in percent, up to which items are class B.
pub const CLASS_B_CUTOFF: f64 = 90.0;

/// Ranks items by `unit_cost * annual_demand` and splits them at the
/// 70 % and 90 % cumulative value marks.
///
/// Ties keep input order.
///
/// # Errors
///
/// - [`Error::EmptyInput`] if `items` is empty
/// - [`Error::InvalidInput`] if the total annual value is not positive
pub fn abc_analysis(items: &[InventoryItem]) -> Result<AbcAnalysis> {
    if items.is_empty() {
        return Err(Error::EmptyInput("abc analysis needs at least one item"));
    }
    let mut ranked: Vec<(&InventoryItem, f64)> =
        items.iter().map(|item| (item, item.annual_value())).collect();
    if let Some((item, v)) = ranked.iter().find(|(_, v)| !v.is_finite() || *v < 0.0) {
        return Err(Error::InvalidInput(format!(
            "item {} has invalid annual value {v}",
            item.id
        )));
    }
    let total_value: f64 = ranked.iter().map(|(_, v)| v).sum();
    if total_value <= 0.0 {
        return Err(Error::InvalidInput(
            "total annual value must be positive".into(),
        ));
    }
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    // Shares come from the running value sum so the cutoffs compare exactly.
    let mut cumulative_value = 0.0;
    let entries: Vec<AbcEntry> = ranked
        .into_iter()
        .map(|(item, annual_value)| {
            let value_pct = annual_value / total_value * 100.0;
            cumulative_value += annual_value;
            let cumulative = cumulative_value * 100.0 / total_value;
            let class = if cumulative <= CLASS_A_CUTOFF {
                AbcClass::A
            } else if cumulative <= CLASS_B_CUTOFF {
                AbcClass::B
            } else {
                AbcClass::C
            };
            AbcEntry {
                id: item.id.clone(),
                annual_value,
                value_pct,
                cumulative_pct: cumulative,
                class,
            }
        })
        .collect();

    let share = |class: AbcClass| {
        let (value, count) = entries
            .iter()
            .filter(|e| e.class == class)
            .fold((0.0, 0usize), |(v, n), e| (v + e.annual_value, n + 1));
        ClassShare {
            value_pct: value / total_value * 100.0,
            item_pct: count as f64 / entries.len() as f64 * 100.0,
        }
    };

    Ok(AbcAnalysis {
        class_a: share(AbcClass::A),
        class_b: share(AbcClass::B),
        class_c: share(AbcClass::C),
        total_value,
        entries,
    })
}
