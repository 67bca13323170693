//! Base-stock levels across supply echelons.

use super::policy::z_score;
use super::types::{EchelonFacility, StockLevel};
use crate::error::{Error, Result};

/// Base-stock policy for every facility at a common service level.
///
/// `safety = z * sigma * sqrt(L)`, `base = mu * L + safety`. Results are
/// ordered by echelon, upstream first; facilities within an echelon keep
/// input order.
///
/// # Errors
///
/// - [`Error::InvalidInput`] unless `0 < service_level < 1`, or for a
///   facility with negative demand, deviation or lead time
pub fn multi_echelon(facilities: &[EchelonFacility], service_level: f64) -> Result<Vec<StockLevel>> {
    let z = z_score(service_level)?;

    let mut levels = Vec::with_capacity(facilities.len());
    for f in facilities {
        for (what, v) in [
            ("mean daily demand", f.mean_daily_demand),
            ("demand deviation", f.demand_std_dev),
            ("lead time", f.lead_time_days),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::InvalidInput(format!(
                    "facility {}: invalid {what} {v}",
                    f.id
                )));
            }
        }
        let safety_stock = z * f.demand_std_dev * f.lead_time_days.sqrt();
        levels.push(StockLevel {
            id: f.id.clone(),
            echelon: f.echelon,
            safety_stock,
            base_stock: f.mean_daily_demand * f.lead_time_days + safety_stock,
            service_level,
        });
    }
    levels.sort_by_key(|l| l.echelon);

    tracing::debug!(facilities = levels.len(), z, "multi-echelon base stock computed");
    Ok(levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility(id: &str, echelon: u32, mu: f64, sigma: f64, lead: f64) -> EchelonFacility {
        EchelonFacility {
            id: id.into(),
            echelon,
            mean_daily_demand: mu,
            demand_std_dev: sigma,
            lead_time_days: lead,
        }
    }

    #[test]
    fn test_base_stock_formula() {
        let levels = multi_echelon(&[facility("nakuru", 3, 40.0, 10.0, 4.0)], 0.95).unwrap();
        let safety = 1.644_853_6 * 10.0 * 2.0;
        assert!((levels[0].safety_stock - safety).abs() < 1e-5);
        assert!((levels[0].base_stock - (160.0 + safety)).abs() < 1e-5);
    }

    #[test]
    fn test_sorted_upstream_first() {
        let levels = multi_echelon(
            &[
                facility("eldoret", 3, 10.0, 2.0, 2.0),
                facility("nairobi", 1, 100.0, 20.0, 7.0),
                facility("kisumu", 2, 30.0, 5.0, 3.0),
                facility("kitale", 3, 8.0, 2.0, 2.0),
            ],
            0.9,
        )
        .unwrap();
        let ids: Vec<&str> = levels.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, ["nairobi", "kisumu", "eldoret", "kitale"]);
    }

    #[test]
    fn test_zero_variability_means_no_safety() {
        let levels = multi_echelon(&[facility("x", 1, 5.0, 0.0, 3.0)], 0.99).unwrap();
        assert_eq!(levels[0].safety_stock, 0.0);
        assert_eq!(levels[0].base_stock, 15.0);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(multi_echelon(&[], 1.0).is_err());
        assert!(multi_echelon(&[facility("x", 1, -1.0, 0.0, 1.0)], 0.9).is_err());
    }
}
