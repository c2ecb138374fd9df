//! Country-keyed flat deduction rule.
//!
//! Countries are matched by exact equality after lowercasing. There is no
//! trimming and no alias folding: `"USA"` and `"U.S."` do not match
//! `"united states"` and fall through to a zero rate.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::model::Employee;

const STANDARD_RATES: &[(&str, f64)] = &[("india", 0.10), ("united states", 0.12)];

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    pub gross_salary: f64,
    pub deduction: f64,
    pub net_salary: f64,
}

/// Immutable country → deduction rate mapping, keyed by lowercased name.
#[derive(Clone, Debug, PartialEq)]
pub struct TaxTable {
    rates: HashMap<String, f64>,
}

impl TaxTable {
    pub fn standard() -> Self {
        Self {
            rates: STANDARD_RATES
                .iter()
                .map(|(country, rate)| (country.to_string(), *rate))
                .collect(),
        }
    }

    pub fn rate_for(&self, country: &str) -> f64 {
        self.rates
            .get(&country.to_lowercase())
            .copied()
            .unwrap_or(0.0)
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::standard()
    }
}

#[derive(Clone, Debug, Default)]
pub struct SalaryCalculator {
    table: TaxTable,
}

impl SalaryCalculator {
    pub fn new(table: TaxTable) -> Self {
        Self { table }
    }

    pub fn compute(&self, gross: f64, country: &str) -> SalaryBreakdown {
        let deduction = gross * self.table.rate_for(country);
        SalaryBreakdown {
            gross_salary: gross,
            deduction,
            net_salary: gross - deduction,
        }
    }

    pub fn breakdown(&self, employee: &Employee) -> SalaryBreakdown {
        self.compute(employee.salary, &employee.country)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calculator() -> SalaryCalculator {
        SalaryCalculator::new(TaxTable::standard())
    }

    #[test]
    fn india_deducts_ten_percent() {
        let result = calculator().compute(10000.0, "India");
        assert_eq!(
            result,
            SalaryBreakdown {
                gross_salary: 10000.0,
                deduction: 1000.0,
                net_salary: 9000.0,
            }
        );
    }

    #[test]
    fn united_states_deducts_twelve_percent() {
        let result = calculator().compute(10000.0, "United States");
        assert_eq!(result.deduction, 1200.0);
        assert_eq!(result.net_salary, 8800.0);
    }

    #[test]
    fn other_countries_deduct_nothing() {
        let result = calculator().compute(10000.0, "Germany");
        assert_eq!(result.deduction, 0.0);
        assert_eq!(result.net_salary, 10000.0);
    }

    #[test]
    fn country_match_ignores_case() {
        let calc = calculator();
        assert_eq!(calc.compute(5000.0, "INDIA"), calc.compute(5000.0, "india"));
        assert_eq!(
            calc.compute(5000.0, "UNITED STATES"),
            calc.compute(5000.0, "united states")
        );
    }

    #[test]
    fn aliases_and_padding_are_not_folded() {
        let table = TaxTable::standard();
        assert_eq!(table.rate_for("USA"), 0.0);
        assert_eq!(table.rate_for("U.S."), 0.0);
        assert_eq!(table.rate_for(" India"), 0.0);
        assert_eq!(table.rate_for("India "), 0.0);
    }

    #[test]
    fn breakdown_uses_employee_salary_and_country() {
        let employee = Employee {
            id: 7,
            full_name: "Rahul Dravid".into(),
            job_title: "Cricketer".into(),
            country: "India".into(),
            salary: 10000.0,
        };
        assert_eq!(
            calculator().breakdown(&employee),
            calculator().compute(10000.0, "India")
        );
    }
}
