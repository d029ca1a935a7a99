//! County-level demographic extract (ACS five-year estimates).

use serde::{Deserialize, Serialize};

/// One county row from a local ACS extract, keyed by five-digit GEOID.
///
/// Field names match the extract CSV header so the row deserializes
/// directly with the csv crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountyDemographics {
    #[serde(rename = "GEOID")]
    pub geoid: String,
    #[serde(rename = "Total_Population")]
    pub total_population: f64,
    #[serde(rename = "Median_Age")]
    pub median_age: f64,
    #[serde(rename = "Median_Household_Income")]
    pub median_household_income: f64,
    #[serde(rename = "White_Population")]
    pub white_population: f64,
    #[serde(rename = "Black_Population")]
    pub black_population: f64,
    #[serde(rename = "Asian_Population")]
    pub asian_population: f64,
    #[serde(rename = "Hispanic_Population")]
    pub hispanic_population: f64,
}

impl CountyDemographics {
    /// Percent share of a population component, None for empty counties.
    fn share(&self, component: f64) -> Option<f64> {
        if self.total_population > 0.0 {
            Some(component / self.total_population * 100.0)
        } else {
            None
        }
    }

    pub fn percent_white(&self) -> Option<f64> {
        self.share(self.white_population)
    }

    pub fn percent_black(&self) -> Option<f64> {
        self.share(self.black_population)
    }

    pub fn percent_asian(&self) -> Option<f64> {
        self.share(self.asian_population)
    }

    pub fn percent_hispanic(&self) -> Option<f64> {
        self.share(self.hispanic_population)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CountyDemographics {
        CountyDemographics {
            geoid: "06075".to_string(),
            total_population: 1000.0,
            median_age: 38.0,
            median_household_income: 60000.0,
            white_population: 400.0,
            black_population: 300.0,
            asian_population: 200.0,
            hispanic_population: 100.0,
        }
    }

    #[test]
    fn test_percentage_shares() {
        let county = sample();
        assert_eq!(county.percent_white(), Some(40.0));
        assert_eq!(county.percent_hispanic(), Some(10.0));
    }

    #[test]
    fn test_empty_county_has_no_shares() {
        let county = CountyDemographics {
            total_population: 0.0,
            ..sample()
        };
        assert_eq!(county.percent_white(), None);
    }
}
