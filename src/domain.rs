//! Domain extraction: distinct years, distinct months and the temperature extent.

use crate::dataset::Dataset;
use crate::error::{Error, Result};
use log::debug;
use std::collections::BTreeSet;

/// Value domain of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Domain {
    /// Distinct years, ascending.
    pub years: BTreeSet<i32>,
    /// Distinct months (1-12), ascending.
    pub months: BTreeSet<u8>,
    /// `(min, max)` of `baseline + variance` over all records.
    pub value_range: (f64, f64),
}

impl Domain {
    /// Extract the domain of `dataset` in one pass.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyDataset`] when there are no records.
    pub fn extract(dataset: &Dataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(Error::EmptyDataset);
        }

        let mut years = BTreeSet::new();
        let mut months = BTreeSet::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for record in dataset.records() {
            years.insert(record.year);
            months.insert(record.month);
            let value = dataset.absolute_temperature(record);
            min = min.min(value);
            max = max.max(value);
        }

        debug!(
            "Domain: {} years, {} months, temperature {min}..{max}",
            years.len(),
            months.len()
        );

        Ok(Self { years, months, value_range: (min, max) })
    }

    /// First and last year of the domain.
    #[must_use]
    pub fn year_span(&self) -> (i32, i32) {
        // extract() never yields empty sets.
        let first = self.years.first().copied().unwrap_or_default();
        let last = self.years.last().copied().unwrap_or_default();
        (first, last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::TemperatureRecord;

    #[test]
    fn test_extract_scenario() {
        let dataset = Dataset::new(
            8.0,
            vec![TemperatureRecord::new(1900, 1, -5.0), TemperatureRecord::new(1900, 2, 2.0)],
        )
        .unwrap();

        let domain = Domain::extract(&dataset).unwrap();
        assert_eq!(domain.years.iter().copied().collect::<Vec<_>>(), vec![1900]);
        assert_eq!(domain.months.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
        assert_eq!(domain.value_range, (3.0, 10.0));
    }

    #[test]
    fn test_extract_deduplicates_and_sorts() {
        let dataset = Dataset::new(
            0.0,
            vec![
                TemperatureRecord::new(1901, 3, 1.0),
                TemperatureRecord::new(1899, 1, 4.0),
                TemperatureRecord::new(1901, 1, -2.0),
                TemperatureRecord::new(1900, 3, 0.5),
            ],
        )
        .unwrap();

        let domain = Domain::extract(&dataset).unwrap();
        assert_eq!(domain.years.iter().copied().collect::<Vec<_>>(), vec![1899, 1900, 1901]);
        assert_eq!(domain.months.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(domain.value_range, (-2.0, 4.0));
        assert_eq!(domain.year_span(), (1899, 1901));
    }

    #[test]
    fn test_extract_empty_is_error() {
        let dataset = Dataset::new(8.66, Vec::new()).unwrap();
        assert!(matches!(Domain::extract(&dataset), Err(Error::EmptyDataset)));
    }
}
