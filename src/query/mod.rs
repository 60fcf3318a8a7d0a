//! Query facade over an ingested dataset.
//!
//! This is the surface an outer layer (CLI, HTTP handlers) calls. Every
//! operation is a synchronous read of the immutable `Dataset`; nothing here
//! mutates or caches.

use std::collections::BTreeSet;

use crate::domain::{ActualPoint, ActualSeries, FiscalYear, ForecastType, MetricsRecord};
use crate::error::QueryError;
use crate::io::ingest::Dataset;
use crate::metrics::selection::{
    adopted_summary, compare_records, evaluable_years, method_records, select_slice, sort_records,
};

/// Named accuracy queries over one dataset.
#[derive(Debug, Clone)]
pub struct ForecastAccuracy {
    dataset: Dataset,
}

impl ForecastAccuracy {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Distinct products, sorted. Includes products without evaluable FYs.
    pub fn products(&self) -> Vec<String> {
        self.distinct(|o| o.product.clone())
    }

    /// Distinct forecast methods, sorted.
    pub fn methods(&self) -> Vec<String> {
        self.distinct(|o| o.method.clone())
    }

    /// Distinct canonical forecast types present in the data.
    pub fn forecast_types(&self) -> Vec<String> {
        let types: BTreeSet<ForecastType> = self.dataset.observations().iter().map(|o| o.forecast_type).collect();
        types.into_iter().map(|t| t.to_string()).collect()
    }

    /// Evaluable FY labels for a product, oldest first.
    pub fn fiscal_years(&self, product: &str) -> Result<Vec<String>, QueryError> {
        self.ensure_known_product(product)?;
        let years = evaluable_years(&self.dataset, product);
        if years.is_empty() {
            return Err(QueryError::NoFiscalYears {
                product: product.to_string(),
            });
        }
        Ok(years.into_iter().map(FiscalYear::label).collect())
    }

    /// Accuracy of the resolved adopted method for one product-FY.
    pub fn adopted_summary(
        &self,
        product: &str,
        fy: &str,
        forecast_type: Option<&str>,
    ) -> Result<MetricsRecord, QueryError> {
        tracing::debug!(product, fy, ?forecast_type, "adopted summary");
        let rows = select_slice(&self.dataset, product, fy, forecast_type)?;
        adopted_summary(&rows, product, fy, forecast_type.and_then(ForecastType::parse))
    }

    /// Every observed method for one product-FY, adopted first, then by accuracy.
    pub fn compare_methods(
        &self,
        product: &str,
        fy: &str,
        forecast_type: Option<&str>,
    ) -> Result<Vec<MetricsRecord>, QueryError> {
        tracing::debug!(product, fy, ?forecast_type, "method comparison");
        let rows = select_slice(&self.dataset, product, fy, forecast_type)?;
        let mut records = method_records(&rows, product, fy);
        sort_records(&mut records);
        Ok(records)
    }

    /// Method comparison across several FYs.
    ///
    /// `years = None` means every evaluable FY of the product. Requested
    /// years without data are skipped; rows come out oldest FY first.
    pub fn trend(
        &self,
        product: &str,
        years: Option<&[String]>,
        forecast_type: Option<&str>,
    ) -> Result<Vec<MetricsRecord>, QueryError> {
        self.ensure_known_product(product)?;
        let known = evaluable_years(&self.dataset, product);
        let mut labels: Vec<String> = match years {
            Some(ys) => ys.to_vec(),
            None => known.iter().map(|fy| fy.label()).collect(),
        };
        let mut seen = BTreeSet::new();
        labels.retain(|l| seen.insert(l.clone()));
        if labels.is_empty() {
            return Err(QueryError::NoFiscalYears {
                product: product.to_string(),
            });
        }
        tracing::debug!(product, years = ?labels, ?forecast_type, "trend");

        let mut records = Vec::new();
        for fy in &labels {
            match self.compare_methods(product, fy, forecast_type) {
                Ok(mut rows) => records.append(&mut rows),
                Err(err @ QueryError::UnknownForecastType { .. }) => return Err(err),
                Err(err) => tracing::debug!(%err, "skipping year"),
            }
        }

        if records.is_empty() {
            return Err(QueryError::NoDataForYears {
                product: product.to_string(),
                years: labels,
            });
        }

        // Every label with data is one of the product's evaluable years.
        let fy_order = |label: &str| known.iter().position(|fy| fy.label() == label);
        records.sort_by(|a, b| fy_order(&a.fy).cmp(&fy_order(&b.fy)).then_with(|| compare_records(a, b)));
        Ok(records)
    }

    /// Actual consumption for one product-FY, one point per period and type.
    pub fn actuals(
        &self,
        product: &str,
        fy: &str,
        forecast_type: Option<&str>,
    ) -> Result<ActualSeries, QueryError> {
        let rows = select_slice(&self.dataset, product, fy, forecast_type)?;

        let mut seen = BTreeSet::new();
        let mut points: Vec<ActualPoint> = rows
            .iter()
            .filter_map(|o| {
                let period = o.period_date?;
                let actual = o.actual?;
                seen.insert((period, o.forecast_type)).then_some(ActualPoint {
                    period,
                    forecast_type: o.forecast_type,
                    actual,
                })
            })
            .collect();
        points.sort_by(|a, b| a.period.cmp(&b.period).then(a.forecast_type.cmp(&b.forecast_type)));

        Ok(ActualSeries {
            product: product.to_string(),
            fy: fy.to_string(),
            points,
        })
    }

    fn distinct(&self, key: impl Fn(&crate::domain::Observation) -> String) -> Vec<String> {
        let set: BTreeSet<String> = self.dataset.observations().iter().map(key).collect();
        set.into_iter().collect()
    }

    fn ensure_known_product(&self, product: &str) -> Result<(), QueryError> {
        if self.dataset.observations().iter().any(|o| o.product == product) {
            Ok(())
        } else {
            Err(QueryError::UnknownProduct {
                product: product.to_string(),
            })
        }
    }
}
