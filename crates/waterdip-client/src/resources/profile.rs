//! Waterdip Client Model Profile
//!
//! Dataset-level totals and per-feature statistics split into text,
//! numerical and categorical features. Each category reports its own total.
//!
//! @version 0.1.0
//! @author AutomataNexus Development Team

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use waterdip_common::Result;

use crate::de;
use crate::endpoints;
use crate::http::ApiResponse;
use crate::WaterdipClient;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
struct ProfileParams<'a> {
    model_id: &'a str,
}

// =============================================================================
// View Models
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFeature {
    pub name: String,
    pub distinct_count: f64,
    pub distinct_percentage: f64,
    pub missing_count: f64,
    pub missing_percentage: f64,
    pub word_counts: BTreeMap<String, f64>,
    pub mean_length: f64,
    pub min_length: f64,
    pub max_length: f64,
    pub histogram: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericHistogram {
    pub counts: Vec<f64>,
    pub bin_edges: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumericalFeature {
    pub name: String,
    pub distinct_count: f64,
    pub distinct_percentage: f64,
    pub missing_count: f64,
    pub missing_percentage: f64,
    pub zeroes_count: f64,
    pub zeroes_percentage: f64,
    pub minimum: f64,
    pub maximum: f64,
    pub mean: f64,
    pub std: f64,
    pub variance: f64,
    pub p5: f64,
    pub p25: f64,
    pub p50: f64,
    pub p75: f64,
    pub p95: f64,
    pub kurtosis: f64,
    pub skewness: f64,
    pub histogram: NumericHistogram,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoricalFeature {
    pub name: String,
    pub distinct_count: f64,
    pub distinct_percentage: f64,
    pub missing_count: f64,
    pub missing_percentage: f64,
    pub histogram: BTreeMap<String, f64>,
    pub histogram_value_type: String,
}

/// A feature category: its own total plus the feature rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureGroup<T> {
    pub total: u64,
    pub data: Vec<T>,
}

impl<T> Default for FeatureGroup<T> {
    fn default() -> Self {
        Self {
            total: 0,
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProfile {
    pub total_features: u64,
    pub total_data_rows: u64,
    pub total_duplicates: u64,
    pub total_missing_values: u64,
    pub percentage_duplicates: f64,
    pub percentage_missing_values: f64,
    pub text: FeatureGroup<TextFeature>,
    pub numerical: FeatureGroup<NumericalFeature>,
    pub categorical: FeatureGroup<CategoricalFeature>,
}

// =============================================================================
// Raw Schema
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawTextFeature {
    #[serde(default, deserialize_with = "de::opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    distinct_count: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    distinct_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    missing_count: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    missing_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_map")]
    word_counts: Option<BTreeMap<String, f64>>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    mean_length: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    min_length: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    max_length: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_map")]
    histogram: Option<BTreeMap<String, f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNumericHistogram {
    #[serde(default, deserialize_with = "de::opt_f64_vec")]
    counts: Option<Vec<f64>>,
    #[serde(default, deserialize_with = "de::opt_f64_vec")]
    bin_edges: Option<Vec<f64>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawNumericalFeature {
    #[serde(default, deserialize_with = "de::opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    distinct_count: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    distinct_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    missing_count: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    missing_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    zeroes_count: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    zeros_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    minimum: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    maximum: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    mean: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    std: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    variance: Option<f64>,
    #[serde(default, rename = "5%", deserialize_with = "de::opt_f64")]
    p5: Option<f64>,
    #[serde(default, rename = "25%", deserialize_with = "de::opt_f64")]
    p25: Option<f64>,
    #[serde(default, rename = "50%", deserialize_with = "de::opt_f64")]
    p50: Option<f64>,
    #[serde(default, rename = "75%", deserialize_with = "de::opt_f64")]
    p75: Option<f64>,
    #[serde(default, rename = "95%", deserialize_with = "de::opt_f64")]
    p95: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    kurtosis: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    skewness: Option<f64>,
    #[serde(default)]
    histogram: Option<RawNumericHistogram>,
}

#[derive(Debug, Default, Deserialize)]
struct RawCategoricalFeature {
    #[serde(default, deserialize_with = "de::opt_string")]
    name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    distinct_count: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    distinct_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    missing_count: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    missing_percentage: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64_map")]
    histogram: Option<BTreeMap<String, f64>>,
    #[serde(default, deserialize_with = "de::opt_string")]
    histogram_value_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawGroup<T> {
    #[serde(default, deserialize_with = "de::opt_u64")]
    total: Option<u64>,
    #[serde(default)]
    data: Option<Vec<Option<T>>>,
}

impl<T> Default for RawGroup<T> {
    fn default() -> Self {
        Self {
            total: None,
            data: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawFeatures {
    #[serde(default)]
    text: Option<RawGroup<RawTextFeature>>,
    #[serde(default)]
    numerical: Option<RawGroup<RawNumericalFeature>>,
    #[serde(default)]
    categorical: Option<RawGroup<RawCategoricalFeature>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawModelProfile {
    #[serde(default, deserialize_with = "de::opt_u64")]
    total_features: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    total_data_rows: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    total_duplicates: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_u64")]
    total_missing_values: Option<u64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    percentage_duplicates: Option<f64>,
    #[serde(default, deserialize_with = "de::opt_f64")]
    percentage_missing_values: Option<f64>,
    #[serde(default)]
    features: Option<RawFeatures>,
}

// =============================================================================
// Normalization
// =============================================================================

impl From<RawTextFeature> for TextFeature {
    fn from(raw: RawTextFeature) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            distinct_count: raw.distinct_count.unwrap_or(0.0),
            distinct_percentage: raw.distinct_percentage.unwrap_or(0.0),
            missing_count: raw.missing_count.unwrap_or(0.0),
            missing_percentage: raw.missing_percentage.unwrap_or(0.0),
            word_counts: raw.word_counts.unwrap_or_default(),
            mean_length: raw.mean_length.unwrap_or(0.0),
            min_length: raw.min_length.unwrap_or(0.0),
            max_length: raw.max_length.unwrap_or(0.0),
            histogram: raw.histogram.unwrap_or_default(),
        }
    }
}

impl From<RawNumericalFeature> for NumericalFeature {
    fn from(raw: RawNumericalFeature) -> Self {
        let histogram = raw.histogram.unwrap_or_default();
        Self {
            name: raw.name.unwrap_or_default(),
            distinct_count: raw.distinct_count.unwrap_or(0.0),
            distinct_percentage: raw.distinct_percentage.unwrap_or(0.0),
            missing_count: raw.missing_count.unwrap_or(0.0),
            missing_percentage: raw.missing_percentage.unwrap_or(0.0),
            zeroes_count: raw.zeroes_count.unwrap_or(0.0),
            zeroes_percentage: raw.zeros_percentage.unwrap_or(0.0),
            minimum: raw.minimum.unwrap_or(0.0),
            maximum: raw.maximum.unwrap_or(0.0),
            mean: raw.mean.unwrap_or(0.0),
            std: raw.std.unwrap_or(0.0),
            variance: raw.variance.unwrap_or(0.0),
            p5: raw.p5.unwrap_or(0.0),
            p25: raw.p25.unwrap_or(0.0),
            p50: raw.p50.unwrap_or(0.0),
            p75: raw.p75.unwrap_or(0.0),
            p95: raw.p95.unwrap_or(0.0),
            kurtosis: raw.kurtosis.unwrap_or(0.0),
            skewness: raw.skewness.unwrap_or(0.0),
            histogram: NumericHistogram {
                counts: histogram.counts.unwrap_or_default(),
                bin_edges: histogram.bin_edges.unwrap_or_default(),
            },
        }
    }
}

impl From<RawCategoricalFeature> for CategoricalFeature {
    fn from(raw: RawCategoricalFeature) -> Self {
        Self {
            name: raw.name.unwrap_or_default(),
            distinct_count: raw.distinct_count.unwrap_or(0.0),
            distinct_percentage: raw.distinct_percentage.unwrap_or(0.0),
            missing_count: raw.missing_count.unwrap_or(0.0),
            missing_percentage: raw.missing_percentage.unwrap_or(0.0),
            histogram: raw.histogram.unwrap_or_default(),
            histogram_value_type: raw.histogram_value_type.unwrap_or_default(),
        }
    }
}

fn group<R, T>(raw: Option<RawGroup<R>>) -> FeatureGroup<T>
where
    R: Default,
    T: From<R>,
{
    let raw = raw.unwrap_or_default();
    FeatureGroup {
        total: raw.total.unwrap_or(0),
        data: raw
            .data
            .unwrap_or_default()
            .into_iter()
            .map(|row| T::from(row.unwrap_or_default()))
            .collect(),
    }
}

impl From<RawModelProfile> for ModelProfile {
    fn from(raw: RawModelProfile) -> Self {
        let features = raw.features.unwrap_or_default();
        Self {
            total_features: raw.total_features.unwrap_or(0),
            total_data_rows: raw.total_data_rows.unwrap_or(0),
            total_duplicates: raw.total_duplicates.unwrap_or(0),
            total_missing_values: raw.total_missing_values.unwrap_or(0),
            percentage_duplicates: raw.percentage_duplicates.unwrap_or(0.0),
            percentage_missing_values: raw.percentage_missing_values.unwrap_or(0.0),
            text: group(features.text),
            numerical: group(features.numerical),
            categorical: group(features.categorical),
        }
    }
}

impl WaterdipClient {
    /// `GET model.profile`
    pub async fn model_profile(&self, model_id: &str) -> Result<ApiResponse<ModelProfile>> {
        let response = self
            .http()
            .get::<Option<RawModelProfile>, _>(endpoints::MODEL_PROFILE, &ProfileParams { model_id })
            .await?;
        Ok(response.map(|raw| ModelProfile::from(raw.unwrap_or_default())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_category_keeps_its_own_total() {
        let raw: RawModelProfile = serde_json::from_value(serde_json::json!({
            "total_features": 5,
            "features": {
                "text": {"total": 1, "data": [{"name": "review"}]},
                "numerical": {"total": 3, "data": []},
                "categorical": {"total": 1}
            }
        }))
        .unwrap();
        let profile = ModelProfile::from(raw);
        assert_eq!(profile.text.total, 1);
        assert_eq!(profile.numerical.total, 3);
        assert_eq!(profile.categorical.total, 1);
        assert!(profile.categorical.data.is_empty());
        assert_eq!(profile.text.data[0].name, "review");
    }

    #[test]
    fn test_numerical_feature_percentiles_and_histogram() {
        let raw: RawModelProfile = serde_json::from_value(serde_json::json!({
            "features": {"numerical": {"total": 1, "data": [{
                "name": "age", "5%": 18, "50%": "35", "95%": 70.5,
                "zeros_percentage": 0.1,
                "histogram": {"counts": [1, 2], "bin_edges": [0, 10, 20]}
            }]}}
        }))
        .unwrap();
        let profile = ModelProfile::from(raw);
        let age = &profile.numerical.data[0];
        assert_eq!(age.p5, 18.0);
        assert_eq!(age.p50, 35.0);
        assert_eq!(age.p95, 70.5);
        assert_eq!(age.p25, 0.0);
        assert_eq!(age.zeroes_percentage, 0.1);
        assert_eq!(age.histogram.bin_edges, vec![0.0, 10.0, 20.0]);
    }

    #[test]
    fn test_empty_profile() {
        let profile = ModelProfile::from(RawModelProfile::default());
        assert_eq!(profile, ModelProfile::default());
    }

    #[test]
    fn test_null_feature_rows_default() {
        let raw: RawModelProfile = serde_json::from_str(
            r#"{"features":{"categorical":{"total":2,"data":[null,{"name":"city","histogram":{"NY":4}}]}}}"#,
        )
        .unwrap();
        let profile = ModelProfile::from(raw);
        assert_eq!(profile.categorical.data[0], CategoricalFeature::default());
        assert_eq!(profile.categorical.data[1].histogram["NY"], 4.0);
    }
}
