//! Band ratio feature extraction
//!
//! Counts, per neighborhood, the points whose attribute value falls inside
//! an open value band, together with the subset of those that also carry a
//! selected classification code, and the ratios of both counts to the
//! neighborhood size.

use itertools::Itertools;
use lidarfeat_core::{
    attributes_per_neighborhood, class_group, ClassSelection, Error, FeatureExtractor,
    Neighborhood, ParamValue, PointCloud, Result, Volume, CLASSIFICATION, Z,
};

/// Value returned for ratios when a neighborhood has no valid points
pub const DIVIDE_BY_ZERO_VALUE: f64 = f64::NAN;

/// Feature extractor for the fraction of neighborhood points inside a value
/// band, optionally restricted to a set of classification codes.
///
/// Produces four values per neighborhood: the band count, the band count
/// restricted to the selected classes, and the two corresponding ratios to
/// the number of valid points in the neighborhood. Band membership is the
/// strict open interval `lower_limit < value < upper_limit`; an absent
/// bound leaves that side unbounded.
///
/// # Example
/// ```rust
/// use lidarfeat_extractors::BandRatioExtractor;
/// use lidarfeat_core::FeatureExtractor;
///
/// let extractor = BandRatioExtractor::new(Some(2.0), Some(8.0));
/// assert_eq!(extractor.provides()[0], "band_count_2_z_8");
/// ```
#[derive(Debug, Clone)]
pub struct BandRatioExtractor {
    lower_limit: Option<f64>,
    upper_limit: Option<f64>,
    data_key: String,
    attribute_key: String,
    attribute_values: ClassSelection,
}

impl Default for BandRatioExtractor {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl BandRatioExtractor {
    /// Create an extractor over the `z` attribute, filtering classification
    /// codes per [`ClassSelection::All`]. Band bounds are open on the sides
    /// where the limit is `None`.
    pub fn new(lower_limit: Option<f64>, upper_limit: Option<f64>) -> Self {
        Self {
            lower_limit,
            upper_limit,
            data_key: Z.to_string(),
            attribute_key: CLASSIFICATION.to_string(),
            attribute_values: ClassSelection::All,
        }
    }

    /// Use a different attribute for the band test
    pub fn with_data_key(mut self, data_key: &str) -> Self {
        self.data_key = data_key.to_string();
        self
    }

    /// Use a different attribute for the class filter
    pub fn with_attribute_key(mut self, attribute_key: &str) -> Self {
        self.attribute_key = attribute_key.to_string();
        self
    }

    /// Restrict the class filter to a selection of classification codes.
    /// Explicit code lists are de-duplicated preserving first occurrence.
    pub fn with_class_selection(mut self, selection: ClassSelection) -> Self {
        self.attribute_values = match selection {
            ClassSelection::Codes(codes) => ClassSelection::from_codes(&codes),
            all => all,
        };
        self
    }

    /// The band name fragment: `[<lower>_]<data_key>[_<upper>]`, bound
    /// tokens present only when the corresponding limit is.
    fn band_token(&self) -> String {
        let mut token = String::new();
        if let Some(lower) = self.lower_limit {
            token.push_str(&format!("{}_", lower));
        }
        token.push_str(&self.data_key);
        if let Some(upper) = self.upper_limit {
            token.push_str(&format!("_{}", upper));
        }
        token
    }

    /// The class suffix shared by the class-filtered count and ratio names:
    /// `_all_classes` when the selection covers every known code, otherwise
    /// one token per distinct class group in first occurrence order.
    fn class_suffix(&self) -> String {
        if self.attribute_values.covers_all_known() {
            return "_all_classes".to_string();
        }
        self.attribute_values
            .resolve()
            .iter()
            .filter_map(|&code| class_group(code))
            .unique()
            .map(|group| format!("_{}", group))
            .collect()
    }
}

impl FeatureExtractor for BandRatioExtractor {
    fn requires(&self) -> Vec<String> {
        vec![]
    }

    fn provides(&self) -> Vec<String> {
        let band = self.band_token();
        let class_suffix = self.class_suffix();
        vec![
            format!("band_count_{}", band),
            format!("band_count_{}{}", band, class_suffix),
            format!("band_ratio_{}", band),
            format!("band_ratio_{}{}", band, class_suffix),
        ]
    }

    fn extract(
        &self,
        point_cloud: &PointCloud,
        neighborhoods: &[Neighborhood],
        _target_point_cloud: &PointCloud,
        _target_index: usize,
        volume: &Volume,
    ) -> Result<Vec<Vec<f64>>> {
        match volume.shape() {
            "infinite cylinder" | "cell" => {}
            other => return Err(Error::UnsupportedVolume(other.to_string())),
        }

        let table = attributes_per_neighborhood(
            point_cloud,
            neighborhoods,
            &[self.data_key.as_str(), self.attribute_key.as_str()],
        )?;
        let values = table.values(0);
        let mask = table.mask(0);
        let class_values = table.values(1);
        let selected_codes = self.attribute_values.resolve();

        let mut band_counts = Vec::with_capacity(neighborhoods.len());
        let mut band_class_counts = Vec::with_capacity(neighborhoods.len());
        let mut band_ratios = Vec::with_capacity(neighborhoods.len());
        let mut band_class_ratios = Vec::with_capacity(neighborhoods.len());

        for n in 0..neighborhoods.len() {
            let mut valid_count = 0usize;
            let mut band_count = 0usize;
            let mut band_class_count = 0usize;
            for s in 0..table.width() {
                if mask[(n, s)] {
                    continue;
                }
                valid_count += 1;
                let value = values[(n, s)];
                let above_lower = self.lower_limit.map_or(true, |lower| value > lower);
                let below_upper = self.upper_limit.map_or(true, |upper| value < upper);
                if !(above_lower && below_upper) {
                    continue;
                }
                band_count += 1;
                let code = class_values[(n, s)];
                let in_classes = selected_codes.is_empty()
                    || selected_codes.iter().any(|&c| f64::from(c) == code);
                if in_classes {
                    band_class_count += 1;
                }
            }

            band_counts.push(band_count as f64);
            band_class_counts.push(band_class_count as f64);
            if valid_count == 0 {
                band_ratios.push(DIVIDE_BY_ZERO_VALUE);
                band_class_ratios.push(DIVIDE_BY_ZERO_VALUE);
            } else {
                band_ratios.push(band_count as f64 / valid_count as f64);
                band_class_ratios.push(band_class_count as f64 / valid_count as f64);
            }
        }

        Ok(vec![
            band_counts,
            band_class_counts,
            band_ratios,
            band_class_ratios,
        ])
    }

    fn get_params(&self) -> Vec<ParamValue> {
        vec![
            ParamValue::OptionalFloat(self.lower_limit),
            ParamValue::OptionalFloat(self.upper_limit),
            ParamValue::Text(self.data_key.clone()),
            ParamValue::Text(self.attribute_key.clone()),
            match &self.attribute_values {
                ClassSelection::All => ParamValue::All,
                ClassSelection::Codes(codes) => ParamValue::Codes(codes.clone()),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use lidarfeat_core::all_class_codes;

    const CYLINDER: Volume = Volume::InfiniteCylinder { radius: 5.0 };

    /// Cloud with one z column and one classification column, plus a
    /// single-point target cloud for the extract call.
    fn cloud_with(z_values: &[f64], classes: &[f64]) -> (PointCloud, PointCloud) {
        let mut cloud = PointCloud::new();
        cloud.add_attribute(Z, z_values.to_vec()).unwrap();
        cloud.add_attribute(CLASSIFICATION, classes.to_vec()).unwrap();
        let target = PointCloud::from_attribute(Z, vec![0.0]);
        (cloud, target)
    }

    fn run(
        extractor: &BandRatioExtractor,
        cloud: &PointCloud,
        target: &PointCloud,
        neighborhoods: &[Neighborhood],
    ) -> Vec<Vec<f64>> {
        extractor
            .extract(cloud, neighborhoods, target, 0, &CYLINDER)
            .unwrap()
    }

    #[test]
    fn test_band_count_and_ratio_with_missing_slot() {
        // Neighborhood of 3 points next to a wider one, so its last slot is
        // masked. Only 5.0 falls strictly inside (2, 8).
        let (cloud, target) = cloud_with(
            &[1.0, 5.0, 9.0, 3.0, 4.0, 5.0, 6.0],
            &[2.0, 2.0, 2.0, 2.0, 2.0, 2.0, 2.0],
        );
        let neighborhoods = vec![vec![0, 1, 2], vec![3, 4, 5, 6]];
        let extractor = BandRatioExtractor::new(Some(2.0), Some(8.0));

        let result = run(&extractor, &cloud, &target, &neighborhoods);
        assert_eq!(result[0][0], 1.0);
        assert_relative_eq!(result[2][0], 1.0 / 3.0);
        assert_eq!(result[0][1], 4.0);
        assert_relative_eq!(result[2][1], 1.0);
    }

    #[test]
    fn test_empty_neighborhood_yields_zero_counts_and_nan_ratios() {
        let (cloud, target) = cloud_with(&[1.0, 2.0], &[2.0, 2.0]);
        let neighborhoods = vec![vec![0, 1], vec![]];
        let extractor = BandRatioExtractor::new(None, None);

        let result = run(&extractor, &cloud, &target, &neighborhoods);
        assert_eq!(result[0][1], 0.0);
        assert_eq!(result[1][1], 0.0);
        assert!(result[2][1].is_nan());
        assert!(result[3][1].is_nan());
    }

    #[test]
    fn test_class_filter_restricts_band_count() {
        // ground, ground, vegetation, building; select ground + vegetation
        // codes, so the building point drops out of the filtered count.
        let (cloud, target) = cloud_with(&[1.0, 2.0, 3.0, 4.0], &[2.0, 2.0, 3.0, 6.0]);
        let neighborhoods = vec![vec![0, 1, 2, 3]];
        let extractor = BandRatioExtractor::new(None, None)
            .with_class_selection(ClassSelection::from_codes(&[2, 4, 5]));

        let result = run(&extractor, &cloud, &target, &neighborhoods);
        assert_eq!(result[0][0], 4.0);
        assert_eq!(result[1][0], 2.0);
        assert_relative_eq!(result[3][0], 0.5);
    }

    #[test]
    fn test_counts_stay_in_lockstep() {
        let (cloud, target) = cloud_with(
            &[0.5, 1.5, 2.5, 3.5, 4.5, 9.0],
            &[2.0, 3.0, 6.0, 9.0, 2.0, 2.0],
        );
        let neighborhoods = vec![vec![0, 1, 2], vec![3, 4, 5], vec![0, 2, 4, 5]];
        let extractor = BandRatioExtractor::new(Some(1.0), Some(5.0))
            .with_class_selection(ClassSelection::from_codes(&[2, 9]));

        let result = run(&extractor, &cloud, &target, &neighborhoods);
        for n in 0..neighborhoods.len() {
            let valid = neighborhoods[n].len() as f64;
            assert!(result[1][n] <= result[0][n]);
            assert!(result[0][n] <= valid);
        }
    }

    #[test]
    fn test_boundary_values_are_excluded() {
        let (cloud, target) = cloud_with(&[2.0, 8.0, 5.0], &[2.0, 2.0, 2.0]);
        let neighborhoods = vec![vec![0, 1, 2]];
        let extractor = BandRatioExtractor::new(Some(2.0), Some(8.0));

        let result = run(&extractor, &cloud, &target, &neighborhoods);
        assert_eq!(result[0][0], 1.0);
    }

    #[test]
    fn test_zero_lower_limit_is_a_real_bound() {
        let (cloud, target) = cloud_with(&[-1.0, 0.0, 1.0], &[2.0, 2.0, 2.0]);
        let neighborhoods = vec![vec![0, 1, 2]];
        let extractor = BandRatioExtractor::new(Some(0.0), None);

        let result = run(&extractor, &cloud, &target, &neighborhoods);
        assert_eq!(result[0][0], 1.0);
        assert_eq!(extractor.provides()[0], "band_count_0_z");
    }

    #[test]
    fn test_unsupported_volume_fails_before_data_access() {
        // The cloud lacks the data attribute entirely; the volume gate must
        // fire first.
        let cloud = PointCloud::new();
        let target = PointCloud::new();
        let extractor = BandRatioExtractor::new(Some(2.0), Some(8.0));

        for volume in [
            Volume::Sphere { radius: 1.0 },
            Volume::Cube { side_length: 1.0 },
        ] {
            let result = extractor.extract(&cloud, &[vec![0]], &target, 0, &volume);
            assert!(matches!(result, Err(Error::UnsupportedVolume(_))));
        }
    }

    #[test]
    fn test_cell_volume_is_supported() {
        let (cloud, target) = cloud_with(&[1.0], &[2.0]);
        let extractor = BandRatioExtractor::new(None, None);
        let volume = Volume::Cell { side_length: 1.0 };
        assert!(extractor
            .extract(&cloud, &[vec![0]], &target, 0, &volume)
            .is_ok());
    }

    #[test]
    fn test_provides_with_both_bounds() {
        let extractor = BandRatioExtractor::new(Some(2.0), Some(8.0));
        assert_eq!(
            extractor.provides(),
            vec![
                "band_count_2_z_8",
                "band_count_2_z_8_all_classes",
                "band_ratio_2_z_8",
                "band_ratio_2_z_8_all_classes",
            ]
        );
    }

    #[test]
    fn test_provides_without_bounds_and_with_one_bound() {
        assert_eq!(
            BandRatioExtractor::new(None, None).provides()[0],
            "band_count_z"
        );
        assert_eq!(
            BandRatioExtractor::new(None, Some(8.0)).provides()[2],
            "band_ratio_z_8"
        );
    }

    #[test]
    fn test_provides_lists_distinct_class_groups_once() {
        let extractor = BandRatioExtractor::new(None, None)
            .with_class_selection(ClassSelection::from_codes(&[2, 4, 5]));
        assert_eq!(extractor.provides()[1], "band_count_z_ground_vegetation");
        assert_eq!(extractor.provides()[3], "band_ratio_z_ground_vegetation");
    }

    #[test]
    fn test_provides_is_deterministic_and_collision_free() {
        let a = BandRatioExtractor::new(Some(1.0), Some(3.0))
            .with_class_selection(ClassSelection::from_codes(&[2]));
        let b = BandRatioExtractor::new(Some(1.0), Some(3.0))
            .with_class_selection(ClassSelection::from_codes(&[2]));
        let c = BandRatioExtractor::new(Some(1.0), Some(3.0))
            .with_class_selection(ClassSelection::from_codes(&[6]));
        assert_eq!(a.provides(), b.provides());
        assert_ne!(a.provides(), c.provides());

        let d = BandRatioExtractor::new(Some(1.0), Some(3.0)).with_data_key("intensity");
        assert_eq!(d.provides()[0], "band_count_1_intensity_3");
    }

    #[test]
    fn test_explicit_full_code_list_matches_all_token() {
        let all = BandRatioExtractor::new(None, None);
        let explicit = BandRatioExtractor::new(None, None)
            .with_class_selection(ClassSelection::from_codes(&all_class_codes()));
        assert_eq!(all.provides(), explicit.provides());

        let (cloud, target) = cloud_with(&[1.0, 2.0, 3.0], &[2.0, 6.0, 9.0]);
        let neighborhoods = vec![vec![0, 1, 2]];
        assert_eq!(
            run(&all, &cloud, &target, &neighborhoods),
            run(&explicit, &cloud, &target, &neighborhoods)
        );
    }

    #[test]
    fn test_empty_code_list_filters_nothing() {
        let (cloud, target) = cloud_with(&[1.0, 2.0], &[2.0, 6.0]);
        let neighborhoods = vec![vec![0, 1]];
        let extractor = BandRatioExtractor::new(None, None)
            .with_class_selection(ClassSelection::from_codes(&[]));

        let result = run(&extractor, &cloud, &target, &neighborhoods);
        assert_eq!(result[0][0], result[1][0]);
    }

    #[test]
    fn test_requires_is_empty() {
        assert!(BandRatioExtractor::default().requires().is_empty());
    }

    #[test]
    fn test_extract_shape_matches_provides() {
        let (cloud, target) = cloud_with(&[1.0, 2.0, 3.0], &[2.0, 2.0, 6.0]);
        let neighborhoods = vec![vec![0], vec![1, 2], vec![]];
        let extractor = BandRatioExtractor::new(Some(0.5), None);

        let result = run(&extractor, &cloud, &target, &neighborhoods);
        assert_eq!(result.len(), extractor.provides().len());
        for values in &result {
            assert_eq!(values.len(), neighborhoods.len());
        }
    }

    #[test]
    fn test_get_params_preserves_construction_order() {
        let extractor = BandRatioExtractor::new(Some(2.0), None)
            .with_data_key("normalized_height")
            .with_class_selection(ClassSelection::from_codes(&[3, 4, 3]));
        assert_eq!(
            extractor.get_params(),
            vec![
                ParamValue::OptionalFloat(Some(2.0)),
                ParamValue::OptionalFloat(None),
                ParamValue::Text("normalized_height".to_string()),
                ParamValue::Text("classification".to_string()),
                ParamValue::Codes(vec![3, 4]),
            ]
        );
    }
}
