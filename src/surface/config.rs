/// Tunables for surface-map construction and interactive queries.
///
/// All distances are CSS pixels. Every field has a default, so a JSON
/// override only needs to name what it changes.
///
/// # Examples
///
/// ```rust
/// use mathtap::surface::SurfaceConfig;
///
/// let config = SurfaceConfig::new()
///     .with_frac_bar_margin(6.0)
///     .with_operator_hit_padding(2.0);
/// assert_eq!(config.mixed_number_gap, 8.0);
///
/// let loaded = SurfaceConfig::from_json_str(r#"{"mixedNumberGap": 12}"#).unwrap();
/// assert_eq!(loaded.mixed_number_gap, 12.0);
/// ```
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct SurfaceConfig {
    /// Vertical growth applied to fraction bars on each edge
    pub frac_bar_margin: f64,
    /// Vertical growth of operator boxes during hit-testing
    pub operator_hit_padding: f64,
    /// Largest gap between a whole number and the fraction bar it prefixes
    pub mixed_number_gap: f64,
    /// Largest vertical-center distance between an operator and a geometric operand
    pub operand_vertical_tolerance: f64,
    /// Vertical overlap (of the shorter box) that makes an atom a minus sign's predecessor
    pub minus_overlap_ratio: f64,
    /// Horizontal overlap (of the narrower box) that stacks two children into a column
    pub column_overlap_ratio: f64,
    /// Elements of kind `Other` below this area are not materialized
    pub min_element_area: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            frac_bar_margin: 4.0,
            operator_hit_padding: 6.0,
            mixed_number_gap: 8.0,
            operand_vertical_tolerance: 20.0,
            minus_overlap_ratio: 0.25,
            column_overlap_ratio: 0.5,
            min_element_area: 1.0,
        }
    }
}

impl SurfaceConfig {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_frac_bar_margin(mut self, margin: f64) -> Self {
        self.frac_bar_margin = margin;
        self
    }

    #[inline]
    pub fn with_operator_hit_padding(mut self, padding: f64) -> Self {
        self.operator_hit_padding = padding;
        self
    }

    #[inline]
    pub fn with_mixed_number_gap(mut self, gap: f64) -> Self {
        self.mixed_number_gap = gap;
        self
    }

    #[inline]
    pub fn with_operand_vertical_tolerance(mut self, tolerance: f64) -> Self {
        self.operand_vertical_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn with_minus_overlap_ratio(mut self, ratio: f64) -> Self {
        self.minus_overlap_ratio = ratio;
        self
    }

    #[inline]
    pub fn with_column_overlap_ratio(mut self, ratio: f64) -> Self {
        self.column_overlap_ratio = ratio;
        self
    }

    #[inline]
    pub fn with_min_element_area(mut self, area: f64) -> Self {
        self.min_element_area = area;
        self
    }

    /// Load a configuration from JSON, filling unspecified fields with defaults.
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject negative distances and ratios outside `0..=1`.
    pub fn validate(&self) -> crate::Result<()> {
        let distances = [
            ("fracBarMargin", self.frac_bar_margin),
            ("operatorHitPadding", self.operator_hit_padding),
            ("mixedNumberGap", self.mixed_number_gap),
            ("operandVerticalTolerance", self.operand_vertical_tolerance),
            ("minElementArea", self.min_element_area),
        ];
        for (name, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(crate::Error::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        for (name, value) in [
            ("minusOverlapRatio", self.minus_overlap_ratio),
            ("columnOverlapRatio", self.column_overlap_ratio),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(crate::Error::Config(format!("{name} must lie in 0..=1, got {value}")));
            }
        }
        Ok(())
    }
}
