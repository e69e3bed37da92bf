use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{InputError, SchemaMismatch};

pub const ZONE: &str = "Zone";
pub const YEAR: &str = "Year";
pub const FOREST_COVER_LOSS_HA: &str = "Forest_Cover_Loss(ha)";
pub const DISTANCE_TO_MINES_KM: &str = "Distance_to_Mines(km)";
pub const REPORTED_ILLNESSES: &str = "Reported_Illnesses";

/// Column names of a [`FeatureRecord`], in training order.
pub const FEATURE_COLUMNS: [&str; 5] = [
    ZONE,
    YEAR,
    FOREST_COVER_LOSS_HA,
    DISTANCE_TO_MINES_KM,
    REPORTED_ILLNESSES,
];

pub const DEFAULT_ZONE: u32 = 2;
pub const DEFAULT_YEAR: u32 = 2023;
/// Proxy exposure distance applied to every simulated zone.
pub const DEFAULT_DISTANCE_TO_MINES_KM: f64 = 5.0;

/// Range, step and initial value of a user-adjustable control.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InputDomain<T> {
    pub min: T,
    pub max: T,
    pub step: T,
    pub default: T,
}

pub const FOREST_LOSS_DOMAIN: InputDomain<f64> = InputDomain {
    min: 0.0,
    max: 1500.0,
    step: 10.0,
    default: 100.0,
};

pub const ILLNESS_DOMAIN: InputDomain<u32> = InputDomain {
    min: 0,
    max: 1000,
    step: 50,
    default: 100,
};

/// The fixed-shape input row submitted to the classifier.
///
/// Built fresh for each prediction and dropped right after.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(rename = "Zone")]
    pub zone: u32,
    #[serde(rename = "Year")]
    pub year: u32,
    #[serde(rename = "Forest_Cover_Loss(ha)")]
    pub forest_cover_loss_ha: f64,
    #[serde(rename = "Distance_to_Mines(km)")]
    pub distance_to_mines_km: f64,
    #[serde(rename = "Reported_Illnesses")]
    pub reported_illnesses: u32,
}

impl FeatureRecord {
    pub fn new(
        zone: u32,
        year: u32,
        forest_cover_loss_ha: f64,
        distance_to_mines_km: f64,
        reported_illnesses: u32,
    ) -> Self {
        Self {
            zone,
            year,
            forest_cover_loss_ha,
            distance_to_mines_km,
            reported_illnesses,
        }
    }

    /// Record for the two user-adjustable controls, with zone, year and
    /// distance pinned to the interface defaults.
    pub fn from_inputs(forest_cover_loss_ha: f64, reported_illnesses: u32) -> Self {
        Self::new(
            DEFAULT_ZONE,
            DEFAULT_YEAR,
            forest_cover_loss_ha,
            DEFAULT_DISTANCE_TO_MINES_KM,
            reported_illnesses,
        )
    }

    /// Numeric value of a column by its training name.
    pub fn value(&self, column: &str) -> Option<f64> {
        match column {
            ZONE => Some(self.zone as f64),
            YEAR => Some(self.year as f64),
            FOREST_COVER_LOSS_HA => Some(self.forest_cover_loss_ha),
            DISTANCE_TO_MINES_KM => Some(self.distance_to_mines_km),
            REPORTED_ILLNESSES => Some(self.reported_illnesses as f64),
            _ => None,
        }
    }

    /// Values laid out in the order of `feature_names`.
    ///
    /// Every artifact feature must name a record column and every record
    /// column must be consumed by the artifact.
    pub fn row_for<S: AsRef<str>>(&self, feature_names: &[S]) -> Result<Vec<f64>, SchemaMismatch> {
        if feature_names.len() != FEATURE_COLUMNS.len() {
            return Err(SchemaMismatch::FeatureCount {
                expected: feature_names.len(),
                actual: FEATURE_COLUMNS.len(),
            });
        }

        let row = feature_names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                self.value(name)
                    .ok_or_else(|| SchemaMismatch::UnknownFeature(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(unused) = FEATURE_COLUMNS
            .iter()
            .find(|column| !feature_names.iter().any(|name| name.as_ref() == **column))
        {
            return Err(SchemaMismatch::UnusedColumn(unused.to_string()));
        }

        Ok(row)
    }

    /// Checks the user-adjustable values against their control domains.
    pub fn validate_domains(&self) -> Result<(), InputError> {
        if !self.forest_cover_loss_ha.is_finite() {
            return Err(InputError::NotFinite {
                field: FOREST_COVER_LOSS_HA,
            });
        }
        if !(FOREST_LOSS_DOMAIN.min..=FOREST_LOSS_DOMAIN.max).contains(&self.forest_cover_loss_ha)
        {
            return Err(InputError::OutOfRange {
                field: FOREST_COVER_LOSS_HA,
                value: self.forest_cover_loss_ha,
                min: FOREST_LOSS_DOMAIN.min,
                max: FOREST_LOSS_DOMAIN.max,
            });
        }
        if self.reported_illnesses > ILLNESS_DOMAIN.max {
            return Err(InputError::OutOfRange {
                field: REPORTED_ILLNESSES,
                value: self.reported_illnesses as f64,
                min: ILLNESS_DOMAIN.min as f64,
                max: ILLNESS_DOMAIN.max as f64,
            });
        }
        Ok(())
    }
}

/// Converts a loosely typed illness count, as received over HTTP, into the
/// record's integer column.
pub fn illness_count(value: f64) -> Result<u32, InputError> {
    if !value.is_finite() {
        return Err(InputError::NotFinite {
            field: REPORTED_ILLNESSES,
        });
    }
    let (min, max) = (ILLNESS_DOMAIN.min as f64, ILLNESS_DOMAIN.max as f64);
    if !(min..=max).contains(&value) {
        return Err(InputError::OutOfRange {
            field: REPORTED_ILLNESSES,
            value,
            min,
            max,
        });
    }
    if value.fract() != 0.0 {
        return Err(InputError::NotWholeNumber {
            field: REPORTED_ILLNESSES,
            value,
        });
    }
    Ok(value as u32)
}

impl Default for FeatureRecord {
    fn default() -> Self {
        Self::from_inputs(FOREST_LOSS_DOMAIN.default, ILLNESS_DOMAIN.default)
    }
}

/// Binary output of the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum RiskLabel {
    #[strum(to_string = "Low Risk")]
    Low,
    #[strum(to_string = "High Risk")]
    High,
}

impl RiskLabel {
    /// Class value as emitted by the tree.
    pub fn class(self) -> u8 {
        match self {
            RiskLabel::Low => 0,
            RiskLabel::High => 1,
        }
    }

    pub fn is_high(self) -> bool {
        matches!(self, RiskLabel::High)
    }

    pub fn headline(self) -> &'static str {
        match self {
            RiskLabel::High => "High Risk Zone Identified",
            RiskLabel::Low => "Low Risk Zone",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            RiskLabel::High => {
                "Deforestation and health signals indicate ecological stress. Consider mitigation."
            }
            RiskLabel::Low => "Environmental indicators remain within safe thresholds.",
        }
    }
}

impl TryFrom<u8> for RiskLabel {
    type Error = SchemaMismatch;

    fn try_from(class: u8) -> Result<Self, Self::Error> {
        match class {
            0 => Ok(RiskLabel::Low),
            1 => Ok(RiskLabel::High),
            other => Err(SchemaMismatch::UnknownClass(other)),
        }
    }
}
