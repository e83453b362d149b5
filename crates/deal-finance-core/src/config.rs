use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::DealFinanceError;
use crate::fields::{default_slider_specs, SliderField, SliderSpec};
use crate::DealFinanceResult;

/// Maximum number of scenarios held for comparison.
pub const MAX_SAVED_SCENARIOS: usize = 10;

/// Scenario marker colours, assigned in this order.
pub const SCENARIO_COLORS: [&str; 10] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FDCB6E", "#6C5CE7", "#FF8A5B", "#2ECC71", "#AF7AC5",
    "#F39C12", "#5DADE2",
];

/// Calculator layout and scenario limits. Every field has a default, so a
/// partial JSON/YAML override only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalculatorConfig {
    pub sliders: Vec<SliderSpec>,
    pub max_saved_scenarios: usize,
    pub palette: Vec<String>,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        CalculatorConfig {
            sliders: default_slider_specs(),
            max_saved_scenarios: MAX_SAVED_SCENARIOS,
            palette: SCENARIO_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl CalculatorConfig {
    pub fn slider(&self, field: SliderField) -> Option<&SliderSpec> {
        self.sliders.iter().find(|s| s.field == field)
    }

    /// Reject layouts the store and the sliders cannot work with.
    pub fn validate(&self) -> DealFinanceResult<()> {
        if self.max_saved_scenarios == 0 {
            return Err(DealFinanceError::InvalidInput {
                field: "max_saved_scenarios".into(),
                reason: "At least one scenario must be storable".into(),
            });
        }
        if self.palette.is_empty() {
            return Err(DealFinanceError::InvalidInput {
                field: "palette".into(),
                reason: "Palette needs at least one colour".into(),
            });
        }
        for field in SliderField::ALL {
            let spec = self.slider(field).ok_or_else(|| DealFinanceError::InvalidInput {
                field: format!("sliders:{}", field.id()),
                reason: "Missing slider definition".into(),
            })?;
            if spec.min > spec.max {
                return Err(DealFinanceError::InvalidInput {
                    field: format!("sliders:{}", field.id()),
                    reason: format!("min {} exceeds max {}", spec.min, spec.max),
                });
            }
            if spec.step <= Decimal::ZERO {
                return Err(DealFinanceError::InvalidInput {
                    field: format!("sliders:{}", field.id()),
                    reason: "Step must be positive".into(),
                });
            }
        }
        Ok(())
    }
}
