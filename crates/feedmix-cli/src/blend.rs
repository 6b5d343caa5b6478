//! The six-ingredient least-cost ration and its composition report.

use std::fmt;

use feedmix_solver::{Bound, LinearProgram};

/// A nutrient requirement, per batch
#[derive(Debug, Clone)]
pub struct Nutrient {
    pub name: &'static str,
    pub unit: &'static str,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Ingredient {
    pub name: &'static str,
    /// Cost per kg
    pub cost: f64,
    /// Nutrient content per kg, indexed like `FeedBlend::nutrients`
    pub content: Vec<f64>,
    /// Inclusion limits in kg
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// A least-cost blending problem: pick ingredient quantities that sum to the
/// batch size and meet every nutrient range at minimum cost.
#[derive(Debug, Clone)]
pub struct FeedBlend {
    pub batch_size: f64,
    pub nutrients: Vec<Nutrient>,
    pub ingredients: Vec<Ingredient>,
}

impl FeedBlend {
    /// One tonne of ration from corn, soybean meal, wheat bran, dicalcium
    /// phosphate, limestone and mineral salt.
    pub fn standard_ration() -> Self {
        let nutrients = vec![
            Nutrient { name: "Protein", unit: "g", min: Some(140_000.0), max: Some(180_000.0) },
            Nutrient { name: "Energy", unit: "kcal", min: Some(2_800_000.0), max: None },
            Nutrient { name: "Calcium", unit: "g", min: Some(8_000.0), max: Some(12_000.0) },
            Nutrient { name: "Phosphorus", unit: "g", min: Some(6_000.0), max: Some(9_000.0) },
        ];
        let ingredients = vec![
            Ingredient {
                name: "Corn",
                cost: 0.85,
                content: vec![90.0, 3350.0, 2.0, 2.8],
                min: Some(400.0),
                max: Some(700.0),
            },
            Ingredient {
                name: "Soybean meal",
                cost: 1.50,
                content: vec![450.0, 2230.0, 3.0, 6.5],
                min: None,
                max: None,
            },
            Ingredient {
                name: "Wheat bran",
                cost: 0.65,
                content: vec![160.0, 1900.0, 1.5, 11.0],
                min: None,
                max: None,
            },
            Ingredient {
                name: "Dicalcium phosphate",
                cost: 2.80,
                content: vec![0.0, 0.0, 240.0, 185.0],
                min: None,
                max: None,
            },
            Ingredient {
                name: "Limestone",
                cost: 0.30,
                content: vec![0.0, 0.0, 380.0, 0.0],
                min: None,
                max: None,
            },
            Ingredient {
                name: "Mineral salt",
                cost: 3.50,
                content: vec![0.0, 0.0, 120.0, 80.0],
                min: None,
                max: Some(10.0),
            },
        ];
        Self {
            batch_size: 1000.0,
            nutrients,
            ingredients,
        }
    }

    fn nutrient_row(&self, k: usize, sign: f64) -> Vec<f64> {
        self.ingredients.iter().map(|ing| sign * ing.content[k]).collect()
    }

    fn unit_row(&self, i: usize, sign: f64) -> Vec<f64> {
        let mut row = vec![0.0; self.ingredients.len()];
        row[i] = sign;
        row
    }

    /// Assemble the program as one batch equality plus `<=` rows, in order:
    /// nutrient maxima, nutrient minima (negated), ingredient maxima,
    /// ingredient minima (negated). Variable bounds stay `[0, +inf)`.
    pub fn to_program(&self) -> LinearProgram {
        let n = self.ingredients.len();
        let mut rows = Vec::new();
        let mut rhs = Vec::new();

        for (k, nutrient) in self.nutrients.iter().enumerate() {
            if let Some(max) = nutrient.max {
                rows.push(self.nutrient_row(k, 1.0));
                rhs.push(max);
            }
        }
        for (k, nutrient) in self.nutrients.iter().enumerate() {
            if let Some(min) = nutrient.min {
                rows.push(self.nutrient_row(k, -1.0));
                rhs.push(-min);
            }
        }
        for (i, ingredient) in self.ingredients.iter().enumerate() {
            if let Some(max) = ingredient.max {
                rows.push(self.unit_row(i, 1.0));
                rhs.push(max);
            }
        }
        for (i, ingredient) in self.ingredients.iter().enumerate() {
            if let Some(min) = ingredient.min {
                rows.push(self.unit_row(i, -1.0));
                rhs.push(-min);
            }
        }

        LinearProgram::new(self.ingredients.iter().map(|ing| ing.cost).collect())
            .with_equalities(vec![vec![1.0; n]], vec![self.batch_size])
            .with_inequalities(rows, rhs)
            .with_bounds(vec![Bound::default(); n])
    }

    /// Composition and nutrient report for the ingredient quantities `x`
    pub fn report(&self, x: &[f64]) -> BlendReport {
        let lines: Vec<IngredientLine> = self
            .ingredients
            .iter()
            .zip(x)
            .map(|(ing, &quantity)| IngredientLine {
                name: ing.name,
                quantity,
                share: quantity / self.batch_size * 100.0,
                cost: quantity * ing.cost,
            })
            .collect();

        let nutrients = self
            .nutrients
            .iter()
            .enumerate()
            .map(|(k, nutrient)| NutrientLine {
                name: nutrient.name,
                unit: nutrient.unit,
                achieved: self.ingredients.iter().zip(x).map(|(ing, q)| ing.content[k] * q).sum(),
                min: nutrient.min,
                max: nutrient.max,
            })
            .collect();

        BlendReport {
            total_cost: lines.iter().map(|l| l.cost).sum(),
            total_weight: x.iter().sum(),
            lines,
            nutrients,
        }
    }
}

#[derive(Debug, Clone)]
pub struct IngredientLine {
    pub name: &'static str,
    pub quantity: f64,
    /// Percent of batch
    pub share: f64,
    pub cost: f64,
}

#[derive(Debug, Clone)]
pub struct NutrientLine {
    pub name: &'static str,
    pub unit: &'static str,
    pub achieved: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct BlendReport {
    pub lines: Vec<IngredientLine>,
    pub total_cost: f64,
    pub nutrients: Vec<NutrientLine>,
    pub total_weight: f64,
}

impl NutrientLine {
    fn requirement(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("{:.0} - {:.0} {}", min, max, self.unit),
            (Some(min), None) => format!(">= {:.0} {}", min, self.unit),
            (None, Some(max)) => format!("<= {:.0} {}", max, self.unit),
            (None, None) => "none".to_string(),
        }
    }
}

impl fmt::Display for BlendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(72);
        writeln!(f, "Optimal composition (per batch):")?;
        writeln!(f, "{}", rule)?;
        for line in &self.lines {
            writeln!(
                f,
                "{:20}: {:8.2} kg ({:5.2}%) - {:8.2}",
                line.name, line.quantity, line.share, line.cost
            )?;
        }
        writeln!(f, "{}", rule)?;
        writeln!(f, "{:20}: {:>32.2}", "Total cost", self.total_cost)?;
        writeln!(f)?;
        writeln!(f, "Nutrient composition:")?;
        writeln!(f, "{}", rule)?;
        for n in &self.nutrients {
            writeln!(
                f,
                "{:12} {:>14.0} {:5} (requirement: {})",
                n.name,
                n.achieved,
                n.unit,
                n.requirement()
            )?;
        }
        writeln!(f, "{:12} {:>14.0} kg", "Total weight", self.total_weight)
    }
}
