use super::propellant::PropellantMixture;

/// Requested (or granted) amount per propellant, aligned with the mixture order.
#[derive(Debug, Clone, PartialEq)]
pub struct DemandVector {
    amounts: Vec<f64>,
}

impl DemandVector {
    pub fn zeros(len: usize) -> Self {
        Self { amounts: vec![0.0; len] }
    }

    pub fn amounts(&self) -> &[f64] {
        &self.amounts
    }

    pub fn get(&self, idx: usize) -> f64 {
        self.amounts.get(idx).copied().unwrap_or(0.0)
    }

    pub fn set(&mut self, idx: usize, amount: f64) {
        self.amounts[idx] = amount;
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.amounts.iter().all(|&a| a == 0.0)
    }

    /// Element-wise sum of two vectors of equal length.
    pub fn merged(&self, other: &DemandVector) -> DemandVector {
        DemandVector {
            amounts: self
                .amounts
                .iter()
                .zip(&other.amounts)
                .map(|(a, b)| a + b)
                .collect(),
        }
    }
}

/// Split a total mass-bearing demand across the mixture.
/// Massless entries always receive zero here.
pub fn demand(total: f64, mixture: &PropellantMixture) -> DemandVector {
    if total <= 0.0 || !total.is_finite() {
        return DemandVector::zeros(mixture.len());
    }
    DemandVector {
        amounts: mixture.propellants().iter().map(|p| p.demand(total)).collect(),
    }
}

/// Demand for massless propellants, scaled from the same total by their own
/// share of the mass-bearing ratio sum. Mass-bearing entries receive zero.
pub fn massless_demand(total: f64, mixture: &PropellantMixture) -> DemandVector {
    if total <= 0.0 || !total.is_finite() {
        return DemandVector::zeros(mixture.len());
    }
    DemandVector {
        amounts: mixture
            .propellants()
            .iter()
            .map(|p| total * p.massless_share)
            .collect(),
    }
}
