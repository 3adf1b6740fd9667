use std::collections::BTreeMap;

use crate::error::{Error, Result};

// ---------------------------------------------------------------------------
// Resource library: name -> density
// ---------------------------------------------------------------------------

/// Densities of every resource a propellant may name (mass per unit).
/// A density of zero marks a massless resource such as electric charge.
#[derive(Debug, Clone, Default)]
pub struct ResourceLibrary {
    densities: BTreeMap<String, f64>,
}

impl ResourceLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stock resource table (tonnes per unit).
    pub fn stock() -> Self {
        let mut lib = Self::new();
        for (name, density) in [
            ("LiquidFuel", 0.005),
            ("Oxidizer", 0.005),
            ("MonoPropellant", 0.004),
            ("XenonGas", 0.0001),
            ("Ore", 0.01),
            ("IntakeAir", 0.005),
            ("ElectricCharge", 0.0),
        ] {
            lib.densities.insert(name.to_string(), density);
        }
        lib
    }

    /// Register a resource. Negative or non-finite densities are rejected.
    pub fn define(&mut self, name: impl Into<String>, density: f64) -> Result<()> {
        let name = name.into();
        if !density.is_finite() || density < 0.0 {
            return Err(Error::InvalidDensity { name, density });
        }
        self.densities.insert(name, density);
        Ok(())
    }

    pub fn density(&self, name: &str) -> Option<f64> {
        self.densities.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.densities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.densities.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Propellant entries
// ---------------------------------------------------------------------------

/// One propellant feeding an engine, with its resolved density.
#[derive(Debug, Clone, PartialEq)]
pub struct PropellantSpec {
    pub name: String,
    pub ratio: f64,
    pub density: f64,
    /// Share of the mass-bearing ratio sum. Zero for massless entries.
    pub normalized_ratio: f64,
    /// Ratio of a massless entry relative to the mass-bearing ratio sum.
    /// Zero for mass-bearing entries.
    pub massless_share: f64,
}

impl PropellantSpec {
    pub fn has_mass(&self) -> bool {
        self.density > 0.0
    }

    /// Demand of this propellant given the engine's total mass-bearing demand.
    pub fn demand(&self, total: f64) -> f64 {
        total * self.normalized_ratio
    }
}

// ---------------------------------------------------------------------------
// Mixture
// ---------------------------------------------------------------------------

/// Immutable set of propellants with ratios normalised over the mass-bearing entries.
#[derive(Debug, Clone, PartialEq)]
pub struct PropellantMixture {
    propellants: Vec<PropellantSpec>,
    ratio_mass_sum: f64,
    average_density: f64,
}

impl PropellantMixture {
    /// Build a mixture from `(name, ratio, density)` triples.
    ///
    /// Order is kept for display. Ratios must be positive and finite, densities
    /// non-negative and finite, names unique.
    pub fn new<I, S>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64, f64)>,
        S: Into<String>,
    {
        let mut propellants: Vec<PropellantSpec> = Vec::new();
        for (name, ratio, density) in entries {
            let name = name.into();
            if !ratio.is_finite() || ratio <= 0.0 {
                return Err(Error::InvalidRatio { name, ratio });
            }
            if !density.is_finite() || density < 0.0 {
                return Err(Error::InvalidDensity { name, density });
            }
            if propellants.iter().any(|p| p.name == name) {
                return Err(Error::DuplicatePropellant(name));
            }
            propellants.push(PropellantSpec {
                name,
                ratio,
                density,
                normalized_ratio: 0.0,
                massless_share: 0.0,
            });
        }
        if propellants.is_empty() {
            return Err(Error::NoPropellants);
        }

        let ratio_mass_sum: f64 = propellants
            .iter()
            .filter(|p| p.has_mass())
            .map(|p| p.ratio)
            .sum();

        // An all-massless mixture leaves every share at zero.
        if ratio_mass_sum > 0.0 {
            for p in &mut propellants {
                if p.has_mass() {
                    p.normalized_ratio = p.ratio / ratio_mass_sum;
                } else {
                    p.massless_share = p.ratio / ratio_mass_sum;
                }
            }
        }

        let average_density = propellants
            .iter()
            .filter(|p| p.has_mass())
            .map(|p| p.normalized_ratio * p.density)
            .sum();

        Ok(Self { propellants, ratio_mass_sum, average_density })
    }

    /// Resolve `(name, ratio)` pairs against a resource library.
    pub fn resolve<'a, I>(entries: I, library: &ResourceLibrary) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let resolved = entries
            .into_iter()
            .map(|(name, ratio)| {
                library
                    .density(name)
                    .map(|density| (name, ratio, density))
                    .ok_or_else(|| Error::UnknownResource(name.to_string()))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(resolved)
    }

    /// Single-propellant engine.
    pub fn single(name: impl Into<String>, density: f64) -> Result<Self> {
        let name: String = name.into();
        Self::new([(name, 1.0, density)])
    }

    pub fn propellants(&self) -> &[PropellantSpec] {
        &self.propellants
    }

    pub fn len(&self) -> usize {
        self.propellants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.propellants.is_empty()
    }

    pub fn ratio_mass_sum(&self) -> f64 {
        self.ratio_mass_sum
    }

    /// Mass per unit of the blended mass-bearing propellant. Zero iff nothing has mass.
    pub fn average_density(&self) -> f64 {
        self.average_density
    }

    pub fn has_reaction_mass(&self) -> bool {
        self.average_density > 0.0
    }

    /// Propellant names joined with `|`, in configuration order.
    pub fn names(&self) -> String {
        self.propellants
            .iter()
            .map(|p| p.name.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn bipropellant_normalises_over_mass_bearing() {
        let mix = PropellantMixture::new([
            ("LiquidFuel", 0.9, 0.005),
            ("Oxidizer", 1.1, 0.005),
        ])
        .unwrap();
        let p = mix.propellants();
        assert!((p[0].normalized_ratio - 0.45).abs() < 1e-12);
        assert!((p[1].normalized_ratio - 0.55).abs() < 1e-12);
        assert!((mix.average_density() - 0.005).abs() < 1e-12);
    }

    #[test]
    fn massless_entry_excluded_from_normalisation() {
        let mix = PropellantMixture::new([
            ("XenonGas", 0.1, 0.0001),
            ("ElectricCharge", 1.8, 0.0),
        ])
        .unwrap();
        let p = mix.propellants();
        assert!((p[0].normalized_ratio - 1.0).abs() < 1e-12);
        assert_eq!(p[1].normalized_ratio, 0.0);
        assert!((p[1].massless_share - 18.0).abs() < 1e-9);
        assert!((mix.average_density() - 0.0001).abs() < 1e-15);
    }

    #[test]
    fn all_massless_has_zero_density() {
        let mix = PropellantMixture::new([("ElectricCharge", 1.0, 0.0)]).unwrap();
        assert_eq!(mix.ratio_mass_sum(), 0.0);
        assert_eq!(mix.average_density(), 0.0);
        assert!(!mix.has_reaction_mass());
        assert!(mix
            .propellants()
            .iter()
            .all(|p| p.normalized_ratio == 0.0 && p.massless_share == 0.0));
    }

    #[test]
    fn rejects_bad_entries() {
        assert!(matches!(
            PropellantMixture::new(Vec::<(String, f64, f64)>::new()),
            Err(Error::NoPropellants)
        ));
        assert!(matches!(
            PropellantMixture::new([("A", 0.0, 1.0)]),
            Err(Error::InvalidRatio { .. })
        ));
        assert!(matches!(
            PropellantMixture::new([("A", 1.0, -1.0)]),
            Err(Error::InvalidDensity { .. })
        ));
        assert!(matches!(
            PropellantMixture::new([("A", 1.0, 1.0), ("A", 2.0, 1.0)]),
            Err(Error::DuplicatePropellant(_))
        ));
    }

    #[test]
    fn resolve_against_stock_library() {
        let lib = ResourceLibrary::stock();
        let mix =
            PropellantMixture::resolve([("LiquidFuel", 0.9), ("Oxidizer", 1.1)], &lib).unwrap();
        assert_eq!(mix.names(), "LiquidFuel|Oxidizer");

        let err = PropellantMixture::resolve([("Unobtainium", 1.0)], &lib).unwrap_err();
        assert!(matches!(err, Error::UnknownResource(ref n) if n == "Unobtainium"));
    }

    #[test]
    fn single_propellant_is_mixture_of_one() {
        let mix = PropellantMixture::single("MonoPropellant", 0.004).unwrap();
        assert_eq!(mix.len(), 1);
        assert!((mix.propellants()[0].normalized_ratio - 1.0).abs() < 1e-12);
        assert!((mix.average_density() - 0.004).abs() < 1e-12);
    }

    fn entries() -> impl Strategy<Value = Vec<(f64, f64)>> {
        prop::collection::vec(
            (0.01f64..100.0, prop_oneof![Just(0.0), 1e-5f64..10.0]),
            1..6,
        )
    }

    proptest! {
        #[test]
        fn normalised_ratios_sum_to_one(list in entries()) {
            let mix = PropellantMixture::new(
                list.iter().enumerate().map(|(i, &(r, d))| (format!("P{i}"), r, d)),
            ).unwrap();
            if mix.propellants().iter().any(|p| p.has_mass()) {
                let sum: f64 = mix
                    .propellants()
                    .iter()
                    .filter(|p| p.has_mass())
                    .map(|p| p.normalized_ratio)
                    .sum();
                prop_assert!((sum - 1.0).abs() < 1e-9, "sum = {}", sum);
            }
        }

        #[test]
        fn average_density_zero_iff_massless(list in entries()) {
            let mix = PropellantMixture::new(
                list.iter().enumerate().map(|(i, &(r, d))| (format!("P{i}"), r, d)),
            ).unwrap();
            let any_mass = list.iter().any(|&(_, d)| d > 0.0);
            prop_assert!(mix.average_density() >= 0.0);
            prop_assert_eq!(mix.average_density() == 0.0, !any_mass);
        }
    }
}
