//! Load-time configuration: engine propellant lists, resource densities and
//! demo scenarios, all parsed from TOML.

use std::path::Path;

use serde::Deserialize;

use crate::engine::Accounting;
use crate::error::Result;
use crate::propulsion::{PropellantMixture, ResourceLibrary};

fn default_true() -> bool {
    true
}

/// One `(name, ratio)` entry of an engine's propellant list.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PropellantConfig {
    pub name: String,
    pub ratio: f64,
}

/// Engine configuration.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct EngineConfig {
    pub name: String,
    #[serde(default = "default_true")]
    pub account_mass: bool,
    #[serde(default)]
    pub account_massless: bool,
    pub propellants: Vec<PropellantConfig>,
    /// Thrust at full throttle, used by the reference host.
    #[serde(default)]
    pub max_thrust: f64,
    /// Vacuum Isp in seconds, used by the reference host.
    #[serde(default)]
    pub isp: f64,
}

impl EngineConfig {
    pub fn accounting(&self) -> Accounting {
        Accounting { mass: self.account_mass, massless: self.account_massless }
    }

    /// Resolve densities and build the mixture. Fails on unknown resource names.
    pub fn mixture(&self, library: &ResourceLibrary) -> Result<PropellantMixture> {
        PropellantMixture::resolve(
            self.propellants.iter().map(|p| (p.name.as_str(), p.ratio)),
            library,
        )
    }
}

#[derive(Debug, Deserialize)]
struct ResourceRecord {
    name: String,
    density: f64,
}

#[derive(Debug, Deserialize)]
struct ResourceFile {
    #[serde(default)]
    resources: Vec<ResourceRecord>,
}

impl ResourceLibrary {
    /// Parse `[[resources]]` tables of `name` / `density`.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: ResourceFile = toml::from_str(contents)?;
        let mut library = ResourceLibrary::new();
        for r in file.resources {
            library.define(r.name, r.density)?;
        }
        Ok(library)
    }
}

// ---------------------------------------------------------------------------
// Demo scenario
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct TankConfig {
    pub resource: String,
    pub amount: f64,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct VesselConfig {
    pub name: String,
    pub dry_mass: f64,
    /// Circular orbit altitude above the body surface, m.
    pub altitude: f64,
    #[serde(default = "default_body")]
    pub body: String,
    #[serde(default)]
    pub tanks: Vec<TankConfig>,
}

fn default_body() -> String {
    "kerbin".to_string()
}

/// A vessel plus the engines mounted on it, in tick order.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ScenarioConfig {
    pub vessel: VesselConfig,
    pub engines: Vec<EngineConfig>,
}

impl ScenarioConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }
}

pub fn load_resource_library<P: AsRef<Path>>(path: P) -> Result<ResourceLibrary> {
    ResourceLibrary::from_toml_str(&std::fs::read_to_string(path)?)
}

pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig> {
    ScenarioConfig::from_toml_str(&std::fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    const ION: &str = r#"
        name = "ion"
        max_thrust = 2.0
        isp = 4200.0

        [[propellants]]
        name = "XenonGas"
        ratio = 0.1

        [[propellants]]
        name = "ElectricCharge"
        ratio = 1.8
    "#;

    fn engine(contents: &str) -> EngineConfig {
        toml::from_str(contents).unwrap()
    }

    #[test]
    fn accounting_defaults() {
        let cfg = engine(ION);
        assert_eq!(cfg.accounting(), Accounting { mass: true, massless: false });
        assert_eq!(cfg.propellants.len(), 2);
        assert_eq!(cfg.max_thrust, 2.0);
    }

    #[test]
    fn mixture_from_stock_library() {
        let cfg = engine(ION);
        let mix = cfg.mixture(&ResourceLibrary::stock()).unwrap();
        assert!((mix.average_density() - 0.0001).abs() < 1e-15);
    }

    #[test]
    fn unresolvable_propellant_is_rejected() {
        let cfg = engine("name = \"x\"\n[[propellants]]\nname = \"Kethane\"\nratio = 1.0\n");
        assert!(matches!(
            cfg.mixture(&ResourceLibrary::stock()),
            Err(Error::UnknownResource(_))
        ));
    }

    #[test]
    fn empty_propellant_list_is_rejected() {
        let cfg = engine("name = \"x\"\npropellants = []\n");
        assert!(matches!(cfg.mixture(&ResourceLibrary::stock()), Err(Error::NoPropellants)));
    }

    #[test]
    fn resource_library_from_toml() {
        let lib = ResourceLibrary::from_toml_str(
            r#"
[[resources]]
name = "Kethane"
density = 0.002

[[resources]]
name = "Charge"
density = 0.0
"#,
        )
        .unwrap();
        assert_eq!(lib.density("Kethane"), Some(0.002));
        assert_eq!(lib.density("Charge"), Some(0.0));
        assert_eq!(lib.len(), 2);

        let bad = ResourceLibrary::from_toml_str("[[resources]]\nname = \"X\"\ndensity = -1.0\n");
        assert!(matches!(bad, Err(Error::InvalidDensity { .. })));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        assert!(matches!(ScenarioConfig::from_toml_str("vessel = "), Err(Error::Toml(_))));
    }

    #[test]
    fn scenario_parses() {
        let scenario = ScenarioConfig::from_toml_str(
            r#"
            [vessel]
            name = "Probe"
            dry_mass = 0.5
            altitude = 100000.0

            [[vessel.tanks]]
            resource = "XenonGas"
            amount = 700.0

            [[engines]]
            name = "ion"
            max_thrust = 2.0
            isp = 4200.0
            [[engines.propellants]]
            name = "XenonGas"
            ratio = 1.0
            "#,
        )
        .unwrap();
        assert_eq!(scenario.vessel.body, "kerbin");
        assert_eq!(scenario.vessel.tanks[0].amount, 700.0);
        assert_eq!(scenario.engines[0].name, "ion");
    }
}
