use crate::config::{EngineConfig, PropellantConfig, ScenarioConfig, TankConfig, VesselConfig};

fn propellant(name: &str, ratio: f64) -> PropellantConfig {
    PropellantConfig { name: name.into(), ratio }
}

/// Xenon ion probe in low Kerbin orbit ("Dawnlet").
pub fn ion_probe() -> ScenarioConfig {
    ScenarioConfig {
        vessel: VesselConfig {
            name: "Dawnlet".into(),
            dry_mass: 0.5,
            altitude: 100_000.0,
            body: "kerbin".into(),
            tanks: vec![
                TankConfig { resource: "XenonGas".into(), amount: 700.0 },
                TankConfig { resource: "ElectricCharge".into(), amount: 1.0e7 },
            ],
        },
        engines: vec![EngineConfig {
            name: "IX-6315".into(),
            account_mass: true,
            account_massless: true,
            propellants: vec![propellant("XenonGas", 0.1), propellant("ElectricCharge", 1.8)],
            max_thrust: 2.0,
            isp: 4200.0,
        }],
    }
}

/// Two bipropellant engines sharing one small tank set.
pub fn twin_tug() -> ScenarioConfig {
    let engine = |name: &str| EngineConfig {
        name: name.into(),
        account_mass: true,
        account_massless: false,
        propellants: vec![propellant("LiquidFuel", 0.9), propellant("Oxidizer", 1.1)],
        max_thrust: 60.0,
        isp: 345.0,
    };
    ScenarioConfig {
        vessel: VesselConfig {
            name: "Twin Tug".into(),
            dry_mass: 2.0,
            altitude: 250_000.0,
            body: "kerbin".into(),
            tanks: vec![
                TankConfig { resource: "LiquidFuel".into(), amount: 90.0 },
                TankConfig { resource: "Oxidizer".into(), amount: 110.0 },
            ],
        },
        engines: vec![engine("Terrier-A"), engine("Terrier-B")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propulsion::ResourceLibrary;
    use crate::sim::Vessel;

    #[test]
    fn presets_resolve_against_stock_library() {
        let lib = ResourceLibrary::stock();
        for scenario in [ion_probe(), twin_tug()] {
            let (vessel, engines) = Vessel::from_scenario(&scenario, &lib).unwrap();
            assert_eq!(vessel.mounts.len(), engines.len());
            assert!(engines.iter().all(|e| e.mixture().has_reaction_mass()));
        }
    }
}
