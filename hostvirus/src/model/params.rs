use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// Names of the fourteen model coefficients, in canonical order.
pub const PARAMETER_NAMES: [&str; 14] = [
    "alpha",
    "alpha_s",
    "beta_1",
    "beta_2",
    "mu",
    "gamma_1_s",
    "gamma_1",
    "gamma_2",
    "nu",
    "nu_s",
    "zeta",
    "zeta_s",
    "kappa_1",
    "kappa_2",
];

/// Coefficients of the nondimensionalised host-virus system.
///
/// Has no `Default`. Build it field by field, through [`HostVirusParams::from_map`],
/// or from [`HostVirusParams::reference`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HostVirusParams {
    // Infection rates of general (alpha) and specialist (alpha_s) virus
    pub alpha: f64,
    pub alpha_s: f64,

    // Growth and crowding of general cells
    pub beta_1: f64,
    pub beta_2: f64,

    // Conversion of infected specialist cells y1 -> ys1
    pub mu: f64,

    // Lysis rates
    pub gamma_1_s: f64,
    pub gamma_1: f64,
    pub gamma_2: f64,

    // Virions lost per infection event
    pub nu: f64,
    pub nu_s: f64,

    // Viral decay
    pub zeta: f64,
    pub zeta_s: f64,

    // Burst sizes
    pub kappa_1: f64,
    pub kappa_2: f64,
}

impl HostVirusParams {
    /// The published reference parameter set.
    pub fn reference() -> Self {
        Self {
            alpha: 0.5,
            alpha_s: 2.0,
            beta_1: 1.5,
            beta_2: 2.0,
            mu: 0.1,
            gamma_1_s: 0.25,
            gamma_1: 0.25,
            gamma_2: 0.25,
            nu: 0.5,
            nu_s: 0.5,
            zeta: 0.22,
            zeta_s: 0.22,
            kappa_1: 1.0,
            kappa_2: 1.0,
        }
    }

    /// Build from a flat name -> value mapping. Every coefficient must be present
    /// exactly once and no other keys are accepted.
    pub fn from_map<'a, I>(entries: I) -> SimResult<Self>
    where
        I: IntoIterator<Item = (&'a str, f64)>,
    {
        let mut seen: BTreeMap<&str, f64> = BTreeMap::new();
        for (name, value) in entries {
            let canonical = PARAMETER_NAMES
                .iter()
                .copied()
                .find(|n| *n == name)
                .ok_or_else(|| SimError::UnknownParameter(name.to_string()))?;
            if seen.insert(canonical, value).is_some() {
                return Err(SimError::DuplicateParameter(name.to_string()));
            }
        }

        let mut p = Self::reference();
        for name in PARAMETER_NAMES {
            let v = seen
                .get(name)
                .copied()
                .ok_or_else(|| SimError::MissingParameter(name.to_string()))?;
            p.set(name, v)?;
        }
        Ok(p)
    }

    pub fn to_map(&self) -> BTreeMap<String, f64> {
        PARAMETER_NAMES
            .iter()
            .map(|n| (n.to_string(), self.field(n)))
            .collect()
    }

    pub fn get(&self, name: &str) -> SimResult<f64> {
        if PARAMETER_NAMES.contains(&name) {
            Ok(self.field(name))
        } else {
            Err(SimError::UnknownParameter(name.to_string()))
        }
    }

    pub fn set(&mut self, name: &str, value: f64) -> SimResult<()> {
        let slot = match name {
            "alpha" => &mut self.alpha,
            "alpha_s" => &mut self.alpha_s,
            "beta_1" => &mut self.beta_1,
            "beta_2" => &mut self.beta_2,
            "mu" => &mut self.mu,
            "gamma_1_s" => &mut self.gamma_1_s,
            "gamma_1" => &mut self.gamma_1,
            "gamma_2" => &mut self.gamma_2,
            "nu" => &mut self.nu,
            "nu_s" => &mut self.nu_s,
            "zeta" => &mut self.zeta,
            "zeta_s" => &mut self.zeta_s,
            "kappa_1" => &mut self.kappa_1,
            "kappa_2" => &mut self.kappa_2,
            other => return Err(SimError::UnknownParameter(other.to_string())),
        };
        *slot = value;
        Ok(())
    }

    /// Copy of `self` with one coefficient replaced.
    pub fn with(&self, name: &str, value: f64) -> SimResult<Self> {
        let mut p = *self;
        p.set(name, value)?;
        Ok(p)
    }

    fn field(&self, name: &str) -> f64 {
        match name {
            "alpha" => self.alpha,
            "alpha_s" => self.alpha_s,
            "beta_1" => self.beta_1,
            "beta_2" => self.beta_2,
            "mu" => self.mu,
            "gamma_1_s" => self.gamma_1_s,
            "gamma_1" => self.gamma_1,
            "gamma_2" => self.gamma_2,
            "nu" => self.nu,
            "nu_s" => self.nu_s,
            "zeta" => self.zeta,
            "zeta_s" => self.zeta_s,
            "kappa_1" => self.kappa_1,
            "kappa_2" => self.kappa_2,
            _ => unreachable!("field() called with unchecked name {name}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_entries() -> Vec<(String, f64)> {
        HostVirusParams::reference().to_map().into_iter().collect()
    }

    #[test]
    fn from_map_round_trips_reference() {
        let entries = reference_entries();
        let p = HostVirusParams::from_map(entries.iter().map(|(k, v)| (k.as_str(), *v))).unwrap();
        assert_eq!(p, HostVirusParams::reference());
    }

    #[test]
    fn missing_key_is_named() {
        let entries: Vec<_> = reference_entries()
            .into_iter()
            .filter(|(k, _)| k != "gamma_2")
            .collect();
        let err = HostVirusParams::from_map(entries.iter().map(|(k, v)| (k.as_str(), *v))).unwrap_err();
        assert_eq!(err, SimError::MissingParameter("gamma_2".into()));
        assert_eq!(err.to_string(), "missing parameter 'gamma_2'");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let mut entries = reference_entries();
        entries.push(("lambda".into(), 1.0));
        let err = HostVirusParams::from_map(entries.iter().map(|(k, v)| (k.as_str(), *v))).unwrap_err();
        assert_eq!(err, SimError::UnknownParameter("lambda".into()));
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut entries = reference_entries();
        entries.push(("alpha".into(), 0.9));
        let err = HostVirusParams::from_map(entries.iter().map(|(k, v)| (k.as_str(), *v))).unwrap_err();
        assert_eq!(err, SimError::DuplicateParameter("alpha".into()));
        assert_eq!(err.to_string(), "duplicate parameter 'alpha'");
    }

    #[test]
    fn with_replaces_single_coefficient() {
        let base = HostVirusParams::reference();
        let p = base.with("zeta_s", 0.3).unwrap();
        assert_eq!(p.zeta_s, 0.3);
        assert_eq!(p.zeta, base.zeta);
        assert_eq!(base.zeta_s, 0.22);
        assert!(base.with("nope", 1.0).is_err());
        assert_eq!(p.get("zeta_s").unwrap(), 0.3);
    }
}
