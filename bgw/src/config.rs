use std::fmt;

use crate::{circuit::Circuit, field::Field};

/// A validated description of one protocol run.
#[derive(Clone, Debug)]
pub struct Config {
    pub secrets: Vec<u64>,
    pub circuit: Circuit,
    pub field: Field,
    pub degree: usize,
    pub seed: u64,
}

/// Configuration error, surfaced before any party is launched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    InvalidModulus { modulus: u64 },
    NegativeDegree,
    InvalidDegree { degree: usize, parties: usize },
    SecretsMismatch { secrets: usize, parties: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::InvalidModulus { modulus } => {
                write!(f, "field modulus must be a prime of at least 2, got {}", modulus)
            }
            Self::NegativeDegree => write!(f, "degree cannot be negative"),
            Self::InvalidDegree { degree, parties } => write!(
                f,
                "degree {} does not satisfy 2T < N for {} parties",
                degree, parties
            ),
            Self::SecretsMismatch { secrets, parties } => write!(
                f,
                "length mismatch between number of secrets ({}) and number of parties ({})",
                secrets, parties
            ),
        }
    }
}

impl Config {
    /// Validate and assemble a run configuration. One secret per party,
    /// modulus at least 2, and a sharing degree T with 2T < N.
    pub fn new(
        secrets: Vec<u64>,
        circuit: Circuit,
        prime: u64,
        degree: usize,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        if prime < 2 {
            return Err(ConfigError::InvalidModulus { modulus: prime });
        }
        let parties = circuit.num_parties();
        if secrets.len() != parties {
            return Err(ConfigError::SecretsMismatch {
                secrets: secrets.len(),
                parties,
            });
        }
        if 2 * degree >= parties {
            return Err(ConfigError::InvalidDegree { degree, parties });
        }
        Ok(Config {
            secrets,
            circuit,
            field: Field::new(prime),
            degree,
            seed,
        })
    }
}

/// The highest degree tolerating a passive minority: T = (N - 1) / 2.
pub fn default_degree(num_parties: usize) -> usize {
    num_parties.saturating_sub(1) / 2
}

/// Map a user-supplied degree flag onto a degree; `None` picks the default
/// for the party count, negative values are rejected.
pub fn resolve_degree(requested: Option<i64>, num_parties: usize) -> Result<usize, ConfigError> {
    match requested {
        None => Ok(default_degree(num_parties)),
        Some(degree) if degree < 0 => Err(ConfigError::NegativeDegree),
        Some(degree) => Ok(degree as usize),
    }
}

#[cfg(test)]
mod tests {
    use super::{default_degree, resolve_degree, Config, ConfigError};
    use crate::circuit::{Circuit, Gate};

    fn two_party_circuit() -> Circuit {
        Circuit::new(Gate::input(0) + Gate::input(1), 2)
    }

    #[test]
    fn accepts_a_valid_configuration() {
        let config = Config::new(vec![5, 28], two_party_circuit(), 101, 0, 7).unwrap();
        assert_eq!(config.field.modulus(), 101);
        assert_eq!(config.degree, 0);
    }

    #[test]
    fn rejects_degree_violating_the_threshold() {
        let err = Config::new(vec![5, 28], two_party_circuit(), 101, 1, 7).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidDegree {
                degree: 1,
                parties: 2
            }
        );
        assert_eq!(err.to_string(), "degree 1 does not satisfy 2T < N for 2 parties");
    }

    #[test]
    fn rejects_secrets_length_mismatch() {
        let err = Config::new(vec![5], two_party_circuit(), 101, 0, 7).unwrap_err();
        assert_eq!(
            err.to_string(),
            "length mismatch between number of secrets (1) and number of parties (2)"
        );
    }

    #[test]
    fn rejects_degenerate_modulus() {
        for modulus in [0, 1] {
            assert_eq!(
                Config::new(vec![5, 28], two_party_circuit(), modulus, 0, 7).unwrap_err(),
                ConfigError::InvalidModulus { modulus }
            );
        }
    }

    #[test]
    fn degree_flag_resolution() {
        assert_eq!(resolve_degree(None, 6).unwrap(), 2);
        assert_eq!(resolve_degree(None, 2).unwrap(), 0);
        assert_eq!(resolve_degree(Some(1), 6).unwrap(), 1);
        assert_eq!(resolve_degree(Some(-1), 6).unwrap_err(), ConfigError::NegativeDegree);
        assert_eq!(
            resolve_degree(Some(-1), 6).unwrap_err().to_string(),
            "degree cannot be negative"
        );
    }

    #[test]
    fn default_degree_is_the_largest_passive_threshold() {
        assert_eq!(default_degree(1), 0);
        assert_eq!(default_degree(2), 0);
        assert_eq!(default_degree(3), 1);
        assert_eq!(default_degree(6), 2);
        assert_eq!(default_degree(7), 3);
    }
}
