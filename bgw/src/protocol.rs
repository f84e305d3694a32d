use std::{fmt, sync::Arc};

use futures::{stream::FuturesUnordered, StreamExt};
use rand::{rngs::SmallRng, SeedableRng};
use tracing::debug;

use crate::{
    config::Config,
    party::Party,
    transport::{multiparty_channels, ChannelError},
};

/// Error from a launched protocol run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProtocolError {
    Channel(ChannelError),
    Disagreement { outputs: Vec<u64> },
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Channel(ref err) => err.fmt(f),
            Self::Disagreement { ref outputs } => {
                write!(f, "parties returned different outputs: {:?}", outputs)
            }
        }
    }
}

impl From<ChannelError> for ProtocolError {
    fn from(err: ChannelError) -> Self {
        ProtocolError::Channel(err)
    }
}

/// Seed for one party's generator, derived from the run seed so that runs
/// are reproducible and parties never share a generator.
fn party_seed(seed: u64, id: usize) -> u64 {
    seed ^ (id as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// Run the protocol described by `config`: one party per secret, all
/// driven concurrently over an in-process bus. Returns the output all
/// parties agreed on.
pub async fn run_protocol(config: &Config) -> Result<u64, ProtocolError> {
    let num_parties = config.secrets.len();
    let schedule = Arc::new(config.circuit.schedule());
    debug!(
        parties = num_parties,
        gates = schedule.len(),
        degree = config.degree,
        "launching parties"
    );

    let mut parties = FuturesUnordered::new();
    for (id, transport) in multiparty_channels(num_parties).into_iter().enumerate() {
        let rng = SmallRng::seed_from_u64(party_seed(config.seed, id));
        parties.push(
            Party::new(
                id,
                config.secrets[id],
                Arc::clone(&schedule),
                config.field,
                config.degree,
                transport,
                rng,
            )
            .run(),
        );
    }

    let mut outputs = Vec::with_capacity(num_parties);
    while let Some(result) = parties.next().await {
        outputs.push(result?);
    }

    let output = outputs[0];
    if outputs.iter().any(|&x| x != output) {
        return Err(ProtocolError::Disagreement { outputs });
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::run_protocol;
    use crate::{
        circuit::{Circuit, Gate},
        config::Config,
    };

    fn s(party: usize) -> Gate {
        Gate::input(party)
    }

    async fn run(secrets: Vec<u64>, root: Gate, degree: usize) -> u64 {
        let circuit = Circuit::new(root, secrets.len());
        let config = Config::new(secrets, circuit, 101, degree, 12345).unwrap();
        run_protocol(&config).await.unwrap()
    }

    #[tokio::test]
    async fn sum_of_three_products() {
        let root = s(0) * s(1) + s(2) * s(3) + s(4) * s(5);
        assert_eq!(run(vec![20, 40, 21, 31, 1, 71], root, 2).await, 7);
    }

    #[tokio::test]
    async fn tree_of_sums() {
        let root = (s(0) + s(1)) + (s(2) + s(3)) + (s(4) + s(5));
        assert_eq!(run(vec![1, 2, 3, 4, 5, 6], root, 2).await, 21);
    }

    #[tokio::test]
    async fn two_parties_with_repeated_inputs() {
        let root = s(0) * s(1) + (s(1) + s(0)) + s(0) * s(0);
        assert_eq!(run(vec![1, 2], root, 0).await, 6);
    }

    #[tokio::test]
    async fn three_party_sum() {
        let root = s(0) + (s(1) + s(2));
        assert_eq!(run(vec![5, 28, 6], root, 1).await, 39);
    }

    #[tokio::test]
    async fn output_wraps_around_the_modulus() {
        // (10 + 20) * 30 = 900 = 92 mod 101.
        let root = (s(0) + s(1)) * s(2);
        assert_eq!(run(vec![10, 20, 30], root, 1).await, 92);
    }

    #[tokio::test]
    async fn single_party_degenerate_run() {
        assert_eq!(run(vec![42], s(0), 0).await, 42);
    }

    #[tokio::test]
    async fn agrees_with_plaintext_reference() {
        let circuit = Circuit::new((s(0) + s(1)) * s(2), 3);
        let expected = circuit.compute_expected(&[10, 20, 30]);
        let config = Config::new(vec![10, 20, 30], circuit, 101, 1, 7).unwrap();
        let actual = run_protocol(&config).await.unwrap();
        assert_eq!(actual, config.field.reduce(expected));
    }

    #[tokio::test]
    async fn symmetric_circuit_ignores_secret_layout() {
        let build = || (s(0) + s(1)) + (s(2) + s(3)) + (s(4) + s(5));
        let base = run(vec![1, 2, 3, 4, 5, 6], build(), 2).await;
        let permuted = run(vec![6, 4, 2, 5, 3, 1], build(), 2).await;
        assert_eq!(base, permuted);
    }

    #[tokio::test]
    async fn output_does_not_depend_on_the_seed() {
        let circuit = || Circuit::new(s(0) * s(1) + s(2), 3);
        for seed in [0, 1, 0xdead_beef] {
            let config = Config::new(vec![3, 4, 5], circuit(), 101, 1, seed).unwrap();
            assert_eq!(run_protocol(&config).await.unwrap(), 17);
        }
    }
}
