use std::{
    process,
    time::{SystemTime, UNIX_EPOCH},
};

use argh::FromArgs;
use bgw::{resolve_degree, run_protocol, Config};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod circuits;

/// Run the BGW protocol on a pre-registered example circuit.
#[derive(FromArgs, Debug)]
struct Options {
    /// number of the circuit to run
    #[argh(option, default = "1")]
    circuit: u32,

    /// prime modulus for the field arithmetic
    #[argh(option, default = "101")]
    prime: u64,

    /// degree of the sharing polynomial; defaults to (N - 1) / 2
    #[argh(option)]
    degree: Option<i64>,

    /// seed for the random sharings; unset or 0 uses wall-clock nanoseconds
    #[argh(option, default = "0")]
    seed: u64,
}

fn wall_clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before the epoch")
        .as_nanos() as u64
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let options: Options = argh::from_env();

    let Some(example) = circuits::example(options.circuit) else {
        eprintln!("unrecognised circuit number: {}", options.circuit);
        process::exit(1);
    };

    let num_parties = example.circuit.num_parties();
    let degree = match resolve_degree(options.degree, num_parties) {
        Ok(degree) => degree,
        Err(err) => {
            eprintln!("configuration failed: {}", err);
            process::exit(1);
        }
    };
    let seed = if options.seed == 0 {
        wall_clock_seed()
    } else {
        options.seed
    };

    let config = match Config::new(example.secrets, example.circuit, options.prime, degree, seed) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("configuration failed: {}", err);
            process::exit(1);
        }
    };

    info!(
        circuit = options.circuit,
        parties = num_parties,
        secrets = ?config.secrets,
        degree = config.degree,
        seed = config.seed,
        "starting BGW protocol"
    );

    let expected = config
        .field
        .reduce(config.circuit.compute_expected(&config.secrets));

    let actual = match run_protocol(&config).await {
        Ok(output) => output,
        Err(err) => {
            eprintln!("protocol failed: {}", err);
            process::exit(1);
        }
    };

    println!("expected output: {}", expected);
    println!("actual output:   {}", actual);

    if expected == actual {
        println!("protocol succeeded");
    } else {
        eprintln!("protocol failed: output does not match the plaintext reference");
        process::exit(1);
    }
}
