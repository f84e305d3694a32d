use bgw::{Circuit, Gate};

/// A hard-coded example: the secret each party contributes and the circuit
/// they jointly evaluate.
pub struct Example {
    pub secrets: Vec<u64>,
    pub circuit: Circuit,
}

fn s(party: usize) -> Gate {
    Gate::input(party)
}

/// Look up a pre-registered example circuit by number.
pub fn example(number: u32) -> Option<Example> {
    let example = match number {
        1 => Example {
            secrets: vec![20, 40, 21, 31, 1, 71],
            circuit: Circuit::new(s(0) * s(1) + s(2) * s(3) + s(4) * s(5), 6),
        },
        2 => Example {
            secrets: vec![1, 2, 3, 4, 5, 6],
            circuit: Circuit::new((s(0) + s(1)) + (s(2) + s(3)) + (s(4) + s(5)), 6),
        },
        3 => Example {
            secrets: vec![1, 2],
            circuit: Circuit::new(s(0) * s(1) + (s(1) + s(0)) + s(0) * s(0), 2),
        },
        4 => Example {
            secrets: vec![5, 28, 6],
            circuit: Circuit::new(s(0) + (s(1) + s(2)), 3),
        },
        5 => Example {
            secrets: vec![10, 20, 30],
            circuit: Circuit::new((s(0) + s(1)) * s(2), 3),
        },
        6 => Example {
            secrets: vec![0, 1],
            circuit: Circuit::new(fibonacci(10), 2),
        },
        _ => return None,
    };
    Some(example)
}

/// Addition chain computing the n-th Fibonacci number from the two
/// parties' seed values.
fn fibonacci(n: usize) -> Gate {
    let mut previous = s(0);
    let mut current = s(1);
    for _ in 1..n {
        let next = previous + current.clone();
        previous = current;
        current = next;
    }
    current
}

#[cfg(test)]
mod tests {
    use super::example;

    #[test]
    fn examples_match_their_plaintext_results() {
        let expected = [(1, 1522), (2, 21), (3, 6), (4, 39), (5, 900), (6, 55)];
        for (number, value) in expected {
            let example = example(number).unwrap();
            assert_eq!(
                example.circuit.compute_expected(&example.secrets),
                value,
                "circuit {}",
                number
            );
        }
    }

    #[test]
    fn secrets_match_party_counts() {
        for number in 1..=6 {
            let example = example(number).unwrap();
            assert_eq!(example.secrets.len(), example.circuit.num_parties());
        }
    }

    #[test]
    fn unknown_numbers_are_rejected() {
        assert!(example(0).is_none());
        assert!(example(7).is_none());
    }
}
