use rand::Rng;

use crate::field::Field;

/// Dense polynomial over a prime field. `coeffs[0]` is the constant term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coeffs: Vec<u64>,
    field: Field,
}

impl Polynomial {
    /// Create a polynomial from its coefficients, constant term first.
    pub fn new(coeffs: Vec<u64>, field: Field) -> Self {
        assert!(
            !coeffs.is_empty(),
            "polynomial needs at least one coefficient"
        );
        Polynomial { coeffs, field }
    }

    /// Random polynomial of the given degree with a fixed constant term.
    /// Its evaluations at points `1..` are Shamir shares of `constant`.
    pub fn random(constant: u64, degree: usize, field: Field, rng: &mut impl Rng) -> Self {
        let mut coeffs = Vec::with_capacity(degree + 1);
        coeffs.push(constant);
        for _ in 0..degree {
            coeffs.push(field.random(rng));
        }
        Polynomial { coeffs, field }
    }

    /// Degree of this polynomial.
    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Evaluate at `x` by Horner's rule, reducing at every step.
    pub fn eval(&self, x: u64) -> u64 {
        self.coeffs
            .iter()
            .rev()
            .fold(0, |acc, &c| self.field.add(self.field.mul(acc, x), c))
    }
}

/// Lagrange recombination coefficient for evaluation points `1..=len`:
/// the weight of evaluation `party + 1` when recovering `f(0)` as
/// `sum_p f(p + 1) * recombination(field, p, len)`.
pub fn recombination(field: Field, party: usize, len: usize) -> u64 {
    let i = (party + 1) as i128;
    let mut acc = 1;
    for j in 1..=len as i128 {
        if j == i {
            continue;
        }
        let numer = field.reduce(j);
        let denom = field.reduce(j - i);
        acc = field.mul(acc, field.div(numer, denom));
    }
    acc
}
