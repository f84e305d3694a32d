use rand::Rng;

/// Prime field with a runtime modulus. Elements are `u64` values in `[0, modulus)`.
///
/// Primality of the modulus is the caller's responsibility; a composite
/// modulus silently breaks `inv` and everything built on it.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Field {
    modulus: u64,
}

impl Field {
    /// Create a field with the given modulus.
    pub fn new(modulus: u64) -> Self {
        assert!(modulus >= 2, "field modulus must be at least 2");
        Field { modulus }
    }

    /// The field modulus.
    pub fn modulus(&self) -> u64 {
        self.modulus
    }

    /// Reduce a signed integer to its representative in `[0, modulus)`.
    /// Unlike the `%` operator, the result is never negative.
    pub fn reduce(&self, a: i128) -> u64 {
        a.rem_euclid(self.modulus as i128) as u64
    }

    /// Add two elements.
    pub fn add(&self, a: u64, b: u64) -> u64 {
        ((a as u128 + b as u128) % self.modulus as u128) as u64
    }

    /// Subtract `b` from `a`.
    pub fn sub(&self, a: u64, b: u64) -> u64 {
        self.reduce(a as i128 - b as i128)
    }

    /// Multiply two elements.
    pub fn mul(&self, a: u64, b: u64) -> u64 {
        (a as u128 * b as u128 % self.modulus as u128) as u64
    }

    /// Raise `a` to the `e`-th power by square-and-multiply.
    /// Every intermediate product is reduced, so moduli near the `u64`
    /// range cannot overflow.
    pub fn pow(&self, a: u64, mut e: u64) -> u64 {
        let m = self.modulus as u128;
        let mut base = a as u128 % m;
        let mut acc: u128 = 1;
        while e > 0 {
            if e & 1 != 0 {
                acc = acc * base % m;
            }
            base = base * base % m;
            e >>= 1;
        }
        acc as u64
    }

    /// Multiplicative inverse via Fermat's little theorem.
    ///
    /// `a` must be nonzero mod the modulus: `inv(0)` returns 0, which is
    /// not an inverse of anything.
    pub fn inv(&self, a: u64) -> u64 {
        self.pow(a, self.modulus - 2)
    }

    /// Divide `a` by `b`. `b` must be nonzero mod the modulus.
    pub fn div(&self, a: u64, b: u64) -> u64 {
        self.mul(a, self.inv(b))
    }

    /// Uniformly random element.
    pub fn random(&self, rng: &mut impl Rng) -> u64 {
        rng.gen_range(0..self.modulus)
    }

    /// Sum of a sequence of elements.
    pub fn sum(&self, values: impl IntoIterator<Item = u64>) -> u64 {
        values.into_iter().fold(0, |acc, x| self.add(acc, x))
    }

    /// Product of a sequence of elements.
    pub fn product(&self, values: impl IntoIterator<Item = u64>) -> u64 {
        values.into_iter().fold(1, |acc, x| self.mul(acc, x))
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::SmallRng, SeedableRng};

    use super::Field;

    #[test]
    fn reduce_is_never_negative() {
        let field = Field::new(101);
        assert_eq!(field.reduce(602), 97);
        assert_eq!(field.reduce(-42), 59);
        assert_eq!(field.reduce(-100), 1);
        assert_eq!(field.reduce(0), 0);
    }

    #[test]
    fn basic_arithmetic() {
        let field = Field::new(101);
        assert_eq!(field.add(602, 103), 99);
        assert_eq!(field.sub(602, 103), 95);
        assert_eq!(field.mul(21, 1032), 58);
        assert_eq!(field.pow(21, 3), 70);
    }

    #[test]
    fn arithmetic_on_reduced_negatives() {
        let field = Field::new(11);
        assert_eq!(field.pow(field.reduce(-3), 3), 6);
        assert_eq!(field.inv(field.reduce(-3)), 7);
    }

    #[test]
    fn inverses() {
        let field = Field::new(11);
        assert_eq!(field.inv(29), 8);
        assert_eq!(field.div(29, 3), 6);
        for a in 1..11 {
            assert_eq!(field.mul(a, field.inv(a)), 1, "a = {}", a);
        }
    }

    #[test]
    fn fermat() {
        let field = Field::new(101);
        for a in 1..101 {
            assert_eq!(field.pow(a, 100), 1, "a = {}", a);
        }
    }

    #[test]
    fn pow_reduces_intermediate_products() {
        // With the modulus 2^61 - 1 a single unreduced squaring overflows
        // 64 bits.
        let field = Field::new(2305843009213693951);
        assert_eq!(
            field.mul(field.pow(3, 100), field.pow(field.inv(3), 100)),
            1
        );
    }

    #[test]
    fn folds() {
        let field = Field::new(11);
        assert_eq!(field.sum([3, 1, 2, 6]), 1);
        assert_eq!(field.product([3, 1, 2, 6]), 3);
        assert_eq!(field.sum([]), 0);
        assert_eq!(field.product([]), 1);
    }

    #[test]
    fn random_is_in_range() {
        let field = Field::new(101);
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1000 {
            assert!(field.random(&mut rng) < 101);
        }
    }
}
