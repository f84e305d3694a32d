use std::ops;

/// A gate in an arithmetic circuit. Non-input gates own their operands, so
/// a circuit is a tree; referencing the same party's input from several
/// places creates independent `Input` gates, each of which is shared
/// independently during the protocol.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gate {
    Input { party: usize },
    Add { lhs: Box<Gate>, rhs: Box<Gate> },
    Mul { lhs: Box<Gate>, rhs: Box<Gate> },
}

impl Gate {
    /// Input gate holding the secret of the given party.
    pub fn input(party: usize) -> Gate {
        Gate::Input { party }
    }
}

impl ops::Add for Gate {
    type Output = Gate;

    fn add(self, rhs: Gate) -> Gate {
        Gate::Add {
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }
}

impl ops::Mul for Gate {
    type Output = Gate;

    fn mul(self, rhs: Gate) -> Gate {
        Gate::Mul {
            lhs: Box::new(self),
            rhs: Box::new(rhs),
        }
    }
}

/// One slot of a linearised circuit. Operand fields are indices of earlier
/// slots in the same schedule.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Op {
    Input { party: usize },
    Add { lhs: usize, rhs: usize },
    Mul { lhs: usize, rhs: usize },
}

/// Deterministic post-order linearisation of a circuit. Every party works
/// off the same schedule, so a slot index identifies the same logical gate
/// at every party. The root is the last slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Schedule {
    ops: Vec<Op>,
    num_parties: usize,
}

impl Schedule {
    /// The linearised gates, root last.
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Number of slots in the schedule.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// A schedule of a well-formed circuit is never empty.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Number of parties participating in the protocol.
    pub fn num_parties(&self) -> usize {
        self.num_parties
    }
}

/// An arithmetic circuit to be evaluated jointly by a fixed set of parties.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Circuit {
    root: Gate,
    num_parties: usize,
}

enum Visit<'a> {
    Enter(&'a Gate),
    Exit(&'a Gate),
}

impl Circuit {
    /// Create a circuit rooted at the output gate.
    pub fn new(root: Gate, num_parties: usize) -> Self {
        assert!(num_parties > 0, "circuit needs at least one party");
        Circuit { root, num_parties }
    }

    /// Number of parties participating in the protocol.
    pub fn num_parties(&self) -> usize {
        self.num_parties
    }

    /// Linearise the circuit into its shared gate schedule: iterative
    /// post-order, left operand before right, root last.
    pub fn schedule(&self) -> Schedule {
        let mut ops = Vec::new();
        // Indices of already-emitted subtree results, in evaluation order.
        let mut operands: Vec<usize> = Vec::new();
        let mut stack = vec![Visit::Enter(&self.root)];

        while let Some(visit) = stack.pop() {
            match visit {
                Visit::Enter(gate) => match gate {
                    Gate::Input { party } => {
                        operands.push(ops.len());
                        ops.push(Op::Input { party: *party });
                    }
                    Gate::Add { lhs, rhs } | Gate::Mul { lhs, rhs } => {
                        stack.push(Visit::Exit(gate));
                        stack.push(Visit::Enter(rhs));
                        stack.push(Visit::Enter(lhs));
                    }
                },
                Visit::Exit(gate) => {
                    let rhs = operands.pop().expect("operand for binary gate");
                    let lhs = operands.pop().expect("operand for binary gate");
                    operands.push(ops.len());
                    ops.push(match gate {
                        Gate::Add { .. } => Op::Add { lhs, rhs },
                        Gate::Mul { .. } => Op::Mul { lhs, rhs },
                        Gate::Input { .. } => unreachable!("input gates exit on entry"),
                    });
                }
            }
        }

        Schedule {
            ops,
            num_parties: self.num_parties,
        }
    }

    /// Reference evaluation in the clear, over raw integers without
    /// modular reduction. The caller reduces before comparing with a
    /// protocol output.
    pub fn compute_expected(&self, secrets: &[u64]) -> i128 {
        let schedule = self.schedule();
        let mut cells: Vec<i128> = Vec::with_capacity(schedule.len());
        for op in schedule.ops() {
            cells.push(match *op {
                Op::Input { party } => secrets[party] as i128,
                Op::Add { lhs, rhs } => cells[lhs] + cells[rhs],
                Op::Mul { lhs, rhs } => cells[lhs] * cells[rhs],
            });
        }
        *cells.last().expect("schedule is never empty")
    }
}
