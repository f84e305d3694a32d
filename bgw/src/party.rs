use std::sync::Arc;

use rand::rngs::SmallRng;
use tracing::debug;

use crate::{
    circuit::{Op, Schedule},
    field::Field,
    poly::{recombination, Polynomial},
    transport::{ChannelError, Message, MultipartyTransport},
};

/// One participant in the protocol. A party is constructed with its secret
/// and a view of the shared schedule, run once to completion, and then
/// discarded; it is not re-entrant.
pub struct Party {
    id: usize,
    secret: u64,
    field: Field,
    degree: usize,
    schedule: Arc<Schedule>,
    transport: MultipartyTransport,
    rng: SmallRng,
    /// Shares received, per (source party, schedule slot). The extra final
    /// column holds the output-reconstruction round.
    shares: Vec<Vec<Option<u64>>>,
}

impl Party {
    /// Create a party. `degree` is the Shamir polynomial degree T; the
    /// caller guarantees `2 * degree < schedule.num_parties()`.
    pub fn new(
        id: usize,
        secret: u64,
        schedule: Arc<Schedule>,
        field: Field,
        degree: usize,
        transport: MultipartyTransport,
        rng: SmallRng,
    ) -> Self {
        let num_parties = schedule.num_parties();
        debug_assert_eq!(transport.num_parties(), num_parties);
        let shares = vec![vec![None; schedule.len() + 1]; num_parties];
        Party {
            id,
            secret,
            field,
            degree,
            schedule,
            transport,
            rng,
            shares,
        }
    }

    fn num_parties(&self) -> usize {
        self.shares.len()
    }

    /// Record an inbound share. Each (src, gate) slot is written exactly
    /// once per protocol invariant; a second write is a bug.
    fn store(&mut self, msg: Message) {
        let slot = &mut self.shares[msg.src][msg.gate];
        if slot.is_some() {
            panic!(
                "party {}: duplicate share from party {} for gate {}",
                self.id, msg.src, msg.gate
            );
        }
        *slot = Some(msg.share);
    }

    /// Drain the inbox until the (src, gate) slot is populated. Shares for
    /// other slots that arrive in the meantime are stored for later; they
    /// are shares this party will need at an upcoming gate.
    async fn wait_for(&mut self, src: usize, gate: usize) -> Result<u64, ChannelError> {
        loop {
            if let Some(share) = self.shares[src][gate] {
                return Ok(share);
            }
            let msg = self.transport.receive().await?;
            self.store(msg);
        }
    }

    /// Shamir-share a value under the given slot: a fresh random degree-T
    /// polynomial with the value as its constant term, one evaluation per
    /// party. The own share goes straight into the share table.
    fn distribute(&mut self, value: u64, gate: usize) -> Result<(), ChannelError> {
        let poly = Polynomial::random(value, self.degree, self.field, &mut self.rng);
        for p in 0..self.num_parties() {
            let msg = Message {
                src: self.id,
                gate,
                share: poly.eval(p as u64 + 1),
            };
            if p == self.id {
                self.store(msg);
            } else {
                self.transport.send_to(p, msg)?;
            }
        }
        Ok(())
    }

    /// Run the protocol to completion and return this party's
    /// reconstructed output, an element of the field.
    pub async fn run(mut self) -> Result<u64, ChannelError> {
        debug!(party = self.id, "running");

        let num_parties = self.num_parties();
        let schedule = Arc::clone(&self.schedule);
        let recomb: Vec<u64> = (0..num_parties)
            .map(|p| recombination(self.field, p, num_parties))
            .collect();

        // This party's share of each gate evaluated so far.
        let mut cells: Vec<u64> = Vec::with_capacity(schedule.len());

        for (index, op) in schedule.ops().iter().enumerate() {
            let share = match *op {
                Op::Input { party } => {
                    if party == self.id {
                        self.distribute(self.secret, index)?;
                    }
                    self.wait_for(party, index).await?
                }
                Op::Add { lhs, rhs } => self.field.add(cells[lhs], cells[rhs]),
                Op::Mul { lhs, rhs } => {
                    // The local product lies on a polynomial of degree up
                    // to 2T. Re-share it with a fresh degree-T polynomial
                    // and recombine everyone's re-shares to bring the
                    // degree back down.
                    let product = self.field.mul(cells[lhs], cells[rhs]);
                    self.distribute(product, index)?;
                    let mut reduced = 0;
                    for p in 0..num_parties {
                        let incoming = self.wait_for(p, index).await?;
                        reduced = self.field.add(reduced, self.field.mul(incoming, recomb[p]));
                    }
                    reduced
                }
            };
            debug!(party = self.id, gate = index, "gate share ready");
            cells.push(share);
        }

        // Output reconstruction: every party reveals its root share under
        // the slot one past the schedule end, which no real gate can use.
        let output_round = schedule.len();
        let my_share = *cells.last().expect("schedule is never empty");
        for p in 0..num_parties {
            let msg = Message {
                src: self.id,
                gate: output_round,
                share: my_share,
            };
            if p == self.id {
                self.store(msg);
            } else {
                self.transport.send_to(p, msg)?;
            }
        }

        let mut output = 0;
        for p in 0..num_parties {
            let share = self.wait_for(p, output_round).await?;
            output = self.field.add(output, self.field.mul(recomb[p], share));
        }
        debug!(party = self.id, output, "protocol complete");
        Ok(output)
    }
}
