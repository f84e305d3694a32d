use std::fmt;

use tokio::sync::mpsc;
use tracing::trace;

/// A share in transit: party `src`'s contribution to schedule slot `gate`.
/// The slot one past the schedule end is reserved for the output round.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub src: usize,
    pub gate: usize,
    pub share: u64,
}

/// Error type for channels.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChannelError {
    Send { to: usize },
    Recv,
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Send { to } => write!(f, "error while sending message to party {}", to),
            Self::Recv => write!(f, "inbox closed while waiting for a message"),
        }
    }
}

/// One party's view of the message bus: a send handle per peer plus the
/// own inbox. Handles are wired once, before any party starts, and stay
/// immutable for the rest of the run.
///
/// Sends never block (the inbox queue is unbounded) and messages arrive in
/// FIFO order per (sender, receiver) pair. No ordering holds between
/// different senders.
pub struct MultipartyTransport {
    senders: Vec<Option<mpsc::UnboundedSender<Message>>>,
    inbox: mpsc::UnboundedReceiver<Message>,
    party_id: usize,
}

impl MultipartyTransport {
    /// Number of parties on the bus.
    pub fn num_parties(&self) -> usize {
        self.senders.len()
    }

    /// ID of current party.
    pub fn party_id(&self) -> usize {
        self.party_id
    }

    /// Send a message to the party with the given ID.
    pub fn send_to(&self, other_id: usize, msg: Message) -> Result<(), ChannelError> {
        if other_id == self.party_id {
            panic!("cannot send message on loopback");
        }
        trace!(
            from = self.party_id,
            to = other_id,
            gate = msg.gate,
            "sending share"
        );
        let sender = self.senders[other_id]
            .as_ref()
            .expect("channel present for peer");
        sender
            .send(msg)
            .map_err(|_| ChannelError::Send { to: other_id })
    }

    /// Receive the next message from the inbox.
    pub async fn receive(&mut self) -> Result<Message, ChannelError> {
        self.inbox.recv().await.ok_or(ChannelError::Recv)
    }
}

/// Create the in-process bus for `num_parties` parties, every send handle
/// already in place.
pub fn multiparty_channels(num_parties: usize) -> Vec<MultipartyTransport> {
    let (senders, inboxes): (Vec<_>, Vec<_>) =
        (0..num_parties).map(|_| mpsc::unbounded_channel()).unzip();

    inboxes
        .into_iter()
        .enumerate()
        .map(|(party_id, inbox)| MultipartyTransport {
            senders: senders
                .iter()
                .enumerate()
                .map(|(id, sender)| (id != party_id).then(|| sender.clone()))
                .collect(),
            inbox,
            party_id,
        })
        .collect()
}
