use crate::component::{Behavior, TickContext, BOX_HEIGHT, BOX_WIDTH};
use crate::components::input;
use crate::node::{Node, NodeArena, NodeId, NodeKind};
use crate::types::Position;

/// Relay: a low-voltage coil switching two high-voltage contacts.
///
/// Nodes are `[input, output1, output2]`; both outputs follow the coil.
#[derive(Debug, Clone)]
pub struct Relay {
    coil: NodeId,
    energized: bool,
}

impl Relay {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let coil = input(nodes, origin, "input", 25.0, 0.5 * BOX_HEIGHT);
        let mut ids = vec![coil];
        for (name, dy) in [("output1", 25.0), ("output2", BOX_HEIGHT - 25.0)] {
            let contact = Node::output(
                name,
                origin.offset(BOX_WIDTH - 25.0, dy),
                NodeKind::Relay { coil },
            );
            ids.push(nodes.insert(contact.high_voltage()));
        }
        (
            Relay {
                coil,
                energized: false,
            },
            ids,
        )
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }
}

impl Behavior for Relay {
    fn output(&mut self, ctx: &mut TickContext<'_>) {
        self.energized = ctx.is_high(self.coil);
    }
}

/// Coil behind the contact `node` is wired to, if `node` is an input fed by
/// a relay contact.
pub(crate) fn relay_coil(nodes: &NodeArena, node: NodeId) -> Option<NodeId> {
    let contact = nodes.child(node)?;
    match nodes.get(contact)?.kind() {
        NodeKind::Relay { coil } => Some(*coil),
        _ => None,
    }
}
