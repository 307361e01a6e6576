use crate::component::{Behavior, BOX_HEIGHT_SMALL, BOX_WIDTH};
use crate::components::output;
use crate::node::{NodeArena, NodeId, NodeKind};
use crate::signal::Signal;
use crate::types::Position;

/// Momentary push button: High while pressed.
#[derive(Debug, Clone)]
pub struct PushButton {
    output: NodeId,
}

impl PushButton {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let out = output(nodes, origin, "output", BOX_WIDTH - 25.0, 0.5 * BOX_HEIGHT_SMALL, NodeKind::Source);
        (PushButton { output: out }, vec![out])
    }

    pub fn press(&self, nodes: &mut NodeArena) {
        nodes.set_state(self.output, Signal::HIGH);
    }

    pub fn release(&self, nodes: &mut NodeArena) {
        nodes.set_state(self.output, Signal::LOW);
    }
}

impl Behavior for PushButton {}

/// Latching switch: every press flips the output.
#[derive(Debug, Clone)]
pub struct ToggleButton {
    output: NodeId,
}

impl ToggleButton {
    pub fn build(nodes: &mut NodeArena, origin: Position) -> (Self, Vec<NodeId>) {
        let out = output(nodes, origin, "output", BOX_WIDTH - 25.0, 0.5 * BOX_HEIGHT_SMALL, NodeKind::Source);
        (ToggleButton { output: out }, vec![out])
    }

    pub fn press(&self, nodes: &mut NodeArena) {
        let next = nodes.state(self.output).invert();
        nodes.set_state(self.output, next);
    }
}

impl Behavior for ToggleButton {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_toggle() {
        let mut nodes = NodeArena::new();
        let (push, push_ids) = PushButton::build(&mut nodes, Position::default());
        let (toggle, toggle_ids) = ToggleButton::build(&mut nodes, Position::default());

        push.press(&mut nodes);
        toggle.press(&mut nodes);
        assert_eq!(nodes.state(push_ids[0]), Signal::HIGH);
        assert_eq!(nodes.state(toggle_ids[0]), Signal::HIGH);

        push.release(&mut nodes);
        toggle.press(&mut nodes);
        assert_eq!(nodes.state(push_ids[0]), Signal::LOW);
        assert_eq!(nodes.state(toggle_ids[0]), Signal::LOW);
    }
}
