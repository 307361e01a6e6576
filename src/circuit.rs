//! # Circuit files
//!
//! A saved board is a list of elements. Each element records its kind, its
//! unique name, its position, its parameters and one link per connected
//! input:
//!
//! ```json
//! {
//!   "elements": [
//!     { "name": "Switch", "id": "Switch0", "x": 40, "y": 40 },
//!     {
//!       "name": "LED", "id": "LED0", "x": 300, "y": 40,
//!       "links": [ { "id": "input", "toElement": "Switch0", "toNode": "output" } ]
//!     }
//!   ]
//! }
//! ```
//!
//! Older files store links as indices: `id` is the input's position in the
//! element's node list, `toElement` the source element's position in the
//! file and `toNode` the source node's position in that element. Both forms
//! load; saving always writes names.
//!
//! Loading runs in two passes (create every element, then resolve links) so
//! links may point forward in the file.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::component::{ElementId, ElementType, Params};
use crate::config::SimConfig;
use crate::error::CircuitError;
use crate::node::NodeId;
use crate::types::Position;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CircuitFile {
    pub elements: Vec<ElementRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Kind tag, e.g. `ANDPort`.
    pub name: String,
    /// Unique name on the board, e.g. `ANDPort0`.
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Params::is_empty")]
    pub params: Params,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<LinkRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    /// Input node on the owning element.
    pub id: String,
    pub to_element: String,
    pub to_node: String,
}

impl LinkRecord {
    /// Index triple when the link uses the legacy numeric form.
    fn as_indices(&self) -> Option<(usize, usize, usize)> {
        Some((
            self.id.parse().ok()?,
            self.to_element.parse().ok()?,
            self.to_node.parse().ok()?,
        ))
    }
}

impl Board {
    /// Snapshot of the board in file form.
    pub fn to_circuit(&self) -> CircuitFile {
        let elements = self
            .elements()
            .iter()
            .map(|element| {
                let links = element
                    .nodes()
                    .iter()
                    .filter_map(|input| {
                        let source = self.nodes().child(*input)?;
                        let (owner, _) = self.owner_of(source)?;
                        Some(LinkRecord {
                            id: self.nodes().get(*input)?.name().to_string(),
                            to_element: owner.name().to_string(),
                            to_node: self.nodes().get(source)?.name().to_string(),
                        })
                    })
                    .collect();
                ElementRecord {
                    name: element.element_type().as_str().to_string(),
                    id: element.name().to_string(),
                    x: element.position().x,
                    y: element.position().y,
                    params: element.params(),
                    links,
                }
            })
            .collect();
        CircuitFile { elements }
    }

    /// Rebuilds a board from file form.
    pub fn from_circuit(circuit: &CircuitFile, config: &SimConfig) -> Result<Board, CircuitError> {
        let mut board = Board::new(config);

        // Pass 1: elements
        let mut created: Vec<ElementId> = Vec::with_capacity(circuit.elements.len());
        let mut by_name: HashMap<&str, ElementId> = HashMap::new();
        for record in &circuit.elements {
            let element_type: ElementType = record.name.parse()?;
            let id = board.add_named(
                element_type,
                Position::new(record.x, record.y),
                &record.params,
                Some(&record.id),
            )?;
            created.push(id);
            by_name.insert(record.id.as_str(), id);
        }

        // Pass 2: links
        for (record, owner) in circuit.elements.iter().zip(&created) {
            for link in &record.links {
                let (input, source) = match link.as_indices() {
                    Some((input, element, node)) => {
                        let source_element = created.get(element).copied().ok_or_else(|| {
                            CircuitError::MissingElement(link.to_element.clone())
                        })?;
                        (
                            board.node_at(*owner, input, &record.id)?,
                            board.node_at(source_element, node, &link.to_element)?,
                        )
                    }
                    None => {
                        let source_element = by_name
                            .get(link.to_element.as_str())
                            .copied()
                            .ok_or_else(|| CircuitError::MissingElement(link.to_element.clone()))?;
                        (
                            board.node_named(*owner, &link.id, &record.id)?,
                            board.node_named(source_element, &link.to_node, &link.to_element)?,
                        )
                    }
                };
                board
                    .connect(source, input)
                    .map_err(|source| CircuitError::Link {
                        from: format!("{}.{}", link.to_element, link.to_node),
                        to: format!("{}.{}", record.id, link.id),
                        source,
                    })?;
            }
        }

        debug!(
            "Loaded circuit: {} elements, {} links",
            board.elements().len(),
            board.wires().links().len()
        );
        Ok(board)
    }

    fn node_at(&self, element: ElementId, index: usize, label: &str) -> Result<NodeId, CircuitError> {
        self.element(element)
            .and_then(|element| element.nodes().get(index).copied())
            .ok_or_else(|| CircuitError::MissingNode {
                element: label.to_string(),
                node: index.to_string(),
            })
    }

    fn node_named(&self, element: ElementId, name: &str, label: &str) -> Result<NodeId, CircuitError> {
        self.element(element)
            .and_then(|element| {
                element
                    .nodes()
                    .iter()
                    .copied()
                    .find(|id| self.nodes().get(*id).map(|node| node.name()) == Some(name))
            })
            .ok_or_else(|| CircuitError::MissingNode {
                element: label.to_string(),
                node: name.to_string(),
            })
    }

    pub fn from_json(json: &str, config: &SimConfig) -> Result<Board, CircuitError> {
        let circuit: CircuitFile = serde_json::from_str(json)?;
        Board::from_circuit(&circuit, config)
    }

    pub fn to_json(&self) -> Result<String, CircuitError> {
        Ok(serde_json::to_string_pretty(&self.to_circuit())?)
    }

    pub fn load_json(path: impl AsRef<Path>, config: &SimConfig) -> Result<Board, CircuitError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| CircuitError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let board = Board::from_json(&json, config)?;
        info!("Loaded circuit from {}", path.display());
        Ok(board)
    }

    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), CircuitError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|source| CircuitError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!("Saved circuit to {}", path.display());
        Ok(())
    }
}
