use crate::component::{param_f64, parse_f64, unknown_param, Behavior, Params, BOX_WIDTH};
use crate::error::CircuitError;

/// Free text placed on the board. Has no nodes; only its parameters are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    text: String,
    scale_x: f64,
    scale_y: f64,
    width: f64,
}

impl TextLabel {
    pub fn build(params: &Params) -> Result<(Self, Vec<crate::node::NodeId>), CircuitError> {
        let label = TextLabel {
            text: params.get("text").cloned().unwrap_or_else(|| "Text".to_string()),
            scale_x: param_f64(params, "scaleX", 1.0, 0.01, 100.0)?,
            scale_y: param_f64(params, "scaleY", 1.0, 0.01, 100.0)?,
            width: param_f64(params, "width", BOX_WIDTH, 1.0, 10_000.0)?,
        };
        Ok((label, Vec::new()))
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Behavior for TextLabel {
    fn params(&self) -> Params {
        let mut params = Params::new();
        params.insert("text".to_string(), self.text.clone());
        params.insert("scaleX".to_string(), self.scale_x.to_string());
        params.insert("scaleY".to_string(), self.scale_y.to_string());
        params.insert("width".to_string(), self.width.to_string());
        params
    }

    fn set_param(&mut self, key: &str, value: &str) -> Result<(), CircuitError> {
        match key {
            "text" => self.text = value.to_string(),
            "scaleX" => self.scale_x = parse_f64(key, value, 0.01, 100.0)?,
            "scaleY" => self.scale_y = parse_f64(key, value, 0.01, 100.0)?,
            "width" => self.width = parse_f64(key, value, 1.0, 10_000.0)?,
            _ => return Err(unknown_param(key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_survive_round_trip() {
        let mut params = Params::new();
        params.insert("text".into(), "Alarm circuit".into());
        params.insert("scaleX".into(), "1.5".into());
        let (label, nodes) = TextLabel::build(&params).unwrap();
        assert!(nodes.is_empty());
        assert_eq!(label.text(), "Alarm circuit");

        let (copy, _) = TextLabel::build(&label.params()).unwrap();
        assert_eq!(copy, label);
    }
}
