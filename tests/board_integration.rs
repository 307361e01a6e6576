//! Integration tests for whole circuits on a board
//!
//! These tests wire elements together through the public board API and
//! check what the board shows after one or more ticks.

use systemboard::types::Position;
use systemboard::{Board, ElementId, ElementKind, ElementType, NodeId, Params, SimConfig, Signal};

fn board() -> Board {
    Board::new(&SimConfig {
        seed: Some(7),
        ..SimConfig::default()
    })
}

fn place(board: &mut Board, element_type: ElementType, x: f64, y: f64) -> ElementId {
    board
        .add_element(element_type, Position::new(x, y), &Params::new())
        .unwrap()
}

fn node(board: &Board, element: ElementId, name: &str) -> NodeId {
    let owner = board.element(element).unwrap().name().to_string();
    board
        .find_node(&owner, name)
        .unwrap_or_else(|| panic!("{} has no node {}", owner, name))
}

fn wire(board: &mut Board, from: (ElementId, &str), to: (ElementId, &str)) {
    let output = node(board, from.0, from.1);
    let input = node(board, to.0, to.1);
    board.connect(output, input).unwrap();
}

#[cfg(test)]
mod logic_circuits {
    use super::*;

    #[test]
    fn test_two_switches_and_gate_led() {
        let mut board = board();
        let a = place(&mut board, ElementType::ToggleSwitch, 0.0, 0.0);
        let b = place(&mut board, ElementType::ToggleSwitch, 0.0, 100.0);
        let and = place(&mut board, ElementType::And, 200.0, 0.0);
        let led = place(&mut board, ElementType::Led, 400.0, 0.0);
        wire(&mut board, (a, "output"), (and, "input1"));
        wire(&mut board, (b, "output"), (and, "input2"));
        wire(&mut board, (and, "output"), (led, "input"));
        let led_input = node(&board, led, "input");

        board.tick();
        assert_eq!(board.eval(led_input), Signal::LOW);

        board.toggle(a).unwrap();
        board.tick();
        assert_eq!(board.eval(led_input), Signal::LOW);

        board.toggle(b).unwrap();
        board.tick();
        assert_eq!(board.eval(led_input), Signal::HIGH);

        board.toggle(a).unwrap();
        board.tick();
        assert_eq!(board.eval(led_input), Signal::LOW);
    }

    #[test]
    fn test_fan_out_drives_every_input() {
        let mut board = board();
        let switch = place(&mut board, ElementType::ToggleSwitch, 0.0, 0.0);
        let leds: Vec<ElementId> = (0..3)
            .map(|i| place(&mut board, ElementType::Led, 300.0, 60.0 * i as f64))
            .collect();
        for led in &leds {
            wire(&mut board, (switch, "output"), (*led, "input"));
        }
        assert_eq!(board.wires().links().len(), 3);

        board.toggle(switch).unwrap();
        board.tick();
        for led in &leds {
            let input = node(&board, *led, "input");
            assert!(board.eval(input).is_high());
        }
    }

    #[test]
    fn test_self_fed_inverter_oscillates() {
        let mut board = board();
        let not = place(&mut board, ElementType::Not, 0.0, 0.0);
        wire(&mut board, (not, "output"), (not, "input"));
        let out = node(&board, not, "output");

        let levels: Vec<bool> = (0..6)
            .map(|_| {
                board.tick();
                board.node_state(out).is_high()
            })
            .collect();
        assert_eq!(levels, vec![true, false, true, false, true, false]);
    }

    #[test]
    fn test_cross_coupled_nor_latch_holds() {
        let mut board = board();
        let set = place(&mut board, ElementType::Switch, 0.0, 0.0);
        let reset = place(&mut board, ElementType::Switch, 0.0, 200.0);
        let upper = place(&mut board, ElementType::Nor, 200.0, 0.0);
        let lower = place(&mut board, ElementType::Nor, 200.0, 200.0);
        wire(&mut board, (reset, "output"), (upper, "input1"));
        wire(&mut board, (lower, "output"), (upper, "input2"));
        wire(&mut board, (set, "output"), (lower, "input1"));
        wire(&mut board, (upper, "output"), (lower, "input2"));
        let q = node(&board, upper, "output");

        board.click(set).unwrap();
        for _ in 0..4 {
            board.tick();
        }
        assert!(board.node_state(q).is_high());

        board.click(reset).unwrap();
        for _ in 0..4 {
            board.tick();
        }
        assert!(board.node_state(q).is_low());
    }
}

#[cfg(test)]
mod stateful_elements {
    use super::*;

    #[test]
    fn test_memory_cell_remembers_click() {
        let mut board = board();
        let set = place(&mut board, ElementType::Switch, 0.0, 0.0);
        let reset = place(&mut board, ElementType::Switch, 0.0, 100.0);
        let memory = place(&mut board, ElementType::Memory, 200.0, 0.0);
        wire(&mut board, (set, "output"), (memory, "set"));
        wire(&mut board, (reset, "output"), (memory, "reset"));
        let out = node(&board, memory, "output");

        board.click(set).unwrap();
        board.tick();
        assert!(board.node_state(out).is_high());
        for _ in 0..3 {
            board.tick();
        }
        assert!(board.node_state(out).is_high());

        board.click(reset).unwrap();
        board.tick();
        board.tick();
        assert!(board.node_state(out).is_low());
    }

    #[test]
    fn test_flip_flop_divides_by_two() {
        let mut board = board();
        let pulse = place(&mut board, ElementType::Pulse, 0.0, 0.0);
        let flip_flop = place(&mut board, ElementType::FlipFlop, 200.0, 0.0);
        wire(&mut board, (pulse, "output"), (flip_flop, "input"));
        let out = node(&board, flip_flop, "output");

        let mut highs = 0;
        let mut previous = false;
        for _ in 0..8 {
            board.toggle(pulse).unwrap();
            board.tick();
            let now = board.node_state(out).is_high();
            if now && !previous {
                highs += 1;
            }
            previous = now;
        }
        // 4 rising pulse edges, 2 rising output edges
        assert_eq!(highs, 2);
    }

    #[test]
    fn test_pulse_toggles_drive_counter() {
        let mut board = board();
        let pulse = place(&mut board, ElementType::Pulse, 0.0, 0.0);
        let counter = place(&mut board, ElementType::Counter, 200.0, 0.0);
        wire(&mut board, (pulse, "output"), (counter, "count"));

        for _ in 0..6 {
            board.toggle(pulse).unwrap();
            board.tick();
        }
        let value = match board.element(counter).unwrap().kind() {
            ElementKind::Counter(counter) => counter.value().value(),
            _ => unreachable!(),
        };
        assert_eq!(value, 3);

        let bits: Vec<bool> = ["output8", "output4", "output2", "output1"]
            .iter()
            .map(|name| {
                let id = node(&board, counter, name);
                board.eval(id).is_high()
            })
            .collect();
        assert_eq!(bits, vec![false, false, true, true]);
    }

    #[test]
    fn test_counter_reset_button_click() {
        let mut board = board();
        let pulse = place(&mut board, ElementType::Pulse, 0.0, 0.0);
        let counter = place(&mut board, ElementType::Counter, 200.0, 0.0);
        wire(&mut board, (pulse, "output"), (counter, "count"));
        for _ in 0..4 {
            board.toggle(pulse).unwrap();
            board.tick();
        }

        board.click(counter).unwrap();
        board.tick();
        let output2 = node(&board, counter, "output2");
        assert!(board.eval(output2).is_low());

        // Button let go after one tick; counting resumes
        board.toggle(pulse).unwrap();
        board.tick();
        let output1 = node(&board, counter, "output1");
        assert!(board.eval(output1).is_high());
    }
}

#[cfg(test)]
mod analog_chain {
    use super::*;

    #[test]
    fn test_adc_feeds_dac() {
        let mut board = board();
        let supply = place(&mut board, ElementType::VarVoltage, 0.0, 0.0);
        let adc = place(&mut board, ElementType::Adc, 200.0, 0.0);
        let dac = place(&mut board, ElementType::Dac, 400.0, 0.0);
        wire(&mut board, (supply, "output"), (adc, "input"));
        for (bit, input) in [("output1", "input1"), ("output2", "input2"), ("output4", "input4"), ("output8", "input8")] {
            wire(&mut board, (adc, bit), (dac, input));
        }
        board.set_parameter(supply, "inputValue", "3.2").unwrap();
        board.tick();

        // floor(3.2 * 16 / 5) = 10
        let analog = node(&board, dac, "output");
        assert!((board.eval(analog).volts() - 10.0 * 5.0 / 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_comparator_threshold_from_parameter() {
        let mut board = board();
        let supply = place(&mut board, ElementType::VarVoltage, 0.0, 0.0);
        let comparator = place(&mut board, ElementType::Comparator, 200.0, 0.0);
        wire(&mut board, (supply, "output"), (comparator, "input"));
        let out = node(&board, comparator, "output");

        board.set_parameter(supply, "inputValue", "2.0").unwrap();
        board.tick();
        assert!(board.node_state(out).is_low());

        board.set_parameter(comparator, "inputValue", "1.5").unwrap();
        board.tick();
        assert!(board.node_state(out).is_high());
    }

    #[test]
    fn test_out_of_range_parameter_is_clamped() {
        let mut board = board();
        let supply = place(&mut board, ElementType::VarVoltage, 0.0, 0.0);
        board.set_parameter(supply, "inputValue", "12").unwrap();
        board.tick();
        let out = node(&board, supply, "output");
        assert_eq!(board.node_state(out).volts(), 5.0);
        assert!(board.set_parameter(supply, "inputValue", "lots").is_err());
        assert!(board.set_parameter(supply, "colour", "red").is_err());
    }
}

#[cfg(test)]
mod mains_side {
    use super::*;

    fn lamp_circuit(board: &mut Board) -> (ElementId, ElementId) {
        let switch = place(board, ElementType::ToggleSwitch, -300.0, 0.0);
        let relay = place(board, ElementType::Relay, -150.0, 0.0);
        let bulb = place(board, ElementType::Lightbulb, 0.0, 0.0);
        wire(board, (switch, "output"), (relay, "input"));
        wire(board, (relay, "output1"), (bulb, "input1"));
        wire(board, (relay, "output2"), (bulb, "input2"));
        (switch, bulb)
    }

    fn bulb_lit(board: &Board, bulb: ElementId) -> bool {
        board.element(bulb).unwrap().kind().light() == Some(true)
    }

    #[test]
    fn test_relay_switches_lightbulb() {
        let mut board = board();
        let (switch, bulb) = lamp_circuit(&mut board);

        board.tick();
        assert!(!bulb_lit(&board, bulb));

        board.toggle(switch).unwrap();
        board.tick();
        assert!(bulb_lit(&board, bulb));
    }

    #[test]
    fn test_lightbulb_reaches_light_sensor_chain() {
        let mut board = board();
        let (switch, _) = lamp_circuit(&mut board);
        // LDR lands on the bulb's centre
        let sensor = place(&mut board, ElementType::LightSensor, 50.0, 25.0);
        let comparator = place(&mut board, ElementType::Comparator, 300.0, 200.0);
        let led = place(&mut board, ElementType::Led, 500.0, 200.0);
        wire(&mut board, (sensor, "output"), (comparator, "input"));
        wire(&mut board, (comparator, "output"), (led, "input"));
        let led_input = node(&board, led, "input");

        board.tick();
        assert!(board.eval(led_input).is_low());

        board.toggle(switch).unwrap();
        board.tick();
        let sensor_out = node(&board, sensor, "output");
        assert_eq!(board.node_state(sensor_out).volts(), 5.0);
        assert!(board.eval(led_input).is_high());
    }

    #[test]
    fn test_mains_refuses_logic_wiring() {
        let mut board = board();
        let switch = place(&mut board, ElementType::ToggleSwitch, 0.0, 0.0);
        let bulb = place(&mut board, ElementType::Lightbulb, 200.0, 0.0);
        let output = node(&board, switch, "output");
        let input = node(&board, bulb, "input1");
        assert!(board.connect(output, input).is_err());
        assert!(board.wires().links().is_empty());
    }

    #[test]
    fn test_heater_warms_temperature_sensor() {
        let mut board = Board::new(&SimConfig {
            tick_period_ms: 1000,
            ..SimConfig::default()
        });
        let switch = place(&mut board, ElementType::ToggleSwitch, -300.0, 0.0);
        let relay = place(&mut board, ElementType::Relay, -150.0, 0.0);
        let heater = place(&mut board, ElementType::Heater, 0.0, 0.0);
        let sensor = place(&mut board, ElementType::TemperatureSensor, 0.0, 200.0);
        wire(&mut board, (switch, "output"), (relay, "input"));
        wire(&mut board, (relay, "output1"), (heater, "input1"));
        wire(&mut board, (relay, "output2"), (heater, "input2"));
        let out = node(&board, sensor, "output");

        board.tick();
        let cold = board.node_state(out).volts();
        board.toggle(switch).unwrap();
        for _ in 0..120 {
            board.tick();
        }
        let warm = board.node_state(out).volts();
        assert!(warm > cold, "{} should exceed {}", warm, cold);
        assert!(board.sim().thermal.inside() > 15.0);
    }
}

#[cfg(test)]
mod editing {
    use super::*;

    #[test]
    fn test_removing_middle_element_cuts_signal() {
        let mut board = board();
        let switch = place(&mut board, ElementType::ToggleSwitch, 0.0, 0.0);
        let not = place(&mut board, ElementType::Not, 200.0, 0.0);
        let led = place(&mut board, ElementType::Led, 400.0, 0.0);
        wire(&mut board, (switch, "output"), (not, "input"));
        wire(&mut board, (not, "output"), (led, "input"));
        let led_input = node(&board, led, "input");

        board.tick();
        assert!(board.eval(led_input).is_high());

        board.remove_element(not).unwrap();
        board.tick();
        assert!(board.eval(led_input).is_low());
        assert!(board.nodes().child(led_input).is_none());
        assert!(board.wires().links().is_empty());
    }

    #[test]
    fn test_name_gap_is_reused() {
        let mut board = board();
        let first = place(&mut board, ElementType::Led, 0.0, 0.0);
        place(&mut board, ElementType::Led, 0.0, 100.0);
        board.remove_element(first).unwrap();
        let again = place(&mut board, ElementType::Led, 0.0, 200.0);
        assert_eq!(board.element(again).unwrap().name(), "LED0");
    }
}
