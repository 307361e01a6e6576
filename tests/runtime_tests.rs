//! Tests for the real-time runtime
//!
//! Most tests run on tokio's paused clock, so timers fire in virtual time
//! and the pulse and feed tasks interleave with board ticks deterministically.

use std::time::Duration;

use systemboard::error::SourceError;
use systemboard::runtime::lock;
use systemboard::source::UnavailableFeed;
use systemboard::types::Position;
use systemboard::{
    Board, ElementId, ElementKind, ElementType, FnFeed, NodeId, Params, SimConfig, Simulator,
};

fn config() -> SimConfig {
    SimConfig {
        tick_period_ms: 50,
        seed: Some(3),
        ..SimConfig::default()
    }
}

fn place(board: &mut Board, element_type: ElementType, params: &[(&str, &str)]) -> ElementId {
    let params: Params = params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let x = 200.0 * board.elements().len() as f64;
    board
        .add_element(element_type, Position::new(x, 0.0), &params)
        .unwrap()
}

fn node(board: &Board, element: ElementId, name: &str) -> NodeId {
    let owner = board.element(element).unwrap().name().to_string();
    board.find_node(&owner, name).unwrap()
}

fn wire(board: &mut Board, from: (ElementId, &str), to: (ElementId, &str)) {
    let output = node(board, from.0, from.1);
    let input = node(board, to.0, to.1);
    board.connect(output, input).unwrap();
}

fn counter_value(board: &Board, counter: ElementId) -> u8 {
    match board.element(counter).unwrap().kind() {
        ElementKind::Counter(counter) => counter.value().value(),
        _ => panic!("not a counter"),
    }
}

#[cfg(test)]
mod pulse_timing {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_one_hertz_pulse_counts_seconds() {
        let mut board = Board::new(&config());
        let pulse = place(&mut board, ElementType::Pulse, &[("inputValue", "1")]);
        let counter = place(&mut board, ElementType::Counter, &[]);
        wire(&mut board, (pulse, "output"), (counter, "count"));

        let mut simulator = Simulator::new(board, &config());
        // 100 ticks of 50 ms: five seconds of virtual time
        let ticks = simulator.run(Some(100)).await;
        assert_eq!(ticks, 100);

        let board = simulator.board();
        let board = lock(&board);
        let value = counter_value(&board, counter);
        assert!((4..=5).contains(&value), "counted {}", value);
    }

    #[tokio::test(start_paused = true)]
    async fn test_faster_pulse_counts_more() {
        let mut board = Board::new(&config());
        let pulse = place(&mut board, ElementType::Pulse, &[("inputValue", "4")]);
        let counter = place(&mut board, ElementType::Counter, &[]);
        wire(&mut board, (pulse, "output"), (counter, "count"));

        let mut simulator = Simulator::new(board, &config());
        simulator.run(Some(40)).await;

        let board = simulator.board();
        let value = counter_value(&lock(&board), counter);
        // 2 s at 4 Hz
        assert!((7..=8).contains(&value), "counted {}", value);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_holds_the_tick_count() {
        let mut simulator = Simulator::new(Board::new(&config()), &config());
        let control = simulator.control();
        control.set_paused(true);

        let resume = control.clone();
        let waker = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            assert!(!resume.toggle_pause());
        });

        let started = tokio::time::Instant::now();
        let ticks = simulator.run(Some(3)).await;
        waker.await.unwrap();

        assert_eq!(ticks, 3);
        assert!(started.elapsed() >= Duration::from_secs(1));
        assert_eq!(lock(&simulator.board()).current_tick(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_control_runs_nothing() {
        let mut simulator = Simulator::new(Board::new(&config()), &config());
        simulator.stop();
        assert_eq!(simulator.run(Some(10)).await, 0);
        assert_eq!(simulator.run(None).await, 0);
        assert!(!simulator.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_its_control() {
        let mut simulator = Simulator::new(Board::new(&config()), &config());
        let control = simulator.control();
        assert!(control.is_running());
        simulator.run(Some(2)).await;
        assert!(!control.is_running());
    }
}

#[cfg(test)]
mod sensor_feeds {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_sound_feed_trips_comparator() {
        let mut board = Board::new(&config());
        let microphone = place(&mut board, ElementType::SoundSensor, &[]);
        let comparator = place(&mut board, ElementType::Comparator, &[("inputValue", "3.0")]);
        let led = place(&mut board, ElementType::Led, &[]);
        wire(&mut board, (microphone, "output"), (comparator, "input"));
        wire(&mut board, (comparator, "output"), (led, "input"));
        let level = node(&board, microphone, "output");
        let trip = node(&board, comparator, "output");

        let mut simulator = Simulator::new(board, &config());
        let mut samples = vec![4.2, 1.0].into_iter().cycle();
        simulator
            .attach_feed(
                microphone,
                Box::new(FnFeed::new(move || Ok(samples.next().unwrap_or(0.0)))),
                Duration::from_millis(200),
            )
            .unwrap();
        simulator.run(Some(3)).await;

        let board = simulator.board();
        let board = lock(&board);
        assert!((board.node_state(level).volts() - 4.2).abs() < 1e-9);
        assert!(board.node_state(trip).is_high());
        assert!(!board.element(microphone).unwrap().is_degraded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_out_of_range_sample_is_clamped() {
        let mut board = Board::new(&config());
        let camera = place(&mut board, ElementType::WebcamSensor, &[]);
        let level = node(&board, camera, "output");

        let mut simulator = Simulator::new(board, &config());
        simulator
            .attach_feed(camera, Box::new(FnFeed::new(|| Ok(9.0))), Duration::from_millis(10))
            .unwrap();
        simulator.run(Some(3)).await;

        assert_eq!(lock(&simulator.board()).node_state(level).volts(), 5.0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unavailable_feed_degrades_element() {
        let mut board = Board::new(&config());
        let microphone = place(&mut board, ElementType::SoundSensor, &[]);
        let level = node(&board, microphone, "output");

        let mut simulator = Simulator::new(board, &config());
        simulator
            .attach_feed(
                microphone,
                Box::new(UnavailableFeed::new(SourceError::PermissionDenied)),
                Duration::from_millis(10),
            )
            .unwrap();
        simulator.run(Some(4)).await;

        let board = simulator.board();
        let board = lock(&board);
        assert!(board.element(microphone).unwrap().is_degraded());
        assert!(board.node_state(level).is_low());
        drop(board);
        // The failed feed gave up; nothing is left polling
        assert_eq!(simulator.task_count(), 0);
    }

    #[test]
    fn test_feed_rejected_for_plain_element() {
        let mut board = Board::new(&config());
        let led = place(&mut board, ElementType::Led, &[]);
        let mut simulator = Simulator::new(board, &config());
        let feed = Box::new(FnFeed::new(|| Ok(1.0)));
        assert!(simulator
            .attach_feed(led, feed, Duration::from_millis(10))
            .is_err());
    }
}

#[cfg(test)]
mod task_lifecycle {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_removing_pulse_cancels_its_timer() {
        let mut board = Board::new(&config());
        let pulse = place(&mut board, ElementType::Pulse, &[]);
        let led = place(&mut board, ElementType::Led, &[]);
        wire(&mut board, (pulse, "output"), (led, "input"));

        let mut simulator = Simulator::new(board, &config());
        simulator.run(Some(2)).await;
        assert_eq!(simulator.task_count(), 1);

        let removed = simulator.remove_element(pulse).unwrap();
        assert_eq!(removed.element_type(), ElementType::Pulse);
        assert_eq!(simulator.task_count(), 0);

        let board = simulator.board();
        let board = lock(&board);
        assert!(board.element(pulse).is_none());
        let input = node(&board, led, "input");
        assert!(board.nodes().child(input).is_none());
    }

    #[test]
    fn test_short_real_time_run() {
        let config = SimConfig {
            tick_period_ms: 1,
            ..SimConfig::default()
        };
        let mut board = Board::new(&config);
        let not = place(&mut board, ElementType::Not, &[]);
        let mut simulator = Simulator::new(board, &config);

        let ticks = tokio_test::block_on(simulator.run(Some(3)));
        assert_eq!(ticks, 3);

        let board = simulator.board();
        let board = lock(&board);
        let out = node(&board, not, "output");
        assert!(board.node_state(out).is_high());
    }
}
