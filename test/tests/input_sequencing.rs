/// Local input: message index namespacing, delayed application and the
/// outbound queue discipline.
use std::time::Instant;

use proptest::prelude::*;

use stepsync_client::{
    transport::Transport, ClientConfig, InputError, InputOptions, MessageSequencer,
    PlayerJoinedEvent,
};
use stepsync_shared::{ClientMessage, PlayerId, MESSAGE_INDEX_NAMESPACE};
use stepsync_test::{
    connected_client, standalone_client, test_config, tick, LocalTransport, TestSimulation,
};

fn init_logging() {
    env_logger::builder().is_test(true).try_init().ok();
}

fn moves(messages: Vec<ClientMessage>) -> Vec<(u64, u64, String)> {
    messages
        .into_iter()
        .filter_map(|message| match message {
            ClientMessage::Move(input) => Some((input.message_index, input.step, input.input)),
            _ => None,
        })
        .collect()
}

#[test]
fn delayed_input_applies_exactly_delay_steps_later() {
    init_logging();
    let config = ClientConfig {
        delay_input_count: 3,
        ..test_config()
    };
    let mut client = standalone_client(config, TestSimulation::at_step(10));
    client.start(Instant::now()).unwrap();

    client.send_input("up", InputOptions::new()).unwrap();
    assert!(client.simulation().applied_inputs.is_empty());

    tick(&mut client);
    tick(&mut client);
    assert!(client.simulation().applied_inputs.is_empty());

    tick(&mut client);
    let applied = &client.simulation().applied_inputs;
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].submitted_step, 10);
    assert_eq!(applied[0].applied_step, 13);

    tick(&mut client);
    assert_eq!(client.simulation().applied_inputs.len(), 1);
}

#[test]
fn delayed_cohorts_keep_submission_order() {
    init_logging();
    let config = ClientConfig {
        delay_input_count: 2,
        ..test_config()
    };
    let mut client = standalone_client(config, TestSimulation::new());
    client.start(Instant::now()).unwrap();

    client.send_input("a", InputOptions::new()).unwrap();
    client.send_input("b", InputOptions::new()).unwrap();
    tick(&mut client);
    client.send_input("c", InputOptions::new()).unwrap();
    tick(&mut client);
    tick(&mut client);

    let applied: Vec<_> = client
        .simulation()
        .applied_inputs
        .iter()
        .map(|input| (input.input.as_str(), input.applied_step))
        .collect();
    assert_eq!(applied, vec![("a", 2), ("b", 2), ("c", 3)]);
}

#[test]
fn undelayed_input_applies_immediately() {
    init_logging();
    let mut client = standalone_client(test_config(), TestSimulation::at_step(4));
    client.start(Instant::now()).unwrap();

    client.send_input("fire", InputOptions::new()).unwrap();
    let applied = &client.simulation().applied_inputs;
    assert_eq!(applied.len(), 1);
    assert_eq!(applied[0].applied_step, 5);
    assert_eq!(applied[0].player_id, PlayerId(0));
}

#[test]
fn input_before_identity_is_rejected() {
    init_logging();
    let (mut client, _server) = connected_client(test_config(), TestSimulation::new());
    client.start(Instant::now()).unwrap();

    assert_eq!(
        client.send_input("up", InputOptions::new()),
        Err(InputError::IdentityPending)
    );
    assert_eq!(client.outbound_len(), 0);
}

#[test]
fn inputs_are_sent_after_the_step_in_order() {
    init_logging();
    let (mut client, server) = connected_client(test_config(), TestSimulation::new());
    client.start(Instant::now()).unwrap();

    server.assign_identity(PlayerId(7));
    tick(&mut client);
    assert_eq!(client.player_id(), Some(PlayerId(7)));
    assert_eq!(
        client.take_events().read::<PlayerJoinedEvent>().collect::<Vec<_>>(),
        vec![PlayerId(7)]
    );
    server.take_received();

    let mut options = InputOptions::new();
    options.insert("movement".to_string(), "true".to_string());
    assert_eq!(client.send_input("left", options), Ok(70_000));
    assert_eq!(client.send_input("right", InputOptions::new()), Ok(70_001));
    assert_eq!(client.outbound_len(), 2);
    assert!(server.take_received().is_empty());

    tick(&mut client);
    assert_eq!(client.outbound_len(), 0);
    assert_eq!(
        moves(server.take_received()),
        vec![
            (70_000, 1, "left".to_string()),
            (70_001, 1, "right".to_string())
        ]
    );
}

#[test]
fn later_identity_does_not_change_namespace() {
    init_logging();
    let (mut client, server) = connected_client(test_config(), TestSimulation::new());
    client.start(Instant::now()).unwrap();

    server.assign_identity(PlayerId(3));
    server.assign_identity(PlayerId(4));
    tick(&mut client);

    assert_eq!(client.player_id(), Some(PlayerId(3)));
    assert_eq!(client.send_input("x", InputOptions::new()), Ok(30_000));
}

#[test]
fn standalone_sends_nothing() {
    init_logging();
    let mut client = standalone_client(test_config(), TestSimulation::new());
    client.start(Instant::now()).unwrap();
    assert!(!client.is_connected());

    client.send_input("up", InputOptions::new()).unwrap();
    assert_eq!(client.outbound_len(), 0);
    tick(&mut client);
    assert_eq!(client.simulation().applied_inputs.len(), 1);
}

#[test]
fn stop_keeps_queue_and_restart_sends_it_once() {
    init_logging();
    let (mut client, server) = connected_client(test_config(), TestSimulation::new());
    let start = Instant::now();
    client.start(start).unwrap();
    server.assign_identity(PlayerId(1));
    tick(&mut client);
    server.take_received();

    client.send_input("jump", InputOptions::new()).unwrap();
    client.stop();
    assert_eq!(client.outbound_len(), 1);

    client.start(start + stepsync_test::PERIOD * 10).unwrap();
    tick(&mut client);
    tick(&mut client);
    assert_eq!(moves(server.take_received()).len(), 1);
}

#[test]
fn refused_sends_are_not_retried() {
    init_logging();
    let (mut client, server) = connected_client(test_config(), TestSimulation::new());
    client.start(Instant::now()).unwrap();
    server.assign_identity(PlayerId(2));
    tick(&mut client);

    client.send_input("up", InputOptions::new()).unwrap();
    server.refuse_sends(true);
    tick(&mut client);
    assert_eq!(client.outbound_len(), 0);

    server.refuse_sends(false);
    server.take_received();
    tick(&mut client);
    assert!(moves(server.take_received()).is_empty());
}

#[test]
fn flush_twice_sends_nothing_the_second_time() {
    init_logging();
    let (transport, server) = LocalTransport::pair();
    let (sender, _receiver) = Box::new(transport)
        .connect("local", &Default::default())
        .unwrap();

    let mut sequencer = MessageSequencer::new();
    sequencer.assign_identity(PlayerId(5));
    for step in 0..3 {
        let input = sequencer
            .stamp_input(step, "tap".to_string(), InputOptions::new())
            .unwrap();
        sequencer.enqueue(input.to_message());
    }

    assert_eq!(sequencer.flush(sender.as_ref()), 3);
    assert_eq!(server.take_received().len(), 3);
    assert_eq!(sequencer.flush(sender.as_ref()), 0);
    assert!(server.take_received().is_empty());
}

#[test]
fn namespace_exhaustion_is_reported() {
    let mut sequencer = MessageSequencer::new();
    sequencer.assign_identity(PlayerId(2));
    for _ in 0..MESSAGE_INDEX_NAMESPACE {
        sequencer
            .stamp_input(0, String::new(), InputOptions::new())
            .unwrap();
    }
    assert_eq!(
        sequencer.stamp_input(0, String::new(), InputOptions::new()),
        Err(InputError::NamespaceExhausted {
            player_id: PlayerId(2),
            issued: MESSAGE_INDEX_NAMESPACE,
        })
    );
}

proptest! {
    /// Indices stay inside the player's namespace and strictly increase
    #[test]
    fn prop_indices_namespaced_and_increasing(count in 1usize..500) {
        let mut sequencer = MessageSequencer::new();
        sequencer.assign_identity(PlayerId(7));

        let mut previous = None;
        for n in 0..count {
            let input = sequencer
                .stamp_input(n as u64, "move".to_string(), InputOptions::new())
                .unwrap();
            prop_assert!((70_000..80_000).contains(&input.message_index));
            if let Some(previous) = previous {
                prop_assert!(input.message_index > previous);
            }
            previous = Some(input.message_index);
        }
    }

    /// Different players never share an index
    #[test]
    fn prop_players_do_not_collide(a in 0u32..1_000, b in 0u32..1_000, count in 1usize..50) {
        prop_assume!(a != b);
        let mut first = MessageSequencer::new();
        let mut second = MessageSequencer::new();
        first.assign_identity(PlayerId(a));
        second.assign_identity(PlayerId(b));

        let mut seen = std::collections::HashSet::new();
        for _ in 0..count {
            for sequencer in [&mut first, &mut second] {
                let input = sequencer
                    .stamp_input(0, String::new(), InputOptions::new())
                    .unwrap();
                prop_assert!(seen.insert(input.message_index));
            }
        }
    }
}
