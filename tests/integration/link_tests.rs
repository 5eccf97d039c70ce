//! Link state machine driven end-to-end over the event channel, the way
//! the device runs it: producer on one thread, consumer on another.

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use input_selector::net::link::{ConnectivityManager, LinkSignal, NetEvent};

use crate::mock_hw::MockStation;

const WAIT: Option<Duration> = Some(Duration::from_secs(2));

fn spawn_consumer() -> (
    mpsc::Sender<NetEvent>,
    std::sync::Arc<LinkSignal>,
    MockStation,
) {
    let (tx, rx) = mpsc::channel();
    let signal = LinkSignal::new();
    let station = MockStation::new();

    let link = ConnectivityManager::new(station.clone(), std::sync::Arc::clone(&signal));
    thread::spawn(move || link.run(rx));

    (tx, signal, station)
}

fn settle() {
    // The consumer thread drains the channel quickly; give it a moment.
    thread::sleep(Duration::from_millis(50));
}

#[test]
fn station_start_then_address_raises_signal() {
    let (tx, signal, station) = spawn_consumer();

    tx.send(NetEvent::StationStart).unwrap();
    settle();
    assert_eq!(station.join_attempts(), 1);
    assert!(!signal.is_set());

    tx.send(NetEvent::GotAddress).unwrap();
    assert!(signal.wait(WAIT));
}

#[test]
fn disconnect_clears_and_rejoins_then_recovers() {
    // Scenario D: Disconnected while Connected → signal drops, a new join
    // goes out, and a later GotAddress raises the signal again.
    let (tx, signal, station) = spawn_consumer();

    tx.send(NetEvent::StationStart).unwrap();
    tx.send(NetEvent::GotAddress).unwrap();
    assert!(signal.wait(WAIT));

    tx.send(NetEvent::Disconnected).unwrap();
    settle();
    assert!(!signal.is_set());
    assert_eq!(station.join_attempts(), 2);

    tx.send(NetEvent::GotAddress).unwrap();
    assert!(signal.wait(WAIT));
}

#[test]
fn every_disconnect_triggers_another_join() {
    // No backoff and no attempt cap: N disconnects → N rejoins.
    let (tx, _signal, station) = spawn_consumer();

    tx.send(NetEvent::StationStart).unwrap();
    for _ in 0..5 {
        tx.send(NetEvent::Disconnected).unwrap();
    }
    settle();
    assert_eq!(station.join_attempts(), 6);
}

#[test]
fn unrelated_events_leave_the_signal_alone() {
    let (tx, signal, station) = spawn_consumer();

    tx.send(NetEvent::GotAddress).unwrap();
    assert!(signal.wait(WAIT));

    tx.send(NetEvent::Other).unwrap();
    settle();
    assert!(signal.is_set());
    assert_eq!(station.join_attempts(), 0);
}
