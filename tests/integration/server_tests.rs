//! End-to-end control-server scenarios over a real loopback socket.
//!
//! The server thread runs the production accept loop; each test plays a
//! browser: connect, write one request, read until the server closes.

use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread;
use std::time::Duration;

use input_selector::app::relay::RelayController;
use input_selector::app::store::SelectionStore;
use input_selector::http::assets::{Asset, INDEX_HTML};
use input_selector::http::server::{ControlServer, SelectorContext, BODY_TERMINATOR, STATUS_HEADER};
use input_selector::pins::RELAY_COUNT;

use crate::mock_hw::{MockRelays, MockStore};

fn start_server() -> (SocketAddr, MockRelays, MockStore) {
    let outputs = MockRelays::new();
    let backend = MockStore::new();

    let server = ControlServer::bind("127.0.0.1:0", Some(Duration::from_secs(2)))
        .expect("loopback bind");
    let addr = server.local_addr().expect("local addr");

    let mut ctx = SelectorContext {
        relays: RelayController::new(outputs.clone()),
        store: SelectionStore::new(backend.clone()),
        asset: Asset::index(),
    };
    thread::spawn(move || server.serve_forever(&mut ctx));

    (addr, outputs, backend)
}

fn exchange(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).expect("connect");
    stream
        .set_read_timeout(Some(Duration::from_secs(5)))
        .unwrap();
    stream.write_all(request).expect("send request");
    let mut response = Vec::new();
    stream.read_to_end(&mut response).expect("read response");
    response
}

#[test]
fn select_command_switches_relay_and_persists() {
    // Scenario B: byte for input 3 → relay index 2 high, slot = 3, and the
    // response is exactly header + terminator before the socket closes.
    let (addr, outputs, backend) = start_server();

    let response = exchange(addr, b"GET /3 HTTP/1.0\r\n\r\n");

    let mut expected = [false; RELAY_COUNT];
    expected[2] = true;
    assert_eq!(outputs.levels(), expected);
    assert_eq!(backend.stored(), Some(3));

    let mut want = STATUS_HEADER.to_vec();
    want.push(BODY_TERMINATOR);
    assert_eq!(response, want);
}

#[test]
fn switching_inputs_passes_through_all_off() {
    let (addr, outputs, _backend) = start_server();

    exchange(addr, b"GET /1 HTTP/1.0\r\n\r\n");
    exchange(addr, b"GET /4 HTTP/1.0\r\n\r\n");

    // At most one relay is ever high, and the drive history between the
    // two activations contains a low write for every output.
    assert_eq!(outputs.active_count(), 1);
    let history = outputs.history();
    let first_on = history.iter().position(|&(_, high)| high).unwrap();
    let second_on = history.iter().rposition(|&(_, high)| high).unwrap();
    let lows_between: Vec<usize> = history[first_on + 1..second_on]
        .iter()
        .filter(|&&(_, high)| !high)
        .map(|&(index, _)| index)
        .collect();
    for index in 0..RELAY_COUNT {
        assert!(lows_between.contains(&index), "output {} not dropped", index);
    }
}

#[test]
fn root_serves_the_bundled_page() {
    let (addr, _outputs, _backend) = start_server();

    let response = exchange(addr, b"GET / HTTP/1.0\r\n\r\n");

    let mut want = STATUS_HEADER.to_vec();
    want.extend_from_slice(INDEX_HTML);
    assert_eq!(response, want);
}

#[test]
fn status_route_answers_with_placeholder() {
    let (addr, _outputs, _backend) = start_server();

    let response = exchange(addr, b"GET /? HTTP/1.0\r\n\r\n");

    let mut want = STATUS_HEADER.to_vec();
    want.push(b'?');
    want.push(BODY_TERMINATOR);
    assert_eq!(response, want);
}

#[test]
fn unknown_route_gets_header_only() {
    let (addr, outputs, backend) = start_server();

    let response = exchange(addr, b"GET /robots.txt HTTP/1.0\r\n\r\n");

    assert_eq!(response, STATUS_HEADER);
    assert_eq!(outputs.levels(), [false; RELAY_COUNT]);
    assert_eq!(backend.stored(), None);
}

#[test]
fn serving_continues_after_a_bad_client() {
    let (addr, outputs, _backend) = start_server();

    // A client that connects and hangs up without sending anything.
    drop(TcpStream::connect(addr).expect("connect"));

    // The loop must still serve the next client.
    exchange(addr, b"GET /5 HTTP/1.0\r\n\r\n");
    let mut expected = [false; RELAY_COUNT];
    expected[4] = true;
    assert_eq!(outputs.levels(), expected);
}

#[test]
fn mute_command_clears_previous_selection() {
    let (addr, outputs, backend) = start_server();

    exchange(addr, b"GET /2 HTTP/1.0\r\n\r\n");
    exchange(addr, b"GET /0 HTTP/1.0\r\n\r\n");

    assert_eq!(outputs.levels(), [false; RELAY_COUNT]);
    assert_eq!(backend.stored(), Some(0));
}
