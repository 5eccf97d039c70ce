//! Boot-sequence scenarios: restore-before-network and fresh-device state.

use std::time::Duration;

use input_selector::app::relay::RelayController;
use input_selector::app::store::SelectionStore;
use input_selector::net::link::LinkSignal;
use input_selector::pins::RELAY_COUNT;

use crate::mock_hw::{MockRelays, MockStore};

/// Mirror of the boot restore step: all off, read the slot, re-apply.
fn boot_restore(relays: &mut RelayController<MockRelays>, store: &SelectionStore<MockStore>) {
    let persisted = store.get();
    relays.restore(persisted);
}

#[test]
fn fresh_device_boots_all_off() {
    let outputs = MockRelays::new();
    let mut relays = RelayController::new(outputs.clone());
    let store = SelectionStore::new(MockStore::new());

    boot_restore(&mut relays, &store);

    assert_eq!(outputs.levels(), [false; RELAY_COUNT]);
    assert_eq!(relays.selection(), None);
}

#[test]
fn fresh_device_link_stays_down_until_address() {
    // Scenario A: the boot gate must not open before GotAddress arrives.
    let signal = LinkSignal::new();
    assert!(!signal.wait(Some(Duration::from_millis(20))));

    signal.set();
    assert!(signal.wait(Some(Duration::from_millis(20))));
}

#[test]
fn reboot_restores_stored_selection_before_any_network() {
    // Scenario C: stored code 3 → relay index 2 high right after restore.
    let outputs = MockRelays::new();
    let mut relays = RelayController::new(outputs.clone());
    let store = SelectionStore::new(MockStore::preloaded(3));

    boot_restore(&mut relays, &store);

    let mut expected = [false; RELAY_COUNT];
    expected[2] = true;
    assert_eq!(outputs.levels(), expected);
    assert_eq!(relays.selection(), Some(2));
}

#[test]
fn restore_does_not_write_back_to_storage() {
    let outputs = MockRelays::new();
    let mut relays = RelayController::new(outputs);
    let backend = MockStore::preloaded(4);
    let store = SelectionStore::new(backend.clone());

    boot_restore(&mut relays, &store);

    // Restoring is read-only: the slot still holds exactly what was there.
    assert_eq!(backend.stored(), Some(4));
}

#[test]
fn corrupt_stored_byte_degrades_to_all_off() {
    let outputs = MockRelays::new();
    let mut relays = RelayController::new(outputs.clone());
    let store = SelectionStore::new(MockStore::preloaded(0xC7));

    boot_restore(&mut relays, &store);

    assert_eq!(outputs.levels(), [false; RELAY_COUNT]);
}
