use super::*;

#[test]
fn default_is_disconnected() {
    let state = WalletState::default();
    assert!(!state.is_connected());
    assert_eq!(state.button_label(), "Connect Wallet");
}

#[test]
fn connect_lifecycle() {
    let mut state = WalletState::default();
    state.begin_connect();
    assert_eq!(state.button_label(), "Connecting...");

    let key = Pubkey::new_from_array([7; 32]);
    state.connected(key);
    assert!(state.is_connected());
    let label = state.button_label();
    assert!(label.contains("..."));
    assert_eq!(label.len(), 11);

    state.disconnected();
    assert_eq!(state, WalletState::default());
}

#[test]
fn failed_connect_keeps_message() {
    let mut state = WalletState::default();
    state.begin_connect();
    state.connect_failed("No wallet found".to_owned());
    assert!(!state.is_connected());
    assert!(!state.connecting);
    assert_eq!(state.error.as_deref(), Some("No wallet found"));
}
