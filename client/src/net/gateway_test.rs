use super::*;

#[test]
fn fetch_failed_message_names_url_and_status() {
    assert_eq!(
        fetch_failed_message("https://gw/ipfs/Qm", 404),
        "metadata fetch https://gw/ipfs/Qm failed: 404"
    );
}

#[test]
fn pin_failed_message_includes_status() {
    assert_eq!(pin_failed_message(401), "pin request failed: 401");
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn server_render_fetch_is_a_gateway_error() {
    let result = futures::executor::block_on(BrowserGateway.fetch_metadata("https://gw/ipfs/Qm"));
    assert!(matches!(result, Err(MarketError::Gateway(_))));
}
