use super::*;

#[test]
fn bare_hash_resolves_under_gateway() {
    assert_eq!(
        metadata_url("https://gateway.pinata.cloud/", "QmAbc"),
        "https://gateway.pinata.cloud/ipfs/QmAbc"
    );
}

#[test]
fn ipfs_scheme_is_stripped() {
    assert_eq!(metadata_url("https://gw.example", "ipfs://QmAbc"), "https://gw.example/ipfs/QmAbc");
}

#[test]
fn absolute_url_is_used_verbatim() {
    let url = "https://arweave.net/xyz";
    assert_eq!(metadata_url("https://gw.example", url), url);
}

#[test]
fn pin_endpoint_joins_path() {
    assert_eq!(pin_endpoint(PINNING_API_URL, PIN_JSON_PATH), "https://api.pinata.cloud/pinning/pinJSONToIPFS");
}

#[test]
fn metadata_parses_mixed_attribute_values() {
    let doc: NftMetadata = serde_json::from_str(
        r#"{"name":"Cat","attributes":[{"trait_type":"eyes","value":"green"},{"trait_type":"level","value":3}]}"#,
    )
    .unwrap();
    let attrs = doc.attributes.unwrap();
    assert_eq!(attrs[0].value.to_string(), "green");
    assert_eq!(attrs[1].value.to_string(), "3");
    assert!(doc.description.is_none());
}

#[test]
fn metadata_tolerates_missing_and_unknown_fields() {
    let doc: NftMetadata = serde_json::from_str(r#"{"seller_fee_basis_points":500}"#).unwrap();
    assert_eq!(doc, NftMetadata::default());
}

#[test]
fn with_image_fills_image_and_properties() {
    let draft = NftMetadata { name: Some("Cat".to_owned()), ..NftMetadata::default() };
    let doc = draft.with_image("QmImg", "image/png", DEFAULT_GATEWAY_URL);
    assert_eq!(doc.image.as_deref(), Some("https://gateway.pinata.cloud/ipfs/QmImg"));
    let props = doc.properties.unwrap();
    assert_eq!(props.category, "image");
    assert_eq!(props.files[0].mime, "image/png");

    let json = serde_json::to_value(NftMetadata::default().with_image("h", "image/gif", "https://g")).unwrap();
    assert_eq!(json["properties"]["files"][0]["type"], "image/gif");
    assert!(json.get("name").is_none());
}

#[test]
fn pin_response_uses_api_field_names() {
    let pin: PinResponse =
        serde_json::from_str(r#"{"IpfsHash":"QmX","PinSize":12,"Timestamp":"2024-01-01T00:00:00Z"}"#).unwrap();
    assert_eq!(pin.ipfs_hash, "QmX");
    assert_eq!(pin.pin_size, 12);
}

#[test]
fn pin_json_body_wraps_document_with_name() {
    let doc = NftMetadata { name: Some("Cat #1".to_owned()), ..NftMetadata::default() };
    let body = pin_json_body(&doc);
    assert_eq!(body["pinataMetadata"]["name"], "Cat #1");
    assert_eq!(body["pinataContent"]["name"], "Cat #1");
    assert!(body["pinataContent"].get("image").is_none());
}

#[test]
fn pin_json_body_defaults_blank_name() {
    let doc = NftMetadata { name: Some("  ".to_owned()), ..NftMetadata::default() };
    assert_eq!(pin_json_body(&doc)["pinataMetadata"]["name"], DEFAULT_PIN_NAME);
    assert_eq!(pin_json_body(&NftMetadata::default())["pinataMetadata"]["name"], DEFAULT_PIN_NAME);
}
