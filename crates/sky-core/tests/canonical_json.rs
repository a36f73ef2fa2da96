use std::collections::HashMap;

use sky_core::{from_json_slice, from_yaml_slice, stable_hash_string, to_canonical_json_bytes};

#[test]
fn canonical_json_sorts_keys() {
    let mut map = HashMap::new();
    map.insert("zeta", 1);
    map.insert("alpha", 2);
    map.insert("mid", 3);
    let bytes = to_canonical_json_bytes(&map).expect("serialize");
    assert_eq!(String::from_utf8(bytes).unwrap(), r#"{"alpha":2,"mid":3,"zeta":1}"#);
}

#[test]
fn hash_is_order_independent_for_maps() {
    let mut a = HashMap::new();
    a.insert("x", 1.5);
    a.insert("y", 2.5);
    let mut b = HashMap::new();
    b.insert("y", 2.5);
    b.insert("x", 1.5);
    assert_eq!(stable_hash_string(&a).unwrap(), stable_hash_string(&b).unwrap());
    assert_eq!(stable_hash_string(&a).unwrap().len(), 64);
}

#[test]
fn decode_errors_are_serde_family() {
    let err = from_json_slice::<Vec<u32>>(b"{not json").unwrap_err();
    assert_eq!(err.code(), "json_deserialize");
    let err = from_yaml_slice::<Vec<u32>>(b"key: [").unwrap_err();
    assert_eq!(err.code(), "yaml_deserialize");
}
