use msgpack_testhelpers::{IPanic, setup};
use msgpack_value::{
    EncodeOptions, Encoder, ErrorKind, LargeIntEncoding, Map, MapKey, Value, decode, encode,
    encode_with_options,
};

fn repeated(header: &[u8], byte: u8, len: usize) -> Vec<u8> {
    let mut out = header.to_vec();
    out.resize(header.len() + len, byte);
    out
}

#[test]
fn positive_integers() -> Result<(), IPanic> {
    setup();

    assert_eq!(encode(&Value::from(1))?, [1]);
    assert_eq!(encode(&Value::from(127))?, [0x7f]);
    assert_eq!(encode(&Value::from(128))?, [0xcc, 128]);
    assert_eq!(encode(&Value::from(255))?, [0xcc, 255]);
    assert_eq!(encode(&Value::from(2000))?, [0xcd, 7, 208]);
    assert_eq!(encode(&Value::from(70000))?, [0xce, 0, 1, 17, 112]);
    assert_eq!(
        encode(&Value::from(u32::MAX))?,
        [0xce, 0xff, 0xff, 0xff, 0xff]
    );
    Ok(())
}

#[test]
fn negative_integers() -> Result<(), IPanic> {
    setup();

    assert_eq!(encode(&Value::from(-1))?, [0xff]);
    assert_eq!(encode(&Value::from(-32))?, [0xe0]);
    assert_eq!(encode(&Value::from(-33))?, [0xd0, 0xdf]);
    assert_eq!(encode(&Value::from(-127))?, [0xd0, 129]);
    assert_eq!(encode(&Value::from(-1000))?, [0xd1, 252, 24]);
    assert_eq!(encode(&Value::from(-60000))?, [0xd2, 255, 255, 21, 160]);
    assert_eq!(
        encode(&Value::from(i32::MIN))?,
        [0xd2, 0x80, 0x00, 0x00, 0x00]
    );
    Ok(())
}

#[test]
fn integers_past_32_bits_become_float64_by_default() -> Result<(), IPanic> {
    setup();

    let bytes = encode(&Value::Int(20_000_000_000))?;
    assert_eq!(bytes, [0xcb, 66, 18, 160, 95, 32, 0, 0, 0]);
    assert_eq!(decode(&bytes)?, Value::Float(20_000_000_000.0));

    let bytes = encode(&Value::Int(-600_000_000_000))?;
    assert_eq!(bytes, [0xcb, 194, 97, 118, 89, 46, 0, 0, 0]);
    assert_eq!(decode(&bytes)?, Value::Float(-600_000_000_000.0));

    assert_eq!(
        encode(&Value::Int(u32::MAX as i64 + 1))?,
        [0xcb, 0x41, 0xf0, 0, 0, 0, 0, 0, 0]
    );
    Ok(())
}

#[test]
fn integers_past_2_pow_53_are_refused_by_the_float_lane() {
    setup();

    let err = encode(&Value::Int(1 << 53)).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::NumericRangeExceeded {
            value: "9007199254740992".into(),
            range: "a float 64 without losing precision",
        }
    );
    assert!(encode(&Value::Int(i64::MIN)).is_err());
    assert!(encode(&Value::Int((1 << 53) - 1)).is_ok());
}

#[test]
fn exact_policy_uses_the_64_bit_tags() -> Result<(), IPanic> {
    setup();

    let options = EncodeOptions::new().large_ints(LargeIntEncoding::Exact);
    let bytes = encode_with_options(&Value::Int(20_000_000_000), &options)?;
    assert_eq!(bytes, [0xcf, 0, 0, 0, 0x04, 0xa8, 0x17, 0xc8, 0x00]);
    assert_eq!(decode(&bytes)?, Value::BigInt(20_000_000_000));

    let bytes = encode_with_options(&Value::Int(i64::MIN), &options)?;
    assert_eq!(bytes, [0xd3, 0x80, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(decode(&bytes)?.as_i64(), Some(i64::MIN));

    // small values are unaffected by the policy
    assert_eq!(encode_with_options(&Value::Int(-1), &options)?, [0xff]);
    Ok(())
}

#[test]
fn floats() -> Result<(), IPanic> {
    setup();

    assert_eq!(encode(&Value::from(0.3))?, [0xcb, 63, 211, 51, 51, 51, 51, 51, 51]);
    assert_eq!(decode(&encode(&Value::from(0.3))?)?, Value::Float(0.3));

    let bytes = encode(&Value::Float(f64::NAN))?;
    assert_eq!(bytes[0], 0xcb);
    assert!(decode(&bytes)?.as_f64().is_some_and(f64::is_nan));

    assert_eq!(
        encode(&Value::Float(f64::NEG_INFINITY))?,
        [0xcb, 0xff, 0xf0, 0, 0, 0, 0, 0, 0]
    );
    Ok(())
}

#[test]
fn bigints_always_take_8_bytes() -> Result<(), IPanic> {
    setup();

    assert_eq!(encode(&Value::BigInt(0))?, [0xcf, 0, 0, 0, 0, 0, 0, 0, 0]);
    assert_eq!(
        encode(&Value::BigInt(-10))?,
        [0xd3, 255, 255, 255, 255, 255, 255, 255, 246]
    );
    assert_eq!(encode(&Value::BigInt(10))?, [0xcf, 0, 0, 0, 0, 0, 0, 0, 10]);

    let big = Value::BigInt(9_999_999_999_999_999_999);
    let bytes = encode(&big)?;
    assert_eq!(bytes, [0xcf, 138, 199, 35, 4, 137, 231, 255, 255]);
    assert_eq!(decode(&bytes)?, big);

    assert_eq!(
        encode(&Value::BigInt(i128::from(u64::MAX)))?,
        [0xcf, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
    );
    Ok(())
}

#[test]
fn bigints_outside_64_bits_are_refused() {
    setup();

    for n in [
        99_999_999_999_999_999_999_999i128,
        -99_999_999_999_999_999_999_999,
        i128::from(u64::MAX) + 1,
        i128::from(i64::MIN) - 1,
    ] {
        let err = encode(&Value::BigInt(n)).unwrap_err();
        assert!(
            matches!(err.kind, ErrorKind::NumericRangeExceeded { ref value, .. } if *value == n.to_string()),
            "{n}: {err}"
        );
    }
}

#[test]
fn strings_pick_the_smallest_header() -> Result<(), IPanic> {
    setup();

    assert_eq!(
        encode(&Value::from("hello world"))?,
        [171, 104, 101, 108, 108, 111, 32, 119, 111, 114, 108, 100]
    );
    assert_eq!(encode(&Value::from(""))?, [0xa0]);
    assert_eq!(
        encode(&Value::from("a".repeat(31)))?,
        repeated(&[0xbf], 97, 31)
    );
    assert_eq!(
        encode(&Value::from("a".repeat(32)))?,
        repeated(&[0xd9, 32], 97, 32)
    );
    assert_eq!(
        encode(&Value::from("a".repeat(255)))?,
        repeated(&[0xd9, 255], 97, 255)
    );
    assert_eq!(
        encode(&Value::from("a".repeat(256)))?,
        repeated(&[0xda, 1, 0], 97, 256)
    );

    let long = "a".repeat(65536);
    let bytes = encode(&Value::from(long.as_str()))?;
    assert_eq!(bytes, repeated(&[0xdb, 0, 1, 0, 0], 97, 65536));
    assert_eq!(decode(&bytes)?.as_str(), Some(long.as_str()));
    Ok(())
}

#[test]
fn string_length_counts_utf8_bytes() -> Result<(), IPanic> {
    setup();

    // two characters, six bytes
    let bytes = encode(&Value::from("€€"))?;
    assert_eq!(bytes, [0xa6, 0xe2, 0x82, 0xac, 0xe2, 0x82, 0xac]);
    Ok(())
}

#[test]
fn binary_always_has_an_explicit_length() -> Result<(), IPanic> {
    setup();

    assert_eq!(encode(&Value::bytes([0u8, 1, 2, 3]))?, [0xc4, 4, 0, 1, 2, 3]);
    assert_eq!(encode(&Value::bytes([0u8; 0]))?, [0xc4, 0]);
    assert_eq!(
        encode(&Value::bytes(vec![0u8; 256]))?,
        repeated(&[0xc5, 1, 0], 0, 256)
    );
    assert_eq!(
        encode(&Value::bytes(vec![0u8; 65536]))?,
        repeated(&[0xc6, 0, 1, 0, 0], 0, 65536)
    );
    Ok(())
}

#[test]
fn arrays() -> Result<(), IPanic> {
    setup();

    assert_eq!(encode(&Value::array(Vec::<Value>::new()))?, [0x90]);
    assert_eq!(
        encode(&Value::array([1, 2, 3, 4, 5, 6]))?,
        [0x96, 1, 2, 3, 4, 5, 6]
    );
    assert_eq!(
        encode(&Value::array(vec![0; 256]))?,
        repeated(&[0xdc, 1, 0], 0, 256)
    );

    let nested = Value::array([
        Value::array([1, 2, 3]),
        Value::array([1, 2]),
        Value::from(5),
    ]);
    assert_eq!(decode(&encode(&nested)?)?, nested);
    Ok(())
}

fn map1() -> Value {
    Value::map([
        ("a", Value::from(0)),
        ("b", Value::from(2)),
        ("c", Value::from("three")),
        ("d", Value::Null),
    ])
}

const MAP1_BYTES: [u8; 18] = [
    132, 161, 97, 0, 161, 98, 2, 161, 99, 165, 116, 104, 114, 101, 101, 161, 100, 192,
];

#[test]
fn maps_keep_insertion_order() -> Result<(), IPanic> {
    setup();

    assert_eq!(encode(&Value::Map(Map::new()))?, [0x80]);
    assert_eq!(encode(&map1())?, MAP1_BYTES);

    let nested = Value::map([
        ("a", Value::from(-1)),
        ("b", Value::from(2)),
        ("c", Value::from("three")),
        ("d", Value::Null),
        ("e", map1()),
    ]);
    let mut expected = vec![133, 161, 97, 255, 161, 98, 2, 161, 99, 165, 116, 104, 114, 101, 101];
    expected.extend_from_slice(&[161, 100, 192, 161, 101]);
    expected.extend_from_slice(&MAP1_BYTES);
    assert_eq!(encode(&nested)?, expected);
    Ok(())
}

#[test]
fn number_keys_are_written_like_numbers() -> Result<(), IPanic> {
    setup();

    let value = Value::map([
        (MapKey::Int(1), Value::Null),
        (MapKey::BigInt(2), Value::Null),
        (MapKey::Float(0.5), Value::Null),
    ]);
    assert_eq!(
        encode(&value)?,
        [
            0x83, 0x01, 0xc0, 0xcf, 0, 0, 0, 0, 0, 0, 0, 2, 0xc0, 0xcb, 0x3f, 0xe0, 0, 0, 0,
            0, 0, 0, 0xc0
        ]
    );
    Ok(())
}

#[test]
fn map_count_headers() -> Result<(), IPanic> {
    setup();

    let entries = |n: u32| Value::map((0..n).map(|i| (MapKey::Int(i64::from(i)), Value::Null)));
    assert_eq!(encode(&entries(15))?[0], 0x8f);
    assert_eq!(encode(&entries(16))?[..3], [0xde, 0, 16]);
    assert_eq!(encode(&entries(65536))?[..5], [0xdf, 0, 1, 0, 0]);
    Ok(())
}

#[test]
fn output_limit_is_enforced() {
    setup();

    let options = EncodeOptions::new().initial_capacity(4).max_len(10);
    assert!(encode_with_options(&Value::from("123456789"), &options).is_ok());

    let err = encode_with_options(&Value::from("1234567890"), &options).unwrap_err();
    assert_eq!(
        err.kind,
        ErrorKind::BufferLimitExceeded {
            requested: 11,
            limit: 10
        }
    );
}

#[test]
fn one_shot_and_reusable_encoders_agree() -> Result<(), IPanic> {
    setup();

    let mut encoder = Encoder::new();
    for value in [map1(), Value::from("x".repeat(5000)), Value::BigInt(-10)] {
        assert_eq!(encoder.encode(&value)?, encode(&value)?.as_slice());
        assert_eq!(encoder.encode_to_vec(&value)?, encode(&value)?);
    }
    assert!(encoder.capacity() >= 5003);
    Ok(())
}

#[test]
fn encoder_recovers_after_an_error() -> Result<(), IPanic> {
    setup();

    let mut encoder = Encoder::new();
    let bad = Value::array([Value::from(1), Value::BigInt(i128::MAX)]);
    assert!(encoder.encode(&bad).is_err());
    assert_eq!(encoder.encode(&Value::from(true))?, [0xc3]);
    Ok(())
}

#[test]
fn huge_array_of_records() -> Result<(), IPanic> {
    setup();

    let records = (0..100_000).map(|i| {
        Value::map([
            ("a", Value::map([("i", Value::from(i.to_string()))])),
            ("i", Value::from(i)),
        ])
    });
    let value = Value::map([("a", Value::array(records))]);
    assert_eq!(decode(&encode(&value)?)?, value);
    Ok(())
}

#[test]
fn huge_map() -> Result<(), IPanic> {
    setup();

    let value = Value::map((0..100_000).map(|i| (format!("prop_{i}"), i)));
    let bytes = encode(&value)?;
    assert_eq!(bytes[..5], [0xdf, 0, 1, 0x86, 0xa0]);
    assert_eq!(decode(&bytes)?, value);
    Ok(())
}
