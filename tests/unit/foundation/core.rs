use super::*;

#[test]
fn rational_rejects_zero_parts() {
    assert!(Rational::new(0, 1).is_err());
    assert!(Rational::new(24, 0).is_err());
    assert_eq!(Rational::new(30000, 1001).unwrap().as_f64(), 30000.0 / 1001.0);
}

#[test]
fn rational_deserializes_every_accepted_shape() {
    let from = |s: &str| serde_json::from_str::<Rational>(s).unwrap();
    assert_eq!(from("25"), Rational { num: 25, den: 1 });
    assert_eq!(from("\"30000/1001\""), Rational { num: 30000, den: 1001 });
    assert_eq!(from("\"16:9\""), Rational { num: 16, den: 9 });
    assert_eq!(from("{\"num\": 24, \"den\": 1}"), Rational { num: 24, den: 1 });
    assert_eq!(from("1.5"), Rational { num: 3, den: 2 });
    assert_eq!(from("\"24\""), Rational { num: 24, den: 1 });
}

#[test]
fn rational_deserialize_rejects_nonsense() {
    assert!(serde_json::from_str::<Rational>("0").is_err());
    assert!(serde_json::from_str::<Rational>("-2.0").is_err());
    assert!(serde_json::from_str::<Rational>("\"fast\"").is_err());
    assert!(serde_json::from_str::<Rational>("\"24/0\"").is_err());
}

#[test]
fn rational_serializes_as_parts_and_round_trips() {
    let r = Rational::new(30000, 1001).unwrap();
    let v = serde_json::to_value(r).unwrap();
    assert_eq!(v, serde_json::json!({ "num": 30000, "den": 1001 }));
    assert_eq!(serde_json::from_value::<Rational>(v).unwrap(), r);
}

#[test]
fn rational_display_and_reduce() {
    assert_eq!(Rational::integer(24).unwrap().to_string(), "24");
    assert_eq!(Rational::new(48, 2).unwrap().reduced(), Rational { num: 24, den: 1 });
    assert_eq!(Rational::new(30000, 1001).unwrap().to_string(), "30000/1001");
}

#[test]
fn media_kind_names() {
    assert_eq!(MediaKind::Picture.as_str(), "picture");
    assert_eq!(MediaKind::Sound.to_string(), "Sound");
    assert_eq!(
        serde_json::from_str::<MediaKind>("\"sound\"").unwrap(),
        MediaKind::Sound
    );
}
