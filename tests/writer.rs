use json_tree::{
    parse, to_string, to_string_pretty, to_writer, to_writer_pretty,
    writer::{Serializer, LINE_SEPARATOR},
    Array, Error, Object, Value,
};
use std::io;

fn sample() -> Value {
    let mut list = Array::new();
    list.add(1).add(2.5).add("x\n").add(Array::new());

    let mut obj = Object::new();
    obj.put("a", list);
    obj.put("b", Object::new());
    obj.put("c", None::<bool>);
    obj.put("d", true);

    obj.into()
}

#[test]
fn writes_compact() {
    assert_eq!(
        to_string(&sample()).unwrap(),
        r#"{"a":[1,2.5,"x\n",[]],"b":{},"c":null,"d":true}"#
    );
}

#[test]
fn writes_pretty() {
    let expected = r#"{
    "a": [
        1,
        2.5,
        "x\n",
        []
    ],
    "b": {},
    "c": null,
    "d": true
}"#
    .replace('\n', LINE_SEPARATOR);

    assert_eq!(to_string_pretty(&sample()).unwrap(), expected);
    assert_eq!(format!("{:#}", sample()), expected);
}

#[test]
fn empty_containers_stay_on_one_line() {
    assert_eq!(to_string_pretty(&Array::new().into()).unwrap(), "[]");
    assert_eq!(to_string_pretty(&Object::new().into()).unwrap(), "{}");
}

#[test]
fn escapes_strings_and_keys() {
    let mut obj = Object::new();
    obj.put("k\"ey", "a\"b\\c\u{8}\u{c}\r\t\u{1}\u{1f}é");

    assert_eq!(
        Value::from(obj).to_string(),
        r#"{"k\"ey":"a\"b\\c\b\f\r\t\u0001\u001fé"}"#
    );
}

#[test]
fn keeps_big_numbers() {
    let text = "[123456789012345678901234567890,-0.25,1.50]";

    assert_eq!(to_string(&parse(text).unwrap()).unwrap(), text);
}

#[test]
fn round_trips() {
    let text = r#"
    {
        "name": "tree \"one\"\u0007",
        "values": [1, -2, 3.25, true, false, null, {"nested": ["😀"]}],
        "empty": {}
    }"#;

    let value = parse(text).unwrap();
    let compact = to_string(&value).unwrap();
    let pretty = to_string_pretty(&value).unwrap();

    assert_eq!(parse(&compact).unwrap(), value);
    assert_eq!(parse(&pretty).unwrap(), value);
    assert_eq!(to_string(&parse(&compact).unwrap()).unwrap(), compact);
}

#[test]
fn writes_to_io() {
    let mut out = Vec::new();
    to_writer(&mut out, &sample()).unwrap();
    assert_eq!(String::from_utf8(out).unwrap(), to_string(&sample()).unwrap());

    let mut out = Vec::new();
    to_writer_pretty(&mut out, &sample()).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        to_string_pretty(&sample()).unwrap()
    );
}

struct BrokenPipe;

impl io::Write for BrokenPipe {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn io_failures_are_generation_errors() {
    let err = to_writer(BrokenPipe, &sample()).unwrap_err();

    assert!(matches!(err, Error::Generation(ref message) if message.contains("closed")));
}

#[test]
fn serializer_writes_into_any_sink() {
    let mut serializer = Serializer::compact(String::from("value: "));
    serializer.serialize(&Value::from(vec![1, 2])).unwrap();

    assert_eq!(serializer.into_inner(), "value: [1,2]");
}
