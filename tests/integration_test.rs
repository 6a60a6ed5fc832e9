//! Integration tests for nestkey transforms, registry and NDJSON pipeline

use nestkey::serialization::{NdjsonReader, NdjsonWriter};
use nestkey::{
    Field, NestedValue, NestedValueToHeader, NestedValueToKeysAndHeader, Record, Schema, Struct,
    TransformConfig, TransformRegistry, Transformation,
};
use serde_json::json;
use std::io::Write;

fn header_transform(mapping: &str) -> NestedValueToHeader {
    NestedValueToHeader::configure(&TransformConfig::new().with("headerFieldMapping", mapping))
        .unwrap()
}

#[test]
fn test_schemaless_header_end_to_end() {
    let record =
        Record::schemaless("events", NestedValue::from(json!({"geo": "us-east", "id": 7})));

    let out = header_transform("region:geo").apply(&record).unwrap();

    assert_eq!(out.headers.len(), 1);
    assert_eq!(
        out.headers.last_with_name("region").unwrap().value,
        NestedValue::from("us-east")
    );
    assert_eq!(out.value, record.value);
    assert_eq!(out.key, record.key);
}

#[test]
fn test_key_and_header_end_to_end() {
    let transform = NestedValueToKeysAndHeader::configure(
        &TransformConfig::new()
            .with("keyFieldMapping", "id:identifier")
            .with("headerFieldMapping", "src:source"),
    )
    .unwrap();
    let record = Record::schemaless(
        "events",
        NestedValue::from(json!({"identifier": "abc123", "source": "svcA"})),
    );

    let out = transform.apply(&record).unwrap();

    assert_eq!(out.key, Some(NestedValue::from(json!({"id": "abc123"}))));
    assert_eq!(out.headers.len(), 1);
    assert_eq!(out.headers.last_with_name("src").unwrap().value, NestedValue::from("svcA"));
    assert_eq!(out.value, record.value);
}

#[test]
fn test_missing_path_yields_null_header() {
    let transform = header_transform("h1:a.b.c");

    let schemaless = Record::schemaless("t", NestedValue::from(json!({"a": {"x": 1}})));
    let out = transform.apply(&schemaless).unwrap();
    assert_eq!(out.headers.last_with_name("h1").unwrap().value, NestedValue::Null);

    let inner = Schema::structure(vec![Field::new("x", Schema::int32())]);
    let outer = Schema::structure(vec![Field::new("a", inner.clone())]);
    let value = Struct::new(outer)
        .unwrap()
        .put("a", Struct::new(inner).unwrap().put("x", 1).unwrap())
        .unwrap();
    let out = transform.apply(&Record::with_schema("t", value)).unwrap();
    assert_eq!(out.headers.last_with_name("h1").unwrap().value, NestedValue::Null);
}

#[test]
fn test_schema_bound_nested_paths() {
    let geo = Schema::structure(vec![Field::new("region", Schema::string())]);
    let schema = Schema::structure(vec![
        Field::new("id", Schema::int64()),
        Field::new("geo", geo.clone()),
    ]);
    let value = Struct::new(schema)
        .unwrap()
        .put("id", 42i64)
        .unwrap()
        .put("geo", Struct::new(geo).unwrap().put("region", "eu-west").unwrap())
        .unwrap();

    let transform = NestedValueToKeysAndHeader::configure(
        &TransformConfig::new()
            .with("keyFieldMapping", "id:$.id")
            .with("headerFieldMapping", "region:$.geo.region"),
    )
    .unwrap();
    let out = transform.apply(&Record::with_schema("t", value)).unwrap();

    assert_eq!(out.key, Some(NestedValue::from(json!({"id": 42}))));
    assert_eq!(out.key_schema.as_ref(), Some(transform.key_schema()));
    assert_eq!(
        out.headers.last_with_name("region").unwrap().value,
        NestedValue::from("eu-west")
    );
}

#[test]
fn test_apply_is_repeatable() {
    let transform = header_transform("region:geo,id:id");
    let record =
        Record::schemaless("events", NestedValue::from(json!({"geo": "us-east", "id": 7})));

    let first = transform.apply(&record).unwrap();
    let second = transform.apply(&record).unwrap();

    assert_eq!(first, second);
    assert!(record.headers.is_empty());
}

#[test]
fn test_concurrent_apply_matches_sequential() {
    let transform = NestedValueToKeysAndHeader::configure(
        &TransformConfig::new()
            .with("keyFieldMapping", "id:id")
            .with("headerFieldMapping", "src:source"),
    )
    .unwrap();
    let records: Vec<Record> = (0..64)
        .map(|i| {
            Record::schemaless(
                "events",
                NestedValue::from(json!({"id": i, "source": format!("svc{}", i % 4)})),
            )
        })
        .collect();

    let sequential: Vec<Record> = records.iter().map(|r| transform.apply(r).unwrap()).collect();

    let parallel: Vec<Vec<Record>> = std::thread::scope(|scope| {
        let handles: Vec<_> = records
            .chunks(16)
            .map(|chunk| {
                let transform = &transform;
                scope.spawn(move || {
                    chunk.iter().map(|r| transform.apply(r).unwrap()).collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(parallel.concat(), sequential);
}

#[test]
fn test_registry_from_yaml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "transform: NestedValueToKeys\nconfig:\n  keyFieldMapping:\n    - \"id:identifier\"\n    - \"kind:type\""
    )
    .unwrap();

    let props = TransformConfig::load_from_file(file.path()).unwrap();
    let transform = TransformRegistry::default().create_from_config(&props).unwrap();
    assert_eq!(transform.name(), "NestedValueToKeys");

    let record = Record::schemaless(
        "t",
        NestedValue::from(json!({"identifier": "x1", "type": "order"})),
    );
    let out = transform.apply(&record).unwrap();
    assert_eq!(out.key, Some(NestedValue::from(json!({"id": "x1", "kind": "order"}))));
}

#[test]
fn test_ndjson_pipeline() {
    let input = concat!(
        r#"{"topic":"events","value":{"geo":"us-east","id":1}}"#,
        "\n",
        r#"{"topic":"events","value":{"geo":"eu-west","id":2},"valueSchema":{"type":"struct","fields":[{"field":"geo","type":"string"},{"field":"id","type":"int32"}]}}"#,
        "\n",
    );
    let transform = TransformRegistry::default()
        .create(
            "NestedValueToHeader",
            &TransformConfig::new().with("headerFieldMapping", "region:geo"),
        )
        .unwrap();

    let mut buf = Vec::new();
    let mut writer = NdjsonWriter::new(&mut buf);
    for record in NdjsonReader::new(input.as_bytes()) {
        let out = transform.apply(&record.unwrap()).unwrap();
        writer.write_record(&out).unwrap();
    }
    writer.flush().unwrap();

    let lines: Vec<serde_json::Value> = String::from_utf8(buf)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["headers"], json!([{"key": "region", "value": "us-east"}]));
    assert_eq!(lines[1]["headers"], json!([{"key": "region", "value": "eu-west"}]));
    assert_eq!(lines[1]["value"], json!({"geo": "eu-west", "id": 2}));
    assert!(lines[1]["valueSchema"].is_object());
}

#[test]
fn test_sample_config_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/keys_and_header.yaml");
    let props = TransformConfig::load_from_file(path).unwrap();
    let transform = TransformRegistry::default().create_from_config(&props).unwrap();

    let order = Schema::structure(vec![
        Field::new("id", Schema::int64()),
        Field::new("customer", Schema::structure(vec![Field::new("id", Schema::string())])),
    ]);
    let schema = Schema::structure(vec![
        Field::new("order", order),
        Field::new("source", Schema::string()),
    ]);
    let value = Struct::from_nested(
        schema,
        &NestedValue::from(json!({"order": {"id": 9, "customer": {"id": "c-1"}}, "source": "web"})),
    )
    .unwrap();

    let out = transform.apply(&Record::with_schema("orders", value)).unwrap();

    assert_eq!(out.key, Some(NestedValue::from(json!({"orderId": 9, "customer": "c-1"}))));
    assert_eq!(out.headers.last_with_name("src").unwrap().value, NestedValue::from("web"));
    assert_eq!(out.headers.last_with_name("region").unwrap().value, NestedValue::Null);
}
