use lobster_data::error::ParseError;
use lobster_data::kind::EventKind;
use lobster_data::record::LobsterEvent;
use serde::Serialize;
use std::fs;
use std::path::Path;

const SAMPLE: &str = "\
34200.189151,1,11885113,21,2238200,1
34200.189151,5,0,1,2000000,1
34200.290159,2,11885113,21,2238200,-1
34205.000000,8,1,2,3,4
34210.000000,4,11885113,21,2238200,-1
34215.517411,3,11885113,21,2238200,1
34220.000000,6,0,7500,2238100,-1
36000.000000,7,0,0,-1,-1
";

/// Same loop the converter binary runs: parse every row, skip rows tagged
/// with an unrecognized kind, fail the test on anything else.
fn read_events(path: &Path) -> (Vec<LobsterEvent>, u64) {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .unwrap();
    let mut events = Vec::new();
    let mut skipped = 0u64;
    for result in reader.records() {
        let record = result.unwrap();
        let fields: Vec<&str> = record.iter().collect();
        match LobsterEvent::from_row(&fields) {
            Ok(event) => events.push(event),
            Err(ParseError::UnknownEventKind { .. }) => skipped += 1,
            Err(err) => panic!("unexpected parse failure: {err}"),
        }
    }
    (events, skipped)
}

#[test]
fn end_to_end_csv_to_json_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("message.csv");
    fs::write(&path, SAMPLE).unwrap();

    let (events, skipped) = read_events(&path);
    assert_eq!(skipped, 1);
    let kinds: Vec<EventKind> = events.iter().map(|ev| ev.kind()).collect();
    assert_eq!(
        kinds,
        vec![
            EventKind::Submission,
            EventKind::ExecutionHidden,
            EventKind::Cancellation,
            EventKind::ExecutionVisible,
            EventKind::Deletion,
            EventKind::CrossTrade,
            EventKind::TradingHalt,
        ]
    );

    // same document shape and indentation the binary writes
    #[derive(Serialize)]
    struct EventList {
        events: Vec<LobsterEvent>,
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    EventList { events }.serialize(&mut serializer).unwrap();
    let text = String::from_utf8(buf).unwrap();
    assert!(text.starts_with("{\n\t\"events\": ["));

    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    let items = doc["events"].as_array().unwrap();
    assert_eq!(items.len(), 7);

    // submissions are bare records
    assert!(items[0].get("eventtype").is_none());
    assert_eq!(items[0]["timesincemidnight"], 34_200_189_151_000u64);
    assert_eq!(items[0]["orderid"], 11885113);
    assert_eq!(items[0]["side"], 1);

    // hidden executions are tagged and carry no order id
    assert_eq!(items[1]["eventtype"], "5");
    assert!(items[1]["event"].get("orderid").is_none());
    assert_eq!(items[1]["event"]["size"], 1);

    // cancellations and visible executions are tagged too
    assert_eq!(items[2]["eventtype"], "2");
    assert_eq!(items[2]["event"]["orderid"], 11885113);
    assert_eq!(items[3]["eventtype"], "4");

    // deletions, cross trades and halts are bare
    assert!(items[4].get("eventtype").is_none());
    assert!(items[5].get("eventtype").is_none());
    assert_eq!(items[6]["halttype"], -1);
    assert!(items[6].get("eventtype").is_none());
}

#[test]
fn canonical_rows_round_trip_through_a_file() {
    let dir = tempfile::tempdir().unwrap();
    let source = dir.path().join("message.csv");
    fs::write(&source, SAMPLE).unwrap();
    let (events, _) = read_events(&source);

    let reemitted = dir.path().join("canonical.csv");
    let mut writer = csv::Writer::from_path(&reemitted).unwrap();
    for event in &events {
        writer.write_record(&event.to_row()).unwrap();
    }
    writer.flush().unwrap();
    drop(writer);

    let text = fs::read_to_string(&reemitted).unwrap();
    assert_eq!(
        text.lines().next().unwrap(),
        "34200.189151,1,11885113,21,2238200,1"
    );

    let (again, skipped) = read_events(&reemitted);
    assert_eq!(skipped, 0);
    assert_eq!(again, events);
}

#[test]
fn bad_rows_surface_parse_errors() {
    let dir = tempfile::tempdir().unwrap();

    let path = dir.path().join("bad_sentinel.csv");
    fs::write(&path, "34200.189151,5,7,1,2000000,1\n").unwrap();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .unwrap();
    let record = reader.records().next().unwrap().unwrap();
    let fields: Vec<&str> = record.iter().collect();
    assert_eq!(
        LobsterEvent::from_row(&fields).unwrap_err(),
        ParseError::InvalidFixedField {
            field: "order_id",
            expected: "0",
            actual: "7".to_string(),
        }
    );

    let path = dir.path().join("short_row.csv");
    fs::write(&path, "34200.189151,1,0,1,2000000\n").unwrap();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(&path)
        .unwrap();
    let record = reader.records().next().unwrap().unwrap();
    let fields: Vec<&str> = record.iter().collect();
    assert_eq!(
        LobsterEvent::from_row(&fields).unwrap_err(),
        ParseError::MalformedRow { found: 5 }
    );
}
