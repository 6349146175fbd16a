use codspeed_bencher_compat::{benchmark_group, benchmark_main, Bencher};

use jute::{
    units_to_bytes, Endianness, JsonValue, NoopActions, Parser, ParserOptions, Utf16LeSource,
    Utf32LeSource, Utf8Source,
};

fn sample_document() -> String {
    let mut doc = String::from("{\"items\": [");
    for i in 0..200 {
        doc.push_str(&format!(
            "{{\"id\": {i}, \"name\": \"item-{i}-é😀\", \"price\": {}.5, \"tags\": [\"a\", \"b\\n\"]}},",
            i * 3
        ));
    }
    doc.pop();
    doc.push_str("]}");
    doc
}

fn validate_utf8(bench: &mut Bencher) {
    let json = sample_document();
    let data = json.as_bytes();
    bench.iter(|| {
        let mut actions = NoopActions::new();
        Parser::<Utf8Source, _>::new(data, &mut actions).parse().unwrap();
        actions.events
    });
}

fn tree_utf8(bench: &mut Bencher) {
    let json = sample_document();
    let data = json.as_bytes();
    bench.iter(|| JsonValue::parse(data).unwrap());
}

fn validate_utf16le(bench: &mut Bencher) {
    let json = sample_document();
    let units: Vec<u16> = json.encode_utf16().collect();
    let data = units_to_bytes(&units, Endianness::Little);
    bench.iter(|| {
        let mut actions = NoopActions::new();
        Parser::<Utf16LeSource, _>::new(&data, &mut actions).parse().unwrap();
        actions.events
    });
}

fn validate_utf32le(bench: &mut Bencher) {
    let json = sample_document();
    let units: Vec<u32> = json.chars().map(u32::from).collect();
    let data = units_to_bytes(&units, Endianness::Little);
    bench.iter(|| {
        let mut actions = NoopActions::new();
        Parser::<Utf32LeSource, _>::new(&data, &mut actions).parse().unwrap();
        actions.events
    });
}

fn tree_utf8_partial_strings(bench: &mut Bencher) {
    let big = "x".repeat(64 * 1024);
    let json = format!("[\"{big}\"]");
    let data = json.as_bytes();
    let options = ParserOptions {
        allow_partial_strings: true,
        ..ParserOptions::default()
    };
    bench.iter(|| {
        let mut actions = jute::TreeActions::new();
        Parser::<Utf8Source, _>::with_options(data, &mut actions, options)
            .parse()
            .unwrap();
        actions.result()
    });
}

benchmark_group!(
    benches,
    validate_utf8,
    tree_utf8,
    validate_utf16le,
    validate_utf32le,
    tree_utf8_partial_strings
);
benchmark_main!(benches);
