use std::io::Read;

use lz4_flex::frame::FrameDecoder;
use query_data_encoder::engine::encoding::{
    CompressedEncoderFactory, JsonEncoderFactory, QueryDataEncoderFactory, Session,
};
use query_data_encoder::engine::page::RowSetLoader;
use query_data_encoder::shared::config::EncoderConfig;
use tracing::{debug, info};

use crate::integration::scenarios::TestScenario;

fn factory_for(encoding: &str) -> Box<dyn QueryDataEncoderFactory> {
    let config = EncoderConfig::default();
    match encoding {
        "json" => Box::new(JsonEncoderFactory::new(config)),
        "json+zstd" => Box::new(CompressedEncoderFactory::json_zstd(config)),
        "json+lz4" => Box::new(CompressedEncoderFactory::json_lz4(config)),
        other => panic!("Unknown encoding in scenario: {}", other),
    }
}

fn decompress(encoding: &str, bytes: &[u8]) -> Vec<u8> {
    if encoding.ends_with("+zstd") {
        zstd::decode_all(bytes).expect("zstd frame")
    } else if encoding.ends_with("+lz4") {
        let mut out = Vec::new();
        FrameDecoder::new(bytes)
            .read_to_end(&mut out)
            .expect("lz4 frame");
        out
    } else {
        bytes.to_vec()
    }
}

pub fn run_scenario(scenario: &TestScenario) {
    info!("▶ Running scenario: {}", scenario.name);

    let row_set = RowSetLoader::new(scenario.rows_per_page)
        .load_str(&scenario.input.to_string())
        .expect("Scenario input must load");
    let factory = factory_for(&scenario.encoding);
    let encoder = factory.create(&Session::new(scenario.name.clone()), row_set.columns);
    assert_eq!(encoder.encoding(), scenario.encoding);

    let mut out = Vec::new();
    let attributes = encoder
        .encode_to(&mut out, &row_set.pages)
        .expect("Encoding failed");
    assert_eq!(
        attributes.segment_size(),
        Some(out.len() as i32),
        "[{}] segment size must equal bytes written",
        scenario.name
    );

    let text = String::from_utf8(decompress(&scenario.encoding, &out)).expect("UTF-8 output");
    debug!("[{}] output: {}", scenario.name, text);
    for matcher in &scenario.matchers {
        assert!(
            matcher.matches(&text),
            "[{}] matcher {:?} failed on output {}",
            scenario.name,
            matcher,
            text
        );
    }
}
