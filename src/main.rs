use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use query_data_encoder::engine::encoding::{
    CompressedEncoderFactory, JsonEncoderFactory, QueryDataEncoderFactory, Session,
};
use query_data_encoder::engine::page::RowSetLoader;
use query_data_encoder::logging;
use query_data_encoder::shared::config::{CONFIG, EncoderConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "query_data_encoder", about = "Encode a JSON row set into a spooled segment")]
struct Args {
    /// Row set document: {"columns": [{"name", "type"}], "rows": [[...]]}
    #[arg(short, long)]
    input: PathBuf,

    /// json, json+zstd or json+lz4
    #[arg(short, long, default_value = "json")]
    encoding: String,

    /// Destination file; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(long, default_value_t = 1024)]
    rows_per_page: usize,

    #[arg(long, default_value = "cli")]
    query_id: String,
}

fn select_factory(
    encoding: &str,
    config: &EncoderConfig,
) -> anyhow::Result<Box<dyn QueryDataEncoderFactory>> {
    let json = JsonEncoderFactory::new(config.clone());
    let factory: Box<dyn QueryDataEncoderFactory> = match encoding {
        "json" => Box::new(json),
        "json+zstd" => Box::new(CompressedEncoderFactory::zstd(json, config)),
        "json+lz4" => Box::new(CompressedEncoderFactory::lz4(json, config)),
        other => anyhow::bail!("Unsupported encoding: {other}"),
    };
    Ok(factory)
}

fn main() -> anyhow::Result<()> {
    logging::init()?;
    let args = Args::parse();

    let input = BufReader::new(File::open(&args.input)?);
    let row_set = RowSetLoader::new(args.rows_per_page).load(input)?;
    let factory = select_factory(&args.encoding, &CONFIG.encoder)?;
    let encoder = factory.create(&Session::new(args.query_id), row_set.columns);

    let attributes = match &args.output {
        Some(path) => {
            let mut out = BufWriter::new(File::create(path)?);
            let attributes = encoder.encode_to(&mut out, &row_set.pages)?;
            out.flush()?;
            attributes
        }
        None => {
            let mut out = io::stdout().lock();
            let attributes = encoder.encode_to(&mut out, &row_set.pages)?;
            out.flush()?;
            attributes
        }
    };

    info!(encoding = encoder.encoding(), "Segment written");
    eprintln!("{}", serde_json::to_string(&attributes)?);
    Ok(())
}
