use std::process::ExitCode;

use clap::Parser;
use serde::Serialize;
use strided_layout::{build_descriptor, ArrayDescriptor, BaseAddress, DType, Dims, Order};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stride-inspect")]
#[command(about = "Inspect the strided memory layout of an N-dimensional array", long_about = None)]
struct Cli {
    /// Extent of each axis, e.g. 2,3,4
    #[arg(long, value_delimiter = ',', allow_negative_numbers = true, default_value = "2,3")]
    shape: Vec<i64>,

    /// Element type (int8, int16, int32, int64, float32, float64)
    #[arg(long, default_value = "int32")]
    dtype: DType,

    /// Traversal order: C (row-major) or F (column-major)
    #[arg(long, default_value = "C")]
    order: Order,

    /// Simulated base address in hexadecimal
    #[arg(long, default_value = "0x100")]
    base: BaseAddress,

    /// Coordinate to locate, e.g. 1,2,3 (repeatable)
    #[arg(long = "index")]
    indices: Vec<String>,

    /// Flat buffer position to locate (repeatable)
    #[arg(long = "flat")]
    flats: Vec<usize>,

    /// Emit JSON instead of text
    #[arg(long)]
    json: bool,
}

/// One element located in both coordinate systems.
#[derive(Serialize)]
struct Located {
    nd_index: Dims,
    flat_index: usize,
    byte_offset: usize,
    address: String,
}

#[derive(Serialize)]
struct Report<'a> {
    descriptor: &'a ArrayDescriptor,
    located: Vec<Located>,
}

fn locate_index(desc: &ArrayDescriptor, index: &[usize]) -> strided_layout::Result<Located> {
    Ok(Located {
        nd_index: Dims::from_slice(index),
        flat_index: desc.flat_index(index)?,
        byte_offset: desc.byte_offset(index)?,
        address: desc.address_of(index)?,
    })
}

fn locate_flat(desc: &ArrayDescriptor, flat: usize) -> strided_layout::Result<Located> {
    let nd_index = desc.nd_index(flat)?;
    locate_index(desc, &nd_index)
}

/// Parse `"1,2,3"` into a coordinate vector.
///
/// Every component must be a non-negative integer; an empty or blank string
/// is the rank-0 coordinate.
fn parse_index(raw: &str) -> Result<Vec<usize>, String> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    raw.split(',')
        .enumerate()
        .map(|(axis, part)| {
            let part = part.trim();
            if part.is_empty() {
                return Err(format!("empty coordinate for axis {axis} in {raw:?}"));
            }
            part.parse::<usize>()
                .map_err(|err| format!("invalid coordinate {part:?} in {raw:?}: {err}"))
        })
        .collect()
}

/// `(i0 × s0) + (i1 × s1) + ... = offset bytes`
fn offset_breakdown(loc: &Located, strides: &[usize]) -> String {
    let terms: Vec<String> = loc
        .nd_index
        .iter()
        .zip(strides)
        .map(|(i, s)| format!("({i} × {s})"))
        .collect();
    let sum = if terms.is_empty() {
        "0".to_string()
    } else {
        terms.join(" + ")
    };
    format!("offset = {sum} = {} bytes", loc.byte_offset)
}

fn locate_all(cli: &Cli, desc: &ArrayDescriptor) -> Result<Vec<Located>, String> {
    let mut located = Vec::new();
    for raw in &cli.indices {
        let index = parse_index(raw)?;
        located.push(locate_index(desc, &index).map_err(|err| err.to_string())?);
    }
    for &flat in &cli.flats {
        located.push(locate_flat(desc, flat).map_err(|err| err.to_string())?);
    }
    Ok(located)
}

fn render_text(desc: &ArrayDescriptor, located: &[Located]) -> String {
    let mut out = desc.to_string();
    for loc in located {
        out.push_str(&format!(
            "\n{:?} -> flat {} | offset {} bytes | address {}\n  {}",
            loc.nd_index.as_slice(),
            loc.flat_index,
            loc.byte_offset,
            loc.address,
            offset_breakdown(loc, desc.strides())
        ));
    }
    out
}

fn render_json(desc: &ArrayDescriptor, located: Vec<Located>) -> Result<String, String> {
    let report = Report {
        descriptor: desc,
        located,
    };
    serde_json::to_string_pretty(&report).map_err(|err| err.to_string())
}

fn run(cli: Cli) -> Result<String, String> {
    let desc = build_descriptor(&cli.shape, cli.dtype, cli.order)
        .map_err(|err| err.to_string())?
        .with_base_address(cli.base);
    let located = locate_all(&cli, &desc)?;
    if cli.json {
        render_json(&desc, located)
    } else {
        Ok(render_text(&desc, &located))
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(text) => {
            println!("{text}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!(%err, "inspection failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let argv = std::iter::once("stride-inspect").chain(args.iter().copied());
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_parse_index() {
        assert_eq!(parse_index("1,2,3").unwrap(), vec![1, 2, 3]);
        assert_eq!(parse_index(" 4 , 0 ").unwrap(), vec![4, 0]);
        assert!(parse_index("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_index_rejects_empty_components() {
        assert!(parse_index("1,,2").is_err());
        assert!(parse_index("1,2,").is_err());
        assert!(parse_index(",1").is_err());
        assert!(parse_index("1,-2").is_err());
        assert!(parse_index("x").is_err());
    }

    #[test]
    fn test_malformed_index_fails_run() {
        let err = run(cli(&["--shape", "2,3", "--index", "1,2,"])).unwrap_err();
        assert!(err.contains("empty coordinate"), "{err}");
        assert!(run(cli(&["--shape", "2,3", "--index", "1,,2"])).is_err());
    }

    #[test]
    fn test_rank_mismatch_is_not_truncated() {
        let err = run(cli(&["--shape", "2,3", "--index", "1"])).unwrap_err();
        assert!(err.contains("rank mismatch"), "{err}");
    }

    #[test]
    fn test_out_of_range_flat_fails_run() {
        assert!(run(cli(&["--shape", "2,3", "--flat", "6"])).is_err());
    }

    #[test]
    fn test_text_report() {
        let text = run(cli(&[
            "--shape", "2,3", "--dtype", "float32", "--index", "1,2", "--flat", "3",
        ]))
        .unwrap();
        assert!(text.contains("strides: (12, 4)"));
        assert!(text.contains("[1, 2] -> flat 5 | offset 20 bytes | address 0x114"));
        assert!(text.contains("offset = (1 × 12) + (2 × 4) = 20 bytes"));
        assert!(text.contains("[1, 0] -> flat 3 | offset 12 bytes | address 0x10C"));
    }

    #[test]
    fn test_flat_in_column_major() {
        let text = run(cli(&[
            "--shape", "2,3", "--dtype", "float32", "--order", "F", "--flat", "5",
        ]))
        .unwrap();
        assert!(text.contains("[1, 2] -> flat 5 | offset 20 bytes | address 0x114"));
        assert!(text.contains("offset = (1 × 4) + (2 × 8) = 20 bytes"));
    }

    #[test]
    fn test_json_report_shape() {
        let text = run(cli(&[
            "--shape", "2,3", "--dtype", "int32", "--base", "0x2000", "--index", "0,1",
            "--flat", "4", "--json",
        ]))
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["descriptor"]["shape"], serde_json::json!([2, 3]));
        assert_eq!(value["descriptor"]["base_address"], "0x2000");
        let located = value["located"].as_array().unwrap();
        assert_eq!(located.len(), 2);
        assert_eq!(located[0]["nd_index"], serde_json::json!([0, 1]));
        assert_eq!(located[0]["flat_index"], 1);
        assert_eq!(located[0]["address"], "0x2004");
        assert_eq!(located[1]["nd_index"], serde_json::json!([1, 1]));
        assert_eq!(located[1]["byte_offset"], 16);
    }

    #[test]
    fn test_scalar_breakdown() {
        let desc = ArrayDescriptor::new(&[], DType::Int64, Order::RowMajor).unwrap();
        let loc = locate_index(&desc, &parse_index("").unwrap()).unwrap();
        assert_eq!(offset_breakdown(&loc, desc.strides()), "offset = 0 = 0 bytes");
        assert_eq!(loc.address, "0x100");
    }

    #[test]
    fn test_invalid_shape_fails_run() {
        let err = run(cli(&["--shape", "2,-1"])).unwrap_err();
        assert!(err.contains("invalid shape"), "{err}");
    }
}
