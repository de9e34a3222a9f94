//! Command-line driver for dxf2geo.
//!
//! Thin wrapper over the library pipeline:
//!
//! ```text
//! dxf2geo convert   <input.dxf> <output.geojson> [--target-crs EPSG:4326]
//!                   [--source-crs EPSG:2277] [--strict]
//! dxf2geo reproject <input.geojson> <output.geojson> <target-crs>
//! dxf2geo scale     <input.geojson> <output.geojson> <factor>
//! ```

use anyhow::{bail, Context};
use dxf2geo::io::geojson;
use dxf2geo::{ConversionPipeline, ConvertOptions, CrsId, FeatureCollectionResult};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("convert") => convert(&args[1..]),
        Some("reproject") => reproject(&args[1..]),
        Some("scale") => scale(&args[1..]),
        _ => {
            eprintln!("usage: dxf2geo convert <input.dxf> <output.geojson> [--target-crs CRS] [--source-crs CRS] [--strict]");
            eprintln!("       dxf2geo reproject <input.geojson> <output.geojson> <target-crs>");
            eprintln!("       dxf2geo scale <input.geojson> <output.geojson> <factor>");
            bail!("missing or unknown subcommand");
        }
    }
}

fn convert(args: &[String]) -> anyhow::Result<()> {
    let mut positional = Vec::new();
    let mut options = ConvertOptions::default();

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--target-crs" => {
                let value = iter.next().context("--target-crs needs a value")?;
                options.target_crs = value.parse::<CrsId>()?;
            }
            "--source-crs" => {
                let value = iter.next().context("--source-crs needs a value")?;
                options.source_crs = Some(value.parse::<CrsId>()?);
            }
            "--strict" => options.strict = true,
            other => positional.push(other.to_string()),
        }
    }

    let [input, output] = positional.as_slice() else {
        bail!("convert expects exactly <input.dxf> <output.geojson>");
    };

    let result = ConversionPipeline::convert_file(input, &options)
        .with_context(|| format!("converting {input}"))?;
    report(&result);
    geojson::write_file(&result, output).with_context(|| format!("writing {output}"))?;
    println!("wrote {output} ({})", result.crs);
    Ok(())
}

fn reproject(args: &[String]) -> anyhow::Result<()> {
    let [input, output, target] = args else {
        bail!("reproject expects exactly <input.geojson> <output.geojson> <target-crs>");
    };
    let target: CrsId = target.parse()?;

    let parent = geojson::read_file(input).with_context(|| format!("reading {input}"))?;
    let result = ConversionPipeline::apply_reprojection(&parent, &target)?;
    report(&result);
    geojson::write_file(&result, output).with_context(|| format!("writing {output}"))?;
    println!("wrote {output} ({} -> {})", parent.crs, result.crs);
    Ok(())
}

fn scale(args: &[String]) -> anyhow::Result<()> {
    let [input, output, factor] = args else {
        bail!("scale expects exactly <input.geojson> <output.geojson> <factor>");
    };
    let factor: f64 = factor.parse().context("scale factor must be a number")?;

    let parent = geojson::read_file(input).with_context(|| format!("reading {input}"))?;
    let result = ConversionPipeline::apply_scale(&parent, factor)?;
    report(&result);
    geojson::write_file(&result, output).with_context(|| format!("writing {output}"))?;
    println!("wrote {output} (scale factor {factor})");
    Ok(())
}

fn report(result: &FeatureCollectionResult) {
    let s = &result.summary;
    println!(
        "{} of {} features converted ({} skipped, {} transform failures)",
        s.converted, s.entities_seen, s.skipped, s.transform_failures
    );
    if let Some(c) = &result.classification {
        println!("coordinate system: {} ({})", c.likely_system, c.suggestion);
    }
    for n in &result.notifications {
        println!("  {n}");
    }
}
