//! # OBJ Info
//!
//! Loads one or more Wavefront OBJ files and reports what the loader
//! produced. Loader diagnostics are printed through `env_logger`; run with
//! `RUST_LOG=wfobj=debug` to see skipped directives as well.
//!
//! ```bash
//! obj_info model.obj --index-policy clamp --precision extended --triangles 4
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use wfobj_core::obj::{FloatPrecision, IndexPolicy, ObjMesh, ParseOptions, parse_obj_with_options};

/// Wavefront OBJ inspection tool.
#[derive(Parser, Debug)]
#[command(name = "obj_info", about = "Report attribute and triangle counts of OBJ files", version)]
struct Args {
    /// OBJ files to load.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Out-of-range face index handling: 'permissive' or 'clamp'.
    #[arg(long, default_value = "permissive")]
    index_policy: IndexPolicy,

    /// Float literal precision: 'single' or 'extended'.
    #[arg(long, default_value = "single")]
    precision: FloatPrecision,

    /// Print the corners of the first N triangles.
    #[arg(long, default_value = "0")]
    triangles: usize,
}

fn report(path: &std::path::Path, mesh: &ObjMesh, triangles: usize) {
    log::info!(
        "{}: {} positions, {} texcoords, {} normals, {} triangles",
        path.display(),
        mesh.position_count(),
        mesh.texcoord_count(),
        mesh.normal_count(),
        mesh.triangle_count()
    );

    let upload_bytes = mesh.positions.as_bytes().len()
        + mesh.texcoords.as_bytes().len()
        + mesh.normals.as_bytes().len()
        + mesh.triangles.as_bytes().len();
    log::info!("{}: {} bytes of buffer data", path.display(), upload_bytes);

    for (i, [a, b, c]) in mesh.iter_triangles().take(triangles).enumerate() {
        println!(
            "{i:>6}: {}/{}/{} {}/{}/{} {}/{}/{}",
            a.position, a.texcoord, a.normal, b.position, b.texcoord, b.normal, c.position,
            c.texcoord, c.normal
        );
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    wfobj_core::profiling::start_profiling();
    log::info!("wfobj core v{}", wfobj_core::VERSION);

    let options = ParseOptions::new()
        .with_index_policy(args.index_policy)
        .with_precision(args.precision);
    log::debug!("Options: {:?}", options);

    let mut failed = false;
    for path in &args.paths {
        let source = match std::fs::read(path) {
            Ok(source) => source,
            Err(err) => {
                log::error!("Failed to read {}: {}", path.display(), err);
                failed = true;
                continue;
            }
        };

        let start = Instant::now();
        let mesh = parse_obj_with_options(&source, &options);
        log::info!(
            "{}: parsed {} bytes in {:.2?}",
            path.display(),
            source.len(),
            start.elapsed()
        );

        report(path, &mesh, args.triangles);
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
