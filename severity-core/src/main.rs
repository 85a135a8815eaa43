//! Road Accident Severity - One-shot CLI
//!
//! `severity-core [context.json]` reads one accident context (file or stdin),
//! runs it through the loaded artifacts and prints the verdict.

use std::io::Read;
use std::process::ExitCode;

use severity_core::constants::{APP_NAME, APP_VERSION};
use severity_core::{AccidentContext, SeverityPredictor};

fn read_context(arg: Option<String>) -> Result<AccidentContext, String> {
    let raw = match arg.as_deref() {
        Some(path) if path != "-" => std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read {}: {}", path, e))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| format!("Failed to read stdin: {}", e))?;
            buf
        }
    };

    serde_json::from_str(&raw).map_err(|e| format!("Invalid accident context: {}", e))
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting {} v{}", APP_NAME, APP_VERSION);

    let predictor = match SeverityPredictor::from_env() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Artifact load failed: {}", e);
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let ctx = match read_context(std::env::args().nth(1)) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::from(2);
        }
    };

    println!("Input Summary");
    for (field, value) in ctx.summary() {
        println!("  {:<10} {}", field, value);
    }

    match predictor.predict(&ctx) {
        Ok(result) => {
            println!();
            println!("{}", result.verdict());
            println!("{}", result.advisory());
            if let Some(confidence) = result.confidence {
                println!("{}", confidence.caption());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::warn!("Prediction rejected: {}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
