//! Sample Prediction Client
//!
//! Generates random census records and posts them to a running service.

use rand::Rng;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{info, warn};

/// Record generator for exercising the service
struct RecordGenerator {
    rng: rand::rngs::ThreadRng,
    record_counter: u64,
}

impl RecordGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            record_counter: 0,
        }
    }

    /// Generate a random record with label-encoded categorical fields
    fn generate(&mut self) -> Value {
        self.record_counter += 1;

        let education_number = self.rng.gen_range(1..=16);
        let capital_gain = if self.rng.gen_bool(0.1) {
            self.rng.gen_range(1000..20000)
        } else {
            0
        };
        let capital_loss = if capital_gain == 0 && self.rng.gen_bool(0.05) {
            self.rng.gen_range(100..2500)
        } else {
            0
        };

        json!({
            "age": self.rng.gen_range(17..90),
            "final-weight": self.rng.gen_range(12285..1484705),
            "education": education_number - 1,
            "education-number": education_number,
            "marital-status": self.rng.gen_range(0..7),
            "relationship": self.rng.gen_range(0..6),
            "occupation": self.rng.gen_range(0..14),
            "race": self.rng.gen_range(0..5),
            "sex": self.rng.gen_range(0..2),
            "capital-gain": capital_gain,
            "capital-loss": capital_loss,
            "hours-per-week": self.rng.gen_range(1..99),
            "native-country": self.rng.gen_range(0..41),
            "employment-type": self.rng.gen_range(0..8),
        })
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_client=info".parse()?),
        )
        .init();

    info!("Starting Sample Prediction Client");

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let url = args
        .get(1)
        .map(|s| s.as_str())
        .unwrap_or("http://127.0.0.1:5000/predict");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(20);
    let delay_ms: u64 = args.get(3).and_then(|s| s.parse().ok()).unwrap_or(100);

    info!(url = %url, count = count, delay_ms = delay_ms, "Configuration loaded");

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;
    let mut generator = RecordGenerator::new();

    let mut positive = 0u64;
    let mut failed = 0u64;

    for i in 0..count {
        let record = generator.generate();

        let response = match client.post(url).json(&record).send().await {
            Ok(response) => response,
            Err(e) if e.is_connect() && i == 0 => {
                warn!(error = %e, "Service unreachable. Running in dry-run mode.");
                return run_dry_mode(generator, count, delay_ms).await;
            }
            Err(e) => return Err(e.into()),
        };

        let status = response.status();
        let body: Value = response.json().await?;

        if status.is_success() {
            if body["prediction"][0].as_f64().unwrap_or(0.0) > 0.0 {
                positive += 1;
            }
            info!(
                record = generator.record_counter,
                age = %record["age"],
                prediction = %body["prediction"],
                "Prediction received"
            );
        } else {
            failed += 1;
            warn!(
                record = generator.record_counter,
                status = %status,
                error = %body["error"],
                "Prediction request failed"
            );
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    info!(
        "Completed! Sent {} records ({} predicted positive, {} failed)",
        count, positive, failed
    );

    Ok(())
}

async fn run_dry_mode(mut generator: RecordGenerator, count: u64, delay_ms: u64) -> anyhow::Result<()> {
    info!("Running in dry-run mode (no service connection)");

    for i in 0..count {
        let record = generator.generate();
        let json = serde_json::to_string_pretty(&record)?;

        if (i + 1) % 10 == 0 || i == 0 {
            info!("Sample record {}:\n{}", i + 1, json);
        }

        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
    }

    Ok(())
}
