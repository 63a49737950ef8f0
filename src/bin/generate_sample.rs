use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

/// Write a synthetic sales dataset matching the dashboard's built-in filter slots.
#[derive(Parser, Debug)]
#[command(about = "Generate a sample sales CSV")]
struct Args {
    /// Output file
    #[arg(default_value = "sample_sales.csv")]
    output: PathBuf,

    /// Number of months to generate, starting January 2024
    #[arg(long, default_value_t = 12)]
    months: u32,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn range(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let regions = ["EU", "US", "APAC", "LATAM"];
    // (product type, base units, base price)
    let products = [
        ("Electronics", 120.0, 350.0),
        ("Clothing", 400.0, 40.0),
        ("Home", 220.0, 85.0),
    ];

    let mut writer = csv::Writer::from_path(&args.output)
        .with_context(|| format!("creating {}", args.output.display()))?;
    writer.write_record([
        "Date",
        "Region",
        "Product_Type",
        "Units_Sold",
        "Sales",
        "Discount_Percent",
        "Return_Rate",
    ])?;

    let mut rows = 0;
    for month in 0..args.months {
        let date = format!("{}-{:02}-01", 2024 + month / 12, month % 12 + 1);
        for region in &regions {
            for &(product, base_units, price) in &products {
                let discount = (rng.range(0.0, 30.0)).round();
                let units = (base_units * rng.range(0.6, 1.4) * (1.0 + discount / 100.0)).round();
                let sales = units * price * (1.0 - discount / 100.0);
                let return_rate = rng.range(0.5, 12.0);

                writer.write_record([
                    date.clone(),
                    region.to_string(),
                    product.to_string(),
                    format!("{units}"),
                    format!("{sales:.2}"),
                    format!("{discount}"),
                    format!("{return_rate:.1}"),
                ])?;
                rows += 1;
            }
        }
    }
    writer.flush()?;

    println!("Wrote {rows} rows to {}", args.output.display());
    Ok(())
}
