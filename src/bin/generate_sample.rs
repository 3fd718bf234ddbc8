//! Writes `sample_measurements.csv`: a small mixed-type table with gaps,
//! handy for trying every chart and the clean action.

use anyhow::{Context, Result};

const ROWS: usize = 150;
const SPECIES: [&str; 3] = ["alba", "nigra", "rubra"];

/// splitmix64; deterministic so the sample is reproducible.
struct SampleRng(u64);

impl SampleRng {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    fn uniform(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn normal(&mut self, mean: f64, sd: f64) -> f64 {
        let u1 = self.uniform().max(f64::MIN_POSITIVE);
        let u2 = self.uniform();
        mean + sd * (-2.0 * u1.ln()).sqrt() * (std::f64::consts::TAU * u2).cos()
    }

    /// Cell text, or an empty field with probability `p_missing`.
    fn maybe(&mut self, p_missing: f64, text: String) -> String {
        if self.uniform() < p_missing {
            String::new()
        } else {
            text
        }
    }
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_measurements.csv".to_string());
    let mut rng = SampleRng(7);
    let mut writer = csv::Writer::from_path(&path).with_context(|| format!("creating {path}"))?;

    writer.write_record([
        "id",
        "species",
        "length_cm",
        "width_cm",
        "mass_g",
        "age_years",
        "healthy",
    ])?;

    for id in 1..=ROWS {
        let species = SPECIES[id % SPECIES.len()];
        let base = 10.0 + 4.0 * (id % SPECIES.len()) as f64;
        let length = rng.normal(base, 1.5);
        let width = 0.4 * length + rng.normal(0.0, 0.5);
        let mass = 2.0 * length * width + rng.normal(0.0, 6.0);
        let age = (rng.uniform() * 12.0) as u32;
        let healthy = rng.uniform() > 0.15;

        let record = [
            id.to_string(),
            species.to_string(),
            rng.maybe(0.05, format!("{length:.2}")),
            rng.maybe(0.05, format!("{width:.2}")),
            rng.maybe(0.08, format!("{mass:.1}")),
            rng.maybe(0.03, age.to_string()),
            healthy.to_string(),
        ];
        writer.write_record(&record)?;
    }

    writer.flush()?;
    println!("Wrote {ROWS} rows to {path}");
    Ok(())
}
