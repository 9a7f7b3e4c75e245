use anyhow::{Context, Result};

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// `code,v_1,...,v_k` with non-negative integer values around `base`.
fn encode_group(code: u32, base: &[f64], spread: f64, rng: &mut SimpleRng) -> String {
    let mut cell = code.to_string();
    for &mu in base {
        let value = rng.gauss(mu, spread).round().max(0.0) as i64;
        cell.push(',');
        cell.push_str(&value.to_string());
    }
    cell
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let output_path = args.next().unwrap_or_else(|| "sample_data.tsv".to_string());
    let rows: usize = match args.next() {
        Some(n) => n.parse().with_context(|| format!("'{n}' is not a row count"))?,
        None => 1000,
    };

    let mut rng = SimpleRng::new(42);

    // (code, per-position means, spread)
    let groups: [(u32, Vec<f64>, f64); 2] = [
        (100, vec![120.0, 340.0, 80.0, 410.0, 230.0, 150.0], 60.0),
        (200, vec![12.0, 7.0, 15.0], 4.0),
    ];

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["id", "features", "features_200"])?;

    for id in 0..rows {
        let mut record = vec![id.to_string()];
        for (code, base, spread) in &groups {
            record.push(encode_group(*code, base, *spread, &mut rng));
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;

    println!(
        "Wrote {rows} rows with {} encoded columns to {output_path}",
        groups.len()
    );
    Ok(())
}
