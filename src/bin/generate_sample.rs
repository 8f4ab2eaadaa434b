use std::fs::File;
use std::io::Write;

use flate2::write::GzEncoder;
use flate2::Compression;
use serde_json::{json, Map, Value};

/// SplitMix64 stream; only needs to be reproducible, not statistically strong.
struct Jitter(u64);

impl Jitter {
    fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform in `[-1, 1)`.
    fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 52) as f64 - 1.0
    }
}

/// `[equation, error, predicted, target]`, with the prediction off by at most
/// `rel_noise` of the target.
fn record(jitter: &mut Jitter, equation: &str, target: f64, rel_noise: f64) -> Value {
    let predicted = target * (1.0 + rel_noise * jitter.unit());
    json!([equation, predicted - target, predicted, target])
}

fn main() {
    let mut jitter = Jitter(137);

    // Section 6: electroweak snippets over alpha, m_Z, m_mu, delta.
    let section6: Vec<(&str, f64)> = vec![
        ("\\alpha = 1/137", 0.0072973525693),
        ("m_{Z} = 91", 91.1876),
        ("\\alpha_{em} = \\alpha/(1 - \\delta)", 0.0078186),
        ("m_{\\mu} = m_{Z}/863", 0.1056583755),
        ("r = m_{\\mu}^{2}/m_{Z}^{2}", 1.3425e-6),
        ("\\Delta = \\delta \\cdot \\alpha", 0.0000213),
        ("G = \\sqrt(2)*\\alpha/m_{Z}^{2}", 1.1663787e-5),
        ("x = \\frac{1}{2}", 0.5),
    ];

    // Section 7: flavour snippets that need the extended vocabulary.
    let section7: Vec<(&str, f64)> = vec![
        ("\\sin^{2}(\\theta_{W}) = 1 - m_{W}^{2}/m_{Z}^{2}", 0.2229),
        ("s_{12} = sin(\\theta_{12})", 0.5505),
        ("s_{13} = sin(\\theta_{13})", 0.1490),
        ("V_{us} = \\sqrt(m_{d}/m_{s})", 0.2243),
        ("R_{cb} = m_{c}/m_{b}", 0.2962),
        ("a_{s} = \\alpha_{S}/(4*pi)", 0.009384),
        ("m_{W} = m_{Z}*cos(\\theta_{23})", 80.379),
        ("y = m_{t}/m_{b}", 41.3),
    ];

    let mut root = Map::new();
    let mut sec6: Vec<Value> = section6
        .iter()
        .map(|&(eq, target)| record(&mut jitter, eq, target, 0.02))
        .collect();
    // One truncated record, to exercise the skip path.
    sec6.push(json!(["m_{Z} = 91", 0.0, 91.0]));
    root.insert("6".to_string(), Value::Array(sec6));

    let sec7: Vec<Value> = section7
        .iter()
        .map(|&(eq, target)| record(&mut jitter, eq, target, 0.05))
        .collect();
    root.insert("7".to_string(), Value::Array(sec7));

    let output_path = "standard_model_snippets.json.gz";
    let text = serde_json::to_string(&Value::Object(root)).expect("Failed to serialize dataset");
    let file = File::create(output_path).expect("Failed to create output file");
    let mut encoder = GzEncoder::new(file, Compression::default());
    encoder
        .write_all(text.as_bytes())
        .expect("Failed to write dataset");
    encoder.finish().expect("Failed to finish gzip stream");

    println!(
        "Wrote {} + {} records (sections 6, 7) to {output_path}",
        section6.len() + 1,
        section7.len()
    );
}
