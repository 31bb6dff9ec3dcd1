use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use semgroup::groups::groups_to_json;
use semgroup::{Algorithm, AlgorithmKind, AlgorithmParams, Dataset, Engine, EngineConfig};

const SENTENCES: [&str; 20] = [
    "The sky is clear and blue today.",
    "It's a sunny day with no clouds in sight.",
    "The weather is perfect for a walk in the park.",
    "Today is bright and warm, ideal for outdoor activities.",
    "The sun is shining brightly, making it a beautiful day.",
    "I had a delicious pasta for lunch.",
    "The chocolate cake was rich and tasty.",
    "We enjoyed a hearty breakfast with eggs and bacon.",
    "The restaurant served an amazing steak dinner.",
    "I love the fresh salad with various veggies.",
    "The new smartphone has an impressive camera.",
    "Artificial intelligence is transforming industries.",
    "He bought the latest laptop with advanced features.",
    "The software update improved the system's performance.",
    "Virtual reality is becoming more popular in gaming.",
    "We visited the Eiffel Tower in Paris.",
    "Our trip to Japan was an unforgettable experience.",
    "The beaches in Hawaii are breathtaking.",
    "Exploring the ancient ruins in Greece was fascinating.",
    "We enjoyed a scenic drive along the coast.",
];

const DIM: usize = 32;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // RUST_LOG=semgroup=debug shows the elbow curve and convergence events.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Stand-in embeddings: five sentences per topic, each topic owning eight
    // dimensions, plus jitter. A real caller would fetch these from a model.
    let mut rng = StdRng::seed_from_u64(2024);
    let mut points = Vec::with_capacity(SENTENCES.len());
    for i in 0..SENTENCES.len() {
        let topic = i / 5;
        let point: Vec<f32> = (0..DIM)
            .map(|d| {
                let base = if d / 8 == topic { 1.0 } else { 0.0 };
                base + rng.random_range(-0.05f32..0.05)
            })
            .collect();
        points.push(point);
    }

    // Lead with one sentence per topic so the mixture model starts spread out.
    let order: Vec<usize> = (0..5).flat_map(|j| (0..4).map(move |t| t * 5 + j)).collect();
    let dataset = Dataset::new(
        order.iter().map(|&i| points[i].clone()).collect(),
        order.iter().map(|&i| SENTENCES[i].to_string()).collect(),
    )?;

    let engine = Engine::new(EngineConfig {
        seed: Some(7),
        kmeans_n_init: 5,
        ..Default::default()
    });
    let params = AlgorithmParams {
        epsilon: 0.5,
        min_points: 3,
        ..Default::default()
    };

    for kind in [
        AlgorithmKind::Kmeans,
        AlgorithmKind::Hac,
        AlgorithmKind::Dbscan,
        AlgorithmKind::Gmm,
    ] {
        let algorithm = Algorithm::from_kind(kind, &params)?;
        let groups = engine.cluster(&dataset, &algorithm)?;
        println!("== {kind} ({} groups)", groups.len());
        println!("{}", groups_to_json(&groups)?);
    }

    Ok(())
}
