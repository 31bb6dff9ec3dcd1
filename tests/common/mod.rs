#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Twenty short sentences, five per topic: weather, food, technology, travel.
pub const SENTENCES: [&str; 20] = [
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

pub const TOPICS: usize = 4;
pub const PER_TOPIC: usize = 5;
pub const DIM: usize = 16;

/// Topic of sentence `i` in [`SENTENCES`] order.
pub fn topic_of(i: usize) -> usize {
    i / PER_TOPIC
}

/// Synthetic embedding: 10.0 on the topic's four dimensions, ±0.1 jitter everywhere.
pub fn embedding(topic: usize, rng: &mut StdRng) -> Vec<f32> {
    (0..DIM)
        .map(|d| {
            let base = if d / 4 == topic { 10.0 } else { 0.0 };
            base + rng.random_range(-0.1f32..0.1)
        })
        .collect()
}

/// (points, labels, topic per point) in the order given by `order`.
pub fn topic_dataset(order: &[usize], seed: u64) -> (Vec<Vec<f32>>, Vec<String>, Vec<usize>) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(order.len());
    let mut labels = Vec::with_capacity(order.len());
    let mut topics = Vec::with_capacity(order.len());
    for &i in order {
        points.push(embedding(topic_of(i), &mut rng));
        labels.push(SENTENCES[i].to_string());
        topics.push(topic_of(i));
    }
    (points, labels, topics)
}

/// Sentence order grouped by topic, as written.
pub fn grouped_order() -> Vec<usize> {
    (0..SENTENCES.len()).collect()
}

/// Round-robin over topics: first four points cover all four topics.
pub fn interleaved_order() -> Vec<usize> {
    (0..PER_TOPIC)
        .flat_map(|j| (0..TOPICS).map(move |t| t * PER_TOPIC + j))
        .collect()
}
