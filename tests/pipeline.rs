mod common;

use common::{grouped_order, interleaved_order, topic_dataset, PER_TOPIC, SENTENCES, TOPICS};
use rand::rngs::StdRng;
use rand::SeedableRng;
use semgroup::cluster::{select_k, Kmeans, KmeansInit, DEFAULT_MAX_CLUSTERS};
use semgroup::{
    Algorithm, AlgorithmParams, Dataset, EmbeddedText, Engine, EngineConfig, Error, Group,
    UNCLUSTERED,
};
use std::collections::{HashMap, HashSet};

fn engine(seed: u64) -> Engine {
    Engine::new(EngineConfig {
        seed: Some(seed),
        kmeans_init: KmeansInit::PlusPlus,
        kmeans_n_init: 5,
        ..EngineConfig::default()
    })
}

/// Every group holds exactly one topic, and every topic is one group.
fn assert_topics_recovered(groups: &[Group]) {
    let topic_by_label: HashMap<&str, usize> = SENTENCES
        .iter()
        .enumerate()
        .map(|(i, s)| (*s, common::topic_of(i)))
        .collect();

    assert_eq!(groups.len(), TOPICS, "groups: {groups:#?}");
    let mut seen = HashSet::new();
    for group in groups {
        assert_eq!(group.members.len(), PER_TOPIC, "{group:#?}");
        let topics: HashSet<usize> = group
            .members
            .iter()
            .map(|m| topic_by_label[m.as_str()])
            .collect();
        assert_eq!(topics.len(), 1, "mixed group: {group:#?}");
        seen.extend(topics);
    }
    assert_eq!(seen.len(), TOPICS);
}

#[test]
fn kmeans_elbow_recovers_topics() {
    let (points, labels, _) = topic_dataset(&grouped_order(), 1);
    let dataset = Dataset::new(points, labels).unwrap();

    let partition = engine(10)
        .partition(&dataset, &Algorithm::kmeans(10).unwrap())
        .unwrap();
    assert_eq!(partition.n_clusters, TOPICS);

    let groups = engine(10)
        .cluster(&dataset, &Algorithm::kmeans(10).unwrap())
        .unwrap();
    assert_topics_recovered(&groups);
    assert_eq!(groups[0].name, "group 1");
}

#[test]
fn default_config_kmeans_curve_is_monotone_and_picks_topics() {
    let config = EngineConfig::default();
    let template = Kmeans::new(1)
        .with_max_iter(config.kmeans_max_iter)
        .with_tol(config.kmeans_tol)
        .with_init(config.kmeans_init)
        .with_n_init(config.kmeans_n_init);

    for seed in 0..10 {
        let (points, labels, _) = topic_dataset(&grouped_order(), 100 + seed);
        let mut rng = StdRng::seed_from_u64(seed);
        let selection = select_k(&points, DEFAULT_MAX_CLUSTERS, &template, &mut rng).unwrap();
        let curve = &selection.curve;

        // Every split up to one past the topic count removes real spread.
        for w in curve[..=TOPICS].windows(2) {
            assert!(w[1] < w[0], "seed {seed}: curve not decreasing: {curve:?}");
        }
        // Past that, only jitter is left to split.
        for w in curve[TOPICS..].windows(2) {
            assert!(w[1] <= w[0] + 0.5, "seed {seed}: curve jumped: {curve:?}");
        }
        assert_eq!(selection.k, TOPICS, "seed {seed}: curve {curve:?}");

        let dataset = Dataset::new(points, labels).unwrap();
        let engine = Engine::new(EngineConfig {
            seed: Some(seed),
            ..EngineConfig::default()
        });
        let partition = engine
            .partition(&dataset, &Algorithm::kmeans(DEFAULT_MAX_CLUSTERS).unwrap())
            .unwrap();
        assert_eq!(partition.n_clusters, TOPICS, "seed {seed}");
    }
}

#[test]
fn hac_recovers_topics() {
    let (points, labels, _) = topic_dataset(&grouped_order(), 2);
    let dataset = Dataset::new(points, labels).unwrap();

    let groups = engine(0)
        .cluster(&dataset, &Algorithm::hac(4).unwrap())
        .unwrap();
    assert_topics_recovered(&groups);
    // Clusters are numbered by first member, so topic order is kept.
    assert_eq!(groups[0].members[0], SENTENCES[0]);
    assert_eq!(groups[3].members[0], SENTENCES[15]);
}

#[test]
fn dbscan_recovers_topics_without_noise() {
    let (points, labels, _) = topic_dataset(&grouped_order(), 3);
    let dataset = Dataset::new(points, labels).unwrap();

    let partition = engine(0)
        .partition(&dataset, &Algorithm::dbscan(1.5, 3).unwrap())
        .unwrap();
    assert_eq!(partition.n_clusters, TOPICS);
    assert_eq!(partition.n_noise, 0);

    let groups = engine(0)
        .cluster(&dataset, &Algorithm::dbscan(1.5, 3).unwrap())
        .unwrap();
    assert!(groups.iter().all(|g| g.name != UNCLUSTERED));
    assert_topics_recovered(&groups);
}

#[test]
fn dbscan_outlier_lands_in_unclustered_group() {
    let (mut points, mut labels, _) = topic_dataset(&grouped_order(), 4);
    points.push(vec![-40.0; common::DIM]);
    labels.push("Completely unrelated remark.".to_string());
    let dataset = Dataset::new(points, labels).unwrap();

    let groups = engine(0)
        .cluster(&dataset, &Algorithm::dbscan(1.5, 3).unwrap())
        .unwrap();
    assert_eq!(groups.len(), TOPICS + 1);
    let last = groups.last().unwrap();
    assert_eq!(last.name, UNCLUSTERED);
    assert_eq!(last.members, vec!["Completely unrelated remark."]);

    let total: usize = groups.iter().map(|g| g.members.len()).sum();
    assert_eq!(total, dataset.len());
}

#[test]
fn gmm_recovers_topics_when_first_points_span_topics() {
    // Means start at the first k points, so lead with one sentence per topic.
    let (points, labels, _) = topic_dataset(&interleaved_order(), 5);
    let dataset = Dataset::new(points, labels).unwrap();

    let groups = engine(6)
        .cluster(&dataset, &Algorithm::gmm(4, 100).unwrap())
        .unwrap();
    assert_topics_recovered(&groups);
}

#[test]
fn selector_and_params_drive_engine() {
    let (points, labels, _) = topic_dataset(&grouped_order(), 7);
    let dataset = Dataset::new(points, labels).unwrap();
    let params = AlgorithmParams {
        target_clusters: 4,
        ..AlgorithmParams::default()
    };

    let algorithm = Algorithm::from_selector("hac", &params).unwrap();
    let groups = engine(0).cluster(&dataset, &algorithm).unwrap();
    assert_topics_recovered(&groups);

    assert_eq!(
        Algorithm::from_selector("kmedoids", &params),
        Err(Error::UnknownAlgorithm("kmedoids".into()))
    );
}

#[test]
fn json_records_round_trip_into_groups() {
    let (points, labels, _) = topic_dataset(&grouped_order(), 8);
    let records: Vec<EmbeddedText> = labels
        .into_iter()
        .zip(points)
        .map(|(sentence, embedding)| EmbeddedText {
            sentence,
            embedding,
        })
        .collect();
    let json = serde_json::to_string(&records).unwrap();

    let dataset = Dataset::from_json(&json).unwrap();
    assert_eq!(dataset.len(), SENTENCES.len());

    let groups = engine(0)
        .cluster(&dataset, &Algorithm::hac(4).unwrap())
        .unwrap();
    let out = semgroup::groups::groups_to_json(&groups).unwrap();
    let parsed: Vec<Group> = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed, groups);
    assert!(out.contains("\"sentences\""));
}

#[test]
fn too_many_clusters_is_an_error_not_a_panic() {
    let (points, labels, _) = topic_dataset(&grouped_order()[..3], 9);
    let dataset = Dataset::new(points, labels).unwrap();

    for algorithm in [Algorithm::hac(5).unwrap(), Algorithm::gmm(5, 10).unwrap()] {
        assert_eq!(
            engine(0).cluster(&dataset, &algorithm),
            Err(Error::EmptyDataset {
                required: 5,
                available: 3
            })
        );
    }

    // The k-means sweep bound is capped at the dataset size instead.
    let groups = engine(0)
        .cluster(&dataset, &Algorithm::kmeans(10).unwrap())
        .unwrap();
    assert_eq!(groups.iter().map(|g| g.members.len()).sum::<usize>(), 3);
}
