use std::fs;

use tempfile::TempDir;
use testiq_visuals::config::{load_config, validate_config, write_default_config, Config};
use testiq_visuals::question::{load_questions, sample_questions, Question};
use testiq_visuals::render::{
    decode_data_uri, generate_visual_for_question, select_visual, write_png, RenderConfig,
    SequenceKind, VisualGenerator, VisualKind, DATA_URI_PREFIX,
};
use testiq_visuals::report::run_analysis;
use testiq_visuals::scoring::{analyze_question, Priority, ScoringConfig, VisualType};

fn png_size(uri: &str) -> (u32, u32) {
    let bytes = decode_data_uri(uri).unwrap();
    image::load_from_memory(&bytes).unwrap().to_rgb8().dimensions()
}

fn small_generator() -> VisualGenerator {
    VisualGenerator::new(&RenderConfig {
        dpi: 12,
        ..RenderConfig::default()
    })
    .unwrap()
}

#[test]
fn fibonacci_scores_medium_sequences() {
    let q = Question::new("Suite de Fibonacci: 1, 1, 2, 3, 5, ?", "numerique", 4, "B");
    let analysis = analyze_question(&q, &ScoringConfig::default());
    assert_eq!(analysis.visual_score, 45);
    assert!(analysis.visual_needed);
    assert_eq!(analysis.priority, Priority::Medium);
    assert_eq!(analysis.visual_type, VisualType::Sequences);
}

#[test]
fn four_dimensional_transformation_scores_high() {
    let q = Question::new("Transformation géométrique en 4 dimensions", "spatial", 8, "D");
    let analysis = analyze_question(&q, &ScoringConfig::default());
    assert_eq!(analysis.visual_score, 65);
    assert_eq!(analysis.priority, Priority::High);
    assert_eq!(analysis.visual_type, VisualType::Matrices);
    assert_eq!(analysis.matched_keywords, vec!["transformation".to_string()]);
}

#[test]
fn sample_report_totals() {
    let summary = run_analysis(&sample_questions(), &ScoringConfig::default());
    assert_eq!(summary.total_analyzed, 7);
    assert_eq!(summary.needs_visual, 6);
    assert_eq!(summary.priorities.high, 5);
}

#[test]
fn scores_stay_within_bounds() {
    let q = Question::new(
        "Matrice rotation symétrie transformation séquence motif ensemble fractal 3d",
        "spatial",
        10,
        "E",
    );
    let analysis = analyze_question(&q, &ScoringConfig::default());
    assert_eq!(analysis.visual_score, 100);
}

#[test]
fn dispatch_and_render_sample_inputs() {
    let generator = small_generator();

    let matrix = Question::with_category("Matrice 2x2 avec rotation: trouvez l'élément manquant", "spatial");
    assert_eq!(select_visual(&matrix), Some(VisualKind::MatrixRotation));
    let uri = generate_visual_for_question("Q14", &matrix, &generator).unwrap();
    assert!(uri.starts_with(DATA_URI_PREFIX));
    assert_eq!(png_size(&uri), (168, 84));

    let venn = Question::with_category("Principe inclusion-exclusion ensembles A et B", "logique");
    assert_eq!(select_visual(&venn), Some(VisualKind::Venn));
    let uri = generate_visual_for_question("Q45", &venn, &generator).unwrap();
    assert_eq!(png_size(&uri), (192, 96));
}

#[test]
fn fibonacci_question_gets_fibonacci_sequence() {
    let q = Question::with_category("Suite de Fibonacci: 1, 1, 2, 3, 5, ?", "numerique");
    match select_visual(&q) {
        Some(VisualKind::Sequence(kind, data)) => {
            assert_eq!(kind, SequenceKind::Fibonacci);
            assert_eq!(data, &[1, 1, 2, 3, 5, 8, 13]);
        }
        other => panic!("unexpected selection: {:?}", other),
    }
}

#[test]
fn unmatched_question_renders_nothing() {
    let q = Question::with_category("Quelle est la capitale de la France ?", "culture");
    let uri = generate_visual_for_question("Q99", &q, &small_generator()).unwrap();
    assert!(uri.is_empty());
}

#[test]
fn written_png_matches_data_uri() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("logic.png");
    let uri = small_generator().logic_diagram().unwrap();

    write_png(&path, &uri).unwrap();
    assert_eq!(fs::read(&path).unwrap(), decode_data_uri(&uri).unwrap());
}

#[test]
fn config_file_roundtrip_and_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");

    write_default_config(&path, false).unwrap();
    let config = load_config(Some(path)).unwrap();
    assert_eq!(config, Config::default());
    assert!(validate_config(&config).is_ok());

    let bad = dir.path().join("bad.yaml");
    fs::write(&bad, "render:\n  dpi: 5\n  accent: blue\n").unwrap();
    let errors = validate_config(&load_config(Some(bad)).unwrap()).unwrap_err();
    assert_eq!(errors.len(), 2);
}

#[test]
fn questions_file_drives_report() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("questions.yaml");
    fs::write(
        &path,
        "- content: \"Matrice 2x2 avec rotation\"\n  category: spatial\n  difficulty: 3\n  series: B\n- content: \"Calcul mental\"\n",
    )
    .unwrap();

    let questions = load_questions(&path).unwrap();
    let summary = run_analysis(&questions, &ScoringConfig::default());
    assert_eq!(summary.total_analyzed, 2);
    assert_eq!(summary.needs_visual, 1);
}

#[test]
fn negative_difficulty_loads_and_earns_no_bonus() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("questions.yaml");
    fs::write(&path, "- content: \"Calcul mental\"\n  difficulty: -1\n").unwrap();

    let questions = load_questions(&path).unwrap();
    assert_eq!(questions[0].difficulty, -1);
    let analysis = analyze_question(&questions[0], &ScoringConfig::default());
    assert_eq!(analysis.visual_score, 0);
}

#[test]
fn extreme_sequence_terms_render() {
    let uri = small_generator()
        .sequence(SequenceKind::Arithmetic, &[-2, i64::MAX])
        .unwrap();
    assert!(uri.starts_with(DATA_URI_PREFIX));
}
