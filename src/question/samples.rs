use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::types::Question;

/// The fixed sample the analysis report runs on when no file is given.
pub fn sample_questions() -> Vec<Question> {
    vec![
        Question::new(
            "Complétez le motif: Quel forme manque dans cette séquence?",
            "spatial",
            1,
            "A",
        ),
        Question::new("Continuez la séquence: 2, 4, 6, 8, ?", "numerique", 1, "A"),
        Question::new(
            "Matrice 2x2 avec rotation: trouvez l'élément manquant",
            "spatial",
            3,
            "B",
        ),
        Question::new("Suite de Fibonacci: 1, 1, 2, 3, 5, ?", "numerique", 4, "B"),
        Question::new(
            "Théorie des ensembles: P(A∪B) si |A|=3, |B|=4, |A∩B|=1",
            "logique",
            6,
            "C",
        ),
        Question::new(
            "Transformation géométrique en 4 dimensions",
            "spatial",
            8,
            "D",
        ),
        Question::new(
            "Fractal auto-similaire avec itérations complexes",
            "spatial",
            9,
            "E",
        ),
    ]
}

/// Load a YAML list of questions.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a YAML sequence of
/// question records.
pub fn load_questions(path: &Path) -> Result<Vec<Question>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read questions file at {}", path.display()))?;

    let questions: Vec<Question> = serde_saphyr::from_str(&content)
        .with_context(|| format!("Failed to parse questions: invalid YAML in {}", path.display()))?;

    Ok(questions)
}
