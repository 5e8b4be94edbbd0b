use serde::Serialize;
use utoipa::ToSchema;

/// The four scored criteria and their caps.
///
/// These caps are the single rubric used for server-side validation and for
/// what the rubric endpoint advertises to clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    Innovation,
    Creativity,
    TechnicalImplementation,
    UseOfGoogleTechnology,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Innovation,
        Criterion::Creativity,
        Criterion::TechnicalImplementation,
        Criterion::UseOfGoogleTechnology,
    ];

    pub fn max_score(self) -> f64 {
        match self {
            Criterion::Innovation => 15.0,
            Criterion::Creativity => 15.0,
            Criterion::TechnicalImplementation => 20.0,
            Criterion::UseOfGoogleTechnology => 10.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Criterion::Innovation => "Innovation",
            Criterion::Creativity => "Creativity",
            Criterion::TechnicalImplementation => "Technical Implementation",
            Criterion::UseOfGoogleTechnology => "Use of Google Technology",
        }
    }

    pub fn accepts(self, score: f64) -> bool {
        score.is_finite() && (0.0..=self.max_score()).contains(&score)
    }
}

pub fn max_total_score() -> f64 {
    Criterion::ALL.iter().map(|c| c.max_score()).sum()
}
