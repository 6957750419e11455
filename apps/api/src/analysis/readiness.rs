/// XP granted per submitted skill.
pub const XP_PER_SKILL: usize = 50;
/// XP needed per level.
pub const XP_PER_LEVEL: usize = 100;

/// Game stats for one career/skill-set pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    /// `floor(submitted / required × 100)`. Counts submitted skills, not overlap,
    /// and is not capped at 100.
    pub readiness: usize,
    pub xp: usize,
    pub level: usize,
    /// Required skills absent from the submission, in catalog order.
    pub missing: Vec<String>,
}

/// Scores a submitted skill list against the required skills of a career.
///
/// An empty `required` list (unknown career) always scores 0 readiness with nothing missing.
pub fn compute_readiness(required: &[String], submitted: &[String]) -> Readiness {
    let readiness = if required.is_empty() {
        0
    } else {
        submitted.len() * 100 / required.len()
    };

    let xp = submitted.len() * XP_PER_SKILL;

    let missing = required
        .iter()
        .filter(|skill| !submitted.contains(skill))
        .cloned()
        .collect();

    Readiness {
        readiness,
        xp,
        level: xp / XP_PER_LEVEL,
        missing,
    }
}
