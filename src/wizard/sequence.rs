//! Ordered step list with a current position.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::error::WizardError;
use super::step::Step;

/// Outcome of a navigation operation.
///
/// `navigate_to` is set when the operation moved the current position and the
/// view should switch to that step. `persisted` is set by the session layer
/// once the new state has been written; the sequencer itself never sets it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Transition {
    pub persisted: bool,
    pub navigate_to: Option<String>,
}

impl Transition {
    /// A transition to `step_id` that still has to be written
    pub fn navigate(step_id: impl Into<String>) -> Self {
        Self {
            persisted: false,
            navigate_to: Some(step_id.into()),
        }
    }

    /// No navigation and nothing to write
    pub fn none() -> Self {
        Self::default()
    }

    /// Returns true if the view should move to another step
    pub fn is_navigation(&self) -> bool {
        self.navigate_to.is_some()
    }

    /// Mark the transition as written to the session store
    pub fn mark_persisted(mut self) -> Self {
        self.persisted = true;
        self
    }
}

/// Link back to the step preceding the current one
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BackLink {
    pub step_id: String,
    pub label: String,
}

/// A fixed list of wizard steps and the identifier of the current step.
///
/// The step list is set at construction and never changes afterwards. The
/// current step starts out as the empty string until [`first_step`] or
/// [`set_step`] is called.
///
/// [`first_step`]: StepSequence::first_step
/// [`set_step`]: StepSequence::set_step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StepSequence {
    steps: Vec<Step>,
    #[serde(default)]
    current_step: String,
}

impl StepSequence {
    pub fn new<I, S>(steps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Step>,
    {
        Self {
            steps: steps.into_iter().map(Into::into).collect(),
            current_step: String::new(),
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Identifier of the current step, empty if no step has been set yet
    pub fn current_step(&self) -> &str {
        &self.current_step
    }

    /// Index of the first step matching the current identifier
    pub fn position(&self) -> Option<usize> {
        self.steps.iter().position(|s| s.matches(&self.current_step))
    }

    /// The step matching the current identifier, if any
    pub fn current(&self) -> Option<&Step> {
        self.position().map(|i| &self.steps[i])
    }

    pub fn is_first(&self) -> bool {
        self.position() == Some(0)
    }

    pub fn is_last(&self) -> bool {
        self.position().is_some_and(|i| i + 1 == self.steps.len())
    }

    /// Move to the first step of the sequence
    pub fn first_step(&mut self) -> Result<Transition, WizardError> {
        let first = self.steps.first().ok_or(WizardError::InvalidSequence)?;
        let id = first.id.clone();
        Ok(self.go_to(id))
    }

    /// Jump straight to `step_id`.
    ///
    /// Membership is not checked: an identifier that is not part of the
    /// sequence is stored as-is, and later `next_step`/`previous_step` calls
    /// find no match and do nothing.
    pub fn set_step(&mut self, step_id: &str) -> Transition {
        self.go_to(step_id.to_string())
    }

    /// Move to the step after the current one
    pub fn next_step(&mut self) -> Transition {
        match self.position() {
            Some(i) if i + 1 < self.steps.len() => {
                let id = self.steps[i + 1].id.clone();
                self.go_to(id)
            }
            _ => {
                tracing::debug!(current = %self.current_step, "No next step");
                Transition::none()
            }
        }
    }

    /// Move to the step before the current one
    pub fn previous_step(&mut self) -> Transition {
        match self.position() {
            Some(i) if i > 0 => {
                let id = self.steps[i - 1].id.clone();
                self.go_to(id)
            }
            _ => {
                tracing::debug!(current = %self.current_step, "No previous step");
                Transition::none()
            }
        }
    }

    /// Links back to the previous step, one for every non-first step that
    /// matches the current identifier.
    pub fn previous_next_links(&self) -> Vec<BackLink> {
        self.steps
            .windows(2)
            .filter(|pair| pair[1].matches(&self.current_step))
            .map(|pair| BackLink {
                step_id: pair[0].id.clone(),
                label: pair[0].label.clone(),
            })
            .collect()
    }

    /// The back link for the current step, if it has a predecessor
    pub fn back_link(&self) -> Option<BackLink> {
        self.previous_next_links().into_iter().next()
    }

    fn go_to(&mut self, step_id: String) -> Transition {
        tracing::debug!(from = %self.current_step, to = %step_id, "Step transition");
        self.current_step = step_id.clone();
        Transition::navigate(step_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> StepSequence {
        StepSequence::new([("A", "Alpha"), ("B", "Beta"), ("C", "Gamma")])
    }

    fn scenario() -> StepSequence {
        StepSequence::new([
            ("init", "Start"),
            ("params", "Parameters"),
            ("review", "Review"),
        ])
    }

    #[test]
    fn test_new_sequence_has_no_current_step() {
        let seq = abc();
        assert_eq!(seq.current_step(), "");
        assert_eq!(seq.position(), None);
        assert!(seq.current().is_none());
    }

    #[test]
    fn test_first_step() {
        let mut seq = abc();
        let t = seq.first_step().unwrap();
        assert_eq!(t.navigate_to.as_deref(), Some("A"));
        assert!(!t.persisted);
        assert_eq!(seq.current_step(), "A");
        assert!(seq.is_first());
    }

    #[test]
    fn test_first_step_on_empty_sequence() {
        let mut seq = StepSequence::new(Vec::<Step>::new());
        assert_eq!(seq.first_step(), Err(WizardError::InvalidSequence));
        assert_eq!(seq.current_step(), "");
    }

    #[test]
    fn test_next_step_walks_every_position() {
        let mut seq = abc();
        let ids: Vec<String> = seq.steps().iter().map(|s| s.id.clone()).collect();
        for i in 0..ids.len() - 1 {
            seq.set_step(&ids[i]);
            let t = seq.next_step();
            assert_eq!(t.navigate_to.as_deref(), Some(ids[i + 1].as_str()));
            assert_eq!(seq.current_step(), ids[i + 1]);
        }

        seq.set_step("C");
        assert_eq!(seq.next_step(), Transition::none());
        assert_eq!(seq.current_step(), "C");
        assert!(seq.is_last());
    }

    #[test]
    fn test_previous_step() {
        let mut seq = abc();
        seq.set_step("C");
        assert_eq!(seq.previous_step().navigate_to.as_deref(), Some("B"));
        assert_eq!(seq.previous_step().navigate_to.as_deref(), Some("A"));
        assert_eq!(seq.previous_step(), Transition::none());
        assert_eq!(seq.current_step(), "A");
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let mut seq = StepSequence::new([("step1", "One"), ("step2", "Two")]);
        seq.set_step("Step1");
        assert_eq!(seq.position(), Some(0));
        assert_eq!(seq.next_step().navigate_to.as_deref(), Some("step2"));

        seq.set_step("STEP2");
        assert_eq!(seq.previous_step().navigate_to.as_deref(), Some("step1"));
    }

    #[test]
    fn test_duplicate_ids_differing_in_case_first_match_wins() {
        let mut seq =
            StepSequence::new([("Review", "First"), ("review", "Second"), ("done", "Done")]);
        seq.set_step("review");
        assert_eq!(seq.position(), Some(0));
        assert_eq!(seq.next_step().navigate_to.as_deref(), Some("review"));
        // Still resolves to the first "Review", so there is no way past it
        assert_eq!(seq.next_step().navigate_to.as_deref(), Some("review"));
    }

    #[test]
    fn test_set_step_accepts_unknown_id() {
        let mut seq = abc();
        let t = seq.set_step("nonexistent");
        assert_eq!(t.navigate_to.as_deref(), Some("nonexistent"));
        assert_eq!(seq.current_step(), "nonexistent");

        assert_eq!(seq.next_step(), Transition::none());
        assert_eq!(seq.previous_step(), Transition::none());
        assert_eq!(seq.current_step(), "nonexistent");
    }

    #[test]
    fn test_previous_next_links() {
        let mut seq = abc();
        seq.set_step("B");
        assert_eq!(
            seq.previous_next_links(),
            vec![BackLink {
                step_id: "A".to_string(),
                label: "Alpha".to_string(),
            }]
        );

        seq.set_step("A");
        assert!(seq.previous_next_links().is_empty());
        assert!(seq.back_link().is_none());

        seq.set_step("missing");
        assert!(seq.previous_next_links().is_empty());
    }

    #[test]
    fn test_back_link_is_case_insensitive() {
        let mut seq = abc();
        seq.set_step("c");
        assert_eq!(seq.back_link().map(|l| l.step_id), Some("B".to_string()));
    }

    #[test]
    fn test_serde_round_trip() {
        let mut seq = scenario();
        seq.first_step().unwrap();
        seq.next_step();

        let json = serde_json::to_string(&seq).unwrap();
        let restored: StepSequence = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, seq);
        assert_eq!(restored.current_step(), "params");
        assert_eq!(restored.steps(), seq.steps());
    }

    #[test]
    fn test_deserialize_without_current_step() {
        let restored: StepSequence =
            serde_json::from_str(r#"{"steps":[{"id":"a","label":"A"}]}"#).unwrap();
        assert_eq!(restored.current_step(), "");
        assert_eq!(restored.len(), 1);
    }

    #[test]
    fn test_scenario_walkthrough() {
        let mut seq = scenario();

        let t = seq.first_step().unwrap();
        assert_eq!(t.navigate_to.as_deref(), Some("init"));
        assert_eq!(seq.current_step(), "init");

        assert_eq!(seq.next_step().navigate_to.as_deref(), Some("params"));
        assert_eq!(seq.current_step(), "params");

        assert_eq!(seq.next_step().navigate_to.as_deref(), Some("review"));
        assert_eq!(seq.current_step(), "review");

        assert!(!seq.next_step().is_navigation());
        assert_eq!(seq.current_step(), "review");
    }
}
