use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::gateway::QuestionGateway;
use crate::models::{MasteryLevel, QuestionItem};
use crate::view::FilteredView;

/// Serializes mastery toggles per item.
///
/// Two rapid toggles for the same item must not both read the same stale
/// level, so a toggle is a begin/settle pair: [`PendingUpdates::begin`]
/// computes the target level from the current local copy and marks the item
/// in flight, and [`PendingUpdates::settle`] applies the outcome. A second
/// `begin` while the first is outstanding is refused with
/// [`Error::UpdateInFlight`]; the caller retries after the first settles.
#[derive(Debug, Clone, Default)]
pub struct PendingUpdates {
    in_flight: HashSet<i64>,
}

impl PendingUpdates {
    pub fn new() -> Self {
        PendingUpdates::default()
    }

    /// Start a toggle: returns the level the item advances to
    pub fn begin(&mut self, view: &FilteredView<QuestionItem>, id: i64) -> Result<MasteryLevel> {
        if self.in_flight.contains(&id) {
            return Err(Error::UpdateInFlight(id));
        }
        let item = view
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("question {}", id)))?;
        self.in_flight.insert(id);
        Ok(item.mastery_level.next())
    }

    /// Apply the network outcome. On success the local copy is patched in
    /// place (not re-fetched); on failure it is left unchanged and the error
    /// is passed back to the caller.
    pub fn settle(
        &mut self,
        view: &mut FilteredView<QuestionItem>,
        id: i64,
        level: MasteryLevel,
        outcome: Result<()>,
    ) -> Result<MasteryLevel> {
        self.in_flight.remove(&id);
        outcome?;
        if let Some(item) = view.get(id) {
            let mut patched = item.clone();
            patched.mastery_level = level;
            view.replace_item(patched);
        }
        Ok(level)
    }

    /// Full toggle for synchronous callers: begin, issue the update through
    /// the gateway, settle.
    pub fn advance(
        &mut self,
        view: &mut FilteredView<QuestionItem>,
        gateway: &dyn QuestionGateway,
        id: i64,
    ) -> Result<MasteryLevel> {
        let level = self.begin(view, id)?;
        let outcome = gateway.update_mastery(id, level);
        self.settle(view, id, level, outcome)
    }

    pub fn is_in_flight(&self, id: i64) -> bool {
        self.in_flight.contains(&id)
    }

    /// Merge semantics on collection refresh: drop pending entries whose
    /// items left the collection.
    pub fn retain_known(&mut self, view: &FilteredView<QuestionItem>) {
        self.in_flight.retain(|id| view.get(*id).is_some());
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use std::cell::RefCell;

    use super::*;
    use crate::models::{MasteryStats, NewQuestion};
    use chrono::Utc;

    fn question(id: i64, level: MasteryLevel) -> QuestionItem {
        QuestionItem {
            id,
            category: "Go".to_string(),
            content: "content".to_string(),
            answer: "answer".to_string(),
            mastery_level: level,
            ctime: Utc::now(),
            utime: Utc::now(),
        }
    }

    /// Gateway double that records calls and fails on demand
    struct FakeGateway {
        fail: bool,
        calls: RefCell<Vec<(i64, MasteryLevel)>>,
    }

    impl FakeGateway {
        fn new(fail: bool) -> Self {
            FakeGateway {
                fail,
                calls: RefCell::new(vec![]),
            }
        }
    }

    impl QuestionGateway for FakeGateway {
        fn list_all(&self) -> Result<Vec<QuestionItem>> {
            Ok(vec![])
        }
        fn list_by_category(&self, _category: &str) -> Result<Vec<QuestionItem>> {
            Ok(vec![])
        }
        fn list_categories(&self) -> Result<Vec<String>> {
            Ok(vec![])
        }
        fn mastery_stats(&self) -> Result<MasteryStats> {
            Ok(MasteryStats::default())
        }
        fn create(&self, _question: &NewQuestion) -> Result<()> {
            Ok(())
        }
        fn update(&self, _id: i64, _question: &NewQuestion) -> Result<()> {
            Ok(())
        }
        fn update_mastery(&self, id: i64, level: MasteryLevel) -> Result<()> {
            self.calls.borrow_mut().push((id, level));
            if self.fail {
                Err(Error::Transport("connection reset".to_string()))
            } else {
                Ok(())
            }
        }
        fn delete(&self, _id: i64) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_three_advances_return_to_original_level() {
        let mut view = FilteredView::new(10);
        view.set_source_collection(vec![question(1, MasteryLevel::Learning)]);
        let gateway = FakeGateway::new(false);
        let mut pending = PendingUpdates::new();

        pending.advance(&mut view, &gateway, 1).unwrap();
        pending.advance(&mut view, &gateway, 1).unwrap();
        pending.advance(&mut view, &gateway, 1).unwrap();

        assert_eq!(view.get(1).unwrap().mastery_level, MasteryLevel::Learning);
        assert_eq!(
            gateway.calls.borrow().as_slice(),
            &[
                (1, MasteryLevel::Mastered),
                (1, MasteryLevel::Unlearned),
                (1, MasteryLevel::Learning),
            ]
        );
    }

    #[test]
    fn test_second_begin_refused_while_in_flight() {
        let mut view = FilteredView::new(10);
        view.set_source_collection(vec![question(1, MasteryLevel::Unlearned)]);
        let mut pending = PendingUpdates::new();

        let level = pending.begin(&view, 1).unwrap();
        assert_eq!(level, MasteryLevel::Learning);
        assert_eq!(pending.begin(&view, 1), Err(Error::UpdateInFlight(1)));

        // A different item is not blocked
        view.set_source_collection(vec![
            question(1, MasteryLevel::Unlearned),
            question(2, MasteryLevel::Unlearned),
        ]);
        assert!(pending.begin(&view, 2).is_ok());

        // After settling, the first item can advance again, from the
        // then-current level
        pending.settle(&mut view, 1, level, Ok(())).unwrap();
        assert_eq!(pending.begin(&view, 1).unwrap(), MasteryLevel::Mastered);
    }

    #[test]
    fn test_failed_update_leaves_local_copy_unchanged() {
        let mut view = FilteredView::new(10);
        view.set_source_collection(vec![question(1, MasteryLevel::Mastered)]);
        let gateway = FakeGateway::new(true);
        let mut pending = PendingUpdates::new();

        let err = pending.advance(&mut view, &gateway, 1).unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(view.get(1).unwrap().mastery_level, MasteryLevel::Mastered);
        assert!(!pending.is_in_flight(1));
    }

    #[test]
    fn test_unknown_item_is_not_found() {
        let view = FilteredView::new(10);
        let mut pending = PendingUpdates::new();
        assert!(matches!(
            pending.begin(&view, 42),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_retain_known_drops_departed_ids() {
        let mut view = FilteredView::new(10);
        view.set_source_collection(vec![question(1, MasteryLevel::Unlearned)]);
        let mut pending = PendingUpdates::new();
        pending.begin(&view, 1).unwrap();

        view.set_source_collection(vec![question(2, MasteryLevel::Unlearned)]);
        pending.retain_known(&view);
        assert!(!pending.is_in_flight(1));
    }
}
