use std::collections::HashSet;

/// The single shared selection/hover state every view reads. Selection and
/// hover are independent: a hovered record need not be selected. Each
/// mutation replaces the whole relevant field; there is no incremental
/// add/remove in the current scope.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SelectionState {
    selected: HashSet<usize>,
    hovered: Option<usize>,
}

/// A selection mutation requested by a view. Views return these from their
/// draw pass instead of mutating state mid-render; the coordinator applies
/// them afterward, so a mutation can never re-enter the render that produced
/// it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionEvent {
    Select(usize),
    SelectGroup(Vec<usize>),
    Brush(Vec<usize>),
    Clear,
    HoverEnter(usize),
    HoverLeave,
}

impl SelectionState {
    pub fn selected(&self) -> &HashSet<usize> {
        &self.selected
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn selection_len(&self) -> usize {
        self.selected.len()
    }

    pub fn click(&mut self, index: usize) {
        self.selected = HashSet::from([index]);
    }

    pub fn click_group(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.selected = indices.into_iter().collect();
    }

    pub fn brush_end(&mut self, indices: impl IntoIterator<Item = usize>) {
        self.selected = indices.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn hover_enter(&mut self, index: usize) {
        self.hovered = Some(index);
    }

    pub fn hover_leave(&mut self) {
        self.hovered = None;
    }

    /// Drops identifiers that are no longer part of the dataset, e.g. after a
    /// reload replaced it with a shorter one. Never an error.
    pub fn retain_valid(&mut self, dataset_len: usize) {
        self.selected.retain(|index| *index < dataset_len);
        if self.hovered.is_some_and(|index| index >= dataset_len) {
            self.hovered = None;
        }
    }

    /// Applies one view event. Stale record references are dropped silently
    /// rather than selected.
    pub fn apply(&mut self, event: SelectionEvent, dataset_len: usize) {
        match event {
            SelectionEvent::Select(index) => {
                if index < dataset_len {
                    self.click(index);
                }
            }
            SelectionEvent::SelectGroup(indices) => {
                self.click_group(indices.into_iter().filter(|index| *index < dataset_len));
            }
            SelectionEvent::Brush(indices) => {
                self.brush_end(indices.into_iter().filter(|index| *index < dataset_len));
            }
            SelectionEvent::Clear => self.clear(),
            SelectionEvent::HoverEnter(index) => {
                if index < dataset_len {
                    self.hover_enter(index);
                }
            }
            SelectionEvent::HoverLeave => self.hover_leave(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_replaces_the_prior_selection() {
        let mut state = SelectionState::default();
        state.click(1);
        state.click(2);
        assert_eq!(state.selected(), &HashSet::from([2]));
    }

    #[test]
    fn group_click_yields_exactly_the_group_set() {
        let mut state = SelectionState::default();
        state.click(9);
        state.click_group([1, 2, 3]);
        assert_eq!(state.selected(), &HashSet::from([1, 2, 3]));
        assert!([1, 2, 3].iter().all(|index| state.is_selected(*index)));
        assert!(!state.is_selected(9));
    }

    #[test]
    fn empty_brush_clears_the_selection() {
        let mut state = SelectionState::default();
        state.click_group([1, 2]);
        state.brush_end([]);
        assert!(!state.has_selection());
    }

    #[test]
    fn hover_is_independent_of_selection() {
        let mut state = SelectionState::default();
        state.click(1);
        state.hover_enter(7);
        assert_eq!(state.hovered(), Some(7));
        assert!(!state.is_selected(7));

        state.hover_leave();
        assert_eq!(state.hovered(), None);
        assert!(state.is_selected(1));
    }

    #[test]
    fn retain_valid_drops_stale_identifiers() {
        let mut state = SelectionState::default();
        state.click_group([0, 3, 9]);
        state.hover_enter(9);
        state.retain_valid(4);
        assert_eq!(state.selected(), &HashSet::from([0, 3]));
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn apply_drops_stale_event_references() {
        let mut state = SelectionState::default();
        state.apply(SelectionEvent::Select(10), 5);
        assert!(!state.has_selection());

        state.apply(SelectionEvent::SelectGroup(vec![1, 8, 2]), 5);
        assert_eq!(state.selected(), &HashSet::from([1, 2]));

        state.apply(SelectionEvent::HoverEnter(8), 5);
        assert_eq!(state.hovered(), None);
    }

    #[test]
    fn apply_covers_every_transition() {
        let mut state = SelectionState::default();
        state.apply(SelectionEvent::Select(0), 3);
        assert_eq!(state.selection_len(), 1);

        state.apply(SelectionEvent::Brush(vec![0, 1, 2]), 3);
        assert_eq!(state.selection_len(), 3);

        state.apply(SelectionEvent::HoverEnter(1), 3);
        state.apply(SelectionEvent::HoverLeave, 3);
        assert_eq!(state.hovered(), None);

        state.apply(SelectionEvent::Clear, 3);
        assert!(!state.has_selection());
    }
}
