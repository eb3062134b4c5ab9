//! Modal stack for managing overlays
//!
//! Only the top modal receives input. Alerts block the form until dismissed.

/// Represents a modal overlay that can be displayed on top of the main UI
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    /// Blocking notification backed by the session's current alert
    Alert,
    /// Quit confirmation dialog
    QuitConfirm,
    /// Help dialog showing all keyboard shortcuts
    Help,
}

/// A stack of modal overlays
///
/// Modals are rendered from bottom to top, with only the top modal
/// receiving input events.
#[derive(Debug, Default)]
pub struct ModalStack {
    stack: Vec<Modal>,
}

impl ModalStack {
    pub fn new() -> Self {
        Self { stack: Vec::new() }
    }

    pub fn push(&mut self, modal: Modal) {
        self.stack.push(modal);
    }

    pub fn pop(&mut self) -> Option<Modal> {
        self.stack.pop()
    }

    pub fn top(&self) -> Option<&Modal> {
        self.stack.last()
    }

    pub fn contains(&self, modal: &Modal) -> bool {
        self.stack.contains(modal)
    }

    /// Remove every occurrence of a modal, wherever it sits in the stack
    pub fn remove(&mut self, modal: &Modal) {
        self.stack.retain(|m| m != modal);
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modal_stack_push_pop() {
        let mut stack = ModalStack::new();
        assert!(stack.top().is_none());

        stack.push(Modal::QuitConfirm);
        stack.push(Modal::Alert);

        assert_eq!(stack.pop(), Some(Modal::Alert));
        assert_eq!(stack.pop(), Some(Modal::QuitConfirm));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_remove_from_middle() {
        let mut stack = ModalStack::new();
        stack.push(Modal::Alert);
        stack.push(Modal::Help);

        assert!(stack.contains(&Modal::Alert));
        stack.remove(&Modal::Alert);
        assert!(!stack.contains(&Modal::Alert));
        assert_eq!(stack.top(), Some(&Modal::Help));
    }
}
