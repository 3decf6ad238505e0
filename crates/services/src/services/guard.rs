//! Confirmation guard: the attention-check state machine in front of every
//! destructive or role-changing mutation.
//!
//! The code is a deterrent against misclicks, not a security control. It is
//! generated locally, displayed to the operator, compared locally, and
//! discarded on close. It has no expiry and no attempt limit, is never sent
//! to the store and never verified remotely. Anything security-relevant is
//! enforced by the store's own access rules.

use rand::Rng;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Inline message shown when the entered code does not match.
pub const INVALID_CODE_MESSAGE: &str = "Invalid code. Please try again.";

/// Required code length: 4 digits for deletions, 6 for role/status changes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
pub enum CodeLength {
    Four,
    Six,
}

impl CodeLength {
    pub fn digits(self) -> usize {
        match self {
            CodeLength::Four => 4,
            CodeLength::Six => 6,
        }
    }
}

/// Draw a code uniformly from the full no-leading-zero range, so the result
/// is always exactly N visible digits.
pub fn generate_code(length: CodeLength) -> String {
    let mut rng = rand::thread_rng();
    match length {
        CodeLength::Four => rng.gen_range(1000..=9999).to_string(),
        CodeLength::Six => rng.gen_range(100_000..=999_999).to_string(),
    }
}

/// Result of submitting an entered code.
#[derive(Debug, PartialEq, Eq)]
pub enum Verification<T> {
    /// Entered text matched byte-for-byte. The dialog is closed, the guard is
    /// reset, and the pending mutation is handed back for execution.
    Verified(T),
    /// Mismatch. The dialog stays open with the same code; the caller clears
    /// the entered text and may retry without limit.
    Rejected,
    /// No dialog is open.
    NotOpen,
}

/// One guard instance, owning at most one live code and pending mutation.
///
/// States: `Idle -> CodeDisplayed -> (verify) -> Idle`. Opening while a code
/// is already displayed discards the previous code; codes are never reused
/// across actions or sessions.
#[derive(Debug)]
pub struct ConfirmationGuard<T> {
    state: GuardState<T>,
}

#[derive(Debug)]
enum GuardState<T> {
    Idle,
    CodeDisplayed { code: String, pending: T },
}

impl<T> Default for ConfirmationGuard<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ConfirmationGuard<T> {
    pub fn new() -> Self {
        Self {
            state: GuardState::Idle,
        }
    }

    /// Open the dialog for a mutation: generate a fresh code, discard any
    /// previous one, and return the code for display.
    pub fn open(&mut self, pending: T, length: CodeLength) -> &str {
        self.state = GuardState::CodeDisplayed {
            code: generate_code(length),
            pending,
        };
        match &self.state {
            GuardState::CodeDisplayed { code, .. } => code,
            GuardState::Idle => unreachable!("state was just set"),
        }
    }

    /// The displayed code, while a dialog is open.
    pub fn code(&self) -> Option<&str> {
        match &self.state {
            GuardState::CodeDisplayed { code, .. } => Some(code),
            GuardState::Idle => None,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GuardState::CodeDisplayed { .. })
    }

    /// Whether the confirm affordance is enabled: the entered text must have
    /// as many characters as the code has digits. Characters, not bytes, so
    /// pasted multi-byte input cannot enable the affordance early.
    pub fn can_confirm(&self, entered: &str) -> bool {
        match &self.state {
            GuardState::CodeDisplayed { code, .. } => entered.chars().count() == code.len(),
            GuardState::Idle => false,
        }
    }

    /// Compare the entered text against the displayed code, byte-for-byte.
    /// String comparison, not numeric: "07842" never matches "7842".
    pub fn confirm(&mut self, entered: &str) -> Verification<T> {
        match &self.state {
            GuardState::Idle => Verification::NotOpen,
            GuardState::CodeDisplayed { code, .. } if entered != code => Verification::Rejected,
            GuardState::CodeDisplayed { .. } => {
                match std::mem::replace(&mut self.state, GuardState::Idle) {
                    GuardState::CodeDisplayed { pending, .. } => Verification::Verified(pending),
                    GuardState::Idle => unreachable!("matched CodeDisplayed above"),
                }
            }
        }
    }

    /// Abandon the dialog, discarding the code and pending mutation with no
    /// side effect. Valid in any state.
    pub fn cancel(&mut self) {
        self.state = GuardState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_exactly_n_digits_with_no_leading_zero() {
        for _ in 0..500 {
            let four = generate_code(CodeLength::Four);
            assert_eq!(four.len(), 4);
            assert!(four.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(four.as_bytes()[0], b'0');

            let six = generate_code(CodeLength::Six);
            assert_eq!(six.len(), 6);
            assert!(six.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(six.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn exact_match_hands_back_the_pending_mutation_and_resets() {
        let mut guard = ConfirmationGuard::new();
        guard.open("delete item", CodeLength::Four);
        let code = guard.code().unwrap().to_string();

        assert_eq!(guard.confirm(&code), Verification::Verified("delete item"));
        assert!(!guard.is_open());
        // The code was consumed; a second submit hits a closed dialog.
        assert_eq!(guard.confirm(&code), Verification::NotOpen);
    }

    #[test]
    fn mismatch_keeps_the_dialog_open_with_the_same_code() {
        let mut guard = ConfirmationGuard::new();
        guard.open((), CodeLength::Four);
        let code = guard.code().unwrap().to_string();

        // The operator is shown the inline message and keeps the same code.
        assert_eq!(guard.confirm(&code[..3]), Verification::Rejected);
        assert_eq!(INVALID_CODE_MESSAGE, "Invalid code. Please try again.");
        assert!(guard.is_open());
        assert_eq!(guard.code(), Some(code.as_str()));
        // Retries are unlimited.
        assert_eq!(guard.confirm("0000"), Verification::Rejected);
        assert_eq!(guard.confirm(&code), Verification::Verified(()));
    }

    #[test]
    fn numerically_equal_but_differently_formatted_input_is_rejected() {
        let mut guard = ConfirmationGuard::new();
        guard.open((), CodeLength::Four);
        let code = guard.code().unwrap().to_string();

        let padded = format!("0{code}");
        assert_eq!(guard.confirm(&padded), Verification::Rejected);
        let spaced = format!(" {code}");
        assert_eq!(guard.confirm(&spaced), Verification::Rejected);
    }

    #[test]
    fn cancel_discards_code_and_pending_mutation() {
        let mut guard = ConfirmationGuard::new();
        guard.open("pending", CodeLength::Six);
        let code = guard.code().unwrap().to_string();

        guard.cancel();
        assert!(!guard.is_open());
        assert_eq!(guard.confirm(&code), Verification::NotOpen);
        // Cancel in Idle is a no-op.
        guard.cancel();
    }

    #[test]
    fn opening_replaces_any_live_code() {
        let mut guard = ConfirmationGuard::new();
        guard.open("first", CodeLength::Four);
        let first = guard.code().unwrap().to_string();

        guard.open("second", CodeLength::Four);
        // The first code is dead even if it happens to collide by value; the
        // pending mutation it guarded is gone.
        match guard.confirm(&first) {
            Verification::Verified(pending) => assert_eq!(pending, "second"),
            Verification::Rejected => (),
            Verification::NotOpen => panic!("dialog should be open"),
        }
    }

    #[test]
    fn confirm_affordance_requires_full_length_input() {
        let mut guard = ConfirmationGuard::new();
        assert!(!guard.can_confirm("1234"));

        guard.open((), CodeLength::Six);
        assert!(!guard.can_confirm(""));
        assert!(!guard.can_confirm("12345"));
        assert!(guard.can_confirm("123456"));
        assert!(!guard.can_confirm("1234567"));
    }

    #[test]
    fn confirm_affordance_counts_characters_not_bytes() {
        let mut guard = ConfirmationGuard::new();
        guard.open((), CodeLength::Four);

        // Three visible characters in four bytes must not enable confirm.
        assert!(!guard.can_confirm("12é"));
        assert!(guard.can_confirm("12é4"));
        // Full-length non-digit input enables the affordance; confirm itself
        // still rejects it.
        assert_eq!(guard.confirm("12é4"), Verification::Rejected);
    }
}
