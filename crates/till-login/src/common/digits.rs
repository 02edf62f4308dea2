use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};

/// Fixed row of single-digit input boxes (PIN, verification code).
///
/// Only ASCII digits are ever stored. Keystrokes into a full row are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitSlots<const N: usize> {
    slots: [Option<char>; N],
}

impl<const N: usize> Default for DigitSlots<N> {
    fn default() -> Self {
        Self { slots: [None; N] }
    }
}

impl<const N: usize> DigitSlots<N> {
    /// Types `digit` into the first empty slot. Returns `false` if the row is
    /// full or `digit` is not a digit.
    pub fn push(&mut self, digit: char) -> bool {
        if !digit.is_ascii_digit() {
            return false;
        }
        match self.slots.iter_mut().find(|slot| slot.is_none()) {
            Some(slot) => {
                *slot = Some(digit);
                true
            }
            None => false,
        }
    }

    /// Writes `digit` into slot `index`, replacing what was there.
    pub fn set(&mut self, index: usize, digit: char) -> bool {
        if !digit.is_ascii_digit() {
            return false;
        }
        match self.slots.get_mut(index) {
            Some(slot) => {
                *slot = Some(digit);
                true
            }
            None => false,
        }
    }

    /// Clears the last filled slot.
    pub fn backspace(&mut self) -> bool {
        match self.slots.iter_mut().rev().find(|slot| slot.is_some()) {
            Some(slot) => {
                *slot = None;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.slots = [None; N];
    }

    pub fn filled(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    pub fn as_slice(&self) -> &[Option<char>] {
        &self.slots
    }

    /// The typed digits, skipping empty slots.
    pub fn value(&self) -> String {
        self.slots.iter().flatten().collect()
    }
}

// Digits never leave the process in a view snapshot; only fill state does.
impl<const N: usize> Serialize for DigitSlots<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(N))?;
        for slot in &self.slots {
            seq.serialize_element(&slot.is_some())?;
        }
        seq.end()
    }
}
