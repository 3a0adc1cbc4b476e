use crate::types::{Action, ModifierSet};
use tracing::trace;

/// Authoritative modifier state.
///
/// `held` is what the user is physically holding: a bit stays held while at
/// least one source (a literal modifier key or a mod-tap key) holds it.
/// `live` is what was last reported downstream. The two only differ while a
/// key is overriding modifiers for its own output.
#[derive(Debug, Clone, Default)]
pub struct ModifierTracker {
    holders: [u8; 8],
    live: ModifierSet,
}

impl ModifierTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn held(&self) -> ModifierSet {
        let mut bits = 0u8;
        for (i, count) in self.holders.iter().enumerate() {
            if *count > 0 {
                bits |= 1 << i;
            }
        }
        ModifierSet::from_bits_retain(bits)
    }

    pub fn live(&self) -> ModifierSet {
        self.live
    }

    pub fn shift_active(&self) -> bool {
        self.held().intersects(ModifierSet::SHIFT)
    }

    /// True when no override is in effect.
    pub fn is_settled(&self) -> bool {
        self.live == self.held()
    }

    /// Adds one source for every bit in `mods`. Bits that were not live yet are pressed.
    pub fn hold(&mut self, mods: ModifierSet, out: &mut Vec<Action>) {
        for i in bit_indices(mods) {
            self.holders[i] = self.holders[i].saturating_add(1);
        }
        let newly = mods - self.live;
        press_set(newly, out);
        self.live |= newly;
    }

    /// Drops one source for every bit in `mods`. A bit is released only when
    /// its last source goes away. Bits with no source are ignored, so a release
    /// whose press was never seen produces nothing.
    pub fn unhold(&mut self, mods: ModifierSet, out: &mut Vec<Action>) {
        let mut dropped = ModifierSet::empty();
        for i in bit_indices(mods) {
            if self.holders[i] == 0 {
                trace!("unhold of bit {} without a holder", i);
                continue;
            }
            self.holders[i] -= 1;
            if self.holders[i] == 0 {
                dropped |= ModifierSet::from_bits_retain(1 << i);
            }
        }
        let released = dropped & self.live;
        release_set(released, out);
        self.live -= released;
    }

    /// Minimal-diff move of the live state to `desired`.
    ///
    /// Releases `live - desired`, then presses `desired - live`, i.e. exactly
    /// one action per bit of the symmetric difference.
    pub fn transition(&mut self, desired: ModifierSet, out: &mut Vec<Action>) {
        let to_remove = self.live - desired;
        let to_add = desired - self.live;
        release_set(to_remove, out);
        press_set(to_add, out);
        self.live = desired;
    }

    /// Transition back to what the user is holding.
    pub fn restore(&mut self, out: &mut Vec<Action>) {
        let held = self.held();
        self.transition(held, out);
    }

    /// Presses every bit of `mods`, whether or not it is already live.
    pub fn press_literal(&mut self, mods: ModifierSet, out: &mut Vec<Action>) {
        press_set(mods, out);
        self.live |= mods;
    }

    /// Releases every bit of `mods`, whether or not it is live.
    pub fn release_literal(&mut self, mods: ModifierSet, out: &mut Vec<Action>) {
        release_set(mods, out);
        self.live -= mods;
    }
}

fn bit_indices(mods: ModifierSet) -> impl Iterator<Item = usize> {
    let bits = mods.bits();
    (0..8usize).filter(move |i| bits & (1u8 << i) != 0)
}

pub(crate) fn press_set(mods: ModifierSet, out: &mut Vec<Action>) {
    out.extend(mods.keycodes().map(Action::Press));
}

pub(crate) fn release_set(mods: ModifierSet, out: &mut Vec<Action>) {
    out.extend(mods.keycodes().map(Action::Release));
}

/// Live state with the Shift bits forced to `needs_shift`.
///
/// A Shift side the user already holds is kept rather than swapped for LSHIFT.
pub(crate) fn with_shift(live: ModifierSet, needs_shift: bool) -> ModifierSet {
    let base = live - ModifierSet::SHIFT;
    if !needs_shift {
        base
    } else if live.intersects(ModifierSet::SHIFT) {
        base | (live & ModifierSet::SHIFT)
    } else {
        base | ModifierSet::LSHIFT
    }
}
