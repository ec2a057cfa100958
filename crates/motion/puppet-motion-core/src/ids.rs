//! Reserved curve identifiers and effect-target limits.

/// Model-target curve carrying the eye-blink signal.
pub const EYE_BLINK_ID: &str = "EyeBlink";

/// Model-target curve carrying the lip-sync signal.
pub const LIP_SYNC_ID: &str = "LipSync";

/// Model-target curve driving the whole-model opacity.
pub const OPACITY_ID: &str = "Opacity";

/// Number of effect targets tracked by the per-frame override bitmask.
/// Targets beyond this limit are still driven by the effect signal but can no
/// longer be suppressed by an explicit parameter curve.
pub const MAX_EFFECT_TARGETS: usize = u64::BITS as usize;

/// Bit set of effect targets overridden by motion curves during one frame.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct OverrideMask(u64);

impl OverrideMask {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `index` as overridden. Indices at or beyond [`MAX_EFFECT_TARGETS`] are ignored.
    #[inline]
    pub fn mark(&mut self, index: usize) {
        if index < MAX_EFFECT_TARGETS {
            self.0 |= 1u64 << index;
        }
    }

    #[inline]
    pub fn is_marked(&self, index: usize) -> bool {
        index < MAX_EFFECT_TARGETS && (self.0 >> index) & 1 == 1
    }

    #[inline]
    pub fn bits(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_tracks_first_sixty_four() {
        let mut mask = OverrideMask::new();
        mask.mark(0);
        mask.mark(63);
        mask.mark(64);
        mask.mark(200);
        assert!(mask.is_marked(0));
        assert!(mask.is_marked(63));
        assert!(!mask.is_marked(64));
        assert!(!mask.is_marked(200));
        assert_eq!(mask.bits(), 1 | (1u64 << 63));
    }
}
