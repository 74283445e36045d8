/// Counts how many drag-enter events are still waiting for their drag-leave.
///
/// Dragging across the children of a drop target fires an enter on the child
/// before the leave on the parent, so a plain boolean would flicker. The target
/// only stops being highlighted once every enter has been paired with a leave,
/// or when the drag ends with a drop.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DragDepth(u32);

impl DragDepth {
    pub const IDLE: DragDepth = DragDepth(0);

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn is_dragging(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub fn enter(self) -> Self {
        DragDepth(self.0.saturating_add(1))
    }

    /// Never goes below zero, stray leaves are absorbed.
    #[must_use]
    pub fn leave(self) -> Self {
        DragDepth(self.0.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlight_tracks_unmatched_enters() {
        for enters in 0..6u32 {
            for leaves in 0..=enters {
                let mut depth = DragDepth::IDLE;
                for _ in 0..enters {
                    depth = depth.enter();
                    assert!(depth.is_dragging());
                }
                for left in 1..=leaves {
                    depth = depth.leave();
                    assert_eq!(depth.is_dragging(), enters - left > 0);
                }
                assert_eq!(depth.get(), enters - leaves);
            }
        }
    }

    #[test]
    fn extra_leaves_stay_at_zero() {
        let depth = DragDepth::IDLE.enter().leave().leave().leave();
        assert_eq!(depth, DragDepth::IDLE);
        assert!(!depth.is_dragging());
    }
}
