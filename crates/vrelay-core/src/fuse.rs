//! Fusion of primary and filtered specialist results.

use vrelay_models::{Detection, DetectionBatch, GENERIC_ANIMAL_LABEL};

/// Highest-confidence detection; the first occurrence wins ties.
pub fn strongest(batch: &[Detection]) -> Option<&Detection> {
    batch.iter().fold(None, |best: Option<&Detection>, d| match best {
        Some(b) if b.confidence >= d.confidence => Some(b),
        _ => Some(d),
    })
}

/// Merge specialist survivors into the primary batch.
///
/// The primary batch comes first, unmodified, followed by the specialist
/// batch in order. When the specialist batch is non-empty a single summary
/// detection labelled `"animal"` is appended last, copying the strongest
/// specialist detection.
pub fn fuse(primary: DetectionBatch, specialist: DetectionBatch) -> DetectionBatch {
    let summary = strongest(&specialist).map(|d| d.relabeled(GENERIC_ANIMAL_LABEL));

    let mut fused = primary;
    fused.reserve(specialist.len() + usize::from(summary.is_some()));
    fused.extend(specialist);
    fused.extend(summary);
    fused
}
