//! Size-tiered compression policy.
//!
//! The envelope for an upload is derived from the original file's byte
//! size along two independent axes: a dimension cap (5 MiB threshold) and
//! a quality/target-size cap (3 MiB threshold). The two comparisons are
//! deliberately separate functions so each threshold stays independently
//! testable.

/// Above this original size the dimension cap drops to 1280px.
pub const DIMENSION_TIER_THRESHOLD: usize = 5 * 1024 * 1024;

/// Above this original size the quality drops to 0.6 and the byte budget
/// to 1024 KB.
pub const QUALITY_TIER_THRESHOLD: usize = 3 * 1024 * 1024;

/// Compression configuration chosen per upload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressionEnvelope {
    pub max_width: u32,
    pub max_height: u32,
    /// Target encode quality in 0–1.
    pub quality: f32,
    /// Best-effort output byte budget, in kilobytes.
    pub max_size_kb: u32,
}

impl CompressionEnvelope {
    /// Derive the envelope for a file of the given original byte size.
    pub fn for_file_size(original_size: usize) -> Self {
        let (max_width, max_height) = dimension_cap_for(original_size);
        let (quality, max_size_kb) = quality_cap_for(original_size);
        Self {
            max_width,
            max_height,
            quality,
            max_size_kb,
        }
    }
}

/// Dimension cap axis: large originals get a tighter pixel bound.
pub fn dimension_cap_for(original_size: usize) -> (u32, u32) {
    if original_size > DIMENSION_TIER_THRESHOLD {
        (1280, 1280)
    } else {
        (1920, 1920)
    }
}

/// Quality/byte-budget axis: large originals get lower quality and a
/// smaller output budget.
pub fn quality_cap_for(original_size: usize) -> (f32, u32) {
    if original_size > QUALITY_TIER_THRESHOLD {
        (0.6, 1024)
    } else {
        (0.8, 2048)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIB: usize = 1024 * 1024;

    #[test]
    fn dimension_cap_tiers() {
        assert_eq!(dimension_cap_for(6 * MIB), (1280, 1280));
        assert_eq!(dimension_cap_for(5 * MIB), (1920, 1920)); // threshold is exclusive
        assert_eq!(dimension_cap_for(2 * MIB), (1920, 1920));
        assert_eq!(dimension_cap_for(0), (1920, 1920));
    }

    #[test]
    fn quality_cap_tiers() {
        assert_eq!(quality_cap_for(4 * MIB), (0.6, 1024));
        assert_eq!(quality_cap_for(3 * MIB), (0.8, 2048)); // threshold is exclusive
        assert_eq!(quality_cap_for(2 * MIB), (0.8, 2048));
    }

    #[test]
    fn envelope_for_6_mib() {
        let envelope = CompressionEnvelope::for_file_size(6 * MIB);
        assert_eq!(envelope.max_width, 1280);
        assert_eq!(envelope.max_height, 1280);
        assert_eq!(envelope.quality, 0.6);
        assert_eq!(envelope.max_size_kb, 1024);
    }

    #[test]
    fn envelope_for_4_mib_mixes_tiers() {
        // 4 MiB is under the dimension threshold but over the quality
        // threshold; the two axes must not collapse into one tier.
        let envelope = CompressionEnvelope::for_file_size(4 * MIB);
        assert_eq!(envelope.max_width, 1920);
        assert_eq!(envelope.max_height, 1920);
        assert_eq!(envelope.quality, 0.6);
        assert_eq!(envelope.max_size_kb, 1024);
    }

    #[test]
    fn envelope_for_2_mib() {
        let envelope = CompressionEnvelope::for_file_size(2 * MIB);
        assert_eq!(envelope.max_width, 1920);
        assert_eq!(envelope.max_height, 1920);
        assert_eq!(envelope.quality, 0.8);
        assert_eq!(envelope.max_size_kb, 2048);
    }
}
