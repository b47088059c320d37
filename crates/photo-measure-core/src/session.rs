//! Sequential volume-measurement session.
//!
//! A session moves forward through
//! `Uncalibrated -> DepthGenerated -> RegionMasked -> VolumeComputed`.
//! Every transition takes `&self` and returns a new session value, so a
//! failed step leaves the previous value usable for a retry. Replacing the
//! output of a stage drops everything derived from the old output; stages
//! upstream of it are kept.

use crate::depth::{normalize_heights, DepthField, HeightProfile, RegionMask};
use crate::volume::{integrate_volume, VolumeEstimate, VolumeParams};
use crate::MeasureError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Progress of a [`VolumeSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStage {
    Uncalibrated,
    DepthGenerated,
    RegionMasked,
    VolumeComputed,
}

#[derive(Clone, Debug, Default)]
pub struct VolumeSession {
    depth: Option<Arc<DepthField>>,
    mask: Option<Arc<RegionMask>>,
    profile: Option<Arc<HeightProfile>>,
    estimate: Option<VolumeEstimate>,
}

impl VolumeSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> SessionStage {
        if self.estimate.is_some() {
            SessionStage::VolumeComputed
        } else if self.mask.is_some() {
            SessionStage::RegionMasked
        } else if self.depth.is_some() {
            SessionStage::DepthGenerated
        } else {
            SessionStage::Uncalibrated
        }
    }

    pub fn depth(&self) -> Option<&DepthField> {
        self.depth.as_deref()
    }

    pub fn mask(&self) -> Option<&RegionMask> {
        self.mask.as_deref()
    }

    pub fn profile(&self) -> Option<&HeightProfile> {
        self.profile.as_deref()
    }

    pub fn estimate(&self) -> Option<&VolumeEstimate> {
        self.estimate.as_ref()
    }

    /// The computed estimate, or `PrerequisiteMissing` before integration.
    pub fn volume(&self) -> Result<&VolumeEstimate, MeasureError> {
        self.estimate
            .as_ref()
            .ok_or(MeasureError::PrerequisiteMissing {
                operation: "volume report",
                missing: "a volume estimate",
            })
    }

    /// Attach the relative depth map produced by the depth model.
    pub fn with_depth(&self, depth: DepthField) -> Self {
        Self {
            depth: Some(Arc::new(depth)),
            ..Self::default()
        }
    }

    /// Attach the rasterized region; requires a depth map of the same size.
    pub fn with_mask(&self, mask: RegionMask) -> Result<Self, MeasureError> {
        let depth = self
            .depth
            .as_ref()
            .ok_or(MeasureError::PrerequisiteMissing {
                operation: "region masking",
                missing: "a depth field",
            })?;
        if depth.dims() != mask.dims() {
            return Err(MeasureError::ShapeMismatch {
                expected: depth.dims(),
                got: mask.dims(),
            });
        }
        Ok(Self {
            depth: Some(Arc::clone(depth)),
            mask: Some(Arc::new(mask)),
            profile: None,
            estimate: None,
        })
    }

    /// Scale the masked depth so its peak matches `h_real_max` meters.
    pub fn normalize(&self, h_real_max: f64) -> Result<Self, MeasureError> {
        let (Some(depth), Some(mask)) = (self.depth.as_ref(), self.mask.as_ref()) else {
            return Err(MeasureError::PrerequisiteMissing {
                operation: "height normalization",
                missing: "a depth field and region mask",
            });
        };
        let profile = normalize_heights(depth, mask, h_real_max)?;
        Ok(Self {
            depth: Some(Arc::clone(depth)),
            mask: Some(Arc::clone(mask)),
            profile: Some(Arc::new(profile)),
            estimate: None,
        })
    }

    /// Integrate the normalized heights into a volume estimate.
    pub fn integrate(&self, params: &VolumeParams) -> Result<Self, MeasureError> {
        let profile = self
            .profile
            .as_ref()
            .ok_or(MeasureError::PrerequisiteMissing {
                operation: "volume integration",
                missing: "a normalized height profile",
            })?;
        let estimate = integrate_volume(profile, params)?;
        Ok(Self {
            estimate: Some(estimate),
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn ramp(width: usize, height: usize) -> DepthField {
        let data = (0..width * height)
            .map(|i| (i % width) as f32 / (width - 1) as f32)
            .collect();
        DepthField::new(width, height, data).unwrap()
    }

    #[test]
    fn walks_all_stages_in_order() {
        let s0 = VolumeSession::new();
        assert_eq!(s0.stage(), SessionStage::Uncalibrated);

        let s1 = s0.with_depth(ramp(3, 1));
        assert_eq!(s1.stage(), SessionStage::DepthGenerated);

        let s2 = s1.with_mask(RegionMask::from_fn(3, 1, |_, _| true)).unwrap();
        assert_eq!(s2.stage(), SessionStage::RegionMasked);

        let s3 = s2.normalize(3.0).unwrap();
        assert_eq!(s3.stage(), SessionStage::RegionMasked);
        assert!(s3.profile().is_some());

        let s4 = s3.integrate(&VolumeParams::new(0.1)).unwrap();
        assert_eq!(s4.stage(), SessionStage::VolumeComputed);
        assert_abs_diff_eq!(s4.estimate().unwrap().volume_m3, 0.045, epsilon = 1e-8);

        // Earlier values are untouched.
        assert_eq!(s2.stage(), SessionStage::RegionMasked);
        assert!(s2.profile().is_none());
    }

    #[test]
    fn integrating_without_profile_is_out_of_order() {
        let masked = VolumeSession::new()
            .with_depth(ramp(3, 1))
            .with_mask(RegionMask::from_fn(3, 1, |_, _| true))
            .unwrap();
        assert!(matches!(
            masked.integrate(&VolumeParams::new(0.1)),
            Err(MeasureError::PrerequisiteMissing {
                operation: "volume integration",
                ..
            })
        ));
        assert!(matches!(
            VolumeSession::new().integrate(&VolumeParams::new(0.1)),
            Err(MeasureError::PrerequisiteMissing { .. })
        ));
        assert!(matches!(
            masked.volume(),
            Err(MeasureError::PrerequisiteMissing {
                operation: "volume report",
                ..
            })
        ));
    }

    #[test]
    fn masking_or_normalizing_without_inputs_is_out_of_order() {
        let empty = VolumeSession::new();
        assert!(matches!(
            empty.with_mask(RegionMask::from_fn(1, 1, |_, _| true)),
            Err(MeasureError::PrerequisiteMissing { .. })
        ));
        assert!(matches!(
            empty.with_depth(ramp(2, 2)).normalize(1.0),
            Err(MeasureError::PrerequisiteMissing { .. })
        ));
    }

    #[test]
    fn rerunning_a_stage_drops_downstream_results() {
        let done = VolumeSession::new()
            .with_depth(ramp(4, 2))
            .with_mask(RegionMask::from_fn(4, 2, |_, _| true))
            .and_then(|s| s.normalize(2.0))
            .and_then(|s| s.integrate(&VolumeParams::new(0.05)))
            .unwrap();
        assert_eq!(done.stage(), SessionStage::VolumeComputed);

        let remasked = done
            .with_mask(RegionMask::from_fn(4, 2, |row, _| row == 0))
            .unwrap();
        assert_eq!(remasked.stage(), SessionStage::RegionMasked);
        assert!(remasked.profile().is_none());
        assert!(remasked.estimate().is_none());
        assert_eq!(remasked.depth(), done.depth());

        let renormalized = done.normalize(4.0).unwrap();
        assert!(renormalized.estimate().is_none());
        assert_abs_diff_eq!(renormalized.profile().unwrap().h_real_max(), 4.0);
    }

    #[test]
    fn failed_step_keeps_previous_session() {
        let flat = DepthField::new(2, 1, vec![0.5, 0.5]).unwrap();
        let masked = VolumeSession::new()
            .with_depth(flat)
            .with_mask(RegionMask::from_fn(2, 1, |_, _| true))
            .unwrap();
        assert!(matches!(
            masked.normalize(1.0),
            Err(MeasureError::FlatRegion { .. })
        ));
        assert_eq!(masked.stage(), SessionStage::RegionMasked);
    }

    #[test]
    fn mask_must_match_depth_size() {
        let s = VolumeSession::new().with_depth(ramp(3, 3));
        assert!(matches!(
            s.with_mask(RegionMask::from_fn(2, 3, |_, _| true)),
            Err(MeasureError::ShapeMismatch { .. })
        ));
    }
}
