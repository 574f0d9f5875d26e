//! Time-to-pose math shared by the trial engines.
//!
//! Everything here is a pure function of elapsed time or of an accumulated
//! scalar; orientation is always rebuilt from that scalar instead of being
//! integrated tick by tick.

use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn length(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl core::ops::Add for Vec3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl core::ops::Sub for Vec3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl core::ops::Mul<f64> for Vec3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl core::ops::Neg for Vec3 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self::Output {
        Self::new(-self.x, -self.y, -self.z)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[inline]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Pitch about +x (positive tilts the view down), yaw about +y (positive turns
/// right). Roll is never driven.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EulerAngles {
    pub pitch_deg: f64,
    pub yaw_deg: f64,
}

impl EulerAngles {
    pub const LEVEL: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(pitch_deg: f64, yaw_deg: f64) -> Self {
        Self { pitch_deg, yaw_deg }
    }

    /// Yaw applied after pitch, matching the host's Z-X-Y Euler convention with
    /// zero roll.
    pub fn to_quat(self) -> Quat {
        let (sx, cx) = (self.pitch_deg.to_radians() * 0.5).sin_cos();
        let (sy, cy) = (self.yaw_deg.to_radians() * 0.5).sin_cos();
        Quat::new(cy * sx, sy * cx, -sy * sx, cy * cx)
    }

    /// Unit view direction for this orientation.
    pub fn forward(self) -> Vec3 {
        let (sp, cp) = self.pitch_deg.to_radians().sin_cos();
        let (sy, cy) = self.yaw_deg.to_radians().sin_cos();
        Vec3::new(sy * cp, -sp, cy * cp)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: EulerAngles,
}

impl Pose {
    pub const ORIGIN: Self = Self::new(Vec3::ZERO, EulerAngles::LEVEL);

    #[inline]
    pub const fn new(position: Vec3, orientation: EulerAngles) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    Pitch,
    Yaw,
}

impl Axis {
    #[inline]
    pub const fn is_pitch(self) -> bool {
        matches!(self, Self::Pitch)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TurnDirection {
    Left,
    Right,
}

impl TurnDirection {
    /// Sign of the Euler angle that realizes this turn on `axis`.
    ///
    /// A rightward pitch turn is a negative pitch (upward), a rightward yaw turn
    /// is a positive yaw.
    pub const fn spin_dir(self, axis: Axis) -> f64 {
        match (axis, self) {
            (Axis::Pitch, Self::Right) => -1.0,
            (Axis::Pitch, Self::Left) => 1.0,
            (Axis::Yaw, Self::Right) => 1.0,
            (Axis::Yaw, Self::Left) => -1.0,
        }
    }
}

/// Distance covered after `elapsed_s` at `velocity`, clamped to `target`.
pub fn translate(elapsed_s: f64, velocity: f64, target: f64) -> f64 {
    (velocity * elapsed_s.max(0.0)).min(target)
}

/// Single-axis orientation after `elapsed_s` at `angular_velocity`, clamped to
/// `amplitude` and signed by `sign`.
pub fn rotate(
    elapsed_s: f64,
    angular_velocity: f64,
    amplitude: f64,
    axis: Axis,
    sign: f64,
) -> EulerAngles {
    let angle = (angular_velocity * elapsed_s.max(0.0)).min(amplitude);
    heading(axis, sign * angle)
}

pub fn heading(axis: Axis, angle_deg: f64) -> EulerAngles {
    match axis {
        Axis::Pitch => EulerAngles::new(angle_deg, 0.0),
        Axis::Yaw => EulerAngles::new(0.0, angle_deg),
    }
}

/// Offset `distance` metres along the heading `angle_deg` on `axis`.
pub fn place_polar(distance: f64, angle_deg: f64, axis: Axis) -> Vec3 {
    heading(axis, angle_deg).forward() * distance
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepDirection {
    Increase,
    Decrease,
}

impl StepDirection {
    #[inline]
    pub const fn sign(self) -> f64 {
        match self {
            Self::Increase => 1.0,
            Self::Decrease => -1.0,
        }
    }

    /// Increase wins when both controls are asserted.
    pub const fn from_flags(increase: bool, decrease: bool) -> Option<Self> {
        if increase {
            Some(Self::Increase)
        } else if decrease {
            Some(Self::Decrease)
        } else {
            None
        }
    }
}

/// Press-and-hold step that grows geometrically while the same direction is held.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AcceleratingStep {
    min: f64,
    max: f64,
    multiplier: f64,
    current: f64,
    last: Option<StepDirection>,
}

impl AcceleratingStep {
    pub const fn new(min: f64, max: f64, multiplier: f64) -> Self {
        Self {
            min,
            max,
            multiplier,
            current: min,
            last: None,
        }
    }

    /// Step magnitude for this tick; zero when there is no input.
    pub fn advance(&mut self, direction: Option<StepDirection>) -> f64 {
        let Some(direction) = direction else {
            self.reset();
            return 0.0;
        };

        if self.last == Some(direction) {
            self.current = (self.current * self.multiplier).min(self.max);
        } else {
            self.current = self.min;
        }
        self.last = Some(direction);
        self.current
    }

    /// Moves `value` one step in `direction` and clamps it to `[lo, hi]`.
    pub fn apply(
        &mut self,
        value: f64,
        direction: Option<StepDirection>,
        lo: f64,
        hi: f64,
    ) -> f64 {
        let step = self.advance(direction);
        let sign = direction.map_or(0.0, StepDirection::sign);
        (value + sign * step).clamp(lo, hi)
    }

    pub fn reset(&mut self) {
        self.current = self.min;
        self.last = None;
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }
}

#[cfg(test)]
mod tests;
