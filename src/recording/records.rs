use core::fmt::Write as _;

/// One completed trial, formatted as a comma-space separated row.
pub trait TrialRecord {
    const HEADER: &'static str;

    fn line(&self) -> String;
}

/// Booleans keep the capitalized spelling used by previously collected files.
fn flag(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

fn join(fields: &[&dyn core::fmt::Display]) -> String {
    let mut out = String::new();
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        let _ = write!(out, "{field}");
    }
    out
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearForwardRecord {
    pub cond: usize,
    pub turn_start_s: f64,
    pub distance: f64,
    pub rotation_deg: f64,
    pub pitch: bool,
    pub spin_dir: f64,
    pub target_init: f64,
    pub target_final: f64,
}

impl TrialRecord for LinearForwardRecord {
    const HEADER: &'static str =
        "cond, starttime, motion, rotation, pitch, spindir, inittarget, finaltarget";

    fn line(&self) -> String {
        join(&[
            &self.cond,
            &self.turn_start_s,
            &self.distance,
            &self.rotation_deg,
            &flag(self.pitch),
            &self.spin_dir,
            &self.target_init,
            &self.target_final,
        ])
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearBackwardRecord {
    pub cond: usize,
    pub wait_start_s: f64,
    pub distance: f64,
    pub pitch: bool,
    pub spin_dir: f64,
    pub target_init: f64,
    pub target_final: f64,
}

impl TrialRecord for LinearBackwardRecord {
    const HEADER: &'static str = "cond, starttime, motion, pitch, spindir, inittarget, finaltarget";

    fn line(&self) -> String {
        join(&[
            &self.cond,
            &self.wait_start_s,
            &self.distance,
            &flag(self.pitch),
            &self.spin_dir,
            &self.target_init,
            &self.target_final,
        ])
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationRecord {
    pub cond: usize,
    pub turn_start_s: f64,
    /// Interior angle, `180 - turn`.
    pub angle_deg: f64,
    pub pitch: bool,
    pub spin_dir: f64,
    pub turn_angle: f64,
}

impl TrialRecord for RotationRecord {
    const HEADER: &'static str = "cond, starttime, angle, pitch, spindir, turnangle";

    fn line(&self) -> String {
        join(&[
            &self.cond,
            &self.turn_start_s,
            &self.angle_deg,
            &flag(self.pitch),
            &self.spin_dir,
            &self.turn_angle,
        ])
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TriangleRecord {
    pub cond: usize,
    pub backward_time_s: f64,
    pub leg1: f64,
    pub angle_deg: f64,
    pub pitch: bool,
    pub spin_dir: f64,
    pub leg2: f64,
    pub direction_init: f64,
    pub direction_final: f64,
    pub direction_angle: f64,
}

impl TrialRecord for TriangleRecord {
    const HEADER: &'static str =
        "cond, backtime, len1, angle, pitch, spindir, len2, dirinit, dirfinal, anglefinal";

    fn line(&self) -> String {
        join(&[
            &self.cond,
            &self.backward_time_s,
            &self.leg1,
            &self.angle_deg,
            &flag(self.pitch),
            &self.spin_dir,
            &self.leg2,
            &self.direction_init,
            &self.direction_final,
            &self.direction_angle,
        ])
    }
}
