use std::f32::consts::{FRAC_PI_2, TAU};

use eframe::egui::{Pos2, Rect, Vec2, pos2};
use log::debug;
use nalgebra::{Isometry3, Perspective3, Point3, Vector3};

const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Screen placement of a projected world point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub pos: Pos2,
    pub depth: f32,
    /// Pixels per world unit at this depth.
    pub scale: f32,
}

/// Orbit camera for the 3D network view. Input only moves the camera; the
/// simulated nodes are never touched from here.
#[derive(Clone, Debug)]
pub struct OrbitCamera {
    target: Point3<f32>,
    distance: f32,
    yaw: f32,
    pitch: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    fov_y: f32,
    aspect: f32,
    near: f32,
    far: f32,
    min_distance: f32,
    max_distance: f32,
    damping_factor: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Point3::origin(),
            distance: 35.0,
            yaw: 0.0,
            pitch: 0.0,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            fov_y: 75.0_f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            min_distance: 2.0,
            max_distance: 400.0,
            damping_factor: 0.05,
        }
    }
}

impl OrbitCamera {
    pub fn eye(&self) -> Point3<f32> {
        let offset = Vector3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        );
        self.target + offset * self.distance
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[cfg(test)]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    #[cfg(test)]
    pub fn target(&self) -> Point3<f32> {
        self.target
    }

    /// Converts a pointer drag into orbit velocity. A drag across the full
    /// viewport height is one full turn.
    pub fn orbit(&mut self, drag: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        self.yaw_velocity -= TAU * drag.x / height;
        self.pitch_velocity += TAU * drag.y / height;
    }

    pub fn pan(&mut self, drag: Vec2, viewport_height: f32) {
        let height = viewport_height.max(1.0);
        let world_per_pixel = 2.0 * self.distance * (self.fov_y * 0.5).tan() / height;

        let forward = (self.target - self.eye()).normalize();
        let right = forward.cross(&Vector3::y()).normalize();
        let up = right.cross(&forward);
        self.target += (-right * drag.x + up * drag.y) * world_per_pixel;
    }

    /// Scroll up moves closer. Each event changes distance by at most 15%.
    pub fn zoom(&mut self, scroll: f32) {
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let zoom_factor = (1.0 - (scroll * 0.0018)).clamp(0.85, 1.15);
        self.distance = (self.distance * zoom_factor).clamp(self.min_distance, self.max_distance);
    }

    /// Applies damped orbit velocity. Returns whether the camera still moves.
    pub fn update(&mut self) -> bool {
        self.yaw = (self.yaw + self.yaw_velocity * self.damping_factor).rem_euclid(TAU);
        self.pitch = (self.pitch + self.pitch_velocity * self.damping_factor)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let retain = 1.0 - self.damping_factor;
        self.yaw_velocity *= retain;
        self.pitch_velocity *= retain;
        if self.yaw_velocity.abs() < 1e-5 {
            self.yaw_velocity = 0.0;
        }
        if self.pitch_velocity.abs() < 1e-5 {
            self.pitch_velocity = 0.0;
        }

        self.yaw_velocity != 0.0 || self.pitch_velocity != 0.0
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        let aspect = width.max(1.0) / height.max(1.0);
        if (aspect - self.aspect).abs() > f32::EPSILON {
            debug!("camera aspect {:.3} -> {aspect:.3}", self.aspect);
            self.aspect = aspect;
        }
    }

    /// Projects a world point into `viewport`. Points behind the camera or
    /// past the far plane yield `None`.
    pub fn project(&self, world: &Vector3<f32>, viewport: Rect) -> Option<Projected> {
        let view = Isometry3::look_at_rh(&self.eye(), &self.target, &Vector3::y());
        let camera_space = view * Point3::from(*world);
        let depth = -camera_space.z;
        if depth <= self.near || depth >= self.far {
            return None;
        }

        let projection = Perspective3::new(self.aspect, self.fov_y, self.near, self.far);
        let ndc = projection.project_point(&camera_space);
        let center = viewport.center();
        let half_height = viewport.height() * 0.5;

        Some(Projected {
            pos: pos2(
                center.x + ndc.x * viewport.width() * 0.5,
                center.y - ndc.y * half_height,
            ),
            depth,
            scale: half_height / ((self.fov_y * 0.5).tan() * depth),
        })
    }
}
