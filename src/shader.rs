//! Render shader source and GPU-facing data layouts.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

pub const SHADER_SOURCE: &str = include_str!("shader.wgsl");

/// Per-particle instance data as uploaded to the vertex buffer.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub _pad0: f32,
    pub color: [f32; 3],
    pub _pad1: f32,
}

impl ParticleInstance {
    pub fn new(position: Vec3, color: Vec3) -> Self {
        Self {
            position: position.to_array(),
            _pad0: 0.0,
            color: color.to_array(),
            _pad1: 0.0,
        }
    }
}

/// Frame uniforms shared by all bursts.
#[repr(C)]
#[derive(Copy, Clone, Pod, Zeroable)]
pub struct Uniforms {
    pub view_proj: [[f32; 4]; 4],
    pub particle_size: f32,
    pub time: f32,
    pub delta_time: f32,
    pub _padding: f32,
}
