use wgpu::util::DeviceExt;
use bytemuck::NoUninit;

#[repr(C)]
#[derive(Debug, Clone, Copy, NoUninit)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub uv: [f32; 2],
}

pub struct MeshBuffer {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn upload(&self, device: &wgpu::Device) -> MeshBuffer {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Vertex Buffer"),
            contents: bytemuck::cast_slice(&self.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Mesh Index Buffer"),
            contents: bytemuck::cast_slice(&self.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        MeshBuffer {
            vertex_buffer,
            index_buffer,
            index_count: self.indices.len() as u32,
        }
    }
}

/// Unit quad centred on the origin, texture upright in a y-up world
pub fn create_sprite_quad() -> Mesh {
    let vertices = vec![
        Vertex { pos: [-0.5, -0.5], uv: [0.0, 1.0] },
        Vertex { pos: [0.5, -0.5], uv: [1.0, 1.0] },
        Vertex { pos: [0.5, 0.5], uv: [1.0, 0.0] },
        Vertex { pos: [-0.5, 0.5], uv: [0.0, 0.0] },
    ];
    let indices = vec![0, 1, 2, 0, 2, 3];

    Mesh { vertices, indices }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Grey level for the background, brighter the faster the shuriken spins.
/// Saturates at 80 degrees per tick.
pub fn speed_tint(angular_velocity: f32) -> f32 {
    let strength = angular_velocity.abs().min(80.0) / 80.0;
    lerp(10.0, 200.0, strength) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(-90.0, 0.0, 0.0), -90.0);
        assert_eq!(lerp(-90.0, 0.0, 1.0), 0.0);
        assert_eq!(lerp(-90.0, 0.0, 0.5), -45.0);
    }

    #[test]
    fn test_speed_tint_bounds() {
        assert_eq!(speed_tint(0.0), 10.0 / 255.0);
        assert_eq!(speed_tint(80.0), 200.0 / 255.0);
        assert_eq!(speed_tint(-500.0), 200.0 / 255.0, "direction does not matter and it saturates");
        assert!(speed_tint(40.0) > speed_tint(20.0));
    }

    #[test]
    fn test_sprite_quad_is_two_triangles() {
        let quad = create_sprite_quad();
        assert_eq!(quad.vertices.len(), 4);
        assert_eq!(quad.indices.len(), 6);
        assert!(quad.indices.iter().all(|&i| (i as usize) < quad.vertices.len()));
    }
}
