use glm::DVec4;

fn dot(a: DVec4, b: DVec4) -> f64 {
    a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w
}

fn lerp(a: DVec4, b: DVec4, t: f64) -> DVec4 {
    DVec4::new(
        a.x + (b.x - a.x) * t,
        a.y + (b.y - a.y) * t,
        a.z + (b.z - a.z) * t,
        a.w + (b.w - a.w) * t)
}

/// Clips a convex polygon given in clip coordinates against the view volume
/// `-w <= x, y, z <= w`. Returns the vertices of the clipped polygon, which may be empty.
pub fn clip_polygon(input: &[DVec4]) -> Vec<DVec4> {
    let clip_planes = [
        DVec4::new(1.0, 0.0, 0.0, 1.0),  // Left
        DVec4::new(-1.0, 0.0, 0.0, 1.0), // Right
        DVec4::new(0.0, 1.0, 0.0, 1.0),  // Bottom
        DVec4::new(0.0, -1.0, 0.0, 1.0), // Top
        DVec4::new(0.0, 0.0, 1.0, 1.0),  // Near
        DVec4::new(0.0, 0.0, -1.0, 1.0), // Far
    ];

    let mut vertices = input.to_vec();
    for plane in clip_planes.iter() {
        if vertices.is_empty() {
            break;
        }

        let mut output = Vec::with_capacity(vertices.len() + 1);
        let mut v0 = vertices[vertices.len() - 1];
        let mut d0 = dot(v0, *plane);
        for v1 in vertices.iter().copied() {
            let d1 = dot(v1, *plane);
            let inside0 = d0 >= 0.0;
            let inside1 = d1 >= 0.0;
            if inside0 != inside1 {
                output.push(lerp(v0, v1, d0 / (d0 - d1)));
            }
            if inside1 {
                output.push(v1);
            }
            v0 = v1;
            d0 = d1;
        }
        vertices = output;
    }

    vertices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clip_polygon_should_keep_polygon_inside_volume() {
        let triangle = [
            DVec4::new(-0.5, -0.5, 0.0, 1.0),
            DVec4::new(0.5, -0.5, 0.0, 1.0),
            DVec4::new(0.0, 0.5, 0.0, 1.0),
        ];

        assert_eq!(clip_polygon(&triangle), triangle.to_vec());
    }

    #[test]
    fn clip_polygon_should_drop_polygon_behind_near_plane() {
        let triangle = [
            DVec4::new(-0.5, -0.5, -3.0, 1.0),
            DVec4::new(0.5, -0.5, -3.0, 1.0),
            DVec4::new(0.0, 0.5, -3.0, 1.0),
        ];

        assert!(clip_polygon(&triangle).is_empty());
    }

    #[test]
    fn clip_polygon_should_cut_straddling_triangle() {
        // Arrange
        let triangle = [
            DVec4::new(0.0, 0.0, 0.0, 1.0),
            DVec4::new(2.0, 0.0, 0.0, 1.0),
            DVec4::new(0.0, 0.5, 0.0, 1.0),
        ];

        // Act
        let clipped = clip_polygon(&triangle);

        // Assert
        assert_eq!(clipped.len(), 4);
        assert!(clipped.iter().all(|v| v.x <= 1.0 + 1e-12));
    }
}
