/// Classification of a polygon by its corner count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topology {
    Triangle,
    Quad,
    GeneralPolygon,
}

impl Topology {
    pub fn from_vertex_count(count: usize) -> Self {
        match count {
            3 => Topology::Triangle,
            4 => Topology::Quad,
            _ => Topology::GeneralPolygon,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<glm::DVec3>,
    topology: Topology,
}

impl Polygon {
    /// Returns `None` for fewer than 3 points.
    pub fn new(points: Vec<glm::DVec3>) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }

        let topology = Topology::from_vertex_count(points.len());
        Some(Polygon {
            points,
            topology,
        })
    }

    pub fn points(&self) -> &[glm::DVec3] {
        &self.points
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub(crate) name: String,
    pub(crate) polygons: Vec<Polygon>,
}

impl Mesh {
    pub fn new(name: String, polygons: Vec<Polygon>) -> Self {
        Mesh {
            name,
            polygons,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }
}
