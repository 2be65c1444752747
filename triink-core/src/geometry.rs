/// Geometry primitives for the indexed triangle mesh
use nalgebra::Vector3;

/// Vector type shared by every stage of the pipeline
pub type Vec3 = Vector3<f64>;

/// A mesh vertex. Only the position is stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vec3,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Vec3::new(x, y, z),
        }
    }
}

/// A triangle referencing three vertices of its mesh.
///
/// Indices are zero-based inside the crate; the text formats use one-based
/// indices and convert through [`Triangle::from_one_based`] and
/// [`Triangle::one_based`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    pub indices: [usize; 3],
}

impl Triangle {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self { indices: [a, b, c] }
    }

    /// Build from one-based references. Returns `None` if any reference is 0.
    pub fn from_one_based(refs: [usize; 3]) -> Option<Self> {
        if refs.iter().any(|&r| r == 0) {
            return None;
        }
        Some(Self::new(refs[0] - 1, refs[1] - 1, refs[2] - 1))
    }

    pub fn one_based(&self) -> [usize; 3] {
        [self.indices[0] + 1, self.indices[1] + 1, self.indices[2] + 1]
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn extent(&self) -> Vec3 {
        self.max - self.min
    }

    /// Largest side of the box
    pub fn max_extent(&self) -> f64 {
        let e = self.extent();
        e.x.max(e.y).max(e.z)
    }
}

/// An ordered vertex list plus an ordered triangle list.
///
/// Triangle order is significant: it drives palette assignment and the
/// prefix kept by the reducer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub triangles: Vec<Triangle>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            triangles: Vec::with_capacity(triangles),
        }
    }

    /// Append a vertex and return its zero-based index
    pub fn add_vertex(&mut self, vertex: Vertex) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    pub fn add_triangle(&mut self, triangle: Triangle) {
        self.triangles.push(triangle);
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// True when every triangle references an existing vertex
    pub fn is_consistent(&self) -> bool {
        let count = self.vertices.len();
        self.triangles
            .iter()
            .all(|t| t.indices.iter().all(|&i| i < count))
    }

    /// Bounding box over all vertices, `None` for a mesh without vertices
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.vertices.first()?.position;
        let bounds = self.vertices.iter().skip(1).fold(
            Bounds {
                min: first,
                max: first,
            },
            |acc, v| Bounds {
                min: acc.min.inf(&v.position),
                max: acc.max.sup(&v.position),
            },
        );
        Some(bounds)
    }

    /// Demo mesh shown before anything is loaded
    pub fn tetrahedron() -> Self {
        let mut mesh = Self::with_capacity(4, 4);
        mesh.add_vertex(Vertex::new(0.0, 1.0, 0.0));
        mesh.add_vertex(Vertex::new(-1.0, -1.0, 1.0));
        mesh.add_vertex(Vertex::new(1.0, -1.0, 1.0));
        mesh.add_vertex(Vertex::new(0.0, -1.0, -1.0));

        mesh.add_triangle(Triangle::new(0, 1, 2));
        mesh.add_triangle(Triangle::new(0, 2, 3));
        mesh.add_triangle(Triangle::new(0, 3, 1));
        mesh.add_triangle(Triangle::new(1, 3, 2));
        mesh
    }

    /// Axis-aligned cube centred on the origin, counter-clockwise outward winding
    pub fn cube(size: f64) -> Self {
        let half = size / 2.0;
        let mut mesh = Self::with_capacity(8, 12);
        for &(x, y, z) in &[
            (-half, -half, -half),
            (half, -half, -half),
            (half, half, -half),
            (-half, half, -half),
            (-half, -half, half),
            (half, -half, half),
            (half, half, half),
            (-half, half, half),
        ] {
            mesh.add_vertex(Vertex::new(x, y, z));
        }

        // Front (+z), back (-z), top (+y), bottom (-y), right (+x), left (-x)
        for &(a, b, c) in &[
            (4, 5, 6),
            (4, 6, 7),
            (0, 3, 2),
            (0, 2, 1),
            (3, 7, 6),
            (3, 6, 2),
            (0, 1, 5),
            (0, 5, 4),
            (1, 2, 6),
            (1, 6, 5),
            (0, 4, 7),
            (0, 7, 3),
        ] {
            mesh.add_triangle(Triangle::new(a, b, c));
        }
        mesh
    }
}
