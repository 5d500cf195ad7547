use crate::StrError;
use gemlab::mesh::{Mesh, PointId};
use gemlab::shapes::GeoKind;
use russell_lab::Vector;

/// Defines the services of a vector-valued finite element space
///
/// The true-dof numbering holds the unique unknowns; the local numbering includes the degrees
/// of freedom shared with other partitions. Both numberings are byVDIM, i.e., all components
/// of a node are contiguous.
pub trait Space {
    /// Returns the space dimension
    fn ndim(&self) -> usize;

    /// Returns the number of nodes of the local partition
    fn nnode(&self) -> usize;

    /// Returns the number of true (unique) degrees of freedom
    fn true_size(&self) -> usize;

    /// Returns the number of local degrees of freedom
    fn local_size(&self) -> usize;

    /// Returns the reference coordinates of a node
    fn node_coords(&self, node: usize) -> &[f64];

    /// Returns the local degree of freedom of a node component
    fn local_dof(&self, node: usize, component: usize) -> usize;

    /// Returns the node of a true degree of freedom
    fn dof_node(&self, true_dof: usize) -> usize;

    /// Returns the vector component of a true degree of freedom
    fn dof_component(&self, true_dof: usize) -> usize;

    /// Resolves boundary markers into the true degrees of freedom on these boundaries
    ///
    /// If `component` is None, all components are returned.
    fn resolve_boundary_dofs(&self, markers: &[i32], component: Option<usize>) -> Result<Vec<usize>, StrError>;

    /// Distributes the true vector into the local vector
    fn scatter(&self, local: &mut Vector, true_vec: &Vector);

    /// Collects the owned entries of the local vector into the true vector
    fn gather(&self, true_vec: &mut Vector, local: &Vector);
}

/// Holds a face (edge in 2D) on the boundary of the mesh
///
/// The points must be ordered such that the normal computed by the shape functions points outward.
#[derive(Clone, Debug)]
pub struct BoundaryFace {
    /// Boundary marker (attribute)
    pub marker: i32,

    /// Geometry kind (e.g., Qua4 in 3D or Lin2 in 2D)
    pub kind: GeoKind,

    /// Points (nodes) of the face
    pub points: Vec<PointId>,
}

/// Implements a continuous (H1) vector space on a single partition
///
/// The nodes of the space are the points of the mesh. The local-to-true map is the identity
/// because there is no partition overlap.
pub struct H1Space {
    /// The mesh
    pub mesh: Mesh,

    /// The faces on the boundary of the mesh
    pub faces: Vec<BoundaryFace>,

    /// Maps local degrees of freedom to true degrees of freedom
    local_to_true: Vec<usize>,
}

impl H1Space {
    /// Allocates a new instance
    pub fn new(mesh: Mesh, faces: Vec<BoundaryFace>) -> Result<Self, StrError> {
        let ndim = mesh.ndim;
        if ndim < 2 || ndim > 3 {
            return Err("space ndim must be 2 or 3");
        }
        if mesh.cells.len() < 1 {
            return Err("the mesh must have at least one cell");
        }
        let npoint = mesh.points.len();
        for (index, point) in mesh.points.iter().enumerate() {
            if point.id != index {
                return Err("point ids must be equal to their index in the points array");
            }
            if point.coords.len() != ndim {
                return Err("point coordinates must have length equal to ndim");
            }
        }
        for cell in &mesh.cells {
            if cell.kind.ndim() != ndim {
                return Err("cell geometry ndim must be equal to the space ndim");
            }
            if cell.points.len() != cell.kind.nnode() {
                return Err("cell points array has an incorrect length");
            }
            if cell.points.iter().any(|p| *p >= npoint) {
                return Err("cell point id is out of bounds");
            }
        }
        for face in &faces {
            if face.kind.ndim() + 1 != ndim {
                return Err("boundary face geometry ndim must be equal to the space ndim minus one");
            }
            if face.points.len() != face.kind.nnode() {
                return Err("boundary face points array has an incorrect length");
            }
            if face.points.iter().any(|p| *p >= npoint) {
                return Err("boundary face point id is out of bounds");
            }
        }
        let local_to_true = (0..npoint * ndim).collect();
        Ok(H1Space {
            mesh,
            faces,
            local_to_true,
        })
    }

    /// Returns the true degrees of freedom of a set of points
    pub fn dofs_of_points(&self, points: &[PointId]) -> Vec<usize> {
        let ndim = self.mesh.ndim;
        let mut dofs = Vec::with_capacity(points.len() * ndim);
        for p in points {
            for i in 0..ndim {
                dofs.push(self.local_to_true[p * ndim + i]);
            }
        }
        dofs
    }

    /// Returns the sorted list of boundary markers
    pub fn boundary_markers(&self) -> Vec<i32> {
        let mut markers: Vec<_> = self.faces.iter().map(|f| f.marker).collect();
        markers.sort();
        markers.dedup();
        markers
    }
}

impl Space for H1Space {
    fn ndim(&self) -> usize {
        self.mesh.ndim
    }

    fn nnode(&self) -> usize {
        self.mesh.points.len()
    }

    fn true_size(&self) -> usize {
        self.mesh.points.len() * self.mesh.ndim
    }

    fn local_size(&self) -> usize {
        self.local_to_true.len()
    }

    fn node_coords(&self, node: usize) -> &[f64] {
        &self.mesh.points[node].coords
    }

    fn local_dof(&self, node: usize, component: usize) -> usize {
        node * self.mesh.ndim + component
    }

    fn dof_node(&self, true_dof: usize) -> usize {
        true_dof / self.mesh.ndim
    }

    fn dof_component(&self, true_dof: usize) -> usize {
        true_dof % self.mesh.ndim
    }

    fn resolve_boundary_dofs(&self, markers: &[i32], component: Option<usize>) -> Result<Vec<usize>, StrError> {
        let ndim = self.mesh.ndim;
        if let Some(c) = component {
            if c >= ndim {
                return Err("component must be smaller than ndim");
            }
        }
        let mut nodes = Vec::new();
        for marker in markers {
            let mut found = false;
            for face in self.faces.iter().filter(|f| f.marker == *marker) {
                nodes.extend_from_slice(&face.points);
                found = true;
            }
            if !found {
                return Err("cannot find boundary faces with the given marker");
            }
        }
        nodes.sort();
        nodes.dedup();
        let mut dofs = Vec::with_capacity(nodes.len() * ndim);
        for node in nodes {
            match component {
                Some(c) => dofs.push(self.local_to_true[node * ndim + c]),
                None => {
                    for i in 0..ndim {
                        dofs.push(self.local_to_true[node * ndim + i]);
                    }
                }
            }
        }
        Ok(dofs)
    }

    fn scatter(&self, local: &mut Vector, true_vec: &Vector) {
        for l in 0..self.local_to_true.len() {
            local[l] = true_vec[self.local_to_true[l]];
        }
    }

    fn gather(&self, true_vec: &mut Vector, local: &Vector) {
        for l in 0..self.local_to_true.len() {
            true_vec[self.local_to_true[l]] = local[l];
        }
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
