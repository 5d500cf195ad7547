use super::Space;
use crate::StrError;
use russell_lab::{vec_add, vec_update, Vector};

/// Indicates which node-set is active
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ActiveNodes {
    /// Undeformed coordinates
    Reference,

    /// Current (deformed) coordinates
    Deformed,
}

/// Holds the reference and deformed nodal coordinates
///
/// The coordinates are stored with the same layout as the local vectors of the space
/// (all components of a node are contiguous). Switching the active node-set is explicit.
pub struct MeshGeometry {
    /// Reference (undeformed) coordinates
    reference: Vector,

    /// Deformed coordinates
    deformed: Vector,

    /// Active node-set
    active: ActiveNodes,
}

impl MeshGeometry {
    /// Allocates a new instance with deformed = reference
    pub fn new(space: &dyn Space) -> Self {
        let mut reference = Vector::new(space.local_size());
        for node in 0..space.nnode() {
            let x = space.node_coords(node);
            for i in 0..space.ndim() {
                reference[space.local_dof(node, i)] = x[i];
            }
        }
        let deformed = reference.clone();
        MeshGeometry {
            reference,
            deformed,
            active: ActiveNodes::Reference,
        }
    }

    /// Returns the active node-set
    pub fn active(&self) -> ActiveNodes {
        self.active
    }

    /// Makes the reference node-set active
    pub fn activate_reference(&mut self) {
        self.active = ActiveNodes::Reference;
    }

    /// Makes the deformed node-set active
    pub fn activate_deformed(&mut self) {
        self.active = ActiveNodes::Deformed;
    }

    /// Returns the coordinates of the active node-set
    pub fn nodes(&self) -> &Vector {
        match self.active {
            ActiveNodes::Reference => &self.reference,
            ActiveNodes::Deformed => &self.deformed,
        }
    }

    /// Returns the reference coordinates
    pub fn reference(&self) -> &Vector {
        &self.reference
    }

    /// Returns the deformed coordinates
    pub fn deformed(&self) -> &Vector {
        &self.deformed
    }

    /// Returns an error if the reference node-set is not active
    pub fn require_reference(&self) -> Result<(), StrError> {
        match self.active {
            ActiveNodes::Reference => Ok(()),
            ActiveNodes::Deformed => Err("the reference node-set must be active for assembly"),
        }
    }

    /// Sets deformed = reference + u (quasi-static)
    ///
    /// `u` is the local (nodal) displacement vector of the converged step.
    pub fn advance(&mut self, u: &Vector) -> Result<(), StrError> {
        if u.dim() != self.reference.dim() {
            return Err("displacement vector has an incompatible dimension");
        }
        vec_add(&mut self.deformed, 1.0, &self.reference, 1.0, u)
    }

    /// Sets deformed += du (dynamic)
    ///
    /// `du` is the local (nodal) displacement increment of the converged step.
    pub fn advance_incremental(&mut self, du: &Vector) -> Result<(), StrError> {
        if du.dim() != self.deformed.dim() {
            return Err("displacement increment has an incompatible dimension");
        }
        vec_update(&mut self.deformed, 1.0, du)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use super::{ActiveNodes, MeshGeometry};
    use crate::base::SampleMeshes;
    use russell_lab::{approx_eq, Vector};

    #[test]
    fn new_and_activate_work() {
        let space = SampleMeshes::block_qua4(1, 1, 2.0, 1.0).unwrap();
        let mut geo = MeshGeometry::new(&space);
        assert_eq!(geo.active(), ActiveNodes::Reference);
        assert_eq!(geo.reference().as_data(), &[0.0, 0.0, 2.0, 0.0, 0.0, 1.0, 2.0, 1.0]);
        assert_eq!(geo.require_reference(), Ok(()));
        geo.activate_deformed();
        assert_eq!(geo.active(), ActiveNodes::Deformed);
        assert_eq!(
            geo.require_reference().err(),
            Some("the reference node-set must be active for assembly")
        );
        geo.activate_reference();
        assert_eq!(geo.nodes().as_data(), geo.reference().as_data());
    }

    #[test]
    fn advance_captures_errors() {
        let space = SampleMeshes::block_qua4(1, 1, 1.0, 1.0).unwrap();
        let mut geo = MeshGeometry::new(&space);
        assert_eq!(
            geo.advance(&Vector::new(3)).err(),
            Some("displacement vector has an incompatible dimension")
        );
        assert_eq!(
            geo.advance_incremental(&Vector::new(3)).err(),
            Some("displacement increment has an incompatible dimension")
        );
    }

    #[test]
    fn advance_works() {
        let space = SampleMeshes::block_qua4(1, 1, 1.0, 1.0).unwrap();
        let mut geo = MeshGeometry::new(&space);
        let u = Vector::from(&[0.0, 0.0, 0.1, 0.0, 0.0, 0.0, 0.1, -0.2]);

        // quasi-static: deformed = reference + u (not accumulated)
        geo.advance(&u).unwrap();
        geo.advance(&u).unwrap();
        geo.activate_deformed();
        let correct = &[0.0, 0.0, 1.1, 0.0, 0.0, 1.0, 1.1, 0.8];
        for i in 0..8 {
            approx_eq(geo.nodes()[i], correct[i], 1e-15);
        }
        assert_eq!(geo.reference().as_data(), &[0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0]);

        // dynamic: accumulated
        geo.advance_incremental(&u).unwrap();
        approx_eq(geo.deformed()[2], 1.2, 1e-15);
        approx_eq(geo.deformed()[7], 0.6, 1e-15);
    }
}
