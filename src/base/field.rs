use super::{Coefficient, Space};
use crate::StrError;
use russell_lab::Vector;

/// Holds a vector quantity (e.g., displacement or velocity) discretized on a finite element space
///
/// The true vector holds the unique unknowns; the local vector holds the nodal values including
/// shared degrees of freedom. Both representations must be reconciled before reading either one.
pub struct FieldState {
    /// Name of the field
    pub name: String,

    /// True degrees of freedom (unique unknowns)
    pub true_vec: Vector,

    /// Local (nodal) degrees of freedom
    pub local_vec: Vector,

    /// Indicates that values were projected onto this field
    initialized: bool,
}

impl FieldState {
    /// Allocates a new instance with zero values
    pub fn new(name: &str, space: &dyn Space) -> Self {
        FieldState {
            name: name.to_string(),
            true_vec: Vector::new(space.true_size()),
            local_vec: Vector::new(space.local_size()),
            initialized: false,
        }
    }

    /// Evaluates a vector coefficient at every node and stores the result in the local vector
    pub fn project(&mut self, space: &dyn Space, coefficient: &Coefficient, t: f64) -> Result<(), StrError> {
        let ndim = space.ndim();
        let mut value = vec![0.0; ndim];
        for node in 0..space.nnode() {
            coefficient.eval_vector(&mut value, space.node_coords(node), t)?;
            for i in 0..ndim {
                self.local_vec[space.local_dof(node, i)] = value[i];
            }
        }
        self.initialized = true;
        Ok(())
    }

    /// Returns true if values were projected onto this field
    pub fn initialized(&self) -> bool {
        self.initialized
    }

    /// Updates the true vector from the local vector (gather)
    pub fn sync_true_from_local(&mut self, space: &dyn Space) {
        space.gather(&mut self.true_vec, &self.local_vec);
    }

    /// Updates the local vector from the true vector (scatter)
    pub fn sync_local_from_true(&mut self, space: &dyn Space) {
        space.scatter(&mut self.local_vec, &self.true_vec);
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
