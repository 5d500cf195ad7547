use crate::StrError;
use russell_tensor::{Mandel, Tensor2};

/// Holds the internal variables of history-dependent materials
///
/// This data is associated with a Gauss (integration) point
#[derive(Clone, Debug)]
pub struct LocalState {
    /// Holds the back stress tensor β (kinematic hardening)
    pub back_stress: Tensor2,

    /// Holds the plastic strain tensor εᵖ
    pub plastic_strain: Tensor2,

    /// Holds the accumulated plastic strain ε̄ᵖ (isotropic hardening)
    pub accumulated_plastic_strain: f64,
}

/// Holds a stable key to a LocalState in the StateArena
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct StateKey(usize);

/// Holds the local states of all integration points
///
/// The arena is allocated once and never resized. The states of a cell are contiguous.
#[derive(Clone, Debug)]
pub struct StateArena {
    /// All states
    all: Vec<LocalState>,

    /// Index of the first state of each cell (ncell + 1)
    offsets: Vec<usize>,
}

impl LocalState {
    /// Allocates a new instance with zero (undeformed) values
    pub fn new() -> Self {
        LocalState {
            back_stress: Tensor2::new(Mandel::Symmetric),
            plastic_strain: Tensor2::new(Mandel::Symmetric),
            accumulated_plastic_strain: 0.0,
        }
    }
}

impl StateArena {
    /// Allocates a new instance
    ///
    /// `n_integ_points` holds the number of integration points of each cell
    pub fn new(n_integ_points: &[usize]) -> Self {
        let mut offsets = Vec::with_capacity(n_integ_points.len() + 1);
        offsets.push(0);
        for n in n_integ_points {
            offsets.push(offsets[offsets.len() - 1] + n);
        }
        let total = offsets[offsets.len() - 1];
        StateArena {
            all: vec![LocalState::new(); total],
            offsets,
        }
    }

    /// Returns the key of the state at an integration point of a cell
    pub fn key(&self, cell: usize, integ_point: usize) -> Result<StateKey, StrError> {
        if cell + 1 >= self.offsets.len() {
            return Err("cell index is out of bounds");
        }
        let index = self.offsets[cell] + integ_point;
        if index >= self.offsets[cell + 1] {
            return Err("integration point index is out of bounds");
        }
        Ok(StateKey(index))
    }

    /// Returns the number of states
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true if there are no states
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Returns an access to a state
    pub fn get(&self, key: StateKey) -> &LocalState {
        &self.all[key.0]
    }

    /// Returns a mutable access to a state
    pub fn get_mut(&mut self, key: StateKey) -> &mut LocalState {
        &mut self.all[key.0]
    }

    /// Returns an iterator over all states
    pub fn iter(&self) -> impl Iterator<Item = &LocalState> {
        self.all.iter()
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
