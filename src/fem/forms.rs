use super::{BoundaryElement, ElementSolid, FaceLoad};
use crate::base::{assemble_matrix, assemble_vector, put_ones_on_diagonal};
use crate::base::{BoundaryConditions, Coefficient, H1Space, NaturalBc, ParamSolid, Space};
use crate::material::{StateArena, StressStrain};
use crate::StrError;
use russell_lab::{Matrix, Vector};
use russell_sparse::{CooMatrix, Sym};

/// Holds the discrete forms of the solid: internal forces, loads, mass, viscosity, and the tangent
///
/// The forms own the constitutive model and the committed state of all integration points.
pub struct SolidForms {
    /// Number of true degrees of freedom
    neq: usize,

    /// Interior elements
    elements: Vec<ElementSolid>,

    /// Boundary elements with distributed loads
    boundaries: Vec<BoundaryElement>,

    /// Constitutive model
    model: StressStrain,

    /// Committed state of all integration points
    states: StateArena,

    /// Incremented each time a stateful model commits a new state
    epoch: usize,

    /// Global Jacobian matrix
    jacobian: CooMatrix,

    /// Number of Jacobian assemblies
    n_assemblies: usize,
}

impl SolidForms {
    /// Allocates a new instance
    pub fn new(
        space: &H1Space,
        param: &ParamSolid,
        bcs: &BoundaryConditions,
        viscosity: Option<&Coefficient>,
    ) -> Result<Self, StrError> {
        let ndim = space.ndim();
        let model = StressStrain::new(param, ndim)?;

        // interior elements
        let mut elements = Vec::with_capacity(space.mesh.cells.len());
        for (index, cell) in space.mesh.cells.iter().enumerate() {
            elements.push(ElementSolid::new(
                space,
                index,
                cell,
                param.ngauss,
                param.density,
                viscosity,
            )?);
        }
        let n_integ_points: Vec<_> = elements.iter().map(|e| e.n_integ_points()).collect();
        let states = StateArena::new(&n_integ_points);

        // boundary elements
        let mut boundaries = Vec::new();
        for (bc_index, bc) in bcs.natural.iter().enumerate() {
            let (markers, load) = match bc {
                NaturalBc::Traction { markers, component, .. } => (markers, FaceLoad::Traction(*component)),
                NaturalBc::Pressure { markers, .. } => (markers, FaceLoad::Pressure),
                NaturalBc::BodyForce { .. } => continue,
            };
            for marker in markers {
                let mut found = false;
                for face in space.faces.iter().filter(|f| f.marker == *marker) {
                    boundaries.push(BoundaryElement::new(space, face, bc_index, load)?);
                    found = true;
                }
                if !found {
                    return Err("cannot find boundary faces with the given marker");
                }
            }
        }

        // Jacobian matrix
        let neq = space.true_size();
        let nnz = neq + elements.iter().fold(0, |acc, e| acc + e.local_to_global.len() * e.local_to_global.len());
        let jacobian = CooMatrix::new(neq, neq, nnz, Sym::No)?;

        Ok(SolidForms {
            neq,
            elements,
            boundaries,
            model,
            states,
            epoch: 0,
            jacobian,
            n_assemblies: 0,
        })
    }

    /// Returns the number of true degrees of freedom
    pub fn neq(&self) -> usize {
        self.neq
    }

    /// Returns the constitutive model
    pub fn model(&self) -> &StressStrain {
        &self.model
    }

    /// Returns the committed state of all integration points
    pub fn states(&self) -> &StateArena {
        &self.states
    }

    /// Returns the state epoch (incremented when a stateful model commits)
    pub fn epoch(&self) -> usize {
        self.epoch
    }

    /// Returns the number of Jacobian assemblies
    pub fn n_assemblies(&self) -> usize {
        self.n_assemblies
    }

    /// Returns the Jacobian matrix computed by the last call to assemble_jacobian
    pub fn jacobian(&self) -> &CooMatrix {
        &self.jacobian
    }

    /// Computes the internal force vector f_int(u)
    pub fn internal_forces(&self, ff: &mut Vector, uu: &Vector) -> Result<(), StrError> {
        let no_prescribed = vec![false; self.neq];
        ff.fill(0.0);
        for e in &self.elements {
            let mut f_local = Vector::new(e.local_to_global.len());
            e.calc_internal_force(&mut f_local, uu, &self.model, &self.states)?;
            assemble_vector(ff, &f_local, &e.local_to_global, &no_prescribed);
        }
        Ok(())
    }

    /// Computes the external force vector f_ext(t) (tractions, pressures, and body forces)
    pub fn external_forces(&mut self, ff: &mut Vector, bcs: &BoundaryConditions, t: f64) -> Result<(), StrError> {
        let no_prescribed = vec![false; self.neq];
        ff.fill(0.0);
        for bry in self.boundaries.iter_mut() {
            let coefficient = match bcs.natural.get(bry.bc_index) {
                Some(NaturalBc::Traction { coefficient, .. })
                | Some(NaturalBc::Pressure { coefficient, .. }) => coefficient,
                _ => return Err("natural boundary condition does not match the boundary element"),
            };
            bry.add_load(ff, coefficient, t, &no_prescribed)?;
        }
        for bc in &bcs.natural {
            if let NaturalBc::BodyForce { coefficient } = bc {
                for e in &self.elements {
                    let mut f_local = Vector::new(e.local_to_global.len());
                    e.calc_body_force(&mut f_local, coefficient, t)?;
                    assemble_vector(ff, &f_local, &e.local_to_global, &no_prescribed);
                }
            }
        }
        Ok(())
    }

    /// Computes out = M v (consistent mass matrix times a vector)
    pub fn mass_action(&self, out: &mut Vector, v: &Vector) {
        self.matrix_action(out, v, |e| &e.mass)
    }

    /// Computes out = S v (viscous matrix times a vector)
    pub fn viscous_action(&self, out: &mut Vector, v: &Vector) {
        self.matrix_action(out, v, |e| &e.viscous)
    }

    /// Computes out = Σₑ Aₑ vₑ
    fn matrix_action<F>(&self, out: &mut Vector, v: &Vector, select: F)
    where
        F: Fn(&ElementSolid) -> &Matrix,
    {
        out.fill(0.0);
        for e in &self.elements {
            let aa = select(e);
            let l2g = &e.local_to_global;
            for a in 0..l2g.len() {
                let mut sum = 0.0;
                for b in 0..l2g.len() {
                    sum += aa.get(a, b) * v[l2g[b]];
                }
                out[l2g[a]] += sum;
            }
        }
    }

    /// Assembles the Jacobian matrix
    ///
    /// ```text
    /// J = c_mass M + c_visc S + c_stiff K(u)
    /// ```
    ///
    /// Rows and columns of prescribed equations are removed and ones are put on the diagonal.
    pub fn assemble_jacobian(
        &mut self,
        uu: &Vector,
        c_mass: f64,
        c_visc: f64,
        c_stiff: f64,
        prescribed: &[bool],
    ) -> Result<(), StrError> {
        self.jacobian.reset();
        for e in &self.elements {
            let n = e.local_to_global.len();
            let mut kk_local = Matrix::new(n, n);
            if c_stiff != 0.0 {
                e.calc_stiffness(&mut kk_local, uu, &self.model, &self.states)?;
            }
            for a in 0..n {
                for b in 0..n {
                    let value = c_stiff * kk_local.get(a, b) + c_mass * e.mass.get(a, b) + c_visc * e.viscous.get(a, b);
                    kk_local.set(a, b, value);
                }
            }
            assemble_matrix(&mut self.jacobian, &kk_local, &e.local_to_global, prescribed)?;
        }
        put_ones_on_diagonal(&mut self.jacobian, prescribed)?;
        self.n_assemblies += 1;
        Ok(())
    }

    /// Commits the state of all integration points for the accepted displacement
    ///
    /// The state is either fully updated or left untouched.
    pub fn commit(&mut self, uu: &Vector) -> Result<(), StrError> {
        if !self.model.actual.with_internal_state() {
            return Ok(());
        }
        let mut updated = self.states.clone();
        for e in &self.elements {
            e.commit(uu, &self.model, &mut updated)?;
        }
        self.states = updated;
        self.epoch += 1;
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
