use crate::base::{assemble_vector, BoundaryFace, Coefficient, H1Space};
use crate::StrError;
use gemlab::integ::{self, Gauss};
use gemlab::shapes::Scratchpad;
use russell_lab::Vector;

/// Defines the distributed load acting on a boundary face
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FaceLoad {
    /// Traction on all components (vector coefficient) or on one component (scalar coefficient)
    Traction(Option<usize>),

    /// Pressure acting against the outward normal (scalar coefficient)
    Pressure,
}

/// Assists in the integration of distributed loads over a face of the boundary
///
/// The loads are dead loads: the face geometry is the reference configuration.
pub struct BoundaryElement {
    /// Index of the natural boundary condition
    pub bc_index: usize,

    /// Kind of load
    load: FaceLoad,

    /// Scratchpad to perform numerical integration
    pad: Scratchpad,

    /// Integration (Gauss) points
    gauss: Gauss,

    /// Real coordinates of each integration point
    ip_coords: Vec<Vec<f64>>,

    /// Local-to-global mapping
    pub local_to_global: Vec<usize>,

    /// Local load vector
    f_local: Vector,
}

impl BoundaryElement {
    /// Allocates a new instance
    pub fn new(space: &H1Space, face: &BoundaryFace, bc_index: usize, load: FaceLoad) -> Result<Self, StrError> {
        let ndim = space.mesh.ndim;
        let mut pad = Scratchpad::new(ndim, face.kind)?;
        space.mesh.set_pad(&mut pad, &face.points);
        let gauss = Gauss::new(face.kind);
        let nnode = face.kind.nnode();
        let mut ip_coords = Vec::with_capacity(gauss.npoint());
        for p in 0..gauss.npoint() {
            let ksi = gauss.coords(p);
            (pad.fn_interp)(&mut pad.interp, ksi);
            let mut x = vec![0.0; ndim];
            for i in 0..ndim {
                for m in 0..nnode {
                    x[i] += pad.interp[m] * pad.xxt.get(i, m);
                }
            }
            ip_coords.push(x);
        }
        Ok(BoundaryElement {
            bc_index,
            load,
            pad,
            gauss,
            ip_coords,
            local_to_global: space.dofs_of_points(&face.points),
            f_local: Vector::new(nnode * ndim),
        })
    }

    /// Calculates the local load vector at time t
    pub fn calc_load(&mut self, coefficient: &Coefficient, t: f64) -> Result<(), StrError> {
        let ndim = self.ip_coords[0].len();
        let ip_coords = &self.ip_coords;
        let mut args = integ::CommonArgs::new(&mut self.pad, &self.gauss);
        match self.load {
            FaceLoad::Traction(None) => integ::vec_02_nv(&mut self.f_local, &mut args, |v, p, _| {
                coefficient.eval_vector(v.as_mut_data(), &ip_coords[p], t)
            }),
            FaceLoad::Traction(Some(component)) => integ::vec_02_nv(&mut self.f_local, &mut args, |v, p, _| {
                for i in 0..ndim {
                    v[i] = 0.0;
                }
                v[component] = coefficient.eval_scalar(&ip_coords[p], t)?;
                Ok(())
            }),
            FaceLoad::Pressure => integ::vec_02_nv_bry(&mut self.f_local, &mut args, |v, p, un, _| {
                // the load opposes the outward normal
                let pressure = coefficient.eval_scalar(&ip_coords[p], t)?;
                for i in 0..ndim {
                    v[i] = -pressure * un[i];
                }
                Ok(())
            }),
        }
    }

    /// Adds the load vector at time t to the global vector
    pub fn add_load(
        &mut self,
        ff: &mut Vector,
        coefficient: &Coefficient,
        t: f64,
        prescribed: &[bool],
    ) -> Result<(), StrError> {
        self.calc_load(coefficient, t)?;
        assemble_vector(ff, &self.f_local, &self.local_to_global, prescribed);
        Ok(())
    }

    /// Returns the local load vector computed by the last call to calc_load
    pub fn f_local(&self) -> &Vector {
        &self.f_local
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////////////////////////
